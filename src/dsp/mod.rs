//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to embed directly inside signal nodes and the final
//! mixer. They intentionally stay focused on the signal-processing math so
//! graph combinators can layer on orchestration and modulation.

/// Note envelope shapes and the attack/sustain/release state machine.
pub mod envelope;
/// Linear and equal-power gain ramps.
pub mod fade;
/// Trapezoidal state-variable filter with simultaneous responses.
pub mod filter;
/// Low frequency oscillators and the canonical range mapping.
pub mod lfo;
/// Stateless tanh peak limiter.
pub mod limiter;
/// Buffer summing and wet/dry helpers.
pub mod mix;
/// Seeded white, pink and brown noise.
pub mod noise;
/// Phase-accumulating periodic oscillators.
pub mod oscillator;
/// Schroeder comb/allpass reverb.
pub mod reverb;

pub use envelope::EnvelopeState;
