//! Composable building blocks for constructing ambient sound graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what a preset needs:
//! owned state, modulation, sequencing and block-based rendering. The
//! `extensions` module adds fluent helpers so presets read as a chain.

/// Multiply two signals together (amplitude modulation, fixed gains).
pub mod amplify;
/// Cascading metallic grain strikes.
pub mod chime;
/// One-shot envelope node.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.through()`, `.modulate()`, ...).
pub mod extensions;
/// TPT state-variable filter node.
pub mod filter;
/// Low frequency oscillators mapped onto a parameter range.
pub mod lfo;
/// Looping breathed melody over additive voices.
pub mod melody;
/// Weighted and summed parallel signals.
pub mod mix;
/// Drive a node parameter from a control signal.
pub mod modulate;
/// Core traits shared by all graph nodes.
pub mod node;
/// Seeded noise sources.
pub mod noise;
/// Audio-band oscillators.
pub mod oscillator;
/// Additive harmonic stacks (drones).
pub mod partials;
/// Serial chaining of a source and a processor.
pub mod through;
