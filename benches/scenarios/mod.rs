//! Real-world scenario benchmarks.
//!
//! These render complete presets the way the host does: through the final
//! mixer and through the engine's render handle.

mod engine;
mod presets;

pub use engine::bench_engine;
pub use presets::bench_presets;
