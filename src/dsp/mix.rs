//! Buffer summing, gain and wet/dry primitives.

/*
Layer Summing
=============

The mixer builds its output by ADDING layers, each scaled by its own gain:

    out[i] = Σ layer_k[i] × gain_k

Layers are added in registration order. Float addition is not associative,
so a fixed order is what makes two renders of the same preset bit-identical.

Nothing here clamps. Summed layers can exceed ±1.0; the limiter at the end
of the chain is what bounds the output.

Wet/Dry
-------

    output = dry × (1 - mix) + wet × mix

    mix = 0.0  →  untouched input
    mix = 0.3  →  "30% wet"
    mix = 1.0  →  effect only
*/

/// Blend dry and wet samples (single sample).
#[inline]
pub fn blend_dry_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// `out[i] += src[i] × gain`
#[inline]
pub fn accumulate(out: &mut [f32], src: &[f32], gain: f32) {
    debug_assert_eq!(out.len(), src.len());

    for (o, &s) in out.iter_mut().zip(src.iter()) {
        *o += s * gain;
    }
}

/// Add signal B into signal A in-place (summing).
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}

#[inline]
pub fn apply_gain(buffer: &mut [f32], gain: f32) {
    if gain == 1.0 {
        return;
    }
    for sample in buffer.iter_mut() {
        *sample *= gain;
    }
}

/// Copy a mono block to every channel of an interleaved buffer.
///
/// `out.len()` must be `mono.len() × channels`.
#[inline]
pub fn spread_interleaved(mono: &[f32], out: &mut [f32], channels: usize) {
    debug_assert_eq!(mono.len() * channels, out.len());

    for (frame, &sample) in out.chunks_exact_mut(channels).zip(mono.iter()) {
        frame.fill(sample);
    }
}
