//! Linear-interpolation resampling: fast, no anti-aliasing.

use super::{ratio_to_f64, rate_ratio};
use crate::math::lerp;

/// For every output frame `i`, computes the source position
/// `p = i * src_hz / tgt_hz`, then linearly interpolates between
/// `floor(p)` and `floor(p) + 1` (clamped to the last source frame) per
/// channel.
///
/// The caller is responsible for trimming/padding the result to the
/// output-length law; this produces `ceil(src_frames * tgt_hz / src_hz) + 1`
/// frames so there is always at least one frame to trim from.
pub(super) fn resample(samples: &[f32], num_channels: usize, src_hz: u32, tgt_hz: u32) -> Vec<f32> {
    let src_frames = samples.len() / num_channels;
    if src_frames == 0 {
        return Vec::new();
    }

    // Derived from the exact reduced fraction rather than a raw `u32`
    // division, matching the teacher's `Ratio::new(target_rate,
    // source_rate)` grounding for rate-ratio computation.
    let ratio = ratio_to_f64(rate_ratio(src_hz, tgt_hz));
    let approx_out_frames = (src_frames as f64 / ratio).ceil() as usize + 1;

    let frame = |index: usize| &samples[index * num_channels..(index + 1) * num_channels];
    let last_frame = src_frames - 1;

    let mut out = Vec::with_capacity(approx_out_frames * num_channels);
    for i in 0..approx_out_frames {
        let position = i as f64 * ratio;
        let lower = position.floor() as usize;
        let lower = lower.min(last_frame);
        let upper = (lower + 1).min(last_frame);
        let frac = (position - lower as f64).clamp(0.0, 1.0) as f32;

        let lower_frame = frame(lower);
        let upper_frame = frame(upper);
        for c in 0..num_channels {
            // lerp takes a numerator/denominator pair rather than a plain
            // fraction, so scale `frac` up to keep full f32 precision.
            const SCALE: u32 = 1 << 16;
            out.push(lerp(
                &lower_frame[c],
                &upper_frame[c],
                (frac * SCALE as f32) as u32,
                SCALE,
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsampling_doubles_frame_count_region() {
        let samples = vec![0.0f32, 1.0, 2.0, 3.0]; // mono, 4 frames: 0,1,2,3
        let out = resample(&samples, 1, 1, 2);
        // First few interpolated frames should be close to 0, 0.5, 1.0, 1.5, 2.0 ...
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clamps_at_final_frame() {
        let samples = vec![0.0f32, 10.0];
        let out = resample(&samples, 1, 1, 1);
        // Same rate: position i maps directly to frame i, no overshoot past last frame.
        assert_eq!(out.len() >= 2, true);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 10.0).abs() < 1e-6);
    }
}
