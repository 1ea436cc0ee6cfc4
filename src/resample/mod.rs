//! Sample-rate conversion, invoked either mid-pipeline or standalone on a built [`Waveform`](crate::Waveform).
//!
//! Every mode is required to satisfy the output-length law: for `src_frames`
//! at `src_hz` resampled to `tgt_hz`, the result always has exactly
//! `round_half_to_even(src_frames * tgt_hz / src_hz)` frames, regardless of
//! the internal block size or filter delay of the algorithm doing the work.
//! This module enforces that by trimming or zero-padding each mode's raw
//! output to the computed length rather than trusting it verbatim.

mod linear;
mod sinc;

use num_rational::Ratio;

use crate::error::DecodeError;

/// Minimum ratio (either direction) the sinc resampler will attempt.
///
/// Below this, filter design becomes impractical; such requests surface as
/// [`DecodeError::WrongFrameRateRatio`].
const MIN_SUPPORTED_RATIO: f64 = 1.0 / 256.0;
const MAX_SUPPORTED_RATIO: f64 = 256.0;

/// Computes the exact `target_hz / source_hz` ratio as a reduced fraction,
/// the way the teacher's own resampler does (`Ratio::new(target_rate,
/// source_rate)` in `source/resample/mod.rs`), rather than dividing the
/// raw `u32`s as floats up front. The `f64` conversion happens only once,
/// from the reduced numerator/denominator, at the point a float is
/// actually required (the range check, or `rubato`'s float-based API).
pub(crate) fn rate_ratio(target_hz: u32, source_hz: u32) -> Ratio<i64> {
    Ratio::new(target_hz as i64, source_hz as i64)
}

/// Converts a [`Ratio`] to `f64` without pulling in `num-traits` just for
/// `ToPrimitive`.
pub(crate) fn ratio_to_f64(ratio: Ratio<i64>) -> f64 {
    *ratio.numer() as f64 / *ratio.denom() as f64
}

/// Which resampling algorithm to use.
///
/// The set is closed and fixed at compile time, but enumerable: callers can
/// match on it exhaustively today, though it is marked `#[non_exhaustive]`
/// so a future quality tier can be added without a breaking change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResampleMode {
    /// Linear interpolation between adjacent source frames. Fast, no anti-aliasing.
    Linear,
    /// Windowed-sinc interpolation via `rubato`, using this crate's default
    /// quality preset. Higher quality, anti-aliased.
    Sinc,
    /// Windowed-sinc interpolation via `rubato` with caller-chosen quality
    /// knobs, for callers who want to trade speed against filter quality
    /// beyond the `Sinc` preset.
    SincWithOptions(SincQuality),
}

impl Default for ResampleMode {
    /// The default is quality-oriented, per the Waveform-level `resample()` contract.
    fn default() -> Self {
        ResampleMode::Sinc
    }
}

/// Quality knobs for [`ResampleMode::SincWithOptions`], mirroring the
/// parameters `rubato::SincInterpolationParameters` exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SincQuality {
    /// Length of the windowed-sinc filter. Longer filters attenuate
    /// aliasing/images more but cost more per output sample.
    pub sinc_len: usize,
    /// How finely the filter is pre-computed between integer taps.
    pub oversampling_factor: usize,
    /// Which window function shapes the filter's frequency response.
    pub window: SincWindow,
}

impl Default for SincQuality {
    /// Matches the preset used by plain [`ResampleMode::Sinc`].
    fn default() -> Self {
        sinc::DEFAULT_QUALITY
    }
}

/// The window function used to shape a windowed-sinc filter.
///
/// A thin, `PartialEq`-friendly mirror of the handful of
/// `rubato::WindowFunction` variants this crate exposes, rather than
/// embedding `rubato`'s own enum directly in public API types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SincWindow {
    /// A two-term Blackman-Harris-family window; steep rolloff, good
    /// stopband attenuation. The preset `ResampleMode::Sinc` uses.
    Blackman2,
    /// A Blackman-Harris window; slightly gentler rolloff.
    BlackmanHarris2,
}

/// Computes `round_half_to_even(numerator / denominator)` using exact integer
/// arithmetic, so output lengths never drift due to floating-point rounding.
pub(crate) fn round_half_to_even_div(numerator: u128, denominator: u128) -> u128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let twice_remainder = remainder * 2;
    match twice_remainder.cmp(&denominator) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => {
            if quotient % 2 == 0 {
                quotient
            } else {
                quotient + 1
            }
        }
    }
}

/// The output-length law: the number of frames a resample from `src_hz` to
/// `tgt_hz` of `src_frames` frames MUST produce.
pub fn output_frame_count(src_frames: u64, src_hz: u32, tgt_hz: u32) -> u64 {
    round_half_to_even_div(src_frames as u128 * tgt_hz as u128, src_hz as u128) as u64
}

/// Checks whether `tgt_hz` is a rate the resampler can reach from `src_hz`,
/// without doing any resampling work. Shared by the decode pipeline's
/// pre-decode option validation and by [`resample_interleaved`] itself.
pub(crate) fn validate_frame_rate_ratio(src_hz: u32, tgt_hz: u32) -> Result<(), DecodeError> {
    if tgt_hz == 0 {
        return Err(DecodeError::WrongFrameRateRatio {
            source: src_hz,
            target: tgt_hz,
        });
    }
    let ratio = ratio_to_f64(rate_ratio(tgt_hz, src_hz));
    if !(MIN_SUPPORTED_RATIO..=MAX_SUPPORTED_RATIO).contains(&ratio) {
        return Err(DecodeError::WrongFrameRateRatio {
            source: src_hz,
            target: tgt_hz,
        });
    }
    Ok(())
}

/// Resamples an interleaved multi-channel buffer from `src_hz` to `tgt_hz`.
pub(crate) fn resample_interleaved(
    samples: &[f32],
    num_channels: u16,
    src_hz: u32,
    tgt_hz: u32,
    mode: ResampleMode,
) -> Result<Vec<f32>, DecodeError> {
    validate_frame_rate_ratio(src_hz, tgt_hz)?;

    let num_channels = num_channels as usize;
    let src_frames = if num_channels == 0 {
        0
    } else {
        samples.len() / num_channels
    };
    let target_frames = output_frame_count(src_frames as u64, src_hz, tgt_hz) as usize;

    if src_frames == 0 || num_channels == 0 {
        return Ok(vec![0.0; target_frames * num_channels]);
    }

    let mut raw = match mode {
        ResampleMode::Linear => linear::resample(samples, num_channels, src_hz, tgt_hz),
        ResampleMode::Sinc => {
            sinc::resample(samples, num_channels, src_hz, tgt_hz, sinc::DEFAULT_QUALITY)?
        }
        ResampleMode::SincWithOptions(quality) => {
            sinc::resample(samples, num_channels, src_hz, tgt_hz, quality)?
        }
    };

    fit_to_length(&mut raw, num_channels, target_frames);
    Ok(raw)
}

/// Trims or zero-pads an interleaved buffer so it holds exactly `target_frames`.
fn fit_to_length(buffer: &mut Vec<f32>, num_channels: usize, target_frames: usize) {
    let target_len = target_frames * num_channels;
    buffer.resize(target_len, 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    #[test]
    fn output_length_law_matches_known_half_even_cases() {
        // 5 / 2 = 2.5 -> rounds to 2 (even)
        assert_eq!(round_half_to_even_div(5, 2), 2);
        // 7 / 2 = 3.5 -> rounds to 4 (even)
        assert_eq!(round_half_to_even_div(7, 2), 4);
        // 9 / 4 = 2.25 -> rounds to 2
        assert_eq!(round_half_to_even_div(9, 4), 2);
    }

    #[test]
    fn resample_to_same_rate_is_identity_length() {
        let src = vec![0.1f32, 0.2, 0.3, 0.4, 0.5, 0.6];
        let out = resample_interleaved(&src, 2, 44_100, 44_100, ResampleMode::Linear).unwrap();
        assert_eq!(out.len(), src.len());
    }

    #[test]
    fn resample_rejects_zero_target() {
        let src = vec![0.0f32; 100];
        let err = resample_interleaved(&src, 1, 44_100, 0, ResampleMode::Sinc).unwrap_err();
        assert!(matches!(err, DecodeError::WrongFrameRateRatio { .. }));
    }

    #[test]
    fn resample_rejects_absurd_ratio() {
        let src = vec![0.0f32; 100];
        let err = resample_interleaved(&src, 1, 44_100, 1, ResampleMode::Sinc).unwrap_err();
        assert!(matches!(err, DecodeError::WrongFrameRateRatio { .. }));
    }

    #[test]
    fn sinc_with_options_satisfies_the_output_length_law() {
        let src: Vec<f32> = (0..4410).map(|i| (i as f32 * 0.01).sin()).collect();
        let quality = SincQuality {
            sinc_len: 64,
            oversampling_factor: 128,
            window: SincWindow::BlackmanHarris2,
        };
        let out = resample_interleaved(
            &src,
            1,
            44_100,
            48_000,
            ResampleMode::SincWithOptions(quality),
        )
        .unwrap();
        assert_eq!(out.len(), output_frame_count(4410, 44_100, 48_000) as usize);
    }

    quickcheck! {
        fn output_length_law_holds_for_linear(src_frames: u16, src_hz: u16, tgt_hz: u16) -> TestResult {
            let (src_hz, tgt_hz) = (src_hz as u32 + 1, tgt_hz as u32 + 1);
            let ratio = tgt_hz as f64 / src_hz as f64;
            if !(MIN_SUPPORTED_RATIO..=MAX_SUPPORTED_RATIO).contains(&ratio) {
                return TestResult::discard();
            }
            let src_frames = src_frames as u64 % 2000;
            let samples = vec![0.0f32; src_frames as usize * 2];
            let out = resample_interleaved(&samples, 2, src_hz, tgt_hz, ResampleMode::Linear).unwrap();
            let expected = output_frame_count(src_frames, src_hz, tgt_hz) as usize;
            TestResult::from_bool(out.len() == expected * 2)
        }
    }
}
