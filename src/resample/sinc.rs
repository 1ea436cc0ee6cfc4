//! Windowed-sinc resampling via `rubato`.

use rubato::{Resampler, SincFixedOut, SincInterpolationParameters, SincInterpolationType, WindowFunction};

use super::{ratio_to_f64, rate_ratio, SincQuality, SincWindow};
use crate::error::DecodeError;

const CHUNK_SIZE: usize = 1024;
const MAX_RESAMPLE_RATIO_RELATIVE: f64 = 1.1;

/// Quality preset used by the plain [`super::ResampleMode::Sinc`] tag.
pub(super) const DEFAULT_QUALITY: SincQuality = SincQuality {
    sinc_len: 128,
    oversampling_factor: 256,
    window: SincWindow::Blackman2,
};

fn window_function(window: SincWindow) -> WindowFunction {
    match window {
        SincWindow::Blackman2 => WindowFunction::Blackman2,
        SincWindow::BlackmanHarris2 => WindowFunction::BlackmanHarris2,
    }
}

/// De-interleaves, runs the whole buffer through `rubato::SincFixedOut` in
/// fixed-size chunks, then re-interleaves the result.
///
/// The final chunk is padded with silence if it is shorter than the
/// resampler's required input length, then that padding's tail is trimmed
/// from the output before returning.
pub(super) fn resample(
    samples: &[f32],
    num_channels: usize,
    src_hz: u32,
    tgt_hz: u32,
    quality: SincQuality,
) -> Result<Vec<f32>, DecodeError> {
    let src_frames = samples.len() / num_channels;
    if src_frames == 0 {
        return Ok(Vec::new());
    }

    // `rubato`'s API takes a plain `f64` ratio, but it is derived from the
    // exact reduced fraction rather than dividing the raw `u32`s, matching
    // the teacher's `Ratio::new(target_rate, source_rate)` grounding.
    let resample_ratio = ratio_to_f64(rate_ratio(tgt_hz, src_hz));
    let window = window_function(quality.window);
    let sinc_len = quality.sinc_len;
    let params = SincInterpolationParameters {
        sinc_len,
        f_cutoff: rubato::calculate_cutoff(sinc_len, window),
        oversampling_factor: quality.oversampling_factor,
        interpolation: SincInterpolationType::Quadratic,
        window,
    };

    let mut resampler = SincFixedOut::<f64>::new(
        resample_ratio,
        MAX_RESAMPLE_RATIO_RELATIVE,
        params,
        CHUNK_SIZE,
        num_channels,
    )
    .map_err(|e| DecodeError::DecodingError(e.to_string()))?;

    let mut deinterleaved: Vec<Vec<f64>> = vec![Vec::with_capacity(src_frames); num_channels];
    for frame in samples.chunks_exact(num_channels) {
        for (c, &sample) in frame.iter().enumerate() {
            deinterleaved[c].push(sample as f64);
        }
    }

    let mut output_buffer = resampler.output_buffer_allocate(true);
    let mut out_channels: Vec<Vec<f64>> = vec![Vec::new(); num_channels];

    let mut consumed = 0;
    while consumed < src_frames {
        let needed = resampler.input_frames_max();
        let remaining = src_frames - consumed;

        let input_chunk: Vec<Vec<f64>> = if remaining >= needed {
            deinterleaved
                .iter()
                .map(|ch| ch[consumed..consumed + needed].to_vec())
                .collect()
        } else {
            deinterleaved
                .iter()
                .map(|ch| {
                    let mut tail = ch[consumed..].to_vec();
                    tail.resize(needed, 0.0);
                    tail
                })
                .collect()
        };
        let was_padded = remaining < needed;

        let (_, frames_out) = resampler
            .process_into_buffer(&input_chunk, &mut output_buffer, None)
            .map_err(|e| DecodeError::DecodingError(e.to_string()))?;

        let frames_out = if was_padded {
            // Scale down the produced frame count by the fraction of the
            // final chunk that was real (non-silence) input.
            let real_fraction = remaining as f64 / needed as f64;
            ((frames_out as f64) * real_fraction).ceil() as usize
        } else {
            frames_out
        };

        for (c, buf) in out_channels.iter_mut().enumerate() {
            buf.extend_from_slice(&output_buffer[c][..frames_out.min(output_buffer[c].len())]);
        }

        consumed += needed.min(remaining);
    }

    let out_frames = out_channels.first().map(Vec::len).unwrap_or(0);
    let mut interleaved = Vec::with_capacity(out_frames * num_channels);
    for frame in 0..out_frames {
        for channel in out_channels.iter() {
            interleaved.push(channel[frame] as f32);
        }
    }
    Ok(interleaved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_empty_output() {
        let out = resample(&[], 2, 44_100, 48_000, DEFAULT_QUALITY).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn upsampling_produces_nonempty_output() {
        let samples: Vec<f32> = (0..4410)
            .map(|i| (i as f32 * 0.01).sin())
            .collect();
        let out = resample(&samples, 1, 44_100, 48_000, DEFAULT_QUALITY).unwrap();
        assert!(!out.is_empty());
    }

    #[test]
    fn upsampled_low_frequency_tone_stays_within_input_amplitude() {
        use approx::assert_relative_eq;
        let samples: Vec<f32> = (0..4410)
            .map(|i| 0.5 * (i as f32 * 0.01).sin())
            .collect();
        let out = resample(&samples, 1, 44_100, 48_000, DEFAULT_QUALITY).unwrap();
        let peak = out.iter().cloned().fold(0.0f32, |a, b| a.max(b.abs()));
        assert_relative_eq!(peak, 0.5, max_relative = 0.2);
    }

    #[test]
    fn custom_quality_options_still_resample() {
        let samples: Vec<f32> = (0..4410).map(|i| (i as f32 * 0.01).sin()).collect();
        let quality = SincQuality {
            sinc_len: 64,
            oversampling_factor: 128,
            window: SincWindow::BlackmanHarris2,
        };
        let out = resample(&samples, 1, 44_100, 48_000, quality).unwrap();
        assert!(!out.is_empty());
    }
}
