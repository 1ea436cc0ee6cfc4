//! Start/end trimming and zero-padding at the source frame rate.

use crate::resample::round_half_to_even_div;

/// Slices `samples` (interleaved, `num_channels` wide) to the window
/// implied by `start_ms`/`end_ms` at `src_hz`, padding with silence at the
/// end if `zero_pad_ending` is set and the decoded span came up short.
///
/// `end_ms == 0` means "to the end of the decoded audio".
pub(crate) fn slice(
    samples: &[f32],
    num_channels: u16,
    src_hz: u32,
    start_ms: u64,
    end_ms: u64,
    zero_pad_ending: bool,
) -> Vec<f32> {
    let num_channels = num_channels as usize;
    let total_frames = if num_channels == 0 {
        0
    } else {
        samples.len() / num_channels
    };

    let start_frame = ms_to_frames(start_ms, src_hz).min(total_frames as u64) as usize;
    let end_frame = if end_ms == 0 {
        total_frames
    } else {
        ms_to_frames(end_ms, src_hz) as usize
    };

    let available_end = end_frame.min(total_frames);
    let mut out = if start_frame < available_end {
        samples[start_frame * num_channels..available_end * num_channels].to_vec()
    } else {
        Vec::new()
    };

    if zero_pad_ending && end_ms != 0 {
        let requested_frames = end_frame.saturating_sub(start_frame);
        let actual_frames = out.len() / num_channels.max(1);
        if actual_frames < requested_frames {
            out.resize(requested_frames * num_channels, 0.0);
        }
    }

    out
}

fn ms_to_frames(ms: u64, hz: u32) -> u64 {
    round_half_to_even_div(ms as u128 * hz as u128, 1000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples_mono(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    #[test]
    fn defaults_keep_everything() {
        let s = samples_mono(10);
        let out = slice(&s, 1, 44_100, 0, 0, false);
        assert_eq!(out, s);
    }

    #[test]
    fn trims_start_and_end() {
        let s = samples_mono(1000);
        // 1 second at 1000 Hz == 1000 frames; slice [100ms, 200ms) -> frames [100, 200)
        let out = slice(&s, 1, 1000, 100, 200, false);
        assert_eq!(out.len(), 100);
        assert_eq!(out[0], 100.0);
    }

    #[test]
    fn short_span_without_padding_stays_short() {
        let s = samples_mono(150);
        let out = slice(&s, 1, 1000, 100, 300, false);
        assert_eq!(out.len(), 50); // only 50 frames available past start
    }

    #[test]
    fn zero_pad_reaches_requested_length() {
        let s = samples_mono(150);
        let out = slice(&s, 1, 1000, 100, 300, true);
        assert_eq!(out.len(), 200); // requested 300-100=200 frames
        assert!(out[199] == 0.0);
    }
}
