//! Channel selection and mono mixdown.

/// Keeps the first `requested_channels` channels of each frame (all of them
/// if `requested_channels == 0`), then, if `convert_to_mono` is set, averages
/// the retained channels down to a single channel.
///
/// `requested_channels` must already have been validated against
/// `src_channels` by [`super::validate::validate_post_probe`].
pub(crate) fn shape(
    samples: &[f32],
    src_channels: u16,
    requested_channels: u16,
    convert_to_mono: bool,
) -> (Vec<f32>, u16) {
    let src_channels = src_channels as usize;
    let kept_channels = if requested_channels == 0 {
        src_channels
    } else {
        requested_channels as usize
    };

    let mut selected = Vec::with_capacity(samples.len() / src_channels.max(1) * kept_channels);
    for frame in samples.chunks_exact(src_channels) {
        selected.extend_from_slice(&frame[..kept_channels]);
    }

    if !convert_to_mono {
        return (selected, kept_channels as u16);
    }

    let mut mono = Vec::with_capacity(selected.len() / kept_channels.max(1));
    for frame in selected.chunks_exact(kept_channels) {
        let sum: f32 = frame.iter().sum();
        mono.push(sum / kept_channels as f32);
    }
    (mono, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_all_channels_when_unspecified() {
        let samples = vec![0.1, 0.2, 0.3, 0.4];
        let (out, channels) = shape(&samples, 2, 0, false);
        assert_eq!(channels, 2);
        assert_eq!(out, samples);
    }

    #[test]
    fn drops_trailing_channels() {
        // 3 channels, 2 frames
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let (out, channels) = shape(&samples, 3, 2, false);
        assert_eq!(channels, 2);
        assert_eq!(out, vec![1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn averages_retained_channels() {
        // stereo, 2 frames: (1.0, 3.0), (2.0, 4.0)
        let samples = vec![1.0, 3.0, 2.0, 4.0];
        let (out, channels) = shape(&samples, 2, 0, true);
        assert_eq!(channels, 1);
        assert_eq!(out, vec![2.0, 3.0]);
    }
}
