//! The canonical in-memory audio representation and its constructors.

use std::io::Cursor;

use crate::args::DecodeArgs;
use crate::decode;
use crate::error::DecodeError;
use crate::resample::{self, ResampleMode};

/// An owned block of interleaved `f32` PCM audio at a fixed frame rate and channel count.
///
/// Samples are laid out frame-major, channel-minor: the sample at frame `f`,
/// channel `c` lives at index `f * num_channels + c`. The buffer always has
/// exactly `num_frames * num_channels` elements; there is no padding or
/// stride to account for.
///
/// A `Waveform` is immutable once built. Every transform (resampling,
/// slicing) returns a new `Waveform` rather than mutating in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    frame_rate_hz: u32,
    num_channels: u16,
    samples: Vec<f32>,
}

impl Waveform {
    pub(crate) fn from_parts(frame_rate_hz: u32, num_channels: u16, samples: Vec<f32>) -> Self {
        debug_assert_eq!(samples.len() % num_channels.max(1) as usize, 0);
        Self {
            frame_rate_hz,
            num_channels,
            samples,
        }
    }

    /// Allocates a silent waveform of exactly `num_frames` frames.
    pub fn from_frames_of_silence(frame_rate_hz: u32, num_channels: u16, num_frames: u64) -> Self {
        let len = num_frames as usize * num_channels as usize;
        Self::from_parts(frame_rate_hz, num_channels, vec![0.0; len])
    }

    /// Allocates a silent waveform long enough to hold `duration_ms` milliseconds,
    /// computing the frame count as `ceil(frame_rate_hz * duration_ms / 1000)`.
    pub fn from_milliseconds_of_silence(
        frame_rate_hz: u32,
        num_channels: u16,
        duration_ms: u64,
    ) -> Self {
        let num_frames =
            (frame_rate_hz as u128 * duration_ms as u128).div_ceil(1000) as u64;
        Self::from_frames_of_silence(frame_rate_hz, num_channels, num_frames)
    }

    /// Builds a waveform directly from an already-interleaved sample buffer.
    ///
    /// Fails with [`DecodeError::WrongNumChannels`] if `samples.len()` is not
    /// a multiple of `num_channels`.
    pub fn from_interleaved_samples(
        frame_rate_hz: u32,
        num_channels: u16,
        samples: Vec<f32>,
    ) -> Result<Self, DecodeError> {
        if num_channels == 0 || samples.len() % num_channels as usize != 0 {
            return Err(DecodeError::WrongNumChannels {
                requested: num_channels,
                available: 0,
            });
        }
        Ok(Self::from_parts(frame_rate_hz, num_channels, samples))
    }

    /// Builds a waveform from a 2-D `(num_frames, num_channels)` array of row slices.
    ///
    /// Every row must have the same length; that length becomes `num_channels`.
    /// An empty `rows` slice produces a zero-channel, zero-frame waveform.
    pub fn from_2d_array(frame_rate_hz: u32, rows: &[Vec<f32>]) -> Result<Self, DecodeError> {
        let num_channels = rows.first().map(Vec::len).unwrap_or(0);
        let mut samples = Vec::with_capacity(rows.len() * num_channels);
        for row in rows {
            if row.len() != num_channels {
                return Err(DecodeError::WrongNumChannels {
                    requested: row.len() as u16,
                    available: num_channels as u16,
                });
            }
            samples.extend_from_slice(row);
        }
        Ok(Self::from_parts(frame_rate_hz, num_channels as u16, samples))
    }

    /// Runs the full decoder pipeline over a file on disk.
    pub fn from_file(path: impl AsRef<std::path::Path>, args: DecodeArgs) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DecodeError::FileNotFound {
            path: path.display().to_string(),
            source,
        })?;
        decode::run_pipeline(std::io::BufReader::new(file), Some(file_byte_len(path)), args)
    }

    /// Runs the full decoder pipeline over an in-memory encoded byte buffer.
    pub fn from_encoded_bytes(bytes: Vec<u8>, args: DecodeArgs) -> Result<Self, DecodeError> {
        let len = bytes.len() as u64;
        decode::run_pipeline(Cursor::new(bytes), Some(len), args)
    }

    /// Same as [`Waveform::from_file`], returning a `(num_frames, num_channels)`
    /// row-major array instead of a `Waveform`. The host-binding layer decides
    /// how to materialize this as a native 2-D numeric type.
    pub fn from_file_into_numpy(
        path: impl AsRef<std::path::Path>,
        args: DecodeArgs,
    ) -> Result<Vec<Vec<f32>>, DecodeError> {
        Self::from_file(path, args).map(|w| w.to_2d_array())
    }

    /// Same as [`Waveform::from_encoded_bytes`], returning a
    /// `(num_frames, num_channels)` row-major array instead of a `Waveform`.
    pub fn from_encoded_bytes_into_numpy(
        bytes: Vec<u8>,
        args: DecodeArgs,
    ) -> Result<Vec<Vec<f32>>, DecodeError> {
        Self::from_encoded_bytes(bytes, args).map(|w| w.to_2d_array())
    }

    /// Frame count: the number of samples per channel.
    pub fn num_frames(&self) -> u64 {
        if self.num_channels == 0 {
            0
        } else {
            self.samples.len() as u64 / self.num_channels as u64
        }
    }

    /// Number of interleaved channels.
    pub fn num_channels(&self) -> u16 {
        self.num_channels
    }

    /// Frame rate in Hz.
    pub fn frame_rate_hz(&self) -> u32 {
        self.frame_rate_hz
    }

    /// Returns the sample at `(frame, channel)`, or `None` if out of bounds.
    ///
    /// Never panics.
    pub fn get_sample(&self, frame: u64, channel: u16) -> Option<f32> {
        if channel >= self.num_channels {
            return None;
        }
        let index = frame.checked_mul(self.num_channels as u64)?.checked_add(channel as u64)?;
        self.samples.get(index as usize).copied()
    }

    /// Returns a copy of the full interleaved buffer.
    pub fn to_interleaved_samples(&self) -> Vec<f32> {
        self.samples.clone()
    }

    /// Borrows the full interleaved buffer without copying.
    pub fn as_interleaved_samples(&self) -> &[f32] {
        &self.samples
    }

    /// Exports the waveform as `num_frames` row slices, each `num_channels` long.
    pub fn to_2d_array(&self) -> Vec<Vec<f32>> {
        if self.num_channels == 0 {
            return Vec::new();
        }
        self.samples
            .chunks_exact(self.num_channels as usize)
            .map(<[f32]>::to_vec)
            .collect()
    }

    /// Resamples to `target_hz` using the default, quality-oriented mode.
    pub fn resample(&self, target_hz: u32) -> Result<Self, DecodeError> {
        self.resample_by_mode(target_hz, ResampleMode::default())
    }

    /// Resamples to `target_hz` using an explicit [`ResampleMode`].
    ///
    /// The output frame count always satisfies the output-length law:
    /// `round_half_to_even(num_frames * target_hz / frame_rate_hz)`.
    pub fn resample_by_mode(&self, target_hz: u32, mode: ResampleMode) -> Result<Self, DecodeError> {
        if target_hz == self.frame_rate_hz {
            return Ok(self.clone());
        }
        let resampled = resample::resample_interleaved(
            &self.samples,
            self.num_channels,
            self.frame_rate_hz,
            target_hz,
            mode,
        )?;
        Ok(Self::from_parts(target_hz, self.num_channels, resampled))
    }
}

fn file_byte_len(path: &std::path::Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_has_expected_length() {
        let w = Waveform::from_frames_of_silence(44_100, 2, 10);
        assert_eq!(w.num_frames(), 10);
        assert_eq!(w.num_channels(), 2);
        assert_eq!(w.to_interleaved_samples().len(), 20);
        assert!(w.to_interleaved_samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let err = Waveform::from_file("/nonexistent/track.flac", DecodeArgs::default()).unwrap_err();
        assert!(matches!(err, DecodeError::FileNotFound { .. }));
    }

    #[test]
    fn from_file_into_numpy_reports_missing_file() {
        let err =
            Waveform::from_file_into_numpy("/nonexistent/track.flac", DecodeArgs::default())
                .unwrap_err();
        assert!(matches!(err, DecodeError::FileNotFound { .. }));
    }

    #[test]
    fn from_encoded_bytes_into_numpy_rejects_unknown_encoding() {
        let err =
            Waveform::from_encoded_bytes_into_numpy(b"asdfasdfasdfe".to_vec(), DecodeArgs::default())
                .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownInputEncoding));
    }

    #[test]
    fn milliseconds_of_silence_rounds_up() {
        // 1 ms at 44_100 Hz = 44.1 frames, ceil to 45.
        let w = Waveform::from_milliseconds_of_silence(44_100, 1, 1);
        assert_eq!(w.num_frames(), 45);
    }

    #[test]
    fn interleaved_round_trip() {
        let xs = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let w = Waveform::from_interleaved_samples(44_100, 2, xs.clone()).unwrap();
        assert_eq!(w.to_interleaved_samples(), xs);
    }

    #[test]
    fn interleaved_rejects_misaligned_length() {
        let err = Waveform::from_interleaved_samples(44_100, 2, vec![0.1, 0.2, 0.3]).unwrap_err();
        assert!(matches!(err, DecodeError::WrongNumChannels { .. }));
    }

    #[test]
    fn two_d_round_trip() {
        let rows = vec![vec![0.1, -0.2], vec![0.3, -0.4], vec![0.5, -0.6]];
        let w = Waveform::from_2d_array(44_100, &rows).unwrap();
        assert_eq!(w.to_2d_array(), rows);
    }

    #[test]
    fn get_sample_out_of_bounds_returns_none() {
        let w = Waveform::from_frames_of_silence(44_100, 2, 4);
        assert_eq!(w.get_sample(3, 1), Some(0.0));
        assert_eq!(w.get_sample(4, 0), None);
        assert_eq!(w.get_sample(0, 2), None);
    }

    #[test]
    fn idempotent_resample() {
        let w = Waveform::from_frames_of_silence(44_100, 2, 1000);
        let same = w.resample(44_100).unwrap();
        assert_eq!(same.num_frames(), w.num_frames());
        assert_eq!(same.frame_rate_hz(), w.frame_rate_hz());
    }

    use rstest::rstest;

    #[rstest]
    #[case(44_100, 1, 10)]
    #[case(48_000, 2, 0)]
    #[case(8_000, 6, 441)]
    #[case(192_000, 1, 1)]
    fn silence_always_satisfies_the_length_invariant(
        #[case] frame_rate_hz: u32,
        #[case] num_channels: u16,
        #[case] num_frames: u64,
    ) {
        let w = Waveform::from_frames_of_silence(frame_rate_hz, num_channels, num_frames);
        assert_eq!(
            w.to_interleaved_samples().len() as u64,
            w.num_frames() * w.num_channels() as u64
        );
    }
}
