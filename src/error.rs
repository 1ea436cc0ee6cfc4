//! The error taxonomy returned by every fallible entry point in this crate.

/// Everything that can go wrong while turning encoded audio into a [`Waveform`](crate::Waveform).
///
/// Each variant is a distinct, testable failure mode. Batch operations attach
/// one of these to the [`NamedResult`](crate::batch::NamedResult) for the input that failed
/// rather than aborting the rest of the batch.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The path does not exist or could not be opened for reading.
    #[error("file not found or unreadable: {path}")]
    FileNotFound {
        /// The path that could not be opened.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The format probe found no registered demuxer/codec pair for the input bytes.
    #[error("no registered decoder recognizes this input")]
    UnknownInputEncoding,

    /// `start_time_milliseconds >= end_time_milliseconds` with a nonzero end.
    #[error(
        "start_time_milliseconds ({start}) must be less than end_time_milliseconds ({end})"
    )]
    WrongTimeOffset {
        /// The requested start offset, in milliseconds.
        start: u64,
        /// The requested end offset, in milliseconds.
        end: u64,
    },

    /// `zero_pad_ending` was set without a bounded `end_time_milliseconds`.
    #[error("cannot zero-pad without a specified end_time_milliseconds")]
    CannotZeroPadWithoutSpecifiedLength,

    /// The requested channel count exceeds the number of channels in the source.
    #[error("requested {requested} channels but the source only has {available}")]
    WrongNumChannels {
        /// Channels requested by `DecodeArgs::num_channels`.
        requested: u16,
        /// Channels actually present in the decoded source.
        available: u16,
    },

    /// `num_channels == 1` together with `convert_to_mono == true`.
    #[error("convert_to_mono has no effect when num_channels is already 1")]
    WrongNumChannelsAndMono,

    /// The requested target frame rate is zero, or the resampler cannot support the ratio.
    #[error("frame_rate_hz {target} is not a supported resampling target from {source} Hz")]
    WrongFrameRateRatio {
        /// The source frame rate, in Hz.
        source: u32,
        /// The requested target frame rate, in Hz.
        target: u32,
    },

    /// The codec reported a decode failure on data whose format was recognized.
    #[error("decoding failed: {0}")]
    DecodingError(String),
}
