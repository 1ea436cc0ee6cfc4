//! Parameter records that drive the decoder pipeline and the batch executor.

use crate::resample::ResampleMode;

/// Which decoder implementation family to probe with.
///
/// `Auto` lets the format probe pick an entry from the registry; the other
/// tags pin a specific family, mirroring the "plugin-like decoder family"
/// design note: implement as a registry keyed by a tag, with "auto" letting
/// the probe phase choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DecodingBackend {
    /// Let the format probe pick a registered decoder based on content.
    #[default]
    Auto,
    /// Force the Symphonia-backed decoder family.
    Symphonia,
}

/// Parameters controlling a single decode of one input.
///
/// Defaults match an unmodified decode: keep the source channel count and
/// frame rate, decode the whole stream, no mono mixdown, no padding.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeArgs {
    pub(crate) start_time_milliseconds: u64,
    pub(crate) end_time_milliseconds: u64,
    pub(crate) frame_rate_hz: u32,
    pub(crate) num_channels: u16,
    pub(crate) convert_to_mono: bool,
    pub(crate) zero_pad_ending: bool,
    pub(crate) resample_mode: ResampleMode,
    pub(crate) decoding_backend: DecodingBackend,
}

impl Default for DecodeArgs {
    fn default() -> Self {
        Self {
            start_time_milliseconds: 0,
            end_time_milliseconds: 0,
            frame_rate_hz: 0,
            num_channels: 0,
            convert_to_mono: false,
            zero_pad_ending: false,
            resample_mode: ResampleMode::default(),
            decoding_backend: DecodingBackend::default(),
        }
    }
}

impl DecodeArgs {
    /// Starts a fluent builder with all fields at their defaults.
    pub fn builder() -> DecodeArgsBuilder {
        DecodeArgsBuilder::default()
    }
}

/// Builder for [`DecodeArgs`].
///
/// Performs no I/O and no validation; option validation happens once a
/// decode actually begins, so that the validation order specified by the
/// pipeline (time offset, then zero-pad, then mono, then frame-rate ratio,
/// then post-probe channel count) is the single source of truth.
#[derive(Debug, Clone, Default)]
pub struct DecodeArgsBuilder {
    args: DecodeArgs,
}

impl DecodeArgsBuilder {
    /// Sets the left-trim point, in milliseconds.
    pub fn with_start_time_milliseconds(mut self, value: u64) -> Self {
        self.args.start_time_milliseconds = value;
        self
    }

    /// Sets the right-trim point, in milliseconds. `0` means "to the end".
    pub fn with_end_time_milliseconds(mut self, value: u64) -> Self {
        self.args.end_time_milliseconds = value;
        self
    }

    /// Sets the target frame rate, in Hz. `0` keeps the source rate.
    pub fn with_frame_rate_hz(mut self, value: u32) -> Self {
        self.args.frame_rate_hz = value;
        self
    }

    /// Sets how many leading channels to keep. `0` keeps all of them.
    pub fn with_num_channels(mut self, value: u16) -> Self {
        self.args.num_channels = value;
        self
    }

    /// Averages the retained channels down to one after channel selection.
    pub fn with_convert_to_mono(mut self, value: bool) -> Self {
        self.args.convert_to_mono = value;
        self
    }

    /// Pads the decoded span with silence so it reaches the requested window length.
    pub fn with_zero_pad_ending(mut self, value: bool) -> Self {
        self.args.zero_pad_ending = value;
        self
    }

    /// Selects the resampling algorithm used when `frame_rate_hz` differs from the source.
    pub fn with_resample_mode(mut self, value: ResampleMode) -> Self {
        self.args.resample_mode = value;
        self
    }

    /// Selects the decoder implementation family.
    pub fn with_decoding_backend(mut self, value: DecodingBackend) -> Self {
        self.args.decoding_backend = value;
        self
    }

    /// Finishes the builder, producing a [`DecodeArgs`].
    pub fn build(self) -> DecodeArgs {
        self.args
    }
}

/// Parameters for a batch decode: a [`DecodeArgs`] shared across every input,
/// plus a worker-count knob.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchArgs {
    pub(crate) decode_args: DecodeArgs,
    pub(crate) num_workers: u32,
}

impl Default for BatchArgs {
    fn default() -> Self {
        Self {
            decode_args: DecodeArgs::default(),
            num_workers: 0,
        }
    }
}

impl BatchArgs {
    /// Starts a fluent builder with all fields at their defaults.
    pub fn builder() -> BatchArgsBuilder {
        BatchArgsBuilder::default()
    }
}

/// Builder for [`BatchArgs`].
#[derive(Debug, Clone, Default)]
pub struct BatchArgsBuilder {
    args: BatchArgs,
}

impl BatchArgsBuilder {
    /// Sets the [`DecodeArgs`] applied to every input in the batch.
    pub fn with_decode_args(mut self, value: DecodeArgs) -> Self {
        self.args.decode_args = value;
        self
    }

    /// Sets the worker thread count. `0` auto-detects; `1` forces sequential
    /// execution on the calling thread.
    pub fn with_num_workers(mut self, value: u32) -> Self {
        self.args.num_workers = value;
        self
    }

    /// Finishes the builder, producing [`BatchArgs`].
    pub fn build(self) -> BatchArgs {
        self.args
    }
}
