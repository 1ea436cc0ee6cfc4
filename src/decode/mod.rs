//! The decode pipeline: `SourceReader -> FormatProbe + PacketDecoder ->
//! SampleNormalizer -> ChannelShaper -> TimeSlicer -> Resampler -> WaveformBuilder`.
//!
//! Each stage is a plain buffer transform rather than a pull iterator: every
//! stage fully consumes the previous stage's output before producing its own.

mod channels;
mod probe;
mod source_reader;
mod time_slice;
mod validate;

use std::io::{Read, Seek};

use crate::args::DecodeArgs;
use crate::error::DecodeError;
use crate::resample;
use crate::waveform::Waveform;

use source_reader::SourceReader;

/// Runs the full pipeline over any seekable byte source, producing a [`Waveform`].
pub(crate) fn run_pipeline<R>(
    reader: R,
    byte_len: Option<u64>,
    args: DecodeArgs,
) -> Result<Waveform, DecodeError>
where
    R: Read + Seek + Send + Sync + 'static,
{
    validate::validate_pre_probe(&args)?;

    let media_source = Box::new(SourceReader::new(reader, byte_len.unwrap_or(0)));
    let probed = probe::probe(media_source, args.decoding_backend)?;

    validate::validate_post_probe(&args, probed.frame_rate_hz(), probed.num_channels())?;

    let decoded = probe::decode_all(probed)?;

    let (shaped, shaped_channels) = channels::shape(
        &decoded.samples,
        decoded.num_channels,
        args.num_channels,
        args.convert_to_mono,
    );

    let sliced = time_slice::slice(
        &shaped,
        shaped_channels,
        decoded.frame_rate_hz,
        args.start_time_milliseconds,
        args.end_time_milliseconds,
        args.zero_pad_ending,
    );

    let (final_samples, final_rate) = if args.frame_rate_hz != 0 && args.frame_rate_hz != decoded.frame_rate_hz {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            source_hz = decoded.frame_rate_hz,
            target_hz = args.frame_rate_hz,
            mode = ?args.resample_mode,
            "resampling decoded audio"
        );
        let resampled = resample::resample_interleaved(
            &sliced,
            shaped_channels,
            decoded.frame_rate_hz,
            args.frame_rate_hz,
            args.resample_mode,
        )?;
        (resampled, args.frame_rate_hz)
    } else {
        (sliced, decoded.frame_rate_hz)
    };

    Ok(Waveform::from_parts(final_rate, shaped_channels, final_samples))
}
