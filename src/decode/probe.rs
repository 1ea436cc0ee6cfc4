//! Format probing and full-buffer packet decoding.
//!
//! Split into two phases so option validation that depends on the source's
//! rate/channel count (spec.md §4.2 step 3) can run immediately after
//! probing and before the possibly-expensive packet-decode loop: [`probe`]
//! identifies the container/codec and the source's `frame_rate_hz`/
//! `num_channels`, and [`decode_all`] consumes the rest of the stream.

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CodecParameters, Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Packet};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

use crate::args::DecodingBackend;
use crate::error::DecodeError;

/// The result of decoding an entire encoded stream: every frame, normalized
/// to interleaved `f32` in `[-1, 1]`, plus the source's own rate and channel count.
pub(crate) struct DecodedAudio {
    pub(crate) samples: Vec<f32>,
    pub(crate) frame_rate_hz: u32,
    pub(crate) num_channels: u16,
}

/// A probed container with its rate/channel count already known, ready for
/// `decode_all` to pull the rest of the packets.
pub(crate) struct ProbedTrack {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    frame_rate_hz: u32,
    num_channels: u16,
    /// Samples already decoded while discovering `frame_rate_hz`/`num_channels`
    /// on a codec whose `CodecParameters` doesn't carry them up front (see
    /// `spec_from_codec_params`); `decode_all` prepends these rather than
    /// re-decoding the packet they came from.
    leading_samples: Vec<f32>,
}

impl ProbedTrack {
    /// The source's frame rate, known without decoding a full packet stream.
    pub(crate) fn frame_rate_hz(&self) -> u32 {
        self.frame_rate_hz
    }

    /// The source's channel count, known without decoding a full packet stream.
    pub(crate) fn num_channels(&self) -> u16 {
        self.num_channels
    }
}

/// Probes the container/codec and selects the first track with a real
/// codec, resolving its `frame_rate_hz`/`num_channels` without decoding the
/// whole stream so that post-probe option validation (spec.md §4.2 step 3)
/// stays cheap even on large files.
///
/// `backend` selects the decoder family from the registry; today the
/// registry has exactly one entry (Symphonia), so `Auto` and `Symphonia`
/// behave identically. A future registered backend would branch here
/// instead of inside the pipeline.
pub(crate) fn probe(
    media_source: Box<dyn symphonia::core::io::MediaSource>,
    backend: DecodingBackend,
) -> Result<ProbedTrack, DecodeError> {
    match backend {
        DecodingBackend::Auto | DecodingBackend::Symphonia => {}
    }
    let mss = MediaSourceStream::new(media_source, MediaSourceStreamOptions::default());

    let probed = get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| match e {
            SymphoniaError::Unsupported(_) => DecodeError::UnknownInputEncoding,
            other => DecodeError::DecodingError(other.to_string()),
        })?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::UnknownInputEncoding)?;
    let track_id = track.id;
    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::DecodingError(e.to_string()))?;

    let (frame_rate_hz, num_channels, leading_samples) =
        match spec_from_codec_params(&track.codec_params) {
            Some((rate, channels)) => (rate, channels, Vec::new()),
            None => decode_until_spec_known(&mut *format, &mut *decoder, track_id)?,
        };

    Ok(ProbedTrack {
        format,
        decoder,
        track_id,
        frame_rate_hz,
        num_channels,
        leading_samples,
    })
}

/// Reads `sample_rate`/`channels` straight from the probed `CodecParameters`,
/// as WAV, FLAC, and MP3 all populate them before any packet is decoded.
fn spec_from_codec_params(params: &CodecParameters) -> Option<(u32, u16)> {
    let rate = params.sample_rate?;
    let channels = params.channels?;
    Some((rate, channels.count() as u16))
}

/// Falls back to decoding packets, as the teacher's own
/// `decoder/symphonia.rs` init path does, until the first non-empty decode
/// reveals the stream's rate/channel count. Returns those samples so
/// `decode_all` doesn't discard and re-decode the packet they came from.
fn decode_until_spec_known(
    format: &mut dyn FormatReader,
    decoder: &mut dyn Decoder,
    track_id: u32,
) -> Result<(u32, u16, Vec<f32>), DecodeError> {
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    loop {
        let Some(packet) = next_track_packet(format, track_id)? else {
            return Err(DecodeError::UnknownInputEncoding);
        };

        match decoder.decode(&packet) {
            Ok(decoded) => {
                if decoded.frames() == 0 {
                    continue;
                }
                let spec = *decoded.spec();
                let buf =
                    sample_buf.get_or_insert_with(|| SampleBuffer::new(decoded.capacity() as u64, spec));
                buf.copy_interleaved_ref(decoded);
                return Ok((spec.rate, spec.channels.count() as u16, buf.samples().to_vec()));
            }
            Err(SymphoniaError::DecodeError(_)) | Err(SymphoniaError::IoError(_)) => continue,
            Err(SymphoniaError::ResetRequired) => {
                return Err(DecodeError::DecodingError(
                    "mid-stream codec reset is not supported".to_string(),
                ))
            }
            Err(e) => return Err(DecodeError::DecodingError(e.to_string())),
        }
    }
}

/// Pulls the next packet belonging to `track_id`, returning `Ok(None)` at a
/// clean end of stream rather than an error.
fn next_track_packet(
    format: &mut dyn FormatReader,
    track_id: u32,
) -> Result<Option<Packet>, DecodeError> {
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::ResetRequired) => {
                return Err(DecodeError::DecodingError(
                    "mid-stream codec reset is not supported".to_string(),
                ))
            }
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Ok(None)
            }
            Err(e) => return Err(DecodeError::DecodingError(e.to_string())),
        };
        if packet.track_id() == track_id {
            return Ok(Some(packet));
        }
    }
}

/// Consumes the rest of the packets on `probed`'s track, decoding each to a
/// span of PCM samples and appending it to the interleaved `f32` buffer.
pub(crate) fn decode_all(mut probed: ProbedTrack) -> Result<DecodedAudio, DecodeError> {
    let mut samples = probed.leading_samples;
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    while let Some(packet) = next_track_packet(&mut *probed.format, probed.track_id)? {
        match probed.decoder.decode(&packet) {
            Ok(decoded) => {
                if decoded.frames() == 0 {
                    continue;
                }
                let spec = *decoded.spec();
                let buf = sample_buf.get_or_insert_with(|| {
                    SampleBuffer::new(decoded.capacity() as u64, spec)
                });
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            Err(e @ SymphoniaError::DecodeError(_)) | Err(e @ SymphoniaError::IoError(_)) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %e, "skipping undecodable packet");
                continue;
            }
            Err(SymphoniaError::ResetRequired) => {
                return Err(DecodeError::DecodingError(
                    "mid-stream codec reset is not supported".to_string(),
                ))
            }
            Err(e) => return Err(DecodeError::DecodingError(e.to_string())),
        }
    }

    Ok(DecodedAudio {
        samples,
        frame_rate_hz: probed.frame_rate_hz,
        num_channels: probed.num_channels,
    })
}
