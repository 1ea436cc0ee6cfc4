//! Option validation, split into what can be checked before probing the
//! source and what needs the source's own rate/channel count.

use crate::args::DecodeArgs;
use crate::error::DecodeError;
use crate::resample;

/// Checks that only depend on the requested options, run before any decoding work.
pub(crate) fn validate_pre_probe(args: &DecodeArgs) -> Result<(), DecodeError> {
    if args.end_time_milliseconds != 0 && args.start_time_milliseconds >= args.end_time_milliseconds {
        return Err(DecodeError::WrongTimeOffset {
            start: args.start_time_milliseconds,
            end: args.end_time_milliseconds,
        });
    }
    if args.end_time_milliseconds == 0 && args.zero_pad_ending {
        return Err(DecodeError::CannotZeroPadWithoutSpecifiedLength);
    }
    if args.num_channels == 1 && args.convert_to_mono {
        return Err(DecodeError::WrongNumChannelsAndMono);
    }
    Ok(())
}

/// Checks that need the decoded source's own rate and channel count.
pub(crate) fn validate_post_probe(
    args: &DecodeArgs,
    src_hz: u32,
    src_channels: u16,
) -> Result<(), DecodeError> {
    if args.frame_rate_hz != 0 {
        resample::validate_frame_rate_ratio(src_hz, args.frame_rate_hz)?;
    }
    if args.num_channels != 0 && args.num_channels > src_channels {
        return Err(DecodeError::WrongNumChannels {
            requested: args.num_channels,
            available: src_channels,
        });
    }
    Ok(())
}
