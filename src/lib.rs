//! Decodes audio files and in-memory byte buffers into normalized
//! interleaved `f32` waveforms, with channel selection, time slicing,
//! zero-padding, sample-rate conversion, and a parallel batch facade.
//!
//! The entry points are [`Waveform`]'s constructors (`from_file`,
//! `from_encoded_bytes`, and the in-memory builders) and the batch functions
//! in [`batch`].

mod args;
mod batch;
mod decode;
mod error;
mod math;
mod resample;
mod waveform;

pub use args::{BatchArgs, BatchArgsBuilder, DecodeArgs, DecodeArgsBuilder, DecodingBackend};
pub use batch::{
    waveforms_from_files, waveforms_from_files_into_numpys,
    waveforms_from_files_into_numpys_unwrapped, waveforms_from_files_to_numpy, NamedResult,
};
pub use error::DecodeError;
pub use resample::{ResampleMode, SincQuality, SincWindow};
pub use waveform::Waveform;
