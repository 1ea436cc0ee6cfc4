//! Parallel application of the decode pipeline across many inputs.
//!
//! Work items are pulled from a shared queue by a bounded pool of worker
//! threads; each result is written into a pre-allocated slot keyed by the
//! input's original position, so output order never depends on which worker
//! finished first.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::thread;

use crate::args::BatchArgs;
use crate::error::DecodeError;
use crate::waveform::Waveform;

/// Pairs an input's identifier (here, the filename it was decoded from) with
/// its outcome, so a failure at one position never loses track of which
/// input produced it.
#[derive(Debug, Clone)]
pub struct NamedResult<T> {
    pub identifier: String,
    pub result: Result<T, DecodeError>,
}

impl<T> NamedResult<T> {
    /// The error, if this position failed.
    pub fn exception(&self) -> Option<&DecodeError> {
        self.result.as_ref().err()
    }

    /// The decoded value, if this position succeeded.
    pub fn waveform(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }
}

fn worker_count(requested: u32, num_items: usize) -> usize {
    if requested == 0 {
        thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
            .min(num_items.max(1))
    } else {
        requested as usize
    }
}

/// Decodes every file in `filenames`, preserving input order in the output
/// and attaching one [`DecodeError`] per failing position rather than
/// aborting the rest of the batch.
pub fn waveforms_from_files(
    filenames: &[String],
    args: BatchArgs,
) -> Vec<NamedResult<Waveform>> {
    if args.num_workers == 1 {
        return filenames
            .iter()
            .map(|name| NamedResult {
                identifier: name.clone(),
                result: Waveform::from_file(name, args.decode_args.clone()),
            })
            .collect();
    }

    let num_workers = worker_count(args.num_workers, filenames.len());
    let queue: Arc<Mutex<std::collections::VecDeque<(usize, String)>>> = Arc::new(Mutex::new(
        filenames.iter().cloned().enumerate().collect(),
    ));

    let mut slots: Vec<Option<NamedResult<Waveform>>> = (0..filenames.len()).map(|_| None).collect();
    let (tx, rx) = std::sync::mpsc::channel();

    let mut handles = Vec::with_capacity(num_workers);
    for _ in 0..num_workers {
        let queue = Arc::clone(&queue);
        let tx = tx.clone();
        let decode_args = args.decode_args.clone();
        handles.push(thread::spawn(move || loop {
            let item = queue.lock().expect("batch queue mutex poisoned").pop_front();
            let Some((index, filename)) = item else {
                break;
            };
            let result = Waveform::from_file(&filename, decode_args.clone());
            #[cfg(feature = "tracing")]
            if let Err(err) = &result {
                tracing::warn!(filename = %filename, error = %err, "decode failed in batch");
            }
            let named = NamedResult {
                identifier: filename,
                result,
            };
            if tx.send((index, named)).is_err() {
                break;
            }
        }));
    }
    drop(tx);

    for (index, named) in rx {
        slots[index] = Some(named);
    }
    for handle in handles {
        let _ = handle.join();
    }

    slots.into_iter().map(|slot| slot.expect("every queued index is filled exactly once")).collect()
}

/// Same as [`waveforms_from_files`] but exports each success as a
/// `(num_frames, num_channels)` row-major array instead of a [`Waveform`].
pub fn waveforms_from_files_into_numpys(
    filenames: &[String],
    args: BatchArgs,
) -> Vec<NamedResult<Vec<Vec<f32>>>> {
    waveforms_from_files(filenames, args)
        .into_iter()
        .map(|named| NamedResult {
            identifier: named.identifier,
            result: named.result.map(|w| w.to_2d_array()),
        })
        .collect()
}

/// Like [`waveforms_from_files_into_numpys`], but aborts and returns the
/// first error encountered rather than collecting per-position results.
pub fn waveforms_from_files_to_numpy(
    filenames: &[String],
    args: BatchArgs,
) -> Result<Vec<Vec<Vec<f32>>>, DecodeError> {
    waveforms_from_files_into_numpys_unwrapped(filenames, args)
}

/// Fast path with no per-item error wrapping: aborts on first error.
pub fn waveforms_from_files_into_numpys_unwrapped(
    filenames: &[String],
    args: BatchArgs,
) -> Result<Vec<Vec<Vec<f32>>>, DecodeError> {
    waveforms_from_files_into_numpys(filenames, args)
        .into_iter()
        .map(|named| named.result)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::DecodeArgs;

    #[test]
    fn order_is_preserved_and_failures_are_isolated() {
        let filenames = vec![
            "/nonexistent/one.flac".to_string(),
            "/nonexistent/two.flac".to_string(),
        ];
        let args = BatchArgs::builder()
            .with_decode_args(DecodeArgs::default())
            .with_num_workers(2)
            .build();
        let results = waveforms_from_files(&filenames, args);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].identifier, "/nonexistent/one.flac");
        assert_eq!(results[1].identifier, "/nonexistent/two.flac");
        assert!(matches!(
            results[0].exception(),
            Some(DecodeError::FileNotFound { .. })
        ));
        assert!(matches!(
            results[1].exception(),
            Some(DecodeError::FileNotFound { .. })
        ));
    }

    #[test]
    fn sequential_mode_matches_parallel_mode_shape() {
        let filenames = vec!["/nonexistent/a.flac".to_string()];
        let args = BatchArgs::builder().with_num_workers(1).build();
        let results = waveforms_from_files(&filenames, args);
        assert_eq!(results.len(), 1);
        assert!(results[0].exception().is_some());
    }

    #[test]
    fn empty_batch_returns_empty_output() {
        let args = BatchArgs::builder().with_num_workers(0).build();
        let results = waveforms_from_files(&[], args);
        assert!(results.is_empty());
    }

    #[test]
    fn unwrapped_aborts_on_first_error() {
        let filenames = vec!["/nonexistent/a.flac".to_string()];
        let args = BatchArgs::builder().with_num_workers(1).build();
        let err = waveforms_from_files_into_numpys_unwrapped(&filenames, args).unwrap_err();
        assert!(matches!(err, DecodeError::FileNotFound { .. }));
    }
}
