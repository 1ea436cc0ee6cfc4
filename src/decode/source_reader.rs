//! Adapts a `Read + Seek` source to Symphonia's `MediaSource` trait.

use std::io::{Read, Seek, SeekFrom};

use symphonia::core::io::MediaSource;

/// Wraps any `Read + Seek` type so Symphonia can probe and demux it.
///
/// Both sources this crate hands to the probe (an open `File` and an
/// in-memory `Cursor<Vec<u8>>`) are always seekable, so unlike the streaming
/// decoder this wraps, there is no non-seekable mode to support.
pub(crate) struct SourceReader<T: Read + Seek + Send + Sync> {
    inner: T,
    byte_len: u64,
}

impl<T: Read + Seek + Send + Sync> SourceReader<T> {
    pub(crate) fn new(inner: T, byte_len: u64) -> Self {
        Self { inner, byte_len }
    }
}

impl<T: Read + Seek + Send + Sync> MediaSource for SourceReader<T> {
    fn is_seekable(&self) -> bool {
        true
    }

    fn byte_len(&self) -> Option<u64> {
        Some(self.byte_len)
    }
}

impl<T: Read + Seek + Send + Sync> Read for SourceReader<T> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<T: Read + Seek + Send + Sync> Seek for SourceReader<T> {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.inner.seek(pos)
    }
}
