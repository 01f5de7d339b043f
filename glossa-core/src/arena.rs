//! String Arena
//!
//! Every catalog file is decoded into one contiguous buffer. The buffer is
//! frozen and handed to the owning catalog's arena, which keeps it alive
//! for the catalog's lifetime. Index entries are [`Bytes`] views into those
//! buffers, so no string is ever copied or freed on its own.
//!
//! The arena only grows.

use bytes::Bytes;

/// Append-only collection of frozen string buffers.
#[derive(Debug, Default)]
pub struct Arena {
    chunks: Vec<Bytes>,
    total: usize,
}

impl Arena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a decoded buffer.
    pub fn adopt(&mut self, buffer: Bytes) {
        self.total += buffer.len();
        self.chunks.push(buffer);
    }

    #[cfg(test)]
    fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total bytes held across all buffers.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Whether nothing has been adopted yet.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    #[cfg(test)]
    fn contains(&self, view: &[u8]) -> bool {
        let start = view.as_ptr() as usize;
        let end = start + view.len();
        self.chunks.iter().any(|chunk| {
            let lo = chunk.as_ptr() as usize;
            let hi = lo + chunk.len();
            start >= lo && end <= hi
        })
    }
}

/// Builder for the single contiguous buffer of one catalog file.
///
/// Each pushed string is followed by a synthesized NUL; NULs inside a
/// string are kept, since they separate plural variants.
#[derive(Debug, Default)]
pub(crate) struct BufferBuilder {
    buf: Vec<u8>,
}

/// Location of a string inside a [`BufferBuilder`], excluding its NUL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub offset: usize,
    pub len: usize,
}

impl BufferBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, bytes: &[u8]) -> Span {
        let offset = self.buf.len();
        self.buf.extend_from_slice(bytes);
        self.buf.push(0);
        Span {
            offset,
            len: bytes.len(),
        }
    }

    pub fn freeze(self) -> Bytes {
        Bytes::from(self.buf)
    }
}

impl Span {
    pub fn view(&self, buffer: &Bytes) -> Bytes {
        buffer.slice(self.offset..self.offset + self.len)
    }
}
