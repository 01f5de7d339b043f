//! Compiled Catalog Decoder
//!
//! Decodes gettext `.mo` files. The layout is a header of 32-bit words in
//! the file's byte order followed by two descriptor tables:
//!
//! | Field | Size | Notes |
//! |---|---|---|
//! | magic | 4 | `0x950412de` read little-endian, `0xde120495` big-endian |
//! | revision | 4 | major revision (high 16 bits) must be 0 or 1 |
//! | string count N | 4 | |
//! | source table offset | 4 | N `(length, offset)` pairs |
//! | translated table offset | 4 | N `(length, offset)` pairs |
//!
//! Strings are not NUL-terminated on disk. A translated string may hold
//! several NUL-separated plural variants; the entry with an empty source is
//! the catalog metadata (`Key: Value` lines).
//!
//! Decoding is all-or-nothing: a file either yields a complete [`MoFile`]
//! or an error, so a bad file can never leave half its strings merged.

use crate::arena::BufferBuilder;
use crate::catalog::Entry;
use crate::plural::PluralRule;
use crate::{IntlError, Result};
use bytes::Bytes;
use glossa_log::{debug, targets, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Magic number as read from a little-endian file.
pub const MAGIC: u32 = 0x950412de;

/// Magic number as read with the wrong byte order.
pub const MAGIC_SWAPPED: u32 = 0xde120495;

/// Upper bound on decoded string bytes for one file.
///
/// Descriptors may legally point at overlapping ranges, so the decoded size
/// is not bounded by the file size.
pub const MAX_DECODED_BYTES: usize = 256 * 1024 * 1024;

const HEADER_LEN: usize = 20;

/// Byte order of a catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

struct Reader<'a> {
    data: &'a [u8],
    order: ByteOrder,
}

impl Reader<'_> {
    fn u32_at(&self, offset: usize) -> Result<u32> {
        let bytes: [u8; 4] = offset
            .checked_add(4)
            .and_then(|end| self.data.get(offset..end))
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| IntlError::malformed(format!("truncated at offset {}", offset)))?;

        Ok(match self.order {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        })
    }

    fn table(&self, offset: u32, count: usize, name: &str) -> Result<Vec<(usize, usize)>> {
        let offset = offset as usize;
        let end = count
            .checked_mul(8)
            .and_then(|size| size.checked_add(offset))
            .ok_or_else(|| IntlError::malformed(format!("{} table overflows", name)))?;
        if end > self.data.len() {
            return Err(IntlError::malformed(format!(
                "{} table extends past end of file",
                name
            )));
        }

        (0..count)
            .map(|i| {
                let at = offset + i * 8;
                let len = self.u32_at(at)? as usize;
                let off = self.u32_at(at + 4)? as usize;
                match off.checked_add(len) {
                    Some(str_end) if str_end <= self.data.len() => Ok((off, len)),
                    _ => Err(IntlError::malformed(format!(
                        "{} string {} lies outside the file",
                        name, i
                    ))),
                }
            })
            .collect()
    }
}

/// A decoded catalog file.
#[derive(Debug, Clone)]
pub struct MoFile {
    byte_order: ByteOrder,
    revision: u32,
    string_count: usize,
    buffer: Bytes,
    entries: Vec<Entry>,
    headers: Vec<(String, String)>,
}

impl MoFile {
    /// Read and decode a catalog file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => IntlError::FileNotFound(path.to_path_buf()),
            _ => IntlError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        debug!(target: targets::DECODER, "read {} bytes from {}", data.len(), path.display());
        Self::parse(&data).inspect_err(|e| {
            warn!(target: targets::DECODER, "rejecting {}: {}", path.display(), e);
        })
    }

    /// Decode catalog bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = Reader {
            data,
            order: ByteOrder::Little,
        };

        if data.len() < HEADER_LEN {
            return Err(IntlError::malformed("file shorter than header"));
        }

        reader.order = match reader.u32_at(0)? {
            MAGIC => ByteOrder::Little,
            MAGIC_SWAPPED => ByteOrder::Big,
            other => return Err(IntlError::malformed(format!("bad magic 0x{:08x}", other))),
        };

        let revision = reader.u32_at(4)?;
        if revision >> 16 > 1 {
            return Err(IntlError::malformed(format!(
                "unsupported major revision {}",
                revision >> 16
            )));
        }

        let count = reader.u32_at(8)? as usize;
        let sources = reader.table(reader.u32_at(12)?, count, "source")?;
        let translations = reader.table(reader.u32_at(16)?, count, "translated")?;

        let mut total = 0usize;
        for &(_, len) in sources.iter().chain(&translations) {
            total = total
                .checked_add(len + 1)
                .filter(|&t| t <= MAX_DECODED_BYTES)
                .ok_or_else(|| IntlError::malformed("decoded strings exceed size limit"))?;
        }

        let mut builder = BufferBuilder::with_capacity(total);
        let source_spans: Vec<_> = sources
            .iter()
            .map(|&(off, len)| builder.push(&data[off..off + len]))
            .collect();
        let translated_spans: Vec<_> = translations
            .iter()
            .map(|&(off, len)| builder.push(&data[off..off + len]))
            .collect();
        let buffer = builder.freeze();

        let mut entries = Vec::with_capacity(count);
        let mut metadata = None;

        for (source, translated) in source_spans.iter().zip(&translated_spans) {
            if source.len == 0 {
                metadata = Some(translated.view(&buffer));
                continue;
            }
            if translated.len == 0 {
                continue;
            }
            entries.push(Entry::new(source.view(&buffer), translated.view(&buffer)));
        }

        let headers = metadata
            .map(|text| parse_headers(&String::from_utf8_lossy(&text)))
            .unwrap_or_default();

        let file = Self {
            byte_order: reader.order,
            revision,
            string_count: count,
            buffer,
            entries,
            headers,
        };

        if let Some(charset) = file.charset() {
            if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("utf8") {
                warn!(
                    target: targets::DECODER,
                    "catalog declares charset {}; strings are used as UTF-8", charset
                );
            }
        }

        Ok(file)
    }

    /// Byte order of the file.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Format revision word.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Number of descriptors in the file, metadata included.
    pub fn string_count(&self) -> usize {
        self.string_count
    }

    /// Message entries (metadata and untranslated entries excluded).
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The contiguous buffer all entries point into.
    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    /// Split into the buffer and its entries.
    pub fn into_parts(self) -> (Bytes, Vec<Entry>) {
        (self.buffer, self.entries)
    }

    /// Metadata fields in file order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Value of a metadata field. Names compare case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Charset declared in `Content-Type`, if any.
    pub fn charset(&self) -> Option<&str> {
        let content_type = self.header("Content-Type")?;
        content_type.split(';').find_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim())
        })
    }

    /// The plural rule declared in `Plural-Forms`.
    ///
    /// `None` when the header is absent; an error when it is present but
    /// unusable.
    pub fn plural_rule(&self) -> Option<Result<PluralRule>> {
        self.header("Plural-Forms").map(PluralRule::parse)
    }
}

/// Split metadata into trimmed `Key: Value` pairs, skipping other lines.
fn parse_headers(text: &str) -> Vec<(String, String)> {
    text.split('\n')
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
