//! Test support: an in-memory `.mo` writer.
//!
//! Only compiled for tests and with the `test-util` feature. It writes the
//! layout `msgfmt` produces (seven-word header, sorted descriptor tables,
//! NUL-terminated strings, empty hash table) in either byte order.

use std::io;
use std::path::Path;

/// Builder for compiled catalog bytes.
#[derive(Debug, Clone, Default)]
pub struct MoBuilder {
    messages: Vec<(Vec<u8>, Vec<u8>)>,
    big_endian: bool,
    revision: u32,
}

impl MoBuilder {
    /// Empty little-endian catalog, revision 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the metadata entry (the translation of the empty source).
    pub fn header(mut self, text: &str) -> Self {
        self.messages.retain(|(source, _)| !source.is_empty());
        self.messages.push((Vec::new(), text.as_bytes().to_vec()));
        self
    }

    /// Shorthand for a header carrying only `Plural-Forms`.
    pub fn plural_forms(self, value: &str) -> Self {
        self.header(&format!(
            "Content-Type: text/plain; charset=UTF-8\nPlural-Forms: {}\n",
            value
        ))
    }

    /// Add a singular message.
    pub fn message(mut self, source: &str, translated: &str) -> Self {
        self.messages
            .push((source.as_bytes().to_vec(), translated.as_bytes().to_vec()));
        self
    }

    /// Add a plural message: the source is `singular NUL plural`, the
    /// translation is the forms joined by NUL.
    pub fn plural(mut self, singular: &str, plural: &str, forms: &[&str]) -> Self {
        let source = [singular.as_bytes(), plural.as_bytes()].join(&0u8);
        let translated = forms
            .iter()
            .map(|form| form.as_bytes())
            .collect::<Vec<_>>()
            .join(&0u8);
        self.messages.push((source, translated));
        self
    }

    /// Add raw bytes.
    pub fn raw(mut self, source: &[u8], translated: &[u8]) -> Self {
        self.messages.push((source.to_vec(), translated.to_vec()));
        self
    }

    /// Write big-endian words.
    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    /// Set the revision word.
    pub fn revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    /// Produce the file bytes.
    pub fn build(&self) -> Vec<u8> {
        let mut messages = self.messages.clone();
        messages.sort_by(|a, b| a.0.cmp(&b.0));

        let count = messages.len();
        let header_len = 28;
        let source_table = header_len;
        let translated_table = source_table + count * 8;
        let mut string_offset = translated_table + count * 8;

        let mut words = vec![
            0x950412de,
            self.revision,
            count as u32,
            source_table as u32,
            translated_table as u32,
            0,
            string_offset as u32,
        ];

        let mut strings = Vec::new();
        let mut translated_words = Vec::new();
        for (source, _) in &messages {
            words.extend([source.len() as u32, string_offset as u32]);
            strings.extend_from_slice(source);
            strings.push(0);
            string_offset += source.len() + 1;
        }
        for (_, translated) in &messages {
            translated_words.extend([translated.len() as u32, string_offset as u32]);
            strings.extend_from_slice(translated);
            strings.push(0);
            string_offset += translated.len() + 1;
        }
        words.extend(translated_words);

        let mut out = Vec::with_capacity(words.len() * 4 + strings.len());
        for word in words {
            if self.big_endian {
                out.extend_from_slice(&word.to_be_bytes());
            } else {
                out.extend_from_slice(&word.to_le_bytes());
            }
        }
        out.extend(strings);
        out
    }

    /// Write the file, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.build())
    }
}
