//! Host documents and position conversion
//!
//! Analysis works in byte offsets of the host text; the protocol speaks
//! zero-based lines and UTF-16 columns. [`HostDocument`] converts between
//! the two and keeps the text current as edits arrive.

use std::ops::Range;
use std::str::FromStr;

use lsp_types::{Position, TextDocumentContentChangeEvent, Uri};
use ropey::Rope;
use tracing::{debug, warn};
use url::Url;

use crate::error::DocumentError;

#[derive(Debug, Clone)]
pub struct HostDocument {
    url: Url,
    version: i32,
    text: Rope,
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

impl HostDocument {
    pub fn new(url: Url, version: i32, text: &str) -> Self {
        Self { url, version, text: Rope::from_str(text) }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The document identifier in protocol form.
    pub fn uri(&self) -> Option<Uri> {
        Uri::from_str(self.url.as_str()).ok()
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn rope(&self) -> &Rope {
        &self.text
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.text.len_bytes() == 0
    }

    /// UTF-16 length of a line without its line break.
    pub fn line_len_utf16(&self, line: usize) -> Option<usize> {
        if line >= self.text.len_lines() {
            return None;
        }
        let slice = self.text.line(line);
        let mut tail = slice.chars_at(slice.len_chars());
        let mut line_break = 0;
        while let Some(c) = tail.prev() {
            if !is_line_break(c) {
                break;
            }
            line_break += 1;
        }
        Some(slice.len_utf16_cu() - line_break)
    }

    /// Byte offset of a protocol position. Columns past the end of the line
    /// clamp to the end of its content; lines past the end of the document
    /// have no offset.
    pub fn offset_of(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        let content_units = self.line_len_utf16(line)?;
        let line_start = self.text.char_to_utf16_cu(self.text.line_to_char(line));
        let column = (position.character as usize).min(content_units);
        let char_index = self.text.utf16_cu_to_char(line_start + column);
        Some(self.text.char_to_byte(char_index))
    }

    /// Protocol position of a byte offset. An offset inside a multi-byte
    /// character maps to the start of that character.
    pub fn position_of(&self, offset: usize) -> Option<Position> {
        if offset > self.text.len_bytes() {
            return None;
        }
        let char_index = self.text.byte_to_char(offset);
        let line = self.text.char_to_line(char_index);
        let line_start = self.text.char_to_utf16_cu(self.text.line_to_char(line));
        let column = self.text.char_to_utf16_cu(char_index) - line_start;
        Some(Position::new(line as u32, column as u32))
    }

    pub fn range_of(&self, range: Range<usize>) -> Option<lsp_types::Range> {
        Some(lsp_types::Range::new(self.position_of(range.start)?, self.position_of(range.end)?))
    }

    /// Applies editor changes in order. Changes for a version that is not
    /// newer than the current one are rejected.
    pub fn apply_changes(&mut self, changes: &[TextDocumentContentChangeEvent], version: i32) -> Result<(), DocumentError> {
        if version <= self.version {
            warn!("Ignoring stale change for {} (version {} <= {})", self.url, version, self.version);
            return Err(DocumentError::StaleVersion { current: self.version, received: version });
        }
        for change in changes {
            match change.range {
                Some(range) => {
                    let start = self.offset_of(range.start).ok_or(DocumentError::InvalidPosition(range.start))?;
                    let end = self.offset_of(range.end).ok_or(DocumentError::InvalidPosition(range.end))?;
                    if end < start {
                        return Err(DocumentError::InvalidPosition(range.end));
                    }
                    let start = self.text.byte_to_char(start);
                    let end = self.text.byte_to_char(end);
                    self.text.remove(start..end);
                    self.text.insert(start, &change.text);
                }
                None => self.text = Rope::from_str(&change.text),
            }
        }
        debug!("{} now at version {} ({} bytes)", self.url, version, self.text.len_bytes());
        self.version = version;
        Ok(())
    }
}
