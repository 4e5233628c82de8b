//! Named queries in `*-named-queries.properties` files
//!
//! Each entry is `Entity.method=query` (`:` or whitespace also separate key
//! and value). Keys ending in `.native` hold native SQL. A value continued
//! with a trailing backslash spans several lines; the backslashes become
//! spaces in the snippet so every offset still matches the file.

use tracing::trace;

use super::QuerySiteLocator;
use crate::analysis::EmbeddedQuerySnippet;

const NATIVE_SUFFIX: &str = ".native";

pub struct NamedQueryPropertiesLocator;

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\x0c'
}

/// A line without its terminator, with its byte offset.
struct Line<'a> {
    start: usize,
    text: &'a str,
}

fn lines(document: &str) -> Vec<Line<'_>> {
    let mut result = Vec::new();
    let mut start = 0;
    for raw in document.split_inclusive('\n') {
        let text = raw.trim_end_matches('\n').trim_end_matches('\r');
        result.push(Line { start, text });
        start += raw.len();
    }
    result
}

/// An odd number of trailing backslashes continues the line.
fn continues(text: &str) -> bool {
    text.bytes().rev().take_while(|b| *b == b'\\').count() % 2 == 1
}

/// Key and value start (relative to the line) of an entry line.
fn split_entry(text: &str) -> (String, usize) {
    let bytes = text.as_bytes();
    let mut i = bytes.iter().position(|b| !is_blank(*b)).unwrap_or(bytes.len());
    let mut key = Vec::new();
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => {
                key.push(bytes[i + 1]);
                i += 2;
            }
            b'=' | b':' => break,
            b if is_blank(b) => break,
            b => {
                key.push(b);
                i += 1;
            }
        }
    }
    while i < bytes.len() && is_blank(bytes[i]) {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'=' || bytes[i] == b':') {
        i += 1;
        while i < bytes.len() && is_blank(bytes[i]) {
            i += 1;
        }
    }
    (String::from_utf8_lossy(&key).into_owned(), i)
}

impl QuerySiteLocator for NamedQueryPropertiesLocator {
    fn name(&self) -> &str {
        "named-query-properties"
    }

    fn applies_to(&self, path: &str) -> bool {
        path.ends_with("-named-queries.properties")
    }

    fn locate(&self, document: &str) -> Vec<EmbeddedQuerySnippet> {
        let lines = lines(document);
        let mut snippets = Vec::new();
        let mut index = 0;
        while index < lines.len() {
            let line = &lines[index];
            index += 1;
            let trimmed = line.text.trim_start_matches([' ', '\t', '\x0c']);
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let (key, value_at) = split_entry(line.text);
            let value_start = line.start + value_at;
            let mut value_end = line.start + line.text.len();
            let mut breaks = Vec::new();
            let mut last = line;
            while continues(last.text) && index < lines.len() {
                breaks.push(last.start + last.text.len() - 1);
                last = &lines[index];
                index += 1;
                value_end = last.start + last.text.len();
            }
            if value_start >= value_end {
                continue;
            }

            let mut text = document[value_start..value_end].to_string();
            for at in breaks.into_iter().filter(|at| *at >= value_start) {
                text.replace_range(at - value_start..at - value_start + 1, " ");
            }
            if text.trim().is_empty() {
                continue;
            }
            trace!("Named query '{}' at {}", key, value_start);
            snippets.push(EmbeddedQuerySnippet::new(text, value_start, key.ends_with(NATIVE_SUFFIX)));
        }
        snippets
    }
}
