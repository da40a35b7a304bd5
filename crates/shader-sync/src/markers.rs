//! Plain-text sentinels embedded in the generated region.
//!
//! The generated region is delimited and subdivided by short literal token
//! sequences stored directly in the buffer, so they round-trip through any
//! host save/reload path without side-channel metadata:
//!
//! - [`INLINE_OPEN`]/[`INLINE_CLOSE`] wrap a single-line editable value,
//! - [`BLOCK_OPEN`]/[`BLOCK_CLOSE`] wrap a multi-line editable body,
//! - a binding line (`//[bound:<element-id>]`) records which pipeline element
//!   the document belongs to,
//! - [`SECTION_END`] marks the end of the generated region.
//!
//! All offsets in this module are char offsets, and the blanking view keeps
//! them stable by replacing marker characters with equal-width whitespace.

use regex::Regex;
use shader_sync_lang::TextRange;
use std::sync::OnceLock;

/// Start tag of a single-line editable value span.
pub const INLINE_OPEN: &str = "/*[*/";
/// End tag of a single-line editable value span.
pub const INLINE_CLOSE: &str = "/*]*/";
/// Start tag of a multi-line editable body.
pub const BLOCK_OPEN: &str = "//[editable]";
/// End tag of a multi-line editable body.
pub const BLOCK_CLOSE: &str = "//[/editable]";
/// The line marking the end of the generated region.
pub const SECTION_END: &str = "//[end-generated]";

const BINDING_PATTERN: &str = r"//\[bound:([^\]\r\n]+)\]";

fn binding_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(BINDING_PATTERN).expect("binding pattern compiles"))
}

/// Render the binding line for a pipeline-element id.
pub fn binding_line(element_id: &str) -> String {
    format!("//[bound:{element_id}]")
}

/// How [`plain_view`] treats marker characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerMode {
    /// Remove markers (and marker-only lines) entirely; offsets shift.
    Strip,
    /// Replace marker characters with spaces; every char offset is preserved.
    Blank,
}

/// Kind of an editable sub-span inside the generated region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Single-line value span; edits must not introduce a line break.
    Inline,
    /// Multi-line body span; edits may span lines but not cross the tags.
    Block,
}

/// One editable sub-span, with and without its delimiting tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditableSpan {
    /// Span kind.
    pub kind: SpanKind,
    /// Full span including both tags.
    pub outer: TextRange,
    /// The editable interior, between the tags.
    pub inner: TextRange,
}

/// Everything the marker scan finds in one buffer snapshot.
#[derive(Debug, Clone, Default)]
pub struct MarkerMap {
    /// Editable sub-spans in source order.
    pub spans: Vec<EditableSpan>,
    /// Range of the first [`SECTION_END`] literal, if present.
    pub section_end: Option<TextRange>,
    /// Bound element id and the range of its binding-line literal.
    pub binding: Option<(String, TextRange)>,
}

/// Char-offset index over a text snapshot.
///
/// Marker scanning works on byte offsets (that is what `str` searching gives
/// us) but the whole engine speaks char offsets; this map converts between
/// the two.
#[derive(Debug)]
pub(crate) struct CharMap {
    char_to_byte: Vec<usize>,
    byte_len: usize,
}

impl CharMap {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            byte_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    pub(crate) fn byte_to_char(&self, byte: usize) -> usize {
        let clamped = byte.min(self.byte_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(i) | Err(i) => i,
        }
    }

    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte[clamped]
    }
}

fn find_all(text: &str, needle: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut from = 0;
    while let Some(pos) = text[from..].find(needle) {
        out.push(from + pos);
        from += pos + needle.len();
    }
    out
}

/// Scan `text` for all markers.
///
/// Unpaired tags are ignored rather than reported: a half-deleted marker must
/// not wedge the document, it simply stops delimiting anything.
pub fn scan(text: &str) -> MarkerMap {
    let map = CharMap::new(text);
    let mut spans = Vec::new();

    for (open, close, kind) in [
        (INLINE_OPEN, INLINE_CLOSE, SpanKind::Inline),
        (BLOCK_OPEN, BLOCK_CLOSE, SpanKind::Block),
    ] {
        let opens = find_all(text, open);
        let closes = find_all(text, close);
        let mut close_iter = closes.into_iter();
        let mut last_close = 0;
        for open_at in opens {
            if open_at < last_close {
                continue;
            }
            let Some(close_at) = close_iter.by_ref().find(|&c| c > open_at) else {
                break;
            };
            last_close = close_at + close.len();
            spans.push(EditableSpan {
                kind,
                outer: TextRange::new(map.byte_to_char(open_at), map.byte_to_char(last_close)),
                inner: TextRange::new(
                    map.byte_to_char(open_at + open.len()),
                    map.byte_to_char(close_at),
                ),
            });
        }
    }
    spans.sort_by_key(|span| span.outer.start);

    let section_end = text.find(SECTION_END).map(|at| {
        TextRange::new(map.byte_to_char(at), map.byte_to_char(at + SECTION_END.len()))
    });

    let binding = binding_regex().captures(text).and_then(|caps| {
        let whole = caps.get(0)?;
        Some((
            caps[1].to_string(),
            TextRange::new(map.byte_to_char(whole.start()), map.byte_to_char(whole.end())),
        ))
    });

    MarkerMap {
        spans,
        section_end,
        binding,
    }
}

/// The bound pipeline-element id recorded in `text`, if any.
pub fn bound_element(text: &str) -> Option<String> {
    binding_regex()
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// Produce the marker-free view of `text`.
///
/// [`MarkerMode::Blank`] substitutes spaces for marker characters so that
/// char offsets into the result are valid offsets into the original;
/// [`MarkerMode::Strip`] removes markers and drops lines that contained only
/// a marker.
pub fn plain_view(text: &str, mode: MarkerMode) -> String {
    match mode {
        MarkerMode::Blank => blank_view(text),
        MarkerMode::Strip => strip_view(text),
    }
}

fn marker_byte_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    for literal in [INLINE_OPEN, INLINE_CLOSE, BLOCK_OPEN, BLOCK_CLOSE, SECTION_END] {
        for at in find_all(text, literal) {
            ranges.push((at, at + literal.len()));
        }
    }
    for m in binding_regex().find_iter(text) {
        ranges.push((m.start(), m.end()));
    }
    ranges.sort_unstable();
    ranges.dedup();
    ranges
}

fn blank_view(text: &str) -> String {
    let mut out = text.to_string();
    // Reverse order: replacements keep char counts but may shrink byte
    // counts, which would shift every later byte range.
    for (start, end) in marker_byte_ranges(text).into_iter().rev() {
        let width = text[start..end].chars().count();
        out.replace_range(start..end, &" ".repeat(width));
    }
    out
}

fn strip_view(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        let trimmed = content.trim();
        // Marker-only lines disappear entirely.
        if trimmed == BLOCK_OPEN
            || trimmed == BLOCK_CLOSE
            || trimmed == SECTION_END
            || binding_regex()
                .find(trimmed)
                .is_some_and(|m| m.len() == trimmed.len())
        {
            continue;
        }
        let mut cleaned = line.to_string();
        for literal in [INLINE_OPEN, INLINE_CLOSE] {
            cleaned = cleaned.replace(literal, "");
        }
        out.push_str(&cleaned);
    }
    out
}

/// The sentinel literal containing `pos` strictly inside it, if any.
///
/// Only the line holding `pos` needs scanning: no marker contains a line
/// break.
pub fn marker_span_at(text: &str, pos: usize) -> Option<TextRange> {
    let map = CharMap::new(text);
    let byte = map.char_to_byte(pos);
    let line_start = text[..byte].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = text[byte..]
        .find('\n')
        .map(|i| byte + i)
        .unwrap_or(text.len());
    let line = &text[line_start..line_end];

    let mut hits: Vec<(usize, usize)> = Vec::new();
    for literal in [INLINE_OPEN, INLINE_CLOSE, BLOCK_OPEN, BLOCK_CLOSE, SECTION_END] {
        for at in find_all(line, literal) {
            hits.push((line_start + at, line_start + at + literal.len()));
        }
    }
    if let Some(m) = binding_regex().find(line) {
        hits.push((line_start + m.start(), line_start + m.end()));
    }

    hits.into_iter().find_map(|(start, end)| {
        let start = map.byte_to_char(start);
        let end = map.byte_to_char(end);
        (pos > start && pos < end).then_some(TextRange::new(start, end))
    })
}
