//! Conversions between byte offsets and LSP locations

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::syntax::Source;

/// An LSP Position encoded by [`PositionEncoding`].
pub type LspPosition = lsp_types::Position;
/// An LSP range encoded by [`PositionEncoding`].
pub type LspRange = lsp_types::Range;

/// What counts as "1 character" for string indexing. UTF-16 is the only
/// encoding every LSP client supports, UTF-8 is the natural one.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionEncoding {
    /// "1 character" means "1 UTF-16 code unit"
    #[default]
    #[serde(rename = "utf-16")]
    Utf16,
    /// "1 character" means "1 byte"
    #[serde(rename = "utf-8")]
    Utf8,
}

impl From<PositionEncoding> for lsp_types::PositionEncodingKind {
    fn from(position_encoding: PositionEncoding) -> Self {
        match position_encoding {
            PositionEncoding::Utf16 => Self::UTF16,
            PositionEncoding::Utf8 => Self::UTF8,
        }
    }
}

impl PositionEncoding {
    /// The length of `text` in characters of this encoding.
    fn text_len(self, text: &str) -> usize {
        match self {
            PositionEncoding::Utf8 => text.len(),
            PositionEncoding::Utf16 => text.chars().map(char::len_utf16).sum(),
        }
    }
}

/// Converts an LSP position to a byte offset.
///
/// Positions past the end of the text are clamped to its end with a warning.
/// A character index past the end of a line is clamped to the end of the line
/// (before its line break).
pub fn to_offset(
    lsp_position: LspPosition,
    lsp_position_encoding: PositionEncoding,
    source: &Source,
) -> usize {
    let lines = source.len_lines() as u32;
    let line = lsp_position.line;

    if line >= lines {
        if line > lines || lsp_position.character > 0 {
            log::warn!(
                "LSP position is out of bounds: {lsp_position:?}, while only {lines} lines exist"
            );
        }
        return source.len_bytes();
    }

    let Some(range) = source.line_to_range(line as usize) else {
        return source.len_bytes();
    };
    let line_text = source.text()[range.clone()].trim_end_matches(['\r', '\n']);

    let character = lsp_position.character as usize;
    let column = match lsp_position_encoding {
        PositionEncoding::Utf8 => {
            let mut column = character.min(line_text.len());
            while !line_text.is_char_boundary(column) {
                column -= 1;
            }
            column
        }
        PositionEncoding::Utf16 => {
            let mut utf16 = 0;
            let mut column = line_text.len();
            for (idx, ch) in line_text.char_indices() {
                if utf16 >= character {
                    column = idx;
                    break;
                }
                utf16 += ch.len_utf16();
            }
            column
        }
    };

    if line + 1 == lines && lsp_position_encoding.text_len(line_text) < character {
        log::warn!(
            "LSP position is out of bounds: {lsp_position:?}, while the last line has {} characters",
            lsp_position_encoding.text_len(line_text)
        );
    }

    range.start + column
}

/// Converts a byte offset to an LSP position.
pub fn to_lsp_position(
    offset: usize,
    lsp_position_encoding: PositionEncoding,
    source: &Source,
) -> LspPosition {
    let Some(line) = source.byte_to_line(offset) else {
        return LspPosition::new(source.len_lines() as u32, 0);
    };
    let line_start = source.line_to_byte(line).unwrap_or_default();

    let mut column = offset;
    while !source.text().is_char_boundary(column) {
        column -= 1;
    }
    let prefix = &source.text()[line_start..column];

    LspPosition::new(line as u32, lsp_position_encoding.text_len(prefix) as u32)
}

/// Converts an LSP range to a byte range.
pub fn to_byte_range(
    lsp_range: LspRange,
    lsp_position_encoding: PositionEncoding,
    source: &Source,
) -> Range<usize> {
    let start = to_offset(lsp_range.start, lsp_position_encoding, source);
    let end = to_offset(lsp_range.end, lsp_position_encoding, source);
    start..end
}

/// Converts a byte range to an LSP range.
pub fn to_lsp_range(
    range: Range<usize>,
    source: &Source,
    lsp_position_encoding: PositionEncoding,
) -> LspRange {
    let start = to_lsp_position(range.start, lsp_position_encoding, source);
    let end = to_lsp_position(range.end, lsp_position_encoding, source);
    LspRange::new(start, end)
}
