//! Text documents as an editor host sees them: a path, the full text and a
//! mapping from byte offsets to line / character positions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Zero based position. `character` counts UTF-16 code units, which is what
/// editors use for columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }
}

/// Byte offsets of every line start. `\n`, `\r\n` and a lone `\r` all end a
/// line.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    line_starts.push(i + 2);
                    i += 2;
                    continue;
                }
                b'\r' | b'\n' => line_starts.push(i + 1),
                _ => {}
            }
            i += 1;
        }
        LineIndex { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of a byte offset. Offsets past the end clamp to the end of the
    /// text; offsets inside a multi-byte character snap to its start.
    pub fn position_at(&self, text: &str, offset: usize) -> Position {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        let character = text[line_start..offset].encode_utf16().count();
        Position::new(line as u32, character as u32)
    }
}

/// Languages the lens provider registers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    JavaScript,
    TypeScript,
    JavaScriptReact,
    TypeScriptReact,
}

impl LanguageId {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "js" | "mjs" | "cjs" => Some(LanguageId::JavaScript),
            "ts" | "mts" | "cts" => Some(LanguageId::TypeScript),
            "jsx" => Some(LanguageId::JavaScriptReact),
            "tsx" => Some(LanguageId::TypeScriptReact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageId::JavaScript => "javascript",
            LanguageId::TypeScript => "typescript",
            LanguageId::JavaScriptReact => "javascriptreact",
            LanguageId::TypeScriptReact => "typescriptreact",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextDocument {
    path: PathBuf,
    text: String,
    line_index: LineIndex,
}

impl TextDocument {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(path: P, text: S) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        TextDocument {
            path: path.into(),
            text,
            line_index,
        }
    }

    pub fn open<P: Into<PathBuf>>(path: P) -> std::io::Result<Self> {
        let path = path.into();
        let text = std::fs::read_to_string(&path)?;
        Ok(TextDocument::new(path, text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language_id(&self) -> Option<LanguageId> {
        LanguageId::from_path(&self.path)
    }

    pub fn position_at(&self, offset: usize) -> Position {
        self.line_index.position_at(&self.text, offset)
    }

    pub fn range_of(&self, start_index: usize, end_index: usize) -> Range {
        Range::new(self.position_at(start_index), self.position_at(end_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_on_multiple_lines() {
        let text = "ab\ncd\r\nef\rg";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position_at(text, 0), Position::new(0, 0));
        assert_eq!(index.position_at(text, 4), Position::new(1, 1));
        assert_eq!(index.position_at(text, 7), Position::new(2, 0));
        assert_eq!(index.position_at(text, 10), Position::new(3, 0));
        assert_eq!(index.position_at(text, 100), Position::new(3, 1));
    }

    #[test]
    fn test_characters_count_utf16_units() {
        let text = "é😀x";
        let index = LineIndex::new(text);
        // é is 2 bytes / 1 unit, 😀 is 4 bytes / 2 units
        assert_eq!(index.position_at(text, 6), Position::new(0, 3));
        assert_eq!(index.position_at(text, 3), Position::new(0, 1));
    }

    #[test]
    fn test_language_from_extension() {
        assert_eq!(
            LanguageId::from_path(Path::new("a/b.script.TSX")),
            Some(LanguageId::TypeScriptReact)
        );
        assert_eq!(
            LanguageId::from_path(Path::new("x.mjs")),
            Some(LanguageId::JavaScript)
        );
        assert_eq!(LanguageId::from_path(Path::new("x.rs")), None);
        assert_eq!(LanguageId::from_path(Path::new("Makefile")), None);
    }
}
