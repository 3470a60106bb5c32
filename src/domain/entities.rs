//! Domain entities: the metadata document and test-file lines

use serde::{Deserialize, Serialize};

use crate::domain::arena::{Dimensions, RoomId};

/// Contents of a test directory's `meta.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaDocument {
    /// Root of the room structure
    #[serde(rename = "estructura")]
    pub structure: RoomSpec,
    /// Test files, relative to the test directory, in output order
    pub tests: Vec<String>,
}

/// One room as written in `meta.json`, with its connected rooms nested inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub id: RoomId,
    #[serde(rename = "filas")]
    pub rows: u32,
    #[serde(rename = "columnas")]
    pub cols: u32,
    #[serde(rename = "conectado a", default, skip_serializing_if = "Vec::is_empty")]
    pub connected: Vec<RoomSpec>,
}

// Long chains nest deeply; unlink them level by level instead of recursing.
impl Drop for RoomSpec {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.connected);
        while let Some(mut room) = pending.pop() {
            pending.append(&mut room.connected);
        }
    }
}

impl RoomSpec {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            rows: self.rows,
            cols: self.cols,
        }
    }
}

/// Classification of one test-file line after comment removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestLine {
    /// Goes to both the input and the expected-output stream
    Input(String),
    /// Goes to the expected-output stream only
    Annotation(String),
    /// Comment-only or blank; written nowhere
    Blank,
}

/// Rules for splitting test-file lines into input and annotation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRules {
    /// Prefix marking a line as expected-output only
    pub annotation_prefix: String,
    /// Everything from the first occurrence of this marker on is dropped
    pub comment_marker: String,
}

impl Default for LineRules {
    fn default() -> Self {
        Self {
            annotation_prefix: "  ".into(),
            comment_marker: ";".into(),
        }
    }
}

impl LineRules {
    /// Classify a raw line (without its line terminator).
    ///
    /// The annotation check looks at the raw line, before the comment is cut.
    /// Only trailing whitespace is stripped, so annotation lines keep their
    /// leading indentation in the expected output.
    pub fn classify(&self, raw: &str) -> TestLine {
        let is_annotation =
            !self.annotation_prefix.is_empty() && raw.starts_with(&self.annotation_prefix);
        let content = if self.comment_marker.is_empty() {
            raw
        } else {
            raw.split_once(self.comment_marker.as_str())
                .map_or(raw, |(before, _)| before)
        };
        let clean = content.trim_end();
        if clean.is_empty() {
            TestLine::Blank
        } else if is_annotation {
            TestLine::Annotation(clean.to_string())
        } else {
            TestLine::Input(clean.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("foo ; bar", TestLine::Input("foo".into()))]
    #[case("  foo ; bar", TestLine::Annotation("  foo".into()))]
    #[case("; just a note", TestLine::Blank)]
    #[case("   ", TestLine::Blank)]
    #[case("", TestLine::Blank)]
    #[case("  ; indented note", TestLine::Blank)]
    #[case("poner_prod 3", TestLine::Input("poner_prod 3".into()))]
    #[case(" one space", TestLine::Input(" one space".into()))]
    #[case("a;b;c", TestLine::Input("a".into()))]
    #[case("    deeper\t", TestLine::Annotation("    deeper".into()))]
    fn test_classify(#[case] raw: &str, #[case] expected: TestLine) {
        assert_eq!(LineRules::default().classify(raw), expected);
    }

    #[test]
    fn test_escaped_semicolon_is_not_special() {
        assert_eq!(
            LineRules::default().classify(r"echo a\;b"),
            TestLine::Input(r"echo a\".into())
        );
    }

    #[test]
    fn test_meta_document_parses_nested_rooms() {
        let json = r#"{
            "estructura": {"id": 1, "filas": 2, "columnas": 3, "conectado a": [
                {"id": 2, "filas": 1, "columnas": 1}
            ]},
            "tests": ["a.txt", "b.txt"]
        }"#;
        let meta: MetaDocument = serde_json::from_str(json).unwrap();
        assert_eq!(meta.structure.id, 1);
        assert_eq!(meta.structure.dimensions(), Dimensions { rows: 2, cols: 3 });
        assert_eq!(meta.structure.connected.len(), 1);
        assert!(meta.structure.connected[0].connected.is_empty());
        assert_eq!(meta.tests, vec!["a.txt", "b.txt"]);
    }
}
