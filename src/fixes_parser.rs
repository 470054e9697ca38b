//! Parses the linter's YAML fixes file and attaches edit records to
//! matching diagnostics.

use std::path::PathBuf;

use serde::Deserialize;

use crate::diagnostic::Diagnostic;
use crate::edit::Edit;
use crate::errors::Result;

#[derive(Deserialize, Default)]
struct FixesDocument {
    #[serde(rename = "Diagnostics", default)]
    diagnostics: Vec<FixesEntry>,
}

#[derive(Deserialize)]
struct FixesEntry {
    #[serde(rename = "Replacements", default)]
    replacements: Vec<FixesReplacement>,
}

#[derive(Deserialize)]
struct FixesReplacement {
    #[serde(rename = "FilePath")]
    file_path: String,
    #[serde(rename = "Offset")]
    offset: usize,
    #[serde(rename = "Length")]
    length: usize,
    #[serde(rename = "ReplacementText")]
    replacement_text: String,
}

/// Doubles any `\n` byte found inside an unescaped single-quoted YAML
/// scalar, so producers that emit raw line feeds there still parse.
///
/// A `'` not immediately followed by another `'` toggles the in-quotes
/// state; a doubled `''` is YAML's own escape for a literal quote and is
/// passed through without toggling.
pub fn sanitize(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut in_quotes = false;
    let mut i = 0;
    while i < raw.len() {
        let b = raw[i];
        if b == b'\'' {
            if raw.get(i + 1) == Some(&b'\'') {
                out.push(b'\'');
                out.push(b'\'');
                i += 2;
                continue;
            }
            in_quotes = !in_quotes;
            out.push(b);
            i += 1;
            continue;
        }
        if b == b'\n' && in_quotes {
            out.push(b'\n');
            out.push(b'\n');
            i += 1;
            continue;
        }
        out.push(b);
        i += 1;
    }
    out
}

/// Parses a clang-tidy-style fixes YAML document.
#[derive(Default)]
pub struct FixesParser;

impl FixesParser {
    /// A fresh parser.
    pub fn new() -> Self {
        Self
    }

    /// Sanitize and parse `raw`, then attach the `i`-th entry's
    /// replacements to the `i`-th `diagnostic`. Extra fixes entries
    /// beyond `diagnostics.len()` are ignored; diagnostics beyond the
    /// fixes file's length keep their (already empty) edit lists.
    pub fn attach(&self, raw: &[u8], diagnostics: &mut [Diagnostic]) -> Result<()> {
        let sanitized = sanitize(raw);
        let doc: FixesDocument = serde_yaml::from_slice(&sanitized)?;

        for (i, entry) in doc.diagnostics.into_iter().enumerate() {
            let Some(diagnostic) = diagnostics.get_mut(i) else {
                break;
            };
            diagnostic.edits = entry
                .replacements
                .into_iter()
                .map(|r| Edit {
                    path: PathBuf::from(r.file_path),
                    offset: r.offset,
                    length: r.length,
                    text: r.replacement_text,
                })
                .collect();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(number: usize) -> Diagnostic {
        Diagnostic {
            number,
            check: "c".into(),
            file: PathBuf::from("a.cpp"),
            line: 1,
            column: 1,
            message: "m".into(),
            context: String::new(),
            edits: Vec::new(),
        }
    }

    #[test]
    fn sanitize_doubles_newline_in_single_quotes() {
        let raw = b"Text:  '1st line\n2nd line'\n";
        let sanitized = sanitize(raw);
        // Outside the scalar the trailing newline is untouched; inside it
        // the embedded one was doubled.
        assert_eq!(
            sanitized,
            b"Text:  '1st line\n\n2nd line'\n".to_vec()
        );
    }

    #[test]
    fn sanitize_passes_through_escaped_quote() {
        let raw = b"'it''s fine'\n";
        assert_eq!(sanitize(raw), raw.to_vec());
    }

    #[test]
    fn fixes_entries_attach_by_diagnostic_index() {
        let yaml = br#"
Diagnostics:
  - Replacements:
      - FilePath: a.cpp
        Offset: 3
        Length: 1
        ReplacementText: X
  - Replacements: []
  - Replacements:
      - FilePath: b.cpp
        Offset: 9
        Length: 0
        ReplacementText: Y
"#;
        let mut diagnostics = vec![diag(0), diag(1), diag(2)];
        FixesParser::new().attach(yaml, &mut diagnostics).unwrap();

        assert_eq!(diagnostics[0].edits.len(), 1);
        assert_eq!(diagnostics[0].edits[0].offset, 3);
        assert!(diagnostics[1].edits.is_empty());
        assert_eq!(diagnostics[2].edits[0].text, "Y");
    }

    #[test]
    fn extra_fixes_entries_are_ignored() {
        let yaml = br#"
Diagnostics:
  - Replacements: []
  - Replacements: []
"#;
        let mut diagnostics = vec![diag(0)];
        FixesParser::new().attach(yaml, &mut diagnostics).unwrap();
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn missing_fixes_entries_keep_empty_edits() {
        let yaml = br#"
Diagnostics:
  - Replacements:
      - FilePath: a.cpp
        Offset: 0
        Length: 0
        ReplacementText: X
"#;
        let mut diagnostics = vec![diag(0), diag(1)];
        FixesParser::new().attach(yaml, &mut diagnostics).unwrap();
        assert!(diagnostics[1].edits.is_empty());
    }
}
