//! Citation template parser.
//!
//! Extracts PubMed identifiers from a text file of citation templates, such as a
//! Zotero export in Wikipedia citation template format. Each `{{ ... }}` template
//! is one record and its identifier is the `PMID = <digits>` entry inside it.
//!
//! # Example
//!
//! ```
//! use citedby::TemplateParser;
//!
//! let input = r#"{{Cite journal
//!  | title = First
//!  | PMID = 100
//! }}
//! {{Cite journal
//!  | title = Second
//!  | PMID = 200
//! }}"#;
//!
//! let templates = TemplateParser::new().parse(input).unwrap();
//! assert_eq!(templates.identifiers().collect::<Vec<_>>(), vec!["100", "200"]);
//! ```

mod map;

use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::regex::Regex;
use crate::{CitationError, Result};

pub use map::TemplateMap;

static TEMPLATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{(.*?)\}\}").expect("template pattern is valid"));

static PMID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bPMID\s*=\s*(\d+)\b").expect("PMID pattern is valid"));

/// Parser for `{{ ... }}` citation templates carrying a `PMID` entry.
///
/// By default the parser is strict: a template without a PMID, or a PMID found
/// outside of any template, is reported as an error instead of being silently
/// dropped. [`TemplateParser::lenient`] skips such entries with a warning.
#[derive(Debug, Clone, Default)]
pub struct TemplateParser {
    lenient: bool,
}

impl TemplateParser {
    /// Creates a new strict template parser.
    ///
    /// # Examples
    ///
    /// ```
    /// use citedby::TemplateParser;
    /// let parser = TemplateParser::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser that skips templates without a PMID and ignores
    /// identifiers found outside of templates.
    #[must_use]
    pub fn lenient() -> Self {
        Self { lenient: true }
    }

    /// Whether unmatched entries are skipped instead of rejected.
    #[must_use]
    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Reads and parses a template file.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::TemplateRead`] if the file cannot be read as
    /// UTF-8 text, or any error of [`TemplateParser::parse`].
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<TemplateMap> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| CitationError::TemplateRead {
                path: path.to_path_buf(),
                source,
            })?;
        self.parse(&content)
    }

    /// Parses template text into a mapping from PMID to template snippet.
    ///
    /// Snippets are stored trimmed, with their `{{` and `}}` delimiters.
    /// A PMID occurring in several templates keeps the last snippet.
    ///
    /// Templates do not nest: a template ends at the first `}}` after its
    /// `{{`. In `{{Cite | title = {{lang|fr|X}} | PMID = 1}}` the record is
    /// `{{Cite | title = {{lang|fr|X}}`, which carries no PMID, so strict mode
    /// reports it as [`CitationError::UnidentifiedTemplate`].
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`CitationError::UnidentifiedTemplate`] for the
    /// first template without a PMID, and [`CitationError::MismatchedRecords`]
    /// when the number of PMID entries in the text differs from the number of
    /// templates.
    pub fn parse(&self, input: &str) -> Result<TemplateMap> {
        let identifiers = PMID_REGEX.find_iter(input).count();
        let mut templates = 0;
        let mut map = TemplateMap::new();

        for caps in TEMPLATE_REGEX.captures_iter(input) {
            templates += 1;
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let line = line_number(input, whole.start());
            let Some(pmid) = PMID_REGEX.captures(body.as_str()).and_then(|c| c.get(1)) else {
                if self.lenient {
                    warn!(line, "skipping template without a PMID");
                    continue;
                }
                return Err(CitationError::UnidentifiedTemplate { line });
            };

            let snippet = format!("{{{{{}}}}}", body.as_str().trim());
            debug!(pmid = pmid.as_str(), line, "parsed template");
            if map.insert(pmid.as_str().to_string(), snippet).is_some() {
                debug!(pmid = pmid.as_str(), line, "duplicate PMID replaces earlier template");
            }
        }

        if identifiers != templates {
            if !self.lenient {
                return Err(CitationError::MismatchedRecords {
                    identifiers,
                    templates,
                });
            }
            warn!(
                identifiers,
                templates, "PMID entries and templates do not match one to one"
            );
        }

        Ok(map)
    }
}

/// 1-based line number of a byte offset.
fn line_number(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("{{Cite | PMID = 123}}", Some("123"))]
    #[case("{{Cite | PMID=123}}", Some("123"))]
    #[case("{{Cite | PMID   =\t123 }}", Some("123"))]
    #[case("{{Cite | PMID = 123 | DOI = 10.1/x}}", Some("123"))]
    #[case("{{Cite | pmid = 123}}", None)]
    #[case("{{Cite | XPMID = 123}}", None)]
    #[case("{{Cite | PMID = abc}}", None)]
    fn test_pmid_token(#[case] input: &str, #[case] expected: Option<&str>) {
        let templates = TemplateParser::lenient().parse(input).unwrap();
        assert_eq!(templates.identifiers().next(), expected);
    }

    #[test]
    fn test_parse_multiline_templates() {
        let input = r#"Exported items

{{Cite journal
 | title = Alpha
 | PMID = 100
}}

{{Cite journal
 | title = Beta
 | PMID = 200
}}
"#;
        let templates = TemplateParser::new().parse(input).unwrap();
        assert_eq!(templates.len(), 2);
        assert_eq!(
            templates.get("100"),
            Some("{{Cite journal\n | title = Alpha\n | PMID = 100}}")
        );
        assert_eq!(
            templates.get("200"),
            Some("{{Cite journal\n | title = Beta\n | PMID = 200}}")
        );
    }

    #[test]
    fn test_identifier_pairs_with_its_own_template() {
        let input = "{{Cite | title = A | PMID = 1}}{{Cite | title = B | PMID = 2}}";
        let templates = TemplateParser::new().parse(input).unwrap();
        assert_eq!(
            templates.iter().collect::<Vec<_>>(),
            vec![
                ("1", "{{Cite | title = A | PMID = 1}}"),
                ("2", "{{Cite | title = B | PMID = 2}}"),
            ]
        );
    }

    #[test]
    fn test_no_matches_yields_empty_map() {
        let templates = TemplateParser::new().parse("nothing to see here").unwrap();
        assert!(templates.is_empty());
    }

    #[test]
    fn test_duplicate_pmid_last_template_wins() {
        let input = "{{A | PMID = 1}} {{B | PMID = 2}} {{C | PMID = 1}}";
        let templates = TemplateParser::new().parse(input).unwrap();
        assert_eq!(templates.identifiers().collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(templates.get("1"), Some("{{C | PMID = 1}}"));
    }

    #[test]
    fn test_strict_rejects_template_without_pmid() {
        let input = "{{A | PMID = 1}}\n\n{{Cite book | title = B}}";
        let err = TemplateParser::new().parse(input).unwrap_err();
        assert!(matches!(err, CitationError::UnidentifiedTemplate { line: 3 }));
    }

    #[test]
    fn test_strict_rejects_stray_pmid() {
        let input = "PMID = 9\n{{A | PMID = 1}}";
        let err = TemplateParser::new().parse(input).unwrap_err();
        assert!(matches!(
            err,
            CitationError::MismatchedRecords {
                identifiers: 2,
                templates: 1
            }
        ));
    }

    #[test]
    fn test_nested_template_ends_at_first_close() {
        let input = "{{A | PMID = 1}}\n{{Cite | title = {{lang|fr|X}} | PMID = 2}}";
        let err = TemplateParser::new().parse(input).unwrap_err();
        assert!(matches!(err, CitationError::UnidentifiedTemplate { line: 2 }));

        let templates = TemplateParser::lenient().parse(input).unwrap();
        assert_eq!(templates.identifiers().collect::<Vec<_>>(), vec!["1"]);
    }

    #[test]
    fn test_parser_modes() {
        assert!(!TemplateParser::new().is_lenient());
        assert!(!TemplateParser::default().is_lenient());
        assert!(TemplateParser::lenient().is_lenient());
    }

    #[test]
    fn test_lenient_skips_unmatched_entries() {
        let input = "PMID = 9\n{{A | PMID = 1}}\n{{Cite book | title = B}}\n{{C | PMID = 3}}";
        let templates = TemplateParser::lenient().parse(input).unwrap();
        assert_eq!(templates.identifiers().collect::<Vec<_>>(), vec!["1", "3"]);
    }

    #[test]
    fn test_parse_missing_file() {
        let err = TemplateParser::new()
            .parse_file("does/not/exist.txt")
            .unwrap_err();
        assert!(matches!(err, CitationError::TemplateRead { .. }));
    }

    #[rstest]
    #[case("abc", 0, 1)]
    #[case("a\nb\nc", 2, 2)]
    #[case("a\nb\nc", 4, 3)]
    fn test_line_number(#[case] text: &str, #[case] offset: usize, #[case] expected: usize) {
        assert_eq!(line_number(text, offset), expected);
    }
}
