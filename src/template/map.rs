use std::collections::HashMap;

/// Insertion-ordered mapping from PMID to its template snippet.
///
/// Re-inserting an identifier replaces its snippet but keeps the position of
/// its first occurrence, so iteration follows the order in which the
/// identifiers were first encountered in the template file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateMap {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl TemplateMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, returning the snippet it replaced if the identifier
    /// was already present.
    pub fn insert(&mut self, pmid: String, snippet: String) -> Option<String> {
        match self.positions.get(&pmid) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, snippet)),
            None => {
                self.positions.insert(pmid.clone(), self.entries.len());
                self.entries.push((pmid, snippet));
                None
            }
        }
    }

    pub fn get(&self, pmid: &str) -> Option<&str> {
        self.positions
            .get(pmid)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, pmid: &str) -> bool {
        self.positions.contains_key(pmid)
    }

    /// Identifiers in first-encounter order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(pmid, _)| pmid.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(pmid, snippet)| (pmid.as_str(), snippet.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for TemplateMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (pmid, snippet) in iter {
            map.insert(pmid, snippet);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pair(pmid: &str, snippet: &str) -> (String, String) {
        (pmid.to_string(), snippet.to_string())
    }

    #[test]
    fn test_last_snippet_wins_first_position_kept() {
        let map: TemplateMap = [
            pair("1", "{{a}}"),
            pair("2", "{{b}}"),
            pair("1", "{{c}}"),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.len(), 2);
        assert_eq!(map.identifiers().collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(map.get("1"), Some("{{c}}"));
        assert_eq!(map.get("2"), Some("{{b}}"));
    }

    #[test]
    fn test_insert_reports_replaced_snippet() {
        let mut map = TemplateMap::new();
        assert_eq!(map.insert("7".into(), "{{old}}".into()), None);
        assert_eq!(
            map.insert("7".into(), "{{new}}".into()),
            Some("{{old}}".to_string())
        );
        assert!(map.contains("7"));
        assert!(!map.contains("8"));
    }

    #[test]
    fn test_empty_map() {
        let map = TemplateMap::new();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
        assert_eq!(map.get("1"), None);
    }
}
