//! Free-text search

use regex::Regex;
use regex::RegexBuilder;

use super::column::NULL;
use crate::model::Row;
use crate::model::Value;

/// Case-insensitive search term.
///
/// The term is a regular expression matched anywhere in the value. A term
/// that is not a valid expression is matched literally.
#[derive(Debug, Clone)]
pub struct SearchMatcher(Regex);

impl SearchMatcher {
    /// Compiles a term. Returns `None` for an empty term.
    pub fn new(term: &str) -> Option<Self> {
        if term.is_empty() {
            return None;
        }
        let build = |pattern: &str| RegexBuilder::new(pattern).case_insensitive(true).build();
        build(term)
            .or_else(|_| build(&regex::escape(term)))
            .ok()
            .map(Self)
    }

    /// Returns `true` if the displayed value matches.
    pub fn is_match(&self, value: &Value) -> bool {
        self.0.is_match(&value.to_string())
    }
}

/// Keeps rows whose `target` field matches `term`. An empty term keeps all rows.
pub fn search_rows(rows: Vec<Row>, target: &str, term: &str) -> Vec<Row> {
    let Some(matcher) = SearchMatcher::new(term) else {
        return rows;
    };
    rows.into_iter()
        .filter(|row| matcher.is_match(row.lookup(target).unwrap_or(&NULL)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    fn rows() -> Vec<Row> {
        ["web-01", "Web-02", "db-01"]
            .into_iter()
            .map(|name| Row::new(Record::new().set("name", name)))
            .collect()
    }

    #[test]
    fn test_case_insensitive_substring() {
        assert_eq!(search_rows(rows(), "name", "WEB").len(), 2);
        assert_eq!(search_rows(rows(), "name", "01").len(), 2);
    }

    #[test]
    fn test_regex_term() {
        assert_eq!(search_rows(rows(), "name", "^db").len(), 1);
    }

    #[test]
    fn test_invalid_regex_matches_literally() {
        let data = vec![
            Row::new(Record::new().set("name", "a(b")),
            Row::new(Record::new().set("name", "ab")),
        ];
        assert_eq!(search_rows(data, "name", "a(").len(), 1);
    }

    #[test]
    fn test_empty_term_passes_through() {
        assert_eq!(search_rows(rows(), "name", "").len(), 3);
    }
}
