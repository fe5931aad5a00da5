use std::fmt;
use std::fs;
use std::path::Path;

/// A rule matches when every group has at least one alternative present.
///
/// Text form: `moon landing & fake|hoax|faked`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    groups: Vec<Vec<String>>,
}

impl PatternRule {
    pub fn parse(line: &str) -> Option<Self> {
        let line = strip_comment(line);
        if line.is_empty() {
            return None;
        }
        let mut groups = Vec::new();
        for raw_group in line.split('&') {
            let alternatives: Vec<String> = raw_group
                .split('|')
                .map(|alt| alt.trim().to_lowercase())
                .filter(|alt| !alt.is_empty())
                .collect();
            if alternatives.is_empty() {
                return None;
            }
            groups.push(alternatives);
        }
        Some(Self { groups })
    }

    /// `text` must already be lower-cased.
    pub fn matches(&self, text: &str) -> bool {
        self.groups
            .iter()
            .all(|alts| alts.iter().any(|alt| text.contains(alt.as_str())))
    }
}

impl fmt::Display for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups: Vec<String> = self.groups.iter().map(|g| g.join("|")).collect();
        f.write_str(&groups.join(" & "))
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    rules: Vec<PatternRule>,
}

impl PatternTable {
    /// Lines that fail to parse are skipped; an all-invalid input yields an
    /// empty table.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            rules: lines.into_iter().filter_map(PatternRule::parse).collect(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_lines(content.lines()))
    }

    /// First rule that matches, in file order.
    pub fn first_match(&self, text: &str) -> Option<&PatternRule> {
        self.rules.iter().find(|r| r.matches(text))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Flat list of lower-cased substrings.
#[derive(Debug, Clone, Default)]
pub struct TermList {
    terms: Vec<String>,
}

impl TermList {
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut terms: Vec<String> = Vec::new();
        for line in lines {
            let term = strip_comment(line).to_lowercase();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self { terms }
    }

    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_lines(content.lines()))
    }

    /// Number of distinct terms that occur in `text` (already lower-cased).
    pub fn count_present(&self, text: &str) -> usize {
        self.terms
            .iter()
            .filter(|t| text.contains(t.as_str()))
            .count()
    }

    pub fn any_in(&self, text: &str) -> bool {
        self.first_in(text).is_some()
    }

    pub fn first_in(&self, text: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|t| text.contains(t.as_str()))
            .map(|t| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn strip_comment(line: &str) -> &str {
    let line = match line.split_once('#') {
        Some((before, _)) => before,
        None => line,
    };
    line.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rule_requires_every_group() {
        let rule = PatternRule::parse("moon landing & fake|hoax|faked").unwrap();
        assert!(rule.matches("the moon landing was a hoax"));
        assert!(!rule.matches("the moon landing happened in 1969"));
        assert!(!rule.matches("that photo is fake"));
    }

    #[test]
    fn rule_parse_rejects_empty_groups() {
        assert!(PatternRule::parse("water & ").is_none());
        assert!(PatternRule::parse("   # only a comment").is_none());
    }

    #[test]
    fn rule_display_round_trips() {
        let rule = PatternRule::parse("5G & covid | coronavirus").unwrap();
        assert_eq!(rule.to_string(), "5g & covid|coronavirus");
        assert_eq!(PatternRule::parse(&rule.to_string()).unwrap(), rule);
    }

    #[test]
    fn term_list_counts_distinct_terms() {
        let list = TermList::from_lines(["false", "hoax", "false", "no evidence"]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.count_present("false! false! a hoax with no evidence"), 3);
        assert_eq!(list.count_present("nothing here"), 0);
    }

    #[test]
    fn tables_load_from_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# known-false rules").unwrap();
        writeln!(file, "lizard & people  # trailing comment").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "chemtrail").unwrap();
        let table = PatternTable::from_path(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.first_match("lizard people run the world").is_some());
        assert!(table.first_match("people like lizards").is_some());
        assert!(table.first_match("planes leave contrails").is_none());
    }
}
