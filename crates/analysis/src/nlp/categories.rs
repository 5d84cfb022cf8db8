use std::collections::HashMap;
use std::path::Path;

use super::CategoryDictionary;
use crate::error::{AnalysisError, AnalysisResult};

const BUNDLED_DICTIONARY: &str = include_str!("../../resources/categories.dic");

/// Category dictionary in LIWC `.dic` format.
///
/// ```text
/// %
/// 1   posemo
/// 2   negemo
/// %
/// happy   1
/// sad*    2
/// ```
///
/// A trailing `*` makes the entry match every word starting with it.
/// Exact entries take precedence, then the longest matching prefix.
#[derive(Debug, Clone, Default)]
pub struct LiwcDictionary {
    exact: HashMap<String, Vec<String>>,
    prefixes: Vec<(String, Vec<String>)>,
}

impl LiwcDictionary {
    /// Dictionary shipped with the crate.
    pub fn bundled() -> AnalysisResult<Self> {
        Self::parse("bundled category dictionary", BUNDLED_DICTIONARY)
    }

    /// Load a `.dic` file.
    pub fn from_path(path: &Path) -> AnalysisResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(path.display().to_string(), &content)
    }

    /// Parse dictionary text; `name` is used in error messages.
    pub fn parse(name: impl Into<String>, content: &str) -> AnalysisResult<Self> {
        let name = name.into();
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        match lines.next() {
            Some((_, "%")) => {}
            _ => return Err(AnalysisError::resource(&name, "missing '%' category header")),
        }

        let mut names: HashMap<&str, String> = HashMap::new();
        let mut header_closed = false;
        for (lineno, line) in lines.by_ref() {
            if line == "%" {
                header_closed = true;
                break;
            }
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some(id), Some(category)) => {
                    names.insert(id, category.to_string());
                }
                _ => {
                    return Err(AnalysisError::resource(
                        &name,
                        format!("line {}: expected '<id> <category>'", lineno),
                    ))
                }
            }
        }
        if !header_closed {
            return Err(AnalysisError::resource(&name, "unterminated category header"));
        }

        let mut dictionary = Self::default();
        for (lineno, line) in lines {
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };

            let categories = fields
                .map(|id| {
                    names.get(id).cloned().ok_or_else(|| {
                        AnalysisError::resource(
                            &name,
                            format!("line {}: unknown category id '{}'", lineno, id),
                        )
                    })
                })
                .collect::<AnalysisResult<Vec<String>>>()?;

            let word = word.to_lowercase();
            match word.strip_suffix('*') {
                Some(prefix) => dictionary.prefixes.push((prefix.to_string(), categories)),
                None => {
                    dictionary.exact.insert(word, categories);
                }
            }
        }

        dictionary
            .prefixes
            .sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Ok(dictionary)
    }

    /// Number of word and prefix entries.
    pub fn len(&self) -> usize {
        self.exact.len() + self.prefixes.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CategoryDictionary for LiwcDictionary {
    fn categories(&self, word: &str) -> Vec<String> {
        let word = word.to_lowercase();
        if let Some(categories) = self.exact.get(&word) {
            return categories.clone();
        }
        self.prefixes
            .iter()
            .find(|(prefix, _)| word.starts_with(prefix.as_str()))
            .map(|(_, categories)| categories.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "%\n1\tposemo\n2\tnegemo\n3\tsocial\n%\nhappy\t1\nhapp*\t1\t3\nha*\t2\nfriend*\t1\t3\n";

    #[test]
    fn exact_entries_win_over_prefixes() {
        let dictionary = LiwcDictionary::parse("sample", SAMPLE).expect("parse");
        assert_eq!(dictionary.len(), 4);
        assert_eq!(dictionary.categories("happy"), vec!["posemo"]);
        assert_eq!(dictionary.categories("Happiness"), vec!["posemo", "social"]);
    }

    #[test]
    fn longest_prefix_matches() {
        let dictionary = LiwcDictionary::parse("sample", SAMPLE).expect("parse");
        assert_eq!(dictionary.categories("hat"), vec!["negemo"]);
        assert_eq!(dictionary.categories("friends"), vec!["posemo", "social"]);
        assert!(dictionary.categories("table").is_empty());
    }

    #[test]
    fn rejects_unknown_category_ids() {
        let err = LiwcDictionary::parse("sample", "%\n1\tposemo\n%\nhappy\t7\n")
            .expect_err("unknown id");
        assert!(err.to_string().contains("unknown category id '7'"));
    }

    #[test]
    fn rejects_missing_header() {
        assert!(LiwcDictionary::parse("sample", "happy\t1\n").is_err());
        assert!(LiwcDictionary::parse("sample", "%\n1\tposemo\n").is_err());
    }

    #[test]
    fn bundled_dictionary_loads() {
        let dictionary = LiwcDictionary::bundled().expect("bundled dictionary");
        assert!(dictionary.categories("happiness").contains(&"posemo".to_string()));
        assert!(dictionary.categories("what").contains(&"question".to_string()));
    }
}
