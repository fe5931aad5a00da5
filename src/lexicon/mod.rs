pub mod defaults;
pub mod table;

pub use table::{PatternRule, PatternTable, TermList};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use std::path::Path;

/// Claim-level lexicons, loaded once and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct Lexicons {
    pub fast_path_fake: PatternTable,
    pub fast_path_real: PatternTable,
    pub debunk: TermList,
    pub support: TermList,
}

impl Default for Lexicons {
    fn default() -> Self {
        Self {
            fast_path_fake: PatternTable::from_lines(defaults::FAST_PATH_FAKE_RULES.iter().copied()),
            fast_path_real: PatternTable::from_lines(defaults::FAST_PATH_REAL_RULES.iter().copied()),
            debunk: TermList::from_lines(defaults::DEBUNK_TERMS.iter().copied()),
            support: TermList::from_lines(defaults::SUPPORT_TERMS.iter().copied()),
        }
    }
}

impl Lexicons {
    /// Built-in tables, with any file configured in `cfg` replacing its
    /// counterpart.
    pub fn from_config(cfg: &EngineConfig) -> EngineResult<Self> {
        let mut lex = Self::default();
        if let Some(path) = &cfg.fast_path_fake_file {
            lex.fast_path_fake = load(path, |p| PatternTable::from_path(p))?;
        }
        if let Some(path) = &cfg.fast_path_real_file {
            lex.fast_path_real = load(path, |p| PatternTable::from_path(p))?;
        }
        if let Some(path) = &cfg.debunk_terms_file {
            lex.debunk = load(path, |p| TermList::from_path(p))?;
        }
        if let Some(path) = &cfg.support_terms_file {
            lex.support = load(path, |p| TermList::from_path(p))?;
        }
        Ok(lex)
    }
}

fn load<T>(path: &Path, loader: impl Fn(&Path) -> std::io::Result<T>) -> EngineResult<T> {
    loader(path).map_err(|e| EngineError::Lexicon(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_populated() {
        let lex = Lexicons::default();
        assert_eq!(lex.fast_path_fake.len(), defaults::FAST_PATH_FAKE_RULES.len());
        assert_eq!(lex.fast_path_real.len(), defaults::FAST_PATH_REAL_RULES.len());
        assert!(!lex.debunk.is_empty());
        assert!(!lex.support.is_empty());
    }

    #[test]
    fn configured_file_replaces_a_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bogus").unwrap();
        let cfg = EngineConfig {
            debunk_terms_file: Some(file.path().to_path_buf()),
            ..EngineConfig::default()
        };
        let lex = Lexicons::from_config(&cfg).unwrap();
        assert_eq!(lex.debunk.len(), 1);
        assert_eq!(lex.support.len(), defaults::SUPPORT_TERMS.len());
    }

    #[test]
    fn missing_file_is_a_lexicon_error() {
        let cfg = EngineConfig {
            fast_path_real_file: Some("/nonexistent/real.rules".into()),
            ..EngineConfig::default()
        };
        assert!(matches!(Lexicons::from_config(&cfg), Err(EngineError::Lexicon(_))));
    }
}
