//! Password issuance for the developer account.
//!
//! What password the account gets is decided by configuration, not by the
//! provisioning step: a generated passphrase (the https://xkcd.com/936/
//! technique), a fixed value supplied by the operator, or no change at all.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{LosError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PasswordPolicy {
    Generate {
        #[serde(default = "default_words")]
        words: usize,
        #[serde(default = "default_min_length")]
        min_length: usize,
        #[serde(default = "default_max_length")]
        max_length: usize,
        #[serde(default = "default_delimiter")]
        delimiter: String,
        #[serde(default = "default_wordlist")]
        wordlist: PathBuf,
    },
    Fixed {
        value: String,
    },
    Unchanged,
}

fn default_words() -> usize {
    3
}

fn default_min_length() -> usize {
    5
}

fn default_max_length() -> usize {
    8
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_wordlist() -> PathBuf {
    PathBuf::from("/usr/share/dict/words")
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::Generate {
            words: default_words(),
            min_length: default_min_length(),
            max_length: default_max_length(),
            delimiter: default_delimiter(),
            wordlist: default_wordlist(),
        }
    }
}

/// A password chosen by a [`PasswordPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issued {
    Generated(String),
    Fixed(String),
}

impl Issued {
    pub fn secret(&self) -> &str {
        match self {
            Issued::Generated(s) | Issued::Fixed(s) => s,
        }
    }
}

impl PasswordPolicy {
    /// Pick the password for this run. `None` for [`PasswordPolicy::Unchanged`].
    pub fn issue<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<Issued>> {
        match self {
            PasswordPolicy::Generate {
                words,
                min_length,
                max_length,
                delimiter,
                wordlist,
            } => {
                let candidates = load_wordlist(wordlist, *min_length, *max_length)?;
                let phrase = passphrase(&candidates, *words, delimiter, rng);
                Ok(Some(Issued::Generated(phrase)))
            }
            PasswordPolicy::Fixed { value } => Ok(Some(Issued::Fixed(value.clone()))),
            PasswordPolicy::Unchanged => Ok(None),
        }
    }
}

/// Lower-case ASCII words from `path` whose length is within
/// `[min_length, max_length]`, deduplicated.
pub fn load_wordlist(path: &Path, min_length: usize, max_length: usize) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    let mut words: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|w| (min_length..=max_length).contains(&w.len()))
        .filter(|w| w.bytes().all(|b| b.is_ascii_lowercase()))
        .map(str::to_string)
        .collect();
    words.sort();
    words.dedup();
    if words.is_empty() {
        return Err(LosError::EmptyWordList(path.to_path_buf()));
    }
    Ok(words)
}

/// Join `count` words chosen uniformly (with replacement) from `candidates`.
pub fn passphrase<R: Rng + ?Sized>(
    candidates: &[String],
    count: usize,
    delimiter: &str,
    rng: &mut R,
) -> String {
    (0..count)
        .filter_map(|_| candidates.choose(rng).map(String::as_str))
        .collect::<Vec<_>>()
        .join(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn wordlist(dir: &TempDir, words: &[&str]) -> PathBuf {
        let path = dir.path().join("words");
        std::fs::write(&path, words.join("\n")).unwrap();
        path
    }

    #[test]
    fn wordlist_filters_length_and_case() {
        let dir = TempDir::new().unwrap();
        let path = wordlist(
            &dir,
            &["oven", "bread", "Paris", "toaster", "crumpets", "don't", "bread", "sourdoughs"],
        );
        let words = load_wordlist(&path, 5, 8).unwrap();
        assert_eq!(words, vec!["bread", "crumpets", "toaster"]);
    }

    #[test]
    fn empty_wordlist_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = wordlist(&dir, &["a", "b"]);
        assert!(matches!(
            load_wordlist(&path, 5, 8),
            Err(LosError::EmptyWordList(_))
        ));
    }

    #[test]
    fn passphrase_has_requested_shape() {
        let words: Vec<String> = ["bread", "toaster", "crumpets"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut rng = StdRng::seed_from_u64(7);
        let phrase = passphrase(&words, 3, ",", &mut rng);
        let parts: Vec<&str> = phrase.split(',').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| words.iter().any(|w| w == p)));
    }

    #[test]
    fn same_seed_same_passphrase() {
        let words: Vec<String> = (0..50).map(|i| format!("word{i}")).collect();
        let a = passphrase(&words, 4, "-", &mut StdRng::seed_from_u64(1));
        let b = passphrase(&words, 4, "-", &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn generate_policy_reads_wordlist() {
        let dir = TempDir::new().unwrap();
        let path = wordlist(&dir, &["bread", "toaster", "crumpets"]);
        let policy = PasswordPolicy::Generate {
            words: 2,
            min_length: 5,
            max_length: 8,
            delimiter: " ".into(),
            wordlist: path,
        };
        let issued = policy.issue(&mut StdRng::seed_from_u64(3)).unwrap().unwrap();
        assert!(matches!(issued, Issued::Generated(_)));
        assert_eq!(issued.secret().split(' ').count(), 2);
    }

    #[test]
    fn fixed_and_unchanged_policies() {
        let mut rng = StdRng::seed_from_u64(0);
        let fixed = PasswordPolicy::Fixed {
            value: "raspberry".into(),
        };
        assert_eq!(
            fixed.issue(&mut rng).unwrap(),
            Some(Issued::Fixed("raspberry".into()))
        );
        assert_eq!(PasswordPolicy::Unchanged.issue(&mut rng).unwrap(), None);
    }

    #[test]
    fn policy_yaml_is_tagged() {
        let policy: PasswordPolicy = serde_yaml::from_str("policy: generate\nwords: 4\n").unwrap();
        match policy {
            PasswordPolicy::Generate { words, delimiter, .. } => {
                assert_eq!(words, 4);
                assert_eq!(delimiter, ",");
            }
            other => panic!("unexpected policy: {other:?}"),
        }
        let unchanged: PasswordPolicy = serde_yaml::from_str("policy: unchanged").unwrap();
        assert_eq!(unchanged, PasswordPolicy::Unchanged);
    }
}
