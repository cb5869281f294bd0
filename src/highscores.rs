//! High-score table persisted as plain `NAME SCORE` lines.
//!
//! The table is always kept sorted by score, highest first, and never holds
//! more than its configured capacity.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// Environment variable overriding the high-score file location.
pub const HIGH_SCORES_ENV_VAR: &str = "BLOCKFALL_HIGH_SCORES";

const HIGH_SCORES_FILE: &str = "highscores.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScore {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScores {
    entries: Vec<HighScore>,
    capacity: usize,
}

/// Resolve the high-score file path.
///
/// `$BLOCKFALL_HIGH_SCORES` wins, then the platform data directory, then the
/// working directory.
pub fn high_scores_path() -> PathBuf {
    if let Ok(path) = std::env::var(HIGH_SCORES_ENV_VAR) {
        return PathBuf::from(path);
    }
    match dirs::data_dir() {
        Some(dir) => dir.join("blockfall").join(HIGH_SCORES_FILE),
        None => PathBuf::from(HIGH_SCORES_FILE),
    }
}

impl HighScores {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Parse the file format. Malformed lines are skipped.
    pub fn parse(contents: &str, capacity: usize) -> Self {
        let mut table = Self::new(capacity);
        for line in contents.lines() {
            let mut parts = line.split_whitespace();
            let parsed = match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(score), None) => score.parse::<u32>().ok().map(|score| HighScore {
                    name: name.to_string(),
                    score,
                }),
                _ => None,
            };
            match parsed {
                Some(entry) => table.entries.push(entry),
                None if line.trim().is_empty() => {}
                None => debug!("skipping high-score line {line:?}"),
            }
        }
        table.normalize();
        table
    }

    /// Load from `path`. A missing file is an empty table.
    pub fn load(path: &Path, capacity: usize) -> io::Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents, capacity)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::new(capacity)),
            Err(err) => Err(err),
        }
    }

    /// Like [`HighScores::load`], but an unreadable file is logged and
    /// treated as empty.
    pub fn load_or_empty(path: &Path, capacity: usize) -> Self {
        Self::load(path, capacity).unwrap_or_else(|err| {
            warn!("could not read high scores from {}: {err}", path.display());
            Self::new(capacity)
        })
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_file_string())
    }

    pub fn to_file_string(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{} {}\n", entry.name, entry.score))
            .collect()
    }

    pub fn entries(&self) -> &[HighScore] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// A positive score enters the table while it has room, or when it
    /// strictly beats the lowest entry.
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < self.capacity {
            return true;
        }
        self.entries.last().is_some_and(|lowest| score > lowest.score)
    }

    /// Insert an entry. Returns its rank (0-based) if it made the table.
    pub fn insert(&mut self, name: &str, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        // Ties go after existing entries.
        let rank = self
            .entries
            .iter()
            .position(|entry| entry.score < score)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            rank,
            HighScore {
                name: name.to_string(),
                score,
            },
        );
        self.entries.truncate(self.capacity);
        Some(rank)
    }

    fn normalize(&mut self) {
        // Stable sort keeps file order among equal scores.
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(self.capacity);
    }
}

/// Apply one key to a name being typed: uppercase alphanumerics up to
/// `max_len`. Returns whether the name changed.
pub fn push_name_char(name: &mut String, ch: char, max_len: usize) -> bool {
    if !ch.is_ascii_alphanumeric() || name.chars().count() >= max_len {
        return false;
    }
    name.push(ch.to_ascii_uppercase());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sorts_truncates_and_skips_garbage() {
        let table = HighScores::parse("AAA 10\nnot a line\nBBB 300\n\nCCC x\nDDD 50\n", 2);
        let names: Vec<_> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["BBB", "DDD"]);
    }

    #[test]
    fn qualification_rule() {
        let mut table = HighScores::new(2);
        assert!(!table.qualifies(0));
        assert!(table.qualifies(1));

        table.insert("AAA", 100);
        table.insert("BBB", 50);
        assert!(!table.qualifies(50));
        assert!(table.qualifies(51));
    }

    #[test]
    fn insert_ranks_and_truncates() {
        let mut table = HighScores::new(3);
        assert_eq!(table.insert("AAA", 100), Some(0));
        assert_eq!(table.insert("BBB", 300), Some(0));
        assert_eq!(table.insert("CCC", 100), Some(2));
        assert_eq!(table.insert("DDD", 200), Some(1));
        assert_eq!(table.insert("EEE", 10), None);

        assert_eq!(table.to_file_string(), "BBB 300\nDDD 200\nAAA 100\n");
    }

    #[test]
    fn name_entry_rules() {
        let mut name = String::new();
        assert!(push_name_char(&mut name, 'a', 3));
        assert!(!push_name_char(&mut name, '!', 3));
        assert!(push_name_char(&mut name, '7', 3));
        assert!(push_name_char(&mut name, 'z', 3));
        assert!(!push_name_char(&mut name, 'q', 3));
        assert_eq!(name, "A7Z");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.txt");

        assert!(HighScores::load(&path, 5).unwrap().entries().is_empty());

        let mut table = HighScores::new(5);
        table.insert("AB", 1200);
        table.insert("XYZ", 40);
        table.save(&path).unwrap();

        let loaded = HighScores::load(&path, 5).unwrap();
        assert_eq!(loaded, table);
    }
}
