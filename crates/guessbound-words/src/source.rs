//! The three word pools and the weighted random draw.

use std::path::PathBuf;

use guessbound_protocol::Difficulty;
use rand::Rng;

/// File locations for the three newline-delimited word lists.
#[derive(Debug, Clone)]
pub struct WordListPaths {
    /// The main list; drawn 90% of the time.
    pub standard: PathBuf,
    /// Optional easier words; 5%.
    pub easy: PathBuf,
    /// Optional harder words; 5%.
    pub difficult: PathBuf,
}

impl Default for WordListPaths {
    fn default() -> Self {
        Self {
            standard: PathBuf::from("shared/wordlist.txt"),
            easy: PathBuf::from("shared/wordlist-easy.txt"),
            difficult: PathBuf::from("shared/wordlist-difficult.txt"),
        }
    }
}

/// The three immutable word pools, loaded once at startup.
///
/// Shared via `Arc` across all rooms; read-only after construction, so no
/// synchronization is needed.
#[derive(Debug, Clone)]
pub struct WordSource {
    standard: Vec<String>,
    easy: Vec<String>,
    difficult: Vec<String>,
}

impl WordSource {
    /// Loads all three lists. A missing or unreadable file degrades to an
    /// empty pool with a warning; the server still runs (explainers can
    /// always type a custom word).
    pub fn load(paths: &WordListPaths) -> Self {
        Self {
            standard: read_word_list(&paths.standard),
            easy: read_word_list(&paths.easy),
            difficult: read_word_list(&paths.difficult),
        }
    }

    /// Builds a source from in-memory pools.
    pub fn from_pools(
        standard: Vec<String>,
        easy: Vec<String>,
        difficult: Vec<String>,
    ) -> Self {
        Self {
            standard,
            easy,
            difficult,
        }
    }

    /// `true` when every pool is empty — the only case where a random
    /// word cannot be provided.
    pub fn is_empty(&self) -> bool {
        self.standard.is_empty() && self.easy.is_empty() && self.difficult.is_empty()
    }

    /// Pool sizes as (standard, easy, difficult), for startup logging.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.standard.len(), self.easy.len(), self.difficult.len())
    }

    /// Draws a random word.
    ///
    /// Pool selection: uniform `r` in `[0, 1)` — `[0, 0.90)` standard,
    /// `[0.90, 0.95)` easy, `[0.95, 1.0)` difficult. When the selected
    /// pool is empty the draw falls back difficult → standard → easy, so
    /// it only returns `None` when every pool is empty. The word is then
    /// picked uniformly within the resolved pool.
    pub fn draw(&self, rng: &mut impl Rng) -> Option<(String, Difficulty)> {
        let r: f64 = rng.random();
        let preferred = if r < 0.90 {
            Difficulty::Standard
        } else if r < 0.95 {
            Difficulty::Easy
        } else {
            Difficulty::Difficult
        };

        let (pool, difficulty) = self.resolve(preferred)?;
        let word = pool[rng.random_range(0..pool.len())].clone();
        Some((word, difficulty))
    }

    /// Resolves a preferred pool to a non-empty one, or `None` if all
    /// pools are empty.
    fn resolve(&self, preferred: Difficulty) -> Option<(&[String], Difficulty)> {
        let pool_of = |d| -> &[String] {
            match d {
                Difficulty::Standard => &self.standard,
                Difficulty::Easy => &self.easy,
                Difficulty::Difficult => &self.difficult,
                Difficulty::Custom => &[],
            }
        };

        for d in [
            preferred,
            Difficulty::Difficult,
            Difficulty::Standard,
            Difficulty::Easy,
        ] {
            let pool = pool_of(d);
            if !pool.is_empty() {
                return Some((pool, d));
            }
        }
        None
    }
}

/// Reads one newline-delimited word list: lines trimmed, blanks dropped.
fn read_word_list(path: &std::path::Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let words: Vec<String> = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect();
            tracing::info!(path = %path.display(), count = words.len(), "loaded word list");
            words
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not load word list, using empty pool");
            Vec::new()
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
