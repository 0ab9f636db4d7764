//! Word pools and blanks rendering for Guessbound.
//!
//! Two leaf concerns with no game-state knowledge:
//!
//! - [`WordSource`] — the three immutable word pools (standard, easy,
//!   difficult), loaded once at startup from newline-delimited files and
//!   shared read-only across all rooms, with the 90/5/5 weighted draw.
//! - [`blanks`] — the pure rendering of a secret word as underscores,
//!   plus the helper the hint picker uses to find maskable positions.

pub mod blanks;
mod source;

pub use source::{WordListPaths, WordSource};
