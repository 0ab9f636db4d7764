//! Blanks rendering: the masked view of the secret word.
//!
//! Positions are character indices (not byte offsets), so words with
//! non-ASCII letters stay addressable by the hint picker.

/// Renders a secret word as a blanks string.
///
/// One cell per character, cells joined by single spaces. A cell shows
/// the original character when its position is in `revealed` or when the
/// character is not alphabetic (spaces, hyphens, apostrophes stay
/// visible); every other letter is masked as `_`.
pub fn render(word: &str, revealed: &[usize]) -> String {
    word.chars()
        .enumerate()
        .map(|(i, ch)| {
            if revealed.contains(&i) || !ch.is_alphabetic() {
                ch.to_string()
            } else {
                "_".to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Character positions that are still maskable: alphabetic and not yet
/// revealed. The hint picker draws uniformly from this set.
pub fn hidden_letter_positions(word: &str, revealed: &[usize]) -> Vec<usize> {
    word.chars()
        .enumerate()
        .filter(|(i, ch)| ch.is_alphabetic() && !revealed.contains(i))
        .map(|(i, _)| i)
        .collect()
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_masks_all_letters() {
        assert_eq!(render("cat", &[]), "_ _ _");
    }

    #[test]
    fn test_render_two_word_phrase() {
        // 5 + 5 letters with one literal space: the space cell keeps its
        // character, so three spaces appear between the word halves.
        assert_eq!(render("hello world", &[]), "_ _ _ _ _   _ _ _ _ _");
    }

    #[test]
    fn test_render_keeps_non_letters_visible() {
        assert_eq!(render("e-mail", &[]), "_ - _ _ _ _");
        assert_eq!(render("it's", &[]), "_ _ ' _");
    }

    #[test]
    fn test_render_reveals_exactly_the_given_positions() {
        assert_eq!(render("hello", &[0, 4]), "h _ _ _ o");
        // Revealing a position twice changes nothing.
        assert_eq!(render("hello", &[0, 0, 4]), "h _ _ _ o");
    }

    #[test]
    fn test_render_preserves_cell_count() {
        let word = "straßen-bahn fahrt";
        let blanks = render(word, &[]);
        // One cell per character, separated by single spaces.
        assert_eq!(blanks.split(' ').count(), word.chars().count());
    }

    #[test]
    fn test_render_masks_non_ascii_letters() {
        // Unicode letters are letters: Ä must be masked like any other.
        assert_eq!(render("Äpfel", &[]), "_ _ _ _ _");
        assert_eq!(render("Äpfel", &[0]), "Ä _ _ _ _");
    }

    #[test]
    fn test_render_full_reveal_shows_the_word() {
        let revealed: Vec<usize> = (0..5).collect();
        assert_eq!(render("hello", &revealed), "h e l l o");
    }

    #[test]
    fn test_hidden_positions_skip_non_letters_and_revealed() {
        assert_eq!(hidden_letter_positions("a-b c", &[]), vec![0, 2, 4]);
        assert_eq!(hidden_letter_positions("a-b c", &[2]), vec![0, 4]);
    }

    #[test]
    fn test_hidden_positions_empty_when_everything_revealed() {
        assert!(hidden_letter_positions("ab", &[0, 1]).is_empty());
        assert!(hidden_letter_positions("- -", &[]).is_empty());
    }
}
