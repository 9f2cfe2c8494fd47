//! Catalog Import — builds catalog bhajans from a raw numbered songbook dump.
//!
//! Input is plain text where each song starts on a line like `29.` or `5A.`.
//! Each block is cleaned line by line: bare numbers, separator rules and
//! English translation lines are dropped, whitespace is collapsed and adjacent
//! duplicates are removed. The first surviving line becomes the title.

use tracing::debug;

use crate::deck::worklist::{Catalog, CatalogBhajan};

pub const DEFAULT_STARTING_ID: u32 = 1;

const ENGLISH_STOPWORDS: &[&str] = &[
    "the", "is", "a", "an", "and", "or", "to", "of", "in", "that", "this", "who", "which", "we",
    "you", "he", "she", "it", "they", "them", "their", "our", "for", "with", "on", "by", "as",
    "at", "from", "be", "are", "was", "were", "have", "has", "had", "do", "did", "does", "will",
    "would", "can", "could", "may", "might", "shall", "should", "not", "but", "so", "if", "when",
    "where", "how", "what", "why", "your", "i", "me", "my", "his", "her", "its", "these",
    "those", "also", "please", "sing", "singing", "today", "present", "bring", "victory", "lord",
];

/// Parses a raw songbook dump into catalog bhajans with sequential ids.
///
/// Lyrics lines are joined with a literal `\n` escape, the form the planner's
/// `normalize_lyrics` expands. Blocks with no lyric lines left are skipped
/// without consuming an id.
pub fn import_bhajans(raw: &str, starting_id: u32) -> Vec<CatalogBhajan> {
    let mut out = Vec::new();
    let mut next_id = starting_id;

    for (idx, block) in split_numbered_blocks(raw).into_iter().enumerate() {
        let lines = clean_block(block);
        let Some(title) = lines.first() else {
            debug!(block = idx, "Skipping block with no lyric lines");
            continue;
        };
        out.push(CatalogBhajan {
            id: next_id.to_string(),
            title: title.clone(),
            lyrics: lines.join("\\n"),
        });
        next_id = next_id.saturating_add(1);
    }
    out
}

pub fn import_catalog(raw: &str, starting_id: u32) -> Catalog {
    Catalog {
        bhajans: import_bhajans(raw, starting_id),
        prayers: Vec::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Block splitting
// ────────────────────────────────────────────────────────────────────────────

/// Splits on song markers (`29.`, `1A.`) at the start of a line.
///
/// The marker may be preceded by whitespace (blank lines included) and is
/// consumed together with any whitespace after it. Empty blocks are dropped;
/// the rest are trimmed.
pub fn split_numbered_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut block_start = 0;
    let mut pos = 0;

    while pos <= text.len() {
        let at_line_start = pos == 0 || text.as_bytes()[pos - 1] == b'\n';
        if at_line_start {
            if let Some(len) = match_marker(&text[pos..]) {
                blocks.push(&text[block_start..pos]);
                pos += len;
                block_start = pos;
                continue;
            }
        }
        match text[pos..].find('\n') {
            Some(nl) => pos += nl + 1,
            None => break,
        }
    }
    blocks.push(&text[block_start..]);

    blocks
        .into_iter()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .collect()
}

/// Byte length of a `<ws>*<digits>+<word>*.<ws>*` marker at the start of `s`.
fn match_marker(s: &str) -> Option<usize> {
    let mut pos = leading_len(s, char::is_whitespace);
    let digits = leading_len(&s[pos..], |c| c.is_ascii_digit());
    if digits == 0 {
        return None;
    }
    pos += digits;
    pos += leading_len(&s[pos..], is_word_char);
    if !s[pos..].starts_with('.') {
        return None;
    }
    pos += 1;
    pos += leading_len(&s[pos..], char::is_whitespace);
    Some(pos)
}

fn leading_len(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, c)| !pred(c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// ────────────────────────────────────────────────────────────────────────────
// Line cleaning
// ────────────────────────────────────────────────────────────────────────────

/// Lyric lines of one block, in order, with adjacent duplicates removed.
pub fn clean_block(block: &str) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();

    for raw_line in block.lines() {
        let bare = raw_line.trim();
        if !bare.is_empty() && bare.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if bare.chars().count() >= 3 && bare.chars().all(|c| matches!(c, '_' | '-' | '=')) {
            continue;
        }

        let collapsed = raw_line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            continue;
        }
        let line = strip_trailing_number(&collapsed);

        if looks_like_translation(line) {
            continue;
        }
        if !line.chars().any(|c| c.is_alphanumeric()) {
            continue;
        }
        if cleaned.last().map(String::as_str) != Some(line) {
            cleaned.push(line.to_string());
        }
    }
    cleaned
}

/// Drops a trailing ` 29` page/song number from a whitespace-collapsed line.
fn strip_trailing_number(line: &str) -> &str {
    match line.rsplit_once(' ') {
        Some((head, tail)) if tail.chars().all(|c| c.is_ascii_digit()) => head.trim_end(),
        _ => line,
    }
}

/// Heuristic for English translation or commentary lines.
///
/// Devanagari text is always a lyric. Otherwise a line is English when it
/// has no Latin words, when it is long with at least a quarter stopwords, or
/// when it carries sentence punctuation and two or more stopwords.
pub fn looks_like_translation(line: &str) -> bool {
    let s = line.trim();
    if s.is_empty() {
        return true;
    }
    if s.chars().any(is_devanagari) {
        return false;
    }
    if s.chars().all(|c| c.is_whitespace() || matches!(c, '_' | '-' | '=' | '|')) {
        return true;
    }

    let words: Vec<&str> = s
        .split(|c: char| !(c.is_ascii_alphabetic() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return true;
    }

    let stop_count = words
        .iter()
        .filter(|w| ENGLISH_STOPWORDS.contains(&w.to_lowercase().as_str()))
        .count();
    let frac = stop_count as f32 / words.len() as f32;

    if words.len() >= 6 && frac >= 0.25 {
        return true;
    }
    s.contains([';', ',', '.']) && stop_count >= 2
}

fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::lyrics::normalize_lyrics;

    const RAW: &str = "\
Songbook 2026
1. Om Sai Ram
Om Sai Ram
Sai Ram Sai Ram 12
We bow to the Lord, who is the light of the world.
-----

29A.  Govinda Gopala
Govinda Hari Gopala
29
3.
______
";

    #[test]
    fn test_split_numbered_blocks() {
        let blocks = split_numbered_blocks(RAW);
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0], "Songbook 2026");
        assert!(blocks[1].starts_with("Om Sai Ram\nOm Sai Ram"));
        assert!(blocks[1].ends_with("-----"));
        // "29" has no dot, so it stays inside the block; "3." is a marker.
        assert_eq!(blocks[2], "Govinda Gopala\nGovinda Hari Gopala\n29");
        assert_eq!(blocks[3], "______");
    }

    #[test]
    fn test_marker_must_start_a_line() {
        let blocks = split_numbered_blocks("Sing 108. times\n  7. Jai");
        assert_eq!(blocks, vec!["Sing 108. times", "Jai"]);
        assert_eq!(split_numbered_blocks("12 Om\n"), vec!["12 Om"]);
        assert!(split_numbered_blocks("").is_empty());
    }

    #[test]
    fn test_clean_block_drops_noise_and_adjacent_duplicates() {
        let block = "Om Sai Ram\nOm   Sai Ram\nSai Ram Sai Ram 12\n42\n=====\n...\nOm Sai Ram";
        assert_eq!(
            clean_block(block),
            vec!["Om Sai Ram", "Sai Ram Sai Ram", "Om Sai Ram"]
        );
    }

    #[test]
    fn test_translation_heuristic() {
        assert!(looks_like_translation(
            "We bow to the Lord, who is the light of the world."
        ));
        assert!(looks_like_translation("O mind, sing the name of the Lord today"));
        assert!(looks_like_translation("|| -- ||"));
        assert!(looks_like_translation("123 456"));
        assert!(!looks_like_translation("Govinda Hari Gopala"));
        assert!(!looks_like_translation("Hari Om Tat Sat, Jai Guru Datta"));
        // Devanagari always wins.
        assert!(!looks_like_translation("ॐ the and of to in"));
    }

    #[test]
    fn test_import_assigns_sequential_ids_and_skips_empty_blocks() {
        let bhajans = import_bhajans(RAW, 7);
        let ids: Vec<&str> = bhajans.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "8", "9"]);
        // Trailing numbers are page references, even on the preamble.
        assert_eq!(bhajans[0].title, "Songbook");
        assert_eq!(bhajans[1].title, "Om Sai Ram");
        assert_eq!(bhajans[1].lyrics, "Om Sai Ram\\nSai Ram Sai Ram");
        assert_eq!(bhajans[2].title, "Govinda Gopala");
        assert_eq!(bhajans[2].lyrics, "Govinda Gopala\\nGovinda Hari Gopala");
    }

    #[test]
    fn test_imported_lyrics_expand_for_the_planner() {
        let catalog = import_catalog("1. Jai Guru\nJai Jai Guru", DEFAULT_STARTING_ID);
        let bhajan = catalog.find_bhajan("1").unwrap();
        assert_eq!(normalize_lyrics(&bhajan.lyrics), "Jai Guru\nJai Jai Guru");
        assert!(catalog.prayers.is_empty());
    }

    #[test]
    fn test_imported_catalog_round_trips_through_json() {
        let catalog = import_catalog("1. Jai Guru\nJai Jai Guru\n2. Sai Ram", 1);
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
    }
}
