//! Lyrics text processing — runs before any text reaches the fitting engine.
//!
//! - `normalize_lyrics`: line-ending and trailing-whitespace cleanup for raw input.
//! - `format_verses`: groups unbroken lyrics into 4-line verses.
//! - `extract_trailing_note`: splits a closing `( ... )` block off as a note.
//! - `split_page_breaks`: cuts prayer text into one segment per slide.

/// Strips `\r`, expands literal `\n` escapes and trims trailing whitespace per line.
pub fn normalize_lyrics(raw: &str) -> String {
    let mut text = raw.replace('\r', "");
    if text.contains("\\n") {
        text = text.replace("\\n", "\n");
    }
    text.split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

const VERSE_LINES: usize = 4;

/// Groups lyrics into verses of four lines separated by a blank line.
///
/// Text that already contains a blank line is returned as-is (minus `\r`);
/// the author's own verse breaks win.
pub fn format_verses(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let text = raw.replace('\r', "");
    if has_interior_blank_line(&text) {
        return text;
    }

    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() <= VERSE_LINES {
        return lines.join("\n");
    }

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + lines.len() / VERSE_LINES);
    for (i, line) in lines.iter().enumerate() {
        out.push(line);
        if (i + 1) % VERSE_LINES == 0 && i != lines.len() - 1 {
            out.push("");
        }
    }
    out.join("\n")
}

/// True when two newlines are separated only by whitespace.
fn has_interior_blank_line(text: &str) -> bool {
    let lines: Vec<&str> = text.split('\n').collect();
    lines.len() > 2
        && lines[1..lines.len() - 1]
            .iter()
            .any(|l| l.trim().is_empty())
}

/// Lyrics split into the main body and an optional trailing note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSplit {
    pub main: String,
    pub note: String,
}

/// Splits a trailing parenthesised block off the text.
///
/// `"Om Sai Ram\n(repeat twice)"` → main `"Om Sai Ram"`, note `"repeat twice"`.
/// The block is delimited by the `(` that balances the final `)`, so nested
/// parentheses stay inside the note. Unbalanced text has no note.
pub fn extract_trailing_note(text: &str) -> NoteSplit {
    let no_note = || NoteSplit {
        main: text.to_string(),
        note: String::new(),
    };

    let trimmed = text.trim_end();
    if !trimmed.ends_with(')') {
        return no_note();
    }

    let mut depth = 0usize;
    let mut open_at = None;
    for (idx, c) in trimmed.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    open_at = Some(idx);
                    break;
                }
            }
            _ => {}
        }
    }

    match open_at {
        Some(start) => NoteSplit {
            main: text[..start].trim_end().to_string(),
            note: trimmed[start + 1..trimmed.len() - 1].trim().to_string(),
        },
        None => no_note(),
    }
}

/// Splits prayer text on page-break markers into per-slide segments.
///
/// Recognised markers (case-insensitive, whitespace allowed inside brackets,
/// `_` or whitespace between the words): `[[PAGE BREAK]]`, `[PAGE_BREAK]`, etc.
/// Lines that hold only `[]`, `[[` or `]]` are dropped. Each non-empty segment is
/// passed through `format_verses`. Always returns at least one segment.
pub fn split_page_breaks(raw: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    let mut rest = raw;
    let mut current = String::new();

    while let Some(open) = rest.find('[') {
        match match_page_break(&rest[open..]) {
            Some(len) => {
                current.push_str(&rest[..open]);
                segments.push(std::mem::take(&mut current));
                rest = &rest[open + len..];
            }
            None => {
                current.push_str(&rest[..=open]);
                rest = &rest[open + 1..];
            }
        }
    }
    current.push_str(rest);
    segments.push(current);

    let parts: Vec<String> = segments
        .iter()
        .map(|s| strip_bracket_lines(s))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| format_verses(&s))
        .collect();

    if parts.is_empty() {
        vec![String::new()]
    } else {
        parts
    }
}

/// Byte length of a page-break marker at the start of `s`, if there is one.
fn match_page_break(s: &str) -> Option<usize> {
    // Double brackets take precedence so `[[PAGE BREAK]]` is consumed whole.
    match_marker(s, 2).or_else(|| match_marker(s, 1))
}

fn match_marker(s: &str, brackets: usize) -> Option<usize> {
    let mut pos = 0;
    for _ in 0..brackets {
        if !s[pos..].starts_with('[') {
            return None;
        }
        pos += 1;
    }
    pos += leading_len(&s[pos..], char::is_whitespace);
    pos += keyword_len(&s[pos..], "page")?;
    pos += leading_len(&s[pos..], |c| c.is_whitespace() || c == '_');
    pos += keyword_len(&s[pos..], "break")?;
    pos += leading_len(&s[pos..], char::is_whitespace);
    for _ in 0..brackets {
        if !s[pos..].starts_with(']') {
            return None;
        }
        pos += 1;
    }
    Some(pos)
}

fn leading_len(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, c)| !pred(c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn keyword_len(s: &str, keyword: &str) -> Option<usize> {
    let head = s.get(..keyword.len())?;
    head.eq_ignore_ascii_case(keyword).then_some(keyword.len())
}

fn strip_bracket_lines(segment: &str) -> String {
    segment
        .split('\n')
        .map(|l| if matches!(l, "[]" | "[[" | "]]") { "" } else { l })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Appends a `" (i/n)"` counter to multi-part headers.
pub fn part_header(title: &str, part: usize, parts: usize) -> String {
    if parts > 1 {
        format!("{title} ({}/{parts})", part + 1)
    } else {
        title.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_cr_and_trailing_space() {
        assert_eq!(normalize_lyrics("Om Sai  \r\nRam\t\r\n"), "Om Sai\nRam\n");
    }

    #[test]
    fn test_normalize_expands_escaped_newlines() {
        assert_eq!(normalize_lyrics("Jai\\nGuru\\nDeva"), "Jai\nGuru\nDeva");
    }

    #[test]
    fn test_format_verses_short_text_is_trimmed_only() {
        assert_eq!(format_verses("  a \n\nb"), "  a \n\nb");
        assert_eq!(format_verses(" a \n b \n c "), "a\nb\nc");
    }

    #[test]
    fn test_format_verses_groups_by_four() {
        let raw = "1\n2\n3\n4\n5\n6\n7\n8\n9";
        assert_eq!(format_verses(raw), "1\n2\n3\n4\n\n5\n6\n7\n8\n\n9");
    }

    #[test]
    fn test_format_verses_no_trailing_blank_on_exact_multiple() {
        let raw = "1\n2\n3\n4\n5\n6\n7\n8";
        assert_eq!(format_verses(raw), "1\n2\n3\n4\n\n5\n6\n7\n8");
    }

    #[test]
    fn test_format_verses_keeps_existing_verse_breaks() {
        let raw = "1\n2\n3\n4\n5\n \n6";
        assert_eq!(format_verses(raw), raw);
    }

    #[test]
    fn test_format_verses_trailing_newline_is_not_a_verse_break() {
        // A single trailing newline must not count as a blank line.
        assert_eq!(format_verses("1\n2\n3\n4\n5\n"), "1\n2\n3\n4\n\n5");
    }

    #[test]
    fn test_extract_trailing_note() {
        let split = extract_trailing_note("Om Sai Ram\nSai Ram\n( repeat twice )  \n");
        assert_eq!(split.main, "Om Sai Ram\nSai Ram");
        assert_eq!(split.note, "repeat twice");
    }

    #[test]
    fn test_extract_trailing_note_nested_parens() {
        let split = extract_trailing_note("Govinda (Hari) Gopala (sing (slowly))");
        assert_eq!(split.main, "Govinda (Hari) Gopala");
        assert_eq!(split.note, "sing (slowly)");
    }

    #[test]
    fn test_extract_trailing_note_ignores_earlier_parens() {
        let split = extract_trailing_note("Govinda (Hari) Gopala (sing)");
        assert_eq!(split.main, "Govinda (Hari) Gopala");
        assert_eq!(split.note, "sing");
    }

    #[test]
    fn test_extract_without_note() {
        let split = extract_trailing_note("Govinda (Hari) Gopala");
        assert_eq!(split.main, "Govinda (Hari) Gopala");
        assert!(split.note.is_empty());
        assert_eq!(extract_trailing_note("").note, "");
    }

    #[test]
    fn test_extract_unbalanced_closing_paren() {
        let split = extract_trailing_note("Sai)");
        assert_eq!(split.main, "Sai)");
        assert!(split.note.is_empty());
    }

    #[test]
    fn test_split_page_breaks_variants() {
        let raw = "A\n[[PAGE BREAK]]\nB\n[page_break]\nC\n[[ Page   Break ]]\nD";
        assert_eq!(split_page_breaks(raw), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_split_page_breaks_multiline_marker() {
        assert_eq!(split_page_breaks("A[[\nPAGE BREAK\n]]B"), vec!["A", "B"]);
    }

    #[test]
    fn test_split_page_breaks_drops_empty_segments() {
        let raw = "[[PAGE BREAK]]\nA\n[[PAGE BREAK]][[PAGE BREAK]]\nB\n[[PAGE BREAK]]";
        assert_eq!(split_page_breaks(raw), vec!["A", "B"]);
    }

    #[test]
    fn test_split_page_breaks_strips_bracket_lines() {
        let raw = "A\n[[\n]]\nB";
        assert_eq!(split_page_breaks(raw), vec!["A\n\n\nB"]);
    }

    #[test]
    fn test_split_page_breaks_keeps_other_brackets() {
        assert_eq!(split_page_breaks("[Chorus] Om"), vec!["[Chorus] Om"]);
        assert_eq!(split_page_breaks("[PAGE"), vec!["[PAGE"]);
    }

    #[test]
    fn test_split_page_breaks_empty_input() {
        assert_eq!(split_page_breaks(""), vec![String::new()]);
        assert_eq!(split_page_breaks("[[PAGE BREAK]]"), vec![String::new()]);
    }

    #[test]
    fn test_split_page_breaks_formats_verses() {
        let raw = "1\n2\n3\n4\n5\n[[PAGE BREAK]]\n6";
        assert_eq!(split_page_breaks(raw), vec!["1\n2\n3\n4\n\n5", "6"]);
    }

    #[test]
    fn test_part_header() {
        assert_eq!(part_header("Gayatri", 0, 1), "Gayatri");
        assert_eq!(part_header("Gayatri", 1, 3), "Gayatri (2/3)");
    }
}
