use crate::constants::answer::{BULLET_MARKERS, FOLLOW_UP_MARKERS};

/// Result of splitting raw answer text at its follow-up block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowUpExtraction {
    pub body: String,
    pub questions: Vec<String>,
}

/// Split `raw` at the last follow-up marker phrase.
///
/// Everything from the marker to the end of the text is the follow-up block;
/// list items inside it become questions (trimmed, `?`-terminated, in order).
/// The body is the text before the marker with trailing whitespace removed.
/// Without a marker the text is returned unchanged with no questions.
pub fn extract_follow_ups(raw: &str) -> FollowUpExtraction {
    let Some(start) = find_last_marker(raw) else {
        return FollowUpExtraction {
            body: raw.to_string(),
            questions: Vec::new(),
        };
    };

    let block = &raw[start..];
    FollowUpExtraction {
        body: raw[..start].trim_end().to_string(),
        questions: scan_items(block)
            .into_iter()
            .filter_map(normalize_question)
            .collect(),
    }
}

fn find_last_marker(text: &str) -> Option<usize> {
    FOLLOW_UP_MARKERS
        .iter()
        .filter_map(|marker| rfind_marker(text, marker))
        .max()
}

/// Last ASCII-case-insensitive occurrence of `marker` that starts a word.
fn rfind_marker(text: &str, marker: &str) -> Option<usize> {
    let haystack = text.as_bytes();
    let needle = marker.as_bytes();
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).rev().find(|&i| {
        haystack[i..i + needle.len()].eq_ignore_ascii_case(needle)
            && text[..i]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric())
    })
}

fn scan_items(block: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut cursor = 0;
    while let Some((marker_start, marker_len)) = next_marker(block, cursor) {
        let content_start = marker_start + marker_len;
        let content_end = item_end(block, content_start);
        items.push(&block[content_start..content_end]);
        cursor = content_end;
    }
    items
}

/// First list marker at or after `from` that begins a token.
fn next_marker(block: &str, from: usize) -> Option<(usize, usize)> {
    let mut after_space = from == 0 || block[..from].ends_with(char::is_whitespace);
    for (offset, ch) in block[from..].char_indices() {
        let pos = from + offset;
        if after_space {
            if let Some(len) = marker_len(&block[pos..]) {
                return Some((pos, len));
            }
        }
        after_space = ch.is_whitespace();
    }
    None
}

/// An item runs until the next line that opens with a marker.
fn item_end(block: &str, from: usize) -> usize {
    block[from..]
        .match_indices('\n')
        .map(|(offset, _)| from + offset)
        .find(|&newline| {
            let line = block[newline + 1..].trim_start_matches([' ', '\t']);
            marker_len(line).is_some()
        })
        .unwrap_or(block.len())
}

/// Byte length of a marker (`N.` or a bullet) and the whitespace after it.
fn marker_len(s: &str) -> Option<usize> {
    let first = s.chars().next()?;
    let after_marker = if first.is_ascii_digit() {
        let digits = s.bytes().take_while(u8::is_ascii_digit).count();
        if s.as_bytes().get(digits) != Some(&b'.') {
            return None;
        }
        digits + 1
    } else if BULLET_MARKERS.contains(&first) {
        first.len_utf8()
    } else {
        return None;
    };

    // Spacing stops at the line end so an empty item cannot swallow the next line.
    let rest = &s[after_marker..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let spacing = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    Some(after_marker + spacing)
}

fn normalize_question(item: &str) -> Option<String> {
    let question = item.trim();
    if question.is_empty() {
        None
    } else if question.ends_with('?') {
        Some(question.to_string())
    } else {
        Some(format!("{question}?"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_follow_ups() {
        let out = extract_follow_ups(
            "Intro text.\nFollow-up Questions:\n1. Is Y true\n2. What about Z?",
        );
        assert_eq!(out.body, "Intro text.");
        assert_eq!(out.questions, vec!["Is Y true?", "What about Z?"]);
    }

    #[test]
    fn test_no_marker_returns_text_unchanged() {
        let raw = "Just an answer.\n\n- with a list\n";
        let out = extract_follow_ups(raw);
        assert_eq!(out.body, raw);
        assert!(out.questions.is_empty());
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let out = extract_follow_ups("Body\nRELATED:\n* first\n* second");
        assert_eq!(out.body, "Body");
        assert_eq!(out.questions, vec!["first?", "second?"]);
    }

    #[test]
    fn test_last_marker_wins() {
        let raw = "Related: trials are discussed below.\nMore text.\nfollow up questions:\n- Next";
        let out = extract_follow_ups(raw);
        assert_eq!(out.body, "Related: trials are discussed below.\nMore text.");
        assert_eq!(out.questions, vec!["Next?"]);
    }

    #[test]
    fn test_mixed_bullets_including_unicode() {
        let out = extract_follow_ups("A\nRelated:\n• One\n- Two\n* Three?\n4. Four");
        assert_eq!(out.questions, vec!["One?", "Two?", "Three?", "Four?"]);
    }

    #[test]
    fn test_item_spans_multiple_lines() {
        let out = extract_follow_ups("A\nRelated:\n1. How does this\n   compare to B\n2. Why");
        assert_eq!(
            out.questions,
            vec!["How does this\n   compare to B?", "Why?"]
        );
    }

    #[test]
    fn test_empty_items_are_dropped() {
        let out = extract_follow_ups("A\nRelated:\n1.  \n2. Real one\n-   ");
        assert_eq!(out.questions, vec!["Real one?"]);
    }

    #[test]
    fn test_marker_without_items_still_removes_block() {
        let out = extract_follow_ups("Answer here.\n\nRelated:");
        assert_eq!(out.body, "Answer here.");
        assert!(out.questions.is_empty());
    }

    #[test]
    fn test_decimals_inside_items_do_not_split() {
        let out = extract_follow_ups("A\nRelated:\n1. Is 2.5 mg safe\n2. Is 5 mg safe");
        assert_eq!(out.questions, vec!["Is 2.5 mg safe?", "Is 5 mg safe?"]);
    }

    #[test]
    fn test_hyphenated_words_are_not_bullets() {
        let out = extract_follow_ups("A\nRelated:\n- What is long-term risk");
        assert_eq!(out.questions, vec!["What is long-term risk?"]);
    }

    #[test]
    fn test_body_and_block_reconstruct_the_input() {
        let raw = "  Lead paragraph.\n\nSecond paragraph.  \n\nRelated:\n1. Q one\n2. Q two  ";
        let out = extract_follow_ups(raw);
        let start = find_last_marker(raw).unwrap();
        let block = &raw[start..];

        let rebuilt = format!("{}\n{}", out.body, block);
        let normalize = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(normalize(&rebuilt), normalize(raw));
        assert!(!out.body.ends_with(char::is_whitespace));
    }

    #[test]
    fn test_non_ascii_text_before_marker() {
        let out = extract_follow_ups("Ärzte empfehlen İbuprofen.\nRelated:\n- Dosis");
        assert_eq!(out.body, "Ärzte empfehlen İbuprofen.");
        assert_eq!(out.questions, vec!["Dosis?"]);
    }

    #[test]
    fn test_marker_inside_a_word_is_ignored() {
        let raw = "Symptoms were unrelated: the rash resolved on its own.";
        let out = extract_follow_ups(raw);
        assert_eq!(out.body, raw);
        assert!(out.questions.is_empty());
    }

    #[test]
    fn test_marker_at_start_of_text() {
        let out = extract_follow_ups("Related:\n1. What next");
        assert_eq!(out.body, "");
        assert_eq!(out.questions, vec!["What next?"]);
    }

    #[test]
    fn test_indented_marker_line_starts_new_item() {
        let out = extract_follow_ups("A\nRelated:\n1. First\n   2. Second\n\t- Third");
        assert_eq!(out.questions, vec!["First?", "Second?", "Third?"]);
    }
}
