//! Text Chunker
//!
//! Splits recognized page text into groups of words small enough to be
//! narrated one event at a time.

use crate::domain::models::TextChunk;

/// Words per chunk when nothing else is configured
pub const DEFAULT_GROUP_SIZE: usize = 120;

/// Stray sequences left behind by the OCR output: bullets and copyright
/// signs, both in escaped and raw form.
const ARTIFACTS: &[&str] = &["\\u2022", "\\u00a9", "\u{2022}", "\u{00a9}"];

/// Split `text` on whitespace and join every `group_size` consecutive words
/// into one chunk. The last chunk may be shorter; empty input yields no
/// chunks. A `group_size` of zero is treated as one.
pub fn chunk(text: &str, group_size: usize) -> Vec<TextChunk> {
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(group_size.max(1))
        .enumerate()
        .map(|(index, group)| TextChunk {
            index,
            text: group.join(" "),
        })
        .collect()
}

/// Replace every `\n` and `\r` with a single space
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

/// Remove known OCR artifacts from a chunk and re-collapse the spacing
pub fn strip_artifacts(text: &str) -> String {
    let mut cleaned = text.to_string();
    for artifact in ARTIFACTS {
        cleaned = cleaned.replace(artifact, " ");
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[TextChunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_groups_of_two() {
        let chunks = chunk("a b c d e", 2);
        assert_eq!(texts(&chunks), vec!["a b", "c d", "e"]);
        assert_eq!(
            chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(chunk("", 3).is_empty());
        assert!(chunk("  \t \n ", 3).is_empty());
    }

    #[test]
    fn test_chunk_count_and_word_order() {
        let words: Vec<String> = (0..257).map(|i| format!("w{}", i)).collect();
        let text = words.join(" ");

        for group_size in [1, 2, 7, 120, 256, 257, 500] {
            let chunks = chunk(&text, group_size);
            assert_eq!(chunks.len(), words.len().div_ceil(group_size));

            for c in &chunks[..chunks.len() - 1] {
                assert_eq!(c.text.split(' ').count(), group_size);
            }
            let last = chunks.last().unwrap().text.split(' ').count();
            assert!(last >= 1 && last <= group_size);

            let rejoined: Vec<&str> = chunks.iter().flat_map(|c| c.text.split(' ')).collect();
            assert_eq!(rejoined, words);
        }
    }

    #[test]
    fn test_rechunking_keeps_boundaries() {
        let text = "one two three four five six seven";
        let first = chunk(text, 3);
        let rejoined = texts(&first).join(" ");
        assert_eq!(chunk(&rejoined, 3), first);
    }

    #[test]
    fn test_zero_group_size() {
        assert_eq!(texts(&chunk("x y", 0)), vec!["x", "y"]);
    }

    #[test]
    fn test_line_breaks_become_spaces() {
        let normalized = normalize_line_breaks("Hello\nworld\r\nfoo");
        assert_eq!(normalized, "Hello world  foo");
        assert_eq!(texts(&chunk(&normalized, DEFAULT_GROUP_SIZE)), vec!["Hello world foo"]);
    }

    #[test]
    fn test_strip_artifacts() {
        assert_eq!(strip_artifacts("\\u2022 first item"), "first item");
        assert_eq!(strip_artifacts("Press \u{00a9} 2019"), "Press 2019");
        assert_eq!(strip_artifacts("a\u{2022}b"), "a b");
        assert_eq!(strip_artifacts("\\u00a9"), "");
        assert_eq!(strip_artifacts("plain text"), "plain text");
    }
}
