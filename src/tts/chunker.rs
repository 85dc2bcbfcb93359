use lazy_static::lazy_static;
use regex::Regex;

/// Longest text the synthesis endpoint accepts in one request.
pub const MAX_CHUNK_CHARS: usize = 100;

lazy_static! {
    // A match ends where a chunk may end. Latin punctuation only counts when
    // whitespace or the end of the text follows, so "3.14", "$1,000",
    // "10:30" and host names stay whole.
    static ref SENTENCE_END: Regex = Regex::new(
        r"(?x)
        [.!?;:,…]+(?:\s+|$)     # Latin sentence or clause punctuation
        | [。！？；：、，]+\s*    # CJK punctuation, no space needed
        | \n\s*                  # Line breaks
        "
    )
    .unwrap();
}

/// Split text into pieces of at most `MAX_CHUNK_CHARS` characters.
///
/// Every chunk is a verbatim slice of the trimmed input. Breaks fall on
/// punctuation where possible, then on whitespace, and only split inside a
/// word when the word alone is too long. Short neighbouring sentences are
/// packed into the same chunk.
pub fn chunk(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        if rest.chars().count() <= MAX_CHUNK_CHARS {
            chunks.push(rest.to_string());
            break;
        }

        let (head, tail) = rest.split_at(cut_point(rest));
        let head = head.trim_end();
        if !head.is_empty() {
            chunks.push(head.to_string());
        }
        rest = tail.trim_start();
    }

    chunks
}

/// Byte offset of the furthest break that keeps the head within the limit.
/// `text` must be longer than `MAX_CHUNK_CHARS`, so the result is never zero.
fn cut_point(text: &str) -> usize {
    let limit = text
        .char_indices()
        .nth(MAX_CHUNK_CHARS)
        .map_or(text.len(), |(i, _)| i);

    let sentence = SENTENCE_END
        .find_iter(text)
        .take_while(|m| m.start() < limit)
        .filter(|m| text[..m.end()].trim_end().len() <= limit)
        .map(|m| m.end())
        .last();
    if let Some(end) = sentence {
        return end;
    }

    let space = text
        .char_indices()
        .take_while(|&(i, _)| i <= limit)
        .filter(|&(i, c)| i > 0 && c.is_whitespace())
        .map(|(i, _)| i)
        .last();

    space.unwrap_or(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        assert_eq!(chunk("Hello world"), vec!["Hello world"]);
    }

    #[test]
    fn test_short_sentences_packed() {
        assert_eq!(chunk("Hi. How are you?"), vec!["Hi. How are you?"]);
    }

    #[test]
    fn test_breaks_on_sentence_boundary() {
        let first = format!("{}.", "a".repeat(60));
        let second = format!("{}.", "b".repeat(60));
        let chunks = chunk(&format!("{} {}", first, second));
        assert_eq!(chunks, vec![first, second]);
    }

    #[test]
    fn test_long_sentence_split_on_whitespace() {
        let text = vec!["word"; 60].join(" ");
        let chunks = chunk(&text);
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.chars().count() <= MAX_CHUNK_CHARS);
            assert!(!c.starts_with(' ') && !c.ends_with(' '));
        }
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_long_word_hard_split() {
        let chunks = chunk(&"x".repeat(250));
        let lens: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
        assert_eq!(lens, vec![100, 100, 50]);
    }

    #[test]
    fn test_multibyte_counts_characters() {
        let chunks = chunk(&"語".repeat(150));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 100);
    }

    #[test]
    fn test_punctuation_only_is_kept() {
        assert_eq!(chunk("..."), vec!["..."]);
    }

    #[test]
    fn test_empty_input() {
        assert!(chunk("").is_empty());
        assert!(chunk("   \n ").is_empty());
    }

    #[test]
    fn test_numbers_kept_intact() {
        assert_eq!(chunk("It costs $1,000."), vec!["It costs $1,000."]);
        assert_eq!(chunk("Pi is 3.14"), vec!["Pi is 3.14"]);
        assert_eq!(chunk("Meet at 10:30, ok?"), vec!["Meet at 10:30, ok?"]);
        assert_eq!(
            chunk("See www.example.com for details."),
            vec!["See www.example.com for details."]
        );
    }

    #[test]
    fn test_inner_punctuation_survives_long_text() {
        let text = format!(
            "{} It costs $1,000 at 10:30 today. Pi is 3.14 and e is 2.71 too.",
            "filler ".repeat(12).trim_end()
        );
        let chunks = chunk(&text);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.join(" "), text);
        assert!(chunks.iter().any(|c| c.contains("$1,000")));
        assert!(chunks.iter().any(|c| c.contains("3.14")));
    }

    #[test]
    fn test_cjk_break_inserts_nothing() {
        let first = format!("{}。", "語".repeat(60));
        let second = "語".repeat(60);
        let chunks = chunk(&format!("{}{}", first, second));
        assert_eq!(chunks, vec![first, second]);
    }

    #[test]
    fn test_short_text_returned_verbatim() {
        let text = "Hello,world!  Two  spaces\tand a tab.";
        assert_eq!(chunk(text), vec![text]);
    }
}
