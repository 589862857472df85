//! Response chunking for the transport's per-message size limit.
//!
//! Cuts fall on fixed character offsets. A cut may land inside a grapheme
//! cluster (e.g. between an emoji and its modifier); chunk contents are
//! part of the observable output, so no boundary detection is attempted.

/// Split `text` into ordered chunks of at most `max_chunk_size` characters.
///
/// Text that already fits (including empty text) yields a single chunk.
/// A `max_chunk_size` of zero is treated as one.
pub fn split(text: &str, max_chunk_size: usize) -> Vec<String> {
    let max = max_chunk_size.max(1);
    if text.chars().count() <= max {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    #[test]
    fn test_short_text_single_chunk() {
        assert_eq!(split("hello", 4000), vec!["hello"]);
    }

    #[test]
    fn test_empty_text_single_chunk() {
        assert_eq!(split("", 10), vec![""]);
    }

    #[test]
    fn test_exact_limit_single_chunk() {
        let text = "a".repeat(4000);
        assert_eq!(split(&text, 4000), vec![text]);
    }

    #[test]
    fn test_9000_chars_gives_4000_4000_1000() {
        let text: String = (0..9000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = split(&text, 4000);

        let lens: Vec<usize> = chunks.iter().map(|c| char_len(c)).collect();
        assert_eq!(lens, vec![4000, 4000, 1000]);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_concatenation_and_count_properties() {
        let samples = [
            "x".repeat(1),
            "hello world, this is a longer text".to_string(),
            "line\n".repeat(37),
            "héllo wörld ".repeat(11),
            "日本語のテキスト".repeat(9),
        ];

        for text in &samples {
            for max in 1..=17 {
                let chunks = split(text, max);
                let len = char_len(text);
                let expected = if len == 0 { 1 } else { len.div_ceil(max) };

                assert_eq!(chunks.concat(), *text, "max={max}");
                assert_eq!(chunks.len(), expected, "max={max}");
                for chunk in &chunks[..chunks.len() - 1] {
                    assert_eq!(char_len(chunk), max);
                }
                assert!(char_len(chunks.last().unwrap()) <= max);
            }
        }
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "ü".repeat(10); // 20 bytes
        let chunks = split(&text, 4);
        assert_eq!(chunks, vec!["üüüü", "üüüü", "üü"]);
    }

    #[test]
    fn test_fixed_cut_may_split_grapheme_cluster() {
        // Thumbs up + skin tone modifier: two chars, one grapheme.
        let text = "ab\u{1F44D}\u{1F3FD}";
        let chunks = split(text, 3);
        assert_eq!(chunks, vec!["ab\u{1F44D}", "\u{1F3FD}"]);
    }

    #[test]
    fn test_zero_limit_treated_as_one() {
        assert_eq!(split("abc", 0), vec!["a", "b", "c"]);
    }
}
