#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// `.`, `!` or `?` followed by whitespace or the end of the text.
    Sentence,
    Paragraph,
    Line,
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryRule {
    pub boundary: Boundary,
    pub window: usize,
}

pub const BOUNDARY_RULES: [BoundaryRule; 4] = [
    BoundaryRule {
        boundary: Boundary::Sentence,
        window: 200,
    },
    BoundaryRule {
        boundary: Boundary::Paragraph,
        window: 200,
    },
    BoundaryRule {
        boundary: Boundary::Line,
        window: 100,
    },
    BoundaryRule {
        boundary: Boundary::Word,
        window: 50,
    },
];

impl Boundary {
    fn cut_after(self, chars: &[char], index: usize) -> Option<usize> {
        let current = chars[index];
        let next = chars.get(index + 1).copied();
        match self {
            Boundary::Sentence => (matches!(current, '.' | '!' | '?')
                && next.map_or(true, char::is_whitespace))
            .then_some(index + 1),
            Boundary::Paragraph => (current == '\n' && next == Some('\n')).then_some(index + 2),
            Boundary::Line => (current == '\n').then_some(index + 1),
            Boundary::Word => current.is_whitespace().then_some(index + 1),
        }
    }
}

impl BoundaryRule {
    pub fn find(&self, chars: &[char], start: usize, end: usize) -> Option<usize> {
        let end = end.min(chars.len());
        let floor = start.max(end.saturating_sub(self.window));
        ((floor + 1)..end)
            .rev()
            .find_map(|index| self.boundary.cut_after(chars, index))
    }
}

pub fn find_break(chars: &[char], start: usize, end: usize) -> usize {
    let end = end.min(chars.len());
    BOUNDARY_RULES
        .iter()
        .find_map(|rule| rule.find(chars, start, end))
        .unwrap_or(end)
}

pub fn split_with_overlap(content: &str, available_chars: usize, overlap_size: usize) -> Vec<String> {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= available_chars {
        let trimmed = content.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    }

    let available_chars = available_chars.max(1);
    let mut segments = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = start + available_chars;
        if end < chars.len() {
            end = find_break(&chars, start, end);
        }
        let end = end.min(chars.len());

        let segment: String = chars[start..end].iter().collect();
        let segment = segment.trim();
        if !segment.is_empty() {
            segments.push(segment.to_string());
        }

        if end >= chars.len() {
            break;
        }
        start = (start + 1).max(end.saturating_sub(overlap_size));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn short_content_is_a_single_trimmed_segment() {
        let segments = split_with_overlap("  Hello world.  ", 100, 20);
        assert_eq!(segments, vec!["Hello world.".to_string()]);
    }

    #[test]
    fn blank_content_has_no_segments() {
        assert!(split_with_overlap("   \n\n ", 100, 20).is_empty());
        assert!(split_with_overlap("", 100, 20).is_empty());
    }

    #[test]
    fn prose_under_budget_is_not_split() {
        let content = "word ".repeat(960);
        assert_eq!(content.len(), 4_800);

        let segments = split_with_overlap(&content, 5_000, 200);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn sentence_boundary_wins_near_the_cut() {
        let lead = "a".repeat(4_890);
        let content = format!(
            "{lead} done. Next part starts here\n\n{}",
            "b ".repeat(550)
        );
        assert!(content.chars().count() > 5_000);

        let segments = split_with_overlap(&content, 5_000, 200);

        assert!(segments[0].ends_with("done."));
        let break_point = lead.len() + " done.".len();
        let expected_start: String = content.chars().skip(break_point - 200).collect();
        assert!(expected_start.starts_with(&segments[1]));
    }

    #[test]
    fn rule_priority_is_sentence_paragraph_line_word() {
        let kinds: Vec<_> = BOUNDARY_RULES.iter().map(|rule| rule.boundary).collect();
        assert_eq!(
            kinds,
            vec![
                Boundary::Sentence,
                Boundary::Paragraph,
                Boundary::Line,
                Boundary::Word
            ]
        );
        let windows: Vec<_> = BOUNDARY_RULES.iter().map(|rule| rule.window).collect();
        assert_eq!(windows, vec![200, 200, 100, 50]);
    }

    #[test]
    fn sentence_requires_trailing_whitespace() {
        let text = chars("v1.2 is out");
        assert_eq!(BOUNDARY_RULES[0].find(&text, 0, text.len()), None);

        let text = chars("done! next");
        assert_eq!(BOUNDARY_RULES[0].find(&text, 0, text.len()), Some(5));
    }

    #[test]
    fn paragraph_break_cuts_after_blank_line() {
        let text = chars("first part\n\nsecond part");
        assert_eq!(find_break(&text, 0, text.len()), 12);
    }

    #[test]
    fn line_break_beats_word_boundary() {
        let text = chars("alpha beta\ngamma delta");
        assert_eq!(find_break(&text, 0, text.len()), 11);
    }

    #[test]
    fn word_boundary_is_limited_to_fifty_chars() {
        let text = chars(&format!("head {}", "x".repeat(60)));
        assert_eq!(BOUNDARY_RULES[3].find(&text, 0, text.len()), None);
        assert_eq!(find_break(&text, 0, text.len()), text.len());

        let text = chars(&format!("head {}", "x".repeat(40)));
        assert_eq!(find_break(&text, 0, text.len()), 5);
    }

    #[test]
    fn cut_past_the_text_is_clamped() {
        let text = chars("done! next");

        assert_eq!(BOUNDARY_RULES[0].find(&text, 0, 100), Some(5));
        assert_eq!(BOUNDARY_RULES[3].find(&text, 0, 100), Some(6));

        let text = chars("unbroken");
        assert_eq!(find_break(&text, 0, 500), text.len());
    }

    #[test]
    fn search_never_crosses_segment_start() {
        let text = chars("a. bcdefghij");
        assert_eq!(find_break(&text, 2, text.len()), text.len());
    }

    #[test]
    fn unbroken_text_is_hard_cut_with_overlap() {
        let content = "x".repeat(250);
        let segments = split_with_overlap(&content, 100, 10);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].len(), 100);
        assert_eq!(segments[1].len(), 100);
        assert_eq!(segments[2].len(), 70);
    }

    #[test]
    fn overlap_larger_than_budget_still_progresses() {
        let content = "y".repeat(30);
        let segments = split_with_overlap(&content, 10, 50);

        // start advances by one every round
        assert_eq!(segments.len(), 21);
        assert!(segments.iter().all(|segment| segment.len() <= 10));
    }

    #[test]
    fn segments_cover_the_content_once_overlap_is_removed() {
        let content: String = (0..60)
            .map(|index| format!("Sentence number {index} ends here. "))
            .collect();

        let segments = split_with_overlap(&content, 300, 30);
        assert!(segments.len() > 1);

        let mut covered = 0;
        for segment in &segments {
            let position = content
                .find(segment.as_str())
                .expect("segment comes from the content");
            assert!(position <= covered + 1, "gap before offset {position}");
            covered = covered.max(position + segment.len());
        }
        assert_eq!(covered, content.trim_end().len());
    }

    #[test]
    fn multibyte_text_is_split_on_char_boundaries() {
        let content = "größe ".repeat(100);
        let segments = split_with_overlap(&content, 64, 8);

        assert!(segments.len() > 1);
        assert!(segments.iter().all(|segment| segment.chars().count() <= 64));
    }
}
