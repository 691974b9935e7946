//! Splitting message content into answer text and `<think>` reasoning.

const OPEN_TAG: &str = "<think>";
const CLOSE_TAG: &str = "</think>";

/// One piece of message content, in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Ordinary markdown outside any reasoning block.
    Text(String),
    /// The trimmed body of a `<think>...</think>` block.
    Reasoning(String),
}

/// Splits `raw` into text and reasoning segments.
///
/// Each `<think>` pairs with the nearest following `</think>`; a single
/// newline right after the opening tag is dropped and the body is trimmed.
/// An opening tag with no closing tag stays in the text. Empty text between
/// blocks is not emitted, so content without reasoning yields at most one
/// `Text` segment equal to the input.
pub fn split_reasoning(raw: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = raw;

    while let Some(open) = rest.find(OPEN_TAG) {
        let body_start = open + OPEN_TAG.len();
        let Some(close_rel) = rest[body_start..].find(CLOSE_TAG) else {
            break;
        };
        let close = body_start + close_rel;

        if open > 0 {
            segments.push(Segment::Text(rest[..open].to_string()));
        }
        let body = &rest[body_start..close];
        let body = body.strip_prefix('\n').unwrap_or(body);
        segments.push(Segment::Reasoning(body.trim().to_string()));

        rest = &rest[close + CLOSE_TAG.len()..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }
    segments
}

/// Whether `segments` contains at least one reasoning block.
pub fn has_reasoning(segments: &[Segment]) -> bool {
    segments
        .iter()
        .any(|segment| matches!(segment, Segment::Reasoning(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Segment {
        Segment::Text(s.to_string())
    }

    fn reasoning(s: &str) -> Segment {
        Segment::Reasoning(s.to_string())
    }

    #[test]
    fn test_no_reasoning_passes_through() {
        assert_eq!(split_reasoning("plain *answer*"), vec![text("plain *answer*")]);
        assert!(split_reasoning("").is_empty());
    }

    #[test]
    fn test_leading_newline_stripped_and_trimmed() {
        assert_eq!(
            split_reasoning("<think>\nreasoning  \n</think>answer"),
            vec![reasoning("reasoning"), text("answer")]
        );
    }

    #[test]
    fn test_multiple_blocks_in_order() {
        assert_eq!(
            split_reasoning("a<think>one</think>b<think>two</think>"),
            vec![text("a"), reasoning("one"), text("b"), reasoning("two")]
        );
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(
            split_reasoning("<think></think>done"),
            vec![reasoning(""), text("done")]
        );
    }

    #[test]
    fn test_non_greedy_match() {
        assert_eq!(
            split_reasoning("<think>x</think> mid </think>"),
            vec![reasoning("x"), text(" mid </think>")]
        );
    }

    #[test]
    fn test_unclosed_tag_stays_literal() {
        assert_eq!(
            split_reasoning("<think>done</think> then <think>cut off"),
            vec![reasoning("done"), text(" then <think>cut off")]
        );
    }

    #[test]
    fn test_has_reasoning() {
        assert!(has_reasoning(&split_reasoning("<think>x</think>")));
        assert!(!has_reasoning(&split_reasoning("x")));
    }
}
