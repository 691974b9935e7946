//! Content rendering.
//!
//! Turns raw message content into HTML:
//!
//! 1. `<think>` blocks are split out and replaced by indexed placeholders
//! 2. the remainder and each block are converted from markdown separately
//! 3. each converted block is put back at its placeholder inside a reasoning container
//! 4. code blocks and inline code carry presentation classes (done during conversion)
//!
//! Input is always raw message content; rendering rendered output again is
//! not supported.

mod markdown;
mod reasoning;

pub use markdown::{FALLBACK_LANGUAGE, code_language, markdown_to_html};
pub use reasoning::{Segment, has_reasoning, split_reasoning};

/// Header shown above every reasoning block.
pub const REASONING_TITLE: &str = "Thinking Process:";

/// The result of rendering one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    /// Final HTML with reasoning containers in place.
    pub html: String,
    /// The raw segments, in order, for front ends that do not display HTML.
    pub segments: Vec<Segment>,
}

/// Renders raw message content.
pub fn render(raw: &str) -> RenderedContent {
    let segments = split_reasoning(raw);
    if !has_reasoning(&segments) {
        return RenderedContent {
            html: markdown_to_html(raw),
            segments,
        };
    }

    let placeholders = Placeholders::for_input(raw);
    let mut remainder = String::with_capacity(raw.len());
    let mut blocks = Vec::new();
    for segment in &segments {
        match segment {
            Segment::Text(text) => remainder.push_str(text),
            Segment::Reasoning(body) => {
                // Blank lines around the token keep it in its own paragraph.
                remainder.push_str("\n\n");
                remainder.push_str(&placeholders.token(blocks.len()));
                remainder.push_str("\n\n");
                blocks.push(reasoning_container(&markdown_to_html(body)));
            }
        }
    }

    let mut html = markdown_to_html(&remainder);
    for (index, block) in blocks.iter().enumerate() {
        let token = placeholders.token(index);
        let paragraph = format!("<p>{}</p>\n", token);
        html = if html.contains(&paragraph) {
            html.replacen(&paragraph, block, 1)
        } else {
            html.replacen(&token, block, 1)
        };
    }

    RenderedContent { html, segments }
}

fn reasoning_container(inner_html: &str) -> String {
    format!(
        "<div class=\"reasoning\">\n<div class=\"reasoning-title\">{}</div>\n<div class=\"reasoning-body\">\n{}</div>\n</div>\n",
        REASONING_TITLE, inner_html
    )
}

/// Placeholder tokens unique to one render call.
///
/// Tokens are alphanumeric so markdown leaves them alone, embed a random
/// nonce that does not occur in the input, and end with a delimiter so
/// index 1 is never a prefix of index 10.
struct Placeholders {
    nonce: String,
}

impl Placeholders {
    fn for_input(raw: &str) -> Self {
        loop {
            let nonce = uuid::Uuid::new_v4().simple().to_string();
            if !raw.contains(&nonce) {
                return Self { nonce };
            }
        }
    }

    fn token(&self, index: usize) -> String {
        format!("RAGCHATTHINK{}X{}X", self.nonce, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_reasoning_matches_plain_markdown() {
        for input in [
            "plain",
            "# Title\n\nSome `code` and **bold**.",
            "```rust\nfn main() {}\n```",
            "<think>unclosed",
            "",
        ] {
            assert_eq!(render(input).html, markdown_to_html(input), "input: {input:?}");
        }
    }

    #[test]
    fn test_reasoning_then_answer() {
        let rendered = render("<think>\nreasoning</think>answer");

        assert_eq!(
            rendered.html,
            "<div class=\"reasoning\">\n<div class=\"reasoning-title\">Thinking Process:</div>\n<div class=\"reasoning-body\">\n<p>reasoning</p>\n</div>\n</div>\n<p>answer</p>\n"
        );
        assert!(!rendered.html.contains("RAGCHATTHINK"));
        assert_eq!(
            rendered.segments,
            vec![
                Segment::Reasoning("reasoning".to_string()),
                Segment::Text("answer".to_string())
            ]
        );
    }

    #[test]
    fn test_multiple_blocks_keep_order() {
        let html = render("intro\n<think>first</think>\nmiddle\n<think>second</think>\noutro").html;

        let first = html.find("<p>first</p>").unwrap();
        let middle = html.find("middle").unwrap();
        let second = html.find("<p>second</p>").unwrap();
        let outro = html.find("outro").unwrap();
        assert!(html.find("intro").unwrap() < first);
        assert!(first < middle && middle < second && second < outro);
        assert_eq!(html.matches("class=\"reasoning\"").count(), 2);
        assert!(!html.contains("RAGCHATTHINK"));
    }

    #[test]
    fn test_placeholder_lookalike_content_is_untouched() {
        let raw = "<think>[[THINK_SECTION_1]] and RAGCHATTHINK0X1X</think>see [[THINK_SECTION_0]]";
        let html = render(raw).html;

        assert_eq!(html.matches("class=\"reasoning\"").count(), 1);
        assert!(html.contains("[[THINK_SECTION_1]] and RAGCHATTHINK0X1X"));
        assert!(html.contains("see [[THINK_SECTION_0]]"));
    }

    #[test]
    fn test_markdown_inside_reasoning() {
        let html = render("<think>\n- check `search.py`\n- check tests</think>Done.").html;
        assert!(html.contains("<li>check <code class=\"inline-code\">search.py</code></li>"));
        assert!(html.ends_with("<p>Done.</p>\n"));
    }

    #[test]
    fn test_empty_reasoning_block() {
        let html = render("<think></think>Hi").html;
        assert!(html.contains("<div class=\"reasoning-body\">\n</div>"));
        assert!(html.ends_with("<p>Hi</p>\n"));
    }

    #[test]
    fn test_code_block_in_answer_after_reasoning() {
        let html = render("<think>plan</think>\n```js\nlet x = 1;\n```").html;
        assert!(html.contains("<pre class=\"code-block\"><code class=\"language-js\">let x = 1;\n</code></pre>"));
    }
}
