use pulldown_cmark::CodeBlockKind;
use pulldown_cmark::CowStr;
use pulldown_cmark::Event;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use pulldown_cmark_escape as escape;
use pulldown_cmark::html;

/// Language class used when a fence has no recognised language.
pub const FALLBACK_LANGUAGE: &str = "plaintext";

// Sorted for binary search.
const KNOWN_LANGUAGES: &[&str] = &[
    "bash",
    "c",
    "cpp",
    "cs",
    "csharp",
    "css",
    "diff",
    "dockerfile",
    "go",
    "haskell",
    "html",
    "ini",
    "java",
    "javascript",
    "js",
    "json",
    "jsx",
    "kotlin",
    "lua",
    "makefile",
    "markdown",
    "md",
    "perl",
    "php",
    "plaintext",
    "py",
    "python",
    "r",
    "ruby",
    "rust",
    "scala",
    "scss",
    "sh",
    "shell",
    "sql",
    "swift",
    "text",
    "toml",
    "ts",
    "tsx",
    "typescript",
    "xml",
    "yaml",
    "yml",
    "zsh",
];

/// Converts markdown to HTML with the client's presentation classes.
///
/// GFM tables, strikethrough and task lists are enabled and every soft line
/// break is kept as `<br />`. Fenced and indented code blocks become
/// `<pre class="code-block"><code class="language-…">`, inline code becomes
/// `<code class="inline-code">`.
pub fn markdown_to_html(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(input, options);

    let mut in_code_block = false;
    let events = parser.map(move |event| match event {
        Event::Start(Tag::CodeBlock(kind)) => {
            in_code_block = true;
            Event::Html(CowStr::from(format!(
                "<pre class=\"code-block\"><code class=\"language-{}\">",
                code_language(&kind)
            )))
        }
        Event::End(TagEnd::CodeBlock) => {
            in_code_block = false;
            Event::Html(CowStr::from("</code></pre>\n"))
        }
        Event::Text(text) if in_code_block => Event::Html(CowStr::from(escape_html(&text))),
        Event::Code(code) => Event::Html(CowStr::from(format!(
            "<code class=\"inline-code\">{}</code>",
            escape_html(&code)
        ))),
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut out = String::with_capacity(input.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// The language class for a code block: the fence's first word when it is
/// a known language, otherwise [`FALLBACK_LANGUAGE`].
pub fn code_language(kind: &CodeBlockKind<'_>) -> &'static str {
    let CodeBlockKind::Fenced(info) = kind else {
        return FALLBACK_LANGUAGE;
    };
    let Some(word) = info.split_whitespace().next() else {
        return FALLBACK_LANGUAGE;
    };
    let word = word.to_ascii_lowercase();
    KNOWN_LANGUAGES
        .binary_search(&word.as_str())
        .map(|index| KNOWN_LANGUAGES[index])
        .unwrap_or(FALLBACK_LANGUAGE)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = escape::escape_html(&mut escaped, text);
    escaped
}
