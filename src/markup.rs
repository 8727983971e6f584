//! Converts the diary's lightweight markup into a restricted HTML subset:
//! headings (`#`, `##`, `###`), inline links, paragraphs, unordered lists,
//! and line breaks.
//!
//! The conversion is an ordered pipeline of passes. Line endings are first
//! normalized to `\n` ([`normalize_newlines`]); after that each pass sees the
//! output of the previous one:
//!
//! 1. [`heading_pass`] rewrites whole heading lines into `<h1>`..`<h3>`.
//! 2. [`link_pass`] rewrites `[label](target)` into anchors.
//! 3. [`block_pass`] splits on blank lines and wraps every block as a
//!    heading (untouched), a list, or a paragraph.
//!
//! Headings are rewritten before blocks are split, so a heading line that is
//! not separated from the following text by a blank line ends up *inside* a
//! paragraph or list block. Only a block consisting entirely of heading
//! elements is left unwrapped (see [`Block::classify`]).

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    static ref H1_RE: Regex = Regex::new(r"(?m)^# (.+)$").unwrap();
    static ref H2_RE: Regex = Regex::new(r"(?m)^## (.+)$").unwrap();
    static ref H3_RE: Regex = Regex::new(r"(?m)^### (.+)$").unwrap();
    static ref LINK_RE: Regex = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
}

const LIST_MARKER: &str = "- ";
const BLOCK_SEPARATOR: &str = "\n\n";

/// Converts a document's raw text into an HTML fragment.
pub fn to_html(text: &str) -> String {
    block_pass(&link_pass(&heading_pass(&normalize_newlines(text))))
}

/// Turns `\r\n` and lone `\r` line endings into `\n`. The other passes only
/// recognize `\n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Rewrites lines starting with exactly one, two, or three `#` followed by a
/// space into heading elements. Deeper headings are left as literal text.
pub fn heading_pass(text: &str) -> String {
    let text = H1_RE.replace_all(text, "<h1>${1}</h1>");
    let text = H2_RE.replace_all(&text, "<h2>${1}</h2>");
    H3_RE.replace_all(&text, "<h3>${1}</h3>").into_owned()
}

/// Rewrites `[label](target)` into an anchor that opens in a new browsing
/// context.
pub fn link_pass(text: &str) -> String {
    LINK_RE
        .replace_all(text, r#"<a href="${2}" target="_blank">${1}</a>"#)
        .into_owned()
}

/// Splits `text` into blocks on blank lines and wraps each one according to
/// [`Block::classify`]. Empty blocks are dropped and the rest are joined with
/// single newlines.
pub fn block_pass(text: &str) -> String {
    text.split(BLOCK_SEPARATOR)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| Block::classify(block).to_html())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A trimmed, non-empty block of text between blank lines.
#[derive(Debug, PartialEq)]
pub enum Block<'a> {
    /// The block is nothing but heading elements from [`heading_pass`].
    Heading(&'a str),

    /// At least one line of the block starts with `- `.
    List(&'a str),

    /// Everything else, including blocks where a heading shares the block
    /// with body text.
    Paragraph(&'a str),
}

impl<'a> Block<'a> {
    pub fn classify(block: &'a str) -> Block<'a> {
        if is_heading_element(block) {
            Block::Heading(block)
        } else if block
            .lines()
            .any(|line| line.trim().starts_with(LIST_MARKER))
        {
            Block::List(block)
        } else {
            Block::Paragraph(block)
        }
    }

    pub fn to_html(&self) -> Cow<'a, str> {
        match *self {
            Block::Heading(block) => Cow::Borrowed(block),
            Block::List(block) => {
                let mut html = String::from("<ul>");
                for line in block.lines().map(str::trim) {
                    if let Some(item) = line.strip_prefix(LIST_MARKER) {
                        push_item(&mut html, item);
                    } else if !line.is_empty() && !line.starts_with('<') {
                        push_item(&mut html, line);
                    }
                }
                html.push_str("</ul>");
                Cow::Owned(html)
            }
            Block::Paragraph(block) => {
                Cow::Owned(format!("<p>{}</p>", block.replace('\n', "<br>")))
            }
        }
    }
}

fn push_item(html: &mut String, item: &str) {
    html.push_str("<li>");
    html.push_str(item);
    html.push_str("</li>");
}

fn is_heading_element(block: &str) -> bool {
    const OPEN: [&str; 3] = ["<h1>", "<h2>", "<h3>"];
    const CLOSE: [&str; 3] = ["</h1>", "</h2>", "</h3>"];
    OPEN.iter().any(|tag| block.starts_with(tag))
        && CLOSE.iter().any(|tag| block.ends_with(tag))
}
