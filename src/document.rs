//! Defines the [`Document`] type: one dated diary entry.

use crate::markup;

/// A single dated entry, parsed from a file named after its date stem (e.g.
/// `20240101.md`). The HTML body is produced once at construction and never
/// changes afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// The numeric value of the file name stem. Documents are ordered by this
    /// key, so `9999` sorts before `10000`.
    pub sort_key: u32,

    /// The file name stem as written, leading zeros included. This is what
    /// the page displays above the entry.
    pub date: String,

    /// The file contents as read from disk.
    pub raw_text: String,

    /// The restricted HTML fragment converted from `raw_text`.
    pub html_body: String,
}

impl Document {
    /// Builds a document from its stem and raw contents, converting the
    /// contents to HTML with [`markup::to_html`].
    pub fn new(sort_key: u32, date: &str, raw_text: String) -> Document {
        let html_body = markup::to_html(&raw_text);
        Document {
            sort_key,
            date: date.to_owned(),
            raw_text,
            html_body,
        }
    }
}
