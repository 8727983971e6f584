//! The library code for the `nikki` diary page generator. A build reads a
//! directory of dated text files and writes a single self-contained HTML page
//! that scrolls horizontally through them. It happens in three steps:
//!
//! 1. Collecting documents from files named after their date, e.g.
//!    `20240101.md` ([`crate::collect`])
//! 2. Converting each document's lightweight markup into restricted HTML
//!    ([`crate::markup`])
//! 3. Rendering every document into the page template and writing the result
//!    to disk ([`crate::render`], [`crate::build`])
//!
//! The rendered page carries one navigation marker per document and a small
//! script that maps a marker to a scroll position ([`crate::scroll`]).
//!
//! Every build is a full regeneration; nothing is cached between runs, and
//! the same inputs always produce the same page.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod collect;
pub mod config;
pub mod document;
pub mod markup;
pub mod render;
pub mod scroll;
pub mod util;
