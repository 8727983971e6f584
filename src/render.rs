//! Renders a sequence of [`Document`]s into the final, self-contained HTML
//! page. The page shell is a [`gtmpl`] template; by default the one bundled
//! from `templates/page.html`, optionally replaced by a project template.
//!
//! Two shapes of output exist:
//!
//! 1. With no documents, the fallback page from `templates/empty.html`, which
//!    shows a single message and carries no markers, data, or script.
//! 2. Otherwise, the full page: one navigation marker per document (indexed
//!    oldest-first), the document data array (newest-first, with fragments
//!    escaped for a JavaScript template literal), and the scroll-offset table
//!    from [`ScrollFormula`].

use crate::document::Document;
use crate::scroll::ScrollFormula;
use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

const PAGE_TEMPLATE: &str = include_str!("../templates/page.html");
const EMPTY_TEMPLATE: &str = include_str!("../templates/empty.html");

/// The text settings shared by both page shapes.
#[derive(Clone, Debug)]
pub struct PageSettings {
    /// The document title (`<title>`).
    pub title: String,

    /// The value of the `lang` attribute on `<html>`.
    pub lang: String,

    /// The message shown when there are no documents.
    pub empty_message: String,
}

/// Holds the parsed templates and renders documents through them.
pub struct Renderer {
    page: Template,
    empty: Template,
    settings: PageSettings,
}

impl Renderer {
    /// Constructs a renderer using the bundled page template.
    pub fn new(settings: PageSettings) -> Result<Renderer> {
        Ok(Renderer {
            page: parse_template(PAGE_TEMPLATE)?,
            empty: parse_template(EMPTY_TEMPLATE)?,
            settings,
        })
    }

    /// Constructs a renderer whose page template is loaded from `path`. The
    /// fallback page is always the bundled one.
    pub fn with_page_template(settings: PageSettings, path: &Path) -> Result<Renderer> {
        let contents = std::fs::read_to_string(path).map_err(|err| Error::OpenTemplateFile {
            path: path.to_owned(),
            err,
        })?;
        Ok(Renderer {
            page: parse_template(&contents)?,
            empty: parse_template(EMPTY_TEMPLATE)?,
            settings,
        })
    }

    /// Renders `documents` (sorted oldest-first) into the page text.
    pub fn render(&self, documents: &[Document]) -> Result<String> {
        if documents.is_empty() {
            return self.render_empty();
        }

        let formula = ScrollFormula::new(documents.len());
        let mut m: HashMap<String, Value> = self.common_values();
        m.insert(
            "count".to_owned(),
            Value::String(documents.len().to_string()),
        );
        m.insert(
            "markers".to_owned(),
            Value::Array(
                navigation_markers(documents.len())
                    .into_iter()
                    .map(Value::String)
                    .collect(),
            ),
        );
        m.insert(
            "documents".to_owned(),
            Value::Array(documents.iter().rev().map(document_value).collect()),
        );
        m.insert(
            "scroll_ratios".to_owned(),
            Value::String(formula.to_js_array()),
        );
        execute(&self.page, Value::Object(m))
    }

    fn render_empty(&self) -> Result<String> {
        let mut m = self.common_values();
        m.insert(
            "message".to_owned(),
            Value::String(self.settings.empty_message.clone()),
        );
        execute(&self.empty, Value::Object(m))
    }

    fn common_values(&self) -> HashMap<String, Value> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "title".to_owned(),
            Value::String(self.settings.title.clone()),
        );
        m.insert("lang".to_owned(), Value::String(self.settings.lang.clone()));
        m
    }
}

/// Returns the marker indices for `count` documents, `"0"` being the oldest.
pub fn navigation_markers(count: usize) -> Vec<String> {
    (0..count).map(|i| i.to_string()).collect()
}

/// Escapes an HTML fragment for embedding between backticks in a JavaScript
/// template literal. The literal evaluates back to exactly `fragment`.
///
/// Every `</` becomes `<\/` so no end tag, whatever its case, can close the
/// surrounding `<script>` element.
pub fn escape_template_literal(fragment: &str) -> String {
    fragment
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
        .replace("</", "<\\/")
}

fn document_value(document: &Document) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("date".to_owned(), Value::String(document.date.clone()));
    m.insert(
        "content".to_owned(),
        Value::String(escape_template_literal(&document.html_body)),
    );
    Value::Object(m)
}

fn parse_template(contents: &str) -> Result<Template> {
    let mut template = Template::default();
    template.parse(contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

fn execute(template: &Template, value: Value) -> Result<String> {
    let mut out: Vec<u8> = Vec::new();
    template.execute(&mut out, &Context::from(value)?)?;
    String::from_utf8(out).map_err(|e| Error::Template(e.to_string()))
}

/// The result of a fallible rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a rendering operation.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening a project template file.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned for errors parsing a template.
    ParseTemplate(String),

    /// An error during templating.
    Template(String),
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => write!(f, "Parsing template: {}", err),
            Error::Template(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Template(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn settings() -> PageSettings {
        PageSettings {
            title: "日記".to_owned(),
            lang: "ja".to_owned(),
            empty_message: "nothing written yet".to_owned(),
        }
    }

    fn docs(texts: &[(u32, &str)]) -> Vec<Document> {
        texts
            .iter()
            .map(|(key, text)| Document::new(*key, &format!("{:04}", key), text.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_page() -> Result<()> {
        let page = Renderer::new(settings())?.render(&[])?;
        assert!(page.contains("nothing written yet"));
        assert!(page.contains(r#"<html lang="ja">"#));
        assert!(!page.contains("class=\"dot\""));
        assert!(!page.contains("const documents"));
        assert!(!page.contains("<script>"));
        Ok(())
    }

    #[test]
    fn test_markers_oldest_first() -> Result<()> {
        let page = Renderer::new(settings())?.render(&docs(&[(2001, "a"), (2002, "b"), (2003, "c")]))?;
        assert!(page.contains(
            concat!(
                "        <div class=\"dot\" data-index=\"0\"></div>\n",
                "        <div class=\"dot\" data-index=\"1\"></div>\n",
                "        <div class=\"dot\" data-index=\"2\"></div>\n",
                "    </div>",
            )
        ));
        assert!(!page.contains("data-index=\"3\""));
        Ok(())
    }

    #[test]
    fn test_data_newest_first() -> Result<()> {
        let page = Renderer::new(settings())?.render(&docs(&[(2001, "old"), (2002, "new")]))?;
        let new = page.find("<p>new").unwrap();
        let old = page.find("<p>old").unwrap();
        assert!(new < old);
        assert!(page.contains(
            "        {\n            date: \"2002\",\n            content: `<p>new<\\/p>`\n        },\n"
        ));
        Ok(())
    }

    #[test]
    fn test_scroll_table() -> Result<()> {
        let page = Renderer::new(settings())?.render(&docs(&[
            (1, "a"),
            (2, "b"),
            (3, "c"),
            (4, "d"),
            (5, "e"),
        ]))?;
        assert!(page.contains("const DOCUMENT_COUNT = 5;"));
        assert!(page.contains("const SCROLL_RATIOS = [1.000, 0.750, 0.500, 0.250, 0.000];"));
        Ok(())
    }

    #[test]
    fn test_escaping_keeps_literal_closed() -> Result<()> {
        let page = Renderer::new(settings())?.render(&docs(&[(2001, "a `tick` and ${x} \\")]))?;
        assert!(page.contains(r"content: `<p>a \`tick\` and \${x} \\<\/p>`"));
        Ok(())
    }

    #[test]
    fn test_escape_template_literal() {
        assert_eq!(r"\`", escape_template_literal("`"));
        assert_eq!(r"\${a}", escape_template_literal("${a}"));
        assert_eq!("$a {b}", escape_template_literal("$a {b}"));
        assert_eq!(r"\\\`", escape_template_literal(r"\`"));
        assert_eq!(r"<\/script>", escape_template_literal("</script>"));
        assert_eq!(r"<\/SCRIPT><b>x<\/b>", escape_template_literal("</SCRIPT><b>x</b>"));
        assert_eq!(r"<\/Script >", escape_template_literal("</Script >"));
    }

    #[test]
    fn test_end_tags_cannot_close_script() -> Result<()> {
        let page = Renderer::new(settings())?.render(&docs(&[(2001, "a</SCRIPT>b</Script>c")]))?;
        let script = &page[page.find("<script>").unwrap()..];
        assert_eq!(1, script.to_ascii_lowercase().matches("</script").count());
        assert!(page.contains(r"content: `<p>a<\/SCRIPT>b<\/Script>c<\/p>`"));
        Ok(())
    }

    #[test]
    fn test_deterministic() -> Result<()> {
        let renderer = Renderer::new(settings())?;
        let documents = docs(&[(2001, "# a\n\nb"), (2002, "- c\n- d"), (2003, "e")]);
        assert_eq!(renderer.render(&documents)?, renderer.render(&documents)?);
        Ok(())
    }

    #[test]
    fn test_custom_page_template() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("page.html");
        std::fs::write(&path, "{{.title}}:{{.count}}:{{range .markers}}[{{.}}]{{end}}")?;
        let renderer = Renderer::with_page_template(settings(), &path)?;
        assert_eq!("日記:2:[0][1]", renderer.render(&docs(&[(2001, "a"), (2002, "b")]))?);
        Ok(())
    }

    #[test]
    fn test_missing_page_template() {
        match Renderer::with_page_template(settings(), Path::new("/nonexistent/page.html")) {
            Err(Error::OpenTemplateFile { .. }) => {}
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected an error"),
        }
    }
}
