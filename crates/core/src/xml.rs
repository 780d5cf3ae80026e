//! Helpers for the XML-tagged text the models return.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::CoreError;

/// Root tags the prompt templates ask the model to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlTag {
    Test,
    Summary,
}

impl XmlTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Summary => "summary",
        }
    }

    /// Title used by [`build_markup_xml`] when none is supplied.
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::Test => "Test",
            Self::Summary => "Summary",
        }
    }

    fn opening(&self) -> String {
        format!("<{}>", self.as_str())
    }
}

impl fmt::Display for XmlTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for XmlTag {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "summary" => Ok(Self::Summary),
            _ => Err(CoreError::Validation(
                "Tag type must be 'test' or 'summary'".to_string(),
            )),
        }
    }
}

/// Drop any preamble before the first `<tag>`. Text without the tag is
/// returned unchanged.
pub fn raw_tagged_xml(text: &str, tag: XmlTag) -> &str {
    match text.find(&tag.opening()) {
        Some(pos) => &text[pos..],
        None => text,
    }
}

/// Parse `tag_type` and apply [`raw_tagged_xml`]. Empty text is rejected.
pub fn parse_tagged_xml<'a>(text: &'a str, tag_type: &str) -> Result<&'a str, CoreError> {
    if text.is_empty() {
        return Err(CoreError::Validation("Text is required".to_string()));
    }
    let tag: XmlTag = tag_type.parse()?;
    Ok(raw_tagged_xml(text, tag))
}

/// Wrap content in a `<summary>` or `<test>` document.
///
/// `content` is inserted verbatim since it usually already carries model
/// markup. The title and metadata are escaped. Metadata string values are
/// written as-is; other JSON values use their JSON text.
pub fn build_markup_xml(
    root: XmlTag,
    content: &str,
    title: Option<&str>,
    metadata: Option<&Map<String, Value>>,
) -> Result<String, CoreError> {
    if content.is_empty() {
        return Err(CoreError::Validation("Content is required".to_string()));
    }

    let title = title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| root.default_title());

    let mut lines = Vec::new();
    lines.push(format!("<{root}>"));
    lines.push(format!("    <title>{}</title>", escape(title)));
    for (name, value) in metadata.into_iter().flatten() {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        lines.push(format!(
            r#"    <meta name="{}">{}</meta>"#,
            escape(name),
            escape(&value)
        ));
    }
    lines.push(format!("    <content>{content}</content>"));
    lines.push(format!("</{root}>"));

    Ok(lines.join("\n"))
}

fn escape(text: &str) -> std::borrow::Cow<'_, str> {
    quick_xml::escape::escape(text)
}
