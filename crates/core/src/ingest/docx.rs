//! DOCX text extraction.
//!
//! Reads `word/document.xml` out of the OOXML zip container and re-serializes
//! its content as a small XML document:
//!
//! ```text
//! <extracted_text>
//!   <text>First paragraph</text>
//!   <table>
//!     <row>
//!       <coloumn>cell</coloumn>
//!     </row>
//!   </table>
//! </extracted_text>
//! ```
//!
//! Body paragraphs come first, then tables, each in document order. The tag
//! names are the ones the prompt templates describe to the model (including
//! the `coloumn` spelling).

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::CoreError;

const DOCUMENT_PART: &str = "word/document.xml";
const KIND: &str = "doc";
const INDENT: &str = "  ";

type Table = Vec<Vec<String>>;

/// Extract paragraphs and tables from DOCX bytes.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, CoreError> {
    let xml = read_document_part(bytes)?;
    let (paragraphs, tables) = parse_document(&xml)?;

    let has_text = !paragraphs.is_empty()
        || tables
            .iter()
            .flatten()
            .flatten()
            .any(|cell| !cell.is_empty());
    if !has_text {
        return Err(CoreError::invalid_format(KIND, "document contains no text"));
    }

    tracing::debug!(
        paragraphs = paragraphs.len(),
        tables = tables.len(),
        "Extracted DOCX text",
    );

    Ok(render(&paragraphs, &tables))
}

fn read_document_part(bytes: &[u8]) -> Result<String, CoreError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
        CoreError::invalid_format(KIND, format!("not a DOCX container: {e}"))
    })?;

    let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| {
        CoreError::invalid_format(KIND, format!("missing {DOCUMENT_PART}: {e}"))
    })?;

    let mut xml = String::new();
    part.read_to_string(&mut xml).map_err(|e| {
        CoreError::invalid_format(KIND, format!("failed to read {DOCUMENT_PART}: {e}"))
    })?;
    Ok(xml)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Walk the WordprocessingML body.
///
/// Nested tables are flattened into the text of the enclosing cell.
fn parse_document(xml: &str) -> Result<(Vec<String>, Vec<Table>), CoreError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut paragraphs = Vec::new();
    let mut tables: Vec<Table> = Vec::new();

    let mut table_depth = 0usize;
    let mut table: Table = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut paragraph = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| CoreError::invalid_format(KIND, format!("malformed document XML: {e}")))?;

        match event {
            Event::Start(ref e) => match e.name().as_ref() {
                b"w:tbl" => {
                    table_depth += 1;
                    if table_depth == 1 {
                        table = Vec::new();
                    }
                }
                b"w:tr" if table_depth == 1 => row = Vec::new(),
                b"w:tc" if table_depth == 1 => cell.clear(),
                b"w:p" => paragraph.clear(),
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                b"w:tab" if in_run => paragraph.push('\t'),
                b"w:br" if in_run => paragraph.push('\n'),
                _ => {}
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"w:tab" if in_run => paragraph.push('\t'),
                b"w:br" if in_run => paragraph.push('\n'),
                _ => {}
            },
            Event::Text(e) => {
                if in_text {
                    let value = e.unescape().map_err(|err| {
                        CoreError::invalid_format(KIND, format!("bad text node: {err}"))
                    })?;
                    paragraph.push_str(&value);
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:r" => in_run = false,
                b"w:p" => {
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        if table_depth == 0 {
                            paragraphs.push(text.to_string());
                        } else {
                            cell.push_str(text);
                            cell.push(' ');
                        }
                    }
                    paragraph.clear();
                }
                b"w:tc" if table_depth == 1 => row.push(cell.trim().to_string()),
                b"w:tr" if table_depth == 1 => table.push(std::mem::take(&mut row)),
                b"w:tbl" => {
                    if table_depth == 1 {
                        tables.push(std::mem::take(&mut table));
                    }
                    table_depth = table_depth.saturating_sub(1);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((paragraphs, tables))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(paragraphs: &[String], tables: &[Table]) -> String {
    let mut lines = vec!["<extracted_text>".to_string()];

    for text in paragraphs {
        lines.push(element(1, "text", text));
    }

    for table in tables {
        lines.push(format!("{}<table>", INDENT));
        for row in table {
            lines.push(format!("{}<row>", INDENT.repeat(2)));
            for cell in row {
                lines.push(element(3, "coloumn", cell));
            }
            lines.push(format!("{}</row>", INDENT.repeat(2)));
        }
        lines.push(format!("{}</table>", INDENT));
    }

    lines.push("</extracted_text>".to_string());
    lines.join("\n")
}

fn element(depth: usize, tag: &str, text: &str) -> String {
    let indent = INDENT.repeat(depth);
    if text.is_empty() {
        format!("{indent}<{tag}/>")
    } else {
        format!("{indent}<{tag}>{}</{tag}>", quick_xml::escape::escape(text))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
