use std::fmt::Display;
use std::io::{Cursor, Read};

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads `word/document.xml` and joins the text of each non-empty `w:p` with newlines.
pub(super) fn extract_docx_text(data: &[u8]) -> Result<String, ExtractionError> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor).map_err(docx_error)?;

    let mut document_file = archive.by_name(DOCUMENT_PART).map_err(docx_error)?;
    let mut xml = String::new();
    document_file
        .read_to_string(&mut xml)
        .map_err(docx_error)?;

    paragraphs_from_xml(&xml).map(|lines| lines.join("\n"))
}

fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = in_paragraph,
                _ => {}
            },
            Ok(Event::Empty(e)) if in_paragraph => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push(' '),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => {
                    let line = current.trim();
                    if !line.is_empty() {
                        lines.push(line.to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                    in_text = false;
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let value = e.xml_content().map_err(docx_error)?;
                current.push_str(&value);
            }
            Ok(Event::GeneralRef(e)) if in_text => {
                if let Some(ch) = e.resolve_char_ref().map_err(docx_error)? {
                    current.push(ch);
                } else {
                    let name = e.decode().map_err(docx_error)?;
                    if let Some(value) = resolve_predefined_entity(&name) {
                        current.push_str(value);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(docx_error(err)),
            _ => {}
        }

        buf.clear();
    }

    Ok(lines)
}

fn docx_error(err: impl Display) -> ExtractionError {
    ExtractionError::Docx(err.to_string())
}
