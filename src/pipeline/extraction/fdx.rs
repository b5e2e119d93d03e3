//! Final Draft (.fdx) extraction.
//!
//! An FDX file is an XML container whose `FinalDraft/Content` element holds
//! an ordered list of `Paragraph` elements, each tagged with a formatting
//! type (Scene Heading, Action, Character, ...). Extraction walks the
//! paragraphs in document order and re-renders them as screenplay-formatted
//! plain text, so the scene segmenter downstream sees the same sluglines a
//! plain-text upload would contain.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::normalize::normalize_text;
use super::types::ScreenplayExtractor;
use super::{ensure_min_length, ExtractionError};

/// Extractor for Final Draft XML uploads.
pub struct FdxExtractor;

/// One paragraph as read off the XML stream, before type mapping.
struct RawParagraph {
    ptype: String,
    text: String,
    /// Whether this paragraph sits under the expected `FinalDraft/Content`
    /// container path (the fallback scan keeps paragraphs found elsewhere).
    in_content: bool,
    /// Set when this paragraph's own attributes or text failed to decode;
    /// the paragraph is skipped instead of failing the whole document.
    failed: bool,
}

impl ScreenplayExtractor for FdxExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let xml = std::str::from_utf8(bytes).map_err(|_| ExtractionError::DecodeError)?;

        // Cheap structural sanity check before handing off to the XML parser
        if !xml.contains("<?xml") && !xml.contains("<FinalDraft") {
            return Err(ExtractionError::NotFdxFormat);
        }

        let paragraphs = collect_paragraphs(xml)?;

        let primary: Vec<&RawParagraph> =
            paragraphs.iter().filter(|p| p.in_content).collect();
        let chosen: Vec<&RawParagraph> = if primary.is_empty() {
            tracing::debug!(
                total = paragraphs.len(),
                "FinalDraft/Content container missing, scanning whole tree for paragraphs"
            );
            paragraphs.iter().collect()
        } else {
            primary
        };

        if chosen.is_empty() {
            return Err(ExtractionError::NoParagraphs);
        }

        let mut lines: Vec<String> = Vec::new();
        let mut non_empty = 0usize;
        for paragraph in chosen {
            let text = paragraph.text.trim();
            if text.is_empty() {
                continue;
            }
            non_empty += 1;
            emit_paragraph(&mut lines, &paragraph.ptype, text);
        }

        if non_empty == 0 {
            return Err(ExtractionError::InsufficientContent { length: 0 });
        }

        ensure_min_length(normalize_text(&lines.join("\n")))
    }
}

/// Single streaming pass over the document. Collects every `Paragraph`
/// element together with whether it lives under the primary container, so
/// the caller can prefer the expected path and fall back to a whole-tree
/// scan without re-parsing.
fn collect_paragraphs(xml: &str) -> Result<Vec<RawParagraph>, ExtractionError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs: Vec<RawParagraph> = Vec::new();
    let mut current: Option<RawParagraph> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"Paragraph" && current.is_none() {
                    let in_content = path.len() == 2
                        && path[0] == b"FinalDraft"
                        && path[1] == b"Content";
                    let mut failed = false;
                    let ptype = match e.try_get_attribute("Type") {
                        Ok(Some(attr)) => match attr.unescape_value() {
                            Ok(value) => value.into_owned(),
                            Err(err) => {
                                tracing::warn!(error = %err, "skipping paragraph with undecodable Type attribute");
                                failed = true;
                                String::from("Unknown")
                            }
                        },
                        Ok(None) => String::from("Unknown"),
                        Err(err) => {
                            tracing::warn!(error = %err, "skipping paragraph with malformed attributes");
                            failed = true;
                            String::from("Unknown")
                        }
                    };
                    current = Some(RawParagraph {
                        ptype,
                        text: String::new(),
                        in_content,
                        failed,
                    });
                }
                path.push(name);
            }
            Ok(Event::Text(t)) => {
                if let Some(paragraph) = current.as_mut() {
                    // Content may sit in a direct text node or in <Text>
                    // run children; runs are concatenated verbatim while
                    // direct nodes are trimmed of layout indentation.
                    let inside_run = path.last().is_some_and(|n| n.as_slice() == b"Text");
                    match t.unescape() {
                        Ok(value) if inside_run => paragraph.text.push_str(&value),
                        Ok(value) => {
                            let trimmed = value.trim();
                            if !trimmed.is_empty() {
                                paragraph.text.push_str(trimmed);
                            }
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "skipping paragraph with undecodable text");
                            paragraph.failed = true;
                        }
                    }
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(paragraph) = current.as_mut() {
                    paragraph.text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Ok(Event::End(e)) => {
                path.pop();
                if e.local_name().as_ref() == b"Paragraph" {
                    if let Some(paragraph) = current.take() {
                        if paragraph.failed {
                            tracing::warn!("dropped one unreadable paragraph");
                        } else {
                            paragraphs.push(paragraph);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(ExtractionError::MalformedXml(err.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

/// Map a paragraph type to screenplay-formatted output lines. Unknown types
/// pass through as-is so no content is silently dropped.
fn emit_paragraph(lines: &mut Vec<String>, ptype: &str, text: &str) {
    match ptype {
        "Scene Heading" => {
            lines.push(String::new());
            lines.push(text.to_uppercase());
            lines.push(String::new());
        }
        "Action" => {
            lines.push(text.to_string());
            lines.push(String::new());
        }
        "Character" => {
            lines.push(String::new());
            lines.push(text.to_uppercase());
        }
        "Dialogue" => lines.push(text.to_string()),
        "Parenthetical" => lines.push(format!("({text})")),
        "Transition" => {
            lines.push(String::new());
            lines.push(text.to_uppercase());
            lines.push(String::new());
        }
        _ => lines.push(text.to_string()),
    }
}
