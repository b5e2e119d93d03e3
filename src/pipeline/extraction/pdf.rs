//! PDF extraction: positioned text runs reassembled into reading order.
//!
//! The content stream of each page is walked operator by operator, tracking
//! the text cursor so every shown string gets an x/y origin. Runs are then
//! sorted top-to-bottom (PDF y-axis increases upward), grouped into lines,
//! and joined. Screenplays exported with one glyph per run come out with a
//! space between every character; a conditional repair pass collapses those
//! gaps without touching normally-spaced text.

use std::sync::LazyLock;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use regex::Regex;

use super::normalize::normalize_text;
use super::types::ScreenplayExtractor;
use super::{ensure_min_length, ExtractionError};
use crate::config::{SAME_LINE_TOLERANCE, SPACED_TEXT_WHITESPACE_RATIO};

/// Default leading used for `T*`/`'` line advances when the stream never
/// sets one via `TL` or `TD`.
const DEFAULT_LEADING: f32 = 12.0;

static SPACE_BEFORE_PERIOD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +\.").unwrap());
static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Extractor for PDF uploads with an embedded text layer.
pub struct PdfTextExtractor;

/// A contiguous string at a position on the page, as emitted by the
/// content-stream text operators.
#[derive(Debug)]
struct TextRun {
    text: String,
    x: f32,
    y: f32,
}

impl ScreenplayExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let doc = Document::load_mem(bytes).map_err(|err| {
            tracing::debug!(error = %err, "PDF load failed");
            ExtractionError::InvalidOrEncrypted
        })?;

        if doc.trailer.get(b"Encrypt").is_ok() {
            return Err(ExtractionError::InvalidOrEncrypted);
        }

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(ExtractionError::InvalidOrEncrypted);
        }

        let mut page_texts: Vec<String> = Vec::new();
        let mut total_runs = 0usize;

        // Unreadable pages are skipped, not fatal; only a document with no
        // usable text at all fails.
        for (&page_num, &page_id) in pages.iter() {
            match extract_page_runs(&doc, page_id) {
                Ok(runs) => {
                    total_runs += runs.len();
                    if !runs.is_empty() {
                        page_texts.push(assemble_page_text(runs));
                    }
                }
                Err(err) => {
                    tracing::warn!(page = page_num, error = %err, "skipping unreadable PDF page");
                }
            }
        }

        if total_runs == 0 {
            return Err(ExtractionError::NoExtractableText);
        }

        let assembled = page_texts.join("\n\n");
        let repaired = repair_letter_spacing(&assembled);
        ensure_min_length(normalize_text(&repaired))
    }
}

/// Walk one page's content stream and collect positioned text runs.
///
/// Cursor tracking covers the common text-positioning operators
/// (`Td`/`TD`/`Tm`/`TL`/`T*`); glyph-level advances are not simulated, so a
/// run's origin is where its positioning operator left the cursor.
fn extract_page_runs(doc: &Document, page_id: ObjectId) -> Result<Vec<TextRun>, lopdf::Error> {
    let content_bytes = doc.get_page_content(page_id)?;
    let content = Content::decode(&content_bytes)?;

    let mut runs: Vec<TextRun> = Vec::new();
    let mut x = 0.0f32;
    let mut y = 0.0f32;
    let mut leading = DEFAULT_LEADING;

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                x = 0.0;
                y = 0.0;
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = operand_pair(&op.operands) {
                    x += tx;
                    y += ty;
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = operand_pair(&op.operands) {
                    x += tx;
                    y += ty;
                    leading = -ty;
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    if let (Some(e), Some(f)) =
                        (operand_number(&op.operands[4]), operand_number(&op.operands[5]))
                    {
                        x = e;
                        y = f;
                    }
                }
            }
            "TL" => {
                if let Some(l) = op.operands.first().and_then(operand_number) {
                    leading = l;
                }
            }
            "T*" => {
                y -= leading;
            }
            "Tj" => {
                push_string_operands(&mut runs, &op.operands, x, y);
            }
            "'" | "\"" => {
                y -= leading;
                push_string_operands(&mut runs, &op.operands, x, y);
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    let text = decode_text_array(items);
                    if !text.is_empty() {
                        runs.push(TextRun { text, x, y });
                    }
                }
            }
            _ => {}
        }
    }

    Ok(runs)
}

fn push_string_operands(runs: &mut Vec<TextRun>, operands: &[Object], x: f32, y: f32) {
    for operand in operands {
        if let Object::String(bytes, _) = operand {
            let text = decode_pdf_string(bytes);
            if !text.is_empty() {
                runs.push(TextRun { text, x, y });
            }
        }
    }
}

/// Decode a `TJ` show-text array. Large negative kerning adjustments stand
/// in for word gaps.
fn decode_text_array(items: &[Object]) -> String {
    let mut text = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => text.push_str(&decode_pdf_string(bytes)),
            Object::Integer(n) if *n < -100 => text.push(' '),
            Object::Real(r) if *r < -100.0 => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Decode a PDF string object: UTF-8, then UTF-16BE (BOM-marked), then
/// Latin-1, which accepts any byte sequence.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter(|chunk| chunk.len() == 2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        if let Ok(s) = String::from_utf16(&units) {
            return s;
        }
    }
    bytes.iter().map(|&b| b as char).collect()
}

fn operand_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn operand_pair(operands: &[Object]) -> (Option<f32>, Option<f32>) {
    if operands.len() >= 2 {
        (operand_number(&operands[0]), operand_number(&operands[1]))
    } else {
        (None, None)
    }
}

/// Rebuild natural reading order for one page: top of page first, then left
/// to right, with y-differences under the tolerance treated as one line.
fn assemble_page_text(mut runs: Vec<TextRun>) -> String {
    runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<TextRun>> = Vec::new();
    for run in runs {
        match lines.last_mut() {
            Some(line) if (line[0].y - run.y).abs() <= SAME_LINE_TOLERANCE => line.push(run),
            _ => lines.push(vec![run]),
        }
    }

    let mut out = String::new();
    for (i, mut line) in lines.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
        let mut line_text = String::new();
        for run in &line {
            if !line_text.is_empty() && !line_text.ends_with(|c: char| c.is_whitespace()) {
                line_text.push(' ');
            }
            line_text.push_str(&run.text);
        }
        out.push_str(&line_text);
    }
    out
}

/// Collapse the per-glyph spacing some PDF exporters emit (one run per
/// character, spaces injected everywhere). Conditional on the whitespace
/// fraction so normally-spaced text keeps its real word boundaries.
fn repair_letter_spacing(text: &str) -> String {
    let total = text.chars().count();
    if total == 0 {
        return String::new();
    }
    let whitespace = text.chars().filter(|c| c.is_whitespace()).count();
    let ratio = whitespace as f32 / total as f32;
    if ratio <= SPACED_TEXT_WHITESPACE_RATIO {
        return text.to_string();
    }

    tracing::debug!(ratio, "letter-spaced PDF text detected, collapsing glyph gaps");

    // Single spaces between two alphanumerics are glyph gaps; double spaces
    // are real word boundaries and survive (collapsed to one below).
    let chars: Vec<char> = text.chars().collect();
    let mut collapsed = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let prev_alnum = i > 0 && chars[i - 1].is_alphanumeric();
            let next_alnum = chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
            if prev_alnum && next_alnum {
                continue;
            }
        }
        collapsed.push(c);
    }

    let no_period_gap = SPACE_BEFORE_PERIOD.replace_all(&collapsed, ".");
    MULTI_SPACE.replace_all(&no_period_gap, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    /// Generate a valid PDF whose pages carry the given content streams.
    fn make_pdf(page_contents: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });

        let mut page_ids = Vec::new();
        for content in page_contents {
            let content_stream = Stream::new(dictionary! {}, content.as_bytes().to_vec());
            let content_id = doc.add_object(content_stream);
            let resources = dictionary! {
                "Font" => dictionary! {
                    "F1" => font_id,
                },
            };
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => resources,
            });
            page_ids.push(page_id);
        }

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|&id| id.into()).collect::<Vec<Object>>(),
            "Count" => page_ids.len() as i64,
        });

        for &page_id in &page_ids {
            if let Ok(Object::Dictionary(ref mut dict)) = doc.get_object_mut(page_id) {
                dict.set("Parent", pages_id);
            }
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn screenplay_page() -> String {
        let mut ops = vec![
            "BT /F1 12 Tf 72 700 Td (INT. KITCHEN - DAY) Tj ET".to_string(),
        ];
        for (i, line) in [
            "She crosses to the window and stares out at the rain.",
            "The kettle begins to whistle behind her.",
            "She does not move until it stops.",
        ]
        .iter()
        .enumerate()
        {
            ops.push(format!("BT /F1 12 Tf 72 {} Td ({line}) Tj ET", 680 - i as i32 * 20));
        }
        ops.join("\n")
    }

    #[test]
    fn digital_pdf_text_extracted() {
        let pdf = make_pdf(&[&screenplay_page()]);
        let text = PdfTextExtractor.extract_text(&pdf).unwrap();
        assert!(text.starts_with("INT. KITCHEN - DAY"));
        assert!(text.contains("kettle begins to whistle"));
    }

    #[test]
    fn reading_order_restored_from_coordinates() {
        // Lines emitted bottom-up in the stream; output must be top-down
        let content = "BT /F1 12 Tf 72 600 Td (last line of the page here) Tj ET\n\
                       BT /F1 12 Tf 72 700 Td (first line of the page here) Tj ET\n\
                       BT /F1 12 Tf 72 650 Td (middle line of the page here) Tj ET";
        let pdf = make_pdf(&[content, &screenplay_page()]);
        let text = PdfTextExtractor.extract_text(&pdf).unwrap();
        let first = text.find("first line").unwrap();
        let middle = text.find("middle line").unwrap();
        let last = text.find("last line").unwrap();
        assert!(first < middle && middle < last);
    }

    #[test]
    fn same_line_runs_joined_left_to_right() {
        // Two runs at the same height, emitted right-hand first
        let content = "BT /F1 12 Tf 300 700 Td (WORLD) Tj ET\n\
                       BT /F1 12 Tf 72 702 Td (HELLO) Tj ET";
        let pdf = make_pdf(&[content, &screenplay_page()]);
        let text = PdfTextExtractor.extract_text(&pdf).unwrap();
        assert!(text.contains("HELLO WORLD"));
    }

    #[test]
    fn pages_concatenated_in_page_order() {
        let second = "BT /F1 12 Tf 72 700 Td (EXT. STREET - NIGHT) Tj ET";
        let pdf = make_pdf(&[&screenplay_page(), second]);
        let text = PdfTextExtractor.extract_text(&pdf).unwrap();
        let p1 = text.find("INT. KITCHEN - DAY").unwrap();
        let p2 = text.find("EXT. STREET - NIGHT").unwrap();
        assert!(p1 < p2);
    }

    #[test]
    fn tj_array_kerning_becomes_space() {
        let content = "BT /F1 12 Tf 72 700 Td [(HELLO) -250 (WORLD)] TJ ET";
        let pdf = make_pdf(&[content, &screenplay_page()]);
        let text = PdfTextExtractor.extract_text(&pdf).unwrap();
        assert!(text.contains("HELLO WORLD"));
    }

    #[test]
    fn invalid_bytes_rejected() {
        let result = PdfTextExtractor.extract_text(b"not a pdf at all");
        assert!(matches!(result, Err(ExtractionError::InvalidOrEncrypted)));
    }

    #[test]
    fn encrypted_document_rejected() {
        let mut doc = Document::load_mem(&make_pdf(&[&screenplay_page()])).unwrap();
        doc.trailer.set("Encrypt", Object::Null);
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        let result = PdfTextExtractor.extract_text(&buf);
        assert!(matches!(result, Err(ExtractionError::InvalidOrEncrypted)));
    }

    #[test]
    fn image_only_pdf_has_no_extractable_text() {
        // A page whose content stream draws nothing textual
        let pdf = make_pdf(&["0 0 612 792 re f"]);
        let result = PdfTextExtractor.extract_text(&pdf);
        assert!(matches!(result, Err(ExtractionError::NoExtractableText)));
    }

    #[test]
    fn short_document_rejected() {
        let pdf = make_pdf(&["BT /F1 12 Tf 72 700 Td (INT. A - DAY) Tj ET"]);
        let result = PdfTextExtractor.extract_text(&pdf);
        assert!(matches!(
            result,
            Err(ExtractionError::InsufficientContent { .. })
        ));
    }

    #[test]
    fn letter_spacing_repair_collapses_glyph_gaps() {
        assert_eq!(repair_letter_spacing("I N T . K I T C H E N"), "INT. KITCHEN");
    }

    #[test]
    fn letter_spacing_repair_keeps_word_gaps() {
        // Double spaces between words survive as single spaces
        assert_eq!(
            repair_letter_spacing("I N T .  K I T C H E N  -  D A Y"),
            "INT. KITCHEN - DAY"
        );
    }

    #[test]
    fn normally_spaced_text_untouched() {
        let text = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(repair_letter_spacing(text), text);
    }

    #[test]
    fn empty_text_repair_is_noop() {
        assert_eq!(repair_letter_spacing(""), "");
    }

    #[test]
    fn utf16be_strings_decoded() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "INT. LOFT".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_pdf_string(&bytes), "INT. LOFT");
    }

    #[test]
    fn latin1_fallback_decodes_any_bytes() {
        assert_eq!(decode_pdf_string(&[0xC9, 0x74, 0xE9]), "Été");
    }
}
