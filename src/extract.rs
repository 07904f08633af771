//! Uploaded file → plain text.
//!
//! Plain text is decoded as UTF-8 with a single Latin-1 fallback, which
//! cannot fail. PDFs are parsed with `lopdf`, one page at a time.

use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::error::ExtractionError;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailFormat {
    Text,
    Pdf,
}

impl EmailFormat {
    /// Detect the format from the file extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("txt") => Ok(Self::Text),
            Some("pdf") => Ok(Self::Pdf),
            _ => Err(ExtractionError::UnsupportedFormat {
                filename: Some(filename.to_string()),
            }),
        }
    }
}

/// An uploaded email file before extraction.
#[derive(Debug, Clone)]
pub struct RawEmail {
    pub bytes: Vec<u8>,
    pub format: EmailFormat,
    pub filename: Option<String>,
}

impl RawEmail {
    /// Build from an upload, detecting the format from `filename`.
    pub fn from_upload(filename: &str, bytes: Vec<u8>) -> Result<Self, ExtractionError> {
        Ok(Self {
            bytes,
            format: EmailFormat::from_filename(filename)?,
            filename: Some(filename.to_string()),
        })
    }
}

/// Extract the text content of an uploaded email.
///
/// PDF parsing is CPU-bound; async callers should run this on a blocking
/// thread.
pub fn extract_text(raw: &RawEmail) -> Result<String, ExtractionError> {
    match raw.format {
        EmailFormat::Text => Ok(decode_text(&raw.bytes)),
        EmailFormat::Pdf => extract_pdf_text(&raw.bytes),
    }
}

/// UTF-8, or Latin-1 (each byte one code point) when not valid UTF-8.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!(len = bytes.len(), "Upload is not UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document = Document::load_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let mut text = String::new();
    for page_number in document.get_pages().keys() {
        let page_text = document
            .extract_text(&[*page_number])
            .map_err(|e| ExtractionError::Pdf(format!("page {page_number}: {e}")))?;
        text.push_str(&page_text);
        text.push('\n');
    }

    debug!(chars = text.chars().count(), "PDF text extracted");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    use super::*;

    /// Minimal one-page PDF showing `line` in Courier.
    fn single_page_pdf(line: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(EmailFormat::from_filename("email.txt").unwrap(), EmailFormat::Text);
        assert_eq!(EmailFormat::from_filename("Relatorio.PDF").unwrap(), EmailFormat::Pdf);
        assert_eq!(EmailFormat::from_filename("a.b.Txt").unwrap(), EmailFormat::Text);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        for name in ["email.docx", "email", "pdf", ".txt.exe"] {
            assert!(
                matches!(
                    EmailFormat::from_filename(name),
                    Err(ExtractionError::UnsupportedFormat { .. })
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn utf8_text_is_decoded() {
        let raw = RawEmail::from_upload("email.txt", "Reunião às 14h".as_bytes().to_vec()).unwrap();
        assert_eq!(extract_text(&raw).unwrap(), "Reunião às 14h");
    }

    #[test]
    fn latin1_fallback_for_invalid_utf8() {
        // "Reunião" in ISO-8859-1
        let bytes = vec![0x52, 0x65, 0x75, 0x6e, 0x69, 0xe3, 0x6f];
        let raw = RawEmail::from_upload("email.txt", bytes).unwrap();
        assert_eq!(extract_text(&raw).unwrap(), "Reunião");
    }

    #[test]
    fn empty_text_file_decodes_to_empty() {
        let raw = RawEmail::from_upload("empty.txt", Vec::new()).unwrap();
        assert_eq!(extract_text(&raw).unwrap(), "");
    }

    #[test]
    fn corrupt_pdf_is_an_extraction_error() {
        let raw = RawEmail::from_upload("broken.pdf", b"not a pdf at all".to_vec()).unwrap();
        assert!(matches!(extract_text(&raw), Err(ExtractionError::Pdf(_))));
    }

    #[test]
    fn pdf_pages_are_extracted() {
        let raw = RawEmail::from_upload("email.pdf", single_page_pdf("Prazo do projeto")).unwrap();
        let text = extract_text(&raw).unwrap();
        assert!(text.contains("Prazo do projeto"), "got {text:?}");
        assert!(text.ends_with('\n'));
    }
}
