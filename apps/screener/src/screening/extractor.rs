//! Text Extractor — turns one uploaded document into plain text.
//!
//! Failures are reported in-band as text: callers detect them by the
//! `"Unsupported file format:"` and `"Error reading"` prefixes.

use bytes::Bytes;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;

pub const UNSUPPORTED_PREFIX: &str = "Unsupported file format:";
pub const READ_ERROR_PREFIX: &str = "Error reading";

/// A document as received from the client: its name (with extension) and raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub data: Bytes,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Name without any directory components the client may have sent.
    pub fn display_name(&self) -> &str {
        self.name
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(&self.name)
    }

    /// Lowercased text after the last dot.
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    Word,
    PlainText,
}

impl DocumentKind {
    fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" | "doc" => Some(DocumentKind::Word),
            "txt" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    fn read(self, data: &[u8]) -> Result<String, ExtractError> {
        match self {
            DocumentKind::Pdf => read_pdf(data),
            DocumentKind::Word => read_word(data),
            DocumentKind::PlainText => Ok(String::from_utf8(data.to_vec())?),
        }
    }
}

#[derive(Debug, Error)]
enum ExtractError {
    #[error("{0}")]
    Pdf(String),

    #[error("{0}")]
    Word(String),

    #[error("{0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Extracts plain text from `document`.
///
/// `None` yields an empty string. Parsing runs on the blocking pool; a parser
/// panic is reported the same way as any other read failure.
pub async fn extract_text(document: Option<&UploadedDocument>) -> String {
    let Some(document) = document else {
        return String::new();
    };

    let Some(kind) = DocumentKind::from_extension(&document.extension()) else {
        return format!("{UNSUPPORTED_PREFIX} {}", document.name);
    };

    let data = document.data.clone();
    match tokio::task::spawn_blocking(move || kind.read(&data)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => format!("{READ_ERROR_PREFIX} {}: {e}", document.name),
        Err(e) => format!("{READ_ERROR_PREFIX} {}: {e}", document.name),
    }
}

/// True when `text` is an extractor failure message rather than document content.
pub fn is_extraction_failure(text: &str) -> bool {
    text.starts_with("Error") || text.starts_with("Unsupported")
}

/// Each page's text followed by a newline.
fn read_pdf(data: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(data)
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    Ok(pages.into_iter().map(|page| page + "\n").collect())
}

fn read_word(data: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(data).map_err(|e| ExtractError::Word(e.to_string()))?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        match run_child {
                            RunChild::Text(t) => text.push_str(&t.text),
                            RunChild::Tab(_) => text.push('\t'),
                            RunChild::Break(_) => text.push('\n'),
                            _ => {}
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for p in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
        }
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    /// Minimal PDF, one Helvetica text line per page, with a correct xref table.
    fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", 4 + 2 * i))
            .collect();
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];
        for (i, text) in pages.iter().enumerate() {
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                5 + 2 * i
            ));
            let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, object) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", i + 1).as_bytes());
        }
        let xref_at = out.len();
        out.extend_from_slice(
            format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes(),
        );
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        out
    }

    #[tokio::test]
    async fn test_pdf_text_is_extracted() {
        let doc = UploadedDocument::new("jane.pdf", pdf_bytes(&["Jane Doe Backend Engineer"]));
        let text = extract_text(Some(&doc)).await;
        assert!(!is_extraction_failure(&text), "{text}");
        assert!(text.contains("Jane"), "{text}");
        assert!(text.contains("Engineer"), "{text}");
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_pdf_pages_in_order_each_newline_terminated() {
        let doc = UploadedDocument::new(
            "two_pages.pdf",
            pdf_bytes(&["Summary of Jane", "Employment at Company X"]),
        );
        let text = extract_text(Some(&doc)).await;
        let first = text.find("Summary").expect("first page text");
        let second = text.find("Employment").expect("second page text");
        assert!(first < second, "{text}");
        assert!(text[first..second].contains('\n'), "{text}");
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_none_yields_empty_text() {
        assert_eq!(extract_text(None).await, "");
    }

    #[tokio::test]
    async fn test_plain_text_is_decoded() {
        let doc = UploadedDocument::new("jane.txt", "Jane Doe\nCompany X, 2024-Present");
        assert_eq!(
            extract_text(Some(&doc)).await,
            "Jane Doe\nCompany X, 2024-Present"
        );
    }

    #[tokio::test]
    async fn test_extension_match_is_case_insensitive() {
        let doc = UploadedDocument::new("JANE.TXT", "hello");
        assert_eq!(extract_text(Some(&doc)).await, "hello");
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let doc = UploadedDocument::new("photo.png", vec![0u8, 1, 2]);
        let text = extract_text(Some(&doc)).await;
        assert_eq!(text, "Unsupported file format: photo.png");
        assert!(is_extraction_failure(&text));
    }

    #[tokio::test]
    async fn test_name_without_extension_is_unsupported() {
        let doc = UploadedDocument::new("resume", "text");
        assert!(extract_text(Some(&doc))
            .await
            .starts_with(UNSUPPORTED_PREFIX));
    }

    #[tokio::test]
    async fn test_invalid_utf8_reports_read_error() {
        let doc = UploadedDocument::new("bad.txt", vec![0x66, 0x6f, 0xff, 0xfe]);
        let text = extract_text(Some(&doc)).await;
        assert!(text.starts_with("Error reading bad.txt: "), "{text}");
        assert!(is_extraction_failure(&text));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_reports_read_error() {
        let doc = UploadedDocument::new("broken.pdf", b"not really a pdf".to_vec());
        let text = extract_text(Some(&doc)).await;
        assert!(text.starts_with("Error reading broken.pdf"), "{text}");
    }

    #[tokio::test]
    async fn test_corrupt_word_file_reports_read_error() {
        let doc = UploadedDocument::new("legacy.doc", b"\xd0\xcf\x11\xe0 old format".to_vec());
        let text = extract_text(Some(&doc)).await;
        assert!(text.starts_with("Error reading legacy.doc"), "{text}");
    }

    #[tokio::test]
    async fn test_docx_paragraphs_joined_by_newlines() {
        let bytes = docx_bytes(&["Jane Doe", "Software Engineer at Company X"]);
        let doc = UploadedDocument::new("jane.docx", bytes);
        let text = extract_text(Some(&doc)).await;
        assert_eq!(text, "Jane Doe\nSoftware Engineer at Company X\n");
    }

    #[test]
    fn test_display_name_strips_client_directories() {
        assert_eq!(
            UploadedDocument::new("uploads/2024/cv.pdf", "").display_name(),
            "cv.pdf"
        );
        assert_eq!(
            UploadedDocument::new("C:\\Users\\me\\cv.pdf", "").display_name(),
            "cv.pdf"
        );
        assert_eq!(UploadedDocument::new("cv.pdf", "").display_name(), "cv.pdf");
    }

    #[test]
    fn test_failure_prefixes() {
        assert!(is_extraction_failure("Error reading x.pdf: boom"));
        assert!(is_extraction_failure("Unsupported file format: x.xls"));
        assert!(!is_extraction_failure("Jane Doe, Error-free engineer"));
    }
}
