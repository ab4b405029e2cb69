//! CV documents → plain text for the extractor prompt.

use tracing::debug;

use crate::evaluation::{CvDocument, EvalError};

pub const PDF: &str = "application/pdf";
pub const SUPPORTED_MEDIA_TYPES: &[&str] = &[PDF, "text/plain", "text/markdown"];

/// Longest CV text sent to the model, in characters.
const MAX_CV_CHARS: usize = 60_000;

/// Media type without parameters, lowercased (`Text/Plain; charset=utf-8` → `text/plain`).
pub fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn is_supported(media_type: &str) -> bool {
    SUPPORTED_MEDIA_TYPES.contains(&essence(media_type).as_str())
}

/// Media type for an upload. Browsers often send `application/octet-stream`
/// or nothing at all, in which case the file extension decides.
pub fn resolve_media_type(declared: Option<&str>, file_name: &str) -> String {
    match declared.map(essence) {
        Some(media_type) if media_type != "application/octet-stream" && !media_type.is_empty() => {
            media_type
        }
        declared => {
            let extension = file_name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase());
            match extension.as_deref() {
                Some("pdf") => PDF.to_string(),
                Some("txt") => "text/plain".to_string(),
                Some("md") | Some("markdown") => "text/markdown".to_string(),
                _ => declared.unwrap_or_else(|| "application/octet-stream".to_string()),
            }
        }
    }
}

/// Extracts the document's text. PDF parsing runs on the blocking pool.
pub async fn extract_text(document: &CvDocument) -> Result<String, EvalError> {
    let media_type = essence(&document.media_type);
    let text = match media_type.as_str() {
        PDF => {
            let bytes = document.bytes.clone();
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| EvalError::Declined(format!("PDF extraction aborted: {e}")))?
                .map_err(|e| {
                    EvalError::Declined(format!("unreadable PDF {}: {e:?}", document.file_name))
                })?
        }
        "text/plain" | "text/markdown" => String::from_utf8(document.bytes.to_vec())
            .map_err(|_| EvalError::Declined(format!("{} is not valid UTF-8", document.file_name)))?,
        other => {
            return Err(EvalError::Declined(format!(
                "unsupported media type {other} for {}",
                document.file_name
            )))
        }
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(EvalError::Declined(format!(
            "{} contains no extractable text",
            document.file_name
        )));
    }

    Ok(truncate_chars(text, MAX_CV_CHARS))
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => {
            debug!("CV text truncated from {} bytes to {}", text.len(), cut);
            text[..cut].to_string()
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn doc(media_type: &str, body: &'static [u8]) -> CvDocument {
        CvDocument {
            file_name: "cv.txt".to_string(),
            media_type: media_type.to_string(),
            bytes: Bytes::from_static(body),
        }
    }

    #[test]
    fn test_media_type_essence() {
        assert_eq!(essence("Text/Plain; charset=utf-8"), "text/plain");
        assert!(is_supported("application/pdf"));
        assert!(is_supported("text/markdown"));
        assert!(!is_supported("image/png"));
    }

    #[test]
    fn test_resolve_media_type_falls_back_to_extension() {
        assert_eq!(resolve_media_type(Some("text/plain"), "cv.pdf"), "text/plain");
        assert_eq!(
            resolve_media_type(Some("application/octet-stream"), "CV.PDF"),
            PDF
        );
        assert_eq!(resolve_media_type(None, "notes.md"), "text/markdown");
        assert_eq!(resolve_media_type(None, "photo"), "application/octet-stream");
        assert_eq!(
            resolve_media_type(Some("application/octet-stream"), "cv.docx"),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_plain_text_is_trimmed() {
        let text = extract_text(&doc("text/plain", b"  Ada Lovelace\nAnalyst  \n"))
            .await
            .unwrap();
        assert_eq!(text, "Ada Lovelace\nAnalyst");
    }

    #[tokio::test]
    async fn test_blank_document_is_declined() {
        let err = extract_text(&doc("text/plain", b"   \n ")).await.unwrap_err();
        assert!(matches!(err, EvalError::Declined(_)));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_declined() {
        let err = extract_text(&doc("text/plain", &[0xff, 0xfe, 0x00]))
            .await
            .unwrap_err();
        assert!(matches!(err, EvalError::Declined(_)));
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_declined() {
        let err = extract_text(&doc(PDF, b"definitely not a pdf")).await.unwrap_err();
        assert!(matches!(err, EvalError::Declined(_)));
    }

    #[tokio::test]
    async fn test_unsupported_type_is_declined() {
        let err = extract_text(&doc("image/png", b"\x89PNG")).await.unwrap_err();
        assert!(matches!(err, EvalError::Declined(_)));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 10), "short");
    }
}
