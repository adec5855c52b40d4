//! Plain-text extraction from uploaded resume files.

use std::path::Path;

use crate::errors::AppError;

/// Extracts UTF-8 text from a stored upload, dispatching on the file
/// extension. Supported: `.pdf` and `.txt`. Legacy word-processor formats
/// are not converted.
///
/// The result is normalized to non-empty trimmed lines so downstream
/// heuristics (contact parsing) see one paragraph per line.
pub async fn extract_text(path: &Path) -> Result<String, AppError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let raw = match extension.as_str() {
        "pdf" => extract_pdf(path).await?,
        "txt" | "text" => tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::UnprocessableEntity(format!("failed to read text file: {e}"))
        })?,
        other => {
            return Err(AppError::UnprocessableEntity(format!(
                "unsupported resume format '.{other}' (expected .pdf or .txt)"
            )))
        }
    };

    let text = normalize_paragraphs(&raw);
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "document contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

/// PDF parsing is CPU-bound, so it runs on the blocking thread pool.
async fn extract_pdf(path: &Path) -> Result<String, AppError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task panicked: {e}")))?
        .map_err(|e| AppError::UnprocessableEntity(format!("failed to extract PDF text: {e}")))
}

fn normalize_paragraphs(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_txt_extraction_normalizes_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "John Doe\n\n\n  Python developer  \n").unwrap();

        let text = extract_text(&path).await.unwrap();
        assert_eq!(text, "John Doe\nPython developer");
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        std::fs::write(&path, b"not really a docx").unwrap();

        let err = extract_text(&path).await.unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn test_empty_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "\n  \n").unwrap();

        let err = extract_text(&path).await.unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_normalize_keeps_line_order() {
        let text = normalize_paragraphs("a\n\nb\nc\n");
        assert_eq!(text, "a\nb\nc");
    }
}
