use std::path::Path;

use axum::{
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use tracing::warn;

/// Resume document as an attachment, or 404 when it cannot be read.
pub async fn serve_resume(path: &Path, filename: &str) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => (
            [
                (CONTENT_TYPE, "application/pdf".to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            warn!("Error serving PDF {}: {e}", path.display());
            (StatusCode::NOT_FOUND, "PDF not found").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[tokio::test]
    async fn test_serves_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, b"%PDF-1.7 fake").unwrap();

        let response = serve_resume(&path, "Jane_Doe_Resume.pdf").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"Jane_Doe_Resume.pdf\""
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"%PDF-1.7 fake");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let response = serve_resume(&dir.path().join("nope.pdf"), "resume.pdf").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
