use axum::extract::Multipart;
use axum::Json;

use crate::errors::AppError;
use crate::resume::{parse_resume_pdf, ParsedResume};

/// POST /api/v1/resumes
/// Accepts a multipart `file` field containing a PDF; returns the extracted
/// text plus best-effort contact details for prefilling the intake form.
pub async fn handle_upload_resume(
    mut multipart: Multipart,
) -> Result<Json<ParsedResume>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let is_pdf = field.content_type() == Some("application/pdf")
            || field
                .file_name()
                .map(|n| n.to_lowercase().ends_with(".pdf"))
                .unwrap_or(false);
        if !is_pdf {
            return Err(AppError::Validation(
                "unsupported file type, please upload a PDF".to_string(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        let parsed = parse_resume_pdf(&data)?;
        return Ok(Json(parsed));
    }

    Err(AppError::Validation(
        "multipart field 'file' is required".to_string(),
    ))
}
