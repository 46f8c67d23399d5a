//! Multipart form reading shared by the resume and Drive upload routes.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::errors::AppError;

/// Uploads larger than this are rejected before reaching a handler.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// The `file` part, or a validation error naming what is missing.
    pub fn require_file(self) -> Result<(UploadedFile, HashMap<String, String>), AppError> {
        let file = self
            .file
            .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
        if file.bytes.is_empty() {
            return Err(AppError::Validation("Empty file".to_string()));
        }
        Ok((file, self.fields))
    }
}

/// Reads every part: the one named `file` as bytes, the rest as text fields.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Read error: {e}")))?
                .to_vec();
            form.file = Some(UploadedFile {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Read error: {e}")))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
