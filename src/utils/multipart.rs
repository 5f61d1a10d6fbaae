use actix_multipart::Multipart;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use super::error::AppError;
use super::upload::UploadedFile;

/// A fully buffered multipart form: text fields plus at most one file.
#[derive(Debug, Default)]
pub struct FormSubmission {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl FormSubmission {
    /// Drains the payload. Parts named `file_field` that carry a filename become the
    /// attachment; every other part is read as UTF-8 text.
    pub async fn read(
        mut payload: Multipart,
        file_field: &str,
        max_bytes: usize,
    ) -> Result<Self, AppError> {
        let mut form = FormSubmission::default();

        while let Some(item) = payload.next().await {
            let mut field = item
                .map_err(|e| AppError::InvalidRequest(format!("Malformed multipart body: {}", e)))?;

            let name = field.name().unwrap_or_default().to_string();
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            let mut data = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(|e| {
                    AppError::InvalidRequest(format!("Failed to read field '{}': {}", name, e))
                })?;
                if data.len() + chunk.len() > max_bytes {
                    return Err(AppError::UploadError(format!(
                        "Field '{}' exceeds the {} byte limit",
                        name, max_bytes
                    )));
                }
                data.extend_from_slice(&chunk);
            }

            match filename {
                Some(filename) if name == file_field => {
                    // Browsers send an empty part when no file was picked.
                    if !data.is_empty() {
                        form.file = Some(UploadedFile { filename, bytes: data });
                    }
                }
                _ => {
                    let text = String::from_utf8(data).map_err(|_| {
                        AppError::InvalidRequest(format!("Field '{}' is not valid UTF-8", name))
                    })?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Decodes the text fields into `T`; numeric fields are expected to accept text.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        let object: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| AppError::InvalidRequest(e.to_string()))
    }
}
