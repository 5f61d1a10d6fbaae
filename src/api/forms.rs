//! Multipart handlers for resources that carry an uploaded file.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};

use super::crud::updated_response;
use crate::models::{Editable, RecordMeta, Resource};
use crate::services::repository::Repository;
use crate::state::AppState;
use crate::utils::multipart::FormSubmission;
use crate::utils::{AppError, UploadKind, Validate};

fn upload_kind<T: Resource>() -> Result<UploadKind, AppError> {
    T::UPLOAD.ok_or_else(|| {
        AppError::InternalError(format!("{} does not accept file uploads", T::LABEL))
    })
}

async fn read_input<T: Editable>(
    state: &AppState,
    kind: UploadKind,
    payload: Multipart,
) -> Result<(T::Input, FormSubmission), AppError> {
    let form = FormSubmission::read(payload, kind.field(), state.uploads.max_bytes()).await?;
    let input: T::Input = form.parse()?;
    input.validate().into_result()?;
    Ok((input, form))
}

pub async fn create<T: Editable>(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let kind = upload_kind::<T>()?;
    let (input, form) = read_input::<T>(&state, kind, payload).await?;

    let mut record = T::from_input(input, RecordMeta::new());
    if let Some(file) = &form.file {
        record.set_attachment(state.uploads.save(kind, file).await?);
    }

    if let Err(e) = Repository::<T>::new(state.store.as_ref()).insert(&record).await {
        if let Some(path) = record.attachment() {
            state.uploads.remove(path).await;
        }
        return Err(e);
    }

    log::info!("✅ {} created: {}", T::LABEL, record.meta().id);
    Ok(HttpResponse::Created().json(record))
}

/// Full replace. Without a new file the stored attachment is kept; a new file
/// replaces it and the old one is deleted once the record is saved.
pub async fn update<T: Editable>(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let kind = upload_kind::<T>()?;
    let repo = Repository::<T>::new(state.store.as_ref());
    let existing = repo.get(&path).await?;

    let (input, form) = read_input::<T>(&state, kind, payload).await?;
    let mut record = T::from_input(input, existing.meta().touched());

    let new_file = match &form.file {
        Some(file) => {
            let stored = state.uploads.save(kind, file).await?;
            record.set_attachment(stored.clone());
            Some(stored)
        }
        None => {
            if let Some(old) = existing.attachment() {
                record.set_attachment(old.to_string());
            }
            None
        }
    };

    let saved = match repo.replace(&record).await {
        Ok(saved) => saved,
        Err(e) => {
            if let Some(stored) = &new_file {
                state.uploads.remove(stored).await;
            }
            return Err(e);
        }
    };

    if new_file.is_some() {
        if let Some(old) = existing.attachment() {
            state.uploads.remove(old).await;
        }
    }

    log::info!("✏️  {} updated: {}", T::LABEL, saved.meta().id);
    Ok(updated_response::<T>(&saved))
}
