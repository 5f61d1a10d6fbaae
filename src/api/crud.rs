//! Generic JSON handlers shared by every resource route.

use actix_web::{web, HttpResponse};
use serde_json::json;
use std::collections::HashMap;

use crate::models::{Editable, ListQuery, RecordMeta, Resource};
use crate::services::repository::Repository;
use crate::state::AppState;
use crate::utils::{AppError, Validate};

pub async fn list<T: Resource>(
    state: web::Data<AppState>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let query = ListQuery::from_params::<T>(&params)?;
    let records = Repository::<T>::new(state.store.as_ref()).list(&query).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": records.len(),
        "data": records
    })))
}

pub async fn get<T: Resource>(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let record = Repository::<T>::new(state.store.as_ref()).get(&path).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub async fn create<T: Editable>(
    state: web::Data<AppState>,
    body: web::Json<T::Input>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    input.validate().into_result()?;

    let record = T::from_input(input, RecordMeta::new());
    Repository::<T>::new(state.store.as_ref()).insert(&record).await?;

    log::info!("✅ {} created: {}", T::LABEL, record.meta().id);
    Ok(HttpResponse::Created().json(record))
}

pub async fn update<T: Editable>(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<T::Input>,
) -> Result<HttpResponse, AppError> {
    let repo = Repository::<T>::new(state.store.as_ref());
    let existing = repo.get(&path).await?;

    let input = body.into_inner();
    input.validate().into_result()?;

    let mut record = T::from_input(input, existing.meta().touched());
    if let Some(attachment) = existing.attachment() {
        record.set_attachment(attachment.to_string());
    }
    let saved = repo.replace(&record).await?;

    log::info!("✏️  {} updated: {}", T::LABEL, saved.meta().id);
    Ok(updated_response::<T>(&saved))
}

pub async fn remove<T: Resource>(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let removed = Repository::<T>::new(state.store.as_ref()).delete(&path).await?;
    if let Some(attachment) = removed.attachment() {
        state.uploads.remove(attachment).await;
    }

    log::info!("🗑️  {} deleted: {}", T::LABEL, removed.meta().id);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("{} deleted successfully", T::LABEL)
    })))
}

pub(crate) fn updated_response<T: Resource>(record: &T) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("{} updated successfully", T::LABEL),
        "data": record
    }))
}
