use crate::error::{ApiError, OrInternal};
use crate::models::content_models::{ContentDraft, ContentEntity, ContentPatch, PageScoped};
use crate::models::db_operations::content_db_operations::{self as store, Document};
use chrono::Utc;
use redb::Database;
use serde::Serialize;
use serde_json::{json, Value};

fn fetch_failed<T: ContentEntity>() -> String {
    format!("Failed to fetch {}", T::COLLECTION.replace('_', " "))
}

fn sorted<T: ContentEntity>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by(T::listing_order);
    items
}

/// Every record of the family in listing order, visible or not.
pub fn list_all<T: ContentEntity>(db: &Database) -> Result<Vec<T>, ApiError> {
    let items = store::read_all::<T>(db, T::COLLECTION).or_internal(&fetch_failed::<T>())?;
    Ok(sorted(items))
}

/// Publicly visible records, shaped for anonymous readers.
pub fn list_public<T: ContentEntity>(db: &Database) -> Result<Vec<T::PublicView>, ApiError> {
    Ok(list_all::<T>(db)?
        .into_iter()
        .filter(T::is_public)
        .map(|item| item.public_view())
        .collect())
}

pub fn list_all_for_page<T: PageScoped>(db: &Database, page: &str) -> Result<Vec<T>, ApiError> {
    Ok(list_all::<T>(db)?.into_iter().filter(|item| item.page() == page).collect())
}

pub fn list_public_for_page<T: PageScoped>(db: &Database, page: &str) -> Result<Vec<T::PublicView>, ApiError> {
    Ok(list_all_for_page::<T>(db, page)?
        .into_iter()
        .filter(T::is_public)
        .map(|item| item.public_view())
        .collect())
}

/// A single visible record; hidden records read as missing.
pub fn find_public<T: ContentEntity>(db: &Database, id: &str) -> Result<T::PublicView, ApiError> {
    store::find_by_id::<T>(db, T::COLLECTION, id)
        .or_internal(&fetch_failed::<T>())?
        .filter(T::is_public)
        .map(|item| item.public_view())
        .ok_or_else(|| ApiError::not_found(format!("{} not found", T::LABEL)))
}

pub fn create<D: ContentDraft>(db: &Database, draft: D, author: &str) -> Result<D::Entity, ApiError> {
    let entity = draft.into_entity(author);
    store::insert_document(db, D::Entity::COLLECTION, entity.id(), &entity)
        .or_internal(&format!("Failed to create {}", D::Entity::LABEL.to_lowercase()))?;
    Ok(entity)
}

/// Converts a validated patch into the document fragment merged into storage,
/// stamping `updated_at`.
pub fn patch_document<P: ContentPatch>(patch: P) -> Result<Document, ApiError> {
    let value = serde_json::to_value(patch.sanitized()).or_internal("Failed to encode update")?;
    let Value::Object(mut fields) = value else {
        return Err(ApiError::Validation("Update payload must be a JSON object".into()));
    };
    fields.insert("updated_at".to_string(), json!(Utc::now()));
    Ok(fields)
}

pub fn update<P: ContentPatch>(db: &Database, id: &str, patch: P) -> Result<(), ApiError> {
    let label = P::Entity::LABEL;
    let fields = patch_document(patch)?;
    let found = store::update_by_id(db, P::Entity::COLLECTION, id, fields)
        .or_internal(&format!("Failed to update {}", label.to_lowercase()))?;
    if found {
        Ok(())
    } else {
        Err(ApiError::not_found(format!("{} not found", label)))
    }
}

pub fn delete<T: ContentEntity>(db: &Database, id: &str) -> Result<(), ApiError> {
    let found = store::delete_by_id(db, T::COLLECTION, id)
        .or_internal(&format!("Failed to delete {}", T::LABEL.to_lowercase()))?;
    if found {
        Ok(())
    } else {
        Err(ApiError::not_found(format!("{} not found", T::LABEL)))
    }
}

/// Wraps a listing in the family's envelope key, or returns it bare.
pub fn list_body<V: Serialize>(key: Option<&str>, items: Vec<V>) -> Value {
    match key {
        Some(key) => json!({ key: items }),
        None => json!(items),
    }
}
