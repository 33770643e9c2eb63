use crate::error::{ApiError, OrInternal};
use crate::models::db_operations::content_db_operations::{self as store, Document};
use crate::models::site_models::{
    ContactInfoUpdate, ImpactStats, ImpactStatsUpdate, SiteContent, SiteSettings, SiteSettingsUpdate,
};
use chrono::Utc;
use redb::Database;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

fn read_or_default<T: DeserializeOwned + Default>(db: &Database, collection: &str, context: &str) -> Result<T, ApiError> {
    Ok(store::read_singleton::<T>(db, collection).or_internal(context)?.unwrap_or_default())
}

/// Serializes the supplied fields of an update and stamps the editor.
fn audited_patch<T: Serialize>(update: &T, editor: &str) -> Result<Document, ApiError> {
    let mut fields = store::to_document(update).or_internal("Failed to encode update")?;
    fields.insert("updated_at".to_string(), json!(Utc::now()));
    fields.insert("updated_by".to_string(), json!(editor));
    Ok(fields)
}

fn decode<T: DeserializeOwned>(doc: Document, context: &str) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(doc)).or_internal(context)
}

pub fn impact_stats(db: &Database) -> Result<ImpactStats, ApiError> {
    read_or_default(db, store::IMPACT_STATS, "Failed to fetch impact stats")
}

/// Merges the supplied counters into the single stats record.
pub fn update_impact_stats(db: &Database, update: &ImpactStatsUpdate, editor: &str) -> Result<ImpactStats, ApiError> {
    let fields = audited_patch(update, editor)?;
    let merged = store::merge_singleton(db, store::IMPACT_STATS, fields).or_internal("Failed to update impact stats")?;
    decode(merged, "Failed to update impact stats")
}

pub fn site_settings(db: &Database) -> Result<SiteSettings, ApiError> {
    read_or_default(db, store::SITE_SETTINGS, "Failed to fetch site settings")
}

/// Empty strings clear optional links rather than storing "".
pub fn update_site_settings(db: &Database, update: &SiteSettingsUpdate, editor: &str) -> Result<SiteSettings, ApiError> {
    let mut fields = audited_patch(update, editor)?;
    for (key, value) in fields.iter_mut() {
        let blank = value.as_str().map(|s| s.trim().is_empty()).unwrap_or(false);
        if key.ends_with("_url") && blank {
            *value = Value::Null;
        }
    }
    let merged = store::merge_singleton(db, store::SITE_SETTINGS, fields).or_internal("Failed to update site settings")?;
    decode(merged, "Failed to update site settings")
}

pub fn site_content(db: &Database) -> Result<SiteContent, ApiError> {
    read_or_default(db, store::SITE_CONTENT, "Failed to fetch site content")
}

/// Replaces the whole content tree.
pub fn replace_site_content(db: &Database, content: Map<String, Value>, editor: &str) -> Result<SiteContent, ApiError> {
    let mut fields = Document::new();
    fields.insert("content".to_string(), Value::Object(content));
    fields.insert("updated_at".to_string(), json!(Utc::now()));
    fields.insert("updated_by".to_string(), json!(editor));

    let merged = store::merge_singleton(db, store::SITE_CONTENT, fields).or_internal("Failed to update site content")?;
    decode(merged, "Failed to update site content")
}

/// Returns the object stored under `key`, replacing any non-object value.
fn child_object<'a>(parent: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = parent.entry(key.to_string()).or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just set to an object"),
    }
}

/// Merges contact details into `content.contact.contactInfo`, leaving the rest
/// of the tree untouched.
pub fn update_contact_info(db: &Database, update: &ContactInfoUpdate, editor: &str) -> Result<SiteContent, ApiError> {
    let details = store::to_document(update).or_internal("Failed to encode update")?;
    let editor = editor.to_string();

    let stored = store::update_singleton(db, store::SITE_CONTENT, move |doc| {
        let content = child_object(doc, "content");
        let contact = child_object(content, "contact");
        let info = child_object(contact, "contactInfo");
        store::shallow_merge(info, details);

        doc.insert("updated_at".to_string(), json!(Utc::now()));
        doc.insert("updated_by".to_string(), json!(editor));
    })
    .or_internal("Failed to update contact info")?;

    decode(stored, "Failed to update contact info")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::create(dir.path().join("content.redb")).unwrap();
        (dir, db)
    }

    #[test]
    fn stats_updates_accumulate() {
        let (_dir, db) = temp_db();
        assert_eq!(impact_stats(&db).unwrap().youth_trained, 1300);

        let first = ImpactStatsUpdate {
            youth_trained: Some(1500),
            ..Default::default()
        };
        update_impact_stats(&db, &first, "root").unwrap();

        let second = ImpactStatsUpdate {
            women_empowered: Some(250),
            ..Default::default()
        };
        let stats = update_impact_stats(&db, &second, "ed").unwrap();
        assert_eq!(stats.youth_trained, 1500);
        assert_eq!(stats.women_empowered, 250);
        assert_eq!(stats.updated_by.as_deref(), Some("ed"));
        assert_eq!(store::read_documents(&db, store::IMPACT_STATS).unwrap().len(), 1);
    }

    #[test]
    fn blank_links_clear_settings() {
        let (_dir, db) = temp_db();
        let set = SiteSettingsUpdate {
            facebook_url: Some("https://facebook.com/shield".into()),
            ..Default::default()
        };
        update_site_settings(&db, &set, "root").unwrap();

        let clear = SiteSettingsUpdate {
            facebook_url: Some(String::new()),
            ..Default::default()
        };
        let settings = update_site_settings(&db, &clear, "root").unwrap();
        assert!(settings.facebook_url.is_none());
        assert_eq!(settings.site_title, "Shield Foundation");
    }

    #[test]
    fn contact_info_merges_into_nested_content() {
        let (_dir, db) = temp_db();
        let mut content = Map::new();
        content.insert("hero".into(), json!({"title": "Welcome"}));
        content.insert("contact".into(), json!({"contactInfo": {"phone": "+91 1"}, "mapUrl": "m"}));
        replace_site_content(&db, content, "root").unwrap();

        let update = ContactInfoUpdate {
            email: Some("hello@example.org".into()),
            ..Default::default()
        };
        let stored = update_contact_info(&db, &update, "ed").unwrap();

        assert_eq!(stored.content["hero"]["title"], "Welcome");
        assert_eq!(stored.content["contact"]["mapUrl"], "m");
        assert_eq!(stored.content["contact"]["contactInfo"]["phone"], "+91 1");
        assert_eq!(stored.content["contact"]["contactInfo"]["email"], "hello@example.org");
    }
}
