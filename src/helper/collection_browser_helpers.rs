use crate::error::{ApiError, OrInternal};
use crate::models::collection_browser_models::{
    CollectionInfo, CollectionPage, CollectionQuery, CollectionStat, CollectionsOverview, DatabaseStats,
};
use crate::models::db_operations::accounts_db_operations::{self as accounts_db, ADMIN_USERS};
use crate::models::db_operations::content_db_operations::{self as store, Document};
use chrono::{DateTime, Utc};
use redb::Database;
use rusqlite::Connection;
use serde_json::{json, Value};
use std::cmp::Reverse;
use uuid::Uuid;

pub const DEFAULT_PAGE_LIMIT: u32 = 100;
pub const MAX_PAGE_LIMIT: u32 = 500;

fn display_name(collection: &str) -> (String, String) {
    let (name, description) = match collection {
        store::CONTACTS => ("Contact Messages", "Messages sent through the contact form"),
        store::VOLUNTEERS => ("Volunteer Applications", "Applications from prospective volunteers"),
        store::NEWSLETTERS => ("Newsletter Subscriptions", "Newsletter mailing list"),
        store::NEWS => ("News Articles", "News and announcements"),
        store::BLOGS => ("Blog Posts", "Long-form blog content"),
        store::IMPACT_STATS => ("Impact Statistics", "Headline impact counters"),
        store::SITE_CONTENT => ("Site Content", "Editable copy for site pages"),
        store::SITE_SETTINGS => ("Site Settings", "Branding and social links"),
        store::SUCCESS_STORIES => ("Success Stories", "Beneficiary stories"),
        store::LEADERSHIP_TEAM => ("Leadership Team", "Trustees and staff profiles"),
        store::PAGE_SECTIONS => ("Page Sections", "Free-form page sections"),
        store::DETAILED_PAGE_SECTIONS => ("Detailed Page Sections", "Structured page sections"),
        store::GALLERY_ITEMS => ("Gallery Items", "Photos and videos"),
        ADMIN_USERS => ("Admin Users", "Administrator accounts (read only)"),
        other => return (title_case(other), String::new()),
    };
    (name.to_string(), description.to_string())
}

fn title_case(collection: &str) -> String {
    collection
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn account_documents(conn: &Connection) -> Result<Vec<Value>, ApiError> {
    let accounts = accounts_db::read_all_accounts(conn).or_internal("Failed to fetch admin users")?;
    accounts
        .into_iter()
        .map(|account| {
            let mut value = serde_json::to_value(&account).or_internal("Failed to encode admin user")?;
            if let Value::Object(map) = &mut value {
                map.insert("_id".to_string(), json!(account.id));
            }
            Ok(value)
        })
        .collect()
}

fn count_accounts(conn: &Connection) -> Result<u64, ApiError> {
    let count = accounts_db::count_accounts(conn).or_internal("Failed to count admin users")?;
    Ok(count.max(0) as u64)
}

/// Per-collection counts and stored sizes, largest collection first.
pub fn database_stats(db: &Database, conn: &Connection) -> Result<DatabaseStats, ApiError> {
    let mut collection_stats: Vec<CollectionStat> = store::list_collections(db)
        .or_internal("Failed to fetch database stats")?
        .into_iter()
        .map(|summary| CollectionStat {
            collection: summary.name,
            count: summary.count,
            size: summary.size_bytes,
        })
        .collect();
    collection_stats.push(CollectionStat {
        collection: ADMIN_USERS.to_string(),
        count: count_accounts(conn)?,
        size: 0,
    });
    collection_stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.collection.cmp(&b.collection)));

    Ok(DatabaseStats {
        total_collections: collection_stats.len(),
        total_documents: collection_stats.iter().map(|s| s.count).sum(),
        collection_stats,
    })
}

pub fn list_collections(db: &Database, conn: &Connection) -> Result<CollectionsOverview, ApiError> {
    let mut collections: Vec<CollectionInfo> = store::list_collections(db)
        .or_internal("Failed to fetch collections")?
        .into_iter()
        .map(|summary| {
            let (name, description) = display_name(&summary.name);
            CollectionInfo {
                collection: summary.name,
                name,
                description,
                count: summary.count,
            }
        })
        .collect();

    let (name, description) = display_name(ADMIN_USERS);
    collections.push(CollectionInfo {
        collection: ADMIN_USERS.to_string(),
        name,
        description,
        count: count_accounts(conn)?,
    });
    collections.sort_by(|a, b| a.collection.cmp(&b.collection));

    Ok(CollectionsOverview { collections })
}

fn created_at(doc: &Value) -> Option<DateTime<Utc>> {
    doc.get("created_at")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&Utc))
}

fn with_storage_key((key, mut doc): (Uuid, Document)) -> Value {
    doc.insert("_id".to_string(), json!(key.to_string()));
    Value::Object(doc)
}

/// One page of raw documents, newest first. Documents without a parseable
/// `created_at` sort last.
pub fn collection_page(
    db: &Database,
    conn: &Connection,
    collection: &str,
    query: &CollectionQuery,
) -> Result<CollectionPage, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    let skip = query.skip.unwrap_or(0);

    let mut documents = if collection == ADMIN_USERS {
        account_documents(conn)?
    } else {
        let known = store::CONTENT_COLLECTIONS.contains(&collection)
            || store::collection_exists(db, collection).or_internal("Failed to fetch collection")?;
        if !known {
            return Err(ApiError::not_found(format!("Collection '{}' not found", collection)));
        }
        store::read_documents(db, collection)
            .or_internal("Failed to fetch collection")?
            .into_iter()
            .map(with_storage_key)
            .collect()
    };
    documents.sort_by_key(|doc| Reverse(created_at(doc)));

    let total_count = documents.len() as u64;
    let documents: Vec<Value> = documents.into_iter().skip(skip as usize).take(limit as usize).collect();
    let has_more = u64::from(skip) + (documents.len() as u64) < total_count;

    Ok(CollectionPage {
        collection: collection.to_string(),
        documents,
        total_count,
        limit,
        skip,
        has_more,
    })
}

/// Deletes by entity `id`, falling back to the storage key.
pub fn delete_document(db: &Database, collection: &str, id: &str) -> Result<(), ApiError> {
    if collection == ADMIN_USERS {
        return Err(ApiError::Forbidden(
            "Cannot delete admin users through this interface".to_string(),
        ));
    }
    let exists = store::collection_exists(db, collection).or_internal("Failed to delete document")?;
    if !exists {
        return Err(ApiError::not_found(format!("Collection '{}' not found", collection)));
    }

    if store::delete_by_id(db, collection, id).or_internal("Failed to delete document")? {
        return Ok(());
    }
    if let Ok(key) = Uuid::parse_str(id) {
        if store::delete_by_storage_key(db, collection, key).or_internal("Failed to delete document")? {
            return Ok(());
        }
    }
    Err(ApiError::not_found("Document not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::db_setup::setup_accounts_db;

    fn stores() -> (tempfile::TempDir, Database, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::create(dir.path().join("content.redb")).unwrap();
        let mut conn = Connection::open_in_memory().unwrap();
        setup_accounts_db(&mut conn).unwrap();
        (dir, db, conn)
    }

    fn put(db: &Database, collection: &str, key: Uuid, doc: Value) {
        let Value::Object(doc) = doc else { panic!("not an object") };
        store::modify_collection(db, collection, |table| store::put_document(table, key, &doc)).unwrap();
    }

    #[test]
    fn page_is_newest_first_with_storage_keys() {
        let (_dir, db, conn) = stores();
        for day in 1..=5 {
            let key = Uuid::new_v4();
            put(&db, store::NEWS, key, json!({"title": format!("day {}", day), "created_at": format!("2024-01-0{}T00:00:00Z", day)}));
        }

        let query = CollectionQuery { limit: Some(2), skip: Some(1) };
        let page = collection_page(&db, &conn, store::NEWS, &query).unwrap();
        assert_eq!(page.total_count, 5);
        assert!(page.has_more);
        assert_eq!(page.documents[0]["title"], "day 4");
        assert_eq!(page.documents[1]["title"], "day 3");
        assert!(page.documents[0]["_id"].is_string());
    }

    #[test]
    fn limit_is_clamped() {
        let (_dir, db, conn) = stores();
        let page = collection_page(&db, &conn, store::NEWS, &CollectionQuery { limit: Some(0), skip: None }).unwrap();
        assert_eq!(page.limit, 1);
        let page = collection_page(&db, &conn, store::NEWS, &CollectionQuery { limit: Some(9000), skip: None }).unwrap();
        assert_eq!(page.limit, MAX_PAGE_LIMIT);
        assert!(!page.has_more);
    }

    #[test]
    fn unknown_collection_is_not_found() {
        let (_dir, db, conn) = stores();
        let query = CollectionQuery { limit: None, skip: None };
        assert!(matches!(
            collection_page(&db, &conn, "nope", &query),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn delete_falls_back_to_storage_key() {
        let (_dir, db, _conn) = stores();
        let key = Uuid::new_v4();
        put(&db, store::GALLERY_ITEMS, key, json!({"title": "imported"}));

        delete_document(&db, store::GALLERY_ITEMS, &key.to_string()).unwrap();
        assert!(matches!(
            delete_document(&db, store::GALLERY_ITEMS, &key.to_string()),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            delete_document(&db, ADMIN_USERS, "whatever"),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn stats_include_admin_users_sorted_by_count() {
        let (_dir, db, conn) = stores();
        put(&db, store::NEWS, Uuid::new_v4(), json!({"title": "a"}));
        put(&db, store::NEWS, Uuid::new_v4(), json!({"title": "b"}));

        let stats = database_stats(&db, &conn).unwrap();
        assert_eq!(stats.total_documents, 2);
        assert_eq!(stats.collection_stats[0].collection, store::NEWS);
        assert!(stats.collection_stats.iter().any(|s| s.collection == ADMIN_USERS));

        let overview = list_collections(&db, &conn).unwrap();
        let names: Vec<_> = overview.collections.iter().map(|c| c.collection.as_str()).collect();
        assert_eq!(names, vec![ADMIN_USERS, store::NEWS]);
        assert_eq!(overview.collections[1].name, "News Articles");
    }
}
