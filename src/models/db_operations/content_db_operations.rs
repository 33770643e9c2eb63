use redb::{
    CommitError, Database, ReadableTable, StorageError, Table, TableDefinition, TableError, TableHandle,
    TransactionError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Redb storage error: {0}")]
    RedbStorage(#[from] StorageError),
    #[error("Redb transaction error: {0}")]
    RedbTransaction(#[from] TransactionError),
    #[error("Redb table error: {0}")]
    RedbTable(#[from] TableError),
    #[error("Redb commit error: {0}")]
    RedbCommit(#[from] CommitError),
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Document is not a JSON object: {0}")]
    NotAnObject(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// A stored document: always a JSON object.
pub type Document = Map<String, Value>;

/// Every collection is a table of 16-byte UUID keys to JSON strings.
pub type DocumentTable<'db, 'txn> = Table<'db, 'txn, &'static [u8; 16], &'static str>;

// --- Collection names ---
pub const CONTACTS: &str = "contacts";
pub const VOLUNTEERS: &str = "volunteers";
pub const NEWSLETTERS: &str = "newsletters";
pub const NEWS: &str = "news";
pub const BLOGS: &str = "blogs";
pub const IMPACT_STATS: &str = "impact_stats";
pub const SITE_CONTENT: &str = "site_content";
pub const SITE_SETTINGS: &str = "site_settings";
pub const SUCCESS_STORIES: &str = "success_stories";
pub const LEADERSHIP_TEAM: &str = "leadership_team";
pub const PAGE_SECTIONS: &str = "page_sections";
pub const DETAILED_PAGE_SECTIONS: &str = "detailed_page_sections";
pub const GALLERY_ITEMS: &str = "gallery_items";

pub const CONTENT_COLLECTIONS: [&str; 13] = [
    CONTACTS,
    VOLUNTEERS,
    NEWSLETTERS,
    NEWS,
    BLOGS,
    IMPACT_STATS,
    SITE_CONTENT,
    SITE_SETTINGS,
    SUCCESS_STORIES,
    LEADERSHIP_TEAM,
    PAGE_SECTIONS,
    DETAILED_PAGE_SECTIONS,
    GALLERY_ITEMS,
];

/// Storage key of the one record held by a singleton collection.
pub const SINGLETON_KEY: Uuid = Uuid::nil();

pub fn table_definition(collection: &str) -> TableDefinition<'_, &'static [u8; 16], &'static str> {
    TableDefinition::new(collection)
}

pub fn parse_document(raw: &str) -> DbResult<Document> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(DbError::NotAnObject(raw.chars().take(64).collect())),
    }
}

/// Overwrites top-level keys of `target` with those of `patch`.
pub fn shallow_merge(target: &mut Document, patch: Document) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

pub fn to_document<T: Serialize>(value: &T) -> DbResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(DbError::NotAnObject(other.to_string())),
    }
}

pub fn put_document(table: &mut DocumentTable, key: Uuid, document: &Document) -> DbResult<()> {
    let json = serde_json::to_string(document)?;
    table.insert(&key.into_bytes(), json.as_str())?;
    Ok(())
}

/// Finds the first document satisfying `predicate`. Malformed values are skipped.
pub fn find_in_table<T, P>(table: &T, predicate: P) -> DbResult<Option<(Uuid, Document)>>
where
    T: ReadableTable<&'static [u8; 16], &'static str>,
    P: Fn(&Document) -> bool,
{
    for item in table.iter()? {
        let (key_guard, val_guard) = item?;
        let key = Uuid::from_bytes(*key_guard.value());
        match parse_document(val_guard.value()) {
            Ok(doc) if predicate(&doc) => return Ok(Some((key, doc))),
            Ok(_) => {}
            Err(e) => log::warn!("Skipping malformed document {}: {}", key, e),
        }
    }
    Ok(None)
}

/// Resolves a document by its `id` field. The storage key is tried first since
/// documents written by this service are stored under their own id.
fn locate_by_id<T>(table: &T, id: &str) -> DbResult<Option<(Uuid, Document)>>
where
    T: ReadableTable<&'static [u8; 16], &'static str>,
{
    let matches_id = |doc: &Document| doc.get("id").and_then(Value::as_str) == Some(id);

    if let Ok(key) = Uuid::parse_str(id) {
        if let Some(guard) = table.get(&key.into_bytes())? {
            if let Ok(doc) = parse_document(guard.value()) {
                if matches_id(&doc) {
                    return Ok(Some((key, doc)));
                }
            }
        }
    }
    find_in_table(table, matches_id)
}

/// Runs `f` against the collection's table inside a single write transaction.
/// The table is created on first use.
pub fn modify_collection<R, F>(db: &Database, collection: &str, f: F) -> DbResult<R>
where
    F: FnOnce(&mut DocumentTable) -> DbResult<R>,
{
    let write_txn = db.begin_write()?;
    let result = {
        let mut table = write_txn.open_table(table_definition(collection))?;
        f(&mut table)?
    };
    write_txn.commit()?;
    Ok(result)
}

pub fn insert_document<T: Serialize>(db: &Database, collection: &str, id: Uuid, value: &T) -> DbResult<()> {
    let document = to_document(value)?;
    modify_collection(db, collection, |table| put_document(table, id, &document))
}

/// Reads every document with its storage key. A collection that was never
/// written to reads as empty.
pub fn read_documents(db: &Database, collection: &str) -> DbResult<Vec<(Uuid, Document)>> {
    let read_txn = db.begin_read()?;
    let table = match read_txn.open_table(table_definition(collection)) {
        Ok(table) => table,
        Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut documents = Vec::new();
    for item in table.iter()? {
        let (key_guard, val_guard) = item?;
        let key = Uuid::from_bytes(*key_guard.value());
        match parse_document(val_guard.value()) {
            Ok(doc) => documents.push((key, doc)),
            Err(e) => log::warn!("Skipping malformed document {} in '{}': {}", key, collection, e),
        }
    }
    Ok(documents)
}

/// Reads every document that deserializes as `T`.
pub fn read_all<T: DeserializeOwned>(db: &Database, collection: &str) -> DbResult<Vec<T>> {
    let documents = read_documents(db, collection)?;
    let mut items = Vec::with_capacity(documents.len());
    for (key, doc) in documents {
        match serde_json::from_value::<T>(Value::Object(doc)) {
            Ok(item) => items.push(item),
            Err(e) => log::warn!("Document {} in '{}' does not match its schema: {}", key, collection, e),
        }
    }
    Ok(items)
}

pub fn find_by_id<T: DeserializeOwned>(db: &Database, collection: &str, id: &str) -> DbResult<Option<T>> {
    let read_txn = db.begin_read()?;
    let table = match read_txn.open_table(table_definition(collection)) {
        Ok(table) => table,
        Err(TableError::TableDoesNotExist(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match locate_by_id(&table, id)? {
        Some((_, doc)) => Ok(Some(serde_json::from_value(Value::Object(doc))?)),
        None => Ok(None),
    }
}

/// Merges `patch` into the document whose `id` matches. Returns false when none does.
pub fn update_by_id(db: &Database, collection: &str, id: &str, patch: Document) -> DbResult<bool> {
    modify_collection(db, collection, |table| {
        let Some((key, mut doc)) = locate_by_id(&*table, id)? else {
            return Ok(false);
        };
        shallow_merge(&mut doc, patch);
        put_document(table, key, &doc)?;
        Ok(true)
    })
}

pub fn delete_by_id(db: &Database, collection: &str, id: &str) -> DbResult<bool> {
    modify_collection(db, collection, |table| {
        let Some((key, _)) = locate_by_id(&*table, id)? else {
            return Ok(false);
        };
        table.remove(&key.into_bytes())?;
        Ok(true)
    })
}

pub fn delete_by_storage_key(db: &Database, collection: &str, key: Uuid) -> DbResult<bool> {
    modify_collection(db, collection, |table| Ok(table.remove(&key.into_bytes())?.is_some()))
}

pub fn read_singleton<T: DeserializeOwned>(db: &Database, collection: &str) -> DbResult<Option<T>> {
    let read_txn = db.begin_read()?;
    let table = match read_txn.open_table(table_definition(collection)) {
        Ok(table) => table,
        Err(TableError::TableDoesNotExist(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let Some(guard) = table.get(&SINGLETON_KEY.into_bytes())? else {
        return Ok(None);
    };
    let doc = parse_document(guard.value())?;
    Ok(Some(serde_json::from_value(Value::Object(doc))?))
}

/// Read-modify-write of a singleton record inside one write transaction.
/// Returns the stored result.
pub fn update_singleton<F>(db: &Database, collection: &str, mutate: F) -> DbResult<Document>
where
    F: FnOnce(&mut Document),
{
    modify_collection(db, collection, |table| {
        let mut doc = match table.get(&SINGLETON_KEY.into_bytes())? {
            Some(guard) => parse_document(guard.value())?,
            None => Document::new(),
        };
        mutate(&mut doc);
        put_document(table, SINGLETON_KEY, &doc)?;
        Ok(doc)
    })
}

pub fn merge_singleton(db: &Database, collection: &str, patch: Document) -> DbResult<Document> {
    update_singleton(db, collection, |doc| shallow_merge(doc, patch))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSummary {
    pub name: String,
    pub count: u64,
    pub size_bytes: u64,
}

/// Lists every table present in the content database with document counts.
pub fn list_collections(db: &Database) -> DbResult<Vec<CollectionSummary>> {
    let read_txn = db.begin_read()?;
    let names: Vec<String> = read_txn.list_tables()?.map(|handle| handle.name().to_string()).collect();

    let mut summaries = Vec::with_capacity(names.len());
    for name in names {
        let table = read_txn.open_table(table_definition(&name))?;
        let mut size_bytes = 0u64;
        for item in table.iter()? {
            let (_, val_guard) = item?;
            size_bytes += val_guard.value().len() as u64;
        }
        summaries.push(CollectionSummary {
            count: table.len()?,
            size_bytes,
            name,
        });
    }
    Ok(summaries)
}

pub fn collection_exists(db: &Database, collection: &str) -> DbResult<bool> {
    let read_txn = db.begin_read()?;
    let exists = read_txn.list_tables()?.any(|handle| handle.name() == collection);
    Ok(exists)
}
