use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct CollectionQuery {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionPage {
    pub collection: String,
    pub documents: Vec<Value>,
    pub total_count: u64,
    pub limit: u32,
    pub skip: u32,
    pub has_more: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CollectionStat {
    pub collection: String,
    pub count: u64,
    pub size: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub total_collections: usize,
    pub total_documents: u64,
    pub collection_stats: Vec<CollectionStat>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CollectionInfo {
    pub collection: String,
    pub name: String,
    pub description: String,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionsOverview {
    pub collections: Vec<CollectionInfo>,
}
