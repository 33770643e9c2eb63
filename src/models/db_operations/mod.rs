pub mod accounts_db_operations;
pub mod content_db_operations;
