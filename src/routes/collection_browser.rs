use crate::error::ApiError;
use crate::helper::collection_browser_helpers as browser;
use crate::middleware::{AuthenticatedAccount, Capability, RequireCapability};
use crate::models::collection_browser_models::CollectionQuery;
use crate::models::MessageResponse;
use crate::DbPool;
use actix_web::{web, HttpResponse};
use redb::Database;

pub fn config_browser(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/database")
            .wrap(RequireCapability::new(Capability::BrowseCollections))
            .route("/stats", web::get().to(database_stats))
            .route("/collections", web::get().to(list_collections))
            .route("/{collection}", web::get().to(browse_collection))
            .route("/{collection}/{id}", web::delete().to(delete_document)),
    );
}

// Both stores are read synchronously on the blocking pool.
async fn run_blocking<T, F>(db: web::Data<Database>, pool: web::Data<DbPool>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Database, &rusqlite::Connection) -> Result<T, ApiError> + Send + 'static,
{
    web::block(move || -> Result<T, ApiError> {
        let conn = pool
            .get()
            .map_err(|e| ApiError::internal("Failed to open account store", e))?;
        f(&db, &conn)
    })
    .await
    .map_err(|e| ApiError::internal("Database browser failed", e))?
}

async fn database_stats(db: web::Data<Database>, pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let stats = run_blocking(db, pool, browser::database_stats).await?;
    Ok(HttpResponse::Ok().json(stats))
}

async fn list_collections(db: web::Data<Database>, pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let overview = run_blocking(db, pool, browser::list_collections).await?;
    Ok(HttpResponse::Ok().json(overview))
}

async fn browse_collection(
    db: web::Data<Database>,
    pool: web::Data<DbPool>,
    collection: web::Path<String>,
    query: web::Query<CollectionQuery>,
) -> Result<HttpResponse, ApiError> {
    let collection = collection.into_inner();
    let query = query.into_inner();
    let page = run_blocking(db, pool, move |db, conn| {
        browser::collection_page(db, conn, &collection, &query)
    })
    .await?;
    Ok(HttpResponse::Ok().json(page))
}

async fn delete_document(
    db: web::Data<Database>,
    caller: AuthenticatedAccount,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (collection, id) = path.into_inner();
    browser::delete_document(&db, &collection, &id)?;
    log::warn!(
        "Document {} removed from '{}' through the database browser by '{}'",
        id,
        collection,
        caller.username
    );
    Ok(HttpResponse::Ok().json(MessageResponse::new("Document deleted successfully!")))
}
