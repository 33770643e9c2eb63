use crate::error::ApiError;
use crate::helper::account_helpers::{self, with_connection};
use crate::helper::session_helpers::SessionIssuer;
use crate::middleware::{AuthenticatedAccount, Capability, RequireCapability};
use crate::models::account_models::{AccountUpdateRequest, NewAccountRequest, PasswordChangeRequest};
use crate::models::MessageResponse;
use crate::DbPool;
use actix_web::{guard, web, HttpResponse};
use serde_json::json;
use validator::Validate;

/// Account routes. Self-service resources are registered ahead of the
/// super-admin scope so they match first.
pub fn config_users(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users/{user_id}/password")
            .wrap(RequireCapability::new(Capability::Authenticated))
            .route(web::put().to(change_password)),
    )
    .service(
        web::resource("/users/{user_id}")
            .guard(guard::Put())
            .wrap(RequireCapability::new(Capability::Authenticated))
            .route(web::put().to(update_user)),
    )
    .service(
        web::scope("/users")
            .wrap(RequireCapability::new(Capability::ManageUsers))
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("/{user_id}", web::delete().to(delete_user)),
    );
}

async fn list_users(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let users = with_connection(pool, account_helpers::list_accounts).await?;
    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

async fn create_user(
    pool: web::Data<DbPool>,
    issuer: web::Data<SessionIssuer>,
    caller: AuthenticatedAccount,
    payload: web::Json<NewAccountRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    request.validate()?;

    let account =
        with_connection(pool, move |conn| account_helpers::create_account(conn, &issuer, &request)).await?;
    log::info!(
        "Account '{}' ({}) created by '{}'",
        account.username,
        account.role,
        caller.username
    );
    Ok(HttpResponse::Ok().json(MessageResponse::new("User created successfully!")))
}

async fn update_user(
    pool: web::Data<DbPool>,
    caller: AuthenticatedAccount,
    user_id: web::Path<String>,
    payload: web::Json<AccountUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    request.validate()?;

    let target_id = user_id.into_inner();
    let actor = caller.username.clone();
    let account = with_connection(pool, move |conn| {
        account_helpers::update_account(conn, &caller, &target_id, request)
    })
    .await?;
    log::info!("Account '{}' updated by '{}'", account.username, actor);
    Ok(HttpResponse::Ok().json(MessageResponse::new("User updated successfully!")))
}

async fn change_password(
    pool: web::Data<DbPool>,
    issuer: web::Data<SessionIssuer>,
    caller: AuthenticatedAccount,
    user_id: web::Path<String>,
    payload: web::Json<PasswordChangeRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    request.validate()?;

    let target_id = user_id.into_inner();
    let actor = caller.username.clone();
    with_connection(pool, move |conn| {
        account_helpers::change_password(conn, &issuer, &caller, &target_id, &request)
    })
    .await?;
    log::info!("Account '{}' changed their password", actor);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Password updated successfully!")))
}

async fn delete_user(
    pool: web::Data<DbPool>,
    caller: AuthenticatedAccount,
    user_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let target_id = user_id.into_inner();
    let actor = caller.username.clone();
    let removed = with_connection(pool, move |conn| {
        account_helpers::delete_account(conn, &caller, &target_id)
    })
    .await?;
    log::info!("Account '{}' deleted by '{}'", removed.username, actor);
    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully!")))
}
