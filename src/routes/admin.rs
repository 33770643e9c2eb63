use crate::error::ApiError;
use crate::helper::account_helpers::{self, with_connection};
use crate::helper::session_helpers::{self, SessionIssuer};
use crate::helper::{site_helpers, submission_helpers};
use crate::middleware::{AuthenticatedAccount, Capability, RequireCapability};
use crate::models::account_models::{LoginRequest, SessionUser};
use crate::models::site_models::{ContactInfoUpdate, ImpactStatsUpdate, SiteContentUpdate, SiteSettingsUpdate};
use crate::models::submission_models::ContactStatusUpdate;
use crate::models::MessageResponse;
use crate::routes::{admin_content, collection_browser, users};
use crate::DbPool;
use actix_web::{guard, web, HttpResponse};
use redb::Database;
use serde_json::json;
use validator::Validate;

/// Everything under `/api/admin`. Registration order matters: login is open,
/// account and browser routes carry their own capability, then reads need any
/// session and the remaining writes need content-editing rights.
pub fn config_admin(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .configure(users::config_users)
        .configure(collection_browser::config_browser)
        .service(
            web::scope("")
                .guard(guard::Get())
                .wrap(RequireCapability::new(Capability::Authenticated))
                .route("/me", web::get().to(me))
                .route("/contacts", web::get().to(list_contacts))
                .route("/volunteers", web::get().to(list_volunteers))
                .route("/newsletters", web::get().to(list_newsletters))
                .route("/impact-stats", web::get().to(get_impact_stats))
                .route("/site-settings", web::get().to(get_site_settings))
                .route("/site-content", web::get().to(get_site_content))
                .configure(admin_content::config_reads),
        )
        .service(
            web::scope("")
                .wrap(RequireCapability::new(Capability::EditContent))
                .route("/contacts/{id}/status", web::put().to(update_contact_status))
                .route("/contacts/{id}", web::delete().to(delete_contact))
                .route("/impact-stats", web::put().to(update_impact_stats))
                .route("/site-settings", web::put().to(update_site_settings))
                .route("/site-content", web::put().to(update_site_content))
                .route("/contact-info", web::put().to(update_contact_info))
                .configure(admin_content::config_writes),
        );
}

async fn login(
    pool: web::Data<DbPool>,
    issuer: web::Data<SessionIssuer>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    // Shape errors on credentials read the same as a wrong password.
    if request.validate().is_err() {
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }
    let response = session_helpers::login(pool, issuer, request).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn me(pool: web::Data<DbPool>, caller: AuthenticatedAccount) -> Result<HttpResponse, ApiError> {
    let account = with_connection(pool, move |conn| account_helpers::current_account(conn, &caller)).await?;
    Ok(HttpResponse::Ok().json(SessionUser::from(account)))
}

// --- Submissions ---

async fn list_contacts(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(submission_helpers::list_contacts(&db)?))
}

async fn list_volunteers(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(submission_helpers::list_volunteers(&db)?))
}

async fn list_newsletters(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(submission_helpers::list_active_subscriptions(&db)?))
}

async fn update_contact_status(
    db: web::Data<Database>,
    caller: AuthenticatedAccount,
    id: web::Path<String>,
    payload: web::Json<ContactStatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    submission_helpers::set_contact_status(&db, &id, payload.status)?;
    log::info!("Contact {} marked {:?} by '{}'", id, payload.status, caller.username);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Contact status updated successfully!")))
}

async fn delete_contact(
    db: web::Data<Database>,
    caller: AuthenticatedAccount,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    submission_helpers::delete_contact(&db, &id)?;
    log::info!("Contact {} deleted by '{}'", id, caller.username);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Contact deleted successfully!")))
}

// --- Site-wide singletons ---

async fn get_impact_stats(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(site_helpers::impact_stats(&db)?))
}

async fn update_impact_stats(
    db: web::Data<Database>,
    caller: AuthenticatedAccount,
    payload: web::Json<ImpactStatsUpdate>,
) -> Result<HttpResponse, ApiError> {
    payload.validate()?;
    site_helpers::update_impact_stats(&db, &payload, &caller.username)?;
    log::info!("Impact statistics updated by '{}'", caller.username);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Impact statistics updated successfully!")))
}

async fn get_site_settings(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(site_helpers::site_settings(&db)?))
}

async fn update_site_settings(
    db: web::Data<Database>,
    caller: AuthenticatedAccount,
    payload: web::Json<SiteSettingsUpdate>,
) -> Result<HttpResponse, ApiError> {
    payload.validate()?;
    site_helpers::update_site_settings(&db, &payload, &caller.username)?;
    log::info!("Site settings updated by '{}'", caller.username);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Site settings updated successfully!")))
}

async fn get_site_content(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    let content = site_helpers::site_content(&db)?;
    Ok(HttpResponse::Ok().json(json!({
        "content": content.content,
        "updated_at": content.updated_at,
        "updated_by": content.updated_by,
    })))
}

async fn update_site_content(
    db: web::Data<Database>,
    caller: AuthenticatedAccount,
    payload: web::Json<SiteContentUpdate>,
) -> Result<HttpResponse, ApiError> {
    let update = payload.into_inner();
    site_helpers::replace_site_content(&db, update.content, &caller.username)?;
    log::info!("Site content updated by '{}'", caller.username);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Site content updated successfully!")))
}

async fn update_contact_info(
    db: web::Data<Database>,
    caller: AuthenticatedAccount,
    payload: web::Json<ContactInfoUpdate>,
) -> Result<HttpResponse, ApiError> {
    payload.validate()?;
    site_helpers::update_contact_info(&db, &payload, &caller.username)?;
    log::info!("Contact information updated by '{}'", caller.username);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Contact information updated successfully!")))
}
