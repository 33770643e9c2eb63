use crate::error::ApiError;
use crate::helper::{content_helpers, site_helpers, submission_helpers};
use crate::models::content_models::{
    BlogPost, ContentEntity, DetailedPageSection, GalleryItem, NewsArticle, PageScoped, PageSection, SuccessStory,
    TeamMember,
};
use crate::models::site_models::PublicImpactStats;
use crate::models::submission_models::{ContactSubmission, NewsletterRequest, VolunteerSubmission};
use crate::models::MessageResponse;
use actix_web::{web, HttpResponse, Responder};
use redb::Database;
use serde_json::json;
use validator::Validate;

pub fn config_public(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health))
        .route("/contact", web::post().to(submit_contact))
        .route("/volunteer", web::post().to(submit_volunteer))
        .route("/newsletter/subscribe", web::post().to(subscribe_newsletter))
        .route("/newsletter/unsubscribe", web::post().to(unsubscribe_newsletter))
        .route("/news", web::get().to(list_published::<NewsArticle>))
        .route("/news/{id}", web::get().to(get_published::<NewsArticle>))
        .route("/blogs", web::get().to(list_published::<BlogPost>))
        .route("/blogs/{id}", web::get().to(get_published::<BlogPost>))
        .route("/success-stories", web::get().to(list_published::<SuccessStory>))
        .route("/leadership-team", web::get().to(list_published::<TeamMember>))
        .route("/gallery-items", web::get().to(list_published::<GalleryItem>))
        .route("/page-sections/{page}", web::get().to(list_published_for_page::<PageSection>))
        .route(
            "/detailed-page-sections/{page}",
            web::get().to(list_published_for_page::<DetailedPageSection>),
        )
        .route("/impact-stats", web::get().to(get_impact_stats))
        .route("/site-content", web::get().to(get_site_content))
        .route("/site-settings", web::get().to(get_site_settings));
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Shield Foundation API is running",
        "status": "healthy",
    }))
}

// The acknowledgement is only sent once the write has committed; a failed
// write surfaces as a 500.
async fn submit_contact(
    db: web::Data<Database>,
    payload: web::Json<ContactSubmission>,
) -> Result<HttpResponse, ApiError> {
    let submission = payload.into_inner();
    submission.validate()?;

    let stored = submission_helpers::record_contact(&db, submission)?;
    log::info!("Contact message {} received ({})", stored.id, stored.inquiry_type);
    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "Thank you for your message. We will get back to you soon!",
    )))
}

async fn submit_volunteer(
    db: web::Data<Database>,
    payload: web::Json<VolunteerSubmission>,
) -> Result<HttpResponse, ApiError> {
    let submission = payload.into_inner();
    submission.validate()?;

    let stored = submission_helpers::record_volunteer(&db, submission)?;
    log::info!("Volunteer application {} received", stored.id);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Thank you for registering as a volunteer!")))
}

async fn subscribe_newsletter(
    db: web::Data<Database>,
    payload: web::Json<NewsletterRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner().normalized();
    request.validate()?;
    let outcome = submission_helpers::subscribe(&db, &request.email)?;
    log::debug!("Newsletter subscribe: {:?}", outcome);
    Ok(HttpResponse::Ok().json(MessageResponse::new(outcome.message())))
}

async fn unsubscribe_newsletter(
    db: web::Data<Database>,
    payload: web::Json<NewsletterRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner().normalized();
    request.validate()?;
    if !submission_helpers::unsubscribe(&db, &request.email)? {
        return Err(ApiError::not_found("Email not found in newsletter subscriptions"));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "You have been unsubscribed from our newsletter.",
    )))
}

async fn list_published<T: ContentEntity>(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    let items = content_helpers::list_public::<T>(&db)?;
    Ok(HttpResponse::Ok().json(content_helpers::list_body(T::LIST_KEY, items)))
}

async fn get_published<T: ContentEntity>(
    db: web::Data<Database>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let item = content_helpers::find_public::<T>(&db, &id)?;
    Ok(HttpResponse::Ok().json(item))
}

async fn list_published_for_page<T: PageScoped>(
    db: web::Data<Database>,
    page: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let items = content_helpers::list_public_for_page::<T>(&db, &page)?;
    Ok(HttpResponse::Ok().json(content_helpers::list_body(T::LIST_KEY, items)))
}

async fn get_impact_stats(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    let stats = site_helpers::impact_stats(&db)?;
    Ok(HttpResponse::Ok().json(PublicImpactStats::from(stats)))
}

async fn get_site_content(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    let content = site_helpers::site_content(&db)?;
    Ok(HttpResponse::Ok().json(json!({ "content": content.content })))
}

async fn get_site_settings(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(site_helpers::site_settings(&db)?))
}
