use crate::error::ApiError;
use crate::helper::content_helpers;
use crate::middleware::AuthenticatedAccount;
use crate::models::content_models::{
    BlogDraft, BlogPatch, BlogPost, ContentDraft, ContentEntity, ContentPatch, DetailedPageSection,
    DetailedPageSectionDraft, DetailedPageSectionPatch, GalleryItem, GalleryItemDraft, GalleryItemPatch, NewsArticle,
    NewsDraft, NewsPatch, PageScoped, PageSection, PageSectionDraft, PageSectionPatch, SuccessStory,
    SuccessStoryDraft, SuccessStoryPatch, TeamMember, TeamMemberDraft, TeamMemberPatch,
};
use crate::models::MessageResponse;
use actix_web::{web, HttpResponse};
use redb::Database;

/// Admin listings for every content family, drafts and hidden items included.
pub fn config_reads(cfg: &mut web::ServiceConfig) {
    cfg.route("/news", web::get().to(list_all::<NewsArticle>))
        .route("/blogs", web::get().to(list_all::<BlogPost>))
        .route("/success-stories", web::get().to(list_all::<SuccessStory>))
        .route("/leadership-team", web::get().to(list_all::<TeamMember>))
        .route("/gallery-items", web::get().to(list_all::<GalleryItem>))
        .route("/page-sections/{page}", web::get().to(list_all_for_page::<PageSection>))
        .route(
            "/detailed-page-sections/{page}",
            web::get().to(list_all_for_page::<DetailedPageSection>),
        );
}

pub fn config_writes(cfg: &mut web::ServiceConfig) {
    family::<NewsDraft, NewsPatch>(cfg, "/news");
    family::<BlogDraft, BlogPatch>(cfg, "/blogs");
    family::<SuccessStoryDraft, SuccessStoryPatch>(cfg, "/success-stories");
    family::<TeamMemberDraft, TeamMemberPatch>(cfg, "/leadership-team");
    family::<GalleryItemDraft, GalleryItemPatch>(cfg, "/gallery-items");
    family::<PageSectionDraft, PageSectionPatch>(cfg, "/page-sections");
    family::<DetailedPageSectionDraft, DetailedPageSectionPatch>(cfg, "/detailed-page-sections");
}

/// POST `{base}`, PUT and DELETE `{base}/{id}`.
fn family<D, P>(cfg: &mut web::ServiceConfig, base: &str)
where
    D: ContentDraft,
    P: ContentPatch<Entity = D::Entity>,
{
    let item_path = format!("{}/{{id}}", base);
    cfg.route(base, web::post().to(create_entity::<D>))
        .route(&item_path, web::put().to(update_entity::<P>))
        .route(&item_path, web::delete().to(delete_entity::<D::Entity>));
}

async fn list_all<T: ContentEntity>(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    let items = content_helpers::list_all::<T>(&db)?;
    Ok(HttpResponse::Ok().json(content_helpers::list_body(T::LIST_KEY, items)))
}

async fn list_all_for_page<T: PageScoped>(
    db: web::Data<Database>,
    page: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let items = content_helpers::list_all_for_page::<T>(&db, &page)?;
    Ok(HttpResponse::Ok().json(content_helpers::list_body(T::LIST_KEY, items)))
}

async fn create_entity<D: ContentDraft>(
    db: web::Data<Database>,
    caller: AuthenticatedAccount,
    payload: web::Json<D>,
) -> Result<HttpResponse, ApiError> {
    let draft = payload.into_inner();
    draft.validate()?;

    let entity = content_helpers::create(&db, draft, &caller.username)?;
    let label = D::Entity::LABEL;
    log::info!("{} {} created by '{}'", label, entity.id(), caller.username);
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("{} created successfully!", label))))
}

async fn update_entity<P: ContentPatch>(
    db: web::Data<Database>,
    caller: AuthenticatedAccount,
    id: web::Path<String>,
    payload: web::Json<P>,
) -> Result<HttpResponse, ApiError> {
    let patch = payload.into_inner();
    patch.validate()?;

    content_helpers::update(&db, &id, patch)?;
    let label = P::Entity::LABEL;
    log::info!("{} {} updated by '{}'", label, id, caller.username);
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("{} updated successfully!", label))))
}

async fn delete_entity<T: ContentEntity>(
    db: web::Data<Database>,
    caller: AuthenticatedAccount,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    content_helpers::delete::<T>(&db, &id)?;
    log::info!("{} {} deleted by '{}'", T::LABEL, id, caller.username);
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("{} deleted successfully!", T::LABEL))))
}
