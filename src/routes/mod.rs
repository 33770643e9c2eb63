pub mod admin;
pub mod admin_content;
pub mod collection_browser;
pub mod public;
pub mod users;

use crate::error::{json_error_handler, path_error_handler, query_error_handler};
use actix_web::web;

/// Mounts the whole API under `/api`.
pub fn config_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api")
                .service(web::scope("/admin").configure(admin::config_admin))
                .configure(public::config_public),
        );
}
