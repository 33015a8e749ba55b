pub mod handlers;
pub mod models;
pub mod multipart_parser;


use actix_web::web;

/// Registers the invoice routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(handlers::index)))
        .service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(
            web::resource("/generate-invoice").route(web::post().to(handlers::generate_invoice)),
        );
}
