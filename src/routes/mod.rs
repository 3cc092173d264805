pub mod forms;
pub mod health;

use actix_web::web;

use crate::config::API_PREFIX;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .route("/health", web::get().to(health::health))
            .service(
                web::resource("/forms/result-selection")
                    .route(web::get().to(forms::result_selection_form))
                    .route(web::post().to(forms::submit_result_selection)),
            )
            .service(
                web::resource("/forms/geospatial")
                    .route(web::get().to(forms::geospatial_form))
                    .route(web::post().to(forms::submit_geospatial)),
            ),
    );
}
