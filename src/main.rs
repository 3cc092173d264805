mod config;
mod db;
mod errors;
mod forms;
mod models;
mod repositories;
mod response;
mod routes;
mod state;
mod validation;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::sync::Arc;
use utoipa::openapi::Server;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::API_PREFIX;
use crate::repositories::PgCatalog;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Water Detection Forms API",
        description = "Query forms for data-cube water detection: result rendering options, \
            animation products, and the geospatial/temporal bounds of a query.\n\n\
            GET a form for its fields and markup; POST submitted values back for \
            cleaned, typed values or per-field errors.",
        version = "1.0.0"
    ),
    paths(
        routes::health::health,
        routes::forms::result_selection_form,
        routes::forms::submit_result_selection,
        routes::forms::geospatial_form,
        routes::forms::submit_geospatial,
    ),
    components(schemas(
        models::HealthPayload, models::FormPayload,
        models::SatelliteQuery, models::AreaQuery,
        forms::Field, forms::Widget, forms::WidgetKind, forms::Choice,
        forms::ResultSelection, forms::GeospatialBounds,
    )),
    tags(
        (name = "System", description = "Health and status"),
        (name = "Forms", description = "Result selection and geospatial bounds forms"),
    )
)]
struct ApiDoc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
    let cfg = config::Config::from_env();

    let pool = db::create_pool(&cfg)?;
    log::info!("Result types without a satellite id: {:?}", cfg.unfiltered_result_types);
    let state = web::Data::new(AppState {
        catalog: Arc::new(PgCatalog::new(pool)),
        unfiltered_result_types: cfg.unfiltered_result_types,
    });

    let bind = format!("{}:{}", cfg.host, cfg.port);
    log::info!("Starting Water Detection Forms API on {bind}");
    log::info!("Swagger UI: http://{bind}{API_PREFIX}/docs/");

    let mut openapi = ApiDoc::openapi();
    openapi.servers = Some(vec![Server::new(API_PREFIX)]);

    let openapi_url: &'static str = Box::leak(format!("{API_PREFIX}/openapi.json").into_boxed_str());
    let docs_path: &'static str = Box::leak(format!("{API_PREFIX}/docs/{{_:.*}}").into_boxed_str());
    let health_path = format!("{API_PREFIX}/health");

    HttpServer::new(move || {
        App::new()
            .wrap(
                Logger::new(r#"%a "%r" %s %b %Dms "%{User-Agent}i""#)
                    .exclude(health_path.clone()),
            )
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .service(SwaggerUi::new(docs_path).url(openapi_url, openapi.clone()))
            .configure(routes::configure)
    })
    .bind(&bind)?
    .run()
    .await
}
