use actix_web::{web, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use validator::Validate;

use crate::errors::AppError;
use crate::forms::{FormInput, GeospatialBoundsForm, ResultSelectionForm};
use crate::models::{Area, AreaQuery, FormPayload, SatelliteQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

async fn build_result_selection(
    state: &AppState,
    query: &SatelliteQuery,
    input: FormInput,
) -> Result<ResultSelectionForm, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation failed: {e}")))?;

    ResultSelectionForm::new(
        state.catalog.as_ref(),
        state.unfiltered_result_types,
        query.satellite_id.as_deref(),
        input,
    )
    .await
}

/// Remaining query parameters become the form's initial values.
fn initial_values(params: web::Query<HashMap<String, String>>, control_key: &str) -> FormInput {
    let mut initial = params.into_inner();
    initial.remove(control_key);
    FormInput::unbound().with_initial(initial)
}

async fn lookup_area(state: &AppState, query: &AreaQuery) -> Result<Option<Area>, AppError> {
    query
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation failed: {e}")))?;

    let Some(area_id) = query.area_id.as_deref() else {
        return Ok(None);
    };
    let area = state
        .catalog
        .area(area_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Area not found: {area_id}")))?;
    Ok(Some(area))
}

#[utoipa::path(
    get,
    path = "/forms/result-selection",
    tag = "Forms",
    params(("satellite_id" = Option<String>, Query, description = "Other parameters prefill fields by name")),
    responses(
        (status = 200, description = "Result selection fields and markup", body = FormPayload),
        (status = 400, description = "Invalid satellite id")
    )
)]
pub(crate) async fn result_selection_form(
    state: web::Data<AppState>,
    query: web::Query<SatelliteQuery>,
    params: web::Query<HashMap<String, String>>,
) -> ActixResult<HttpResponse> {
    let input = initial_values(params, "satellite_id");
    let form = build_result_selection(&state, &query, input).await?;
    Ok(ApiResponse::ok(FormPayload::from(form.form())))
}

#[utoipa::path(
    post,
    path = "/forms/result-selection",
    tag = "Forms",
    params(("satellite_id" = Option<String>, Query)),
    responses(
        (status = 200, description = "Cleaned result selection", body = crate::forms::ResultSelection),
        (status = 400, description = "Field errors")
    )
)]
pub(crate) async fn submit_result_selection(
    state: web::Data<AppState>,
    query: web::Query<SatelliteQuery>,
    body: web::Form<HashMap<String, String>>,
) -> ActixResult<HttpResponse> {
    let form = build_result_selection(&state, &query, FormInput::bound(body.into_inner())).await?;
    let selection = form.clean().map_err(AppError::from)?;

    log::info!(
        "Accepted result selection: type={} animation={}",
        selection.result_type,
        selection.animated_product
    );
    Ok(ApiResponse::ok(selection))
}

#[utoipa::path(
    get,
    path = "/forms/geospatial",
    tag = "Forms",
    params(("area_id" = Option<String>, Query, description = "Other parameters prefill fields by name")),
    responses(
        (status = 200, description = "Geospatial bounds fields and markup", body = FormPayload),
        (status = 400, description = "Invalid area id"),
        (status = 404, description = "Area not found")
    )
)]
pub(crate) async fn geospatial_form(
    state: web::Data<AppState>,
    query: web::Query<AreaQuery>,
    params: web::Query<HashMap<String, String>>,
) -> ActixResult<HttpResponse> {
    let area = lookup_area(&state, &query).await?;
    let form = GeospatialBoundsForm::new(area.as_ref(), initial_values(params, "area_id"));
    Ok(ApiResponse::ok(FormPayload::from(form.form())))
}

#[utoipa::path(
    post,
    path = "/forms/geospatial",
    tag = "Forms",
    params(("area_id" = Option<String>, Query)),
    responses(
        (status = 200, description = "Cleaned bounding box and date range", body = crate::forms::GeospatialBounds),
        (status = 400, description = "Field errors"),
        (status = 404, description = "Area not found")
    )
)]
pub(crate) async fn submit_geospatial(
    state: web::Data<AppState>,
    query: web::Query<AreaQuery>,
    body: web::Form<HashMap<String, String>>,
) -> ActixResult<HttpResponse> {
    let area = lookup_area(&state, &query).await?;
    let form = GeospatialBoundsForm::new(area.as_ref(), FormInput::bound(body.into_inner()));
    let bounds = form.clean().map_err(AppError::from)?;

    log::info!(
        "Accepted bounds lat [{}, {}] lon [{}, {}] from {} to {}",
        bounds.latitude_min,
        bounds.latitude_max,
        bounds.longitude_min,
        bounds.longitude_max,
        bounds.time_start,
        bounds.time_end
    );
    Ok(ApiResponse::ok(bounds))
}
