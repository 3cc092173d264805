use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SatelliteQuery {
    /// Narrows the result type choices to one satellite.
    #[validate(custom(function = "crate::validation::validate_key"))]
    pub satellite_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AreaQuery {
    /// Seeds the date fields from this area's imagery range.
    #[validate(custom(function = "crate::validation::validate_key"))]
    pub area_id: Option<String>,
}
