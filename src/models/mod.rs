pub(crate) mod records;
pub(crate) mod requests;
pub(crate) mod responses;

pub(crate) use records::{AnimationType, Area, ResultType};
pub(crate) use requests::{AreaQuery, SatelliteQuery};
pub(crate) use responses::{FormPayload, HealthPayload};
