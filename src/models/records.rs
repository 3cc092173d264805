use chrono::NaiveDate;
use serde::Serialize;

use crate::forms::Choice;

/// A way of colouring a water detection result, tied to one satellite.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultType {
    pub result_id: String,
    pub result_type: String,
    pub satellite_id: String,
}

/// A generated time series product, e.g. a looping gif of water extents.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnimationType {
    pub type_id: String,
    pub type_name: String,
}

/// A named region with the date range its imagery covers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Area {
    pub area_id: String,
    pub area_name: String,
    pub date_min: NaiveDate,
    pub date_max: NaiveDate,
}

impl From<ResultType> for Choice {
    fn from(row: ResultType) -> Self {
        Choice::new(row.result_id, row.result_type)
    }
}

impl From<AnimationType> for Choice {
    fn from(row: AnimationType) -> Self {
        Choice::new(row.type_id, row.type_name)
    }
}
