use async_trait::async_trait;
use chrono::NaiveDate;

use super::Catalog;
use crate::errors::AppError;
use crate::models::{AnimationType, Area, ResultType};

/// In-memory catalog for tests. `failing` makes every lookup error out.
#[derive(Default)]
pub(crate) struct MemoryCatalog {
    pub result_types: Vec<ResultType>,
    pub animation_types: Vec<AnimationType>,
    pub areas: Vec<Area>,
    pub failing: bool,
}

impl MemoryCatalog {
    pub fn seeded() -> Self {
        let result_type = |id: &str, label: &str, sat: &str| ResultType {
            result_id: id.into(),
            result_type: label.into(),
            satellite_id: sat.into(),
        };
        Self {
            result_types: vec![
                result_type("0", "Black", "LANDSAT_7"),
                result_type("1", "White", "LANDSAT_7"),
                result_type("2", "True Color", "LANDSAT_8"),
            ],
            animation_types: vec![
                AnimationType { type_id: "none".into(), type_name: "None".into() },
                AnimationType { type_id: "scene".into(), type_name: "Per Scene".into() },
            ],
            areas: vec![Area {
                area_id: "lake_chad".into(),
                area_name: "Lake Chad".into(),
                date_min: NaiveDate::from_ymd_opt(2015, 3, 1).unwrap(),
                date_max: NaiveDate::from_ymd_opt(2015, 4, 1).unwrap(),
            }],
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    fn check(&self) -> Result<(), AppError> {
        if self.failing {
            return Err(AppError::Database("catalog unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl Catalog for MemoryCatalog {
    async fn result_types(&self, satellite_id: Option<&str>) -> Result<Vec<ResultType>, AppError> {
        self.check()?;
        Ok(self
            .result_types
            .iter()
            .filter(|r| satellite_id.map_or(true, |id| r.satellite_id == id))
            .cloned()
            .collect())
    }

    async fn animation_types(&self) -> Result<Vec<AnimationType>, AppError> {
        self.check()?;
        Ok(self.animation_types.clone())
    }

    async fn area(&self, area_id: &str) -> Result<Option<Area>, AppError> {
        self.check()?;
        Ok(self.areas.iter().find(|a| a.area_id == area_id).cloned())
    }
}
