use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::{Field, Form, FormErrors, FormInput, Widget, WidgetKind};
use crate::models::Area;
use crate::validation::format_date;

pub const LATITUDE_MIN: &str = "latitude_min";
pub const LATITUDE_MAX: &str = "latitude_max";
pub const LONGITUDE_MIN: &str = "longitude_min";
pub const LONGITUDE_MAX: &str = "longitude_max";
pub const TIME_START: &str = "time_start";
pub const TIME_END: &str = "time_end";

/// Cleaned bounding box and date range.
///
/// Only the types are checked: min/max ordering and coordinate ranges are
/// left to whoever runs the query.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct GeospatialBounds {
    pub latitude_min: f64,
    pub latitude_max: f64,
    pub longitude_min: f64,
    pub longitude_max: f64,
    pub time_start: NaiveDate,
    pub time_end: NaiveDate,
}

#[derive(Debug)]
pub struct GeospatialBoundsForm {
    form: Form,
}

impl GeospatialBoundsForm {
    /// With an `area`, the date fields default to the area's imagery range
    /// and lose their placeholders.
    pub fn new(area: Option<&Area>, input: FormInput) -> Self {
        let (time_start, time_end) = match area {
            Some(area) => (
                Field::date(TIME_START)
                    .label("Start Date")
                    .widget(date_widget(None))
                    .initial(format_date(area.date_min)),
                Field::date(TIME_END)
                    .label("End Date")
                    .widget(date_widget(None))
                    .initial(format_date(area.date_max)),
            ),
            None => (
                Field::date(TIME_START)
                    .label("Start Date")
                    .widget(date_widget(Some("01/01/2010"))),
                Field::date(TIME_END)
                    .label("End Date")
                    .widget(date_widget(Some("01/02/2010"))),
            ),
        };

        let fields = vec![
            coordinate(LATITUDE_MIN, "Min Latitude"),
            coordinate(LATITUDE_MAX, "Max Latitude"),
            coordinate(LONGITUDE_MIN, "Min Longitude"),
            coordinate(LONGITUDE_MAX, "Max Longitude"),
            time_start,
            time_end,
        ];

        Self {
            form: Form::new(fields, input),
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn clean(&self) -> Result<GeospatialBounds, FormErrors> {
        let data = self.form.full_clean()?;
        Ok(GeospatialBounds {
            latitude_min: data.float(LATITUDE_MIN)?,
            latitude_max: data.float(LATITUDE_MAX)?,
            longitude_min: data.float(LONGITUDE_MIN)?,
            longitude_max: data.float(LONGITUDE_MAX)?,
            time_start: data.date(TIME_START)?,
            time_end: data.date(TIME_END)?,
        })
    }
}

fn coordinate(name: &str, label: &str) -> Field {
    Field::float(name).label(label).widget(
        Widget::new(WidgetKind::NumberInput)
            .attr("class", "field-divided")
            .attr("step", "any")
            .attr("required", "required"),
    )
}

fn date_widget(placeholder: Option<&str>) -> Widget {
    let widget = Widget::new(WidgetKind::DateInput)
        .attr("class", "datepicker field-divided")
        .attr("required", "required");
    match placeholder {
        Some(p) => widget.attr("placeholder", p),
        None => widget,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const VALID: &[(&str, &str)] = &[
        (LATITUDE_MIN, "12.5"),
        (LATITUDE_MAX, "14.0"),
        (LONGITUDE_MIN, "13.25"),
        (LONGITUDE_MAX, "15"),
        (TIME_START, "03/01/2015"),
        (TIME_END, "2015-04-01"),
    ];

    fn submission(overrides: &[(&str, &str)]) -> FormInput {
        let mut data: HashMap<String, String> =
            VALID.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        for (k, v) in overrides {
            data.insert(k.to_string(), v.to_string());
        }
        FormInput::bound(data)
    }

    fn lake_chad() -> Area {
        Area {
            area_id: "lake_chad".into(),
            area_name: "Lake Chad".into(),
            date_min: NaiveDate::from_ymd_opt(2015, 3, 1).unwrap(),
            date_max: NaiveDate::from_ymd_opt(2015, 4, 1).unwrap(),
        }
    }

    #[test]
    fn cleans_valid_submission() {
        let bounds = GeospatialBoundsForm::new(None, submission(&[])).clean().unwrap();
        assert_eq!(
            bounds,
            GeospatialBounds {
                latitude_min: 12.5,
                latitude_max: 14.0,
                longitude_min: 13.25,
                longitude_max: 15.0,
                time_start: NaiveDate::from_ymd_opt(2015, 3, 1).unwrap(),
                time_end: NaiveDate::from_ymd_opt(2015, 4, 1).unwrap(),
            }
        );
    }

    #[test]
    fn latitude_out_of_range_still_validates() {
        let bounds = GeospatialBoundsForm::new(None, submission(&[(LATITUDE_MIN, "91")]))
            .clean()
            .unwrap();
        assert_eq!(bounds.latitude_min, 91.0);
    }

    #[test]
    fn inverted_bounds_are_not_checked() {
        let bounds = GeospatialBoundsForm::new(
            None,
            submission(&[(LATITUDE_MIN, "20"), (TIME_START, "05/01/2015")]),
        )
        .clean()
        .unwrap();
        assert!(bounds.latitude_min > bounds.latitude_max);
        assert!(bounds.time_start > bounds.time_end);
    }

    #[test]
    fn bad_date_fails_on_that_field() {
        let errors = GeospatialBoundsForm::new(None, submission(&[(TIME_START, "not-a-date")]))
            .clean()
            .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![TIME_START]);
        assert_eq!(errors.get(TIME_START).unwrap(), ["Enter a valid date."]);
    }

    #[test]
    fn non_numeric_coordinate_fails() {
        let errors = GeospatialBoundsForm::new(None, submission(&[(LONGITUDE_MAX, "east")]))
            .clean()
            .unwrap_err();
        assert_eq!(errors.get(LONGITUDE_MAX).unwrap(), ["Enter a number."]);
    }

    #[test]
    fn missing_field_is_reported_alone() {
        for (omitted, _) in VALID {
            let data = VALID
                .iter()
                .filter(|(k, _)| k != omitted)
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            let errors = GeospatialBoundsForm::new(None, FormInput::bound(data))
                .clean()
                .unwrap_err();
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec![*omitted]);
            assert_eq!(errors.get(omitted).unwrap(), ["This field is required."]);
        }
    }

    #[test]
    fn area_seeds_date_defaults() {
        let area = lake_chad();
        let form = GeospatialBoundsForm::new(Some(&area), FormInput::unbound());
        assert_eq!(form.form().value(TIME_START), Some("03/01/2015"));
        assert_eq!(form.form().value(TIME_END), Some("04/01/2015"));

        let start = form.form().field(TIME_START).unwrap();
        assert!(!start.widget.attrs.contains_key("placeholder"));
        assert_eq!(start.widget.class(), Some("datepicker field-divided"));
    }

    #[test]
    fn without_area_dates_have_placeholders() {
        let form = GeospatialBoundsForm::new(None, FormInput::unbound());
        assert_eq!(form.form().value(TIME_START), None);
        let end = form.form().field(TIME_END).unwrap();
        assert_eq!(end.widget.attrs.get("placeholder").map(String::as_str), Some("01/02/2010"));
    }

    #[test]
    fn renders_inputs() {
        let area = lake_chad();
        let html = GeospatialBoundsForm::new(Some(&area), FormInput::unbound())
            .form()
            .render_html();
        assert!(html.contains(
            r#"<input type="number" name="latitude_min" id="id_latitude_min" class="field-divided" required="required" step="any">"#
        ));
        assert!(html.contains(
            r#"<input type="text" name="time_start" value="03/01/2015" id="id_time_start" class="datepicker field-divided" required="required">"#
        ));
        assert!(html.contains(r#"<label for="id_longitude_max">Max Longitude</label>"#));
    }
}
