use serde::Serialize;
use utoipa::ToSchema;

use crate::forms::{Field, Form};

#[derive(Serialize, ToSchema)]
pub struct HealthPayload {
    pub status: String,
    pub version: String,
}

/// Field configuration plus ready-to-embed markup for one form.
#[derive(Serialize, ToSchema)]
pub struct FormPayload {
    pub fields: Vec<Field>,
    pub html: String,
}

impl From<&Form> for FormPayload {
    fn from(form: &Form) -> Self {
        Self {
            fields: form.fields().to_vec(),
            html: form.render_html(),
        }
    }
}
