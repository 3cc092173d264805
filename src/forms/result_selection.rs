use serde::Serialize;
use utoipa::ToSchema;

use super::{Choice, Field, Form, FormErrors, FormInput, Widget, WidgetKind};
use crate::config::UnfilteredResultTypes;
use crate::errors::AppError;
use crate::repositories::Catalog;

pub const RESULT_TYPE: &str = "result_type";
pub const ANIMATED_PRODUCT: &str = "animated_product";
pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";

const ANIMATION_HELP: &str = "Generate a .gif containing water extents for every scene. \
    Use the output tab to download this result.";
const RESULT_TYPE_HELP: &str = "Select background color of the image that you would like displayed.";

/// Cleaned submission of the result selection form.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct ResultSelection {
    pub result_type: String,
    pub animated_product: String,
    pub title: String,
    pub description: String,
}

/// Picks how a water detection result is coloured and whether to build an
/// animation, plus the hidden title/description of the query.
#[derive(Debug)]
pub struct ResultSelectionForm {
    form: Form,
}

impl ResultSelectionForm {
    /// Loads the option lists from `catalog`. A satellite id narrows the
    /// result types to that satellite; without one, `unfiltered` decides
    /// whether every result type is offered or none.
    pub async fn new(
        catalog: &dyn Catalog,
        unfiltered: UnfilteredResultTypes,
        satellite_id: Option<&str>,
        input: FormInput,
    ) -> Result<Self, AppError> {
        let result_type = match satellite_id {
            Some(id) => {
                let choices = catalog.result_types(Some(id)).await?;
                if choices.is_empty() {
                    log::warn!("No result types configured for satellite {id}");
                }
                Field::choice(RESULT_TYPE, into_choices(choices))
                    .label("Background Color:")
                    .help_text(RESULT_TYPE_HELP)
                    .widget(select("field-long tooltipped"))
            }
            None => {
                let choices = match unfiltered {
                    UnfilteredResultTypes::All => into_choices(catalog.result_types(None).await?),
                    UnfilteredResultTypes::Empty => Vec::new(),
                };
                Field::choice(RESULT_TYPE, choices)
                    .label("Image Background Color:")
                    .widget(select("field-long"))
            }
        };

        let animations = into_choices(catalog.animation_types().await?);
        let animated_product = Field::choice(ANIMATED_PRODUCT, animations)
            .label("Generate Time Series Animation")
            .help_text(ANIMATION_HELP)
            .widget(select("field-long tooltipped"));

        let fields = vec![
            result_type,
            animated_product,
            Field::char(TITLE),
            Field::char(DESCRIPTION),
        ];

        Ok(Self {
            form: Form::new(fields, input),
        })
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn clean(&self) -> Result<ResultSelection, FormErrors> {
        let data = self.form.full_clean()?;
        Ok(ResultSelection {
            result_type: data.text(RESULT_TYPE)?,
            animated_product: data.text(ANIMATED_PRODUCT)?,
            title: data.text(TITLE)?,
            description: data.text(DESCRIPTION)?,
        })
    }
}

fn select(class: &str) -> Widget {
    Widget::new(WidgetKind::Select).attr("class", class)
}

fn into_choices<T: Into<Choice>>(rows: Vec<T>) -> Vec<Choice> {
    rows.into_iter().map(Into::into).collect()
}
