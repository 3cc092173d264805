//! Form machinery shared by the query forms: field declarations, binding of
//! submitted data, HTML rendering and cleaning into typed values.

pub(crate) mod geospatial;
pub(crate) mod result_selection;

pub(crate) use geospatial::{GeospatialBounds, GeospatialBoundsForm};
pub(crate) use result_selection::{ResultSelection, ResultSelectionForm};

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use utoipa::ToSchema;
use validator::ValidationError;

use crate::validation;

/// One entry of a select widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Choice { choices: Vec<Choice> },
    Char,
    Float,
    Date,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Select,
    HiddenInput,
    NumberInput,
    DateInput,
}

impl WidgetKind {
    fn input_type(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::HiddenInput => "hidden",
            Self::NumberInput => "number",
            Self::DateInput => "text",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Widget {
    pub kind: WidgetKind,
    pub attrs: BTreeMap<String, String>,
}

impl Widget {
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    #[cfg(test)]
    pub fn class(&self) -> Option<&str> {
        self.attrs.get("class").map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Field {
    pub name: String,
    pub label: Option<String>,
    pub help_text: Option<String>,
    pub required: bool,
    #[schema(value_type = Object)]
    pub kind: FieldKind,
    pub widget: Widget,
    pub initial: Option<String>,
}

impl Field {
    fn new(name: &str, kind: FieldKind, widget: Widget) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            help_text: None,
            required: true,
            kind,
            widget,
            initial: None,
        }
    }

    pub fn choice(name: &str, choices: Vec<Choice>) -> Self {
        Self::new(name, FieldKind::Choice { choices }, Widget::new(WidgetKind::Select))
    }

    pub fn char(name: &str) -> Self {
        Self::new(name, FieldKind::Char, Widget::new(WidgetKind::HiddenInput))
    }

    pub fn float(name: &str) -> Self {
        Self::new(name, FieldKind::Float, Widget::new(WidgetKind::NumberInput))
    }

    pub fn date(name: &str) -> Self {
        Self::new(name, FieldKind::Date, Widget::new(WidgetKind::DateInput))
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn help_text(mut self, text: &str) -> Self {
        self.help_text = Some(text.to_string());
        self
    }

    pub fn widget(mut self, widget: Widget) -> Self {
        self.widget = widget;
        self
    }

    pub fn initial(mut self, value: impl Into<String>) -> Self {
        self.initial = Some(value.into());
        self
    }

    pub fn choices(&self) -> &[Choice] {
        match &self.kind {
            FieldKind::Choice { choices } => choices,
            _ => &[],
        }
    }

    fn clean(&self, raw: Option<&str>) -> Result<Option<CleanedValue>, ValidationError> {
        let required = self.required;
        Ok(match &self.kind {
            FieldKind::Choice { choices } => {
                validation::clean_choice(raw, required, choices)?.map(CleanedValue::Text)
            }
            FieldKind::Char => validation::clean_text(raw, required)?.map(CleanedValue::Text),
            FieldKind::Float => validation::clean_float(raw, required)?.map(CleanedValue::Float),
            FieldKind::Date => validation::clean_date(raw, required)?.map(CleanedValue::Date),
        })
    }
}

/// Submitted data and display defaults handed to a form on construction.
#[derive(Clone, Debug, Default)]
pub struct FormInput {
    pub data: Option<HashMap<String, String>>,
    pub initial: HashMap<String, String>,
}

impl FormInput {
    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn bound(data: HashMap<String, String>) -> Self {
        Self {
            data: Some(data),
            initial: HashMap::new(),
        }
    }

    pub fn with_initial(mut self, initial: HashMap<String, String>) -> Self {
        self.initial = initial;
        self
    }
}

/// Per-field error messages, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for msg in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {msg}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CleanedValue {
    Text(String),
    Float(f64),
    Date(NaiveDate),
}

#[derive(Debug)]
pub struct CleanedData(HashMap<String, CleanedValue>);

impl CleanedData {
    fn missing(name: &str) -> FormErrors {
        let mut errors = FormErrors::default();
        errors.add(name, validation::required_error().to_string());
        errors
    }

    pub fn text(&self, name: &str) -> Result<String, FormErrors> {
        match self.0.get(name) {
            Some(CleanedValue::Text(s)) => Ok(s.clone()),
            _ => Err(Self::missing(name)),
        }
    }

    pub fn float(&self, name: &str) -> Result<f64, FormErrors> {
        match self.0.get(name) {
            Some(CleanedValue::Float(v)) => Ok(*v),
            _ => Err(Self::missing(name)),
        }
    }

    pub fn date(&self, name: &str) -> Result<NaiveDate, FormErrors> {
        match self.0.get(name) {
            Some(CleanedValue::Date(d)) => Ok(*d),
            _ => Err(Self::missing(name)),
        }
    }
}

/// An ordered set of fields plus the input it was built with.
#[derive(Clone, Debug)]
pub struct Form {
    fields: Vec<Field>,
    input: FormInput,
}

impl Form {
    pub fn new(fields: Vec<Field>, input: FormInput) -> Self {
        Self { fields, input }
    }

    pub fn is_bound(&self) -> bool {
        self.input.data.is_some()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Value shown in the widget: submitted data when bound, otherwise the
    /// form-level initial, falling back to the field's own initial.
    pub fn value(&self, name: &str) -> Option<&str> {
        if let Some(data) = &self.input.data {
            return data.get(name).map(String::as_str);
        }
        self.input
            .initial
            .get(name)
            .map(String::as_str)
            .or_else(|| self.field(name)?.initial.as_deref())
    }

    /// Cleans every field. An unbound form is never valid and reports no errors.
    pub fn full_clean(&self) -> Result<CleanedData, FormErrors> {
        let Some(data) = &self.input.data else {
            return Err(FormErrors::default());
        };

        let mut cleaned = HashMap::new();
        let mut errors = FormErrors::default();
        for field in &self.fields {
            match field.clean(data.get(&field.name).map(String::as_str)) {
                Ok(Some(value)) => {
                    cleaned.insert(field.name.clone(), value);
                }
                Ok(None) => {}
                Err(err) => errors.add(&field.name, err.to_string()),
            }
        }

        if errors.is_empty() {
            Ok(CleanedData(cleaned))
        } else {
            log::debug!(
                "Form rejected on fields [{}]: {errors}",
                errors.fields().collect::<Vec<_>>().join(", ")
            );
            Err(errors)
        }
    }

    pub fn errors(&self) -> FormErrors {
        match self.full_clean() {
            Ok(_) => FormErrors::default(),
            Err(errors) => errors,
        }
    }

    /// Renders each visible field as a `<p>` row. Hidden fields go last, and
    /// their errors are listed above the rows since they have no row of their own.
    pub fn render_html(&self) -> String {
        let errors = if self.is_bound() { self.errors() } else { FormErrors::default() };
        let mut top_errors = Vec::new();
        let mut visible = String::new();
        let mut hidden = String::new();

        for field in &self.fields {
            if field.widget.kind == WidgetKind::HiddenInput {
                if let Some(messages) = errors.get(&field.name) {
                    top_errors.extend(
                        messages
                            .iter()
                            .map(|msg| format!("(Hidden field {}) {msg}", field.name)),
                    );
                }
                hidden.push_str(&self.render_widget(field));
                continue;
            }

            visible.push_str("<p>");
            if let Some(messages) = errors.get(&field.name) {
                visible.push_str(&error_list("errorlist", messages));
            }
            if let Some(label) = &field.label {
                visible.push_str(&format!(
                    r#"<label for="id_{}">{}</label> "#,
                    html_escape(&field.name),
                    html_escape(label)
                ));
            }
            visible.push_str(&self.render_widget(field));
            if let Some(help) = &field.help_text {
                visible.push_str(&format!(r#" <span class="helptext">{}</span>"#, html_escape(help)));
            }
            visible.push_str("</p>\n");
        }

        let mut html = String::new();
        if !top_errors.is_empty() {
            html.push_str(&error_list("errorlist nonfield", &top_errors));
            html.push('\n');
        }
        html + &visible + &hidden
    }

    fn render_widget(&self, field: &Field) -> String {
        let name = html_escape(&field.name);
        let attrs: String = field
            .widget
            .attrs
            .iter()
            .map(|(k, v)| format!(r#" {}="{}""#, html_escape(k), html_escape(v)))
            .collect();
        let value = self.value(&field.name);

        match field.widget.kind {
            WidgetKind::Select => {
                let mut html = format!(r#"<select name="{name}" id="id_{name}"{attrs}>"#);
                for choice in field.choices() {
                    let selected = if value == Some(choice.value.as_str()) { " selected" } else { "" };
                    html.push_str(&format!(
                        r#"<option value="{}"{selected}>{}</option>"#,
                        html_escape(&choice.value),
                        html_escape(&choice.label)
                    ));
                }
                html.push_str("</select>");
                html
            }
            kind => {
                let value_attr = value
                    .map(|v| format!(r#" value="{}""#, html_escape(v)))
                    .unwrap_or_default();
                format!(
                    r#"<input type="{}" name="{name}"{value_attr} id="id_{name}"{attrs}>"#,
                    kind.input_type()
                )
            }
        }
    }
}

fn error_list(class: &str, messages: &[String]) -> String {
    let items: String = messages
        .iter()
        .map(|msg| format!("<li>{}</li>", html_escape(msg)))
        .collect();
    format!(r#"<ul class="{class}">{items}</ul>"#)
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
