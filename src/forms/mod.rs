// Form sections - each owns its field values and validation errors.
//
// The workflow controller only talks to sections through `FormSection`, so a
// section can be swapped for a test double without touching the controller.

pub mod basic_info;
pub mod content;
pub mod metadata;
pub mod staff;

use serde::de::DeserializeOwned;
use serde::Serialize;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::LazyLock;

use crate::api::errors::{StudioError, StudioResult, ValidationErrors};

pub use basic_info::BasicInfoForm;
pub use content::ContentForm;
pub use metadata::MetadataForm;
pub use staff::StaffForm;

pub type FieldMap = Map<String, Value>;
pub type ErrorMap = ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    BasicInfo,
    Metadata,
    Staff,
    Content,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::BasicInfo,
        SectionKind::Metadata,
        SectionKind::Staff,
        SectionKind::Content,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::BasicInfo => "basic info",
            SectionKind::Metadata => "metadata",
            SectionKind::Staff => "instructors",
            SectionKind::Content => "curriculum",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Capability the workflow controller needs from a form section
pub trait FormSection: Send + Sync {
    fn section(&self) -> SectionKind;

    /// Re-run the field rules, replacing the previous errors
    fn validate(&mut self) -> bool;

    /// Current field values keyed by their wire names
    fn values(&self) -> FieldMap;

    fn errors(&self) -> &ErrorMap;

    /// Overwrite the named fields, leaving the others as they are
    fn load(&mut self, fields: FieldMap) -> StudioResult<()>;
}

/// The four sections of the course wizard
#[derive(Debug, Clone, Default)]
pub struct CourseForms {
    pub basic_info: BasicInfoForm,
    pub metadata: MetadataForm,
    pub staff: StaffForm,
    pub content: ContentForm,
}

impl CourseForms {
    pub fn section(&self, kind: SectionKind) -> &dyn FormSection {
        match kind {
            SectionKind::BasicInfo => &self.basic_info,
            SectionKind::Metadata => &self.metadata,
            SectionKind::Staff => &self.staff,
            SectionKind::Content => &self.content,
        }
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> &mut dyn FormSection {
        match kind {
            SectionKind::BasicInfo => &mut self.basic_info,
            SectionKind::Metadata => &mut self.metadata,
            SectionKind::Staff => &mut self.staff,
            SectionKind::Content => &mut self.content,
        }
    }
}

pub(crate) fn to_field_map<T: Serialize>(form: &T) -> FieldMap {
    match serde_json::to_value(form) {
        Ok(Value::Object(map)) => map,
        _ => FieldMap::new(),
    }
}

/// Overlay `fields` onto the serialized form and read it back.
/// A value of the wrong shape is the caller's input, so it is a validation error.
pub(crate) fn merge_fields<T: Serialize + DeserializeOwned>(
    current: &T,
    fields: FieldMap,
) -> StudioResult<T> {
    let mut merged = to_field_map(current);
    merged.extend(fields);
    serde_json::from_value(Value::Object(merged)).map_err(|e| {
        StudioError::Validation(ValidationErrors::single(
            "fields",
            &format!("Invalid field value: {e}"),
        ))
    })
}

pub(crate) fn require_text(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.0.insert(field.to_string(), message.to_string());
    }
}

pub(crate) fn require_some<T>(
    errors: &mut ValidationErrors,
    field: &str,
    value: &Option<T>,
    message: &str,
) {
    if value.is_none() {
        errors.0.insert(field.to_string(), message.to_string());
    }
}

pub(crate) fn require_any<T>(errors: &mut ValidationErrors, field: &str, values: &[T], message: &str) {
    if values.is_empty() {
        errors.0.insert(field.to_string(), message.to_string());
    }
}

// Tags and non-breaking spaces
static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>|&nbsp;").expect("markup pattern is valid"));

/// True when rich-text markup has no visible text (`<p><br></p>` and the like)
pub(crate) fn is_blank_rich_text(html: &str) -> bool {
    MARKUP.replace_all(html, " ").trim().is_empty()
}
