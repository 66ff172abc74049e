use serde::{Deserialize, Serialize};

use super::{merge_fields, require_any, to_field_map, FieldMap, FormSection, SectionKind};
use crate::api::errors::{StudioResult, ValidationErrors};
use crate::api::types::{CourseId, StaffPayload};

/// Instructor and assistant assignment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffForm {
    #[serde(default)]
    pub instructor_ids: Vec<String>,
    #[serde(default)]
    pub assistant_ids: Vec<String>,
    #[serde(default)]
    pub allow_rating_on_instructor: bool,
    #[serde(skip)]
    errors: ValidationErrors,
}

impl StaffForm {
    /// Assistants are always rateable
    pub fn payload(&self, course_id: &CourseId) -> StaffPayload {
        StaffPayload {
            id: course_id.clone(),
            instructor_ids: self.instructor_ids.clone(),
            assistant_ids: self.assistant_ids.clone(),
            allow_rating_on_instructor: self.allow_rating_on_instructor,
            allow_rating_on_assistant: true,
        }
    }
}

impl FormSection for StaffForm {
    fn section(&self) -> SectionKind {
        SectionKind::Staff
    }

    fn validate(&mut self) -> bool {
        let mut errors = ValidationErrors::default();
        require_any(&mut errors, "instructorIds", &self.instructor_ids, "Instructor is required");
        self.errors = errors;
        self.errors.is_empty()
    }

    fn values(&self) -> FieldMap {
        to_field_map(self)
    }

    fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    fn load(&mut self, fields: FieldMap) -> StudioResult<()> {
        *self = merge_fields(self, fields)?;
        Ok(())
    }
}
