use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{is_blank_rich_text, merge_fields, require_text, to_field_map, FieldMap, FormSection, SectionKind};
use crate::api::errors::{StudioResult, ValidationErrors};
use crate::api::types::{BasicInfoPayload, CourseBasicInfo};

/// Name, rich-text description, outcome, prerequisites and cover image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BasicInfoForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub prerequisites: String,
    /// Local file picked for upload; an existing remote image is not re-sent
    #[serde(default)]
    pub cover_image: Option<PathBuf>,
    #[serde(skip)]
    errors: ValidationErrors,
}

impl BasicInfoForm {
    /// Prefill from a fetched course; the cover image is left for re-upload
    pub fn from_course(course: &CourseBasicInfo) -> Self {
        Self {
            name: course.name.clone().unwrap_or_default(),
            description: course.description.clone().unwrap_or_default(),
            outcome: course.outcome.clone().unwrap_or_default(),
            prerequisites: course.prerequisites.clone().unwrap_or_default(),
            cover_image: None,
            errors: ValidationErrors::default(),
        }
    }

    pub fn payload(&self) -> BasicInfoPayload {
        BasicInfoPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            outcome: self.outcome.clone(),
            prerequisites: self.prerequisites.clone(),
            cover_image: self.cover_image.clone(),
        }
    }
}

impl FormSection for BasicInfoForm {
    fn section(&self) -> SectionKind {
        SectionKind::BasicInfo
    }

    fn validate(&mut self) -> bool {
        let mut errors = ValidationErrors::default();
        require_text(&mut errors, "Name", &self.name, "Course name is required");
        if is_blank_rich_text(&self.description) {
            errors
                .0
                .insert("Description".to_string(), "Description is required".to_string());
        }
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
