use serde::{Deserialize, Serialize};

use super::{merge_fields, require_any, require_some, require_text, to_field_map, FieldMap, FormSection, SectionKind};
use crate::api::errors::{StudioResult, ValidationErrors};

/// Side panel: category, level, tags, code, duration, languages, program...
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataForm {
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub level_id: Option<String>,
    #[serde(default)]
    pub courses_tags: Vec<String>,
    #[serde(default)]
    pub allow_rating_on_content: bool,
    #[serde(default)]
    pub code: String,
    /// Hours; ignored by validation when the duration is computed server-side
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub allow_dynamic_duration: bool,
    #[serde(default)]
    pub courses_languages: Vec<String>,
    #[serde(default)]
    pub has_certificate: bool,
    #[serde(default)]
    pub program_id: Option<String>,
    #[serde(skip)]
    errors: ValidationErrors,
}

impl FormSection for MetadataForm {
    fn section(&self) -> SectionKind {
        SectionKind::Metadata
    }

    fn validate(&mut self) -> bool {
        let mut errors = ValidationErrors::default();
        require_any(&mut errors, "categoryIds", &self.category_ids, "Course category is required");
        require_some(&mut errors, "levelId", &self.level_id, "Course level is required");
        require_any(&mut errors, "coursesTags", &self.courses_tags, "At least one tag is required");
        require_text(&mut errors, "code", &self.code, "Course code is required");
        if !self.allow_dynamic_duration {
            require_some(&mut errors, "duration", &self.duration, "Course duration is required");
        }
        require_any(
            &mut errors,
            "coursesLanguages",
            &self.courses_languages,
            "Course language is required",
        );
        require_some(&mut errors, "programId", &self.program_id, "Program is required");
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
