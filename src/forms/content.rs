use super::{FieldMap, FormSection, SectionKind};
use crate::api::errors::{StudioResult, ValidationErrors};

/// Curriculum step. Chapters and lessons are saved through their own calls,
/// so this section only carries whatever extra fields the caller sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentForm {
    pub fields: FieldMap,
    errors: ValidationErrors,
}

impl FormSection for ContentForm {
    fn section(&self) -> SectionKind {
        SectionKind::Content
    }

    fn validate(&mut self) -> bool {
        true
    }

    fn values(&self) -> FieldMap {
        self.fields.clone()
    }

    fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    fn load(&mut self, fields: FieldMap) -> StudioResult<()> {
        self.fields.extend(fields);
        Ok(())
    }
}
