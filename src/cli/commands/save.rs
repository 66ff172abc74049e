use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use super::{describe_status, with_course_service, Command};
use crate::config::CourseStudioConfig;
use crate::forms::{FieldMap, SectionKind};
use crate::notify::ConsoleNotifier;
use crate::workflow::{SaveOutcome, WorkflowController};

pub struct SaveCommand {
    pub course_id: Option<String>,
    pub fields: PathBuf,
    /// Re-save basic info, metadata and staff of an existing course
    pub edit: bool,
}

/// Keys of the edit-mode fields file, one object per section
const EDIT_SECTIONS: [(&str, SectionKind); 3] = [
    ("basicInfo", SectionKind::BasicInfo),
    ("metadata", SectionKind::Metadata),
    ("staff", SectionKind::Staff),
];

impl SaveCommand {
    async fn read_fields(&self) -> Result<FieldMap> {
        let raw = tokio::fs::read_to_string(&self.fields)
            .await
            .with_context(|| format!("Failed to read {}", self.fields.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("{} must contain a JSON object of fields", self.fields.display()))
    }

    async fn execute_edit(&self, config: &CourseStudioConfig, mut fields: FieldMap) -> Result<()> {
        let course_id = self
            .course_id
            .clone()
            .context("--edit needs the --course to update")?;

        with_course_service(config, |service| async move {
            let controller = WorkflowController::new(service, Arc::new(ConsoleNotifier));
            let status = controller.resume_for_edit(&course_id).await;
            if controller.entity_id().await.is_none() {
                anyhow::bail!("Course {course_id} was not found");
            }
            println!("✏️  Editing course {course_id}: {}", describe_status(&status));

            {
                let mut forms = controller.forms().await;
                for (key, section) in EDIT_SECTIONS {
                    match fields.remove(key) {
                        Some(serde_json::Value::Object(section_fields)) => {
                            forms.section_mut(section).load(section_fields)?
                        }
                        Some(_) => anyhow::bail!("\"{key}\" must be a JSON object of fields"),
                        None => {}
                    }
                }
            }

            let status = controller.save_all().await?;
            println!();
            println!("   🆔 Course: {course_id}");
            println!("   🏷️  Status: {}", describe_status(&status));
            Ok(())
        })
        .await
    }
}

impl Command for SaveCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        let fields = self.read_fields().await?;
        if self.edit {
            return self.execute_edit(config, fields).await;
        }

        with_course_service(config, |service| async move {
            let controller = WorkflowController::new(service, Arc::new(ConsoleNotifier));
            if let Some(course_id) = &self.course_id {
                let status = controller.resume(course_id).await;
                println!("📘 Course {course_id}: {}", describe_status(&status));
            }

            let Some(step) = controller.active_step().await else {
                println!("💡 Nothing to save: no step is waiting at this status");
                return Ok(());
            };
            controller
                .forms()
                .await
                .section_mut(step.section)
                .load(fields)?;

            match controller.save().await? {
                SaveOutcome::Advanced { to, entity_id, .. } => {
                    println!();
                    println!("   🆔 Course: {}", entity_id.as_deref().unwrap_or("-"));
                    println!("   🏷️  Status: {}", describe_status(&to));
                }
                SaveOutcome::NoActiveStep { status } => {
                    println!("💡 Nothing to save at {status}");
                }
            }
            Ok(())
        })
        .await
    }
}
