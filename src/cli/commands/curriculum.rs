use anyhow::Result;
use std::sync::Arc;

use super::{confirmer, with_course_service, Command};
use crate::api::types::LessonType;
use crate::api::{CourseService, StudioError};
use crate::config::CourseStudioConfig;
use crate::curriculum::{CurriculumEditor, LessonDuration, LessonFields, NeverConfirm};

fn report_delete(result: Result<(), StudioError>, what: &str) -> Result<()> {
    match result {
        Ok(()) => {
            println!("✅ {what} deleted");
            Ok(())
        }
        Err(StudioError::DeleteCancelled) => {
            println!("❌ Operation cancelled by user");
            Ok(())
        }
        Err(e) => {
            println!("❌ {}", e.user_message());
            Err(e.into())
        }
    }
}

pub struct ChaptersCommand {
    pub course_id: String,
}

impl Command for ChaptersCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        with_course_service(config, |service| async move {
            let editor = CurriculumEditor::new(service, Arc::new(NeverConfirm), &self.course_id);
            let chapters = editor.refresh().await?;
            println!();
            if chapters.is_empty() {
                println!("📂 No chapters yet");
                println!("   💡 course-studio add-chapter --course {} --name ... --description ...", self.course_id);
                return Ok(());
            }

            for chapter in &chapters {
                println!("📂 {}. {} ({})", chapter.order, chapter.name, chapter.id);
                for lesson in &chapter.lessons {
                    let duration = lesson
                        .duration
                        .as_deref()
                        .and_then(LessonDuration::parse_wire)
                        .map(|d| format!("{} min", d.minutes()))
                        .unwrap_or_else(|| "-".to_string());
                    println!("   {} {} [{}] {}", lesson.id, lesson.name, lesson.lesson_type, duration);
                }
            }
            Ok(())
        })
        .await
    }
}

pub struct AddChapterCommand {
    pub course_id: String,
    pub name: String,
    pub description: String,
}

impl Command for AddChapterCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        with_course_service(config, |service| async move {
            let editor = CurriculumEditor::new(service, Arc::new(NeverConfirm), &self.course_id);
            editor.refresh().await?;
            let chapter_id = editor.create_chapter(&self.name, &self.description).await?;
            println!("✅ Chapter created: {chapter_id}");
            Ok(())
        })
        .await
    }
}

pub struct DeleteChapterCommand {
    pub course_id: String,
    pub chapter_id: String,
    pub yes: bool,
}

impl Command for DeleteChapterCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        with_course_service(config, |service| async move {
            let editor = CurriculumEditor::new(service, confirmer(self.yes), &self.course_id);
            editor.refresh().await?;
            report_delete(editor.delete_chapter(&self.chapter_id).await, "Chapter")
        })
        .await
    }
}

pub struct LessonsCommand {
    pub chapter_id: String,
}

impl Command for LessonsCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        with_course_service(config, |service| async move {
            let lessons = service.list_lessons(&self.chapter_id).await?;
            println!();
            if lessons.is_empty() {
                println!("🎬 No lessons in chapter {}", self.chapter_id);
            }
            for lesson in &lessons {
                println!(
                    "🎬 {} {} [{}] {}",
                    lesson.id,
                    lesson.name,
                    lesson.lesson_type,
                    lesson.duration.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        })
        .await
    }
}

pub struct AddLessonCommand {
    pub course_id: String,
    pub chapter_id: String,
    pub name: String,
    pub lesson_type: String,
    pub minutes: u32,
}

impl Command for AddLessonCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        let lesson_type: LessonType = self.lesson_type.parse()?;
        let fields = LessonFields {
            name: self.name.clone(),
            lesson_type,
            duration: LessonDuration::from_minutes(self.minutes),
        };

        with_course_service(config, |service| async move {
            let editor = CurriculumEditor::new(service, Arc::new(NeverConfirm), &self.course_id);
            let lesson_id = editor.create_lesson(&self.chapter_id, &fields).await?;
            println!(
                "✅ Lesson created: {} ({}, {})",
                lesson_id.as_deref().unwrap_or("id pending"),
                fields.lesson_type,
                fields.duration
            );
            Ok(())
        })
        .await
    }
}

pub struct DeleteLessonCommand {
    pub course_id: String,
    pub lesson_id: String,
    pub yes: bool,
}

impl Command for DeleteLessonCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        with_course_service(config, |service| async move {
            let editor = CurriculumEditor::new(service, confirmer(self.yes), &self.course_id);
            report_delete(editor.delete_lesson(&self.lesson_id).await, "Lesson")
        })
        .await
    }
}
