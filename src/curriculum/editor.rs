use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use super::confirm::Confirm;
use super::duration::LessonDuration;
use crate::api::client::CourseService;
use crate::api::errors::{StudioError, StudioResult, ValidationErrors};
use crate::api::types::{
    Chapter, ChapterId, ChapterUpdate, CourseId, Lesson, LessonContent, LessonDetail, LessonId,
    LessonType, LessonUpdate, NewChapter, NewLesson,
};

/// Editable chapter fields. `order` keeps the current position when unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterFields {
    pub name: String,
    pub description: String,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LessonFields {
    pub name: String,
    pub lesson_type: LessonType,
    pub duration: LessonDuration,
}

/// Chapters and lessons of one course.
///
/// The cached chapter list is only ever replaced by a refetch; mutations do
/// not patch it optimistically, except that a confirmed delete prunes it.
pub struct CurriculumEditor {
    service: Arc<dyn CourseService>,
    confirm: Arc<dyn Confirm>,
    course_id: CourseId,
    chapters: RwLock<Vec<Chapter>>,
}

impl CurriculumEditor {
    pub fn new(service: Arc<dyn CourseService>, confirm: Arc<dyn Confirm>, course_id: &str) -> Self {
        Self {
            service,
            confirm,
            course_id: course_id.to_string(),
            chapters: RwLock::new(Vec::new()),
        }
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// Last fetched chapter list
    pub async fn chapters(&self) -> Vec<Chapter> {
        self.chapters.read().await.clone()
    }

    pub async fn refresh(&self) -> StudioResult<Vec<Chapter>> {
        let chapters = self.service.list_chapters(&self.course_id).await?;
        *self.chapters.write().await = chapters.clone();
        Ok(chapters)
    }

    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.refresh().await {
            warn!(course.id = %self.course_id, error = %e, "Chapter refetch failed, list may be stale");
        }
    }

    pub async fn create_chapter(&self, name: &str, description: &str) -> StudioResult<ChapterId> {
        validate_chapter(name, description)?;
        let order = self.chapters.read().await.len() as i32 + 1;

        let created = self
            .service
            .create_chapter(&NewChapter {
                course_id: self.course_id.clone(),
                name: name.trim().to_string(),
                description: description.to_string(),
                order,
            })
            .await?;

        let refreshed = self.refresh().await;
        let chapter_id = match (created, refreshed) {
            (Some(id), Ok(_)) => id,
            (Some(id), Err(e)) => {
                warn!(course.id = %self.course_id, error = %e, "Chapter refetch failed, list may be stale");
                id
            }
            // The backend does not always echo the id; pick the newest chapter with this name
            (None, refreshed) => refreshed?
                .iter()
                .rev()
                .find(|chapter| chapter.name == name.trim())
                .map(|chapter| chapter.id.clone())
                .ok_or_else(|| StudioError::rejected("Chapter was created but not returned by the server"))?,
        };

        info!(course.id = %self.course_id, chapter.id = %chapter_id, "Chapter created");
        Ok(chapter_id)
    }

    pub async fn update_chapter(&self, chapter_id: &str, fields: &ChapterFields) -> StudioResult<()> {
        require_id(chapter_id, "chapterId", "Chapter is required")?;
        validate_chapter(&fields.name, &fields.description)?;

        let order = match fields.order {
            Some(order) => order,
            None => self
                .chapters
                .read()
                .await
                .iter()
                .find(|chapter| chapter.id == chapter_id)
                .map(|chapter| chapter.order)
                .unwrap_or(1),
        };

        self.service
            .update_chapter(&ChapterUpdate {
                id: chapter_id.to_string(),
                name: fields.name.trim().to_string(),
                description: fields.description.clone(),
                order,
            })
            .await?;
        info!(chapter.id = %chapter_id, "Chapter updated");
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Confirm, delete, then refetch. A failed call leaves the cached list as it was.
    pub async fn delete_chapter(&self, chapter_id: &str) -> StudioResult<()> {
        let name = self
            .chapters
            .read()
            .await
            .iter()
            .find(|chapter| chapter.id == chapter_id)
            .map(|chapter| chapter.name.clone())
            .unwrap_or_else(|| chapter_id.to_string());

        if !self
            .confirm
            .confirm(&format!("Delete chapter \"{name}\" and all of its lessons?"))
            .await
        {
            info!(chapter.id = %chapter_id, "Chapter delete cancelled");
            return Err(StudioError::DeleteCancelled);
        }

        self.service.delete_chapter(chapter_id).await?;
        self.chapters
            .write()
            .await
            .retain(|chapter| chapter.id != chapter_id);
        info!(chapter.id = %chapter_id, "Chapter deleted");
        self.refresh_after_mutation().await;
        Ok(())
    }

    pub async fn lessons(&self, chapter_id: &str) -> StudioResult<Vec<Lesson>> {
        require_id(chapter_id, "chapterId", "Chapter is required")?;
        self.service.list_lessons(chapter_id).await
    }

    pub async fn get_lesson(&self, lesson_id: &str) -> StudioResult<Option<LessonDetail>> {
        self.service.get_lesson(lesson_id).await
    }

    pub async fn create_lesson(
        &self,
        chapter_id: &str,
        fields: &LessonFields,
    ) -> StudioResult<Option<LessonId>> {
        require_id(chapter_id, "chapterId", "Chapter is required")?;
        validate_lesson(fields)?;

        let lesson_id = self
            .service
            .create_lesson(&NewLesson {
                chapter_id: chapter_id.to_string(),
                name: fields.name.trim().to_string(),
                order: "1".to_string(),
                lesson_type: fields.lesson_type,
                duration: fields.duration.to_wire(),
            })
            .await?;
        info!(
            chapter.id = %chapter_id,
            lesson.id = lesson_id.as_deref().unwrap_or_default(),
            "Lesson created"
        );
        self.refresh_after_mutation().await;
        Ok(lesson_id)
    }

    pub async fn update_lesson(&self, lesson_id: &str, fields: &LessonFields) -> StudioResult<()> {
        require_id(lesson_id, "lessonId", "Lesson is required")?;
        validate_lesson(fields)?;

        self.service
            .update_lesson(&LessonUpdate {
                id: lesson_id.to_string(),
                name: fields.name.trim().to_string(),
                lesson_type: fields.lesson_type,
                duration: fields.duration.to_wire(),
            })
            .await?;
        info!(lesson.id = %lesson_id, "Lesson updated");
        self.refresh_after_mutation().await;
        Ok(())
    }

    pub async fn delete_lesson(&self, lesson_id: &str) -> StudioResult<()> {
        if !self.confirm.confirm("Delete this lesson?").await {
            info!(lesson.id = %lesson_id, "Lesson delete cancelled");
            return Err(StudioError::DeleteCancelled);
        }

        self.service.delete_lesson(lesson_id).await?;
        info!(lesson.id = %lesson_id, "Lesson deleted");
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Upload the body of a lesson (video, text and item images)
    pub async fn save_lesson_content(&self, content: &LessonContent) -> StudioResult<()> {
        require_id(&content.lesson_id, "lessonId", "Lesson is required")?;
        self.service.save_lesson_content(content).await?;
        info!(lesson.id = %content.lesson_id, "Lesson content saved");
        Ok(())
    }
}

fn require_id(id: &str, field: &str, message: &str) -> StudioResult<()> {
    if id.trim().is_empty() {
        return Err(StudioError::Validation(ValidationErrors::single(field, message)));
    }
    Ok(())
}

fn validate_chapter(name: &str, description: &str) -> StudioResult<()> {
    let mut errors = ValidationErrors::default();
    if name.trim().is_empty() {
        errors.0.insert("name".to_string(), "Chapter name is required".to_string());
    }
    if description.trim().is_empty() {
        errors
            .0
            .insert("description".to_string(), "Chapter description is required".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(StudioError::Validation(errors))
    }
}

fn validate_lesson(fields: &LessonFields) -> StudioResult<()> {
    let mut errors = ValidationErrors::default();
    if fields.name.trim().is_empty() {
        errors.0.insert("name".to_string(), "Lesson name is required".to_string());
    }
    if fields.duration.minutes() < 1 {
        errors
            .0
            .insert("duration".to_string(), "Duration must be at least 1 minute".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(StudioError::Validation(errors))
    }
}
