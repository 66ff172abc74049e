use async_trait::async_trait;
use reqwest::multipart::Form;
use serde_json::{json, Value};
use tracing::debug;

use crate::api::errors::{StudioError, StudioResult};
use crate::api::types::*;
use crate::config::CourseStudioConfig;
use crate::forms::FieldMap;
use crate::http::{file_part, BackendHttpClient};
use crate::workflow::WorkflowStatus;

/// Remote course service operations, one method per REST call.
///
/// Every method performs exactly one request. Implementations report
/// transport problems as `Network`/`Http` and `isSuccess: false` as
/// `ServerRejection`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CourseService: Send + Sync {
    async fn create_course(&self, payload: &BasicInfoPayload) -> StudioResult<CreateCourseResponse>;
    async fn update_course(&self, course_id: &str, payload: &BasicInfoPayload) -> StudioResult<StatusResponse>;
    async fn get_course_basic_info(&self, course_id: &str) -> StudioResult<Option<CourseBasicInfo>>;
    async fn get_course_data(&self, course_id: &str) -> StudioResult<Option<FieldMap>>;
    async fn get_course_staff(&self, course_id: &str) -> StudioResult<Option<FieldMap>>;
    async fn save_course_data(&self, course_id: &str, fields: &FieldMap) -> StudioResult<WorkflowStatus>;
    async fn save_course_staff(&self, payload: &StaffPayload) -> StudioResult<WorkflowStatus>;
    async fn save_course_content(&self, course_id: &str, fields: &FieldMap) -> StudioResult<WorkflowStatus>;
    async fn list_courses(&self) -> StudioResult<Vec<CourseSummary>>;
    async fn delete_course(&self, course_id: &str) -> StudioResult<()>;
    async fn publish_course(&self, course_id: &str) -> StudioResult<()>;
    async fn list_chapters(&self, course_id: &str) -> StudioResult<Vec<Chapter>>;
    async fn create_chapter(&self, chapter: &NewChapter) -> StudioResult<Option<ChapterId>>;
    async fn update_chapter(&self, chapter: &ChapterUpdate) -> StudioResult<()>;
    async fn delete_chapter(&self, chapter_id: &str) -> StudioResult<()>;
    async fn list_lessons(&self, chapter_id: &str) -> StudioResult<Vec<Lesson>>;
    async fn get_lesson(&self, lesson_id: &str) -> StudioResult<Option<LessonDetail>>;
    async fn create_lesson(&self, lesson: &NewLesson) -> StudioResult<Option<LessonId>>;
    async fn update_lesson(&self, lesson: &LessonUpdate) -> StudioResult<()>;
    async fn delete_lesson(&self, lesson_id: &str) -> StudioResult<()>;
    async fn save_lesson_content(&self, content: &LessonContent) -> StudioResult<()>;
    async fn lookup(&self, kind: LookupKind) -> StudioResult<Vec<LookupItem>>;
}

/// `CourseService` over the REST API
#[derive(Debug, Clone)]
pub struct RestCourseService {
    http: BackendHttpClient,
}

impl RestCourseService {
    pub fn new(http: BackendHttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &CourseStudioConfig) -> StudioResult<Self> {
        Ok(Self::new(BackendHttpClient::from_config(config)?))
    }

    pub fn http(&self) -> &BackendHttpClient {
        &self.http
    }

    async fn basic_info_form(payload: &BasicInfoPayload) -> StudioResult<Form> {
        let mut form = Form::new()
            .text("Name", payload.name.clone())
            .text("Description", payload.description.clone())
            .text("Outcome", payload.outcome.clone())
            .text("Prerequisites", payload.prerequisites.clone());
        if let Some(path) = &payload.cover_image {
            form = form.part("CoverImage", file_part(path).await?);
        }
        Ok(form)
    }
}

/// `{ ...fields, id }` body shared by the metadata and content steps
fn with_course_id(course_id: &str, fields: &FieldMap) -> FieldMap {
    let mut body = fields.clone();
    body.insert("id".to_string(), json!(course_id));
    body
}

#[async_trait]
impl CourseService for RestCourseService {
    async fn create_course(&self, payload: &BasicInfoPayload) -> StudioResult<CreateCourseResponse> {
        let form = Self::basic_info_form(payload).await?;
        self.http
            .post_multipart("Courses/CreateCourse", form, "Failed to create course")
            .await
    }

    async fn update_course(&self, course_id: &str, payload: &BasicInfoPayload) -> StudioResult<StatusResponse> {
        let form = Self::basic_info_form(payload)
            .await?
            .text("Id", course_id.to_string());
        self.http
            .post_multipart("Courses/UpdateCourse", form, "Failed to update basic info")
            .await
    }

    async fn get_course_basic_info(&self, course_id: &str) -> StudioResult<Option<CourseBasicInfo>> {
        let response: CourseBasicInfoResponse = self
            .http
            .get("Courses/GetCourseBasicInfo", &[("Id", course_id)], "Course not found")
            .await?;
        Ok(response.course)
    }

    async fn get_course_data(&self, course_id: &str) -> StudioResult<Option<FieldMap>> {
        let response: CourseRecordResponse = self
            .http
            .get("Courses/GetCourseData", &[("Id", course_id)], "Failed to load course data")
            .await?;
        Ok(response.course)
    }

    async fn get_course_staff(&self, course_id: &str) -> StudioResult<Option<FieldMap>> {
        let response: CourseRecordResponse = self
            .http
            .get("Courses/GetCourseStaff", &[("Id", course_id)], "Failed to load course staff")
            .await?;
        Ok(response.course)
    }

    async fn save_course_data(&self, course_id: &str, fields: &FieldMap) -> StudioResult<WorkflowStatus> {
        let mut body = with_course_id(course_id, fields);
        // The backend expects a plain number and never takes the enrollment floor from this form
        let duration = body
            .get("duration")
            .and_then(|value| match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            })
            .map_or(Value::Null, |n| {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    json!(n as i64)
                } else {
                    json!(n)
                }
            });
        body.insert("duration".to_string(), duration);
        body.insert("minEnrollment".to_string(), json!(0));

        let response: StatusResponse = self
            .http
            .post_json("Courses/AddCourseData", &body, "Failed to save metadata")
            .await?;
        Ok(response.status)
    }

    async fn save_course_staff(&self, payload: &StaffPayload) -> StudioResult<WorkflowStatus> {
        let response: StatusResponse = self
            .http
            .post_json("Courses/AddCourseStaff", payload, "Failed to save instructors")
            .await?;
        Ok(response.status)
    }

    async fn save_course_content(&self, course_id: &str, fields: &FieldMap) -> StudioResult<WorkflowStatus> {
        let body = with_course_id(course_id, fields);
        let response: StatusResponse = self
            .http
            .post_json("Courses/AddCourseContent", &body, "Failed to save content")
            .await?;
        Ok(response.status)
    }

    async fn list_courses(&self) -> StudioResult<Vec<CourseSummary>> {
        let response: CoursesResponse = self
            .http
            .post_json("Courses/GetCourses", &json!({}), "Failed to load courses")
            .await?;
        Ok(response.courses.items)
    }

    async fn delete_course(&self, course_id: &str) -> StudioResult<()> {
        let _: Value = self
            .http
            .delete("Courses/DeleteCourse", &[("Id", course_id)], "Failed to delete course")
            .await?;
        Ok(())
    }

    async fn publish_course(&self, course_id: &str) -> StudioResult<()> {
        let _: Value = self
            .http
            .post_json(
                "Courses/PublishCourse",
                &json!({ "courseId": course_id }),
                "Failed to publish course",
            )
            .await?;
        Ok(())
    }

    async fn list_chapters(&self, course_id: &str) -> StudioResult<Vec<Chapter>> {
        let response: ChaptersResponse = self
            .http
            .post_json(
                "Chapters/GetChapters",
                &json!({ "courseId": course_id }),
                "Failed to load chapters",
            )
            .await?;
        Ok(response.chapters.items)
    }

    async fn create_chapter(&self, chapter: &NewChapter) -> StudioResult<Option<ChapterId>> {
        let form = Form::new()
            .text("CourseId", chapter.course_id.clone())
            .text("Name", chapter.name.clone())
            .text("Description", chapter.description.clone())
            .text("Order", chapter.order.to_string());
        let response: CreatedResponse = self
            .http
            .post_multipart("Chapters/CreateChapter", form, "Error adding section")
            .await?;
        Ok(response.id)
    }

    async fn update_chapter(&self, chapter: &ChapterUpdate) -> StudioResult<()> {
        let _: Value = self
            .http
            .post_json("Chapters/UpdateChapter", chapter, "Error updating section")
            .await?;
        Ok(())
    }

    async fn delete_chapter(&self, chapter_id: &str) -> StudioResult<()> {
        let _: Value = self
            .http
            .delete("Chapters/DeleteChapter", &[("Id", chapter_id)], "Failed to delete section")
            .await?;
        Ok(())
    }

    async fn list_lessons(&self, chapter_id: &str) -> StudioResult<Vec<Lesson>> {
        let response: LessonsResponse = self
            .http
            .post_json(
                "Lessons/GetLessons",
                &json!({ "chapterId": chapter_id }),
                "Failed to load lessons",
            )
            .await?;
        Ok(response.lessons)
    }

    async fn get_lesson(&self, lesson_id: &str) -> StudioResult<Option<LessonDetail>> {
        let response: LessonDetailResponse = self
            .http
            .get("Lessons/GetLesson", &[("LessonId", lesson_id)], "Failed to load lesson data")
            .await?;
        Ok(response.lesson)
    }

    async fn create_lesson(&self, lesson: &NewLesson) -> StudioResult<Option<LessonId>> {
        let response: CreatedResponse = self
            .http
            .post_json("Lessons/CreateLesson", lesson, "Failed to create lesson")
            .await?;
        Ok(response.id)
    }

    async fn update_lesson(&self, lesson: &LessonUpdate) -> StudioResult<()> {
        let _: Value = self
            .http
            .post_json("Lessons/UpdateLesson", lesson, "Failed to update lesson")
            .await?;
        Ok(())
    }

    async fn delete_lesson(&self, lesson_id: &str) -> StudioResult<()> {
        let _: Value = self
            .http
            .delete("Lessons/DeleteLesson", &[("Id", lesson_id)], "Failed to delete lesson")
            .await?;
        Ok(())
    }

    async fn save_lesson_content(&self, content: &LessonContent) -> StudioResult<()> {
        let name = if content.name.trim().is_empty() {
            "Untitled Lesson".to_string()
        } else {
            content.name.clone()
        };
        let mut form = Form::new()
            .text("LessonId", content.lesson_id.clone())
            .text("Name", name)
            .text("Intro", content.intro.clone())
            .text("Order", content.order.to_string())
            .text("Type", content.lesson_type.as_str().to_string())
            .text("Description", content.description.clone())
            .text("Duration", content.duration.clone());
        if let Some(path) = &content.video {
            form = form.part("Video", file_part(path).await?);
        }
        if let Some(path) = &content.video_placeholder {
            form = form.part("VideoPlaceholder", file_part(path).await?);
        }
        for (index, item) in content.item_images.iter().enumerate() {
            if let Some(path) = &item.image {
                form = form.part(format!("ItemImages[{index}].Image"), file_part(path).await?);
            }
            form = form
                .text(format!("ItemImages[{index}].AltText"), item.alt_text.clone())
                .text(format!("ItemImages[{index}].Description"), item.description.clone());
        }

        let _: Value = self
            .http
            .post_multipart("Lessons/CreateLessonItems", form, "Error saving lesson")
            .await?;
        Ok(())
    }

    async fn lookup(&self, kind: LookupKind) -> StudioResult<Vec<LookupItem>> {
        let payload: Value = self
            .http
            .post_json_cached(kind.endpoint(), &kind.request_body(), "Failed to load options")
            .await?;
        let items = payload
            .get(kind.list_key())
            .and_then(|list| list.get("items"))
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        debug!(lookup = kind.list_key(), "Loaded lookup list");
        serde_json::from_value(items).map_err(StudioError::from)
    }
}
