// In-memory course service for tests - mimics the backend's status progression

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::api::client::CourseService;
use crate::api::errors::{StudioError, StudioResult};
use crate::api::types::*;
use crate::forms::FieldMap;
use crate::workflow::WorkflowStatus;

#[derive(Debug, Clone, Default)]
struct FakeCourse {
    info: CourseBasicInfo,
    status: WorkflowStatus,
    data: FieldMap,
    staff: FieldMap,
}

#[derive(Debug, Default)]
struct FakeBackend {
    next_id: u64,
    courses: BTreeMap<CourseId, FakeCourse>,
    chapters: Vec<(CourseId, Chapter)>,
    calls: Vec<String>,
    reject_next: Option<String>,
}

impl FakeBackend {
    fn issue_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    /// Records the call and consumes a pending rejection
    fn enter(&mut self, call: &str) -> StudioResult<()> {
        self.calls.push(call.to_string());
        match self.reject_next.take() {
            Some(message) => Err(StudioError::rejected(message)),
            None => Ok(()),
        }
    }

    fn course_mut(&mut self, course_id: &str) -> StudioResult<&mut FakeCourse> {
        self.courses
            .get_mut(course_id)
            .ok_or_else(|| StudioError::rejected("Course not found"))
    }

    fn chapter_mut(&mut self, chapter_id: &str) -> StudioResult<&mut Chapter> {
        self.chapters
            .iter_mut()
            .map(|(_, chapter)| chapter)
            .find(|chapter| chapter.id == chapter_id)
            .ok_or_else(|| StudioError::rejected("Chapter not found"))
    }
}

#[derive(Debug, Default)]
pub struct FakeCourseService {
    backend: Mutex<FakeBackend>,
    delay: Option<Duration>,
}

impl FakeCourseService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps first, so concurrent callers overlap
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn seed_course(&self, course_id: &str, name: &str, status: WorkflowStatus) {
        let mut backend = self.lock();
        backend.courses.insert(
            course_id.to_string(),
            FakeCourse {
                info: CourseBasicInfo {
                    id: course_id.to_string(),
                    status: Some(status.clone()),
                    name: Some(name.to_string()),
                    ..Default::default()
                },
                status,
                ..Default::default()
            },
        );
    }

    pub fn reject_next(&self, message: &str) {
        self.lock().reject_next = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn status_of(&self, course_id: &str) -> Option<WorkflowStatus> {
        self.lock().courses.get(course_id).map(|course| course.status.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeBackend> {
        match self.backend.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn advance(&self, call: &str, course_id: &str, next: WorkflowStatus) -> StudioResult<WorkflowStatus> {
        let mut backend = self.lock();
        backend.enter(call)?;
        let course = backend.course_mut(course_id)?;
        course.status = next.clone();
        course.info.status = Some(next.clone());
        Ok(next)
    }
}

#[async_trait]
impl CourseService for FakeCourseService {
    async fn create_course(&self, payload: &BasicInfoPayload) -> StudioResult<CreateCourseResponse> {
        self.pause().await;
        let mut backend = self.lock();
        backend.enter("create_course")?;
        let id = backend.issue_id("course-");
        let status = WorkflowStatus::DraftBasicInfo;
        backend.courses.insert(
            id.clone(),
            FakeCourse {
                info: CourseBasicInfo {
                    id: id.clone(),
                    status: Some(status.clone()),
                    name: Some(payload.name.clone()),
                    description: Some(payload.description.clone()),
                    prerequisites: Some(payload.prerequisites.clone()),
                    outcome: Some(payload.outcome.clone()),
                    cover_image: None,
                },
                status: status.clone(),
                ..Default::default()
            },
        );
        Ok(CreateCourseResponse { id, status })
    }

    async fn update_course(&self, course_id: &str, payload: &BasicInfoPayload) -> StudioResult<StatusResponse> {
        self.pause().await;
        let mut backend = self.lock();
        backend.enter("update_course")?;
        let course = backend.course_mut(course_id)?;
        course.info.name = Some(payload.name.clone());
        course.info.description = Some(payload.description.clone());
        Ok(StatusResponse {
            status: course.status.clone(),
        })
    }

    async fn get_course_basic_info(&self, course_id: &str) -> StudioResult<Option<CourseBasicInfo>> {
        self.pause().await;
        let mut backend = self.lock();
        backend.enter("get_course_basic_info")?;
        Ok(backend.courses.get(course_id).map(|course| course.info.clone()))
    }

    async fn get_course_data(&self, course_id: &str) -> StudioResult<Option<FieldMap>> {
        let mut backend = self.lock();
        backend.enter("get_course_data")?;
        Ok(backend.courses.get(course_id).map(|course| course.data.clone()))
    }

    async fn get_course_staff(&self, course_id: &str) -> StudioResult<Option<FieldMap>> {
        let mut backend = self.lock();
        backend.enter("get_course_staff")?;
        Ok(backend.courses.get(course_id).map(|course| course.staff.clone()))
    }

    async fn save_course_data(&self, course_id: &str, fields: &FieldMap) -> StudioResult<WorkflowStatus> {
        self.pause().await;
        let status = self.advance("save_course_data", course_id, WorkflowStatus::DraftMetaData)?;
        if let Ok(course) = self.lock().course_mut(course_id) {
            course.data = fields.clone();
        }
        Ok(status)
    }

    async fn save_course_staff(&self, payload: &StaffPayload) -> StudioResult<WorkflowStatus> {
        self.pause().await;
        self.advance("save_course_staff", &payload.id, WorkflowStatus::DraftStaffInfo)
    }

    async fn save_course_content(&self, course_id: &str, _fields: &FieldMap) -> StudioResult<WorkflowStatus> {
        self.pause().await;
        self.advance("save_course_content", course_id, WorkflowStatus::Draft)
    }

    async fn list_courses(&self) -> StudioResult<Vec<CourseSummary>> {
        let mut backend = self.lock();
        backend.enter("list_courses")?;
        Ok(backend
            .courses
            .values()
            .map(|course| CourseSummary {
                id: course.info.id.clone(),
                name: course.info.name.clone(),
                status: Some(course.status.clone()),
                extra: FieldMap::new(),
            })
            .collect())
    }

    async fn delete_course(&self, course_id: &str) -> StudioResult<()> {
        let mut backend = self.lock();
        backend.enter("delete_course")?;
        backend.courses.remove(course_id);
        backend.chapters.retain(|(owner, _)| owner != course_id);
        Ok(())
    }

    async fn publish_course(&self, course_id: &str) -> StudioResult<()> {
        self.pause().await;
        self.advance("publish_course", course_id, WorkflowStatus::Published)?;
        Ok(())
    }

    async fn list_chapters(&self, course_id: &str) -> StudioResult<Vec<Chapter>> {
        let mut backend = self.lock();
        backend.enter("list_chapters")?;
        let mut chapters: Vec<Chapter> = backend
            .chapters
            .iter()
            .filter(|(owner, _)| owner == course_id)
            .map(|(_, chapter)| chapter.clone())
            .collect();
        chapters.sort_by_key(|chapter| chapter.order);
        Ok(chapters)
    }

    async fn create_chapter(&self, chapter: &NewChapter) -> StudioResult<Option<ChapterId>> {
        let mut backend = self.lock();
        backend.enter("create_chapter")?;
        let id = backend.issue_id("ch-");
        backend.chapters.push((
            chapter.course_id.clone(),
            Chapter {
                id: id.clone(),
                name: chapter.name.clone(),
                description: chapter.description.clone(),
                order: chapter.order,
                lessons: Vec::new(),
            },
        ));
        Ok(Some(id))
    }

    async fn update_chapter(&self, update: &ChapterUpdate) -> StudioResult<()> {
        let mut backend = self.lock();
        backend.enter("update_chapter")?;
        let chapter = backend.chapter_mut(&update.id)?;
        chapter.name = update.name.clone();
        chapter.description = update.description.clone();
        chapter.order = update.order;
        Ok(())
    }

    async fn delete_chapter(&self, chapter_id: &str) -> StudioResult<()> {
        let mut backend = self.lock();
        backend.enter("delete_chapter")?;
        backend.chapters.retain(|(_, chapter)| chapter.id != chapter_id);
        Ok(())
    }

    async fn list_lessons(&self, chapter_id: &str) -> StudioResult<Vec<Lesson>> {
        let mut backend = self.lock();
        backend.enter("list_lessons")?;
        Ok(backend.chapter_mut(chapter_id)?.lessons.clone())
    }

    async fn get_lesson(&self, lesson_id: &str) -> StudioResult<Option<LessonDetail>> {
        let mut backend = self.lock();
        backend.enter("get_lesson")?;
        Ok(backend
            .chapters
            .iter()
            .flat_map(|(_, chapter)| chapter.lessons.iter())
            .find(|lesson| lesson.id == lesson_id)
            .map(|lesson| LessonDetail {
                id: Some(lesson.id.clone()),
                name: Some(lesson.name.clone()),
                duration: lesson.duration.clone(),
                lesson_type: lesson.lesson_type,
                ..Default::default()
            }))
    }

    async fn create_lesson(&self, lesson: &NewLesson) -> StudioResult<Option<LessonId>> {
        let mut backend = self.lock();
        backend.enter("create_lesson")?;
        let id = backend.issue_id("lesson-");
        backend.chapter_mut(&lesson.chapter_id)?.lessons.push(Lesson {
            id: id.clone(),
            name: lesson.name.clone(),
            lesson_type: lesson.lesson_type,
            duration: Some(lesson.duration.clone()),
        });
        Ok(Some(id))
    }

    async fn update_lesson(&self, update: &LessonUpdate) -> StudioResult<()> {
        let mut backend = self.lock();
        backend.enter("update_lesson")?;
        let lesson = backend
            .chapters
            .iter_mut()
            .flat_map(|(_, chapter)| chapter.lessons.iter_mut())
            .find(|lesson| lesson.id == update.id)
            .ok_or_else(|| StudioError::rejected("Lesson not found"))?;
        lesson.name = update.name.clone();
        lesson.lesson_type = update.lesson_type;
        lesson.duration = Some(update.duration.clone());
        Ok(())
    }

    async fn delete_lesson(&self, lesson_id: &str) -> StudioResult<()> {
        let mut backend = self.lock();
        backend.enter("delete_lesson")?;
        for (_, chapter) in backend.chapters.iter_mut() {
            chapter.lessons.retain(|lesson| lesson.id != lesson_id);
        }
        Ok(())
    }

    async fn save_lesson_content(&self, _content: &LessonContent) -> StudioResult<()> {
        self.lock().enter("save_lesson_content")
    }

    async fn lookup(&self, kind: LookupKind) -> StudioResult<Vec<LookupItem>> {
        self.lock().enter("lookup")?;
        Ok(vec![LookupItem {
            id: format!("{}-1", kind.list_key()),
            name: format!("First {}", kind.list_key()),
        }])
    }
}
