// Preview summary and the Draft -> Published transition

use std::sync::Arc;

use tracing::{info, warn, Instrument};

use crate::api::client::CourseService;
use crate::api::errors::{StudioError, StudioResult, ValidationErrors};
use crate::api::types::{Chapter, CourseBasicInfo, CourseId, LessonType};
use crate::config::PublishConfig;
use crate::curriculum::LessonDuration;
use crate::forms::FieldMap;
use crate::notify::{Notice, Notifier};
use crate::telemetry::{create_workflow_span, generate_correlation_id};

/// Where the user is sent after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    CourseList,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::CourseList => "/courses",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub course_id: CourseId,
    pub redirect: Route,
}

/// Everything the preview page shows before publishing
#[derive(Debug, Clone, Default)]
pub struct CoursePreview {
    pub course: Option<CourseBasicInfo>,
    pub metadata: Option<FieldMap>,
    pub staff: Option<FieldMap>,
    pub chapters: Vec<Chapter>,
}

impl CoursePreview {
    pub fn lesson_count(&self) -> usize {
        self.chapters.iter().map(|chapter| chapter.lessons.len()).sum()
    }

    pub fn attachment_count(&self) -> usize {
        self.chapters
            .iter()
            .flat_map(|chapter| chapter.lessons.iter())
            .filter(|lesson| lesson.lesson_type == LessonType::Attachment)
            .count()
    }

    /// Sum of every lesson duration, whatever its type
    pub fn total_duration(&self) -> LessonDuration {
        self.summed_duration(|_| true)
    }

    /// Sum of video lesson durations
    pub fn video_duration(&self) -> LessonDuration {
        self.summed_duration(|lesson_type| lesson_type == LessonType::Video)
    }

    fn summed_duration(&self, include: impl Fn(LessonType) -> bool) -> LessonDuration {
        LessonDuration::sum_wire(
            self.chapters
                .iter()
                .flat_map(|chapter| chapter.lessons.iter())
                .filter(|lesson| include(lesson.lesson_type))
                .filter_map(|lesson| lesson.duration.as_deref()),
        )
    }

    pub fn has_curriculum(&self) -> bool {
        !self.chapters.is_empty()
    }
}

pub struct PublishGate {
    service: Arc<dyn CourseService>,
    notifier: Arc<dyn Notifier>,
    policy: PublishConfig,
}

impl PublishGate {
    pub fn new(service: Arc<dyn CourseService>, notifier: Arc<dyn Notifier>, policy: PublishConfig) -> Self {
        Self {
            service,
            notifier,
            policy,
        }
    }

    /// Fetch basic info, metadata, staff and chapters concurrently
    pub async fn preview(&self, course_id: &str) -> StudioResult<CoursePreview> {
        let (course, metadata, staff, chapters) = tokio::try_join!(
            self.service.get_course_basic_info(course_id),
            self.service.get_course_data(course_id),
            self.service.get_course_staff(course_id),
            self.service.list_chapters(course_id),
        )?;

        Ok(CoursePreview {
            course,
            metadata,
            staff,
            chapters,
        })
    }

    /// Publish the course. There is no way back to Draft from here.
    pub async fn publish(&self, course_id: &str) -> StudioResult<PublishOutcome> {
        let correlation_id = generate_correlation_id();
        let span = create_workflow_span("publish", Some(course_id), None, Some(&correlation_id));

        async {
            if self.policy.require_curriculum {
                let chapters = self.service.list_chapters(course_id).await?;
                if chapters.is_empty() {
                    let err = StudioError::Validation(ValidationErrors::single(
                        "curriculum",
                        "Add at least one chapter before publishing",
                    ));
                    self.notifier.notify(Notice::error(err.user_message()));
                    return Err(err);
                }
            }

            self.notifier.notify(Notice::loading("Publishing course..."));
            match self.service.publish_course(course_id).await {
                Ok(()) => {
                    info!(course.id = %course_id, "Course published");
                    self.notifier.notify(Notice::success("Course published successfully!"));
                    Ok(PublishOutcome {
                        course_id: course_id.to_string(),
                        redirect: Route::CourseList,
                    })
                }
                Err(e) => {
                    warn!(course.id = %course_id, error = %e, "Publish failed, course stays in draft");
                    self.notifier.notify(Notice::error(e.user_message()));
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}
