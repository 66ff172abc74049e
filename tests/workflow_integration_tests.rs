//! End-to-end course authoring scenarios against a mocked course service

mod support;

use std::sync::Arc;

use course_studio::curriculum::{AlwaysConfirm, CurriculumEditor};
use course_studio::notify::RecordingNotifier;
use course_studio::publish::{PublishGate, Route};
use course_studio::workflow::{SaveOutcome, WorkflowController};
use course_studio::{NoticeLevel, SectionKind, StudioError, WorkflowStatus};
use serde_json::json;
use support::{chapter, CourseApiMock};
use wiremock::matchers::body_partial_json;

fn controller(api: &CourseApiMock) -> (WorkflowController, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let controller = WorkflowController::new(Arc::new(api.service()), notifier.clone());
    (controller, notifier)
}

#[tokio::test]
async fn test_new_course_basic_info_unlocks_metadata() {
    let api = CourseApiMock::new().await;
    api.mock_create_course("abc123", "Draft-BasicInfo").await;
    let (controller, notifier) = controller(&api);

    {
        let mut forms = controller.forms().await;
        forms.basic_info.name = "Intro to Design".to_string();
        forms.basic_info.description = "<p>Shapes and colour</p>".to_string();
    }
    let outcome = controller.save().await.unwrap();

    assert_eq!(
        outcome,
        SaveOutcome::Advanced {
            from: WorkflowStatus::New,
            to: WorkflowStatus::DraftBasicInfo,
            entity_id: Some("abc123".to_string()),
        }
    );
    assert_eq!(controller.entity_id().await.as_deref(), Some("abc123"));
    assert!(controller.is_editable(SectionKind::Metadata).await);
    assert_eq!(notifier.messages(NoticeLevel::Success), vec!["Saved successfully!"]);
}

#[tokio::test]
async fn test_rejected_metadata_keeps_status_and_shows_message() {
    let api = CourseApiMock::new().await;
    api.mock_basic_info("abc123", "Intro to Design", "Draft-BasicInfo").await;
    CourseApiMock::request("POST", "Courses/AddCourseData")
        .respond_with(CourseApiMock::rejection("duration required"))
        .expect(1)
        .mount(&api.server)
        .await;
    let (controller, notifier) = controller(&api);

    assert_eq!(controller.resume("abc123").await, WorkflowStatus::DraftBasicInfo);
    {
        let mut forms = controller.forms().await;
        let metadata = &mut forms.metadata;
        metadata.category_ids = vec!["cat-1".to_string()];
        metadata.level_id = Some("lvl-1".to_string());
        metadata.courses_tags = vec!["ux".to_string()];
        metadata.code = "DES101".to_string();
        metadata.allow_dynamic_duration = true;
        metadata.courses_languages = vec!["en".to_string()];
        metadata.program_id = Some("prog-1".to_string());
    }

    let err = controller.save().await.unwrap_err();
    assert!(matches!(err, StudioError::ServerRejection { .. }));
    assert_eq!(controller.status().await, WorkflowStatus::DraftBasicInfo);
    assert_eq!(notifier.messages(NoticeLevel::Error), vec!["duration required"]);
}

#[tokio::test]
async fn test_staff_step_sends_assistant_rating_flag() {
    let api = CourseApiMock::new().await;
    api.mock_basic_info("abc123", "Intro to Design", "Draft-MetaData").await;
    CourseApiMock::request("POST", "Courses/AddCourseStaff")
        .and(body_partial_json(json!({
            "id": "abc123",
            "instructorIds": ["inst-1"],
            "allowRatingOnAssistant": true
        })))
        .respond_with(CourseApiMock::success(json!({ "status": "Draft-StaffInfo" })))
        .expect(1)
        .mount(&api.server)
        .await;
    let (controller, _) = controller(&api);

    controller.resume("abc123").await;
    controller.forms().await.staff.instructor_ids = vec!["inst-1".to_string()];
    controller.save().await.unwrap();
    assert_eq!(controller.status().await, WorkflowStatus::DraftStaffInfo);
    assert!(controller.is_editable(SectionKind::Content).await);
}

#[tokio::test]
async fn test_created_chapter_appears_once_in_listing() {
    let api = CourseApiMock::new().await;
    api.mock_chapters_once(json!([])).await;
    CourseApiMock::request("POST", "Chapters/CreateChapter")
        .respond_with(CourseApiMock::success(json!({ "id": "ch1" })))
        .expect(1)
        .mount(&api.server)
        .await;
    api.mock_chapters(json!([chapter("ch1", "Basics", 1, json!([]))])).await;

    let editor = CurriculumEditor::new(Arc::new(api.service()), Arc::new(AlwaysConfirm), "abc123");
    editor.refresh().await.unwrap();
    let id = editor.create_chapter("Basics", "Basics description").await.unwrap();

    let chapters = editor.chapters().await;
    assert_eq!(id, "ch1");
    assert_eq!(chapters.iter().filter(|c| c.id == "ch1").count(), 1);
}

#[tokio::test]
async fn test_deleted_chapter_with_lessons_is_gone_after_refetch() {
    let api = CourseApiMock::new().await;
    let lessons = json!([
        { "id": "l1", "name": "Lines", "type": "Video", "duration": "00:05:00" },
        { "id": "l2", "name": "Slides", "type": "Attachment", "duration": "00:01:00" }
    ]);
    api.mock_chapters_once(json!([
        chapter("ch1", "Basics", 1, lessons),
        chapter("ch2", "Advanced", 2, json!([]))
    ]))
    .await;
    CourseApiMock::request("DELETE", "Chapters/DeleteChapter")
        .respond_with(CourseApiMock::success(json!({})))
        .expect(1)
        .mount(&api.server)
        .await;
    api.mock_chapters(json!([chapter("ch2", "Advanced", 2, json!([]))])).await;

    let editor = CurriculumEditor::new(Arc::new(api.service()), Arc::new(AlwaysConfirm), "abc123");
    assert_eq!(editor.refresh().await.unwrap().len(), 2);

    editor.delete_chapter("ch1").await.unwrap();
    let chapters = editor.chapters().await;
    assert!(chapters.iter().all(|c| c.id != "ch1"));
    assert_eq!(chapters.len(), 1);
}

#[tokio::test]
async fn test_publish_with_empty_curriculum_reaches_endpoint() {
    let api = CourseApiMock::new().await;
    CourseApiMock::request("POST", "Courses/PublishCourse")
        .respond_with(CourseApiMock::success(json!({})))
        .expect(1)
        .mount(&api.server)
        .await;

    let config = api.config();
    let gate = PublishGate::new(
        Arc::new(api.service()),
        Arc::new(RecordingNotifier::new()),
        config.publish.clone(),
    );
    let outcome = gate.publish("abc123").await.unwrap();
    assert_eq!(outcome.redirect, Route::CourseList);
}
