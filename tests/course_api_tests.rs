//! REST boundary tests against a mocked course service

mod support;

use course_studio::api::types::{
    BasicInfoPayload, ItemImageUpload, LessonContent, LessonType, LookupKind, NewLesson,
};
use course_studio::forms::FieldMap;
use course_studio::{CourseService, ErrorKind, StudioError, WorkflowStatus};
use serde_json::json;
use support::{chapter, CourseApiMock};
use wiremock::matchers::{body_json, body_partial_json, body_string_contains, query_param};

#[tokio::test]
async fn test_create_course_sends_multipart_with_bearer_token() {
    let api = CourseApiMock::new().await;
    api.mock_create_course("abc123", "Draft-BasicInfo").await;

    let created = api
        .service()
        .create_course(&BasicInfoPayload {
            name: "Intro to Design".to_string(),
            description: "<p>Shapes</p>".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created.id, "abc123");
    assert_eq!(created.status, WorkflowStatus::DraftBasicInfo);
}

#[tokio::test]
async fn test_save_course_data_sends_numeric_duration_and_enrollment_floor() {
    let api = CourseApiMock::new().await;
    CourseApiMock::request("POST", "Courses/AddCourseData")
        .and(body_partial_json(json!({
            "id": "abc123",
            "duration": 12,
            "minEnrollment": 0,
            "code": "DES101"
        })))
        .respond_with(CourseApiMock::success(json!({ "status": "Draft-MetaData" })))
        .expect(1)
        .mount(&api.server)
        .await;

    let mut fields = FieldMap::new();
    fields.insert("code".to_string(), json!("DES101"));
    fields.insert("duration".to_string(), json!("12"));

    let status = api.service().save_course_data("abc123", &fields).await.unwrap();
    assert_eq!(status, WorkflowStatus::DraftMetaData);
}

#[tokio::test]
async fn test_rejection_carries_server_message() {
    let api = CourseApiMock::new().await;
    CourseApiMock::request("POST", "Courses/AddCourseData")
        .respond_with(CourseApiMock::rejection("duration required"))
        .mount(&api.server)
        .await;

    let err = api
        .service()
        .save_course_data("abc123", &FieldMap::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerRejection);
    assert_eq!(err.user_message(), "duration required");
}

#[tokio::test]
async fn test_missing_success_flag_is_a_rejection() {
    let api = CourseApiMock::new().await;
    CourseApiMock::request("POST", "Courses/PublishCourse")
        .and(body_json(json!({ "courseId": "abc123" })))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({ "status": "Published" })))
        .mount(&api.server)
        .await;

    let err = api.service().publish_course("abc123").await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to publish course");
}

#[tokio::test]
async fn test_server_error_is_network_kind_even_with_success_flag() {
    let api = CourseApiMock::new().await;
    CourseApiMock::request("POST", "Courses/GetCourses")
        .respond_with(wiremock::ResponseTemplate::new(500).set_body_json(json!({ "isSuccess": true })))
        .mount(&api.server)
        .await;

    let err = api.service().list_courses().await.unwrap_err();
    assert!(matches!(err, StudioError::Http { status: 500, .. }));
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_lesson_types_are_normalised() {
    let api = CourseApiMock::new().await;
    CourseApiMock::request("POST", "Lessons/GetLessons")
        .and(body_json(json!({ "chapterId": "ch1" })))
        .respond_with(CourseApiMock::success(json!({
            "lessons": [
                { "id": "l1", "name": "Slides", "type": "ATTACHMENT", "duration": "00:10:00" },
                { "id": "l2", "name": "Notes", "type": 1 },
                { "id": "l3", "name": "Talk", "type": "Video" },
                { "id": "l4", "name": "Unknown", "type": "quiz" }
            ]
        })))
        .mount(&api.server)
        .await;

    let lessons = api.service().list_lessons("ch1").await.unwrap();
    let types: Vec<LessonType> = lessons.iter().map(|lesson| lesson.lesson_type).collect();
    assert_eq!(
        types,
        vec![
            LessonType::Attachment,
            LessonType::Attachment,
            LessonType::Video,
            LessonType::Video
        ]
    );
}

#[tokio::test]
async fn test_create_lesson_body_uses_backend_field_names() {
    let api = CourseApiMock::new().await;
    CourseApiMock::request("POST", "Lessons/CreateLesson")
        .and(body_json(json!({
            "ChapterId": "ch1",
            "Name": "Lines",
            "order": "1",
            "Type": "Video",
            "Duration": "00:05:00"
        })))
        .respond_with(CourseApiMock::success(json!({ "id": "lesson-7" })))
        .expect(1)
        .mount(&api.server)
        .await;

    let id = api
        .service()
        .create_lesson(&NewLesson {
            chapter_id: "ch1".to_string(),
            name: "Lines".to_string(),
            order: "1".to_string(),
            lesson_type: LessonType::Video,
            duration: "00:05:00".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(id.as_deref(), Some("lesson-7"));
}

#[tokio::test]
async fn test_deletes_use_query_id() {
    let api = CourseApiMock::new().await;
    CourseApiMock::request("DELETE", "Chapters/DeleteChapter")
        .and(query_param("Id", "ch1"))
        .respond_with(CourseApiMock::success(json!({})))
        .expect(1)
        .mount(&api.server)
        .await;

    api.service().delete_chapter("ch1").await.unwrap();
}

#[tokio::test]
async fn test_chapters_are_read_from_paged_items() {
    let api = CourseApiMock::new().await;
    api.mock_chapters(json!([
        chapter("ch1", "Basics", 1, json!([{ "id": "l1", "name": "Lines", "type": "Video", "duration": "00:05:00" }])),
        chapter("ch2", "Advanced", 2, json!([])),
    ]))
    .await;

    let chapters = api.service().list_chapters("abc123").await.unwrap();
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].lessons[0].duration.as_deref(), Some("00:05:00"));
}

#[tokio::test]
async fn test_lookups_are_cached_until_cleared() {
    let api = CourseApiMock::new().await;
    CourseApiMock::request("POST", "Tags/GetTags")
        .and(body_json(json!({ "query": "" })))
        .respond_with(CourseApiMock::success(json!({
            "tags": { "items": [{ "id": "t1", "name": "ux" }, { "id": "t2", "title": "design" }] }
        })))
        .expect(3)
        .mount(&api.server)
        .await;

    let service = api.service();
    let first = service.lookup(LookupKind::Tags).await.unwrap();
    let second = service.lookup(LookupKind::Tags).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first[1].name, "design");

    service.http().invalidate_cache_pattern("Tags/").await;
    service.lookup(LookupKind::Tags).await.unwrap();
    service.lookup(LookupKind::Tags).await.unwrap();

    service.http().clear_cache();
    service.lookup(LookupKind::Tags).await.unwrap();
}

#[tokio::test]
async fn test_lesson_content_uploads_item_images_as_indexed_parts() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("diagram.png");
    std::fs::write(&image, "diagram-bytes").unwrap();

    let api = CourseApiMock::new().await;
    CourseApiMock::request("POST", "Lessons/CreateLessonItems")
        .and(body_string_contains("name=\"LessonId\"\r\n\r\nlesson-7"))
        .and(body_string_contains("name=\"Name\"\r\n\r\nUntitled Lesson"))
        .and(body_string_contains("name=\"Type\"\r\n\r\nAttachment"))
        .and(body_string_contains(
            "name=\"ItemImages[0].Image\"; filename=\"diagram.png\"",
        ))
        .and(body_string_contains("diagram-bytes"))
        .and(body_string_contains("name=\"ItemImages[0].AltText\"\r\n\r\nFlow chart"))
        .and(body_string_contains("name=\"ItemImages[1].Description\"\r\n\r\nNo picture yet"))
        .respond_with(CourseApiMock::success(json!({})))
        .expect(1)
        .mount(&api.server)
        .await;

    api.service()
        .save_lesson_content(&LessonContent {
            lesson_id: "lesson-7".to_string(),
            name: "  ".to_string(),
            lesson_type: LessonType::Attachment,
            duration: "00:05:00".to_string(),
            item_images: vec![
                ItemImageUpload {
                    image: Some(image),
                    alt_text: "Flow chart".to_string(),
                    description: "Steps".to_string(),
                },
                ItemImageUpload {
                    image: None,
                    alt_text: String::new(),
                    description: "No picture yet".to_string(),
                },
            ],
            ..Default::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_missing_upload_file_fails_before_any_request() {
    let api = CourseApiMock::new().await;
    CourseApiMock::request("POST", "Lessons/CreateLessonItems")
        .respond_with(CourseApiMock::success(json!({})))
        .expect(0)
        .mount(&api.server)
        .await;

    let err = api
        .service()
        .save_lesson_content(&LessonContent {
            lesson_id: "lesson-7".to_string(),
            name: "Lines".to_string(),
            video: Some(std::path::PathBuf::from("/nonexistent/intro.mp4")),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StudioError::Io(_)));
}
