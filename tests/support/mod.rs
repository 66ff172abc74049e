//! Shared course service mock for integration tests
//!
//! Wraps a wiremock server that speaks the `{ isSuccess, ... }` envelope of
//! the course service, so tests run without network access.

#![allow(dead_code)]

use course_studio::config::CourseStudioConfig;
use course_studio::RestCourseService;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "mock-token";

pub struct CourseApiMock {
    pub server: MockServer,
    pub base_url: String,
}

impl CourseApiMock {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let base_url = format!("{}/api", server.uri());
        Self { server, base_url }
    }

    pub fn config(&self) -> CourseStudioConfig {
        let mut config = CourseStudioConfig::default();
        config.backend.base_url = self.base_url.clone();
        config.backend.token = Some(TOKEN.to_string());
        config.backend.request_timeout_seconds = 5;
        config
    }

    pub fn service(&self) -> RestCourseService {
        RestCourseService::from_config(&self.config()).expect("mock service config is valid")
    }

    /// `{ isSuccess: true, ...payload }`
    pub fn success(payload: Value) -> ResponseTemplate {
        let mut body = json!({ "isSuccess": true });
        if let (Some(body), Value::Object(payload)) = (body.as_object_mut(), payload) {
            body.extend(payload);
        }
        ResponseTemplate::new(200).set_body_json(body)
    }

    pub fn rejection(message: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({ "isSuccess": false, "message": message }))
    }

    /// Authorized request to `/api/{endpoint}`
    pub fn request(verb: &str, endpoint: &str) -> wiremock::MockBuilder {
        Mock::given(method(verb))
            .and(path(format!("/api/{endpoint}")))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
    }

    pub async fn mock_create_course(&self, id: &str, status: &str) {
        Self::request("POST", "Courses/CreateCourse")
            .respond_with(Self::success(json!({ "id": id, "status": status })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_basic_info(&self, id: &str, name: &str, status: &str) {
        Self::request("GET", "Courses/GetCourseBasicInfo")
            .respond_with(Self::success(json!({
                "course": { "id": id, "name": name, "status": status, "description": "<p>About</p>" }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_chapters(&self, chapters: Value) {
        Self::request("POST", "Chapters/GetChapters")
            .respond_with(Self::success(json!({ "chapters": { "items": chapters } })))
            .mount(&self.server)
            .await;
    }

    /// Chapter list served once, after which later mocks take over
    pub async fn mock_chapters_once(&self, chapters: Value) {
        Self::request("POST", "Chapters/GetChapters")
            .respond_with(Self::success(json!({ "chapters": { "items": chapters } })))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }
}

pub fn chapter(id: &str, name: &str, order: i32, lessons: Value) -> Value {
    json!({ "id": id, "name": name, "description": format!("{name} description"), "order": order, "lessons": lessons })
}
