// Course Studio Library - course authoring workflow against the course service
// This exposes the core components for testing and integration

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod curriculum;
pub mod forms;
pub mod http;
pub mod notify;
pub mod publish;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use api::{CourseService, ErrorKind, RestCourseService, StudioError, StudioResult, ValidationErrors};
pub use catalog::{CourseTable, LookupCatalog, TablePage};
pub use config::{config, init_config, CourseStudioConfig};
pub use curriculum::{ChapterFields, Confirm, CurriculumEditor, LessonDuration, LessonFields};
pub use forms::{CourseForms, FieldMap, FormSection, SectionKind};
pub use http::BackendHttpClient;
pub use notify::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use publish::{CoursePreview, PublishGate, PublishOutcome, Route};
pub use telemetry::{create_workflow_span, generate_correlation_id, init_telemetry};
pub use workflow::{SaveOutcome, WorkflowController, WorkflowState, WorkflowStatus};
