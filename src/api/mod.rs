pub mod client;
pub mod errors;
#[cfg(any(test, feature = "testing"))]
pub mod fake;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub use client::MockCourseService;
pub use client::{CourseService, RestCourseService};
pub use errors::{ErrorKind, StudioError, StudioResult, ValidationErrors};
