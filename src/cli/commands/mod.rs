use anyhow::Result;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use crate::api::{CourseService, RestCourseService};
use crate::config::CourseStudioConfig;
use crate::curriculum::{AlwaysConfirm, Confirm, PromptConfirm};
use crate::workflow::{descriptor_for, WorkflowStatus};

pub mod courses;
pub mod curriculum;
pub mod lookups;
pub mod publish;
pub mod save;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()>;
}

pub async fn with_course_service<F, Fut, R>(config: &CourseStudioConfig, f: F) -> Result<R>
where
    F: FnOnce(Arc<dyn CourseService>) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    print!("🔄 Connecting to course service... ");
    std::io::stdout().flush()?;

    match RestCourseService::from_config(config) {
        Ok(service) => {
            println!("✅");
            f(Arc::new(service)).await
        }
        Err(e) => {
            println!("❌ {}", e.user_message());
            println!("   💡 Set COURSE_STUDIO_TOKEN or backend.token in course-studio.toml");
            Err(e.into())
        }
    }
}

/// `-y` skips the prompt
pub fn confirmer(yes: bool) -> Arc<dyn Confirm> {
    if yes {
        Arc::new(AlwaysConfirm)
    } else {
        Arc::new(PromptConfirm)
    }
}

pub fn describe_status(status: &WorkflowStatus) -> String {
    match descriptor_for(status) {
        Some(step) => format!("{status} (next: {})", step.section),
        None if status.is_published() => format!("{status} (live)"),
        None => format!("{status} (ready to publish)"),
    }
}

pub async fn show_getting_started() -> Result<()> {
    println!("🎓 Course Studio - Course authoring for the course service");
    println!();
    println!("To get started:");
    println!("  📚 course-studio courses              # List your courses");
    println!("  📝 course-studio save --fields f.json # Start a new course draft");
    println!("  🔎 course-studio show <course>        # See which step is next");
    println!();
    println!("Curriculum:");
    println!("  📂 course-studio chapters <course>    # List chapters");
    println!("  ➕ course-studio add-chapter ...      # Add a chapter");
    println!("  🎬 course-studio add-lesson ...       # Add a lesson");
    println!();
    println!("  👀 course-studio preview <course>     # Review before publishing");
    println!("  🚀 course-studio publish <course>     # Go live");
    println!();
    println!("💡 Run 'course-studio --help' for every command");
    Ok(())
}
