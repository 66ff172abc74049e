use anyhow::Result;
use std::sync::Arc;

use super::{describe_status, with_course_service, Command};
use crate::config::CourseStudioConfig;
use crate::notify::ConsoleNotifier;
use crate::publish::PublishGate;

pub struct PreviewCommand {
    pub course_id: String,
}

impl Command for PreviewCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        with_course_service(config, |service| async move {
            let gate = PublishGate::new(service, Arc::new(ConsoleNotifier), config.publish.clone());
            let preview = gate.preview(&self.course_id).await?;

            println!();
            match &preview.course {
                Some(course) => {
                    println!("👀 PREVIEW: {}", course.name.as_deref().unwrap_or("(untitled)"));
                    let status = course.status.clone().unwrap_or_default();
                    println!("   🏷️  Status: {}", describe_status(&status));
                }
                None => println!("👀 PREVIEW: course {} (basic info missing)", self.course_id),
            }
            println!("   📂 Chapters: {}", preview.chapters.len());
            println!("   🎬 Lessons: {}", preview.lesson_count());
            println!("   📎 Attachments: {}", preview.attachment_count());
            println!("   ⏱️  Total: {}", preview.total_duration().to_summary());
            println!("   🎬 Video: {}", preview.video_duration().to_summary());
            if let Some(code) = preview
                .metadata
                .as_ref()
                .and_then(|metadata| metadata.get("code"))
                .and_then(|code| code.as_str())
            {
                println!("   🔖 Code: {code}");
            }
            if let Some(staff) = &preview.staff {
                let instructors = staff
                    .get("instructorIds")
                    .and_then(|ids| ids.as_array())
                    .map(Vec::len)
                    .unwrap_or_default();
                println!("   👩‍🏫 Instructors: {instructors}");
            }
            if !preview.has_curriculum() {
                println!();
                println!("⚠️  This course has no chapters yet");
            }
            println!();
            println!("💡 Publish with: course-studio publish {}", self.course_id);
            Ok(())
        })
        .await
    }
}

pub struct PublishCommand {
    pub course_id: String,
}

impl Command for PublishCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        with_course_service(config, |service| async move {
            let gate = PublishGate::new(service, Arc::new(ConsoleNotifier), config.publish.clone());
            let outcome = gate.publish(&self.course_id).await?;
            println!("   ➡️  Back to {}", outcome.redirect.path());
            Ok(())
        })
        .await
    }
}
