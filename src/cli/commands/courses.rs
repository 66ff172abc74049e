use anyhow::Result;
use std::sync::Arc;

use super::{confirmer, describe_status, with_course_service, Command};
use crate::api::{CourseService, StudioError};
use crate::catalog::CourseTable;
use crate::config::CourseStudioConfig;
use crate::curriculum::NeverConfirm;

pub struct CoursesCommand {
    pub search: Option<String>,
    pub page: usize,
}

impl Command for CoursesCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        with_course_service(config, |service| async move {
            let table = CourseTable::new(service, Arc::new(NeverConfirm), config.catalog.page_size);
            table.refresh().await?;

            let query = self.search.as_deref().unwrap_or_default();
            let page = table.page(query, self.page).await;
            println!();
            if page.total == 0 {
                println!("📋 No courses found");
                if !query.is_empty() {
                    println!("   💡 Try a shorter search than '{query}'");
                }
                return Ok(());
            }

            println!("📚 COURSES (page {}/{}, {} total)", page.page, page.total_pages.max(1), page.total);
            println!("────────────────────");
            for course in &page.items {
                let status = course
                    .status
                    .as_ref()
                    .map(describe_status)
                    .unwrap_or_else(|| "unknown".to_string());
                println!(
                    "  {} - {} [{}]",
                    course.id,
                    course.name.as_deref().unwrap_or("(untitled)"),
                    status
                );
            }
            if page.page < page.total_pages {
                println!();
                println!("💡 Next page: course-studio courses --page {}", page.page + 1);
            }
            Ok(())
        })
        .await
    }
}

pub struct ShowCommand {
    pub course_id: String,
}

impl Command for ShowCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        with_course_service(config, |service| async move {
            match service.get_course_basic_info(&self.course_id).await? {
                Some(course) => {
                    let status = course.status.clone().unwrap_or_default();
                    println!();
                    println!("📘 {}", course.name.as_deref().unwrap_or("(untitled)"));
                    println!("   🆔 Id: {}", course.id);
                    println!("   🏷️  Status: {}", describe_status(&status));
                    if let Some(cover) = &course.cover_image {
                        println!("   🖼️  Cover: {}{}", config.backend.files_url, cover.trim_start_matches('/'));
                    }
                    if let Some(outcome) = course.outcome.as_deref().filter(|o| !o.is_empty()) {
                        println!("   🎯 Outcome: {outcome}");
                    }
                }
                None => println!("📋 Course {} not found", self.course_id),
            }
            Ok(())
        })
        .await
    }
}

pub struct DeleteCourseCommand {
    pub course_id: String,
    pub yes: bool,
}

impl Command for DeleteCourseCommand {
    async fn execute(&self, config: &CourseStudioConfig) -> Result<()> {
        with_course_service(config, |service| async move {
            let table = CourseTable::new(service, confirmer(self.yes), config.catalog.page_size);
            table.refresh().await?;
            match table.delete(&self.course_id).await {
                Ok(()) => {
                    println!("✅ Course {} deleted", self.course_id);
                    Ok(())
                }
                Err(StudioError::DeleteCancelled) => {
                    println!("❌ Operation cancelled by user");
                    Ok(())
                }
                Err(e) => {
                    println!("❌ {}", e.user_message());
                    Err(e.into())
                }
            }
        })
        .await
    }
}
