use anyhow::Result;
use clap::Parser;

use course_studio::cli::commands::courses::{CoursesCommand, DeleteCourseCommand, ShowCommand};
use course_studio::cli::commands::curriculum::{
    AddChapterCommand, AddLessonCommand, ChaptersCommand, DeleteChapterCommand, DeleteLessonCommand,
    LessonsCommand,
};
use course_studio::cli::commands::lookups::LookupsCommand;
use course_studio::cli::commands::publish::{PreviewCommand, PublishCommand};
use course_studio::cli::commands::save::SaveCommand;
use course_studio::cli::commands::{show_getting_started, Command};
use course_studio::cli::{Cli, Commands};
use course_studio::config::{config, init_config, CourseStudioConfig};
use course_studio::telemetry::init_telemetry;

fn load_config(cli: &Cli) -> Result<CourseStudioConfig> {
    match &cli.config {
        Some(path) => {
            CourseStudioConfig::load_env_file()?;
            CourseStudioConfig::load_from(path)
        }
        None => {
            init_config()?;
            Ok(config()?.clone())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command.as_ref() else {
        // No subcommand: explain how to get started, no config needed
        return tokio::runtime::Runtime::new()?.block_on(show_getting_started());
    };

    let config = load_config(&cli)?;
    init_telemetry(&config.observability)?;
    let runtime = tokio::runtime::Runtime::new()?;

    match command {
        Commands::Courses { search, page } => runtime.block_on(
            CoursesCommand {
                search: search.clone(),
                page: *page,
            }
            .execute(&config),
        ),
        Commands::Show { course_id } => runtime.block_on(
            ShowCommand {
                course_id: course_id.clone(),
            }
            .execute(&config),
        ),
        Commands::Save { course, fields, edit } => runtime.block_on(
            SaveCommand {
                course_id: course.clone(),
                fields: fields.clone(),
                edit: *edit,
            }
            .execute(&config),
        ),
        Commands::Chapters { course_id } => runtime.block_on(
            ChaptersCommand {
                course_id: course_id.clone(),
            }
            .execute(&config),
        ),
        Commands::AddChapter {
            course,
            name,
            description,
        } => runtime.block_on(
            AddChapterCommand {
                course_id: course.clone(),
                name: name.clone(),
                description: description.clone(),
            }
            .execute(&config),
        ),
        Commands::DeleteChapter { course, chapter, yes } => runtime.block_on(
            DeleteChapterCommand {
                course_id: course.clone(),
                chapter_id: chapter.clone(),
                yes: *yes,
            }
            .execute(&config),
        ),
        Commands::Lessons { chapter_id } => runtime.block_on(
            LessonsCommand {
                chapter_id: chapter_id.clone(),
            }
            .execute(&config),
        ),
        Commands::AddLesson {
            course,
            chapter,
            name,
            lesson_type,
            minutes,
        } => runtime.block_on(
            AddLessonCommand {
                course_id: course.clone(),
                chapter_id: chapter.clone(),
                name: name.clone(),
                lesson_type: lesson_type.clone(),
                minutes: *minutes,
            }
            .execute(&config),
        ),
        Commands::DeleteLesson { course, lesson, yes } => runtime.block_on(
            DeleteLessonCommand {
                course_id: course.clone(),
                lesson_id: lesson.clone(),
                yes: *yes,
            }
            .execute(&config),
        ),
        Commands::Preview { course_id } => runtime.block_on(
            PreviewCommand {
                course_id: course_id.clone(),
            }
            .execute(&config),
        ),
        Commands::Publish { course_id } => runtime.block_on(
            PublishCommand {
                course_id: course_id.clone(),
            }
            .execute(&config),
        ),
        Commands::DeleteCourse { course_id, yes } => runtime.block_on(
            DeleteCourseCommand {
                course_id: course_id.clone(),
                yes: *yes,
            }
            .execute(&config),
        ),
        Commands::Lookups { kind, query } => runtime.block_on(
            LookupsCommand {
                kind: kind.clone(),
                query: query.clone(),
            }
            .execute(&config),
        ),
    }
}
