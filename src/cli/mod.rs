use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "course-studio")]
#[command(about = "Author, review and publish courses on the course service")]
#[command(long_about = "Course Studio walks a course draft through its steps (basic info, metadata, \
                       instructors, curriculum) against the remote course service, manages chapters \
                       and lessons, and publishes finished courses. Start with 'course-studio courses'.")]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./course-studio.toml)
    #[arg(long, global = true, help = "Load configuration from this file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List courses with optional name search
    Courses {
        #[arg(long, help = "Case-insensitive course name filter")]
        search: Option<String>,
        #[arg(long, default_value = "1", help = "Page number, starting at 1")]
        page: usize,
    },
    /// Show a course and the step it is waiting on
    Show {
        course_id: String,
    },
    /// Save the active step of a course draft from a JSON file of field values
    Save {
        /// Existing course to continue; omit to start a new course
        #[arg(long, help = "Course id to resume (new course when omitted)")]
        course: Option<String>,
        /// JSON object of field values for the active step
        #[arg(long, help = "JSON file with the fields of the active step")]
        fields: PathBuf,
        /// Edit mode: the file holds "basicInfo", "metadata" and "staff" objects
        #[arg(long, requires = "course", help = "Re-save basic info, metadata and staff of an existing course")]
        edit: bool,
    },
    /// List the chapters of a course
    Chapters {
        course_id: String,
    },
    /// Add a chapter to a course
    AddChapter {
        #[arg(long)]
        course: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
    },
    /// Delete a chapter and its lessons
    DeleteChapter {
        #[arg(long)]
        course: String,
        #[arg(long)]
        chapter: String,
        #[arg(short = 'y', long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// List the lessons of a chapter
    Lessons {
        chapter_id: String,
    },
    /// Add a lesson to a chapter
    AddLesson {
        #[arg(long)]
        course: String,
        #[arg(long)]
        chapter: String,
        #[arg(long)]
        name: String,
        #[arg(long = "type", default_value = "video", help = "Lesson type: video or attachment")]
        lesson_type: String,
        #[arg(long, help = "Lesson length in minutes (at least 1)")]
        minutes: u32,
    },
    /// Delete a lesson
    DeleteLesson {
        #[arg(long)]
        course: String,
        #[arg(long)]
        lesson: String,
        #[arg(short = 'y', long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// Summarise a course before publishing
    Preview {
        course_id: String,
    },
    /// Publish a draft course
    Publish {
        course_id: String,
    },
    /// Delete a course
    DeleteCourse {
        course_id: String,
        #[arg(short = 'y', long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// Print a lookup list (categories, levels, tags, languages, programs, instructors, assistants)
    Lookups {
        kind: String,
        #[arg(long, help = "Case-insensitive name filter")]
        query: Option<String>,
    },
}
