// Chapters and lessons, edited independently of the workflow status

pub mod confirm;
pub mod duration;
pub mod editor;

pub use confirm::{AlwaysConfirm, Confirm, NeverConfirm, PromptConfirm};
pub use duration::LessonDuration;
pub use editor::{ChapterFields, CurriculumEditor, LessonFields};
