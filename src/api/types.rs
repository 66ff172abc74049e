use std::fmt;
use std::path::PathBuf;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::api::errors::{StudioError, ValidationErrors};
use crate::workflow::WorkflowStatus;

pub type CourseId = String;
pub type ChapterId = String;
pub type LessonId = String;

/// `{ items: [...] }` wrapper the backend uses for every list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseResponse {
    pub id: CourseId,
    pub status: WorkflowStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: WorkflowStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBasicInfo {
    pub id: CourseId,
    #[serde(default)]
    pub status: Option<WorkflowStatus>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prerequisites: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseBasicInfoResponse {
    #[serde(default)]
    pub course: Option<CourseBasicInfo>,
}

/// Loosely typed course record (metadata or staff) as returned for previews
#[derive(Debug, Clone, Deserialize)]
pub struct CourseRecordResponse {
    #[serde(default)]
    pub course: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CourseSummary {
    pub id: CourseId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<WorkflowStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoursesResponse {
    #[serde(default)]
    pub courses: Page<CourseSummary>,
}

/// Accepts `"Video"`, `"attachment"`, `1`, ... and normalises to two kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LessonType {
    #[default]
    Video,
    Attachment,
}

impl LessonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonType::Video => "Video",
            LessonType::Attachment => "Attachment",
        }
    }
}

impl fmt::Display for LessonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LessonType {
    /// Lenient reading of a backend value; anything unknown is a video
    pub fn from_wire(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("attachment") {
            LessonType::Attachment
        } else {
            LessonType::Video
        }
    }
}

/// Strict parse for user input
impl std::str::FromStr for LessonType {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("video") => Ok(LessonType::Video),
            v if v.eq_ignore_ascii_case("attachment") => Ok(LessonType::Attachment),
            other => Err(StudioError::Validation(ValidationErrors::single(
                "lessonType",
                &format!("Unknown lesson type '{other}' (expected video or attachment)"),
            ))),
        }
    }
}

impl Serialize for LessonType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LessonType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LessonTypeVisitor;

        impl<'de> Visitor<'de> for LessonTypeVisitor {
            type Value = LessonType;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a lesson type name or numeric code")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<LessonType, E> {
                Ok(LessonType::from_wire(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<LessonType, E> {
                Ok(if v == 1 {
                    LessonType::Attachment
                } else {
                    LessonType::Video
                })
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<LessonType, E> {
                Ok(if v == 1 {
                    LessonType::Attachment
                } else {
                    LessonType::Video
                })
            }

            fn visit_unit<E: de::Error>(self) -> Result<LessonType, E> {
                Ok(LessonType::Video)
            }
        }

        deserializer.deserialize_any(LessonTypeVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "type")]
    pub lesson_type: LessonType,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChaptersResponse {
    #[serde(default)]
    pub chapters: Page<Chapter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonsResponse {
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResponse {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItemImageRecord {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDetail {
    #[serde(default)]
    pub id: Option<LessonId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, rename = "type")]
    pub lesson_type: LessonType,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub video_placeholder: Option<String>,
    #[serde(default)]
    pub item_images: Vec<ItemImageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonDetailResponse {
    #[serde(default)]
    pub lesson: Option<LessonDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LookupItem {
    pub id: String,
    #[serde(default, alias = "title")]
    pub name: String,
}

/// Reference lists offered by the metadata and staff forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Categories,
    Levels,
    Tags,
    Languages,
    Programs,
    Instructors,
    Assistants,
}

impl LookupKind {
    pub const ALL: [LookupKind; 7] = [
        LookupKind::Categories,
        LookupKind::Levels,
        LookupKind::Tags,
        LookupKind::Languages,
        LookupKind::Programs,
        LookupKind::Instructors,
        LookupKind::Assistants,
    ];

    pub fn endpoint(&self) -> &'static str {
        match self {
            LookupKind::Categories => "Categories/GetCategories",
            LookupKind::Levels => "Courses/GetCourseLevel",
            LookupKind::Tags => "Tags/GetTags",
            LookupKind::Languages => "Languages/GetLanguages",
            LookupKind::Programs => "Programs/GetPrograms",
            LookupKind::Instructors => "Instructors/GetInstructors",
            LookupKind::Assistants => "Assistants/GetAssistants",
        }
    }

    /// Key of the `{ items }` object in the response
    pub fn list_key(&self) -> &'static str {
        match self {
            LookupKind::Categories => "categories",
            LookupKind::Levels => "levels",
            LookupKind::Tags => "tags",
            LookupKind::Languages => "languages",
            LookupKind::Programs => "programs",
            LookupKind::Instructors => "instructors",
            LookupKind::Assistants => "assistants",
        }
    }

    pub fn request_body(&self) -> Value {
        match self {
            LookupKind::Tags | LookupKind::Languages | LookupKind::Programs => {
                serde_json::json!({ "query": "" })
            }
            _ => serde_json::json!({}),
        }
    }
}

impl std::str::FromStr for LookupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LookupKind::ALL
            .into_iter()
            .find(|kind| kind.list_key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown lookup '{s}'"))
    }
}

/// Multipart fields of the basic info step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicInfoPayload {
    pub name: String,
    pub description: String,
    pub outcome: String,
    pub prerequisites: String,
    pub cover_image: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffPayload {
    pub id: CourseId,
    pub instructor_ids: Vec<String>,
    pub assistant_ids: Vec<String>,
    pub allow_rating_on_instructor: bool,
    pub allow_rating_on_assistant: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewChapter {
    pub course_id: CourseId,
    pub name: String,
    pub description: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterUpdate {
    pub id: ChapterId,
    pub name: String,
    pub description: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLesson {
    #[serde(rename = "ChapterId")]
    pub chapter_id: ChapterId,
    #[serde(rename = "Name")]
    pub name: String,
    pub order: String,
    #[serde(rename = "Type")]
    pub lesson_type: LessonType,
    #[serde(rename = "Duration")]
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonUpdate {
    pub id: LessonId,
    pub name: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemImageUpload {
    pub image: Option<PathBuf>,
    pub alt_text: String,
    pub description: String,
}

/// Multipart body of `Lessons/CreateLessonItems`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonContent {
    pub lesson_id: LessonId,
    pub name: String,
    pub intro: String,
    pub order: i32,
    pub lesson_type: LessonType,
    pub description: String,
    pub duration: String,
    pub video: Option<PathBuf>,
    pub video_placeholder: Option<PathBuf>,
    pub item_images: Vec<ItemImageUpload>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lesson_type_normalisation() {
        let cases = [
            (json!("Attachment"), LessonType::Attachment),
            (json!("attachment"), LessonType::Attachment),
            (json!("ATTACHMENT"), LessonType::Attachment),
            (json!("Video"), LessonType::Video),
            (json!("pdf"), LessonType::Video),
            (json!(1), LessonType::Attachment),
            (json!(0), LessonType::Video),
            (json!(2), LessonType::Video),
        ];
        for (raw, expected) in cases {
            let parsed: LessonType = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(parsed, expected, "input {raw}");
        }
    }

    #[test]
    fn test_user_lesson_type_is_strict() {
        assert_eq!("video".parse::<LessonType>().unwrap(), LessonType::Video);
        assert_eq!(" Attachment ".parse::<LessonType>().unwrap(), LessonType::Attachment);

        let err = "quiz".parse::<LessonType>().unwrap_err();
        assert!(matches!(err, StudioError::Validation(_)));
        assert!(err.user_message().contains("quiz"));
    }

    #[test]
    fn test_chapter_accepts_type_alias_and_missing_fields() {
        let chapter: Chapter = serde_json::from_value(json!({
            "id": "ch1",
            "name": "Basics",
            "lessons": [
                { "id": "l1", "name": "Welcome", "lessonType": "Video", "duration": "00:05:00" },
                { "id": "l2", "name": "Slides", "type": 1 }
            ]
        }))
        .unwrap();

        assert_eq!(chapter.order, 0);
        assert_eq!(chapter.description, "");
        assert_eq!(chapter.lessons[1].lesson_type, LessonType::Attachment);
        assert_eq!(chapter.lessons[1].duration, None);
    }

    #[test]
    fn test_new_lesson_wire_names() {
        let body = serde_json::to_value(NewLesson {
            chapter_id: "ch1".into(),
            name: "Intro".into(),
            order: "1".into(),
            lesson_type: LessonType::Attachment,
            duration: "01:30:00".into(),
        })
        .unwrap();

        assert_eq!(
            body,
            json!({
                "ChapterId": "ch1",
                "Name": "Intro",
                "order": "1",
                "Type": "Attachment",
                "Duration": "01:30:00"
            })
        );
    }

    #[test]
    fn test_lookup_kind_from_list_key() {
        assert_eq!("tags".parse::<LookupKind>().unwrap(), LookupKind::Tags);
        assert_eq!("Levels".parse::<LookupKind>().unwrap(), LookupKind::Levels);
        assert!("colours".parse::<LookupKind>().is_err());
    }
}
