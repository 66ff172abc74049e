// Step registry - which form is writable at which status, and how it is saved

use serde_json::Value;

use crate::api::client::CourseService;
use crate::api::errors::{StudioError, StudioResult};
use crate::api::types::CourseId;
use crate::forms::{BasicInfoForm, FieldMap, SectionKind, StaffForm};
use crate::workflow::WorkflowStatus;

/// Statuses that have an editable step, in wizard order
pub const STEP_ORDER: [WorkflowStatus; 4] = [
    WorkflowStatus::New,
    WorkflowStatus::DraftBasicInfo,
    WorkflowStatus::DraftMetaData,
    WorkflowStatus::DraftStaffInfo,
];

/// Sections re-posted by edit mode, in order. Curriculum is edited on its own.
pub const EDIT_ORDER: [SectionKind; 3] = [SectionKind::BasicInfo, SectionKind::Metadata, SectionKind::Staff];

/// Read-only view of the workflow handed to a submit
pub struct SubmitContext<'a> {
    pub entity_id: Option<&'a str>,
    pub service: &'a dyn CourseService,
}

impl SubmitContext<'_> {
    fn require_entity(&self) -> StudioResult<&str> {
        self.entity_id
            .filter(|id| !id.is_empty())
            .ok_or(StudioError::MissingEntity("course id"))
    }
}

/// What the server said after a successful submit
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub status: WorkflowStatus,
    /// Set only when the call created the course
    pub entity_id: Option<CourseId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    pub status: WorkflowStatus,
    pub section: SectionKind,
}

/// The step that owns `status`, if any
pub fn descriptor_for(status: &WorkflowStatus) -> Option<StepDescriptor> {
    let section = match status {
        WorkflowStatus::New => SectionKind::BasicInfo,
        WorkflowStatus::DraftBasicInfo => SectionKind::Metadata,
        WorkflowStatus::DraftMetaData => SectionKind::Staff,
        WorkflowStatus::DraftStaffInfo => SectionKind::Content,
        WorkflowStatus::Draft | WorkflowStatus::Published | WorkflowStatus::Other(_) => {
            return None
        }
    };
    Some(StepDescriptor {
        status: status.clone(),
        section,
    })
}

pub fn registry() -> Vec<StepDescriptor> {
    STEP_ORDER.iter().filter_map(descriptor_for).collect()
}

impl StepDescriptor {
    /// Serialize the validated fields into this step's single backend call
    pub async fn submit(&self, fields: FieldMap, ctx: &SubmitContext<'_>) -> StudioResult<StepOutcome> {
        match self.section {
            SectionKind::BasicInfo => {
                let form: BasicInfoForm = serde_json::from_value(Value::Object(fields))?;
                let created = ctx.service.create_course(&form.payload()).await?;
                Ok(StepOutcome {
                    status: created.status,
                    entity_id: Some(created.id),
                })
            }
            SectionKind::Metadata => {
                let course_id = ctx.require_entity()?;
                let status = ctx.service.save_course_data(course_id, &fields).await?;
                Ok(StepOutcome {
                    status,
                    entity_id: None,
                })
            }
            SectionKind::Staff => {
                let course_id = ctx.require_entity()?;
                let form: StaffForm = serde_json::from_value(Value::Object(fields))?;
                let status = ctx
                    .service
                    .save_course_staff(&form.payload(&course_id.to_string()))
                    .await?;
                Ok(StepOutcome {
                    status,
                    entity_id: None,
                })
            }
            SectionKind::Content => {
                let course_id = ctx.require_entity()?;
                let status = ctx.service.save_course_content(course_id, &fields).await?;
                Ok(StepOutcome {
                    status,
                    entity_id: None,
                })
            }
        }
    }
}

/// Re-post one section of an existing course. Basic info goes through
/// `UpdateCourse` instead of creating a new course.
pub async fn resubmit(section: SectionKind, fields: FieldMap, ctx: &SubmitContext<'_>) -> StudioResult<WorkflowStatus> {
    match section {
        SectionKind::BasicInfo => {
            let course_id = ctx.require_entity()?;
            let form: BasicInfoForm = serde_json::from_value(Value::Object(fields))?;
            let response = ctx.service.update_course(course_id, &form.payload()).await?;
            Ok(response.status)
        }
        _ => {
            let step = StepDescriptor {
                status: WorkflowStatus::default(),
                section,
            };
            Ok(step.submit(fields, ctx).await?.status)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{CreateCourseResponse, StatusResponse};
    use crate::api::MockCourseService;
    use serde_json::json;

    #[test]
    fn test_registry_is_ordered_and_unique() {
        let steps = registry();
        let sections: Vec<SectionKind> = steps.iter().map(|step| step.section).collect();
        assert_eq!(
            sections,
            vec![
                SectionKind::BasicInfo,
                SectionKind::Metadata,
                SectionKind::Staff,
                SectionKind::Content
            ]
        );

        for (i, a) in steps.iter().enumerate() {
            for b in steps.iter().skip(i + 1) {
                assert_ne!(a.status, b.status);
            }
        }
    }

    #[test]
    fn test_terminal_and_unknown_statuses_have_no_step() {
        assert!(descriptor_for(&WorkflowStatus::Draft).is_none());
        assert!(descriptor_for(&WorkflowStatus::Published).is_none());
        assert!(descriptor_for(&WorkflowStatus::Other("Archived".to_string())).is_none());
    }

    #[tokio::test]
    async fn test_basic_info_submit_returns_server_id_and_status() {
        let mut service = MockCourseService::new();
        service
            .expect_create_course()
            .withf(|payload| payload.name == "Intro to Design" && payload.cover_image.is_none())
            .times(1)
            .returning(|_| {
                Ok(CreateCourseResponse {
                    id: "abc123".to_string(),
                    status: WorkflowStatus::DraftBasicInfo,
                })
            });

        let mut fields = FieldMap::new();
        fields.insert("Name".to_string(), json!("Intro to Design"));
        fields.insert("Description".to_string(), json!("<p>Colour</p>"));

        let ctx = SubmitContext {
            entity_id: None,
            service: &service,
        };
        let step = descriptor_for(&WorkflowStatus::New).unwrap();
        let outcome = step.submit(fields, &ctx).await.unwrap();

        assert_eq!(outcome.entity_id.as_deref(), Some("abc123"));
        assert_eq!(outcome.status, WorkflowStatus::DraftBasicInfo);
    }

    #[tokio::test]
    async fn test_later_steps_require_course_id_before_calling_out() {
        let service = MockCourseService::new();
        let ctx = SubmitContext {
            entity_id: None,
            service: &service,
        };
        let step = descriptor_for(&WorkflowStatus::DraftBasicInfo).unwrap();
        let err = step.submit(FieldMap::new(), &ctx).await.unwrap_err();
        assert!(matches!(err, StudioError::MissingEntity(_)));
    }

    #[tokio::test]
    async fn test_staff_submit_sends_payload_for_course() {
        let mut service = MockCourseService::new();
        service
            .expect_save_course_staff()
            .withf(|payload| {
                payload.id == "abc123"
                    && payload.instructor_ids == vec!["inst-1".to_string()]
                    && payload.allow_rating_on_assistant
            })
            .times(1)
            .returning(|_| Ok(WorkflowStatus::DraftStaffInfo));

        let mut fields = FieldMap::new();
        fields.insert("instructorIds".to_string(), json!(["inst-1"]));

        let ctx = SubmitContext {
            entity_id: Some("abc123"),
            service: &service,
        };
        let step = descriptor_for(&WorkflowStatus::DraftMetaData).unwrap();
        let outcome = step.submit(fields, &ctx).await.unwrap();
        assert_eq!(outcome.status, WorkflowStatus::DraftStaffInfo);
        assert_eq!(outcome.entity_id, None);
    }

    #[tokio::test]
    async fn test_resubmit_basic_info_updates_instead_of_creating() {
        let mut service = MockCourseService::new();
        service
            .expect_update_course()
            .withf(|id, payload| id == "abc123" && payload.name == "Renamed")
            .times(1)
            .returning(|_, _| {
                Ok(StatusResponse {
                    status: WorkflowStatus::Draft,
                })
            });

        let mut fields = FieldMap::new();
        fields.insert("Name".to_string(), json!("Renamed"));
        fields.insert("Description".to_string(), json!("<p>Text</p>"));

        let ctx = SubmitContext {
            entity_id: Some("abc123"),
            service: &service,
        };
        let status = resubmit(SectionKind::BasicInfo, fields, &ctx).await.unwrap();
        assert_eq!(status, WorkflowStatus::Draft);
    }
}
