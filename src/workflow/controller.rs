use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{info, warn, Instrument};

use crate::api::client::CourseService;
use crate::api::errors::{StudioError, StudioResult};
use crate::api::types::CourseId;
use crate::forms::{BasicInfoForm, CourseForms, FormSection, SectionKind};
use crate::notify::{Notice, NoticeLevel, Notifier};
use crate::telemetry::{create_workflow_span, generate_correlation_id};
use crate::workflow::registry::{descriptor_for, resubmit, StepDescriptor, SubmitContext, EDIT_ORDER};
use crate::workflow::WorkflowStatus;

/// Current status and course id. Only a successful server response changes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    pub status: WorkflowStatus,
    pub entity_id: Option<CourseId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Advanced {
        from: WorkflowStatus,
        to: WorkflowStatus,
        entity_id: Option<CourseId>,
    },
    /// Status has no editable step; nothing was sent
    NoActiveStep { status: WorkflowStatus },
}

/// Clears the in-flight flag when the save finishes, however it finishes
struct SaveTicket<'a>(&'a AtomicBool);

impl Drop for SaveTicket<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives "Save to draft" for whichever step the status makes active
pub struct WorkflowController {
    service: Arc<dyn CourseService>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<WorkflowState>,
    forms: Mutex<CourseForms>,
    saving: AtomicBool,
}

impl WorkflowController {
    pub fn new(service: Arc<dyn CourseService>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_state(service, notifier, WorkflowState::default())
    }

    pub fn with_state(
        service: Arc<dyn CourseService>,
        notifier: Arc<dyn Notifier>,
        state: WorkflowState,
    ) -> Self {
        Self {
            service,
            notifier,
            state: RwLock::new(state),
            forms: Mutex::new(CourseForms::default()),
            saving: AtomicBool::new(false),
        }
    }

    pub async fn state(&self) -> WorkflowState {
        self.state.read().await.clone()
    }

    pub async fn status(&self) -> WorkflowStatus {
        self.state.read().await.status.clone()
    }

    pub async fn entity_id(&self) -> Option<CourseId> {
        self.state.read().await.entity_id.clone()
    }

    /// Exclusive access to the form sections for editing
    pub async fn forms(&self) -> MutexGuard<'_, CourseForms> {
        self.forms.lock().await
    }

    pub async fn active_step(&self) -> Option<StepDescriptor> {
        descriptor_for(&self.state.read().await.status)
    }

    /// Whether `section` is the one the current status unlocks
    pub async fn is_editable(&self, section: SectionKind) -> bool {
        self.active_step()
            .await
            .is_some_and(|step| step.section == section)
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    fn begin_save(&self) -> StudioResult<SaveTicket<'_>> {
        self.saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StudioError::SaveInFlight)?;
        Ok(SaveTicket(&self.saving))
    }

    fn begin_save_or_notify(&self) -> StudioResult<SaveTicket<'_>> {
        self.begin_save().inspect_err(|e| {
            self.notifier
                .notify(Notice::new(NoticeLevel::Info, e.user_message()))
        })
    }

    async fn require_course_id(&self) -> StudioResult<CourseId> {
        match self.entity_id().await {
            Some(course_id) => Ok(course_id),
            None => {
                let err = StudioError::MissingEntity("course id");
                self.notifier.notify(Notice::error(err.user_message()));
                Err(err)
            }
        }
    }

    /// Load an existing course and adopt its server status.
    ///
    /// A missing course or a failed fetch starts a fresh draft instead.
    pub async fn resume(&self, course_id: &str) -> WorkflowStatus {
        match self.service.get_course_basic_info(course_id).await {
            Ok(Some(course)) => {
                let status = course.status.clone().unwrap_or_default();
                *self.forms.lock().await = CourseForms {
                    basic_info: BasicInfoForm::from_course(&course),
                    ..CourseForms::default()
                };
                *self.state.write().await = WorkflowState {
                    status: status.clone(),
                    entity_id: Some(course.id),
                };
                info!(course.id = %course_id, status = %status, "Resumed course draft");
                status
            }
            Ok(None) => {
                warn!(course.id = %course_id, "Course not found, starting fresh");
                self.state.write().await.status = WorkflowStatus::New;
                WorkflowStatus::New
            }
            Err(e) => {
                warn!(course.id = %course_id, error = %e, "Error loading course, starting fresh");
                self.state.write().await.status = WorkflowStatus::New;
                WorkflowStatus::New
            }
        }
    }

    /// `resume`, then prefill the metadata and staff sections from the server.
    /// A section that cannot be fetched or read stays blank.
    pub async fn resume_for_edit(&self, course_id: &str) -> WorkflowStatus {
        let status = self.resume(course_id).await;
        if self.entity_id().await.is_none() {
            return status;
        }

        let (metadata, staff) = tokio::join!(
            self.service.get_course_data(course_id),
            self.service.get_course_staff(course_id),
        );

        let mut forms = self.forms.lock().await;
        for (section, fetched) in [(SectionKind::Metadata, metadata), (SectionKind::Staff, staff)] {
            match fetched {
                Ok(Some(fields)) => {
                    if let Err(e) = forms.section_mut(section).load(fields) {
                        warn!(course.id = %course_id, section = %section, error = %e, "Stored section unreadable, left blank");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(course.id = %course_id, section = %section, error = %e, "Could not load section for editing");
                }
            }
        }
        status
    }

    /// Validate and submit the form of the active step.
    ///
    /// Exactly one submit runs per call. A second call while one is running
    /// fails with `SaveInFlight` instead of racing it.
    pub async fn save(&self) -> StudioResult<SaveOutcome> {
        let _ticket = self.begin_save_or_notify()?;

        let WorkflowState { status, entity_id } = self.state().await;
        let correlation_id = generate_correlation_id();
        let span = create_workflow_span(
            "save",
            entity_id.as_deref(),
            Some(status.as_str()),
            Some(&correlation_id),
        );

        self.save_step(status, entity_id).instrument(span).await
    }

    async fn save_step(
        &self,
        status: WorkflowStatus,
        entity_id: Option<CourseId>,
    ) -> StudioResult<SaveOutcome> {
        let Some(step) = descriptor_for(&status) else {
            info!(status = %status, "No step matches the current status, nothing to save");
            return Ok(SaveOutcome::NoActiveStep { status });
        };

        let fields = {
            let mut forms = self.forms.lock().await;
            let section = forms.section_mut(step.section);
            if !section.validate() {
                let errors = section.errors().clone();
                drop(forms);
                let err = StudioError::Validation(errors);
                warn!(section = %step.section, error = %err, "Form validation failed");
                self.notifier.notify(Notice::error(err.user_message()));
                return Err(err);
            }
            section.values()
        };

        self.notifier.notify(Notice::loading("Saving your course..."));
        let ctx = SubmitContext {
            entity_id: entity_id.as_deref(),
            service: self.service.as_ref(),
        };

        match step.submit(fields, &ctx).await {
            Ok(outcome) => {
                let mut state = self.state.write().await;
                state.status = outcome.status.clone();
                if let Some(id) = outcome.entity_id {
                    state.entity_id = Some(id);
                }
                let entity_id = state.entity_id.clone();
                drop(state);

                info!(
                    course.id = entity_id.as_deref().unwrap_or_default(),
                    from = %status,
                    to = %outcome.status,
                    "Workflow advanced"
                );
                self.notifier.notify(Notice::success("Saved successfully!"));
                Ok(SaveOutcome::Advanced {
                    from: status,
                    to: outcome.status,
                    entity_id,
                })
            }
            Err(e) => {
                warn!(section = %step.section, error = %e, "Submission failed, status unchanged");
                self.notifier.notify(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Edit mode: push the basic info form through `UpdateCourse`
    pub async fn update_basic_info(&self) -> StudioResult<WorkflowStatus> {
        let _ticket = self.begin_save_or_notify()?;
        let course_id = self.require_course_id().await?;

        let status = self.resave_section(&course_id, SectionKind::BasicInfo).await?;
        self.notifier.notify(Notice::success("Saved successfully!"));
        Ok(status)
    }

    /// Edit mode "Save to draft": validate and re-post basic info, metadata
    /// and staff in that order.
    ///
    /// Stops at the first invalid section or failed call. Sections posted
    /// before the failure stay saved on the server.
    pub async fn save_all(&self) -> StudioResult<WorkflowStatus> {
        let _ticket = self.begin_save_or_notify()?;
        let course_id = self.require_course_id().await?;
        let correlation_id = generate_correlation_id();
        let span = create_workflow_span("save_all", Some(&course_id), None, Some(&correlation_id));

        async {
            let mut status = self.status().await;
            for section in EDIT_ORDER {
                status = self.resave_section(&course_id, section).await?;
            }
            self.notifier.notify(Notice::success("All data saved successfully!"));
            Ok(status)
        }
        .instrument(span)
        .await
    }

    async fn resave_section(&self, course_id: &str, section: SectionKind) -> StudioResult<WorkflowStatus> {
        let fields = {
            let mut forms = self.forms.lock().await;
            let form = forms.section_mut(section);
            if !form.validate() {
                let err = StudioError::Validation(form.errors().clone());
                warn!(course.id = %course_id, section = %section, error = %err, "Form validation failed");
                self.notifier
                    .notify(Notice::error(format!("Please complete {section}")));
                return Err(err);
            }
            form.values()
        };

        let ctx = SubmitContext {
            entity_id: Some(course_id),
            service: self.service.as_ref(),
        };
        match resubmit(section, fields, &ctx).await {
            Ok(next) => {
                let from = std::mem::replace(&mut self.state.write().await.status, next.clone());
                info!(course.id = %course_id, section = %section, from = %from, to = %next, "Section saved");
                Ok(next)
            }
            Err(e) => {
                warn!(course.id = %course_id, section = %section, error = %e, "Section update failed");
                self.notifier.notify(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }
}
