// Course creation workflow - status machine, step registry and the save controller

pub mod controller;
pub mod registry;
pub mod status;

pub use controller::{SaveOutcome, WorkflowController, WorkflowState};
pub use registry::{descriptor_for, registry, StepDescriptor, StepOutcome, SubmitContext, STEP_ORDER};
pub use status::WorkflowStatus;
