use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned marker of how far a course draft has been saved.
///
/// Only the server moves a course from one status to the next; the client
/// adopts whatever string comes back, so unknown values are preserved in
/// `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkflowStatus {
    #[default]
    New,
    DraftBasicInfo,
    DraftMetaData,
    DraftStaffInfo,
    Draft,
    Published,
    Other(String),
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &str {
        match self {
            WorkflowStatus::New => "new",
            WorkflowStatus::DraftBasicInfo => "Draft-BasicInfo",
            WorkflowStatus::DraftMetaData => "Draft-MetaData",
            WorkflowStatus::DraftStaffInfo => "Draft-StaffInfo",
            WorkflowStatus::Draft => "Draft",
            WorkflowStatus::Published => "Published",
            WorkflowStatus::Other(raw) => raw,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, WorkflowStatus::Published)
    }
}

impl From<&str> for WorkflowStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "new" => WorkflowStatus::New,
            "Draft-BasicInfo" => WorkflowStatus::DraftBasicInfo,
            "Draft-MetaData" => WorkflowStatus::DraftMetaData,
            "Draft-StaffInfo" => WorkflowStatus::DraftStaffInfo,
            "Draft" => WorkflowStatus::Draft,
            "Published" => WorkflowStatus::Published,
            other => WorkflowStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for WorkflowStatus {
    fn from(raw: String) -> Self {
        WorkflowStatus::from(raw.as_str())
    }
}

impl From<WorkflowStatus> for String {
    fn from(status: WorkflowStatus) -> Self {
        match status {
            WorkflowStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_round_trip_through_wire_strings() {
        for raw in [
            "new",
            "Draft-BasicInfo",
            "Draft-MetaData",
            "Draft-StaffInfo",
            "Draft",
            "Published",
        ] {
            let status = WorkflowStatus::from(raw);
            assert!(!matches!(status, WorkflowStatus::Other(_)), "{raw}");
            assert_eq!(status.as_str(), raw);
        }
    }

    #[test]
    fn test_unknown_status_is_kept_verbatim() {
        let status: WorkflowStatus = serde_json::from_str("\"Draft-Content\"").unwrap();
        assert_eq!(status, WorkflowStatus::Other("Draft-Content".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Draft-Content\"");
    }

    #[test]
    fn test_status_matching_is_case_sensitive() {
        assert_eq!(
            WorkflowStatus::from("draft-basicinfo"),
            WorkflowStatus::Other("draft-basicinfo".to_string())
        );
    }
}
