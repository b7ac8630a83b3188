use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Why a worker is required to take the orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerStatus {
    NewToPosition,
    ReturningHazardsChanged,
    Under25Returning,
    AffectedByHazardChanges,
    AnnualReview,
}

impl WorkerStatus {
    pub const ALL: [WorkerStatus; 5] = [
        WorkerStatus::NewToPosition,
        WorkerStatus::ReturningHazardsChanged,
        WorkerStatus::Under25Returning,
        WorkerStatus::AffectedByHazardChanges,
        WorkerStatus::AnnualReview,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WorkerStatus::NewToPosition => "New to this position",
            WorkerStatus::ReturningHazardsChanged => "Returning worker (hazards have changed)",
            WorkerStatus::Under25Returning => "Under 25 years old, returning after 6+ months",
            WorkerStatus::AffectedByHazardChanges => "Affected by changes to hazards",
            WorkerStatus::AnnualReview => "Annual review",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WorkerStatus::NewToPosition => "NEW_TO_POSITION",
            WorkerStatus::ReturningHazardsChanged => "RETURNING_HAZARDS_CHANGED",
            WorkerStatus::Under25Returning => "UNDER_25_RETURNING",
            WorkerStatus::AffectedByHazardChanges => "AFFECTED_BY_HAZARD_CHANGES",
            WorkerStatus::AnnualReview => "ANNUAL_REVIEW",
        }
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for WorkerStatus {
    type Err = String;

    /// Accepts the stored code (`NEW_TO_POSITION`) or its kebab form (`new-to-position`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        WorkerStatus::ALL
            .into_iter()
            .find(|status| status.code() == normalized)
            .ok_or_else(|| format!("unknown worker status: {s}"))
    }
}

/// Worker and emergency-contact details captured on the info step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerInfo {
    pub full_name: String,
    pub hire_date: String,
    pub supervisor_name: String,
    pub site_id: String,
    pub status_type: WorkerStatus,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relationship: String,
}

impl WorkerInfo {
    /// Names of the plain-string fields that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("fullName", &self.full_name),
            ("hireDate", &self.hire_date),
            ("supervisorName", &self.supervisor_name),
            ("siteId", &self.site_id),
            ("emergencyContactName", &self.emergency_contact_name),
            ("emergencyContactPhone", &self.emergency_contact_phone),
            ("emergencyContactRelationship", &self.emergency_contact_relationship),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Raw input from the information form before validation.
///
/// Every field is free text so that validation can report each problem
/// next to the field it belongs to instead of failing on the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerInfoForm {
    pub full_name: String,
    pub hire_date: String,
    pub supervisor_name: String,
    pub site_id: String,
    pub status_type: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relationship: String,
}

/// Per-field validation messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(pub BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    fn insert(&mut self, field: &'static str, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

pub const DEFAULT_SITE_ID: &str = "default";

impl WorkerInfoForm {
    /// Validate the form, producing a trimmed `WorkerInfo`.
    ///
    /// A blank site falls back to [`DEFAULT_SITE_ID`].
    pub fn validate(&self) -> Result<WorkerInfo, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.full_name.trim().is_empty() {
            errors.insert("fullName", "Full name is required");
        }
        if self.hire_date.trim().is_empty() {
            errors.insert("hireDate", "Hire date is required");
        } else if chrono::NaiveDate::parse_from_str(self.hire_date.trim(), "%Y-%m-%d").is_err() {
            errors.insert("hireDate", "Hire date must be in YYYY-MM-DD format");
        }
        if self.supervisor_name.trim().is_empty() {
            errors.insert("supervisorName", "Supervisor name is required");
        }
        let status = if self.status_type.trim().is_empty() {
            errors.insert("statusType", "Please select your status");
            None
        } else {
            match self.status_type.parse::<WorkerStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.insert("statusType", "Please select a valid status");
                    None
                }
            }
        };
        if self.emergency_contact_name.trim().is_empty() {
            errors.insert("emergencyContactName", "Emergency contact name is required");
        }
        if self.emergency_contact_phone.trim().is_empty() {
            errors.insert("emergencyContactPhone", "Emergency contact phone is required");
        }
        if self.emergency_contact_relationship.trim().is_empty() {
            errors.insert("emergencyContactRelationship", "Relationship is required");
        }

        match status {
            Some(status_type) if errors.is_empty() => {
                let site_id = match self.site_id.trim() {
                    "" => DEFAULT_SITE_ID.to_string(),
                    site => site.to_string(),
                };
                Ok(WorkerInfo {
                    full_name: self.full_name.trim().to_string(),
                    hire_date: self.hire_date.trim().to_string(),
                    supervisor_name: self.supervisor_name.trim().to_string(),
                    site_id,
                    status_type,
                    emergency_contact_name: self.emergency_contact_name.trim().to_string(),
                    emergency_contact_phone: self.emergency_contact_phone.trim().to_string(),
                    emergency_contact_relationship: self
                        .emergency_contact_relationship
                        .trim()
                        .to_string(),
                })
            }
            _ => Err(errors),
        }
    }
}

/// The five ordered stages of the orientation flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Info,
    Video,
    Quiz,
    Acknowledgment,
    Complete,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Info,
        Step::Video,
        Step::Quiz,
        Step::Acknowledgment,
        Step::Complete,
    ];

    /// 1-based position shown in the progress indicator
    pub fn number(&self) -> usize {
        *self as usize + 1
    }

    pub fn label(&self) -> &'static str {
        match self {
            Step::Info => "Your Info",
            Step::Video => "Video",
            Step::Quiz => "Quiz",
            Step::Acknowledgment => "Sign Off",
            Step::Complete => "Complete",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Info => "info",
            Step::Video => "video",
            Step::Quiz => "quiz",
            Step::Acknowledgment => "acknowledgment",
            Step::Complete => "complete",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Step::ALL
            .into_iter()
            .find(|step| step.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown step: {s}"))
    }
}

/// Opaque signature image payload (typically a `data:image/png;base64,...` URL)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureData(String);

impl SignatureData {
    /// Returns `None` for an empty or whitespace-only payload
    pub fn new(payload: impl Into<String>) -> Option<Self> {
        let payload = payload.into();
        if payload.trim().is_empty() {
            None
        } else {
            Some(Self(payload))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Signatures can be large image payloads; keep logs readable.
impl fmt::Debug for SignatureData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureData({} bytes)", self.0.len())
    }
}

/// The single mutable aggregate for one worker's pass through the flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationState {
    pub session_id: Option<String>,
    pub worker_info: Option<WorkerInfo>,
    pub video_progress: f64,
    pub video_completed: bool,
    pub quiz_passed: bool,
    pub quiz_attempts: u32,
    pub acknowledgment_signed: bool,
    pub signature_data: Option<SignatureData>,
    pub current_step: Step,
}

impl Default for OrientationState {
    fn default() -> Self {
        Self {
            session_id: None,
            worker_info: None,
            video_progress: 0.0,
            video_completed: false,
            quiz_passed: false,
            quiz_attempts: 0,
            acknowledgment_signed: false,
            signature_data: None,
            current_step: Step::Info,
        }
    }
}

impl OrientationState {
    /// Check the cross-field invariants of a reachable state.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.video_progress) {
            return Err(format!("video progress {} out of range", self.video_progress));
        }
        if self.quiz_passed && !self.video_completed {
            return Err("quiz passed without completed video".to_string());
        }
        if self.acknowledgment_signed && !self.quiz_passed {
            return Err("acknowledgment signed without passed quiz".to_string());
        }
        if self.acknowledgment_signed != self.signature_data.is_some() {
            return Err("signature presence does not match acknowledgment".to_string());
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.worker_info.is_some()
            && self.video_completed
            && self.quiz_passed
            && self.acknowledgment_signed
    }
}
