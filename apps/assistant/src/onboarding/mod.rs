//! Onboarding intake: the four-step form a new user fills in before matching starts.
//!
//! The form is owned by the client and round-tripped through the API; this module only
//! decides whether "Next" is allowed and what it does.

pub mod handlers;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_JOB_TYPE: &str = "Full-time";
pub const JOB_TYPES: [&str; 4] = ["Full-time", "Contract", "Part-time", "Internship"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum IntakeStep {
    JobPreferences = 1,
    JobFunctions = 2,
    ResumeUpload = 3,
    Matching = 4,
}

impl IntakeStep {
    pub fn title(&self) -> &'static str {
        match self {
            IntakeStep::JobPreferences => "Job Preferences",
            IntakeStep::JobFunctions => "Job Functions",
            IntakeStep::ResumeUpload => "Resume Upload",
            IntakeStep::Matching => "Matching",
        }
    }

    /// Label of the "Next" button on this step.
    pub fn next_label(&self) -> &'static str {
        match self {
            IntakeStep::JobPreferences | IntakeStep::JobFunctions => "Next",
            IntakeStep::ResumeUpload => "Start Matching",
            IntakeStep::Matching => "Complete",
        }
    }

    fn following(self) -> Option<IntakeStep> {
        match self {
            IntakeStep::JobPreferences => Some(IntakeStep::JobFunctions),
            IntakeStep::JobFunctions => Some(IntakeStep::ResumeUpload),
            IntakeStep::ResumeUpload => Some(IntakeStep::Matching),
            IntakeStep::Matching => None,
        }
    }
}

impl TryFrom<u8> for IntakeStep {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(IntakeStep::JobPreferences),
            2 => Ok(IntakeStep::JobFunctions),
            3 => Ok(IntakeStep::ResumeUpload),
            4 => Ok(IntakeStep::Matching),
            other => Err(format!("invalid onboarding step {other}, expected 1 to 4")),
        }
    }
}

impl From<IntakeStep> for u8 {
    fn from(step: IntakeStep) -> u8 {
        step as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeForm {
    pub job_function: String,
    pub job_types: Vec<String>,
    pub selected_job_functions: Vec<String>,
    pub remote_open: bool,
    pub needs_sponsorship: bool,
    pub step: IntakeStep,
    pub matching: bool,
}

impl Default for IntakeForm {
    fn default() -> Self {
        IntakeForm {
            job_function: String::new(),
            job_types: vec![DEFAULT_JOB_TYPE.to_string()],
            selected_job_functions: Vec::new(),
            remote_open: true,
            needs_sponsorship: false,
            step: IntakeStep::JobPreferences,
            matching: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntakeInput {
    SetJobFunction { value: String },
    ToggleJobType { job_type: String },
    ToggleJobFunction { name: String },
    SetRemoteOpen { value: bool },
    SetNeedsSponsorship { value: bool },
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("Next is disabled: {0}")]
    NextDisabled(&'static str),
}

impl IntakeForm {
    /// Why "Next" is disabled, if it is.
    pub fn blocked_reason(&self) -> Option<&'static str> {
        if self.matching {
            return Some("matching is already in progress");
        }
        match self.step {
            IntakeStep::JobPreferences if self.job_function.trim().is_empty() => {
                Some("a job function is required")
            }
            IntakeStep::JobPreferences if self.job_types.is_empty() => {
                Some("at least one job type is required")
            }
            IntakeStep::JobFunctions if self.selected_job_functions.is_empty() => {
                Some("select at least one job function")
            }
            _ => None,
        }
    }

    pub fn can_advance(&self) -> bool {
        self.blocked_reason().is_none()
    }

    /// Moves to the next step, or starts matching on the last one.
    pub fn next(&self) -> Result<IntakeForm, IntakeError> {
        if let Some(reason) = self.blocked_reason() {
            return Err(IntakeError::NextDisabled(reason));
        }
        let mut form = self.clone();
        match self.step.following() {
            Some(step) => form.step = step,
            None => form.matching = true,
        }
        Ok(form)
    }

    pub fn apply(&self, input: IntakeInput) -> Result<IntakeForm, IntakeError> {
        let mut form = self.clone();
        match input {
            IntakeInput::SetJobFunction { value } => form.job_function = value,
            IntakeInput::ToggleJobType { job_type } => toggle(&mut form.job_types, &job_type),
            IntakeInput::ToggleJobFunction { name } => {
                toggle(&mut form.selected_job_functions, &name)
            }
            IntakeInput::SetRemoteOpen { value } => form.remote_open = value,
            IntakeInput::SetNeedsSponsorship { value } => form.needs_sponsorship = value,
            IntakeInput::Next => return self.next(),
        }
        Ok(form)
    }
}

fn toggle(items: &mut Vec<String>, item: &str) {
    match items.iter().position(|i| i == item) {
        Some(index) => {
            items.remove(index);
        }
        None => items.push(item.to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job-function catalog
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize)]
pub struct JobCategory {
    pub name: &'static str,
    pub jobs: &'static [&'static str],
}

pub static JOB_CATEGORIES: &[JobCategory] = &[
    JobCategory {
        name: "Software/Internet/AI",
        jobs: &[
            "Backend Engineer",
            "Full Stack Engineer",
            "Python Engineer",
            "Java Engineer",
            "C/C++ Engineer",
            ".Net Engineer",
            "Golang Engineer",
            "Salesforce Developer",
            "Blockchain Engineer",
        ],
    },
    JobCategory {
        name: "Backend Engineering",
        jobs: &["Backend Engineer", "Full Stack Engineer", "Python Engineer", "Java Engineer"],
    },
    JobCategory {
        name: "Data & Analytics",
        jobs: &[
            "Data Analyst",
            "Data Scientist",
            "Data Engineer",
            "Business/BI Analyst",
            "Power BI Developer",
            "ETL Developer",
            "Data Warehouse Engineer",
        ],
    },
    JobCategory {
        name: "Machine Learning & AI",
        jobs: &[
            "Machine Learning Engineer",
            "AI Engineer",
            "Machine Learning/AI Researcher",
            "Machine Learning, Deep Learning",
            "LLM Engineer",
        ],
    },
    JobCategory {
        name: "Consulting",
        jobs: &["Management Consultant", "Strategy Consultant", "Technical Consultant"],
    },
    JobCategory {
        name: "Marketing",
        jobs: &["Digital Marketing Manager", "Marketing Analyst", "Content Marketing Manager"],
    },
    JobCategory {
        name: "Finance",
        jobs: &["Financial Analyst", "Investment Banker", "Risk Analyst"],
    },
    JobCategory {
        name: "Product",
        jobs: &["Product Manager", "Product Owner", "Product Designer"],
    },
    JobCategory {
        name: "Healthcare",
        jobs: &["Software Engineer - Healthcare", "Data Analyst - Healthcare"],
    },
    JobCategory {
        name: "Electrical Engineering",
        jobs: &["Hardware Engineer", "Embedded Systems Engineer"],
    },
    JobCategory {
        name: "Human Resource/Administrative/Legal",
        jobs: &["HR Generalist", "Legal Counsel", "Operations Manager"],
    },
    JobCategory {
        name: "Sales",
        jobs: &["Sales Representative", "Account Manager", "Sales Engineer"],
    },
    JobCategory {
        name: "Production/Manufacturing",
        jobs: &["Manufacturing Engineer", "Quality Engineer"],
    },
    JobCategory {
        name: "Customer Service",
        jobs: &["Customer Success Manager", "Technical Support"],
    },
];
