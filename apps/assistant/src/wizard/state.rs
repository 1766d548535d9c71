//! Wizard state and its reducer.
//!
//! `reduce` is pure: it never spawns, sleeps or logs. Anything asynchronous is returned
//! as an `Effect` for the session store to run. The enhancement result comes back as
//! another `WizardAction`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::renderer::StyleConfig;
use crate::models::job::JobRequirement;
use crate::models::resume::{PersonalInfo, ResumeDocument};
use crate::wizard::enhancer::EnhancementRequest;

pub const INITIAL_SCORE: f32 = 2.5;
pub const TARGET_SCORE: f32 = 3.0;

const MIN_NAME_FONT_SIZE: u8 = 12;
const MAX_NAME_FONT_SIZE: u8 = 48;

// ────────────────────────────────────────────────────────────────────────────
// Value types
// ────────────────────────────────────────────────────────────────────────────

/// Wizard step. Serialized as its number (1–3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    /// "See Your Difference"
    Review = 1,
    /// "Align Your Resume"
    Align = 2,
    /// "Review Your New Resume"
    Preview = 3,
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Step::Review),
            2 => Ok(Step::Align),
            3 => Ok(Step::Preview),
            other => Err(format!("invalid wizard step {other}, expected 1, 2 or 3")),
        }
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Summary,
    Skills,
    WorkExperience,
}

/// Which resume sections the enhancement may rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSelection {
    pub summary: bool,
    pub skills: bool,
    pub work_experience: bool,
}

impl Default for SectionSelection {
    fn default() -> Self {
        SectionSelection {
            summary: false,
            skills: true,
            work_experience: true,
        }
    }
}

impl SectionSelection {
    fn set(&mut self, section: Section, enabled: bool) {
        match section {
            Section::Summary => self.summary = enabled,
            Section::Skills => self.skills = enabled,
            Section::WorkExperience => self.work_experience = enabled,
        }
    }
}

/// How much of the experience history gets rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditScope {
    /// Only the most recent entry.
    #[default]
    Quick,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f32) -> Self {
        if score >= 7.0 {
            ScoreBand::Strong
        } else if score >= 4.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// State
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub step: Step,
    /// An enhancement is in flight; all input is refused.
    pub busy: bool,
    pub document: ResumeDocument,
    pub job: JobRequirement,
    pub sections: SectionSelection,
    pub edit_scope: EditScope,
    pub selected_skills: Vec<String>,
    pub style: StyleConfig,
    pub resume_score: f32,
    pub last_error: Option<String>,
}

impl WizardState {
    /// Fresh session on step 1 with the seed document. Job skills the resume lacks are
    /// preselected for merging.
    pub fn new(job: JobRequirement) -> Self {
        let document = ResumeDocument::seed();
        let selected_skills = missing_skills(&document, &job);
        WizardState {
            step: Step::Review,
            busy: false,
            document,
            job,
            sections: SectionSelection::default(),
            edit_scope: EditScope::default(),
            selected_skills,
            style: StyleConfig::default(),
            resume_score: INITIAL_SCORE,
            last_error: None,
        }
    }

    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.resume_score)
    }

    fn enhancement_request(&self) -> EnhancementRequest {
        EnhancementRequest {
            document: self.document.clone(),
            job: self.job.clone(),
            sections: self.sections,
            selected_skills: self.selected_skills.clone(),
            edit_scope: self.edit_scope,
        }
    }
}

fn missing_skills(document: &ResumeDocument, job: &JobRequirement) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for skill in job.required_skills.iter().map(|s| s.trim()) {
        let known = document
            .skills
            .iter()
            .chain(missing.iter())
            .any(|s| s.trim().eq_ignore_ascii_case(skill));
        if !skill.is_empty() && !known {
            missing.push(skill.to_string());
        }
    }
    missing
}

// ────────────────────────────────────────────────────────────────────────────
// Actions, effects, transitions
// ────────────────────────────────────────────────────────────────────────────

/// Input a user can send to an open wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserInput {
    Advance { target: Step },
    SetSection { section: Section, enabled: bool },
    SetEditScope { scope: EditScope },
    /// Adds the skill to the merge selection, or removes it when already selected.
    ToggleSkill { skill: String },
    UpdatePersonalInfo { personal_info: PersonalInfo },
    SetSummary { summary: String },
    SetExperienceBullets { id: Uuid, bullets: Vec<String> },
    /// Removes a skill from the document itself.
    RemoveSkill { skill: String },
    SetStyle { style: StyleConfig },
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    Input(UserInput),
    EnhancementCompleted { document: ResumeDocument },
    EnhancementFailed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartEnhancement(EnhancementRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied,
    IgnoredWhileBusy,
    Unchanged,
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: WizardState,
    pub effect: Option<Effect>,
    pub outcome: Outcome,
}

impl Transition {
    fn applied(state: WizardState) -> Self {
        Transition {
            state,
            effect: None,
            outcome: Outcome::Applied,
        }
    }

    fn keep(state: &WizardState, outcome: Outcome) -> Self {
        Transition {
            state: state.clone(),
            effect: None,
            outcome,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Reducer
// ────────────────────────────────────────────────────────────────────────────

pub fn reduce(state: &WizardState, action: WizardAction) -> Transition {
    match action {
        WizardAction::Input(_) if state.busy => Transition::keep(state, Outcome::IgnoredWhileBusy),
        WizardAction::Input(input) => apply_input(state, input),

        // Results arriving when nothing is pending are stale.
        WizardAction::EnhancementCompleted { .. } | WizardAction::EnhancementFailed { .. }
            if !state.busy =>
        {
            Transition::keep(state, Outcome::Unchanged)
        }
        WizardAction::EnhancementCompleted { document } => {
            debug_assert!(document.has_unique_experience_ids());
            let mut next = state.clone();
            next.document = document;
            next.step = Step::Preview;
            next.busy = false;
            next.resume_score = TARGET_SCORE;
            next.last_error = None;
            Transition::applied(next)
        }
        WizardAction::EnhancementFailed { message } => {
            let mut next = state.clone();
            next.busy = false;
            next.last_error = Some(message);
            Transition::applied(next)
        }
    }
}

fn apply_input(state: &WizardState, input: UserInput) -> Transition {
    let mut next = state.clone();

    match input {
        UserInput::Advance { target } => {
            if target == state.step {
                return Transition::keep(state, Outcome::Unchanged);
            }
            if state.step == Step::Align && target == Step::Preview {
                next.busy = true;
                next.last_error = None;
                let request = state.enhancement_request();
                return Transition {
                    state: next,
                    effect: Some(Effect::StartEnhancement(request)),
                    outcome: Outcome::Applied,
                };
            }
            next.step = target;
        }
        UserInput::SetSection { section, enabled } => next.sections.set(section, enabled),
        UserInput::SetEditScope { scope } => next.edit_scope = scope,
        UserInput::ToggleSkill { skill } => {
            let skill = skill.trim();
            if skill.is_empty() {
                return Transition::keep(state, Outcome::Invalid("skill cannot be empty".into()));
            }
            match next.selected_skills.iter().position(|s| s == skill) {
                Some(i) => {
                    next.selected_skills.remove(i);
                }
                None => next.selected_skills.push(skill.to_string()),
            }
        }
        UserInput::UpdatePersonalInfo { personal_info } => next.document.personal_info = personal_info,
        UserInput::SetSummary { summary } => next.document.summary = summary,
        UserInput::SetExperienceBullets { id, bullets } => match next.document.experience_mut(id) {
            Some(entry) => entry.bullets = bullets,
            None => {
                return Transition::keep(
                    state,
                    Outcome::Invalid(format!("no experience entry with id {id}")),
                )
            }
        },
        UserInput::RemoveSkill { skill } => next.document.skills.retain(|s| s != &skill),
        UserInput::SetStyle { style } => {
            if !(MIN_NAME_FONT_SIZE..=MAX_NAME_FONT_SIZE).contains(&style.name_font_size) {
                return Transition::keep(
                    state,
                    Outcome::Invalid(format!(
                        "name_font_size must be between {MIN_NAME_FONT_SIZE} and {MAX_NAME_FONT_SIZE}"
                    )),
                );
            }
            next.style = style;
        }
    }

    if next == *state {
        Transition::keep(state, Outcome::Unchanged)
    } else {
        Transition::applied(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::renderer::Template;

    fn job() -> JobRequirement {
        JobRequirement {
            title: "Full Stack Software Engineer III".to_string(),
            company: "Northwind Bank".to_string(),
            required_skills: vec![
                "Core Java".to_string(),
                "Spring Boot".to_string(),
                "RESTful APIs".to_string(),
                "JUnit".to_string(),
            ],
            experience_level: "2+ years exp".to_string(),
            industries: vec!["Banking".to_string(), "Financial Services".to_string()],
        }
    }

    fn input(state: &WizardState, input: UserInput) -> Transition {
        reduce(state, WizardAction::Input(input))
    }

    fn advance(state: &WizardState, target: Step) -> Transition {
        input(state, UserInput::Advance { target })
    }

    #[test]
    fn test_new_session_defaults() {
        let state = WizardState::new(job());
        assert_eq!(state.step, Step::Review);
        assert!(!state.busy);
        assert_eq!(state.resume_score, INITIAL_SCORE);
        assert_eq!(state.score_band(), ScoreBand::Poor);
        assert_eq!(state.sections, SectionSelection::default());
        assert!(!state.sections.summary);
        assert_eq!(state.edit_scope, EditScope::Quick);
        // Spring Boot is already on the seed resume.
        assert_eq!(state.selected_skills, vec!["Core Java", "RESTful APIs", "JUnit"]);
    }

    #[test]
    fn test_step_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Step::Align).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Step>("3").unwrap(), Step::Preview);
        assert!(serde_json::from_str::<Step>("4").is_err());
        assert!(serde_json::from_str::<Step>("0").is_err());
    }

    #[test]
    fn test_user_input_wire_format() {
        let parsed: UserInput =
            serde_json::from_str(r#"{"type":"set_section","section":"work_experience","enabled":false}"#)
                .unwrap();
        assert_eq!(
            parsed,
            UserInput::SetSection {
                section: Section::WorkExperience,
                enabled: false
            }
        );
    }

    #[test]
    fn test_advance_one_to_two_is_immediate() {
        let state = WizardState::new(job());
        let t = advance(&state, Step::Align);
        assert_eq!(t.state.step, Step::Align);
        assert!(t.effect.is_none());
        assert_eq!(t.outcome, Outcome::Applied);
    }

    #[test]
    fn test_advance_two_to_three_starts_enhancement() {
        let state = advance(&WizardState::new(job()), Step::Align).state;
        let t = advance(&state, Step::Preview);
        assert!(t.state.busy);
        assert_eq!(t.state.step, Step::Align);
        match t.effect {
            Some(Effect::StartEnhancement(request)) => {
                assert_eq!(request.document, state.document);
                assert_eq!(request.selected_skills, state.selected_skills);
                assert_eq!(request.sections, state.sections);
            }
            None => panic!("expected an enhancement effect"),
        }
    }

    #[test]
    fn test_non_adjacent_and_backward_moves_are_immediate() {
        let state = WizardState::new(job());
        let jumped = advance(&state, Step::Preview);
        assert_eq!(jumped.state.step, Step::Preview);
        assert!(jumped.effect.is_none());

        let back = advance(&jumped.state, Step::Align);
        assert_eq!(back.state.step, Step::Align);
        assert!(back.effect.is_none());

        let first = advance(&back.state, Step::Review);
        assert_eq!(first.state.step, Step::Review);
    }

    #[test]
    fn test_advance_to_same_step_is_unchanged() {
        let state = WizardState::new(job());
        assert_eq!(advance(&state, Step::Review).outcome, Outcome::Unchanged);
    }

    #[test]
    fn test_input_while_busy_is_ignored() {
        let state = advance(&WizardState::new(job()), Step::Align).state;
        let busy = advance(&state, Step::Preview).state;

        let again = advance(&busy, Step::Preview);
        assert_eq!(again.outcome, Outcome::IgnoredWhileBusy);
        assert!(again.effect.is_none());
        assert_eq!(again.state, busy);

        let back = advance(&busy, Step::Review);
        assert_eq!(back.outcome, Outcome::IgnoredWhileBusy);
        assert_eq!(back.state.step, Step::Align);

        let edit = input(&busy, UserInput::SetSummary { summary: "x".into() });
        assert_eq!(edit.outcome, Outcome::IgnoredWhileBusy);
    }

    #[test]
    fn test_completion_unlocks_step_three() {
        let state = advance(&WizardState::new(job()), Step::Align).state;
        let busy = advance(&state, Step::Preview).state;
        let mut document = busy.document.clone();
        document.summary = "rewritten".to_string();

        let done = reduce(&busy, WizardAction::EnhancementCompleted { document: document.clone() });
        assert_eq!(done.state.step, Step::Preview);
        assert!(!done.state.busy);
        assert_eq!(done.state.resume_score, TARGET_SCORE);
        assert_eq!(done.state.document, document);
    }

    #[test]
    fn test_failure_keeps_step_two_and_records_error() {
        let state = advance(&WizardState::new(job()), Step::Align).state;
        let busy = advance(&state, Step::Preview).state;
        let failed = reduce(
            &busy,
            WizardAction::EnhancementFailed {
                message: "service unavailable".into(),
            },
        );
        assert_eq!(failed.state.step, Step::Align);
        assert!(!failed.state.busy);
        assert_eq!(failed.state.last_error.as_deref(), Some("service unavailable"));
        assert_eq!(failed.state.resume_score, INITIAL_SCORE);

        // Retrying clears the error.
        let retry = advance(&failed.state, Step::Preview);
        assert!(retry.state.busy);
        assert!(retry.state.last_error.is_none());
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let state = WizardState::new(job());
        let t = reduce(
            &state,
            WizardAction::EnhancementCompleted {
                document: ResumeDocument::seed(),
            },
        );
        assert_eq!(t.outcome, Outcome::Unchanged);
        assert_eq!(t.state.step, Step::Review);
    }

    #[test]
    fn test_toggle_skill_adds_and_removes() {
        let state = WizardState::new(job());
        let removed = input(&state, UserInput::ToggleSkill { skill: "JUnit".into() }).state;
        assert!(!removed.selected_skills.contains(&"JUnit".to_string()));
        let added = input(&removed, UserInput::ToggleSkill { skill: " JUnit ".into() }).state;
        assert_eq!(added.selected_skills.last().map(String::as_str), Some("JUnit"));

        let blank = input(&state, UserInput::ToggleSkill { skill: "  ".into() });
        assert!(matches!(blank.outcome, Outcome::Invalid(_)));
    }

    #[test]
    fn test_set_experience_bullets_targets_entry_by_id() {
        let state = WizardState::new(job());
        let id = state.document.experience[1].id;
        let t = input(
            &state,
            UserInput::SetExperienceBullets {
                id,
                bullets: vec!["Mentored new hires".into()],
            },
        );
        assert_eq!(t.state.document.experience[1].bullets, vec!["Mentored new hires"]);
        assert_eq!(t.state.document.experience[0], state.document.experience[0]);

        let unknown = input(
            &state,
            UserInput::SetExperienceBullets {
                id: Uuid::new_v4(),
                bullets: vec![],
            },
        );
        assert!(matches!(unknown.outcome, Outcome::Invalid(_)));
    }

    #[test]
    fn test_remove_skill_and_sections() {
        let state = WizardState::new(job());
        let t = input(&state, UserInput::RemoveSkill { skill: "Git".into() });
        assert!(!t.state.document.skills.contains(&"Git".to_string()));

        let t = input(
            &state,
            UserInput::SetSection {
                section: Section::Summary,
                enabled: true,
            },
        );
        assert!(t.state.sections.summary);
    }

    #[test]
    fn test_set_style_validates_font_size() {
        let state = WizardState::new(job());
        let compact = StyleConfig {
            template: Template::Compact,
            ..StyleConfig::default()
        };
        let t = input(&state, UserInput::SetStyle { style: compact });
        assert_eq!(t.state.style.template, Template::Compact);

        let huge = StyleConfig {
            name_font_size: 200,
            ..StyleConfig::default()
        };
        assert!(matches!(
            input(&state, UserInput::SetStyle { style: huge }).outcome,
            Outcome::Invalid(_)
        ));
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(7.0), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(4.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(3.0), ScoreBand::Poor);
    }
}
