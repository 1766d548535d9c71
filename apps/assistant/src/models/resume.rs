use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

/// A single work-experience entry. `id` is unique within its document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub duration: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub school: String,
    pub year: String,
}

/// The structured resume edited inside a wizard session.
///
/// Always fully materialized: every section exists, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
}

impl ResumeDocument {
    /// Static seed document loaded when a wizard session is created.
    pub fn seed() -> Self {
        ResumeDocument {
            personal_info: PersonalInfo {
                name: "Jordan Lee".to_string(),
                title: "Java Developer".to_string(),
                email: "jordan.lee@example.com".to_string(),
                phone: "(555) 014-2231".to_string(),
                location: "Chennai, India".to_string(),
            },
            summary: "Java developer with a background in materials research, building payment \
                      services and internal tooling."
                .to_string(),
            skills: vec![
                "Java".to_string(),
                "Spring Boot".to_string(),
                "SQL".to_string(),
                "Git".to_string(),
            ],
            experience: vec![
                ExperienceEntry {
                    id: Uuid::new_v4(),
                    title: "Java Developer".to_string(),
                    company: "Mindgate Solutions".to_string(),
                    duration: "Jul 2024 - Present".to_string(),
                    bullets: vec![
                        "Built payment service endpoints in Java.".to_string(),
                        "Worked on test automation for the settlement pipeline.".to_string(),
                    ],
                },
                ExperienceEntry {
                    id: Uuid::new_v4(),
                    title: "Research Associate".to_string(),
                    company: "IIT Madras".to_string(),
                    duration: "Jun 2023 - Jun 2024".to_string(),
                    bullets: vec![
                        "Wrote data-processing scripts for lab experiments.".to_string(),
                    ],
                },
            ],
            education: vec![EducationEntry {
                degree: "Bachelor of Technology, Materials Science and Engineering".to_string(),
                school: "IIT Madras".to_string(),
                year: "2023".to_string(),
            }],
        }
    }

    /// Returns the experience entry with the given id, if present.
    pub fn experience_mut(&mut self, id: Uuid) -> Option<&mut ExperienceEntry> {
        self.experience.iter_mut().find(|e| e.id == id)
    }

    /// True when every experience id is distinct.
    pub fn has_unique_experience_ids(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.experience.iter().all(|e| seen.insert(e.id))
    }
}

/// Appends `additions` to `skills`, keeping the first occurrence of each skill.
///
/// Comparison ignores ASCII case and surrounding whitespace; blank entries are dropped.
/// The result never contains duplicates, even if `skills` did.
pub fn merge_skills(skills: &[String], additions: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    skills
        .iter()
        .chain(additions.iter())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_ascii_lowercase()))
        .map(str::to_string)
        .collect()
}
