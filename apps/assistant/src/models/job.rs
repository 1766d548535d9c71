use serde::{Deserialize, Serialize};

/// What a target job asks for. Supplied by the caller; never mutated by the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub title: String,
    pub company: String,
    pub required_skills: Vec<String>,
    /// Free text, e.g. "2+ years exp".
    pub experience_level: String,
    pub industries: Vec<String>,
}

/// Display bucket for a precomputed match percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchLevel {
    StrongMatch,
    GoodMatch,
    FairMatch,
}

impl MatchLevel {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            80..=u8::MAX => MatchLevel::StrongMatch,
            60..=79 => MatchLevel::GoodMatch,
            _ => MatchLevel::FairMatch,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchLevel::StrongMatch => "STRONG MATCH",
            MatchLevel::GoodMatch => "GOOD MATCH",
            MatchLevel::FairMatch => "FAIR MATCH",
        }
    }
}

/// A job posting as listed in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub applicants: u32,
    #[serde(default)]
    pub match_percentage: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub posted_time: Option<String>,
    #[serde(default)]
    pub is_h1b_sponsor: bool,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

impl JobPosting {
    pub fn match_level(&self) -> MatchLevel {
        MatchLevel::from_percentage(self.match_percentage)
    }

    /// Requirement view handed to the resume wizard. Tags double as industry tags.
    pub fn requirement(&self) -> JobRequirement {
        JobRequirement {
            title: self.title.clone(),
            company: self.company.clone(),
            required_skills: self.required_skills.clone(),
            experience_level: self.experience.clone(),
            industries: self.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_level_thresholds() {
        assert_eq!(MatchLevel::from_percentage(100), MatchLevel::StrongMatch);
        assert_eq!(MatchLevel::from_percentage(80), MatchLevel::StrongMatch);
        assert_eq!(MatchLevel::from_percentage(79), MatchLevel::GoodMatch);
        assert_eq!(MatchLevel::from_percentage(60), MatchLevel::GoodMatch);
        assert_eq!(MatchLevel::from_percentage(59), MatchLevel::FairMatch);
        assert_eq!(MatchLevel::from_percentage(0), MatchLevel::FairMatch);
    }

    #[test]
    fn test_match_level_serializes_as_display_constant() {
        let json = serde_json::to_string(&MatchLevel::GoodMatch).unwrap();
        assert_eq!(json, r#""GOOD_MATCH""#);
        assert_eq!(MatchLevel::GoodMatch.label(), "GOOD MATCH");
    }

    #[test]
    fn test_posting_deserializes_with_missing_optional_fields() {
        let json = r#"{"id": "7", "title": "Backend Engineer", "company": "Acme"}"#;
        let posting: JobPosting = serde_json::from_str(json).unwrap();
        assert_eq!(posting.match_percentage, 0);
        assert!(posting.tags.is_empty());
        assert_eq!(posting.match_level(), MatchLevel::FairMatch);
    }

    #[test]
    fn test_requirement_uses_tags_as_industries() {
        let json = r#"{
            "id": "1", "title": "Software Engineer II", "company": "Circle",
            "experience": "2+ years exp", "tags": ["Banking", "Blockchain"],
            "required_skills": ["Go"]
        }"#;
        let posting: JobPosting = serde_json::from_str(json).unwrap();
        let req = posting.requirement();
        assert_eq!(req.industries, vec!["Banking", "Blockchain"]);
        assert_eq!(req.experience_level, "2+ years exp");
        assert_eq!(req.required_skills, vec!["Go"]);
    }
}
