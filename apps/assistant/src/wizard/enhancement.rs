//! Enhancement Transform: rewrites a resume against a target job.
//!
//! Pure and total: same inputs, same output, no errors. Only the selected sections
//! change. Running it twice gives the same document as running it once.

use crate::models::job::JobRequirement;
use crate::models::resume::{merge_skills, ResumeDocument};
use crate::wizard::state::SectionSelection;

/// Keywords used when the job lists fewer than three required skills.
const FALLBACK_KEYWORDS: [&str; 3] = ["core engineering", "agile delivery", "automated testing"];

pub fn enhance(
    document: &ResumeDocument,
    job: &JobRequirement,
    sections: SectionSelection,
    selected_skills: &[String],
) -> ResumeDocument {
    let mut enhanced = document.clone();

    if sections.summary {
        enhanced.summary = enhanced_summary(document, job);
    }
    if sections.skills {
        enhanced.skills = merge_skills(&document.skills, selected_skills);
    }
    if sections.work_experience {
        // Quick edit: only the most recent entry.
        if let Some(entry) = enhanced.experience.first_mut() {
            entry.bullets = enhanced_bullets(job);
        }
    }

    enhanced
}

/// Summary paragraph built from the person's title, the job's experience level and its
/// industries.
pub fn enhanced_summary(document: &ResumeDocument, job: &JobRequirement) -> String {
    let title = match document.personal_info.title.trim() {
        "" => "Software professional",
        t => t,
    };
    let experience = describe_experience(&job.experience_level);
    let industries = join_list(
        &job.industries
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>(),
    );
    let domain = if industries.is_empty() {
        "across industries".to_string()
    } else {
        format!("in {industries}")
    };
    let focus = join_list(&keywords(job));

    format!(
        "{title} with {experience} delivering production software {domain}. \
         Skilled in {focus}, with a track record of secure, well-tested systems and \
         continuous improvement in agile teams."
    )
}

/// The fixed bullet set for the most recent role, referencing the job's keywords.
pub fn enhanced_bullets(job: &JobRequirement) -> Vec<String> {
    let [first, second, third] = keywords(job);
    vec![
        format!(
            "Developed comprehensive production services using {first} and {second}, \
             integrating CI/CD practices and increasing system reliability by 98% in \
             alignment with secure, high-quality production code requirements."
        ),
        format!(
            "Optimized system performance through {third} testing protocols and \
             infrastructure automation, reducing latency by 35% while supporting agile \
             development and continuous improvement initiatives."
        ),
    ]
}

/// The job's first three required skills, padded with generic keywords.
fn keywords(job: &JobRequirement) -> [String; 3] {
    let mut skills = job
        .required_skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .chain(FALLBACK_KEYWORDS)
        .map(str::to_string);
    [(); 3].map(|_| skills.next().unwrap_or_default())
}

/// "2+ years exp" → "2+ years of experience".
fn describe_experience(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return "proven experience".to_string();
    }
    match level.strip_suffix(" exp") {
        Some(years) => format!("{} of experience", years.trim_end()),
        None => level.to_string(),
    }
}

/// "A", "A and B", "A, B and C".
fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => format!(
            "{} and {}",
            init.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", "),
            last.as_ref()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
            industries: vec![
                "Asset Management".to_string(),
                "Banking".to_string(),
                "Financial Services".to_string(),
            ],
        }
    }

    fn all_sections() -> SectionSelection {
        SectionSelection {
            summary: true,
            skills: true,
            work_experience: true,
        }
    }

    fn selected() -> Vec<String> {
        vec!["JUnit".to_string(), "git".to_string(), "Kafka".to_string()]
    }

    #[test]
    fn test_skills_union_keeps_existing_first_without_duplicates() {
        let doc = ResumeDocument::seed();
        let out = enhance(&doc, &job(), SectionSelection::default(), &selected());
        assert_eq!(out.skills, vec!["Java", "Spring Boot", "SQL", "Git", "JUnit", "Kafka"]);
        for skill in &doc.skills {
            assert!(out.skills.contains(skill));
        }
    }

    #[test]
    fn test_enhance_is_idempotent() {
        let doc = ResumeDocument::seed();
        let once = enhance(&doc, &job(), all_sections(), &selected());
        let twice = enhance(&once, &job(), all_sections(), &selected());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unselected_sections_are_untouched() {
        let doc = ResumeDocument::seed();
        let none = SectionSelection {
            summary: false,
            skills: false,
            work_experience: false,
        };
        assert_eq!(enhance(&doc, &job(), none, &selected()), doc);

        let out = enhance(&doc, &job(), SectionSelection::default(), &selected());
        assert_eq!(out.summary, doc.summary);
        assert_eq!(out.personal_info, doc.personal_info);
        assert_eq!(out.education, doc.education);
    }

    #[test]
    fn test_only_first_experience_entry_is_rewritten() {
        let doc = ResumeDocument::seed();
        let out = enhance(&doc, &job(), SectionSelection::default(), &[]);
        assert_eq!(out.experience[0].bullets, enhanced_bullets(&job()));
        assert_eq!(out.experience[0].id, doc.experience[0].id);
        assert_eq!(out.experience[1], doc.experience[1]);
        assert!(out.has_unique_experience_ids());
    }

    #[test]
    fn test_bullets_reference_job_keywords() {
        let bullets = enhanced_bullets(&job());
        assert_eq!(bullets.len(), 2);
        assert!(bullets[0].contains("Core Java and Spring Boot"));
        assert!(bullets[1].contains("RESTful APIs"));
    }

    #[test]
    fn test_bullets_fall_back_without_required_skills() {
        let mut job = job();
        job.required_skills = vec!["  ".to_string(), "Kafka".to_string()];
        let bullets = enhanced_bullets(&job);
        assert!(bullets[0].contains("Kafka and core engineering"));
        assert!(bullets[1].contains("agile delivery"));
    }

    #[test]
    fn test_no_experience_is_a_no_op() {
        let mut doc = ResumeDocument::seed();
        doc.experience.clear();
        let out = enhance(&doc, &job(), SectionSelection::default(), &[]);
        assert!(out.experience.is_empty());
    }

    #[test]
    fn test_summary_interpolates_level_and_industries() {
        let summary = enhanced_summary(&ResumeDocument::seed(), &job());
        assert!(summary.starts_with("Java Developer with 2+ years of experience"));
        assert!(summary.contains("in Asset Management, Banking and Financial Services"));
        assert!(summary.contains("Core Java, Spring Boot and RESTful APIs"));
    }

    #[test]
    fn test_summary_without_industries_or_level() {
        let mut job = job();
        job.industries.clear();
        job.experience_level = String::new();
        let summary = enhanced_summary(&ResumeDocument::seed(), &job);
        assert!(summary.contains("with proven experience delivering production software across industries"));
    }

    #[test]
    fn test_join_list() {
        assert_eq!(join_list::<&str>(&[]), "");
        assert_eq!(join_list(&["A"]), "A");
        assert_eq!(join_list(&["A", "B"]), "A and B");
        assert_eq!(join_list(&["A", "B", "C"]), "A, B and C");
    }
}
