//! Job feed filtering: free-text search plus tag filters.

use crate::models::job::JobPosting;

pub const REMOTE_FILTER: &str = "Remote";
pub const H1B_FILTER: &str = "H1B Only";

/// Case-insensitive substring match of `query` against `fields`. A blank query matches.
pub fn matches_search(query: &str, fields: &[&str]) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&query))
}

fn matches_filter(job: &JobPosting, filter: &str) -> bool {
    let needle = filter.to_lowercase();
    job.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
        || job.level.to_lowercase().contains(&needle)
        || job.job_type.to_lowercase().contains(&needle)
        || (filter == REMOTE_FILTER && job.is_remote)
        || (filter == H1B_FILTER && job.is_h1b_sponsor)
}

/// Jobs whose title or company matches `search` and that satisfy at least one of
/// `active_filters` (or any job, when no filter is active). Feed order is kept.
pub fn filter_jobs(jobs: Vec<JobPosting>, search: &str, active_filters: &[String]) -> Vec<JobPosting> {
    jobs.into_iter()
        .filter(|job| matches_search(search, &[job.title.as_str(), job.company.as_str()]))
        .filter(|job| active_filters.is_empty() || active_filters.iter().any(|f| matches_filter(job, f)))
        .collect()
}

/// Adds `filter` to the active set, or removes it when already present.
pub fn toggle_filter(active_filters: &mut Vec<String>, filter: &str) {
    match active_filters.iter().position(|f| f == filter) {
        Some(i) => {
            active_filters.remove(i);
        }
        None => active_filters.push(filter.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(id: &str, title: &str, company: &str) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            title: title.to_string(),
            company: company.to_string(),
            location: String::new(),
            salary: None,
            job_type: "Full-time".to_string(),
            level: "Mid Level".to_string(),
            experience: "3+ years exp".to_string(),
            applicants: 0,
            match_percentage: 70,
            tags: vec![],
            posted_time: None,
            is_h1b_sponsor: false,
            is_remote: false,
            required_skills: vec![],
        }
    }

    fn feed() -> Vec<JobPosting> {
        let mut backend = posting("1", "Backend Engineer", "Acme");
        backend.tags = vec!["Fintech".to_string()];
        backend.is_remote = true;

        let mut data = posting("2", "Data Analyst", "Globex");
        data.level = "Entry Level".to_string();
        data.is_h1b_sponsor = true;

        let mut contract = posting("3", "Frontend Engineer", "Initech");
        contract.job_type = "Contract".to_string();

        vec![backend, data, contract]
    }

    fn ids(jobs: &[JobPosting]) -> Vec<&str> {
        jobs.iter().map(|j| j.id.as_str()).collect()
    }

    #[test]
    fn test_empty_search_and_filters_keep_everything() {
        assert_eq!(ids(&filter_jobs(feed(), "", &[])), vec!["1", "2", "3"]);
        assert_eq!(ids(&filter_jobs(feed(), "   ", &[])), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_search_matches_title_or_company_case_insensitively() {
        assert_eq!(ids(&filter_jobs(feed(), "ENGINEER", &[])), vec!["1", "3"]);
        assert_eq!(ids(&filter_jobs(feed(), "glob", &[])), vec!["2"]);
        assert!(filter_jobs(feed(), "nurse", &[]).is_empty());
    }

    #[test]
    fn test_filters_match_tag_level_or_type() {
        let f = |s: &str| vec![s.to_string()];
        assert_eq!(ids(&filter_jobs(feed(), "", &f("fintech"))), vec!["1"]);
        assert_eq!(ids(&filter_jobs(feed(), "", &f("Entry"))), vec!["2"]);
        assert_eq!(ids(&filter_jobs(feed(), "", &f("Contract"))), vec!["3"]);
    }

    #[test]
    fn test_special_filters() {
        let remote = vec![REMOTE_FILTER.to_string()];
        assert_eq!(ids(&filter_jobs(feed(), "", &remote)), vec!["1"]);
        let h1b = vec![H1B_FILTER.to_string()];
        assert_eq!(ids(&filter_jobs(feed(), "", &h1b)), vec!["2"]);
    }

    #[test]
    fn test_any_filter_matching_is_enough() {
        let filters = vec![REMOTE_FILTER.to_string(), "Contract".to_string()];
        assert_eq!(ids(&filter_jobs(feed(), "", &filters)), vec!["1", "3"]);
        assert_eq!(ids(&filter_jobs(feed(), "front", &filters)), vec!["3"]);
    }

    #[test]
    fn test_toggle_filter() {
        let mut active = vec![];
        toggle_filter(&mut active, "Remote");
        toggle_filter(&mut active, "Contract");
        assert_eq!(active, vec!["Remote", "Contract"]);
        toggle_filter(&mut active, "Remote");
        assert_eq!(active, vec!["Contract"]);
    }
}
