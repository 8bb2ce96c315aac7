//! Pure scoring helpers shared by the built-in rules.

use std::collections::HashSet;

use crate::context::ActivityCounters;
use crate::kernel::action::NavigationSuggestion;

pub const ENGAGEMENT_SUGGESTIONS: &[&str] = &[
    "Join our WhatsApp community for daily updates",
    "Participate in upcoming webinars",
    "Share your project in the community showcase",
    "Connect with other innovators in your field",
    "Contribute to open discussions",
];

fn split_list(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Percentage (0-100) of required skills covered by the candidate. A skill
/// covers a requirement when either contains the other.
pub fn job_match(requirements: &str, skills: &str) -> f64 {
    let required = split_list(requirements);
    let held = split_list(skills);
    if required.is_empty() || held.is_empty() {
        return 0.0;
    }

    let matched = required
        .iter()
        .filter(|req| held.iter().any(|s| s.contains(req.as_str()) || req.contains(s.as_str())))
        .count();

    matched as f64 / required.len() as f64 * 100.0
}

/// Fraction of course skills the user does not have yet.
pub fn skill_gap(user_skills: &[String], course_skills: &[String]) -> f64 {
    let course: HashSet<String> = course_skills.iter().map(|s| s.to_lowercase()).collect();
    if course.is_empty() {
        return 0.0;
    }
    let user: HashSet<String> = user_skills.iter().map(|s| s.to_lowercase()).collect();

    course.difference(&user).count() as f64 / course.len() as f64
}

fn level_rank(level: &str) -> i32 {
    match level.to_lowercase().as_str() {
        "intermediate" => 2,
        "advanced" => 3,
        "expert" => 4,
        _ => 1,
    }
}

/// 1.0 for equal levels, falling by a third per level apart.
pub fn difficulty_match(user_level: &str, course_level: &str) -> f64 {
    let diff = (level_rank(user_level) - level_rank(course_level)).abs();
    (1.0 - diff as f64 / 3.0).max(0.0)
}

/// Weighted 0-1 score; each counter saturates at 100.
pub fn engagement_score(activity: &ActivityCounters) -> f64 {
    let norm = |v: u64| (v as f64 / 100.0).min(1.0);
    norm(activity.page_views) * 0.2
        + norm(activity.time_spent_seconds) * 0.3
        + norm(activity.interactions) * 0.3
        + norm(activity.contributions) * 0.2
}

pub fn location_compatible(investor_location: &str, startup_location: &str) -> bool {
    let investor = split_list(investor_location);
    let startup = split_list(startup_location);
    investor
        .iter()
        .any(|region| startup.iter().any(|s| s.contains(region.as_str())))
}

pub fn next_best_action(page: &str) -> NavigationSuggestion {
    let (goal, target) = match page {
        "/" | "/index.html" => ("explore", "solutions.html"),
        "/solutions.html" => ("learn", "programs.html"),
        "/hiring.html" => ("network", "community.html"),
        "/programs.html" => ("apply", "hiring.html"),
        "/community.html" => ("invest", "investors.html"),
        "/investors.html" => ("create", "solutions.html"),
        _ => ("explore", "/"),
    };
    NavigationSuggestion {
        goal: goal.to_string(),
        target: target.to_string(),
    }
}

pub fn program_for_level(level: &str) -> &'static str {
    match level.to_lowercase().as_str() {
        "intermediate" => "Consider our Advanced Skills program",
        "advanced" => "Join our Leadership Development track",
        "expert" => "Become a mentor in our community",
        _ => "Start with our Fundamentals bootcamp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_match_counts_substring_overlap() {
        let score = job_match("Rust, Solidity, React", "rust programming, react");
        assert!((score - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(job_match("Rust", "RUST"), 100.0);
        assert_eq!(job_match("", "rust"), 0.0);
        assert_eq!(job_match("rust", ""), 0.0);
    }

    #[test]
    fn skill_gap_is_case_insensitive() {
        let user = vec!["Rust".to_string(), "AI".to_string()];
        let course = vec!["rust".to_string(), "Smart Contracts".to_string()];
        assert_eq!(skill_gap(&user, &course), 0.5);
        assert_eq!(skill_gap(&user, &[]), 0.0);
    }

    #[test]
    fn difficulty_falls_off_per_level() {
        assert_eq!(difficulty_match("beginner", "beginner"), 1.0);
        assert!((difficulty_match("beginner", "advanced") - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(difficulty_match("beginner", "expert"), 0.0);
        assert_eq!(difficulty_match("unknown", "beginner"), 1.0);
    }

    #[test]
    fn engagement_weights() {
        let idle = ActivityCounters::default();
        assert_eq!(engagement_score(&idle), 0.0);

        let busy = ActivityCounters {
            page_views: 500,
            time_spent_seconds: 100,
            interactions: 100,
            contributions: 50,
        };
        assert!((engagement_score(&busy) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn locations_match_on_region_substring() {
        assert!(location_compatible("London, Berlin", "berlin"));
        assert!(!location_compatible("London", "Lagos"));
        assert!(!location_compatible("", "Lagos"));
    }

    #[test]
    fn navigation_map_has_fallback() {
        assert_eq!(next_best_action("/hiring.html").target, "community.html");
        assert_eq!(next_best_action("/nowhere").target, "/");
    }
}
