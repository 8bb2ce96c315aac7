use serde_json::json;

use super::FactStore;

pub const USER_PREFERENCES: &str = "user-preferences";
pub const PLATFORM_STATE: &str = "platform-state";
pub const MARKET_CONDITIONS: &str = "market-conditions";
pub const INVESTOR_NETWORK: &str = "investor-network";
pub const COURSE_CATALOG: &str = "course-catalog";
pub const USER_INTENT: &str = "user-intent";
pub const ERROR_PATTERNS: &str = "error-patterns";

/// Seeds the startup fact base.
pub fn install_defaults(facts: &mut FactStore) {
    facts.add_fact(
        USER_PREFERENCES,
        json!({
            "categories": ["Blockchain", "AI", "Sustainability"],
            "priceRange": [0, 1],
            "experienceLevel": "intermediate"
        }),
    );

    facts.add_fact(
        PLATFORM_STATE,
        json!({
            "activeUsers": 0,
            "totalJobs": 0,
            "totalSolutions": 0,
            "systemHealth": "good"
        }),
    );

    facts.add_fact(
        MARKET_CONDITIONS,
        json!({
            "demandCategories": ["AI", "Blockchain", "Sustainability"],
            "averagePrices": { "AI": 0.6, "Blockchain": 0.8, "Sustainability": 0.4 },
            "trendingSkills": ["Machine Learning", "Smart Contracts", "Carbon Credits"]
        }),
    );

    facts.add_fact(
        INVESTOR_NETWORK,
        json!([
            { "name": "TechVentures", "sectors": ["AI", "Blockchain"], "stages": ["seed", "series-a"], "location": "london, berlin" },
            { "name": "Innovation Capital", "sectors": ["Sustainability", "AI"], "stages": ["pre-seed", "seed"], "location": "lagos, nairobi, london" },
            { "name": "Green Horizon Fund", "sectors": ["Sustainability"], "stages": ["series-a", "series-b"], "location": "amsterdam, berlin" }
        ]),
    );

    facts.add_fact(
        COURSE_CATALOG,
        json!([
            { "title": "Blockchain Fundamentals", "category": "Blockchain", "skills": ["Solidity", "Smart Contracts", "Cryptography"], "difficulty": "beginner" },
            { "title": "AI Ethics", "category": "AI", "skills": ["Machine Learning", "Policy"], "difficulty": "intermediate" },
            { "title": "Startup Leadership", "category": "Business", "skills": ["Leadership", "Fundraising", "Strategy"], "difficulty": "advanced" }
        ]),
    );

    facts.add_fact(
        USER_INTENT,
        json!({
            "apply-job": { "confidence": 0.9, "actions": ["show-application-form", "suggest-similar-jobs"] },
            "post-job": { "confidence": 0.8, "actions": ["validate-job-data", "suggest-improvements"] },
            "buy-solution": { "confidence": 0.95, "actions": ["connect-wallet", "verify-funds", "process-payment"] },
            "learn-skill": { "confidence": 0.7, "actions": ["recommend-courses", "track-progress"] },
            "network": { "confidence": 0.6, "actions": ["suggest-connections", "schedule-meetings"] }
        }),
    );

    facts.add_fact(
        ERROR_PATTERNS,
        json!({
            "wallet-connection": { "retry": 3, "fallback": "manual-connection" },
            "api-failure": { "retry": 2, "fallback": "cached-data" },
            "form-validation": { "immediate": true, "suggestions": true }
        }),
    );
}
