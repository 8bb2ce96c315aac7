use serde::Deserialize;
use serde_json::Value;

use super::logic::{
    difficulty_match, engagement_score, job_match, location_compatible, next_best_action,
    skill_gap, ENGAGEMENT_SUGGESTIONS,
};
use super::registry::{RuleOutcome, RuleSet};
use crate::context::ContextSnapshot;
use crate::facts::{FactStore, COURSE_CATALOG, INVESTOR_NETWORK, MARKET_CONDITIONS};
use crate::kernel::action::{Action, ActionResult, Course, InvestorMatch, Priority};

pub const SOLUTIONS_PAGE: &str = "/solutions.html";
pub const PROGRAMS_PAGE: &str = "/programs.html";
pub const HIRING_PAGE: &str = "/hiring.html";
pub const COMMUNITY_PAGE: &str = "/community.html";
pub const INVESTORS_PAGE: &str = "/investors.html";

#[derive(Debug, Clone, Deserialize)]
struct InvestorProfile {
    name: String,
    #[serde(default)]
    sectors: Vec<String>,
    #[serde(default)]
    stages: Vec<String>,
    #[serde(default)]
    location: String,
}

fn fire(action: Action, priority: Priority) -> RuleOutcome {
    Ok(Some(ActionResult::new(action, priority)))
}

/// Lowest average category price in the market facts.
fn price_floor(facts: &FactStore) -> Option<f64> {
    facts
        .get(MARKET_CONDITIONS)?
        .get("averagePrices")?
        .as_object()?
        .values()
        .filter_map(Value::as_f64)
        .reduce(f64::min)
}

pub(crate) fn fact_list<T: for<'de> Deserialize<'de>>(facts: &FactStore, name: &str) -> Vec<T> {
    facts
        .get(name)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

/// Registers the platform rules. Fact-derived inputs come from the snapshot,
/// so a replaced fact takes effect on the next round.
pub fn register_builtin_rules(rules: &mut RuleSet) {
    rules.add_rule("engagement-optimization", |ctx: &ContextSnapshot| {
        let score = engagement_score(&ctx.user_activity);
        if score < 0.3 {
            let suggestions = ENGAGEMENT_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
            return fire(Action::BoostEngagement { suggestions }, Priority::MEDIUM);
        }
        if score > 0.8 {
            return fire(Action::LeadershipOpportunity, Priority::HIGH);
        }
        fire(Action::MaintainEngagement, Priority::LOW)
    });

    rules.add_rule("navigation-optimization", |ctx: &ContextSnapshot| {
        fire(Action::SuggestNavigation(next_best_action(&ctx.page)), Priority::LOW)
    });

    rules.add_rule("solution-purchase", |ctx: &ContextSnapshot| {
        if ctx.page != SOLUTIONS_PAGE {
            return Ok(None);
        }
        let Some(user) = &ctx.user else {
            return Ok(None);
        };
        if !user.wallet_connected {
            return fire(Action::PromptWalletConnection, Priority::HIGH);
        }
        match (user.balance, price_floor(&ctx.facts)) {
            (Some(balance), Some(floor)) if balance < floor => {
                fire(Action::InsufficientFunds, Priority::HIGH)
            }
            _ => Ok(None),
        }
    });

    rules.add_rule("program-recommendation", |ctx: &ContextSnapshot| {
        if ctx.page != PROGRAMS_PAGE {
            return Ok(None);
        }
        match ctx.user.as_ref().and_then(|u| u.experience_level.clone()) {
            Some(level) => fire(Action::SuggestProgram { level }, Priority::MEDIUM),
            None => Ok(None),
        }
    });

    rules.add_rule("course-recommendation", |ctx: &ContextSnapshot| {
        if ctx.page != PROGRAMS_PAGE {
            return Ok(None);
        }
        let Some(user) = &ctx.user else {
            return Ok(None);
        };
        let skills = user.skill_list();
        let level = user.experience_level.as_deref().unwrap_or("beginner");

        let catalog: Vec<Course> = fact_list(&ctx.facts, COURSE_CATALOG);
        let courses: Vec<Course> = catalog
            .into_iter()
            .filter(|course| {
                let difficulty = course.difficulty.as_deref().unwrap_or("beginner");
                skill_gap(&skills, &course.skills) > 0.3 && difficulty_match(level, difficulty) > 0.7
            })
            .collect();

        if courses.is_empty() {
            return Ok(None);
        }
        fire(Action::ShowRecommendations { courses }, Priority::MEDIUM)
    });

    rules.add_rule("investor-matching", |ctx: &ContextSnapshot| {
        if ctx.page != INVESTORS_PAGE {
            return Ok(None);
        }
        let Some(user) = ctx.user.as_ref().filter(|u| u.user_type.as_deref() == Some("startup"))
        else {
            return Ok(None);
        };
        let Some(sector) = &user.sector else {
            return Ok(None);
        };

        let investors: Vec<InvestorProfile> = fact_list(&ctx.facts, INVESTOR_NETWORK);
        let matches: Vec<InvestorMatch> = investors
            .iter()
            .filter(|inv| inv.sectors.iter().any(|s| s.eq_ignore_ascii_case(sector)))
            .filter(|inv| match &user.stage {
                Some(stage) => inv.stages.iter().any(|s| s.eq_ignore_ascii_case(stage)),
                None => true,
            })
            .filter(|inv| match &user.location {
                Some(location) => location_compatible(&inv.location, location),
                None => true,
            })
            .map(|inv| InvestorMatch {
                name: inv.name.clone(),
                sector: sector.clone(),
                stage: user.stage.clone(),
            })
            .collect();

        fire(Action::ShowMatches { matches }, Priority::HIGH)
    });

    rules.add_rule("similar-jobs", |ctx: &ContextSnapshot| {
        if ctx.page != HIRING_PAGE {
            return Ok(None);
        }
        match ctx.user.as_ref().and_then(|u| u.skill_list().into_iter().next()) {
            Some(category) => fire(Action::SuggestSimilarJobs { category }, Priority::LOW),
            None => Ok(None),
        }
    });

    rules.add_rule("connection-suggestions", |ctx: &ContextSnapshot| {
        if ctx.page != COMMUNITY_PAGE {
            return Ok(None);
        }
        let Some(user) = &ctx.user else {
            return Ok(None);
        };
        match &user.email {
            Some(email) => fire(
                Action::SuggestConnections {
                    email: email.clone(),
                    user_type: user.user_type.clone(),
                },
                Priority::LOW,
            ),
            None => Ok(None),
        }
    });
}

/// Score a posted job against the signed-in user. Exposed for page code that
/// evaluates a specific listing rather than the ambient context.
pub fn evaluate_application(requirements: &str, ctx: &ContextSnapshot, has_applied: bool) -> Option<ActionResult> {
    let skills = ctx.user.as_ref()?.skills.clone().unwrap_or_default();
    let score = job_match(requirements, &skills);

    let result = if score < 30.0 {
        ActionResult::new(Action::SuggestSkillImprovement { match_score: score }, Priority::MEDIUM)
    } else if score < 60.0 {
        ActionResult::new(
            Action::Notify {
                message: format!("Partial match ({score:.0}%) for this role"),
                kind: crate::notify::NotificationKind::Info,
                critical: false,
            },
            Priority::LOW,
        )
    } else if has_applied {
        ActionResult::new(
            Action::Notify {
                message: "You have already applied to this role".to_string(),
                kind: crate::notify::NotificationKind::Info,
                critical: false,
            },
            Priority::MEDIUM,
        )
    } else {
        return None;
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ActivityCounters, UserProfile};
    use crate::facts::install_defaults;

    fn builtin() -> RuleSet {
        let mut rules = RuleSet::new();
        register_builtin_rules(&mut rules);
        rules
    }

    fn run(rules: &RuleSet, name: &str, ctx: &ContextSnapshot) -> Option<Action> {
        let mut facts = FactStore::new();
        install_defaults(&mut facts);
        let ctx = ctx.clone().with_facts(facts);
        rules.get(name).unwrap().evaluate(&ctx).unwrap().map(|r| r.action)
    }

    #[test]
    fn engagement_thresholds() {
        let rules = builtin();
        let idle = ContextSnapshot::for_page("/");
        assert!(matches!(run(&rules, "engagement-optimization", &idle), Some(Action::BoostEngagement { .. })));

        let busy = ContextSnapshot::for_page("/").with_activity(ActivityCounters {
            page_views: 100,
            time_spent_seconds: 100,
            interactions: 100,
            contributions: 100,
        });
        assert_eq!(run(&rules, "engagement-optimization", &busy), Some(Action::LeadershipOpportunity));
    }

    #[test]
    fn purchase_rule_checks_wallet_then_balance() {
        let rules = builtin();
        let user = UserProfile {
            email: Some("a@b.c".into()),
            ..UserProfile::default()
        };
        let ctx = ContextSnapshot::for_page(SOLUTIONS_PAGE).with_user(user.clone());
        assert_eq!(run(&rules, "solution-purchase", &ctx), Some(Action::PromptWalletConnection));

        let poor = UserProfile {
            wallet_connected: true,
            balance: Some(0.1),
            ..user.clone()
        };
        let ctx = ContextSnapshot::for_page(SOLUTIONS_PAGE).with_user(poor);
        assert_eq!(run(&rules, "solution-purchase", &ctx), Some(Action::InsufficientFunds));

        let rich = UserProfile {
            wallet_connected: true,
            balance: Some(2.0),
            ..user
        };
        let ctx = ContextSnapshot::for_page(SOLUTIONS_PAGE).with_user(rich);
        assert_eq!(run(&rules, "solution-purchase", &ctx), None);

        assert_eq!(run(&rules, "solution-purchase", &ContextSnapshot::for_page("/")), None);
    }

    #[test]
    fn investor_matching_filters_directory() {
        let rules = builtin();
        let founder = UserProfile {
            user_type: Some("startup".into()),
            sector: Some("Sustainability".into()),
            stage: Some("seed".into()),
            location: Some("Lagos".into()),
            ..UserProfile::default()
        };
        let ctx = ContextSnapshot::for_page(INVESTORS_PAGE).with_user(founder);
        let Some(Action::ShowMatches { matches }) = run(&rules, "investor-matching", &ctx) else {
            panic!("expected matches");
        };
        let names: Vec<_> = matches.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Innovation Capital"]);
    }

    #[test]
    fn course_recommendation_uses_gap_and_level() {
        let rules = builtin();
        let learner = UserProfile {
            skills: Some("Solidity".into()),
            experience_level: Some("beginner".into()),
            ..UserProfile::default()
        };
        let ctx = ContextSnapshot::for_page(PROGRAMS_PAGE).with_user(learner);
        let Some(Action::ShowRecommendations { courses }) = run(&rules, "course-recommendation", &ctx) else {
            panic!("expected recommendations");
        };
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Blockchain Fundamentals");
    }

    #[test]
    fn application_scoring() {
        let ctx = ContextSnapshot::for_page(HIRING_PAGE).with_user(UserProfile {
            skills: Some("rust, react".into()),
            ..UserProfile::default()
        });
        assert!(matches!(
            evaluate_application("go, python, java, c", &ctx, false).map(|r| r.action),
            Some(Action::SuggestSkillImprovement { .. })
        ));
        assert!(evaluate_application("rust, react", &ctx, false).is_none());
        assert!(evaluate_application("rust, react", &ctx, true).is_some());
    }
}
