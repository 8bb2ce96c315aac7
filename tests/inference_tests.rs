use std::sync::Arc;

use herald::config::EngineConfig;
use herald::context::{current_user, MemoryKv, UserProfile, CURRENT_USER_KEY};
use herald::facts::MARKET_CONDITIONS;
use herald::kernel::action::{Action, ActionResult, Priority};
use herald::notify::{NotificationKind, RecordingSurface};
use herald::rules::{evaluate_application, RuleError};
use herald::services::Collaborators;
use herald::{Engine, HeraldError};
use serde_json::json;
use tokio::time::Instant;

fn empty_engine(surface: &RecordingSurface) -> Engine {
    Engine::new(
        EngineConfig::default(),
        Box::new(MemoryKv::new()),
        Collaborators::offline(),
        Arc::new(surface.clone()),
    )
    .unwrap()
}

fn default_engine(surface: &RecordingSurface) -> Engine {
    Engine::with_defaults(
        EngineConfig::default(),
        Box::new(MemoryKv::new()),
        Collaborators::offline(),
        Arc::new(surface.clone()),
    )
    .unwrap()
}

fn sign_in(engine: &mut Engine, profile: &UserProfile) {
    let raw = serde_json::to_string(profile).unwrap();
    engine.store_mut().set(CURRENT_USER_KEY, raw).unwrap();
}

fn notify(message: &str) -> ActionResult {
    ActionResult::new(
        Action::Notify {
            message: message.to_string(),
            kind: NotificationKind::Info,
            critical: false,
        },
        Priority::LOW,
    )
}

#[tokio::test]
async fn test_failing_rule_does_not_block_others() {
    let surface = RecordingSurface::new();
    let mut engine = empty_engine(&surface);

    engine
        .rules
        .add_rule("r1", |_ctx| Ok(Some(notify("hello"))));
    engine
        .rules
        .add_rule("r2", |_ctx| Err(RuleError::new("boom")));

    let report = engine.run_round(Instant::now());
    assert_eq!(report.evaluated, vec!["r1", "r2"]);
    assert_eq!(report.failed, vec!["r2"]);
    assert_eq!(report.dispatched, vec![notify("hello")]);

    let shown = surface.shown();
    assert_eq!(shown.len(), 1, "R1's result dispatched exactly once");
    assert_eq!(shown[0].message, "hello");

    // Next round evaluates both again.
    let report = engine.run_round(Instant::now());
    assert_eq!(report.round.number, 2);
    assert_eq!(report.evaluated, vec!["r1", "r2"]);
    assert_eq!(report.failed, vec!["r2"]);
}

#[tokio::test]
async fn test_panicking_rule_is_isolated() {
    let surface = RecordingSurface::new();
    let mut engine = empty_engine(&surface);

    engine.rules.add_rule("first", |_ctx| Ok(Some(notify("first"))));
    engine.rules.add_rule("panics", |_ctx| panic!("rule bug"));
    engine.rules.add_rule("last", |_ctx| Ok(Some(notify("last"))));

    let report = engine.run_round(Instant::now());
    assert_eq!(report.evaluated.len(), 3);
    assert_eq!(report.failed, vec!["panics"]);
    assert_eq!(report.dispatched.len(), 2);

    // One visible, the other waits in FIFO order.
    assert_eq!(surface.shown().len(), 1);
    assert_eq!(engine.queue.pending_len(), 1);

    let snapshot = engine.telemetry.snapshot();
    assert_eq!(snapshot.round_stats.rounds, 1);
    assert_eq!(snapshot.round_stats.rule_failures, 1);
    assert_eq!(snapshot.notification_stats.queued, 2);
    assert_eq!(snapshot.notification_stats.shown, 1);
}

#[tokio::test]
async fn test_none_results_are_discarded() {
    let surface = RecordingSurface::new();
    let mut engine = empty_engine(&surface);
    engine.rules.add_rule("quiet", |_ctx| Ok(None));

    let report = engine.run_round(Instant::now());
    assert_eq!(report.evaluated, vec!["quiet"]);
    assert!(report.dispatched.is_empty());
    assert!(surface.events().is_empty());
}

#[tokio::test]
async fn test_rule_replacement_keeps_order() {
    let surface = RecordingSurface::new();
    let mut engine = empty_engine(&surface);
    engine.rules.add_rule("a", |_ctx| Ok(None));
    engine.rules.add_rule("b", |_ctx| Ok(None));
    engine.rules.add_rule("a", |_ctx| Ok(Some(notify("replaced"))));

    let report = engine.run_round(Instant::now());
    assert_eq!(report.evaluated, vec!["a", "b"]);
    assert_eq!(report.dispatched, vec![notify("replaced")]);
}

#[tokio::test]
async fn test_malformed_profile_reads_as_absent() {
    let surface = RecordingSurface::new();
    let mut engine = default_engine(&surface);
    engine.navigate("/solutions.html");
    engine
        .store_mut()
        .set(CURRENT_USER_KEY, "{not json".to_string())
        .unwrap();

    let ctx = engine.build_context();
    assert!(ctx.user.is_none());
    assert_eq!(ctx.page, "/solutions.html");
    assert_eq!(ctx.user_activity.page_views, 1);
    assert_eq!(ctx.platform_state["activeUsers"], json!(0));

    // Page rules that need a user stay silent.
    let report = engine.run_round(Instant::now());
    assert!(report.failed.is_empty());
    assert!(!report
        .dispatched
        .iter()
        .any(|r| r.action == Action::PromptWalletConnection));
}

#[tokio::test]
async fn test_solution_page_prompts_wallet() {
    let surface = RecordingSurface::new();
    let mut engine = default_engine(&surface);
    engine.navigate("/solutions.html");
    sign_in(
        &mut engine,
        &UserProfile {
            email: Some("ada@example.com".into()),
            ..UserProfile::default()
        },
    );

    let report = engine.run_round(Instant::now());
    let wallet = report
        .dispatched
        .iter()
        .find(|r| r.action == Action::PromptWalletConnection)
        .expect("wallet prompt");
    assert_eq!(wallet.priority, Priority::HIGH);
}

#[tokio::test]
async fn test_low_balance_is_insufficient() {
    let surface = RecordingSurface::new();
    let mut engine = default_engine(&surface);
    engine.navigate("/solutions.html");
    sign_in(
        &mut engine,
        &UserProfile {
            wallet_connected: true,
            balance: Some(0.1),
            ..UserProfile::default()
        },
    );

    let report = engine.run_round(Instant::now());
    assert!(report
        .dispatched
        .iter()
        .any(|r| r.action == Action::InsufficientFunds));

    sign_in(
        &mut engine,
        &UserProfile {
            wallet_connected: true,
            balance: Some(5.0),
            ..UserProfile::default()
        },
    );
    let report = engine.run_round(Instant::now());
    assert!(!report
        .dispatched
        .iter()
        .any(|r| r.action == Action::InsufficientFunds));
}

#[tokio::test]
async fn test_hiring_page_requests_similar_jobs() {
    let surface = RecordingSurface::new();
    let mut engine = default_engine(&surface);
    engine.navigate("/hiring.html");
    sign_in(
        &mut engine,
        &UserProfile {
            skills: Some("rust, tokio".into()),
            ..UserProfile::default()
        },
    );

    let report = engine.run_round(Instant::now());
    assert!(report.dispatched.iter().any(|r| r.action
        == Action::SuggestSimilarJobs {
            category: "rust".into()
        }));
    assert_eq!(report.calls.len(), 1);
}

#[test]
fn test_unknown_action_is_rejected() {
    let err = ActionResult::from_json(&json!({ "action": "teleport", "priority": 3 })).unwrap_err();
    assert!(matches!(err, HeraldError::UnknownAction { ref tag } if tag == "teleport"));

    let ok = ActionResult::from_json(&json!({
        "action": "suggest-program",
        "payload": { "level": "beginner" },
        "priority": 3
    }))
    .unwrap();
    assert_eq!(
        ok.action,
        Action::SuggestProgram {
            level: "beginner".into()
        }
    );
}

#[test]
fn test_application_scoring() {
    let ctx = herald::context::ContextSnapshot::for_page("/hiring.html").with_user(UserProfile {
        skills: Some("rust, sql".into()),
        ..UserProfile::default()
    });

    let weak = evaluate_application("go, kubernetes, terraform", &ctx, false).unwrap();
    assert!(matches!(weak.action, Action::SuggestSkillImprovement { .. }));

    assert!(evaluate_application("rust, sql", &ctx, false).is_none());

    let applied = evaluate_application("rust, sql", &ctx, true).unwrap();
    assert!(matches!(applied.action, Action::Notify { .. }));

    let anonymous = herald::context::ContextSnapshot::for_page("/hiring.html");
    assert!(evaluate_application("rust", &anonymous, false).is_none());
}

#[tokio::test]
async fn test_updated_market_prices_apply_next_round() {
    let surface = RecordingSurface::new();
    let mut engine = default_engine(&surface);
    engine.navigate("/solutions.html");
    sign_in(
        &mut engine,
        &UserProfile {
            wallet_connected: true,
            balance: Some(5.0),
            ..UserProfile::default()
        },
    );

    let report = engine.run_round(Instant::now());
    assert!(!report
        .dispatched
        .iter()
        .any(|r| r.action == Action::InsufficientFunds));

    engine
        .facts
        .update_fact(MARKET_CONDITIONS, json!({ "averagePrices": { "AI": 10.0 } }));

    let report = engine.run_round(Instant::now());
    assert!(
        report
            .dispatched
            .iter()
            .any(|r| r.action == Action::InsufficientFunds),
        "new price floor should apply without re-registering rules"
    );
}

#[tokio::test]
async fn test_string_balance_keeps_user_signed_in() {
    let surface = RecordingSurface::new();
    let mut engine = default_engine(&surface);
    engine.navigate("/solutions.html");
    engine
        .store_mut()
        .set(
            CURRENT_USER_KEY,
            r#"{"email":"a@b.c","walletConnected":true,"balance":"0.1"}"#.to_string(),
        )
        .unwrap();

    let user = current_user(engine.store()).expect("profile parses");
    assert_eq!(user.balance, Some(0.1));

    let report = engine.run_round(Instant::now());
    assert!(report
        .dispatched
        .iter()
        .any(|r| r.action == Action::InsufficientFunds));
}
