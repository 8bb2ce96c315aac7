use std::sync::Arc;

use anyhow::Result;
use herald::config::EngineConfig;
use herald::context::{ActivityEvent, FileKv, KvStore, MemoryKv};
use herald::kernel::action::ActionResult;
use herald::kernel::event::Event;
use herald::notify::TracingSurface;
use herald::services::Collaborators;
use herald::Engine;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

enum Command {
    Send(Event),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let event = match verb {
        "go" if !rest.is_empty() => Event::Navigate(rest.to_string()),
        "click" if rest.is_empty() => Event::Activity(ActivityEvent::Interaction),
        "click" => Event::Activity(ActivityEvent::Click(rest.to_string())),
        "contribute" => Event::Activity(ActivityEvent::Contribution),
        "dismiss" => Event::DismissCurrent,
        "action" => {
            let value: serde_json::Value = match serde_json::from_str(rest) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Invalid action JSON: {}", e);
                    return None;
                }
            };
            match ActionResult::from_json(&value) {
                Ok(result) => Event::Action(result),
                Err(e) => {
                    tracing::warn!("Rejected action: {}", e);
                    return None;
                }
            }
        }
        "quit" | "exit" => return Some(Command::Quit),
        _ => {
            println!("Commands: go <path> | click [action] | contribute | dismiss | action <json> | quit");
            return None;
        }
    };
    Some(Command::Send(event))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::from_env()?;

    let store: Box<dyn KvStore> = match &config.storage_dir {
        Some(dir) => Box::new(FileKv::open(dir)?),
        None => Box::new(MemoryKv::new()),
    };
    let collaborators = Collaborators::from_config(&config);

    let engine = Engine::with_defaults(config, store, collaborators, Arc::new(TracingSurface))?;
    let handle = engine.start();
    handle.navigate("/").await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Herald running. Type 'go /hiring.html', 'click click-buy', 'dismiss' or 'quit'.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_command(line) {
                    Some(Command::Send(event)) => handle.send(event).await?,
                    Some(Command::Quit) => break,
                    None => {}
                }
            }
        }
    }

    let engine = handle.stop().await?;
    let snapshot = engine.telemetry.snapshot();
    tracing::info!(
        rounds = snapshot.round_stats.rounds,
        rule_failures = snapshot.round_stats.rule_failures,
        shown = snapshot.notification_stats.shown,
        rejected = snapshot.notification_stats.rejected,
        "Session summary"
    );
    Ok(())
}
