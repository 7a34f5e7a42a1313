//! Terminal driver for the animation engine.
//!
//! Loads manifests and a scene, then reads lines from stdin: chat commands go
//! to the engine, everything else moves the simulated scene or clicks the map.
//! Local playback and peer receipts are printed as JSON lines.
mod config;
mod logging;
mod repl;
mod scene;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use anim_core::EffectInstance;
use anim_runtime::{
    AnimEngine, CommandOutcome, DirectoryFetcher, EngineConfig, Event, EventBus, LocalPlayback,
    Notice, Notifier, Topic, TracingNotifier, load_catalog,
};

use config::CliConfig;
use repl::{HELP, ReplCommand};
use scene::Scene;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    let _guard = logging::setup_logging(config.session_id.as_deref())?;

    let manifest_dir = config.manifest_dir();
    tracing::info!("Manifest directory: {}", manifest_dir.display());
    tracing::info!("Modules: {}", config.modules);
    let catalog = load_catalog(Arc::new(DirectoryFetcher::new(manifest_dir)), &config.modules).await;

    let mut scene = match &config.scene_file {
        Some(path) => Scene::load(path).await?,
        None => Scene::default(),
    };

    let engine_config = EngineConfig {
        rng_seed: config.rng_seed,
        ..EngineConfig::default()
    };
    let bus = EventBus::with_capacity(engine_config.event_buffer_size);
    spawn_console(&bus);

    let engine = AnimEngine::builder()
        .config(engine_config)
        .event_bus(bus.clone())
        .catalog(catalog)
        .playback(Arc::new(StdoutPlayback))
        .notifier(Arc::new(bus))
        .build();

    spawn_peer(&engine);

    println!("anim ready: {} assets, {} tokens (type 'help')", engine.catalog().len(), scene.tokens.len());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match ReplCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("error: {:#}", err);
                continue;
            }
        };

        let result = match command {
            ReplCommand::Chat(line) => {
                report(engine.process_line(&line, &scene.targeting_context(config.privileged)));
                Ok(())
            }
            ReplCommand::Click(point) => {
                if !engine.click(point) {
                    println!("nothing is waiting for a click");
                }
                Ok(())
            }
            ReplCommand::Select(ids) => scene.select(ids),
            ReplCommand::Target(ids) => scene.target(ids),
            ReplCommand::Actor(id) => scene.set_actor(id),
            ReplCommand::Tokens => {
                for token in &scene.tokens {
                    println!("{:>4}  {:<16} ({}, {}) {}x{}", token.id.0, token.name, token.x, token.y, token.w, token.h);
                }
                Ok(())
            }
            ReplCommand::Help => {
                println!("{}", HELP);
                Ok(())
            }
            ReplCommand::Quit => break,
            ReplCommand::Empty => Ok(()),
        };
        if let Err(err) = result {
            println!("error: {:#}", err);
        }
    }

    tracing::info!("Session closed");
    Ok(())
}

/// Prints what the engine did with a chat line.
fn report(outcome: CommandOutcome) {
    match outcome {
        CommandOutcome::NotMatched => println!("not an animation command"),
        CommandOutcome::Listing(lines) => lines.iter().for_each(|line| println!("{}", line)),
        CommandOutcome::Dispatched(report) => {
            tracing::info!(
                source = %report.source,
                destinations = ?report.destinations,
                "dispatched {} effect(s)",
                report.used.len()
            );
        }
        CommandOutcome::AwaitingClick(pending) => {
            tokio::spawn(async move {
                match pending.await {
                    Ok(CommandOutcome::Cancelled) => tracing::info!("click request cancelled"),
                    Ok(outcome) => report(outcome),
                    Err(err) => tracing::warn!("deferred command failed: {}", err),
                }
            });
        }
        CommandOutcome::Cancelled => tracing::info!("click request cancelled"),
        // Already surfaced through the notifier.
        CommandOutcome::Failed(_) => {}
    }
}

/// Plays effects by printing their descriptor.
struct StdoutPlayback;

impl LocalPlayback for StdoutPlayback {
    fn play(&self, instance: &EffectInstance) {
        match serde_json::to_string(instance) {
            Ok(json) => println!("play {}", json),
            Err(err) => tracing::warn!("failed to encode effect: {}", err),
        }
    }
}

/// Shows notices from the bus to the user and mirrors them into the log.
fn spawn_console(bus: &EventBus) {
    let mut notices = bus.subscribe(Topic::Notices);
    tokio::spawn(async move {
        loop {
            match notices.recv().await {
                Ok(Event::Notice(notice)) => show(notice),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => tracing::warn!("console lagged, skipped {} notices", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn show(notice: Notice) {
    let text = notice.text.replace('\n', "\n    ");
    if notice.is_private() {
        println!("  {}", text);
    } else {
        println!("[{}] {}", notice.level, text);
    }
    TracingNotifier.notify(notice);
}

/// Simulated remote peer listening on the effects topic.
fn spawn_peer(engine: &AnimEngine) {
    let mut effects = engine.event_bus().subscribe(Topic::Effects);
    tokio::spawn(async move {
        loop {
            match effects.recv().await {
                Ok(Event::Effect(instance)) => {
                    tracing::info!(file = %instance.file_name(), seq = instance.sequence, "peer received effect");
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => tracing::warn!("peer lagged, skipped {} effects", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });
}
