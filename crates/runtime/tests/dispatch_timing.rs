mod common;

use std::sync::Arc;

use tokio::time::{Duration, Instant};

use anim_core::{AnimConfig, CommandParser, TargetingContext};
use anim_runtime::{AnimEngine, CommandOutcome, EngineConfig};

use common::{RecordingPlayback, default_catalog, duel, harness, token};

#[tokio::test(start_paused = true)]
async fn test_instances_are_spaced_by_delay() {
    let h = harness();
    let started = Instant::now();

    let report = h
        .engine
        .process_line("/anim bolt 3x:0.25", &duel(150.0))
        .into_report()
        .unwrap();
    report.join().await.unwrap();

    let times = h.playback.times();
    assert_eq!(times.len(), 3);
    assert_eq!(times[0] - started, Duration::ZERO);
    assert_eq!(times[1] - times[0], Duration::from_millis(250));
    assert_eq!(times[2] - times[1], Duration::from_millis(250));
    // No trailing wait after the last instance.
    assert_eq!(Instant::now() - started, Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_process_line_returns_before_playback_finishes() {
    let h = harness();

    let report = h
        .engine
        .process_line("/anim bolt 4x:1", &duel(150.0))
        .into_report()
        .unwrap();
    assert_eq!(report.used.len(), 4);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(h.playback.instances().len(), 2);

    report.join().await.unwrap();
    assert_eq!(h.playback.instances().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_sequences_for_destinations_run_independently() {
    let h = harness();
    let scene = TargetingContext {
        last_actor: Some(token(1, "Wizard", 0.0, 0.0)),
        selection: Vec::new(),
        targets: vec![token(2, "Goblin", 150.0, 0.0), token(3, "Orc", 0.0, 350.0)],
        privileged: false,
    };
    let started = Instant::now();

    let report = h
        .engine
        .process_line("/anim bolt 2x:1", &scene)
        .into_report()
        .unwrap();
    report.join().await.unwrap();

    let played = h.playback.played.lock().unwrap().clone();
    assert_eq!(played.len(), 4);
    let per_target = |distance: f64| -> Vec<Duration> {
        played
            .iter()
            .filter(|(_, instance)| instance.distance == distance)
            .map(|(at, _)| *at - started)
            .collect()
    };
    assert_eq!(per_target(150.0), vec![Duration::ZERO, Duration::from_secs(1)]);
    assert_eq!(per_target(350.0), vec![Duration::ZERO, Duration::from_secs(1)]);
    // Both sequences share the same one-second window.
    assert_eq!(Instant::now() - started, Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_default_delay_comes_from_config() {
    let playback = Arc::new(RecordingPlayback::default());
    let engine = AnimEngine::builder()
        .config(EngineConfig {
            anim: AnimConfig::with_default_delay_ms(200),
            rng_seed: Some(1),
            ..EngineConfig::default()
        })
        .catalog(default_catalog())
        .playback(playback.clone())
        .build();

    let CommandOutcome::Dispatched(report) = engine.process_line("/anim bolt 2x", &duel(150.0))
    else {
        panic!("expected dispatch");
    };
    report.join().await.unwrap();

    let times = playback.times();
    assert_eq!(times[1] - times[0], Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_oversized_count_is_clamped_before_dispatch() {
    let playback = Arc::new(RecordingPlayback::default());
    let engine = AnimEngine::builder()
        .config(EngineConfig {
            anim: AnimConfig::with_default_delay_ms(0).with_max_count(3),
            rng_seed: Some(1),
            ..EngineConfig::default()
        })
        .catalog(default_catalog())
        .playback(playback.clone())
        .build();

    let CommandOutcome::Dispatched(report) =
        engine.process_line("/anim bolt 4294967295x", &duel(150.0))
    else {
        panic!("expected dispatch");
    };
    assert_eq!(report.used.len(), 3);
    report.join().await.unwrap();
    assert_eq!(playback.instances().len(), 3);

    let mut command = CommandParser::default().parse("/anim bolt").unwrap();
    command.count = u32::MAX;
    let report = engine.execute(command, &duel(150.0)).into_report().unwrap();
    assert_eq!(report.used.len(), 3);
    report.join().await.unwrap();
}
