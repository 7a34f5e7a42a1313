mod common;

use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

use anim_core::{Point, TargetingContext};
use anim_runtime::{
    AnimEngine, CommandOutcome, EngineError, ErrorKind, Event, EventBus, NoticeLevel, NoticeLog,
    Topic,
};

use common::{RecordingBroadcaster, RecordingPlayback, catalog, default_catalog, duel, harness, harness_with, token};

fn dispatched(outcome: CommandOutcome) -> anim_runtime::DispatchReport {
    match outcome {
        CommandOutcome::Dispatched(report) => report,
        other => panic!("expected dispatch, got {:?}", other),
    }
}

fn failed(outcome: CommandOutcome) -> EngineError {
    match outcome {
        CommandOutcome::Failed(err) => err,
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_centered_repeat_plays_on_target() {
    let h = harness();

    let report = dispatched(h.engine.process_line("/anim fireball c90 2x:0.5", &duel(300.0)));
    assert_eq!(report.source, "Wizard");
    assert_eq!(report.destinations, vec!["Goblin".to_string()]);
    assert_eq!(report.sequence_count(), 1);
    assert_eq!(report.used.len(), 2);
    assert_ne!(report.used[0], report.used[1], "two-asset pool must not repeat");

    let played = report.join().await.unwrap();
    assert_eq!(played.len(), 1);
    assert_eq!(played[0].len(), 2);

    let instances = h.playback.instances();
    assert_eq!(instances.len(), 2);
    for (index, instance) in instances.iter().enumerate() {
        assert_eq!(instance.sequence, index as u32);
        assert_eq!(instance.position, Point::new(350.0, 50.0));
        assert!((instance.rotation_rad - FRAC_PI_2).abs() < 1e-9);
        assert_eq!(instance.delay_ms, 500);
        assert_eq!(instance.scale.x, 1.0);
        assert_eq!(instance.anchor.x, 0.5);
    }
    assert_eq!(h.broadcaster.sent(), instances);
}

#[tokio::test]
async fn test_targeted_picks_largest_fit_below_native_width() {
    let h = harness();

    let report = dispatched(h.engine.process_line("/anim bolt", &duel(150.0)));
    assert_eq!(report.used, vec!["bolt_200.webm".to_string()]);
    report.join().await.unwrap();

    let instance = &h.playback.instances()[0];
    assert_eq!(instance.position, Point::new(50.0, 50.0));
    assert_eq!(instance.rotation_rad, 0.0);
    assert!((instance.scale.x - 0.75).abs() < 1e-9);
    assert!((instance.scale.y.abs() - 0.75).abs() < 1e-9);
    assert_eq!(instance.anchor.x, 0.0);
}

#[tokio::test]
async fn test_diagnostics_follow_pipeline_order() {
    let h = harness();

    let report = dispatched(h.engine.process_line("/anim bolt", &duel(150.0)));
    report.join().await.unwrap();

    let traces = h.notices.texts(NoticeLevel::Trace);
    assert_eq!(traces[0], "Src:Wizard");
    assert_eq!(traces[1], "Dest:Goblin");
    assert_eq!(traces[2], "Opts: T");
    assert_eq!(traces[3], "Possible:");
    assert_eq!(traces[4], "bolt_100.webm\nbolt_200.webm\nbolt_400.webm");
    assert_eq!(traces[5], "Best fit (width:200)");
    assert_eq!(traces[6], "bolt_200.webm");
    assert_eq!(traces[7], "Used:\nbolt_200.webm");
}

#[tokio::test]
async fn test_quiet_prefix_suppresses_private_traces() {
    let h = harness();

    let report = dispatched(h.engine.process_line("!/anim bolt *2", &duel(150.0)));
    report.join().await.unwrap();

    assert!(h.notices.texts(NoticeLevel::Trace).is_empty());
    assert_eq!(h.playback.instances().len(), 1);
}

#[tokio::test]
async fn test_mode_mismatch_is_reported_and_ignored() {
    let h = harness();

    let report = dispatched(h.engine.process_line("/anim bolt *3", &duel(150.0)));
    report.join().await.unwrap();

    let traces = h.notices.texts(NoticeLevel::Trace);
    assert!(traces[0].contains("Centered"), "unexpected first trace: {}", traces[0]);
    let instance = &h.playback.instances()[0];
    assert!((instance.scale.x - 0.75).abs() < 1e-9);
}

#[tokio::test]
async fn test_one_sequence_per_destination() {
    let h = harness();
    let scene = TargetingContext {
        last_actor: Some(token(1, "Wizard", 0.0, 0.0)),
        selection: Vec::new(),
        targets: vec![token(2, "Goblin", 150.0, 0.0), token(3, "Orc", 0.0, 350.0)],
        privileged: false,
    };

    let report = dispatched(h.engine.process_line("/anim bolt", &scene));
    assert_eq!(report.sequence_count(), 2);
    assert_eq!(report.destinations, vec!["Goblin".to_string(), "Orc".to_string()]);
    assert_eq!(
        report.used,
        vec!["bolt_200.webm".to_string(), "bolt_400.webm".to_string()]
    );

    let played = report.join().await.unwrap();
    assert_eq!(played, vec![vec!["bolt_200.webm".to_string()], vec!["bolt_400.webm".to_string()]]);
}

#[tokio::test]
async fn test_listing_strips_namespace_root() {
    let h = harness();

    match h.engine.process_line("/anim list", &TargetingContext::default()) {
        CommandOutcome::Listing(lines) => {
            assert_eq!(lines.len(), 6);
            assert_eq!(lines[0], "Total: 5");
            assert_eq!(lines[1], "jb2a_patreon/Fire/fireball_explosion_01.webm");
        }
        other => panic!("expected listing, got {:?}", other),
    }
}

#[tokio::test]
async fn test_literal_path_bypasses_search() {
    let h = harness();

    let report = dispatched(h.engine.process_line(
        "/anim /modules/custom/Arrow/arrow.webm,W:300 @250,50",
        &duel(150.0),
    ));
    assert_eq!(report.used, vec!["arrow.webm".to_string()]);
    assert_eq!(report.destinations, vec!["User click".to_string()]);
}

#[tokio::test]
async fn test_other_lines_are_not_matched() {
    let h = harness();

    assert!(matches!(
        h.engine.process_line("/animate fireball", &duel(150.0)),
        CommandOutcome::NotMatched
    ));
    assert!(matches!(
        h.engine.process_line("hello there", &duel(150.0)),
        CommandOutcome::NotMatched
    ));
    assert!(h.notices.snapshot().is_empty());
}

#[tokio::test]
async fn test_unknown_pattern_notifies_user() {
    let h = harness();

    let err = failed(h.engine.process_line("/anim dragon", &duel(150.0)));
    assert!(matches!(err, EngineError::NoMatch { ref pattern } if pattern == "dragon"));
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert_eq!(
        h.notices.texts(NoticeLevel::Error),
        vec!["Unable to find animation for 'dragon'".to_string()]
    );
    assert!(h.playback.instances().is_empty());
}

#[tokio::test]
async fn test_missing_asset_name() {
    let h = harness();

    let err = failed(h.engine.process_line("/anim 2x", &duel(150.0)));
    assert!(matches!(err, EngineError::MissingAssetName));
    assert_eq!(
        h.notices.texts(NoticeLevel::Error),
        vec!["Must provide animation name".to_string()]
    );
}

#[tokio::test]
async fn test_start_offset_of_one_is_rejected() {
    let h = harness();

    let err = failed(h.engine.process_line("/anim bolt -1", &duel(150.0)));
    assert!(matches!(err, EngineError::InvalidStartOffset { offset } if offset == 1.0));
}

#[tokio::test]
async fn test_preconditions_fail_before_resolution() {
    let notices = Arc::new(NoticeLog::default());
    let engine = AnimEngine::builder()
        .catalog(default_catalog())
        .notifier(notices.clone())
        .build();

    let err = failed(engine.process_line("/anim bolt", &duel(150.0)));
    assert!(matches!(err, EngineError::PlaybackUnavailable));
    assert_eq!(err.kind(), ErrorKind::Precondition);

    let h = harness_with(catalog(&[]), RecordingBroadcaster::default());
    let err = failed(h.engine.process_line("/anim list", &duel(150.0)));
    assert!(matches!(err, EngineError::EmptyCatalog));
    assert_eq!(err.kind(), ErrorKind::Precondition);
}

#[tokio::test]
async fn test_targeted_effect_needs_two_tokens() {
    let h = harness();
    let wizard = token(1, "Wizard", 0.0, 0.0);
    let scene = TargetingContext {
        last_actor: Some(wizard.clone()),
        selection: Vec::new(),
        targets: vec![wizard],
        privileged: false,
    };

    let err = failed(h.engine.process_line("/anim bolt", &scene));
    assert!(matches!(err, EngineError::Targeting(_)));
    assert_eq!(
        h.notices.texts(NoticeLevel::Error),
        vec![
            "Source and Destination cannot be the same token with using a Targeted animation"
                .to_string()
        ]
    );

    // The same pair is fine for a centered effect.
    let report = dispatched(h.engine.process_line("/anim fireball c @self", &scene));
    report.join().await.unwrap();
    assert_eq!(h.playback.instances()[0].position, Point::new(50.0, 50.0));
}

#[tokio::test]
async fn test_failed_broadcast_still_plays_locally() {
    let h = harness_with(default_catalog(), RecordingBroadcaster::rejecting());

    let report = dispatched(h.engine.process_line("/anim bolt 3x:0", &duel(150.0)));
    let played = report.join().await.unwrap();

    assert_eq!(played[0].len(), 3);
    assert_eq!(h.playback.instances().len(), 3);
    assert!(h.broadcaster.sent().is_empty());
}

#[tokio::test]
async fn test_default_broadcaster_publishes_on_event_bus() {
    let playback = Arc::new(RecordingPlayback::default());
    let engine = AnimEngine::builder()
        .catalog(default_catalog())
        .playback(playback.clone())
        .build();
    let mut effects = engine.event_bus().subscribe(Topic::Effects);

    let report = dispatched(engine.process_line("/anim bolt", &duel(150.0)));
    report.join().await.unwrap();

    match effects.recv().await.unwrap() {
        Event::Effect(instance) => {
            assert_eq!(instance.file_name(), "bolt_200.webm");
            assert_eq!(playback.instances(), vec![instance]);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_shared_bus_carries_notices() {
    let bus = EventBus::with_capacity(16);
    let mut notices = bus.subscribe(Topic::Notices);
    let engine = AnimEngine::builder()
        .event_bus(bus.clone())
        .catalog(default_catalog())
        .playback(Arc::new(RecordingPlayback::default()))
        .notifier(Arc::new(bus))
        .build();
    let mut effects = engine.event_bus().subscribe(Topic::Effects);

    let err = failed(engine.process_line("/anim dragon", &duel(150.0)));
    assert_eq!(err.kind(), ErrorKind::Resolution);
    match notices.recv().await.unwrap() {
        Event::Notice(notice) => {
            assert_eq!(notice.level, NoticeLevel::Error);
            assert!(!notice.is_private());
            assert_eq!(notice.text, "Unable to find animation for 'dragon'");
        }
        other => panic!("unexpected event {:?}", other),
    }

    let report = dispatched(engine.process_line("/anim bolt", &duel(150.0)));
    report.join().await.unwrap();
    assert!(matches!(effects.recv().await.unwrap(), Event::Effect(_)));
    match notices.recv().await.unwrap() {
        Event::Notice(notice) => {
            assert!(notice.is_private());
            assert_eq!(notice.text, "Src:Wizard");
        }
        other => panic!("unexpected event {:?}", other),
    }
}
