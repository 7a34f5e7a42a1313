//! Recording collaborators and scene fixtures shared by the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::Instant;

use anim_core::{AssetCatalog, AssetEntry, EffectInstance, EntityId, PositionedEntity, TargetingContext};
use anim_runtime::{
    AnimEngine, BroadcastError, EffectBroadcaster, EngineConfig, LocalPlayback, NoticeLog,
};

/// Remembers every broadcast; optionally rejects them all.
#[derive(Default)]
pub struct RecordingBroadcaster {
    pub sent: Mutex<Vec<EffectInstance>>,
    pub reject: bool,
}

impl RecordingBroadcaster {
    pub fn rejecting() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    pub fn sent(&self) -> Vec<EffectInstance> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EffectBroadcaster for RecordingBroadcaster {
    async fn broadcast(&self, instance: &EffectInstance) -> Result<(), BroadcastError> {
        if self.reject {
            return Err(BroadcastError::Rejected("peer offline".to_string()));
        }
        self.sent.lock().unwrap().push(instance.clone());
        Ok(())
    }
}

/// Remembers every local playback with the (possibly paused) clock time.
#[derive(Default)]
pub struct RecordingPlayback {
    pub played: Mutex<Vec<(Instant, EffectInstance)>>,
}

impl RecordingPlayback {
    pub fn instances(&self) -> Vec<EffectInstance> {
        self.played
            .lock()
            .unwrap()
            .iter()
            .map(|(_, instance)| instance.clone())
            .collect()
    }

    pub fn times(&self) -> Vec<Instant> {
        self.played.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }
}

impl LocalPlayback for RecordingPlayback {
    fn play(&self, instance: &EffectInstance) {
        self.played
            .lock()
            .unwrap()
            .push((Instant::now(), instance.clone()));
    }
}

pub struct Harness {
    pub engine: AnimEngine,
    pub broadcaster: Arc<RecordingBroadcaster>,
    pub playback: Arc<RecordingPlayback>,
    pub notices: Arc<NoticeLog>,
}

pub fn catalog(records: &[(&str, u32)]) -> Arc<AssetCatalog> {
    Arc::new(
        records
            .iter()
            .map(|(path, width)| AssetEntry::new(*path, *width).unwrap())
            .collect(),
    )
}

pub fn default_catalog() -> Arc<AssetCatalog> {
    catalog(&[
        ("modules/jb2a_patreon/Fire/fireball_explosion_01.webm", 800),
        ("modules/jb2a_patreon/Fire/fireball_explosion_02.webm", 800),
        ("modules/jb2a_patreon/Lightning/bolt_100.webm", 100),
        ("modules/jb2a_patreon/Lightning/bolt_200.webm", 200),
        ("modules/jb2a_patreon/Lightning/bolt_400.webm", 400),
    ])
}

pub fn harness_with(catalog: Arc<AssetCatalog>, broadcaster: RecordingBroadcaster) -> Harness {
    let broadcaster = Arc::new(broadcaster);
    let playback = Arc::new(RecordingPlayback::default());
    let notices = Arc::new(NoticeLog::default());
    let engine = AnimEngine::builder()
        .config(EngineConfig {
            rng_seed: Some(7),
            ..EngineConfig::default()
        })
        .catalog(catalog)
        .broadcaster(broadcaster.clone())
        .playback(playback.clone())
        .notifier(notices.clone())
        .build();
    Harness {
        engine,
        broadcaster,
        playback,
        notices,
    }
}

pub fn harness() -> Harness {
    harness_with(default_catalog(), RecordingBroadcaster::default())
}

/// 100x100 token whose top-left corner is at `(x, y)`.
pub fn token(id: u64, name: &str, x: f64, y: f64) -> PositionedEntity {
    PositionedEntity::new(EntityId(id), name, x, y, 100.0, 100.0)
}

/// Caster at the origin targeting a goblin `distance` pixels to the east.
pub fn duel(distance: f64) -> TargetingContext {
    TargetingContext {
        last_actor: Some(token(1, "Wizard", 0.0, 0.0)),
        selection: Vec::new(),
        targets: vec![token(2, "Goblin", distance, 0.0)],
        privileged: false,
    }
}
