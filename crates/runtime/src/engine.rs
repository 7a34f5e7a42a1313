//! Command pipeline orchestrator.
//!
//! The engine owns the parser, the frozen catalog and the collaborators, and
//! exposes a builder-based API. A processed line resolves targets, selects
//! assets, builds instances and spawns one dispatch task per destination; it
//! returns before playback finishes.

use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use anim_core::{
    AnimConfig, AssetCatalog, AssetEntry, CommandParser, EffectInstance, ParsedCommand, Point,
    PositionedEntity, TargetResolution, TargetingContext, build, draw_sequence, resolve, resolve_targets,
    select_best_fit,
};

use crate::api::{
    CommandOutcome, DispatchReport, EffectBroadcaster, EngineError, LocalPlayback, Notice,
    Notifier, Result, TracingNotifier,
};
use crate::clicks::MapClicks;
use crate::events::{EventBus, EventBusBroadcaster};
use crate::workers::DispatchLoop;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub anim: AnimConfig,
    pub command_prefix: String,
    pub event_buffer_size: usize,
    /// Fixed seed for asset draws and mirroring; entropy when `None`.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            anim: AnimConfig::default(),
            command_prefix: AnimConfig::COMMAND_PREFIX.to_string(),
            event_buffer_size: 100,
            rng_seed: None,
        }
    }
}

struct EngineInner {
    parser: CommandParser,
    catalog: Arc<AssetCatalog>,
    broadcaster: Arc<dyn EffectBroadcaster>,
    playback: Option<Arc<dyn LocalPlayback>>,
    notifier: Arc<dyn Notifier>,
    clicks: MapClicks,
    event_bus: EventBus,
    max_count: u32,
    rng: Mutex<StdRng>,
}

/// Cloneable handle to the command pipeline.
///
/// Must be used from within a tokio runtime: dispatch and deferred clicks run
/// on spawned tasks.
#[derive(Clone)]
pub struct AnimEngine {
    inner: Arc<EngineInner>,
}

impl AnimEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Parses and runs one chat line against the current scene.
    ///
    /// Any pending deferred click is cancelled first, so a new command always
    /// supersedes a command still waiting for its destination.
    pub fn process_line(&self, line: &str, scene: &TargetingContext) -> CommandOutcome {
        let Some(command) = self.inner.parser.parse(line) else {
            return CommandOutcome::NotMatched;
        };
        if self.inner.clicks.cancel() {
            debug!("pending map click cancelled by a new command");
        }
        self.execute(command, scene)
    }

    /// Runs an already parsed command.
    ///
    /// Failures are reported to the notifier and returned as
    /// [`CommandOutcome::Failed`].
    pub fn execute(&self, command: ParsedCommand, scene: &TargetingContext) -> CommandOutcome {
        match self.try_execute(command, scene) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(kind = %err.kind(), "command failed: {}", err);
                self.inner.notifier.notify(Notice::error(err.to_string()));
                CommandOutcome::Failed(err)
            }
        }
    }

    /// Delivers a map click to a command waiting for its destination.
    pub fn click(&self, point: Point) -> bool {
        self.inner.clicks.click(point)
    }

    pub fn clicks(&self) -> &MapClicks {
        &self.inner.clicks
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }

    pub fn catalog(&self) -> &Arc<AssetCatalog> {
        &self.inner.catalog
    }

    fn try_execute(&self, command: ParsedCommand, scene: &TargetingContext) -> Result<CommandOutcome> {
        let playback = self
            .inner
            .playback
            .clone()
            .ok_or(EngineError::PlaybackUnavailable)?;

        let catalog = &self.inner.catalog;
        if catalog.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }

        if command.list_requested {
            return Ok(CommandOutcome::Listing(catalog.listing()));
        }

        let pattern = command
            .pattern
            .as_deref()
            .ok_or(EngineError::MissingAssetName)?;
        let candidates = catalog.find_matching(pattern);
        if candidates.is_empty() {
            return Err(EngineError::NoMatch {
                pattern: pattern.to_string(),
            });
        }

        if let Some(offset) = command.start_offset
            && !command.centered
            && offset >= 1.0
        {
            return Err(EngineError::InvalidStartOffset { offset });
        }

        for warning in &command.warnings {
            self.trace(&command, warning.to_string());
        }

        debug!(mode = %command.mode(), count = command.count, "resolving targets");
        let (source, destinations) = match resolve_targets(&command, scene)? {
            TargetResolution::Resolved {
                source,
                destinations,
            } => (source, destinations),
            TargetResolution::DeferredClick => return Ok(self.defer_to_click(command, scene)),
        };

        self.trace(&command, format!("Src:{}", source.name));
        self.trace(&command, format!("Dest:{}", names(&destinations)));
        self.trace(&command, format!("Opts: {}", command.option_summary()));
        self.trace(&command, "Possible:");
        self.trace(&command, file_names(&candidates));

        let dispatcher = DispatchLoop::new(Arc::clone(&self.inner.broadcaster), playback);
        let mut used = Vec::new();
        let mut tasks = Vec::with_capacity(destinations.len());
        for destination in &destinations {
            let instances = self.build_instances(&command, &candidates, &source, destination);
            used.extend(instances.iter().map(|instance| instance.file_name().to_string()));
            tasks.push(dispatcher.clone().spawn(instances));
        }

        self.trace(&command, format!("Used:\n{}", used.join("\n")));

        Ok(CommandOutcome::Dispatched(DispatchReport::new(
            source.name,
            destinations.into_iter().map(|d| d.name).collect(),
            used,
            tasks,
        )))
    }

    /// Builds the instance sequence for one destination.
    ///
    /// Centered effects resolve from the destination back toward the source
    /// so they play on the destination.
    fn build_instances(
        &self,
        command: &ParsedCommand,
        candidates: &[AssetEntry],
        source: &PositionedEntity,
        destination: &PositionedEntity,
    ) -> Vec<EffectInstance> {
        let geometry = if command.centered {
            resolve(destination, source, true, command.rotation_deg)
        } else {
            resolve(source, destination, false, command.rotation_deg)
        };

        let best = select_best_fit(candidates, geometry.distance, command.centered);
        if let Some(width) = best.width {
            debug!(width, distance = geometry.distance, "best fit selected");
            self.trace(command, format!("Best fit (width:{})", width));
            self.trace(command, file_names(&best.pool));
        }

        let mut rng = self.inner.rng.lock().unwrap_or_else(PoisonError::into_inner);
        // Commands handed to `execute` directly skip the parser's clamp.
        let count = command.count.min(self.inner.max_count);
        draw_sequence(&best.pool, count as usize, &mut *rng)
            .iter()
            .zip(0u32..)
            .map(|(asset, index)| build(&geometry, asset, command, index, &mut *rng))
            .collect()
    }

    fn defer_to_click(&self, command: ParsedCommand, scene: &TargetingContext) -> CommandOutcome {
        self.inner
            .notifier
            .notify(Notice::info("Please click the target location"));

        let pending = self.inner.clicks.subscribe();
        let engine = self.clone();
        let scene = scene.clone();
        CommandOutcome::AwaitingClick(tokio::spawn(async move {
            match pending.wait().await {
                Some(point) => engine.execute(command.with_explicit_dest(point.truncate()), &scene),
                None => CommandOutcome::Cancelled,
            }
        }))
    }

    fn trace(&self, command: &ParsedCommand, text: impl Into<String>) {
        if !command.quiet {
            self.inner.notifier.notify(Notice::trace(text));
        }
    }
}

fn names(entities: &[PositionedEntity]) -> String {
    entities
        .iter()
        .map(|entity| entity.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn file_names(assets: &[AssetEntry]) -> String {
    assets
        .iter()
        .map(AssetEntry::file_name)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builder for [`AnimEngine`].
///
/// Without a broadcaster, effects are published on the engine's own
/// [`EventBus`]; a bus passed to [`EngineBuilder::event_bus`] replaces it and
/// `event_buffer_size` is then unused. Without a playback service, every
/// command fails with [`EngineError::PlaybackUnavailable`].
pub struct EngineBuilder {
    config: EngineConfig,
    catalog: Option<Arc<AssetCatalog>>,
    broadcaster: Option<Arc<dyn EffectBroadcaster>>,
    playback: Option<Arc<dyn LocalPlayback>>,
    notifier: Option<Arc<dyn Notifier>>,
    event_bus: Option<EventBus>,
}

impl EngineBuilder {
    fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            catalog: None,
            broadcaster: None,
            playback: None,
            notifier: None,
            event_bus: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(mut self, catalog: Arc<AssetCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn broadcaster(mut self, broadcaster: Arc<dyn EffectBroadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    pub fn playback(mut self, playback: Arc<dyn LocalPlayback>) -> Self {
        self.playback = Some(playback);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Shares an existing bus, e.g. one that also carries notices.
    pub fn event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn build(self) -> AnimEngine {
        let EngineConfig {
            anim,
            command_prefix,
            event_buffer_size,
            rng_seed,
        } = self.config;

        let event_bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::with_capacity(event_buffer_size));
        let broadcaster = self
            .broadcaster
            .unwrap_or_else(|| Arc::new(EventBusBroadcaster::new(event_bus.clone())));
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let max_count = anim.max_count.max(1);

        AnimEngine {
            inner: Arc::new(EngineInner {
                parser: CommandParser::new(anim).with_prefix(command_prefix),
                catalog: self.catalog.unwrap_or_default(),
                broadcaster,
                playback: self.playback,
                notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
                clicks: MapClicks::new(),
                event_bus,
                max_count,
                rng: Mutex::new(rng),
            }),
        }
    }
}
