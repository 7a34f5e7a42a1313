//! Pure logic for the command-driven visual-effect dispatch engine.
//!
//! `anim-core` turns a textual command, an asset catalog and a pair of
//! positioned entities into a list of self-describing [`EffectInstance`]s.
//! Nothing here performs I/O or sleeps; the `anim-runtime` crate owns dispatch,
//! broadcast and the deferred-click flow and depends on the types re-exported
//! here.
//!
//! Pipeline, leaf-first:
//! - [`catalog`] indexes `(path, width)` entries and answers pattern queries
//! - [`command`] parses the command line into a [`ParsedCommand`]
//! - [`targeting`] picks the source and destination entities
//! - [`geometry`] computes origin, target, angle and distance
//! - [`selection`] picks the best-fit width class and the draw order
//! - [`instance`] builds one [`EffectInstance`] per repetition
pub mod catalog;
pub mod command;
pub mod config;
pub mod geometry;
pub mod instance;
pub mod selection;
pub mod targeting;

pub use catalog::{AssetCatalog, AssetEntry, RecordError, normalize_record, parse_record};
pub use command::{CommandParser, CommandWarning, EffectMode, ParsedCommand};
pub use config::AnimConfig;
pub use geometry::{EntityId, GeometryResult, Point, PositionedEntity, resolve};
pub use instance::{Anchor, EffectInstance, Scale, build};
pub use selection::{BestFit, DrawPool, draw_sequence, select_best_fit};
pub use targeting::{TargetResolution, TargetingContext, TargetingError, resolve_targets};
