//! Effect instance descriptors handed to playback and broadcast.
use rand::Rng;

use crate::catalog::AssetEntry;
use crate::command::ParsedCommand;
use crate::config::AnimConfig;
use crate::geometry::{GeometryResult, Point};

/// Per-axis sprite scale. A negative axis mirrors the sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub const fn uniform(value: f64) -> Self {
        Self { x: value, y: value }
    }
}

/// Normalized sprite anchor placed on the instance position.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

/// One playable repetition of an effect. Carries everything playback needs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectInstance {
    pub file: String,
    pub position: Point,
    pub anchor: Anchor,
    pub rotation_rad: f64,
    pub distance: f64,
    pub scale: Scale,
    pub delay_ms: u64,
    /// Index within its repeat sequence.
    pub sequence: u32,
}

impl EffectInstance {
    /// Last path segment of the played file.
    pub fn file_name(&self) -> &str {
        self.file.rsplit('/').next().unwrap_or(&self.file)
    }
}

/// Builds the `index`-th instance of a sequence.
///
/// Targeted effects are stretched so the sprite spans the distance past its
/// anchor (plus the end fudge) and get a random vertical mirror. Centered
/// effects use the command scale, mirrored horizontally when flipped.
pub fn build<R: Rng + ?Sized>(
    geometry: &GeometryResult,
    asset: &AssetEntry,
    command: &ParsedCommand,
    index: u32,
    rng: &mut R,
) -> EffectInstance {
    let scale = if command.centered {
        let mut scale = Scale::uniform(command.scale());
        if command.flip {
            scale.x = -scale.x;
        }
        scale
    } else {
        let span = (1.0 - command.anchor_x()) * f64::from(asset.native_width);
        let s = geometry.distance * (1.0 + command.end_fudge()) / span;
        let y = if rng.gen_bool(0.5) { -s } else { s };
        Scale { x: s, y }
    };

    EffectInstance {
        file: asset.path.clone(),
        position: geometry.origin,
        anchor: Anchor {
            x: command.anchor_x(),
            y: AnimConfig::ANCHOR_Y,
        },
        rotation_rad: geometry.angle,
        distance: geometry.distance,
        scale,
        delay_ms: command.delay_ms,
        sequence: index,
    }
}
