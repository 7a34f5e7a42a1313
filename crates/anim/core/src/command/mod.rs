//! The `/anim` command: parsed form and option grammar.
//!
//! A command is a whitespace-separated list of tokens in any order:
//!
//! ```text
//! /anim [list] <asset> [c[f][deg]] [*scale] [-start] [+end] [<n>x][:<sec>] [@x,y | @ | @s | @self | @src]
//! ```
//!
//! Every option is optional; missing options take their defaults. The first
//! token that is not an option is the asset identifier.
mod parser;

pub use parser::CommandParser;

use std::fmt;

use crate::config::AnimConfig;
use crate::geometry::Point;

/// Structured intent of one command invocation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedCommand {
    /// `!` prefix: suppress private diagnostics.
    pub quiet: bool,
    /// Asset search pattern or `/`-prefixed literal path.
    pub pattern: Option<String>,
    pub list_requested: bool,
    pub centered: bool,
    pub flip: bool,
    pub rotation_deg: f64,
    pub scale: Option<f64>,
    pub start_offset: Option<f64>,
    pub end_fudge: Option<f64>,
    pub count: u32,
    pub delay_ms: u64,
    /// `<n>x` appeared on the line.
    pub count_given: bool,
    /// `:<sec>` appeared on the line.
    pub delay_given: bool,
    pub explicit_dest: Option<Point>,
    pub self_target: bool,
    /// Options that were recognised but do not apply, and stray tokens.
    pub warnings: Vec<CommandWarning>,
}

/// How an effect is laid out on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EffectMode {
    /// Drawn along the line from source to destination.
    Targeted,
    /// Anchored and oriented on a single point.
    Centered,
}

impl ParsedCommand {
    pub fn mode(&self) -> EffectMode {
        if self.centered {
            EffectMode::Centered
        } else {
            EffectMode::Targeted
        }
    }

    /// Uniform scale of centered effects.
    pub fn scale(&self) -> f64 {
        self.scale.unwrap_or(AnimConfig::DEFAULT_SCALE)
    }

    /// Fraction of the path length to overshoot in targeted mode.
    pub fn end_fudge(&self) -> f64 {
        if self.centered {
            0.0
        } else {
            self.end_fudge.unwrap_or(0.0)
        }
    }

    /// Horizontal sprite anchor: middle for centered effects, the start
    /// offset for targeted ones.
    pub fn anchor_x(&self) -> f64 {
        if self.centered {
            AnimConfig::CENTERED_ANCHOR_X
        } else {
            self.start_offset.unwrap_or(0.0)
        }
    }

    /// Replaces any destination with a map point, as after a deferred click.
    pub fn with_explicit_dest(mut self, point: Point) -> Self {
        self.explicit_dest = Some(point);
        self.self_target = false;
        self
    }

    /// Short option summary for diagnostics, e.g. `C:90, Count:2, Delay:0.5`.
    ///
    /// Count and delay appear only when they were written on the line.
    pub fn option_summary(&self) -> String {
        let mut opts = Vec::new();
        if self.centered {
            let flip = if self.flip { "flip" } else { "" };
            opts.push(format!("C{}:{}", flip, self.rotation_deg));
        } else {
            opts.push("T".to_string());
        }
        if let Some(scale) = self.scale {
            opts.push(format!("Scale:{}", scale));
        }
        if self.count_given {
            opts.push(format!("Count:{}", self.count));
        }
        if self.delay_given {
            opts.push(format!("Delay:{}", delay_seconds(self.delay_ms)));
        }
        if let Some(start) = self.start_offset {
            opts.push(format!("Start:-{}", start));
        }
        if let Some(end) = self.end_fudge {
            opts.push(format!("End:+{}", end));
        }
        opts.join(", ")
    }
}

/// Canonical token form; parsing it yields an equivalent command.
impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quiet {
            write!(f, "{}", AnimConfig::QUIET_PREFIX)?;
        }
        write!(f, "{}", AnimConfig::COMMAND_PREFIX)?;
        if self.list_requested {
            write!(f, " list")?;
        }
        if let Some(pattern) = &self.pattern {
            write!(f, " {}", pattern)?;
        }
        if self.centered {
            let flip = if self.flip { "f" } else { "" };
            write!(f, " c{}{}", flip, self.rotation_deg)?;
        }
        if let Some(scale) = self.scale {
            write!(f, " *{}", scale)?;
        }
        if let Some(start) = self.start_offset {
            write!(f, " -{}", start)?;
        }
        if let Some(end) = self.end_fudge {
            write!(f, " +{}", end)?;
        }
        match (self.count_given, self.delay_given) {
            (true, true) => write!(f, " {}x:{}", self.count, delay_seconds(self.delay_ms))?,
            (true, false) => write!(f, " {}x", self.count)?,
            (false, true) => write!(f, " :{}", delay_seconds(self.delay_ms))?,
            (false, false) => {}
        }
        if let Some(dest) = self.explicit_dest {
            write!(f, " @{},{}", dest.x, dest.y)?;
        }
        if self.self_target {
            write!(f, " @self")?;
        }
        Ok(())
    }
}

fn delay_seconds(delay_ms: u64) -> f64 {
    delay_ms as f64 / 1000.0
}

/// Non-fatal findings while parsing a command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandWarning {
    ScaleRequiresCentered,
    StartRequiresTargeted,
    EndRequiresTargeted,
    CountClamped { requested: u32, max: u32 },
    /// A glued `<n>x:` whose delay part is not a number.
    InvalidDelay(String),
    UnrecognizedToken(String),
}

impl fmt::Display for CommandWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScaleRequiresCentered => {
                write!(f, "Scale option only valid on Centered animation")
            }
            Self::StartRequiresTargeted => {
                write!(f, "Start option only valid on Targeted animation")
            }
            Self::EndRequiresTargeted => write!(f, "End option only valid on Targeted animation"),
            Self::CountClamped { requested, max } => {
                write!(f, "Count {} exceeds the maximum, playing {}", requested, max)
            }
            Self::InvalidDelay(delay) => {
                write!(f, "Ignoring invalid delay '{}', using the default", delay)
            }
            Self::UnrecognizedToken(token) => write!(f, "Ignoring unrecognized option '{}'", token),
        }
    }
}
