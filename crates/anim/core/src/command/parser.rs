//! Token-level parser for the `/anim` command.
//!
//! Each token is tried against the option grammars in turn; a token that
//! matches none of them becomes the asset identifier (first one wins) or a
//! warning. Unlike a single monolithic pattern this keeps every option
//! independent and order-free.
use super::{CommandWarning, ParsedCommand};
use crate::config::AnimConfig;
use crate::geometry::Point;

/// Parses command lines into [`ParsedCommand`]s.
#[derive(Clone, Debug)]
pub struct CommandParser {
    prefix: String,
    default_delay_ms: u64,
    max_count: u32,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(AnimConfig::default())
    }
}

/// One recognised option token.
#[derive(Clone, Debug, PartialEq)]
enum OptionToken {
    List,
    Centered { flip: bool, rotation_deg: f64 },
    Scale(f64),
    Start(f64),
    End(f64),
    Repeat {
        count: Option<u32>,
        delay_ms: Option<u64>,
        /// Unparseable delay glued to a valid count.
        invalid_delay: Option<String>,
    },
    Dest(Point),
    SelfTarget,
}

impl CommandParser {
    pub fn new(config: AnimConfig) -> Self {
        Self {
            prefix: AnimConfig::COMMAND_PREFIX.to_string(),
            default_delay_ms: config.default_delay_ms,
            max_count: config.max_count.max(1),
        }
    }

    /// Overrides the command keyword (default `/anim`).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Parses a line, returning `None` if it is not this command at all.
    pub fn parse(&self, line: &str) -> Option<ParsedCommand> {
        let line = line.trim();
        let (quiet, line) = match line.strip_prefix(AnimConfig::QUIET_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let rest = line.strip_prefix(self.prefix.as_str())?;
        if !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
            return None;
        }

        let mut command = ParsedCommand {
            quiet,
            pattern: None,
            list_requested: false,
            centered: false,
            flip: false,
            rotation_deg: 0.0,
            scale: None,
            start_offset: None,
            end_fudge: None,
            count: 1,
            delay_ms: self.default_delay_ms,
            count_given: false,
            delay_given: false,
            explicit_dest: None,
            self_target: false,
            warnings: Vec::new(),
        };

        for token in rest.split_whitespace() {
            match classify(token) {
                Some(option) => apply(&mut command, option),
                None if command.pattern.is_none() => command.pattern = Some(token.to_string()),
                None => command
                    .warnings
                    .push(CommandWarning::UnrecognizedToken(token.to_string())),
            }
        }

        if command.count > self.max_count {
            command.warnings.push(CommandWarning::CountClamped {
                requested: command.count,
                max: self.max_count,
            });
            command.count = self.max_count;
        }

        if command.centered {
            if command.start_offset.is_some() {
                command.warnings.push(CommandWarning::StartRequiresTargeted);
            }
            if command.end_fudge.is_some() {
                command.warnings.push(CommandWarning::EndRequiresTargeted);
            }
        } else if command.scale.is_some() {
            command.warnings.push(CommandWarning::ScaleRequiresCentered);
        }

        Some(command)
    }
}

fn apply(command: &mut ParsedCommand, option: OptionToken) {
    match option {
        OptionToken::List => command.list_requested = true,
        OptionToken::Centered { flip, rotation_deg } => {
            command.centered = true;
            command.flip = flip;
            command.rotation_deg = rotation_deg;
        }
        OptionToken::Scale(scale) => command.scale = Some(scale),
        OptionToken::Start(start) => command.start_offset = Some(start),
        OptionToken::End(end) => command.end_fudge = Some(end),
        OptionToken::Repeat {
            count,
            delay_ms,
            invalid_delay,
        } => {
            if let Some(count) = count {
                command.count = count;
                command.count_given = true;
            }
            if let Some(delay_ms) = delay_ms {
                command.delay_ms = delay_ms;
                command.delay_given = true;
            }
            if let Some(delay) = invalid_delay {
                command.warnings.push(CommandWarning::InvalidDelay(delay));
            }
        }
        OptionToken::Dest(point) => command.explicit_dest = Some(point),
        OptionToken::SelfTarget => command.self_target = true,
    }
}

fn classify(token: &str) -> Option<OptionToken> {
    if token == "list" {
        return Some(OptionToken::List);
    }
    centered(token)
        .or_else(|| signed_marker(token, '*').map(OptionToken::Scale))
        .or_else(|| signed_marker(token, '-').map(OptionToken::Start))
        .or_else(|| signed_marker(token, '+').map(OptionToken::End))
        .or_else(|| repeat(token))
        .or_else(|| destination(token))
}

/// `c[f][digits]`
fn centered(token: &str) -> Option<OptionToken> {
    let rest = token.strip_prefix('c')?;
    let (flip, digits) = match rest.strip_prefix('f') {
        Some(digits) => (true, digits),
        None => (false, rest),
    };
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let rotation_deg = if digits.is_empty() {
        0.0
    } else {
        digits.parse().ok()?
    };
    Some(OptionToken::Centered { flip, rotation_deg })
}

/// `<marker><decimal>`
fn signed_marker(token: &str, marker: char) -> Option<f64> {
    decimal(token.strip_prefix(marker)?)
}

/// `<decimal>x`, `:<decimal>`, or both glued as `<decimal>x:<decimal>`.
///
/// A valid count keeps its value when the glued delay does not parse; the
/// delay then falls back to the default.
fn repeat(token: &str) -> Option<OptionToken> {
    let (count_part, delay_part) = match token.split_once(':') {
        Some((count, delay)) => (count, Some(delay)),
        None => (token, None),
    };

    let count = if count_part.is_empty() {
        None
    } else {
        let digits = count_part
            .strip_suffix('x')
            .or_else(|| count_part.strip_suffix('X'))?;
        Some((decimal(digits)?.trunc() as u32).max(1))
    };

    let delay_ms = delay_part
        .and_then(decimal)
        .map(|seconds| (seconds * 1000.0).round() as u64);
    let invalid_delay = match (delay_part, delay_ms) {
        (Some(seconds), None) => Some(seconds.to_string()),
        _ => None,
    };

    if count.is_none() && delay_ms.is_none() {
        return None;
    }
    Some(OptionToken::Repeat {
        count,
        delay_ms,
        invalid_delay,
    })
}

/// `@x,y` or one of the self markers.
fn destination(token: &str) -> Option<OptionToken> {
    let rest = token.strip_prefix('@')?;
    if matches!(rest, "" | "s" | "self" | "src") {
        return Some(OptionToken::SelfTarget);
    }
    let (x, y) = rest.split_once(',')?;
    Some(OptionToken::Dest(Point::new(integer(x)?, integer(y)?)))
}

/// Unsigned decimal made of digits and dots; a second dot ends the number.
fn decimal(text: &str) -> Option<f64> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let end = text
        .match_indices('.')
        .nth(1)
        .map_or(text.len(), |(at, _)| at);
    text[..end].parse().ok()
}

fn integer(text: &str) -> Option<f64> {
    text.parse::<i64>().ok().map(|value| value as f64)
}
