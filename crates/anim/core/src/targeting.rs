//! Source and destination resolution for a command.
//!
//! Destinations come from, in priority order: an explicit map point, the
//! self marker, the user's targets, and (for privileged users only) the
//! current selection. When nothing resolves, the caller must ask the user to
//! click a map point and run the command again with that point.
use thiserror::Error;

use crate::command::ParsedCommand;
use crate::geometry::PositionedEntity;

/// Snapshot of the scene's selection state for one command.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetingContext {
    /// Entity of the last actor the user interacted with.
    pub last_actor: Option<PositionedEntity>,
    /// Currently selected (controlled) entities.
    pub selection: Vec<PositionedEntity>,
    /// Entities the user has targeted.
    pub targets: Vec<PositionedEntity>,
    /// Whether the user may fall back to their selection as destinations.
    pub privileged: bool,
}

/// Outcome of target resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum TargetResolution {
    Resolved {
        source: PositionedEntity,
        destinations: Vec<PositionedEntity>,
    },
    /// No destination: wait for a map click, then re-run with it.
    DeferredClick,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TargetingError {
    #[error("Source and Destination cannot be the same token with using a Targeted animation")]
    SameSourceAndDestination,
}

/// Picks the source and destinations for `command`.
pub fn resolve_targets(
    command: &ParsedCommand,
    context: &TargetingContext,
) -> Result<TargetResolution, TargetingError> {
    let source = context
        .last_actor
        .clone()
        .or_else(|| context.selection.first().cloned());

    let destinations = if let Some(point) = command.explicit_dest {
        vec![PositionedEntity::map_point(point)]
    } else if command.self_target {
        source.iter().cloned().collect()
    } else if !context.targets.is_empty() {
        context.targets.clone()
    } else if context.privileged {
        context.selection.clone()
    } else {
        Vec::new()
    };

    let Some(first) = destinations.first() else {
        return Ok(TargetResolution::DeferredClick);
    };

    // Centered effects anchored on a target still need some source.
    let source = source.unwrap_or_else(|| first.clone());

    if !command.centered && destinations.len() == 1 && first.id == source.id {
        return Err(TargetingError::SameSourceAndDestination);
    }

    Ok(TargetResolution::Resolved {
        source,
        destinations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandParser;
    use crate::geometry::{EntityId, Point};

    fn token(id: u64) -> PositionedEntity {
        PositionedEntity::new(EntityId(id), format!("t{}", id), id as f64 * 100.0, 0.0, 100.0, 100.0)
    }

    fn command(line: &str) -> ParsedCommand {
        CommandParser::default().parse(line).unwrap()
    }

    fn resolved(result: Result<TargetResolution, TargetingError>) -> (u64, Vec<u64>) {
        match result.unwrap() {
            TargetResolution::Resolved {
                source,
                destinations,
            } => (source.id.0, destinations.iter().map(|d| d.id.0).collect()),
            TargetResolution::DeferredClick => panic!("expected resolved targets"),
        }
    }

    #[test]
    fn targets_win_over_selection() {
        let context = TargetingContext {
            last_actor: Some(token(1)),
            selection: vec![token(2)],
            targets: vec![token(3), token(4)],
            privileged: true,
        };
        assert_eq!(
            resolved(resolve_targets(&command("/anim bolt"), &context)),
            (1, vec![3, 4])
        );
    }

    #[test]
    fn privileged_user_falls_back_to_selection() {
        let context = TargetingContext {
            last_actor: Some(token(1)),
            selection: vec![token(2), token(5)],
            targets: vec![],
            privileged: true,
        };
        assert_eq!(
            resolved(resolve_targets(&command("/anim bolt"), &context)),
            (1, vec![2, 5])
        );

        let context = TargetingContext {
            privileged: false,
            ..context
        };
        assert_eq!(
            resolve_targets(&command("/anim bolt"), &context),
            Ok(TargetResolution::DeferredClick)
        );
    }

    #[test]
    fn explicit_point_beats_self_and_targets() {
        let context = TargetingContext {
            last_actor: Some(token(1)),
            targets: vec![token(3)],
            ..Default::default()
        };
        let result = resolve_targets(&command("/anim bolt @self @40,60"), &context).unwrap();
        let TargetResolution::Resolved { destinations, .. } = result else {
            panic!("expected resolved targets");
        };
        assert_eq!(destinations.len(), 1);
        assert!(destinations[0].id.is_map_point());
        assert_eq!(destinations[0].center(), Point::new(40.0, 60.0));
    }

    #[test]
    fn self_marker_targets_source() {
        let context = TargetingContext {
            selection: vec![token(2)],
            targets: vec![token(3)],
            ..Default::default()
        };
        assert_eq!(
            resolved(resolve_targets(&command("/anim heal c @s"), &context)),
            (2, vec![2])
        );
    }

    #[test]
    fn targeted_self_is_rejected() {
        let context = TargetingContext {
            last_actor: Some(token(1)),
            ..Default::default()
        };
        assert_eq!(
            resolve_targets(&command("/anim bolt @self"), &context),
            Err(TargetingError::SameSourceAndDestination)
        );
    }

    #[test]
    fn source_falls_back_to_first_destination() {
        let context = TargetingContext {
            targets: vec![token(3), token(4)],
            ..Default::default()
        };
        assert_eq!(
            resolved(resolve_targets(&command("/anim heal c"), &context)),
            (3, vec![3, 4])
        );
    }

    #[test]
    fn nothing_resolvable_defers_to_click() {
        let context = TargetingContext {
            privileged: true,
            ..Default::default()
        };
        assert_eq!(
            resolve_targets(&command("/anim bolt"), &context),
            Ok(TargetResolution::DeferredClick)
        );
        // Self marker without any source also waits for a click.
        assert_eq!(
            resolve_targets(&command("/anim heal c @"), &context),
            Ok(TargetResolution::DeferredClick)
        );
    }
}
