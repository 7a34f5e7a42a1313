//! Map geometry between two positioned entities.
use std::f64::consts::PI;
use std::fmt;

/// Identifier of a scene entity, borrowed from the external token model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u64);

impl EntityId {
    /// Reserved identifier for synthetic entities built from a map point.
    pub const MAP_POINT: Self = Self(u64::MAX);

    #[inline]
    pub const fn is_map_point(self) -> bool {
        self.0 == Self::MAP_POINT.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Continuous point in map (pixel) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Drops the fractional part of both coordinates.
    pub fn truncate(self) -> Self {
        Self::new(self.x.trunc(), self.y.trunc())
    }
}

/// A token on the map: top-left corner plus size.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionedEntity {
    pub id: EntityId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl PositionedEntity {
    pub fn new(id: EntityId, name: impl Into<String>, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            id,
            name: name.into(),
            x,
            y,
            w,
            h,
        }
    }

    /// Zero-size entity standing in for a clicked or typed map point.
    pub fn map_point(point: Point) -> Self {
        Self::new(EntityId::MAP_POINT, "User click", point.x, point.y, 0.0, 0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Transform of one effect between two entities.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryResult {
    pub origin: Point,
    pub target: Point,
    /// Radians.
    pub angle: f64,
    pub distance: f64,
}

/// Computes origin, target, angle and distance from `from` to `to`.
///
/// Centered effects take their angle from `rotation_deg`; targeted effects
/// point from origin to target.
pub fn resolve(
    from: &PositionedEntity,
    to: &PositionedEntity,
    centered: bool,
    rotation_deg: f64,
) -> GeometryResult {
    let origin = from.center();
    let target = to.center();
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;

    let angle = if centered {
        rotation_deg * PI / 180.0
    } else {
        dy.atan2(dx)
    };

    GeometryResult {
        origin,
        target,
        angle,
        distance: (dx * dx + dy * dy).sqrt(),
    }
}
