// Core types shared across the grid builder and the pathfinder.
//
// Defines world-space vectors (`Vec3`), the axis-aligned build volume
// (`Aabb`), compact identifiers for graph nodes (`NavNodeId`) and scene
// objects (`ObjectId`), and the origin tag carried by every nav node. All
// types derive `Serialize` and `Deserialize` so they can appear in saved
// grids, scene files and configs.
//
// **Critical constraint: determinism.** Builds must be reproducible from the
// same scene and config. The six axial directions are listed in one fixed
// order (`AXIAL_DIRECTIONS`) and every phase iterates them in that order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position or direction in world space. Units are world units (the grid
/// step is expressed in the same units).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component by axis index (0 = x, 1 = y, 2 = z).
    pub fn axis(self, axis: usize) -> f32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// Unit vector in the same direction. A zero vector stays zero.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    /// Component-wise absolute value.
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The six axis-aligned unit directions, in the fixed order every phase
/// iterates them: -X, -Y, -Z, +Z, +Y, +X.
pub const AXIAL_DIRECTIONS: [Vec3; 6] = [
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
];

/// Index of the non-zero axis of an axial direction.
pub fn axial_axis(dir: Vec3) -> usize {
    if dir.x != 0.0 {
        0
    } else if dir.y != 0.0 {
        1
    } else {
        2
    }
}

/// An axis-aligned box given by its center and half-extent. Used both for the
/// build volume and for scene geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extent: Vec3,
}

impl Aabb {
    pub const fn new(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    /// Build from two opposite corners (any order).
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        let min = Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        Self {
            center: (min + max) * 0.5,
            half_extent: (max - min) * 0.5,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extent
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extent
    }

    /// Whether the point lies inside or on the boundary.
    pub fn contains(&self, p: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        (0..3).all(|a| p.axis(a) >= min.axis(a) && p.axis(a) <= max.axis(a))
    }

    /// Squared distance from a point to the box (zero inside).
    pub fn distance_squared_to(&self, p: Vec3) -> f32 {
        let (min, max) = (self.min(), self.max());
        (0..3)
            .map(|a| {
                let v = p.axis(a);
                let d = if v < min.axis(a) {
                    min.axis(a) - v
                } else if v > max.axis(a) {
                    v - max.axis(a)
                } else {
                    0.0
                };
                d * d
            })
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Compact identifier for a navigation graph node: its index in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NavNodeId(pub u32);

impl NavNodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NavNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NavNodeId({})", self.0)
    }
}

/// Identity of a world object as reported by the spatial query service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

/// How a nav node came to exist. Diagnostics only; both kinds behave the
/// same in the graph and in search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeOrigin {
    /// Created from a ray hit on a surface.
    #[default]
    Surface,
    /// Synthesized at a geometric edge between two surface nodes.
    Edge,
}
