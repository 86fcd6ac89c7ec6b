//! Touch points and snapshots of the current contact set.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::gesture::MAX_TOUCHES;
use crate::geometry::PointD;

/// Type alias for touch point storage.
///
/// Sized so a full ten-finger snapshot never allocates.
pub type TouchPoints = SmallVec<[TouchPoint; MAX_TOUCHES]>;

/// A single contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Identifier, stable while the contact lasts.
    pub id: i64,
    /// Identifier of the input device.
    pub device_id: i64,
    /// Whether the contact is on a touch screen (as opposed to a touchpad).
    pub on_screen: bool,
    /// Normalized position.
    pub point: PointD,
}

impl TouchPoint {
    /// Creates an on-screen touch point on device 0.
    #[must_use]
    pub const fn new(id: i64, x: f64, y: f64) -> Self {
        Self {
            id,
            device_id: 0,
            on_screen: true,
            point: PointD::new(x, y),
        }
    }
}

/// Ordered set of current contacts, at most [`MAX_TOUCHES`] long.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchSequence {
    points: TouchPoints,
}

impl TouchSequence {
    /// Creates an empty sequence.
    #[must_use]
    pub const fn new() -> Self { Self { points: SmallVec::new_const() } }

    /// Builds a sequence from points, dropping entries past the limit and
    /// duplicate ids.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = TouchPoint>) -> Self {
        let mut seq = Self::new();
        for point in points {
            seq.push(point);
        }
        seq
    }

    /// Adds a contact. Returns false if the id is already present or the
    /// sequence is full.
    pub fn push(&mut self, point: TouchPoint) -> bool {
        if self.points.len() >= MAX_TOUCHES || self.find(point.id).is_some() {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Number of contacts.
    #[must_use]
    pub fn len(&self) -> usize { self.points.len() }

    /// Returns true when there is no contact.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    /// Looks up a contact by id.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&TouchPoint> { self.points.iter().find(|p| p.id == id) }

    /// Contacts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TouchPoint> { self.points.iter() }

    /// Contact at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TouchPoint> { self.points.get(index) }

    /// Returns true when both sequences hold exactly the same ids.
    #[must_use]
    pub fn same_ids(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|p| other.find(p.id).is_some())
    }

    /// Returns true when any contact is on a touch screen.
    #[must_use]
    pub fn any_on_screen(&self) -> bool { self.points.iter().any(|p| p.on_screen) }

    /// Average position of all contacts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Option<PointD> {
        if self.points.is_empty() {
            return None;
        }
        let count = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.point.x, sy + p.point.y));
        Some(PointD::new(sx / count, sy / count))
    }
}
