//! Change-detecting two-way sync between two independently owned copies
//!
//! [`crate::ViewportState`] is the single owner of the current region and
//! should be preferred. This binding covers display layers that insist on
//! keeping their own copy: each side is only written when the other side
//! holds a different value, so a propagated change never echoes back.

use crate::core::region::Region;

/// Which copy was written last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TwoWayBinding<T> {
    left: T,
    right: T,
    writes: u64,
}

/// Published region mirrored into a UI-owned binding
pub type RegionMirror = TwoWayBinding<Region>;

impl<T: Clone + PartialEq> TwoWayBinding<T> {
    pub fn new(initial: T) -> Self {
        Self {
            left: initial.clone(),
            right: initial,
            writes: 0,
        }
    }

    pub fn left(&self) -> &T {
        &self.left
    }

    pub fn right(&self) -> &T {
        &self.right
    }

    /// Writes the left copy without propagating
    pub fn set_left(&mut self, value: T) {
        self.left = value;
    }

    /// Writes the right copy without propagating
    pub fn set_right(&mut self, value: T) {
        self.right = value;
    }

    /// Copies left into right if they differ; returns whether a write happened
    pub fn sync_from_left(&mut self) -> bool {
        copy_if_changed(&self.left, &mut self.right, &mut self.writes)
    }

    /// Copies right into left if they differ; returns whether a write happened
    pub fn sync_from_right(&mut self) -> bool {
        copy_if_changed(&self.right, &mut self.left, &mut self.writes)
    }

    /// Writes `value` into `side` and propagates it to the other copy
    ///
    /// Returns the number of propagation writes performed, which is at most one.
    pub fn update(&mut self, side: Side, value: T) -> u64 {
        let before = self.writes;
        match side {
            Side::Left => {
                self.set_left(value);
                if self.sync_from_left() {
                    // The echo must find both copies equal.
                    self.sync_from_right();
                }
            }
            Side::Right => {
                self.set_right(value);
                if self.sync_from_right() {
                    self.sync_from_left();
                }
            }
        }
        self.writes - before
    }

    pub fn is_synced(&self) -> bool {
        self.left == self.right
    }

    /// Total propagation writes since construction
    pub fn write_count(&self) -> u64 {
        self.writes
    }
}

fn copy_if_changed<T: Clone + PartialEq>(source: &T, target: &mut T, writes: &mut u64) -> bool {
    if source == target {
        return false;
    }
    *target = source.clone();
    *writes += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{geo::LatLng, region::Span};

    fn region(lat: f64) -> Region {
        Region::new(LatLng::new(lat, 135.0), Span::new(0.1, 0.2).unwrap())
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut mirror = RegionMirror::new(Region::default());
        mirror.set_left(region(35.0));

        assert!(mirror.sync_from_left());
        assert!(!mirror.sync_from_left());
        assert!(!mirror.sync_from_right());
        assert_eq!(mirror.write_count(), 1);
        assert!(mirror.is_synced());
    }

    #[test]
    fn test_update_never_echoes() {
        let mut mirror = RegionMirror::new(Region::default());

        assert_eq!(mirror.update(Side::Left, region(35.0)), 1);
        assert_eq!(mirror.update(Side::Right, region(36.0)), 1);
        assert_eq!(*mirror.left(), region(36.0));

        // Same value again: nothing to propagate
        assert_eq!(mirror.update(Side::Right, region(36.0)), 0);
        assert_eq!(mirror.write_count(), 2);
    }

    #[test]
    fn test_tiny_difference_still_propagates() {
        let mut mirror = RegionMirror::new(region(35.0));
        let mut nudged = region(35.0);
        nudged.span.latitude_delta += 1e-15;

        assert_eq!(mirror.update(Side::Right, nudged), 1);
        assert_eq!(*mirror.left(), nudged);
    }
}
