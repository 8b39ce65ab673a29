//! Historical location trail.

use serde::Serialize;

use crate::models::{FeedEntry, LatLng};

// ---

/// Rectangle the map widget should fit to show the whole trail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    fn around(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    fn extend(&mut self, point: LatLng) {
        // ---
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }
}

/// One marker per qualifying point, in feed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trail {
    pub points: Vec<LatLng>,
    pub bounds: Bounds,
}

impl Trail {
    /// Build a trail from the entries that carry a usable location.
    ///
    /// Entries with a missing, non-numeric or (0,0) location are dropped.
    /// Returns `None` when nothing qualifies.
    pub fn from_entries(entries: &[FeedEntry]) -> Option<Self> {
        // ---
        let points: Vec<LatLng> = entries.iter().filter_map(FeedEntry::location).collect();
        let (first, rest) = points.split_first()?;

        let mut bounds = Bounds::around(*first);
        for point in rest {
            bounds.extend(*point);
        }
        Some(Trail { points, bounds })
    }
}
