//! One contiguous slice of precomputed body positions.

use std::collections::BTreeMap;

use crate::error::EphemerisError;

/// Heliocentric `[x, y, z]` position in AU.
pub type Position = [f64; 3];

/// Positions for every body over a contiguous range of Julian days.
///
/// Day `first_julian + i` maps to `days[i]`, a list of positions indexed by
/// each body's ephemeris index.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    first_julian: i64,
    days: Vec<Vec<Position>>,
}

impl Batch {
    /// Build a batch from consecutive days starting at `first_julian`.
    ///
    /// # Errors
    ///
    /// Returns [`EphemerisError::EmptyBatch`] when `days` is empty.
    pub fn new(first_julian: i64, days: Vec<Vec<Position>>) -> Result<Self, EphemerisError> {
        if days.is_empty() {
            return Err(EphemerisError::EmptyBatch);
        }
        Ok(Self { first_julian, days })
    }

    /// Build a batch from a day-keyed map, which must cover a contiguous range.
    pub fn from_map(map: BTreeMap<i64, Vec<Position>>) -> Result<Self, EphemerisError> {
        let first_julian = *map.keys().next().ok_or(EphemerisError::EmptyBatch)?;
        let mut days = Vec::with_capacity(map.len());
        for (offset, (julian, positions)) in map.into_iter().enumerate() {
            let expected = first_julian + offset as i64;
            if julian != expected {
                return Err(EphemerisError::NonContiguous {
                    expected,
                    found: julian,
                });
            }
            days.push(positions);
        }
        Ok(Self { first_julian, days })
    }

    /// Parse the on-disk JSON shape: `{"<julian>": [[x, y, z], ...], ...}`.
    pub fn from_json(json: &str) -> Result<Self, EphemerisError> {
        let map: BTreeMap<i64, Vec<Position>> = serde_json::from_str(json)?;
        Self::from_map(map)
    }

    /// First covered day.
    pub fn first_julian(&self) -> i64 {
        self.first_julian
    }

    /// Last covered day (inclusive).
    pub fn last_julian(&self) -> i64 {
        self.first_julian + self.days.len() as i64 - 1
    }

    /// Number of covered days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Always false; empty batches cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Whether `julian` falls inside `[first_julian, last_julian]`.
    pub fn contains(&self, julian: i64) -> bool {
        julian >= self.first_julian && julian <= self.last_julian()
    }

    /// The stored position of body `index` on day `julian`.
    pub fn position(&self, julian: i64, index: usize) -> Option<Position> {
        if !self.contains(julian) {
            return None;
        }
        let day = (julian - self.first_julian) as usize;
        self.days[day].get(index).copied()
    }
}
