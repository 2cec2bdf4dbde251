//! Active zone tracking across pages.
//!
//! Annotators usually draw the zone layout once and let it apply to every
//! following page. A page that carries a single annotation is assumed to hold
//! a stray mark rather than a new layout, so only candidate sets with at
//! least two zones replace the active one.

use crate::model::{Zone, ZoneSet};

/// Smallest candidate set that replaces the active zones.
pub const DEFAULT_MIN_UPDATE: usize = 2;

/// Return the zone set that applies after seeing `candidate` on a page.
pub fn update(current: ZoneSet, candidate: ZoneSet, min_update: usize) -> ZoneSet {
    if !candidate.is_empty() && candidate.len() >= min_update {
        candidate
    } else {
        current
    }
}

/// Holds the active zone set between pages.
#[derive(Debug, Clone)]
pub struct ZoneTracker {
    active: ZoneSet,
    min_update: usize,
}

impl ZoneTracker {
    /// Create a tracker with no active zones.
    pub fn new(min_update: usize) -> Self {
        Self {
            active: ZoneSet::new(),
            min_update,
        }
    }

    /// Feed the annotation rectangles of a page and return the zones that
    /// apply to it.
    pub fn observe(&mut self, candidate: Vec<Zone>) -> &ZoneSet {
        let candidate = ZoneSet::from(candidate);
        let candidate_len = candidate.len();
        let current = std::mem::take(&mut self.active);
        self.active = update(current, candidate, self.min_update);
        if candidate_len >= self.min_update && candidate_len > 0 {
            log::debug!("Active zone set replaced ({} zones)", candidate_len);
        } else if candidate_len > 0 {
            log::debug!(
                "Ignoring {} annotation(s), keeping {} active zones",
                candidate_len,
                self.active.len()
            );
        }
        &self.active
    }

    /// Zones currently in effect.
    pub fn active(&self) -> &ZoneSet {
        &self.active
    }
}

impl Default for ZoneTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_UPDATE)
    }
}
