//! Annotation zones and zone sets.

use super::Rect;

/// A rectangular region of interest on a page, usually drawn by an annotator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub bbox: Rect,
}

impl Zone {
    /// Create a zone from its four edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            bbox: Rect::new(left, top, right, bottom),
        }
    }

    pub fn width(&self) -> f32 {
        self.bbox.width()
    }

    pub fn height(&self) -> f32 {
        self.bbox.height()
    }

    /// Portrait zones are treated as titles or captions.
    pub fn is_vertical(&self) -> bool {
        self.height() > self.width()
    }
}

impl From<Rect> for Zone {
    fn from(bbox: Rect) -> Self {
        Self { bbox }
    }
}

/// The ordered set of zones that applies to a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneSet {
    zones: Vec<Zone>,
}

impl ZoneSet {
    /// Create an empty zone set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Iterate over the zones in annotation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Zone> {
        self.zones.iter()
    }
}

impl From<Vec<Zone>> for ZoneSet {
    fn from(zones: Vec<Zone>) -> Self {
        Self { zones }
    }
}

impl FromIterator<Zone> for ZoneSet {
    fn from_iter<I: IntoIterator<Item = Zone>>(iter: I) -> Self {
        Self {
            zones: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ZoneSet {
    type Item = &'a Zone;
    type IntoIter = std::slice::Iter<'a, Zone>;

    fn into_iter(self) -> Self::IntoIter {
        self.zones.iter()
    }
}
