use serde::{Deserialize, Deserializer, Serialize};

/// Position and size of a window or an element, in CSS pixels.
///
/// Remote ends may report fractional element rects, they are truncated toward zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    #[serde(deserialize_with = "pixels")]
    pub x: i64,
    #[serde(deserialize_with = "pixels")]
    pub y: i64,
    #[serde(deserialize_with = "pixels")]
    pub width: i64,
    #[serde(deserialize_with = "pixels")]
    pub height: i64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Open interval overlap test between two rects.
    ///
    /// Rects that only share an edge do not overlap. Used to approximate "element is displayed"
    /// against the window rect: occlusion and CSS visibility are ignored.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x.saturating_add(other.width)
            && self.x.saturating_add(self.width) > other.x
            && self.y < other.y.saturating_add(other.height)
            && self.y.saturating_add(self.height) > other.y
    }
}

#[allow(clippy::cast_possible_truncation)]
fn pixels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    f64::deserialize(deserializer).map(|value| value.trunc() as i64)
}
