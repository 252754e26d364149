//! Wave pattern construction, validation and target projection.
//!
//! Patterns are classified against a fixed Elliott-style rule set; validity
//! is decided once at construction and never an error. Corrective and
//! diagonal validation is currently length-gated only; no discrimination
//! between zigzag/flat/triangle sub-forms is attempted.

use serde::{Deserialize, Serialize};

/// Retracement ratio for a shallow post-impulse correction.
pub const FIB_SHALLOW_RETRACE: f64 = 0.382;
/// Retracement ratio for a deep post-impulse correction.
pub const FIB_DEEP_RETRACE: f64 = 0.618;
/// Full measured-move extension after a completed correction.
pub const FIB_FULL_EXTENSION: f64 = 1.0;
/// Golden-ratio extension after a completed correction.
pub const FIB_GOLDEN_EXTENSION: f64 = 1.618;

/// The closed taxonomy of wave structures.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum WaveKind {
    Impulse,
    Corrective,
    Motive,
    Diagonal,
}

/// A turning point: index into the analyzed series plus its price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavePoint {
    pub index: usize,
    pub price: f64,
}

/// Projected price range, ordered (near, far) from the projection origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub near: f64,
    pub far: f64,
}

/// An ordered run of turning points classified as one wave structure.
/// Immutable after construction; validity is cached up front.
#[derive(Debug, Clone)]
pub struct WavePattern {
    pub kind: WaveKind,
    pub points: Vec<WavePoint>,
    pub is_valid: bool,
}

impl WavePattern {
    pub fn new(kind: WaveKind, points: Vec<WavePoint>) -> Self {
        let is_valid = validate(kind, &points);
        Self { kind, points, is_valid }
    }

    /// Projects the next price range implied by this pattern.
    ///
    /// A completed impulse is expected to retrace 38.2%–61.8% of its full
    /// excursion; a completed correction is expected to extend 100%–161.8%
    /// of its excursion back in the pre-correction trend direction.
    /// Invalid patterns and kinds without a projection rule return `None`.
    pub fn next_target(&self) -> Option<TargetRange> {
        if !self.is_valid {
            return None;
        }

        let first = self.points.first()?.price;
        let last = self.points.last()?.price;
        let excursion = (last - first).abs();

        match self.kind {
            WaveKind::Impulse if self.points.len() >= 5 => {
                let direction = if last > first { 1.0 } else { -1.0 };
                Some(TargetRange {
                    near: last - direction * FIB_SHALLOW_RETRACE * excursion,
                    far: last - direction * FIB_DEEP_RETRACE * excursion,
                })
            }
            WaveKind::Corrective if self.points.len() >= 3 => {
                // Continuation runs opposite to the correction itself
                let direction = if last < first { 1.0 } else { -1.0 };
                Some(TargetRange {
                    near: last + direction * FIB_FULL_EXTENSION * excursion,
                    far: last + direction * FIB_GOLDEN_EXTENSION * excursion,
                })
            }
            _ => None,
        }
    }
}

fn validate(kind: WaveKind, points: &[WavePoint]) -> bool {
    match kind {
        WaveKind::Impulse => validate_impulse(points),
        WaveKind::Corrective => points.len() >= 4,
        WaveKind::Diagonal => points.len() >= 6,
        WaveKind::Motive => true,
    }
}

/// The four impulse rules over points p0..p5.
fn validate_impulse(points: &[WavePoint]) -> bool {
    if points.len() < 6 {
        return false;
    }
    let p: Vec<f64> = points.iter().map(|point| point.price).collect();

    // Rule 1: wave 2 must not retrace past the origin of wave 1
    if p[2] <= p[0] {
        return false;
    }

    // Rule 2: wave 3 must exceed wave 1 or wave 5
    let wave1 = (p[2] - p[0]).abs();
    let wave3 = (p[4] - p[2]).abs();
    let wave5 = (p[5] - p[4]).abs();
    if !(wave3 > wave1 || wave3 > wave5) {
        return false;
    }

    // Rule 3: wave 3 is never the shortest impulse leg
    if wave3 < wave1.min(wave5) {
        return false;
    }

    // Rule 4: wave 4 must not re-enter wave 1 price territory. Only the
    // monotone-trend case is checked, and the down branch compares against
    // p0 rather than the wave-1 extreme.
    if ((p[0] < p[2] && p[4] < p[2]) || (p[0] > p[2] && p[4] > p[2]))
        && ((p[0] < p[2] && p[4] < p[0]) || (p[0] > p[2] && p[4] > p[0]))
    {
        return false;
    }

    true
}
