use serde::{Deserialize, Serialize};

use crate::error;
use crate::smile::SmileSlice;
use crate::types::{Variance, Vol};

/// Rule for synthesizing a smile between two pillar expiries.
///
/// Each wing position is interpolated independently; the result is flat in
/// volatility outside the pillar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeInterpolation {
    /// Total variance `σ²t` linear in time.
    #[default]
    TimeSquare,
    /// Volatility linear in time.
    Linear,
}

/// Pillar times closer than this are treated as the same expiry.
pub(crate) const TIME_TOLERANCE: f64 = 1e-10;

/// Synthesize the slice at `expiry` from pillar slices sorted by time.
///
/// - Exact matches (within 1e-10) return the stored slice unchanged.
/// - Before the first pillar / after the last: flat vol from the nearest pillar.
/// - Between pillars: per wing position, per `method`; deltas of the left pillar.
pub(crate) fn interpolate_slice(
    slices: &[SmileSlice],
    expiry: f64,
    method: TimeInterpolation,
) -> error::Result<SmileSlice> {
    let n = slices.len();

    if let Some(slice) = slices
        .iter()
        .find(|s| (expiry - s.time()).abs() < TIME_TOLERANCE)
    {
        return Ok(slice.clone());
    }

    if expiry < slices[0].time() {
        return SmileSlice::new(expiry, slices[0].deltas().to_vec(), slices[0].vols().to_vec());
    }
    if expiry > slices[n - 1].time() {
        let last = &slices[n - 1];
        return SmileSlice::new(expiry, last.deltas().to_vec(), last.vols().to_vec());
    }

    let right = slices.partition_point(|s| s.time() < expiry);
    let left = right - 1;
    let (sl, sr) = (&slices[left], &slices[right]);
    let alpha = (expiry - sl.time()) / (sr.time() - sl.time());

    let vols = sl
        .vols()
        .iter()
        .zip(sr.vols())
        .map(|(&vl, &vr)| match method {
            TimeInterpolation::TimeSquare => {
                let wl = Vol(vl).total_variance(sl.time());
                let wr = Vol(vr).total_variance(sr.time());
                Variance((1.0 - alpha) * wl.0 + alpha * wr.0)
                    .to_vol(expiry)
                    .0
            }
            TimeInterpolation::Linear => (1.0 - alpha) * vl + alpha * vr,
        })
        .collect();

    #[cfg(feature = "logging")]
    tracing::trace!(expiry, left, right, alpha, ?method, "smile synthesized between pillars");

    SmileSlice::new(expiry, sl.deltas().to_vec(), vols)
}
