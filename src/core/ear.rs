//! Eye Aspect Ratio
//!
//! EAR = (|p1 - p3| + |p2 - p4|) / |p0 - p5|
//!
//! Open eyes sit around 0.3-0.4, closing eyes drop below 0.2.

use crate::types::{EarError, EyeContour, Keypoint};

/// Compute the eye aspect ratio of one eye contour
///
/// Fails with `IndexOutOfRange` instead of reading past the frame, and with
/// `DegenerateGeometry` when the eye corners coincide.
pub fn compute_ear(keypoints: &[Keypoint], eye: &EyeContour) -> Result<f64, EarError> {
    let mut points = [Keypoint::default(); 6];
    for (slot, &index) in points.iter_mut().zip(eye.indices.iter()) {
        *slot = *keypoints.get(index).ok_or(EarError::IndexOutOfRange {
            index,
            len: keypoints.len(),
        })?;
    }
    let [p0, p1, p2, p3, p4, p5] = points;

    let vertical_1 = p1.distance(&p3);
    let vertical_2 = p2.distance(&p4);
    let horizontal = p0.distance(&p5);

    if horizontal == 0.0 {
        return Err(EarError::DegenerateGeometry { horizontal });
    }

    Ok((vertical_1 + vertical_2) / horizontal)
}

// =============================================================================
// TESTS
// =============================================================================
