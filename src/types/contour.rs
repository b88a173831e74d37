//! Eye contour landmark indices
//!
//! Indices follow the MediaPipe Face Mesh 468-point topology (canonical face
//! model, v1 / TF.js face-landmarks-detection). Another landmark model needs
//! its own contours.
//!
//! Ordering per contour: `[corner, upper_1, upper_2, lower_1, lower_2, corner]`.
//! `p1/p3` and `p2/p4` are the vertical eyelid chords, `p0/p5` the horizontal
//! eye-corner chord.

use serde::{Deserialize, Serialize};

use crate::FACE_MESH_LANDMARK_COUNT;

/// Which eye a contour describes (subject's perspective)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub fn as_str(&self) -> &'static str {
        match self {
            Eye::Left => "left",
            Eye::Right => "right",
        }
    }
}

/// Six ordered landmark indices outlining one eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeContour {
    pub eye: Eye,
    pub indices: [usize; 6],
}

/// Left eye contour
pub const LEFT_EYE: EyeContour = EyeContour {
    eye: Eye::Left,
    indices: [263, 387, 385, 373, 380, 362],
};

/// Right eye contour
pub const RIGHT_EYE: EyeContour = EyeContour {
    eye: Eye::Right,
    indices: [33, 160, 158, 144, 153, 133],
};

// Contour constants must address the landmark model they were written for.
const _: () = assert!(LEFT_EYE.max_index() < FACE_MESH_LANDMARK_COUNT);
const _: () = assert!(RIGHT_EYE.max_index() < FACE_MESH_LANDMARK_COUNT);

impl EyeContour {
    pub const fn new(eye: Eye, indices: [usize; 6]) -> Self {
        Self { eye, indices }
    }

    /// Largest landmark index referenced by this contour
    pub const fn max_index(&self) -> usize {
        let mut max = 0;
        let mut i = 0;
        while i < self.indices.len() {
            if self.indices[i] > max {
                max = self.indices[i];
            }
            i += 1;
        }
        max
    }

    /// Minimum keypoint sequence length this contour can read from
    pub const fn required_len(&self) -> usize {
        self.max_index() + 1
    }
}
