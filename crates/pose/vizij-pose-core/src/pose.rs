//! Pose snapshots: per-joint rotation offsets plus per-part proportions.
//!
//! Poses are immutable value objects: every mutation path produces a fresh
//! snapshot from an old one plus a sparse delta, which keeps undo/redo
//! snapshot semantics trivially correct.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::skeleton::{BodyPart, Joint, BODY_PARTS, JOINTS};

/// Width/height scale multipliers applied to a part's raw dimensions.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proportion {
    pub w: f32,
    pub h: f32,
}

impl Default for Proportion {
    fn default() -> Self {
        Self { w: 1.0, h: 1.0 }
    }
}

/// One proportion axis (the UI edits them independently).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    W,
    H,
}

/// A full skeleton configuration: joint rotation offsets in degrees and
/// per-part proportions. Lookups are total over the fixed enumerations:
/// a missing joint reads as 0.0, a missing part as 1.0/1.0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(rename = "pivotOffsets")]
    pub offsets: HashMap<Joint, f32>,
    pub props: HashMap<BodyPart, Proportion>,
}

impl Pose {
    fn filled(offset_for: impl Fn(Joint) -> f32) -> Self {
        let offsets = JOINTS.iter().map(|j| (*j, offset_for(*j))).collect();
        let props = BODY_PARTS
            .iter()
            .map(|p| (*p, Proportion::default()))
            .collect();
        Self { offsets, props }
    }

    /// Canonical rest (T-)pose: every offset zero, every proportion 1.0.
    pub fn rest() -> Self {
        Self::filled(|_| 0.0)
    }

    /// The scrambled pose the figure starts in before calibration.
    pub fn challenge() -> Self {
        Self::filled(|j| match j {
            Joint::Waist | Joint::Torso | Joint::Neck => 180.0,
            Joint::Collar => 0.0,
            Joint::LShoulder => -95.0,
            Joint::RShoulder => 95.0,
            Joint::LHip => 5.0,
            Joint::RHip => -5.0,
            _ => 180.0,
        })
    }

    /// Relaxed stance: arms lowered from the T-pose, everything else zero.
    pub fn default_stance() -> Self {
        Self::filled(|j| match j {
            Joint::LShoulder => -75.0,
            Joint::RShoulder => 75.0,
            _ => 0.0,
        })
    }

    /// Rotation offset for a joint in degrees (0.0 when absent).
    #[inline]
    pub fn offset(&self, joint: Joint) -> f32 {
        self.offsets.get(&joint).copied().unwrap_or(0.0)
    }

    /// Proportion for a part (1.0/1.0 when absent).
    #[inline]
    pub fn proportion(&self, part: BodyPart) -> Proportion {
        self.props.get(&part).copied().unwrap_or_default()
    }

    /// New snapshot with one joint offset replaced.
    pub fn with_offset(&self, joint: Joint, value: f32) -> Pose {
        let mut next = self.clone();
        next.offsets.insert(joint, value);
        next
    }

    /// New snapshot with a sparse additive delta map applied.
    pub fn with_deltas(&self, deltas: &HashMap<Joint, f32>) -> Pose {
        let mut next = self.clone();
        for (joint, delta) in deltas {
            let v = next.offsets.get(joint).copied().unwrap_or(0.0) + delta;
            next.offsets.insert(*joint, v);
        }
        next
    }

    /// New snapshot with one part's proportion replaced.
    pub fn with_proportion(&self, part: BodyPart, prop: Proportion) -> Pose {
        let mut next = self.clone();
        next.props.insert(part, prop);
        next
    }

    /// New snapshot with one proportion axis replaced.
    pub fn with_proportion_axis(&self, part: BodyPart, axis: Axis, value: f32) -> Pose {
        let mut prop = self.proportion(part);
        match axis {
            Axis::W => prop.w = value,
            Axis::H => prop.h = value,
        }
        self.with_proportion(part, prop)
    }

    /// New snapshot with every proportion reset to 1.0/1.0.
    pub fn with_atomic_props(&self) -> Pose {
        let mut next = self.clone();
        next.props = BODY_PARTS
            .iter()
            .map(|p| (*p, Proportion::default()))
            .collect();
        next
    }

    /// New snapshot keeping proportions but taking every offset from `other`.
    pub fn with_offsets_from(&self, other: &Pose) -> Pose {
        let mut next = self.clone();
        next.offsets = JOINTS.iter().map(|j| (*j, other.offset(*j))).collect();
        next
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::rest()
    }
}
