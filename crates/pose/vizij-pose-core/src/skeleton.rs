//! Skeletal model: joint/part enumerations, the kinematic tree, driver maps,
//! and the raw anatomy/rigging constants. Read-only configuration; nothing in
//! this module is mutated after process start.

use serde::{Deserialize, Serialize};

/// A named rotational degree of freedom in the kinematic tree.
/// Canonical order (export order) is the order of [`JOINTS`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Waist,
    Torso,
    Collar,
    Neck,
    LShoulder,
    LElbow,
    LHand,
    RShoulder,
    RElbow,
    RHand,
    LHip,
    LKnee,
    LFoot,
    LToe,
    RHip,
    RKnee,
    RFoot,
    RToe,
}

/// A named rigid segment, driven by exactly one joint's cumulative rotation.
/// Canonical order (export order) is the order of [`BODY_PARTS`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Head,
    Collar,
    Torso,
    Waist,
    LUpperArm,
    LLowerArm,
    LHand,
    RUpperArm,
    RLowerArm,
    RHand,
    LUpperLeg,
    LLowerLeg,
    LFoot,
    LToe,
    RUpperLeg,
    RLowerLeg,
    RFoot,
    RToe,
}

/// All joints in canonical export order.
pub const JOINTS: [Joint; 18] = [
    Joint::Waist,
    Joint::Torso,
    Joint::Collar,
    Joint::Neck,
    Joint::LShoulder,
    Joint::LElbow,
    Joint::LHand,
    Joint::RShoulder,
    Joint::RElbow,
    Joint::RHand,
    Joint::LHip,
    Joint::LKnee,
    Joint::LFoot,
    Joint::LToe,
    Joint::RHip,
    Joint::RKnee,
    Joint::RFoot,
    Joint::RToe,
];

/// All body parts in canonical export order.
pub const BODY_PARTS: [BodyPart; 18] = [
    BodyPart::Head,
    BodyPart::Collar,
    BodyPart::Torso,
    BodyPart::Waist,
    BodyPart::LUpperArm,
    BodyPart::LLowerArm,
    BodyPart::LHand,
    BodyPart::RUpperArm,
    BodyPart::RLowerArm,
    BodyPart::RHand,
    BodyPart::LUpperLeg,
    BodyPart::LLowerLeg,
    BodyPart::LFoot,
    BodyPart::LToe,
    BodyPart::RUpperLeg,
    BodyPart::RLowerLeg,
    BodyPart::RFoot,
    BodyPart::RToe,
];

impl Joint {
    /// Ordered direct children in the kinematic tree. `waist` roots the
    /// torso branch and both leg branches; hands, toes and the neck are
    /// leaves.
    pub fn children(self) -> &'static [Joint] {
        match self {
            Joint::Waist => &[Joint::Torso, Joint::LHip, Joint::RHip],
            Joint::Torso => &[Joint::Collar],
            Joint::Collar => &[Joint::Neck, Joint::LShoulder, Joint::RShoulder],
            Joint::Neck => &[],
            Joint::LShoulder => &[Joint::LElbow],
            Joint::LElbow => &[Joint::LHand],
            Joint::LHand => &[],
            Joint::RShoulder => &[Joint::RElbow],
            Joint::RElbow => &[Joint::RHand],
            Joint::RHand => &[],
            Joint::LHip => &[Joint::LKnee],
            Joint::LKnee => &[Joint::LFoot],
            Joint::LFoot => &[Joint::LToe],
            Joint::LToe => &[],
            Joint::RHip => &[Joint::RKnee],
            Joint::RKnee => &[Joint::RFoot],
            Joint::RFoot => &[Joint::RToe],
            Joint::RToe => &[],
        }
    }

    /// The body part whose rotation this joint drives.
    pub fn driven_part(self) -> BodyPart {
        match self {
            Joint::Waist => BodyPart::Waist,
            Joint::Torso => BodyPart::Torso,
            Joint::Collar => BodyPart::Collar,
            Joint::Neck => BodyPart::Head,
            Joint::LShoulder => BodyPart::LUpperArm,
            Joint::LElbow => BodyPart::LLowerArm,
            Joint::LHand => BodyPart::LHand,
            Joint::RShoulder => BodyPart::RUpperArm,
            Joint::RElbow => BodyPart::RLowerArm,
            Joint::RHand => BodyPart::RHand,
            Joint::LHip => BodyPart::LUpperLeg,
            Joint::LKnee => BodyPart::LLowerLeg,
            Joint::LFoot => BodyPart::LFoot,
            Joint::LToe => BodyPart::LToe,
            Joint::RHip => BodyPart::RUpperLeg,
            Joint::RKnee => BodyPart::RLowerLeg,
            Joint::RFoot => BodyPart::RFoot,
            Joint::RToe => BodyPart::RToe,
        }
    }

    /// Canonical (export) name.
    pub fn as_str(self) -> &'static str {
        match self {
            Joint::Waist => "waist",
            Joint::Torso => "torso",
            Joint::Collar => "collar",
            Joint::Neck => "neck",
            Joint::LShoulder => "l_shoulder",
            Joint::LElbow => "l_elbow",
            Joint::LHand => "l_hand",
            Joint::RShoulder => "r_shoulder",
            Joint::RElbow => "r_elbow",
            Joint::RHand => "r_hand",
            Joint::LHip => "l_hip",
            Joint::LKnee => "l_knee",
            Joint::LFoot => "l_foot",
            Joint::LToe => "l_toe",
            Joint::RHip => "r_hip",
            Joint::RKnee => "r_knee",
            Joint::RFoot => "r_foot",
            Joint::RToe => "r_toe",
        }
    }

    /// Inverse of [`Joint::as_str`]; `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Joint> {
        JOINTS.iter().copied().find(|j| j.as_str() == name)
    }
}

impl BodyPart {
    /// The joint that drives this part's rotation (inverse of
    /// [`Joint::driven_part`]).
    pub fn driver(self) -> Joint {
        match self {
            BodyPart::Head => Joint::Neck,
            BodyPart::Collar => Joint::Collar,
            BodyPart::Torso => Joint::Torso,
            BodyPart::Waist => Joint::Waist,
            BodyPart::LUpperArm => Joint::LShoulder,
            BodyPart::LLowerArm => Joint::LElbow,
            BodyPart::LHand => Joint::LHand,
            BodyPart::RUpperArm => Joint::RShoulder,
            BodyPart::RLowerArm => Joint::RElbow,
            BodyPart::RHand => Joint::RHand,
            BodyPart::LUpperLeg => Joint::LHip,
            BodyPart::LLowerLeg => Joint::LKnee,
            BodyPart::LFoot => Joint::LFoot,
            BodyPart::LToe => Joint::LToe,
            BodyPart::RUpperLeg => Joint::RHip,
            BodyPart::RLowerLeg => Joint::RKnee,
            BodyPart::RFoot => Joint::RFoot,
            BodyPart::RToe => Joint::RToe,
        }
    }

    /// Canonical (export) name.
    pub fn as_str(self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::Collar => "collar",
            BodyPart::Torso => "torso",
            BodyPart::Waist => "waist",
            BodyPart::LUpperArm => "l_upper_arm",
            BodyPart::LLowerArm => "l_lower_arm",
            BodyPart::LHand => "l_hand",
            BodyPart::RUpperArm => "r_upper_arm",
            BodyPart::RLowerArm => "r_lower_arm",
            BodyPart::RHand => "r_hand",
            BodyPart::LUpperLeg => "l_upper_leg",
            BodyPart::LLowerLeg => "l_lower_leg",
            BodyPart::LFoot => "l_foot",
            BodyPart::LToe => "l_toe",
            BodyPart::RUpperLeg => "r_upper_leg",
            BodyPart::RLowerLeg => "r_lower_leg",
            BodyPart::RFoot => "r_foot",
            BodyPart::RToe => "r_toe",
        }
    }

    /// Inverse of [`BodyPart::as_str`]; `None` for unknown names.
    pub fn from_name(name: &str) -> Option<BodyPart> {
        BODY_PARTS.iter().copied().find(|p| p.as_str() == name)
    }
}

/// Left/right limb selector for the side-symmetric arm and leg chains.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn shoulder(self) -> Joint {
        match self {
            Side::Left => Joint::LShoulder,
            Side::Right => Joint::RShoulder,
        }
    }
    pub fn elbow(self) -> Joint {
        match self {
            Side::Left => Joint::LElbow,
            Side::Right => Joint::RElbow,
        }
    }
    pub fn hand(self) -> Joint {
        match self {
            Side::Left => Joint::LHand,
            Side::Right => Joint::RHand,
        }
    }
    pub fn hip(self) -> Joint {
        match self {
            Side::Left => Joint::LHip,
            Side::Right => Joint::RHip,
        }
    }
    pub fn knee(self) -> Joint {
        match self {
            Side::Left => Joint::LKnee,
            Side::Right => Joint::RKnee,
        }
    }
    pub fn foot(self) -> Joint {
        match self {
            Side::Left => Joint::LFoot,
            Side::Right => Joint::RFoot,
        }
    }
    pub fn toe(self) -> Joint {
        match self {
            Side::Left => Joint::LToe,
            Side::Right => Joint::RToe,
        }
    }

    /// Shoulder rotation bias: +90 for the left arm, -90 for the right.
    pub fn shoulder_bias_deg(self) -> f32 {
        match self {
            Side::Left => 90.0,
            Side::Right => -90.0,
        }
    }

    /// Lateral shoulder anchor offset from the collar's distal center, in
    /// head units (scaled by the base unit at solve time).
    pub fn shoulder_x_offset(self) -> f32 {
        match self {
            Side::Left => rigging::L_SHOULDER_X_OFFSET_FROM_COLLAR_CENTER,
            Side::Right => rigging::R_SHOULDER_X_OFFSET_FROM_COLLAR_CENTER,
        }
    }
}

/// Raw (unscaled) kinematic dimensions of a part, relative to one head unit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawDims {
    /// Kinematic length along the bone axis.
    pub h: f32,
    /// Visual width across the bone axis.
    pub w: f32,
}

/// Raw anatomy per part, relative to the base head unit.
pub fn raw_dims(part: BodyPart) -> RawDims {
    use anatomy::*;
    match part {
        BodyPart::Head => RawDims { h: HEAD, w: HEAD_WIDTH },
        BodyPart::Collar => RawDims { h: COLLAR, w: COLLAR_WIDTH },
        BodyPart::Torso => RawDims { h: TORSO, w: TORSO_WIDTH },
        BodyPart::Waist => RawDims { h: WAIST, w: WAIST_WIDTH },
        BodyPart::LUpperArm | BodyPart::RUpperArm => RawDims { h: UPPER_ARM, w: LIMB_WIDTH_ARM },
        BodyPart::LLowerArm | BodyPart::RLowerArm => {
            RawDims { h: LOWER_ARM, w: LIMB_WIDTH_FOREARM }
        }
        BodyPart::LHand | BodyPart::RHand => RawDims { h: HAND, w: HAND_WIDTH },
        BodyPart::LUpperLeg | BodyPart::RUpperLeg => RawDims { h: LEG_UPPER, w: LIMB_WIDTH_THIGH },
        BodyPart::LLowerLeg | BodyPart::RLowerLeg => RawDims { h: LEG_LOWER, w: LIMB_WIDTH_CALF },
        BodyPart::LFoot | BodyPart::RFoot => RawDims { h: FOOT, w: FOOT_WIDTH },
        BodyPart::LToe | BodyPart::RToe => RawDims { h: TOE, w: TOE_WIDTH },
    }
}

/// Anatomy constants relative to the base head unit.
pub mod anatomy {
    pub const HEAD: f32 = 0.50;
    pub const HEAD_WIDTH: f32 = 0.36;
    pub const COLLAR: f32 = 0.18;
    pub const COLLAR_WIDTH: f32 = 0.55;
    pub const TORSO: f32 = 0.62;
    pub const TORSO_WIDTH: f32 = 0.50;
    pub const WAIST: f32 = 0.38;
    pub const WAIST_WIDTH: f32 = 0.42;
    pub const UPPER_ARM: f32 = 0.45;
    pub const LOWER_ARM: f32 = 0.40;
    pub const HAND: f32 = 0.22;
    pub const HAND_WIDTH: f32 = 0.12;
    pub const LEG_UPPER: f32 = 0.60;
    pub const LEG_LOWER: f32 = 0.55;
    pub const FOOT: f32 = 0.30;
    pub const TOE: f32 = 0.12;
    pub const LIMB_WIDTH_ARM: f32 = 0.14;
    pub const LIMB_WIDTH_FOREARM: f32 = 0.11;
    pub const LIMB_WIDTH_THIGH: f32 = 0.18;
    pub const LIMB_WIDTH_CALF: f32 = 0.14;
    pub const FOOT_WIDTH: f32 = 0.12;
    // Toe base matches the foot's widened distal end so the caps align.
    pub const TOE_WIDTH: f32 = 0.17;
}

/// Rigging constants (head units unless noted).
pub mod rigging {
    pub const L_SHOULDER_X_OFFSET_FROM_COLLAR_CENTER: f32 = 0.30;
    pub const R_SHOULDER_X_OFFSET_FROM_COLLAR_CENTER: f32 = -0.30;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_covers_every_joint_once() {
        // Every joint except the root appears as exactly one child.
        let mut seen = std::collections::HashMap::new();
        for j in JOINTS {
            for c in j.children() {
                *seen.entry(*c).or_insert(0u32) += 1;
            }
        }
        assert!(!seen.contains_key(&Joint::Waist));
        for j in JOINTS.iter().filter(|j| **j != Joint::Waist) {
            assert_eq!(seen.get(j), Some(&1), "{:?} should have one parent", j);
        }
    }

    #[test]
    fn driver_maps_are_inverse() {
        for j in JOINTS {
            assert_eq!(j.driven_part().driver(), j);
        }
        for p in BODY_PARTS {
            assert_eq!(p.driver().driven_part(), p);
        }
    }

    #[test]
    fn names_round_trip() {
        for j in JOINTS {
            assert_eq!(Joint::from_name(j.as_str()), Some(j));
        }
        for p in BODY_PARTS {
            assert_eq!(BodyPart::from_name(p.as_str()), Some(p));
        }
        assert_eq!(Joint::from_name("sternum"), None);
    }

    #[test]
    fn serde_names_match_canonical() {
        for j in JOINTS {
            let s = serde_json::to_string(&j).unwrap();
            assert_eq!(s, format!("\"{}\"", j.as_str()));
        }
        for p in BODY_PARTS {
            let s = serde_json::to_string(&p).unwrap();
            assert_eq!(s, format!("\"{}\"", p.as_str()));
        }
    }
}
