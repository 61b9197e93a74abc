//! Forward kinematics: pose + base unit -> absolute transform per body part.
//!
//! The traversal is hand-specified rather than generic tree recursion because
//! the left/right limbs attach to shared parents with side-dependent offsets:
//! the torso chain grows upward (-Y), limbs grow downward (+Y), shoulders hang
//! off the collar's distal point with a lateral rigging offset and a ±90°
//! bias, and hips anchor directly at the waist position rather than cascading
//! through the torso. The hip/shoulder asymmetry is intentional (hips and
//! torso are siblings under the waist) and must not be "fixed": doing so
//! would change the meaning of every recorded pose.

use serde::{Deserialize, Serialize};

use crate::pose::Pose;
use crate::skeleton::{raw_dims, BodyPart, Joint, Side, BODY_PARTS};

/// Fraction of the hand's length past the wrist where the minigame's
/// collection point sits.
pub const COLLECTION_POINT_FRACTION: f32 = 0.85;

/// 2D point/vector in device units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Rotate by an angle in degrees (screen coordinates, +Y down).
    #[inline]
    pub fn rotate_deg(self, angle_deg: f32) -> Vec2 {
        let r = angle_deg.to_radians();
        let (s, c) = r.sin_cos();
        Vec2 {
            x: self.x * c - self.y * s,
            y: self.x * s + self.y * c,
        }
    }
}

/// Absolute placement of one body part: anchor position plus accumulated
/// rotation in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalTransform {
    pub position: Vec2,
    pub rotation: f32,
}

/// The solver's output: one [`GlobalTransform`] per body part. This is the
/// sole read model for the renderer and the collision consumer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformMap {
    transforms: [GlobalTransform; 18],
}

impl TransformMap {
    #[inline]
    pub fn get(&self, part: BodyPart) -> GlobalTransform {
        self.transforms[part as usize]
    }

    #[inline]
    fn set(&mut self, part: BodyPart, t: GlobalTransform) {
        self.transforms[part as usize] = t;
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyPart, GlobalTransform)> + '_ {
        BODY_PARTS.iter().map(move |p| (*p, self.get(*p)))
    }
}

/// Scaled kinematic length of a part: raw anatomy × base unit × `h` scale.
#[inline]
pub fn part_length(pose: &Pose, base_unit: f32, part: BodyPart) -> f32 {
    raw_dims(part).h * base_unit * pose.proportion(part).h
}

/// Scaled visual width of a part: raw anatomy × base unit × `w` scale.
#[inline]
pub fn part_width(pose: &Pose, base_unit: f32, part: BodyPart) -> f32 {
    raw_dims(part).w * base_unit * pose.proportion(part).w
}

/// Solve the full skeleton. Pure and total: identical inputs produce
/// identical maps and no input can make it fail.
pub fn solve(pose: &Pose, base_unit: f32) -> TransformMap {
    let mut out = TransformMap::default();
    let len = |part: BodyPart| part_length(pose, base_unit, part);

    // Trunk chain, growing upward.
    let waist_rot = pose.offset(Joint::Waist);
    let waist_pos = Vec2::ZERO;
    out.set(
        BodyPart::Waist,
        GlobalTransform {
            position: waist_pos,
            rotation: waist_rot,
        },
    );

    let torso_rot = waist_rot + pose.offset(Joint::Torso);
    let torso_pos = waist_pos.add(Vec2::new(0.0, -len(BodyPart::Waist)).rotate_deg(waist_rot));
    out.set(
        BodyPart::Torso,
        GlobalTransform {
            position: torso_pos,
            rotation: torso_rot,
        },
    );

    let collar_rot = torso_rot + pose.offset(Joint::Collar);
    let collar_pos = torso_pos.add(Vec2::new(0.0, -len(BodyPart::Torso)).rotate_deg(torso_rot));
    out.set(
        BodyPart::Collar,
        GlobalTransform {
            position: collar_pos,
            rotation: collar_rot,
        },
    );

    let collar_end = collar_pos.add(Vec2::new(0.0, -len(BodyPart::Collar)).rotate_deg(collar_rot));
    let neck_rot = collar_rot + pose.offset(Joint::Neck);
    out.set(
        BodyPart::Head,
        GlobalTransform {
            position: collar_end,
            rotation: neck_rot,
        },
    );

    // Arms: shoulders hang off the collar's distal point, laterally offset,
    // then chain downward through elbow and hand.
    for side in Side::BOTH {
        let (upper, lower, hand) = arm_parts(side);
        let sx = side.shoulder_x_offset() * base_unit;
        let sh_rot = collar_rot + side.shoulder_bias_deg() + pose.offset(side.shoulder());
        let sh_pos = collar_end.add(Vec2::new(sx, 0.0).rotate_deg(collar_rot));
        out.set(
            upper,
            GlobalTransform {
                position: sh_pos,
                rotation: sh_rot,
            },
        );

        let el_rot = sh_rot + pose.offset(side.elbow());
        let el_pos = sh_pos.add(Vec2::new(0.0, len(upper)).rotate_deg(sh_rot));
        out.set(
            lower,
            GlobalTransform {
                position: el_pos,
                rotation: el_rot,
            },
        );

        let hand_rot = el_rot + pose.offset(side.hand());
        let hand_pos = el_pos.add(Vec2::new(0.0, len(lower)).rotate_deg(el_rot));
        out.set(
            hand,
            GlobalTransform {
                position: hand_pos,
                rotation: hand_rot,
            },
        );
    }

    // Legs: hips anchor at the waist position (siblings of the torso), then
    // chain downward through knee, foot and toe.
    for side in Side::BOTH {
        let (thigh, calf, foot, toe) = leg_parts(side);
        let hip_rot = waist_rot + pose.offset(side.hip());
        out.set(
            thigh,
            GlobalTransform {
                position: waist_pos,
                rotation: hip_rot,
            },
        );

        let knee_rot = hip_rot + pose.offset(side.knee());
        let knee_pos = waist_pos.add(Vec2::new(0.0, len(thigh)).rotate_deg(hip_rot));
        out.set(
            calf,
            GlobalTransform {
                position: knee_pos,
                rotation: knee_rot,
            },
        );

        let ankle_rot = knee_rot + pose.offset(side.foot());
        let ankle_pos = knee_pos.add(Vec2::new(0.0, len(calf)).rotate_deg(knee_rot));
        out.set(
            foot,
            GlobalTransform {
                position: ankle_pos,
                rotation: ankle_rot,
            },
        );

        let toe_rot = ankle_rot + pose.offset(side.toe());
        let toe_pos = ankle_pos.add(Vec2::new(0.0, len(foot)).rotate_deg(ankle_rot));
        out.set(
            toe,
            GlobalTransform {
                position: toe_pos,
                rotation: toe_rot,
            },
        );
    }

    out
}

/// Derived read for the collision consumer: a point a fixed fraction past the
/// hand's distal end along the hand's own rotation.
pub fn collection_point(map: &TransformMap, pose: &Pose, base_unit: f32, side: Side) -> Vec2 {
    let hand = match side {
        Side::Left => BodyPart::LHand,
        Side::Right => BodyPart::RHand,
    };
    let t = map.get(hand);
    let reach = part_length(pose, base_unit, hand) * COLLECTION_POINT_FRACTION;
    t.position.add(Vec2::new(0.0, reach).rotate_deg(t.rotation))
}

fn arm_parts(side: Side) -> (BodyPart, BodyPart, BodyPart) {
    match side {
        Side::Left => (BodyPart::LUpperArm, BodyPart::LLowerArm, BodyPart::LHand),
        Side::Right => (BodyPart::RUpperArm, BodyPart::RLowerArm, BodyPart::RHand),
    }
}

fn leg_parts(side: Side) -> (BodyPart, BodyPart, BodyPart, BodyPart) {
    match side {
        Side::Left => (
            BodyPart::LUpperLeg,
            BodyPart::LLowerLeg,
            BodyPart::LFoot,
            BodyPart::LToe,
        ),
        Side::Right => (
            BodyPart::RUpperLeg,
            BodyPart::RLowerLeg,
            BodyPart::RFoot,
            BodyPart::RToe,
        ),
    }
}
