//! Joint influence propagation: turn one joint's rotation delta into the
//! full set of per-joint deltas implied by each joint's bend/stretch mode.
//!
//! The push is parent-to-child and depth-first. An `fk` joint halts
//! propagation along its entire subtree regardless of its descendants'
//! modes. The traversal is an explicit work-stack over the kinematic tree
//! and returns a complete delta map; callers apply the map as one atomic
//! pose snapshot, so no partially-propagated state is ever observable.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::skeleton::Joint;

/// Propagation rule for one joint.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointMode {
    /// Rotating this joint leaves its children untouched.
    #[default]
    Fk,
    /// Children receive the same delta as this joint.
    Bend,
    /// Children receive the negated delta.
    Stretch,
}

/// Operator-assigned mode per joint. Lookups are total (missing = `Fk`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointModes {
    modes: HashMap<Joint, JointMode>,
}

impl JointModes {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, joint: Joint) -> JointMode {
        self.modes.get(&joint).copied().unwrap_or_default()
    }

    pub fn set(&mut self, joint: Joint, mode: JointMode) {
        self.modes.insert(joint, mode);
    }

    /// UI toggle semantics: selecting a joint's active mode switches it back
    /// to `Fk`, anything else activates the requested mode.
    pub fn toggle(&mut self, joint: Joint, mode: JointMode) {
        let next = if self.get(joint) == mode {
            JointMode::Fk
        } else {
            mode
        };
        self.modes.insert(joint, next);
    }
}

/// Compute the additive delta per joint for a change of `delta` degrees at
/// `target`. A zero delta is a no-op and returns an empty map so callers can
/// skip emitting a new pose (and a redundant history entry).
pub fn propagate(modes: &JointModes, target: Joint, delta: f32) -> HashMap<Joint, f32> {
    let mut deltas = HashMap::new();
    if delta == 0.0 {
        return deltas;
    }
    deltas.insert(target, delta);

    // Depth-first push; each node is reached through its unique parent, so
    // every joint is assigned at most one delta.
    let mut stack = vec![(target, delta)];
    while let Some((joint, applied)) = stack.pop() {
        let child_delta = match modes.get(joint) {
            JointMode::Fk => continue,
            JointMode::Bend => applied,
            JointMode::Stretch => -applied,
        };
        for child in joint.children() {
            deltas.insert(*child, child_delta);
            stack.push((*child, child_delta));
        }
    }
    deltas
}
