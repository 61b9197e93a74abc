//! History engine: undo/redo stacks, the append-only event log, operator
//! keyframes, and timelapse interpolation between them.
//!
//! Undo entries are full pose snapshots (most-recent-last, capacity-bounded).
//! The redo stack's front is the next redo and is invalidated by any commit.
//! The event log holds both plain labeled entries and pose-carrying
//! snapshots; only the latter can be promoted to keyframes.

use serde::{Deserialize, Serialize};

use crate::interp::lerp_f32;
use crate::pose::{Pose, Proportion};
use crate::skeleton::{BODY_PARTS, JOINTS};

/// One history record. `pose` is present for snapshots and absent for plain
/// log messages; both shapes share the export schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub pose: Option<Pose>,
}

impl HistoryEntry {
    /// Display label for log listings: the label text, or a timestamped
    /// placeholder for unlabeled snapshots.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("Pose @ {}ms", self.timestamp_ms),
        }
    }
}

/// Undo/redo stacks, event log and keyframe sequence.
#[derive(Clone, Debug, Default)]
pub struct History {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    log: Vec<HistoryEntry>,
    keyframes: Vec<HistoryEntry>,
    undo_capacity: usize,
    log_capacity: usize,
}

impl History {
    pub fn new(undo_capacity: usize, log_capacity: usize) -> Self {
        Self {
            undo_capacity,
            log_capacity,
            ..Self::default()
        }
    }

    /// Record the pre-edit pose ahead of a discrete mutation. Evicts the
    /// oldest snapshot past capacity and invalidates the redo stack.
    pub fn commit(&mut self, pose: Pose, now_ms: u64) {
        while self.undo.len() >= self.undo_capacity.max(1) {
            self.undo.remove(0);
        }
        self.undo.push(HistoryEntry {
            timestamp_ms: now_ms,
            label: None,
            pose: Some(pose),
        });
        self.redo.clear();
    }

    /// Pop the most recent snapshot, parking `current` on the redo stack.
    /// Returns the pose to restore, or `None` when there is nothing to undo.
    pub fn undo(&mut self, current: Pose, now_ms: u64) -> Option<Pose> {
        let prev = self.undo.pop()?;
        self.redo.insert(
            0,
            HistoryEntry {
                timestamp_ms: now_ms,
                label: None,
                pose: Some(current),
            },
        );
        prev.pose
    }

    /// Inverse of [`History::undo`], consuming the redo stack's front.
    pub fn redo(&mut self, current: Pose, now_ms: u64) -> Option<Pose> {
        if self.redo.is_empty() {
            return None;
        }
        let next = self.redo.remove(0);
        while self.undo.len() >= self.undo_capacity.max(1) {
            self.undo.remove(0);
        }
        self.undo.push(HistoryEntry {
            timestamp_ms: now_ms,
            label: None,
            pose: Some(current),
        });
        next.pose
    }

    fn push_log(&mut self, entry: HistoryEntry) {
        while self.log.len() >= self.log_capacity.max(1) {
            self.log.remove(0);
        }
        self.log.push(entry);
    }

    /// Append a plain labeled entry to the live log.
    pub fn log_event(&mut self, label: impl Into<String>, now_ms: u64) {
        self.push_log(HistoryEntry {
            timestamp_ms: now_ms,
            label: Some(label.into()),
            pose: None,
        });
    }

    /// Append a pose-carrying snapshot to the live log.
    pub fn log_snapshot(&mut self, pose: Pose, label: impl Into<String>, now_ms: u64) {
        self.push_log(HistoryEntry {
            timestamp_ms: now_ms,
            label: Some(label.into()),
            pose: Some(pose),
        });
    }

    /// Promote a pose-carrying log entry into the keyframe sequence.
    /// Entries without a pose are not promotable; returns whether a keyframe
    /// was added.
    pub fn promote(&mut self, index: usize) -> bool {
        match self.log.get(index) {
            Some(entry) if entry.pose.is_some() => {
                self.keyframes.push(entry.clone());
                true
            }
            _ => false,
        }
    }

    /// Delete one log entry, returning it for the caller's confirmation
    /// message.
    pub fn delete(&mut self, index: usize) -> Option<HistoryEntry> {
        if index < self.log.len() {
            Some(self.log.remove(index))
        } else {
            None
        }
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn clear_keyframes(&mut self) {
        self.keyframes.clear();
    }

    pub fn log(&self) -> &[HistoryEntry] {
        &self.log
    }

    pub fn keyframes(&self) -> &[HistoryEntry] {
        &self.keyframes
    }

    /// Poses of the keyframe sequence, in promotion order.
    pub fn keyframe_poses(&self) -> Vec<Pose> {
        self.keyframes
            .iter()
            .filter_map(|k| k.pose.clone())
            .collect()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

/// Sample the keyframe sequence at global progress `p` in [0,1]: map `p` to
/// a segment index and local fraction, then lerp every joint offset and both
/// proportion axes between the bracketing keyframes. Total over its inputs:
/// an empty sequence yields the rest pose, a single frame is returned as-is.
pub fn sample_timelapse(frames: &[Pose], p: f32) -> Pose {
    match frames {
        [] => Pose::rest(),
        [only] => only.clone(),
        _ => {
            let p = p.clamp(0.0, 1.0);
            let segments = frames.len() - 1;
            let exact = p * segments as f32;
            let i = (exact.floor() as usize).min(segments - 1);
            let u = exact - i as f32;
            let (start, end) = (&frames[i], &frames[i + 1]);

            let mut out = start.clone();
            for j in JOINTS {
                out.offsets
                    .insert(j, lerp_f32(start.offset(j), end.offset(j), u));
            }
            for part in BODY_PARTS {
                let (a, b) = (start.proportion(part), end.proportion(part));
                out.props.insert(
                    part,
                    Proportion {
                        w: lerp_f32(a.w, b.w, u),
                        h: lerp_f32(a.h, b.h, u),
                    },
                );
            }
            out
        }
    }
}
