//! Engine: pose ownership, the interaction state machine, and the
//! single-slot cooperative animation driver.
//!
//! Methods:
//! - pointer_down / pointer_move / pointer_up (drag lifecycle)
//! - rotate_joint, toggle_mode, set_proportion, reset_proportions, apply_pose
//! - start_calibration, play_timelapse, update (per-frame advance)
//! - undo / redo and the event-log operations
//!
//! All mutation funnels through one writer (this struct); the transform map
//! is refreshed synchronously on every pose change and is the sole read
//! model for the renderer and the collision consumer. Rejected transitions
//! are silent no-ops.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::export::{parse_pose_string, pose_string};
use crate::history::{sample_timelapse, History};
use crate::interp::{lerp_f32, snap_out_ease};
use crate::pose::{Axis, Pose};
use crate::propagate::{propagate, JointMode, JointModes};
use crate::skeleton::{BodyPart, Joint, Side, JOINTS};
use crate::solver::{self, GlobalTransform, TransformMap, Vec2};

/// The interaction state machine's states.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InteractionState {
    Idle,
    Dragging {
        joint: Joint,
        start_x: f32,
        start_offset: f32,
    },
    Calibrating,
    PlayingTimelapse,
}

/// The one active animation driver. Calibration easing and timelapse
/// interpolation are mutually exclusive; dropping the driver is the
/// cooperative cancellation path.
#[derive(Clone, Debug)]
enum Driver {
    Calibration { start: Pose, elapsed_ms: f32 },
    Timelapse { frames: Vec<Pose>, elapsed_ms: f32 },
}

/// Owns the current pose, joint modes, history and interaction state.
#[derive(Debug)]
pub struct PoseEngine {
    cfg: Config,
    pose: Pose,
    modes: JointModes,
    transforms: TransformMap,
    history: History,
    state: InteractionState,
    driver: Option<Driver>,
    calibrated: bool,
    pinned: Joint,
    root_position: Vec2,
    body_rotation: f32,
    clock_ms: f64,
}

impl PoseEngine {
    /// Create an engine holding the initial challenge pose, uncalibrated.
    pub fn new(cfg: Config) -> Self {
        let pose = Pose::challenge();
        let transforms = solver::solve(&pose, cfg.base_unit);
        Self {
            history: History::new(cfg.undo_capacity, cfg.log_capacity),
            cfg,
            pose,
            modes: JointModes::new(),
            transforms,
            state: InteractionState::Idle,
            driver: None,
            calibrated: false,
            pinned: Joint::Waist,
            root_position: Vec2::ZERO,
            body_rotation: 0.0,
            clock_ms: 0.0,
        }
    }

    // ---- frame advance ------------------------------------------------

    /// Advance the engine's clock and the active driver by `dt` seconds.
    /// Completion returns the driver slot to empty and the machine to
    /// `Idle`; calling with no active driver only advances the clock.
    pub fn update(&mut self, dt: f32) {
        let dt_ms = dt.max(0.0) * 1000.0;
        self.clock_ms += f64::from(dt_ms);

        let Some(mut driver) = self.driver.take() else {
            return;
        };
        let done = match &mut driver {
            Driver::Calibration { start, elapsed_ms } => {
                *elapsed_ms += dt_ms;
                let progress = (*elapsed_ms / self.cfg.calibration_duration_ms).min(1.0);
                let eased = snap_out_ease(progress);
                let mut next = self.pose.clone();
                for j in JOINTS {
                    next.offsets.insert(j, lerp_f32(start.offset(j), 0.0, eased));
                }
                self.set_pose(next);
                if progress >= 1.0 {
                    self.state = InteractionState::Idle;
                    self.calibrated = true;
                    let now = self.now_ms();
                    self.history
                        .log_snapshot(self.pose.clone(), "CALIBRATION_END", now);
                    self.history.log_event("SEQUENCE: SYSTEM ALIGNED.", now);
                }
                progress >= 1.0
            }
            Driver::Timelapse { frames, elapsed_ms } => {
                *elapsed_ms += dt_ms;
                let total = (frames.len().saturating_sub(1)) as f32 * self.cfg.timelapse_segment_ms;
                let progress = if total > 0.0 {
                    (*elapsed_ms / total).min(1.0)
                } else {
                    1.0
                };
                let next = sample_timelapse(frames, progress);
                self.set_pose(next);
                if progress >= 1.0 {
                    self.state = InteractionState::Idle;
                    let now = self.now_ms();
                    self.history
                        .log_event("SEQUENCE: KEYFRAME PLAYBACK COMPLETE.", now);
                }
                progress >= 1.0
            }
        };
        if !done {
            self.driver = Some(driver);
        }
    }

    // ---- drag lifecycle -----------------------------------------------

    /// Pointer press on a joint's anchor. Requires calibration and `Idle`;
    /// with the pin modifier held this reassigns the body-rotation pivot
    /// instead of starting a drag.
    pub fn pointer_down(&mut self, joint: Joint, x: f32, pin_modifier: bool) {
        if !self.calibrated || self.state != InteractionState::Idle {
            return;
        }
        if pin_modifier {
            self.set_pin(joint);
            return;
        }
        let now = self.now_ms();
        self.history.commit(self.pose.clone(), now);
        self.history.log_snapshot(
            self.pose.clone(),
            format!("START_DRAG_{}", joint.as_str()),
            now,
        );
        self.state = InteractionState::Dragging {
            joint,
            start_x: x,
            start_offset: self.pose.offset(joint),
        };
    }

    /// Pointer move while dragging: horizontal travel maps to degrees via
    /// the drag sensitivity, then flows through propagation.
    pub fn pointer_move(&mut self, x: f32) {
        let InteractionState::Dragging {
            joint,
            start_x,
            start_offset,
        } = self.state
        else {
            return;
        };
        let value = start_offset + (x - start_x) * self.cfg.drag_sensitivity;
        self.rotate_joint(joint, value);
    }

    /// Pointer release: commits the drag's final log entry.
    pub fn pointer_up(&mut self) {
        if let InteractionState::Dragging { joint, .. } = self.state {
            let now = self.now_ms();
            self.history.log_snapshot(
                self.pose.clone(),
                format!("END_DRAG_{}", joint.as_str()),
                now,
            );
            self.state = InteractionState::Idle;
        }
    }

    /// Reassign the joint the renderer uses as body-rotation pivot.
    pub fn set_pin(&mut self, joint: Joint) {
        self.pinned = joint;
        let now = self.now_ms();
        self.history.log_event(
            format!(
                "PIN SET: Puppet now pivots on {}.",
                joint.as_str().replace('_', " ")
            ),
            now,
        );
    }

    // ---- pose mutation ------------------------------------------------

    /// Set one joint's rotation offset, propagating through bend/stretch
    /// modes. A zero delta emits no new pose (and no history entry).
    pub fn rotate_joint(&mut self, joint: Joint, value: f32) {
        if self.state == InteractionState::PlayingTimelapse {
            return;
        }
        let delta = value - self.pose.offset(joint);
        let deltas = propagate(&self.modes, joint, delta);
        if deltas.is_empty() {
            return;
        }
        let next = self.pose.with_deltas(&deltas);
        self.set_pose(next);
    }

    /// Toggle a joint's bend/stretch mode (selecting the active mode returns
    /// it to `fk`).
    pub fn toggle_mode(&mut self, joint: Joint, mode: JointMode) {
        self.modes.toggle(joint, mode);
    }

    /// Set one proportion axis for a part.
    pub fn set_proportion(&mut self, part: BodyPart, axis: Axis, value: f32) {
        if self.state == InteractionState::PlayingTimelapse {
            return;
        }
        let next = self.pose.with_proportion_axis(part, axis, value);
        self.set_pose(next);
    }

    /// Reset every proportion to 1.0/1.0 (a committing action).
    pub fn reset_proportions(&mut self) {
        if self.state == InteractionState::PlayingTimelapse {
            return;
        }
        let now = self.now_ms();
        self.history.commit(self.pose.clone(), now);
        let next = self.pose.with_atomic_props();
        self.set_pose(next);
        self.history
            .log_snapshot(self.pose.clone(), "PROPS_RESET", now);
        self.history
            .log_event("COMMAND: Anatomical proportions reset.", now);
    }

    /// Apply a scripted pose's offsets wholesale (proportions are kept).
    pub fn apply_pose(&mut self, target: &Pose, name: &str) {
        if self.state == InteractionState::PlayingTimelapse {
            return;
        }
        let now = self.now_ms();
        self.history.commit(self.pose.clone(), now);
        let next = self.pose.with_offsets_from(target);
        self.set_pose(next);
        self.history.log_snapshot(
            self.pose.clone(),
            format!("SET_POSE_{}", name.to_uppercase()),
            now,
        );
        self.history
            .log_event(format!("COMMAND: Applied {name} state."), now);
    }

    // ---- scripted transitions -----------------------------------------

    /// One-time eased transition from the current pose to the rest pose.
    /// Re-invoking after completion (or during any non-idle state) is a
    /// no-op: calibration is a terminal, idempotent unlock.
    pub fn start_calibration(&mut self) {
        if self.calibrated || self.state != InteractionState::Idle {
            return;
        }
        let now = self.now_ms();
        self.history.commit(self.pose.clone(), now);
        self.history
            .log_snapshot(self.pose.clone(), "CALIBRATION_START", now);
        self.history.log_event("SEQUENCE: CALIBRATION START...", now);
        self.state = InteractionState::Calibrating;
        self.driver = Some(Driver::Calibration {
            start: self.pose.clone(),
            elapsed_ms: 0.0,
        });
    }

    /// Begin keyframe playback. Requires `Idle` and at least two keyframes;
    /// all pose mutation is rejected until playback completes.
    pub fn play_timelapse(&mut self) {
        if self.state != InteractionState::Idle {
            return;
        }
        let frames = self.history.keyframe_poses();
        if frames.len() < 2 {
            return;
        }
        let now = self.now_ms();
        self.history.log_event(
            format!("SEQUENCE: RECREATION OF {} KEYFRAMES.", frames.len()),
            now,
        );
        self.state = InteractionState::PlayingTimelapse;
        self.driver = Some(Driver::Timelapse {
            frames,
            elapsed_ms: 0.0,
        });
    }

    // ---- history operations -------------------------------------------

    /// Restore the previous snapshot. No-op with an empty stack or during
    /// playback.
    pub fn undo(&mut self) {
        if self.state == InteractionState::PlayingTimelapse {
            return;
        }
        let now = self.now_ms();
        if let Some(prev) = self.history.undo(self.pose.clone(), now) {
            self.set_pose(prev);
            self.history.log_event("UNDO: System state reverted.", now);
        }
    }

    /// Reapply the most recently undone snapshot.
    pub fn redo(&mut self) {
        if self.state == InteractionState::PlayingTimelapse {
            return;
        }
        let now = self.now_ms();
        if let Some(next) = self.history.redo(self.pose.clone(), now) {
            self.set_pose(next);
            self.history.log_event("REDO: System state reapplied.", now);
        }
    }

    /// Promote a pose-carrying log entry to the keyframe sequence.
    pub fn promote_log_entry(&mut self, index: usize) {
        if self.history.promote(index) {
            let now = self.now_ms();
            self.history
                .log_event(format!("KEYFRAME ADDED: Pose from log #{}.", index + 1), now);
        }
    }

    /// Delete one log entry.
    pub fn delete_log_entry(&mut self, index: usize) {
        if let Some(entry) = self.history.delete(index) {
            let now = self.now_ms();
            self.history.log_event(
                format!("LOG DELETED: \"{}\" removed.", entry.display_label()),
                now,
            );
        }
    }

    pub fn clear_log(&mut self) {
        self.history.clear_log();
        let now = self.now_ms();
        self.history
            .log_event("COMMAND: Recording history cleared.", now);
    }

    pub fn clear_keyframes(&mut self) {
        self.history.clear_keyframes();
        let now = self.now_ms();
        self.history
            .log_event("COMMAND: Keyframe sequence cleared.", now);
    }

    // ---- serialization ------------------------------------------------

    /// The canonical state string for the current pose.
    pub fn pose_string(&self) -> String {
        pose_string(&self.pose)
    }

    /// Apply an uploaded state string. Parse failures are reported into the
    /// event log and never propagate; the state machine must survive bad
    /// input.
    pub fn load_pose_string(&mut self, s: &str) {
        if self.state == InteractionState::PlayingTimelapse {
            return;
        }
        let now = self.now_ms();
        match parse_pose_string(s) {
            Ok(pose) => {
                self.history.commit(self.pose.clone(), now);
                self.set_pose(pose);
                self.history
                    .log_snapshot(self.pose.clone(), "POSE_UPLOAD", now);
                self.history.log_event("IO: Pose state uploaded.", now);
            }
            Err(err) => {
                self.history
                    .log_event(format!("ERR: Pose upload failed: {err}."), now);
            }
        }
    }

    /// The event log serialized for export.
    pub fn export_history_json(&self) -> serde_json::Value {
        crate::export::export_history_json(self.history.log())
    }

    // ---- render root state --------------------------------------------

    pub fn set_root_position(&mut self, position: Vec2) {
        self.root_position = position;
    }

    pub fn set_body_rotation(&mut self, degrees: f32) {
        self.body_rotation = degrees;
    }

    /// World position of the pinned pivot joint, resolved through the
    /// joint→part driver map (the renderer rotates the figure around it).
    pub fn pinned_pivot_position(&self) -> Vec2 {
        self.transforms.get(self.pinned.driven_part()).position
    }

    // ---- read model ----------------------------------------------------

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn transforms(&self) -> &TransformMap {
        &self.transforms
    }

    pub fn transform(&self, part: BodyPart) -> GlobalTransform {
        self.transforms.get(part)
    }

    /// Scaled kinematic length of a part under the current pose.
    pub fn part_length(&self, part: BodyPart) -> f32 {
        solver::part_length(&self.pose, self.cfg.base_unit, part)
    }

    /// Scaled visual width of a part under the current pose.
    pub fn part_width(&self, part: BodyPart) -> f32 {
        solver::part_width(&self.pose, self.cfg.base_unit, part)
    }

    /// The collision consumer's collection point for one hand.
    pub fn collection_point(&self, side: Side) -> Vec2 {
        solver::collection_point(&self.transforms, &self.pose, self.cfg.base_unit, side)
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn modes(&self) -> &JointModes {
        &self.modes
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn pinned_joint(&self) -> Joint {
        self.pinned
    }

    pub fn root_position(&self) -> Vec2 {
        self.root_position
    }

    pub fn body_rotation(&self) -> f32 {
        self.body_rotation
    }

    pub fn now_ms(&self) -> u64 {
        self.clock_ms as u64
    }

    /// Install a new pose snapshot and refresh the transform read model.
    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.transforms = solver::solve(&self.pose, self.cfg.base_unit);
    }
}

impl Default for PoseEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
