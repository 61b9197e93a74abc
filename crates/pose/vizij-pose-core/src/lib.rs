//! Vizij Pose Core (engine-agnostic)
//!
//! Kinematic and temporal-state engine for posing an articulated 2D
//! mannequin: skeletal model, forward-kinematics solver, bend/stretch joint
//! influence propagation, the interaction/calibration state machine, and the
//! history engine (undo/redo, event log, keyframe timelapse). Rendering and
//! input plumbing live in adapters; this crate only exposes the transform
//! read model and the command surface they drive.

pub mod config;
pub mod engine;
pub mod export;
pub mod history;
pub mod interp;
pub mod pose;
pub mod propagate;
pub mod skeleton;
pub mod solver;

// Re-exports for consumers (adapters)
pub use config::Config;
pub use engine::{InteractionState, PoseEngine};
pub use export::{export_history_json, parse_pose_string, pose_string, ParseError};
pub use history::{sample_timelapse, History, HistoryEntry};
pub use pose::{Axis, Pose, Proportion};
pub use propagate::{propagate, JointMode, JointModes};
pub use skeleton::{raw_dims, BodyPart, Joint, RawDims, Side, BODY_PARTS, JOINTS};
pub use solver::{
    collection_point, part_length, part_width, solve, GlobalTransform, TransformMap, Vec2,
    COLLECTION_POINT_FRACTION,
};
