//! Core configuration for vizij-pose-core.

use serde::{Deserialize, Serialize};

/// Tuning knobs for the engine. Keep this minimal; expand as needed without
/// breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base head-unit height in device units; all raw anatomy scales by this.
    pub base_unit: f32,

    /// Pointer-drag sensitivity in degrees per device unit of horizontal
    /// travel.
    pub drag_sensitivity: f32,

    /// Maximum undo snapshots retained (oldest evicted first).
    pub undo_capacity: usize,

    /// Maximum live event-log entries retained while recording.
    pub log_capacity: usize,

    /// Calibration snap-out duration in milliseconds.
    pub calibration_duration_ms: f32,

    /// Per-segment timelapse duration in milliseconds.
    pub timelapse_segment_ms: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_unit: 150.0,
            drag_sensitivity: 0.5,
            undo_capacity: 50,
            log_capacity: 100,
            calibration_duration_ms: 250.0,
            timelapse_segment_ms: 250.0,
        }
    }
}
