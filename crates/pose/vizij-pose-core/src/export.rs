//! Serialization of poses and history.
//!
//! The pose text format is the human-auditable state string
//! `POSE[j1:v1;…]|PROPS[p1:hH.HH,wW.WW;…]`: joint offsets rounded to whole
//! degrees, proportions to two decimals, both in canonical order. The parser
//! accepts exactly that shape back so exported strings round-trip (modulo the
//! rounding the format itself applies). The history log exports as a JSON
//! array of `{ timestamp_ms, label?, pivotOffsets?, props? }` records.

use thiserror::Error;

use crate::history::HistoryEntry;
use crate::pose::{Pose, Proportion};
use crate::skeleton::{BodyPart, Joint, BODY_PARTS, JOINTS};

/// Errors produced while parsing an uploaded pose state string.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected POSE[..]|PROPS[..] framing")]
    Framing,
    #[error("unknown joint '{0}'")]
    UnknownJoint(String),
    #[error("unknown part '{0}'")]
    UnknownPart(String),
    #[error("malformed entry '{0}'")]
    MalformedEntry(String),
    #[error("invalid number in '{0}'")]
    InvalidNumber(String),
}

/// Render a pose as the canonical state string.
pub fn pose_string(pose: &Pose) -> String {
    let joints: Vec<String> = JOINTS
        .iter()
        .map(|j| format!("{}:{}", j.as_str(), pose.offset(*j).round() as i64))
        .collect();
    let props: Vec<String> = BODY_PARTS
        .iter()
        .map(|p| {
            let prop = pose.proportion(*p);
            format!("{}:h{:.2},w{:.2}", p.as_str(), prop.h, prop.w)
        })
        .collect();
    format!("POSE[{}]|PROPS[{}]", joints.join(";"), props.join(";"))
}

/// Parse a state string back into a pose. Entries may appear in any order;
/// joints or parts missing from the string keep their defaults (0.0 offset,
/// 1.0/1.0 proportion).
pub fn parse_pose_string(s: &str) -> Result<Pose, ParseError> {
    let s = s.trim();
    let rest = s.strip_prefix("POSE[").ok_or(ParseError::Framing)?;
    let (joint_body, rest) = rest.split_once("]|PROPS[").ok_or(ParseError::Framing)?;
    let prop_body = rest.strip_suffix(']').ok_or(ParseError::Framing)?;

    let mut pose = Pose::rest();
    for entry in joint_body.split(';').filter(|e| !e.is_empty()) {
        let (name, value) = entry
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedEntry(entry.to_string()))?;
        let joint =
            Joint::from_name(name).ok_or_else(|| ParseError::UnknownJoint(name.to_string()))?;
        let value: f32 = value
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidNumber(entry.to_string()))?;
        pose.offsets.insert(joint, value);
    }

    for entry in prop_body.split(';').filter(|e| !e.is_empty()) {
        let (name, value) = entry
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedEntry(entry.to_string()))?;
        let part =
            BodyPart::from_name(name).ok_or_else(|| ParseError::UnknownPart(name.to_string()))?;
        let (h_part, w_part) = value
            .split_once(',')
            .ok_or_else(|| ParseError::MalformedEntry(entry.to_string()))?;
        let h: f32 = h_part
            .trim()
            .strip_prefix('h')
            .ok_or_else(|| ParseError::MalformedEntry(entry.to_string()))?
            .parse()
            .map_err(|_| ParseError::InvalidNumber(entry.to_string()))?;
        let w: f32 = w_part
            .trim()
            .strip_prefix('w')
            .ok_or_else(|| ParseError::MalformedEntry(entry.to_string()))?
            .parse()
            .map_err(|_| ParseError::InvalidNumber(entry.to_string()))?;
        pose.props.insert(part, Proportion { w, h });
    }

    Ok(pose)
}

/// Serialize the event log for export. Infallible by construction: every
/// map key in a [`HistoryEntry`] serializes to a string.
pub fn export_history_json(log: &[HistoryEntry]) -> serde_json::Value {
    serde_json::to_value(log).unwrap_or(serde_json::Value::Null)
}

/// Pretty-printed variant for writing to a file-shaped sink.
pub fn export_history_string(log: &[HistoryEntry]) -> String {
    serde_json::to_string_pretty(&export_history_json(log)).unwrap_or_else(|_| "[]".to_string())
}
