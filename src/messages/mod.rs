//! ROS1 message adapters.
//!
//! Payloads in a bag are raw ROS1 serialization: little-endian primitives,
//! `u32` length-prefixed strings and arrays, no padding. The adapters here
//! decode only the fields the plots need and expose them through capability
//! traits, so an extractor asks for "something with a header stamp" rather
//! than for a concrete message type.

pub mod header;
pub mod nav;
pub mod scalar;

use std::fmt;

use thiserror::Error;

use crate::rosbags_io::TopicInfo;

pub use header::Stamped;
pub use nav::{Odometry, Pose, RosQuaternion, Twist, Vector3};
pub use scalar::{ScalarKind, ScalarPayload};

/// A ROS1 `time`: seconds and nanoseconds since the epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RosTime {
    pub sec: u32,
    pub nsec: u32,
}

impl RosTime {
    pub const ZERO: RosTime = RosTime { sec: 0, nsec: 0 };

    pub fn new(sec: u32, nsec: u32) -> Self {
        Self { sec, nsec }
    }

    /// Split a nanosecond count (as stored in bag message records).
    pub fn from_nsec(nsec: u64) -> Self {
        Self {
            sec: (nsec / 1_000_000_000) as u32,
            nsec: (nsec % 1_000_000_000) as u32,
        }
    }

    pub fn to_nsec(self) -> i64 {
        self.sec as i64 * 1_000_000_000 + self.nsec as i64
    }

    pub fn to_sec(self) -> f64 {
        self.sec as f64 + self.nsec as f64 / 1_000_000_000.0
    }
}

impl fmt::Display for RosTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.sec, self.nsec)
    }
}

/// The accessor a plot kind needs from a topic's messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    HeaderStamp,
    ScalarPayload,
    PoseTwist,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::HeaderStamp => "a header stamp (header.stamp)",
            Capability::ScalarPayload => "a numeric scalar payload (data)",
            Capability::PoseTwist => "pose.pose and twist.twist fields",
        };
        f.write_str(s)
    }
}

pub trait HasHeaderStamp {
    fn header_stamp(&self) -> RosTime;
}

pub trait HasScalarPayload {
    fn scalar(&self) -> f64;
}

pub trait HasPoseTwist {
    fn pose(&self) -> &Pose;
    fn twist(&self) -> &Twist;
}

/// A message shape that can be recognised from a connection and decoded from its payload.
pub trait RosMessage: Sized {
    /// Capability checked before any payload of the topic is decoded.
    const CAPABILITY: Capability;

    fn supports(info: &TopicInfo) -> bool;

    fn decode(info: &TopicInfo, payload: &[u8]) -> Result<Self, PayloadError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("unexpected end of payload: needed {needed} bytes at offset {offset}, payload is {len} bytes")]
    Truncated { needed: usize, offset: usize, len: usize },

    #[error("unsupported scalar type {0}")]
    UnsupportedScalar(String),
}

/// Field declarations `(type, name)` of the top-level message in a ROS1 message definition.
///
/// Comments and constants are skipped; parsing stops at the first nested
/// definition separator (`=====`).
pub fn definition_fields(definition: &str) -> impl Iterator<Item = (&str, &str)> {
    definition
        .lines()
        .take_while(|line| !line.starts_with("=="))
        .filter_map(|line| {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() || line.contains('=') {
                return None;
            }
            let mut parts = line.split_whitespace();
            let ty = parts.next()?;
            let name = parts.next()?;
            Some((ty, name))
        })
}

pub(crate) fn take<'a>(payload: &'a [u8], cursor: &mut usize, len: usize) -> Result<&'a [u8], PayloadError> {
    if *cursor + len > payload.len() {
        return Err(PayloadError::Truncated {
            needed: len,
            offset: *cursor,
            len: payload.len(),
        });
    }
    let bytes = &payload[*cursor..*cursor + len];
    *cursor += len;
    Ok(bytes)
}

pub(crate) fn read_array<const N: usize>(payload: &[u8], cursor: &mut usize) -> Result<[u8; N], PayloadError> {
    let mut out = [0u8; N];
    out.copy_from_slice(take(payload, cursor, N)?);
    Ok(out)
}

pub(crate) fn read_u32_le(payload: &[u8], cursor: &mut usize) -> Result<u32, PayloadError> {
    read_array::<4>(payload, cursor).map(u32::from_le_bytes)
}

pub(crate) fn read_f64_le(payload: &[u8], cursor: &mut usize) -> Result<f64, PayloadError> {
    read_array::<8>(payload, cursor).map(f64::from_le_bytes)
}

pub(crate) fn read_time(payload: &[u8], cursor: &mut usize) -> Result<RosTime, PayloadError> {
    let sec = read_u32_le(payload, cursor)?;
    let nsec = read_u32_le(payload, cursor)?;
    Ok(RosTime { sec, nsec })
}

pub(crate) fn parse_string(payload: &[u8], cursor: &mut usize) -> Result<String, PayloadError> {
    let len = read_u32_le(payload, cursor)? as usize;
    let bytes = take(payload, cursor, len)?;
    Ok(String::from_utf8_lossy(bytes).to_string())
}

/// Builders for ROS1-serialized payloads, shared by the adapter tests.
#[cfg(test)]
pub(crate) mod testing {
    pub fn header(seq: u32, sec: u32, nsec: u32, frame_id: &str) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&seq.to_le_bytes());
        data.extend_from_slice(&sec.to_le_bytes());
        data.extend_from_slice(&nsec.to_le_bytes());
        string(&mut data, frame_id);
        data
    }

    pub fn string(data: &mut Vec<u8>, s: &str) {
        data.extend_from_slice(&(s.len() as u32).to_le_bytes());
        data.extend_from_slice(s.as_bytes());
    }

    pub fn f64s(data: &mut Vec<u8>, values: &[f64]) {
        for v in values {
            data.extend_from_slice(&v.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ros_time_conversions() {
        let t = RosTime::from_nsec(10_500_000_000);
        assert_eq!(t, RosTime::new(10, 500_000_000));
        assert_eq!(t.to_nsec(), 10_500_000_000);
        assert!((t.to_sec() - 10.5).abs() < 1e-12);
        assert_eq!(t.to_string(), "10.500000000");
    }

    #[test]
    fn test_definition_fields_skips_comments_and_constants() {
        let def = "# A stamped float\nHeader header\nuint8 MODE_A=1\n\nfloat64 data  # payload\n================\nMSG: std_msgs/Header\nuint32 seq\n";
        let fields: Vec<_> = definition_fields(def).collect();
        assert_eq!(fields, vec![("Header", "header"), ("float64", "data")]);
    }

    #[test]
    fn test_truncated_payload() {
        let mut cursor = 2;
        let err = read_u32_le(&[0, 0, 0, 0], &mut cursor).unwrap_err();
        assert_eq!(err, PayloadError::Truncated { needed: 4, offset: 2, len: 4 });
        assert_eq!(cursor, 2);
    }
}
