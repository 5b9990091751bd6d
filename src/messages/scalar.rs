//! Single-value messages (`std_msgs/Float64` and friends).

use super::{Capability, HasScalarPayload, PayloadError, RosMessage, definition_fields, read_array, read_time};
use crate::rosbags_io::TopicInfo;

/// Wire type of a scalar `data` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Time,
    Duration,
}

impl ScalarKind {
    /// Map a ROS1 primitive type name to its scalar kind.
    pub fn from_primitive(ty: &str) -> Option<Self> {
        let kind = match ty {
            "bool" => ScalarKind::Bool,
            "int8" | "byte" => ScalarKind::Int8,
            "uint8" | "char" => ScalarKind::UInt8,
            "int16" => ScalarKind::Int16,
            "uint16" => ScalarKind::UInt16,
            "int32" => ScalarKind::Int32,
            "uint32" => ScalarKind::UInt32,
            "int64" => ScalarKind::Int64,
            "uint64" => ScalarKind::UInt64,
            "float32" => ScalarKind::Float32,
            "float64" => ScalarKind::Float64,
            "time" => ScalarKind::Time,
            "duration" => ScalarKind::Duration,
            _ => return None,
        };
        Some(kind)
    }

    /// Map a `std_msgs` type name to its scalar kind.
    pub fn from_std_msgs(msg_type: &str) -> Option<Self> {
        let name = msg_type.strip_prefix("std_msgs/")?;
        match name {
            "Bool" => Some(ScalarKind::Bool),
            "Byte" => Some(ScalarKind::Int8),
            "Char" => Some(ScalarKind::UInt8),
            "Time" => Some(ScalarKind::Time),
            "Duration" => Some(ScalarKind::Duration),
            _ => Self::from_primitive(&name.to_ascii_lowercase()),
        }
    }

    /// Resolve the scalar kind of a topic: known `std_msgs` types first, then
    /// any definition whose only field is a primitive called `data`.
    pub fn for_topic(info: &TopicInfo) -> Option<Self> {
        if let Some(kind) = Self::from_std_msgs(&info.msg_type) {
            return Some(kind);
        }
        let mut fields = definition_fields(&info.definition);
        match (fields.next(), fields.next()) {
            (Some((ty, "data")), None) => Self::from_primitive(ty),
            _ => None,
        }
    }

    fn read(self, payload: &[u8], cursor: &mut usize) -> Result<f64, PayloadError> {
        let value = match self {
            ScalarKind::Bool | ScalarKind::UInt8 => read_array::<1>(payload, cursor)?[0] as f64,
            ScalarKind::Int8 => read_array::<1>(payload, cursor)?[0] as i8 as f64,
            ScalarKind::Int16 => i16::from_le_bytes(read_array(payload, cursor)?) as f64,
            ScalarKind::UInt16 => u16::from_le_bytes(read_array(payload, cursor)?) as f64,
            ScalarKind::Int32 => i32::from_le_bytes(read_array(payload, cursor)?) as f64,
            ScalarKind::UInt32 => u32::from_le_bytes(read_array(payload, cursor)?) as f64,
            ScalarKind::Int64 => i64::from_le_bytes(read_array(payload, cursor)?) as f64,
            ScalarKind::UInt64 => u64::from_le_bytes(read_array(payload, cursor)?) as f64,
            ScalarKind::Float32 => f32::from_le_bytes(read_array(payload, cursor)?) as f64,
            ScalarKind::Float64 => f64::from_le_bytes(read_array(payload, cursor)?),
            ScalarKind::Time => read_time(payload, cursor)?.to_sec(),
            ScalarKind::Duration => {
                let sec = i32::from_le_bytes(read_array(payload, cursor)?);
                let nsec = i32::from_le_bytes(read_array(payload, cursor)?);
                sec as f64 + nsec as f64 / 1_000_000_000.0
            }
        };
        Ok(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalarPayload {
    pub data: f64,
}

impl HasScalarPayload for ScalarPayload {
    fn scalar(&self) -> f64 {
        self.data
    }
}

impl RosMessage for ScalarPayload {
    const CAPABILITY: Capability = Capability::ScalarPayload;

    fn supports(info: &TopicInfo) -> bool {
        ScalarKind::for_topic(info).is_some()
    }

    fn decode(info: &TopicInfo, payload: &[u8]) -> Result<Self, PayloadError> {
        let kind = ScalarKind::for_topic(info).ok_or_else(|| PayloadError::UnsupportedScalar(info.msg_type.clone()))?;
        let mut cursor = 0;
        let data = kind.read(payload, &mut cursor)?;
        Ok(ScalarPayload { data })
    }
}
