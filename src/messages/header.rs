//! Any message whose first field is a `std_msgs/Header`.

use super::{Capability, HasHeaderStamp, PayloadError, RosMessage, RosTime, definition_fields, parse_string, read_time, read_u32_le};
use crate::rosbags_io::TopicInfo;

#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    pub seq: u32,
    pub stamp: RosTime,
    pub frame_id: String,
}

/// The header prefix of a stamped message; the remainder of the payload is ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Stamped {
    pub header: Header,
}

impl HasHeaderStamp for Stamped {
    fn header_stamp(&self) -> RosTime {
        self.header.stamp
    }
}

impl RosMessage for Stamped {
    const CAPABILITY: Capability = Capability::HeaderStamp;

    fn supports(info: &TopicInfo) -> bool {
        has_leading_header(&info.definition)
    }

    fn decode(_info: &TopicInfo, payload: &[u8]) -> Result<Self, PayloadError> {
        let mut cursor = 0;
        let header = parse_header(payload, &mut cursor)?;
        Ok(Stamped { header })
    }
}

/// True when the message definition starts with `Header header`.
///
/// The header must be the first field for its bytes to sit at offset zero.
pub fn has_leading_header(definition: &str) -> bool {
    matches!(
        definition_fields(definition).next(),
        Some(("Header" | "std_msgs/Header", "header"))
    )
}

pub(crate) fn parse_header(payload: &[u8], cursor: &mut usize) -> Result<Header, PayloadError> {
    let seq = read_u32_le(payload, cursor)?;
    let stamp = read_time(payload, cursor)?;
    let frame_id = parse_string(payload, cursor)?;
    Ok(Header { seq, stamp, frame_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::testing;

    fn info(definition: &str) -> TopicInfo {
        TopicInfo::new("sensor_msgs/Imu", definition)
    }

    #[test]
    fn test_parse_header_prefix() {
        let mut data = testing::header(7, 10, 500_000_000, "base_link");
        data.extend_from_slice(&[1, 2, 3, 4]); // rest of the message
        let msg = Stamped::decode(&info("Header header\n"), &data).unwrap();
        assert_eq!(msg.header.seq, 7);
        assert_eq!(msg.header.frame_id, "base_link");
        assert_eq!(msg.header_stamp(), RosTime::new(10, 500_000_000));
    }

    #[test]
    fn test_leading_header_detection() {
        assert!(has_leading_header("# comment\nHeader header\nfloat64 x\n"));
        assert!(has_leading_header("std_msgs/Header header\n"));
        assert!(!has_leading_header("float64 data\n"));
        assert!(!has_leading_header("float64 x\nHeader header\n"));
        assert!(!has_leading_header(""));
    }

    #[test]
    fn test_truncated_header() {
        let data = testing::header(0, 1, 2, "map");
        let err = Stamped::decode(&info("Header header\n"), &data[..10]).unwrap_err();
        assert!(matches!(err, PayloadError::Truncated { .. }));
    }
}
