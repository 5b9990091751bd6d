//! `nav_msgs/Odometry` adapter.

use super::header::{Header, parse_header};
use super::{Capability, HasHeaderStamp, HasPoseTwist, PayloadError, RosMessage, RosTime, parse_string, read_f64_le, take};
use crate::rosbags_io::TopicInfo;

const COVARIANCE_BYTES: usize = 36 * 8;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RosQuaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vector3,
    pub orientation: RosQuaternion,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Twist {
    pub linear: Vector3,
    pub angular: Vector3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Odometry {
    pub header: Header,
    pub child_frame_id: String,
    pub pose: Pose,
    pub twist: Twist,
}

impl HasPoseTwist for Odometry {
    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn twist(&self) -> &Twist {
        &self.twist
    }
}

impl HasHeaderStamp for Odometry {
    fn header_stamp(&self) -> RosTime {
        self.header.stamp
    }
}

impl RosMessage for Odometry {
    const CAPABILITY: Capability = Capability::PoseTwist;

    fn supports(info: &TopicInfo) -> bool {
        info.msg_type == "nav_msgs/Odometry"
    }

    fn decode(_info: &TopicInfo, payload: &[u8]) -> Result<Self, PayloadError> {
        parse_odometry(payload)
    }
}

fn parse_odometry(payload: &[u8]) -> Result<Odometry, PayloadError> {
    let mut cursor = 0;
    let header = parse_header(payload, &mut cursor)?;
    let child_frame_id = parse_string(payload, &mut cursor)?;
    // PoseWithCovariance
    let pose = parse_pose(payload, &mut cursor)?;
    take(payload, &mut cursor, COVARIANCE_BYTES)?;
    // TwistWithCovariance; the trailing covariance is not needed
    let linear = parse_vector3(payload, &mut cursor)?;
    let angular = parse_vector3(payload, &mut cursor)?;
    Ok(Odometry {
        header,
        child_frame_id,
        pose,
        twist: Twist { linear, angular },
    })
}

fn parse_pose(payload: &[u8], cursor: &mut usize) -> Result<Pose, PayloadError> {
    let position = parse_vector3(payload, cursor)?;
    let orientation = parse_quaternion(payload, cursor)?;
    Ok(Pose { position, orientation })
}

fn parse_vector3(payload: &[u8], cursor: &mut usize) -> Result<Vector3, PayloadError> {
    let x = read_f64_le(payload, cursor)?;
    let y = read_f64_le(payload, cursor)?;
    let z = read_f64_le(payload, cursor)?;
    Ok(Vector3 { x, y, z })
}

fn parse_quaternion(payload: &[u8], cursor: &mut usize) -> Result<RosQuaternion, PayloadError> {
    let x = read_f64_le(payload, cursor)?;
    let y = read_f64_le(payload, cursor)?;
    let z = read_f64_le(payload, cursor)?;
    let w = read_f64_le(payload, cursor)?;
    Ok(RosQuaternion { x, y, z, w })
}

#[cfg(test)]
pub(crate) fn odometry_payload(stamp: RosTime, position: [f64; 3], orientation: [f64; 4], linear: [f64; 3], angular: [f64; 3]) -> Vec<u8> {
    use crate::messages::testing;

    let mut data = testing::header(0, stamp.sec, stamp.nsec, "odom");
    testing::string(&mut data, "base_link");
    testing::f64s(&mut data, &position);
    testing::f64s(&mut data, &orientation);
    testing::f64s(&mut data, &[0.0; 36]);
    testing::f64s(&mut data, &linear);
    testing::f64s(&mut data, &angular);
    testing::f64s(&mut data, &[0.0; 36]);
    data
}
