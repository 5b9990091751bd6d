//! Per-topic extraction: one pass over a topic's messages → figures.

use std::fmt;
use std::ops::Sub;

use crate::error::{BagPlotError, Result};
use crate::messages::{HasHeaderStamp, HasPoseTwist, HasScalarPayload, Odometry, RosMessage, RosTime, ScalarPayload, Stamped};
use crate::render::{RenderSpec, XAxis};
use crate::rosbags_io::{Recording, TopicInfo};

/// Odometry figures are wide and short (12x4 at 100 dpi).
pub const ODOMETRY_SIZE: (u32, u32) = (1200, 400);

const MESSAGE_NUMBER: &str = "Message Number";
const TIME_SECONDS: &str = "Time (seconds)";
const TIME_DIFFERENCE_NS: &str = "Time Difference (nanoseconds)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotKind {
    /// Receipt timestamps against message index
    Timestamps,
    /// Consecutive receipt-time differences in nanoseconds
    RosTimediff,
    /// Consecutive header-stamp differences in nanoseconds
    HeaderTimediff,
    /// Scalar `data` payload against receipt time
    Values,
    /// Pose and twist channels of `nav_msgs/Odometry` against receipt time
    Odometry,
}

impl PlotKind {
    pub const ALL: [PlotKind; 5] = [
        PlotKind::Timestamps,
        PlotKind::RosTimediff,
        PlotKind::HeaderTimediff,
        PlotKind::Values,
        PlotKind::Odometry,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlotKind::Timestamps => "timestamps",
            PlotKind::RosTimediff => "ros_timediff",
            PlotKind::HeaderTimediff => "header_timediff",
            PlotKind::Values => "values",
            PlotKind::Odometry => "odometry",
        }
    }

    /// Message shapes a topic must have for this kind, for display.
    pub fn requirement(self) -> &'static str {
        match self {
            PlotKind::Timestamps | PlotKind::RosTimediff => "any message type",
            PlotKind::HeaderTimediff => "messages whose first field is `Header header`",
            PlotKind::Values => "std_msgs numeric types (Bool, Int*, UInt*, Float*, Time, Duration) or a single primitive `data` field",
            PlotKind::Odometry => "nav_msgs/Odometry",
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Consecutive differences: `out[i] = series[i + 1] - series[i]`.
///
/// Sequences shorter than two elements yield an empty result.
pub fn differences<T>(series: &[T]) -> Vec<T>
where
    T: Copy + Sub<Output = T>,
{
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Run one extraction pass for `kind` over `topic`.
pub fn extract<R: Recording + ?Sized>(kind: PlotKind, recording: &R, topic: &str) -> Result<Vec<RenderSpec>> {
    tracing::info!(topic, %kind, "extracting");
    let specs = match kind {
        PlotKind::Timestamps => vec![timestamps(recording, topic)?],
        PlotKind::RosTimediff => vec![ros_timediff(recording, topic)?],
        PlotKind::HeaderTimediff => vec![header_timediff(recording, topic)?],
        PlotKind::Values => vec![values(recording, topic)?],
        PlotKind::Odometry => odometry(recording, topic)?,
    };
    Ok(specs)
}

pub fn timestamps<R: Recording + ?Sized>(recording: &R, topic: &str) -> Result<RenderSpec> {
    let times = receipt_times(recording, topic)?;
    let stamps = seconds(&times);
    Ok(RenderSpec::new(
        topic,
        PlotKind::Timestamps.name(),
        format!("ROS Timestamp for topic: {topic}"),
        XAxis::MessageIndex,
        indices(times.len()),
    )
    .with_labels(MESSAGE_NUMBER, "ROS Timestamp (seconds)")
    .with_series("timestamp", stamps))
}

pub fn ros_timediff<R: Recording + ?Sized>(recording: &R, topic: &str) -> Result<RenderSpec> {
    let nanos: Vec<i64> = receipt_times(recording, topic)?.into_iter().map(RosTime::to_nsec).collect();
    Ok(difference_spec(
        topic,
        PlotKind::RosTimediff,
        format!("ROSTime Difference for topic: {topic}"),
        &nanos,
    ))
}

pub fn header_timediff<R: Recording + ?Sized>(recording: &R, topic: &str) -> Result<RenderSpec> {
    let (_, msgs) = decode_topic::<Stamped, R>(recording, topic)?;
    let nanos = header_stamps_nsec(&msgs);
    Ok(difference_spec(
        topic,
        PlotKind::HeaderTimediff,
        format!("Header Timestamp Difference for topic: {topic}"),
        &nanos,
    ))
}

pub fn values<R: Recording + ?Sized>(recording: &R, topic: &str) -> Result<RenderSpec> {
    let (times, msgs) = decode_topic::<ScalarPayload, R>(recording, topic)?;
    Ok(RenderSpec::new(
        topic,
        PlotKind::Values.name(),
        format!("Values for topic: {topic}"),
        XAxis::Seconds,
        seconds(&times),
    )
    .with_labels(TIME_SECONDS, "Value")
    .with_series("value", scalars(&msgs)))
}

pub fn odometry<R: Recording + ?Sized>(recording: &R, topic: &str) -> Result<Vec<RenderSpec>> {
    let (times, msgs) = decode_topic::<Odometry, R>(recording, topic)?;
    Ok(pose_twist_specs(topic, &seconds(&times), &msgs))
}

fn header_stamps_nsec<M: HasHeaderStamp>(msgs: &[M]) -> Vec<i64> {
    msgs.iter().map(|m| m.header_stamp().to_nsec()).collect()
}

fn scalars<M: HasScalarPayload>(msgs: &[M]) -> Vec<f64> {
    msgs.iter().map(|m| m.scalar()).collect()
}

/// Position, orientation, linear and angular twist figures from one pass.
fn pose_twist_specs<M: HasPoseTwist>(topic: &str, x: &[f64], msgs: &[M]) -> Vec<RenderSpec> {
    let channel = |f: &dyn Fn(&M) -> f64| -> Vec<f64> { msgs.iter().map(f).collect() };
    let figure = |name: &str, group: &str, y_label: &str| {
        RenderSpec::new(topic, name, format!("{group} for topic: {topic}"), XAxis::Seconds, x.to_vec())
            .with_labels(TIME_SECONDS, y_label)
            .with_size(ODOMETRY_SIZE.0, ODOMETRY_SIZE.1)
    };

    let position = figure("position", "Position", "Position (m)")
        .with_series("Position x", channel(&|m| m.pose().position.x))
        .with_series("Position y", channel(&|m| m.pose().position.y))
        .with_series("Position z", channel(&|m| m.pose().position.z));
    let orientation = figure("orientation", "Orientation", "Orientation")
        .with_series("Orientation x", channel(&|m| m.pose().orientation.x))
        .with_series("Orientation y", channel(&|m| m.pose().orientation.y))
        .with_series("Orientation z", channel(&|m| m.pose().orientation.z))
        .with_series("Orientation w", channel(&|m| m.pose().orientation.w));
    let linear = figure("linear_twist", "Linear Twist", "Linear Twist (m/s)")
        .with_series("Linear x", channel(&|m| m.twist().linear.x))
        .with_series("Linear y", channel(&|m| m.twist().linear.y))
        .with_series("Linear z", channel(&|m| m.twist().linear.z));
    let angular = figure("angular_twist", "Angular Twist", "Angular Twist (rad/s)")
        .with_series("Angular x", channel(&|m| m.twist().angular.x))
        .with_series("Angular y", channel(&|m| m.twist().angular.y))
        .with_series("Angular z", channel(&|m| m.twist().angular.z));

    vec![position, orientation, linear, angular]
}

fn difference_spec(topic: &str, kind: PlotKind, title: String, nanos: &[i64]) -> RenderSpec {
    let diffs: Vec<f64> = differences(nanos).into_iter().map(|d| d as f64).collect();
    RenderSpec::new(topic, kind.name(), title, XAxis::MessageIndex, indices(diffs.len()))
        .with_labels(MESSAGE_NUMBER, TIME_DIFFERENCE_NS)
        .with_series("difference", diffs)
}

fn indices(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

fn seconds(times: &[RosTime]) -> Vec<f64> {
    times.iter().map(|t| t.to_sec()).collect()
}

fn topic_info<'r, R: Recording + ?Sized>(recording: &'r R, topic: &str) -> Result<&'r TopicInfo> {
    recording.topic(topic).ok_or_else(|| BagPlotError::EmptyTopic { topic: topic.to_string() })
}

fn receipt_times<R: Recording + ?Sized>(recording: &R, topic: &str) -> Result<Vec<RosTime>> {
    let info = topic_info(recording, topic)?;
    let mut times = Vec::with_capacity(info.message_count as usize);
    recording.read_messages(topic, &mut |t, _| {
        times.push(t);
        Ok(())
    })?;
    Ok(times)
}

/// Decode every message of `topic` as `M`, with receipt times aligned by index.
///
/// The capability is checked once from the connection info, before any payload is read.
fn decode_topic<M: RosMessage, R: Recording + ?Sized>(recording: &R, topic: &str) -> Result<(Vec<RosTime>, Vec<M>)> {
    let info = topic_info(recording, topic)?;
    if !M::supports(info) {
        return Err(BagPlotError::TopicShape {
            topic: topic.to_string(),
            msg_type: info.msg_type.clone(),
            capability: M::CAPABILITY,
        });
    }

    let mut times = Vec::with_capacity(info.message_count as usize);
    let mut msgs = Vec::with_capacity(info.message_count as usize);
    recording.read_messages(topic, &mut |t, payload| {
        let msg = M::decode(info, payload).map_err(|e| BagPlotError::Decode {
            topic: topic.to_string(),
            index: msgs.len(),
            reason: e.to_string(),
        })?;
        times.push(t);
        msgs.push(msg);
        Ok(())
    })?;
    Ok((times, msgs))
}
