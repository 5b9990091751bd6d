use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Display;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use rosbag::{ChunkRecord, MessageRecord, RosBag};

use crate::error::{BagPlotError, Result};
use crate::messages::RosTime;

/// Connection metadata of one topic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopicInfo {
    /// ROS type name, e.g. `nav_msgs/Odometry`
    pub msg_type: String,
    /// Full ROS1 message definition text as stored in the bag
    pub definition: String,
    pub message_count: u64,
}

impl TopicInfo {
    pub fn new(msg_type: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            msg_type: msg_type.into(),
            definition: definition.into(),
            message_count: 0,
        }
    }
}

/// Visitor called once per message with its receipt time and raw payload.
pub type MessageVisitor<'v> = dyn FnMut(RosTime, &[u8]) -> Result<()> + 'v;

/// Read-only access to a recorded log of topic messages.
pub trait Recording {
    /// Receipt time of the earliest message (zero for an empty recording).
    fn start_time(&self) -> RosTime;

    /// Receipt time of the latest message (zero for an empty recording).
    fn end_time(&self) -> RosTime;

    /// Topic name → connection info, ordered by topic name.
    fn topics(&self) -> &BTreeMap<String, TopicInfo>;

    /// Replay every message of `topic` in receipt-time order.
    ///
    /// Messages with equal receipt times keep their recording order. Each call
    /// is an independent pass. Returns the number of messages visited; unknown
    /// topics visit nothing.
    fn read_messages(&self, topic: &str, visit: &mut MessageVisitor<'_>) -> Result<usize>;

    fn topic(&self, topic: &str) -> Option<&TopicInfo> {
        self.topics().get(topic)
    }
}

/// A ROS1 `.bag` file opened through the `rosbag` crate.
pub struct RosBagRecording {
    path: PathBuf,
    bag: RosBag,
    topics: BTreeMap<String, TopicInfo>,
    conn_topics: HashMap<u32, String>,
    start: RosTime,
    end: RosTime,
    show_progress: bool,
}

impl RosBagRecording {
    /// Open a bag and index its connections, message counts and time span.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BagPlotError::RecordingNotFound { path: path.to_path_buf() });
        }
        let bag = RosBag::new(path).map_err(|e| format_error(path, e))?;

        let mut conn_topics = HashMap::new();
        let mut topics: BTreeMap<String, TopicInfo> = BTreeMap::new();
        let mut counts: HashMap<u32, u64> = HashMap::new();
        let mut first_ns = u64::MAX;
        let mut last_ns = 0u64;

        for record in bag.chunk_records() {
            let record = record.map_err(|e| format_error(path, e))?;
            if let ChunkRecord::Chunk(chunk) = record {
                for msg in chunk.messages() {
                    match msg.map_err(|e| format_error(path, e))? {
                        MessageRecord::Connection(conn) => {
                            conn_topics.insert(conn.id, conn.topic.to_string());
                            topics
                                .entry(conn.topic.to_string())
                                .or_insert_with(|| TopicInfo::new(conn.tp, conn.message_definition));
                        }
                        MessageRecord::MessageData(msg_data) => {
                            *counts.entry(msg_data.conn_id).or_default() += 1;
                            first_ns = first_ns.min(msg_data.time);
                            last_ns = last_ns.max(msg_data.time);
                        }
                    }
                }
            }
        }

        for (conn_id, count) in counts {
            if let Some(info) = conn_topics.get(&conn_id).and_then(|topic| topics.get_mut(topic)) {
                info.message_count += count;
            }
        }

        let (start, end) = if first_ns <= last_ns {
            (RosTime::from_nsec(first_ns), RosTime::from_nsec(last_ns))
        } else {
            (RosTime::ZERO, RosTime::ZERO)
        };
        tracing::debug!(path = %path.display(), topics = topics.len(), %start, %end, "indexed bag");

        Ok(Self {
            path: path.to_path_buf(),
            bag,
            topics,
            conn_topics,
            start,
            end,
            show_progress: false,
        })
    }

    /// Show a spinner with the number of scanned messages during each topic pass.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Recording for RosBagRecording {
    fn start_time(&self) -> RosTime {
        self.start
    }

    fn end_time(&self) -> RosTime {
        self.end
    }

    fn topics(&self) -> &BTreeMap<String, TopicInfo> {
        &self.topics
    }

    fn read_messages(&self, topic: &str, visit: &mut MessageVisitor<'_>) -> Result<usize> {
        // a topic may be recorded through several connections
        let conn_ids: HashSet<u32> = self
            .conn_topics
            .iter()
            .filter(|(_, t)| t.as_str() == topic)
            .map(|(id, _)| *id)
            .collect();
        if conn_ids.is_empty() {
            return Ok(0);
        }

        let pb = if self.show_progress {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner} {pos} msgs {msg}") {
                pb.set_style(style);
            }
            pb.set_message(topic.to_string());
            Some(pb)
        } else {
            None
        };

        // chunks are not necessarily in receipt-time order
        let mut messages: Vec<(RosTime, Vec<u8>)> = Vec::new();
        for record in self.bag.chunk_records() {
            let record = record.map_err(|e| format_error(&self.path, e))?;
            if let ChunkRecord::Chunk(chunk) = record {
                for msg in chunk.messages() {
                    let msg = msg.map_err(|e| format_error(&self.path, e))?;
                    if let MessageRecord::MessageData(msg_data) = msg
                        && conn_ids.contains(&msg_data.conn_id)
                    {
                        messages.push((RosTime::from_nsec(msg_data.time), msg_data.data.to_vec()));
                        if let Some(pb) = &pb {
                            pb.inc(1);
                        }
                    }
                }
            }
        }
        if let Some(pb) = &pb {
            pb.finish_and_clear();
        }

        messages.sort_by_key(|(time, _)| *time);
        for (time, payload) in &messages {
            visit(*time, payload)?;
        }
        let visited = messages.len();
        tracing::debug!(topic, visited, "topic pass completed");
        Ok(visited)
    }
}

fn format_error(path: &Path, err: impl Display) -> BagPlotError {
    BagPlotError::RecordingFormatInvalid {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// An in-memory recording, for synthetic data and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecording {
    topics: BTreeMap<String, TopicInfo>,
    messages: Vec<(String, RosTime, Vec<u8>)>,
}

impl MemoryRecording {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a topic; messages can only be pushed to declared topics.
    pub fn add_topic(&mut self, topic: &str, msg_type: &str, definition: &str) -> &mut Self {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| TopicInfo::new(msg_type, definition));
        self
    }

    /// Append a message. Messages are kept in insertion order.
    pub fn push(&mut self, topic: &str, time: RosTime, payload: Vec<u8>) -> &mut Self {
        match self.topics.get_mut(topic) {
            Some(info) => {
                info.message_count += 1;
                self.messages.push((topic.to_string(), time, payload));
            }
            None => tracing::warn!(topic, "message pushed to undeclared topic; dropping"),
        }
        self
    }
}

impl Recording for MemoryRecording {
    fn start_time(&self) -> RosTime {
        self.messages.iter().map(|(_, t, _)| *t).min().unwrap_or(RosTime::ZERO)
    }

    fn end_time(&self) -> RosTime {
        self.messages.iter().map(|(_, t, _)| *t).max().unwrap_or(RosTime::ZERO)
    }

    fn topics(&self) -> &BTreeMap<String, TopicInfo> {
        &self.topics
    }

    fn read_messages(&self, topic: &str, visit: &mut MessageVisitor<'_>) -> Result<usize> {
        let mut messages: Vec<_> = self.messages.iter().filter(|(t, _, _)| t == topic).collect();
        messages.sort_by_key(|(_, time, _)| *time);
        for (_, time, payload) in &messages {
            visit(*time, payload)?;
        }
        Ok(messages.len())
    }
}
