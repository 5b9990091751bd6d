use std::path::PathBuf;

use thiserror::Error;

use crate::messages::Capability;

/// Errors raised while reading a recording or building/rendering plots.
#[derive(Debug, Error)]
pub enum BagPlotError {
    #[error("recording not found: {}", .path.display())]
    RecordingNotFound { path: PathBuf },

    #[error("recording {} is not a readable ROS bag: {reason}", .path.display())]
    RecordingFormatInvalid { path: PathBuf, reason: String },

    #[error("topic {topic} ({msg_type}) does not provide {capability}")]
    TopicShape {
        topic: String,
        msg_type: String,
        capability: Capability,
    },

    #[error("topic {topic} has no messages in the recording")]
    EmptyTopic { topic: String },

    #[error("failed to decode message #{index} on {topic}: {reason}")]
    Decode {
        topic: String,
        index: usize,
        reason: String,
    },

    #[error("rendering failed: {0}")]
    Render(String),
}

impl BagPlotError {
    /// Whether processing may continue with the next topic after this error.
    /// Render failures abort the run.
    pub fn is_topic_local(&self) -> bool {
        !matches!(self, BagPlotError::Render(_))
    }
}

pub type Result<T, E = BagPlotError> = std::result::Result<T, E>;
