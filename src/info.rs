//! Recording summary: time span and topic/type listing.

use prettytable::{Table, format, row};
use serde::Serialize;

use crate::rosbags_io::Recording;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum InfoFormat {
    #[default]
    Table,
    Json,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopicSummary {
    pub topic: String,
    pub msg_type: String,
    pub message_count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BagInfo {
    pub path: String,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub topics: Vec<TopicSummary>,
}

pub fn bag_info<R: Recording + ?Sized>(path: &str, recording: &R) -> BagInfo {
    let start = recording.start_time().to_sec();
    let end = recording.end_time().to_sec();
    let topics = recording
        .topics()
        .iter()
        .map(|(topic, info)| TopicSummary {
            topic: topic.clone(),
            msg_type: info.msg_type.clone(),
            message_count: info.message_count,
        })
        .collect();
    BagInfo {
        path: path.to_string(),
        start,
        end,
        duration: end - start,
        topics,
    }
}

impl BagInfo {
    pub fn to_table_string(&self) -> String {
        let mut out = String::new();
        out.push_str("[INFO] BAG INFO:\n");
        out.push_str(&format!("\tBag file: {}\n", self.path));
        out.push_str(&format!("\tTime range: {:.6} - {:.6}\n", self.start, self.end));
        out.push_str(&format!("\tDuration: {:.6}\n", self.duration));
        out.push_str("\tTopics:\n");

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_CLEAN);
        table.set_titles(row!["Topic", "Type", r->"Count"]);
        for t in &self.topics {
            table.add_row(row![t.topic, t.msg_type, r->t.message_count]);
        }
        out.push_str(&table.to_string());
        out
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Print the recording summary to stdout.
pub fn show_info<R: Recording + ?Sized>(path: &str, recording: &R, format: InfoFormat) -> anyhow::Result<()> {
    let info = bag_info(path, recording);
    match format {
        InfoFormat::Table => print!("{}", info.to_table_string()),
        InfoFormat::Json => println!("{}", info.to_json_string()?),
    }
    Ok(())
}
