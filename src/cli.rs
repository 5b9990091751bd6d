use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::extract::PlotKind;
use crate::info::InfoFormat;
use crate::render::ChartFormat;

#[derive(Parser, Debug)]
#[command(
    name = "bagplot",
    about = "Plot ROS time differences, timestamps, or topic values for one or several topics in a ROS bag file",
    version
)]
#[command(group(
    ArgGroup::new("kind")
        .required(true)
        .multiple(false)
        .args(["plot_timestamps", "plot_timediff", "plot_header_timediff", "plot_odometry", "plot_std_values", "list_kinds"])
))]
pub struct Cli {
    /// Path to the ROS bag file
    #[arg(default_value = "example.bag")]
    pub bag: PathBuf,

    /// Topic names to plot
    #[arg(default_values_t = [String::from("/topic1")])]
    pub topics: Vec<String>,

    /// Plot ROS receipt timestamps
    #[arg(short = 't', long)]
    pub plot_timestamps: bool,

    /// Plot ROS receipt time differences
    #[arg(short = 'd', long)]
    pub plot_timediff: bool,

    /// Plot header timestamp differences
    #[arg(short = 'e', long)]
    pub plot_header_timediff: bool,

    /// Plot nav_msgs/Odometry position, orientation and twist
    #[arg(short = 'o', long)]
    pub plot_odometry: bool,

    /// Plot std_msgs scalar values
    #[arg(short = 's', long)]
    pub plot_std_values: bool,

    /// Show the supported plot kinds and message types, then exit
    #[arg(long)]
    pub list_kinds: bool,

    /// Directory receiving the chart files
    #[arg(long = "out-dir", default_value = "plots")]
    pub out_dir: PathBuf,

    /// Chart file format
    #[arg(long, value_enum, default_value_t = ChartFormat::Png)]
    pub format: ChartFormat,

    /// Write a Rerun .rrd recording instead of chart files
    #[arg(long)]
    pub rrd: Option<PathBuf>,

    /// Format of the recording summary
    #[arg(long = "info-format", value_enum, default_value_t = InfoFormat::Table)]
    pub info_format: InfoFormat,

    /// Show a spinner while scanning each topic
    #[arg(long)]
    pub progress: bool,
}

impl Cli {
    /// The selected plot kind; `None` when only listing kinds.
    pub fn plot_kind(&self) -> Option<PlotKind> {
        if self.plot_timediff {
            Some(PlotKind::RosTimediff)
        } else if self.plot_header_timediff {
            Some(PlotKind::HeaderTimediff)
        } else if self.plot_odometry {
            Some(PlotKind::Odometry)
        } else if self.plot_std_values {
            Some(PlotKind::Values)
        } else if self.plot_timestamps {
            Some(PlotKind::Timestamps)
        } else {
            None
        }
    }
}
