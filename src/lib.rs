//! bagplot - Inspect ROS1 .bag files and plot topic data
//!
//! This library reads ROS1 bag files and turns single topics into charts:
//! receipt timestamps, receipt-time and header-stamp differences, scalar
//! values, and odometry channels.
//!
//! # Features
//!
//! - **Timestamps**: receipt time of every message against its index
//! - **Time differences**: consecutive receipt or header stamp differences in nanoseconds
//! - **Values**: `std_msgs` numeric payloads against receipt time
//! - **Odometry**: `nav_msgs/Odometry` position, orientation, linear and angular twist
//! - **Outputs**: PNG/SVG charts (plotters) or a Rerun `.rrd` recording
//!
//! # Example
//!
//! ```rust,no_run
//! use bagplot::{extract, PlotKind, RosBagRecording};
//!
//! let bag = RosBagRecording::open("input.bag")?;
//! for spec in extract(PlotKind::RosTimediff, &bag, "/imu")? {
//!     println!("{}: {} points", spec.title, spec.len());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod error;
pub mod extract;
pub mod info;
pub mod messages;
pub mod plot;
pub mod render;
pub mod rosbags_io;
pub mod schema;

// Re-export main types for convenience
pub use error::{BagPlotError, Result};
pub use extract::{PlotKind, differences, extract};
pub use info::{BagInfo, InfoFormat, bag_info, show_info};
pub use plot::{PlotOptions, PlotSummary, plot_bag, plot_topics};
pub use render::{ChartFormat, ChartRenderer, RenderSpec, Renderer, RrdRenderer};
pub use rosbags_io::{MemoryRecording, Recording, RosBagRecording, TopicInfo};
