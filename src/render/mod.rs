//! Chart descriptions and the backends that draw them.

pub mod chart;
pub mod rrd_writer;

use ordered_float::OrderedFloat;

use crate::error::Result;

pub use chart::{ChartFormat, ChartRenderer};
pub use rrd_writer::RrdRenderer;

pub const DEFAULT_SIZE: (u32, u32) = (1000, 600);

/// What the X values of a chart represent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XAxis {
    /// Position of the message in its topic, starting at 0
    MessageIndex,
    /// Receipt time in seconds
    Seconds,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

/// One figure: labelled series over a shared X sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSpec {
    /// Topic the data comes from
    pub topic: String,
    /// Short identifier of the figure within the topic, used in file names and entity paths
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_axis: XAxis,
    pub x: Vec<f64>,
    pub series: Vec<Series>,
    /// Figure size in pixels
    pub size: (u32, u32),
}

impl RenderSpec {
    pub fn new(topic: &str, name: &str, title: String, x_axis: XAxis, x: Vec<f64>) -> Self {
        Self {
            topic: topic.to_string(),
            name: name.to_string(),
            title,
            x_label: String::new(),
            y_label: String::new(),
            x_axis,
            x,
            series: Vec::new(),
            size: DEFAULT_SIZE,
        }
    }

    pub fn with_labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn with_series(mut self, label: &str, values: Vec<f64>) -> Self {
        self.series.push(Series {
            label: label.to_string(),
            values,
        });
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Number of points, i.e. the length of the X sequence.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Whether a legend is drawn (more than one series).
    pub fn has_legend(&self) -> bool {
        self.series.len() > 1
    }

    /// File-system and entity-path friendly identifier: `<topic>_<name>`.
    pub fn slug(&self) -> String {
        let topic: String = self
            .topic
            .trim_matches('/')
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        if topic.is_empty() {
            self.name.clone()
        } else {
            format!("{topic}_{}", self.name)
        }
    }

    /// Range of X values, widened to a unit interval when empty or degenerate.
    pub fn x_range(&self) -> (f64, f64) {
        padded_range(self.x.iter().copied())
    }

    /// Range of all Y values, widened to a unit interval when empty or degenerate.
    pub fn y_range(&self) -> (f64, f64) {
        padded_range(self.series.iter().flat_map(|s| s.values.iter().copied()))
    }
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let finite: Vec<OrderedFloat<f64>> = values.filter(|v| v.is_finite()).map(OrderedFloat).collect();
    let (min, max) = match (finite.iter().min(), finite.iter().max()) {
        (Some(min), Some(max)) => (min.0, max.0),
        _ => return (0.0, 1.0),
    };
    if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

/// A sink for figures. Figures are rendered one at a time, in submission order.
pub trait Renderer {
    fn render(&mut self, spec: &RenderSpec) -> Result<()>;

    /// Flush anything buffered once every figure has been submitted.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_sanitizes_topic() {
        let spec = RenderSpec::new("/robot/odom", "position", String::new(), XAxis::Seconds, vec![]);
        assert_eq!(spec.slug(), "robot_odom_position");
        let spec = RenderSpec::new("/", "timestamps", String::new(), XAxis::MessageIndex, vec![]);
        assert_eq!(spec.slug(), "timestamps");
    }

    #[test]
    fn test_ranges() {
        let spec = RenderSpec::new("/t", "values", String::new(), XAxis::Seconds, vec![1.0, 3.0])
            .with_series("a", vec![5.0, f64::NAN])
            .with_series("b", vec![-1.0, 2.0]);
        assert_eq!(spec.x_range(), (1.0, 3.0));
        assert_eq!(spec.y_range(), (-1.0, 5.0));
        assert!(spec.has_legend());
    }

    #[test]
    fn test_empty_and_degenerate_ranges() {
        let empty = RenderSpec::new("/t", "values", String::new(), XAxis::Seconds, vec![]);
        assert_eq!(empty.x_range(), (0.0, 1.0));
        assert_eq!(empty.y_range(), (0.0, 1.0));
        assert!(empty.is_empty());

        let single = RenderSpec::new("/t", "values", String::new(), XAxis::Seconds, vec![2.0]).with_series("v", vec![7.0]);
        assert_eq!(single.x_range(), (1.5, 2.5));
        assert_eq!(single.y_range(), (6.5, 7.5));
    }
}
