use std::path::PathBuf;

use crate::error::{BagPlotError, Result};
use crate::extract::{PlotKind, extract};
use crate::info::{InfoFormat, show_info};
use crate::render::{ChartFormat, ChartRenderer, Renderer, RrdRenderer};
use crate::rosbags_io::{Recording, RosBagRecording};

/// Options for plotting topics of a ROS bag file
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Path to the input .bag file
    pub bag_path: PathBuf,
    /// Topics to plot, in order
    pub topics: Vec<String>,
    pub kind: PlotKind,
    /// Directory receiving chart files
    pub out_dir: PathBuf,
    pub chart_format: ChartFormat,
    /// Write a Rerun recording here instead of chart files
    pub rrd_path: Option<PathBuf>,
    pub info_format: InfoFormat,
    /// Show a spinner while scanning topics
    pub show_progress: bool,
}

/// Outcome of a run: what was rendered and which topics were skipped.
#[derive(Debug, Default)]
pub struct PlotSummary {
    pub figures: usize,
    pub plotted_topics: Vec<String>,
    pub failed_topics: Vec<(String, BagPlotError)>,
}

/// Open the bag, print its summary, and plot every requested topic.
///
/// Failing to open the bag aborts the run. Topic errors are logged and the
/// next topic is processed; a rendering error aborts the run.
///
/// # Example
///
/// ```rust,no_run
/// use bagplot::{plot_bag, ChartFormat, InfoFormat, PlotKind, PlotOptions};
///
/// let options = PlotOptions {
///     bag_path: "run.bag".into(),
///     topics: vec!["/odom".to_string()],
///     kind: PlotKind::Odometry,
///     out_dir: "plots".into(),
///     chart_format: ChartFormat::Png,
///     rrd_path: None,
///     info_format: InfoFormat::Table,
///     show_progress: false,
/// };
///
/// let summary = plot_bag(&options)?;
/// println!("{} figures", summary.figures);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn plot_bag(options: &PlotOptions) -> anyhow::Result<PlotSummary> {
    let recording = RosBagRecording::open(&options.bag_path)?.with_progress(options.show_progress);
    show_info(&options.bag_path.display().to_string(), &recording, options.info_format)?;

    let summary = match &options.rrd_path {
        Some(rrd_path) => {
            let mut renderer = RrdRenderer::save("bagplot", rrd_path)?;
            plot_topics(&recording, &options.topics, options.kind, &mut renderer)?
        }
        None => {
            let mut renderer = ChartRenderer::new(&options.out_dir, options.chart_format)?;
            plot_topics(&recording, &options.topics, options.kind, &mut renderer)?
        }
    };
    Ok(summary)
}

/// Extract and render each topic independently, in order.
pub fn plot_topics<R, W>(recording: &R, topics: &[String], kind: PlotKind, renderer: &mut W) -> Result<PlotSummary>
where
    R: Recording + ?Sized,
    W: Renderer + ?Sized,
{
    let mut summary = PlotSummary::default();
    for topic in topics {
        tracing::info!("Plotting {topic} {kind}...");
        match plot_topic(recording, topic, kind, renderer) {
            Ok(figures) => {
                summary.figures += figures;
                summary.plotted_topics.push(topic.clone());
            }
            Err(e) if e.is_topic_local() => {
                tracing::warn!(topic = %topic, "skipping topic: {e}");
                summary.failed_topics.push((topic.clone(), e));
            }
            Err(e) => return Err(e),
        }
    }
    renderer.finish()?;
    tracing::info!(
        figures = summary.figures,
        plotted = summary.plotted_topics.len(),
        skipped = summary.failed_topics.len(),
        "done"
    );
    Ok(summary)
}

fn plot_topic<R, W>(recording: &R, topic: &str, kind: PlotKind, renderer: &mut W) -> Result<usize>
where
    R: Recording + ?Sized,
    W: Renderer + ?Sized,
{
    let specs = extract(kind, recording, topic)?;
    for spec in &specs {
        renderer.render(spec)?;
    }
    Ok(specs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::RosTime;
    use crate::render::RenderSpec;
    use crate::rosbags_io::MemoryRecording;

    #[derive(Default)]
    struct Collect {
        specs: Vec<RenderSpec>,
        finished: bool,
        fail: bool,
    }

    impl Renderer for Collect {
        fn render(&mut self, spec: &RenderSpec) -> Result<()> {
            if self.fail {
                return Err(BagPlotError::Render("disk full".to_string()));
            }
            self.specs.push(spec.clone());
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn recording() -> MemoryRecording {
        let mut rec = MemoryRecording::new();
        rec.add_topic("/speed", "std_msgs/Float64", "float64 data\n")
            .add_topic("/stamped", "geometry_msgs/PoseStamped", "Header header\ngeometry_msgs/Pose pose\n");
        for i in 0..3u32 {
            rec.push("/speed", RosTime::new(i, 0), (i as f64).to_le_bytes().to_vec());
            rec.push("/stamped", RosTime::new(i, 0), crate::messages::testing::header(i, i, 0, "map"));
        }
        rec
    }

    #[test]
    fn test_shape_error_does_not_stop_other_topics() {
        let rec = recording();
        let mut renderer = Collect::default();
        let topics = vec!["/speed".to_string(), "/missing".to_string(), "/stamped".to_string()];
        let summary = plot_topics(&rec, &topics, PlotKind::HeaderTimediff, &mut renderer).unwrap();

        assert_eq!(summary.plotted_topics, vec!["/stamped".to_string()]);
        assert_eq!(summary.failed_topics.len(), 2);
        assert!(matches!(summary.failed_topics[0].1, BagPlotError::TopicShape { .. }));
        assert!(matches!(summary.failed_topics[1].1, BagPlotError::EmptyTopic { .. }));
        assert_eq!(renderer.specs.len(), 1);
        assert_eq!(renderer.specs[0].series[0].values, vec![1_000_000_000.0, 1_000_000_000.0]);
        assert!(renderer.finished);
    }

    #[test]
    fn test_figures_rendered_in_topic_order() {
        let rec = recording();
        let mut renderer = Collect::default();
        let topics = vec!["/stamped".to_string(), "/speed".to_string()];
        let summary = plot_topics(&rec, &topics, PlotKind::Timestamps, &mut renderer).unwrap();
        assert_eq!(summary.figures, 2);
        let order: Vec<_> = renderer.specs.iter().map(|s| s.topic.as_str()).collect();
        assert_eq!(order, vec!["/stamped", "/speed"]);
    }

    #[test]
    fn test_render_error_aborts_run() {
        let rec = recording();
        let mut renderer = Collect {
            fail: true,
            ..Default::default()
        };
        let topics = vec!["/speed".to_string(), "/stamped".to_string()];
        let err = plot_topics(&rec, &topics, PlotKind::Values, &mut renderer).unwrap_err();
        assert!(matches!(err, BagPlotError::Render(_)));
    }
}
