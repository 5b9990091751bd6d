//! RenderSpec → Rerun scalar time series, saved to an .rrd file

use std::path::Path;

use super::{RenderSpec, Renderer, XAxis};
use crate::error::{BagPlotError, Result};

/// Logs every figure into one Rerun recording.
///
/// Each series becomes the entity `/<topic>/<figure>/<series>`. Index-based
/// figures are logged on the `message` sequence timeline, time-based ones on
/// the `ros_time` timeline.
pub struct RrdRenderer {
    rec: rerun::RecordingStream,
}

impl RrdRenderer {
    /// Create a recording that streams into `path`.
    pub fn save(application_id: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let rec = rerun::RecordingStreamBuilder::new(application_id)
            .save(path)
            .map_err(|e| BagPlotError::Render(format!("cannot create {}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), "writing Rerun recording");
        Ok(Self { rec })
    }

    pub fn from_stream(rec: rerun::RecordingStream) -> Self {
        Self { rec }
    }

    fn log_series(&self, spec: &RenderSpec, entity: &str, label: &str, values: &[f64]) -> anyhow::Result<()> {
        self.rec
            .log_static(entity, &rerun::archetypes::SeriesLines::new().with_names([label]))?;
        for (x, y) in spec.x.iter().zip(values) {
            match spec.x_axis {
                XAxis::MessageIndex => self.rec.set_time_sequence("message", *x as i64),
                XAxis::Seconds => self.rec.set_timestamp_secs_since_epoch("ros_time", *x),
            }
            self.rec.log(entity, &rerun::archetypes::Scalars::new(vec![*y]))?;
        }
        self.rec.reset_time();
        Ok(())
    }
}

impl Renderer for RrdRenderer {
    fn render(&mut self, spec: &RenderSpec) -> Result<()> {
        let base = format!("/{}/{}", spec.topic.trim_matches('/'), spec.name);
        for series in &spec.series {
            let entity = format!("{base}/{}", entity_part(&series.label));
            self.log_series(spec, &entity, &series.label, &series.values)
                .map_err(|e| BagPlotError::Render(format!("{entity}: {e}")))?;
        }
        tracing::info!(entity = %base, points = spec.len(), "series logged");
        Ok(())
    }
}

fn entity_part(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_part() {
        assert_eq!(entity_part("Position x"), "position_x");
        assert_eq!(entity_part("timestamp"), "timestamp");
    }

    #[test]
    fn test_render_into_memory_stream() {
        let (rec, _storage) = rerun::RecordingStreamBuilder::new("test").memory().unwrap();
        let mut renderer = RrdRenderer::from_stream(rec);
        let spec = RenderSpec::new("/odom", "linear_twist", "Linear Twist for topic: /odom".to_string(), XAxis::Seconds, vec![1.0, 1.5])
            .with_series("Linear x", vec![0.1, 0.2])
            .with_series("Linear y", vec![0.0, 0.0]);
        renderer.render(&spec).unwrap();

        let diffs = RenderSpec::new("/odom", "ros_timediff", String::new(), XAxis::MessageIndex, vec![0.0])
            .with_series("difference", vec![500_000_000.0]);
        renderer.render(&diffs).unwrap();
        renderer.finish().unwrap();
    }
}
