//! RenderSpec → PNG/SVG line charts (plotters)

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{RenderSpec, Renderer};
use crate::error::{BagPlotError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ChartFormat {
    #[default]
    Png,
    Svg,
}

impl ChartFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Png => "png",
            ChartFormat::Svg => "svg",
        }
    }
}

/// Writes one chart file per figure into an output directory.
pub struct ChartRenderer {
    out_dir: PathBuf,
    format: ChartFormat,
    written: Vec<PathBuf>,
}

impl ChartRenderer {
    pub fn new(out_dir: impl AsRef<Path>, format: ChartFormat) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&out_dir)
            .map_err(|e| BagPlotError::Render(format!("cannot create {}: {e}", out_dir.display())))?;
        Ok(Self {
            out_dir,
            format,
            written: Vec::new(),
        })
    }

    /// Files written so far, in rendering order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// File the next render of `spec` writes to.
    ///
    /// Topics that sanitize to the same slug (`/a/b` and `/a_b`) get a numeric
    /// suffix so no file written in this run is overwritten.
    pub fn path_for(&self, spec: &RenderSpec) -> PathBuf {
        let slug = spec.slug();
        let ext = self.format.extension();
        let mut path = self.out_dir.join(format!("{slug}.{ext}"));
        let mut n = 2;
        while self.written.contains(&path) {
            path = self.out_dir.join(format!("{slug}_{n}.{ext}"));
            n += 1;
        }
        path
    }
}

impl Renderer for ChartRenderer {
    fn render(&mut self, spec: &RenderSpec) -> Result<()> {
        let path = self.path_for(spec);
        let drawn = match self.format {
            ChartFormat::Png => draw_chart(BitMapBackend::new(&path, spec.size).into_drawing_area(), spec),
            ChartFormat::Svg => draw_chart(SVGBackend::new(&path, spec.size).into_drawing_area(), spec),
        };
        drawn.map_err(|e| BagPlotError::Render(format!("{}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), points = spec.len(), "chart written");
        self.written.push(path);
        Ok(())
    }
}

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, spec: &RenderSpec) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (x_min, x_max) = spec.x_range();
    let (y_min, y_max) = spec.y_range();
    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 24))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 90)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(&spec.x_label)
        .y_desc(&spec.y_label)
        .draw()?;

    for (idx, series) in spec.series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points = spec
            .x
            .iter()
            .copied()
            .zip(series.values.iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite());
        chart
            .draw_series(LineSeries::new(points, &color))?
            .label(&series.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    if spec.has_legend() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::XAxis;

    #[test]
    fn test_output_paths_follow_slug_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let png = ChartRenderer::new(&out, ChartFormat::Png).unwrap();
        assert!(out.is_dir());
        assert!(png.written().is_empty());

        let spec = RenderSpec::new("/robot/odom", "position", String::new(), XAxis::Seconds, vec![]);
        assert_eq!(png.path_for(&spec), out.join("robot_odom_position.png"));

        let svg = ChartRenderer::new(&out, ChartFormat::Svg).unwrap();
        assert_eq!(svg.path_for(&spec), out.join("robot_odom_position.svg"));
    }

    fn assert_written(path: &Path) {
        let len = std::fs::metadata(path).unwrap().len();
        assert!(len > 0, "{} is empty", path.display());
    }

    #[test]
    fn test_render_svg_and_png() {
        let dir = tempfile::tempdir().unwrap();
        let single = RenderSpec::new("/speed", "values", "Values for topic: /speed".to_string(), XAxis::Seconds, vec![1.0, 1.5, 2.0])
            .with_labels("Time (seconds)", "Value")
            .with_series("value", vec![0.0, 2.0, 4.0]);
        let multi = RenderSpec::new("/odom", "position", "Position for topic: /odom".to_string(), XAxis::Seconds, vec![1.0, 2.0])
            .with_labels("Time (seconds)", "Position (m)")
            .with_series("Position x", vec![0.0, 1.0])
            .with_series("Position y", vec![0.5, 0.5])
            .with_size(1200, 400);
        let empty = RenderSpec::new("/idle", "ros_timediff", "ROSTime Difference for topic: /idle".to_string(), XAxis::MessageIndex, vec![])
            .with_series("difference", vec![]);

        for format in [ChartFormat::Svg, ChartFormat::Png] {
            let out = dir.path().join(format.extension());
            let mut renderer = ChartRenderer::new(&out, format).unwrap();
            for spec in [&single, &multi, &empty] {
                renderer.render(spec).unwrap();
            }
            let expected: Vec<PathBuf> = ["speed_values", "odom_position", "idle_ros_timediff"]
                .iter()
                .map(|slug| out.join(format!("{slug}.{}", format.extension())))
                .collect();
            assert_eq!(renderer.written(), expected.as_slice());
            for path in renderer.written() {
                assert_written(path);
            }
        }
    }

    #[test]
    fn test_colliding_topics_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = ChartRenderer::new(dir.path(), ChartFormat::Svg).unwrap();
        let nested = RenderSpec::new("/robot/odom", "position", "a".to_string(), XAxis::Seconds, vec![0.0]).with_series("x", vec![1.0]);
        let flat = RenderSpec::new("/robot_odom", "position", "b".to_string(), XAxis::Seconds, vec![0.0]).with_series("x", vec![2.0]);
        assert_eq!(nested.slug(), flat.slug());

        renderer.render(&nested).unwrap();
        renderer.render(&flat).unwrap();
        renderer.render(&flat).unwrap();
        assert_eq!(
            renderer.written(),
            [
                dir.path().join("robot_odom_position.svg"),
                dir.path().join("robot_odom_position_2.svg"),
                dir.path().join("robot_odom_position_3.svg"),
            ]
            .as_slice()
        );
        for path in renderer.written() {
            assert_written(path);
        }
    }
}
