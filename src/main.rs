use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use bagplot::cli::Cli;
use bagplot::{PlotOptions, plot_bag, schema};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let Some(kind) = cli.plot_kind() else {
        return schema::print_schema();
    };

    let options = PlotOptions {
        bag_path: cli.bag,
        topics: cli.topics,
        kind,
        out_dir: cli.out_dir,
        chart_format: cli.format,
        rrd_path: cli.rrd,
        info_format: cli.info_format,
        show_progress: cli.progress,
    };
    plot_bag(&options)?;
    Ok(())
}
