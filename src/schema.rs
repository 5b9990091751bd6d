//! Supported plot kinds and the message shapes they accept

use anyhow::Result;

use crate::extract::PlotKind;

/// Print every plot kind with the CLI flag selecting it and the topics it accepts.
pub fn print_schema() -> Result<()> {
    println!("Supported plot kinds:");
    println!("---------------------------------------------------------------");
    for kind in PlotKind::ALL {
        println!("{:<16} {:<26} {}", kind.name(), flag(kind), kind.requirement());
    }
    Ok(())
}

fn flag(kind: PlotKind) -> &'static str {
    match kind {
        PlotKind::Timestamps => "-t, --plot-timestamps",
        PlotKind::RosTimediff => "-d, --plot-timediff",
        PlotKind::HeaderTimediff => "-e, --plot-header-timediff",
        PlotKind::Values => "-s, --plot-std-values",
        PlotKind::Odometry => "-o, --plot-odometry",
    }
}
