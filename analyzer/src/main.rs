use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use gui_bridge::model::VisualizationModel;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::export;
use workflow::runner::Runner;

mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Estimate speed from recorded IMU/GPS motion logs")]
struct Args {
    /// CSV motion log (timestamp, accel_*, gyro_*, optional lat/lng)
    input: Option<PathBuf>,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Reject rows with non-numeric fields instead of keeping them as NaN
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// chrono format string for time labels
    #[arg(long)]
    label_format: Option<String>,
    /// Write the projected series and summary as JSON
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write the speed-annotated samples as CSV
    #[arg(long)]
    export_csv: Option<PathBuf>,
    /// Keep the chart bridge alive for uploaded logs
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value_t = 9000)]
    port: u16,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        let mut config = WorkflowConfig::load(path)?;
        config.apply_args(args.strict, args.label_format.clone());
        config
    } else {
        WorkflowConfig::from_args(args.strict, args.label_format.clone())
    };

    let runner = Arc::new(Runner::new(workflow_config.clone()));
    let gui_bridge = GuiBridge::new(runner.clone());

    if args.input.is_none() && !args.serve {
        anyhow::bail!("nothing to do: pass a CSV motion log or --serve");
    }

    if let Some(input) = &args.input {
        let result = runner.execute_file(input)?;
        let summary = &result.summary;

        println!(
            "{} -> samples {}, gps fixes {}, range {} .. {}, avg speed {:.2} m/s, max speed {:.2} m/s",
            input.display(),
            summary.sample_count,
            summary.gps_fix_count,
            summary.first_label.as_deref().unwrap_or("-"),
            summary.last_label.as_deref().unwrap_or("-"),
            summary.average_speed,
            summary.max_speed
        );
        if result.dropped_rows > 0 {
            println!("{} rows dropped (unreadable timestamp)", result.dropped_rows);
        }

        let model = VisualizationModel::from_output(&result, Some(input.display().to_string()));
        gui_bridge.publish(&model);

        if let Some(path) = args.output.as_ref().or(workflow_config.output.as_ref()) {
            export::write_json(&result, path)?;
            gui_bridge.publish_status(&format!("series written to {}", path.display()));
        }
        if let Some(path) = args.export_csv.as_ref().or(workflow_config.export_csv.as_ref()) {
            export::write_samples_csv(&result, path)?;
            gui_bridge.publish_status(&format!("samples written to {}", path.display()));
        }
    }

    if args.serve {
        gui_bridge.serve(gui_bind_address(args.port));
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
        let metrics = runner.metrics();
        log::info!(
            "bridge stopped after {} runs ({} rejected, {} samples)",
            metrics.runs,
            metrics.failures,
            metrics.samples
        );
    }

    Ok(())
}
