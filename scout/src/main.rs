use anyhow::Context;
use bridge::bridge::DiscoveryBridge;
use bridge::model::BridgeModel;
use clap::Parser;
use pipeline::config::PipelineConfig;
use pipeline::runner::Runner;
use savorcore::viewport::MapProjector;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod adapters;
mod bridge;
mod locate;
mod pipeline;

#[derive(Parser)]
#[command(author, version, about = "Savor restaurant discovery driver")]
struct Args {
    /// Run a single discovery round and print a summary
    #[arg(long, default_value_t = false)]
    once: bool,
    /// Load a pipeline config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 5.0)]
    radius_km: f64,
    #[arg(long)]
    limit: Option<usize>,
    /// Keep the HTTP bridge alive for snapshot polling and refresh requests
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let pipeline_config = if let Some(path) = args.config {
        PipelineConfig::load(path)?
    } else {
        PipelineConfig::from_args(args.radius_km, args.limit)
    };

    let projector = MapProjector::new(pipeline_config.viewport_margin);
    let runner = Runner::new(pipeline_config);
    let session = runner.build_session()?;
    let discovery_bridge = DiscoveryBridge::new(session.clone(), projector);

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating discovery runtime")?;

    if args.once {
        let snapshot = runtime
            .block_on(session.start())
            .context("discovery run was superseded before committing")?;

        println!(
            "Discovery run -> {} records, degraded {}, approximate location {}",
            snapshot.result.records.len(),
            snapshot.result.degraded,
            snapshot.used_fallback
        );
        for (platform, status) in &snapshot.result.per_platform_status {
            println!("  {platform}: {status:?}");
        }

        let model = BridgeModel::from_snapshot(&snapshot, &projector);
        discovery_bridge.publish(&model)?;
        discovery_bridge.publish_status("Discovery results ready.");
    }

    if args.serve {
        discovery_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
