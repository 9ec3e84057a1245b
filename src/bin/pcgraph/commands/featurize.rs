use anyhow::{Context, Result};

use pcloud_graph::keys::{ATOMIC_NUMBERS, POS};
use pcloud_graph::{PointCloudBuilder, PointCloudConfig};

use super::{check_terminals, read_input, write_output};
use crate::cli::FeaturizeArgs;
use crate::config::build_cloud_config;
use crate::display::{Context as DisplayContext, Progress, print_sample_summary};
use crate::io::{Stream, describe};

const TOTAL_STEPS: u8 = 3;

pub fn run_featurize(args: FeaturizeArgs, ctx: DisplayContext) -> Result<()> {
    check_terminals(
        &args.io,
        "pcgraph featurize -i <STRUCTURE.json> -o <CLOUD.json>, or pipe data via stdin/stdout.",
    )?;

    let config = build_cloud_config(&args.cloud);
    let builder = PointCloudBuilder::new(config);

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS, "Featurization");

    progress.step("Reading structure");
    let structure = read_input(&args.io)?;
    let numbers = structure
        .tensor(ATOMIC_NUMBERS)
        .with_context(|| format!("Input has no '{ATOMIC_NUMBERS}' array"))?;
    let pos = structure
        .tensor(POS)
        .with_context(|| format!("Input has no '{POS}' array"))?;
    progress.complete_step(
        "Reading structure",
        &[format!(
            "{} atoms from {}",
            numbers.leading_dim().unwrap_or(0),
            describe(args.io.input.as_deref(), Stream::Stdin)
        )],
    );

    progress.step("Building point cloud");
    let mut cloud = builder
        .build(numbers, pos)
        .context("Point-cloud featurization failed")?;
    for (key, value) in &structure {
        if !cloud.contains_key(key) {
            cloud.insert(key.as_str(), value.clone());
        }
    }
    progress.complete_step("Building point cloud", &build_details(builder.config()));
    if ctx.interactive {
        print_sample_summary("Point Cloud", &cloud);
    }

    progress.step("Writing output");
    write_output(&args.io, &cloud)?;
    progress.complete_step(
        "Writing output",
        &[format!(
            "Write sample JSON → {}",
            describe(args.io.output.as_deref(), Stream::Stdout)
        )],
    );

    progress.finish();
    Ok(())
}

fn build_details(config: &PointCloudConfig) -> Vec<String> {
    let mode = if config.full_pairwise {
        "Full pairwise".to_string()
    } else {
        match config.seed {
            Some(seed) => format!("Sampled, ≤{} neighbors (seed {seed})", config.max_neighbors),
            None => format!("Sampled, ≤{} neighbors", config.max_neighbors),
        }
    };
    vec![mode, format!("One-hot width: {}", config.num_classes)]
}
