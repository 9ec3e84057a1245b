use anyhow::{Context, Result};
use log::info;

use pcloud_graph::{PointCloudToGraph, TransformConfig};

use super::{check_terminals, read_input, write_output};
use crate::cli::ConvertArgs;
use crate::config::build_transform_config;
use crate::display::{Context as DisplayContext, Progress, print_graph_summary, print_sample_summary};
use crate::io::{Stream, describe};

const TOTAL_STEPS: u8 = 3;

pub fn run_convert(args: ConvertArgs, ctx: DisplayContext) -> Result<()> {
    check_terminals(
        &args.io,
        "pcgraph convert -i <SAMPLE.json> -o <GRAPH.json>, or pipe data via stdin/stdout.",
    )?;

    let config = build_transform_config(&args.graph)?;
    let transform = PointCloudToGraph::new(config).context("Failed to set up the transform")?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS, "Conversion");

    progress.step("Reading sample");
    let mut sample = read_input(&args.io)?;
    progress.complete_step(
        "Reading sample",
        &[format!(
            "{} keys from {}",
            sample.len(),
            describe(args.io.input.as_deref(), Stream::Stdin)
        )],
    );
    if ctx.interactive {
        print_sample_summary("Input Sample", &sample);
    }

    progress.step("Building graph");
    transform
        .apply(&mut sample)
        .context("Point-cloud to graph conversion failed")?;
    progress.complete_step("Building graph", &build_details(transform.config()));

    if let Some(graph) = sample.graph() {
        info!(
            "built {} graph with {} nodes and {} edges",
            graph.backend(),
            graph.num_nodes(),
            graph.num_edges()
        );
        if ctx.interactive {
            print_graph_summary(graph);
        }
    }

    progress.step("Writing output");
    write_output(&args.io, &sample)?;
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

fn build_details(config: &TransformConfig) -> Vec<String> {
    let mut node_keys: Vec<&str> = config.node_keys.iter().map(String::as_str).collect();
    node_keys.sort_unstable();

    let mut details = vec![
        format!("Backend: {}", config.backend),
        format!("Cutoff: {:.2} Å (exclusive)", config.cutoff_dist),
        format!("Node keys: {}", node_keys.join(", ")),
    ];
    if let Some(edge_keys) = config.active_edge_keys() {
        details.push(format!("Edge keys: {}", edge_keys.join(", ")));
    }
    details
}
