use std::fs;

use anyhow::{Context, Result};

use pcloud_graph::{PointCloudConfig, TransformConfig};

use crate::cli::{CloudOptions, GraphOptions};

/// Loads the transform settings file, if any, and applies flag overrides.
pub fn build_transform_config(opts: &GraphOptions) -> Result<TransformConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            TransformConfig::from_toml_str(&text)
                .with_context(|| format!("Invalid transform config: {}", path.display()))?
        }
        None => TransformConfig::default(),
    };

    if let Some(backend) = opts.backend {
        config.backend = backend.into();
    }
    if let Some(cutoff) = opts.cutoff {
        config.cutoff_dist = cutoff;
    }
    if !opts.node_keys.is_empty() {
        config = config.with_node_keys(opts.node_keys.iter().cloned());
    }
    if !opts.edge_keys.is_empty() {
        config = config.with_edge_keys(opts.edge_keys.iter().cloned());
    }

    config.validate()?;
    Ok(config)
}

pub fn build_cloud_config(opts: &CloudOptions) -> PointCloudConfig {
    PointCloudConfig {
        num_classes: opts.num_classes,
        full_pairwise: !opts.sampled,
        max_neighbors: opts.max_neighbors,
        seed: opts.seed,
    }
}
