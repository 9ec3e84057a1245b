use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::Error;
use crate::model::graph::Backend;
use crate::model::keys;

/// Default neighbor cutoff in Ångströms.
pub const DEFAULT_CUTOFF_DIST: f32 = 7.0;

/// Configuration of a [`PointCloudToGraph`](super::PointCloudToGraph) transform.
///
/// Fixed at construction time. Node keys are held in a set: attributes
/// are looked up by name, so the configured order carries no meaning and
/// duplicates collapse.
///
/// # Examples
///
/// ```
/// use pcloud_graph::{Backend, TransformConfig};
///
/// let config = TransformConfig {
///     backend: Backend::Pyg,
///     cutoff_dist: 20.0,
///     ..Default::default()
/// }
/// .with_node_keys(["pos", "atomic_numbers", "pos"]);
///
/// assert_eq!(config.node_keys.len(), 2);
/// assert!(config.edge_keys.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// Graph convention to produce.
    pub backend: Backend,

    /// Exclusive upper bound on the distance between connected atoms.
    pub cutoff_dist: f32,

    /// Sample keys copied onto the graph as node attributes.
    pub node_keys: HashSet<String>,

    /// Sample keys copied onto the graph as edge attributes.
    ///
    /// `None` (or an empty list) disables edge attribute copying entirely.
    pub edge_keys: Option<Vec<String>>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            cutoff_dist: DEFAULT_CUTOFF_DIST,
            node_keys: [keys::ATOMIC_NUMBERS, keys::FORCE]
                .into_iter()
                .map(String::from)
                .collect(),
            edge_keys: None,
        }
    }
}

impl TransformConfig {
    /// Default configuration targeting `backend`.
    pub fn for_backend(backend: Backend) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    /// Replaces the node keys, dropping duplicates.
    pub fn with_node_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the edge keys.
    pub fn with_edge_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edge_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Parses a configuration from TOML, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for malformed TOML or unknown fields,
    /// and [`Error::InvalidCutoff`] for a non-positive cutoff.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the cutoff distance.
    pub fn validate(&self) -> Result<(), Error> {
        if self.cutoff_dist.is_finite() && self.cutoff_dist > 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidCutoff(self.cutoff_dist))
        }
    }

    /// Configured edge keys, or `None` when edge copying is disabled.
    pub fn active_edge_keys(&self) -> Option<&[String]> {
        self.edge_keys.as_deref().filter(|keys| !keys.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = TransformConfig::default();
        assert_eq!(config.backend, Backend::Dgl);
        assert_eq!(config.cutoff_dist, 7.0);
        assert!(config.node_keys.contains("atomic_numbers"));
        assert!(config.node_keys.contains("force"));
        assert_eq!(config.node_keys.len(), 2);
        assert!(config.edge_keys.is_none());
        assert!(config.active_edge_keys().is_none());
    }

    #[test]
    fn node_keys_are_deduplicated() {
        let config = TransformConfig::default().with_node_keys(["force", "force", "charge"]);
        assert_eq!(config.node_keys.len(), 2);
    }

    #[test]
    fn empty_edge_keys_are_inactive() {
        let config = TransformConfig::default().with_edge_keys(Vec::<String>::new());
        assert!(config.edge_keys.is_some());
        assert!(config.active_edge_keys().is_none());
    }

    #[test]
    fn from_toml_fills_defaults() {
        let config = TransformConfig::from_toml_str(
            r#"
            backend = "pyg"
            cutoff_dist = 20.0
            edge_keys = ["bond_type"]
            "#,
        )
        .unwrap();
        assert_eq!(config.backend, Backend::Pyg);
        assert_eq!(config.cutoff_dist, 20.0);
        assert_eq!(config.node_keys, TransformConfig::default().node_keys);
        assert_eq!(config.active_edge_keys(), Some(&["bond_type".to_string()][..]));
    }

    #[test]
    fn from_toml_rejects_unknown_fields() {
        let err = TransformConfig::from_toml_str("radius = 3.0").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn from_toml_rejects_bad_cutoff() {
        let err = TransformConfig::from_toml_str("cutoff_dist = -1.0").unwrap_err();
        assert!(matches!(err, Error::InvalidCutoff(c) if c == -1.0));
    }
}
