use std::io::{self, Write};

use anyhow::Error;

use pcloud_graph::{PointCloudError, TransformError};

use super::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    let hints = hints_for(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

/// Picks hints from the first typed error found in the cause chain.
fn hints_for(err: &Error) -> Vec<&'static str> {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<TransformError>() {
            return transform_hints(e);
        }
        if let Some(e) = cause.downcast_ref::<PointCloudError>() {
            return point_cloud_hints(e);
        }
        if let Some(e) = cause.downcast_ref::<pcloud_graph::io::Error>() {
            return io_hints(e);
        }
        if let Some(e) = cause.downcast_ref::<io::Error>() {
            return std_io_hints(e);
        }
    }
    Vec::new()
}

fn transform_hints(err: &TransformError) -> Vec<&'static str> {
    match err {
        TransformError::GraphAlreadyPresent { .. } => vec![
            "The input was already converted; feed the original point-cloud sample instead",
        ],
        TransformError::MissingKey { .. } => {
            vec!["Samples need a 'pos' array of shape [N, 3]"]
        }
        TransformError::MissingAtomTypes => vec![
            "Add an 'atomic_numbers' array, or run 'pcgraph featurize' to produce 'pc_features'",
        ],
        TransformError::CountMismatch { .. } => vec![
            "Species and positions must describe the same atoms",
            "Sampled point clouds still list every atom as a source; check that 'pos' was not subsampled",
        ],
        TransformError::InvalidShape { .. } => {
            vec!["Positions must be a 2-D array with three columns (x, y, z)"]
        }
        TransformError::InvalidMask(_) => vec![
            "'src_mask' must be booleans (one per atom) or int64 indices of atoms to keep",
        ],
        TransformError::InvalidCutoff(_) => vec!["Use a positive cutoff such as --cutoff 7.0"],
        TransformError::BackendUnavailable(_) => {
            vec!["Rebuild with the matching Cargo feature enabled (dgl or pyg)"]
        }
        TransformError::ConfigParse(_) => vec![
            "Recognized keys: backend, cutoff_dist, node_keys, edge_keys",
        ],
        TransformError::NodeTypes(e) => point_cloud_hints(e),
        TransformError::Graph(_) => vec![
            "Node attributes need one row per retained atom and edge attributes one row per edge",
        ],
        _ => Vec::new(),
    }
}

fn point_cloud_hints(err: &PointCloudError) -> Vec<&'static str> {
    match err {
        PointCloudError::LabelOutOfRange { .. } => {
            vec!["Raise --num-classes above the largest atomic number in the input"]
        }
        PointCloudError::NonIntegralLabels(_) => {
            vec!["'atomic_numbers' must hold whole numbers"]
        }
        PointCloudError::OddChannels(_) | PointCloudError::EmptyAxis(_) => vec![
            "'pc_features' must have shape [S, D, 2C] with two one-hot blocks of width C",
        ],
        _ => Vec::new(),
    }
}

fn io_hints(err: &pcloud_graph::io::Error) -> Vec<&'static str> {
    use pcloud_graph::io::Error as IoError;

    match err {
        IoError::Io { source } => std_io_hints(source),
        IoError::Json { .. } => vec!["Check that the input is a single valid JSON document"],
        IoError::NotAnObject => vec![
            "The input must be a JSON object such as {\"pos\": [[0, 0, 0]], \"atomic_numbers\": [1]}",
        ],
        IoError::Parse { .. } => vec![
            "Nested arrays must be rectangular and contain only numbers or only booleans",
        ],
        IoError::UnsupportedValue(_) => {
            vec!["Only numeric or boolean arrays and tensor records can be read"]
        }
    }
}

fn std_io_hints(err: &io::Error) -> Vec<&'static str> {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::NotFound => vec!["Check the path spelling and ensure the file exists"],
        ErrorKind::PermissionDenied => vec!["Check file permissions with `ls -la`"],
        ErrorKind::BrokenPipe => vec!["The output consumer exited early (e.g. piping to `head`)"],
        ErrorKind::UnexpectedEof => vec!["The input may be truncated or empty"],
        _ => vec!["Check file path, permissions, and disk space"],
    }
}
