use std::io::{self, Write};

use pcloud_graph::{Graph, Sample, Value};

use super::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

/// Lists every sample key with its dtype and shape.
pub fn print_sample_summary(title: &str, sample: &Sample) {
    let rows: Vec<(String, String)> = sample
        .iter()
        .map(|(key, value)| {
            let desc = match value {
                Value::Tensor(t) => t.to_string(),
                Value::Graph(g) => format!("{} graph", g.backend()),
            };
            (key.clone(), desc)
        })
        .collect();

    let mut out = io::stderr().lock();
    print_table(&mut out, title, ("Key", "Value"), &rows);
}

pub fn print_graph_summary(graph: &Graph) {
    let nodes = graph.num_nodes();
    let edges = graph.num_edges();
    let mean_degree = if nodes == 0 {
        0.0
    } else {
        edges as f64 / nodes as f64
    };

    let join = |keys: Vec<&String>| {
        if keys.is_empty() {
            "-".to_string()
        } else {
            keys.into_iter().cloned().collect::<Vec<_>>().join(", ")
        }
    };

    let rows = vec![
        ("Backend".to_string(), graph.backend().to_string()),
        ("Nodes".to_string(), nodes.to_string()),
        ("Edges".to_string(), edges.to_string()),
        ("Out-degree (mean)".to_string(), format!("{mean_degree:.2}")),
        ("Node data".to_string(), join(graph.node_data().keys().collect())),
        ("Edge data".to_string(), join(graph.edge_data().keys().collect())),
    ];

    let mut out = io::stderr().lock();
    print_table(&mut out, "Graph Summary", ("Metric", "Value"), &rows);
}

fn print_table(out: &mut impl Write, title: &str, header: (&str, &str), rows: &[(String, String)]) {
    let key_w = 18usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);
    let k_line = "─".repeat(key_w + 2);
    let v_line = "─".repeat(val_w + 2);

    let _ = writeln!(
        out,
        "{INDENT}┌─ {} ─┐",
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{INDENT}┌{k_line}┬{v_line}┐");
    let _ = writeln!(
        out,
        "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
        header.0, header.1
    );
    let _ = writeln!(out, "{INDENT}├{k_line}┼{v_line}┤");

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
            truncate(key, key_w),
            truncate(val, val_w)
        );
    }

    let _ = writeln!(out, "{INDENT}└{k_line}┴{v_line}┘");
}
