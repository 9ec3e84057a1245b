//! Well-known sample keys.

/// Atomic positions, `[N, 3]`.
pub const POS: &str = "pos";
/// Per-atom species labels, `[N]`.
pub const ATOMIC_NUMBERS: &str = "atomic_numbers";
/// Pairwise point-cloud features, `[S, D, 2C]`.
pub const PC_FEATURES: &str = "pc_features";
/// Explicit padding mask (boolean or index form).
pub const SRC_MASK: &str = "src_mask";
/// Precomputed pairwise distances, `[N, N]`.
pub const DISTANCE_MATRIX: &str = "distance_matrix";
pub const SRC_NODES: &str = "src_nodes";
pub const DST_NODES: &str = "dst_nodes";
pub const SIZES: &str = "sizes";
pub const FORCE: &str = "force";
/// Slot holding the converted graph.
pub const GRAPH: &str = "graph";

/// Keys that only make sense for the point-cloud representation and are
/// dropped once a graph has been built.
pub const POINT_CLOUD_ONLY: [&str; 7] = [
    POS,
    PC_FEATURES,
    DISTANCE_MATRIX,
    ATOMIC_NUMBERS,
    SRC_NODES,
    DST_NODES,
    SIZES,
];
