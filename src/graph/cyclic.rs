use tracing::trace;

use super::{SparseGraph, VertexId};

/// Strips every terminal vertex from `graph`, leaving only the ring systems
/// and the paths that join them.
///
/// Edges of degree-one vertices are removed repeatedly until none remain.
/// The surviving vertices are then compacted to the front with
/// [`SparseGraph::swap`] and the isolated remainder is cut off.
///
/// The returned vector maps each surviving index `k` to the index that
/// vertex had before the call. The compaction is not order-preserving.
pub fn cyclic_core(graph: &mut SparseGraph) -> Vec<VertexId> {
    let size = graph.size();

    let mut sweeps = 0usize;
    loop {
        let mut changed = false;
        for v in 0..size {
            if graph.list(v).len() == 1 {
                let neighbor = graph.list(v)[0];
                graph.unlink(v, neighbor);
                changed = true;
            }
        }
        sweeps += 1;
        if !changed {
            break;
        }
    }

    let mut original_indices: Vec<VertexId> = (0..size).collect();

    for i in 0..size {
        if !graph.list(i).is_empty() {
            continue;
        }
        match (i + 1..size).find(|&j| !graph.list(j).is_empty()) {
            Some(j) => {
                graph.swap_unchecked(i, j);
                original_indices[i] = j;
            }
            None => break,
        }
    }

    let kept = (0..size)
        .find(|&v| graph.list(v).is_empty())
        .unwrap_or(size);
    graph.truncate(kept);
    original_indices.truncate(kept);

    trace!(size, kept, sweeps, "reduced graph to cyclic core");
    original_indices
}
