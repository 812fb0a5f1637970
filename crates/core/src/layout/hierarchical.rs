//! Layered layout: BFS layers from the roots, barycenter ordering within
//! layers, layers centred on the widest one.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use super::{LayoutEdge, LayoutOptions, Position, SizedNode, offsets};

const MAX_SWEEPS: usize = 8;

struct Graph {
    /// Undirected, deduplicated, sorted neighbour lists.
    adjacency: Vec<Vec<usize>>,
    has_incoming: Vec<bool>,
}

impl Graph {
    fn build(nodes: &[SizedNode<'_>], edges: &[LayoutEdge]) -> Self {
        let index: HashMap<&str, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.node.id.as_str(), i)).collect();

        let mut adjacency = vec![BTreeSet::new(); nodes.len()];
        let mut has_incoming = vec![false; nodes.len()];
        for edge in edges {
            let (Some(&s), Some(&t)) =
                (index.get(edge.source.as_str()), index.get(edge.target.as_str()))
            else {
                continue;
            };
            if s == t {
                continue;
            }
            adjacency[s].insert(t);
            adjacency[t].insert(s);
            has_incoming[t] = true;
        }

        Self {
            adjacency: adjacency.into_iter().map(|set| set.into_iter().collect()).collect(),
            has_incoming,
        }
    }

    fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }
}

/// Layer index for every node.
///
/// Roots are the explicit `is_root` nodes, else nodes without incoming edges.
/// Components no root reaches (pure cycles) are started from their
/// highest-degree node: the node's own `degree` first, then its edge count in
/// this layout. Ties go to the smaller id.
fn assign_layers(nodes: &[SizedNode<'_>], graph: &Graph) -> Vec<usize> {
    let n = nodes.len();
    let mut layer = vec![usize::MAX; n];

    let explicit: Vec<usize> = (0..n).filter(|&v| nodes[v].node.is_root).collect();
    let roots = if explicit.is_empty() {
        (0..n).filter(|&v| !graph.has_incoming[v]).collect()
    } else {
        explicit
    };
    bfs(&roots, graph, &mut layer);

    while layer.contains(&usize::MAX) {
        let Some(start) = (0..n)
            .filter(|&v| layer[v] == usize::MAX)
            .max_by(|&a, &b| {
                (nodes[a].node.degree, graph.degree(a))
                    .cmp(&(nodes[b].node.degree, graph.degree(b)))
                    .then_with(|| nodes[b].node.id.cmp(&nodes[a].node.id))
            })
        else {
            break;
        };
        bfs(&[start], graph, &mut layer);
    }
    layer
}

fn bfs(starts: &[usize], graph: &Graph, layer: &mut [usize]) {
    let mut queue = VecDeque::new();
    for &s in starts {
        if layer[s] == usize::MAX {
            layer[s] = 0;
            queue.push_back(s);
        }
    }
    while let Some(v) = queue.pop_front() {
        for &w in &graph.adjacency[v] {
            if layer[w] == usize::MAX {
                layer[w] = layer[v] + 1;
                queue.push_back(w);
            }
        }
    }
}

/// Slot of each node of `layer`, indexed by node.
fn slots(layer: &[usize], n: usize) -> Vec<Option<usize>> {
    let mut slot = vec![None; n];
    for (i, &v) in layer.iter().enumerate() {
        slot[v] = Some(i);
    }
    slot
}

/// Average slot of `v`'s neighbours in the reference layer, or its current slot when it has none.
fn barycenter(v: usize, current: usize, reference: &[Option<usize>], graph: &Graph) -> f64 {
    let (sum, count) = graph.adjacency[v]
        .iter()
        .filter_map(|&w| reference[w])
        .fold((0.0, 0usize), |(sum, count), pos| (sum + pos as f64, count + 1));
    if count == 0 { current as f64 } else { sum / count as f64 }
}

fn reorder(layer: &mut Vec<usize>, reference: &[usize], graph: &Graph, nodes: &[SizedNode<'_>]) {
    let reference = slots(reference, nodes.len());
    let mut scored: Vec<(usize, f64)> = layer
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, barycenter(v, i, &reference, graph)))
        .collect();
    scored.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| nodes[a.0].node.id.cmp(&nodes[b.0].node.id))
    });
    *layer = scored.into_iter().map(|(v, _)| v).collect();
}

/// Fenwick tree counting inserted slots.
struct SlotCounter(Vec<usize>);

impl SlotCounter {
    fn new(len: usize) -> Self {
        Self(vec![0; len + 1])
    }

    fn insert(&mut self, slot: usize) {
        let mut k = slot + 1;
        while k < self.0.len() {
            self.0[k] += 1;
            k += k & k.wrapping_neg();
        }
    }

    /// Inserted slots `<= slot`.
    fn at_most(&self, slot: usize) -> usize {
        let mut k = slot + 1;
        let mut count = 0;
        while k > 0 {
            count += self.0[k];
            k &= k - 1;
        }
        count
    }
}

/// Edge crossings between two adjacent layers, counted as inversions of the
/// lower endpoints once edges are sorted by upper endpoint.
fn count_crossings(upper: &[usize], lower: &[usize], graph: &Graph) -> usize {
    let slot = slots(lower, graph.adjacency.len());
    let mut ends: Vec<(usize, usize)> = Vec::new();
    for (i, &u) in upper.iter().enumerate() {
        ends.extend(graph.adjacency[u].iter().filter_map(|&w| slot[w]).map(|j| (i, j)));
    }
    // Edges sharing an upper node come out in ascending lower slot and never count.
    ends.sort_unstable();

    let mut seen = SlotCounter::new(lower.len());
    let mut crossings = 0;
    for (k, &(_, j)) in ends.iter().enumerate() {
        crossings += k - seen.at_most(j);
        seen.insert(j);
    }
    crossings
}

fn total_crossings(layers: &[Vec<usize>], graph: &Graph) -> usize {
    layers.windows(2).map(|pair| count_crossings(&pair[0], &pair[1], graph)).sum()
}

/// Alternate down and up barycenter sweeps, keeping the ordering with the
/// fewest crossings. Stops at the first sweep that does not improve.
fn minimize_crossings(layers: &mut Vec<Vec<usize>>, graph: &Graph, nodes: &[SizedNode<'_>]) {
    if layers.len() < 2 {
        return;
    }
    let mut best = total_crossings(layers, graph);
    let mut best_layers = layers.clone();

    for _ in 0..MAX_SWEEPS {
        if best == 0 {
            break;
        }
        for r in 1..layers.len() {
            let (above, rest) = layers.split_at_mut(r);
            reorder(&mut rest[0], &above[r - 1], graph, nodes);
        }
        for r in (0..layers.len() - 1).rev() {
            let (head, below) = layers.split_at_mut(r + 1);
            reorder(&mut head[r], &below[0], graph, nodes);
        }

        let crossings = total_crossings(layers, graph);
        if crossings < best {
            best = crossings;
            best_layers = layers.clone();
        } else {
            break;
        }
    }
    *layers = best_layers;
}

pub(super) fn layout(
    nodes: &[SizedNode<'_>],
    edges: &[LayoutEdge],
    options: &LayoutOptions,
) -> BTreeMap<String, Position> {
    if nodes.is_empty() {
        return BTreeMap::new();
    }

    let graph = Graph::build(nodes, edges);
    let layer_of = assign_layers(nodes, &graph);
    let depth = layer_of.iter().max().map_or(0, |d| d + 1);

    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); depth];
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| nodes[a].node.id.cmp(&nodes[b].node.id));
    for v in order {
        layers[layer_of[v]].push(v);
    }

    minimize_crossings(&mut layers, &graph, nodes);

    let layer_width = |layer: &[usize]| {
        let widths: f64 = layer.iter().map(|&v| nodes[v].width).sum();
        widths + options.spacing_x * layer.len().saturating_sub(1) as f64
    };
    let widest = layers.iter().map(|l| layer_width(l)).fold(0.0, f64::max);
    let heights: Vec<f64> = layers
        .iter()
        .map(|l| l.iter().map(|&v| nodes[v].height).fold(0.0, f64::max))
        .collect();
    let ys = offsets(&heights, options.spacing_y);
    let (x0, y0) = options.start();

    let mut positions = BTreeMap::new();
    for (r, layer) in layers.iter().enumerate() {
        let widths: Vec<f64> = layer.iter().map(|&v| nodes[v].width).collect();
        let indent = (widest - layer_width(layer)) / 2.0;
        for (&v, x) in layer.iter().zip(offsets(&widths, options.spacing_x)) {
            positions.insert(nodes[v].node.id.clone(), Position { x: x0 + indent + x, y: y0 + ys[r] });
        }
    }
    positions
}
