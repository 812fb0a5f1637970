//! Grid layout: `ceil(sqrt(n))` columns, filled row by row in input order.

use std::collections::BTreeMap;

use super::{LayoutOptions, Position, SizedNode, offsets};

pub(super) fn layout(nodes: &[SizedNode<'_>], options: &LayoutOptions) -> BTreeMap<String, Position> {
    if nodes.is_empty() {
        return BTreeMap::new();
    }

    let columns = (nodes.len() as f64).sqrt().ceil() as usize;
    let rows = nodes.len().div_ceil(columns);

    let mut widths = vec![0.0_f64; columns];
    let mut heights = vec![0.0_f64; rows];
    for (i, n) in nodes.iter().enumerate() {
        widths[i % columns] = widths[i % columns].max(n.width);
        heights[i / columns] = heights[i / columns].max(n.height);
    }

    let xs = offsets(&widths, options.spacing_x);
    let ys = offsets(&heights, options.spacing_y);
    let (x0, y0) = options.start();

    nodes
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let position = Position { x: x0 + xs[i % columns], y: y0 + ys[i / columns] };
            (n.node.id.clone(), position)
        })
        .collect()
}
