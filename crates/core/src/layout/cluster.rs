//! Cluster layouts: one column per group, groups ordered by their key.

use std::collections::BTreeMap;

use super::{LayoutNode, LayoutOptions, Position, SizedNode, offsets};

/// Canvas colour presets in display order. Presets `"1"` to `"6"` map onto them.
const PALETTE: [&str; 6] = ["red", "orange", "yellow", "green", "cyan", "purple"];

/// What a cluster layout groups nodes by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterKey {
    Color,
    /// First tag.
    Tag,
    Folder,
}

/// Sort key of a group: palette/named bucket, palette rank, folded name, exact name.
type GroupKey = (u8, usize, String, String);

const NAMED: u8 = 0;
const OTHER: u8 = 1;
const MISSING: u8 = 2;

impl ClusterKey {
    fn group_of(self, node: &LayoutNode) -> GroupKey {
        match self {
            ClusterKey::Color => match node.color.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
                Some(color) => {
                    let color = color.to_lowercase();
                    let rank = color
                        .parse::<usize>()
                        .ok()
                        .filter(|n| (1..=PALETTE.len()).contains(n))
                        .map(|n| n - 1)
                        .or_else(|| PALETTE.iter().position(|p| *p == color));
                    match rank {
                        Some(rank) => (NAMED, rank, PALETTE[rank].to_string(), PALETTE[rank].to_string()),
                        None => (OTHER, 0, color.clone(), color),
                    }
                }
                None => (MISSING, 0, String::new(), String::new()),
            },
            ClusterKey::Tag => match node.tags.first() {
                Some(tag) => {
                    let tag = tag.to_lowercase();
                    (NAMED, 0, tag.clone(), tag)
                }
                None => (MISSING, 0, String::new(), String::new()),
            },
            ClusterKey::Folder => match node.folder.as_deref().filter(|f| !f.is_empty()) {
                Some(folder) => (NAMED, 0, folder.to_lowercase(), folder.to_string()),
                None => (MISSING, 0, String::new(), String::new()),
            },
        }
    }
}

/// Group nodes, then lay each group out as a column.
///
/// Members are sorted by title (case-insensitive, id breaks ties) and stacked
/// with `spacing_y`. A column is as wide as its widest member; columns are
/// separated by `spacing_x`.
pub(super) fn layout(
    nodes: &[SizedNode<'_>],
    key: ClusterKey,
    options: &LayoutOptions,
) -> BTreeMap<String, Position> {
    let mut groups: BTreeMap<GroupKey, Vec<SizedNode<'_>>> = BTreeMap::new();
    for n in nodes {
        groups.entry(key.group_of(n.node)).or_default().push(*n);
    }

    let mut columns: Vec<Vec<SizedNode<'_>>> = groups.into_values().collect();
    for members in &mut columns {
        members.sort_by(|a, b| {
            a.node
                .title
                .to_lowercase()
                .cmp(&b.node.title.to_lowercase())
                .then_with(|| a.node.id.cmp(&b.node.id))
        });
    }

    let widths: Vec<f64> =
        columns.iter().map(|m| m.iter().map(|n| n.width).fold(0.0, f64::max)).collect();
    let xs = offsets(&widths, options.spacing_x);
    let (x0, y0) = options.start();

    let mut positions = BTreeMap::new();
    for (members, x) in columns.iter().zip(xs) {
        let heights: Vec<f64> = members.iter().map(|n| n.height).collect();
        for (n, y) in members.iter().zip(offsets(&heights, options.spacing_y)) {
            positions.insert(n.node.id.clone(), Position { x: x0 + x, y: y0 + y });
        }
    }
    positions
}
