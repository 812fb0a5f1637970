//! Deterministic 2D placement of graph nodes.
//!
//! Every algorithm returns a top-left position for each input node. Pinned
//! nodes keep their input position and are not considered when placing the
//! others. Sizes below the configured minimum are raised to it.

mod cluster;
mod grid;
mod hierarchical;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use cluster::ClusterKey;

/// A node to place, with the hints the clustering algorithms group by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub id: String,
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub pinned: bool,
    pub is_root: bool,
    pub color: Option<String>,
    pub tags: Vec<String>,
    pub folder: Option<String>,
    /// Connection count in the whole graph. Hierarchical layout starts rootless cycles at
    /// the node with the highest one.
    pub degree: usize,
}

impl LayoutNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            x: 0.0,
            y: 0.0,
            width,
            height,
            pinned: false,
            is_root: false,
            color: None,
            tags: Vec::new(),
            folder: None,
            degree: 0,
        }
    }

    /// Pin the node at `(x, y)`.
    pub fn pinned_at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self.pinned = true;
        self
    }

    pub fn root(mut self) -> Self {
        self.is_root = true;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }
}

/// Undirected connection between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutEdge {
    pub source: String,
    pub target: String,
}

impl LayoutEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { source: source.into(), target: target.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutAlgorithm {
    Grid,
    Hierarchical,
    ColorCluster,
    TagCluster,
    FolderCluster,
}

impl LayoutAlgorithm {
    pub const ALL: [LayoutAlgorithm; 5] = [
        Self::Grid,
        Self::Hierarchical,
        Self::ColorCluster,
        Self::TagCluster,
        Self::FolderCluster,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Hierarchical => "hierarchical",
            Self::ColorCluster => "color",
            Self::TagCluster => "tag",
            Self::FolderCluster => "folder",
        }
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "hierarchical" | "tree" => Ok(Self::Hierarchical),
            "color" | "colour" | "color-cluster" => Ok(Self::ColorCluster),
            "tag" | "tags" | "tag-cluster" => Ok(Self::TagCluster),
            "folder" | "folders" | "folder-cluster" => Ok(Self::FolderCluster),
            other => Err(format!(
                "unknown layout algorithm '{other}' (expected grid, hierarchical, color, tag or folder)"
            )),
        }
    }
}

/// Spacing and anchoring shared by all algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub origin_x: f64,
    pub origin_y: f64,
    /// Inset from the origin before the first node.
    pub padding: f64,
    /// Horizontal gap between neighbouring nodes or columns.
    pub spacing_x: f64,
    /// Vertical gap between neighbouring nodes or layers.
    pub spacing_y: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            padding: 0.0,
            spacing_x: 40.0,
            spacing_y: 40.0,
            min_width: 0.0,
            min_height: 0.0,
        }
    }
}

impl LayoutOptions {
    fn start(&self) -> (f64, f64) {
        (self.origin_x + self.padding, self.origin_y + self.padding)
    }
}

/// A free node with its effective size.
#[derive(Debug, Clone, Copy)]
struct SizedNode<'a> {
    node: &'a LayoutNode,
    width: f64,
    height: f64,
}

impl<'a> SizedNode<'a> {
    fn new(node: &'a LayoutNode, options: &LayoutOptions) -> Self {
        Self {
            node,
            width: node.width.max(options.min_width).max(0.0),
            height: node.height.max(options.min_height).max(0.0),
        }
    }
}

/// Running offsets: `offsets(&[a, b, c], gap)` is `[0, a + gap, a + b + 2 * gap]`.
fn offsets(sizes: &[f64], gap: f64) -> Vec<f64> {
    let mut acc = 0.0;
    sizes
        .iter()
        .map(|size| {
            let at = acc;
            acc += size + gap;
            at
        })
        .collect()
}

/// Place every node with `algorithm`.
pub fn compute_layout(
    algorithm: LayoutAlgorithm,
    nodes: &[LayoutNode],
    edges: &[LayoutEdge],
    options: &LayoutOptions,
) -> BTreeMap<String, Position> {
    let free: Vec<SizedNode<'_>> =
        nodes.iter().filter(|n| !n.pinned).map(|n| SizedNode::new(n, options)).collect();

    let mut positions = match algorithm {
        LayoutAlgorithm::Grid => grid::layout(&free, options),
        LayoutAlgorithm::Hierarchical => hierarchical::layout(&free, edges, options),
        LayoutAlgorithm::ColorCluster => cluster::layout(&free, ClusterKey::Color, options),
        LayoutAlgorithm::TagCluster => cluster::layout(&free, ClusterKey::Tag, options),
        LayoutAlgorithm::FolderCluster => cluster::layout(&free, ClusterKey::Folder, options),
    };

    for node in nodes.iter().filter(|n| n.pinned) {
        positions.insert(node.id.clone(), Position { x: node.x, y: node.y });
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("grid", LayoutAlgorithm::Grid)]
    #[case("Hierarchical", LayoutAlgorithm::Hierarchical)]
    #[case("colour", LayoutAlgorithm::ColorCluster)]
    #[case("tag", LayoutAlgorithm::TagCluster)]
    #[case("folder", LayoutAlgorithm::FolderCluster)]
    fn test_parse_algorithm(#[case] input: &str, #[case] expected: LayoutAlgorithm) {
        assert_eq!(input.parse::<LayoutAlgorithm>().unwrap(), expected);
    }

    #[test]
    fn test_algorithm_names_round_trip() {
        for algorithm in LayoutAlgorithm::ALL {
            assert_eq!(algorithm.as_str().parse::<LayoutAlgorithm>().unwrap(), algorithm);
        }
        assert!("force".parse::<LayoutAlgorithm>().is_err());
    }

    #[test]
    fn test_offsets() {
        assert_eq!(offsets(&[10.0, 20.0, 5.0], 2.0), vec![0.0, 12.0, 34.0]);
        assert!(offsets(&[], 2.0).is_empty());
    }

    #[test]
    fn test_pinned_nodes_keep_position() {
        let nodes = vec![
            LayoutNode::new("a", "A", 100.0, 50.0),
            LayoutNode::new("p", "P", 100.0, 50.0).pinned_at(-300.0, 12.5),
            LayoutNode::new("b", "B", 100.0, 50.0),
        ];
        for algorithm in LayoutAlgorithm::ALL {
            let positions = compute_layout(algorithm, &nodes, &[], &LayoutOptions::default());
            assert_eq!(positions.len(), 3);
            assert_eq!(positions["p"], Position { x: -300.0, y: 12.5 });
        }
    }

    #[test]
    fn test_minimum_size_applies() {
        let nodes = vec![LayoutNode::new("a", "A", 10.0, 10.0), LayoutNode::new("b", "B", 10.0, 10.0)];
        let options = LayoutOptions { min_width: 200.0, spacing_x: 0.0, ..Default::default() };
        let positions = compute_layout(LayoutAlgorithm::Grid, &nodes, &[], &options);
        assert_eq!(positions["b"].x, 200.0);
    }
}
