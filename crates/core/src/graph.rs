//! Graph snapshot over an indexed note set.
//!
//! Nodes are notes plus optional pseudo-nodes for companion documents and
//! tags. Node ids are the note id, `doc:<path>` and `tag:<name>`.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::index::{Note, normalize_path};
use crate::layout::{LayoutEdge, LayoutNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Note,
    Document,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Link,
    Companion,
    Tag,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    pub degree: usize,
}

impl GraphNode {
    fn pseudo(id: String, kind: NodeKind, label: String) -> Self {
        Self { id, kind, label, color: None, tags: Vec::new(), folder: None, degree: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    /// Add a node per companion document.
    pub include_documents: bool,
    /// Add a node per tag.
    pub include_tags: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self { include_documents: true, include_tags: false }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphSnapshot {
    /// Build from notes whose `incoming_links` are current.
    ///
    /// Link edges run from the linking note to its target and are undirected
    /// for deduplication: mutual links yield a single edge.
    pub fn build(notes: &[Note], options: GraphOptions) -> Self {
        let mut nodes: Vec<GraphNode> = notes
            .iter()
            .map(|note| GraphNode {
                id: note.id.to_string(),
                kind: NodeKind::Note,
                label: note.title.clone(),
                color: note.color.clone(),
                tags: note.tags.clone(),
                folder: note.folder().map(str::to_string),
                degree: 0,
            })
            .collect();

        let mut edges = Vec::new();
        let mut seen = BTreeSet::new();
        for note in notes {
            for source in &note.incoming_links {
                let (a, b) = (source.as_str(), note.id.as_str());
                if seen.insert(if a < b { (a, b) } else { (b, a) }) {
                    edges.push(GraphEdge {
                        source: a.to_string(),
                        target: b.to_string(),
                        kind: EdgeKind::Link,
                    });
                }
            }
        }

        let mut pseudo: BTreeMap<String, GraphNode> = BTreeMap::new();
        for note in notes {
            if options.include_documents
                && let Some(pdf) = &note.source_pdf
            {
                let path = normalize_path(pdf);
                let id = format!("doc:{path}");
                let label = path.rsplit('/').next().unwrap_or(&path).to_string();
                pseudo
                    .entry(id.clone())
                    .or_insert_with(|| GraphNode::pseudo(id.clone(), NodeKind::Document, label));
                edges.push(GraphEdge { source: note.id.to_string(), target: id, kind: EdgeKind::Companion });
            }

            if options.include_tags {
                for tag in &note.tags {
                    let name = tag.to_lowercase();
                    let id = format!("tag:{name}");
                    pseudo
                        .entry(id.clone())
                        .or_insert_with(|| GraphNode::pseudo(id.clone(), NodeKind::Tag, format!("#{name}")));
                    edges.push(GraphEdge { source: note.id.to_string(), target: id, kind: EdgeKind::Tag });
                }
            }
        }
        nodes.extend(pseudo.into_values());
        edges.dedup();

        let mut degrees: BTreeMap<&str, usize> = BTreeMap::new();
        for edge in &edges {
            *degrees.entry(edge.source.as_str()).or_default() += 1;
            *degrees.entry(edge.target.as_str()).or_default() += 1;
        }
        for node in &mut nodes {
            node.degree = degrees.get(node.id.as_str()).copied().unwrap_or(0);
        }

        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Layout input with every node sized `width` x `height`.
    pub fn layout_input(&self, width: f64, height: f64) -> (Vec<LayoutNode>, Vec<LayoutEdge>) {
        let nodes = self
            .nodes
            .iter()
            .map(|n| {
                let mut node = LayoutNode::new(&n.id, &n.label, width, height)
                    .with_tags(n.tags.clone())
                    .with_degree(n.degree);
                if let Some(color) = &n.color {
                    node = node.with_color(color);
                }
                if let Some(folder) = &n.folder {
                    node = node.with_folder(folder);
                }
                node
            })
            .collect();
        let edges = self.edges.iter().map(|e| LayoutEdge::new(&e.source, &e.target)).collect();
        (nodes, edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::reindex;
    use crate::parser::parse_note;
    use crate::vault::FileStat;
    use chrono::Utc;

    fn notes() -> Vec<Note> {
        let note = |path: &str, content: &str| {
            Note::from_parsed(&FileStat::new(path, Utc::now()), parse_note(content), None)
        };
        reindex(&[
            note("a.md", "---\ncolor: red\ntags: [ml]\n---\n# A\n[[b]]"),
            note("dir/b.md", "---\nsource_pdf: papers/b.pdf\n---\n# B\n[[a]] #ML"),
            note("c.md", "# C"),
        ])
    }

    #[test]
    fn test_mutual_links_single_edge() {
        let graph = GraphSnapshot::build(&notes(), GraphOptions { include_documents: false, include_tags: false });
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.node("a.md").unwrap().degree, 1);
        assert_eq!(graph.node("c.md").unwrap().degree, 0);
    }

    #[test]
    fn test_document_and_tag_nodes() {
        let graph = GraphSnapshot::build(&notes(), GraphOptions { include_documents: true, include_tags: true });

        let doc = graph.node("doc:papers/b.pdf").unwrap();
        assert_eq!(doc.kind, NodeKind::Document);
        assert_eq!(doc.label, "b.pdf");

        let tag = graph.node("tag:ml").unwrap();
        assert_eq!(tag.kind, NodeKind::Tag);
        assert_eq!(tag.degree, 2);

        assert_eq!(graph.node("dir/b.md").unwrap().degree, 3);
    }

    #[test]
    fn test_layout_input_carries_hints() {
        let graph = GraphSnapshot::build(&notes(), GraphOptions::default());
        let (nodes, edges) = graph.layout_input(120.0, 60.0);

        let a = nodes.iter().find(|n| n.id == "a.md").unwrap();
        assert_eq!(a.color.as_deref(), Some("red"));
        assert_eq!(a.tags, vec!["ml"]);
        assert_eq!(a.width, 120.0);

        let b = nodes.iter().find(|n| n.id == "dir/b.md").unwrap();
        assert_eq!(b.folder.as_deref(), Some("dir"));
        assert_eq!(edges.len(), 2);
    }
}
