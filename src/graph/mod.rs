//! Undirected graph model, generation and ordered search
//!
//! Edge membership is symmetric: if A lists B, B lists A.
//! Searches expand neighbors in ascending id order so that there is exactly
//! one canonical answer to check a player's clicks against.

use std::collections::{HashSet, VecDeque};

use rand::Rng;
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::tree::NodeId;

/// Most nodes a generated graph can hold (ids are single letters A..Z).
pub const MAX_GENERATED_NODES: usize = 26;

/// Errors from graph construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Referenced node is not part of the graph.
    #[error("unknown graph node '{0}'")]
    UnknownNode(NodeId),

    /// Node id already present.
    #[error("graph already contains node '{0}'")]
    DuplicateNode(NodeId),

    /// Edge from a node to itself.
    #[error("self loop on node '{0}'")]
    SelfLoop(NodeId),

    /// Adjacency lists one direction of an edge but not the other.
    #[error("edge {from}-{to} is missing its reverse entry")]
    AsymmetricEdge {
        /// Node listing the neighbor.
        from: NodeId,
        /// Neighbor that does not list it back.
        to: NodeId,
    },

    /// Same neighbor listed twice.
    #[error("edge {from}-{to} listed more than once")]
    DuplicateEdge {
        /// Node whose list repeats the neighbor.
        from: NodeId,
        /// Repeated neighbor.
        to: NodeId,
    },

    /// Generation asked for an unusable number of nodes.
    #[error("node count must be between 1 and {max}, got {count}")]
    InvalidNodeCount {
        /// Requested count.
        count: usize,
        /// Upper bound.
        max: usize,
    },
}

/// Graph vertex with its display position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphNode {
    /// Identifier (a letter for generated graphs).
    pub id: NodeId,
    /// Display x.
    pub x: f64,
    /// Display y.
    pub y: f64,
    /// Label value.
    pub value: u32,
    /// Adjacent node ids, in insertion order.
    pub neighbors: Vec<NodeId>,
}

/// Undirected graph stored as adjacency lists.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGraph"))]
pub struct Graph {
    nodes: Vec<GraphNode>,
}

/// Unchecked wire form; deserialized graphs pass through [`Graph::from_nodes`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGraph {
    nodes: Vec<GraphNode>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGraph> for Graph {
    type Error = GraphError;

    fn try_from(raw: RawGraph) -> Result<Self, Self::Error> {
        Self::from_nodes(raw.nodes)
    }
}

impl Graph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph from prebuilt nodes, keeping their neighbor order.
    ///
    /// Ids must be unique, every neighbor must exist, and each edge must be
    /// listed exactly once at both ends.
    pub fn from_nodes(nodes: Vec<GraphNode>) -> Result<Self, GraphError> {
        let graph = Self { nodes };
        let mut seen = HashSet::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            if !seen.insert(&node.id) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }

        for node in &graph.nodes {
            let mut listed = HashSet::with_capacity(node.neighbors.len());
            for other in &node.neighbors {
                if *other == node.id {
                    return Err(GraphError::SelfLoop(other.clone()));
                }
                if !listed.insert(other) {
                    return Err(GraphError::DuplicateEdge {
                        from: node.id.clone(),
                        to: other.clone(),
                    });
                }
                let back = graph
                    .node(other)
                    .ok_or_else(|| GraphError::UnknownNode(other.clone()))?;
                if !back.neighbors.contains(&node.id) {
                    return Err(GraphError::AsymmetricEdge {
                        from: node.id.clone(),
                        to: other.clone(),
                    });
                }
            }
        }
        Ok(graph)
    }

    /// Add an isolated node.
    pub fn add_node(
        &mut self,
        id: impl Into<NodeId>,
        x: f64,
        y: f64,
        value: u32,
    ) -> Result<(), GraphError> {
        let id = id.into();
        if self.position(&id).is_some() {
            return Err(GraphError::DuplicateNode(id));
        }
        self.nodes.push(GraphNode {
            id,
            x,
            y,
            value,
            neighbors: Vec::new(),
        });
        Ok(())
    }

    /// Add the undirected edge a–b. Returns `false` if it already existed.
    pub fn add_edge(&mut self, a: &NodeId, b: &NodeId) -> Result<bool, GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a.clone()));
        }
        let ia = self
            .position(a)
            .ok_or_else(|| GraphError::UnknownNode(a.clone()))?;
        let ib = self
            .position(b)
            .ok_or_else(|| GraphError::UnknownNode(b.clone()))?;

        if self.nodes[ia].neighbors.contains(b) {
            return Ok(false);
        }
        self.nodes[ia].neighbors.push(b.clone());
        self.nodes[ib].neighbors.push(a.clone());
        Ok(true)
    }

    fn position(&self, id: &NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| &node.id == id)
    }

    /// Look up a node.
    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Each undirected edge once, as `(lower id, higher id)`, sorted.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges: Vec<(NodeId, NodeId)> = self
            .nodes
            .iter()
            .flat_map(|node| {
                node.neighbors
                    .iter()
                    .filter(move |other| node.id < **other)
                    .map(move |other| (node.id.clone(), other.clone()))
            })
            .collect();
        edges.sort();
        edges
    }

    /// Neighbors of `id` in ascending id order (empty for unknown ids).
    pub fn sorted_neighbors(&self, id: &NodeId) -> Vec<&NodeId> {
        let mut neighbors: Vec<&NodeId> = self
            .node(id)
            .map(|node| node.neighbors.iter().collect())
            .unwrap_or_default();
        neighbors.sort();
        neighbors
    }
}

/// Depth-first order from `start`, neighbors taken alphabetically.
///
/// A node is marked visited when it is first visited (popped), not when it
/// is discovered, which reproduces the recursive visiting order. Unknown
/// `start` gives an empty order; unreachable nodes are simply absent.
pub fn dfs_order(graph: &Graph, start: &NodeId) -> Vec<NodeId> {
    let mut order = Vec::new();
    if graph.node(start).is_none() {
        return order;
    }

    let mut visited = HashSet::new();
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        order.push(id.clone());
        // Reverse so the alphabetically smallest neighbor is on top.
        stack.extend(
            graph
                .sorted_neighbors(id)
                .into_iter()
                .rev()
                .filter(|next| !visited.contains(*next)),
        );
    }
    order
}

/// Breadth-first order from `start`, neighbors taken alphabetically.
pub fn bfs_order(graph: &Graph, start: &NodeId) -> Vec<NodeId> {
    let mut order = Vec::new();
    if graph.node(start).is_none() {
        return order;
    }

    let mut discovered = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(id) = queue.pop_front() {
        order.push(id.clone());
        for next in graph.sorted_neighbors(id) {
            if discovered.insert(next) {
                queue.push_back(next);
            }
        }
    }
    order
}

/// Every node reachable from the first one.
pub fn is_connected(graph: &Graph) -> bool {
    match graph.nodes().first() {
        None => true,
        Some(first) => bfs_order(graph, &first.id).len() == graph.len(),
    }
}

/// Join every island to the component of the first node by one edge.
///
/// Returns the number of edges added.
pub fn ensure_connected(graph: &mut Graph) -> usize {
    let mut added = 0;
    loop {
        let Some(first) = graph.nodes().first().map(|node| node.id.clone()) else {
            return added;
        };
        let reached: HashSet<NodeId> = bfs_order(graph, &first).into_iter().collect();
        let island = graph
            .nodes()
            .iter()
            .map(|node| node.id.clone())
            .find(|id| !reached.contains(id));

        let Some(island) = island else {
            return added;
        };
        // Bridge from the last reached node in insertion order.
        let anchor = graph
            .nodes()
            .iter()
            .rev()
            .map(|node| node.id.clone())
            .find(|id| reached.contains(id))
            .unwrap_or(first);
        debug!(%anchor, %island, "bridging disconnected component");
        if graph.add_edge(&anchor, &island).unwrap_or(false) {
            added += 1;
        } else {
            return added;
        }
    }
}

/// Generation parameters for DFS rounds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConfig {
    /// Number of nodes (ids A, B, C, ...).
    pub node_count: usize,
    /// Random extra-edge attempts on top of the baseline chain.
    pub extra_edges: usize,
    /// Nodes per display row.
    pub columns: usize,
    /// Display x of the first column.
    pub origin_x: f64,
    /// Display y of the first row.
    pub origin_y: f64,
    /// Horizontal distance between columns.
    pub column_spacing: f64,
    /// Vertical distance between rows.
    pub row_spacing: f64,
}

impl GraphConfig {
    /// Validated configuration with `node_count` nodes and `node_count / 2`
    /// extra edge attempts.
    pub fn new(node_count: usize) -> Result<Self, GraphError> {
        if node_count == 0 || node_count > MAX_GENERATED_NODES {
            return Err(GraphError::InvalidNodeCount {
                count: node_count,
                max: MAX_GENERATED_NODES,
            });
        }
        Ok(Self {
            node_count,
            extra_edges: node_count / 2,
            columns: 3,
            origin_x: 150.0,
            origin_y: 80.0,
            column_spacing: 150.0,
            row_spacing: 120.0,
        })
    }

    /// Difficulty curve: `min(4 + round / 2, 7)` nodes.
    pub fn for_round(round: u32) -> Self {
        let node_count = (4 + round as usize / 2).min(7);
        Self {
            node_count,
            extra_edges: node_count / 2,
            columns: 3,
            origin_x: 150.0,
            origin_y: 80.0,
            column_spacing: 150.0,
            row_spacing: 120.0,
        }
    }

    /// Set the number of random extra-edge attempts.
    pub fn with_extra_edges(mut self, extra_edges: usize) -> Self {
        self.extra_edges = extra_edges;
        self
    }

    /// Set nodes per display row.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }
}

/// Letter id for the `index`-th generated node.
pub fn letter_id(index: usize) -> NodeId {
    let letter = char::from(b'A' + (index % MAX_GENERATED_NODES) as u8);
    NodeId::new(letter.to_string())
}

/// Connected graph: a chain A–B–C–… plus random extra edges.
#[instrument(level = "trace", skip(rng))]
pub fn generate_graph<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GraphConfig,
) -> Result<Graph, GraphError> {
    if config.node_count == 0 || config.node_count > MAX_GENERATED_NODES {
        return Err(GraphError::InvalidNodeCount {
            count: config.node_count,
            max: MAX_GENERATED_NODES,
        });
    }

    let columns = config.columns.max(1);
    let mut graph = Graph::new();
    for i in 0..config.node_count {
        let row = i / columns;
        let col = i % columns;
        graph.add_node(
            letter_id(i),
            config.origin_x + col as f64 * config.column_spacing,
            config.origin_y + row as f64 * config.row_spacing,
            i as u32 + 1,
        )?;
    }

    for i in 1..config.node_count {
        graph.add_edge(&letter_id(i - 1), &letter_id(i))?;
    }

    for _ in 0..config.extra_edges {
        let a = rng.gen_range(0..config.node_count);
        let b = rng.gen_range(0..config.node_count);
        if a == b {
            trace!(a, "skipping self loop");
            continue;
        }
        if !graph.add_edge(&letter_id(a), &letter_id(b))? {
            trace!(a, b, "skipping existing edge");
        }
    }

    let repaired = ensure_connected(&mut graph);
    if repaired > 0 {
        debug!(repaired, "generated graph needed connectivity repair");
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::seeded_rng;

    fn ids(order: &[NodeId]) -> Vec<&str> {
        order.iter().map(NodeId::as_str).collect()
    }

    fn graph_from(nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::new();
        for (i, id) in nodes.iter().enumerate() {
            graph.add_node(*id, 0.0, 0.0, i as u32).unwrap();
        }
        for (a, b) in edges {
            graph.add_edge(&NodeId::from(*a), &NodeId::from(*b)).unwrap();
        }
        graph
    }

    #[test]
    fn test_path_graph_dfs() {
        let graph = graph_from(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        assert_eq!(ids(&dfs_order(&graph, &NodeId::from("A"))), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_dfs_alphabetical_with_cycle() {
        // A-C, A-B, B-D, C-D, D-E: DFS must go A, B, D, C, E.
        let graph = graph_from(
            &["A", "B", "C", "D", "E"],
            &[("A", "C"), ("A", "B"), ("B", "D"), ("C", "D"), ("D", "E")],
        );
        assert_eq!(
            ids(&dfs_order(&graph, &NodeId::from("A"))),
            vec!["A", "B", "D", "C", "E"]
        );
        assert_eq!(
            ids(&bfs_order(&graph, &NodeId::from("A"))),
            vec!["A", "B", "C", "D", "E"]
        );
    }

    #[test]
    fn test_unknown_start_and_unreachable() {
        let graph = graph_from(&["A", "B", "C"], &[("A", "B")]);
        assert!(dfs_order(&graph, &NodeId::from("Z")).is_empty());
        assert_eq!(dfs_order(&graph, &NodeId::from("A")).len(), 2);
        assert!(!is_connected(&graph));
    }

    #[test]
    fn test_edges_are_symmetric_and_listed_once() {
        let mut graph = graph_from(&["A", "B"], &[("A", "B")]);
        assert_eq!(graph.add_edge(&NodeId::from("B"), &NodeId::from("A")), Ok(false));
        assert_eq!(
            graph.edges(),
            vec![(NodeId::from("A"), NodeId::from("B"))]
        );
        assert_eq!(
            graph.add_edge(&NodeId::from("A"), &NodeId::from("A")),
            Err(GraphError::SelfLoop(NodeId::from("A")))
        );
        assert_eq!(
            graph.add_edge(&NodeId::from("A"), &NodeId::from("Q")),
            Err(GraphError::UnknownNode(NodeId::from("Q")))
        );
    }

    #[test]
    fn test_ensure_connected_bridges_islands() {
        let mut graph = graph_from(&["A", "B", "C", "D"], &[("A", "B"), ("C", "D")]);
        assert_eq!(ensure_connected(&mut graph), 1);
        assert!(is_connected(&graph));
        assert_eq!(ensure_connected(&mut graph), 0);
    }

    #[test]
    fn test_generated_graph_is_connected() {
        let mut rng = seeded_rng(7);
        for round in 0..12 {
            let config = GraphConfig::for_round(round);
            let graph = generate_graph(&mut rng, &config).unwrap();
            assert_eq!(graph.len(), config.node_count);
            assert!(is_connected(&graph));
            let order = dfs_order(&graph, &NodeId::from("A"));
            assert_eq!(order.len(), graph.len());
            for node in graph.nodes() {
                for other in &node.neighbors {
                    let back = graph.node(other).unwrap();
                    assert!(back.neighbors.contains(&node.id));
                }
            }
        }
    }

    #[test]
    fn test_config_bounds() {
        assert_eq!(GraphConfig::for_round(0).node_count, 4);
        assert_eq!(GraphConfig::for_round(5).node_count, 6);
        assert_eq!(GraphConfig::for_round(40).node_count, 7);
        assert!(GraphConfig::new(0).is_err());
        assert!(GraphConfig::new(27).is_err());
        assert_eq!(GraphConfig::new(6).unwrap().extra_edges, 3);
    }

    fn bare(id: &str, neighbors: &[&str]) -> GraphNode {
        GraphNode {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            value: 0,
            neighbors: neighbors.iter().map(|n| NodeId::from(*n)).collect(),
        }
    }

    #[test]
    fn test_from_nodes_checks_adjacency() {
        let graph = Graph::from_nodes(vec![bare("A", &["B"]), bare("B", &["A"])]).unwrap();
        assert_eq!(graph.edges(), vec![(NodeId::from("A"), NodeId::from("B"))]);
        assert_eq!(ids(&dfs_order(&graph, &"A".into())), ["A", "B"]);

        assert_eq!(
            Graph::from_nodes(vec![bare("A", &["B"]), bare("B", &[])]),
            Err(GraphError::AsymmetricEdge {
                from: "A".into(),
                to: "B".into()
            })
        );
        assert_eq!(
            Graph::from_nodes(vec![bare("A", &["C"])]),
            Err(GraphError::UnknownNode("C".into()))
        );
        assert_eq!(
            Graph::from_nodes(vec![bare("A", &["A"])]),
            Err(GraphError::SelfLoop("A".into()))
        );
        assert_eq!(
            Graph::from_nodes(vec![bare("A", &["B", "B"]), bare("B", &["A"])]),
            Err(GraphError::DuplicateEdge {
                from: "A".into(),
                to: "B".into()
            })
        );
        assert_eq!(
            Graph::from_nodes(vec![bare("A", &[]), bare("A", &[])]),
            Err(GraphError::DuplicateNode("A".into()))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rejects_one_sided_edges() {
        let json = r#"{"nodes":[
            {"id":"A","x":0.0,"y":0.0,"value":1,"neighbors":["B"]},
            {"id":"B","x":0.0,"y":0.0,"value":2,"neighbors":[]}
        ]}"#;
        assert!(serde_json::from_str::<Graph>(json).is_err());

        let graph = graph_from(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let back: Graph = serde_json::from_str(&serde_json::to_string(&graph).unwrap()).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn test_generated_layout_grid() {
        let mut rng = seeded_rng(1);
        let graph = generate_graph(&mut rng, &GraphConfig::new(4).unwrap()).unwrap();
        let d = graph.node(&NodeId::from("D")).unwrap();
        assert_eq!((d.x, d.y, d.value), (150.0, 200.0, 4));
    }
}
