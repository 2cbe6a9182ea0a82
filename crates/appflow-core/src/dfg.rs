//! Directly-follows graph
//!
//! TigerStyle: Built once from an ordered log, read-only afterwards.
//!
//! Nodes are interned app identifiers in first-seen order. An edge `a -> b`
//! counts how often `b` directly followed `a` inside one session. Each node
//! carries its outgoing transitions normalized into a probability
//! distribution, which is what the path simulator samples from.

use crate::event::{EventLog, EventRecord};
use crate::session::split_sessions;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Dense node index into a [`Dfg`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of this node in the graph's node table
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// One weighted transition seen from a node
///
/// For outgoing transitions `node` is the target; for incoming ones it is
/// the source. `probability` is normalized over the same direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub node: NodeId,
    pub count: u64,
    pub probability: f64,
}

/// Directly-follows graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dfg {
    apps: Vec<String>,
    index: HashMap<String, NodeId>,
    event_counts: Vec<u64>,
    outgoing: Vec<Vec<Transition>>,
    incoming: Vec<Vec<Transition>>,
    outgoing_totals: Vec<u64>,
    /// Edges in order of first observation
    edge_order: Vec<(NodeId, NodeId)>,
    session_count: usize,
}

impl Dfg {
    /// Build the graph from ordered events
    ///
    /// A gap larger than `break_span` ends a session; no edge ever crosses
    /// a session boundary.
    pub fn build(events: &[EventRecord], break_span: Duration) -> Self {
        let mut builder = DfgBuilder::default();
        let sessions = split_sessions(events, break_span);

        for session in &sessions {
            let mut previous: Option<NodeId> = None;
            for record in *session {
                let node = builder.intern(&record.app);
                if let Some(prev) = previous {
                    builder.add_edge(prev, node);
                }
                previous = Some(node);
            }
        }

        let dfg = builder.finish(sessions.len());
        tracing::debug!(
            nodes = dfg.node_count(),
            edges = dfg.edge_count(),
            sessions = dfg.session_count(),
            "Directly-follows graph built"
        );
        dfg
    }

    /// Build the graph from a loaded log
    pub fn from_log(log: &EventLog, break_span: Duration) -> Self {
        Self::build(log.records(), break_span)
    }

    /// Number of distinct apps
    pub fn node_count(&self) -> usize {
        self.apps.len()
    }

    /// Number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.edge_order.len()
    }

    /// Number of sessions the log was split into
    pub fn session_count(&self) -> usize {
        self.session_count
    }

    /// Look up the node for an app identifier
    pub fn node_id(&self, app: &str) -> Option<NodeId> {
        self.index.get(app).copied()
    }

    /// App identifier of a node
    pub fn app(&self, node: NodeId) -> &str {
        &self.apps[node.index()]
    }

    /// All app identifiers in first-seen order
    pub fn apps(&self) -> &[String] {
        &self.apps
    }

    /// All node ids in first-seen order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.apps.len()).map(|i| NodeId(i as u32))
    }

    /// How many records carried this app
    pub fn event_count(&self, node: NodeId) -> u64 {
        self.event_counts[node.index()]
    }

    /// Outgoing transitions in order of first observation
    pub fn outgoing(&self, node: NodeId) -> &[Transition] {
        &self.outgoing[node.index()]
    }

    /// Incoming transitions in order of first observation
    pub fn incoming(&self, node: NodeId) -> &[Transition] {
        &self.incoming[node.index()]
    }

    /// Sum of outgoing edge counts
    pub fn outgoing_total(&self, node: NodeId) -> u64 {
        self.outgoing_totals[node.index()]
    }

    /// Observed count for `source -> target` (0 when never observed)
    pub fn edge_count_between(&self, source: NodeId, target: NodeId) -> u64 {
        self.outgoing(source)
            .iter()
            .find(|t| t.node == target)
            .map(|t| t.count)
            .unwrap_or(0)
    }

    /// Edges as `(source, target, count)` in order of first observation
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, u64)> + '_ {
        self.edge_order
            .iter()
            .map(|&(s, t)| (s, t, self.edge_count_between(s, t)))
    }

    /// Directly next and directly previous apps of a node
    pub fn transitions_of(&self, app: &str) -> Option<NodeTransitions> {
        let node = self.node_id(app)?;
        Some(NodeTransitions {
            app: app.to_string(),
            next: self.rows(self.outgoing(node)),
            previous: self.rows(self.incoming(node)),
        })
    }

    fn rows(&self, transitions: &[Transition]) -> Vec<TransitionRow> {
        let mut rows: Vec<TransitionRow> = transitions
            .iter()
            .map(|t| TransitionRow {
                app: self.app(t.node).to_string(),
                count: t.count,
                frequency: t.probability,
            })
            .collect();
        // Stable: equal counts keep first-observation order
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows
    }
}

/// Transition table row for one neighbor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRow {
    pub app: String,
    pub count: u64,
    /// Share of this node's transitions in the same direction
    pub frequency: f64,
}

/// Neighbor tables of one node, sorted by count descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTransitions {
    pub app: String,
    /// Apps that directly followed this one
    pub next: Vec<TransitionRow>,
    /// Apps that this one directly followed
    pub previous: Vec<TransitionRow>,
}

#[derive(Default)]
struct DfgBuilder {
    apps: Vec<String>,
    index: HashMap<String, NodeId>,
    event_counts: Vec<u64>,
    outgoing: Vec<Vec<(NodeId, u64)>>,
    incoming: Vec<Vec<(NodeId, u64)>>,
    edge_order: Vec<(NodeId, NodeId)>,
}

impl DfgBuilder {
    fn intern(&mut self, app: &str) -> NodeId {
        let node = match self.index.get(app) {
            Some(&node) => node,
            None => {
                let node = NodeId(self.apps.len() as u32);
                self.apps.push(app.to_string());
                self.index.insert(app.to_string(), node);
                self.event_counts.push(0);
                self.outgoing.push(Vec::new());
                self.incoming.push(Vec::new());
                node
            }
        };
        self.event_counts[node.index()] += 1;
        node
    }

    fn add_edge(&mut self, source: NodeId, target: NodeId) {
        let out = &mut self.outgoing[source.index()];
        match out.iter_mut().find(|(n, _)| *n == target) {
            Some((_, count)) => *count += 1,
            None => {
                out.push((target, 1));
                self.edge_order.push((source, target));
            }
        }

        let inc = &mut self.incoming[target.index()];
        match inc.iter_mut().find(|(n, _)| *n == source) {
            Some((_, count)) => *count += 1,
            None => inc.push((source, 1)),
        }
    }

    fn finish(self, session_count: usize) -> Dfg {
        let outgoing_totals: Vec<u64> = self
            .outgoing
            .iter()
            .map(|edges| edges.iter().map(|(_, c)| c).sum())
            .collect();

        Dfg {
            outgoing: self.outgoing.iter().map(|e| normalize(e)).collect(),
            incoming: self.incoming.iter().map(|e| normalize(e)).collect(),
            apps: self.apps,
            index: self.index,
            event_counts: self.event_counts,
            outgoing_totals,
            edge_order: self.edge_order,
            session_count,
        }
    }
}

fn normalize(edges: &[(NodeId, u64)]) -> Vec<Transition> {
    let total: u64 = edges.iter().map(|(_, c)| c).sum();
    edges
        .iter()
        .map(|&(node, count)| Transition {
            node,
            count,
            probability: count as f64 / total as f64,
        })
        .collect()
}
