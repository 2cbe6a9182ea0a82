//! Filtered DFG views
//!
//! A view restricts the graph to the most used apps and keeps only the
//! heaviest share of edges, so large logs stay readable.

use crate::constants::{VIEW_RESOLUTION_PERCENT_DEFAULT, VIEW_RESOLUTION_PERCENT_MAX};
use crate::dfg::{Dfg, NodeId};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which part of the graph to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilter {
    /// Keep only the `n` most frequent apps (None = all)
    pub top: Option<usize>,
    /// Percentage of edges kept, heaviest first
    pub resolution: u8,
}

impl Default for ViewFilter {
    fn default() -> Self {
        Self {
            top: None,
            resolution: VIEW_RESOLUTION_PERCENT_DEFAULT,
        }
    }
}

impl ViewFilter {
    /// Create a filter
    pub fn new(top: Option<usize>, resolution: u8) -> Result<Self> {
        let filter = Self { top, resolution };
        filter.validate()?;
        Ok(filter)
    }

    /// Validate the filter
    pub fn validate(&self) -> Result<()> {
        if self.resolution > VIEW_RESOLUTION_PERCENT_MAX {
            return Err(Error::InvalidResolution {
                value: self.resolution,
                max: VIEW_RESOLUTION_PERCENT_MAX,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewNode {
    pub app: String,
    pub event_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEdge {
    pub source: String,
    pub target: String,
    pub count: u64,
}

/// Node and edge lists ready for a presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfgView {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
}

impl Dfg {
    /// The `n` apps with the most events (ties keep first-seen order)
    ///
    /// `None` returns every node.
    pub fn top_apps(&self, n: Option<usize>) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.nodes().collect();
        nodes.sort_by(|a, b| self.event_count(*b).cmp(&self.event_count(*a)));
        if let Some(n) = n {
            nodes.truncate(n);
        }
        nodes
    }

    /// Build a filtered view of the graph
    pub fn view(&self, filter: &ViewFilter) -> Result<DfgView> {
        filter.validate()?;

        let selected = self.top_apps(filter.top);
        let members: HashSet<NodeId> = selected.iter().copied().collect();

        let mut edges: Vec<(NodeId, NodeId, u64)> = self
            .edges()
            .filter(|(s, t, _)| members.contains(s) && members.contains(t))
            .collect();
        // Stable: equal counts keep first-observation order
        edges.sort_by(|a, b| b.2.cmp(&a.2));

        let keep = (edges.len() * filter.resolution as usize).div_ceil(100);
        edges.truncate(keep);

        Ok(DfgView {
            nodes: selected
                .iter()
                .map(|&node| ViewNode {
                    app: self.app(node).to_string(),
                    event_count: self.event_count(node),
                })
                .collect(),
            edges: edges
                .into_iter()
                .map(|(s, t, count)| ViewEdge {
                    source: self.app(s).to_string(),
                    target: self.app(t).to_string(),
                    count,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventRecord;
    use chrono::{Duration, TimeZone, Utc};

    fn dfg(apps: &[&str]) -> Dfg {
        let events: Vec<_> = apps
            .iter()
            .enumerate()
            .map(|(i, app)| {
                EventRecord::new(*app, Utc.timestamp_opt(1_600_000_000 + i as i64, 0).unwrap())
            })
            .collect();
        Dfg::build(&events, Duration::seconds(10))
    }

    #[test]
    fn test_full_resolution_keeps_all_edges() {
        let graph = dfg(&["a", "b", "a", "c", "a", "b"]);
        let view = graph.view(&ViewFilter::new(None, 100).unwrap()).unwrap();
        assert_eq!(view.edges.len(), graph.edge_count());
        assert_eq!(view.nodes.len(), 3);
    }

    #[test]
    fn test_zero_resolution_keeps_nodes_only() {
        let graph = dfg(&["a", "b", "c"]);
        let view = graph.view(&ViewFilter::new(None, 0).unwrap()).unwrap();
        assert!(view.edges.is_empty());
        assert_eq!(view.nodes.len(), 3);
    }

    #[test]
    fn test_resolution_keeps_heaviest_edges() {
        // a->b x3, b->a x2, a->c x1, c->a x1
        let graph = dfg(&["a", "b", "a", "b", "a", "c", "a", "b"]);
        let view = graph.view(&ViewFilter::new(None, 50).unwrap()).unwrap();
        assert_eq!(view.edges.len(), 2);
        assert_eq!(view.edges[0].source, "a");
        assert_eq!(view.edges[0].target, "b");
        assert_eq!(view.edges[0].count, 3);
        assert_eq!(view.edges[1].count, 2);
    }

    #[test]
    fn test_top_apps_restricts_nodes_and_edges() {
        let graph = dfg(&["a", "b", "a", "c", "a", "b"]);
        let view = graph.view(&ViewFilter::new(Some(2), 100).unwrap()).unwrap();
        let names: Vec<_> = view.nodes.iter().map(|n| n.app.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(view
            .edges
            .iter()
            .all(|e| e.source != "c" && e.target != "c"));
    }

    #[test]
    fn test_resolution_out_of_range() {
        assert!(matches!(
            ViewFilter::new(None, 101),
            Err(Error::InvalidResolution { .. })
        ));
    }
}
