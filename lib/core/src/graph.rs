//! Bounded-degree similarity graph over embedded faculty records.
//!
//! Every unordered pair is scored once. Each node then keeps its own
//! top-`max_connections` neighbours above the threshold, and the edge set
//! is the union of those per-node lists. A strong edge may therefore
//! survive even when only one endpoint ranks the other in its top-K.

use crate::cluster::label_cluster;
use crate::embedding::EmbeddingLayout;
use crate::record::{FacultyId, FacultyRecord};
use crate::vector::cosine_similarity;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

/// Minimum similarity for an edge when the caller gives none
pub const DEFAULT_THRESHOLD: f32 = 0.3;

/// Per-node neighbour cap when the caller gives none
pub const DEFAULT_MAX_CONNECTIONS: usize = 8;

/// Cluster colours, cycled by cluster id
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: FacultyId,
    pub name: String,
    pub title: String,
    pub school: String,
    pub department: String,
    pub cluster: usize,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: FacultyId,
    pub target: FacultyId,
    pub similarity: f32,
    /// Rendering hint, `min(similarity * 5, 3)`
    pub weight: f32,
}

impl Edge {
    #[inline]
    #[must_use]
    pub fn new(source: FacultyId, target: FacultyId, similarity: f32) -> Self {
        Self {
            source,
            target,
            similarity,
            weight: visual_weight(similarity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: usize,
    pub members: Vec<FacultyId>,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub clusters: Vec<Cluster>,
}

impl Graph {
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[inline]
pub fn visual_weight(similarity: f32) -> f32 {
    (similarity * 5.0).min(3.0)
}

/// Builds a [`Graph`] from records carrying persisted embeddings
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    layout: EmbeddingLayout,
    threshold: f32,
    max_connections: usize,
}

impl GraphBuilder {
    pub fn new(layout: EmbeddingLayout) -> Self {
        Self {
            layout,
            threshold: DEFAULT_THRESHOLD,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Build the graph.
    ///
    /// Records without an embedding, or whose embedding is not at storage
    /// length, are left out entirely. The second element of the returned
    /// pair lists the ids that were skipped for a malformed vector.
    pub fn build(&self, records: &[FacultyRecord]) -> (Graph, Vec<FacultyId>) {
        let mut members: Vec<(&FacultyRecord, &[f32])> = Vec::with_capacity(records.len());
        let mut malformed = Vec::new();
        for record in records {
            let Some(stored) = record.embedding.as_deref() else {
                continue;
            };
            match self.layout.extract_native(stored) {
                Ok(native) => members.push((record, native)),
                Err(_) => malformed.push(record.id.clone()),
            }
        }

        let edges = self.select_edges(&members);
        let (nodes, clusters) = assign_clusters(&members);

        let edges = edges
            .into_iter()
            .map(|((i, j), similarity)| {
                Edge::new(members[i].0.id.clone(), members[j].0.id.clone(), similarity)
            })
            .collect();

        (Graph { nodes, edges, clusters }, malformed)
    }

    /// Index pairs `(i, j)` with `i < j`, in ascending order
    fn select_edges(&self, members: &[(&FacultyRecord, &[f32])]) -> BTreeMap<(usize, usize), f32> {
        let n = members.len();
        let threshold = self.threshold;

        let rows: Vec<Vec<(usize, f32)>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .filter_map(|j| {
                        let sim = cosine_similarity(members[i].1, members[j].1).unwrap_or(0.0);
                        (sim >= threshold).then_some((j, sim))
                    })
                    .collect()
            })
            .collect();

        let mut neighbours: Vec<Vec<(usize, f32)>> = vec![Vec::new(); n];
        for (i, row) in rows.into_iter().enumerate() {
            for (j, sim) in row {
                neighbours[i].push((j, sim));
                neighbours[j].push((i, sim));
            }
        }

        let mut edges = BTreeMap::new();
        for (i, mut candidates) in neighbours.into_iter().enumerate() {
            candidates.sort_by_key(|&(_, sim)| Reverse(OrderedFloat(sim)));
            candidates.truncate(self.max_connections);
            for (j, sim) in candidates {
                edges.insert((i.min(j), i.max(j)), sim);
            }
        }
        edges
    }
}

/// Department-derived clusters: id is the department's position in the
/// sorted list of distinct departments among the graph's nodes.
fn assign_clusters(members: &[(&FacultyRecord, &[f32])]) -> (Vec<Node>, Vec<Cluster>) {
    let departments: Vec<&str> = members
        .iter()
        .map(|(record, _)| record.department.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut grouped: Vec<Vec<&FacultyRecord>> = vec![Vec::new(); departments.len()];
    let nodes = members
        .iter()
        .map(|(record, _)| {
            let cluster = departments
                .binary_search(&record.department.as_str())
                .unwrap_or_default();
            grouped[cluster].push(*record);
            Node {
                id: record.id.clone(),
                name: record.name.clone(),
                title: record.title.clone(),
                school: record.school.clone(),
                department: record.department.clone(),
                cluster,
                color: PALETTE[cluster % PALETTE.len()].to_string(),
            }
        })
        .collect();

    let clusters = grouped
        .into_iter()
        .enumerate()
        .map(|(id, records)| Cluster {
            id,
            label: label_cluster(records.iter().filter_map(|r| r.research_text()), records.len(), id),
            members: records.iter().map(|r| r.id.clone()).collect(),
        })
        .collect();

    (nodes, clusters)
}
