//! Graph utilities over resolved relationships.

use crate::models::DatabaseMetadata;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::BTreeSet;

/// Build a directed `from -> to` graph of resolved relationships.
///
/// Every collection is a node, including collections without edges.
pub fn relationship_graph(metadata: &DatabaseMetadata) -> DiGraphMap<&str, ()> {
    let mut graph = DiGraphMap::new();

    for collection in &metadata.collections {
        graph.add_node(collection.name.as_str());
    }
    for collection in &metadata.collections {
        for target in collection.resolved_relationships().filter_map(|r| r.to.as_deref()) {
            graph.add_edge(collection.name.as_str(), target, ());
        }
    }

    graph
}

/// Collections directly linked to `focus` in either direction, excluding `focus`.
pub fn related_collections(metadata: &DatabaseMetadata, focus: &str) -> BTreeSet<String> {
    let graph = relationship_graph(metadata);
    if !graph.contains_node(focus) {
        return BTreeSet::new();
    }

    graph
        .neighbors_directed(focus, Direction::Outgoing)
        .chain(graph.neighbors_directed(focus, Direction::Incoming))
        .filter(|name| *name != focus)
        .map(str::to_string)
        .collect()
}
