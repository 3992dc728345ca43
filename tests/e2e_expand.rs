//! End-to-end tests for label filters, relationship filters and sequences.
//!
//! Each test builds a small movie graph in a MemoryGraph and runs the
//! public procedures against it.

use path_expander::procedures::{expand, expand_config, subgraph_nodes};
use path_expander::{
    props, CancellableGraph, CancellationToken, Error, MemoryGraph, NodeId, Path, PathConfig,
    PropertyMap, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// Fixture
//
//   keanu  -ACTED_IN-> matrix, replacements
//   carrie -ACTED_IN-> matrix
//   lana   -DIRECTED-> matrix
//   gene   -ACTED_IN-> replacements, unforgiven
//   clint  -ACTED_IN-> unforgiven,  clint -DIRECTED-> unforgiven
//   bb     -FOLLOWS->  every Person
// ============================================================================

struct Movies {
    graph: MemoryGraph,
    keanu: NodeId,
    gene: NodeId,
    clint: NodeId,
    matrix: NodeId,
    replacements: NodeId,
    bb: NodeId,
}

fn movies() -> Movies {
    let graph = MemoryGraph::new();
    let person = |name: &str| graph.create_node(&["Person"], props([("name", name)]));
    let keanu = person("Keanu Reeves");
    let gene = person("Gene Hackman");
    let clint = person("Clint Eastwood");
    let carrie = person("Carrie-Anne Moss");
    let lana = person("Lana Wachowski");

    let movie = |title: &str| graph.create_node(&["Movie"], props([("title", title)]));
    let matrix = movie("The Matrix");
    let replacements = movie("The Replacements");
    let unforgiven = movie("Unforgiven");

    let bb = graph.create_node(&["BigBrother"], props([("name", "Big Brother")]));

    let rel = |a, b, t| graph.create_relationship(a, b, t).unwrap();
    rel(keanu, matrix, "ACTED_IN");
    rel(keanu, replacements, "ACTED_IN");
    rel(carrie, matrix, "ACTED_IN");
    rel(lana, matrix, "DIRECTED");
    rel(gene, replacements, "ACTED_IN");
    rel(gene, unforgiven, "ACTED_IN");
    rel(clint, unforgiven, "ACTED_IN");
    rel(clint, unforgiven, "DIRECTED");
    for p in [keanu, gene, clint, carrie, lana] {
        rel(bb, p, "FOLLOWS");
    }

    Movies { graph, keanu, gene, clint, matrix, replacements, bb }
}

impl Movies {
    fn westerns(&self) {
        self.graph.add_label(self.gene, "Western").unwrap();
        self.graph.add_label(self.clint, "Western").unwrap();
    }

    fn name(&self, id: NodeId) -> String {
        let node = self.graph.node(id).unwrap();
        match node.get("name").or_else(|| node.get("title")) {
            Some(Value::String(s)) => s.clone(),
            other => panic!("node {id} has no name: {other:?}"),
        }
    }

    fn end_names(&self, paths: &[Option<Path>]) -> Vec<String> {
        paths.iter().flatten().map(|p| self.name(p.end())).collect()
    }

    fn expand_config(&self, start: NodeId, config: serde_json::Value) -> Vec<Option<Path>> {
        expand_config(&self.graph, &[start], &PathConfig::from_json(config).unwrap()).unwrap()
    }
}

const MOVIE_RELS: &str = "ACTED_IN|PRODUCED|DIRECTED";

// ============================================================================
// 1. Terminator and end-node labels
// ============================================================================

#[test]
fn test_termination_label_blocks_deeper_matches() {
    let m = movies();
    m.westerns();

    let paths = m.expand_config(m.keanu, json!({
        "relationshipFilter": MOVIE_RELS, "labelFilter": "/Western", "uniqueness": "NODE_GLOBAL",
    }));
    // Gene blocks every path to Clint
    assert_eq!(m.end_names(&paths), vec!["Gene Hackman"]);
    assert_eq!(paths[0].as_ref().unwrap().len(), 2);
}

#[test]
fn test_end_node_label_continues_past_match() {
    let m = movies();
    m.westerns();

    let paths = m.expand_config(m.keanu, json!({
        "relationshipFilter": MOVIE_RELS, "labelFilter": ">Western", "uniqueness": "NODE_GLOBAL",
    }));
    assert_eq!(m.end_names(&paths), vec!["Gene Hackman", "Clint Eastwood"]);
}

#[test]
fn test_end_node_label_with_limit() {
    let m = movies();
    m.westerns();

    let paths = m.expand_config(m.keanu, json!({
        "relationshipFilter": MOVIE_RELS, "labelFilter": ">Western", "uniqueness": "NODE_GLOBAL", "limit": 1,
    }));
    assert_eq!(m.end_names(&paths), vec!["Gene Hackman"]);
}

#[test]
fn test_termination_label_does_not_prune_below_min_level() {
    let m = movies();
    m.westerns();

    let paths = m.expand_config(m.keanu, json!({
        "relationshipFilter": MOVIE_RELS, "labelFilter": "/Western", "uniqueness": "NODE_GLOBAL", "minLevel": 3,
    }));
    assert_eq!(m.end_names(&paths), vec!["Clint Eastwood"]);
}

#[test]
fn test_limit_plays_nice_with_min_level() {
    let m = movies();
    m.westerns();

    let paths = m.expand_config(m.keanu, json!({
        "relationshipFilter": MOVIE_RELS, "labelFilter": ">Western", "uniqueness": "NODE_GLOBAL",
        "limit": 1, "minLevel": 3,
    }));
    assert_eq!(m.end_names(&paths), vec!["Clint Eastwood"]);
}

// ============================================================================
// 2. Precedence inside one label group
// ============================================================================

#[test]
fn test_label_precedence() {
    let m = movies();
    m.westerns();

    let cases: &[(&str, bool, &[&str])] = &[
        ("+Person|-Person", true, &[]),
        ("/Western|-Western", false, &[]),
        (">Western|-Western", false, &[]),
        ("/Western|+Movie", false, &["Gene Hackman"]),
        ("/Western|>Western", false, &["Gene Hackman"]),
        (">Western|+Movie", false, &["Gene Hackman", "Clint Eastwood"]),
    ];

    for (filter, filter_start, expected) in cases {
        let paths = m.expand_config(m.keanu, json!({
            "relationshipFilter": MOVIE_RELS, "labelFilter": filter, "uniqueness": "NODE_GLOBAL",
            "filterStartNode": filter_start,
        }));
        assert_eq!(m.end_names(&paths), *expected, "labelFilter {filter}");
    }
}

#[test]
fn test_compound_label_matches_only_node_with_both_labels() {
    let m = movies();
    m.westerns();
    m.graph.add_label(m.clint, "Eastwood").unwrap();

    let config = PathConfig::from_json(json!({
        "relationshipFilter": MOVIE_RELS, "labelFilter": "/Western:Eastwood",
    }))
    .unwrap();
    let nodes = subgraph_nodes(&m.graph, &[m.keanu], &config).unwrap();
    assert_eq!(nodes, vec![Some(m.clint)]);
}

#[test]
fn test_compound_label_works_in_blacklist() {
    let m = movies();
    m.westerns();
    m.graph.add_label(m.clint, "Blacklist").unwrap();

    let config = PathConfig::from_json(json!({
        "relationshipFilter": MOVIE_RELS, "labelFilter": ">Western|-Western:Blacklist",
    }))
    .unwrap();
    let nodes = subgraph_nodes(&m.graph, &[m.keanu], &config).unwrap();
    assert_eq!(nodes, vec![Some(m.gene)]);
}

// ============================================================================
// 3. Relationship filters
// ============================================================================

#[test]
fn test_any_type_by_direction() {
    let m = movies();

    assert_eq!(expand(&m.graph, &[m.matrix], Some(">"), Some(""), 0, 2).unwrap().len(), 1);
    assert_eq!(expand(&m.graph, &[m.matrix], Some("<"), Some(""), 0, 2).unwrap().len(), 7);
    assert_eq!(expand(&m.graph, &[m.matrix], Some(""), Some(""), 0, 2).unwrap().len(), 8);
    assert_eq!(expand(&m.graph, &[m.matrix], None, None, 0, 2).unwrap().len(), 8);
}

#[test]
fn test_relationship_filter_without_type() {
    let m = movies();

    let config = PathConfig::from_json(json!({ "relationshipFilter": ">", "labelFilter": ">Movie" })).unwrap();
    let nodes = subgraph_nodes(&m.graph, &[m.keanu], &config).unwrap();
    assert_eq!(nodes, vec![Some(m.matrix), Some(m.replacements)]);

    let config = PathConfig::from_json(json!({ "relationshipFilter": "<", "labelFilter": ">BigBrother" })).unwrap();
    let nodes = subgraph_nodes(&m.graph, &[m.keanu], &config).unwrap();
    assert_eq!(nodes, vec![Some(m.bb)]);
}

#[test]
fn test_relationship_sequence() {
    let m = movies();

    let paths = m.expand_config(m.keanu, json!({
        "relationshipFilter": "ACTED_IN>,<ACTED_IN", "maxLevel": 2,
    }));
    assert_eq!(
        m.end_names(&paths),
        vec!["Keanu Reeves", "The Matrix", "The Replacements", "Carrie-Anne Moss", "Gene Hackman"]
    );
}

#[test]
fn test_invalid_relationship_filter_is_rejected_before_traversal() {
    let m = movies();
    let config = PathConfig::default().with_relationship_filter("<ACTED_IN>");
    let err = expand_config(&m.graph, &[m.keanu], &config).unwrap_err();
    assert!(matches!(err, Error::InvalidFilterSyntax { .. }));
}

// ============================================================================
// 4. Whitelist labels and the start node
// ============================================================================

#[test]
fn test_filter_start_node_false_ignores_label_filter() {
    let m = movies();

    let paths = m.expand_config(m.matrix, json!({ "labelFilter": "+Person", "maxLevel": 2 }));
    assert_eq!(paths.len(), 4);
    assert_eq!(paths[0].as_ref().unwrap().end(), m.matrix);

    let paths = m.expand_config(m.matrix, json!({ "labelFilter": "+Person", "minLevel": 1, "maxLevel": 2 }));
    assert_eq!(paths.len(), 3);
}

#[test]
fn test_filter_start_node_true_applies_label_filter() {
    let m = movies();
    let paths = m.expand_config(m.matrix, json!({ "labelFilter": "+Person", "filterStartNode": true }));
    assert!(paths.is_empty());
}

#[test]
fn test_optional_with_no_results_yields_single_none() {
    let m = movies();

    let paths = m.expand_config(m.matrix, json!({
        "labelFilter": "+Agent", "minLevel": 1, "maxLevel": 2, "optional": true,
    }));
    assert_eq!(paths, vec![None]);

    let paths = m.expand_config(m.matrix, json!({ "labelFilter": "+Agent", "minLevel": 1, "maxLevel": 2 }));
    assert!(paths.is_empty());
}

// ============================================================================
// 5. The `sequence` option
// ============================================================================

#[test]
fn test_sequence_option_alternates_labels_and_relationships() {
    let m = movies();

    let paths = m.expand_config(m.keanu, json!({ "sequence": "Person, ACTED_IN>, Movie, <DIRECTED" }));
    assert_eq!(
        m.end_names(&paths),
        vec!["Keanu Reeves", "The Matrix", "The Replacements", "Lana Wachowski"]
    );
}

#[test]
fn test_sequence_option_relationship_first() {
    let m = movies();

    let paths = m.expand_config(m.keanu, json!({
        "sequence": "ACTED_IN>, Movie, <ACTED_IN, Person", "beginSequenceAtStart": false, "maxLevel": 2,
    }));
    assert_eq!(
        m.end_names(&paths),
        vec!["Keanu Reeves", "The Matrix", "The Replacements", "Carrie-Anne Moss", "Gene Hackman"]
    );
}

// ============================================================================
// 6. Label sequences on a chain
//
//   start(A) -> a(A) -> b(B) -> ac(A,C) -> ba(B,A) -> da(D,A)
// ============================================================================

fn chain() -> (MemoryGraph, Vec<NodeId>) {
    let graph = MemoryGraph::new();
    let labels: [&[&str]; 6] = [&["A"], &["A"], &["B"], &["A", "C"], &["B", "A"], &["D", "A"]];
    let ids: Vec<NodeId> = labels
        .iter()
        .map(|labels| graph.create_node(labels, PropertyMap::new()))
        .collect();
    for w in ids.windows(2) {
        graph.create_relationship(w[0], w[1], "NEXT").unwrap();
    }
    (graph, ids)
}

#[test]
fn test_label_sequence_not_beginning_at_start() {
    let (graph, ids) = chain();

    let config = PathConfig::from_json(json!({ "labelFilter": "A,B", "beginSequenceAtStart": false })).unwrap();
    let nodes: Vec<NodeId> = subgraph_nodes(&graph, &[ids[0]], &config).unwrap().into_iter().flatten().collect();
    assert_eq!(nodes, ids);
}

#[test]
fn test_label_sequence_beginning_at_start_filters_first_hop() {
    let (graph, ids) = chain();

    // start is exempt, but `a` is matched against position 1 (`B`)
    let config = PathConfig::from_json(json!({ "labelFilter": "A,B" })).unwrap();
    let nodes = subgraph_nodes(&graph, &[ids[0]], &config).unwrap();
    assert_eq!(nodes, vec![Some(ids[0])]);
}

#[test]
fn test_end_node_sequence_with_limit() {
    let (graph, ids) = chain();

    let config = PathConfig::from_json(json!({ "labelFilter": ">A|C,B", "beginSequenceAtStart": false })).unwrap();
    let all: Vec<NodeId> = expand_config(&graph, &[ids[0]], &config).unwrap().iter().flatten().map(Path::end).collect();
    assert_eq!(all, vec![ids[1], ids[3], ids[5]]);

    let limited = PathConfig { limit: 2, ..config };
    let ends: Vec<NodeId> = expand_config(&graph, &[ids[0]], &limited).unwrap().iter().flatten().map(Path::end).collect();
    assert_eq!(ends, vec![ids[1], ids[3]]);
}

#[test]
fn test_relationship_filter_applies_below_min_level() {
    let graph = MemoryGraph::new();
    let [a, b, c] = [(); 3].map(|_| graph.create_node(&["Step"], PropertyMap::new()));
    graph.create_relationship(a, b, "X").unwrap();
    graph.create_relationship(b, c, "Y").unwrap();

    let config = PathConfig::from_json(json!({ "relationshipFilter": "Y", "minLevel": 2 })).unwrap();
    assert!(expand_config(&graph, &[a], &config).unwrap().is_empty());

    let config = PathConfig::from_json(json!({ "relationshipFilter": "X|Y", "minLevel": 2 })).unwrap();
    let ends: Vec<NodeId> = expand_config(&graph, &[a], &config).unwrap().iter().flatten().map(Path::end).collect();
    assert_eq!(ends, vec![c]);
}

// ============================================================================
// 7. Cancellation and concurrency
// ============================================================================

#[test]
fn test_cancelled_host_returns_partial_result_not_error() {
    let m = movies();
    let token = CancellationToken::new();
    token.cancel();
    let guarded = CancellableGraph::new(&m.graph, token);

    let paths = expand_config(&guarded, &[m.keanu], &PathConfig::default()).unwrap();
    assert!(paths.is_empty());
}

#[test]
fn test_concurrent_traversals_share_one_graph() {
    let m = movies();
    let config = PathConfig::from_json(json!({ "relationshipFilter": MOVIE_RELS, "maxLevel": 3 })).unwrap();
    let expected = expand_config(&m.graph, &[m.keanu], &config).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| expand_config(&m.graph, &[m.keanu], &config).unwrap()))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
