//! CSV interchange tests: escaping of hostile identity and tag strings and
//! accumulation semantics across write/read cycles.

use proptest::prelude::*;

use collabnet_core::{EdgeList, GraphData, RawEdge, SparseGraph};

fn arb_login() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_\\-,\" \n]{1,10}".prop_filter("login must not be blank", |s| !s.trim().is_empty())
}

/// Tags drawn from the tag-column separators, the escape character and
/// the CSV metacharacters.
fn arb_tag() -> impl Strategy<Value = String> {
    "[a-z_;:\\\\,\" \n]{1,8}"
}

fn arb_event() -> impl Strategy<Value = RawEdge> {
    (
        arb_login(),
        arb_login(),
        1_u32..50,
        prop::option::of(arb_tag()),
    )
        .prop_map(|(source, target, w, tag)| RawEdge {
            source,
            target,
            weight: f64::from(w) / 2.0,
            tag,
        })
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn written_csv_reads_back_identically(events in prop::collection::vec(arb_event(), 0..30)) {
        let list = EdgeList::from_raw(&events);
        let mut buf = Vec::new();
        list.write_csv(&mut buf).unwrap();

        let back = EdgeList::read_csv(buf.as_slice(), true).unwrap();
        prop_assert_eq!(back.content_hash(), list.content_hash());
        prop_assert_eq!(back, list);
    }

    #[test]
    fn tag_counts_survive_round_trip(tags in prop::collection::vec(arb_tag(), 1..12)) {
        let events: Vec<RawEdge> = tags
            .iter()
            .map(|t| RawEdge::new("a", "b", 1.0, Some(t.as_str())))
            .collect();
        let list = EdgeList::from_raw(&events);
        let mut buf = Vec::new();
        list.write_csv(&mut buf).unwrap();

        let back = EdgeList::read_csv(buf.as_slice(), true).unwrap();
        let expected = &list.get("a", "b").unwrap().tags;
        prop_assert_eq!(&back.get("a", "b").unwrap().tags, expected);
        prop_assert_eq!(
            expected.values().sum::<usize>(),
            tags.iter().filter(|t| !t.trim().is_empty()).count()
        );
    }
}

#[test]
fn reading_twice_accumulates_like_raw_events() {
    let csv = "source,target,weight,count,tags\n\
               alice,bob,3,1,issue_comment:1\n\
               alice,bob,4,1,pr_review:1\n\
               bob,alice,2,2,pr_comment:2\n";
    let list = EdgeList::read_csv(csv.as_bytes(), true).unwrap();

    let direct = EdgeList::from_raw(&[
        RawEdge::new("alice", "bob", 3.0, Some("issue_comment")),
        RawEdge::new("alice", "bob", 4.0, Some("pr_review")),
        RawEdge::new("bob", "alice", 1.0, Some("pr_comment")),
        RawEdge::new("bob", "alice", 1.0, Some("pr_comment")),
    ]);
    assert_eq!(list, direct);
}

#[test]
fn graph_built_from_csv_matches_graph_built_from_events() {
    let events = [
        RawEdge::new("zed", "amy", 5.0, Some("pr_merged")),
        RawEdge::new("amy", "zed", 2.0, Some("pr_comment")),
        RawEdge::new("max", "amy", 3.0, Some("issue_closed")),
    ];
    let list = EdgeList::from_raw(&events);
    let mut buf = Vec::new();
    list.write_csv(&mut buf).unwrap();

    let from_events = GraphData::<SparseGraph>::from_raw_edges(&events).unwrap();
    let reread = EdgeList::read_csv(buf.as_slice(), true).unwrap();
    let from_csv = GraphData::<SparseGraph>::from_edge_list(&reread).unwrap();
    assert_eq!(from_events.graph, from_csv.graph);
    assert_eq!(from_events.identities, from_csv.identities);
}
