#![no_main]

use collabnet_core::{DenseGraph, EdgeList, Graph, GraphData, SparseGraph};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(list) = EdgeList::read_csv(data, false) else {
        return;
    };
    // Keep the dense backend's N² allocation bounded.
    if list.logins().len() > 256 {
        return;
    }
    let sparse = GraphData::<SparseGraph>::from_edge_list(&list).expect("sparse build");
    let dense = GraphData::<DenseGraph>::from_edge_list(&list).expect("dense build");
    assert_eq!(sparse.graph.edge_count(), list.len());
    assert_eq!(dense.graph.edge_count(), list.len());
    assert_eq!(
        sparse.graph.is_connected().expect("connectivity"),
        dense.graph.is_connected().expect("connectivity")
    );
});
