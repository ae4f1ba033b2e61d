#![no_main]

use collabnet_core::EdgeList;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing must never panic; anything it accepts must survive a rewrite.
    let Ok(list) = EdgeList::read_csv(data, false) else {
        return;
    };
    // Totals that overflowed to infinity cannot be written back as valid weights.
    if list.iter().any(|(_, _, agg)| !agg.weight.is_finite()) {
        return;
    }
    let mut buf = Vec::new();
    if list.write_csv(&mut buf).is_err() {
        return;
    }
    let reparsed = EdgeList::read_csv(buf.as_slice(), true).expect("rewritten CSV must parse");
    assert_eq!(reparsed.content_hash(), list.content_hash());
});
