use std::sync::Arc;

use bolero::check;
use futures::executor::block_on;
use streamtree::{oneshot, BytesCodec, CallerThread, Hasher};

#[test]
fn fuzz_streaming_matches_reference() {
    check!().with_type::<Vec<Vec<u8>>>().for_each(|input| {
        // =============================================================================
        // BASELINE (SEQUENTIAL REFERENCE)
        // =============================================================================
        let expected = oneshot::block_root(&BytesCodec, input).unwrap();

        // =============================================================================
        // STREAMING
        // =============================================================================
        let mut hasher = Hasher::new(Arc::new(CallerThread), BytesCodec);
        for leaf in input {
            hasher.add_leaf(leaf.clone()).unwrap();
        }
        let root = block_on(hasher.root_hash()).unwrap();

        assert_eq!(
            root, expected,
            "streaming root diverged from the sequential reference"
        );
    });
}
