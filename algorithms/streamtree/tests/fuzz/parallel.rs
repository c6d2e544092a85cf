use std::sync::Arc;

use bolero::check;
use futures::executor::block_on;
use streamtree::{BytesCodec, CallerThread, Digest, Executor, Hasher};

fn root_via(input: &[Vec<u8>], executor: Arc<dyn Executor>) -> Digest {
    let mut hasher = Hasher::new(executor, BytesCodec);
    for leaf in input {
        hasher.add_leaf(leaf.clone()).unwrap();
    }
    block_on(hasher.root_hash()).unwrap()
}

#[cfg(feature = "multithread")]
#[test]
fn fuzz_parallel_consistency() {
    check!().with_type::<Vec<Vec<u8>>>().for_each(|input| {
        // =============================================================================
        // PARALLEL EXECUTION (RAYON)
        // =============================================================================
        let parallel = root_via(input, Arc::new(streamtree::GlobalPool));

        // =============================================================================
        // SEQUENTIAL GROUND TRUTH
        // =============================================================================
        let sequential = root_via(input, Arc::new(CallerThread));

        assert_eq!(
            parallel, sequential,
            "root mismatch (rayon pool vs caller thread)"
        );
    });
}
