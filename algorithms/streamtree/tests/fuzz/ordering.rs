use bolero::check;
use streamtree::{oneshot, BytesCodec};

#[test]
fn fuzz_root_commits_to_leaf_order() {
    check!()
        .with_type::<(Vec<u8>, Vec<u8>, Vec<Vec<u8>>)>()
        .for_each(|(a, b, rest)| {
            if a == b {
                return;
            }

            // Same multiset, two orders: swapping any two distinct leaves
            // must move the root.
            let mut forward = vec![a.clone(), b.clone()];
            forward.extend(rest.iter().cloned());
            let mut swapped = vec![b.clone(), a.clone()];
            swapped.extend(rest.iter().cloned());

            let root_forward = oneshot::block_root(&BytesCodec, &forward).unwrap();
            let root_swapped = oneshot::block_root(&BytesCodec, &swapped).unwrap();

            assert_ne!(
                root_forward, root_swapped,
                "root failed to commit to the order of distinct leaves"
            );
        });
}
