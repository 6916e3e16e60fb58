use {
    std::{
        sync::atomic::{AtomicBool, Ordering},
        thread,
    },
    vnring::{HashRing, RingError, Xxh3Partitioner},
};

const VNODES: u32 = 64;

#[test]
fn readers_never_observe_partial_membership() {
    let ring = HashRing::with_partitioner(Xxh3Partitioner::new(), VNODES);
    ring.add(0u64).unwrap();
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let mut key = 0u64;
                while !done.load(Ordering::Relaxed) {
                    let len = ring.len();
                    assert_eq!(len % VNODES as usize, 0, "partial node observed");

                    let tokens = ring.tokens();
                    assert_eq!(tokens.len() % VNODES as usize, 0);
                    assert!(tokens.windows(2).all(|w| w[0] < w[1]));

                    // Node 0 is never removed, so lookups always succeed.
                    assert!(ring.assign(&key).is_ok());
                    key += 1;
                }
            });
        }

        s.spawn(|| {
            for round in 0..200u64 {
                for id in 1..=5 {
                    ring.add(round * 10 + id).unwrap();
                }
                for id in 1..=5 {
                    ring.remove(&(round * 10 + id)).unwrap();
                }
            }
            done.store(true, Ordering::Relaxed);
        });
    });

    assert_eq!(ring.nodes(), vec![0]);
    assert_eq!(ring.len(), VNODES as usize);
}

#[test]
fn concurrent_writers_agree_on_membership() {
    let ring = HashRing::new();

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for id in 0..50u64 {
                    match ring.add(id) {
                        Ok(()) | Err(RingError::DuplicateNode(_)) => {}
                        Err(err) => panic!("unexpected error: {err}"),
                    }
                }
            });
        }
    });

    assert_eq!(ring.node_count(), 50);
    assert_eq!(ring.nodes(), (0..50).collect::<Vec<_>>());
    assert_eq!(ring.len(), 50 * ring.virtual_node_count() as usize);
}
