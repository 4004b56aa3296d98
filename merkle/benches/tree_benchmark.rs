use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use vote_anchor_merkle::{Digest, VoteMerkleTree, hash_vote, verify_inclusion};

fn vote_leaves(count: usize) -> Vec<Digest> {
    let mut leaves: Vec<Digest> = (0..count)
        .map(|i| hash_vote(&format!("voter-{i}"), "resolution-1", "for", "1700000000"))
        .collect();
    leaves.sort();
    leaves
}

fn bench(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("vote tree build");
        for size in [1_000usize, 10_000, 100_000] {
            let leaves = vote_leaves(size);
            group.bench_with_input(BenchmarkId::new("leaves", size), &leaves, |b, leaves| {
                b.iter(|| VoteMerkleTree::build(black_box(leaves.clone())));
            });
        }
    }

    let leaves = vote_leaves(100_000);
    let tree = VoteMerkleTree::build(leaves.clone());

    c.bench_function("vote tree gen proof", |b| {
        let mut index = 0usize;
        b.iter(|| {
            index = (index + 7919) % leaves.len();
            tree.proof(black_box(index))
        });
    });

    let proof = tree.proof(4242).expect("index is in range");
    c.bench_function("vote tree verify proof", |b| {
        b.iter(|| verify_inclusion(tree.root(), black_box(&leaves[4242]), &proof.steps));
    });
}

criterion_group!(benches, bench);
criterion_main!(benches);
