use assert_matches::assert_matches;
use vote_anchor_costs::OperationCost;
use vote_anchor_merkle::{MerkleError, VoteMerkleTree, hash_vote};

use super::*;

fn votes(count: usize) -> Vec<VoteRecord> {
    (0..count)
        .map(|i| {
            let choice = ["for", "against", "abstain"][i % 3];
            VoteRecord::new(format!("sh-{i:04}"), "res-1", choice, format!("17000000{i:02}"))
        })
        .collect()
}

fn sorted_tree(records: &[VoteRecord]) -> VoteMerkleTree {
    let mut leaves: Vec<Digest> = records
        .iter()
        .map(|vote| vote.digest(HashAlgorithm::Sha256))
        .collect();
    leaves.sort();
    VoteMerkleTree::build(leaves)
}

// ── VoteRecord ──────────────────────────────────────────────────────

#[test]
fn test_vote_digest_matches_leaf_hasher() {
    let vote = VoteRecord::new("alice", "res-9", "for", "2024-01-01T00:00:00Z");
    assert_eq!(
        vote.digest(HashAlgorithm::Sha256),
        hash_vote("alice", "res-9", "for", "2024-01-01T00:00:00Z")
    );
    assert_ne!(
        vote.digest(HashAlgorithm::Sha256),
        vote.digest(HashAlgorithm::Blake3)
    );
}

#[test]
fn test_vote_digest_cost_counts_preimage_bytes() {
    let vote = VoteRecord::new("alice", "res-1", "for", "2024-01-01T00:00:00Z");
    let ctx = vote.digest_with_cost(HashAlgorithm::Sha256);
    assert_eq!(ctx.value, vote.digest(HashAlgorithm::Sha256));
    assert_eq!(ctx.cost.hash_leaf_calls, 1);
    assert_eq!(ctx.cost.hash_node_calls, 0);
    assert_eq!(ctx.cost.hash_byte_calls, 36);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_defaults() {
    let config = AnchorConfig::default();
    assert_eq!(config.algorithm, HashAlgorithm::Sha256);
    assert_eq!(config.leaf_order, LeafOrder::SortedByDigest);
    assert!(!config.verify_on_load);
    assert_eq!(AnchorConfig::from_json_str("{}").unwrap(), config);
}

#[test]
fn test_config_from_json() {
    let config = AnchorConfig::from_json_str(
        r#"{ "algorithm": "blake3", "leaf_order": "insertion", "verify_on_load": true }"#,
    )
    .unwrap();
    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    assert_eq!(config.leaf_order, LeafOrder::Insertion);
    assert!(config.verify_on_load);
}

#[test]
fn test_config_rejects_unknown_fields_and_values() {
    assert_matches!(
        AnchorConfig::from_json_str(r#"{ "delimiter": "|" }"#),
        Err(AnchorError::InvalidConfig(_))
    );
    assert_matches!(
        AnchorConfig::from_json_str(r#"{ "algorithm": "md5" }"#),
        Err(AnchorError::InvalidConfig(_))
    );
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("anchor.json");
    std::fs::write(&path, r#"{ "leaf_order": "insertion" }"#).unwrap();
    let config = AnchorConfig::from_json_file(&path).unwrap();
    assert_eq!(config.leaf_order, LeafOrder::Insertion);
    assert_eq!(config.algorithm, HashAlgorithm::Sha256);

    assert_matches!(
        AnchorConfig::from_json_file(dir.path().join("missing.json")),
        Err(AnchorError::InvalidConfig(msg)) if msg.contains("missing.json")
    );
}

// ── Anchor ──────────────────────────────────────────────────────────

#[test]
fn test_anchor_from_tree_keeps_root_and_layers() {
    let tree = sorted_tree(&votes(7));
    let anchor = Anchor::from_tree("agm-2024", tree.clone(), LeafOrder::SortedByDigest, 42);
    assert_eq!(&anchor.root, tree.root());
    assert_eq!(anchor.leaf_count, 7);
    assert_eq!(anchor.layers, tree.layers());
    assert_eq!(anchor.tree().unwrap(), tree);
    assert!(anchor.transaction_id.starts_with("0x"));
    assert_eq!(anchor.transaction_id.len(), 66);
    assert_eq!(
        anchor.transaction_id,
        Anchor::simulated_transaction_id(HashAlgorithm::Sha256, "agm-2024", tree.root(), 42)
    );
}

#[test]
fn test_transaction_id_depends_on_session_and_time() {
    let root = Digest::from("root");
    let a = Anchor::simulated_transaction_id(HashAlgorithm::Sha256, "s1", &root, 1);
    assert_ne!(a, Anchor::simulated_transaction_id(HashAlgorithm::Sha256, "s2", &root, 1));
    assert_ne!(a, Anchor::simulated_transaction_id(HashAlgorithm::Sha256, "s1", &root, 2));
}

#[test]
fn test_anchor_proofs_match_tree_proofs() {
    let records = votes(12);
    let tree = sorted_tree(&records);
    let anchor = Anchor::from_tree("s", tree.clone(), LeafOrder::SortedByDigest, 0);
    for i in 0..12 {
        let proof = anchor.proof(i).unwrap();
        assert_eq!(proof, tree.proof(i).unwrap());
        assert!(anchor.verify(&tree.leaves()[i], &proof));
    }
    assert_matches!(
        anchor.proof(12),
        Err(AnchorError::Merkle(MerkleError::IndexOutOfRange {
            index: 12,
            leaf_count: 12
        }))
    );
}

#[test]
fn test_anchor_with_mismatched_root_is_rejected() {
    let tree = sorted_tree(&votes(5));
    let mut anchor = Anchor::from_tree("s", tree, LeafOrder::SortedByDigest, 0);
    anchor.root = Digest::from("forged-root");
    assert_matches!(anchor.tree(), Err(AnchorError::InvalidAnchor(_)));
    assert_matches!(anchor.proof(0), Err(AnchorError::InvalidAnchor(_)));
}

#[test]
fn test_leaf_index_of_sorted_and_insertion() {
    let records = votes(9);
    let sorted = Anchor::from_tree("s", sorted_tree(&records), LeafOrder::SortedByDigest, 0);
    for leaf in sorted.leaves() {
        let index = sorted.leaf_index_of(leaf).unwrap();
        assert_eq!(&sorted.leaves()[index], leaf);
    }
    assert_eq!(sorted.leaf_index_of(&Digest::from("zz")), None);
    assert_eq!(sorted.leaf_index_of(&Digest::from("00")), None);

    let insertion_leaves: Vec<Digest> = records
        .iter()
        .map(|vote| vote.digest(HashAlgorithm::Sha256))
        .collect();
    let insertion = Anchor::from_tree(
        "s",
        VoteMerkleTree::build(insertion_leaves.clone()),
        LeafOrder::Insertion,
        0,
    );
    assert_eq!(insertion.leaf_index_of(&insertion_leaves[4]), Some(4));
}

#[test]
fn test_empty_anchor() {
    let anchor = Anchor::from_tree(
        "empty",
        VoteMerkleTree::build(Vec::new()),
        LeafOrder::SortedByDigest,
        0,
    );
    assert_eq!(anchor.leaf_count, 0);
    assert_eq!(anchor.root, HashAlgorithm::Sha256.empty_digest());
    assert!(anchor.leaves().is_empty());
    assert_eq!(anchor.leaf_index_of(&anchor.root), None);
    assert_matches!(
        anchor.proof(0),
        Err(AnchorError::Merkle(MerkleError::IndexOutOfRange { .. }))
    );
    let decoded = Anchor::decode_from_slice(&anchor.encode_to_vec().unwrap()).unwrap();
    assert_eq!(decoded, anchor);
}

#[test]
fn test_anchor_encoding_roundtrip_and_leaf_count_check() {
    let anchor = Anchor::from_tree("s", sorted_tree(&votes(6)), LeafOrder::SortedByDigest, 99);
    let decoded = Anchor::decode_from_slice(&anchor.encode_to_vec().unwrap()).unwrap();
    assert_eq!(decoded, anchor);

    let mut inconsistent = anchor;
    inconsistent.leaf_count = 5;
    let bytes = inconsistent.encode_to_vec().unwrap();
    assert_matches!(
        Anchor::decode_from_slice(&bytes),
        Err(AnchorError::Merkle(MerkleError::InvalidData(_)))
    );
    assert_matches!(
        Anchor::decode_from_slice(&[0xff, 0x01]),
        Err(AnchorError::InvalidAnchor(_))
    );
}

#[test]
fn test_anchor_decode_rejects_trailing_bytes() {
    let anchor = Anchor::from_tree("s", sorted_tree(&votes(3)), LeafOrder::SortedByDigest, 1);
    let mut bytes = anchor.encode_to_vec().unwrap();
    bytes.push(0);
    assert_matches!(
        Anchor::decode_from_slice(&bytes),
        Err(AnchorError::InvalidAnchor(msg)) if msg.contains("trailing")
    );
}

#[test]
fn test_anchor_with_unindexable_leaf_count_is_rejected() {
    let mut anchor = Anchor::from_tree("s", sorted_tree(&votes(4)), LeafOrder::SortedByDigest, 0);
    anchor.leaf_count = u64::MAX;
    assert!(anchor.tree().is_err());
    assert!(anchor.validate().value.is_err());
    if usize::BITS < 64 {
        assert_matches!(anchor.leaf_count(), Err(AnchorError::InvalidAnchor(_)));
    } else {
        assert_eq!(anchor.leaf_count().unwrap(), usize::MAX);
    }
}

#[test]
fn test_anchor_validate_reports_merge_cost() {
    let tree = sorted_tree(&votes(7));
    let anchor = Anchor::from_tree("s", tree.clone(), LeafOrder::SortedByDigest, 0);
    let checked = anchor.validate();
    assert!(checked.value.is_ok());
    assert_eq!(checked.cost.hash_node_calls, 6);
    assert_eq!(checked.cost.hash_byte_calls, 6 * 128);

    let mut forged = anchor;
    forged.layers[0][0] = Digest::from("forged");
    let checked = forged.validate();
    assert_matches!(checked.value, Err(AnchorError::Merkle(MerkleError::InvalidData(_))));
    assert_eq!(checked.cost.hash_node_calls, 1);

    let mut rootless = Anchor::from_tree("s", tree, LeafOrder::SortedByDigest, 0);
    rootless.root = Digest::from("forged-root");
    let checked = rootless.validate();
    assert_matches!(checked.value, Err(AnchorError::InvalidAnchor(_)));
    assert_eq!(checked.cost, OperationCost::default());
}

// ── Store ───────────────────────────────────────────────────────────

#[test]
fn test_mem_store_replace_and_remove() {
    let store = MemAnchorStore::new();
    assert!(store.is_empty().unwrap());
    assert_eq!(store.load("s").unwrap(), None);

    let first = Anchor::from_tree("s", sorted_tree(&votes(3)), LeafOrder::SortedByDigest, 1);
    let second = Anchor::from_tree("s", sorted_tree(&votes(4)), LeafOrder::SortedByDigest, 2);

    assert_eq!(store.replace(first.clone()).unwrap(), None);
    assert_eq!(store.replace(second.clone()).unwrap(), Some(first));
    assert_eq!(store.len().unwrap(), 1);
    assert_eq!(store.load("s").unwrap(), Some(second.clone()));
    assert_eq!(store.session_ids().unwrap(), vec!["s".to_owned()]);

    assert_eq!(store.remove("s").unwrap(), Some(second));
    assert_eq!(store.remove("s").unwrap(), None);
    assert!(store.is_empty().unwrap());
}

// ── Audit ───────────────────────────────────────────────────────────

#[test]
fn test_audit_vote_uses_own_copy_of_vote() {
    let records = votes(10);
    let tree = sorted_tree(&records);
    let vote = &records[3];
    let index = tree.position_of(&vote.digest(HashAlgorithm::Sha256)).unwrap();
    let proof = tree.proof(index).unwrap();

    assert!(audit_vote(HashAlgorithm::Sha256, tree.root(), vote, &proof));

    let mut altered = vote.clone();
    altered.vote_value = "against".into();
    assert!(!audit_vote(HashAlgorithm::Sha256, tree.root(), &altered, &proof));
    assert!(!audit_vote(HashAlgorithm::Blake3, tree.root(), vote, &proof));
}
