//! Anchoring closed voting sessions and serving proofs from their anchors.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};
use vote_anchor_costs::{CostResult, CostsExt, OperationCost, cost_return_on_error};
use vote_anchor_merkle::{Digest, InclusionProof, VoteMerkleTree};

use crate::{Anchor, AnchorConfig, AnchorError, AnchorStore, LeafOrder, VoteRecord, audit_vote};

/// Outcome of anchoring one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorReceipt {
    /// The anchor as persisted.
    pub anchor: Anchor,
    /// `positions[i]` is the leaf index of the `i`-th vote handed in.
    pub positions: Vec<usize>,
    /// Whether an earlier anchor of the same session was overwritten.
    pub replaced: bool,
    /// Hash work spent on leaves and tree.
    pub cost: OperationCost,
}

/// Builds anchors for closed sessions and answers proof requests.
pub struct SessionAnchorer<S> {
    config: AnchorConfig,
    store: S,
}

impl<S: AnchorStore> SessionAnchorer<S> {
    /// Anchorer writing to `store`.
    pub fn new(config: AnchorConfig, store: S) -> Self {
        SessionAnchorer { config, store }
    }

    /// Active configuration.
    pub fn config(&self) -> &AnchorConfig {
        &self.config
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Anchor every vote of a closed session, stamped with the current time.
    ///
    /// All votes must be collected before calling; a vote arriving later
    /// requires anchoring the session again.
    pub fn anchor_session(
        &self,
        session_id: &str,
        votes: &[VoteRecord],
    ) -> Result<AnchorReceipt, AnchorError> {
        self.anchor_session_at(session_id, votes, now_millis())
    }

    /// Anchor every vote of a closed session with an explicit timestamp.
    pub fn anchor_session_at(
        &self,
        session_id: &str,
        votes: &[VoteRecord],
        created_at: u64,
    ) -> Result<AnchorReceipt, AnchorError> {
        let algorithm = self.config.algorithm;
        let mut leaf_cost = OperationCost::default();
        let digests: Vec<Digest> = votes
            .iter()
            .map(|vote| vote.digest_with_cost(algorithm).unwrap_add_cost(&mut leaf_cost))
            .collect();
        let mut receipt = self.anchor_digests_at(session_id, digests, created_at)?;
        receipt.cost += leaf_cost;
        Ok(receipt)
    }

    /// Anchor digests the caller already computed.
    pub fn anchor_digests_at(
        &self,
        session_id: &str,
        digests: Vec<Digest>,
        created_at: u64,
    ) -> Result<AnchorReceipt, AnchorError> {
        let mut order: Vec<usize> = (0..digests.len()).collect();
        if self.config.leaf_order == LeafOrder::SortedByDigest {
            // Stable, so identical votes keep their relative order.
            order.sort_by(|a, b| digests[*a].cmp(&digests[*b]));
        }

        let mut positions = vec![0; digests.len()];
        for (leaf_index, &vote_index) in order.iter().enumerate() {
            positions[vote_index] = leaf_index;
        }
        let leaves: Vec<Digest> = order.iter().map(|&i| digests[i].clone()).collect();

        let built = VoteMerkleTree::build_with(self.config.algorithm, leaves);
        let cost = built.cost;
        let anchor = Anchor::from_tree(session_id, built.value, self.config.leaf_order, created_at);

        let previous = self.store.replace(anchor.clone())?;
        if let Some(previous) = &previous {
            warn!(
                session_id,
                previous_root = %previous.root,
                previous_leaf_count = previous.leaf_count,
                "replaced existing session anchor"
            );
        }
        info!(
            session_id,
            root = %anchor.root,
            leaf_count = anchor.leaf_count,
            transaction_id = %anchor.transaction_id,
            "anchored voting session"
        );

        Ok(AnchorReceipt {
            anchor,
            positions,
            replaced: previous.is_some(),
            cost,
        })
    }

    /// The stored anchor of `session_id`.
    pub fn anchor(&self, session_id: &str) -> Result<Anchor, AnchorError> {
        self.store
            .load(session_id)?
            .ok_or_else(|| AnchorError::SessionNotFound(session_id.to_owned()))
    }

    /// Inclusion proof for the vote at `leaf_index` of `session_id`.
    pub fn prove(&self, session_id: &str, leaf_index: usize) -> Result<InclusionProof, AnchorError> {
        let anchor = self.checked_anchor(session_id).value?;
        let proof = anchor.proof(leaf_index)?;
        debug!(session_id, leaf_index, steps = proof.steps.len(), "served inclusion proof");
        Ok(proof)
    }

    /// Locate `vote` in the anchor of `session_id` and prove it.
    pub fn prove_vote(
        &self,
        session_id: &str,
        vote: &VoteRecord,
    ) -> Result<(usize, InclusionProof), AnchorError> {
        let anchor = self.checked_anchor(session_id).value?;
        let digest = vote.digest(anchor.algorithm);
        let leaf_index =
            anchor
                .leaf_index_of(&digest)
                .ok_or_else(|| AnchorError::VoteNotAnchored {
                    session_id: session_id.to_owned(),
                    digest,
                })?;
        let proof = anchor.proof(leaf_index)?;
        debug!(session_id, leaf_index, "served inclusion proof for vote");
        Ok((leaf_index, proof))
    }

    /// Check `proof` for `vote` against the stored root of `session_id`.
    pub fn verify_vote(
        &self,
        session_id: &str,
        vote: &VoteRecord,
        proof: &InclusionProof,
    ) -> Result<bool, AnchorError> {
        let anchor = self.anchor(session_id)?;
        Ok(audit_vote(anchor.algorithm, &anchor.root, vote, proof))
    }

    /// Load the anchor of `session_id`, recomputing its digests when
    /// `verify_on_load` is set.
    pub fn checked_anchor(&self, session_id: &str) -> CostResult<Anchor, AnchorError> {
        let mut cost = OperationCost::default();
        let anchor = match self.anchor(session_id) {
            Ok(anchor) => anchor,
            Err(e) => return Err(e).wrap_with_cost(cost),
        };
        if self.config.verify_on_load {
            cost_return_on_error!(&mut cost, anchor.validate());
            debug!(
                session_id,
                hash_node_calls = cost.hash_node_calls,
                hash_byte_calls = cost.hash_byte_calls,
                "validated stored anchor"
            );
        }
        Ok(anchor).wrap_with_cost(cost)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}
