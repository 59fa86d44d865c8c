//! Integration tests exercising the full submission pipeline:
//! registration → masking → quorum consensus → gossip → TA scoring.
//!
//! These tests wire together components that are normally only connected
//! inside `node.rs`, verifying the system works end-to-end — not just
//! in isolation.

use std::sync::Arc;

use ivs_consensus::{SubmissionOutcome, Validator};
use ivs_crypto::{keypair_from_seed, sign_payload};
use ivs_masking::{mask, seal_record};
use ivs_messages::{
    edge_signing_payload, status_signing_payload, ContactEdge, StatusUpdate, Submission,
    SubmissionEnvelope,
};
use ivs_node::{NodeConfig, NodeHandle, TrustAuthority, ValidatorNode};
use ivs_registry::IdentityRegistry;
use ivs_store::MemoryStore;
use ivs_types::{
    KeyPair, MaskedVector, NoiseRecord, ParticipantId, PolicyParams, RiskTier, StatusVector,
    Timestamp,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn participant_keys(seed: u8) -> KeyPair {
    keypair_from_seed(&[seed; 32])
}

fn init_test_tracing() {
    ivs_utils::init_tracing(ivs_utils::LogFormat::Human, "warn");
}

fn id(s: &str) -> ParticipantId {
    ParticipantId::from(s)
}

fn authority_with(participants: &[(&str, u8)]) -> TrustAuthority {
    let mut authority = TrustAuthority::generate(id("TA"), PolicyParams::ivs_defaults());
    for (name, seed) in participants {
        authority
            .register_participant(id(name), participant_keys(*seed).public, Timestamp::now())
            .unwrap();
    }
    authority
}

fn signed_edge(a: &str, seed_a: u8, b: &str, seed_b: u8) -> ContactEdge {
    let ts = Timestamp::now();
    let (ida, idb) = (id(a), id(b));
    let payload = edge_signing_payload(&ida, &idb, ts);
    ContactEdge {
        a: ida,
        b: idb,
        timestamp: ts,
        signature_a: sign_payload(&payload, &participant_keys(seed_a).private),
        signature_b: sign_payload(&payload, &participant_keys(seed_b).private),
    }
}

fn edge_envelope(edge: ContactEdge, sequence: u64) -> SubmissionEnvelope {
    SubmissionEnvelope {
        submitter: edge.a.clone(),
        sequence,
        payload: Submission::Edge(edge),
    }
}

fn status_envelope(owner: &str, seed: u8, masked: MaskedVector, sequence: u64) -> SubmissionEnvelope {
    let ts = Timestamp::now();
    let owner_id = id(owner);
    let payload = status_signing_payload(&owner_id, &masked, ts);
    SubmissionEnvelope {
        submitter: owner_id.clone(),
        sequence,
        payload: Submission::Status(StatusUpdate {
            owner: owner_id,
            masked,
            timestamp: ts,
            signature: sign_payload(&payload, &participant_keys(seed).private),
        }),
    }
}

type RunningNode = JoinHandle<ValidatorNode<MemoryStore>>;

/// Spawn a cluster of initialized validators fully meshed over channels.
/// Each validator gets its own registry view.
fn spawn_cluster_with_registries(
    authority: &TrustAuthority,
    registries: Vec<IdentityRegistry>,
) -> (Vec<NodeHandle>, Vec<RunningNode>) {
    let (snapshot, signature) = authority.bootstrap_snapshot(Timestamp::now());

    let mut inboxes = Vec::new();
    let mut handles = Vec::new();
    for _ in 0..registries.len() {
        let (handle, inbox) = NodeHandle::channel(64);
        handles.push(handle);
        inboxes.push(inbox);
    }

    let mut joins = Vec::new();
    for (i, (registry, inbox)) in registries.into_iter().zip(inboxes).enumerate() {
        let label = format!("v{i}");
        let mut validator = Validator::new(
            label.clone(),
            registry,
            PolicyParams::ivs_defaults(),
            authority.public_key().clone(),
        );
        validator.initialize(&snapshot, &signature).unwrap();

        let mut node = ValidatorNode::new(
            validator,
            Arc::new(MemoryStore::new()),
            NodeConfig::with_label(label),
            inbox,
        );
        let peers: Vec<NodeHandle> = handles
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, h)| h.clone())
            .collect();
        node.connect_peers(peers).unwrap();

        joins.push(tokio::spawn(node.run()));
    }

    (handles, joins)
}

fn spawn_cluster(authority: &TrustAuthority, n: usize) -> (Vec<NodeHandle>, Vec<RunningNode>) {
    let registries = (0..n).map(|_| authority.registry().clone()).collect();
    spawn_cluster_with_registries(authority, registries)
}

async fn shutdown_and_join(
    handles: Vec<NodeHandle>,
    joins: Vec<RunningNode>,
) -> Vec<ValidatorNode<MemoryStore>> {
    for handle in &handles {
        handle.shutdown().await;
    }
    drop(handles);
    let mut nodes = Vec::new();
    for join in joins {
        nodes.push(join.await.expect("node task panicked"));
    }
    nodes
}

// ---------------------------------------------------------------------------
// 1. Quorum commit and gossip across a three-validator cluster
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edge_commits_across_three_validators() {
    init_test_tracing();
    let authority = authority_with(&[("alice", 1), ("bob", 2)]);
    let (handles, joins) = spawn_cluster(&authority, 3);

    let outcome = handles[0]
        .submit(edge_envelope(signed_edge("alice", 1, "bob", 2), 0))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SubmissionOutcome::Committed {
            votes: 3,
            required: 2
        }
    );

    let nodes = shutdown_and_join(handles, joins).await;
    for node in &nodes {
        assert_eq!(node.validator().graph().edge_count(), 1);
    }
    assert_eq!(nodes[0].stats().edges_committed.get(), 1);
    assert_eq!(nodes[1].stats().gossip_commits.get(), 1);
    assert_eq!(nodes[2].stats().gossip_commits.get(), 1);
}

// ---------------------------------------------------------------------------
// 2. Full pipeline: contact chain, masked status, TA scoring
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_pipeline_scores_target_through_contact_chain() {
    let mut authority = authority_with(&[("alice", 1), ("bob", 2), ("carol", 3)]);
    let (handles, joins) = spawn_cluster(&authority, 3);

    // alice–bob, bob–carol
    let outcome = handles[0]
        .submit(edge_envelope(signed_edge("alice", 1, "bob", 2), 0))
        .await
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Committed { .. }));

    let outcome = handles[1]
        .submit(edge_envelope(signed_edge("bob", 2, "carol", 3), 0))
        .await
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Committed { .. }));

    // bob is positive in category 0, masked with the no-op factor 1.0 so
    // the expected score is exact.
    let factors = vec![1.0, 0.001, 0.002, 0.003, 0.004];
    let masked = MaskedVector(factors.clone());
    let record = NoiseRecord {
        owner: id("bob"),
        factors,
    };
    let blob = seal_record(&record, authority.public_key()).unwrap();
    authority.ingest_sealed_record(&blob).unwrap();

    let outcome = handles[1]
        .submit(status_envelope("bob", 2, masked, 1))
        .await
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Committed { .. }));

    let nodes = shutdown_and_join(handles, joins).await;

    // Score alice from the first validator's committed store: base 5 plus
    // bob's direct-contact contribution of exactly 1.
    let report = authority
        .score_from_store(&id("alice"), nodes[0].store().as_ref())
        .unwrap();
    assert!((report.corrected.0[0] - 6.0).abs() < 1e-9);
    for category in 1..5 {
        assert!((report.corrected.0[category] - 5.0).abs() < 1e-9);
    }
    assert_eq!(report.classification.overall, RiskTier::Safe);

    // Every replica converged on the same graph.
    for node in &nodes {
        assert_eq!(node.validator().graph().edge_count(), 2);
    }
}

#[tokio::test]
async fn randomly_masked_status_cancels_exactly() {
    let mut authority = authority_with(&[("alice", 1), ("bob", 2)]);
    let (handles, joins) = spawn_cluster(&authority, 3);

    let outcome = handles[0]
        .submit(edge_envelope(signed_edge("alice", 1, "bob", 2), 0))
        .await
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Committed { .. }));

    // bob's device senses a positive in category 2, masks it with real
    // random noise, and seals the record for the TA.
    let status = StatusVector(vec![false, false, true, false, false]);
    let mut rng = StdRng::seed_from_u64(0xB0B);
    let (masked, record) = mask(&id("bob"), &status, &mut rng);
    let blob = seal_record(&record, authority.public_key()).unwrap();
    authority.ingest_sealed_record(&blob).unwrap();

    let outcome = handles[1]
        .submit(status_envelope("bob", 2, masked, 0))
        .await
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Committed { .. }));

    let nodes = shutdown_and_join(handles, joins).await;
    let report = authority
        .score_from_store(&id("alice"), nodes[0].store().as_ref())
        .unwrap();

    // Whatever factor the rng drew, cancellation recovers the exact
    // unmasked contribution: base 5 plus 1/severity[2]^0 = 1.
    assert!((report.corrected.0[2] - 6.0).abs() < 1e-9);
    for category in [0usize, 1, 3, 4] {
        assert!((report.corrected.0[category] - 5.0).abs() < 1e-9);
    }
}

// ---------------------------------------------------------------------------
// 3. Identity failures are local rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unregistered_submitter_rejected_by_every_validator() {
    let authority = authority_with(&[("alice", 1)]);
    let (handles, joins) = spawn_cluster(&authority, 3);

    for handle in &handles {
        let outcome = handle
            .submit(edge_envelope(signed_edge("ghost", 9, "alice", 1), 0))
            .await
            .unwrap();
        assert!(matches!(outcome, SubmissionOutcome::Rejected(_)));
    }

    let nodes = shutdown_and_join(handles, joins).await;
    for node in &nodes {
        assert_eq!(node.validator().graph().edge_count(), 0);
        assert_eq!(node.stats().local_rejections.get(), 1);
        assert_eq!(node.stats().edges_committed.get(), 0);
    }
}

// ---------------------------------------------------------------------------
// 4. Divergent registry views fail quorum
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quorum_failure_drops_submission_without_side_effects() {
    let authority = authority_with(&[("alice", 1), ("bob", 2)]);

    // Only the first validator knows alice and bob; its peers reject the
    // signatures, so the poll resolves 1 of 3.
    let params = PolicyParams::ivs_defaults();
    let registries = vec![
        authority.registry().clone(),
        IdentityRegistry::new(id("TA"), params.staleness_window_secs),
        IdentityRegistry::new(id("TA"), params.staleness_window_secs),
    ];
    let (handles, joins) = spawn_cluster_with_registries(&authority, registries);

    let outcome = handles[0]
        .submit(edge_envelope(signed_edge("alice", 1, "bob", 2), 0))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SubmissionOutcome::QuorumNotReached {
            votes: 1,
            required: 2
        }
    );

    let nodes = shutdown_and_join(handles, joins).await;
    for node in &nodes {
        assert_eq!(node.validator().graph().edge_count(), 0);
    }
    assert_eq!(nodes[0].stats().quorum_failures.get(), 1);
}

// ---------------------------------------------------------------------------
// 5. Per-submitter causal ordering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn out_of_order_submissions_apply_in_issued_order() {
    let authority = authority_with(&[("alice", 1), ("bob", 2)]);
    let (handles, joins) = spawn_cluster(&authority, 3);

    // alice's status (sequence 1) arrives before her edge (sequence 0);
    // the node parks it until the gap fills.
    let masked = MaskedVector(vec![0.99, 0.001, 0.001, 0.001, 0.001]);
    handles[0]
        .submit_detached(status_envelope("alice", 1, masked, 1))
        .await
        .unwrap();

    let outcome = handles[0]
        .submit(edge_envelope(signed_edge("alice", 1, "bob", 2), 0))
        .await
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Committed { .. }));

    let nodes = shutdown_and_join(handles, joins).await;

    // Both submissions committed, in order, on the submitting node.
    assert_eq!(nodes[0].stats().edges_committed.get(), 1);
    assert_eq!(nodes[0].stats().statuses_committed.get(), 1);
    let graph = nodes[0].validator().graph();
    let alice_idx = graph.index_of(&id("alice")).unwrap();
    assert!(graph.masked_of(alice_idx).is_some());
}

// ---------------------------------------------------------------------------
// 6. Degenerate cluster sizes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_validator_commits_alone() {
    let authority = authority_with(&[("alice", 1), ("bob", 2)]);
    let (handles, joins) = spawn_cluster(&authority, 1);

    let outcome = handles[0]
        .submit(edge_envelope(signed_edge("alice", 1, "bob", 2), 0))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Committed {
            votes: 1,
            required: 1
        }
    );

    let nodes = shutdown_and_join(handles, joins).await;
    assert_eq!(nodes[0].validator().graph().edge_count(), 1);
}

#[tokio::test]
async fn uninitialized_validator_rejects_submissions() {
    let authority = authority_with(&[("alice", 1), ("bob", 2)]);

    // No seed snapshot: the validator never leaves Uninitialized.
    let validator = Validator::new(
        "cold",
        authority.registry().clone(),
        PolicyParams::ivs_defaults(),
        authority.public_key().clone(),
    );
    let (handle, inbox) = NodeHandle::channel(8);
    let node = ValidatorNode::new(
        validator,
        Arc::new(MemoryStore::new()),
        NodeConfig::with_label("cold"),
        inbox,
    );
    let join = tokio::spawn(node.run());

    let outcome = handle
        .submit(edge_envelope(signed_edge("alice", 1, "bob", 2), 0))
        .await
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Rejected(_)));

    handle.shutdown().await;
    drop(handle);
    let node = join.await.unwrap();
    assert_eq!(node.validator().graph().edge_count(), 0);
}
