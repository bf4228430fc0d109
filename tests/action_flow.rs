//! Integration test for the end-to-end action flow.
//!
//! Exercises the complete lifecycle against a mock hub:
//! 1. Seed signers, username proofs, channels, and casts
//! 2. Run each public pipeline operation
//! 3. Decode the submitted envelopes and check what was actually signed
//! 4. Failure paths: missing signer, unknown reaction target, hub rejection

use std::sync::Arc;

use hubcast::hub::{MockHub, SubmissionOutcome};
use hubcast::hub::traits::RelayClient;
use hubcast::identity::{DelegatedSigner, SecretSeed, SignerState};
use hubcast::message::sign::SignedMessage;
use hubcast::message::{
    AccountId, MessageBody, MessageHash, Network, ReactionKind, TargetReference,
};
use hubcast::pipeline::{ActionError, ActionPipeline};

fn pipeline_for(hub: &MockHub) -> ActionPipeline {
    let hub = Arc::new(hub.clone());
    ActionPipeline::new(
        hub.clone(),
        hub.clone(),
        hub.clone(),
        hub.clone(),
        hub,
        Network::Mainnet,
    )
}

fn seeded_hub() -> MockHub {
    let hub = MockHub::new();
    hub.put_signer(
        "u1",
        DelegatedSigner::new(
            Some(AccountId(1)),
            SignerState::Approved,
            SecretSeed::from_bytes([1u8; 32]),
        ),
    );
    hub.put_name("bob", AccountId(555));
    hub.put_channel("memes", "https://hub.example/channels/memes");
    hub
}

fn decode_last(hub: &MockHub) -> SignedMessage {
    let submitted = hub.submitted();
    SignedMessage::from_bytes(submitted.last().expect("nothing submitted")).unwrap()
}

#[tokio::test]
async fn create_post_end_to_end() {
    let hub = seeded_hub();
    let pipeline = pipeline_for(&hub);

    let hash = pipeline
        .create_post("u1", "hello @bob check /memes", None, None)
        .await
        .unwrap();

    // 0x + 40 hex chars = 20-byte protocol hash.
    assert!(hash.starts_with("0x"));
    assert_eq!(hash.len(), 42);
    assert!(hash[2..].chars().all(|c| c.is_ascii_hexdigit()));

    let signed = decode_last(&hub);
    signed.verify().unwrap();
    assert_eq!(signed.data.account_id, AccountId(1));
    assert_eq!(signed.data.network, Network::Mainnet);
    assert_eq!(signed.hash.to_hex(), hash);

    match signed.data.body {
        MessageBody::CastAdd(cast) => {
            // @bob stripped, /memes left in place but resolved to a channel.
            assert_eq!(cast.text, "hello  check /memes");
            assert_eq!(cast.mentions, vec![AccountId(555)]);
            assert_eq!(cast.mention_positions, vec![6]);
            assert_eq!(
                cast.parent,
                Some(TargetReference::Channel(
                    "https://hub.example/channels/memes".to_string()
                ))
            );
        }
        other => panic!("expected CastAdd, got {other:?}"),
    }
}

#[tokio::test]
async fn reply_and_delete_flow() {
    let hub = seeded_hub();
    let pipeline = pipeline_for(&hub);

    // Post, then reply to it via its cast URI, then delete the reply.
    let original = pipeline.create_post("u1", "first", None, None).await.unwrap();
    let reply_uri = format!("hubcast://cast/1/{original}");

    pipeline
        .create_post("u1", "second", None, Some(&reply_uri))
        .await
        .unwrap();

    let signed = decode_last(&hub);
    match signed.data.body {
        MessageBody::CastAdd(cast) => match cast.parent {
            Some(TargetReference::Cast(target)) => {
                assert_eq!(target.account_id, AccountId(1));
                assert_eq!(target.hash.to_hex(), original);
            }
            other => panic!("expected cast parent, got {other:?}"),
        },
        other => panic!("expected CastAdd, got {other:?}"),
    }

    let reply_hash = decode_last(&hub).hash;
    pipeline.delete_post("u1", &reply_hash).await.unwrap();

    let signed = decode_last(&hub);
    match signed.data.body {
        MessageBody::CastRemove { target_hash } => assert_eq!(target_hash, reply_hash),
        other => panic!("expected CastRemove, got {other:?}"),
    }
}

#[tokio::test]
async fn reaction_flow_resolves_target_before_signing() {
    let hub = seeded_hub();
    let pipeline = pipeline_for(&hub);

    let target = MessageHash::digest(b"someone else's cast");
    hub.put_cast(target.clone(), AccountId(777));

    pipeline
        .add_reaction("u1", &target, ReactionKind::Recast)
        .await
        .unwrap();

    let signed = decode_last(&hub);
    match signed.data.body {
        MessageBody::ReactionAdd { kind, target: resolved } => {
            assert_eq!(kind, ReactionKind::Recast);
            assert_eq!(resolved.account_id, AccountId(777));
            assert_eq!(resolved.hash, target);
        }
        other => panic!("expected ReactionAdd, got {other:?}"),
    }
}

#[tokio::test]
async fn reaction_on_unknown_target_fails_without_signing() {
    let hub = seeded_hub();
    let pipeline = pipeline_for(&hub);

    let err = pipeline
        .remove_reaction("u1", &MessageHash::digest(b"ghost"), ReactionKind::Recast)
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::TargetNotFound(_)));
    assert!(hub.submitted().is_empty());
}

#[tokio::test]
async fn follow_unfollow_roundtrip() {
    let hub = seeded_hub();
    let pipeline = pipeline_for(&hub);

    assert_eq!(
        pipeline.follow("u1", AccountId(555)).await.unwrap(),
        AccountId(555)
    );
    assert_eq!(
        pipeline.unfollow("u1", AccountId(555)).await.unwrap(),
        AccountId(555)
    );
    assert_eq!(hub.submitted().len(), 2);
}

#[tokio::test]
async fn missing_signer_blocks_every_operation() {
    let hub = MockHub::new();
    let pipeline = pipeline_for(&hub);

    let err = pipeline.create_post("nobody", "hi", None, None).await.unwrap_err();
    assert!(matches!(err, ActionError::SignerNotFound(_)));

    let err = pipeline.follow("nobody", AccountId(1)).await.unwrap_err();
    assert!(matches!(err, ActionError::SignerNotFound(_)));
}

#[tokio::test]
async fn hub_rejection_reason_is_verbatim() {
    let hub = seeded_hub();
    let pipeline = pipeline_for(&hub);

    hub.reject_next("rate limit exceeded for fid 1");
    let err = pipeline.create_post("u1", "spam?", None, None).await.unwrap_err();

    match err {
        ActionError::Rejected(reason) => assert_eq!(reason, "rate limit exceeded for fid 1"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn submitted_envelopes_verify_against_relay_interface() {
    // The mock hub is also a plain RelayClient; resubmitting a recorded
    // envelope yields the same canonical hash (deterministic signing).
    let hub = seeded_hub();
    let pipeline = pipeline_for(&hub);

    let hash = pipeline.create_post("u1", "gm", None, None).await.unwrap();
    let envelope = hub.submitted().pop().unwrap();

    match hub.submit(&envelope).await.unwrap() {
        SubmissionOutcome::Accepted { hash: echoed } => assert_eq!(echoed.to_hex(), hash),
        SubmissionOutcome::Rejected { reason } => panic!("unexpected rejection: {reason}"),
    }
}
