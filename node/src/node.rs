//! The validator node actor.
//!
//! Owns a [`Validator`] and drives it from an inbox of submissions, peer
//! vote requests, and gossip. Quorum polls run concurrently as background
//! tasks so the actor keeps answering peers while its own polls are in
//! flight — two validators polling each other make progress instead of
//! deadlocking. A poll must fully resolve (every peer answered or timed
//! out) before its submission is committed or dropped.

use ivs_consensus::{SubmissionOutcome, Validator};
use ivs_messages::{
    CommitGossipMessage, MessageHeader, MessageType, Submission, SubmissionEnvelope,
    VoteRequestMessage, VoteResponseMessage,
};
use ivs_store::{EdgeStore, StatusStore};
use ivs_types::{ParticipantId, Timestamp};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::ordering::SequenceBuffer;
use crate::stats::NodeStats;

/// Everything a node can receive over its inbox.
pub enum NodeRequest {
    /// A participant submission, optionally with a channel for the outcome.
    Submission {
        envelope: SubmissionEnvelope,
        outcome: Option<oneshot::Sender<SubmissionOutcome>>,
    },
    /// A peer asking for an independent verification vote.
    VoteRequest {
        message: VoteRequestMessage,
        reply: oneshot::Sender<VoteResponseMessage>,
    },
    /// A peer announcing a commit; re-validated locally on receipt.
    Gossip(CommitGossipMessage),
    /// Stop accepting input; in-flight polls drain before exit.
    Shutdown,
}

/// Cheap clonable address of a node; the only way anything talks to it.
#[derive(Clone)]
pub struct NodeHandle {
    tx: mpsc::Sender<NodeRequest>,
}

impl NodeHandle {
    /// Create an inbox and the handle feeding it.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<NodeRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Submit and wait for the node's decision.
    pub async fn submit(&self, envelope: SubmissionEnvelope) -> Result<SubmissionOutcome, NodeError> {
        let outcome_rx = self.submit_deferred(envelope).await?;
        outcome_rx.await.map_err(|_| NodeError::ChannelClosed)
    }

    /// Enqueue a submission now and return a receiver for its eventual
    /// outcome. Useful when later traffic must be issued before this
    /// submission resolves (e.g. filling a sequence gap).
    pub async fn submit_deferred(
        &self,
        envelope: SubmissionEnvelope,
    ) -> Result<oneshot::Receiver<SubmissionOutcome>, NodeError> {
        let (outcome_tx, outcome_rx) = oneshot::channel();
        self.tx
            .send(NodeRequest::Submission {
                envelope,
                outcome: Some(outcome_tx),
            })
            .await
            .map_err(|_| NodeError::ChannelClosed)?;
        Ok(outcome_rx)
    }

    /// Submit without waiting for the outcome.
    pub async fn submit_detached(&self, envelope: SubmissionEnvelope) -> Result<(), NodeError> {
        self.tx
            .send(NodeRequest::Submission {
                envelope,
                outcome: None,
            })
            .await
            .map_err(|_| NodeError::ChannelClosed)
    }

    /// Ask for a verification vote, treating timeout or a dead peer as "no".
    pub async fn request_vote(&self, envelope: SubmissionEnvelope, wait: Duration) -> bool {
        let (reply_tx, reply_rx) = oneshot::channel();
        let message = VoteRequestMessage {
            header: MessageHeader::new(MessageType::VoteRequest, Timestamp::now()),
            envelope,
        };
        if self
            .tx
            .send(NodeRequest::VoteRequest {
                message,
                reply: reply_tx,
            })
            .await
            .is_err()
        {
            return false;
        }
        match tokio::time::timeout(wait, reply_rx).await {
            Ok(Ok(response)) => response.approve,
            _ => false,
        }
    }

    /// Fire-and-forget commit announcement.
    pub fn gossip(&self, message: CommitGossipMessage) {
        let _ = self.tx.try_send(NodeRequest::Gossip(message));
    }

    pub async fn shutdown(&self) {
        let _ = self.tx.send(NodeRequest::Shutdown).await;
    }
}

/// Result of one finished quorum poll, handed back to the actor loop.
struct PollResult {
    envelope: SubmissionEnvelope,
    outcome_tx: Option<oneshot::Sender<SubmissionOutcome>>,
    approvals: usize,
    total_voters: usize,
}

type PendingSubmission = (
    SubmissionEnvelope,
    Option<oneshot::Sender<SubmissionOutcome>>,
);

/// A validator plus its I/O shell.
pub struct ValidatorNode<S> {
    validator: Validator,
    store: Arc<S>,
    config: NodeConfig,
    inbox: mpsc::Receiver<NodeRequest>,
    peers: Vec<NodeHandle>,
    ordering: SequenceBuffer<PendingSubmission>,
    /// Submitters with a quorum poll in flight; their later submissions
    /// wait so one participant's updates apply in issued order.
    busy: HashSet<ParticipantId>,
    waiting: HashMap<ParticipantId, VecDeque<PendingSubmission>>,
    polls: JoinSet<PollResult>,
    stats: NodeStats,
}

impl<S> ValidatorNode<S>
where
    S: EdgeStore + StatusStore + Send + Sync + 'static,
{
    /// Build a node around an already-initialized validator.
    pub fn new(
        validator: Validator,
        store: Arc<S>,
        config: NodeConfig,
        inbox: mpsc::Receiver<NodeRequest>,
    ) -> Self {
        let max_parked = config.max_parked;
        Self {
            validator,
            store,
            config,
            inbox,
            peers: Vec::new(),
            ordering: SequenceBuffer::new(max_parked),
            busy: HashSet::new(),
            waiting: HashMap::new(),
            polls: JoinSet::new(),
            stats: NodeStats::default(),
        }
    }

    /// Wire peer links and promote the validator to `Operational`.
    pub fn connect_peers(&mut self, peers: Vec<NodeHandle>) -> Result<(), NodeError> {
        self.peers = peers;
        self.validator.mark_operational()?;
        info!(
            validator = self.config.label,
            peers = self.peers.len(),
            "node operational"
        );
        Ok(())
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    /// Drive the actor until the inbox closes (or a shutdown request) and
    /// all in-flight polls resolve. Returns the node so callers can inspect
    /// final state.
    pub async fn run(mut self) -> Self {
        let mut open = true;
        loop {
            tokio::select! {
                request = self.inbox.recv(), if open => match request {
                    Some(NodeRequest::Shutdown) | None => {
                        open = false;
                        self.inbox.close();
                    }
                    Some(request) => self.handle_request(request),
                },
                Some(finished) = self.polls.join_next(), if !self.polls.is_empty() => {
                    match finished {
                        Ok(result) => self.finalize_poll(result),
                        Err(e) => warn!(validator = self.config.label, error = %e, "poll task failed"),
                    }
                },
                else => break,
            }
        }
        self
    }

    fn handle_request(&mut self, request: NodeRequest) {
        match request {
            NodeRequest::Submission { envelope, outcome } => {
                self.stats.submissions_received.bump();
                let submitter = envelope.submitter.clone();
                let sequence = envelope.sequence;
                for pending in self.ordering.accept(&submitter, sequence, (envelope, outcome)) {
                    self.admit(pending);
                }
            }
            NodeRequest::VoteRequest { message, reply } => {
                let approve = self.validator.evaluate(&message.envelope, Timestamp::now()).is_ok();
                let response = VoteResponseMessage {
                    header: MessageHeader::new(MessageType::VoteResponse, Timestamp::now()),
                    approve,
                };
                let _ = reply.send(response);
            }
            NodeRequest::Gossip(message) => {
                match self.validator.receive_gossip(
                    &message.envelope,
                    self.store.as_ref(),
                    Timestamp::now(),
                ) {
                    Ok(()) => self.stats.gossip_commits.bump(),
                    Err(e) => debug!(
                        validator = self.config.label,
                        error = %e,
                        "gossiped commit failed local re-validation"
                    ),
                }
            }
            NodeRequest::Shutdown => {}
        }
    }

    /// A submission in causal order: hold it if its submitter already has a
    /// poll in flight, otherwise verify and start the quorum poll.
    fn admit(&mut self, pending: PendingSubmission) {
        let submitter = pending.0.submitter.clone();
        if self.busy.contains(&submitter) {
            self.waiting.entry(submitter).or_default().push_back(pending);
            return;
        }
        self.begin_poll(pending);
    }

    /// Returns whether a poll actually started (a local rejection resolves
    /// the submission immediately).
    fn begin_poll(&mut self, (envelope, outcome_tx): PendingSubmission) -> bool {
        // Step 1: local verification. A failure is a local rejection — no
        // state change, no peer traffic.
        if let Err(e) = self.validator.evaluate(&envelope, Timestamp::now()) {
            self.stats.local_rejections.bump();
            debug!(
                validator = self.config.label,
                submitter = %envelope.submitter,
                error = %e,
                "submission rejected locally"
            );
            if let Some(tx) = outcome_tx {
                let _ = tx.send(SubmissionOutcome::Rejected(e.to_string()));
            }
            return false;
        }

        // Step 2: concurrent quorum poll. The local vote counts as one
        // approval; every peer re-verifies against its own registry view.
        self.busy.insert(envelope.submitter.clone());
        let peers = self.peers.clone();
        let wait = Duration::from_millis(self.config.vote_timeout_ms);
        self.polls.spawn(async move {
            let total_voters = peers.len() + 1;
            let mut approvals = 1;

            let mut requests = JoinSet::new();
            for peer in peers {
                let envelope = envelope.clone();
                requests.spawn(async move { peer.request_vote(envelope, wait).await });
            }
            while let Some(vote) = requests.join_next().await {
                if matches!(vote, Ok(true)) {
                    approvals += 1;
                }
            }

            PollResult {
                envelope,
                outcome_tx,
                approvals,
                total_voters,
            }
        });
        true
    }

    /// Steps 3 and 4: the poll has fully resolved — commit and broadcast on
    /// quorum, silently drop otherwise.
    fn finalize_poll(&mut self, result: PollResult) {
        let submitter = result.envelope.submitter.clone();
        self.busy.remove(&submitter);

        let decision = self.validator.quorum(result.approvals, result.total_voters);
        let outcome = if decision.reached() {
            match self
                .validator
                .commit(&result.envelope, self.store.as_ref(), Timestamp::now())
            {
                Ok(()) => {
                    match &result.envelope.payload {
                        Submission::Edge(_) => self.stats.edges_committed.bump(),
                        Submission::Status(_) => self.stats.statuses_committed.bump(),
                    }
                    self.broadcast_commit(&result.envelope);
                    SubmissionOutcome::Committed {
                        votes: decision.votes,
                        required: decision.required,
                    }
                }
                Err(e) => SubmissionOutcome::Rejected(e.to_string()),
            }
        } else {
            // Dropped, no retry here — the submitter owns retry/backoff.
            self.stats.quorum_failures.bump();
            info!(
                validator = self.config.label,
                submitter = %submitter,
                votes = decision.votes,
                required = decision.required,
                "submission dropped: quorum not reached"
            );
            SubmissionOutcome::QuorumNotReached {
                votes: decision.votes,
                required: decision.required,
            }
        };

        if let Some(tx) = result.outcome_tx {
            let _ = tx.send(outcome);
        }

        // The submitter's next queued submissions may now proceed; locally
        // rejected ones resolve inline, so keep going until a poll starts.
        while let Some(pending) = self.pop_waiting(&submitter) {
            if self.begin_poll(pending) {
                break;
            }
        }
    }

    fn pop_waiting(&mut self, submitter: &ParticipantId) -> Option<PendingSubmission> {
        let queue = self.waiting.get_mut(submitter)?;
        let pending = queue.pop_front();
        if queue.is_empty() {
            self.waiting.remove(submitter);
        }
        pending
    }

    fn broadcast_commit(&self, envelope: &SubmissionEnvelope) {
        let message = CommitGossipMessage {
            header: MessageHeader::new(MessageType::CommitGossip, Timestamp::now()),
            envelope: envelope.clone(),
        };
        for peer in &self.peers {
            peer.gossip(message.clone());
        }
    }
}
