use ballot_store::{SetBackend, SetOp, StoreConfig, StoreError};
use ballot_types::{
    Identity, KeyCodec, SetKind, VoteDirection, VoteRelation, Voteable, Voter,
};
use tracing::debug;

use crate::error::{VoteError, VoteResult};
use crate::outcome::{Transition, VoteOutcome};

/// The vote transition engine.
///
/// Owns nothing but a backend handle and a key codec. The backend is
/// supplied by the host application, which controls its lifecycle; share one
/// backend between stores by passing an `Arc` or a reference.
pub struct VoteStore<B> {
    backend: B,
    keys: KeyCodec,
}

impl<B: SetBackend> VoteStore<B> {
    /// Engine using the default `"vote:"` key prefix.
    pub fn new(backend: B) -> Self {
        Self::with_key_codec(backend, KeyCodec::default())
    }

    pub fn with_key_codec(backend: B, keys: KeyCodec) -> Self {
        Self { backend, keys }
    }

    /// Engine namespaced by `config.key_prefix`. Connection settings in
    /// `config` are the backend's concern and are ignored here.
    pub fn from_config(backend: B, config: &StoreConfig) -> Self {
        Self::with_key_codec(backend, KeyCodec::new(config.key_prefix.clone()))
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn key_codec(&self) -> &KeyCodec {
        &self.keys
    }

    pub(crate) fn key(&self, identity: &Identity, set: SetKind) -> String {
        self.keys.key(identity, set)
    }

    // ---- Transitions ----

    /// Record `direction` for the pair in one atomic transaction.
    ///
    /// The transaction first removes any opposite vote from both sides, then
    /// adds this one to both sides. The outcome is `Applied` iff the voter
    /// was newly inserted into the voteable's voter set for `direction`;
    /// otherwise `AlreadyVoted`, with the opposite-side cleanup still
    /// committed.
    pub fn vote<V, T>(&self, voter: &V, voteable: &T, direction: VoteDirection) -> VoteResult<VoteOutcome>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        let (voter, voteable) = check_capabilities(voter, voteable)?;
        let (voter_member, voteable_member) = (voter.to_string(), voteable.to_string());
        let opposite = direction.opposite();

        let replies = self.backend.transaction(&[
            SetOp::remove(self.key(&voteable, opposite.voters_set()), &voter_member),
            SetOp::remove(self.key(&voter, opposite.votes_set()), &voteable_member),
            SetOp::add(self.key(&voteable, direction.voters_set()), &voter_member),
            SetOp::add(self.key(&voter, direction.votes_set()), &voteable_member),
        ])?;
        let removed_opposite = reply(&replies, 0)?;
        let added = reply(&replies, 2)?;

        if !added {
            debug!(%voter, %voteable, %direction, "vote already recorded");
            return Ok(VoteOutcome::AlreadyVoted(direction));
        }
        let transition = Transition {
            from: if removed_opposite {
                opposite.into()
            } else {
                VoteRelation::None
            },
            to: direction.into(),
        };
        debug!(%voter, %voteable, from = %transition.from, to = %transition.to, "vote applied");
        Ok(VoteOutcome::Applied(transition))
    }

    /// Strict cast: fails with `AlreadyVoted` when the vote is already held.
    pub fn cast<V, T>(&self, voter: &V, voteable: &T, direction: VoteDirection) -> VoteResult<Transition>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        self.vote(voter, voteable, direction)?.into_result()
    }

    /// Idempotent cast: `Ok(false)` when the vote is already held.
    pub fn cast_idempotent<V, T>(&self, voter: &V, voteable: &T, direction: VoteDirection) -> VoteResult<bool>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        Ok(self.vote(voter, voteable, direction)?.is_applied())
    }

    /// `None -> Up` or `Down -> Up`. Fails with `AlreadyVoted(Up)` on `Up -> Up`.
    pub fn cast_up<V, T>(&self, voter: &V, voteable: &T) -> VoteResult<Transition>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        self.cast(voter, voteable, VoteDirection::Up)
    }

    /// `None -> Down` or `Up -> Down`. Fails with `AlreadyVoted(Down)` on `Down -> Down`.
    pub fn cast_down<V, T>(&self, voter: &V, voteable: &T) -> VoteResult<Transition>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        self.cast(voter, voteable, VoteDirection::Down)
    }

    pub fn cast_up_idempotent<V, T>(&self, voter: &V, voteable: &T) -> VoteResult<bool>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        self.cast_idempotent(voter, voteable, VoteDirection::Up)
    }

    pub fn cast_down_idempotent<V, T>(&self, voter: &V, voteable: &T) -> VoteResult<bool>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        self.cast_idempotent(voter, voteable, VoteDirection::Down)
    }

    /// Remove any vote for the pair in one atomic transaction.
    ///
    /// All four sets are cleaned, but only the voteable-side removals decide
    /// the outcome: `Applied` if the voter was found in either of the
    /// voteable's voter sets, `NotVoted` otherwise.
    pub fn clear_outcome<V, T>(&self, voter: &V, voteable: &T) -> VoteResult<VoteOutcome>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        let (voter, voteable) = check_capabilities(voter, voteable)?;
        let (voter_member, voteable_member) = (voter.to_string(), voteable.to_string());

        let replies = self.backend.transaction(&[
            SetOp::remove(self.key(&voteable, SetKind::DownVoters), &voter_member),
            SetOp::remove(self.key(&voter, SetKind::DownVotes), &voteable_member),
            SetOp::remove(self.key(&voteable, SetKind::UpVoters), &voter_member),
            SetOp::remove(self.key(&voter, SetKind::UpVotes), &voteable_member),
        ])?;
        let was_down = reply(&replies, 0)?;
        let was_up = reply(&replies, 2)?;

        let from = match (was_up, was_down) {
            (true, _) => VoteRelation::Up,
            (false, true) => VoteRelation::Down,
            (false, false) => {
                debug!(%voter, %voteable, "no vote to clear");
                return Ok(VoteOutcome::NotVoted);
            }
        };
        debug!(%voter, %voteable, %from, "vote cleared");
        Ok(VoteOutcome::Applied(Transition {
            from,
            to: VoteRelation::None,
        }))
    }

    /// Strict clear: fails with `NotVoted` when there was no vote.
    pub fn clear<V, T>(&self, voter: &V, voteable: &T) -> VoteResult<Transition>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        self.clear_outcome(voter, voteable)?.into_result()
    }

    /// Idempotent clear: `Ok(false)` when there was no vote.
    pub fn clear_idempotent<V, T>(&self, voter: &V, voteable: &T) -> VoteResult<bool>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        Ok(self.clear_outcome(voter, voteable)?.is_applied())
    }

    // ---- Relation queries (voter -> voteable) ----

    /// Current relation, read from the voteable's voter sets.
    ///
    /// Two independent lookups, not a snapshot: a concurrent transition
    /// between them may make the answer stale, but never inconsistent with a
    /// state the pair actually held.
    pub fn relation<V, T>(&self, voter: &V, voteable: &T) -> VoteResult<VoteRelation>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        if self.has_up_voted(voter, voteable)? {
            Ok(VoteRelation::Up)
        } else if self.has_down_voted(voter, voteable)? {
            Ok(VoteRelation::Down)
        } else {
            Ok(VoteRelation::None)
        }
    }

    pub fn has_voted<V, T>(&self, voter: &V, voteable: &T) -> VoteResult<bool>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        Ok(!self.relation(voter, voteable)?.is_none())
    }

    pub fn has_up_voted<V, T>(&self, voter: &V, voteable: &T) -> VoteResult<bool>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        self.is_voter_of(voter, voteable, VoteDirection::Up)
    }

    pub fn has_down_voted<V, T>(&self, voter: &V, voteable: &T) -> VoteResult<bool>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        self.is_voter_of(voter, voteable, VoteDirection::Down)
    }

    fn is_voter_of<V, T>(&self, voter: &V, voteable: &T, direction: VoteDirection) -> VoteResult<bool>
    where
        V: Voter + ?Sized,
        T: Voteable + ?Sized,
    {
        let key = self.key(&voteable.identity(), direction.voters_set());
        Ok(self
            .backend
            .set_is_member(&key, &voter.identity().to_string())?)
    }

    // ---- Relation queries (voteable <- voter) ----

    /// Current relation, read from the voter's vote sets.
    pub fn relation_from<T, V>(&self, voteable: &T, voter: &V) -> VoteResult<VoteRelation>
    where
        T: Voteable + ?Sized,
        V: Voter + ?Sized,
    {
        if self.up_voted_by(voteable, voter)? {
            Ok(VoteRelation::Up)
        } else if self.down_voted_by(voteable, voter)? {
            Ok(VoteRelation::Down)
        } else {
            Ok(VoteRelation::None)
        }
    }

    pub fn voted_by<T, V>(&self, voteable: &T, voter: &V) -> VoteResult<bool>
    where
        T: Voteable + ?Sized,
        V: Voter + ?Sized,
    {
        Ok(!self.relation_from(voteable, voter)?.is_none())
    }

    pub fn up_voted_by<T, V>(&self, voteable: &T, voter: &V) -> VoteResult<bool>
    where
        T: Voteable + ?Sized,
        V: Voter + ?Sized,
    {
        self.is_vote_of(voteable, voter, VoteDirection::Up)
    }

    pub fn down_voted_by<T, V>(&self, voteable: &T, voter: &V) -> VoteResult<bool>
    where
        T: Voteable + ?Sized,
        V: Voter + ?Sized,
    {
        self.is_vote_of(voteable, voter, VoteDirection::Down)
    }

    fn is_vote_of<T, V>(&self, voteable: &T, voter: &V, direction: VoteDirection) -> VoteResult<bool>
    where
        T: Voteable + ?Sized,
        V: Voter + ?Sized,
    {
        let key = self.key(&voter.identity(), direction.votes_set());
        Ok(self
            .backend
            .set_is_member(&key, &voteable.identity().to_string())?)
    }
}

/// Preconditions shared by every mutating operation. Runs before any
/// backend call.
fn check_capabilities<V, T>(voter: &V, voteable: &T) -> VoteResult<(Identity, Identity)>
where
    V: Voter + ?Sized,
    T: Voteable + ?Sized,
{
    if !voteable.accepts_votes() {
        return Err(VoteError::InvalidVoteable(voteable.identity()));
    }
    if !voter.casts_votes() {
        return Err(VoteError::InvalidVoter(voter.identity()));
    }
    Ok((voter.identity(), voteable.identity()))
}

fn reply(replies: &[bool], index: usize) -> VoteResult<bool> {
    replies.get(index).copied().ok_or_else(|| {
        VoteError::Store(StoreError::Backend(format!(
            "transaction reply {index} missing ({} received)",
            replies.len()
        )))
    })
}

impl<B> std::fmt::Debug for VoteStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoteStore")
            .field("key_prefix", &self.keys.prefix())
            .finish_non_exhaustive()
    }
}
