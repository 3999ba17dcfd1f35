//! Counts, tallies, percentages, and membership listings.

use ballot_store::SetBackend;
use ballot_types::{Identity, SetKind, Voteable, Voter};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::confidence::{confidence, ConfidenceBound};
use crate::error::VoteResult;
use crate::store::VoteStore;

/// Up and down counts for one voteable (votes received) or one voter
/// (votes cast).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    pub up: u64,
    pub down: u64,
}

impl VoteCounts {
    pub fn new(up: u64, down: u64) -> Self {
        Self { up, down }
    }

    pub fn total(&self) -> u64 {
        self.up + self.down
    }

    /// `up - down`; negative when down votes dominate.
    pub fn tally(&self) -> i64 {
        self.up as i64 - self.down as i64
    }

    /// Share of up votes in percent, `None` when there are no votes.
    pub fn up_percentage(&self) -> Option<f64> {
        self.percentage(self.up)
    }

    /// Share of down votes in percent, `None` when there are no votes.
    pub fn down_percentage(&self) -> Option<f64> {
        self.percentage(self.down)
    }

    fn percentage(&self, count: u64) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(count as f64 * 100.0 / total as f64),
        }
    }

    pub fn confidence(&self, bound: ConfidenceBound) -> f64 {
        confidence(self.up, self.down, bound)
    }
}

impl<B: SetBackend> VoteStore<B> {
    // ---- Votes received by a voteable ----

    /// Up and down counts read together (two cardinality lookups).
    pub fn counts<T: Voteable + ?Sized>(&self, voteable: &T) -> VoteResult<VoteCounts> {
        let id = voteable.identity();
        Ok(VoteCounts {
            up: self.cardinality(&id, SetKind::UpVoters)?,
            down: self.cardinality(&id, SetKind::DownVoters)?,
        })
    }

    pub fn up_votes<T: Voteable + ?Sized>(&self, voteable: &T) -> VoteResult<u64> {
        self.cardinality(&voteable.identity(), SetKind::UpVoters)
    }

    pub fn down_votes<T: Voteable + ?Sized>(&self, voteable: &T) -> VoteResult<u64> {
        self.cardinality(&voteable.identity(), SetKind::DownVoters)
    }

    pub fn total_votes<T: Voteable + ?Sized>(&self, voteable: &T) -> VoteResult<u64> {
        Ok(self.counts(voteable)?.total())
    }

    pub fn tally<T: Voteable + ?Sized>(&self, voteable: &T) -> VoteResult<i64> {
        Ok(self.counts(voteable)?.tally())
    }

    pub fn up_percentage<T: Voteable + ?Sized>(&self, voteable: &T) -> VoteResult<Option<f64>> {
        Ok(self.counts(voteable)?.up_percentage())
    }

    pub fn down_percentage<T: Voteable + ?Sized>(&self, voteable: &T) -> VoteResult<Option<f64>> {
        Ok(self.counts(voteable)?.down_percentage())
    }

    pub fn confidence<T: Voteable + ?Sized>(&self, voteable: &T, bound: ConfidenceBound) -> VoteResult<f64> {
        Ok(self.counts(voteable)?.confidence(bound))
    }

    /// Voteables ordered by descending confidence. Ties keep input order.
    pub fn rank_by_confidence<'a, T: Voteable>(
        &self,
        voteables: &'a [T],
        bound: ConfidenceBound,
    ) -> VoteResult<Vec<(&'a T, f64)>> {
        let mut scored = voteables
            .iter()
            .map(|v| self.confidence(v, bound).map(|score| (v, score)))
            .collect::<VoteResult<Vec<_>>>()?;
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(scored)
    }

    /// Voters who up-voted `voteable`, sorted.
    pub fn up_voters<T: Voteable + ?Sized>(&self, voteable: &T) -> VoteResult<Vec<Identity>> {
        self.members(&voteable.identity(), SetKind::UpVoters)
    }

    /// Voters who down-voted `voteable`, sorted.
    pub fn down_voters<T: Voteable + ?Sized>(&self, voteable: &T) -> VoteResult<Vec<Identity>> {
        self.members(&voteable.identity(), SetKind::DownVoters)
    }

    // ---- Votes cast by a voter ----

    pub fn voter_counts<V: Voter + ?Sized>(&self, voter: &V) -> VoteResult<VoteCounts> {
        let id = voter.identity();
        Ok(VoteCounts {
            up: self.cardinality(&id, SetKind::UpVotes)?,
            down: self.cardinality(&id, SetKind::DownVotes)?,
        })
    }

    pub fn voter_up_votes<V: Voter + ?Sized>(&self, voter: &V) -> VoteResult<u64> {
        self.cardinality(&voter.identity(), SetKind::UpVotes)
    }

    pub fn voter_down_votes<V: Voter + ?Sized>(&self, voter: &V) -> VoteResult<u64> {
        self.cardinality(&voter.identity(), SetKind::DownVotes)
    }

    pub fn voter_total_votes<V: Voter + ?Sized>(&self, voter: &V) -> VoteResult<u64> {
        Ok(self.voter_counts(voter)?.total())
    }

    pub fn voter_tally<V: Voter + ?Sized>(&self, voter: &V) -> VoteResult<i64> {
        Ok(self.voter_counts(voter)?.tally())
    }

    /// Voteables `voter` up-voted, sorted.
    pub fn up_voted<V: Voter + ?Sized>(&self, voter: &V) -> VoteResult<Vec<Identity>> {
        self.members(&voter.identity(), SetKind::UpVotes)
    }

    /// Voteables `voter` down-voted, sorted.
    pub fn down_voted<V: Voter + ?Sized>(&self, voter: &V) -> VoteResult<Vec<Identity>> {
        self.members(&voter.identity(), SetKind::DownVotes)
    }

    fn cardinality(&self, identity: &Identity, set: SetKind) -> VoteResult<u64> {
        Ok(self.backend().set_cardinality(&self.key(identity, set))?)
    }

    fn members(&self, identity: &Identity, set: SetKind) -> VoteResult<Vec<Identity>> {
        let key = self.key(identity, set);
        let members = self.backend().set_members(&key)?;
        Ok(members
            .into_iter()
            .filter_map(|member| match Identity::parse(&member) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(%key, %member, error = %e, "skipping unparsable set member");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_store::InMemorySetBackend;

    fn user(id: u64) -> Identity {
        Identity::record("User", id)
    }

    fn post(id: u64) -> Identity {
        Identity::record("Post", id)
    }

    // -----------------------------------------------------------------------
    // VoteCounts
    // -----------------------------------------------------------------------

    #[test]
    fn percentages_undefined_without_votes() {
        let counts = VoteCounts::default();
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.tally(), 0);
        assert_eq!(counts.up_percentage(), None);
        assert_eq!(counts.down_percentage(), None);
    }

    #[test]
    fn percentages_and_tally() {
        assert_eq!(VoteCounts::new(1, 0).up_percentage(), Some(100.0));
        assert_eq!(VoteCounts::new(1, 0).down_percentage(), Some(0.0));
        assert_eq!(VoteCounts::new(1, 1).up_percentage(), Some(50.0));
        assert_eq!(VoteCounts::new(1, 3).down_percentage(), Some(75.0));
        assert_eq!(VoteCounts::new(1, 3).tally(), -2);
    }

    // -----------------------------------------------------------------------
    // Store-backed aggregates
    // -----------------------------------------------------------------------

    #[test]
    fn empty_voteable_reads_zero() {
        let store = VoteStore::new(InMemorySetBackend::new());
        assert_eq!(store.up_votes(&post(1)).unwrap(), 0);
        assert_eq!(store.down_votes(&post(1)).unwrap(), 0);
        assert_eq!(store.up_percentage(&post(1)).unwrap(), None);
        assert_eq!(store.voter_total_votes(&user(1)).unwrap(), 0);
    }

    #[test]
    fn voting_scenario() {
        let store = VoteStore::new(InMemorySetBackend::new());
        let (a, b, p) = (user(1), user(2), post(1));

        store.cast_up(&a, &p).unwrap();
        assert_eq!(store.tally(&p).unwrap(), 1);
        assert_eq!(store.up_percentage(&p).unwrap(), Some(100.0));
        assert_eq!(store.down_percentage(&p).unwrap(), Some(0.0));

        store.cast_down(&b, &p).unwrap();
        assert_eq!(store.tally(&p).unwrap(), 0);
        assert_eq!(store.up_percentage(&p).unwrap(), Some(50.0));
        assert_eq!(store.down_percentage(&p).unwrap(), Some(50.0));

        store.clear(&a, &p).unwrap();
        assert_eq!(store.up_votes(&p).unwrap(), 0);
        assert_eq!(store.down_votes(&p).unwrap(), 1);
        assert_eq!(store.tally(&p).unwrap(), -1);
    }

    #[test]
    fn voter_side_counts() {
        let store = VoteStore::new(InMemorySetBackend::new());
        let v = user(1);
        store.cast_up(&v, &post(1)).unwrap();
        store.cast_up(&v, &post(2)).unwrap();
        store.cast_down(&v, &post(3)).unwrap();
        assert_eq!(store.voter_up_votes(&v).unwrap(), 2);
        assert_eq!(store.voter_down_votes(&v).unwrap(), 1);
        assert_eq!(store.voter_total_votes(&v).unwrap(), 3);
        assert_eq!(store.voter_tally(&v).unwrap(), 1);
    }

    #[test]
    fn confidence_tracks_votes() {
        let store = VoteStore::new(InMemorySetBackend::new());
        let p = post(1);
        let empty = store.confidence(&p, ConfidenceBound::Lower).unwrap();
        store.cast_up(&user(1), &p).unwrap();
        let one_up = store.confidence(&p, ConfidenceBound::Lower).unwrap();
        store.cast_down(&user(2), &p).unwrap();
        let split = store.confidence(&p, ConfidenceBound::Lower).unwrap();
        assert!(one_up > empty);
        assert!(split < one_up);
        assert!(store.confidence(&p, ConfidenceBound::Upper).unwrap() > split);
    }

    #[test]
    fn ranking_orders_by_confidence() {
        let store = VoteStore::new(InMemorySetBackend::new());
        let posts = vec![post(1), post(2), post(3), post(4)];
        // post 2: 5 up; post 3: 1 up; post 1: 1 down; post 4: no votes.
        for v in 0..5 {
            store.cast_up(&user(v), &posts[1]).unwrap();
        }
        store.cast_up(&user(0), &posts[2]).unwrap();
        store.cast_down(&user(0), &posts[0]).unwrap();

        let ranked: Vec<Identity> = store
            .rank_by_confidence(&posts, ConfidenceBound::Lower)
            .unwrap()
            .into_iter()
            .map(|(p, _)| p.clone())
            .collect();
        assert_eq!(ranked, vec![post(2), post(3), post(4), post(1)]);
    }

    #[test]
    fn ranking_ties_keep_input_order() {
        let store = VoteStore::new(InMemorySetBackend::new());
        let posts = vec![post(7), post(3), post(5)];
        let ranked = store
            .rank_by_confidence(&posts, ConfidenceBound::Lower)
            .unwrap();
        let order: Vec<&Identity> = ranked.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, vec![&post(7), &post(3), &post(5)]);
    }

    // -----------------------------------------------------------------------
    // Listings
    // -----------------------------------------------------------------------

    #[test]
    fn membership_listings() {
        let store = VoteStore::new(InMemorySetBackend::new());
        let p = post(1);
        store.cast_up(&user(2), &p).unwrap();
        store.cast_up(&user(1), &p).unwrap();
        store.cast_down(&user(3), &p).unwrap();
        store.cast_down(&user(1), &post(2)).unwrap();

        assert_eq!(store.up_voters(&p).unwrap(), vec![user(1), user(2)]);
        assert_eq!(store.down_voters(&p).unwrap(), vec![user(3)]);
        assert_eq!(store.up_voted(&user(1)).unwrap(), vec![post(1)]);
        assert_eq!(store.down_voted(&user(1)).unwrap(), vec![post(2)]);
    }

    #[test]
    fn listings_skip_foreign_members() {
        let store = VoteStore::new(InMemorySetBackend::new());
        let p = post(1);
        store.cast_up(&user(1), &p).unwrap();
        let key = store.key_codec().key(&p, SetKind::UpVoters);
        store.backend().set_add(&key, "garbage").unwrap();

        assert_eq!(store.up_voters(&p).unwrap(), vec![user(1)]);
        // Cardinality still sees the raw set.
        assert_eq!(store.up_votes(&p).unwrap(), 2);
    }
}
