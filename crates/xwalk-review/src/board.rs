//! Copy-on-write storage of review decisions.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use xwalk_model::{ConfirmedMatches, MatchKey};

/// The per-bucket arena of decision snapshots.
///
/// Each bucket holds an immutable [`ConfirmedMatches`] snapshot behind an
/// `Arc`. A toggle replaces exactly one bucket's snapshot, so cloning the
/// board is cheap, two boards can be compared by reference to detect
/// changes, and external undo/redo reduces to keeping old boards around.
#[derive(Debug, Clone, Default)]
pub struct ReviewBoard {
    buckets: BTreeMap<String, Arc<ConfirmedMatches>>,
}

impl ReviewBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from per-bucket seed decisions (the automatch output
    /// or a deserialized session).
    pub fn from_seed(seed: BTreeMap<String, ConfirmedMatches>) -> Self {
        Self {
            buckets: seed
                .into_iter()
                .map(|(bucket, matches)| (bucket, Arc::new(matches)))
                .collect(),
        }
    }

    pub fn bucket(&self, bucket: &str) -> Option<&Arc<ConfirmedMatches>> {
        self.buckets.get(bucket)
    }

    pub fn is_confirmed(&self, bucket: &str, key: MatchKey) -> bool {
        self.buckets
            .get(bucket)
            .is_some_and(|matches| matches.is_confirmed(key))
    }

    /// Applies one atomic toggle transition to a bucket.
    ///
    /// With `force` unset the new state is resolved from the selected cells:
    /// a fully confirmed selection unconfirms, anything else (fully
    /// unconfirmed or mixed) confirms. The resolved state is applied to
    /// every cell uniformly; partial toggles are never observable.
    pub fn toggle(&mut self, bucket: &str, cells: &[MatchKey], force: Option<bool>) {
        if cells.is_empty() {
            return;
        }
        let current = self.buckets.get(bucket);
        let next_state = force.unwrap_or_else(|| {
            let all_confirmed = cells
                .iter()
                .all(|key| current.is_some_and(|matches| matches.is_confirmed(*key)));
            !all_confirmed
        });

        let mut updated = current
            .map(|matches| (**matches).clone())
            .unwrap_or_default();
        for key in cells {
            updated.set(*key, next_state);
        }
        debug!(bucket, cells = cells.len(), next_state, "toggled cells");
        self.buckets.insert(bucket.to_string(), Arc::new(updated));
    }

    /// A cheap point-in-time snapshot sharing the underlying per-bucket
    /// maps. Restoring is plain assignment.
    pub fn snapshot(&self) -> ReviewBoard {
        self.clone()
    }

    pub fn restore(&mut self, snapshot: ReviewBoard) {
        *self = snapshot;
    }

    /// Deep-copies the decisions into their serializable form.
    pub fn to_state(&self) -> BTreeMap<String, ConfirmedMatches> {
        self.buckets
            .iter()
            .map(|(bucket, matches)| (bucket.clone(), (**matches).clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<ConfirmedMatches>)> {
        self.buckets
            .iter()
            .map(|(bucket, matches)| (bucket.as_str(), matches))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn keys(cells: &[(usize, usize)]) -> Vec<MatchKey> {
        cells
            .iter()
            .map(|(rank, row)| MatchKey::new(*rank, *row))
            .collect()
    }

    #[test]
    fn mixed_selection_confirms_everything() {
        let mut board = ReviewBoard::new();
        board.toggle("default", &keys(&[(0, 0)]), Some(true));

        // (0,0) is confirmed, (1,0) is not: mixed resolves to confirm.
        board.toggle("default", &keys(&[(0, 0), (1, 0)]), None);
        assert!(board.is_confirmed("default", MatchKey::new(0, 0)));
        assert!(board.is_confirmed("default", MatchKey::new(1, 0)));
    }

    #[test]
    fn double_toggle_is_identity_on_uniform_selection() {
        let mut board = ReviewBoard::new();
        let selection = keys(&[(0, 0), (1, 0), (0, 1), (1, 1)]);

        board.toggle("default", &selection, Some(true));
        assert!(selection.iter().all(|k| board.is_confirmed("default", *k)));

        board.toggle("default", &selection, None);
        assert!(selection.iter().all(|k| !board.is_confirmed("default", *k)));

        board.toggle("default", &selection, None);
        assert!(selection.iter().all(|k| board.is_confirmed("default", *k)));
    }

    #[test]
    fn toggle_replaces_only_the_touched_bucket() {
        let mut seed = BTreeMap::new();
        seed.insert("a".to_string(), ConfirmedMatches::new());
        seed.insert("b".to_string(), ConfirmedMatches::new());
        let mut board = ReviewBoard::from_seed(seed);
        let before = board.snapshot();

        board.toggle("a", &keys(&[(0, 0)]), None);

        let untouched = Arc::ptr_eq(
            before.bucket("b").unwrap(),
            board.bucket("b").unwrap(),
        );
        let touched = Arc::ptr_eq(
            before.bucket("a").unwrap(),
            board.bucket("a").unwrap(),
        );
        assert!(untouched);
        assert!(!touched);
    }

    #[test]
    fn snapshot_restore_round_trips() {
        let mut board = ReviewBoard::new();
        board.toggle("default", &keys(&[(0, 0)]), Some(true));
        let snapshot = board.snapshot();

        board.toggle("default", &keys(&[(0, 0)]), Some(false));
        assert!(!board.is_confirmed("default", MatchKey::new(0, 0)));

        board.restore(snapshot);
        assert!(board.is_confirmed("default", MatchKey::new(0, 0)));
    }

    #[test]
    fn empty_selection_is_a_no_op() {
        let mut board = ReviewBoard::new();
        let before = board.snapshot();
        board.toggle("default", &[], None);
        assert_eq!(board.to_state(), before.to_state());
    }
}
