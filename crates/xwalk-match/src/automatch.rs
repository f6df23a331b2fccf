//! One-time seeding of obvious matches.

use std::collections::BTreeMap;

use xwalk_model::{ConfirmedMatches, MatchKey, MatchResults};

use crate::text::parts_match;

/// Pre-confirms each row whose top-ranked candidate is a token-for-token
/// equivalent of the row's value.
///
/// Runs exactly once, at the moment ranking completes and before any user
/// decision exists, so it can never override one. Every bucket gets an
/// entry, even when nothing automatched.
pub fn automatch(results: &MatchResults) -> BTreeMap<String, ConfirmedMatches> {
    let mut seeded = BTreeMap::new();
    for (bucket, rows) in results {
        let mut confirmed = ConfirmedMatches::new();
        for row in rows {
            if let Some(top) = row.top_candidate()
                && parts_match(&row.value, &top.value)
            {
                confirmed.set(MatchKey::new(0, row.source_row), true);
            }
        }
        seeded.insert(bucket.clone(), confirmed);
    }
    seeded
}
