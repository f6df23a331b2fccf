//! Join partitioning: groups source and target records into disjoint
//! comparison buckets so ranking only compares records that share a join
//! value.

use xwalk_model::{DEFAULT_BUCKET, Record, Result, XwalkError};

use crate::text::normalize;

/// One side of a matching run before partitioning. `join` and `meta`, when
/// present, pair with `values` by index and must have the same length.
#[derive(Debug, Clone, Default)]
pub struct SideInput {
    pub values: Vec<String>,
    pub join: Option<Vec<String>>,
    pub meta: Option<Vec<String>>,
}

/// A comparison bucket: the records from each side sharing one normalized
/// join value. Buckets with either side empty are dropped before ranking.
#[derive(Debug, Clone)]
pub struct BucketInput {
    pub key: String,
    pub left: Vec<Record>,
    pub right: Vec<Record>,
}

/// Partitions both sides into buckets.
///
/// Without join columns everything lands in the single `"default"` bucket.
/// With join columns, records are grouped under their normalized join value;
/// casing and surrounding whitespace of the keys are irrelevant. Buckets are
/// returned in first-seen join-value order (left side first).
pub fn partition(left: &SideInput, right: &SideInput) -> Result<Vec<BucketInput>> {
    check_lengths("left", left)?;
    check_lengths("right", right)?;

    let left_records = side_records(left);
    let right_records = side_records(right);

    let (left_keys, right_keys) = match (&left.join, &right.join) {
        (None, None) => {
            if left_records.is_empty() || right_records.is_empty() {
                return Ok(Vec::new());
            }
            return Ok(vec![BucketInput {
                key: DEFAULT_BUCKET.to_string(),
                left: left_records,
                right: right_records,
            }]);
        }
        (Some(left_join), Some(right_join)) => (
            left_join.iter().map(|key| normalize(key)).collect::<Vec<_>>(),
            right_join.iter().map(|key| normalize(key)).collect::<Vec<_>>(),
        ),
        _ => {
            return Err(XwalkError::InvalidSelection(
                "join columns must be selected on both sides or neither".to_string(),
            ));
        }
    };

    let mut buckets = Vec::new();
    for key in unique_keys(&left_keys, &right_keys) {
        let bucket_left = filter_by_key(&left_records, &left_keys, &key);
        let bucket_right = filter_by_key(&right_records, &right_keys, &key);
        if bucket_left.is_empty() || bucket_right.is_empty() {
            continue;
        }
        buckets.push(BucketInput {
            key,
            left: bucket_left,
            right: bucket_right,
        });
    }
    Ok(buckets)
}

/// Zips values and metadata by index before any filtering happens, so the
/// value/metadata pairing can never desynchronize.
fn side_records(side: &SideInput) -> Vec<Record> {
    side.values
        .iter()
        .enumerate()
        .map(|(index, value)| Record {
            value: value.clone(),
            meta: side.meta.as_ref().map(|meta| meta[index].clone()),
            original_index: index,
        })
        .collect()
}

fn unique_keys(left_keys: &[String], right_keys: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for key in left_keys.iter().chain(right_keys) {
        if !unique.contains(key) {
            unique.push(key.clone());
        }
    }
    unique
}

fn filter_by_key(records: &[Record], keys: &[String], key: &str) -> Vec<Record> {
    records
        .iter()
        .zip(keys)
        .filter(|(_, record_key)| record_key.as_str() == key)
        .map(|(record, _)| record.clone())
        .collect()
}

fn check_lengths(side_name: &str, side: &SideInput) -> Result<()> {
    if let Some(join) = &side.join
        && join.len() != side.values.len()
    {
        return Err(XwalkError::LengthMismatch(format!(
            "{side_name} join column has {} values, expected {}",
            join.len(),
            side.values.len()
        )));
    }
    if let Some(meta) = &side.meta
        && meta.len() != side.values.len()
    {
        return Err(XwalkError::LengthMismatch(format!(
            "{side_name} metadata column has {} values, expected {}",
            meta.len(),
            side.values.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_string()).collect()
    }

    fn side(values: &[&str], join: Option<&[&str]>, meta: Option<&[&str]>) -> SideInput {
        SideInput {
            values: owned(values),
            join: join.map(owned),
            meta: meta.map(owned),
        }
    }

    #[test]
    fn no_join_yields_single_default_bucket() {
        let buckets = partition(
            &side(&["A", "B"], None, None),
            &side(&["C"], None, None),
        )
        .unwrap();

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].key, DEFAULT_BUCKET);
        assert_eq!(buckets[0].left.len(), 2);
        assert_eq!(buckets[0].right.len(), 1);
    }

    #[test]
    fn buckets_with_an_empty_side_are_dropped() {
        let buckets = partition(
            &side(&["A", "B"], Some(&["x", "y"]), None),
            &side(&["C", "D"], Some(&["X", " y "]), None),
        )
        .unwrap();

        // "x" has no right-side records; "y" pairs B with D despite the
        // right key's casing and whitespace.
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].key, "y");
        assert_eq!(buckets[0].left[0].value, "B");
        assert_eq!(buckets[0].left[0].original_index, 1);
        assert_eq!(buckets[0].right[0].value, "D");
        assert_eq!(buckets[0].right[0].original_index, 1);
    }

    #[test]
    fn metadata_stays_paired_under_filtering() {
        let buckets = partition(
            &side(
                &["A", "B", "C"],
                Some(&["k", "other", "k"]),
                Some(&["meta A", "meta B", "meta C"]),
            ),
            &side(&["D"], Some(&["K"]), None),
        )
        .unwrap();

        assert_eq!(buckets.len(), 1);
        let left = &buckets[0].left;
        assert_eq!(left.len(), 2);
        assert_eq!(left[0].value, "A");
        assert_eq!(left[0].meta.as_deref(), Some("meta A"));
        assert_eq!(left[1].value, "C");
        assert_eq!(left[1].meta.as_deref(), Some("meta C"));
        assert_eq!(left[1].original_index, 2);
    }

    #[test]
    fn one_sided_join_is_rejected() {
        let result = partition(
            &side(&["A"], Some(&["x"]), None),
            &side(&["B"], None, None),
        );
        assert!(matches!(result, Err(XwalkError::InvalidSelection(_))));
    }

    #[test]
    fn mismatched_join_length_is_rejected() {
        let result = partition(
            &side(&["A", "B"], Some(&["x"]), None),
            &side(&["C"], Some(&["x"]), None),
        );
        assert!(matches!(result, Err(XwalkError::LengthMismatch(_))));
    }

    #[test]
    fn empty_sides_produce_no_buckets() {
        let buckets = partition(&side(&[], None, None), &side(&["C"], None, None)).unwrap();
        assert!(buckets.is_empty());
    }
}
