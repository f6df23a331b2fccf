//! Filtered, re-sorted, memoized views over a bucket's match rows.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::rc::Rc;

use xwalk_model::{Candidate, MatchKey, MatchRow};

/// One view row: a surviving source row plus its filtered, re-sorted
/// candidates.
#[derive(Debug, Clone)]
pub struct ViewRow<'a> {
    pub source: &'a MatchRow,
    pub ranked: Vec<&'a Candidate>,
}

/// A read-only projection of a bucket's rows under a row predicate, a
/// candidate predicate, and a candidate comparator.
///
/// Surviving rows are renumbered contiguously for display; view-local
/// indices are distinct from the stable `source_row` stored on each
/// candidate. Row projections are computed once and cached by view index.
/// The predicates are fixed for the lifetime of the view and the cache is
/// never invalidated in place: construct a new view when the rows,
/// predicates, or comparator change.
pub struct FilteredRows<'a> {
    rows: Vec<&'a MatchRow>,
    cell_filter: Box<dyn Fn(&Candidate) -> bool + 'a>,
    cell_sort: Box<dyn Fn(&Candidate, &Candidate) -> Ordering + 'a>,
    cache: RefCell<BTreeMap<usize, Rc<ViewRow<'a>>>>,
}

impl<'a> FilteredRows<'a> {
    pub fn new(
        rows: &'a [MatchRow],
        row_filter: impl Fn(&MatchRow) -> bool,
        cell_filter: impl Fn(&Candidate) -> bool + 'a,
        cell_sort: impl Fn(&Candidate, &Candidate) -> Ordering + 'a,
    ) -> Self {
        Self {
            rows: rows.iter().filter(|row| row_filter(row)).collect(),
            cell_filter: Box::new(cell_filter),
            cell_sort: Box::new(cell_sort),
            cache: RefCell::new(BTreeMap::new()),
        }
    }

    /// The identity view: every row, every candidate, ranking order.
    pub fn unfiltered(rows: &'a [MatchRow]) -> Self {
        Self::new(rows, |_| true, |_| true, |_, _| Ordering::Equal)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fetches a view row by view-local index, memoized. Out-of-range
    /// indices degrade to `None` so a stale index from the render layer
    /// shows an empty cell instead of failing the whole view.
    pub fn row(&self, index: usize) -> Option<Rc<ViewRow<'a>>> {
        if let Some(cached) = self.cache.borrow().get(&index) {
            return Some(Rc::clone(cached));
        }
        let source = *self.rows.get(index)?;
        let mut ranked: Vec<&'a Candidate> = source
            .ranked_matches
            .iter()
            .filter(|candidate| (self.cell_filter)(candidate))
            .collect();
        // Stable sort: comparator ties keep the ranking order.
        ranked.sort_by(|a, b| (self.cell_sort)(a, b));

        let row = Rc::new(ViewRow { source, ranked });
        self.cache.borrow_mut().insert(index, Rc::clone(&row));
        Some(row)
    }

    /// Resolves rectangular grid selections to the stored candidate keys.
    ///
    /// Grid column 0 is the source column and cannot be toggled: any
    /// selection touching it is clipped to start at column 1. Grid column
    /// `x` maps to view candidate `x - 1`, and each candidate contributes
    /// its own stable `(rank, source_row)` key regardless of its position
    /// in this view. Cells outside the view are skipped.
    pub fn resolve_selections(&self, selections: &[GridRect]) -> Vec<MatchKey> {
        let mut keys = Vec::new();
        for selection in selections {
            let clipped = selection.clip_source_column();
            for y in clipped.y..clipped.y + clipped.height {
                let Some(row) = self.row(y) else {
                    continue;
                };
                for x in clipped.x..clipped.x + clipped.width {
                    if let Some(candidate) = row.ranked.get(x - 1) {
                        keys.push(MatchKey::new(candidate.rank, candidate.source_row));
                    }
                }
            }
        }
        keys
    }
}

/// A rectangular selection of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl GridRect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn clip_source_column(self) -> Self {
        if self.x == 0 && self.width > 0 {
            Self {
                x: 1,
                width: self.width - 1,
                ..self
            }
        } else {
            self
        }
    }
}
