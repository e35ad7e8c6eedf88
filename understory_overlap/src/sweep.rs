// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broad phase: sweep-and-prune over entry bounds along the x axis.

use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::Point;

use crate::entry::CheckEntry;

/// Whether an event opens or closes an entry's interval on the sweep axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum EventKind {
    /// Closes an interval. Sorts before a begin at the same point.
    End,
    /// Opens an interval.
    Begin,
}

/// One end of an entry's bounds on the sweep axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SweepEvent {
    pub(crate) point: Point,
    pub(crate) entry: usize,
    pub(crate) kind: EventKind,
}

impl SweepEvent {
    /// Ascending sweep order: x, then y, then kind, then entry index.
    fn sweep_order(&self, other: &Self) -> Ordering {
        self.point
            .x
            .total_cmp(&other.point.x)
            .then_with(|| self.point.y.total_cmp(&other.point.y))
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.entry.cmp(&other.entry))
    }
}

/// Reusable event and active-set storage for the sweep.
#[derive(Debug, Default)]
pub(crate) struct SweepScratch {
    events: Vec<SweepEvent>,
    active: Vec<usize>,
}

impl SweepScratch {
    pub(crate) fn clear(&mut self) {
        self.events = Vec::new();
        self.active = Vec::new();
    }

    /// Calls `candidate(new, active)` once for every pair of entries whose
    /// intervals are open at the same time on the sweep axis.
    ///
    /// `new` is the entry that just opened; `active` one that was already open.
    pub(crate) fn for_each_candidate<O, F>(
        &mut self,
        entries: &[CheckEntry<'_, O>],
        mut candidate: F,
    ) where
        F: FnMut(usize, usize),
    {
        self.events.clear();
        self.active.clear();
        self.events.reserve(entries.len() * 2);
        for (i, e) in entries.iter().enumerate() {
            self.events.push(SweepEvent {
                point: Point::new(e.bounds.x0, e.bounds.y0),
                entry: i,
                kind: EventKind::Begin,
            });
            self.events.push(SweepEvent {
                point: Point::new(e.bounds.x1, e.bounds.y1),
                entry: i,
                kind: EventKind::End,
            });
        }
        // Descending, so popping from the back walks the axis in increasing order.
        self.events.sort_unstable_by(|a, b| b.sweep_order(a));

        while let Some(event) = self.events.pop() {
            match event.kind {
                EventKind::Begin => {
                    for &other in &self.active {
                        candidate(event.entry, other);
                    }
                    self.active.push(event.entry);
                }
                EventKind::End => {
                    if let Some(pos) = self.active.iter().position(|&i| i == event.entry) {
                        self.active.swap_remove(pos);
                    }
                }
            }
        }
        debug_assert!(
            self.active.is_empty(),
            "every begin event must be matched by an end event"
        );
    }
}
