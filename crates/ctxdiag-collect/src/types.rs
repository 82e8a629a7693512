//! Options and per-run state for collection.

use std::collections::HashSet;
use std::hash::Hash;

use crate::program::StepId;

/// Which element a target's `filter` is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterSubject {
    /// The newly resolved candidate (default)
    #[default]
    Candidate,
    /// The element the attribute was resolved on. Only kept to compare
    /// against collections made with that older rule.
    Parent,
}

/// Options for a collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOption {
    /// Mark the start element visited before traversal, so cycles leading
    /// back to it never emit it.
    pub visit_target: bool,
    pub filter_subject: FilterSubject,
}

impl Default for CollectOption {
    fn default() -> Self {
        Self {
            visit_target: true,
            filter_subject: FilterSubject::Candidate,
        }
    }
}

impl CollectOption {
    pub fn with_visit_target(mut self, visit_target: bool) -> Self {
        self.visit_target = visit_target;
        self
    }

    pub fn with_filter_subject(mut self, filter_subject: FilterSubject) -> Self {
        self.filter_subject = filter_subject;
        self
    }
}

/// Mutable bookkeeping owned by exactly one collection run.
#[derive(Debug, Clone)]
pub struct CollectorState<N> {
    pub(crate) visited: HashSet<N>,
    /// Steps whose `repeat` has already been spent this run
    pub(crate) armed: HashSet<StepId>,
    pub(crate) active_repeat: Option<StepId>,
    pub(crate) remaining_repeat_depth: u32,
}

impl<N: Eq + Hash> CollectorState<N> {
    pub fn new() -> Self {
        Self {
            visited: HashSet::new(),
            armed: HashSet::new(),
            active_repeat: None,
            remaining_repeat_depth: 0,
        }
    }

    pub fn is_visited(&self, node: &N) -> bool {
        self.visited.contains(node)
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// The most recently armed repeat step, if any.
    pub fn active_repeat(&self) -> Option<StepId> {
        self.active_repeat
    }

    pub fn remaining_repeat_depth(&self) -> u32 {
        self.remaining_repeat_depth
    }
}

impl<N: Eq + Hash> Default for CollectorState<N> {
    fn default() -> Self {
        Self::new()
    }
}
