//! The collector: an instruction interpreter over a [`ModelGraph`].
//!
//! Traversal runs on an explicit work stack instead of recursion. Each
//! frame is one suspended piece of the recursive procedure:
//!
//! - `Apply`: apply a step to an element (arm repeat, schedule targets, or
//!   fall back to the armed repeat step)
//! - `Targets`: walk the `get` or `include` entries of a step
//! - `Candidates`: walk the elements one target entry resolved to
//!
//! Frames are pushed so the pop order is exactly the depth-first order of
//! the recursive procedure; `next()` pops until a frame emits an element.

use std::borrow::Cow;

use tracing::{debug, trace};

use ctxdiag_core::{AttrValue, ModelGraph, Result};

use crate::instruction::Instruction;
use crate::program::{Program, StepId};
use crate::types::{CollectOption, CollectorState, FilterSubject};

/// Collect with default options, starting at `target`.
///
/// Fails only if the instruction tree is malformed; the returned iterator
/// itself never fails.
pub fn collect<'g, G: ModelGraph>(
    graph: &'g G,
    target: G::Node,
    instructions: &Instruction,
) -> Result<Collector<'g, G>> {
    collect_with(graph, target, instructions, CollectOption::default())
}

pub fn collect_with<'g, G: ModelGraph>(
    graph: &'g G,
    target: G::Node,
    instructions: &Instruction,
    option: CollectOption,
) -> Result<Collector<'g, G>> {
    let program = Program::compile(instructions).map_err(|err| err.with_operation("collect"))?;
    Ok(Collector::new(graph, target, program, option))
}

/// Resolve the start element by uuid, then collect.
pub fn collect_by_id<'g, G: ModelGraph>(
    graph: &'g G,
    uuid: &str,
    instructions: &Instruction,
    option: CollectOption,
) -> Result<Collector<'g, G>> {
    let target = graph.by_id(uuid)?;
    collect_with(graph, target, instructions, option)
}

enum Frame<'g, N: Clone> {
    Apply {
        node: N,
        step: StepId,
    },
    Targets {
        node: N,
        step: StepId,
        emit: bool,
        next: usize,
        entered: bool,
    },
    Candidates {
        parent: N,
        target: StepId,
        emit: bool,
        filtered: bool,
        nodes: Cow<'g, [N]>,
        next: usize,
    },
}

/// Lazy, forward-only sequence of collected elements.
///
/// Owns its [`CollectorState`]; dropping it abandons the run.
pub struct Collector<'g, G: ModelGraph> {
    graph: &'g G,
    program: Program,
    option: CollectOption,
    target: G::Node,
    state: CollectorState<G::Node>,
    stack: Vec<Frame<'g, G::Node>>,
    emitted: usize,
    finished: bool,
}

impl<'g, G: ModelGraph> Collector<'g, G> {
    pub fn new(graph: &'g G, target: G::Node, program: Program, option: CollectOption) -> Self {
        let mut state = CollectorState::new();
        if option.visit_target {
            state.visited.insert(target);
        }
        let stack = vec![Frame::Apply {
            node: target,
            step: program.root(),
        }];

        debug!(
            start = graph.uuid(target),
            steps = program.len(),
            "collection started"
        );
        Self {
            graph,
            program,
            option,
            target,
            state,
            stack,
            emitted: 0,
            finished: false,
        }
    }

    pub fn target(&self) -> G::Node {
        self.target
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn state(&self) -> &CollectorState<G::Node> {
        &self.state
    }

    /// Number of elements yielded so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Drain the run into element uuids.
    pub fn uuids(self) -> Vec<&'g str> {
        let graph = self.graph;
        self.map(|node| graph.uuid(node)).collect()
    }

    fn apply(&mut self, node: G::Node, step_id: StepId) {
        let step = self.program.step(step_id);

        if step.repeat > 0 && self.state.armed.insert(step_id) {
            self.state.active_repeat = Some(step_id);
            self.state.remaining_repeat_depth = step.repeat;
            debug!(step = %step_id, repeat = step.repeat, "repeat armed");
        }

        if step.has_targets() {
            if !step.include.is_empty() {
                self.stack.push(Frame::Targets {
                    node,
                    step: step_id,
                    emit: true,
                    next: 0,
                    entered: false,
                });
            }
            if !step.get.is_empty() {
                self.stack.push(Frame::Targets {
                    node,
                    step: step_id,
                    emit: false,
                    next: 0,
                    entered: false,
                });
            }
        } else if self.state.remaining_repeat_depth != 0
            && let Some(active) = self.state.active_repeat
        {
            self.state.remaining_repeat_depth -= 1;
            trace!(
                step = %active,
                remaining = self.state.remaining_repeat_depth,
                "repeat step reapplied"
            );
            self.stack.push(Frame::Apply { node, step: active });
        }
    }

    fn resolve_targets(
        &mut self,
        node: G::Node,
        step_id: StepId,
        emit: bool,
        next: usize,
        entered: bool,
    ) {
        let step = self.program.step(step_id);
        let targets = if emit { &step.include } else { &step.get };

        // Every sibling target costs one unit against an armed budget.
        if !entered && self.state.remaining_repeat_depth > 0 {
            self.state.remaining_repeat_depth = self
                .state
                .remaining_repeat_depth
                .saturating_add(targets.len() as u32);
        }

        let Some(&target) = targets.get(next) else {
            return;
        };
        if next + 1 < targets.len() {
            self.stack.push(Frame::Targets {
                node,
                step: step_id,
                emit,
                next: next + 1,
                entered: true,
            });
        }

        let Some(name) = self.program.step(target).name.as_deref() else {
            return;
        };
        let graph: &'g G = self.graph;
        match graph.attribute(node, name) {
            AttrValue::Many(nodes) => self.stack.push(Frame::Candidates {
                parent: node,
                target,
                emit,
                filtered: true,
                nodes,
                next: 0,
            }),
            AttrValue::Single(single) => self.stack.push(Frame::Candidates {
                parent: node,
                target,
                emit,
                filtered: false,
                nodes: Cow::Owned(vec![single]),
                next: 0,
            }),
            AttrValue::Absent | AttrValue::Scalar(_) => {
                trace!(attribute = name, "attribute yields no elements");
            }
        }
    }

    fn walk_candidates(
        &mut self,
        parent: G::Node,
        target: StepId,
        emit: bool,
        filtered: bool,
        nodes: Cow<'g, [G::Node]>,
        mut next: usize,
    ) -> Option<G::Node> {
        while next < nodes.len() {
            let candidate = nodes[next];
            next += 1;

            if !self.state.visited.insert(candidate) {
                continue;
            }
            if filtered && !self.matches_filters(parent, candidate, target) {
                continue;
            }

            if next < nodes.len() {
                self.stack.push(Frame::Candidates {
                    parent,
                    target,
                    emit,
                    filtered,
                    nodes,
                    next,
                });
            }
            self.stack.push(Frame::Apply {
                node: candidate,
                step: target,
            });

            if emit {
                self.emitted += 1;
                trace!(uuid = self.graph.uuid(candidate), "element collected");
                return Some(candidate);
            }
            return None;
        }
        None
    }

    fn matches_filters(&self, parent: G::Node, candidate: G::Node, target: StepId) -> bool {
        let subject = match self.option.filter_subject {
            FilterSubject::Candidate => candidate,
            FilterSubject::Parent => parent,
        };
        self.program
            .step(target)
            .filter
            .iter()
            .all(|(key, expected)| {
                self.graph
                    .attribute(subject, key)
                    .as_scalar()
                    .is_some_and(|actual| actual == expected)
            })
    }
}

impl<G: ModelGraph> Iterator for Collector<'_, G> {
    type Item = G::Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Apply { node, step } => self.apply(node, step),
                Frame::Targets {
                    node,
                    step,
                    emit,
                    next,
                    entered,
                } => self.resolve_targets(node, step, emit, next, entered),
                Frame::Candidates {
                    parent,
                    target,
                    emit,
                    filtered,
                    nodes,
                    next,
                } => {
                    if let Some(node) =
                        self.walk_candidates(parent, target, emit, filtered, nodes, next)
                    {
                        return Some(node);
                    }
                }
            }
        }

        if !self.finished {
            self.finished = true;
            debug!(
                emitted = self.emitted,
                visited = self.state.visited_len(),
                "collection finished"
            );
        }
        None
    }
}
