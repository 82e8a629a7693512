//! Instruction trees compiled into a flat, validated step table.
//!
//! Compiling gives every instruction a stable [`StepId`] for the run
//! (the collector tracks repeat arming per step) and rejects target entries
//! without a `name` before any traversal happens.

use ctxdiag_core::{Error, Result, Scalar};

use crate::instruction::Instruction;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
pub struct StepId(pub u32);

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StepId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Attribute to resolve; always set on target steps
    pub name: Option<String>,
    pub filter: Vec<(String, Scalar)>,
    /// 0 when the instruction carries no repeat
    pub repeat: u32,
    pub get: Vec<StepId>,
    pub include: Vec<StepId>,
}

impl Step {
    pub fn has_targets(&self) -> bool {
        !self.get.is_empty() || !self.include.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    steps: Vec<Step>,
}

impl Program {
    pub fn compile(root: &Instruction) -> Result<Self> {
        let mut program = Program { steps: Vec::new() };
        program.lower(root, "", false)?;
        Ok(program)
    }

    /// The root step is always the first one.
    pub fn root(&self) -> StepId {
        StepId(0)
    }

    pub fn step(&self, id: StepId) -> &Step {
        &self.steps[id.index()]
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn lower(&mut self, instruction: &Instruction, path: &str, is_target: bool) -> Result<StepId> {
        let name = instruction.name.clone().filter(|name| !name.is_empty());
        if is_target && name.is_none() {
            return Err(Error::config_invalid("attribute name is required")
                .with_operation("program::compile")
                .with_context("path", path));
        }

        let id = StepId(self.steps.len() as u32);
        self.steps.push(Step {
            name,
            filter: instruction
                .filter
                .iter()
                .flatten()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            repeat: instruction.repeat.unwrap_or(0),
            get: Vec::new(),
            include: Vec::new(),
        });

        let get = self.lower_all(instruction.get_targets(), path, "get")?;
        let include = self.lower_all(instruction.include_targets(), path, "include")?;
        let step = &mut self.steps[id.index()];
        step.get = get;
        step.include = include;
        Ok(id)
    }

    fn lower_all(&mut self, targets: &[Instruction], path: &str, key: &str) -> Result<Vec<StepId>> {
        targets
            .iter()
            .enumerate()
            .map(|(index, target)| {
                let child_path = if path.is_empty() {
                    format!("{key}[{index}]")
                } else {
                    format!("{path}.{key}[{index}]")
                };
                self.lower(target, &child_path, true)
            })
            .collect()
    }
}
