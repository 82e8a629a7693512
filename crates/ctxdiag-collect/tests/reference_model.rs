//! Checks the work-stack collector against a plain recursive walk.
//!
//! The recursive walk below is the textbook form of the traversal. Both
//! must agree on the emitted order and on the final repeat state for every
//! start element and every instruction document.

use std::collections::HashSet;

use ctxdiag_collect::{Instruction, collect};
use ctxdiag_core::{AttrValue, ElementId, Model, ModelGraph};
use pretty_assertions::assert_eq;

const WEB: &str = r#"
name: web
elements:
  - uuid: sys
    type: SystemComponent
    name: System
    links: { exchanges: [ce1, ce2] }
    owned:
      - uuid: lc1
        type: LogicalComponent
        name: Controller
        attributes: { layer: core, weight: 1 }
        links: { ports: [p1, p2], allocated: [f1, f2] }
        owned:
          - { uuid: p1, type: ComponentPort, links: { exchanges: [ce1] } }
          - { uuid: p2, type: ComponentPort, links: { exchanges: [ce2] } }
      - uuid: lc2
        type: LogicalComponent
        name: Sensor
        attributes: { layer: edge, weight: 2 }
        links: { ports: [p3], allocated: [f3] }
        owned:
          - { uuid: p3, type: ComponentPort, links: { exchanges: [ce1, ce2] } }
      - uuid: lc3
        type: LogicalComponent
        name: Actuator
        attributes: { layer: edge, weight: 2.0 }
        links: { ports: [p4], allocated: [f2, f3] }
        owned:
          - { uuid: p4, type: ComponentPort, links: { exchanges: [ce2] } }
      - { uuid: ce1, type: ComponentExchange, links: { source: p1, target: p3, ends: [p1, p3] } }
      - { uuid: ce2, type: ComponentExchange, links: { source: p2, target: p4, ends: [p2, p3, p4] } }
      - uuid: functions
        type: LogicalFunctionPkg
        owned:
          - { uuid: f1, type: LogicalFunction, attributes: { layer: core }, links: { next: [f2] } }
          - { uuid: f2, type: LogicalFunction, attributes: { layer: edge }, links: { next: [f3, f1] } }
          - { uuid: f3, type: LogicalFunction, attributes: { layer: edge }, links: { next: [f1] } }
"#;

const DOCUMENTS: &[&str] = &[
    "include: { name: owned }",
    "include: { name: owned, include: { name: owned } }",
    "include: { name: owned, filter: { type: LogicalComponent }, include: { name: ports } }",
    "include: [ { name: ports, include: { name: exchanges } }, { name: allocated } ]",
    "get: { name: ports, get: { name: exchanges, include: { name: ends } } }",
    "get: { name: parent, include: { name: owned, filter: { layer: edge } } }",
    "include: { name: owned, filter: { weight: 2 } }",
    "{ repeat: 2, include: { name: next } }",
    "{ repeat: 3, include: [ { name: owned }, { name: allocated } ] }",
    "include: { name: next, repeat: 1, include: { name: next } }",
    "include: { name: allocated, repeat: 4 }",
    "get: { name: owned, repeat: 2, include: { name: ports, include: { name: exchanges, get: { name: target } } } }",
    "include: [ { name: source }, { name: target, include: { name: parent } }, { name: ends } ]",
    "include: { name: exchanges, include: [ { name: source, include: { name: parent } }, { name: target } ] }",
    "{ repeat: 1, get: { name: parent }, include: { name: owned, filter: { layer: core } } }",
];

#[derive(Default)]
struct Reference<'i> {
    visited: HashSet<ElementId>,
    armed: HashSet<*const Instruction>,
    active: Option<&'i Instruction>,
    depth: u32,
    out: Vec<ElementId>,
}

impl<'i> Reference<'i> {
    fn apply(&mut self, model: &Model, node: ElementId, instruction: &'i Instruction) {
        if let Some(repeat) = instruction.repeat
            && repeat > 0
            && self.armed.insert(instruction as *const Instruction)
        {
            self.active = Some(instruction);
            self.depth = repeat;
        }

        let get = instruction.get_targets();
        let include = instruction.include_targets();
        if get.is_empty() && include.is_empty() {
            if self.depth != 0
                && let Some(active) = self.active
            {
                self.depth -= 1;
                self.apply(model, node, active);
            }
            return;
        }

        for (targets, emit) in [(get, false), (include, true)] {
            if !targets.is_empty() && self.depth > 0 {
                self.depth += targets.len() as u32;
            }
            for target in targets {
                let name = target.name.as_deref().unwrap_or_default();
                let (candidates, filtered) = match model.attribute(node, name) {
                    AttrValue::Many(nodes) => (nodes.into_owned(), true),
                    AttrValue::Single(single) => (vec![single], false),
                    AttrValue::Absent | AttrValue::Scalar(_) => continue,
                };
                for candidate in candidates {
                    if !self.visited.insert(candidate) {
                        continue;
                    }
                    if filtered && !matches(model, candidate, target) {
                        continue;
                    }
                    if emit {
                        self.out.push(candidate);
                    }
                    self.apply(model, candidate, target);
                }
            }
        }
    }
}

fn matches(model: &Model, node: ElementId, target: &Instruction) -> bool {
    target.filter.iter().flatten().all(|(key, expected)| {
        model
            .attribute(node, key)
            .as_scalar()
            .is_some_and(|actual| actual == expected)
    })
}

#[test]
fn collector_matches_recursive_walk() {
    let model = Model::from_yaml_str(WEB).unwrap();
    let documents: Vec<Instruction> = DOCUMENTS
        .iter()
        .map(|doc| Instruction::from_yaml_str(doc).unwrap())
        .collect();

    let mut nonempty = 0;
    for (doc, instructions) in DOCUMENTS.iter().zip(&documents) {
        for element in model.elements() {
            let start = element.id;

            let mut reference = Reference::default();
            reference.visited.insert(start);
            reference.apply(&model, start, instructions);

            let mut collector = collect(&model, start, instructions).unwrap();
            let collected: Vec<ElementId> = collector.by_ref().collect();

            let label = format!("{doc} from {}", model.uuid(start));
            assert_eq!(collected, reference.out, "{label}");
            assert_eq!(
                collector.state().remaining_repeat_depth(),
                reference.depth,
                "{label}"
            );
            assert_eq!(
                collector.state().visited_len(),
                reference.visited.len(),
                "{label}"
            );
            if !collected.is_empty() {
                nonempty += 1;
            }
        }
    }
    assert!(nonempty > DOCUMENTS.len());
}

#[test]
fn known_answers_on_the_web() {
    let model = Model::from_yaml_str(WEB).unwrap();
    let run = |start: &str, doc: &str| -> Vec<&str> {
        let start = model.by_id(start).unwrap();
        collect(&model, start, &Instruction::from_yaml_str(doc).unwrap())
            .unwrap()
            .uuids()
    };

    assert_eq!(
        run(
            "sys",
            "include: { name: owned, filter: { type: LogicalComponent }, include: { name: ports } }"
        ),
        vec!["lc1", "p1", "p2", "lc2", "p3", "lc3", "p4"]
    );
    assert_eq!(
        run("lc1", "include: { name: owned, filter: { weight: 2 } }"),
        Vec::<&str>::new()
    );
    assert_eq!(
        run("lc2", "get: { name: parent, include: { name: owned, filter: { weight: 2 } } }"),
        vec!["lc3"]
    );
    assert_eq!(
        run("f1", "{ repeat: 2, include: { name: next } }"),
        vec!["f2", "f3"]
    );
}
