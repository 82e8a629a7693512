//! Pins the exact repeat-budget arithmetic.
//!
//! Rules under test: a step arms its budget the first time it is applied
//! in a run; entering a `get`/`include` list adds one unit per entry while
//! the budget is positive; applying a step without entries spends one unit
//! and reapplies the armed step, stopping at exactly zero.

use ctxdiag_collect::{Instruction, StepId, collect};
use ctxdiag_core::{Model, ModelGraph};
use pretty_assertions::assert_eq;

const CHAIN: &str = r#"
elements:
  - { uuid: A, type: Node, links: { c: [B] } }
  - { uuid: B, type: Node, links: { c: [C] } }
  - { uuid: C, type: Node, links: { c: [D] } }
  - { uuid: D, type: Node }
"#;

const TREE: &str = r#"
elements:
  - { uuid: A, type: Node, links: { c: [B] } }
  - { uuid: B, type: Node, links: { c: [C1, C2] } }
  - { uuid: C1, type: Node, links: { c: [D1, D2] } }
  - { uuid: C2, type: Node, links: { c: [D3, D4] } }
  - { uuid: D1, type: Node }
  - { uuid: D2, type: Node }
  - { uuid: D3, type: Node }
  - { uuid: D4, type: Node }
"#;

const FORK: &str = r#"
elements:
  - { uuid: A, type: Node, links: { c: [B], d: [C] } }
  - { uuid: B, type: Node }
  - { uuid: C, type: Node }
"#;

struct Case {
    label: &'static str,
    graph: &'static str,
    instructions: &'static str,
    collected: &'static [&'static str],
    remaining: u32,
    active: Option<u32>,
}

const CASES: &[Case] = &[
    Case {
        label: "childless target repeat spends itself down to zero",
        graph: CHAIN,
        instructions: "include: { name: c, repeat: 3 }",
        collected: &["B"],
        remaining: 0,
        active: Some(1),
    },
    Case {
        label: "repeat zero never arms",
        graph: CHAIN,
        instructions: "include: { name: c, repeat: 0 }",
        collected: &["B"],
        remaining: 0,
        active: None,
    },
    Case {
        label: "root repeat 0 stops after one hop",
        graph: CHAIN,
        instructions: "{ repeat: 0, include: { name: c } }",
        collected: &["B"],
        remaining: 0,
        active: None,
    },
    Case {
        label: "root repeat 1 walks the whole chain",
        graph: CHAIN,
        instructions: "{ repeat: 1, include: { name: c } }",
        collected: &["B", "C", "D"],
        remaining: 2,
        active: Some(0),
    },
    Case {
        label: "root repeat 2 ends one above its start",
        graph: CHAIN,
        instructions: "{ repeat: 2, include: { name: c } }",
        collected: &["B", "C", "D"],
        remaining: 3,
        active: Some(0),
    },
    Case {
        label: "target repeat 0 on a tree stops at the second level",
        graph: TREE,
        instructions: "include: { name: c, repeat: 0, include: { name: c } }",
        collected: &["B", "C1", "C2"],
        remaining: 0,
        active: None,
    },
    Case {
        label: "target repeat 1 on a tree reaches the leaves depth first",
        graph: TREE,
        instructions: "include: { name: c, repeat: 1, include: { name: c } }",
        collected: &["B", "C1", "D1", "D2", "C2", "D3", "D4"],
        remaining: 2,
        active: Some(1),
    },
    Case {
        label: "inner repeat replaces the outer one",
        graph: CHAIN,
        instructions: "{ repeat: 5, include: { name: c, repeat: 2 } }",
        collected: &["B"],
        remaining: 0,
        active: Some(1),
    },
    Case {
        label: "each sibling target adds one unit",
        graph: FORK,
        instructions: "{ repeat: 1, include: [ { name: c }, { name: d } ] }",
        collected: &["B", "C"],
        remaining: 5,
        active: Some(0),
    },
];

#[test]
fn repeat_budget_table() {
    for case in CASES {
        let model = Model::from_yaml_str(case.graph).expect(case.label);
        let instructions = Instruction::from_yaml_str(case.instructions).expect(case.label);
        let start = model.by_id("A").expect(case.label);

        let mut collector = collect(&model, start, &instructions).expect(case.label);
        let collected: Vec<&str> = collector.by_ref().map(|n| model.uuid(n)).collect();

        assert_eq!(collected, case.collected, "{}", case.label);
        assert_eq!(
            collector.state().remaining_repeat_depth(),
            case.remaining,
            "{}",
            case.label
        );
        assert_eq!(
            collector.state().active_repeat(),
            case.active.map(StepId),
            "{}",
            case.label
        );
    }
}

#[test]
fn silent_repeat_walks_a_ring_until_it_closes() {
    let mut yaml = String::from("elements:\n");
    for i in 0..200 {
        yaml.push_str(&format!(
            "  - {{ uuid: n{i}, type: Node, links: {{ children: [n{}] }} }}\n",
            (i + 1) % 200
        ));
    }
    let model = Model::from_yaml_str(&yaml).unwrap();
    let start = model.by_id("n0").unwrap();

    for repeat in [1, 3, 10] {
        let instructions = Instruction::default().with_include(
            Instruction::target("children")
                .with_repeat(repeat)
                .with_get(Instruction::target("children")),
        );
        let mut collector = collect(&model, start, &instructions).unwrap();
        let collected: Vec<&str> = collector.by_ref().map(|n| model.uuid(n)).collect();
        assert_eq!(collected, vec!["n1"], "repeat {repeat}");
        assert_eq!(collector.state().visited_len(), 200, "repeat {repeat}");
    }
}
