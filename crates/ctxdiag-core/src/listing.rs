//! Element listing for target pickers.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{Element, ElementId, Model};

/// Element types offered as diagram targets by default.
pub const DEFAULT_LISTED_KINDS: [&str; 16] = [
    "Entity",
    "OperationalActivity",
    "OperationalCapability",
    "CommunicationMean",
    "Mission",
    "Capability",
    "SystemComponent",
    "SystemFunction",
    "LogicalComponent",
    "LogicalFunction",
    "PhysicalComponent",
    "PhysicalFunction",
    "PhysicalLink",
    "PhysicalPort",
    "ComponentExchange",
    "Class",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSummary {
    pub uuid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&Element> for ElementSummary {
    fn from(element: &Element) -> Self {
        Self {
            uuid: element.uuid.clone(),
            name: element.name.clone(),
            kind: element.kind.clone(),
        }
    }
}

/// Which element types a listing keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindSelection {
    All,
    Only(HashSet<String>),
}

impl Default for KindSelection {
    fn default() -> Self {
        Self::only(DEFAULT_LISTED_KINDS)
    }
}

impl KindSelection {
    pub fn only<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KindSelection::Only(kinds.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, kind: &str) -> bool {
        match self {
            KindSelection::All => true,
            KindSelection::Only(kinds) => kinds.contains(kind),
        }
    }
}

impl Model {
    /// Walk containment depth-first from the roots and summarize every
    /// element whose type is selected.
    pub fn list_elements(&self, selection: &KindSelection) -> Vec<ElementSummary> {
        let mut listed = Vec::new();
        let mut stack: Vec<ElementId> = self.roots().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let element = self.element(id);
            if selection.matches(&element.kind) {
                listed.push(ElementSummary::from(element));
            }
            stack.extend(element.owned.iter().rev().copied());
        }
        listed
    }
}
