use std::borrow::Cow;
use std::fmt::Debug;
use std::hash::Hash;

use crate::Result;
use crate::value::Scalar;

/// The resolved value of a named attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue<'a, N: Clone> {
    /// Unknown attribute, or a single reference that is unset.
    Absent,
    Scalar(Cow<'a, Scalar>),
    Single(N),
    Many(Cow<'a, [N]>),
}

impl<'a, N: Clone> AttrValue<'a, N> {
    pub fn is_absent(&self) -> bool {
        matches!(self, AttrValue::Absent)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            AttrValue::Scalar(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Nodes referenced by this value, in attribute order.
    pub fn nodes(&self) -> &[N] {
        match self {
            AttrValue::Single(n) => std::slice::from_ref(n),
            AttrValue::Many(ns) => ns.as_ref(),
            AttrValue::Absent | AttrValue::Scalar(_) => &[],
        }
    }
}

/// Read-only view of an attribute-linked graph.
///
/// Implementations must tolerate concurrent reads: independent collections
/// run against one shared graph.
pub trait ModelGraph {
    /// Stable node handle, usable as a set key.
    type Node: Copy + Eq + Hash + Debug;

    /// Look up a node by uuid; fails with `ElementNotFound`.
    fn by_id(&self, uuid: &str) -> Result<Self::Node>;

    /// Resolve a named attribute. Unknown names resolve to `Absent`.
    fn attribute(&self, node: Self::Node, name: &str) -> AttrValue<'_, Self::Node>;

    fn uuid(&self, node: Self::Node) -> &str;
}
