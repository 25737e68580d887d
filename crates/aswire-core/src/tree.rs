//! Recursive code-range trees (outlines).
//!
//! The parent of a node is never transmitted. Nodes live in an arena and
//! are decoded depth-first: a node is pushed before its children are read,
//! each child is handed the parent's id as an argument, and the child list
//! is attached once all children are complete.

use crate::codec::{wrong_type, FromJson, ObjectReader, ObjectWriter, ProtocolType, ToJson};
use crate::config::RangePolicy;
use crate::cursor::Cursor;
use crate::error::{Problem, Result};
use serde_json::Value;
use std::hash::{Hash, Hasher};

/// Index of a node inside its `Tree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A half-open `[offset, offset + length)` code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub offset: i64,
    pub length: i64,
}

impl TextRange {
    #[must_use]
    pub fn new(offset: i64, length: i64) -> Self {
        Self { offset, length }
    }

    #[must_use]
    pub fn end(&self) -> i64 {
        self.offset.saturating_add(self.length)
    }

    /// A negative length has no range at all.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.length < 0
    }

    #[must_use]
    pub fn contains(&self, other: &TextRange) -> bool {
        !other.is_inverted() && other.offset >= self.offset && other.end() <= self.end()
    }
}

/// The per-node fields of a tree, everything except `children`.
pub trait TreePayload: Sized {
    const TYPE_NAME: &'static str;
    const CHILDREN_KEY: &'static str = "children";

    fn decode(reader: &ObjectReader<'_, '_>) -> Result<Self>;

    fn encode(&self, writer: &mut ObjectWriter);

    /// Range used for containment checks.
    fn range(&self) -> TextRange;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node<T> {
    value: T,
    parent: Option<NodeId>,
    children: Option<Vec<NodeId>>,
}

impl<T> Node<T> {
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The node whose `children` array this node was read from.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Whether the node carries a `children` key at all, possibly empty.
    #[must_use]
    pub fn has_children_key(&self) -> bool {
        self.children.is_some()
    }
}

/// A range problem recorded under `RangePolicy::Flag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeViolation {
    pub node: NodeId,
    pub path: String,
    pub problem: Problem,
}

/// An arena-backed tree. The root is always `NodeId(0)`.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Vec<Node<T>>,
    violations: Vec<RangeViolation>,
}

impl<T> Tree<T> {
    /// A tree with a single root node.
    #[must_use]
    pub fn new(root: T) -> Self {
        Self {
            nodes: vec![Node {
                value: root,
                parent: None,
                children: None,
            }],
            violations: Vec::new(),
        }
    }

    /// Append `value` as the last child of `parent`.
    ///
    /// # Panics
    /// Panics if `parent` does not belong to this tree.
    pub fn push_child(&mut self, parent: NodeId, value: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            value,
            parent: Some(parent),
            children: None,
        });
        self.nodes[parent.0]
            .children
            .get_or_insert_with(Vec::new)
            .push(id);
        id
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<&Node<T>> {
        self.get(id)?.parent.map(|p| self.node(p))
    }

    /// Range problems accepted under `RangePolicy::Flag`.
    #[must_use]
    pub fn violations(&self) -> &[RangeViolation] {
        &self.violations
    }
}

impl<T: TreePayload> Tree<T> {
    fn decode_node(
        &mut self,
        value: &Value,
        parent: Option<NodeId>,
        cx: &Cursor<'_>,
    ) -> Result<NodeId> {
        let reader = ObjectReader::open(value, T::TYPE_NAME, cx)?;
        let payload = T::decode(&reader)?;

        let range = payload.range();
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            value: payload,
            parent,
            children: None,
        });
        if range.is_inverted() {
            let problem = Problem::NegativeLength {
                offset: range.offset,
                length: range.length,
            };
            self.range_problem(id, reader.cursor(), problem)?;
        }

        let Some(children) = reader.get(T::CHILDREN_KEY) else {
            return Ok(id);
        };
        let children_cx = reader.cursor().field(T::CHILDREN_KEY);
        let items = children
            .as_array()
            .ok_or_else(|| wrong_type(&children_cx, "array", children))?;

        let mut ids = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            ids.push(self.decode_node(item, Some(id), &children_cx.index(i))?);
        }
        self.check_ranges(id, &ids, &children_cx)?;
        self.nodes[id.0].children = Some(ids);
        Ok(id)
    }

    /// Checks `children` against the parent range and each other. Inverted
    /// children were already reported when they were decoded.
    fn check_ranges(&mut self, parent: NodeId, children: &[NodeId], cx: &Cursor<'_>) -> Result<()> {
        let outer = self.nodes[parent.0].value.range();
        let mut previous: Option<TextRange> = None;

        for (i, &child) in children.iter().enumerate() {
            let range = self.nodes[child.0].value.range();
            if range.is_inverted() {
                continue;
            }
            let problem = if !outer.is_inverted() && !outer.contains(&range) {
                Some(Problem::RangeNotContained {
                    offset: range.offset,
                    end: range.end(),
                    parent_offset: outer.offset,
                    parent_end: outer.end(),
                })
            } else {
                previous.and_then(|prev| sibling_problem(prev, range))
            };
            previous = Some(range);

            if let Some(problem) = problem {
                let child_cx = cx.index(i);
                self.range_problem(child, &child_cx, problem)?;
            }
        }
        Ok(())
    }

    fn range_problem(&mut self, node: NodeId, cx: &Cursor<'_>, problem: Problem) -> Result<()> {
        match cx.config().tree_ranges {
            RangePolicy::Reject => Err(cx.malformed(problem)),
            RangePolicy::Flag => {
                self.violations.push(RangeViolation {
                    node,
                    path: cx.path(),
                    problem,
                });
                Ok(())
            }
        }
    }

    fn encode_node(&self, id: NodeId) -> Value {
        let node = &self.nodes[id.0];
        let mut writer = ObjectWriter::new();
        node.value.encode(&mut writer);
        if let Some(children) = &node.children {
            let encoded: Vec<Value> = children.iter().map(|&c| self.encode_node(c)).collect();
            writer.put(T::CHILDREN_KEY, &Value::Array(encoded));
        }
        writer.finish()
    }
}

fn sibling_problem(previous: TextRange, range: TextRange) -> Option<Problem> {
    if range.offset < previous.offset {
        Some(Problem::SiblingOutOfOrder {
            offset: range.offset,
            previous_offset: previous.offset,
        })
    } else if range.offset < previous.end() {
        Some(Problem::SiblingOverlap {
            offset: range.offset,
            end: range.end(),
            previous_end: previous.end(),
        })
    } else {
        None
    }
}

impl<T: TreePayload> FromJson for Tree<T> {
    fn from_json(value: &Value, cx: &Cursor<'_>) -> Result<Self> {
        let mut tree = Self {
            nodes: Vec::new(),
            violations: Vec::new(),
        };
        tree.decode_node(value, None, cx)?;
        Ok(tree)
    }

    fn range_violations(&self) -> Vec<&RangeViolation> {
        self.violations.iter().collect()
    }
}

impl<T: TreePayload> ToJson for Tree<T> {
    fn to_json(&self) -> Value {
        self.encode_node(self.root())
    }
}

impl<T: TreePayload> ProtocolType for Tree<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;
}

// Equality and hashing cover the decoded structure only; recorded
// violations are derived from it.
impl<T: PartialEq> PartialEq for Tree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl<T: Eq> Eq for Tree<T> {}

impl<T: Hash> Hash for Tree<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nodes.hash(state);
    }
}
