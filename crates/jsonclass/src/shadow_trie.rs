//! The shadow-class trie: a persistent, mutable trie of object key
//! sequences that memoises each distinct sequence into a single shared
//! [`ObjectClass`].
//!
//! Most JSON documents reuse a handful of distinct key sets across many
//! objects (log records, change-feed payloads, CDC events). Walking this
//! trie as each object's keys are parsed turns "build a new class for every
//! object" into "one hashmap lookup per key, amortised to zero allocations
//! after the first occurrence of a given key sequence".
//!
//! # Arena, not pointers
//!
//! Rust's ownership model doesn't want a graph of nodes holding both parent
//! back-references and child forward-references as raw pointers or `Rc`
//! cycles. Instead this trie is an arena: a single `Vec<TrieNode>` indexed by
//! `u32`, with `parent` stored as an `Option<u32>`. The root occupies index
//! `0`; children own nothing directly but are reachable from their parent's
//! child map, and a node's `parent` link is used only to walk back up when
//! materialising its [`ObjectClass`].

use alloc::{boxed::Box, rc::Rc, vec::Vec};
use core::cell::OnceCell;

use hashbrown::HashMap;

use crate::{class::ObjectClass, error::ParseErrorKind};

/// Sentinel depth used by the root node, matching "index = MAX" from the
/// reference design.
const ROOT_INDEX: u32 = u32::MAX;

struct TrieNode {
    parent: Option<u32>,
    /// The raw, possibly-escaped key text that labels the edge from `parent`
    /// to this node. Unused (empty) for the root.
    name: Box<[u8]>,
    children: HashMap<Box<[u8]>, u32>,
    /// Depth of this node's key sequence; `ROOT_INDEX` for the root.
    index: u32,
    usage: u64,
    class: OnceCell<Rc<ObjectClass>>,
}

impl TrieNode {
    fn root() -> Self {
        Self {
            parent: None,
            name: Box::from([]),
            children: HashMap::new(),
            index: ROOT_INDEX,
            usage: 0,
            class: OnceCell::new(),
        }
    }

    /// Number of keys in the sequence ending at this node; `0` for the root.
    fn size(&self) -> u32 {
        if self.index == ROOT_INDEX {
            0
        } else {
            self.index + 1
        }
    }
}

/// An opaque handle to a position in the [`ShadowTrie`], returned by
/// [`ShadowTrie::start_walk`] and [`ShadowTrie::get_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieCursor(u32);

/// The persistent trie of object key sequences.
///
/// A `ShadowTrie` is owned by a single [`Parser`](crate::parser::Parser) and
/// accumulates over that parser's lifetime: repeated key sequences, whether
/// within one document or across many parses by the same parser, resolve to
/// the same [`ObjectClass`] (compared by [`Rc::ptr_eq`]).
pub struct ShadowTrie {
    nodes: Vec<TrieNode>,
}

impl Default for ShadowTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl ShadowTrie {
    /// Creates a trie containing only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: alloc::vec![TrieNode::root()],
        }
    }

    /// Begins a walk at the root, bumping its usage counter, and returns a
    /// cursor to resume from.
    pub fn start_walk(&mut self) -> TrieCursor {
        self.nodes[0].usage = self.nodes[0].usage.saturating_add(1);
        TrieCursor(0)
    }

    /// Advances `cursor` by one key, creating the child node for `name` if
    /// it does not already exist.
    pub fn get_next(&mut self, cursor: TrieCursor, name: &[u8]) -> TrieCursor {
        let parent_idx = cursor.0;
        if let Some(&child_idx) = self.nodes[parent_idx as usize].children.get(name) {
            self.nodes[child_idx as usize].usage =
                self.nodes[child_idx as usize].usage.saturating_add(1);
            return TrieCursor(child_idx);
        }

        let child_index = self.nodes[parent_idx as usize].size();
        let node = TrieNode {
            parent: Some(parent_idx),
            name: Box::from(name),
            children: HashMap::new(),
            index: child_index,
            usage: 1,
            class: OnceCell::new(),
        };
        let new_idx = self.nodes.len() as u32;
        self.nodes.push(node);
        self.nodes[parent_idx as usize]
            .children
            .insert(Box::from(name), new_idx);
        TrieCursor(new_idx)
    }

    /// Materialises (on first call) and returns the shared [`ObjectClass`]
    /// for the key sequence ending at `cursor`.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseErrorKind`] raised while decoding a key in the
    /// sequence (a truncated or malformed `\u` escape, or a lone surrogate
    /// half). A failed decode is not cached, so a later call with the same
    /// malformed key fails the same way rather than reusing a bad result.
    pub fn get_class(&mut self, cursor: TrieCursor) -> Result<Rc<ObjectClass>, ParseErrorKind> {
        if let Some(class) = self.nodes[cursor.0 as usize].class.get() {
            return Ok(Rc::clone(class));
        }

        let class = if cursor.0 == 0 {
            Rc::new(ObjectClass::empty())
        } else {
            let len = self.nodes[cursor.0 as usize].size() as usize;
            let mut names: Vec<Box<[u8]>> = alloc::vec![Box::<[u8]>::default(); len];
            let mut walk = Some(cursor.0);
            while let Some(idx) = walk {
                let node = &self.nodes[idx as usize];
                if node.index == ROOT_INDEX {
                    break;
                }
                names[node.index as usize] = node.name.clone();
                walk = node.parent;
            }
            Rc::new(ObjectClass::build(names)?)
        };

        let _ = self.nodes[cursor.0 as usize].class.set(Rc::clone(&class));
        Ok(class)
    }

    /// Number of distinct key sequences discovered so far, including the
    /// root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root has been discovered so far.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// How many times the node at `cursor` has been visited by
    /// [`ShadowTrie::start_walk`] or [`ShadowTrie::get_next`].
    #[must_use]
    pub fn usage(&self, cursor: TrieCursor) -> u64 {
        self.nodes[cursor.0 as usize].usage
    }
}
