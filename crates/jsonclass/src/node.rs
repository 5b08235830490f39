//! Assembly-buffer node records and the document they live in.

use alloc::{boxed::Box, rc::Rc, string::String, vec::Vec};
use core::fmt;

use crate::{class::ObjectClass, string_codec};

/// A half-open range of indices into a [`Document`]'s assembly buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    start: u32,
    len: u32,
}

impl Span {
    pub(crate) fn new(start: usize, len: usize) -> Self {
        Self {
            start: start as u32,
            len: len as u32,
        }
    }

    /// Number of nodes covered by this span.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether this span covers no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn range(self) -> core::ops::Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

/// One record in the parser's assembly buffer.
///
/// A `Node` never owns a subtree directly: composite variants
/// ([`Array`](Node::Array), [`Object`](Node::Object), [`Multi`](Node::Multi))
/// store a [`Span`] indexing into the owning [`Document`]'s flat node list,
/// and string variants borrow their bytes straight out of the source the
/// document was parsed from (except [`WildString`](Node::WildString), which
/// holds bytes supplied fresh by a caller rather than sliced from any
/// source).
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'src> {
    /// JSON `null`.
    Null,
    /// JSON `true`/`false`.
    Boolean(bool),
    /// The full matched slice of a JSON number, unparsed. Grammar-valid but
    /// not range- or precision-checked; numeric conversion is the loader's
    /// job.
    Number(&'src [u8]),
    /// A string body (quotes excluded) known to contain no `\` escapes.
    /// Safe to copy verbatim when re-emitting.
    SafeString(&'src [u8]),
    /// A string body containing at least one `\` escape; decoding is
    /// required to obtain its semantic bytes.
    JsonString(&'src [u8]),
    /// A string body supplied fresh (not sliced from the parsed source),
    /// e.g. by a loader or emitter constructing nodes programmatically. May
    /// require JSON escaping on output.
    WildString(Box<[u8]>),
    /// A JSON array: `span` indexes the element nodes in order.
    Array(Span),
    /// A JSON object. `span[0]` is always a [`Class`](Node::Class) node
    /// naming the key sequence; `span[1..]` are the field values, in class
    /// order, one per name.
    Object(Span),
    /// A shared key-set descriptor. Only ever appears as `span[0]` of an
    /// [`Object`](Node::Object); never a free-standing value.
    Class(Rc<ObjectClass>),
    /// A top-level sequence of values from a multi-value (NDJSON-like)
    /// parse.
    Multi(Span),
}

impl<'src> Node<'src> {
    /// Shorthand for matching the three string-bearing variants.
    #[must_use]
    pub fn as_string_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::SafeString(b) | Self::JsonString(b) => Some(b),
            Self::WildString(b) => Some(b),
            _ => None,
        }
    }
}

/// A completed parse: a flat node list with the root at index `0`.
///
/// Arrays, objects, and multi-values reference each other by [`Span`] into
/// this same list; the list itself lives as long as the `Document` and
/// borrows string/number payloads from the original source for the lifetime
/// `'src`.
#[derive(Debug, Clone)]
pub struct Document<'src> {
    nodes: Vec<Node<'src>>,
}

impl<'src> Document<'src> {
    pub(crate) fn new(nodes: Vec<Node<'src>>) -> Self {
        Self { nodes }
    }

    /// The root node, at index `0`.
    #[must_use]
    pub fn root(&self) -> &Node<'src> {
        &self.nodes[0]
    }

    /// The full flat node list backing this document.
    #[must_use]
    pub fn nodes(&self) -> &[Node<'src>] {
        &self.nodes
    }

    /// The nodes covered by `span`.
    #[must_use]
    pub fn slice(&self, span: Span) -> &[Node<'src>] {
        &self.nodes[span.range()]
    }

    /// The shared class of an [`Node::Object`], panicking if `node` is not
    /// an object or its invariant (`span[0]` is a class) is violated.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not [`Node::Object`], or if the object's first
    /// element is not a [`Node::Class`].
    #[must_use]
    pub fn object_class(&self, node: &Node<'src>) -> &Rc<ObjectClass> {
        let Node::Object(span) = node else {
            panic!("object_class called on a non-object node");
        };
        match &self.slice(*span)[0] {
            Node::Class(class) => class,
            _ => panic!("object span's first element is not a class"),
        }
    }

    /// The field values of an [`Node::Object`], in class order, excluding the
    /// leading class node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not [`Node::Object`].
    #[must_use]
    pub fn object_values(&self, node: &Node<'src>) -> &[Node<'src>] {
        let Node::Object(span) = node else {
            panic!("object_values called on a non-object node");
        };
        &self.slice(*span)[1..]
    }

    /// Writes the canonical JSON rendering of `node` to `out`.
    ///
    /// Renders `null`/`true`/`false` literally, numbers verbatim, safe and
    /// JSON strings verbatim (including their original escapes), wild
    /// strings with a fresh canonical escape, arrays and objects with no
    /// inter-element whitespace, and multi-value sequences one value per
    /// line.
    ///
    /// # Panics
    ///
    /// Panics if asked to format a bare [`Node::Class`]; that variant only
    /// ever appears as the first element of an object's span.
    pub fn format(&self, node: &Node<'src>, out: &mut String) {
        match node {
            Node::Null => out.push_str("null"),
            Node::Boolean(true) => out.push_str("true"),
            Node::Boolean(false) => out.push_str("false"),
            Node::Number(s) => out.push_str(core::str::from_utf8(s).unwrap_or_default()),
            Node::SafeString(s) | Node::JsonString(s) => {
                out.push('"');
                out.push_str(core::str::from_utf8(s).unwrap_or_default());
                out.push('"');
            }
            Node::WildString(s) => {
                out.push('"');
                string_codec::write_escaped(s, out);
                out.push('"');
            }
            Node::Array(span) => {
                out.push('[');
                for (i, child) in self.slice(*span).iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.format(child, out);
                }
                out.push(']');
            }
            Node::Object(span) => {
                let class = self.object_class(node);
                let values = &self.slice(*span)[1..];
                out.push('{');
                for (i, (name, value)) in class.names().iter().zip(values.iter()).enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push('"');
                    out.push_str(core::str::from_utf8(name).unwrap_or_default());
                    out.push_str("\":");
                    self.format(value, out);
                }
                out.push('}');
            }
            Node::Class(_) => panic!("a class node never appears outside an object's first slot"),
            Node::Multi(span) => {
                for (i, child) in self.slice(*span).iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    self.format(child, out);
                }
            }
        }
    }

    /// Renders the document's root via [`Document::format`].
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        let mut out = String::new();
        self.format(self.root(), &mut out);
        out
    }
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}
