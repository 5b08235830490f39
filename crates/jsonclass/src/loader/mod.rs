//! Schema-directed projection from a parsed [`Node`] tree onto Rust types.
//!
//! [`FromNode`] is the per-type operation: given a node and the [`Document`]
//! it lives in (needed to resolve spans and object classes), produce a `Self`
//! or a [`LoaderError`]. Primitive, `Option`, `Vec`, fixed-array, and `Box`
//! targets are implemented here; struct and enum targets are generated by the
//! [`json_struct!`](crate::json_struct) and [`json_enum!`](crate::json_enum)
//! declarative macros in [`macros`], since this crate has no proc-macro
//! dependency to derive them automatically.

mod macros;

use alloc::{boxed::Box, rc::Rc, string::String, vec::Vec};

use crate::{
    class::ObjectClass,
    error::LoaderError,
    node::{Document, Node},
    string_codec,
};

/// Projects a parsed [`Node`] onto a target type `T`.
///
/// Implementors receive both the node and the [`Document`] it belongs to,
/// since arrays, objects, and multi-values only carry a [`Span`](crate::node::Span)
/// and must be resolved against the document's flat node list.
pub trait FromNode<'src>: Sized {
    /// Converts `node` (resolved against `doc`) to `Self`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError`] if `node`'s shape does not match what `Self`
    /// requires.
    fn from_node(node: &Node<'src>, doc: &Document<'src>) -> Result<Self, LoaderError>;
}

/// A byte vector that, unlike `Vec<u8>`, accepts a JSON string node (with its
/// bytes copied or unescaped in bulk) in addition to a numeric array.
///
/// `Vec<u8>` itself always goes through the generic `Vec<T>` element-by-element
/// path (so a JSON array of small integers loads as bytes); there is no way to
/// special-case `u8` there without specialization. `Bytes` is the same
/// resolution `serde_bytes` uses for the identical problem upstream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bytes(pub Vec<u8>);

impl<'src> FromNode<'src> for bool {
    fn from_node(node: &Node<'src>, _doc: &Document<'src>) -> Result<Self, LoaderError> {
        match node {
            Node::Boolean(b) => Ok(*b),
            other => Err(type_mismatch("bool", other)),
        }
    }
}

impl<'src, T: FromNode<'src>> FromNode<'src> for Option<T> {
    fn from_node(node: &Node<'src>, doc: &Document<'src>) -> Result<Self, LoaderError> {
        match node {
            Node::Null => Ok(None),
            other => Ok(Some(T::from_node(other, doc)?)),
        }
    }
}

impl<'src, T: FromNode<'src>> FromNode<'src> for Box<T> {
    fn from_node(node: &Node<'src>, doc: &Document<'src>) -> Result<Self, LoaderError> {
        Ok(Box::new(T::from_node(node, doc)?))
    }
}

impl<'src, T: FromNode<'src>> FromNode<'src> for Vec<T> {
    fn from_node(node: &Node<'src>, doc: &Document<'src>) -> Result<Self, LoaderError> {
        let items = elements(node, doc)?;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(T::from_node(item, doc)?);
        }
        Ok(out)
    }
}

impl<'src, T: FromNode<'src>, const N: usize> FromNode<'src> for [T; N] {
    fn from_node(node: &Node<'src>, doc: &Document<'src>) -> Result<Self, LoaderError> {
        let items = elements(node, doc)?;
        if items.len() != N {
            return Err(LoaderError::ArraySizeMismatch {
                expected: N,
                found: items.len(),
            });
        }
        let mut out = Vec::with_capacity(N);
        for item in items {
            out.push(T::from_node(item, doc)?);
        }
        out.try_into()
            .map_err(|_: Vec<T>| LoaderError::ArraySizeMismatch { expected: N, found: N })
    }
}

impl<'src> FromNode<'src> for Bytes {
    fn from_node(node: &Node<'src>, doc: &Document<'src>) -> Result<Self, LoaderError> {
        match node {
            Node::SafeString(b) => Ok(Bytes(b.to_vec())),
            Node::WildString(b) => Ok(Bytes(b.to_vec())),
            Node::JsonString(b) => Ok(Bytes(unescape(b)?)),
            Node::Array(_) | Node::Multi(_) => {
                let items = elements(node, doc)?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(u8::from_node(item, doc)?);
                }
                Ok(Bytes(out))
            }
            other => Err(type_mismatch("bytes", other)),
        }
    }
}

macro_rules! impl_int_from_node {
    ($($t:ty),* $(,)?) => {
        $(
            impl<'src> FromNode<'src> for $t {
                fn from_node(node: &Node<'src>, _doc: &Document<'src>) -> Result<Self, LoaderError> {
                    let text = decode_number_like(node)?;
                    text.parse::<$t>().map_err(|_| LoaderError::InvalidInteger(text))
                }
            }
        )*
    };
}

macro_rules! impl_float_from_node {
    ($($t:ty),* $(,)?) => {
        $(
            impl<'src> FromNode<'src> for $t {
                fn from_node(node: &Node<'src>, _doc: &Document<'src>) -> Result<Self, LoaderError> {
                    let text = decode_number_like(node)?;
                    text.parse::<$t>().map_err(|_| LoaderError::InvalidFloat(text))
                }
            }
        )*
    };
}

impl_int_from_node!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_float_from_node!(f32, f64);

/// A view on a struct/tuple-struct target's source node: either named fields
/// resolved against an [`ObjectClass`], or a positional sequence.
#[doc(hidden)]
pub enum Fields<'d, 'src> {
    Named(&'d Rc<ObjectClass>, &'d [Node<'src>]),
    Positional(&'d [Node<'src>]),
}

/// Resolves a struct/tuple-struct target's source node into [`Fields`].
///
/// # Errors
///
/// Returns [`LoaderError::TypeMismatch`] if `node` is none of object, array,
/// or multi.
#[doc(hidden)]
pub fn struct_fields<'d, 'src>(
    node: &Node<'src>,
    doc: &'d Document<'src>,
) -> Result<Fields<'d, 'src>, LoaderError> {
    match node {
        Node::Object(_) => Ok(Fields::Named(doc.object_class(node), doc.object_values(node))),
        Node::Array(span) | Node::Multi(span) => Ok(Fields::Positional(doc.slice(*span))),
        other => Err(type_mismatch("object", other)),
    }
}

/// Looks up one field, by name if `fields` is [`Fields::Named`] or by
/// position if [`Fields::Positional`].
#[doc(hidden)]
pub fn field_value<'d, 'src>(
    fields: &Fields<'d, 'src>,
    name: &str,
    position: usize,
) -> Option<&'d Node<'src>> {
    match fields {
        Fields::Named(class, values) => class.index_of(name).map(|i| &values[i as usize]),
        Fields::Positional(values) => values.get(position),
    }
}

/// Builds the error for a missing, default-less field: [`LoaderError::MissingField`]
/// for named objects, [`LoaderError::TupleSizeMismatch`] for positional ones.
#[doc(hidden)]
pub fn missing_field_error(fields: &Fields<'_, '_>, name: &str, position: usize) -> LoaderError {
    match fields {
        Fields::Named(..) => LoaderError::MissingField(String::from(name)),
        Fields::Positional(values) => LoaderError::TupleSizeMismatch {
            expected: position + 1,
            found: values.len(),
        },
    }
}

fn elements<'d, 'src>(node: &Node<'src>, doc: &'d Document<'src>) -> Result<&'d [Node<'src>], LoaderError> {
    match node {
        Node::Array(span) | Node::Multi(span) => Ok(doc.slice(*span)),
        other => Err(type_mismatch("array", other)),
    }
}

fn unescape(b: &[u8]) -> Result<Vec<u8>, LoaderError> {
    let len = string_codec::unescaped_length(b)?;
    let mut buf = alloc::vec![0u8; len];
    let n = string_codec::unescape_to_buffer(b, &mut buf)?;
    buf.truncate(n);
    Ok(buf)
}

fn decode_number_like(node: &Node<'_>) -> Result<String, LoaderError> {
    match node {
        Node::Number(b) | Node::SafeString(b) => Ok(String::from_utf8_lossy(b).into_owned()),
        Node::WildString(b) => Ok(String::from_utf8_lossy(b).into_owned()),
        Node::JsonString(b) => Ok(String::from_utf8_lossy(&unescape(b)?).into_owned()),
        other => Err(type_mismatch("number", other)),
    }
}

fn decode_string_node(node: &Node<'_>) -> Result<String, LoaderError> {
    match node {
        Node::SafeString(b) => Ok(String::from_utf8_lossy(b).into_owned()),
        Node::WildString(b) => Ok(String::from_utf8_lossy(b).into_owned()),
        Node::JsonString(b) => Ok(String::from_utf8_lossy(&unescape(b)?).into_owned()),
        other => Err(type_mismatch("string", other)),
    }
}

/// Decodes a string-bearing node to an owned `String`, for enum matching.
#[doc(hidden)]
pub fn decode_enum_text(node: &Node<'_>) -> Result<String, LoaderError> {
    decode_string_node(node)
}

impl<'src> FromNode<'src> for String {
    fn from_node(node: &Node<'src>, _doc: &Document<'src>) -> Result<Self, LoaderError> {
        decode_string_node(node)
    }
}

fn type_mismatch(expected: &'static str, node: &Node<'_>) -> LoaderError {
    LoaderError::TypeMismatch {
        expected,
        found: node_type_name(node),
    }
}

fn node_type_name(node: &Node<'_>) -> &'static str {
    match node {
        Node::Null => "null",
        Node::Boolean(_) => "boolean",
        Node::Number(_) => "number",
        Node::SafeString(_) | Node::JsonString(_) | Node::WildString(_) => "string",
        Node::Array(_) => "array",
        Node::Object(_) => "object",
        Node::Class(_) => "class",
        Node::Multi(_) => "multi",
    }
}
