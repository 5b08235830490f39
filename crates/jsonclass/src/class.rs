//! Shared, indexed descriptors for an object's key sequence.

use alloc::{boxed::Box, string::String, vec::Vec};

use hashbrown::HashMap;

use crate::{error::ParseErrorKind, string_codec};

/// The shared, immutable descriptor for an ordered object key sequence.
///
/// Every [`object`](crate::node::Node::Object) node in a document points at
/// one `ObjectClass`, shared with every other object in the document (and
/// across successive parses by the same [`Parser`](crate::parser::Parser))
/// that has the same key sequence, in the same order.
///
/// `names` holds the raw, possibly-escaped key text exactly as it appeared in
/// the source (used for byte-identical re-emission); `unescaped_names` holds
/// the decoded UTF-8 form of each key, and `index_map` resolves a decoded
/// name to its ordinal in O(1).
#[derive(Debug, PartialEq, Eq)]
pub struct ObjectClass {
    names: Vec<Box<[u8]>>,
    unescaped_names: Vec<Box<str>>,
    index_map: HashMap<Box<str>, u32>,
}

impl ObjectClass {
    /// Builds a class from `names`, the raw escaped key text in source
    /// order.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseErrorKind`] raised by [`string_codec`] if any key
    /// fails to decode (a truncated or malformed `\u` escape, or a lone
    /// surrogate half).
    pub(crate) fn build(names: Vec<Box<[u8]>>) -> Result<Self, ParseErrorKind> {
        let mut unescaped_names = Vec::with_capacity(names.len());
        let mut index_map = HashMap::with_capacity(names.len());
        for (i, raw) in names.iter().enumerate() {
            let decoded = decode_name(raw)?;
            index_map.insert(decoded.clone(), i as u32);
            unescaped_names.push(decoded);
        }
        Ok(Self {
            names,
            unescaped_names,
            index_map,
        })
    }

    /// The empty class shared by every `{}` with no trie ancestry, i.e. the
    /// class materialized at the trie root.
    pub(crate) fn empty() -> Self {
        Self {
            names: Vec::new(),
            unescaped_names: Vec::new(),
            index_map: HashMap::new(),
        }
    }

    /// The raw, possibly-escaped key text, in the order it first appeared.
    #[must_use]
    pub fn names(&self) -> &[Box<[u8]>] {
        &self.names
    }

    /// The decoded key text, in the same order as [`ObjectClass::names`].
    #[must_use]
    pub fn unescaped_names(&self) -> &[Box<str>] {
        &self.unescaped_names
    }

    /// Number of keys in this class's sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether this class has no keys (the root class).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolves a decoded key name to its ordinal, if present.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.index_map.get(name).copied()
    }
}

/// Decodes a raw, possibly-escaped key's text into its UTF-8 form.
///
/// Keys that contain no backslash decode via a direct UTF-8 reinterpret of
/// the raw bytes (the common case); keys with escapes go through
/// [`string_codec`], and a decode failure there (a truncated or malformed
/// `\u` escape, or a lone surrogate half) is propagated rather than
/// silently mapped to an empty or truncated name.
fn decode_name(raw: &[u8]) -> Result<Box<str>, ParseErrorKind> {
    if !string_codec::needs_escape(raw) {
        return Ok(String::from_utf8_lossy(raw).into_owned().into_boxed_str());
    }
    let len = string_codec::unescaped_length(raw)?;
    let mut buf = alloc::vec![0u8; len];
    let written = string_codec::unescape_to_buffer(raw, &mut buf)?;
    buf.truncate(written);
    Ok(String::from_utf8(buf)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
        .into_boxed_str())
}
