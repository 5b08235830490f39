//! A single-pass JSON parser built around a shadow-class trie: objects that
//! share a key sequence share one [`ObjectClass`](class::ObjectClass)
//! descriptor instead of each allocating their own, and the parsed
//! [`Document`] addresses its nodes by index rather than by pointer so the
//! assembly buffer can grow without invalidating anything already recorded
//! in it.
//!
//! ```
//! use jsonclass::Parser;
//!
//! let mut parser = Parser::new();
//! let doc = parser.parse(br#"{"name":"Ada","tags":["math","engine"]}"#).unwrap();
//! assert_eq!(doc.to_canonical_string(), r#"{"name":"Ada","tags":["math","engine"]}"#);
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod class;
mod cursor;
mod error;
mod node;
mod parser;
mod shadow_trie;
mod string_codec;

/// Schema-directed projection from a parsed node tree onto Rust types.
#[cfg(feature = "loader")]
pub mod loader;

pub use class::ObjectClass;
pub use error::{LoaderError, ParseError, ParseErrorKind};
pub use node::{Document, Node, Span};
pub use parser::Parser;
pub use shadow_trie::{ShadowTrie, TrieCursor};

#[cfg(feature = "loader")]
pub use loader::FromNode;
