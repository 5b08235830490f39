//! Error types produced by the parser and the loader.

use alloc::string::String;

use thiserror::Error;

/// A grammar or resource failure raised while parsing a document.
///
/// Every variant carries the `line`/`column` of the byte that triggered it,
/// taken from the [`Cursor`](crate::cursor::Cursor) at the moment of failure.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("{kind} at {line}:{column}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// One-based source line of the offending byte.
    pub line: usize,
    /// Zero-based column (in bytes) of the offending byte within its line.
    pub column: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, line: usize, column: usize) -> Self {
        Self {
            kind,
            line,
            column,
        }
    }
}

/// The kind of grammar violation or resource exhaustion encountered.
///
/// `RestartParser` from the reference design has no analogue here: the
/// assembly buffer is addressed by index rather than by pointer, so growing
/// it can never invalidate an already-recorded span. See `DESIGN.md`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseErrorKind {
    /// The input ended while a token or structure was still open.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// A byte was encountered where no grammar production accepts it.
    #[error("unexpected byte {0:#04x}")]
    SyntaxError(u8),
    /// A token looked like it started a literal (`null`/`true`/`false`) but
    /// the following bytes did not match.
    #[error("invalid literal")]
    BadToken,
    /// An object key was expected but the next non-whitespace byte was not
    /// `"`.
    #[error("expected a key")]
    MissingKey,
    /// A string was opened with `"` but never closed.
    #[error("unterminated string")]
    MissingQuotes,
    /// Two array or object elements were not separated by `,`.
    #[error("expected ','")]
    MissingComma,
    /// An object key was not followed by `:`.
    #[error("expected ':'")]
    MissingColon,
    /// A number was missing its mandatory integer digits.
    #[error("expected a digit")]
    MissingDigits,
    /// Trailing, non-whitespace bytes followed a complete top-level value.
    #[error("unexpected trailing input")]
    JunkAfterInput,
    /// A `\u` escape was truncated or contained non-hex-digit bytes.
    #[error("bad unicode escape")]
    BadUnicodeEscape,
    /// A surrogate half appeared without its pairing half.
    #[error("surrogate half cannot be encoded as utf-8")]
    Utf8CannotEncodeSurrogateHalf,
}

/// Failures raised while projecting a parsed [`Node`](crate::node::Node) tree
/// onto a target domain type.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LoaderError {
    /// The node's variant cannot be converted to the requested Rust type.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Human-readable name of the type the loader was asked to produce.
        expected: &'static str,
        /// Human-readable name of the node variant that was actually found.
        found: &'static str,
    },
    /// A fixed-size array target did not receive exactly `N` elements.
    #[error("expected an array of length {expected}, found {found}")]
    ArraySizeMismatch {
        /// Declared length of the target array.
        expected: usize,
        /// Number of elements actually present in the node.
        found: usize,
    },
    /// A positional (tuple-style) struct received fewer elements than its
    /// mandatory prefix requires.
    #[error("expected at least {expected} positional fields, found {found}")]
    TupleSizeMismatch {
        /// Minimum number of fields the tuple struct requires.
        expected: usize,
        /// Number of elements actually present in the node.
        found: usize,
    },
    /// A required struct field was absent from the source object and had no
    /// declared default.
    #[error("missing required field '{0}'")]
    MissingField(String),
    /// A string target for an enum did not match any known variant name.
    #[error("unknown enum value '{0}'")]
    UnknownEnumValue(String),
    /// A numeric string failed to parse as an integer.
    #[error("invalid integer: {0}")]
    InvalidInteger(String),
    /// A numeric string failed to parse as a float.
    #[error("invalid float: {0}")]
    InvalidFloat(String),
    /// A string payload contained an escape sequence that failed to decode.
    #[error(transparent)]
    Unescape(#[from] ParseErrorKind),
}
