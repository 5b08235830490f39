//! The recursive-descent grammar driver.
//!
//! [`Parser`] owns the two pieces of state that are worth keeping around
//! between documents: the [`ShadowTrie`] (so repeated key-sets across many
//! parses still resolve to one shared [`ObjectClass`]) and a capacity hint
//! for the assembly buffer (so a parser that has seen one large document
//! doesn't re-grow from scratch on the next). Everything else (the cursor,
//! the assembly buffer itself, the per-depth scratch vectors) is local to
//! one call to [`Parser::parse`] or [`Parser::parse_multi`].
//!
//! # Why there is no restart protocol
//!
//! A pointer-based port of this design needs to recover from the assembly
//! buffer reallocating mid-parse: every array/object/multi node holds a
//! `(pointer, length)` span into that buffer, and a reallocation that moves
//! the backing storage would leave every previously recorded span dangling.
//! The usual fix is to grow aggressively and restart the whole parse when
//! that happens.
//!
//! Here, spans are `(index, length)` pairs (see [`Span`](crate::node::Span))
//! into a `Vec`. Appending to a `Vec` can move its backing allocation, but it
//! never changes the *indices* of the elements already in it, so a span
//! recorded before a reallocation is exactly as valid after one. Growing the
//! assembly buffer is just amortised `Vec` growth; there is nothing to
//! restart.

use alloc::vec::Vec;

use crate::{
    cursor::Cursor,
    error::{ParseError, ParseErrorKind},
    node::{Document, Node, Span},
    shadow_trie::ShadowTrie,
};

/// A reusable JSON parser.
///
/// `Parser` is single-owner and single-threaded: `parse`/`parse_multi` take
/// `&mut self`, so the borrow checker (not a runtime flag) is what rules
/// out the reentrant misuse the reference design guards against with a
/// `parsing` bit.
#[derive(Debug, Default)]
pub struct Parser {
    shadow: ShadowTrie,
    assembly_capacity: usize,
}

impl Parser {
    /// Creates a parser with an empty shadow trie and no capacity history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shadow: ShadowTrie::new(),
            assembly_capacity: 0,
        }
    }

    /// Parses a single JSON value from `src`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on any grammar violation, or if trailing
    /// non-whitespace bytes follow the value ([`ParseErrorKind::JunkAfterInput`]).
    pub fn parse<'src>(&mut self, src: &'src [u8]) -> Result<Document<'src>, ParseError> {
        let doc = run(src, &mut self.shadow, self.assembly_capacity, Mode::Single)?;
        self.assembly_capacity = self.assembly_capacity.max(doc.nodes().len());
        Ok(doc)
    }

    /// Parses a whitespace- or comma-separated sequence of top-level JSON
    /// values (as in JSON Lines / NDJSON streams), tolerating an optional
    /// leading or trailing comma.
    ///
    /// This is not standard JSON; it exists to make log-stream inputs (one
    /// JSON value per line, or simply concatenated) parseable without a
    /// wrapping array. The root of the returned document is always
    /// [`Node::Multi`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on any grammar violation within one of the
    /// top-level values.
    pub fn parse_multi<'src>(&mut self, src: &'src [u8]) -> Result<Document<'src>, ParseError> {
        let doc = run(src, &mut self.shadow, self.assembly_capacity, Mode::Multi)?;
        self.assembly_capacity = self.assembly_capacity.max(doc.nodes().len());
        Ok(doc)
    }

    /// Parses a single JSON value from `src` using a fresh, scoped shadow
    /// trie instead of this parser's own.
    ///
    /// Unlike [`Parser::parse`], this does not grow this parser's class
    /// table or capacity history; every call starts from an empty trie and
    /// the result shares no [`ObjectClass`](crate::class::ObjectClass) with
    /// documents produced by `self.parse(..)`. Useful for one-off parses
    /// where amortising class lookups across calls isn't wanted.
    ///
    /// # Errors
    ///
    /// Same as [`Parser::parse`].
    pub fn parse_owned<'src>(&self, src: &'src [u8]) -> Result<Document<'src>, ParseError> {
        let mut scratch_trie = ShadowTrie::new();
        run(src, &mut scratch_trie, 0, Mode::Single)
    }

    /// The [`parse_multi`](Parser::parse_multi) counterpart of
    /// [`Parser::parse_owned`].
    ///
    /// # Errors
    ///
    /// Same as [`Parser::parse_multi`].
    pub fn parse_multi_owned<'src>(&self, src: &'src [u8]) -> Result<Document<'src>, ParseError> {
        let mut scratch_trie = ShadowTrie::new();
        run(src, &mut scratch_trie, 0, Mode::Multi)
    }

    /// The assembly-buffer size (in nodes) this parser will pre-size its
    /// next allocation to, based on the largest document it has parsed.
    #[must_use]
    pub fn assembly_capacity_hint(&self) -> usize {
        self.assembly_capacity
    }

    /// Overrides the assembly-buffer capacity hint used for the next parse.
    pub fn set_assembly_capacity_hint(&mut self, capacity: usize) {
        self.assembly_capacity = capacity;
    }

    /// Number of distinct key sequences this parser's shadow trie has
    /// discovered so far, including the root. Exposed for diagnostics and
    /// tests; not part of the grammar.
    #[must_use]
    pub fn shadow_class_count(&self) -> usize {
        self.shadow.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Single,
    Multi,
}

/// Per-parse mutable state: the cursor, the assembly buffer under
/// construction, and the per-depth scratch stacks children accumulate into
/// before being appended to the assembly en bloc.
struct Build<'src, 'trie> {
    cur: Cursor<'src>,
    assembly: Vec<Node<'src>>,
    scratch: Vec<Vec<Node<'src>>>,
    shadow: &'trie mut ShadowTrie,
}

fn run<'src>(
    src: &'src [u8],
    shadow: &mut ShadowTrie,
    assembly_capacity_hint: usize,
    mode: Mode,
) -> Result<Document<'src>, ParseError> {
    let mut build = Build {
        cur: Cursor::new(src),
        assembly: Vec::with_capacity(assembly_capacity_hint.max(4)),
        scratch: Vec::new(),
        shadow,
    };

    match mode {
        Mode::Single => build.run_single(),
        Mode::Multi => build.run_multi(),
    }
    .map(|()| Document::new(build.assembly))
}

impl<'src, 'trie> Build<'src, 'trie> {
    fn err(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.cur.line(), self.cur.col())
    }

    fn ensure_scratch(&mut self, depth: usize) {
        if self.scratch.len() <= depth {
            self.scratch.resize_with(depth + 1, Vec::new);
        }
        self.scratch[depth].clear();
    }

    /// Moves everything accumulated in `scratch[depth]` into the assembly
    /// buffer as one contiguous block, returning its span.
    fn append_span(&mut self, depth: usize) -> Span {
        let start = self.assembly.len();
        let len = self.scratch[depth].len();
        self.assembly.append(&mut self.scratch[depth]);
        Span::new(start, len)
    }

    fn run_single(&mut self) -> Result<(), ParseError> {
        self.cur.skip_space();
        if self.cur.eof() {
            return Err(self.err(ParseErrorKind::UnexpectedEndOfInput));
        }
        self.assembly.push(Node::Null);
        let root = self.parse_value(0).map_err(|k| self.err(k))?;
        self.assembly[0] = root;
        self.cur.skip_space();
        if !self.cur.eof() {
            return Err(self.err(ParseErrorKind::JunkAfterInput));
        }
        Ok(())
    }

    fn run_multi(&mut self) -> Result<(), ParseError> {
        self.assembly.push(Node::Null);
        self.ensure_scratch(0);
        loop {
            self.cur.skip_space();
            while self.cur.peek() == Some(b',') {
                self.cur.next();
                self.cur.skip_space();
            }
            if self.cur.eof() {
                break;
            }
            let v = self.parse_value(1).map_err(|k| self.err(k))?;
            self.scratch[0].push(v);
        }
        let span = self.append_span(0);
        self.assembly[0] = Node::Multi(span);
        Ok(())
    }

    fn parse_value(&mut self, depth: usize) -> Result<Node<'src>, ParseErrorKind> {
        self.cur.skip_space();
        match self.cur.peek() {
            None => Err(ParseErrorKind::UnexpectedEndOfInput),
            Some(b'n') => self.parse_literal(b"null", Node::Null),
            Some(b't') => self.parse_literal(b"true", Node::Boolean(true)),
            Some(b'f') => self.parse_literal(b"false", Node::Boolean(false)),
            Some(b'"') => self.parse_string(),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b'[') => self.parse_array(depth),
            Some(b'{') => self.parse_object(depth),
            Some(b) => Err(ParseErrorKind::SyntaxError(b)),
        }
    }

    fn parse_literal(&mut self, lit: &[u8], node: Node<'src>) -> Result<Node<'src>, ParseErrorKind> {
        if self.cur.check_literal(lit) {
            Ok(node)
        } else {
            Err(ParseErrorKind::BadToken)
        }
    }

    fn parse_string(&mut self) -> Result<Node<'src>, ParseErrorKind> {
        self.cur.next(); // opening quote
        self.cur.set_mark();
        let mut safe = true;
        loop {
            match self.cur.peek() {
                None => return Err(ParseErrorKind::MissingQuotes),
                Some(b'"') => break,
                Some(b'\\') => {
                    safe = false;
                    self.cur.next(); // backslash
                    if self.cur.next().is_none() {
                        return Err(ParseErrorKind::MissingQuotes);
                    }
                }
                Some(_) => {
                    self.cur.next();
                }
            }
        }
        let body = self.cur.take_marked();
        self.cur.next(); // closing quote
        Ok(if safe {
            Node::SafeString(body)
        } else {
            Node::JsonString(body)
        })
    }

    fn parse_number(&mut self) -> Result<Node<'src>, ParseErrorKind> {
        self.cur.set_mark();
        if self.cur.peek() == Some(b'-') {
            self.cur.next();
        }
        if self.cur.skip_digits() == 0 {
            return Err(ParseErrorKind::MissingDigits);
        }
        if self.cur.peek() == Some(b'.') {
            self.cur.next();
            if self.cur.skip_digits() == 0 {
                return Err(ParseErrorKind::MissingDigits);
            }
        }
        if matches!(self.cur.peek(), Some(b'e' | b'E')) {
            self.cur.next();
            if matches!(self.cur.peek(), Some(b'+' | b'-')) {
                self.cur.next();
            }
            if self.cur.skip_digits() == 0 {
                return Err(ParseErrorKind::MissingDigits);
            }
        }
        Ok(Node::Number(self.cur.take_marked()))
    }

    fn parse_array(&mut self, depth: usize) -> Result<Node<'src>, ParseErrorKind> {
        self.cur.next(); // '['
        self.ensure_scratch(depth);
        self.cur.skip_space();
        if self.cur.peek() == Some(b']') {
            self.cur.next();
            return Ok(Node::Array(self.append_span(depth)));
        }
        loop {
            let v = self.parse_value(depth + 1)?;
            self.scratch[depth].push(v);
            self.cur.skip_space();
            match self.cur.peek() {
                Some(b',') => {
                    self.cur.next();
                }
                Some(b']') => {
                    self.cur.next();
                    break;
                }
                Some(_) => return Err(ParseErrorKind::MissingComma),
                None => return Err(ParseErrorKind::UnexpectedEndOfInput),
            }
        }
        Ok(Node::Array(self.append_span(depth)))
    }

    fn parse_object(&mut self, depth: usize) -> Result<Node<'src>, ParseErrorKind> {
        self.cur.next(); // '{'
        self.ensure_scratch(depth);
        // Slot 0 is reserved for the class node, written once the full key
        // sequence is known.
        self.scratch[depth].push(Node::Null);
        self.cur.skip_space();
        let mut walk = self.shadow.start_walk();
        if self.cur.peek() == Some(b'}') {
            self.cur.next();
            let class = self.shadow.get_class(walk)?;
            self.scratch[depth][0] = Node::Class(class);
            return Ok(Node::Object(self.append_span(depth)));
        }
        loop {
            self.cur.skip_space();
            if self.cur.eof() {
                return Err(ParseErrorKind::UnexpectedEndOfInput);
            }
            if self.cur.peek() != Some(b'"') {
                return Err(ParseErrorKind::MissingKey);
            }
            let key = self.parse_string()?;
            let key_bytes = key
                .as_string_bytes()
                .expect("parse_string always returns a string node");
            walk = self.shadow.get_next(walk, key_bytes);
            self.cur.skip_space();
            if self.cur.eof() {
                return Err(ParseErrorKind::UnexpectedEndOfInput);
            }
            if self.cur.peek() != Some(b':') {
                return Err(ParseErrorKind::MissingColon);
            }
            self.cur.next();
            let value = self.parse_value(depth + 1)?;
            self.scratch[depth].push(value);
            self.cur.skip_space();
            match self.cur.peek() {
                Some(b',') => {
                    self.cur.next();
                }
                Some(b'}') => {
                    self.cur.next();
                    break;
                }
                Some(_) => return Err(ParseErrorKind::MissingComma),
                None => return Err(ParseErrorKind::UnexpectedEndOfInput),
            }
        }
        let class = self.shadow.get_class(walk)?;
        self.scratch[depth][0] = Node::Class(class);
        Ok(Node::Object(self.append_span(depth)))
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use super::*;

    fn parse(src: &str) -> Document<'_> {
        Parser::new().parse(src.as_bytes()).unwrap()
    }

    #[test]
    fn parses_null() {
        let doc = parse("null");
        assert_eq!(*doc.root(), Node::Null);
    }

    #[test]
    fn parses_safe_string() {
        let doc = parse(r#""Hello, World""#);
        assert_eq!(doc.root().as_string_bytes(), Some(b"Hello, World".as_slice()));
        assert!(matches!(doc.root(), Node::SafeString(_)));
    }

    #[test]
    fn parses_array_of_numbers() {
        let doc = parse("[1,2,3]");
        let Node::Array(span) = doc.root() else {
            panic!("expected array");
        };
        let elems = doc.slice(*span);
        assert_eq!(elems.len(), 3);
        let expected = [b"1".as_slice(), b"2".as_slice(), b"3".as_slice()];
        for (elem, want) in elems.iter().zip(expected) {
            let Node::Number(got) = elem else {
                panic!("expected number");
            };
            assert_eq!(*got, want);
        }
    }

    #[test]
    fn object_class_has_field_names_in_order() {
        let doc = parse(r#"{"tags":[1,2,3]}"#);
        let class = doc.object_class(doc.root());
        assert_eq!(class.len(), 1);
        assert_eq!(class.unescaped_names()[0].as_ref(), "tags");
        let values = doc.object_values(doc.root());
        assert_eq!(values.len(), 1);
        assert!(matches!(values[0], Node::Array(_)));
    }

    #[test]
    fn same_key_sequence_shares_class_pointer_within_one_parse() {
        let doc = parse(r#"{"id":{"name":"Andy","email":"andy@example.com"}}"#);
        let outer_class = Rc::clone(doc.object_class(doc.root()));
        let inner = &doc.object_values(doc.root())[0];
        let inner_class = Rc::clone(doc.object_class(inner));
        assert_eq!(outer_class.len(), 1);
        assert_eq!(inner_class.len(), 2);

        let doc2 = Parser::new().parse(br#"{"id":{"name":"A","email":"B"}}"#).unwrap();
        let outer2 = Rc::clone(doc2.object_class(doc2.root()));
        let inner2 = &doc2.object_values(doc2.root())[0];
        let inner2_class = Rc::clone(doc2.object_class(inner2));
        assert_eq!(outer2.len(), 1);
        assert_eq!(inner2_class.len(), 2);
    }

    #[test]
    fn repeated_parses_share_class_pointer() {
        let mut parser = Parser::new();
        let doc1 = parser
            .parse(br#"{"id":{"name":"Andy","email":"andy@example.com"}}"#)
            .unwrap();
        let class1 = Rc::clone(doc1.object_class(doc1.root()));
        drop(doc1);
        let doc2 = parser
            .parse(br#"{"id":{"name":"Bo","email":"bo@example.com"}}"#)
            .unwrap();
        let class2 = Rc::clone(doc2.object_class(doc2.root()));
        assert!(Rc::ptr_eq(&class1, &class2));
    }

    #[test]
    fn parse_multi_shares_class_across_top_level_values() {
        let mut parser = Parser::new();
        let doc = parser
            .parse_multi(b"{\"name\":\"Andy\"}\n{\"name\":\"Smoo\"}")
            .unwrap();
        let Node::Multi(span) = doc.root() else {
            panic!("expected multi");
        };
        let values = doc.slice(*span);
        assert_eq!(values.len(), 2);
        let class0 = doc.object_class(&values[0]);
        let class1 = doc.object_class(&values[1]);
        assert!(Rc::ptr_eq(class0, class1));
    }

    #[test]
    fn empty_object_has_zero_names() {
        let doc = parse("{}");
        let Node::Object(span) = doc.root() else {
            panic!("expected object");
        };
        assert_eq!(span.len(), 1);
        assert!(doc.object_class(doc.root()).is_empty());
    }

    #[test]
    fn empty_array_has_zero_elements() {
        let doc = parse("[]");
        let Node::Array(span) = doc.root() else {
            panic!("expected array");
        };
        assert_eq!(span.len(), 0);
    }

    #[test]
    fn numeric_edge_cases_parse() {
        for n in ["0", "-0", "1", "-1", "1.5", "1e10", "1E10", "1e+10", "1e-10"] {
            let doc = parse(n);
            assert_eq!(doc.root().as_string_bytes(), None);
            assert!(matches!(doc.root(), Node::Number(_)));
        }
    }

    #[test]
    fn unterminated_string_fails_missing_quotes() {
        let mut parser = Parser::new();
        let err = parser.parse(b"\"abc\\\"").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingQuotes);
    }

    #[test]
    fn unterminated_object_fails_unexpected_eof() {
        let mut parser = Parser::new();
        let err = parser.parse(b"{").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn unterminated_array_fails_unexpected_eof() {
        let mut parser = Parser::new();
        let err = parser.parse(b"[1,2,").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn trailing_junk_fails() {
        let mut parser = Parser::new();
        let err = parser.parse(b"{ \"a\": 1 } junk").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::JunkAfterInput);
    }

    #[test]
    fn escaped_string_is_classified_as_json_string() {
        let doc = parse("\"\\n\"");
        assert!(matches!(doc.root(), Node::JsonString(_)));
    }

    #[test]
    fn round_trip_format_matches_source_without_whitespace() {
        for src in [
            "null",
            "true",
            "false",
            "[1,2,3]",
            r#"{"a":1,"b":[true,false,null]}"#,
            r#""Hello, World""#,
        ] {
            let doc = parse(src);
            assert_eq!(doc.to_canonical_string(), src);
        }
    }

    #[test]
    fn idempotent_format() {
        let src = r#"{"a":1,"b":[1,2,3]}"#;
        let mut parser = Parser::new();
        let once = parser.parse(src.as_bytes()).unwrap().to_canonical_string();
        let twice = parser.parse(once.as_bytes()).unwrap().to_canonical_string();
        assert_eq!(once, twice);
    }

    #[test]
    fn assembly_spans_stay_local_to_their_document() {
        let doc = parse(r#"{"a":[1,2,3],"b":{"c":4}}"#);
        let values = doc.object_values(doc.root());
        for v in values {
            if let Node::Array(span) | Node::Object(span) = v {
                assert!(span.range().end <= doc.nodes().len());
            }
        }
    }

    #[test]
    fn parse_owned_does_not_grow_parsers_own_trie() {
        let parser = Parser::new();
        assert_eq!(parser.shadow_class_count(), 1);
        let _doc = parser.parse_owned(br#"{"x":1}"#).unwrap();
        assert_eq!(parser.shadow_class_count(), 1);
    }

    #[test]
    fn positional_missing_comma() {
        let mut parser = Parser::new();
        let err = parser.parse(b"[1 2]").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingComma);
    }

    #[test]
    fn object_missing_colon() {
        let mut parser = Parser::new();
        let err = parser.parse(br#"{"a" 1}"#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingColon);
    }

    #[test]
    fn object_missing_key() {
        let mut parser = Parser::new();
        let err = parser.parse(b"{a:1}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingKey);
    }

    #[test]
    fn object_key_with_malformed_escape_fails_instead_of_corrupting_the_class() {
        // Structurally fine (a backslash followed by some byte is enough to
        // satisfy the grammar pass), but "\uZZZZ" has no hex digits, so the
        // class-name decode must surface BadUnicodeEscape rather than
        // silently mapping the key to an empty or truncated name.
        let mut parser = Parser::new();
        let err = parser.parse(br#"{"a\uZZZZ":1}"#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::BadUnicodeEscape);
    }
}
