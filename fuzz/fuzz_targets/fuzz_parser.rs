#![no_main]

use jsonclass::Parser;
use libfuzzer_sys::fuzz_target;

// Reparsing a document's own canonical rendering must succeed and must not
// change that rendering again: `format(parse(src))` is idempotent wherever
// `parse(src)` succeeds at all.
fuzz_target!(|data: &[u8]| {
    let mut parser = Parser::new();
    let Ok(doc) = parser.parse(data) else {
        return;
    };
    let rendered = doc.to_canonical_string();

    let mut reparser = Parser::new();
    let doc2 = reparser
        .parse(rendered.as_bytes())
        .expect("a document's own canonical rendering must reparse");
    assert_eq!(doc2.to_canonical_string(), rendered);
});
