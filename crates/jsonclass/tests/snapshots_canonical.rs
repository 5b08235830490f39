//! Snapshot the canonical rendering of representative documents, including
//! their shadow-class shape, so a change to formatting or class assignment
//! shows up as a diff in review rather than a silent behavior change.

fn describe(src: &str) -> String {
    let mut parser = jsonclass::Parser::new();
    let doc = parser.parse(src.as_bytes()).expect("fixture must parse");
    let class = doc.object_class(doc.root());
    format!(
        "canonical: {}\nclass names: {:?}\n",
        doc.to_canonical_string(),
        class.unescaped_names(),
    )
}

#[test]
fn snapshot_flat_object() {
    insta::assert_snapshot!(
        describe(r#"{ "id" : 1 , "name" : "Ada" , "active" : true }"#),
        @r#"
    canonical: {"id":1,"name":"Ada","active":true}
    class names: ["id", "name", "active"]
    "#
    );
}

#[test]
fn snapshot_nested_object_with_array() {
    insta::assert_snapshot!(
        describe(r#"{"user":{"name":"Bo","tags":["a","b"]},"count":2}"#),
        @r#"
    canonical: {"user":{"name":"Bo","tags":["a","b"]},"count":2}
    class names: ["user", "count"]
    "#
    );
}

#[test]
fn snapshot_empty_object_has_no_class_names() {
    insta::assert_snapshot!(
        describe("{}"),
        @r#"
    canonical: {}
    class names: []
    "#
    );
}
