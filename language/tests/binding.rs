use std::collections::HashMap;

use sti_language::{language, Error};

#[test]
fn can_load_grammar() {
    let language = language();
    assert!(
        language.node_kind_count() > 0,
        "Error loading Sti grammar"
    );
    assert!(language.parse("{}->x").is_ok(), "Error loading Sti grammar");
}

#[test]
fn grammar_metadata() {
    let language = language();
    assert_eq!(language.name(), "sti");
    assert_eq!(language.version(), env!("CARGO_PKG_VERSION"));
    assert_eq!(language.file_types(), &["sti"]);
    assert!(language.node_kind_for_name("source_file", true).is_some());
}

#[test]
fn eval_through_handle() {
    let source = "{ name, greeting = \"Hello\" } ->\n%{greeting}, %{name}!\n";
    let mut inputs = HashMap::new();
    inputs.insert("name".to_string(), "sti".to_string());

    let output = language().eval(source, &inputs).expect("eval failed");
    assert_eq!(output, "Hello, sti!\n");
}

#[test]
fn eval_missing_input() {
    let inputs: HashMap<String, String> = HashMap::new();
    let err = language()
        .eval("{name}->%{name}", &inputs)
        .expect_err("missing input accepted");
    assert!(matches!(err, Error::MissingInput { ref name, .. } if name == "name"));
}

#[test]
fn eval_unfinished_insertions_as_text() {
    let inputs: HashMap<String, String> = HashMap::new();
    for source in ["{}->%{name", "{}->%{a b}", "{}->%{a-}", "{}->50%{"] {
        let output = sti_language::eval(source, &inputs).expect("literal text rejected");
        assert_eq!(output, &source[4..]);
    }
}
