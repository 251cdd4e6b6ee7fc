#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde::Serialize;

#[derive(Debug, Serialize, Arbitrary)]
enum Value {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

fuzz_target!(|data: (&str, Vec<(&str, &str)>, BTreeMap<String, Value>)| {
    let (root, views, ctx) = data;
    let mut templates = quill::Templates::from_iter(views);
    templates.insert("fuzz", root);
    let mut engine = quill::Engine::with_resolver(templates);
    engine.set_max_include_depth(8);
    let _ = engine.render("fuzz", &ctx);
});
