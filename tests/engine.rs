use std::sync::Arc;
use std::thread;

use quill::{value, Engine, ErrorKind, Templates, Value};

#[test]
fn engine_debug() {
    let _ = format!("{:?}", Engine::new());
}

#[test]
fn engine_send_and_sync() {
    let engine = Engine::new();
    thread::spawn(move || {
        let result = engine
            .compile("{{ lorem }}", value! { lorem: "ipsum" })
            .unwrap();
        assert_eq!(result, "ipsum");
    })
    .join()
    .unwrap();
}

#[test]
fn engine_shared_between_threads() {
    let templates = Templates::from_iter([
        ("layouts.app", "<main>@yield('content')</main>"),
        (
            "page",
            "@extends('layouts.app')@section('content')#{{ n }}@endsection",
        ),
    ]);
    let engine = Arc::new(Engine::with_resolver(templates));
    let handles: Vec<_> = (0..8)
        .map(|n| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.render("page", value! { n: n }).unwrap())
        })
        .collect();
    for (n, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("<main>#{n}</main>"));
    }
}

#[test]
fn engine_compile_non_static_source() -> quill::Result<()> {
    let engine = Engine::new();
    let source = String::from("{{ lorem }}");
    let result = engine.compile(&source, value! { lorem: "ipsum" })?;
    assert_eq!(result, "ipsum");
    Ok(())
}

#[test]
fn engine_compile_with_none_context() -> quill::Result<()> {
    let result = Engine::new().compile_from("plain {{ missing }}", &Value::None)?;
    assert_eq!(result, "plain ");
    Ok(())
}

#[test]
fn engine_compile_err_invalid_context() {
    let err = Engine::new()
        .compile("{{ lorem }}", ["ipsum"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidContext);
    assert_eq!(err.to_string(), "expected map for context, found list");
}

#[test]
fn engine_render_err_no_resolver() {
    let err = Engine::new().render("home", value! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoResolver);
    assert_eq!(
        err.to_string(),
        "no resolver configured to load template `home`"
    );
}

#[test]
fn engine_include_err_no_resolver() {
    let err = Engine::new()
        .compile("before @include('nav') after", value! {})
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoResolver);
}

#[test]
fn engine_extends_err_no_resolver() {
    let err = Engine::new()
        .compile("@extends('layouts.app')", value! {})
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoResolver);
}

#[test]
fn engine_set_resolver() -> quill::Result<()> {
    let mut engine = Engine::new();
    engine.set_resolver(Templates::from_iter([("nav", "<nav>")]));
    let result = engine.compile("@include('nav')", value! {})?;
    assert_eq!(result, "<nav>");
    Ok(())
}

#[test]
fn engine_arc_resolver_shared_between_engines() -> quill::Result<()> {
    let templates = Arc::new(Templates::from_iter([("nav", "<nav>{{ who }}</nav>")]));
    let a = Engine::with_resolver(Arc::clone(&templates));
    let b = Engine::with_resolver(templates);
    assert_eq!(a.render("nav", value! { who: "a" })?, "<nav>a</nav>");
    assert_eq!(b.render("nav", value! { who: "b" })?, "<nav>b</nav>");
    Ok(())
}

#[test]
fn engine_err_max_include_depth_self_include() {
    let engine = Engine::with_resolver(Templates::from_iter([("loop", "x@include('loop')")]));
    let err = engine.render("loop", value! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MaxIncludeDepth);
    assert_eq!(
        err.to_string(),
        "reached maximum include depth (64) in template `loop`"
    );
}

#[test]
fn engine_err_max_include_depth_self_extends() {
    let engine = Engine::with_resolver(Templates::from_iter([(
        "loop",
        "@extends('loop')",
    )]));
    let err = engine.render("loop", value! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MaxIncludeDepth);
}

#[test]
fn engine_set_max_include_depth() -> quill::Result<()> {
    let mut engine = Engine::with_resolver(Templates::from_iter([
        ("a", "a@include('b')"),
        ("b", "b@include('c')"),
        ("c", "c"),
    ]));

    engine.set_max_include_depth(2);
    assert_eq!(engine.render("a", value! {})?, "abc");

    engine.set_max_include_depth(1);
    let err = engine.render("a", value! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MaxIncludeDepth);
    assert_eq!(err.name(), Some("b"));
    Ok(())
}
