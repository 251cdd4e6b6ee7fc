use quill::{value, Engine, ErrorKind, Templates};

fn engine<const N: usize>(templates: [(&str, &str); N]) -> Engine {
    Engine::with_resolver(Templates::from_iter(templates))
}

#[test]
fn layout_round_trip() {
    let engine = engine([("layouts.app", "<html>@yield('content')</html>")]);
    let result = engine
        .compile(
            "@extends('layouts.app')@section('content')Hi@endsection",
            value! {},
        )
        .unwrap();
    assert_eq!(result, "<html>Hi</html>");
}

#[test]
fn layout_yield_default() {
    let engine = engine([(
        "app",
        "<title>@yield('title', 'Untitled')</title>[@yield('sidebar')]@yield('content')",
    )]);
    let result = engine
        .compile("@extends('app')@section('content')body@endsection", value! {})
        .unwrap();
    assert_eq!(result, "<title>Untitled</title>[]body");
}

#[test]
fn layout_inline_section() {
    let engine = engine([("app", "<title>@yield('title')</title>")]);
    let result = engine
        .compile(r#"@extends("app")@section('title', "Home")"#, value! {})
        .unwrap();
    assert_eq!(result, "<title>Home</title>");
}

#[test]
fn layout_duplicate_section_last_wins() {
    let engine = engine([("app", "@yield('a')")]);
    let result = engine
        .compile(
            "@extends('app')@section('a')first@endsection@section('a')second@endsection",
            value! {},
        )
        .unwrap();
    assert_eq!(result, "second");
}

#[test]
fn layout_text_outside_sections_is_discarded() {
    let engine = engine([("app", "<main>@yield('content')</main>")]);
    let result = engine
        .compile(
            "before @extends('app') between @section('content')x@endsection after",
            value! {},
        )
        .unwrap();
    assert_eq!(result, "<main>x</main>");
}

#[test]
fn layout_sections_are_compiled_with_context() {
    let engine = engine([(
        "app",
        "<h1>{{ title }}</h1>@yield('content')",
    )]);
    let result = engine
        .compile(
            "@extends('app')@section('content')@if(user)Hi {{ user }}@endif@endsection",
            value! { title: "<Home>", user: "Ann" },
        )
        .unwrap();
    assert_eq!(result, "<h1>&lt;Home&gt;</h1>Hi Ann");
}

#[test]
fn layout_chain() {
    let engine = engine([
        ("base", "<html>@yield('title', 'Site') | @yield('body')</html>"),
        (
            "app",
            "@extends('base')@section('body')<main>@yield('content')</main>@endsection",
        ),
    ]);
    let result = engine
        .compile(
            "@extends('app')@section('content')Hi@endsection@section('title', 'Page')",
            value! {},
        )
        .unwrap();
    assert_eq!(result, "<html>Site | <main>Hi</main></html>");
}

#[test]
fn layout_chain_sections_reach_only_the_next_layout() {
    let engine = engine([
        ("base", "<t>@yield('title', 'Site')</t>@yield('body')"),
        (
            "app",
            "@extends('base')@section('body')[@yield('content')]@endsection",
        ),
    ]);
    let result = engine
        .compile(
            "@extends('app')@section('title', 'Page')@section('content', 'Hi')",
            value! {},
        )
        .unwrap();
    assert_eq!(result, "<t>Site</t>[Hi]");
}

#[test]
fn layout_chain_section_passed_on_with_yield() {
    let engine = engine([
        ("base", "<t>@yield('title', 'Site')</t>"),
        ("app", "@extends('base')@section('title')@yield('title')!@endsection"),
    ]);
    let result = engine
        .compile("@extends('app')@section('title', 'Page')", value! {})
        .unwrap();
    assert_eq!(result, "<t>Page!</t>");
}

#[test]
fn layout_chain_uses_the_middle_layout_sections() {
    let engine = engine([
        ("base", "@yield('title')"),
        ("app", "@extends('base')@section('title', 'from app')"),
    ]);
    let result = engine
        .compile("@extends('app')@section('title', 'from page')", value! {})
        .unwrap();
    assert_eq!(result, "from app");
}

#[test]
fn layout_counts_toward_include_depth() {
    let mut engine = engine([
        ("app", "@include('nav')@yield('content')"),
        ("nav", "<nav>"),
    ]);
    let page = "@extends('app')@section('content', 'body')";

    engine.set_max_include_depth(2);
    assert_eq!(engine.compile(page, value! {}).unwrap(), "<nav>body");

    engine.set_max_include_depth(1);
    let err = engine.compile(page, value! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MaxIncludeDepth);
}

#[test]
fn layout_with_include() {
    let engine = engine([
        ("app", "@include('nav')@yield('content')"),
        ("nav", "<nav>{{ active }}</nav>"),
    ]);
    let result = engine
        .compile(
            "@extends('app')@section('content')body@endsection",
            value! { active: "home" },
        )
        .unwrap();
    assert_eq!(result, "<nav>home</nav>body");
}

#[test]
fn layout_without_extends_leaves_markers() {
    let result = Engine::new()
        .compile("@section('a')x@endsection @yield('a')", value! {})
        .unwrap();
    assert_eq!(result, "@section('a')x@endsection @yield('a')");
}

#[test]
fn layout_malformed_extends_is_literal() {
    let result = Engine::new()
        .compile("@extends(app) @extends('app'", value! {})
        .unwrap();
    assert_eq!(result, "@extends(app) @extends('app'");
}

#[test]
fn layout_err_unknown_template() {
    let engine = engine([("app", "")]);
    let err = engine
        .compile("@extends('layouts.missing')", value! {})
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownTemplate);
    assert_eq!(err.to_string(), "unknown template `layouts.missing`");
}

#[test]
fn layout_err_unknown_template_in_view() {
    let engine = engine([("page", "@extends('missing')")]);
    let err = engine.render("page", value! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownTemplate);
    assert_eq!(err.name(), Some("page"));
    assert_eq!(
        err.to_string(),
        "unknown template `missing` in template `page`"
    );
}
