//! Template inheritance with `@extends`, `@section` and `@yield`.
//!
//! A child template names its layout with `@extends('name')` and provides
//! content with `@section('name') ... @endsection` or the inline form
//! `@section('name', 'content')`. The layout marks where content goes with
//! `@yield('name')` or `@yield('name', 'default')`. Everything in the child
//! outside of sections is discarded.
//!
//! A layout may itself extend another layout. Each level only sees the
//! sections of the template directly below it, so a section has to be passed
//! on with a `@yield` inside the middle layout's own section to reach the top.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::compile::scan::{self, Cursor};
use crate::compile::Compiler;
use crate::Result;

const EXTENDS: &str = "@extends(";
const SECTION: &str = "@section(";
const ENDSECTION: &str = "@endsection";
const YIELD: &str = "@yield(";

enum Section {
    /// `@section('name', 'content')`
    Inline(String, String),
    /// `@section('name')`, the content follows up to `@endsection`.
    Block(String),
}

/// Replaces a template that extends a layout with the filled in layout.
///
/// Templates without a valid `@extends` marker are returned unchanged. Also
/// returns the compiler for the outermost layout, so that includes in the
/// result count from the layout's depth.
pub(crate) fn resolve<'a, 'engine>(
    mut compiler: Compiler<'engine>,
    source: &'a str,
) -> Result<(Compiler<'engine>, Cow<'a, str>)> {
    let mut text = Cow::Borrowed(source);

    while let Some(name) = extends(&text) {
        compiler = compiler.descend(1)?;
        let sections = sections(&text);
        let layout = compiler.load(&name)?;
        text = Cow::Owned(fill_yields(&layout, &sections));
    }

    Ok((compiler, text))
}

/// Returns the layout name of the first well formed `@extends` marker.
fn extends(text: &str) -> Option<String> {
    let mut pos = 0;
    while let Some(i) = scan::find(text, pos, EXTENDS) {
        let mut c = Cursor::new(text, i + EXTENDS.len());
        if let Some(name) = c.string() {
            if c.eat(")") {
                return Some(name);
            }
        }
        pos = i + EXTENDS.len();
    }
    None
}

/// Returns every section in the text, later sections overwrite earlier ones
/// with the same name.
fn sections(text: &str) -> HashMap<String, String> {
    let mut sections = HashMap::new();
    let mut pos = 0;
    while let Some(i) = scan::find(text, pos, SECTION) {
        let mut c = Cursor::new(text, i + SECTION.len());
        match parse_section(&mut c) {
            Some(Section::Inline(name, content)) => {
                sections.insert(name, content);
                pos = c.pos();
            }
            Some(Section::Block(name)) => {
                let start = c.pos();
                let Some(end) = scan::find(text, start, ENDSECTION) else {
                    break;
                };
                sections.insert(name, text[start..end].to_owned());
                pos = end + ENDSECTION.len();
            }
            None => pos = i + SECTION.len(),
        }
    }
    sections
}

fn parse_section(c: &mut Cursor<'_>) -> Option<Section> {
    let name = c.string()?;
    if c.eat(",") {
        let content = c.string()?;
        return c.eat(")").then_some(Section::Inline(name, content));
    }
    c.eat(")").then_some(Section::Block(name))
}

/// Replaces every `@yield` marker in the layout with the matching section,
/// the default or nothing.
fn fill_yields(layout: &str, sections: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(layout.len());
    let mut last = 0;
    let mut pos = 0;
    while let Some(i) = scan::find(layout, pos, YIELD) {
        let mut c = Cursor::new(layout, i + YIELD.len());
        match parse_yield(&mut c) {
            Some((name, default)) => {
                out.push_str(&layout[last..i]);
                match sections.get(&name) {
                    Some(content) => out.push_str(content),
                    None => out.push_str(default.as_deref().unwrap_or("")),
                }
                last = c.pos();
                pos = last;
            }
            None => pos = i + YIELD.len(),
        }
    }
    out.push_str(&layout[last..]);
    out
}

fn parse_yield(c: &mut Cursor<'_>) -> Option<(String, Option<String>)> {
    let name = c.string()?;
    let default = match c.eat(",") {
        true => Some(c.string()?),
        false => None,
    };
    c.eat(")").then_some((name, default))
}
