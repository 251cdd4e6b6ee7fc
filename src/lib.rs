//! A directive based template engine.
//!
//! # Features
//!
//! ### Syntax
//!
//! - Escaped interpolation: `{{ user.name }}`
//! - Raw interpolation: `{!! post.body !!}`
//! - Conditionals: `@if(user.admin) ... @elseif(user.editor) ... @else ... @endif`
//! - Loops: `@foreach(users as user, i) ... @endforeach`
//! - Layouts: `@extends('layouts.app')`, `@section('content') ... @endsection`
//!   and `@yield('content', 'default')`
//! - Nested views: `@include('partials.nav', {active: 'home'})`
//! - JavaScript like expressions: `user?.name ?? 'guest'`,
//!   `items.length > 0 ? 'some' : 'none'`
//!
//! ### Engine
//!
//! - Views are found through a pluggable [`Resolver`]
//! - Render using any [`serde`] serializable values
//! - Convenient macro for quick rendering:
//!   `quill::value!{ name: "John", age: 42 }`
//! - An [`Engine`] is [`Send`] and [`Sync`] and can compile many templates
//!   concurrently
//!
//! # Getting started
//!
//! Your entry point is the [`Engine`] struct. Templates that don't refer to
//! other views can be compiled straight away.
//!
//! ```
//! let engine = quill::Engine::new();
//! let ctx = quill::value! { user: { name: "John Smith" } };
//! let result = engine.compile("Hello {{ user.name }}!", ctx)?;
//! assert_eq!(result, "Hello John Smith!");
//! # Ok::<(), quill::Error>(())
//! ```
//!
//! Layouts and includes name other views. The engine looks these up using a
//! [`Resolver`], for example a [`FileResolver`] over a directory of views or
//! an in-memory set of [`Templates`].
//!
//! ```
//! use quill::{Engine, Templates};
//!
//! let templates = Templates::from_iter([
//!     ("layouts.app", "<html>@yield('content')</html>"),
//!     ("home", "@extends('layouts.app')@section('content')Hi {{ name }}@endsection"),
//! ]);
//!
//! let engine = Engine::with_resolver(templates);
//! let result = engine.render("home", quill::value! { name: "John" })?;
//! assert_eq!(result, "<html>Hi John</html>");
//! # Ok::<(), quill::Error>(())
//! ```
//!
//! # Pipeline
//!
//! Every compile runs the same stages, each over the whole text before the
//! next one starts: layouts, includes, conditionals, loops and finally
//! interpolation of both `{{ }}` and `{!! !!}`. Loop bodies are rendered with
//! conditionals and interpolation only. Some consequences of this are:
//!
//! - Conditionals are resolved before loops run, so a condition can't refer
//!   to a loop variable.
//! - Includes are expanded before loops run, so every include sees the outer
//!   context.
//! - Loops can't be nested, a loop body always ends at the next
//!   `@endforeach`.
//! - Interpolated values are never interpolated again, so a value containing
//!   `{{ x }}` is written out as is.
//! - A layout only sees the sections of the template that extends it. To pass
//!   a section further up, yield it inside one of the layout's own sections.
//!
//! # Errors
//!
//! Expression errors never fail a compile. A condition that fails to evaluate
//! is false, a loop over it is empty and an interpolation of it is empty.
//! Markers without a matching end, like an `@if` without an `@endif`, are
//! left in the output as is. A compile only fails when a view can't be found
//! or loaded. Use [`Engine::eval`] to see why an expression fails.
//!
//! Expressions are not sandboxed, templates should be trusted code.

mod compile;
mod context;
mod error;
mod expr;
pub mod fmt;
mod loader;
mod macros;
mod types;
pub mod value;

use crate::compile::Compiler;
use crate::context::Context;

pub use crate::error::{Error, ErrorKind};
pub use crate::loader::{FileResolver, Location, Resolver, Templates};
#[cfg(feature = "serde")]
pub use crate::value::to_value;
pub use crate::value::Value;

/// A type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The default maximum depth of nested layouts and includes.
const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

/// The compilation engine.
///
/// An engine holds the [`Resolver`] used to find views and its
/// configuration. It stores no state between compiles, so one engine can be
/// shared between threads and used for any number of concurrent compiles.
pub struct Engine {
    resolver: Option<Box<dyn Resolver>>,
    max_include_depth: usize,
}

impl Default for Engine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Construct a new engine without a resolver.
    ///
    /// Templates compiled with this engine can't use `@extends` or
    /// `@include`.
    #[inline]
    pub fn new() -> Self {
        Self {
            resolver: None,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }

    /// Construct a new engine that finds views using the given resolver.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use quill::{Engine, FileResolver};
    ///
    /// let engine = Engine::with_resolver(FileResolver::new("views"));
    /// ```
    #[inline]
    pub fn with_resolver<R>(resolver: R) -> Self
    where
        R: Resolver + 'static,
    {
        let mut engine = Self::new();
        engine.set_resolver(resolver);
        engine
    }

    /// Set the resolver used to find views.
    #[inline]
    pub fn set_resolver<R>(&mut self, resolver: R)
    where
        R: Resolver + 'static,
    {
        self.resolver = Some(Box::new(resolver));
    }

    /// Set the maximum depth of nested layouts and includes.
    ///
    /// Each layout a template extends and each include counts as one level.
    /// Defaults to 64.
    #[inline]
    pub fn set_max_include_depth(&mut self, depth: usize) {
        self.max_include_depth = depth;
    }

    /// Compile a template using the provided value as the context.
    ///
    /// The context must serialize to a map.
    ///
    /// # Examples
    ///
    /// ```
    /// #[derive(serde::Serialize)]
    /// struct Context { items: Vec<&'static str> }
    ///
    /// let result = quill::Engine::new().compile(
    ///     "@foreach(items as item, i){{ i }}:{{ item }} @endforeach",
    ///     Context { items: vec!["a", "b"] },
    /// )?;
    /// assert_eq!(result, "0:a 1:b ");
    /// # Ok::<(), quill::Error>(())
    /// ```
    #[cfg(feature = "serde")]
    #[inline]
    pub fn compile<S>(&self, source: &str, ctx: S) -> Result<String>
    where
        S: serde::Serialize,
    {
        self.compile_from(source, &to_value(ctx)?)
    }

    /// Compile a template using the provided value as the context.
    ///
    /// The context must be a [`Value::Map`] or [`Value::None`].
    pub fn compile_from(&self, source: &str, ctx: &Value) -> Result<String> {
        let ctx = Context::root(ctx)?;
        Compiler::new(self).compile(source, &ctx)
    }

    /// Load a view by name using the resolver and compile it.
    #[cfg(feature = "serde")]
    #[inline]
    pub fn render<S>(&self, name: &str, ctx: S) -> Result<String>
    where
        S: serde::Serialize,
    {
        self.render_from(name, &to_value(ctx)?)
    }

    /// Load a view by name using the resolver and compile it.
    pub fn render_from(&self, name: &str, ctx: &Value) -> Result<String> {
        let ctx = Context::root(ctx)?;
        let compiler = Compiler::new(self);
        let source = compiler.load(name)?;
        compiler
            .compile(&source, &ctx)
            .map_err(|err| err.with_template_name(name))
    }

    /// Evaluate a single expression.
    ///
    /// Unlike expressions in templates, errors are returned.
    ///
    /// # Examples
    ///
    /// ```
    /// let engine = quill::Engine::new();
    ///
    /// let value = engine.eval("user?.name ?? 'guest'", quill::value! { user: None })?;
    /// assert_eq!(value, quill::Value::from("guest"));
    ///
    /// let err = engine.eval("user.name", quill::value! {}).unwrap_err();
    /// assert_eq!(err.kind(), quill::ErrorKind::Eval);
    /// # Ok::<(), quill::Error>(())
    /// ```
    #[cfg(feature = "serde")]
    #[inline]
    pub fn eval<S>(&self, expr: &str, ctx: S) -> Result<Value>
    where
        S: serde::Serialize,
    {
        self.eval_from(expr, &to_value(ctx)?)
    }

    /// Evaluate a single expression.
    pub fn eval_from(&self, expr: &str, ctx: &Value) -> Result<Value> {
        let ctx = Context::root(ctx)?;
        expr::eval(expr, &ctx).map(|value| value.into_owned())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("resolver", &self.resolver.is_some())
            .field("max_include_depth", &self.max_include_depth)
            .finish()
    }
}
