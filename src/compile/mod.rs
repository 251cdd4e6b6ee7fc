//! The directive compiler.
//!
//! Compiling a template runs a fixed pipeline over the whole text, each stage
//! completing before the next one starts:
//!
//! 1. [`layout`] replaces a child template with its layout.
//! 2. [`include`] expands `@include` markers, each one a full compile of the
//!    included view.
//! 3. [`cond`] resolves `@if` blocks.
//! 4. [`foreach`] expands `@foreach` blocks, running stages 3 and 5 on
//!    each iteration.
//! 5. [`emit`] interpolates `{{ expr }}` and `{!! expr !!}` in the text
//!    outside of loops.
//!
//! Interpolated values and rendered loop bodies are never scanned again.
//! Stages 3 to 5 never fail. Expression errors make a condition false, a loop
//! empty or an interpolation empty. Only loading views can fail a compile.

mod cond;
mod emit;
mod foreach;
mod include;
mod layout;
mod scan;

use crate::context::Context;
use crate::{Engine, Error, Result};

/// Compiles templates for an engine at a given layout and include depth.
#[derive(Clone, Copy)]
pub(crate) struct Compiler<'engine> {
    engine: &'engine Engine,
    depth: usize,
}

impl<'engine> Compiler<'engine> {
    pub fn new(engine: &'engine Engine) -> Self {
        Self { engine, depth: 0 }
    }

    /// Runs the full pipeline.
    pub fn compile(&self, source: &str, ctx: &Context<'_>) -> Result<String> {
        let (compiler, text) = layout::resolve(*self, source)?;
        let text = include::expand(&compiler, &text, ctx)?;
        Ok(render(&text, ctx))
    }

    /// Returns a compiler for a view nested `levels` deeper than this one.
    fn descend(&self, levels: usize) -> Result<Compiler<'engine>> {
        let depth = self.depth + levels;
        let max = self.engine.max_include_depth;
        if depth > max {
            return Err(Error::max_include_depth(max));
        }
        Ok(Compiler {
            engine: self.engine,
            depth,
        })
    }

    /// Resolves a view name and loads its source.
    pub fn load(&self, name: &str) -> Result<String> {
        let resolver = self
            .engine
            .resolver
            .as_deref()
            .ok_or_else(|| Error::no_resolver(name))?;
        let location = resolver.resolve(name)?;
        log::trace!(
            "loading template `{name}` from `{}`",
            location.path().display()
        );
        resolver.load(&location)
    }
}

/// Runs the stages of the pipeline that do not load views.
fn render(source: &str, ctx: &Context<'_>) -> String {
    let text = cond::resolve(source, ctx);
    foreach::expand(&text, ctx).into_owned()
}

/// Renders one iteration of a loop body.
fn render_body(source: &str, ctx: &Context<'_>) -> String {
    let text = cond::resolve(source, ctx);
    emit::interpolate(&text, ctx).into_owned()
}
