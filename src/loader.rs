//! Finding and reading views by name.
//!
//! `@extends` and `@include` refer to other views by a dotted name such as
//! `layouts.app`. The engine hands these names to a [`Resolver`] which maps
//! them to a [`Location`] and then loads the view source from it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{Error, Result};

/// Maps view names to template source.
///
/// Resolvers are shared between concurrent compiles so they must be safe to
/// call from many threads at once.
pub trait Resolver: Send + Sync {
    /// Maps a dotted view name to a location.
    ///
    /// Should fail with [`Error::unknown_template`] when no view with the
    /// given name exists.
    fn resolve(&self, name: &str) -> Result<Location>;

    /// Reads the template source at the given location.
    ///
    /// The default implementation reads the location as a file.
    fn load(&self, location: &Location) -> Result<String> {
        fs::read_to_string(location.path()).map_err(|err| Error::load(location, err))
    }
}

/// Where a resolved view can be loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    path: PathBuf,
}

impl Location {
    /// Construct a new location.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of this location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// An in-memory store of views.
///
/// # Examples
///
/// ```
/// use quill::{Engine, Templates};
///
/// let mut templates = Templates::new();
/// templates.insert("layouts.app", "<main>@yield('content')</main>");
///
/// let engine = Engine::with_resolver(templates);
/// let result = engine.compile(
///     "@extends('layouts.app')@section('content')Hi@endsection",
///     quill::value! {},
/// )?;
/// assert_eq!(result, "<main>Hi</main>");
/// # Ok::<(), quill::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Templates {
    sources: HashMap<String, String>,
}

impl Templates {
    /// Construct an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a view, replacing any existing view with the same name.
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(name.into(), source.into());
    }

    /// Removes a view, returning its source.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.sources.remove(name)
    }
}

impl<N, S> FromIterator<(N, S)> for Templates
where
    N: Into<String>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        let sources = iter
            .into_iter()
            .map(|(n, s)| (n.into(), s.into()))
            .collect();
        Self { sources }
    }
}

impl Resolver for Templates {
    fn resolve(&self, name: &str) -> Result<Location> {
        match self.sources.contains_key(name) {
            true => Ok(Location::new(name)),
            false => Err(Error::unknown_template(name)),
        }
    }

    fn load(&self, location: &Location) -> Result<String> {
        location
            .path()
            .to_str()
            .and_then(|name| self.sources.get(name))
            .cloned()
            .ok_or_else(|| Error::unknown_template(location.path().display().to_string()))
    }
}

/// Resolves views from a directory.
///
/// Each dot in a view name is a directory separator, so with the default
/// extension `layouts.app` resolves to `<root>/layouts/app.html`.
#[derive(Debug, Clone)]
pub struct FileResolver {
    root: PathBuf,
    extension: String,
}

impl FileResolver {
    /// Construct a new resolver for views under the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: String::from("html"),
        }
    }

    /// Set the file extension of views, without the leading dot.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

impl Resolver for FileResolver {
    fn resolve(&self, name: &str) -> Result<Location> {
        // Only dots separate directories, so names can't escape the root.
        let valid = |part: &str| !part.is_empty() && !part.contains(['/', '\\']);
        if !name.split('.').all(valid) {
            return Err(Error::unknown_template(name));
        }
        let mut path = self.root.clone();
        path.extend(name.split('.'));
        path.set_extension(&self.extension);
        log::trace!("resolved template `{name}` to `{}`", path.display());
        match path.is_file() {
            true => Ok(Location::new(path)),
            false => Err(Error::unknown_template(name)),
        }
    }
}

impl<R> Resolver for Arc<R>
where
    R: Resolver + ?Sized,
{
    fn resolve(&self, name: &str) -> Result<Location> {
        (**self).resolve(name)
    }

    fn load(&self, location: &Location) -> Result<String> {
        (**self).load(location)
    }
}
