//! The data available to expressions during one compile frame.

use std::borrow::Cow;

use crate::value::Map;
use crate::{Error, Result, Value};

/// A layered set of variable bindings.
///
/// Contexts are never mutated. Loop iterations and includes extend a
/// context by layering a new frame on top of it, the new bindings shadow
/// the ones beneath and are only visible to the extending frame.
#[cfg_attr(internal_debug, derive(Debug))]
pub struct Context<'a> {
    vars: Cow<'a, Map<String, Value>>,
    parent: Option<&'a Context<'a>>,
}

impl<'a> Context<'a> {
    /// Constructs the root context from the user supplied value.
    pub fn root(globals: &'a Value) -> Result<Self> {
        let vars = match globals {
            Value::Map(map) => Cow::Borrowed(map),
            Value::None => Cow::Owned(Map::new()),
            value => return Err(Error::invalid_context(value.human())),
        };
        Ok(Self { vars, parent: None })
    }

    /// Returns a new context where the given bindings shadow this one.
    pub fn extend(&'a self, vars: Map<String, Value>) -> Context<'a> {
        Context {
            vars: Cow::Owned(vars),
            parent: Some(self),
        }
    }

    /// Looks up a variable, starting with the innermost frame.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut ctx = self;
        loop {
            if let Some(value) = ctx.vars.get(name) {
                return Some(value);
            }
            ctx = ctx.parent?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_lookup_shadows_parent() {
        let globals = Value::from([("a", 1), ("b", 2)]);
        let root = Context::root(&globals).unwrap();
        let child = root.extend(Map::from_iter([(String::from("a"), Value::from(3))]));
        assert_eq!(child.lookup("a"), Some(&Value::Integer(3)));
        assert_eq!(child.lookup("b"), Some(&Value::Integer(2)));
        assert_eq!(root.lookup("a"), Some(&Value::Integer(1)));
        assert_eq!(child.lookup("c"), None);
    }

    #[test]
    fn context_root_none_is_empty() {
        let globals = Value::None;
        let root = Context::root(&globals).unwrap();
        assert_eq!(root.lookup("a"), None);
    }

    #[test]
    fn context_root_err_not_a_map() {
        let globals = Value::from(["a"]);
        let err = Context::root(&globals).err().unwrap();
        assert_eq!(err.to_string(), "expected map for context, found list");
    }
}
