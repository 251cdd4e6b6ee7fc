//! Conversions into [`Value`] for building contexts by hand.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use crate::value::{List, Map};
use crate::Value;

macro_rules! impl_from {
    ($($ty:ty => |$v:ident| $conv:expr),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $conv
                }
            }
        )+
    };
}

impl_from! {
    () => |_v| Value::None,
    bool => |b| Value::Bool(b),
    u8 => |n| Value::Integer(n.into()),
    u16 => |n| Value::Integer(n.into()),
    u32 => |n| Value::Integer(n.into()),
    i8 => |n| Value::Integer(n.into()),
    i16 => |n| Value::Integer(n.into()),
    i32 => |n| Value::Integer(n.into()),
    i64 => |n| Value::Integer(n),
    f32 => |n| Value::Float(n.into()),
    f64 => |n| Value::Float(n),
    String => |s| Value::String(s),
    &str => |s| Value::String(s.to_owned()),
    Cow<'_, str> => |s| Value::String(s.into_owned()),
}

/// Lengths and indices that don't fit an integer become floats.
impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Value::Float(n as f64), Value::Integer)
    }
}

impl<V> From<Option<V>> for Value
where
    V: Into<Value>,
{
    fn from(opt: Option<V>) -> Self {
        opt.map_or(Value::None, Into::into)
    }
}

impl<V> From<List<V>> for Value
where
    V: Into<Value>,
{
    fn from(items: List<V>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<V, const N: usize> From<[V; N]> for Value
where
    V: Into<Value>,
{
    fn from(items: [V; N]) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_from_map {
    ($($ty:ident),+) => {
        $(
            impl<K, V> From<$ty<K, V>> for Value
            where
                K: Into<String>,
                V: Into<Value>,
            {
                fn from(entries: $ty<K, V>) -> Self {
                    Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
                }
            }
        )+
    };
}

impl_from_map! { Map, BTreeMap, HashMap }

impl<K, V, const N: usize> From<[(K, V); N]> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(entries: [(K, V); N]) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<V> FromIterator<V> for Value
where
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}

impl<K, V> FromIterator<(K, V)> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
