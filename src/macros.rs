/// Construct a [`Value`][crate::Value] map to use as a context.
///
/// Keys are identifiers, values are nested `{ ... }` maps, `[ ... ]` lists,
/// `None` or any expression that can be converted into a
/// [`Value`][crate::Value] using [`From`]. Entries keep the order in which
/// they are written.
///
/// # Examples
///
/// ```
/// let ctx = quill::value! {
///     user: {
///         name: "John Smith",
///         roles: ["admin", "editor"],
///         manager: None,
///     },
///     count: 2 + 3,
/// };
/// ```
#[macro_export]
macro_rules! value {
    ($($tt:tt)*) => {
        $crate::_value!(@map [] $($tt)*)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! _value {
    // Map entries are accumulated as `(key, value),` pairs.
    (@map [$($done:tt)*]) => {
        $crate::Value::Map(<$crate::value::Map<::std::string::String, $crate::Value> as ::std::iter::FromIterator<_>>::from_iter([$($done)*]))
    };

    (@map [$($done:tt)*] $key:ident : None $(, $($rest:tt)*)?) => {
        $crate::_value!(@map [$($done)* ($crate::_value!(@key $key), $crate::Value::None),] $($($rest)*)?)
    };

    (@map [$($done:tt)*] $key:ident : [$($list:tt)*] $(, $($rest:tt)*)?) => {
        $crate::_value!(@map [$($done)* ($crate::_value!(@key $key), $crate::_value!(@list [] $($list)*)),] $($($rest)*)?)
    };

    (@map [$($done:tt)*] $key:ident : {$($map:tt)*} $(, $($rest:tt)*)?) => {
        $crate::_value!(@map [$($done)* ($crate::_value!(@key $key), $crate::_value!(@map [] $($map)*)),] $($($rest)*)?)
    };

    (@map [$($done:tt)*] $key:ident : $value:expr $(, $($rest:tt)*)?) => {
        $crate::_value!(@map [$($done)* ($crate::_value!(@key $key), $crate::Value::from($value)),] $($($rest)*)?)
    };

    // List items are accumulated as `value,`.
    (@list [$($done:tt)*]) => {
        $crate::Value::List(::std::vec![$($done)*])
    };

    (@list [$($done:tt)*] None $(, $($rest:tt)*)?) => {
        $crate::_value!(@list [$($done)* $crate::Value::None,] $($($rest)*)?)
    };

    (@list [$($done:tt)*] [$($list:tt)*] $(, $($rest:tt)*)?) => {
        $crate::_value!(@list [$($done)* $crate::_value!(@list [] $($list)*),] $($($rest)*)?)
    };

    (@list [$($done:tt)*] {$($map:tt)*} $(, $($rest:tt)*)?) => {
        $crate::_value!(@list [$($done)* $crate::_value!(@map [] $($map)*),] $($($rest)*)?)
    };

    (@list [$($done:tt)*] $value:expr $(, $($rest:tt)*)?) => {
        $crate::_value!(@list [$($done)* $crate::Value::from($value),] $($($rest)*)?)
    };

    (@key $key:ident) => {
        ::std::string::String::from(::std::stringify!($key))
    };
}
