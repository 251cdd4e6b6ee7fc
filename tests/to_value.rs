use std::collections::BTreeMap;

use serde::Serialize;

use quill::value::{to_value, Value};
use quill::{value, Engine, ErrorKind};

#[test]
fn to_value_scalars() {
    assert_eq!(to_value(true).unwrap(), Value::Bool(true));
    assert_eq!(to_value(7_u8).unwrap(), Value::Integer(7));
    assert_eq!(to_value(-7_i64).unwrap(), Value::Integer(-7));
    assert_eq!(to_value(0.5_f32).unwrap(), Value::Float(0.5));
    assert_eq!(to_value('a').unwrap(), Value::from("a"));
    assert_eq!(to_value("testing...").unwrap(), Value::from("testing..."));
}

#[test]
fn to_value_u64_out_of_range() {
    assert_eq!(to_value(42_u64).unwrap(), Value::Integer(42));
    let err = to_value(u64::MAX).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialize);
    assert_eq!(
        err.to_string(),
        "integer `18446744073709551615` is out of range"
    );
}

#[test]
fn to_value_nothing_is_none() {
    #[derive(Serialize)]
    struct Unit;

    assert_eq!(to_value(None::<i32>).unwrap(), Value::None);
    assert_eq!(to_value(()).unwrap(), Value::None);
    assert_eq!(to_value(Unit).unwrap(), Value::None);
    assert_eq!(to_value(Some("x")).unwrap(), Value::from("x"));
}

#[test]
fn to_value_sequences_are_lists() {
    #[derive(Serialize)]
    struct Triple(&'static str, i32, bool);

    let exp = Value::from([Value::from("a"), Value::from(1), Value::from(true)]);
    assert_eq!(to_value(("a", 1, true)).unwrap(), exp);
    assert_eq!(to_value(Triple("a", 1, true)).unwrap(), exp);
    assert_eq!(to_value(vec![1, 2]).unwrap(), Value::from([1, 2]));
}

#[test]
fn to_value_enum_variants_are_tagged() {
    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Line(i32, i32),
        Rect { w: i32, h: i32 },
    }

    assert_eq!(to_value(Shape::Empty).unwrap(), Value::from("Empty"));
    assert_eq!(to_value(Shape::Circle(0.5)).unwrap(), value! { Circle: 0.5 });
    assert_eq!(to_value(Shape::Line(1, 2)).unwrap(), value! { Line: [1, 2] });
    assert_eq!(
        to_value(Shape::Rect { w: 3, h: 4 }).unwrap(),
        value! { Rect: { w: 3, h: 4 } }
    );
}

#[test]
fn to_value_map_key_scalars() {
    assert_eq!(
        to_value(BTreeMap::from([(1, "a"), (2, "b")])).unwrap(),
        Value::from([("1", "a"), ("2", "b")])
    );
    assert_eq!(
        to_value(BTreeMap::from([(Some('x'), true)])).unwrap(),
        Value::from([("x", true)])
    );
}

#[test]
fn to_value_map_key_not_string() {
    let err = to_value(BTreeMap::from([((1, 2), "b")])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialize);
    assert_eq!(err.to_string(), "map key must be a string, found list");
}

#[test]
fn to_value_bytes() {
    #[derive(Serialize)]
    struct Test<'a> {
        #[serde(serialize_with = "serialize_bytes")]
        data: &'a [u8],
    }

    fn serialize_bytes<S: serde::Serializer>(v: &&[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bytes(v)
    }

    assert_eq!(
        to_value(Test { data: b"ab" }).unwrap(),
        value! { data: [97, 98] }
    );
}

#[test]
fn to_value_struct_keeps_field_order() {
    #[derive(Serialize)]
    struct Test {
        zebra: i32,
        apple: i32,
        mango: i32,
    }
    let value = to_value(Test {
        zebra: 1,
        apple: 2,
        mango: 3,
    })
    .unwrap();
    let Value::Map(map) = value else {
        panic!("expected map");
    };
    let keys: Vec<_> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, ["zebra", "apple", "mango"]);
}

#[test]
fn to_value_struct_fields_iterate_in_order() {
    #[derive(Serialize)]
    struct Totals {
        zebra: i32,
        apple: i32,
    }

    #[derive(Serialize)]
    struct Page {
        totals: Totals,
    }

    let result = Engine::new()
        .compile(
            "@foreach(totals as n, name){{ name }}={{ n }};@endforeach",
            Page {
                totals: Totals { zebra: 1, apple: 2 },
            },
        )
        .unwrap();
    assert_eq!(result, "zebra=1;apple=2;");
}
