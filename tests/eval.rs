use quill::{value, Engine, ErrorKind, Value};

fn eval(expr: &str) -> Value {
    let ctx = value! {
        user: { name: "John", age: 42, roles: ["admin", "editor"], manager: None },
        items: [1, 2, 3],
        empty: "",
        n: 7,
        x: 1.5,
        s: "10",
    };
    Engine::new().eval(expr, ctx).unwrap()
}

fn eval_err(expr: &str) -> quill::Error {
    Engine::new()
        .eval(expr, value! { user: { name: "John" }, nothing: None })
        .unwrap_err()
}

#[test]
fn eval_literals() {
    assert_eq!(eval("null"), Value::None);
    assert_eq!(eval("true"), Value::Bool(true));
    assert_eq!(eval("false"), Value::Bool(false));
    assert_eq!(eval("123"), Value::Integer(123));
    assert_eq!(eval("1.5e3"), Value::Float(1500.0));
    assert_eq!(eval(".5"), Value::Float(0.5));
    assert_eq!(eval(r#"'it\'s'"#), Value::from("it's"));
    assert_eq!(eval(r#""a\nb""#), Value::from("a\nb"));
    assert_eq!(eval("[1, 'a', null,]"), Value::from([Value::from(1), Value::from("a"), Value::None]));
}

#[test]
fn eval_member_access() {
    assert_eq!(eval("user.name"), Value::from("John"));
    assert_eq!(eval("user['name']"), Value::from("John"));
    assert_eq!(eval("user.roles.1"), Value::from("editor"));
    assert_eq!(eval("user.roles[0]"), Value::from("admin"));
    assert_eq!(eval("user.roles[n - 6]"), Value::from("editor"));
    assert_eq!(eval("user.roles[5]"), Value::None);
    assert_eq!(eval("user.missing"), Value::None);
    assert_eq!(eval("user.manager"), Value::None);
}

#[test]
fn eval_length() {
    assert_eq!(eval("items.length"), Value::Integer(3));
    assert_eq!(eval("user.length"), Value::Integer(4));
    assert_eq!(eval("user.name.length"), Value::Integer(4));
    assert_eq!(eval("empty.length"), Value::Integer(0));
}

#[test]
fn eval_optional_chaining() {
    assert_eq!(eval("user.manager?.name"), Value::None);
    assert_eq!(eval("user.manager?.name.first"), Value::None);
    assert_eq!(eval("user?.name"), Value::from("John"));
    assert_eq!(eval("user.manager?.[0]"), Value::None);
}

#[test]
fn eval_arithmetic() {
    assert_eq!(eval("1 + 2 * 3"), Value::Integer(7));
    assert_eq!(eval("(1 + 2) * 3"), Value::Integer(9));
    assert_eq!(eval("n / 2"), Value::Float(3.5));
    assert_eq!(eval("8 / 2"), Value::Integer(4));
    assert_eq!(eval("n % 4"), Value::Integer(3));
    assert_eq!(eval("-n"), Value::Integer(-7));
    assert_eq!(eval("x * 2"), Value::Float(3.0));
    assert_eq!(eval("s * 2"), Value::Integer(20));
    assert_eq!(eval("+s"), Value::Integer(10));
    assert_eq!(eval("9223372036854775807 + 1"), Value::Float(9223372036854775808.0));
}

#[test]
fn eval_concatenation() {
    assert_eq!(eval("'a' + 'b'"), Value::from("ab"));
    assert_eq!(eval("s + 1"), Value::from("101"));
    assert_eq!(eval("'n=' + n"), Value::from("n=7"));
    assert_eq!(eval("'' + null"), Value::from(""));
    assert_eq!(eval("'' + items"), Value::from("1,2,3"));
}

#[test]
fn eval_comparison() {
    assert_eq!(eval("n > 5"), Value::Bool(true));
    assert_eq!(eval("n <= 6"), Value::Bool(false));
    assert_eq!(eval("x >= 1.5"), Value::Bool(true));
    assert_eq!(eval("'apple' < 'banana'"), Value::Bool(true));
    assert_eq!(eval("s > 9"), Value::Bool(true));
}

#[test]
fn eval_equality() {
    assert_eq!(eval("n === 7"), Value::Bool(true));
    assert_eq!(eval("n === 7.0"), Value::Bool(true));
    assert_eq!(eval("s === 10"), Value::Bool(false));
    assert_eq!(eval("s == 10"), Value::Bool(true));
    assert_eq!(eval("s != 10"), Value::Bool(false));
    assert_eq!(eval("s !== 10"), Value::Bool(true));
    assert_eq!(eval("true == 1"), Value::Bool(true));
    assert_eq!(eval("null == 0"), Value::Bool(false));
    assert_eq!(eval("user.missing === null"), Value::Bool(true));
    assert_eq!(eval("items === [1, 2, 3]"), Value::Bool(true));
}

#[test]
fn eval_logical() {
    assert_eq!(eval("empty || 'default'"), Value::from("default"));
    assert_eq!(eval("user.name && user.age"), Value::Integer(42));
    assert_eq!(eval("empty && missing"), Value::from(""));
    assert_eq!(eval("n || missing"), Value::Integer(7));
    assert_eq!(eval("user.manager ?? 'none'"), Value::from("none"));
    assert_eq!(eval("empty ?? 'none'"), Value::from(""));
    assert_eq!(eval("!empty"), Value::Bool(true));
    assert_eq!(eval("!!items"), Value::Bool(true));
}

#[test]
fn eval_ternary() {
    assert_eq!(eval("n > 5 ? 'big' : 'small'"), Value::from("big"));
    assert_eq!(
        eval("n > 10 ? 'huge' : n > 5 ? 'big' : 'small'"),
        Value::from("big")
    );
    assert_eq!(eval("empty ? missing : 'ok'"), Value::from("ok"));
}

#[test]
fn eval_err_not_defined() {
    let err = eval_err("missing");
    assert_eq!(err.kind(), ErrorKind::Eval);
    assert_eq!(err.to_string(), "`missing` is not defined between bytes 0 and 7");
}

#[test]
fn eval_err_property_of_null() {
    let err = eval_err("nothing.name");
    assert_eq!(err.kind(), ErrorKind::Eval);
    assert_eq!(
        err.to_string(),
        "cannot read property `name` of null between bytes 8 and 12"
    );
}

#[test]
fn eval_err_not_a_number() {
    let err = eval_err("user * 2");
    assert_eq!(err.kind(), ErrorKind::Eval);
    assert_eq!(
        err.to_string(),
        "expected number for `*`, found map between bytes 0 and 8"
    );

    let err = eval_err("[1] < 2");
    assert_eq!(
        err.to_string(),
        "expected number for `<`, found list between bytes 0 and 7"
    );
}

#[test]
fn eval_err_syntax() {
    let err = eval_err("user.");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(
        err.to_string(),
        "expected identifier or index, found EOF between bytes 5 and 5"
    );

    let err = eval_err("user name");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(
        err.to_string(),
        "expected end of expression, found identifier between bytes 5 and 9"
    );

    let err = eval_err("'open");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.to_string(), "undelimited string between bytes 0 and 5");
}

#[test]
fn eval_err_pretty() {
    let err = eval_err("1 +");
    assert_eq!(
        format!("{err:#}"),
        "
   |
 1 | 1 +
   |    ^ expected expression, found EOF
"
    );
}

#[test]
fn eval_no_ambient_bindings() {
    for expr in ["Math", "window", "this", "undefined"] {
        assert_eq!(eval_err(expr).kind(), ErrorKind::Eval);
    }
}
