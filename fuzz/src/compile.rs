#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (source, expr) = data;
    let engine = quill::Engine::new();
    let _ = engine.compile_from(source, &quill::Value::None);
    let _ = engine.eval_from(expr, &quill::Value::None);
});
