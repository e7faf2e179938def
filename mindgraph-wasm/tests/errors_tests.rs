#![cfg(target_arch = "wasm32")]

use js_sys::Reflect;
use mindgraph_wasm::MindMap;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

#[wasm_bindgen_test]
fn typed_errors_for_bad_input() {
    let mut m = MindMap::new(1280.0, 800.0);
    m.set_seed(7);
    let root = m.create_root().unwrap();

    let r = m.create_child_res("ghost", None);
    assert!(is_err(&r, "unknown_node"));

    let r = m.create_child_res(&root, Some("sideways".to_string()));
    assert!(is_err(&r, "invalid_direction"));

    let r = m.create_sibling_res(&root);
    assert!(is_err(&r, "root_sibling"));

    let r = m.update_node_position_res(&root, f32::NAN, 0.0);
    assert!(is_err(&r, "non_finite"));

    let r = m.from_document_res("{broken");
    assert!(is_err(&r, "invalid_document"));

    let r = m.from_outline_res("flowchart\n  a\n");
    assert!(is_err(&r, "invalid_outline"));
}

#[wasm_bindgen_test]
fn rejected_reparent_is_typed() {
    let mut m = MindMap::new(1280.0, 800.0);
    m.set_seed(7);
    let root = m.create_root().unwrap();
    let a = m.create_child(&root, None).unwrap();
    let b = m.create_child(&a, None).unwrap();

    let r = m.reparent_res(&a, &b);
    assert!(is_err(&r, "invalid_reparent"));

    let rev = m.revision();
    let r = m.reparent_res(&b, &root);
    let ok = Reflect::get(&r, &JsValue::from_str("ok"))
        .unwrap()
        .as_bool()
        .unwrap();
    assert!(ok);
    assert!(m.revision() > rev);
}
