//! Camera acquisition error reporting.
//!
//! The page calls `getUserMedia` itself; when it rejects, the error goes
//! through [`describe_capture_error`] to pick the message shown next to
//! the file picker.

use crate::types::to_js;
use serde::Serialize;
use shelfcam_core::capture::AcquireError;
use wasm_bindgen::prelude::*;

/// What the UI shows for a failed camera acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CaptureErrorInfo {
    kind: &'static str,
    message: String,
    hint: &'static str,
}

/// Classify a `getUserMedia` rejection.
///
/// Accepts a `DOMException` (or any object with a `name`) or a bare name
/// string. Returns `{ kind, message, hint }`, where `kind` is one of
/// `not_found`, `permission_denied`, `busy` or `unsupported`.
#[wasm_bindgen]
pub fn describe_capture_error(err: JsValue) -> Result<JsValue, JsValue> {
    let name = err.as_string().or_else(|| {
        js_sys::Reflect::get(&err, &JsValue::from_str("name"))
            .ok()
            .and_then(|name| name.as_string())
    });
    to_js(&describe(name.as_deref().unwrap_or_default()))
}

pub(crate) fn describe(name: &str) -> CaptureErrorInfo {
    let err = AcquireError::from_dom_exception_name(name);
    log::warn!("camera unavailable ({}): {}", name, err);
    CaptureErrorInfo {
        kind: err.kind(),
        message: err.to_string(),
        hint: err.remediation_hint(),
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_describe_from_name_string() {
        let info = describe_capture_error(JsValue::from_str("NotFoundError")).unwrap();
        let kind = js_sys::Reflect::get(&info, &JsValue::from_str("kind")).unwrap();
        assert_eq!(kind.as_string().as_deref(), Some("not_found"));
    }

    #[wasm_bindgen_test]
    fn test_describe_from_error_object() {
        let err = js_sys::Object::new();
        js_sys::Reflect::set(&err, &JsValue::from_str("name"), &JsValue::from_str("NotAllowedError")).unwrap();
        let info = describe_capture_error(err.into()).unwrap();
        let kind = js_sys::Reflect::get(&info, &JsValue::from_str("kind")).unwrap();
        assert_eq!(kind.as_string().as_deref(), Some("permission_denied"));
    }
}
