//! WASM bindings for the LaTeX tokenizer.
//!
//! Exposes `tokenize()` and `check()` to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

/// Tokenize LaTeX source.
///
/// Returns an array of `{ kind, text?, span: { start, end, line, column } }`.
/// Throws a JS error if the source leaves a math region open or misuses a
/// math delimiter.
#[wasm_bindgen]
pub fn tokenize(source: &str) -> Result<JsValue, JsError> {
    let tokens = latex_lexer::tokenize(source).map_err(|e| JsError::new(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&tokens).map_err(|e| JsError::new(&e.to_string()))
}

/// Check LaTeX source without returning tokens.
///
/// Returns `{ ok: true }` or `{ ok: false, message, line, column }`.
#[wasm_bindgen]
pub fn check(source: &str) -> Result<JsValue, JsError> {
    let js_obj = js_sys::Object::new();
    let set = |key: &str, value: JsValue| {
        js_sys::Reflect::set(&js_obj, &key.into(), &value)
            .map_err(|_| JsError::new(&format!("Failed to set {key} property")))
    };

    match latex_lexer::tokenize(source) {
        Ok(_) => {
            set("ok", true.into())?;
        }
        Err(e) => {
            let at = e.position();
            set("ok", false.into())?;
            set("message", e.to_string().into())?;
            set("line", (at.line as u32).into())?;
            set("column", (at.column as u32).into())?;
        }
    }

    Ok(js_obj.into())
}

/// Get the tokenizer version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use latex_lexer::TokenKind;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Native tests (non-WASM) — the JS wrappers only convert these results
    // =========================================================================

    fn native_kinds(source: &str) -> Vec<TokenKind> {
        latex_lexer::tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_source() {
        assert!(native_kinds("").is_empty());
    }

    #[test]
    fn test_sentence_with_math() {
        assert_eq!(
            native_kinds("If $x>0$, then"),
            vec![
                TokenKind::Text("If".into()),
                TokenKind::Space,
                TokenKind::StartInlineMath,
                TokenKind::Text("x".into()),
                TokenKind::Symbol(">".into()),
                TokenKind::Number("0".into()),
                TokenKind::EndInlineMath,
                TokenKind::Punct(",".into()),
                TokenKind::Space,
                TokenKind::Text("then".into()),
            ]
        );
    }

    #[test]
    fn test_error_carries_position() {
        let err = latex_lexer::tokenize("a\n$$x").unwrap_err();
        assert_eq!(err.position().line, 2);
        assert_eq!(err.position().column, 1);
        assert!(err.to_string().contains("display"));
    }

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }

    #[test]
    fn test_multiple_runs() {
        // No state leaks between calls
        let first = native_kinds("$a$");
        let second = native_kinds("b");
        assert_eq!(first.len(), 3);
        assert_eq!(second, vec![TokenKind::Text("b".into())]);
    }
}
