// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

/// Reasons a pan/zoom binding could not be attached.
#[derive(Clone, PartialEq, Eq)]
pub enum PanZoomError {
    /// No global `window` (not running in a browser main thread).
    NoWindow,
    /// The window has no document.
    NoDocument,
    /// A selector target matched no element.
    SelectorNotFound(String),
    /// A DOM call threw; carries the stringified exception.
    Js(String),
}

impl fmt::Debug for PanZoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => f.write_str("NoWindow"),
            Self::NoDocument => f.write_str("NoDocument"),
            Self::SelectorNotFound(selector) => write!(f, "SelectorNotFound({selector:?})"),
            Self::Js(message) => write!(f, "Js({message:?})"),
        }
    }
}

impl fmt::Display for PanZoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => f.write_str("no global window available"),
            Self::NoDocument => f.write_str("window has no document"),
            Self::SelectorNotFound(selector) => {
                write!(f, "selector {selector:?} did not match any element")
            }
            Self::Js(message) => write!(f, "DOM call failed: {message}"),
        }
    }
}

impl core::error::Error for PanZoomError {}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for PanZoomError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        use alloc::format;

        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &"message".into())
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Js(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::string::ToString;

    #[test]
    fn display_names_the_failing_selector() {
        let err = PanZoomError::SelectorNotFound("#canvas".into());
        assert_eq!(
            err.to_string(),
            "selector \"#canvas\" did not match any element"
        );
        assert_eq!(alloc::format!("{err:?}"), "SelectorNotFound(\"#canvas\")");
    }

    #[test]
    fn js_errors_carry_their_message() {
        let err = PanZoomError::Js("SyntaxError: bad selector".into());
        assert_eq!(err.to_string(), "DOM call failed: SyntaxError: bad selector");
        assert_ne!(err, PanZoomError::NoDocument);
    }
}
