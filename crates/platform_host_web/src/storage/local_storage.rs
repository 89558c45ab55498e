//! Thin wrappers over `window.localStorage` shared by the browser stores.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
fn storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| "localStorage unavailable".to_string())
}

#[cfg(target_arch = "wasm32")]
fn js_error(op: &str, err: JsValue) -> String {
    format!("localStorage {op} failed: {err:?}")
}

pub(crate) fn get_item(key: &str) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        storage()?
            .get_item(key)
            .map_err(|e| js_error("get_item", e))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = key;
        Ok(None)
    }
}

pub(crate) fn set_item(key: &str, value: &str) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        storage()?
            .set_item(key, value)
            .map_err(|e| js_error("set_item", e))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (key, value);
        Ok(())
    }
}

pub(crate) fn remove_item(key: &str) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        storage()?
            .remove_item(key)
            .map_err(|e| js_error("remove_item", e))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = key;
        Ok(())
    }
}
