use crate::model::WindowRect;

const FALLBACK_WIDTH: i32 = 1280;
const FALLBACK_HEIGHT: i32 = 800;

/// Browser inner size as the desktop viewport; a fixed desktop size outside the browser.
pub(super) fn desktop_viewport_rect() -> WindowRect {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let width = window
                .inner_width()
                .ok()
                .and_then(|value| value.as_f64())
                .map(|value| value as i32)
                .unwrap_or(FALLBACK_WIDTH);
            let height = window
                .inner_height()
                .ok()
                .and_then(|value| value.as_f64())
                .map(|value| value as i32)
                .unwrap_or(FALLBACK_HEIGHT);

            return WindowRect::new(0, 0, width.max(1), height.max(1));
        }
    }

    WindowRect::new(0, 0, FALLBACK_WIDTH, FALLBACK_HEIGHT)
}
