//! Pointer-driven move/resize sessions.
//!
//! At most one session is active. Every pointer event carries the id of the pointer that started
//! the session; events from other pointers are ignored so a second finger or stylus cannot hijack
//! a drag.

use crate::{
    geometry,
    model::{PointerPosition, ResizeEdge, WindowId, WindowRect},
    registry::WindowRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What the active pointer session does to its window.
pub enum InteractionMode {
    /// Title-bar drag.
    Move,
    /// Edge or corner drag.
    Resize(ResizeEdge),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Snapshot captured when a pointer session starts.
pub struct PointerSession {
    /// Window being manipulated.
    pub window_id: WindowId,
    /// DOM pointer id that owns the session.
    pub pointer_id: i32,
    /// Move or resize.
    pub mode: InteractionMode,
    /// Pointer position at session start.
    pub pointer_start: PointerPosition,
    /// Window geometry at session start.
    pub rect_start: WindowRect,
    /// Unclamped drag geometry from the latest pointer event, used for snap detection.
    pub last_raw: WindowRect,
    /// Latest pointer position seen by the session.
    pub last_pointer: PointerPosition,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Transient pointer state kept outside [`WindowRegistry`].
pub struct InteractionState {
    /// Active session, if any.
    pub active: Option<PointerSession>,
}

impl InteractionState {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Window targeted by the active session.
    pub fn window_id(&self) -> Option<&WindowId> {
        self.active.as_ref().map(|session| &session.window_id)
    }

    /// Focuses `window_id` and starts a drag unless it is maximized.
    ///
    /// Returns `true` when a session started.
    pub fn begin_move(
        &mut self,
        registry: &mut WindowRegistry,
        window_id: &WindowId,
        pointer_id: i32,
        pointer: PointerPosition,
    ) -> bool {
        self.begin(registry, window_id, pointer_id, pointer, InteractionMode::Move)
    }

    /// Focuses `window_id` and starts a resize unless it is maximized or minimized.
    pub fn begin_resize(
        &mut self,
        registry: &mut WindowRegistry,
        window_id: &WindowId,
        pointer_id: i32,
        pointer: PointerPosition,
        edge: ResizeEdge,
    ) -> bool {
        self.begin(
            registry,
            window_id,
            pointer_id,
            pointer,
            InteractionMode::Resize(edge),
        )
    }

    fn begin(
        &mut self,
        registry: &mut WindowRegistry,
        window_id: &WindowId,
        pointer_id: i32,
        pointer: PointerPosition,
        mode: InteractionMode,
    ) -> bool {
        if self.active.is_some() {
            return false;
        }
        registry.bring_to_front(window_id);
        let Some(window) = registry.get_live(window_id) else {
            return false;
        };
        if window.maximized || window.minimized {
            return false;
        }
        self.active = Some(PointerSession {
            window_id: window_id.clone(),
            pointer_id,
            mode,
            pointer_start: pointer,
            rect_start: window.rect,
            last_raw: window.rect,
            last_pointer: pointer,
        });
        true
    }

    /// Applies a pointer move. Returns `true` when geometry changed.
    pub fn pointer_move(
        &mut self,
        registry: &mut WindowRegistry,
        pointer_id: i32,
        pointer: PointerPosition,
        viewport: WindowRect,
    ) -> bool {
        let Some(session) = self.active.as_mut() else {
            return false;
        };
        if session.pointer_id != pointer_id {
            return false;
        }
        let dx = pointer.x.saturating_sub(session.pointer_start.x);
        let dy = pointer.y.saturating_sub(session.pointer_start.y);
        let config = registry.config().clone();
        let rect = match session.mode {
            InteractionMode::Move => {
                let raw = session.rect_start.offset(dx, dy);
                session.last_raw = raw;
                geometry::clamp_position(raw, geometry::usable_area(&config, viewport))
            }
            InteractionMode::Resize(edge) => {
                geometry::resize_rect(session.rect_start, edge, dx, dy, &config, viewport)
            }
        };
        session.last_pointer = pointer;
        let window_id = session.window_id.clone();
        let movable = registry
            .get_live(&window_id)
            .is_some_and(|window| !window.maximized && !window.minimized);
        if !movable {
            self.active = None;
            return false;
        }
        registry.commit_rect(&window_id, rect)
    }

    /// Ends the session, applying the final position and any edge snap.
    ///
    /// Returns the window the session manipulated, or `None` when `pointer_id` does not own the
    /// active session.
    pub fn pointer_up(
        &mut self,
        registry: &mut WindowRegistry,
        pointer_id: i32,
        pointer: PointerPosition,
        viewport: WindowRect,
    ) -> Option<WindowId> {
        if self.active.as_ref()?.pointer_id != pointer_id {
            return None;
        }
        self.pointer_move(registry, pointer_id, pointer, viewport);
        let session = self.active.take()?;
        if session.mode == InteractionMode::Move {
            if let Some(side) = geometry::snap_side(session.last_raw, registry.config(), viewport)
            {
                registry.snap(&session.window_id, side, viewport);
            }
        }
        Some(session.window_id)
    }

    /// Restarts the session from the window's current geometry and the latest pointer position.
    ///
    /// Called after the registry re-fits windows (viewport or config change) so later pointer
    /// deltas apply to the fitted rect instead of the stale start geometry. Ends the session when
    /// its window can no longer be moved.
    pub fn rebase(&mut self, registry: &WindowRegistry) {
        let Some(session) = self.active.as_mut() else {
            return;
        };
        let fitted = registry
            .get_live(&session.window_id)
            .filter(|window| !window.maximized && !window.minimized)
            .map(|window| window.rect);
        match fitted {
            Some(rect) => {
                session.rect_start = rect;
                session.last_raw = rect;
                session.pointer_start = session.last_pointer;
            }
            None => self.active = None,
        }
    }

    /// Drops the session without applying anything further.
    pub fn cancel(&mut self) -> Option<WindowId> {
        self.active.take().map(|session| session.window_id)
    }
}
