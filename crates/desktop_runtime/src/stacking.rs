//! Bounded z-index allocation and focus fallback.

use crate::model::{WindowId, WindowRecord};

/// Monotonic z-index counter bounded by `max`.
///
/// When the next value would pass `max`, every window is compacted to `[base, base + n)` in its
/// current stacking order and allocation resumes after the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackingPolicy {
    base: u32,
    max: u32,
    next: u32,
}

impl StackingPolicy {
    pub fn new(base: u32, max: u32) -> Self {
        Self {
            base,
            max: max.max(base),
            next: base,
        }
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn next_value(&self) -> u32 {
        self.next
    }

    /// Reconfigures bounds and compacts existing windows into the new range.
    pub fn set_bounds(&mut self, base: u32, max: u32, windows: &mut [WindowRecord]) {
        self.base = base;
        self.max = max.max(base);
        self.rebase(windows);
    }

    /// Assigns the top z-index to `window_id`.
    ///
    /// Returns `false` for unknown ids. A window already on top keeps its value so repeated focus
    /// requests do not burn through the range.
    pub fn raise(&mut self, windows: &mut [WindowRecord], window_id: &WindowId) -> bool {
        let Some(index) = windows.iter().position(|w| &w.id == window_id) else {
            return false;
        };
        let current = windows[index].z_index;
        let on_top = current.saturating_add(1) == self.next
            && windows
                .iter()
                .enumerate()
                .all(|(i, w)| i == index || w.z_index < current);
        if on_top {
            return true;
        }

        if self.next > self.max {
            self.rebase(windows);
        }
        windows[index].z_index = self.next;
        self.next = self.next.saturating_add(1);
        true
    }

    /// Compacts all z-indices to `[base, base + n)` preserving relative order.
    ///
    /// Ties keep registry insertion order.
    pub fn rebase(&mut self, windows: &mut [WindowRecord]) {
        let mut order: Vec<usize> = (0..windows.len()).collect();
        order.sort_by_key(|&i| (windows[i].z_index, i));
        for (rank, index) in order.into_iter().enumerate() {
            windows[index].z_index = self.base.saturating_add(rank as u32);
        }
        self.next = self.base.saturating_add(windows.len() as u32);
    }
}

/// Highest-z live, non-minimized window, optionally skipping one id.
pub fn focus_fallback(windows: &[WindowRecord], skip: Option<&WindowId>) -> Option<WindowId> {
    windows
        .iter()
        .filter(|w| w.is_visible() && Some(&w.id) != skip)
        .max_by_key(|w| w.z_index)
        .map(|w| w.id.clone())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{WindowKind, WindowRect};

    fn window(id: &str, z_index: u32) -> WindowRecord {
        WindowRecord {
            id: WindowId::from(id),
            kind: WindowKind::Post,
            content_key: Some(id.to_string()),
            title: id.to_string(),
            rect: WindowRect::default(),
            pre_restore: None,
            z_index,
            is_focused: false,
            minimized: false,
            maximized: false,
            route: None,
            closing: None,
        }
    }

    fn z_of(windows: &[WindowRecord]) -> Vec<u32> {
        windows.iter().map(|w| w.z_index).collect()
    }

    #[test]
    fn raise_allocates_increasing_values() {
        let mut policy = StackingPolicy::new(10, 80);
        let mut windows = vec![window("a", 0), window("b", 0)];
        policy.raise(&mut windows, &WindowId::from("a"));
        policy.raise(&mut windows, &WindowId::from("b"));
        policy.raise(&mut windows, &WindowId::from("a"));
        assert_eq!(z_of(&windows), vec![12, 11]);
    }

    #[test]
    fn raising_top_window_is_stable() {
        let mut policy = StackingPolicy::new(10, 80);
        let mut windows = vec![window("a", 0)];
        policy.raise(&mut windows, &WindowId::from("a"));
        policy.raise(&mut windows, &WindowId::from("a"));
        assert_eq!(windows[0].z_index, 10);
        assert_eq!(policy.next_value(), 11);
    }

    #[test]
    fn overflow_rebases_preserving_order() {
        let mut policy = StackingPolicy::new(10, 13);
        let mut windows = vec![window("a", 0), window("b", 0), window("c", 0)];
        for id in ["a", "b", "c", "a"] {
            policy.raise(&mut windows, &WindowId::from(id));
        }
        assert_eq!(z_of(&windows), vec![13, 11, 12]);

        // Counter is at 14 > 13: the next raise compacts to 10..13 first.
        policy.raise(&mut windows, &WindowId::from("b"));
        assert_eq!(z_of(&windows), vec![12, 13, 11]);
        assert!(windows.iter().all(|w| w.z_index <= 13));
    }

    #[test]
    fn fallback_skips_minimized_and_closing() {
        let mut windows = vec![window("a", 10), window("b", 12), window("c", 11)];
        windows[1].minimized = true;
        assert_eq!(focus_fallback(&windows, None), Some(WindowId::from("c")));
        assert_eq!(
            focus_fallback(&windows, Some(&WindowId::from("c"))),
            Some(WindowId::from("a"))
        );
        windows[0].closing = Some(crate::model::ClosingState {
            token: 1,
            tab: None,
        });
        assert_eq!(focus_fallback(&windows, Some(&WindowId::from("c"))), None);
    }
}
