//! Desktop-wide keyboard shortcuts.

use crate::{
    model::{KeyChord, WindowId},
    registry::WindowRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Commands bound to global key chords.
pub enum KeyCommand {
    /// `Cmd+K` / `Ctrl+K`.
    OpenSearch,
    /// `Escape`.
    CloseTopWindow,
}

/// Maps a key chord to a desktop command.
pub fn resolve_key_command(chord: &KeyChord) -> Option<KeyCommand> {
    if chord.key == "Escape" && !chord.ctrl && !chord.meta && !chord.alt {
        return Some(KeyCommand::CloseTopWindow);
    }
    if (chord.ctrl || chord.meta) && !chord.alt && chord.key.eq_ignore_ascii_case("k") {
        return Some(KeyCommand::OpenSearch);
    }
    None
}

/// Window closed by `Escape`: the focused one, else the newest live window.
///
/// The last remaining window never closes from the keyboard.
pub fn escape_close_target(registry: &WindowRegistry) -> Option<WindowId> {
    if registry.live_windows().count() <= 1 {
        return None;
    }
    registry
        .focused()
        .or_else(|| registry.live_windows().last())
        .map(|window| window.id.clone())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{OpenWindowOptions, WindowKind, WindowRect};

    const VIEWPORT: WindowRect = WindowRect::new(0, 0, 1280, 800);

    #[test]
    fn chords_resolve_to_commands() {
        assert_eq!(
            resolve_key_command(&KeyChord::plain("Escape")),
            Some(KeyCommand::CloseTopWindow)
        );
        let ctrl_k = KeyChord {
            ctrl: true,
            ..KeyChord::plain("k")
        };
        let cmd_k = KeyChord {
            meta: true,
            shift: true,
            ..KeyChord::plain("K")
        };
        assert_eq!(resolve_key_command(&ctrl_k), Some(KeyCommand::OpenSearch));
        assert_eq!(resolve_key_command(&cmd_k), Some(KeyCommand::OpenSearch));
        assert_eq!(resolve_key_command(&KeyChord::plain("k")), None);
    }

    #[test]
    fn escape_targets_focused_then_newest_and_spares_last_window() {
        let mut registry = WindowRegistry::default();
        let home = registry
            .open_window(WindowKind::Home, OpenWindowOptions::default(), VIEWPORT)
            .id;
        assert_eq!(escape_close_target(&registry), None);

        let explore = registry
            .open_window(WindowKind::Explore, OpenWindowOptions::default(), VIEWPORT)
            .id;
        registry.bring_to_front(&home);
        assert_eq!(escape_close_target(&registry), Some(home.clone()));

        registry.minimize(&home);
        registry.minimize(&explore);
        assert_eq!(registry.focused(), None);
        assert_eq!(escape_close_target(&registry), Some(explore));
    }
}
