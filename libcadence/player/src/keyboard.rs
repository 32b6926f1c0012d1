use strum::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum PlayerAction {
    TogglePlayPause,
    Next,
    Previous,
}

/// Where keyboard focus was when the key was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Page,
    TextInput,
}

/// Maps a key name (as reported by the browser's `KeyboardEvent.key` or `code`) to a player
/// action. Keys typed into text inputs are never treated as shortcuts.
pub fn shortcut_for(key: &str, focus: Focus) -> Option<PlayerAction> {
    if focus == Focus::TextInput {
        return None;
    }

    match key {
        " " | "Space" | "Spacebar" => Some(PlayerAction::TogglePlayPause),
        "ArrowRight" => Some(PlayerAction::Next),
        "ArrowLeft" => Some(PlayerAction::Previous),
        _ => None,
    }
}
