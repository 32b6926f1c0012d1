use std::fmt;

use super::repeat_mode::RepeatMode;

/// Short user-facing messages. The presentation layer shows the [`fmt::Display`] text as a toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Queued(String),
    Duplicate(String),
    RemovalRefused,
    QueueCleared,
    Shuffle(bool),
    Repeat(RepeatMode),
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Queued(title) => write!(f, "Added \"{title}\" to queue"),
            Notification::Duplicate(title) => write!(f, "\"{title}\" is already in the queue"),
            Notification::RemovalRefused => write!(f, "Cannot remove the currently playing track"),
            Notification::QueueCleared => write!(f, "Queue cleared"),
            Notification::Shuffle(true) => write!(f, "Shuffle on"),
            Notification::Shuffle(false) => write!(f, "Shuffle off"),
            Notification::Repeat(RepeatMode::Off) => write!(f, "Repeat off"),
            Notification::Repeat(RepeatMode::All) => write!(f, "Repeat all"),
            Notification::Repeat(RepeatMode::One) => write!(f, "Repeat one"),
        }
    }
}
