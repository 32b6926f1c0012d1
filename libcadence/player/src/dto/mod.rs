pub(crate) mod command;
pub(crate) mod notification;
pub(crate) mod player_event;
pub(crate) mod player_response;
pub(crate) mod player_state;
pub(crate) mod repeat_mode;
pub(crate) mod snapshot;
pub(crate) mod track;
