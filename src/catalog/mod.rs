//! Things a room can be built from, and the lobby that lists rooms.

pub(crate) mod artwork;
pub(crate) mod lobby;
