pub mod auth;
pub mod ranking;
pub mod redis;

pub mod models {
    pub mod admin;
    pub mod entry;
    pub mod event;
    pub mod track;

    pub mod general;
}

pub mod helpers {
    pub mod csv;
    pub mod logging;
    pub mod slug;
}
