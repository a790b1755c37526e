use serde::{Deserialize, Serialize};

use json_response_derive::JsonResponse;

pub mod errors;

pub mod schema;

pub mod cron_jobs;
pub mod modules;

pub mod routes {
    pub mod auth;
    pub mod entry;
    pub mod event;
    pub mod export;
    pub mod track;
}

pub(crate) mod macros {
    pub mod database_error_handler;
    pub mod redis;
    pub mod request_caching;
}

/// a plain confirmation body for mutations that have nothing better to
/// return
#[derive(Clone, Serialize, PartialEq, Deserialize, Debug, JsonResponse)]
pub struct MessageResponse {
    pub message: String,
}
