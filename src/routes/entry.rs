use chrono::NaiveDateTime;
use log::error;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{delete, post, put};
use serde::{Deserialize, Serialize};

use json_response_derive::JsonResponse;

use crate::errors::Error;
use crate::macros::redis::clear_cache;
use crate::modules::auth::AdminSession;
use crate::modules::models::entry::LapEntry;
use crate::modules::models::event::Event;
use crate::modules::models::general::establish_connection;
use crate::modules::ranking::RankedEntry;
use crate::modules::redis::Redis;
use crate::MessageResponse;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/// # add a lap entry to an event
/// a lap time that does not parse is rejected before anything is stored
#[post("/admin/events/<event_id>/laps", data = "<new_entry>")]
pub fn create(
    _session: AdminSession,
    event_id: String,
    new_entry: Json<CreateEntryData>,
) -> Result<EntryResponse, Status> {
    let conn = &mut establish_connection();

    match Event::from_id(conn, &event_id) {
        Ok(_) => {}
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/entry:create", "Error loading event: (error: {})", error);
            return Err(Status::InternalServerError);
        }
    }

    let data = new_entry.into_inner();
    if data.driver_name.trim().is_empty() {
        return Err(Status::BadRequest);
    }

    match LapEntry::new(
        conn,
        &event_id,
        &data.driver_name,
        data.team,
        data.email,
        &data.lap_time_display,
    ) {
        Ok(entry) => Ok(EntryResponse {
            entry: ApiLapEntry::new(&entry),
        }),
        Err(Error::ParseError { .. }) => Err(Status::BadRequest),
        Err(error) => {
            error!(target:"routes/entry:create", "Error saving entry: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/// # edit a lap entry
/// editing the lap time recomputes the stored milliseconds
#[put("/admin/events/<event_id>/laps/<entry_id>", data = "<changes>")]
pub fn update(
    _session: AdminSession,
    event_id: String,
    entry_id: String,
    changes: Json<UpdateEntryData>,
) -> Result<EntryResponse, Status> {
    let conn = &mut establish_connection();

    let mut entry = match LapEntry::from_id(conn, &entry_id) {
        Ok(entry) => entry,
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/entry:update", "Error loading entry: (error: {})", error);
            return Err(Status::InternalServerError);
        }
    };

    if entry.event_id != event_id {
        return Err(Status::NotFound);
    }

    let changes = changes.into_inner();
    if let Some(driver_name) = changes.driver_name {
        if driver_name.trim().is_empty() {
            return Err(Status::BadRequest);
        }
        entry.driver_name = driver_name;
    }
    if let Some(team) = changes.team {
        entry.team = Some(team);
    }
    if let Some(email) = changes.email {
        entry.email = Some(email);
    }
    if let Some(lap_time_display) = changes.lap_time_display {
        entry.lap_time_display = lap_time_display;
    }

    match LapEntry::update(conn, &entry) {
        Ok(updated) => Ok(EntryResponse {
            entry: ApiLapEntry::new(&updated),
        }),
        Err(Error::ParseError { .. }) => Err(Status::BadRequest),
        Err(error) => {
            error!(target:"routes/entry:update", "Error updating entry: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/// # remove a lap entry from an event
#[delete("/admin/events/<event_id>/laps/<entry_id>")]
pub fn delete(
    _session: AdminSession,
    event_id: String,
    entry_id: String,
) -> Result<MessageResponse, Status> {
    let conn = &mut establish_connection();

    let entry = match LapEntry::from_id(conn, &entry_id) {
        Ok(entry) => entry,
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/entry:delete", "Error loading entry: (error: {})", error);
            return Err(Status::InternalServerError);
        }
    };

    if entry.event_id != event_id {
        return Err(Status::NotFound);
    }

    match entry.delete(conn) {
        Ok(_) => Ok(MessageResponse {
            message: "Lap entry deleted successfully".to_string(),
        }),
        Err(error) => {
            error!(target:"routes/entry:delete", "Error deleting entry: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/// # wipe all lap entries of an event
#[delete("/admin/events/<event_id>/laps")]
pub fn delete_all(
    _session: AdminSession,
    event_id: String,
) -> Result<MessageResponse, Status> {
    let conn = &mut establish_connection();

    let event = match Event::from_id(conn, &event_id) {
        Ok(event) => event,
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/entry:delete_all", "Error loading event: (error: {})", error);
            return Err(Status::InternalServerError);
        }
    };

    match LapEntry::delete_for_event(conn, &event.id) {
        Ok(_) => {
            clear_cache!(event);
            Ok(MessageResponse {
                message: "All lap entries deleted successfully".to_string(),
            })
        }
        Err(error) => {
            error!(target:"routes/entry:delete_all", "Error deleting entries: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

#[derive(Deserialize)]
pub struct CreateEntryData {
    pub driver_name: String,
    pub team: Option<String>,
    pub email: Option<String>,
    pub lap_time_display: String,
}

#[derive(Deserialize)]
pub struct UpdateEntryData {
    pub driver_name: Option<String>,
    pub team: Option<String>,
    pub email: Option<String>,
    pub lap_time_display: Option<String>,
}

#[derive(Serialize, Deserialize, JsonResponse)]
pub struct EntryResponse {
    pub entry: ApiLapEntry,
}

/// # Struct representing a json response for a lap entry
#[derive(Serialize, Deserialize, Clone)]
pub struct ApiLapEntry {
    pub id: String,
    pub driver_name: String,
    pub team: Option<String>,
    pub email: Option<String>,
    pub lap_time_display: String,
    pub lap_time_ms: i64,
    pub created_at: NaiveDateTime,
}

impl ApiLapEntry {
    pub fn new(entry: &LapEntry) -> ApiLapEntry {
        ApiLapEntry {
            id: entry.id.clone(),
            driver_name: entry.driver_name.clone(),
            team: entry.team.clone(),
            email: entry.email.clone(),
            lap_time_display: entry.lap_time_display.clone(),
            lap_time_ms: entry.lap_time_ms,
            created_at: entry.created_at,
        }
    }
}

/// # Struct representing a json response for a ranked leaderboard row
#[derive(Serialize, Deserialize, Clone)]
pub struct ApiRankedEntry {
    pub id: String,
    pub driver_name: String,
    pub team: Option<String>,
    pub email: Option<String>,
    pub lap_time_display: String,
    pub lap_time_ms: i64,
    pub created_at: NaiveDateTime,
    pub rank: usize,
    pub gap: String,
}

impl ApiRankedEntry {
    pub fn new(ranked: &RankedEntry) -> ApiRankedEntry {
        ApiRankedEntry {
            id: ranked.entry.id.clone(),
            driver_name: ranked.entry.driver_name.clone(),
            team: ranked.entry.team.clone(),
            email: ranked.entry.email.clone(),
            lap_time_display: ranked.entry.lap_time_display.clone(),
            lap_time_ms: ranked.lap_time_ms,
            created_at: ranked.entry.created_at,
            rank: ranked.rank,
            gap: ranked.gap.clone(),
        }
    }

    pub fn bulk_new(ranked: &[RankedEntry]) -> Vec<ApiRankedEntry> {
        ranked.iter().map(ApiRankedEntry::new).collect()
    }
}
