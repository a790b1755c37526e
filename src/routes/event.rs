use chrono::{NaiveDate, NaiveDateTime};
use log::{error, warn};
use rocket::http::uri::Origin;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put};
use serde::{Deserialize, Serialize};

use json_response_derive::JsonResponse;

use crate::macros::request_caching::{cache_response, read_cache_request};
use crate::modules::auth::AdminSession;
use crate::modules::models::entry::LapEntry;
use crate::modules::models::event::{Event, EventStatus};
use crate::modules::models::general::establish_connection;
use crate::modules::ranking;
use crate::modules::ranking::RankedEntry;
use crate::modules::redis::Redis;
use crate::routes::entry::ApiRankedEntry;
use crate::MessageResponse;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/***** PUBLIC *****/

/// # get all events grouped by status
/// every event carries its entry count and the top 3 of its leaderboard
/// for the overview cards
#[get("/events")]
pub fn overview(origin: &Origin) -> Result<EventsOverview, Status> {
    read_cache_request!(origin);

    let conn = &mut establish_connection();

    let events = match Event::get_all(conn) {
        Ok(events) => events,
        Err(error) => {
            error!(target:"routes/event:overview", "Error loading events: (error: {})", error);
            return Err(Status::InternalServerError);
        }
    };

    let mut overview = EventsOverview {
        scheduled: Vec::new(),
        active: Vec::new(),
        finished: Vec::new(),
        archived: Vec::new(),
    };

    for event in events {
        let ranked = rank_event_entries(conn, &event)?;
        let summary = ApiEventSummary::new(&event, &ranked);

        match EventStatus::parse(&event.status) {
            Ok(EventStatus::Scheduled) => overview.scheduled.push(summary),
            Ok(EventStatus::Active) => overview.active.push(summary),
            Ok(EventStatus::Finished) => overview.finished.push(summary),
            Ok(EventStatus::Archived) => overview.archived.push(summary),
            Err(error) => {
                error!(target:"routes/event:overview", "Event has an unknown status: (event: {}, error: {})", event.id, error);
                return Err(Status::InternalServerError);
            }
        }
    }

    cache_response!(origin, overview);
}

/// # get one event with its full leaderboard
#[get("/events/<slug>")]
pub fn detail(slug: String, origin: &Origin) -> Result<ApiEventDetail, Status> {
    read_cache_request!(origin);

    let conn = &mut establish_connection();

    let event = match Event::from_slug(conn, &slug) {
        Ok(event) => event,
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/event:detail", "Error loading event: (error: {})", error);
            return Err(Status::InternalServerError);
        }
    };

    let ranked = rank_event_entries(conn, &event)?;

    cache_response!(origin, ApiEventDetail::new(&event, &ranked));
}

/***** ADMIN *****/

/// # create a new event
#[post("/admin/events", data = "<new_event>")]
pub fn create(
    _session: AdminSession,
    new_event: Json<CreateEventData>,
) -> Result<EventResponse, Status> {
    let data = new_event.into_inner();
    if data.name.trim().is_empty() {
        return Err(Status::BadRequest);
    }

    let scheduled_date = match parse_scheduled_date(data.scheduled_date) {
        Ok(date) => date,
        Err(_) => return Err(Status::BadRequest),
    };

    let conn = &mut establish_connection();
    match Event::new(
        conn,
        &data.name,
        data.description,
        data.track_id,
        scheduled_date,
        data.scheduled_time,
    ) {
        Ok(event) => Ok(EventResponse {
            event: ApiEvent::new(&event),
        }),
        Err(error) => {
            error!(target:"routes/event:create", "Error saving event: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/// # edit an event
/// all fields are optional, a status change goes through the closed
/// status enum and rejects anything unknown
#[put("/admin/events/<event_id>", data = "<changes>")]
pub fn update(
    _session: AdminSession,
    event_id: String,
    changes: Json<UpdateEventData>,
) -> Result<EventResponse, Status> {
    let conn = &mut establish_connection();

    let mut event = match Event::from_id(conn, &event_id) {
        Ok(event) => event,
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/event:update", "Error loading event: (error: {})", error);
            return Err(Status::InternalServerError);
        }
    };

    let changes = changes.into_inner();
    if let Some(name) = changes.name {
        if name.trim().is_empty() {
            return Err(Status::BadRequest);
        }
        event.name = name;
    }
    if let Some(description) = changes.description {
        event.description = Some(description);
    }
    if let Some(track_id) = changes.track_id {
        event.track_id = Some(track_id);
    }
    if let Some(status) = changes.status {
        match EventStatus::parse(&status) {
            Ok(parsed) => event.status = parsed.as_str().to_string(),
            Err(_) => return Err(Status::BadRequest),
        }
    }
    if changes.scheduled_date.is_some() {
        event.scheduled_date = match parse_scheduled_date(changes.scheduled_date) {
            Ok(date) => date,
            Err(_) => return Err(Status::BadRequest),
        };
    }
    if let Some(scheduled_time) = changes.scheduled_time {
        event.scheduled_time = Some(scheduled_time);
    }

    match Event::update(conn, &event) {
        Ok(updated) => Ok(EventResponse {
            event: ApiEvent::new(&updated),
        }),
        Err(error) => {
            error!(target:"routes/event:update", "Error updating event: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/// # delete an event and all its entries
#[delete("/admin/events/<event_id>")]
pub fn delete(_session: AdminSession, event_id: String) -> Result<MessageResponse, Status> {
    let conn = &mut establish_connection();

    let event = match Event::from_id(conn, &event_id) {
        Ok(event) => event,
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/event:delete", "Error loading event: (error: {})", error);
            return Err(Status::InternalServerError);
        }
    };

    match event.delete(conn) {
        Ok(_) => Ok(MessageResponse {
            message: "Event deleted successfully".to_string(),
        }),
        Err(error) => {
            error!(target:"routes/event:delete", "Error deleting event: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

/// load an events entries in creation order and rank them.
///
/// a ranking failure here means the database holds an entry that never
/// went through input validation, that is logged as its own signal and
/// surfaces as a 500, never as a silently shortened leaderboard.
fn rank_event_entries(
    conn: &mut diesel::PgConnection,
    event: &Event,
) -> Result<Vec<RankedEntry>, Status> {
    let entries = match LapEntry::from_event(conn, &event.id) {
        Ok(entries) => entries,
        Err(error) => {
            error!(target:"routes/event:rank_event_entries", "Error loading entries: (event: {}, error: {})", event.id, error);
            return Err(Status::InternalServerError);
        }
    };

    match ranking::rank(&entries) {
        Ok(ranked) => Ok(ranked),
        Err(error) => {
            error!(target:"routes/event:rank_event_entries", "Stored entry failed ranking: (event: {}, error: {})", event.id, error);
            Err(Status::InternalServerError)
        }
    }
}

fn parse_scheduled_date(raw: Option<String>) -> Result<Option<NaiveDate>, ()> {
    match raw {
        Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Ok(Some(date)),
            Err(_) => Err(()),
        },
        None => Ok(None),
    }
}

#[derive(Deserialize)]
pub struct CreateEventData {
    pub name: String,
    pub description: Option<String>,
    pub track_id: Option<String>,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateEventData {
    pub name: Option<String>,
    pub description: Option<String>,
    pub track_id: Option<String>,
    pub status: Option<String>,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
}

#[derive(Serialize, Deserialize, JsonResponse)]
pub struct EventResponse {
    pub event: ApiEvent,
}

/// # Struct representing a json response for an event
#[derive(Serialize, Deserialize, Clone)]
pub struct ApiEvent {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub track_id: Option<String>,
    pub status: String,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    pub created_at: NaiveDateTime,
}

impl ApiEvent {
    pub fn new(event: &Event) -> ApiEvent {
        ApiEvent {
            id: event.id.clone(),
            name: event.name.clone(),
            slug: event.slug.clone(),
            description: event.description.clone(),
            track_id: event.track_id.clone(),
            status: event.status.clone(),
            scheduled_date: event.scheduled_date,
            scheduled_time: event.scheduled_time.clone(),
            created_at: event.created_at,
        }
    }
}

/// # Struct representing a json response for the grouped events overview
#[derive(Serialize, Deserialize, Clone, JsonResponse)]
pub struct EventsOverview {
    pub scheduled: Vec<ApiEventSummary>,
    pub active: Vec<ApiEventSummary>,
    pub finished: Vec<ApiEventSummary>,
    pub archived: Vec<ApiEventSummary>,
}

/// # Struct representing an event on the overview page
/// the full leaderboard stays on the detail page, the overview only
/// shows the podium
#[derive(Serialize, Deserialize, Clone)]
pub struct ApiEventSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub track_id: Option<String>,
    pub status: String,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    pub created_at: NaiveDateTime,
    pub entry_count: usize,
    pub top_entries: Vec<ApiRankedEntry>,
}

impl ApiEventSummary {
    pub fn new(event: &Event, ranked: &[RankedEntry]) -> ApiEventSummary {
        ApiEventSummary {
            id: event.id.clone(),
            name: event.name.clone(),
            slug: event.slug.clone(),
            description: event.description.clone(),
            track_id: event.track_id.clone(),
            status: event.status.clone(),
            scheduled_date: event.scheduled_date,
            scheduled_time: event.scheduled_time.clone(),
            created_at: event.created_at,
            entry_count: ranked.len(),
            top_entries: ApiRankedEntry::bulk_new(&ranked[..ranked.len().min(3)]),
        }
    }
}

/// # Struct representing a json response for an event detail page
#[derive(Serialize, Deserialize, Clone, JsonResponse)]
pub struct ApiEventDetail {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub track_id: Option<String>,
    pub status: String,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    pub created_at: NaiveDateTime,
    pub entry_count: usize,
    pub entries: Vec<ApiRankedEntry>,
}

impl ApiEventDetail {
    pub fn new(event: &Event, ranked: &[RankedEntry]) -> ApiEventDetail {
        ApiEventDetail {
            id: event.id.clone(),
            name: event.name.clone(),
            slug: event.slug.clone(),
            description: event.description.clone(),
            track_id: event.track_id.clone(),
            status: event.status.clone(),
            scheduled_date: event.scheduled_date,
            scheduled_time: event.scheduled_time.clone(),
            created_at: event.created_at,
            entry_count: ranked.len(),
            entries: ApiRankedEntry::bulk_new(ranked),
        }
    }
}
