use std::io::Cursor;

use chrono::Utc;
use log::error;
use rocket::get;
use rocket::http::{ContentType, Header, Status};
use rocket::response::{self, Responder, Response};
use rocket::Request;
use serde::{Deserialize, Serialize};

use json_response_derive::JsonResponse;

use crate::modules::auth::AdminSession;
use crate::modules::helpers::csv;
use crate::modules::models::entry::LapEntry;
use crate::modules::models::event::Event;
use crate::modules::models::general::establish_connection;
use crate::modules::ranking;
use crate::modules::ranking::RankedEntry;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/// # download an events leaderboard as csv
#[get("/admin/events/<event_id>/export/csv")]
pub fn csv_export(_session: AdminSession, event_id: String) -> Result<CsvAttachment, Status> {
    let conn = &mut establish_connection();

    let (event, ranked) = load_ranked_event(conn, &event_id)?;

    Ok(CsvAttachment {
        filename: format!("{}_laptimes.csv", event.slug),
        body: csv::render_leaderboard(&ranked),
    })
}

/// # get an events leaderboard as data for client side pdf rendering
#[get("/admin/events/<event_id>/export/pdf")]
pub fn pdf_export(_session: AdminSession, event_id: String) -> Result<PdfExport, Status> {
    let conn = &mut establish_connection();

    let (_, ranked) = load_ranked_event(conn, &event_id)?;

    Ok(PdfExport {
        entries: ranked.iter().map(PdfEntry::new).collect(),
        exported_at: Utc::now().to_rfc3339(),
    })
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

fn load_ranked_event(
    conn: &mut diesel::PgConnection,
    event_id: &str,
) -> Result<(Event, Vec<RankedEntry>), Status> {
    let event = match Event::from_id(conn, event_id) {
        Ok(event) => event,
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/export:load_ranked_event", "Error loading event: (error: {})", error);
            return Err(Status::InternalServerError);
        }
    };

    let entries = match LapEntry::from_event(conn, &event.id) {
        Ok(entries) => entries,
        Err(error) => {
            error!(target:"routes/export:load_ranked_event", "Error loading entries: (event: {}, error: {})", event.id, error);
            return Err(Status::InternalServerError);
        }
    };

    match ranking::rank(&entries) {
        Ok(ranked) => Ok((event, ranked)),
        Err(error) => {
            error!(target:"routes/export:load_ranked_event", "Stored entry failed ranking: (event: {}, error: {})", event.id, error);
            Err(Status::InternalServerError)
        }
    }
}

/// a csv file served as a download
pub struct CsvAttachment {
    pub filename: String,
    pub body: String,
}

impl<'r> Responder<'r, 'static> for CsvAttachment {
    fn respond_to(self, _request: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::new("text", "csv"))
            .header(Header::new(
                "Content-Disposition",
                format!("attachment; filename={}", self.filename),
            ))
            .sized_body(self.body.len(), Cursor::new(self.body))
            .ok()
    }
}

#[derive(Serialize, Deserialize, JsonResponse)]
pub struct PdfExport {
    pub entries: Vec<PdfEntry>,
    pub exported_at: String,
}

/// # Struct representing one leaderboard row in the pdf payload
#[derive(Serialize, Deserialize, Clone)]
pub struct PdfEntry {
    pub rank: usize,
    pub driver_name: String,
    pub team: String,
    pub lap_time_display: String,
    pub gap: String,
}

impl PdfEntry {
    pub fn new(ranked: &RankedEntry) -> PdfEntry {
        PdfEntry {
            rank: ranked.rank,
            driver_name: ranked.entry.driver_name.clone(),
            team: ranked.entry.team.clone().unwrap_or_default(),
            lap_time_display: ranked.entry.lap_time_display.clone(),
            gap: ranked.gap.clone(),
        }
    }
}
