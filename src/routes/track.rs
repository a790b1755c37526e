use chrono::NaiveDateTime;
use log::error;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put};
use serde::{Deserialize, Serialize};

use json_response_derive::JsonResponse;

use crate::modules::auth::AdminSession;
use crate::modules::models::general::establish_connection;
use crate::modules::models::track::Track;
use crate::MessageResponse;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/// # list all tracks
/// a short list that only admins ever change, served straight from the
/// database
#[get("/tracks")]
pub fn list_all() -> Result<Json<Vec<ApiTrack>>, Status> {
    let conn = &mut establish_connection();

    match Track::get_all(conn) {
        Ok(tracks) => Ok(Json(tracks.iter().map(ApiTrack::new).collect())),
        Err(error) => {
            error!(target:"routes/track:list_all", "Error loading tracks: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/// # create a new track
#[post("/admin/tracks", data = "<new_track>")]
pub fn create(_session: AdminSession, new_track: Json<CreateTrackData>) -> Result<ApiTrack, Status> {
    let data = new_track.into_inner();
    if data.name.trim().is_empty() {
        return Err(Status::BadRequest);
    }

    let conn = &mut establish_connection();
    match Track::new(conn, &data.name, data.country, data.image_url) {
        Ok(track) => Ok(ApiTrack::new(&track)),
        Err(error) => {
            error!(target:"routes/track:create", "Error saving track: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/// # edit a track
#[put("/admin/tracks/<track_id>", data = "<changes>")]
pub fn update(
    _session: AdminSession,
    track_id: String,
    changes: Json<UpdateTrackData>,
) -> Result<ApiTrack, Status> {
    let conn = &mut establish_connection();

    let mut track = match Track::from_id(conn, &track_id) {
        Ok(track) => track,
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/track:update", "Error loading track: (error: {})", error);
            return Err(Status::InternalServerError);
        }
    };

    let changes = changes.into_inner();
    if let Some(name) = changes.name {
        if name.trim().is_empty() {
            return Err(Status::BadRequest);
        }
        track.name = name;
    }
    if let Some(country) = changes.country {
        track.country = Some(country);
    }
    if let Some(image_url) = changes.image_url {
        track.image_url = Some(image_url);
    }

    match Track::update(conn, &track) {
        Ok(updated) => Ok(ApiTrack::new(&updated)),
        Err(error) => {
            error!(target:"routes/track:update", "Error updating track: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/// # delete a track
#[delete("/admin/tracks/<track_id>")]
pub fn delete(_session: AdminSession, track_id: String) -> Result<MessageResponse, Status> {
    let conn = &mut establish_connection();

    let track = match Track::from_id(conn, &track_id) {
        Ok(track) => track,
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/track:delete", "Error loading track: (error: {})", error);
            return Err(Status::InternalServerError);
        }
    };

    match track.delete(conn) {
        Ok(_) => Ok(MessageResponse {
            message: "Track deleted successfully".to_string(),
        }),
        Err(error) => {
            error!(target:"routes/track:delete", "Error deleting track: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

#[derive(Deserialize)]
pub struct CreateTrackData {
    pub name: String,
    pub country: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTrackData {
    pub name: Option<String>,
    pub country: Option<String>,
    pub image_url: Option<String>,
}

/// # Struct representing a json response for a track
#[derive(Serialize, Deserialize, Clone, JsonResponse)]
pub struct ApiTrack {
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
}

impl ApiTrack {
    pub fn new(track: &Track) -> ApiTrack {
        ApiTrack {
            id: track.id.clone(),
            name: track.name.clone(),
            country: track.country.clone(),
            image_url: track.image_url.clone(),
            created_at: track.created_at,
        }
    }
}
