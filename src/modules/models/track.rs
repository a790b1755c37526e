use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::tracks;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = tracks)]
pub struct NewTrack {
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    pub image_url: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
#[diesel(table_name = tracks)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    pub image_url: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl Track {
    /************ INSERTERS ************/
    /// # Insert a new track into the database
    /// the image url is stored as opaque text, hosting the image is not
    /// this services concern.
    pub fn new(
        conn: &mut PgConnection,
        name_in: &str,
        country_in: Option<String>,
        image_url_in: Option<String>,
    ) -> QueryResult<Track> {
        let new_track = NewTrack {
            id: Uuid::new_v4().to_string(),
            name: name_in.to_string(),
            country: country_in,
            image_url: image_url_in,
            created_at: Utc::now().naive_utc(),
        };

        match diesel::insert_into(tracks::table)
            .values(&new_track)
            .get_result::<Track>(conn)
        {
            Ok(track) => Ok(track),
            Err(error) => {
                error!(target:"models/track:new", "Error inserting new track: {}", error);
                Err(error)
            }
        }
    }

    /************ GETTERS ************/
    /// # Get a track by its id
    pub fn from_id(conn: &mut PgConnection, id_in: &str) -> QueryResult<Track> {
        use crate::schema::tracks::dsl::*;

        tracks.filter(id.eq(id_in)).first(conn)
    }

    /// # get all tracks
    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Track>> {
        use crate::schema::tracks::dsl::*;

        tracks.order(name.asc()).load::<Track>(conn)
    }

    /************ SETTERS ************/
    /// # update a track
    pub fn update(conn: &mut PgConnection, track: &Track) -> QueryResult<Track> {
        use crate::schema::tracks::dsl::*;

        match diesel::update(tracks.filter(id.eq(&track.id)))
            .set((
                name.eq(&track.name),
                country.eq(&track.country),
                image_url.eq(&track.image_url),
            ))
            .get_result::<Track>(conn)
        {
            Ok(updated) => Ok(updated),
            Err(error) => {
                error!(target:"models/track:update", "Error updating track: (track: {}, error: {})", track.id, error);
                Err(error)
            }
        }
    }

    /************ DELETERS ************/
    /// # delete this track
    /// events keep their dangling track reference, they render without a
    /// track rather than disappearing with it.
    pub fn delete(&self, conn: &mut PgConnection) -> QueryResult<usize> {
        use crate::schema::tracks::dsl::*;

        diesel::delete(tracks.filter(id.eq(&self.id))).execute(conn)
    }
}
