use std::thread;

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use uuid::Uuid;

use crate::errors::{CustomResult, DatabaseSnafu};
use crate::macros::database_error_handler::db_handle_get_error;
use crate::macros::redis::clear_cache;
use crate::modules::models::event::Event;
use crate::modules::models::general::establish_connection;
use crate::modules::ranking;
use crate::modules::redis::Redis;
use crate::schema::lap_entries;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = lap_entries)]
pub struct NewLapEntry {
    pub id: String,
    pub event_id: String,
    pub driver_name: String,
    pub team: Option<String>,
    pub email: Option<String>,
    pub lap_time_display: String,
    pub lap_time_ms: i64,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
#[diesel(table_name = lap_entries)]
pub struct LapEntry {
    pub id: String,
    pub event_id: String,
    pub driver_name: String,
    pub team: Option<String>,
    pub email: Option<String>,
    pub lap_time_display: String,
    pub lap_time_ms: i64,
    pub created_at: chrono::NaiveDateTime,
}

impl LapEntry {
    /************ INSERTERS ************/
    /// # Insert a new lap entry into the database
    /// the display time is parsed first and stored alongside its
    /// millisecond value; an unparsable time fails the insert.
    ///
    /// ## Arguments
    /// * `conn` - The database connection to use
    /// * `event_id_in` - The event the entry belongs to
    /// * `driver_name_in` - The driver name
    /// * `team_in` - The drivers team, if any
    /// * `email_in` - The drivers email, if any
    /// * `lap_time_display_in` - The lap time in `M:SS.mmm` format
    ///
    /// ## Returns
    /// * `LapEntry` - The inserted entry
    pub fn new(
        conn: &mut PgConnection,
        event_id_in: &str,
        driver_name_in: &str,
        team_in: Option<String>,
        email_in: Option<String>,
        lap_time_display_in: &str,
    ) -> CustomResult<LapEntry> {
        let millis = ranking::parse_lap_time(lap_time_display_in)?;

        let new_entry = NewLapEntry {
            id: Uuid::new_v4().to_string(),
            event_id: event_id_in.to_string(),
            driver_name: driver_name_in.to_string(),
            team: team_in,
            email: email_in,
            lap_time_display: lap_time_display_in.to_string(),
            lap_time_ms: millis,
            created_at: Utc::now().naive_utc(),
        };

        let entry: LapEntry = match diesel::insert_into(lap_entries::table)
            .values(&new_entry)
            .get_result::<LapEntry>(conn)
        {
            Ok(entry) => entry,
            Err(error) => {
                error!(target:"models/entry:new", "Error inserting new entry: {}", error);
                return Err(error).context(DatabaseSnafu);
            }
        };

        LapEntry::clear_event_cache(entry.event_id.clone(), "models/entry:new");
        Ok(entry)
    }

    /************ GETTERS ************/
    /// # Get a lap entry by its id
    pub fn from_id(conn: &mut PgConnection, id_in: &str) -> QueryResult<LapEntry> {
        use crate::schema::lap_entries::dsl::*;

        lap_entries.filter(id.eq(id_in)).first(conn)
    }

    /// # get all entries of an event
    /// entries come back in creation order, which is the tie-break order
    /// the leaderboard ranking relies on.
    ///
    /// ## Arguments
    /// * `conn` - The database connection to use
    /// * `event_id_in` - The event to get the entries for
    ///
    /// ## Returns
    /// * `Vec<LapEntry>` - The events entries, oldest first
    pub fn from_event(conn: &mut PgConnection, event_id_in: &str) -> QueryResult<Vec<LapEntry>> {
        use crate::schema::lap_entries::dsl::*;

        let entries = db_handle_get_error!(
            lap_entries
                .filter(event_id.eq(event_id_in))
                .order((created_at.asc(), id.asc()))
                .load::<LapEntry>(conn),
            "models/entry:from_event",
            "entries from event"
        );

        Ok(entries)
    }

    /************ SETTERS ************/
    /// # update a lap entry
    /// writes the passed entry back to the database. the millisecond value
    /// is always recomputed from the display string, so an edited display
    /// time can never go stale against its stored milliseconds.
    pub fn update(conn: &mut PgConnection, entry: &LapEntry) -> CustomResult<LapEntry> {
        use crate::schema::lap_entries::dsl::*;

        let millis = ranking::parse_lap_time(&entry.lap_time_display)?;

        let updated: LapEntry = match diesel::update(lap_entries.filter(id.eq(&entry.id)))
            .set((
                driver_name.eq(&entry.driver_name),
                team.eq(&entry.team),
                email.eq(&entry.email),
                lap_time_display.eq(&entry.lap_time_display),
                lap_time_ms.eq(millis),
            ))
            .get_result::<LapEntry>(conn)
        {
            Ok(updated) => updated,
            Err(error) => {
                error!(target:"models/entry:update", "Error updating entry: (entry: {}, error: {})", entry.id, error);
                return Err(error).context(DatabaseSnafu);
            }
        };

        LapEntry::clear_event_cache(updated.event_id.clone(), "models/entry:update");
        Ok(updated)
    }

    /************ DELETERS ************/
    /// # delete this entry
    pub fn delete(&self, conn: &mut PgConnection) -> QueryResult<usize> {
        use crate::schema::lap_entries::dsl::*;

        let deleted = diesel::delete(lap_entries.filter(id.eq(&self.id))).execute(conn)?;

        LapEntry::clear_event_cache(self.event_id.clone(), "models/entry:delete");
        Ok(deleted)
    }

    /// # delete all entries of an event
    /// used by the bulk wipe endpoint and by event deletion. the caller
    /// is responsible for clearing the event cache.
    pub fn delete_for_event(conn: &mut PgConnection, event_id_in: &str) -> QueryResult<usize> {
        use crate::schema::lap_entries::dsl::*;

        diesel::delete(lap_entries.filter(event_id.eq(event_id_in))).execute(conn)
    }

    /************ UTILS ************/
    /// drop the cached public responses of the owning event, off the
    /// request thread
    fn clear_event_cache(event_id_in: String, log_target: &'static str) {
        thread::spawn(move || {
            let conn = &mut establish_connection();
            match Event::from_id(conn, &event_id_in) {
                Ok(event) => clear_cache!(event),
                Err(error) => {
                    error!(target:log_target, "Error clearing cache could not get event: (error: {})", error);
                }
            }
        });
    }
}
