use chrono::{NaiveDate, Utc};
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::select;
use log::error;
use redis::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CustomResult, Error};
use crate::macros::redis::{clear_cache, delete_keys};
use crate::modules::helpers::slug::unique_slug;
use crate::modules::models::entry::LapEntry;
use crate::modules::redis::Redis;
use crate::schema::events;

/// the lifecycle of an event. stored lowercase in the database, unknown
/// values are rejected rather than defaulted.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Active,
    Finished,
    Archived,
}

impl EventStatus {
    pub fn parse(value: &str) -> CustomResult<EventStatus> {
        match value {
            "scheduled" => Ok(EventStatus::Scheduled),
            "active" => Ok(EventStatus::Active),
            "finished" => Ok(EventStatus::Finished),
            "archived" => Ok(EventStatus::Archived),
            _ => Err(Error::InvalidStatusError {
                status: value.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Scheduled => "scheduled",
            EventStatus::Active => "active",
            EventStatus::Finished => "finished",
            EventStatus::Archived => "archived",
        }
    }
}

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub track_id: Option<String>,
    pub status: String,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
#[diesel(table_name = events)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub track_id: Option<String>,
    pub status: String,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl Event {
    /************ INSERTERS ************/
    /// # Insert a new event into the database
    /// a fresh event starts out scheduled and gets a unique kebab-case
    /// slug derived from its name.
    ///
    /// ## Arguments
    /// * `conn` - The database connection to use
    /// * `name_in` - The event name
    /// * `description_in` - An optional description
    /// * `track_id_in` - An optional track reference
    /// * `scheduled_date_in` - The planned date, if any
    /// * `scheduled_time_in` - The planned time of day, if any
    ///
    /// ## Returns
    /// * `Event` - The inserted event
    pub fn new(
        conn: &mut PgConnection,
        name_in: &str,
        description_in: Option<String>,
        track_id_in: Option<String>,
        scheduled_date_in: Option<NaiveDate>,
        scheduled_time_in: Option<String>,
    ) -> QueryResult<Event> {
        let new_event = NewEvent {
            id: Uuid::new_v4().to_string(),
            name: name_in.to_string(),
            slug: unique_slug(conn, name_in)?,
            description: description_in,
            track_id: track_id_in,
            status: EventStatus::Scheduled.as_str().to_string(),
            scheduled_date: scheduled_date_in,
            scheduled_time: scheduled_time_in,
            created_at: Utc::now().naive_utc(),
        };

        let event: Event = match diesel::insert_into(events::table)
            .values(&new_event)
            .get_result::<Event>(conn)
        {
            Ok(event) => event,
            Err(error) => {
                error!(target:"models/event:new", "Error inserting new event: {}", error);
                return Err(error);
            }
        };

        clear_cache!(event);
        Ok(event)
    }

    /************ GETTERS ************/
    /// # Get an event by its id
    pub fn from_id(conn: &mut PgConnection, id_in: &str) -> QueryResult<Event> {
        use crate::schema::events::dsl::*;

        events.filter(id.eq(id_in)).first(conn)
    }

    /// # Get an event by its public slug
    pub fn from_slug(conn: &mut PgConnection, slug_in: &str) -> QueryResult<Event> {
        use crate::schema::events::dsl::*;

        events.filter(slug.eq(slug_in)).first(conn)
    }

    /// # get all events
    /// newest first, across all statuses
    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Event>> {
        use crate::schema::events::dsl::*;

        events.order(created_at.desc()).load::<Event>(conn)
    }

    /************ SETTERS ************/
    /// # update an event
    /// writes the passed event back to the database. the slug is left
    /// untouched so public urls keep working after a rename.
    pub fn update(conn: &mut PgConnection, event: &Event) -> QueryResult<Event> {
        use crate::schema::events::dsl::*;

        let updated: Event = match diesel::update(events.filter(id.eq(&event.id)))
            .set((
                name.eq(&event.name),
                description.eq(&event.description),
                track_id.eq(&event.track_id),
                status.eq(&event.status),
                scheduled_date.eq(&event.scheduled_date),
                scheduled_time.eq(&event.scheduled_time),
            ))
            .get_result::<Event>(conn)
        {
            Ok(updated) => updated,
            Err(error) => {
                error!(target:"models/event:update", "Error updating event: (event: {}, error: {})", event.id, error);
                return Err(error);
            }
        };

        clear_cache!(updated);
        Ok(updated)
    }

    /************ DELETERS ************/
    /// # delete this event and everything it owns
    /// the entries go first, the event itself after.
    pub fn delete(&self, conn: &mut PgConnection) -> QueryResult<usize> {
        use crate::schema::events::dsl::*;

        LapEntry::delete_for_event(conn, &self.id)?;
        let deleted = diesel::delete(events.filter(id.eq(&self.id))).execute(conn)?;

        clear_cache!(self);
        Ok(deleted)
    }

    /************ UTILS ************/
    /// # check whether a slug is already taken
    pub fn slug_exists(conn: &mut PgConnection, slug_in: &str) -> QueryResult<bool> {
        use crate::schema::events::dsl::*;

        select(exists(events.filter(slug.eq(slug_in)))).get_result(conn)
    }

    /// drop the cached public responses that contain this event
    pub fn clear_cache(&self, r_conn: &mut Connection) {
        let keys = vec![
            "/api/events".to_string(),
            format!("/api/events/{}", self.slug),
        ];

        delete_keys!(r_conn, keys, "models/event:clear_cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_all_known_values() {
        assert_eq!(EventStatus::parse("scheduled").unwrap(), EventStatus::Scheduled);
        assert_eq!(EventStatus::parse("active").unwrap(), EventStatus::Active);
        assert_eq!(EventStatus::parse("finished").unwrap(), EventStatus::Finished);
        assert_eq!(EventStatus::parse("archived").unwrap(), EventStatus::Archived);
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert!(EventStatus::parse("live").is_err());
        assert!(EventStatus::parse("Scheduled").is_err());
        assert!(EventStatus::parse("").is_err());
    }

    #[test]
    fn status_round_trips_through_as_str() {
        for status in [
            EventStatus::Scheduled,
            EventStatus::Active,
            EventStatus::Finished,
            EventStatus::Archived,
        ] {
            assert_eq!(EventStatus::parse(status.as_str()).unwrap(), status);
        }
    }
}
