use chrono::{Duration, Utc};
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::select;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::env;
use uuid::Uuid;

use crate::errors::{AlreadyExistsSnafu, CustomResult, DatabaseSnafu};
use crate::modules::auth;
use crate::schema::{admin_tokens, admins};

/// fallback token lifetime when TOKEN_TTL_HOURS is unset
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = admins)]
pub struct NewAdmin {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
#[diesel(table_name = admins)]
pub struct Admin {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: chrono::NaiveDateTime,
}

impl Admin {
    /************ INSERTERS ************/
    /// # Create a new admin account
    /// fails when the username is already taken. the password is stored
    /// as a salted digest, never as plain text.
    ///
    /// ## Arguments
    /// * `conn` - The database connection to use
    /// * `username_in` - The login name, unique
    /// * `password_in` - The plain text password to digest
    ///
    /// ## Returns
    /// * `Admin` - The created account
    pub fn create(
        conn: &mut PgConnection,
        username_in: &str,
        password_in: &str,
    ) -> CustomResult<Admin> {
        if Admin::exists(conn, username_in).context(DatabaseSnafu)? {
            return AlreadyExistsSnafu { name: username_in }.fail();
        }

        let new_admin = NewAdmin {
            id: Uuid::new_v4().to_string(),
            username: username_in.to_string(),
            password_hash: auth::hash_password(password_in),
            created_at: Utc::now().naive_utc(),
        };

        diesel::insert_into(admins::table)
            .values(&new_admin)
            .get_result::<Admin>(conn)
            .context(DatabaseSnafu)
    }

    /************ GETTERS ************/
    /// # Get an admin by username
    pub fn from_username(conn: &mut PgConnection, username_in: &str) -> QueryResult<Admin> {
        use crate::schema::admins::dsl::*;

        admins.filter(username.eq(username_in)).first(conn)
    }

    /************ UTILS ************/
    /// # check whether a username is taken
    pub fn exists(conn: &mut PgConnection, username_in: &str) -> QueryResult<bool> {
        use crate::schema::admins::dsl::*;

        select(exists(admins.filter(username.eq(username_in)))).get_result(conn)
    }

    /// # check whether any admin account has been provisioned yet
    /// lets a frontend detect a fresh install and point at the
    /// `create_admin` binary.
    pub fn exists_any(conn: &mut PgConnection) -> QueryResult<bool> {
        use crate::schema::admins::dsl::*;

        let count: i64 = admins.count().get_result(conn)?;
        Ok(count > 0)
    }

    /// # check a plain text password against the stored digest
    pub fn verify_password(&self, password: &str) -> bool {
        auth::verify_password(&self.password_hash, password)
    }
}

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = admin_tokens)]
pub struct NewAdminToken {
    pub id: String,
    pub token: String,
    pub username: String,
    pub created_at: chrono::NaiveDateTime,
    pub expires_at: chrono::NaiveDateTime,
}

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
#[diesel(table_name = admin_tokens)]
pub struct AdminToken {
    pub id: String,
    pub token: String,
    pub username: String,
    pub created_at: chrono::NaiveDateTime,
    pub expires_at: chrono::NaiveDateTime,
}

impl AdminToken {
    /************ INSERTERS ************/
    /// # issue a fresh bearer token for an admin
    /// lifetime comes from TOKEN_TTL_HOURS, expired tokens are cleaned up
    /// by the cron job.
    pub fn issue(conn: &mut PgConnection, username_in: &str) -> CustomResult<AdminToken> {
        dotenv().ok();

        let ttl_hours = env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_HOURS);

        let now = Utc::now().naive_utc();
        let new_token = NewAdminToken {
            id: Uuid::new_v4().to_string(),
            token: auth::generate_token(),
            username: username_in.to_string(),
            created_at: now,
            expires_at: now + Duration::hours(ttl_hours),
        };

        diesel::insert_into(admin_tokens::table)
            .values(&new_token)
            .get_result::<AdminToken>(conn)
            .context(DatabaseSnafu)
    }

    /************ GETTERS ************/
    /// # look a token up by its bearer value
    pub fn from_token(conn: &mut PgConnection, token_in: &str) -> QueryResult<AdminToken> {
        use crate::schema::admin_tokens::dsl::*;

        admin_tokens.filter(token.eq(token_in)).first(conn)
    }

    /************ DELETERS ************/
    /// # revoke a token
    pub fn revoke(conn: &mut PgConnection, token_in: &str) -> QueryResult<usize> {
        use crate::schema::admin_tokens::dsl::*;

        diesel::delete(admin_tokens.filter(token.eq(token_in))).execute(conn)
    }

    /// # delete every token past its expiry
    ///
    /// ## Returns
    /// * `usize` - How many tokens were purged
    pub fn purge_expired(conn: &mut PgConnection) -> QueryResult<usize> {
        use crate::schema::admin_tokens::dsl::*;

        diesel::delete(admin_tokens.filter(expires_at.lt(Utc::now().naive_utc()))).execute(conn)
    }

    /************ UTILS ************/
    /// # check whether this token is past its expiry
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now().naive_utc()
    }
}
