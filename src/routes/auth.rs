use log::error;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post};
use serde::{Deserialize, Serialize};

use json_response_derive::JsonResponse;

use crate::modules::auth::AdminSession;
use crate::modules::models::admin::{Admin, AdminToken};
use crate::modules::models::general::establish_connection;
use crate::MessageResponse;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/// # log an admin in
/// checks the credentials and hands out a fresh bearer token
#[post("/auth/login", data = "<credentials>")]
pub fn login(credentials: Json<LoginData>) -> Result<LoginResponse, Status> {
    let conn = &mut establish_connection();

    let admin = match Admin::from_username(conn, &credentials.username) {
        Ok(admin) => admin,
        Err(diesel::result::Error::NotFound) => return Err(Status::Unauthorized),
        Err(error) => {
            error!(target:"routes/auth:login", "Error loading admin: (error: {})", error);
            return Err(Status::InternalServerError);
        }
    };

    if !admin.verify_password(&credentials.password) {
        return Err(Status::Unauthorized);
    }

    match AdminToken::issue(conn, &admin.username) {
        Ok(token) => Ok(LoginResponse {
            token: token.token,
            username: admin.username,
        }),
        Err(error) => {
            error!(target:"routes/auth:login", "Error issuing token: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/// # revoke the presented token
#[post("/auth/logout")]
pub fn logout(session: AdminSession) -> Result<MessageResponse, Status> {
    let conn = &mut establish_connection();

    match AdminToken::revoke(conn, &session.token) {
        Ok(_) => Ok(MessageResponse {
            message: "Logged out".to_string(),
        }),
        Err(error) => {
            error!(target:"routes/auth:logout", "Error revoking token: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/// # report whether the presented token is valid
/// the guard already rejected anything invalid with a 401, so reaching
/// the handler means yes
#[get("/auth/check")]
pub fn check(session: AdminSession) -> AuthCheckResponse {
    AuthCheckResponse {
        authenticated: true,
        username: session.username,
    }
}

/// # report whether any admin account exists
#[get("/auth/has-admin")]
pub fn has_admin() -> Result<HasAdminResponse, Status> {
    let conn = &mut establish_connection();

    match Admin::exists_any(conn) {
        Ok(value) => Ok(HasAdminResponse { has_admin: value }),
        Err(error) => {
            error!(target:"routes/auth:has_admin", "Error counting admins: (error: {})", error);
            Err(Status::InternalServerError)
        }
    }
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

#[derive(Deserialize)]
pub struct LoginData {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, JsonResponse)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

#[derive(Serialize, Deserialize, JsonResponse)]
pub struct AuthCheckResponse {
    pub authenticated: bool,
    pub username: String,
}

#[derive(Serialize, Deserialize, JsonResponse)]
pub struct HasAdminResponse {
    pub has_admin: bool,
}
