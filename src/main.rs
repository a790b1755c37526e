use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};

use fastlap_challenge::cron_jobs::register_cron_jobs;
use fastlap_challenge::modules::helpers::logging::setup_logging;
use fastlap_challenge::routes::{auth, entry, event, export, track};
use fastlap_challenge::MessageResponse;

#[macro_use]
extern crate rocket;

#[get("/")]
fn index() -> MessageResponse {
    MessageResponse {
        message: "Fast Lap Challenge API".to_string(),
    }
}

#[launch]
fn rocket() -> Rocket<Build> {
    setup_logging().expect("failed to set up logging");

    rocket::build()
        .attach(AdHoc::on_liftoff("cron jobs", |_| {
            Box::pin(async {
                register_cron_jobs().await;
            })
        }))
        .mount("/api", routes![
            index,
            auth::login,
            auth::logout,
            auth::check,
            auth::has_admin,
            event::overview,
            event::detail,
            event::create,
            event::update,
            event::delete,
            entry::create,
            entry::update,
            entry::delete,
            entry::delete_all,
            track::list_all,
            track::create,
            track::update,
            track::delete,
            export::csv_export,
            export::pdf_export,
        ])
}
