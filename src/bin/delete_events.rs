use std::env;
use std::process::exit;

use dotenvy::dotenv;

use fastlap_challenge::modules::models::event::Event;
use fastlap_challenge::modules::models::general::establish_connection;

/// wipe events (and their entries) by slug, or everything with --all
fn main() {
    dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("usage: delete_events <slug>... | --all");
        exit(1);
    }

    let connection = &mut establish_connection();

    let events = if args[0] == "--all" {
        match Event::get_all(connection) {
            Ok(events) => events,
            Err(error) => {
                eprintln!("Failed to load events: {}", error);
                exit(1);
            }
        }
    } else {
        let mut events = Vec::new();
        for slug in &args {
            match Event::from_slug(connection, slug) {
                Ok(event) => events.push(event),
                Err(error) => eprintln!("Skipping {}: {}", slug, error),
            }
        }
        events
    };

    for event in events {
        match event.delete(connection) {
            Ok(_) => println!("Deleted event: {}", event.slug),
            Err(error) => eprintln!("Failed to delete {}: {}", event.slug, error),
        }
    }
}
