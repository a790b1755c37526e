use std::env;
use std::process::exit;

use dotenvy::dotenv;

use fastlap_challenge::modules::models::admin::Admin;
use fastlap_challenge::modules::models::general::establish_connection;

/// bootstrap an admin account so the web login has someone to let in
fn main() {
    dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: create_admin <username> <password>");
        exit(1);
    }

    let connection = &mut establish_connection();

    match Admin::create(connection, &args[1], &args[2]) {
        Ok(admin) => println!("Created admin: {}", admin.username),
        Err(error) => {
            eprintln!("Failed to create admin: {}", error);
            exit(1);
        }
    }
}
