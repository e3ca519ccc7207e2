pub mod accounts;
pub mod bittaa;
pub mod buy;
pub mod pages;
pub mod profile;
pub mod record_pages;
pub mod sell;

use rocket::fairing::AdHoc;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::serde::json::{json, Value};
use rocket::{Build, Request, Rocket};

use crate::config::AppConfig;
use crate::services::request_log_fairing::RequestLogFairing;
use crate::views;

#[catch(401)]
fn not_signed_in() -> Redirect {
    Redirect::to("/login")
}

#[catch(403)]
fn forbidden() -> Redirect {
    Redirect::to("/home")
}

#[catch(404)]
fn not_found() -> (Status, RawHtml<String>) {
    (Status::NotFound, views::not_found_page())
}

/// Forms that fail to parse answer like any other validation failure.
#[catch(422)]
fn unprocessable(req: &Request<'_>) -> (Status, Value) {
    let message = format!("Invalid form data for {}", req.uri().path());
    (Status::BadRequest, json!({ "error": message }))
}

/// A form larger than the `data-form` limit never reaches a handler.
#[catch(413)]
fn payload_too_large() -> (Status, Value) {
    (Status::BadRequest, json!({ "error": "Upload is too large" }))
}

#[catch(500)]
fn internal_error() -> (Status, RawHtml<String>) {
    (Status::InternalServerError, views::server_error_page())
}

/// Attaches configuration, request logging, every route and the catchers.
/// Stores are managed separately so tests can swap in memory-backed ones.
pub fn mount(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .attach(AdHoc::config::<AppConfig>())
        .attach(RequestLogFairing)
        .mount("/", pages::routes())
        .mount("/", accounts::routes())
        .mount("/buy", buy::routes())
        .mount("/sell", sell::routes())
        .mount("/bittaa", bittaa::routes())
        .mount("/profile", profile::routes())
        .register("/", catchers![
            not_signed_in,
            forbidden,
            not_found,
            payload_too_large,
            unprocessable,
            internal_error
        ])
}
