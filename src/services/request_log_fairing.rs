use std::time::Instant;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Data, Request, Response};
use tracing::{info, warn};

/// Logs one line per request with method, path, status and latency.
pub struct RequestLogFairing;

#[derive(Clone, Copy)]
struct Started(Option<Instant>);

#[rocket::async_trait]
impl Fairing for RequestLogFairing {
    fn info(&self) -> Info {
        Info {
            name: "Request logging",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _: &mut Data<'_>) {
        request.local_cache(|| Started(Some(Instant::now())));
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let started = request.local_cache(|| Started(None));
        let elapsed_ms = started.0.map(|t| t.elapsed().as_millis() as u64).unwrap_or_default();
        let status = response.status();

        if status.code >= 500 {
            warn!(method = %request.method(), path = %request.uri().path(), status = status.code, elapsed_ms, "request failed");
        } else {
            info!(method = %request.method(), path = %request.uri().path(), status = status.code, elapsed_ms, "request");
        }
    }
}
