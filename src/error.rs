use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::repository::StoreError;
use crate::views;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing required field or file
    #[error("{message}")]
    Validation { message: String },

    #[error("{resource} with ID {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{message}")]
    Duplicate { message: String },

    #[error("Failed to {operation}")]
    Unexpected { operation: String },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation { message: message.into() }
    }

    pub fn unexpected(operation: impl Into<String>) -> Self {
        Error::Unexpected { operation: operation.into() }
    }

    pub fn status(&self) -> Status {
        match self {
            Error::Validation { .. } | Error::Duplicate { .. } => Status::BadRequest,
            Error::NotFound { .. } => Status::NotFound,
            Error::Unexpected { .. } => Status::InternalServerError,
        }
    }

    fn log(&self) {
        if let Error::Unexpected { operation } = self {
            error!(%operation, "request failed");
        }
    }

    /// Converts a storage failure, naming the file for duplicate uploads.
    pub fn from_store(err: StoreError, file_name: Option<&str>) -> Self {
        match err {
            StoreError::Duplicate { .. } => Error::Duplicate {
                message: format!(
                    "Duplicate {}. File Already exists! ",
                    file_name.unwrap_or("record")
                ),
            },
            StoreError::Other(e) => Error::Unexpected {
                operation: format!("access the database: {e}"),
            },
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::from_store(err, None)
    }
}

impl From<askama::Error> for Error {
    fn from(err: askama::Error) -> Self {
        Error::Unexpected {
            operation: format!("render template: {err}"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected {
            operation: format!("read upload: {err}"),
        }
    }
}

fn json_body(err: &Error) -> Json<serde_json::Value> {
    Json(json!({ "error": err.to_string() }))
}

/// Page-oriented responses: bad input answers JSON, missing records and
/// failures render the error pages.
impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        self.log();
        match self {
            Error::Validation { .. } | Error::Duplicate { .. } => {
                (self.status(), json_body(&self)).respond_to(req)
            }
            Error::NotFound { .. } => (Status::NotFound, views::not_found_page()).respond_to(req),
            Error::Unexpected { .. } => {
                (Status::InternalServerError, views::server_error_page()).respond_to(req)
            }
        }
    }
}

/// JSON-only responses for the create endpoints.
#[derive(Debug)]
pub struct JsonError(pub Error);

impl From<Error> for JsonError {
    fn from(err: Error) -> Self {
        JsonError(err)
    }
}

impl<'r> Responder<'r, 'static> for JsonError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        self.0.log();
        (self.0.status(), json_body(&self.0)).respond_to(req)
    }
}
