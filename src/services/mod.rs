pub mod access_guard;
pub mod accounts;
pub mod auth_guard;
pub mod password;
pub mod records;
pub mod request_log_fairing;
pub mod upload_reconciler;
