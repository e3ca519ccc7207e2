use std::path::PathBuf;

use mongodb::bson::oid::ObjectId;
use rocket::http::{ContentType, Cookie};
use rocket::local::asynchronous::Client;

use crate::config::AppConfig;
use crate::jwt::jwt_helper::create_token;
use crate::models::identity::{Identity, Role};
use crate::repository::Stores;
use crate::routes;
use crate::services::auth_guard::SESSION_COOKIE;
use crate::services::password::hash_password;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "pa55word";
pub const BOUNDARY: &str = "produce-ledger-test-boundary";
/// Per-file upload limit of the test app, small enough to exceed cheaply.
pub const TEST_FILE_LIMIT: usize = 1024;

pub fn test_config() -> AppConfig {
    AppConfig {
        database_name: "produce_market_test".to_string(),
        upload_dir: std::env::temp_dir().join(format!("produce-ledger-{}", ObjectId::new().to_hex())),
        retain_uploads: false,
        jwt_secret: TEST_SECRET.to_string(),
        session_hours: 1,
        admin_email: None,
        admin_password: None,
    }
}

pub struct TestApp {
    pub client: Client,
    pub stores: Stores,
    pub upload_dir: PathBuf,
}

impl TestApp {
    /// Files left in the upload directory.
    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(&self.upload_dir).map(|dir| dir.count()).unwrap_or(0)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Full route table over memory-backed stores. Uploads are retained so tests
/// can see what was written to disk.
pub async fn create_test_app() -> TestApp {
    let config = test_config();
    let figment = rocket::Config::figment()
        .merge(("jwt_secret", config.jwt_secret.as_str()))
        .merge(("upload_dir", config.upload_dir.to_string_lossy().to_string()))
        .merge(("retain_uploads", true))
        .merge(("limits.file", TEST_FILE_LIMIT))
        .merge(("log_level", "off"));

    let stores = Stores::memory();
    let rocket = routes::mount(stores.clone().manage(rocket::custom(figment)));
    let client = Client::tracked(rocket).await.expect("valid rocket instance");
    TestApp {
        client,
        stores,
        upload_dir: config.upload_dir,
    }
}

pub async fn create_test_identity(stores: &Stores, role: Role) -> Identity {
    let email = format!("{}@example.com", ObjectId::new().to_hex());
    let identity = Identity::new(
        email,
        format!("Test {}", role.as_str()),
        role,
        hash_password(TEST_PASSWORD).expect("hash password"),
    );
    stores.identities.insert(&identity).await.expect("insert identity");
    identity
}

pub fn session_cookie(identity: &Identity) -> Cookie<'static> {
    let token = create_token(identity, TEST_SECRET, 1).expect("sign token");
    Cookie::new(SESSION_COOKIE, token)
}

pub fn multipart_type() -> ContentType {
    ContentType::new("multipart", "form-data").with_params(("boundary", BOUNDARY))
}

/// Multipart body with text fields and an optional `image` file part.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
