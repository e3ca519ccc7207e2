pub mod utils;

use mongodb::bson::oid::ObjectId;
use rocket::data::ToByteUnit;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::LocalResponse;

use crate::models::bittaa::Material;
use crate::models::identity::{Identity, Role};
use crate::repository::RecordFilter;
use crate::services::auth_guard::SESSION_COOKIE;
use utils::{
    create_test_app, create_test_identity, multipart_body, multipart_type, session_cookie, TestApp,
    TEST_FILE_LIMIT, TEST_PASSWORD,
};

const PNG: &[u8] = &[0x89, 0x50, 0x4e, 0x47];

fn location<'a>(response: &'a LocalResponse<'_>) -> Option<&'a str> {
    response.headers().get_one("Location")
}

fn buy_fields<'a>(name: &'a str, amount: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![("name", name), ("amount", amount), ("status", "Not-Paid")]
}

fn bittaa_fields<'a>(name: &'a str, material: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("name", name),
        ("material", material),
        ("from_seller", "Gadaa Farm"),
        ("birr", "1200"),
        ("status", "Paid"),
    ]
}

async fn post_record(app: &TestApp, owner: &Identity, path: &str, fields: &[(&str, &str)]) -> ObjectId {
    let response = app
        .client
        .post(path)
        .header(multipart_type())
        .cookie(session_cookie(owner))
        .body(multipart_body(fields, Some(("photo.png", "image/png", PNG))))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::SeeOther, "{path}");

    match path {
        "/buy" => app.stores.buys.find(&RecordFilter::owned_by(owner.id)).await.unwrap()[0].id,
        "/sell" => app.stores.sells.find(&RecordFilter::owned_by(owner.id)).await.unwrap()[0].id,
        "/bittaa" => app.stores.bittaas.find(&RecordFilter::owned_by(owner.id)).await.unwrap()[0].id,
        other => panic!("no store for {other}"),
    }
}

#[rocket::async_test]
async fn signed_out_requests_go_to_login() {
    let app = create_test_app().await;

    for path in ["/", "/home", "/buy", "/sell/addsell", "/bittaa", "/profile/mine"] {
        let response = app.client.get(path).dispatch().await;
        assert_eq!(response.status(), Status::SeeOther, "{path}");
        assert_eq!(location(&response), Some("/login"), "{path}");
    }
}

#[rocket::async_test]
async fn missing_role_goes_home() {
    let app = create_test_app().await;
    let worker = create_test_identity(&app.stores, Role::Worker).await;
    let user = create_test_identity(&app.stores, Role::User).await;

    let response = app.client.get("/admin").cookie(session_cookie(&worker)).dispatch().await;
    assert_eq!(location(&response), Some("/home"));

    let response = app.client.get("/bittaa").cookie(session_cookie(&worker)).dispatch().await;
    assert_eq!(location(&response), Some("/home"));

    let response = app.client.get("/buy").cookie(session_cookie(&user)).dispatch().await;
    assert_eq!(location(&response), Some("/home"));
}

#[rocket::async_test]
async fn forged_session_is_rejected() {
    let app = create_test_app().await;
    let mut worker = create_test_identity(&app.stores, Role::Worker).await;
    worker.role = Role::Admin;
    let token = crate::jwt::jwt_helper::create_token(&worker, "another-secret", 1).unwrap();

    let response = app
        .client
        .get("/admin")
        .cookie(rocket::http::Cookie::new(SESSION_COOKIE, token))
        .dispatch()
        .await;
    assert_eq!(location(&response), Some("/login"));
}

#[rocket::async_test]
async fn create_without_file_is_rejected_and_not_stored() {
    let app = create_test_app().await;
    let worker = create_test_identity(&app.stores, Role::Worker).await;

    let response = app
        .client
        .post("/buy")
        .header(multipart_type())
        .cookie(session_cookie(&worker))
        .body(multipart_body(&buy_fields("Maize", "500"), None))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "Please choose files");
    assert!(app.stores.buys.find(&RecordFilter::all()).await.unwrap().is_empty());
}

#[rocket::async_test]
async fn create_without_required_field_is_rejected() {
    let app = create_test_app().await;
    let worker = create_test_identity(&app.stores, Role::Worker).await;

    let response = app
        .client
        .post("/buy")
        .header(multipart_type())
        .cookie(session_cookie(&worker))
        .body(multipart_body(&[("name", "Maize")], Some(("maize.png", "image/png", PNG))))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    assert!(app.stores.buys.find(&RecordFilter::all()).await.unwrap().is_empty());
}

#[rocket::async_test]
async fn create_with_file_stores_base64_image() {
    let app = create_test_app().await;
    let worker = create_test_identity(&app.stores, Role::Worker).await;

    let response = app
        .client
        .post("/buy")
        .header(multipart_type())
        .cookie(session_cookie(&worker))
        .body(multipart_body(&buy_fields("Maize", "500"), Some(("maize.png", "image/png", PNG))))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(location(&response), Some("/bought"));

    let buys = app.stores.buys.find(&RecordFilter::all()).await.unwrap();
    assert_eq!(buys.len(), 1);
    assert_eq!(buys[0].user, worker.id);
    assert_eq!(buys[0].image.base64, "iVBORw==");
    assert_eq!(buys[0].image.content_type, "image/png");
    assert_eq!(buys[0].status.as_str(), "Not-Paid");

    let listing = app.client.get("/bought").cookie(session_cookie(&worker)).dispatch().await;
    assert_eq!(listing.status(), Status::Ok);
    assert!(listing.into_string().await.unwrap().contains("Maize"));
}

#[rocket::async_test]
async fn update_by_other_worker_redirects_without_write() {
    let app = create_test_app().await;
    let owner = create_test_identity(&app.stores, Role::Worker).await;
    let other = create_test_identity(&app.stores, Role::Worker).await;

    app.client
        .post("/buy")
        .header(multipart_type())
        .cookie(session_cookie(&owner))
        .body(multipart_body(&buy_fields("Maize", "500"), Some(("maize.png", "image/png", PNG))))
        .dispatch()
        .await;
    let id = app.stores.buys.find(&RecordFilter::all()).await.unwrap()[0].id;

    let response = app
        .client
        .post(format!("/buy/{}", id.to_hex()))
        .header(multipart_type())
        .cookie(session_cookie(&other))
        .body(multipart_body(&buy_fields("Teff", "1"), None))
        .dispatch()
        .await;

    assert_eq!(location(&response), Some("/bought"));
    let stored = app.stores.buys.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Maize");
    assert_eq!(stored.amount, "500");
}

#[rocket::async_test]
async fn owner_update_without_file_keeps_image() {
    let app = create_test_app().await;
    let owner = create_test_identity(&app.stores, Role::Worker).await;

    app.client
        .post("/buy")
        .header(multipart_type())
        .cookie(session_cookie(&owner))
        .body(multipart_body(&buy_fields("Maize", "500"), Some(("maize.png", "image/png", PNG))))
        .dispatch()
        .await;
    let before = app.stores.buys.find(&RecordFilter::all()).await.unwrap().remove(0);

    let response = app
        .client
        .post(format!("/buy/{}", before.id.to_hex()))
        .header(multipart_type())
        .cookie(session_cookie(&owner))
        .body(multipart_body(&buy_fields("Maize", "650"), None))
        .dispatch()
        .await;

    assert_eq!(location(&response), Some("/bought"));
    let after = app.stores.buys.find_by_id(before.id).await.unwrap().unwrap();
    assert_eq!(after.amount, "650");
    assert_eq!(after.image, before.image);
}

#[rocket::async_test]
async fn delete_missing_record_is_not_found() {
    let app = create_test_app().await;
    let admin = create_test_identity(&app.stores, Role::Admin).await;

    let path = format!("/buy/{}", ObjectId::new().to_hex());
    let response = app.client.delete(path).cookie(session_cookie(&admin)).dispatch().await;
    assert_eq!(response.status(), Status::NotFound);

    let response = app.client.delete("/buy/not-an-id").cookie(session_cookie(&admin)).dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn form_method_override_deletes() {
    let app = create_test_app().await;
    let owner = create_test_identity(&app.stores, Role::Worker).await;

    app.client
        .post("/buy")
        .header(multipart_type())
        .cookie(session_cookie(&owner))
        .body(multipart_body(&buy_fields("Maize", "500"), Some(("maize.png", "image/png", PNG))))
        .dispatch()
        .await;
    let id = app.stores.buys.find(&RecordFilter::all()).await.unwrap()[0].id;

    let response = app
        .client
        .post(format!("/buy/{}", id.to_hex()))
        .header(ContentType::Form)
        .cookie(session_cookie(&owner))
        .body("_method=delete")
        .dispatch()
        .await;

    assert_eq!(location(&response), Some("/bought"));
    assert!(app.stores.buys.find_by_id(id).await.unwrap().is_none());
}

#[rocket::async_test]
async fn search_matches_title_case_insensitively() {
    let app = create_test_app().await;
    let worker = create_test_identity(&app.stores, Role::Worker).await;

    for name in ["Maize Bundle", "Teff"] {
        app.client
            .post("/buy")
            .header(multipart_type())
            .cookie(session_cookie(&worker))
            .body(multipart_body(&buy_fields(name, "10"), Some(("p.png", "image/png", PNG))))
            .dispatch()
            .await;
    }

    let response = app.client.get("/buy/search/maize").cookie(session_cookie(&worker)).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().await.unwrap();
    assert!(html.contains("Maize Bundle"));
    assert!(!html.contains("Teff"));
}

#[rocket::async_test]
async fn profile_of_another_user_is_not_found() {
    let app = create_test_app().await;
    let owner = create_test_identity(&app.stores, Role::User).await;
    let stranger = create_test_identity(&app.stores, Role::User).await;

    let response = app
        .client
        .post("/profile")
        .header(multipart_type())
        .cookie(session_cookie(&owner))
        .body(multipart_body(&[("full_name", "Chaltu Abebe")], Some(("me.png", "image/png", PNG))))
        .dispatch()
        .await;
    assert_eq!(location(&response), Some("/profile/mine"));
    let id = app.stores.profiles.find(&RecordFilter::all()).await.unwrap()[0].id;

    let path = format!("/profile/{}", id.to_hex());
    let response = app.client.get(path.clone()).cookie(session_cookie(&stranger)).dispatch().await;
    assert_eq!(response.status(), Status::NotFound);

    let response = app.client.get(path).cookie(session_cookie(&owner)).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
}

#[rocket::async_test]
async fn login_sets_session_and_redirects_by_role() {
    let app = create_test_app().await;
    let worker = create_test_identity(&app.stores, Role::Worker).await;

    let response = app
        .client
        .post("/login")
        .header(ContentType::Form)
        .body(format!("email={}&password={TEST_PASSWORD}", worker.email))
        .dispatch()
        .await;

    assert_eq!(location(&response), Some("/homeworker"));
    assert!(response.cookies().get(SESSION_COOKIE).is_some());
}

#[rocket::async_test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = create_test_app().await;
    let worker = create_test_identity(&app.stores, Role::Worker).await;

    let response = app
        .client
        .post("/login")
        .header(ContentType::Form)
        .body(format!("email={}&password=wrong", worker.email))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Unauthorized);
    assert!(response.cookies().get(SESSION_COOKIE).is_none());
}

#[rocket::async_test]
async fn login_page_redirects_signed_in_users() {
    let app = create_test_app().await;
    let user = create_test_identity(&app.stores, Role::User).await;

    let response = app.client.get("/login").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let response = app.client.get("/login").cookie(session_cookie(&user)).dispatch().await;
    assert_eq!(location(&response), Some("/home"));
}

#[rocket::async_test]
async fn duplicate_registration_is_a_bad_request() {
    let app = create_test_app().await;
    let admin = create_test_identity(&app.stores, Role::Admin).await;
    let fields = [
        ("email", "worker@example.com"),
        ("display_name", "Worker"),
        ("password", "pa55word"),
        ("role", "worker"),
    ];

    let first = app
        .client
        .post("/register")
        .header(multipart_type())
        .cookie(session_cookie(&admin))
        .body(multipart_body(&fields, None))
        .dispatch()
        .await;
    assert_eq!(location(&first), Some("/workers"));

    let second = app
        .client
        .post("/register")
        .header(multipart_type())
        .cookie(session_cookie(&admin))
        .body(multipart_body(&fields, None))
        .dispatch()
        .await;
    assert_eq!(second.status(), Status::BadRequest);

    let workers = app.client.get("/workers").cookie(session_cookie(&admin)).dispatch().await;
    assert!(workers.into_string().await.unwrap().contains("worker@example.com"));
}

#[rocket::async_test]
async fn unknown_route_renders_not_found() {
    let app = create_test_app().await;
    let response = app.client.get("/no/such/page").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[test]
fn upload_limits_allow_real_photos() {
    let config = rocket::Config::from(rocket::Config::figment());
    assert!(config.limits.get("file").unwrap() >= 8.mebibytes());
    assert!(config.limits.get("data-form").unwrap() >= 10.mebibytes());
}

#[rocket::async_test]
async fn oversized_upload_is_rejected_on_create() {
    let app = create_test_app().await;
    let worker = create_test_identity(&app.stores, Role::Worker).await;
    let photo = vec![0u8; TEST_FILE_LIMIT * 2];

    let response = app
        .client
        .post("/buy")
        .header(multipart_type())
        .cookie(session_cookie(&worker))
        .body(multipart_body(&buy_fields("Maize", "500"), Some(("big.png", "image/png", &photo))))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "Image is too large");
    assert!(app.stores.buys.find(&RecordFilter::all()).await.unwrap().is_empty());
}

#[rocket::async_test]
async fn oversized_upload_on_update_changes_nothing() {
    let app = create_test_app().await;
    let owner = create_test_identity(&app.stores, Role::Worker).await;
    let id = post_record(&app, &owner, "/buy", &buy_fields("Maize", "500")).await;
    let before = app.stores.buys.find_by_id(id).await.unwrap().unwrap();
    let photo = vec![0u8; TEST_FILE_LIMIT * 2];

    let response = app
        .client
        .post(format!("/buy/{}", id.to_hex()))
        .header(multipart_type())
        .cookie(session_cookie(&owner))
        .body(multipart_body(&buy_fields("Teff", "650"), Some(("big.png", "image/png", &photo))))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let after = app.stores.buys.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(after.name, before.name);
    assert_eq!(after.amount, before.amount);
    assert_eq!(after.image, before.image);
}

#[rocket::async_test]
async fn unknown_status_is_rejected_not_defaulted() {
    let app = create_test_app().await;
    let worker = create_test_identity(&app.stores, Role::Worker).await;

    let response = app
        .client
        .post("/buy")
        .header(multipart_type())
        .cookie(session_cookie(&worker))
        .body(multipart_body(
            &[("name", "Maize"), ("amount", "500"), ("status", "Garbage")],
            Some(("maize.png", "image/png", PNG)),
        ))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "Invalid Status");
    assert!(app.stores.buys.find(&RecordFilter::all()).await.unwrap().is_empty());
}

#[rocket::async_test]
async fn form_over_the_body_limit_answers_json() {
    let app = create_test_app().await;
    let admin = create_test_identity(&app.stores, Role::Admin).await;
    let photo = vec![0u8; 11 * 1024 * 1024];

    let response = app
        .client
        .post("/buy")
        .header(multipart_type())
        .cookie(session_cookie(&admin))
        .body(multipart_body(&buy_fields("Maize", "500"), Some(("huge.png", "image/png", &photo))))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(response.content_type(), Some(ContentType::JSON));
    assert!(app.stores.buys.find(&RecordFilter::all()).await.unwrap().is_empty());
}

#[rocket::async_test]
async fn denied_update_stages_no_file() {
    let app = create_test_app().await;
    let owner = create_test_identity(&app.stores, Role::Worker).await;
    let other = create_test_identity(&app.stores, Role::Worker).await;
    let id = post_record(&app, &owner, "/buy", &buy_fields("Maize", "500")).await;
    let staged = app.staged_files();

    let response = app
        .client
        .post(format!("/buy/{}", id.to_hex()))
        .header(multipart_type())
        .cookie(session_cookie(&other))
        .body(multipart_body(&buy_fields("Teff", "1"), Some(("teff.png", "image/png", PNG))))
        .dispatch()
        .await;

    assert_eq!(location(&response), Some("/bought"));
    assert_eq!(app.staged_files(), staged);
}

#[rocket::async_test]
async fn listings_name_the_owner() {
    let app = create_test_app().await;
    let worker = create_test_identity(&app.stores, Role::Worker).await;
    let admin = create_test_identity(&app.stores, Role::Admin).await;
    let id = post_record(&app, &worker, "/buy", &buy_fields("Maize", "500")).await;
    let owner_link = format!("/buy/user/{}", worker.id.to_hex());

    let listing = app.client.get("/buy").cookie(session_cookie(&admin)).dispatch().await;
    let html = listing.into_string().await.unwrap();
    assert!(html.contains("Test worker"));
    assert!(html.contains(&owner_link));

    let page = app
        .client
        .get(format!("/buy/{}", id.to_hex()))
        .cookie(session_cookie(&admin))
        .dispatch()
        .await;
    let html = page.into_string().await.unwrap();
    assert!(html.contains("Test worker"));
    assert!(!html.contains(&format!(">{}<", worker.id.to_hex())));
}

#[rocket::async_test]
async fn worker_may_update_another_workers_sell() {
    let app = create_test_app().await;
    let owner = create_test_identity(&app.stores, Role::Worker).await;
    let other = create_test_identity(&app.stores, Role::Worker).await;
    let id = post_record(&app, &owner, "/sell", &[("seller", "Gadaa Farm"), ("amount", "900")]).await;

    let response = app
        .client
        .post(format!("/sell/{}", id.to_hex()))
        .header(multipart_type())
        .cookie(session_cookie(&other))
        .body(multipart_body(&[("seller", "Gadaa Farm"), ("amount", "950")], None))
        .dispatch()
        .await;

    assert_eq!(location(&response), Some("/sells"));
    let stored = app.stores.sells.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.amount, "950");
    assert_eq!(stored.user, owner.id);
}

#[rocket::async_test]
async fn bittaa_of_another_worker_redirects_by_operation() {
    let app = create_test_app().await;
    let owner = create_test_identity(&app.stores, Role::Worker).await;
    let other = create_test_identity(&app.stores, Role::Worker).await;
    let id = post_record(&app, &owner, "/bittaa", &bittaa_fields("Onion", "Karot")).await;

    let response = app
        .client
        .get(format!("/bittaa/edit/{}", id.to_hex()))
        .cookie(session_cookie(&other))
        .dispatch()
        .await;
    assert_eq!(location(&response), Some("/bought"));

    let response = app
        .client
        .post(format!("/bittaa/{}", id.to_hex()))
        .header(multipart_type())
        .cookie(session_cookie(&other))
        .body(multipart_body(&bittaa_fields("Garlic", "Karot"), None))
        .dispatch()
        .await;
    assert_eq!(location(&response), Some("/bittaa"));
    let stored = app.stores.bittaas.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Onion");
}

#[rocket::async_test]
async fn bittaa_list_and_show_are_admin_only() {
    let app = create_test_app().await;
    let worker = create_test_identity(&app.stores, Role::Worker).await;
    let admin = create_test_identity(&app.stores, Role::Admin).await;
    let id = post_record(&app, &worker, "/bittaa", &bittaa_fields("Onion", "Karot")).await;
    let show = format!("/bittaa/{}", id.to_hex());

    for path in ["/bittaa".to_string(), show.clone()] {
        let response = app.client.get(path.clone()).cookie(session_cookie(&worker)).dispatch().await;
        assert_eq!(location(&response), Some("/home"), "{path}");

        let response = app.client.get(path.clone()).cookie(session_cookie(&admin)).dispatch().await;
        assert_eq!(response.status(), Status::Ok, "{path}");
    }
}

#[rocket::async_test]
async fn multi_word_material_is_stored() {
    let app = create_test_app().await;
    let worker = create_test_identity(&app.stores, Role::Worker).await;
    let id = post_record(&app, &worker, "/bittaa", &bittaa_fields("Tyres", "Car Material")).await;

    let stored = app.stores.bittaas.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.material, Material::CarMaterial);
    assert_eq!(stored.from_seller, "Gadaa Farm");
}

#[rocket::async_test]
async fn session_follows_the_stored_role() {
    let app = create_test_app().await;
    let mut worker = create_test_identity(&app.stores, Role::Worker).await;
    worker.role = Role::Admin;

    let response = app.client.get("/admin").cookie(session_cookie(&worker)).dispatch().await;
    assert_eq!(location(&response), Some("/home"));
}

#[rocket::async_test]
async fn session_for_removed_identity_is_signed_out() {
    let app = create_test_app().await;
    let ghost = Identity::new(
        "ghost@example.com".to_string(),
        "Ghost".to_string(),
        Role::Admin,
        "not-a-hash".to_string(),
    );

    let response = app
        .client
        .get("/home")
        .cookie(session_cookie(&ghost))
        .dispatch()
        .await;
    assert_eq!(location(&response), Some("/login"));
}
