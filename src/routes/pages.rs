// routes/pages.rs
//
// Dashboards and the per-user listings linked from them.

use rocket::response::content::RawHtml;
use rocket::{Route, State};

use crate::error::Error;
use crate::models::buy::Buy;
use crate::models::identity::Role;
use crate::models::sell::Sell;
use crate::repository::{Identities, Records};
use crate::routes::record_pages::{self, Page};
use crate::services::auth_guard::{AdminUser, SessionUser, StaffUser};
use crate::views::{render, HomePage, IdentityRow, WorkersPage};

const STAFF_LINKS: &[(&str, &str)] = &[
    ("/buy/addbuy", "Add buy"),
    ("/bought", "My buys"),
    ("/sell/addsell", "Add sell"),
    ("/sells", "My sells"),
    ("/bittaa/addbittaa", "Add bittaa"),
    ("/bittaa/mine", "My bittaa"),
];

const ADMIN_LINKS: &[(&str, &str)] = &[
    ("/buy", "All buys"),
    ("/sell", "All sells"),
    ("/bittaa", "All bittaa"),
    ("/profile", "All profiles"),
    ("/workers", "Workers"),
    ("/register", "Register account"),
];

const USER_LINKS: &[(&str, &str)] = &[
    ("/profile/addprofile", "Add profile"),
    ("/profile/mine", "My profiles"),
];

fn dashboard(heading: &'static str, user: &SessionUser, groups: &[&[(&'static str, &'static str)]]) -> Page {
    let links = groups.iter().flat_map(|group| group.iter().copied()).collect();
    render(&HomePage {
        heading,
        name: user.name.clone(),
        links,
    })
}

fn landing(user: &SessionUser) -> Page {
    match user.role {
        Role::User => dashboard("Home", user, &[USER_LINKS]),
        Role::Worker | Role::Admin => dashboard("Home", user, &[STAFF_LINKS, USER_LINKS]),
    }
}

#[get("/")]
fn index(user: SessionUser) -> Page {
    landing(&user)
}

#[get("/home")]
fn home(user: SessionUser) -> Page {
    landing(&user)
}

#[get("/admin")]
fn admin(user: AdminUser) -> Page {
    dashboard("Admin dashboard", &user.0, &[ADMIN_LINKS, STAFF_LINKS])
}

#[get("/homeworker")]
fn homeworker(user: StaffUser) -> Page {
    dashboard("Worker dashboard", &user.0, &[STAFF_LINKS, USER_LINKS])
}

#[get("/bought")]
async fn bought(user: StaffUser, store: &State<Records<Buy>>, identities: &State<Identities>) -> Page {
    record_pages::list_own_page(store.inner(), identities.inner(), &user.0).await
}

#[get("/sells")]
async fn sells(user: StaffUser, store: &State<Records<Sell>>, identities: &State<Identities>) -> Page {
    record_pages::list_own_page(store.inner(), identities.inner(), &user.0).await
}

#[get("/workers")]
async fn workers(_user: AdminUser, identities: &State<Identities>) -> Result<RawHtml<String>, Error> {
    let found = identities.list_by_role(Role::Worker).await?;
    render(&WorkersPage {
        workers: found.iter().map(IdentityRow::from).collect(),
    })
}

pub fn routes() -> Vec<Route> {
    routes![index, home, admin, homeworker, bought, sells, workers]
}
