// routes/profile.rs

use rocket::form::{self, Form, FromForm};
use rocket::fs::TempFile;
use rocket::response::Redirect;
use rocket::{Route, State};

use crate::config::AppConfig;
use crate::error::{Error, JsonError};
use crate::models::profile::{Profile, ProfileFields};
use crate::models::record::clean;
use crate::repository::{Identities, Records};
use crate::routes::record_pages::{self, optional, required, GuardedPage, Page};
use crate::services::auth_guard::{SessionUser, StaffUser};

#[derive(FromForm)]
pub struct ProfileForm<'r> {
    full_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    bio: Option<String>,
    image: form::Result<'r, TempFile<'r>>,
}

impl<'r> ProfileForm<'r> {
    fn into_parts(self) -> Result<(ProfileFields, Option<TempFile<'r>>), Error> {
        let fields = ProfileFields {
            full_name: required(self.full_name, "Full name")?,
            phone: clean(self.phone),
            address: clean(self.address),
            bio: clean(self.bio),
        };
        Ok((fields, optional(self.image, "Image")?))
    }
}

#[get("/addprofile")]
fn add(_user: SessionUser) -> Page {
    record_pages::add_page::<Profile>()
}

#[post("/", data = "<form>")]
async fn create(
    user: SessionUser,
    form: Form<ProfileForm<'_>>,
    profiles: &State<Records<Profile>>,
    config: &State<AppConfig>,
) -> Result<Redirect, JsonError> {
    let (fields, image) = form.into_inner().into_parts()?;
    record_pages::create(profiles.inner(), &user, fields, image, config).await
}

#[get("/")]
async fn list_all(
    _user: StaffUser,
    profiles: &State<Records<Profile>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::list_all_page(profiles.inner(), identities.inner()).await
}

#[get("/mine")]
async fn list_own(
    user: SessionUser,
    profiles: &State<Records<Profile>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::list_own_page(profiles.inner(), identities.inner(), &user).await
}

#[get("/<id>")]
async fn show(
    user: SessionUser,
    id: &str,
    profiles: &State<Records<Profile>>,
    identities: &State<Identities>,
) -> GuardedPage {
    record_pages::show_page(profiles.inner(), identities.inner(), &user, id).await
}

#[get("/edit/<id>")]
async fn edit(user: SessionUser, id: &str, profiles: &State<Records<Profile>>) -> GuardedPage {
    record_pages::edit_page(profiles.inner(), &user, id).await
}

#[post("/<id>", data = "<form>")]
async fn update(
    user: SessionUser,
    id: &str,
    form: Form<ProfileForm<'_>>,
    profiles: &State<Records<Profile>>,
    config: &State<AppConfig>,
) -> Result<Redirect, Error> {
    let (fields, image) = form.into_inner().into_parts()?;
    record_pages::update(profiles.inner(), &user, id, fields, image, config).await
}

#[delete("/<id>")]
async fn delete(user: SessionUser, id: &str, profiles: &State<Records<Profile>>) -> Result<Redirect, Error> {
    record_pages::delete(profiles.inner(), &user, id).await
}

#[get("/user/<user_id>")]
async fn by_owner(
    _user: SessionUser,
    user_id: &str,
    profiles: &State<Records<Profile>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::by_owner_page(profiles.inner(), identities.inner(), user_id).await
}

#[get("/search/<query>")]
async fn search(
    _user: SessionUser,
    query: &str,
    profiles: &State<Records<Profile>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::search_page(profiles.inner(), identities.inner(), query).await
}

pub fn routes() -> Vec<Route> {
    routes![add, create, list_all, list_own, show, edit, update, delete, by_owner, search]
}
