// routes/bittaa.rs

use rocket::form::{self, Form, FromForm};
use rocket::fs::TempFile;
use rocket::response::Redirect;
use rocket::{Route, State};

use crate::config::AppConfig;
use crate::error::{Error, JsonError};
use crate::models::bittaa::{Bittaa, BittaaFields, Material};
use crate::models::record::{clean, PaymentStatus};
use crate::repository::{Identities, Records};
use crate::routes::record_pages::{self, optional, required, GuardedPage, Page};
use crate::services::auth_guard::{AdminUser, SessionUser, StaffUser};

#[derive(FromForm)]
pub struct BittaaForm<'r> {
    name: Option<String>,
    material: form::Result<'r, Material>,
    from_seller: Option<String>,
    phone: Option<String>,
    dallaala: Option<String>,
    kilogram: Option<String>,
    birr: Option<String>,
    body: Option<String>,
    status: form::Result<'r, PaymentStatus>,
    image: form::Result<'r, TempFile<'r>>,
}

impl<'r> BittaaForm<'r> {
    fn into_parts(self) -> Result<(BittaaFields, Option<TempFile<'r>>), Error> {
        let fields = BittaaFields {
            name: required(self.name, "Name")?,
            material: optional(self.material, "Material")?.unwrap_or_default(),
            from_seller: required(self.from_seller, "From seller")?,
            phone: clean(self.phone),
            dallaala: clean(self.dallaala),
            kilogram: clean(self.kilogram),
            birr: required(self.birr, "Birr")?,
            body: clean(self.body),
            status: optional(self.status, "Status")?.unwrap_or_default(),
        };
        Ok((fields, optional(self.image, "Image")?))
    }
}

#[get("/addbittaa")]
fn add(_user: StaffUser) -> Page {
    record_pages::add_page::<Bittaa>()
}

#[post("/", data = "<form>")]
async fn create(
    user: StaffUser,
    form: Form<BittaaForm<'_>>,
    bittaas: &State<Records<Bittaa>>,
    config: &State<AppConfig>,
) -> Result<Redirect, JsonError> {
    let (fields, image) = form.into_inner().into_parts()?;
    record_pages::create(bittaas.inner(), &user.0, fields, image, config).await
}

#[get("/")]
async fn list_all(
    _user: AdminUser,
    bittaas: &State<Records<Bittaa>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::list_all_page(bittaas.inner(), identities.inner()).await
}

#[get("/mine")]
async fn list_own(
    user: SessionUser,
    bittaas: &State<Records<Bittaa>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::list_own_page(bittaas.inner(), identities.inner(), &user).await
}

#[get("/<id>")]
async fn show(
    user: AdminUser,
    id: &str,
    bittaas: &State<Records<Bittaa>>,
    identities: &State<Identities>,
) -> GuardedPage {
    record_pages::show_page(bittaas.inner(), identities.inner(), &user.0, id).await
}

#[get("/edit/<id>")]
async fn edit(user: SessionUser, id: &str, bittaas: &State<Records<Bittaa>>) -> GuardedPage {
    record_pages::edit_page(bittaas.inner(), &user, id).await
}

#[post("/<id>", data = "<form>")]
async fn update(
    user: SessionUser,
    id: &str,
    form: Form<BittaaForm<'_>>,
    bittaas: &State<Records<Bittaa>>,
    config: &State<AppConfig>,
) -> Result<Redirect, Error> {
    let (fields, image) = form.into_inner().into_parts()?;
    record_pages::update(bittaas.inner(), &user, id, fields, image, config).await
}

#[delete("/<id>")]
async fn delete(user: SessionUser, id: &str, bittaas: &State<Records<Bittaa>>) -> Result<Redirect, Error> {
    record_pages::delete(bittaas.inner(), &user, id).await
}

#[get("/user/<user_id>")]
async fn by_owner(
    _user: SessionUser,
    user_id: &str,
    bittaas: &State<Records<Bittaa>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::by_owner_page(bittaas.inner(), identities.inner(), user_id).await
}

#[get("/search/<query>")]
async fn search(
    _user: StaffUser,
    query: &str,
    bittaas: &State<Records<Bittaa>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::search_page(bittaas.inner(), identities.inner(), query).await
}

pub fn routes() -> Vec<Route> {
    routes![add, create, list_all, list_own, show, edit, update, delete, by_owner, search]
}
