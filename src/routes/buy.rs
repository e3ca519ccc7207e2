// routes/buy.rs

use rocket::form::{self, Form, FromForm};
use rocket::fs::TempFile;
use rocket::response::Redirect;
use rocket::{Route, State};

use crate::config::AppConfig;
use crate::error::{Error, JsonError};
use crate::models::buy::{Buy, BuyFields};
use crate::models::record::{clean, PaymentStatus};
use crate::repository::{Identities, Records};
use crate::routes::record_pages::{self, optional, required, GuardedPage, Page};
use crate::services::auth_guard::StaffUser;

#[derive(FromForm)]
pub struct BuyForm<'r> {
    name: Option<String>,
    seller: Option<String>,
    phone: Option<String>,
    kilogram: Option<String>,
    amount: Option<String>,
    note: Option<String>,
    status: form::Result<'r, PaymentStatus>,
    image: form::Result<'r, TempFile<'r>>,
}

impl<'r> BuyForm<'r> {
    fn into_parts(self) -> Result<(BuyFields, Option<TempFile<'r>>), Error> {
        let fields = BuyFields {
            name: required(self.name, "Name")?,
            seller: clean(self.seller),
            phone: clean(self.phone),
            kilogram: clean(self.kilogram),
            amount: required(self.amount, "Amount")?,
            note: clean(self.note),
            status: optional(self.status, "Status")?.unwrap_or_default(),
        };
        Ok((fields, optional(self.image, "Image")?))
    }
}

#[get("/addbuy")]
fn add(_user: StaffUser) -> Page {
    record_pages::add_page::<Buy>()
}

#[post("/", data = "<form>")]
async fn create(
    user: StaffUser,
    form: Form<BuyForm<'_>>,
    buys: &State<Records<Buy>>,
    config: &State<AppConfig>,
) -> Result<Redirect, JsonError> {
    let (fields, image) = form.into_inner().into_parts()?;
    record_pages::create(buys.inner(), &user.0, fields, image, config).await
}

#[get("/")]
async fn list_all(
    _user: StaffUser,
    buys: &State<Records<Buy>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::list_all_page(buys.inner(), identities.inner()).await
}

#[get("/mine")]
async fn list_own(
    user: StaffUser,
    buys: &State<Records<Buy>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::list_own_page(buys.inner(), identities.inner(), &user.0).await
}

#[get("/<id>")]
async fn show(
    user: StaffUser,
    id: &str,
    buys: &State<Records<Buy>>,
    identities: &State<Identities>,
) -> GuardedPage {
    record_pages::show_page(buys.inner(), identities.inner(), &user.0, id).await
}

#[get("/edit/<id>")]
async fn edit(user: StaffUser, id: &str, buys: &State<Records<Buy>>) -> GuardedPage {
    record_pages::edit_page(buys.inner(), &user.0, id).await
}

#[post("/<id>", data = "<form>")]
async fn update(
    user: StaffUser,
    id: &str,
    form: Form<BuyForm<'_>>,
    buys: &State<Records<Buy>>,
    config: &State<AppConfig>,
) -> Result<Redirect, Error> {
    let (fields, image) = form.into_inner().into_parts()?;
    record_pages::update(buys.inner(), &user.0, id, fields, image, config).await
}

#[delete("/<id>")]
async fn delete(user: StaffUser, id: &str, buys: &State<Records<Buy>>) -> Result<Redirect, Error> {
    record_pages::delete(buys.inner(), &user.0, id).await
}

#[get("/user/<user_id>")]
async fn by_owner(
    _user: StaffUser,
    user_id: &str,
    buys: &State<Records<Buy>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::by_owner_page(buys.inner(), identities.inner(), user_id).await
}

#[get("/search/<query>")]
async fn search(
    _user: StaffUser,
    query: &str,
    buys: &State<Records<Buy>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::search_page(buys.inner(), identities.inner(), query).await
}

pub fn routes() -> Vec<Route> {
    routes![add, create, list_all, list_own, show, edit, update, delete, by_owner, search]
}
