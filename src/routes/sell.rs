// routes/sell.rs

use rocket::form::{self, Form, FromForm};
use rocket::fs::TempFile;
use rocket::response::Redirect;
use rocket::{Route, State};

use crate::config::AppConfig;
use crate::error::{Error, JsonError};
use crate::models::sell::{Sell, SellFields};
use crate::models::record::{clean, PaymentStatus};
use crate::repository::{Identities, Records};
use crate::routes::record_pages::{self, optional, required, GuardedPage, Page};
use crate::services::auth_guard::StaffUser;

#[derive(FromForm)]
pub struct SellForm<'r> {
    seller: Option<String>,
    buyer_name: Option<String>,
    phone: Option<String>,
    kilogram: Option<String>,
    amount: Option<String>,
    note: Option<String>,
    car_id: Option<String>,
    status: form::Result<'r, PaymentStatus>,
    image: form::Result<'r, TempFile<'r>>,
}

impl<'r> SellForm<'r> {
    fn into_parts(self) -> Result<(SellFields, Option<TempFile<'r>>), Error> {
        let fields = SellFields {
            seller: required(self.seller, "Seller")?,
            buyer_name: clean(self.buyer_name),
            phone: clean(self.phone),
            kilogram: clean(self.kilogram),
            amount: required(self.amount, "Amount")?,
            note: clean(self.note),
            car_id: clean(self.car_id),
            status: optional(self.status, "Status")?.unwrap_or_default(),
        };
        Ok((fields, optional(self.image, "Image")?))
    }
}

#[get("/addsell")]
fn add(_user: StaffUser) -> Page {
    record_pages::add_page::<Sell>()
}

#[post("/", data = "<form>")]
async fn create(
    user: StaffUser,
    form: Form<SellForm<'_>>,
    sells: &State<Records<Sell>>,
    config: &State<AppConfig>,
) -> Result<Redirect, JsonError> {
    let (fields, image) = form.into_inner().into_parts()?;
    record_pages::create(sells.inner(), &user.0, fields, image, config).await
}

#[get("/")]
async fn list_all(
    _user: StaffUser,
    sells: &State<Records<Sell>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::list_all_page(sells.inner(), identities.inner()).await
}

#[get("/mine")]
async fn list_own(
    user: StaffUser,
    sells: &State<Records<Sell>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::list_own_page(sells.inner(), identities.inner(), &user.0).await
}

#[get("/<id>")]
async fn show(
    user: StaffUser,
    id: &str,
    sells: &State<Records<Sell>>,
    identities: &State<Identities>,
) -> GuardedPage {
    record_pages::show_page(sells.inner(), identities.inner(), &user.0, id).await
}

#[get("/edit/<id>")]
async fn edit(user: StaffUser, id: &str, sells: &State<Records<Sell>>) -> GuardedPage {
    record_pages::edit_page(sells.inner(), &user.0, id).await
}

#[post("/<id>", data = "<form>")]
async fn update(
    user: StaffUser,
    id: &str,
    form: Form<SellForm<'_>>,
    sells: &State<Records<Sell>>,
    config: &State<AppConfig>,
) -> Result<Redirect, Error> {
    let (fields, image) = form.into_inner().into_parts()?;
    record_pages::update(sells.inner(), &user.0, id, fields, image, config).await
}

#[delete("/<id>")]
async fn delete(user: StaffUser, id: &str, sells: &State<Records<Sell>>) -> Result<Redirect, Error> {
    record_pages::delete(sells.inner(), &user.0, id).await
}

#[get("/user/<user_id>")]
async fn by_owner(
    _user: StaffUser,
    user_id: &str,
    sells: &State<Records<Sell>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::by_owner_page(sells.inner(), identities.inner(), user_id).await
}

#[get("/search/<query>")]
async fn search(
    _user: StaffUser,
    query: &str,
    sells: &State<Records<Sell>>,
    identities: &State<Identities>,
) -> Page {
    record_pages::search_page(sells.inner(), identities.inner(), query).await
}

pub fn routes() -> Vec<Route> {
    routes![add, create, list_all, list_own, show, edit, update, delete, by_owner, search]
}
