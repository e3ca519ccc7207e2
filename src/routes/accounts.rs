// routes/accounts.rs

use rocket::form::{self, Form, FromForm};
use rocket::fs::TempFile;
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::{Either, Route, State};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::{Error, JsonError};
use crate::jwt::jwt_helper::create_token;
use crate::models::identity::Role;
use crate::models::record::clean;
use crate::repository::Identities;
use crate::routes::record_pages::{optional, required, Page};
use crate::services::accounts::{self, NewAccount};
use crate::services::auth_guard::{AdminUser, Guest, SessionUser, SESSION_COOKIE};
use crate::services::upload_reconciler;
use crate::views::{render, LoginPage, RegisterPage};

#[derive(FromForm)]
pub struct LoginForm {
    email: String,
    password: String,
}

#[derive(FromForm)]
pub struct RegisterForm<'r> {
    email: Option<String>,
    display_name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    password: Option<String>,
    role: form::Result<'r, Role>,
    image: form::Result<'r, TempFile<'r>>,
}

#[get("/login", rank = 1)]
fn login_page(_guest: Guest) -> Page {
    render(&LoginPage { error: String::new() })
}

#[get("/login", rank = 2)]
fn login_signed_in(_user: SessionUser) -> Redirect {
    Redirect::to("/home")
}

#[post("/login", data = "<form>")]
async fn login(
    form: Form<LoginForm>,
    jar: &CookieJar<'_>,
    identities: &State<Identities>,
    config: &State<AppConfig>,
) -> Result<Either<Redirect, (Status, RawHtml<String>)>, Error> {
    let Some(identity) = accounts::authenticate(identities.inner().as_ref(), &form.email, &form.password).await? else {
        let page = render(&LoginPage {
            error: "Invalid email or password".to_string(),
        })?;
        return Ok(Either::Right((Status::Unauthorized, page)));
    };

    let token = create_token(&identity, &config.jwt_secret, config.session_hours).map_err(|e| {
        error!(error = %e, "failed to sign session token");
        Error::unexpected("sign in")
    })?;
    jar.add(
        Cookie::build((SESSION_COOKIE, token))
            .http_only(true)
            .same_site(SameSite::Lax),
    );
    info!(id = %identity.id, role = identity.role.as_str(), "signed in");
    Ok(Either::Left(Redirect::to(identity.role.home())))
}

#[get("/logout")]
fn logout(jar: &CookieJar<'_>) -> Redirect {
    jar.remove(SESSION_COOKIE);
    Redirect::to("/login")
}

#[get("/register")]
fn register_page(_admin: AdminUser) -> Page {
    render(&RegisterPage { roles: Role::ALL })
}

#[post("/register", data = "<form>")]
async fn register(
    _admin: AdminUser,
    form: Form<RegisterForm<'_>>,
    identities: &State<Identities>,
    config: &State<AppConfig>,
) -> Result<Redirect, JsonError> {
    let form = form.into_inner();
    let account = NewAccount {
        email: required(form.email, "Email")?,
        display_name: required(form.display_name, "Display name")?,
        first_name: clean(form.first_name),
        last_name: clean(form.last_name),
        password: required(form.password, "Password")?,
        role: optional(form.role, "Role")?.unwrap_or_default(),
    };
    let mut image = optional(form.image, "Image")?;
    let upload = upload_reconciler::stage(image.as_mut(), config).await?;

    accounts::register(identities.inner().as_ref(), account, upload).await?;
    Ok(Redirect::to("/workers"))
}

pub fn routes() -> Vec<Route> {
    routes![login_page, login_signed_in, login, logout, register_page, register]
}
