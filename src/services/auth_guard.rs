// services/auth_guard.rs
//
// Request guards for the role gates. A missing or invalid session fails with
// 401 (the catcher redirects to /login); a session without the required role
// fails with 403 (the catcher redirects to /home). Role and name come from the
// stored identity, so a removed or re-roled account takes effect at once.

use mongodb::bson::oid::ObjectId;
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{self, FromRequest, Outcome, Request};
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::jwt::jwt_helper::verify_token;
use crate::models::identity::Role;
use crate::repository::Identities;

pub const SESSION_COOKIE: &str = "session";

/// The signed-in identity named by the session cookie, as currently stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: ObjectId,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    NotSignedIn,
    Forbidden,
}

async fn load_session(request: &Request<'_>) -> Option<SessionUser> {
    let config = request.rocket().state::<AppConfig>()?;
    let identities = request.rocket().state::<Identities>()?;
    let cookie = request.cookies().get(SESSION_COOKIE)?;
    let claims = match verify_token(cookie.value(), &config.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "rejected session token");
            return None;
        }
    };
    let id = ObjectId::parse_str(&claims.sub).ok()?;

    match identities.find_by_id(id).await {
        Ok(Some(identity)) => Some(SessionUser {
            id: identity.id,
            role: identity.role,
            name: identity.display_name,
        }),
        Ok(None) => {
            debug!(%id, "session for unknown identity");
            None
        }
        Err(e) => {
            error!(%id, error = %e, "failed to load session identity");
            None
        }
    }
}

async fn session<'r>(request: &'r Request<'_>) -> &'r Option<SessionUser> {
    request.local_cache_async(load_session(request)).await
}

/// Any signed-in identity.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionUser {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match session(request).await {
            Some(user) => Outcome::Success(user.clone()),
            None => Outcome::Error((Status::Unauthorized, AuthError::NotSignedIn)),
        }
    }
}

/// Admin only.
#[derive(Debug)]
pub struct AdminUser(pub SessionUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let user = try_outcome!(request.guard::<SessionUser>().await);
        if user.role == Role::Admin {
            Outcome::Success(AdminUser(user))
        } else {
            Outcome::Error((Status::Forbidden, AuthError::Forbidden))
        }
    }
}

/// Admin or worker.
#[derive(Debug)]
pub struct StaffUser(pub SessionUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for StaffUser {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let user = try_outcome!(request.guard::<SessionUser>().await);
        if user.role.is_staff() {
            Outcome::Success(StaffUser(user))
        } else {
            Outcome::Error((Status::Forbidden, AuthError::Forbidden))
        }
    }
}

/// Nobody signed in. Forwards when a session is present so a lower-ranked route
/// can redirect the signed-in user.
#[derive(Debug)]
pub struct Guest;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Guest {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match session(request).await {
            Some(_) => Outcome::Forward(Status::SeeOther),
            None => Outcome::Success(Guest),
        }
    }
}
