#[macro_use]
extern crate rocket;

mod config;
mod error;
mod jwt;
mod models;
mod repository;
mod routes;
mod services;
mod views;

#[cfg(test)]
mod test;

use anyhow::Context;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_db_pools::{mongodb::Client, Database};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppConfig;
use crate::repository::{Identities, IdentityRepository, Stores};
use crate::services::accounts;

/// The MongoDB pool, configured under `databases.market`.
#[derive(Database)]
#[database("market")]
pub struct Market(Client);

async fn connect_stores(rocket: &Rocket<Build>) -> anyhow::Result<Stores> {
    let config = rocket.state::<AppConfig>().context("application config is not loaded")?;
    let market = Market::fetch(rocket).context("market database is not initialised")?;

    IdentityRepository::new(&market.0, &config.database_name)
        .ensure_indexes()
        .await
        .context("failed to create identity indexes")?;
    info!(database = %config.database_name, "connected to MongoDB");
    Ok(Stores::mongo(&market.0, &config.database_name))
}

async fn bootstrap_admin(rocket: &Rocket<Build>) -> anyhow::Result<()> {
    let config = rocket.state::<AppConfig>().context("application config is not loaded")?;
    let identities = rocket.state::<Identities>().context("identity store is not managed")?;

    if let Some(admin) = accounts::ensure_admin(identities.as_ref(), config).await? {
        info!(email = %admin.email, "created initial admin account");
    }
    Ok(())
}

#[launch]
fn rocket() -> _ {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    routes::mount(rocket::build())
        .attach(Market::init())
        .attach(AdHoc::try_on_ignite("Stores", |rocket| async move {
            match connect_stores(&rocket).await {
                Ok(stores) => Ok(stores.manage(rocket)),
                Err(e) => {
                    error!("failed to set up stores: {e:#}");
                    Err(rocket)
                }
            }
        }))
        .attach(AdHoc::try_on_ignite("Admin bootstrap", |rocket| async move {
            match bootstrap_admin(&rocket).await {
                Ok(()) => Ok(rocket),
                Err(e) => {
                    error!("failed to bootstrap admin: {e:#}");
                    Err(rocket)
                }
            }
        }))
}
