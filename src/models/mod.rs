pub mod bittaa;
pub mod buy;
pub mod identity;
pub mod image;
pub mod profile;
pub mod record;
pub mod sell;
