pub mod admin;
pub mod auth;
pub mod donation;
pub mod pages;
pub mod prayer;
pub mod public;
pub mod quran;
pub mod sitemap;
pub mod uploads;
pub mod zakat;

pub use admin::admin_config;
pub use auth::auth_config;
pub use donation::donation_config;
pub use pages::{not_found, pages_config};
pub use prayer::prayer_config;
pub use public::public_config;
pub use quran::quran_config;
pub use sitemap::sitemap_config;
pub use uploads::uploads_config;
pub use zakat::zakat_config;
