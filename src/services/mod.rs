pub mod auth_service;
pub mod campaign_service;
pub mod content_service;
pub mod donation_service;
pub mod menu_service;
pub mod settings_service;
pub mod sitemap_service;
pub mod user_service;
pub mod zakat_service;

pub use auth_service::*;
pub use campaign_service::*;
pub use content_service::*;
pub use donation_service::*;
pub use menu_service::*;
pub use settings_service::*;
pub use sitemap_service::*;
pub use user_service::*;
pub use zakat_service::*;
