pub mod campaign;
pub mod content;
pub mod menu_item;
pub mod pagination;
pub mod prayer;
pub mod quran;
pub mod setting;
pub mod sitemap;
pub mod transaction;
pub mod user;
pub mod zakat;

pub use campaign::*;
pub use content::*;
pub use menu_item::*;
pub use pagination::*;
pub use prayer::*;
pub use quran::*;
pub use setting::*;
pub use sitemap::*;
pub use transaction::*;
pub use user::*;
pub use zakat::*;
