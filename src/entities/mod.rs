pub mod campaigns;
pub mod categories;
pub mod events;
pub mod menu_items;
pub mod news;
pub mod settings;
pub mod transactions;
pub mod users;

pub use campaigns as campaign_entity;
pub use categories as category_entity;
pub use events as event_entity;
pub use menu_items as menu_item_entity;
pub use news as news_entity;
pub use settings as setting_entity;
pub use transactions as transaction_entity;
pub use users as user_entity;

pub use menu_items::MenuType;
pub use transactions::{PaymentMethod, TransactionStatus};
pub use users::UserRole;
