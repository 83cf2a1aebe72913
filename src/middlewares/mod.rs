pub mod cors;
pub mod session;

pub use cors::create_cors;
pub use session::*;
