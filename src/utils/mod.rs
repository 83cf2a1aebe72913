pub mod code_generator;
pub mod jwt;
pub mod money;
pub mod password;
pub mod uploads;
pub mod validation;

pub use code_generator::{generate_nonce, generate_six_digit_code};
pub use jwt::*;
pub use password::*;
pub use validation::*;
