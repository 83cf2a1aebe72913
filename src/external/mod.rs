pub mod google_oauth;
pub mod mailer;
pub mod prayer_times;
pub mod quran;

pub use google_oauth::*;
pub use mailer::*;
pub use prayer_times::*;
pub use quran::*;
