//! Domain entities

mod analytics;
mod notification;
mod tenant;
mod user;

pub use analytics::*;
pub use notification::*;
pub use tenant::*;
pub use user::*;
