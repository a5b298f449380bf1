pub mod category;
pub mod listing;
pub mod user;
