pub mod insight;
pub mod user;
