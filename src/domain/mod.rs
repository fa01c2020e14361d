pub mod inventory;
pub mod order;
pub mod status;
pub mod user;
