pub mod accounts;
pub mod inventory;
pub mod orders;
