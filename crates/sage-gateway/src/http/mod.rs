pub mod chat;
pub mod exam;
pub mod health;
