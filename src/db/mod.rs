pub mod auth;
pub mod clients;
pub mod connection;
pub mod history;
