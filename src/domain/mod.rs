pub mod client;
pub mod gallery;
pub mod history;
pub mod meeting_time;
pub mod meetings;
pub mod ports;
pub mod records;
pub mod voice;
