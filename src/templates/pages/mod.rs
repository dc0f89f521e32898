pub mod calendar;
pub mod check_email;
pub mod client_form;
pub mod clients;
pub mod gallery;
pub mod history;
pub mod login;
pub mod profile;
pub mod reminders;

pub use calendar::calendar_page;
pub use check_email::check_email_content;
pub use client_form::edit_client_page;
pub use clients::{clients_page, ClientsVm};
pub use gallery::gallery_page;
pub use history::history_page;
pub use login::login_page;
pub use profile::profile_page;
pub use reminders::reminders_partial;
