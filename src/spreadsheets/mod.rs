pub mod history_xlsx;

pub use history_xlsx::export_history_xlsx;
