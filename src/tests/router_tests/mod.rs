mod auth_flow_tests;
mod calendar_tests;
mod client_tests;
mod history_tests;
