pub mod errors;
pub mod html;
pub mod redirect;
pub mod xlsx;

pub use errors::{error_to_response, ResultResp};
pub use html::html_response;
pub use redirect::{redirect, redirect_with_cookie};
pub use xlsx::xlsx_response;
