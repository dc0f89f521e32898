use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

/// 302 to `location`. Plain form posts follow it; htmx requests get `HX-Redirect`
/// as well so the whole page navigates instead of swapping a fragment.
pub fn redirect(location: &str) -> ResultResp {
    redirect_with_cookie(location, None)
}

pub fn redirect_with_cookie(location: &str, set_cookie: Option<&str>) -> ResultResp {
    let mut builder = ResponseBuilder::new()
        .status(302)
        .header("Location", location)
        .header("HX-Redirect", location);
    if let Some(cookie) = set_cookie {
        builder = builder.header("Set-Cookie", cookie);
    }
    builder
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}
