use crate::errors::ServerError;
use crate::templates::html_error_response;
use astra::Response;

pub type ResultResp = Result<Response, ServerError>;

/// Convert a handler error into an HTML status page, logging server-side failures.
pub fn error_to_response(err: ServerError) -> Response {
    match &err {
        ServerError::DbError(_) | ServerError::XlsxError(_) | ServerError::InternalError => {
            tracing::error!(error = %err, "request failed")
        }
        _ => tracing::debug!(error = %err, "request rejected"),
    }
    html_error_response(err)
}
