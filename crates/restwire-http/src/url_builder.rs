//! Request target construction
//!
//! Base address, endpoint and query string are concatenated first and the
//! result is percent-encoded as a whole by `url::Url::parse`. Characters that
//! already carry meaning in a URL (`?`, `&`, `=`, `/`) are left untouched, so
//! nothing is encoded twice.

use url::Url;

use crate::error::{RestApiError, Result};

/// Build `?k1=v1&k2=v2` from ordered parameters, or `""` when there are none.
///
/// Keys and values are not encoded here; [`build_url`] encodes the complete
/// target in one pass.
pub fn build_query_parameters(parameters: Option<&[(String, String)]>) -> String {
    let Some(parameters) = parameters else {
        return String::new();
    };

    let mut query = String::new();
    for (index, (key, value)) in parameters.iter().enumerate() {
        query.push(if index == 0 { '?' } else { '&' });
        query.push_str(key);
        query.push('=');
        query.push_str(value);
    }
    query
}

/// Concatenate base address, endpoint and query string, then encode the result
pub fn build_url(
    base_url: &str,
    endpoint: &str,
    parameters: Option<&[(String, String)]>,
) -> Result<Url> {
    let target = format!(
        "{base_url}{endpoint}{}",
        build_query_parameters(parameters)
    );
    Url::parse(&target).map_err(|e| RestApiError::InvalidUrl(format!("{target}: {e}")))
}
