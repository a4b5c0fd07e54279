use autokong_sdk::ApiRegistration;
use axum::extract::Extension;
use bytes::Bytes;
use http::StatusCode;
use tracing::warn;

use crate::api::rest::dto::decode_registration;
use crate::module::AppState;

/// Written before the registration message when the body does not decode.
pub const DECODE_FAILURE_MESSAGE: &str = "Could not decode request";

/// `POST /add`
///
/// A body that fails to decode is reported, then registration still runs
/// with an empty request, so the relay touches `autokong-`. Always `200`.
pub async fn add_api(Extension(state): Extension<AppState>, body: Bytes) -> String {
    let mut response = String::new();

    let registration = match decode_registration(&body) {
        Ok(registration) => registration,
        Err(e) => {
            warn!(error = %e, "Could not decode registration request");
            response.push_str(DECODE_FAILURE_MESSAGE);
            ApiRegistration::default()
        }
    };

    let outcome = state.registrar.register(registration).await;
    response.push_str(&outcome.message());
    response
}

/// `* /remove`
pub async fn remove_apis(Extension(state): Extension<AppState>) -> StatusCode {
    state.registrar.decommission().await;
    StatusCode::OK
}
