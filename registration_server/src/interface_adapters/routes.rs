use crate::interface_adapters::auth::require_admin;
use crate::interface_adapters::handlers::bookings::{
    create_booking, delete_booking, get_booking, list_booking_guests, list_bookings,
    update_booking_status,
};
use crate::interface_adapters::handlers::health;
use crate::interface_adapters::handlers::registration::{
    lookup_booking, register_guests, upload_document,
};
use crate::interface_adapters::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};

// Room for multipart boundaries and part headers on top of the document itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn app(state: AppState) -> Router {
    let admin = Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/{id}", get(get_booking).delete(delete_booking))
        .route("/bookings/{id}/status", patch(update_booking_status))
        .route("/bookings/{id}/guests", get(list_booking_guests))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let upload_limit = state.policy.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    let registration = Router::new()
        .route("/{token}", get(lookup_booking))
        .route("/{token}/guests", post(register_guests))
        .route(
            "/{token}/documents",
            post(upload_document).layer(DefaultBodyLimit::max(upload_limit)),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/admin", admin)
        .nest("/registration", registration)
        .with_state(state)
}
