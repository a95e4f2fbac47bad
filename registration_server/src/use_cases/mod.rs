pub mod create_booking;
pub mod lookup_booking;
pub mod manage_bookings;
pub mod register_guests;
pub mod token_issuer;
pub mod upload_document;

#[cfg(test)]
pub(crate) mod test_support;
