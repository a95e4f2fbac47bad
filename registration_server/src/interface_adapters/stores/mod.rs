pub mod documents;
pub mod memory;
pub mod postgres;

pub use documents::FilesystemDocumentStore;
pub use memory::InMemoryBookingStore;
pub use postgres::PostgresBookingStore;
