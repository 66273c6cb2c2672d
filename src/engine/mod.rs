pub mod persistence;
pub mod store;

pub use persistence::Persistence;
pub use store::RecordStore;
