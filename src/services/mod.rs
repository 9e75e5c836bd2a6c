pub mod media_store;
pub mod media_type;
pub mod range;
