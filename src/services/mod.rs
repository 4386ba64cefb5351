pub mod conversion;
pub mod pages;
pub mod upload_store;
pub mod worker;
