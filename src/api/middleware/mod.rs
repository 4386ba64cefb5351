pub mod metrics;
pub mod payload_limit;
pub mod request_id;
