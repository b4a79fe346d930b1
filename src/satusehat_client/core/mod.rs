pub mod aggregator;
pub mod http;
