pub mod http;
pub mod wifi;
