// hubstat: Prometheus exporter for GitHub repository statistics.
//
// The engine lives in hubstat-core; this crate owns the scrape
// boundary: the /metrics HTTP endpoint and the text exposition format.

pub mod render;
pub mod server;
