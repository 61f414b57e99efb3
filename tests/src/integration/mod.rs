//! Cross-subsystem choreography tests.

pub mod confirmation_flows;
pub mod http_flows;
pub mod publish_flows;
