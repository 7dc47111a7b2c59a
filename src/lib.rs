//! travel-gateway - A REST façade over an asynchronous document store
//!
//! Every store call goes through an [`bridge::OperationBridge`] that turns
//! callback-style completions into awaitable results. Multi-step flows
//! (search then fetch details, write then link) are built from that bridge
//! in [`orchestrator`], and [`flows`] maps each HTTP route onto them.

pub mod auth;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod flows;
pub mod http_server;
pub mod observability;
pub mod orchestrator;
pub mod query;
pub mod response;
pub mod store;
