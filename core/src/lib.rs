//! Typed client for the Hetzner Cloud API.
//!
//! # Overview
//! A call goes through three stages, each a plain value:
//! 1. a resource family ([`Client::servers`], [`Client::volumes`], ...) picks an
//!    [`Operation`] and builds an immutable [`Request`];
//! 2. [`Client::execute`] renders it into an [`HttpRequest`] and hands it to a
//!    [`Transport`] (blocking `ureq` by default) exactly once;
//! 3. the raw [`HttpResponse`] is decoded into a [`Response`] exposing typed
//!    accessors, header metadata and a [`PaginationView`].
//!
//! ```no_run
//! use hcloud_core::{Client, Config, Params, Server};
//!
//! # fn main() -> hcloud_core::Result<()> {
//! let client = Client::new(Config::new("my-token"))?;
//! let servers = client.servers();
//! let response = servers.send(&servers.list(Params::new())?)?;
//! let list: Vec<Server> = response.items("servers")?;
//! let page = response.pagination();
//! println!("{} of {} servers, more: {}", list.len(), page.total, page.has_more_pages);
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - Endpoints are rows in [`operations`]; one builder serves all of them.
//! - Requests, responses and records hold no shared mutable state, so they
//!   can be built and used from any thread.
//! - Nothing retries. Every failure is an [`Error`] returned to the caller.
//! - Logging goes through `tracing`; installing a subscriber is up to the
//!   application.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod meta;
pub mod operations;
pub mod pagination;
pub mod request;
pub mod resources;
pub mod response;
pub mod transport;
pub mod types;

pub use client::Client;
pub use config::Config;
pub use error::{ApiError, Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use meta::MetaInformation;
pub use operations::Operation;
pub use pagination::{PageLinks, PaginationView};
pub use request::{Params, Payload, PayloadPolicy, Request};
pub use response::Response;
pub use transport::{Transport, UreqTransport};
pub use types::{
    Action, ActionStatus, Certificate, CreateServerResponse, CreateVolumeResponse, Firewall,
    FirewallRule, FloatingIp, Image, Location, Network, PrimaryIp, Rrset, Server, SshKey, Volume,
    Zone,
};
