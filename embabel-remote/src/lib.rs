//! Remote action REST protocol: a client shim for calling a remote action
//! server, and the axum server/router a platform exposes to serve its own
//! actions to other Embabel processes.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod client;
pub mod dto;
pub mod server;

pub use client::{RemoteActionClient, RemoteClientError};
pub use dto::{ActionDto, BindingDto, ExecuteActionRequest, PropertyDto, RegisterRemoteRequest, TypeDescriptorDto};
pub use server::{router, RemoteActionProvider, RemoteRegistry};
