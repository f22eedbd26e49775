//! Wire-shape DTOs for the remote action REST protocol. These are the
//! server's JSON contract, not `embabel_core::Action`/`Goal` themselves --
//! a remote action descriptor has no cost/value closures or action bodies,
//! only the static shape a caller needs to build a local shim action from.

use serde::{Deserialize, Serialize};

/// One named, typed binding on a remote action's input or output list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingDto {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// `GET /api/v1/actions` element: everything needed to build a local
/// `embabel_core::Action` whose body POSTs to `/api/v1/actions/execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDto {
    pub name: String,
    pub description: String,
    pub inputs: Vec<BindingDto>,
    pub outputs: Vec<BindingDto>,
    /// Precondition expressions, in the grammar `embabel_core::expr` parses.
    pub pre: Vec<String>,
    /// Effect expressions, same grammar.
    pub post: Vec<String>,
    /// Normalized to `[0, 1]` per the protocol; the local shim can rescale.
    pub cost: f64,
    pub value: f64,
    pub can_rerun: bool,
}

/// One declared field of a domain type, for the type descriptor abstraction
/// the design notes call for (name, declared fields, assignability,
/// creation-permitted) without requiring runtime reflection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDto {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: Option<String>,
}

/// `GET /api/v1/types` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptorDto {
    pub name: String,
    pub description: String,
    #[serde(rename = "ownProperties")]
    pub own_properties: Vec<PropertyDto>,
    pub parents: Vec<String>,
    #[serde(rename = "creationPermitted")]
    pub creation_permitted: bool,
}

/// `POST /api/v1/actions/execute` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteActionRequest {
    pub action_name: String,
    pub parameters: std::collections::BTreeMap<String, serde_json::Value>,
}

/// `POST /api/v1/remote/register` request body: a remote server announcing
/// itself to a local registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRemoteRequest {
    pub base_url: String,
    pub name: String,
    pub description: String,
}
