//! Records returned by the API.
//!
//! # Design
//! Each struct is a read-only view of one JSON object. Field types declare
//! the accessor policy: a plain field is required and decoding fails without
//! it, an `Option` field is optional, and `#[serde(default)]` collections
//! come back empty when absent. Unknown fields are ignored so the API can add
//! fields without breaking decoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type Labels = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protection {
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub rebuild: bool,
}

/// An asynchronous task the API is running on behalf of a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: i64,
    pub command: String,
    pub status: ActionStatus,
    #[serde(default)]
    pub progress: u8,
    pub started: Option<String>,
    pub finished: Option<String>,
    #[serde(default)]
    pub resources: Vec<ResourceRef>,
    pub error: Option<ActionError>,
}

impl Action {
    pub fn is_finished(&self) -> bool {
        self.status != ActionStatus::Running
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Running,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub created: Option<String>,
    pub public_net: Option<PublicNet>,
    #[serde(default)]
    pub private_net: Vec<PrivateNet>,
    pub server_type: Option<ServerType>,
    pub datacenter: Option<Datacenter>,
    pub image: Option<Image>,
    #[serde(default)]
    pub volumes: Vec<i64>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub protection: Protection,
    #[serde(default)]
    pub rescue_enabled: bool,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicNet {
    pub ipv4: Option<IpAddress>,
    pub ipv6: Option<IpAddress>,
    #[serde(default)]
    pub floating_ips: Vec<i64>,
    #[serde(default)]
    pub firewalls: Vec<FirewallRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddress {
    pub id: Option<i64>,
    pub ip: String,
    #[serde(default)]
    pub blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateNet {
    pub network: i64,
    pub ip: String,
    #[serde(default)]
    pub alias_ips: Vec<String>,
    pub mac_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRef {
    pub id: i64,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub cores: Option<u32>,
    pub memory: Option<f64>,
    pub disk: Option<u64>,
    pub cpu_type: Option<String>,
    pub architecture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub os_flavor: Option<String>,
    pub os_version: Option<String>,
    pub architecture: Option<String>,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub network_zone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datacenter {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub id: i64,
    pub name: String,
    pub size: u64,
    pub status: Option<String>,
    pub server: Option<i64>,
    pub location: Option<Location>,
    pub linux_device: Option<String>,
    pub format: Option<String>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub protection: Protection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: i64,
    pub name: String,
    pub ip_range: String,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub servers: Vec<i64>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub protection: Protection,
    #[serde(default)]
    pub expose_routes_to_vswitch: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    #[serde(rename = "type")]
    pub kind: String,
    pub ip_range: Option<String>,
    pub network_zone: String,
    pub gateway: Option<String>,
    pub vswitch_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub destination: String,
    pub gateway: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Firewall {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub rules: Vec<FirewallRule>,
    #[serde(default)]
    pub applied_to: Vec<serde_json::Value>,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub direction: String,
    pub protocol: String,
    pub port: Option<String>,
    #[serde(default)]
    pub source_ips: Vec<String>,
    #[serde(default)]
    pub destination_ips: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingIp {
    pub id: i64,
    pub name: String,
    pub ip: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub server: Option<i64>,
    pub home_location: Option<Location>,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub protection: Protection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryIp {
    pub id: i64,
    pub name: String,
    pub ip: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub assignee_id: Option<i64>,
    pub assignee_type: Option<String>,
    #[serde(default)]
    pub auto_delete: bool,
    pub datacenter: Option<Datacenter>,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKey {
    pub id: i64,
    pub name: String,
    pub fingerprint: String,
    pub public_key: String,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub certificate: Option<String>,
    #[serde(default)]
    pub domain_names: Vec<String>,
    pub not_valid_after: Option<String>,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementGroup {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub servers: Vec<i64>,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: i64,
    pub name: String,
    pub location: Option<Location>,
    pub algorithm: Option<serde_json::Value>,
    #[serde(default)]
    pub services: Vec<serde_json::Value>,
    #[serde(default)]
    pub targets: Vec<serde_json::Value>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub protection: Protection,
}

/// A DNS zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub name: String,
    pub mode: String,
    pub status: Option<String>,
    pub ttl: Option<u32>,
    pub record_count: Option<u32>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub protection: Protection,
}

/// A set of DNS records sharing name and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rrset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub ttl: Option<u32>,
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub value: String,
    pub comment: Option<String>,
}

/// Body of a successful server creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateServerResponse {
    pub server: Server,
    pub action: Action,
    #[serde(default)]
    pub next_actions: Vec<Action>,
    pub root_password: Option<String>,
}

/// Body of a successful volume creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateVolumeResponse {
    pub volume: Volume,
    pub action: Option<Action>,
    #[serde(default)]
    pub next_actions: Vec<Action>,
}
