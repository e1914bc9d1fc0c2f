//! Service discovery against a Consul agent.
//!
//! Only the agent's local catalog is consulted (`/v1/agent/services`).
//! Services are keyed by service name; if several instances share a name,
//! one of them is returned.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::call::Call;
use crate::error::CallError;
use crate::transport::Transport;

/// Where a registered service can be reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceAddress {
    pub name: String,
    pub ip: String,
    pub port: u16,
    /// `ip:port`.
    pub location: String,
}

/// One entry of the agent's service map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentService {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Port")]
    pub port: u16,
}

#[derive(Debug, Error)]
pub enum ConsulError {
    #[error(transparent)]
    Call(#[from] CallError),

    #[error("service not in consul; service={service}; consul={consul}")]
    NotInConsul { service: String, consul: String },
}

/// List the services registered with the agent at `consul_address`.
pub fn list_services<T: Transport + ?Sized>(
    transport: &T,
    consul_address: &str,
) -> Result<HashMap<String, ServiceAddress>, CallError> {
    let url = format!(
        "{}/v1/agent/services",
        consul_address.trim_end_matches('/')
    );
    let agent_services: HashMap<String, AgentService> = Call::get(url).json().fetch(transport)?;

    Ok(agent_services
        .into_values()
        .map(|svc| {
            let address = ServiceAddress {
                location: format!("{}:{}", svc.address, svc.port),
                name: svc.service.clone(),
                ip: svc.address,
                port: svc.port,
            };
            (svc.service, address)
        })
        .collect())
}

/// Look up a single service by name.
pub fn find_service<T: Transport + ?Sized>(
    transport: &T,
    consul_address: &str,
    service: &str,
) -> Result<ServiceAddress, ConsulError> {
    let mut services = list_services(transport, consul_address)?;
    services
        .remove(service)
        .ok_or_else(|| ConsulError::NotInConsul {
            service: service.to_string(),
            consul: consul_address.to_string(),
        })
}
