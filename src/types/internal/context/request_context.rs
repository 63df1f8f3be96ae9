use std::net::IpAddr;

use poem::Request;
use poem_openapi::auth::{Bearer, BearerAuthorization};

use crate::types::internal::auth::Identity;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries the caller identity (if any) plus the metadata needed to correlate
/// log lines for a single request across API, coordinator and store layers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Authenticated caller, None for anonymous requests
    pub identity: Option<Identity>,

    /// Source of the request (API or CLI)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Create an anonymous context for an API request
    pub fn for_api(ip_address: Option<IpAddr>) -> Self {
        Self {
            ip_address,
            request_id: RequestId::new(),
            identity: None,
            source: RequestSource::API,
            actor_id: "anonymous".to_owned(),
        }
    }

    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            identity: None,
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
        }
    }

    /// Attach an authenticated identity; the actor becomes the user id
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.actor_id = format!("user:{}", identity.user_id);
        self.identity = Some(identity);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Bearer token from the Authorization header, if any
    pub fn extract_bearer(req: &Request) -> Option<Bearer> {
        Bearer::from_request(req).ok()
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }
}
