//! The action model: discriminated units of work flowing through the host
//! dispatch pipeline.
//!
//! An [`Action`] either carries a [`RequestDescriptor`] (and is consumed by
//! the middleware) or it does not (and is forwarded untouched). The
//! [`WireAction`] veneer matches the JSON shape accepted from application
//! code and converts into the internal model via `TryFrom`.

use crate::error::GateError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied handler invoked with the outcome of a request issued in
/// [`ResponseMode::Callback`].
pub type ResponseHandler = Arc<dyn Fn(Result<Value, GateError>) + Send + Sync>;

/// How the result of an authorized request is delivered back to the caller.
///
/// Selected at descriptor construction time; the two modes are mutually
/// exclusive and exactly one terminal delivery happens per request.
#[derive(Clone)]
pub enum ResponseMode {
    /// Invoke a caller-supplied handler with the response or error.
    Callback(ResponseHandler),
    /// Dispatch a follow-up action carrying the response body or error.
    Routed {
        /// Action type dispatched with the response body on success.
        success_type: String,
        /// Action type dispatched with the error on failure.
        failed_type: String,
    },
}

impl fmt::Debug for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Routed {
                success_type,
                failed_type,
            } => f
                .debug_struct("Routed")
                .field("success_type", success_type)
                .field("failed_type", failed_type)
                .finish(),
        }
    }
}

impl PartialEq for ResponseMode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Handlers are opaque; two callback modes are equal only when
            // they share the same handler allocation.
            (Self::Callback(a), Self::Callback(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (
                Self::Routed {
                    success_type: s1,
                    failed_type: f1,
                },
                Self::Routed {
                    success_type: s2,
                    failed_type: f2,
                },
            ) => s1 == s2 && f1 == f2,
            _ => false,
        }
    }
}

/// Metadata describing one authorized API call. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP method name, e.g. `"GET"`.
    pub method: String,
    /// Target URL.
    pub url: String,
    /// Optional JSON request body.
    pub body: Option<Value>,
    /// Header overrides, applied before the `Authorization` header so they
    /// can never clobber it.
    pub headers: Vec<(String, String)>,
    /// Action type dispatched immediately before the call is issued.
    pub loading_type: Option<String>,
    /// Response delivery mode.
    pub mode: ResponseMode,
}

impl RequestDescriptor {
    /// Create a descriptor whose response is routed to follow-up actions.
    pub fn routed(
        method: impl Into<String>,
        url: impl Into<String>,
        success_type: impl Into<String>,
        failed_type: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body: None,
            headers: Vec::new(),
            loading_type: None,
            mode: ResponseMode::Routed {
                success_type: success_type.into(),
                failed_type: failed_type.into(),
            },
        }
    }

    /// Create a descriptor whose response is delivered to a handler.
    pub fn with_handler(
        method: impl Into<String>,
        url: impl Into<String>,
        handler: ResponseHandler,
    ) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body: None,
            headers: Vec::new(),
            loading_type: None,
            mode: ResponseMode::Callback(handler),
        }
    }

    /// Attach a JSON request body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a header override.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the loading signal type dispatched before the call is issued.
    #[must_use]
    pub fn with_loading(mut self, loading_type: impl Into<String>) -> Self {
        self.loading_type = Some(loading_type.into());
        self
    }
}

/// A discriminated unit of work. Created by application code, consumed
/// exactly once by the middleware; replay after a token refresh re-submits
/// an identical value.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Discriminating type tag (`type` on the wire).
    pub kind: String,
    /// Optional payload.
    pub payload: Option<Value>,
    /// Optional API request descriptor; its presence is what makes the
    /// middleware handle the action instead of passing it through.
    pub request: Option<RequestDescriptor>,
}

impl Action {
    /// Create a bare signal action with no payload or request.
    pub fn signal(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
            request: None,
        }
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Attach a request descriptor.
    #[must_use]
    pub fn with_request(mut self, request: RequestDescriptor) -> Self {
        self.request = Some(request);
        self
    }
}

/// Wire shape of an action as accepted from application code.
///
/// Matches the JSON contract
/// `{ type, payload?, request?, successType?, failedType?, loadingType? }`.
/// Callback handlers cannot arrive over the wire, so a converted request is
/// always in [`ResponseMode::Routed`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAction {
    /// Discriminating type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Optional payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Optional API request descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<WireRequest>,
    /// Action type dispatched with the response body on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_type: Option<String>,
    /// Action type dispatched with the error on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_type: Option<String>,
    /// Action type dispatched before the call is issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading_type: Option<String>,
}

/// Wire shape of a request descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRequest {
    /// HTTP method name.
    pub method: String,
    /// Target URL.
    pub url: String,
    /// Optional JSON request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Header overrides.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl TryFrom<WireAction> for Action {
    type Error = GateError;

    fn try_from(wire: WireAction) -> Result<Self, Self::Error> {
        let request = match wire.request {
            None => None,
            Some(req) => {
                let success_type = wire.success_type.ok_or_else(|| {
                    GateError::Action("request action missing successType".into())
                })?;
                let failed_type = wire
                    .failed_type
                    .ok_or_else(|| GateError::Action("request action missing failedType".into()))?;

                let mut descriptor =
                    RequestDescriptor::routed(req.method, req.url, success_type, failed_type);
                if let Some(data) = req.data {
                    descriptor = descriptor.with_body(data);
                }
                for (name, value) in req.headers {
                    descriptor = descriptor.with_header(name, value);
                }
                if let Some(loading) = wire.loading_type {
                    descriptor = descriptor.with_loading(loading);
                }
                Some(descriptor)
            }
        };

        Ok(Self {
            kind: wire.kind,
            payload: wire.payload,
            request,
        })
    }
}
