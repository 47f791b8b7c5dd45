//! Call descriptors: what one downstream call targets.

/// HTTP verb of a downstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMethod {
    Get,
    Post,
}

impl std::fmt::Display for CallMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallMethod::Get => f.write_str("GET"),
            CallMethod::Post => f.write_str("POST"),
        }
    }
}

/// One downstream call of a fan-out.
///
/// Immutable once built. The resource is relative to the downstream base
/// address (e.g. `api/2`).
#[derive(Debug, Clone, PartialEq)]
pub struct CallDescriptor {
    resource: String,
    method: CallMethod,
    payload: Option<serde_json::Value>,
}

impl CallDescriptor {
    /// A GET call without a body.
    pub fn get(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            method: CallMethod::Get,
            payload: None,
        }
    }

    /// A POST call carrying `body` as JSON.
    pub fn post(resource: impl Into<String>, body: impl Into<serde_json::Value>) -> Self {
        Self {
            resource: resource.into(),
            method: CallMethod::Post,
            payload: Some(body.into()),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn method(&self) -> CallMethod {
        self.method
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }
}
