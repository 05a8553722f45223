//! Operation registry mapping `Service.Method` names to handlers.
//!
//! The registry is assembled once at startup through [`RegistryBuilder`] and
//! is immutable afterwards, so connection threads share it behind an `Arc`
//! without locking. Handlers are registered as typed closures and erased to
//! functions over raw JSON parameters.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

type BoxedHandler = Box<dyn Fn(Option<&Value>) -> Result<Value, CallError> + Send + Sync>;

/// Errors reported to the caller for a single call.
///
/// None of these close the connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The method name lacks a `Service.Method` separator.
    #[error("rpc: service/method request ill-formed: {method}")]
    IllFormedMethod { method: String },

    /// No service is registered under the requested prefix.
    #[error("rpc: can't find service {method}")]
    ServiceNotFound { method: String },

    /// The service exists but has no such method.
    #[error("rpc: can't find method {method}")]
    MethodNotFound { method: String },

    /// The request carried no parameters.
    #[error("jsonrpc: request body missing params")]
    MissingParams,

    /// The parameters were not an array, or the first one did not match the
    /// operation's argument type.
    #[error("invalid params: {message}")]
    InvalidParams { message: String },

    /// The operation ran and failed.
    #[error("{message}")]
    Operation { message: String },

    /// The operation's result could not be encoded.
    #[error("failed to encode result: {message}")]
    EncodeResult { message: String },
}

impl CallError {
    /// Returns true for errors raised because the name did not resolve.
    #[must_use]
    pub fn is_method_not_found(&self) -> bool {
        matches!(
            self,
            Self::IllFormedMethod { .. } | Self::ServiceNotFound { .. } | Self::MethodNotFound { .. }
        )
    }
}

/// Errors raised while assembling the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The name is not of the form `Service.Method`.
    #[error("operation name '{name}' must have the form Service.Method")]
    InvalidName { name: String },

    /// An operation with this name already exists.
    #[error("operation '{name}' is already registered")]
    Duplicate { name: String },
}

/// Collects operations before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    services: HashMap<String, HashMap<String, BoxedHandler>>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a typed operation under `name`.
    ///
    /// The first element of the request's parameter array is decoded into
    /// `A`. An empty array, or a `null` first element, decodes `A` from an
    /// empty object so argument types with defaulted fields see their zero
    /// value. The handler's `Ok` value is encoded as the reply result and its
    /// `Err` value's display text becomes the reply error.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is malformed or already registered.
    pub fn register<F, A, R, E>(&mut self, name: &str, handler: F) -> Result<(), RegistrationError>
    where
        F: Fn(A) -> Result<R, E> + Send + Sync + 'static,
        A: DeserializeOwned,
        R: Serialize,
        E: fmt::Display,
    {
        let (service, method) = split_name(name).ok_or_else(|| RegistrationError::InvalidName {
            name: name.to_owned(),
        })?;
        let methods = self.services.entry(service.to_owned()).or_default();
        if methods.contains_key(method) {
            return Err(RegistrationError::Duplicate {
                name: name.to_owned(),
            });
        }
        methods.insert(method.to_owned(), wrap_handler(handler));
        Ok(())
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            services: self.services,
        }
    }
}

/// Immutable map from operation name to handler.
pub struct Registry {
    services: HashMap<String, HashMap<String, BoxedHandler>>,
}

impl Registry {
    /// Starts a new registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Resolves `method` and invokes it with the raw `params` value.
    ///
    /// # Errors
    ///
    /// Returns a [`CallError`] when the name does not resolve, the parameters
    /// are absent or do not decode, or the operation fails.
    pub fn call(&self, method: &str, params: Option<&Value>) -> Result<Value, CallError> {
        let (service, name) = split_name(method).ok_or_else(|| CallError::IllFormedMethod {
            method: method.to_owned(),
        })?;
        let methods = self
            .services
            .get(service)
            .ok_or_else(|| CallError::ServiceNotFound {
                method: method.to_owned(),
            })?;
        let handler = methods.get(name).ok_or_else(|| CallError::MethodNotFound {
            method: method.to_owned(),
        })?;
        handler(params)
    }

    /// Returns the registered names in sorted order.
    #[must_use]
    pub fn operations(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .services
            .iter()
            .flat_map(|(service, methods)| {
                methods.keys().map(move |method| format!("{service}.{method}"))
            })
            .collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Registry")
            .field("operations", &self.operations())
            .finish()
    }
}

fn split_name(name: &str) -> Option<(&str, &str)> {
    name.rsplit_once('.')
        .filter(|(service, method)| !service.is_empty() && !method.is_empty())
}

fn wrap_handler<F, A, R, E>(handler: F) -> BoxedHandler
where
    F: Fn(A) -> Result<R, E> + Send + Sync + 'static,
    A: DeserializeOwned,
    R: Serialize,
    E: fmt::Display,
{
    Box::new(move |params: Option<&Value>| {
        let items = match params {
            None => return Err(CallError::MissingParams),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(CallError::InvalidParams {
                    message: format!("params must be an array, got {}", json_kind(other)),
                });
            }
        };
        let decoded = match items.first() {
            None | Some(Value::Null) => A::deserialize(Value::Object(Map::new())),
            Some(argument) => A::deserialize(argument),
        };
        let args = decoded.map_err(|error| CallError::InvalidParams {
            message: error.to_string(),
        })?;
        let result = handler(args).map_err(|error| CallError::Operation {
            message: error.to_string(),
        })?;
        serde_json::to_value(result).map_err(|error| CallError::EncodeResult {
            message: error.to_string(),
        })
    })
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
