//! The division service exposed over RPC.

use thiserror::Error;

use divrpc_protocol::{DIVISION_METHOD, DivisionArgs};

use crate::registry::{RegistrationError, Registry, RegistryBuilder};

/// Errors returned by [`Service`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The divisor was zero.
    #[error("division by zero")]
    DivisionByZero,
}

/// Stateless arithmetic service.
#[derive(Debug, Default, Clone, Copy)]
pub struct Service;

impl Service {
    /// Divides `A` by `B` in floating point.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::DivisionByZero`] when `B` is zero, whatever `A` is.
    pub fn division(self, args: DivisionArgs) -> Result<f64, ServiceError> {
        if args.b == 0 {
            return Err(ServiceError::DivisionByZero);
        }
        Ok(args.a as f64 / args.b as f64)
    }

    /// Registers every operation of the service under its `Service.*` name.
    ///
    /// # Errors
    ///
    /// Returns an error if an operation of the same name is already registered.
    pub fn register(self, builder: &mut RegistryBuilder) -> Result<(), RegistrationError> {
        builder.register(DIVISION_METHOD, move |args: DivisionArgs| {
            self.division(args)
        })
    }
}

/// Builds the registry served by the binary.
///
/// # Errors
///
/// Returns an error if two operations share a name.
pub fn default_registry() -> Result<Registry, RegistrationError> {
    let mut builder = Registry::builder();
    Service.register(&mut builder)?;
    Ok(builder.build())
}
