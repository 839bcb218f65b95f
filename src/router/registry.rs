//! Explicit controller registry: class name → factory, populated at startup.

use crate::controller::Controller;
use crate::error::{AppError, DispatchError};
use std::collections::HashMap;

pub type ControllerFactory =
    Box<dyn Fn() -> Result<Box<dyn Controller>, AppError> + Send + Sync>;

#[derive(Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        ControllerRegistry::default()
    }

    /// Register a controller under its class name, e.g. "UsersController".
    pub fn register<C, F>(self, name: &str, factory: F) -> Self
    where
        C: Controller + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.register_fallible(name, move || Ok(Box::new(factory()) as Box<dyn Controller>))
    }

    /// Register a factory that may fail to build its controller (e.g. missing settings).
    pub fn register_fallible<F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Controller>, AppError> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
        self
    }

    /// Unknown names are not found; a factory that fails is a server configuration error.
    pub fn resolve(&self, name: &str) -> Result<Box<dyn Controller>, DispatchError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| DispatchError::RouteNotFound(format!("Missing controller: {}", name)))?;
        factory().map_err(|e| {
            DispatchError::ServerConfiguration(format!("Missing controller class: {} ({})", name, e))
        })
    }
}
