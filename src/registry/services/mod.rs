//! Application services for registry operations.

mod endpoint;
mod registry;

pub use endpoint::{DEFAULT_ENDPOINT_TEMPLATE, EndpointTemplate, EndpointTemplateError};
pub use registry::{
    DEFAULT_PROBE_TIMEOUT, ProbedEntry, RegistryService, RegistryServiceError,
    RegistryServiceResult,
};
