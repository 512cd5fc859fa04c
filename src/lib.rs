pub mod binding;
pub mod config;
pub mod context;
mod error;
pub mod options;
pub mod provider;
pub mod provision;
pub mod service;
pub mod testing;

pub use binding::{BindingAttribute, BindingDeclaration, ParameterShape};
pub use config::{ConfigError, ConfigurationSource, Settings};
pub use context::{build_context, BindingContext};
pub use error::{Error, ResourceKind};
pub use options::{resolve, ConnectionConfig, DocumentDbOptions, OptionsResolver};
pub use provider::DocumentBindingProvider;
pub use service::{DocumentService, ServiceError, ServiceFactory};
