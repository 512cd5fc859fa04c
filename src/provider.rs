//! The binding extension entry point.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::binding::{BindingAttribute, BindingDeclaration, ParameterShape};
use crate::config::{ConfigurationSource, Settings};
use crate::context::{build_context, BindingContext};
use crate::options::{ConnectionConfig, DocumentDbOptions, OptionsResolver};
use crate::service::{ServiceCache, ServiceFactory};
use crate::Error;

/// Turns binding declarations into ready-to-use [`BindingContext`]s.
///
/// Construction never fails for lack of a connection string; that surfaces
/// from [`bind`](Self::bind), the first point a service is needed.
///
/// Connection strings are resolved per binding, first match wins:
/// 1. the setting named by the attribute's `connection`, if any
/// 2. the explicit `connection_string` in [`DocumentDbOptions`]
/// 3. `ConnectionStrings:<connection_name>` from settings
pub struct DocumentBindingProvider<F: ServiceFactory> {
    settings: Arc<dyn ConfigurationSource>,
    options: DocumentDbOptions,
    services: ServiceCache<F>,
}

impl<F: ServiceFactory> DocumentBindingProvider<F> {
    pub fn new(
        settings: Arc<dyn ConfigurationSource>,
        options: DocumentDbOptions,
        factory: F,
    ) -> Self {
        Self {
            settings,
            options,
            services: ServiceCache::new(factory),
        }
    }

    /// Reads [`DocumentDbOptions`] from the `DocumentDB` section of `settings`.
    pub fn from_settings(settings: Settings, factory: F) -> Result<Self, Error> {
        let options = DocumentDbOptions::from_settings(&settings)?;
        Ok(Self::new(Arc::new(settings), options, factory))
    }

    pub fn options(&self) -> &DocumentDbOptions {
        &self.options
    }

    pub fn services(&self) -> &ServiceCache<F> {
        &self.services
    }

    /// Validates a binding declaration. Unsupported shapes and malformed
    /// attributes are rejected here rather than at bind time.
    pub fn register(
        &self,
        parameter: impl Into<String>,
        shape: ParameterShape,
        attribute: BindingAttribute,
    ) -> Result<BindingDeclaration, Error> {
        let declaration = BindingDeclaration::new(parameter, shape, attribute)?;
        debug!(
            parameter = declaration.parameter(),
            shape = %declaration.shape(),
            "binding registered"
        );
        Ok(declaration)
    }

    /// Resolves the connection for `attribute` without using it.
    ///
    /// A named connection is looked up under its own key and never falls
    /// back to the host default.
    pub fn resolve_connection(&self, attribute: &BindingAttribute) -> ConnectionConfig {
        match attribute.connection() {
            Some(name) => OptionsResolver::new(name).resolve_from(self.settings.as_ref(), None),
            None => self.options.resolver().resolve_from(
                self.settings.as_ref(),
                self.options.connection_string.as_deref(),
            ),
        }
    }

    /// Resolves the connection, fetches the shared service and builds the
    /// context for `declaration`.
    #[instrument(skip_all, fields(parameter = declaration.parameter()))]
    pub fn bind(&self, declaration: &BindingDeclaration) -> Result<BindingContext<F::Service>, Error> {
        let attribute = declaration.attribute();
        let connection = self.resolve_connection(attribute).require()?;
        let service = self.services.get_or_create(&connection)?;
        build_context(service, attribute.clone())
    }
}

impl<F: ServiceFactory> std::fmt::Debug for DocumentBindingProvider<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentBindingProvider")
            .field("options", &self.options.connection_name)
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Cardinality, Direction, ElementKind};
    use crate::config::{ConfigError, MemorySource};
    use crate::options::ConnectionOrigin;
    use crate::testing::{InMemoryServiceFactory, ServiceCall};
    use std::collections::HashMap;
    use std::num::NonZeroU32;

    const OUTPUT_MANY: ParameterShape =
        ParameterShape::new(Direction::Output, Cardinality::Many, ElementKind::Typed);

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        Settings::builder()
            .with_source(pairs.iter().copied().collect::<MemorySource>())
            .build()
            .unwrap()
    }

    fn item_attribute() -> BindingAttribute {
        BindingAttribute::new("ItemDB", "ItemCollection")
            .with_create_if_not_exists(true)
            .with_partition_key_path("/pk")
            .with_collection_throughput(400)
    }

    #[test]
    fn test_missing_connection_fails_at_bind_not_construction() {
        let provider =
            DocumentBindingProvider::from_settings(Settings::default(), InMemoryServiceFactory::new())
                .unwrap();
        let declaration = provider.register("items", OUTPUT_MANY, item_attribute()).unwrap();

        match provider.bind(&declaration) {
            Err(Error::Config(ConfigError::MissingConnectionString { key })) => {
                assert_eq!(key, "ConnectionStrings:DocumentDB")
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(provider.services().factory().created(), 0);
    }

    #[test]
    fn test_default_connection_from_settings() {
        let provider = DocumentBindingProvider::from_settings(
            settings(&[("ConnectionStrings:DocumentDB", "AccountEndpoint=https://default/")]),
            InMemoryServiceFactory::new(),
        )
        .unwrap();

        let connection = provider.resolve_connection(&item_attribute());

        assert_eq!(connection.origin(), Some(ConnectionOrigin::Default));
        assert_eq!(
            connection.connection_string(),
            Some("AccountEndpoint=https://default/")
        );
    }

    #[test]
    fn test_options_override_beats_default() {
        let provider = DocumentBindingProvider::from_settings(
            settings(&[
                ("ConnectionStrings:DocumentDB", "AccountEndpoint=https://default/"),
                ("DocumentDB:connection_string", "AccountEndpoint=https://explicit/"),
            ]),
            InMemoryServiceFactory::new(),
        )
        .unwrap();

        let connection = provider.resolve_connection(&item_attribute());

        assert_eq!(connection.origin(), Some(ConnectionOrigin::Override));
        assert_eq!(
            connection.connection_string(),
            Some("AccountEndpoint=https://explicit/")
        );
    }

    #[test]
    fn test_attribute_connection_beats_options() {
        let mut map = HashMap::new();
        map.insert(
            "ConnectionStrings:Reporting".to_string(),
            "AccountEndpoint=https://reporting/".to_string(),
        );
        let provider = DocumentBindingProvider::new(
            Arc::new(map),
            DocumentDbOptions::default().with_connection_string("AccountEndpoint=https://explicit/"),
            InMemoryServiceFactory::new(),
        );

        let connection =
            provider.resolve_connection(&item_attribute().with_connection("Reporting"));

        assert_eq!(
            connection.connection_string(),
            Some("AccountEndpoint=https://reporting/")
        );
    }

    #[test]
    fn test_unconfigured_named_connection_reports_its_key() {
        let provider = DocumentBindingProvider::from_settings(
            settings(&[("ConnectionStrings:DocumentDB", "AccountEndpoint=https://default/")]),
            InMemoryServiceFactory::new(),
        )
        .unwrap();
        let declaration = provider
            .register("items", OUTPUT_MANY, item_attribute().with_connection("Missing"))
            .unwrap();

        match provider.bind(&declaration) {
            Err(Error::Config(ConfigError::MissingConnectionString { key })) => {
                assert_eq!(key, "ConnectionStrings:Missing")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_bindings_share_service_per_connection() {
        let provider = DocumentBindingProvider::from_settings(
            settings(&[("ConnectionStrings:DocumentDB", "AccountEndpoint=https://default/")]),
            InMemoryServiceFactory::new(),
        )
        .unwrap();
        let items = provider.register("items", OUTPUT_MANY, item_attribute()).unwrap();
        let other = provider
            .register(
                "other",
                OUTPUT_MANY,
                BindingAttribute::new("ItemDB", "OtherCollection"),
            )
            .unwrap();

        let first = provider.bind(&items).unwrap();
        let second = provider.bind(&other).unwrap();

        assert!(Arc::ptr_eq(first.service(), second.service()));
        assert_eq!(provider.services().factory().created(), 1);
    }

    #[test]
    fn test_register_rejects_unsupported_shape() {
        let provider =
            DocumentBindingProvider::from_settings(Settings::default(), InMemoryServiceFactory::new())
                .unwrap();
        let shape = ParameterShape::new(Direction::Input, Cardinality::Single, ElementKind::Text);

        assert!(matches!(
            provider.register("raw", shape, item_attribute().with_id("1")),
            Err(Error::UnsupportedShape { .. })
        ));
    }

    #[test]
    fn test_register_rejects_malformed_attribute() {
        let provider =
            DocumentBindingProvider::from_settings(Settings::default(), InMemoryServiceFactory::new())
                .unwrap();

        assert!(matches!(
            provider.register("items", OUTPUT_MANY, BindingAttribute::new("ItemDB", "")),
            Err(Error::InvalidAttribute(_))
        ));
    }

    #[test]
    fn test_invalid_named_connection_reports_its_key() {
        let provider = DocumentBindingProvider::from_settings(
            settings(&[
                ("ConnectionStrings:DocumentDB", "AccountEndpoint=https://default/"),
                ("ConnectionStrings:Reporting", "garbage"),
            ]),
            InMemoryServiceFactory::new(),
        )
        .unwrap();
        let attribute = item_attribute().with_connection("Reporting");

        let connection = provider.resolve_connection(&attribute);
        assert_eq!(connection.setting_key(), "ConnectionStrings:Reporting");
        assert_eq!(connection.origin(), Some(ConnectionOrigin::Default));

        let declaration = provider.register("items", OUTPUT_MANY, attribute).unwrap();
        match provider.bind(&declaration) {
            Err(Error::Config(ConfigError::InvalidConnectionString { key, .. })) => {
                assert_eq!(key, "ConnectionStrings:Reporting")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_options_override_reports_option_key() {
        let provider = DocumentBindingProvider::from_settings(
            settings(&[
                ("ConnectionStrings:DocumentDB", "AccountEndpoint=https://default/"),
                ("DocumentDB:connection_string", "garbage"),
            ]),
            InMemoryServiceFactory::new(),
        )
        .unwrap();
        let declaration = provider.register("items", OUTPUT_MANY, item_attribute()).unwrap();

        match provider.bind(&declaration) {
            Err(Error::Config(ConfigError::InvalidConnectionString { key, .. })) => {
                assert_eq!(key, "DocumentDB:connection_string")
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(provider.services().factory().created(), 0);
    }

    #[tokio::test]
    async fn test_bound_context_provisions_collection() {
        let provider = DocumentBindingProvider::from_settings(
            settings(&[
                ("Account:Endpoint", "https://localhost:8081/"),
                ("ConnectionStrings:DocumentDB", "AccountEndpoint=${Account:Endpoint};AccountKey=abc"),
            ]),
            InMemoryServiceFactory::new(),
        )
        .unwrap();
        let declaration = provider.register("items", OUTPUT_MANY, item_attribute()).unwrap();
        let ctx = provider.bind(&declaration).unwrap();

        ctx.ensure_collection().await.unwrap();

        let created = ctx
            .service()
            .create_calls()
            .into_iter()
            .find_map(|call| match call {
                ServiceCall::CreateCollection { throughput, request, .. } => {
                    Some((request.partition_key.paths, throughput))
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(created.0, vec!["/pk".to_string()]);
        assert_eq!(created.1.map(|t| t.offer_throughput), NonZeroU32::new(400));
    }
}
