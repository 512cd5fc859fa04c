//! Binding contexts: a shared service handle plus the attribute snapshot a
//! binding was declared with.

use std::sync::Arc;

use crate::binding::BindingAttribute;
use crate::provision::{self, ProvisionPlan};
use crate::service::{collection_uri, database_uri, Collection, DocumentService};
use crate::Error;

/// Everything downstream binding code needs to read and write documents.
///
/// The service handle is shared (the context does not own its lifecycle);
/// the attribute is owned, so changes to the value it was built from are
/// never observed.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use docbind::{BindingAttribute, BindingContext, DocumentService};
///
/// fn item_context<S: DocumentService>(
///     service: Arc<S>,
/// ) -> Result<BindingContext<S>, docbind::Error> {
///     BindingContext::builder()
///         .with_service(service)
///         .with_attribute(
///             BindingAttribute::new("ItemDB", "ItemCollection")
///                 .with_create_if_not_exists(true)
///                 .with_partition_key_path("/pk"),
///         )
///         .build()
/// }
/// ```
#[derive(Debug)]
pub struct BindingContext<S> {
    service: Arc<S>,
    attribute: BindingAttribute,
}

impl<S> BindingContext<S> {
    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    pub fn attribute(&self) -> &BindingAttribute {
        &self.attribute
    }

    pub fn database_uri(&self) -> String {
        database_uri(self.attribute.database_name())
    }

    pub fn collection_uri(&self) -> String {
        collection_uri(
            self.attribute.database_name(),
            self.attribute.collection_name(),
        )
    }

    /// What [`ensure_collection`](Self::ensure_collection) will ask the service for.
    pub fn provision_plan(&self) -> ProvisionPlan {
        ProvisionPlan::for_attribute(&self.attribute)
    }
}

impl<S: DocumentService> BindingContext<S> {
    /// Makes sure the target collection is usable, creating it only when the
    /// attribute allows.
    pub async fn ensure_collection(&self) -> Result<Collection, Error> {
        provision::execute(self.service.as_ref(), &self.provision_plan()).await
    }
}

impl<S> Clone for BindingContext<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            attribute: self.attribute.clone(),
        }
    }
}

impl BindingContext<()> {
    /// Creates a new builder for constructing a `BindingContext`.
    pub fn builder() -> BindingContextBuilder<()> {
        BindingContextBuilder {
            service: (),
            attribute: None,
        }
    }
}

/// Builds a context from a service and an attribute.
pub fn build_context<S: DocumentService>(
    service: Arc<S>,
    attribute: BindingAttribute,
) -> Result<BindingContext<S>, Error> {
    BindingContext::builder()
        .with_service(service)
        .with_attribute(attribute)
        .build()
}

/// Builder for constructing a [`BindingContext`].
///
/// The builder starts without a service (`BindingContextBuilder<()>`) and
/// can only be built once [`with_service`](Self::with_service) has supplied
/// one.
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct BindingContextBuilder<H> {
    service: H,
    attribute: Option<BindingAttribute>,
}

impl BindingContextBuilder<()> {
    pub fn with_service<S>(self, service: Arc<S>) -> BindingContextBuilder<Arc<S>> {
        BindingContextBuilder {
            service,
            attribute: self.attribute,
        }
    }
}

impl<H> BindingContextBuilder<H> {
    pub fn with_attribute(mut self, attribute: BindingAttribute) -> Self {
        self.attribute = Some(attribute);
        self
    }
}

impl<S: DocumentService> BindingContextBuilder<Arc<S>> {
    /// Returns an error if no attribute was provided or it is malformed.
    pub fn build(self) -> Result<BindingContext<S>, Error> {
        let attribute = self.attribute.ok_or(Error::MissingAttribute)?;
        attribute.validate()?;
        Ok(BindingContext {
            service: self.service,
            attribute,
        })
    }
}
