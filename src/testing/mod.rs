#![cfg(any(test, feature = "testing"))]

// In-memory doubles for the document service seam.
//
// The service records every call it receives and can be told to fail, so
// tests can assert on exactly what provisioning asked for (or didn't).

mod in_memory_service;

pub use in_memory_service::{InMemoryDocumentService, InMemoryServiceFactory, ServiceCall};
