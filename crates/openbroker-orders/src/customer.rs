//! Customer directory: the lifecycle service's view of customer identity.
//!
//! Profiles, credentials and authentication live elsewhere. Order creation
//! only needs to know whether a customer id refers to someone real.

use std::collections::HashSet;

use openbroker_types::CustomerId;
use parking_lot::RwLock;

/// Existence check for customers, shared across command threads.
pub trait CustomerDirectory: Send + Sync {
    fn exists(&self, customer_id: CustomerId) -> bool;
}

/// Directory backed by an in-process set.
#[derive(Debug, Default)]
pub struct InMemoryCustomerDirectory {
    customers: RwLock<HashSet<CustomerId>>,
}

impl InMemoryCustomerDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new customer and return its id.
    pub fn register(&self) -> CustomerId {
        let id = CustomerId::new();
        self.insert(id);
        id
    }

    /// Add a known id. Returns `false` if it was already present.
    pub fn insert(&self, customer_id: CustomerId) -> bool {
        self.customers.write().insert(customer_id)
    }

    /// Returns `false` if the id was unknown.
    pub fn remove(&self, customer_id: CustomerId) -> bool {
        self.customers.write().remove(&customer_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.customers.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customers.read().is_empty()
    }
}

impl CustomerDirectory for InMemoryCustomerDirectory {
    fn exists(&self, customer_id: CustomerId) -> bool {
        self.customers.read().contains(&customer_id)
    }
}
