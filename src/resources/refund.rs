//! Refunds.

use crate::core::{Entity, Resource};

/// A reversal of part or all of a debit.
///
/// Created through [`Debit::refund`](crate::Debit::refund).
#[derive(Debug, Clone)]
pub struct Refund {
    resource: Resource,
}

impl Entity for Refund {
    const ROOT: &'static str = "/refunds";

    fn from_resource(resource: Resource) -> Self {
        Self { resource }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl Refund {
    /// Refunded amount in minor units.
    #[must_use]
    pub fn amount(&self) -> Option<i64> {
        self.resource.get_i64("amount")
    }

    /// Free-form description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.resource.get_str("description")
    }
}
