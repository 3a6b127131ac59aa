//! Tenant persistence
//!
//! The engine reads and writes whole tenant payloads; where they live is up
//! to the repository implementation.

pub mod local;

use crate::model::TenantData;

pub trait TenantRepository {
    type Error;

    /// Latest payload of `tenant_id`, or `None` for an unknown tenant.
    fn load(
        &self,
        tenant_id: &str,
    ) -> impl Future<Output = Result<Option<TenantData>, Self::Error>>;

    /// Stores `data`. Returns `false` when the stored payload was already
    /// identical.
    fn save(
        &self,
        tenant_id: &str,
        data: &TenantData,
    ) -> impl Future<Output = Result<bool, Self::Error>>;
}
