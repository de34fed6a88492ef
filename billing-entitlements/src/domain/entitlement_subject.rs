// billing-entitlements/src/domain/entitlement_subject.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Anything that can hold entitlements: it has an identity for delegation
/// walks, an account-level trial window and optionally a FastSpring customer.
///
/// The resolver only talks to accounts through this trait, so entitlement
/// checks can run against any model that carries these attributes.
pub trait EntitlementSubject {
    fn subject_id(&self) -> Uuid;

    /// End of the generic (account-level) trial, if one was granted.
    fn trial_ends_at(&self) -> Option<DateTime<Utc>>;

    /// Plan the generic trial applies to.
    fn trial_plan(&self) -> Option<&str>;

    /// The subject's own plan attribute, used for team capability checks.
    fn own_plan_id(&self) -> Option<&str>;

    fn fastspring_id(&self) -> Option<&str>;

    fn has_fastspring_id(&self) -> bool {
        self.fastspring_id().is_some()
    }
}
