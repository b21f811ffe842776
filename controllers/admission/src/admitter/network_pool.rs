//! NetworkPool admission: claimed ranges must not overlap.

use super::{Admitter, identity};
use crate::context::AdmissionContext;
use crate::decision::AdmissionDecision;
use crate::error::AdmissionError;
use admission_policy::{NetworkRange, ResourceIdentity};
use crds::NetworkPool;
use tracing::info;

impl Admitter {
    /// Validate a NetworkPool against every other pool and the reserved ranges
    ///
    /// Fails closed: if the existing pools cannot be listed, the request is
    /// not evaluated.
    pub async fn validate_network_pool(
        &self,
        ctx: &AdmissionContext<'_, NetworkPool>,
    ) -> Result<AdmissionDecision, AdmissionError> {
        let (name, namespace) = identity(ctx.resource, "NetworkPool")?;
        info!("Validating NetworkPool {}/{}", namespace, name);

        let candidate = NetworkRange::parse(&ctx.resource.spec.cidr_block)?;
        let owner = ResourceIdentity::new(name, namespace);

        match self
            .conflicts
            .check_conflict(&candidate, &owner, ctx.deadline)
            .await?
        {
            Some(conflicting) => {
                info!("NetworkPool {} CIDR {} overlaps {}", owner, candidate, conflicting);
                Ok(AdmissionDecision::denied(
                    "cidr-conflict",
                    format!(
                        "NetworkPool {} CIDR {} overlaps existing range {}",
                        owner, candidate, conflicting
                    ),
                ))
            }
            None => Ok(AdmissionDecision::allowed()),
        }
    }
}
