//! AwsControlPlane admission.
//!
//! Defaulting picks the instance type and the availability zones; the zone
//! count follows the linked G8sControlPlane when it already exists.
//! Validation keeps the zone list well-formed and immutable, apart from the
//! promotion of a single-zone control plane to three zones.

use super::{Admitter, identity, unset_str};
use crate::context::AdmissionContext;
use crate::decision::{AdmissionDecision, set};
use crate::error::AdmissionError;
use admission_policy::{HIGHLY_AVAILABLE, SINGLE};
use cluster_store::Lookup;
use crds::AwsControlPlane;
use serde_json::json;
use tracing::{debug, info, warn};

impl Admitter {
    /// Default an AwsControlPlane on create
    pub async fn mutate_aws_control_plane(
        &self,
        ctx: &AdmissionContext<'_, AwsControlPlane>,
    ) -> Result<AdmissionDecision, AdmissionError> {
        let (name, namespace) = identity(ctx.resource, "AwsControlPlane")?;
        if ctx.is_update() {
            return Ok(AdmissionDecision::allowed());
        }
        info!("Defaulting AwsControlPlane {}/{}", namespace, name);

        let spec = &ctx.resource.spec;
        let mut patches = Vec::new();

        if let Some(present) = unset_str(spec.instance_type.as_deref()) {
            debug!(
                "Defaulting instance type of AwsControlPlane {}/{} to {}",
                namespace, name, self.config.default_instance_type
            );
            patches.push(set(
                present,
                ["spec", "instanceType"],
                json!(self.config.default_instance_type),
            ));
        }

        if ctx.resource.availability_zones().is_empty() {
            let count = self.master_count(&name, &namespace, ctx).await?;
            let zones = self.allocate_zones(count, None)?;
            debug!(
                "Defaulting availability zones of AwsControlPlane {}/{} to {:?}",
                namespace, name, zones
            );
            patches.push(set(
                spec.availability_zones.is_some(),
                ["spec", "availabilityZones"],
                json!(zones),
            ));
        }

        patches.extend(
            self.mirror_version_labels("AwsControlPlane", &ctx.resource.metadata, ctx.deadline)
                .await?,
        );

        Ok(AdmissionDecision::with_patches(patches))
    }

    /// Validate the zone list of an AwsControlPlane
    pub async fn validate_aws_control_plane(
        &self,
        ctx: &AdmissionContext<'_, AwsControlPlane>,
    ) -> Result<AdmissionDecision, AdmissionError> {
        let (name, namespace) = identity(ctx.resource, "AwsControlPlane")?;
        info!("Validating AwsControlPlane {}/{}", namespace, name);

        let zones = ctx.resource.availability_zones();
        if zones.is_empty() {
            return Ok(AdmissionDecision::allowed());
        }

        if zones.len() != SINGLE && zones.len() != HIGHLY_AVAILABLE {
            return Ok(AdmissionDecision::denied(
                "availability-zone-count",
                format!(
                    "AwsControlPlane {}/{} must use {} or {} availability zones, got {}",
                    namespace,
                    name,
                    SINGLE,
                    HIGHLY_AVAILABLE,
                    zones.len()
                ),
            ));
        }

        if let Some(unknown) = zones
            .iter()
            .find(|z| !self.config.availability_zones.contains(z))
        {
            return Ok(AdmissionDecision::denied(
                "availability-zone-invalid",
                format!(
                    "availability zone {} is not one of {}",
                    unknown,
                    self.config.availability_zones.join(", ")
                ),
            ));
        }

        if let Some(old) = ctx.old_resource {
            let old_zones = old.availability_zones();
            let promotion = old_zones.len() == SINGLE
                && zones.len() == HIGHLY_AVAILABLE
                && zones[0] == old_zones[0];
            if !old_zones.is_empty() && old_zones != zones && !promotion {
                return Ok(AdmissionDecision::denied(
                    "availability-zones-immutable",
                    format!(
                        "availability zones of AwsControlPlane {}/{} cannot change from {:?} to {:?}",
                        namespace, name, old_zones, zones
                    ),
                ));
            }
        }

        Ok(AdmissionDecision::allowed())
    }

    /// Zone count for a new control plane
    ///
    /// Follows the linked G8sControlPlane when it exists with a valid replica
    /// count, otherwise the configured default.
    async fn master_count(
        &self,
        name: &str,
        namespace: &str,
        ctx: &AdmissionContext<'_, AwsControlPlane>,
    ) -> Result<usize, AdmissionError> {
        let store = &self.store;
        let linked = self
            .fetch_optional("get G8sControlPlane", ctx.deadline, || {
                store.get_g8s_control_plane(name, namespace)
            })
            .await?;

        match linked {
            Lookup::Found(g8s) => match g8s.replicas().and_then(|r| usize::try_from(r).ok()) {
                Some(count) if count == SINGLE || count == HIGHLY_AVAILABLE => Ok(count),
                _ => {
                    warn!(
                        "G8sControlPlane {}/{} has no usable replica count, using default {}",
                        namespace, name, self.config.default_master_replicas
                    );
                    Ok(self.config.default_master_replicas)
                }
            },
            Lookup::Absent => {
                warn!(
                    "G8sControlPlane {}/{} not found, using default master count {}",
                    namespace, name, self.config.default_master_replicas
                );
                Ok(self.config.default_master_replicas)
            }
        }
    }
}
