//! G8sControlPlane admission.
//!
//! Defaulting derives the replica count from the linked AwsControlPlane and
//! points the infrastructure reference at it. Raising replicas from one to
//! three re-allocates the AwsControlPlane's zones, keeping the existing zone
//! first.

use super::{Admitter, identity};
use crate::context::AdmissionContext;
use crate::decision::{AdmissionDecision, add, set};
use crate::error::AdmissionError;
use admission_policy::{HIGHLY_AVAILABLE, SINGLE};
use cluster_store::Lookup;
use crds::{AwsControlPlane, G8sControlPlane, InfrastructureReference};
use serde_json::json;
use tokio::time::Instant;
use tracing::{debug, info, warn};

const SINGLE_REPLICAS: i32 = 1;
const HA_REPLICAS: i32 = 3;

impl Admitter {
    /// Default a G8sControlPlane on create; promote zones on 1 -> 3 updates
    pub async fn mutate_g8s_control_plane(
        &self,
        ctx: &AdmissionContext<'_, G8sControlPlane>,
    ) -> Result<AdmissionDecision, AdmissionError> {
        let (name, namespace) = identity(ctx.resource, "G8sControlPlane")?;

        if let Some(old) = ctx.old_resource {
            if old.replicas() == Some(SINGLE_REPLICAS)
                && ctx.resource.replicas() == Some(HA_REPLICAS)
            {
                info!(
                    "Promoting G8sControlPlane {}/{} to {} replicas",
                    namespace, name, HA_REPLICAS
                );
                self.promote_zones(&name, &namespace, ctx.deadline).await?;
            }
            return Ok(AdmissionDecision::allowed());
        }

        info!("Defaulting G8sControlPlane {}/{}", namespace, name);
        let spec = &ctx.resource.spec;
        let mut patches = Vec::new();

        if ctx.resource.replicas().is_none() {
            let replicas = self.replicas_from_zones(&name, &namespace, ctx.deadline).await?;
            debug!("Defaulting replicas of G8sControlPlane {}/{} to {}", namespace, name, replicas);
            patches.push(set(spec.replicas.is_some(), ["spec", "replicas"], json!(replicas)));
        }

        if spec.infrastructure_ref.is_none() {
            let reference = InfrastructureReference::aws_control_plane(&name, &namespace);
            let value = serde_json::to_value(&reference)
                .map_err(|e| AdmissionError::InvalidResource(e.to_string()))?;
            patches.push(add(["spec", "infrastructureRef"], value));
        }

        patches.extend(
            self.mirror_version_labels("G8sControlPlane", &ctx.resource.metadata, ctx.deadline)
                .await?,
        );

        Ok(AdmissionDecision::with_patches(patches))
    }

    /// Validate the replica count of a G8sControlPlane
    pub async fn validate_g8s_control_plane(
        &self,
        ctx: &AdmissionContext<'_, G8sControlPlane>,
    ) -> Result<AdmissionDecision, AdmissionError> {
        let (name, namespace) = identity(ctx.resource, "G8sControlPlane")?;
        info!("Validating G8sControlPlane {}/{}", namespace, name);

        let replicas = ctx.resource.replicas();
        if let Some(replicas) = replicas {
            if replicas != SINGLE_REPLICAS && replicas != HA_REPLICAS {
                return Ok(AdmissionDecision::denied(
                    "replicas-invalid",
                    format!(
                        "G8sControlPlane {}/{} replicas must be {} or {}, got {}",
                        namespace, name, SINGLE_REPLICAS, HA_REPLICAS, replicas
                    ),
                ));
            }
        }

        if let Some(old) = ctx.old_resource {
            if old.replicas() == Some(HA_REPLICAS) && replicas == Some(SINGLE_REPLICAS) {
                return Ok(AdmissionDecision::denied(
                    "ha-downgrade",
                    format!(
                        "G8sControlPlane {}/{} cannot scale down from {} to {} replicas",
                        namespace, name, HA_REPLICAS, SINGLE_REPLICAS
                    ),
                ));
            }
        }

        Ok(AdmissionDecision::allowed())
    }

    /// Replica count mirroring the linked AwsControlPlane's zone count
    async fn replicas_from_zones(
        &self,
        name: &str,
        namespace: &str,
        deadline: Option<Instant>,
    ) -> Result<i32, AdmissionError> {
        let store = &self.store;
        let linked = self
            .fetch_optional("get AwsControlPlane", deadline, || {
                store.get_aws_control_plane(name, namespace)
            })
            .await?;

        let zone_count = match &linked {
            Lookup::Found(cp) if !cp.availability_zones().is_empty() => {
                cp.availability_zones().len()
            }
            Lookup::Found(_) => self.config.default_master_replicas,
            Lookup::Absent => {
                warn!(
                    "AwsControlPlane {}/{} not found, using default master count {}",
                    namespace, name, self.config.default_master_replicas
                );
                self.config.default_master_replicas
            }
        };
        i32::try_from(zone_count).map_err(|e| AdmissionError::InvalidArgument(e.to_string()))
    }

    /// Re-allocate three zones on the linked AwsControlPlane, keeping its zone first
    ///
    /// The write carries no resourceVersion precondition: a concurrent writer
    /// to the same AwsControlPlane is overwritten (last write wins).
    async fn promote_zones(
        &self,
        name: &str,
        namespace: &str,
        deadline: Option<Instant>,
    ) -> Result<(), AdmissionError> {
        let store = &self.store;
        let linked = self
            .fetch_optional("get AwsControlPlane", deadline, || {
                store.get_aws_control_plane(name, namespace)
            })
            .await?;

        let mut control_plane: AwsControlPlane = match linked {
            Lookup::Found(cp) => cp,
            Lookup::Absent => {
                warn!(
                    "AwsControlPlane {}/{} not found, skipping zone promotion",
                    namespace, name
                );
                return Ok(());
            }
        };

        let current = control_plane.availability_zones();
        if current.len() != SINGLE {
            debug!(
                "AwsControlPlane {}/{} has {} zones, nothing to promote",
                namespace,
                name,
                current.len()
            );
            return Ok(());
        }

        let preserved = current[0].clone();
        let zones = self.allocate_zones(HIGHLY_AVAILABLE, Some(&preserved))?;
        info!(
            "Re-allocating zones of AwsControlPlane {}/{} from [{}] to {:?}",
            namespace, name, preserved, zones
        );
        control_plane.spec.availability_zones = Some(zones);

        self.fetch("update AwsControlPlane", deadline, || {
            store.update_aws_control_plane(&control_plane)
        })
        .await
    }
}
