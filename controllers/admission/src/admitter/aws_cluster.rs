//! AwsCluster admission.
//!
//! Defaulting fills the provider settings a tenant may omit: description,
//! DNS domain, region, credential secret and pod CIDR. A nested object that
//! is entirely unset is added whole, so the patch applies whether or not the
//! submitted document contains it.

use super::{Admitter, identity, unset_str};
use crate::context::AdmissionContext;
use crate::decision::{AdmissionDecision, add, set};
use crate::error::AdmissionError;
use crds::{AwsCluster, AwsClusterDefinition, AwsClusterDns, AwsClusterPods, AwsClusterProvider};
use json_patch::PatchOperation;
use serde_json::json;
use tracing::{debug, info};

impl Admitter {
    /// Default an AwsCluster (create and update)
    pub async fn mutate_aws_cluster(
        &self,
        ctx: &AdmissionContext<'_, AwsCluster>,
    ) -> Result<AdmissionDecision, AdmissionError> {
        let (name, namespace) = identity(ctx.resource, "AwsCluster")?;
        info!("Defaulting AwsCluster {}/{}", namespace, name);

        let mut patches = self.cluster_definition_defaults(&ctx.resource.spec.cluster);
        patches.extend(self.provider_defaults(&ctx.resource.spec.provider));
        for patch in &patches {
            debug!("AwsCluster {}/{} default: {:?}", namespace, name, patch);
        }
        patches.extend(
            self.mirror_version_labels("AwsCluster", &ctx.resource.metadata, ctx.deadline)
                .await?,
        );

        Ok(AdmissionDecision::with_patches(patches))
    }

    /// Validate an AwsCluster; release changes follow the upgrade policy
    pub async fn validate_aws_cluster(
        &self,
        ctx: &AdmissionContext<'_, AwsCluster>,
    ) -> Result<AdmissionDecision, AdmissionError> {
        let (name, namespace) = identity(ctx.resource, "AwsCluster")?;
        info!("Validating AwsCluster {}/{}", namespace, name);

        let Some(old) = ctx.old_resource else {
            return Ok(AdmissionDecision::allowed());
        };
        self.check_release_upgrade(
            "AwsCluster",
            &ctx.resource.metadata,
            &old.metadata,
            old.conditions(),
            ctx.deadline,
        )
        .await
    }

    fn cluster_definition_defaults(
        &self,
        definition: &AwsClusterDefinition,
    ) -> Vec<PatchOperation> {
        let description = &self.config.default_cluster_description;
        let domain = &self.config.base_domain;

        if *definition == AwsClusterDefinition::default() {
            return vec![add(
                ["spec", "cluster"],
                json!({"description": description, "dns": {"domain": domain}}),
            )];
        }

        let mut patches = Vec::new();
        if let Some(present) = unset_str(definition.description.as_deref()) {
            patches.push(set(present, ["spec", "cluster", "description"], json!(description)));
        }
        if definition.dns == AwsClusterDns::default() {
            patches.push(add(["spec", "cluster", "dns"], json!({"domain": domain})));
        } else if let Some(present) = unset_str(definition.dns.domain.as_deref()) {
            patches.push(set(present, ["spec", "cluster", "dns", "domain"], json!(domain)));
        }
        patches
    }

    fn provider_defaults(&self, provider: &AwsClusterProvider) -> Vec<PatchOperation> {
        let region = &self.config.region;
        let secret = &self.config.credential_secret;
        let pod_cidr = self.config.default_pod_cidr.to_string();
        let secret_value = json!({"name": secret.name, "namespace": secret.namespace});

        if *provider == AwsClusterProvider::default() {
            return vec![add(
                ["spec", "provider"],
                json!({
                    "region": region,
                    "credentialSecret": secret_value,
                    "pods": {"cidrBlock": pod_cidr},
                }),
            )];
        }

        let mut patches = Vec::new();
        if let Some(present) = unset_str(provider.region.as_deref()) {
            patches.push(set(present, ["spec", "provider", "region"], json!(region)));
        }
        match &provider.credential_secret {
            None => patches.push(add(["spec", "provider", "credentialSecret"], secret_value)),
            Some(existing) if existing.name.is_empty() => {
                patches.push(set(true, ["spec", "provider", "credentialSecret"], secret_value));
            }
            Some(_) => {}
        }
        if provider.pods == AwsClusterPods::default() {
            patches.push(add(["spec", "provider", "pods"], json!({"cidrBlock": pod_cidr})));
        } else if let Some(present) = unset_str(provider.pods.cidr_block.as_deref()) {
            patches.push(set(present, ["spec", "provider", "pods", "cidrBlock"], json!(pod_cidr)));
        }
        patches
    }
}
