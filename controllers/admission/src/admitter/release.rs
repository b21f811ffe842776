//! Release upgrade checks shared by Cluster and AwsCluster.

use super::Admitter;
use crate::decision::AdmissionDecision;
use crate::error::AdmissionError;
use admission_policy::{ReleaseCatalog, ReleaseVersion, UpgradeReason, evaluate};
use crds::{Condition, is_transitioning, labels};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;
use tokio::time::Instant;
use tracing::info;

impl Admitter {
    /// Installable releases, by Release name
    pub(crate) async fn release_catalog(
        &self,
        deadline: Option<Instant>,
    ) -> Result<ReleaseCatalog, AdmissionError> {
        let store = &self.store;
        let releases = self
            .fetch("list Releases", deadline, || store.list_releases())
            .await?;
        let names: Vec<String> = releases.iter().map(|r| r.name_any()).collect();
        Ok(ReleaseCatalog::parse_names(names.iter().map(String::as_str))?)
    }

    /// Apply the upgrade policy to a change of the `release-version` label
    ///
    /// `old_conditions` come from the stored object: a creation or upgrade
    /// still in progress blocks any release change.
    pub(crate) async fn check_release_upgrade(
        &self,
        kind: &str,
        new_meta: &ObjectMeta,
        old_meta: &ObjectMeta,
        old_conditions: &[Condition],
        deadline: Option<Instant>,
    ) -> Result<AdmissionDecision, AdmissionError> {
        let new_label = labels::get(new_meta, labels::RELEASE_VERSION);
        let old_label = labels::get(old_meta, labels::RELEASE_VERSION);
        if new_label == old_label {
            return Ok(AdmissionDecision::allowed());
        }

        let name = new_meta.name.as_deref().unwrap_or_default();
        let namespace = new_meta.namespace.as_deref().unwrap_or("default");
        let (Some(old_label), Some(new_label)) = (old_label, new_label) else {
            return Err(AdmissionError::InvalidArgument(format!(
                "{} {}/{} must carry the {} label",
                kind,
                namespace,
                name,
                labels::RELEASE_VERSION
            )));
        };

        let old = ReleaseVersion::parse(old_label)?;
        let new = ReleaseVersion::parse(new_label)?;
        if old == new {
            return Ok(AdmissionDecision::allowed());
        }

        let upgrading = is_transitioning(old_conditions);
        let catalog = if upgrading {
            // Refused before the catalog matters.
            ReleaseCatalog::default()
        } else {
            self.release_catalog(deadline).await?
        };

        let decision = evaluate(old, new, upgrading, &catalog);
        if decision.allowed {
            info!("{} {}/{} upgrading from release {} to {}", kind, namespace, name, old, new);
            return Ok(AdmissionDecision::allowed());
        }

        let message = match decision.reason {
            UpgradeReason::UpgradeInProgress => format!(
                "{} {}/{} cannot change release from {} to {} while a creation or upgrade is in progress",
                kind, namespace, name, old, new
            ),
            UpgradeReason::TargetNotInstalled => {
                format!("release {} is not installed", new)
            }
            UpgradeReason::Downgrade => {
                format!("downgrading from release {} to {} is not supported", old, new)
            }
            UpgradeReason::ReleaseSkipped(skipped) => format!(
                "upgrading from release {} to {} skips release {}; upgrade to {}.{} first",
                old, new, skipped, skipped.major, skipped.minor
            ),
            UpgradeReason::Ok => String::new(),
        };
        info!("Denied release change of {} {}/{}: {}", kind, namespace, name, message);
        Ok(AdmissionDecision::denied(decision.reason.code(), message))
    }
}
