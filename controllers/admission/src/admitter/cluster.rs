//! Cluster admission.

use super::{Admitter, identity};
use crate::context::AdmissionContext;
use crate::decision::AdmissionDecision;
use crate::error::AdmissionError;
use crds::Cluster;
use tracing::info;

impl Admitter {
    /// Validate a Cluster; release changes follow the upgrade policy
    pub async fn validate_cluster(
        &self,
        ctx: &AdmissionContext<'_, Cluster>,
    ) -> Result<AdmissionDecision, AdmissionError> {
        let (name, namespace) = identity(ctx.resource, "Cluster")?;
        info!("Validating Cluster {}/{}", namespace, name);

        let Some(old) = ctx.old_resource else {
            return Ok(AdmissionDecision::allowed());
        };
        self.check_release_upgrade(
            "Cluster",
            &ctx.resource.metadata,
            &old.metadata,
            old.conditions(),
            ctx.deadline,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::context::AdmissionContext;
    use crate::test_utils::*;
    use crate::ErrorKind;
    use cluster_store::MockResourceStore;
    use crds::{CONDITION_CREATING, CONDITION_UPDATING, Condition};

    fn catalog_store() -> MockResourceStore {
        let store = MockResourceStore::new();
        for name in ["v11.3.0", "v11.3.1", "v11.4.0", "v12.0.0"] {
            store.add_release(release(name, None));
        }
        store
    }

    #[tokio::test]
    async fn test_create_is_not_version_checked() {
        let store = MockResourceStore::new();
        let admitter = admitter(&store);
        let new = cluster("demo", "org-acme", Some("99.0.0"), None, vec![]);

        let decision = admitter.validate_cluster(&AdmissionContext::create(&new)).await.unwrap();
        assert!(decision.allowed);
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unchanged_release_skips_catalog() {
        let store = MockResourceStore::new();
        let admitter = admitter(&store);
        let conditions = vec![Condition::active(CONDITION_UPDATING)];
        let old = cluster("demo", "org-acme", Some("11.3.0"), None, conditions);
        let new = cluster("demo", "org-acme", Some("11.3.0"), Some("9.1.0"), vec![]);

        let decision = admitter
            .validate_cluster(&AdmissionContext::update(&new, &old))
            .await
            .unwrap();
        assert!(decision.allowed);
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_next_line_upgrade_is_allowed() {
        let store = catalog_store();
        let admitter = admitter(&store);
        let old = cluster("demo", "org-acme", Some("11.3.0"), None, vec![]);
        let new = cluster("demo", "org-acme", Some("11.4.0"), None, vec![]);

        let decision = admitter
            .validate_cluster(&AdmissionContext::update(&new, &old))
            .await
            .unwrap();
        assert!(decision.allowed);
    }

    #[tokio::test]
    async fn test_skipped_line_is_denied() {
        let store = catalog_store();
        let admitter = admitter(&store);
        let old = cluster("demo", "org-acme", Some("11.3.0"), None, vec![]);
        let new = cluster("demo", "org-acme", Some("12.0.0"), None, vec![]);

        let decision = admitter
            .validate_cluster(&AdmissionContext::update(&new, &old))
            .await
            .unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.reason.as_deref(), Some("release-skipped"));
        assert!(decision.message.unwrap().contains("11.4.0"));
    }

    #[tokio::test]
    async fn test_upgrade_in_progress_uses_old_conditions() {
        let store = MockResourceStore::new();
        let admitter = admitter(&store);
        let conditions = vec![Condition::active(CONDITION_CREATING)];
        let old = cluster("demo", "org-acme", Some("11.3.3"), None, conditions);
        let new = cluster("demo", "org-acme", Some("11.4.0"), None, vec![]);

        let decision = admitter
            .validate_cluster(&AdmissionContext::update(&new, &old))
            .await
            .unwrap();
        assert_eq!(decision.reason.as_deref(), Some("upgrade-in-progress"));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_removed_release_label_is_invalid_argument() {
        let store = catalog_store();
        let admitter = admitter(&store);
        let old = cluster("demo", "org-acme", Some("11.3.0"), None, vec![]);
        let new = cluster("demo", "org-acme", None, None, vec![]);

        let err = admitter
            .validate_cluster(&AdmissionContext::update(&new, &old))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_malformed_release_label_is_parse_error() {
        let store = catalog_store();
        let admitter = admitter(&store);
        let old = cluster("demo", "org-acme", Some("11.3.0"), None, vec![]);
        let new = cluster("demo", "org-acme", Some("latest"), None, vec![]);

        let err = admitter
            .validate_cluster(&AdmissionContext::update(&new, &old))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_unavailable() {
        let store = catalog_store();
        store.fail_next(10);
        let admitter = admitter(&store);
        let old = cluster("demo", "org-acme", Some("11.3.0"), None, vec![]);
        let new = cluster("demo", "org-acme", Some("11.4.0"), None, vec![]);

        let err = admitter
            .validate_cluster(&AdmissionContext::update(&new, &old))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }
}
