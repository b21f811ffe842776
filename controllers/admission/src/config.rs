//! Admission configuration
//!
//! Read once at startup from environment variables. Optional variables fall
//! back to platform defaults; `AVAILABILITY_ZONES`, `BASE_DOMAIN` and `REGION`
//! are required.

use crate::error::AdmissionError;
use admission_policy::{HIGHLY_AVAILABLE, NetworkRange, ReservedRanges, SINGLE};
use cluster_store::RetryPolicy;
use crds::CredentialSecret;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Static inputs of the admission policies
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Platform pod, service and cluster-internal ranges
    pub reserved_ranges: ReservedRanges,
    /// Candidate availability zones of the region
    pub availability_zones: Vec<String>,
    /// Default AwsControlPlane instance type
    pub default_instance_type: String,
    /// Default AwsCluster description
    pub default_cluster_description: String,
    /// Default DNS domain of tenant clusters
    pub base_domain: String,
    /// Default AwsCluster region
    pub region: String,
    /// Default credential secret reference
    pub credential_secret: CredentialSecret,
    /// Default tenant pod network
    pub default_pod_cidr: NetworkRange,
    /// Master count used when no linked resource decides it (1 or 3)
    pub default_master_replicas: usize,
    /// Retry budget for store calls
    pub retry: RetryPolicy,
}

impl AdmissionConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, AdmissionError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AdmissionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let reserved_ranges = ReservedRanges::new(
            cidr(&var, "RESERVED_POD_CIDR", "172.17.0.1/16")?,
            cidr(&var, "RESERVED_SERVICE_CIDR", "10.0.0.0/16")?,
            cidr(&var, "RESERVED_CLUSTER_IP_RANGE", "172.31.0.0/16")?,
        );

        let availability_zones: Vec<String> = required(&var, "AVAILABILITY_ZONES")?
            .split(',')
            .map(str::trim)
            .filter(|z| !z.is_empty())
            .map(str::to_string)
            .collect();
        if availability_zones.is_empty() {
            return Err(AdmissionError::InvalidConfig(
                "AVAILABILITY_ZONES must list at least one zone".to_string(),
            ));
        }

        let default_master_replicas = number(&var, "DEFAULT_MASTER_REPLICAS", 3)?;
        if default_master_replicas != SINGLE && default_master_replicas != HIGHLY_AVAILABLE {
            return Err(AdmissionError::InvalidConfig(format!(
                "DEFAULT_MASTER_REPLICAS must be {} or {}, got {}",
                SINGLE, HIGHLY_AVAILABLE, default_master_replicas
            )));
        }

        let retry = RetryPolicy {
            max_attempts: number(&var, "STORE_RETRY_ATTEMPTS", 3)?,
            min_backoff: Duration::from_millis(number(&var, "STORE_RETRY_MIN_BACKOFF_MS", 50)?),
            max_backoff: Duration::from_millis(number(&var, "STORE_RETRY_MAX_BACKOFF_MS", 400)?),
            attempt_timeout: Duration::from_millis(number(&var, "STORE_REQUEST_TIMEOUT_MS", 5000)?),
        };

        Ok(Self {
            reserved_ranges,
            availability_zones,
            default_instance_type: var("DEFAULT_INSTANCE_TYPE")
                .unwrap_or_else(|| "m5.xlarge".to_string()),
            default_cluster_description: var("DEFAULT_CLUSTER_DESCRIPTION")
                .unwrap_or_else(|| "Unnamed cluster".to_string()),
            base_domain: required(&var, "BASE_DOMAIN")?,
            region: required(&var, "REGION")?,
            credential_secret: CredentialSecret {
                name: var("CREDENTIAL_SECRET_NAME")
                    .unwrap_or_else(|| "credential-default".to_string()),
                namespace: var("CREDENTIAL_SECRET_NAMESPACE")
                    .unwrap_or_else(|| "giantswarm".to_string()),
            },
            default_pod_cidr: cidr(&var, "DEFAULT_POD_CIDR", "10.2.0.0/16")?,
            default_master_replicas,
            retry,
        })
    }
}

fn required(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, AdmissionError> {
    var(key).ok_or_else(|| {
        AdmissionError::InvalidConfig(format!("{} environment variable is required", key))
    })
}

fn cidr(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<NetworkRange, AdmissionError> {
    let value = var(key).unwrap_or_else(|| default.to_string());
    NetworkRange::parse(&value)
        .map_err(|e| AdmissionError::InvalidConfig(format!("{}: {}", key, e)))
}

fn number<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AdmissionError>
where
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(value) => value.trim().parse().map_err(|e| {
            AdmissionError::InvalidConfig(format!("{}: invalid number '{}': {}", key, value, e))
        }),
        None => Ok(default),
    }
}
