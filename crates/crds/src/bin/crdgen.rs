//! Print the CRD manifests for every resource kind as a YAML stream.

use crds::{AwsCluster, AwsControlPlane, Cluster, G8sControlPlane, NetworkPool, Release};
use kube::CustomResourceExt;

fn main() -> Result<(), serde_yaml::Error> {
    let crds = [
        Cluster::crd(),
        AwsCluster::crd(),
        AwsControlPlane::crd(),
        G8sControlPlane::crd(),
        NetworkPool::crd(),
        Release::crd(),
    ];

    for crd in crds {
        print!("---\n{}", serde_yaml::to_string(&crd)?);
    }

    Ok(())
}
