use crate::inventory::backend::ManagementBackend;
use crate::inventory::types::{ClusterScope, DiscoveryMode, Topology};
use crate::output::print_warning;

/// Decide the scope of the run with a single cluster query.
///
/// An unreachable cluster service, or one reporting no clusters, is not an
/// error: the run degrades to the local host. Node listing failures for a
/// cluster leave that cluster with no nodes.
pub fn discover(backend: &dyn ManagementBackend) -> Topology {
    let clusters = match backend.list_clusters() {
        Ok(clusters) if !clusters.is_empty() => clusters,
        Ok(_) => {
            print_warning("No clusters found. Falling back to local host.");
            return local_topology(backend);
        }
        Err(e) => {
            log::debug!("cluster query failed: {}", e);
            print_warning("Failover clustering not available. Falling back to local host.");
            return local_topology(backend);
        }
    };

    let scopes = clusters
        .into_iter()
        .map(|cluster| {
            let (nodes, node_error) = match backend.list_nodes(&cluster) {
                Ok(nodes) => (nodes, None),
                Err(e) => {
                    print_warning(&format!(
                        "Could not list nodes of cluster '{}': {}",
                        cluster.name, e
                    ));
                    (Vec::new(), Some(e.to_string()))
                }
            };
            log::debug!("cluster {} has {} node(s)", cluster.name, nodes.len());
            ClusterScope {
                cluster,
                nodes,
                node_error,
            }
        })
        .collect();

    Topology {
        mode: DiscoveryMode::Clustered,
        clusters: scopes,
        local: None,
    }
}

fn local_topology(backend: &dyn ManagementBackend) -> Topology {
    let local = backend.local_host();
    log::debug!("local mode on {}", local.name);
    Topology {
        mode: DiscoveryMode::Local,
        clusters: Vec::new(),
        local: Some(local),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::backend::fake::FakeBackend;

    #[test]
    fn test_unavailable_service_falls_back_to_local() {
        let backend = FakeBackend::local("HV01", &["vm1"]);
        let topology = discover(&backend);
        assert_eq!(topology.mode, DiscoveryMode::Local);
        assert!(topology.clusters.is_empty());
        assert_eq!(topology.local.unwrap().name, "HV01");
    }

    #[test]
    fn test_zero_clusters_falls_back_to_local() {
        let mut backend = FakeBackend::local("HV01", &[]);
        backend.cluster_service = true;
        let topology = discover(&backend);
        assert_eq!(topology.mode, DiscoveryMode::Local);
    }

    #[test]
    fn test_clustered_mode_keeps_cluster_order() {
        let backend = FakeBackend::clustered(
            &[("CLU-A", &["N1", "N2"]), ("CLU-B", &["N3"])],
            &[],
        );
        let topology = discover(&backend);
        assert_eq!(topology.mode, DiscoveryMode::Clustered);
        assert!(topology.local.is_none());
        let names: Vec<_> = topology.clusters.iter().map(|s| s.cluster.name.as_str()).collect();
        assert_eq!(names, vec!["CLU-A", "CLU-B"]);
        assert_eq!(topology.clusters[0].nodes.len(), 2);
        assert!(topology.clusters[0].node_error.is_none());
    }

    #[test]
    fn test_node_listing_failure_keeps_cluster() {
        let mut backend = FakeBackend::clustered(
            &[("CLU-A", &["N1"]), ("CLU-B", &["N2"])],
            &[],
        );
        backend.broken_node_query.insert("CLU-B".to_string());
        let topology = discover(&backend);

        assert_eq!(topology.mode, DiscoveryMode::Clustered);
        assert_eq!(topology.clusters.len(), 2);
        assert_eq!(topology.clusters[0].nodes.len(), 1);
        assert!(topology.clusters[1].nodes.is_empty());
        assert!(topology.clusters[1]
            .node_error
            .as_deref()
            .unwrap()
            .contains("cluster service is not running"));
    }
}
