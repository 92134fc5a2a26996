//! Transient marker clustering.
//!
//! Clusters are recomputed from scratch on every presence update; no
//! cluster identity survives across updates. Grouping is single-linkage
//! from a seed, not transitive: a marker joins a group only if it is
//! directly within the clustering distance of the seed, even if it is
//! within distance of another member.

use concourse_types::{ClusterId, Point, Uid, distance};

use crate::marker::Marker;

/// Minimum group size that collapses into a cluster.
pub const MIN_CLUSTER_SIZE: usize = 3;

/// A transient grouping of nearby markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Identity, valid until the next recompute.
    pub id: ClusterId,
    /// Aggregate label, "+N" where N is the member count.
    pub label: String,
    /// Mean of the member positions.
    pub centroid: Point,
    /// Member uids, in marker iteration order (seed first).
    pub members: Vec<Uid>,
}

/// Group markers into clusters.
///
/// Walks markers in order; each not-yet-processed marker seeds a group
/// of all other not-yet-processed markers within `threshold` of *the
/// seed*. Groups reaching [`MIN_CLUSTER_SIZE`] consume their members and
/// become a [`Cluster`]; smaller groups consume only the seed, leaving
/// the gathered neighbours eligible for later seeds in the same pass.
pub fn build_clusters(markers: &[Marker], threshold: f32) -> Vec<Cluster> {
    let mut processed = vec![false; markers.len()];
    let mut clusters = Vec::new();

    for (seed_idx, seed) in markers.iter().enumerate() {
        if processed.get(seed_idx).copied().unwrap_or(true) {
            continue;
        }

        let mut group: Vec<usize> = vec![seed_idx];
        for (other_idx, other) in markers.iter().enumerate() {
            if other_idx == seed_idx || processed.get(other_idx).copied().unwrap_or(true) {
                continue;
            }
            if distance(seed.position, other.position) <= threshold {
                group.push(other_idx);
            }
        }

        if group.len() >= MIN_CLUSTER_SIZE {
            for &idx in &group {
                if let Some(flag) = processed.get_mut(idx) {
                    *flag = true;
                }
            }
            clusters.push(make_cluster(markers, &group));
        } else if let Some(flag) = processed.get_mut(seed_idx) {
            // Too small: only the seed is consumed.
            *flag = true;
        }
    }

    clusters
}

/// Build the cluster value for a group of marker indices.
fn make_cluster(markers: &[Marker], group: &[usize]) -> Cluster {
    let mut sum = Point::default();
    let mut members = Vec::with_capacity(group.len());
    for &idx in group {
        if let Some(marker) = markers.get(idx) {
            sum.x += marker.position.x;
            sum.y += marker.position.y;
            members.push(marker.uid().clone());
        }
    }
    let count = count_to_f32(members.len()).max(1.0);
    Cluster {
        id: ClusterId::new(),
        label: format!("+{}", members.len()),
        centroid: Point::new(sum.x / count, sum.y / count),
        members,
    }
}

/// Convert a small count to `f32` without lossy casts.
///
/// Group sizes are bounded by the marker cap, far below `u16::MAX`.
fn count_to_f32(n: usize) -> f32 {
    u16::try_from(n).map_or(f32::from(u16::MAX), f32::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use concourse_types::{PresenceRecord, PresenceStatus};

    use super::*;

    fn marker_at(uid: &str, x: f32, y: f32) -> Marker {
        Marker::new(
            PresenceRecord {
                uid: Uid::new(uid),
                display_name: uid.to_owned(),
                zone: "hall".to_owned(),
                status: PresenceStatus::Active,
            },
            Point::new(x, y),
        )
    }

    #[test]
    fn three_close_markers_form_one_cluster() {
        let markers = vec![
            marker_at("a", 0.0, 0.0),
            marker_at("b", 5.0, 0.0),
            marker_at("c", 0.0, 5.0),
        ];
        let clusters = build_clusters(&markers, 10.0);
        assert_eq!(clusters.len(), 1);
        let cluster = clusters.first().unwrap();
        assert_eq!(cluster.label, "+3");
        assert_eq!(cluster.members.len(), 3);
    }

    #[test]
    fn two_markers_never_cluster() {
        let markers = vec![marker_at("a", 0.0, 0.0), marker_at("b", 1.0, 0.0)];
        assert!(build_clusters(&markers, 10.0).is_empty());
    }

    #[test]
    fn centroid_is_mean_of_members() {
        let markers = vec![
            marker_at("a", 0.0, 0.0),
            marker_at("b", 6.0, 0.0),
            marker_at("c", 0.0, 6.0),
        ];
        let clusters = build_clusters(&markers, 10.0);
        let centroid = clusters.first().unwrap().centroid;
        assert_eq!(centroid, Point::new(2.0, 2.0));
    }

    #[test]
    fn linkage_is_from_seed_not_transitive() {
        // a-b and b-c are within threshold, but a-c is not. With seed a,
        // the group is {a, b} (c is not within threshold of a), which is
        // too small; only a is consumed. Seed b then gathers c -- still
        // too small. No chain-clustering happens.
        let markers = vec![
            marker_at("a", 0.0, 0.0),
            marker_at("b", 9.0, 0.0),
            marker_at("c", 18.0, 0.0),
        ];
        assert!(build_clusters(&markers, 10.0).is_empty());
    }

    #[test]
    fn small_groups_leave_neighbours_for_later_seeds() {
        // Seed a gathers b only (too small) and consumes just itself.
        // Seed b then gathers c and d around it: cluster of 3.
        let markers = vec![
            marker_at("a", 0.0, 0.0),
            marker_at("b", 9.0, 0.0),
            marker_at("c", 14.0, 0.0),
            marker_at("d", 9.0, 5.0),
        ];
        let clusters = build_clusters(&markers, 10.0);
        assert_eq!(clusters.len(), 1);
        let members: Vec<&str> = clusters
            .first()
            .unwrap()
            .members
            .iter()
            .map(Uid::as_str)
            .collect();
        assert_eq!(members, vec!["b", "c", "d"]);
    }

    #[test]
    fn distant_groups_cluster_separately() {
        let markers = vec![
            marker_at("a1", 0.0, 0.0),
            marker_at("a2", 2.0, 0.0),
            marker_at("a3", 0.0, 2.0),
            marker_at("b1", 500.0, 500.0),
            marker_at("b2", 502.0, 500.0),
            marker_at("b3", 500.0, 502.0),
        ];
        let clusters = build_clusters(&markers, 10.0);
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| c.label == "+3"));
    }

    #[test]
    fn cluster_ids_are_fresh_per_compute() {
        let markers = vec![
            marker_at("a", 0.0, 0.0),
            marker_at("b", 1.0, 0.0),
            marker_at("c", 0.0, 1.0),
        ];
        let first = build_clusters(&markers, 10.0);
        let second = build_clusters(&markers, 10.0);
        assert_ne!(
            first.first().unwrap().id,
            second.first().unwrap().id
        );
    }
}
