//! Stitches unordered boundary ways into one ring.
//!
//! OSM boundary relations list their outer ways in no guaranteed order or
//! direction. Starting from the first way, the stitcher repeatedly appends
//! the remaining way whose start or end lies nearest to the current tail,
//! reversing it when its end is the closer one. Way endpoints live in an
//! R-tree so each step is a nearest-neighbour query instead of a scan.

use rstar::primitives::GeomWithData;
use rstar::{PointDistance, RTree};
use tracing::{debug, info, warn};

use crate::models::{FragmentId, GeoPoint, WayFragment};

/// Which end of a way an index entry refers to.
///
/// Within one way, declaration order breaks ties: the start wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Endpoint {
    Start,
    End,
}

/// (position in input order, endpoint)
type EndpointEntry = GeomWithData<[f64; 2], (usize, Endpoint)>;

/// Result of stitching
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StitchedRing {
    /// Ordered, deduplicated ring; not necessarily closed
    pub points: Vec<GeoPoint>,
    /// Ways that could not be attached to the ring
    pub dropped: Vec<FragmentId>,
}

impl StitchedRing {
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Stitch boundary ways into a single ordered ring.
///
/// The first usable way seeds the ring; input order also breaks ties
/// between equally distant candidates. Ways with no points or with
/// non-finite endpoints cannot be matched and are reported in
/// [`StitchedRing::dropped`].
pub fn stitch(fragments: &[WayFragment]) -> StitchedRing {
    let mut dropped = Vec::new();
    let mut usable = Vec::with_capacity(fragments.len());

    for (position, fragment) in fragments.iter().enumerate() {
        match (fragment.start(), fragment.end()) {
            (Some(start), Some(end)) if is_finite(start) && is_finite(end) => {
                usable.push(position)
            }
            _ => {
                warn!(
                    "Dropping {} from boundary: no usable endpoints ({} points)",
                    fragment.id,
                    fragment.points.len()
                );
                dropped.push(fragment.id);
            }
        }
    }

    let Some((&seed, rest)) = usable.split_first() else {
        return StitchedRing {
            points: Vec::new(),
            dropped,
        };
    };

    let mut ring: Vec<GeoPoint> = fragments[seed].points.clone();

    let entries: Vec<EndpointEntry> = rest
        .iter()
        .flat_map(|&position| endpoint_entries(position, &fragments[position]))
        .collect();
    let mut index = RTree::bulk_load(entries);

    let mut attached = 1;
    while index.size() > 0 {
        let Some(tail) = ring.last() else { break };
        let query = [tail.lat, tail.lon];

        let Some((position, endpoint)) = closest_endpoint(&index, query) else {
            break;
        };

        let fragment = &fragments[position];
        for entry in endpoint_entries(position, fragment) {
            index.remove(&entry);
        }

        debug!("Attaching {} by its {:?}", fragment.id, endpoint);
        match endpoint {
            Endpoint::Start => ring.extend(fragment.points.iter().copied()),
            Endpoint::End => ring.extend(fragment.points.iter().rev().copied()),
        }
        attached += 1;
    }

    // Anything still indexed was never reached
    let mut unreached: Vec<usize> = index.iter().map(|entry| entry.data.0).collect();
    unreached.sort_unstable();
    unreached.dedup();
    for position in unreached {
        warn!("Dropping {} from boundary: no matching endpoint", fragments[position].id);
        dropped.push(fragments[position].id);
    }

    let points = remove_identical_points(&ring);

    info!(
        "Stitched {} ways into {} boundary points ({} dropped)",
        attached,
        points.len(),
        dropped.len()
    );

    StitchedRing { points, dropped }
}

/// Find the endpoint nearest to `query`.
///
/// Among equally distant endpoints the earliest way wins, and a way's
/// start beats its own end.
fn closest_endpoint(index: &RTree<EndpointEntry>, query: [f64; 2]) -> Option<(usize, Endpoint)> {
    let nearest = index.nearest_neighbor(&query)?;
    let best_distance = nearest.distance_2(&query);
    if best_distance.is_nan() {
        return None;
    }

    index
        .locate_within_distance(query, best_distance)
        .filter(|entry| entry.distance_2(&query) == best_distance)
        .chain(std::iter::once(nearest))
        .map(|entry| entry.data)
        .min()
}

fn endpoint_entries(position: usize, fragment: &WayFragment) -> Vec<EndpointEntry> {
    let mut entries = Vec::with_capacity(2);
    if let Some(start) = fragment.start() {
        entries.push(GeomWithData::new(
            [start.lat, start.lon],
            (position, Endpoint::Start),
        ));
    }
    if let Some(end) = fragment.end() {
        entries.push(GeomWithData::new([end.lat, end.lon], (position, Endpoint::End)));
    }
    entries
}

fn is_finite(point: &GeoPoint) -> bool {
    point.lat.is_finite() && point.lon.is_finite()
}

/// Drop consecutive repeats from a stitched chain.
///
/// The first point is always kept. The final point is kept unless it
/// repeats the previous kept point or equals the first point exactly, so a
/// chain that already returns to its start comes back open.
pub fn remove_identical_points<P: PartialEq + Copy>(points: &[P]) -> Vec<P> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut unique = vec![first];

    let Some((&last, middle)) = rest.split_last() else {
        return unique;
    };

    for &point in middle {
        if unique.last() != Some(&point) {
            unique.push(point);
        }
    }

    if unique.last() != Some(&last) && last != first {
        unique.push(last);
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn way(id: i64, coords: &[(f64, f64)]) -> WayFragment {
        WayFragment::new(
            id,
            coords
                .iter()
                .map(|&(lat, lon)| GeoPoint::new(lat, lon))
                .collect(),
        )
    }

    fn coords(points: &[GeoPoint]) -> Vec<(f64, f64)> {
        points.iter().map(|p| (p.lat, p.lon)).collect()
    }

    #[test]
    fn test_empty_input() {
        let stitched = stitch(&[]);
        assert!(stitched.points.is_empty());
        assert!(stitched.is_complete());
    }

    #[test]
    fn test_square_from_two_ways() {
        let ways = vec![
            way(1, &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]),
            way(2, &[(2.0, 0.0), (2.0, 1.0), (0.0, 1.0), (0.0, 0.0)]),
        ];

        let stitched = stitch(&ways);
        assert!(stitched.is_complete());
        // Shared vertex collapsed, closing repeat of the start removed
        assert_eq!(
            coords(&stitched.points),
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)]
        );
    }

    #[test]
    fn test_reverses_way_matched_by_its_end() {
        let ways = vec![
            way(1, &[(0.0, 0.0), (1.0, 0.0)]),
            way(2, &[(0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]),
            way(3, &[(0.0, 1.0), (0.0, 0.0)]),
        ];

        let stitched = stitch(&ways);
        assert_eq!(
            coords(&stitched.points),
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
        );
    }

    #[test]
    fn test_disordered_ways() {
        let ways = vec![
            way(10, &[(1.0, 1.0), (0.0, 1.0)]),
            way(11, &[(0.0, 0.0), (1.0, 0.0)]),
            way(12, &[(1.0, 0.0), (1.0, 1.0)]),
            way(13, &[(0.0, 1.0), (0.0, 0.0)]),
        ];

        let stitched = stitch(&ways);
        assert_eq!(
            coords(&stitched.points),
            vec![(1.0, 1.0), (0.0, 1.0), (0.0, 0.0), (1.0, 0.0)]
        );
    }

    #[test]
    fn test_tie_prefers_earlier_way_over_start() {
        // Way 2 ends at the tail and way 3 starts at it; the earlier way wins
        let ways = vec![
            way(1, &[(0.0, 0.0), (1.0, 0.0)]),
            way(2, &[(5.0, 5.0), (1.0, 0.0)]),
            way(3, &[(1.0, 0.0), (7.0, 7.0)]),
        ];

        let stitched = stitch(&ways);
        assert_eq!(
            coords(&stitched.points),
            vec![(0.0, 0.0), (1.0, 0.0), (5.0, 5.0), (7.0, 7.0), (1.0, 0.0)]
        );
    }

    #[test]
    fn test_tie_within_way_prefers_start() {
        let ways = vec![
            way(1, &[(0.0, 0.0), (1.0, 0.0)]),
            way(2, &[(2.0, 1.0), (2.0, -1.0)]),
        ];

        let stitched = stitch(&ways);
        assert_eq!(
            coords(&stitched.points),
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 1.0), (2.0, -1.0)]
        );
    }

    #[test]
    fn test_tie_prefers_earlier_way() {
        let ways = vec![
            way(1, &[(0.0, 0.0), (1.0, 0.0)]),
            way(2, &[(1.0, 0.0), (2.0, 2.0)]),
            way(3, &[(1.0, 0.0), (3.0, 3.0)]),
        ];

        let stitched = stitch(&ways);
        assert_eq!(
            coords(&stitched.points),
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 2.0), (3.0, 3.0), (1.0, 0.0)]
        );
    }

    #[test]
    fn test_gap_is_bridged_by_nearest() {
        let ways = vec![
            way(1, &[(0.0, 0.0), (1.0, 0.0)]),
            way(2, &[(5.0, 5.0), (6.0, 6.0)]),
            way(3, &[(1.1, 0.0), (1.1, 1.0)]),
        ];

        let stitched = stitch(&ways);
        assert!(stitched.is_complete());
        assert_eq!(
            coords(&stitched.points),
            vec![
                (0.0, 0.0),
                (1.0, 0.0),
                (1.1, 0.0),
                (1.1, 1.0),
                (5.0, 5.0),
                (6.0, 6.0)
            ]
        );
    }

    #[test]
    fn test_unusable_ways_are_reported() {
        let ways = vec![
            way(1, &[]),
            way(2, &[(0.0, 0.0), (1.0, 0.0)]),
            way(3, &[(f64::NAN, 0.0), (1.0, 1.0)]),
            way(4, &[(1.0, 0.0), (1.0, 1.0)]),
        ];

        let stitched = stitch(&ways);
        assert_eq!(stitched.dropped, vec![FragmentId(1), FragmentId(3)]);
        assert_eq!(
            coords(&stitched.points),
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]
        );
    }

    #[test]
    fn test_single_point_way() {
        let ways = vec![
            way(1, &[(0.0, 0.0), (1.0, 0.0)]),
            way(2, &[(1.0, 0.5)]),
        ];

        let stitched = stitch(&ways);
        assert!(stitched.is_complete());
        assert_eq!(
            coords(&stitched.points),
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 0.5)]
        );
    }

    #[test]
    fn test_remove_identical_points() {
        assert!(remove_identical_points::<(i32, i32)>(&[]).is_empty());
        assert_eq!(remove_identical_points(&[1]), vec![1]);
        assert_eq!(remove_identical_points(&[1, 1]), vec![1]);
        assert_eq!(remove_identical_points(&[1, 2, 2, 3, 3]), vec![1, 2, 3]);
        assert_eq!(remove_identical_points(&[1, 2, 3, 1]), vec![1, 2, 3]);
        assert_eq!(remove_identical_points(&[1, 2, 2, 1, 1]), vec![1, 2, 1]);
    }

    /// Cut a closed polygon into consecutive ways, shuffling order and
    /// flipping some of them.
    fn cycle_strategy() -> impl Strategy<Value = (usize, Vec<WayFragment>)> {
        (4usize..40, 1usize..8)
            .prop_flat_map(|(n, cuts)| {
                let cuts = cuts.min(n - 1);
                (
                    Just(n),
                    proptest::sample::subsequence((1..n).collect::<Vec<_>>(), cuts),
                    proptest::collection::vec(any::<bool>(), cuts + 1),
                    any::<u64>(),
                )
            })
            .prop_map(|(n, breaks, flips, seed)| {
                // Regular polygon: every vertex distinct, neighbours closest
                let vertices: Vec<GeoPoint> = (0..n)
                    .map(|i| {
                        let angle = std::f64::consts::TAU * i as f64 / n as f64;
                        GeoPoint::new(angle.sin(), angle.cos())
                    })
                    .collect();

                let mut bounds = vec![0];
                bounds.extend(breaks);
                bounds.push(n);

                let mut ways: Vec<WayFragment> = bounds
                    .windows(2)
                    .enumerate()
                    .map(|(i, w)| {
                        let mut points: Vec<GeoPoint> =
                            (w[0]..=w[1]).map(|j| vertices[j % n]).collect();
                        if i > 0 && flips[i] {
                            points.reverse();
                        }
                        WayFragment::new(i as i64, points)
                    })
                    .collect();

                // Deterministic shuffle of everything after the seed way
                let len = ways.len();
                let mut state = seed;
                for i in (2..len).rev() {
                    state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                    let j = 1 + (state >> 33) as usize % i;
                    ways.swap(i, j);
                }
                (n, ways)
            })
    }

    proptest! {
        #[test]
        fn stitched_cycle_keeps_every_vertex((n, ways) in cycle_strategy()) {
            let stitched = stitch(&ways);
            prop_assert!(stitched.is_complete());

            // Each vertex once: shared endpoints and the closing repeat collapse
            prop_assert_eq!(stitched.points.len(), n);
            let total: usize = ways.iter().map(|w| w.points.len()).sum();
            prop_assert_eq!(total - (ways.len() - 1) - 1, n);
        }

        #[test]
        fn stitching_is_deterministic((_n, ways) in cycle_strategy()) {
            prop_assert_eq!(stitch(&ways), stitch(&ways));
        }
    }
}
