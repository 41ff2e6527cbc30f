//! Integer edge/turn cost tensors for the router (§4.4, §4.4.3).
//!
//! All costs are scaled by `pcs` and rounded to integers before reaching the
//! solver: the underlying distances are in meters and angles in radians, and
//! integer coefficients make the `kappa` sentinel an exact upper bound
//! rather than a float comparison.

use covplan_core::{is_admissible_edge, GeoPoint};

/// Precomputed edge distance costs `d[i][j]` and turn-angle costs
/// `q[i][j][k]`, local to one agent's assigned-node subset.
pub struct CostTensors {
    n: usize,
    pub dist: Vec<Vec<i64>>,
    pub turn: Vec<Vec<Vec<i64>>>,
    pub kappa: i64,
}

impl CostTensors {
    /// Build the tensors for `centers` (one agent's assigned nodes, in
    /// local index order), scaling by `pcs` and flagging non-neighbor pairs
    /// with the `kappa` sentinel.
    pub fn build(centers: &[GeoPoint], dim: f64, pcs: i64, kappa: i64) -> Self {
        let n = centers.len();
        let mut dist = vec![vec![0i64; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = centers[i].distance(centers[j]);
                dist[i][j] = if is_admissible_edge(d, dim) {
                    (pcs as f64 * d).round() as i64
                } else {
                    kappa
                };
            }
        }

        let mut turn = vec![vec![vec![0i64; n]; n]; n];
        for i in 0..n {
            for j in 0..n {
                if j == i {
                    continue;
                }
                for k in 0..n {
                    if k == j {
                        continue;
                    }
                    if dist[i][j] == kappa || dist[j][k] == kappa {
                        continue;
                    }
                    let r = centers[i].distance(centers[j]);
                    let s = centers[j].distance(centers[k]);
                    let t = centers[k].distance(centers[i]);
                    let cos_interior = ((r + s - t) / (4.0 * r * s).sqrt()).clamp(-1.0, 1.0);
                    let theta = std::f64::consts::PI - cos_interior.acos();
                    turn[i][j][k] = (pcs as f64 * theta).round() as i64;
                }
            }
        }

        Self {
            n,
            dist,
            turn,
            kappa,
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collinear_triple_has_zero_turn_cost() {
        let centers = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0001, 0.0),
            GeoPoint::new(0.0002, 0.0),
        ];
        let tensors = CostTensors::build(&centers, 15.0, 100, 1_000_000_000);
        assert_eq!(tensors.turn[0][1][2], 0);
    }

    #[test]
    fn u_turn_has_pi_scaled_turn_cost() {
        let centers = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0001, 0.0),
            GeoPoint::new(0.0, 0.0),
        ];
        let tensors = CostTensors::build(&centers, 15.0, 100, 1_000_000_000);
        let expected = (100.0 * std::f64::consts::PI).round() as i64;
        assert_eq!(tensors.turn[0][1][2], expected);
    }

    #[test]
    fn distant_node_is_forbidden() {
        let centers = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0), // far away
        ];
        let tensors = CostTensors::build(&centers, 10.0, 100, 1_000_000_000);
        assert_eq!(tensors.dist[0][1], tensors.kappa);
    }
}
