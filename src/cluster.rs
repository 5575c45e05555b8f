use serde::Serialize;

use super::*;

/// A group of detections of the same object
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub members: Vec<Rectangle>,
}
impl Cluster {
    /// Component-wise mean of the member rectangles
    pub fn center(&self) -> Rectangle {
        let n = self.members.len().max(1) as u64;
        let mean = |f: fn(&Rectangle) -> u32| (self.members.iter().map(|r| u64::from(f(r))).sum::<u64>() / n) as u32;
        Rectangle::new(mean(|r| r.x), mean(|r| r.y), mean(|r| r.width), mean(|r| r.height))
    }
}

/// Euclidean distance between two rectangles seen as (x, y, width, height)
/// points
fn distance(a: &Rectangle, b: &Rectangle) -> f64 {
    let d = |p: u32, q: u32| (f64::from(p) - f64::from(q)).powi(2);
    (d(a.x, b.x) + d(a.y, b.y) + d(a.width, b.width) + d(a.height, b.height)).sqrt()
}

/// Index and distance of the centre closest to `r`
fn nearest(centers: &[Rectangle], r: &Rectangle) -> (usize, f64) {
    centers
        .iter()
        .enumerate()
        .map(|(i, c)| (i, distance(c, r)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

/// Picks cluster centres with the max-min distance rule.
///
/// The first rectangle seeds the first centre and the rectangle farthest
/// from it the second. Afterwards the rectangle farthest from its nearest
/// centre becomes a new centre while that distance exceeds the mean distance
/// recorded for the centres so far.
fn centers(rects: &[Rectangle]) -> Vec<Rectangle> {
    let first = rects[0];
    let mut centers = vec![first];

    let (second, max_distance) = rects
        .iter()
        .map(|r| (*r, distance(&first, r)))
        .fold((first, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    if max_distance == 0.0 {
        return centers;
    }
    centers.push(second);
    let mut distances_sum = max_distance;

    loop {
        let (candidate, candidate_distance) = rects
            .iter()
            .map(|r| (*r, nearest(&centers, r).1))
            .fold((first, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        if candidate_distance > 0.0 && candidate_distance > distances_sum / centers.len() as f64 {
            centers.push(candidate);
            distances_sum += candidate_distance;
        } else {
            return centers;
        }
    }
}

/// Groups detections around automatically chosen centres
pub fn cluster_rectangles(rects: &[Rectangle]) -> Vec<Cluster> {
    if rects.is_empty() {
        return Vec::new();
    }
    let centers = centers(rects);
    let mut clusters = vec![Cluster { members: Vec::new() }; centers.len()];
    for r in rects {
        clusters[nearest(&centers, r).0].members.push(*r);
    }
    clusters
}
