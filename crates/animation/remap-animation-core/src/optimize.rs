//! Keyframe decimation.
//!
//! Greedily drops keyframes whose removal keeps every original keyframe
//! within the per-axis tolerance of the curve through the remaining ones.
//! The result is best-effort; it is not guaranteed to be the smallest track
//! meeting the tolerance.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::config::OptimizeSettings;
use crate::easing::Spline;
use crate::interp::{catmull_rom, lerp_f64};
use crate::keyframe::Keyframe;
use crate::property::AnimatedProperty;
use crate::track::Track;
use crate::Result;

/// A candidate's score depends on kept keyframes up to this many positions
/// away (bridged span plus the spline spans and their control points).
const REACH: usize = 3;

/// Return a decimated copy of `track`. Tracks with fewer than three
/// keyframes are returned unchanged.
pub fn optimize(track: &Track, settings: &OptimizeSettings) -> Result<Track> {
    settings.validate()?;
    let keys = track.keyframes();
    if keys.len() < 3 {
        return Ok(track.clone());
    }

    let anchors = anchors(keys);
    let mut kept = Kept::new(keys.len());
    let mut stamps = vec![0_u32; keys.len()];
    let mut queue = BinaryHeap::new();
    for index in 1..keys.len() - 1 {
        if !anchors[index] {
            score(keys, &kept, index, stamps[index], settings, &mut queue);
        }
    }

    let mut remaining = keys.len();
    while remaining > 2 {
        let Some(candidate) = queue.pop() else {
            break;
        };
        if stamps[candidate.index] != candidate.stamp {
            continue;
        }
        let affected = kept.around(candidate.index, REACH);
        kept.unlink(candidate.index);
        stamps[candidate.index] += 1;
        remaining -= 1;
        for index in affected {
            stamps[index] += 1;
            if !anchors[index] {
                score(keys, &kept, index, stamps[index], settings, &mut queue);
            }
        }
    }

    log::debug!("optimized track: {} -> {remaining} keyframes", keys.len());
    Track::new(kept.iter().map(|i| keys[i].clone()).collect())
}

/// [`optimize`] for animated payloads; static values and point definition
/// names pass through untouched.
pub fn optimize_property(
    property: &AnimatedProperty,
    settings: &OptimizeSettings,
) -> Result<AnimatedProperty> {
    match property {
        AnimatedProperty::Animated(track) => {
            optimize(track, settings).map(AnimatedProperty::Animated)
        }
        other => {
            settings.validate()?;
            Ok(other.clone())
        }
    }
}

fn anchors(keys: &[Keyframe]) -> Vec<bool> {
    let last = keys.len() - 1;
    (0..keys.len())
        .map(|i| {
            let k = &keys[i];
            if i == 0 || i == last || k.easing().is_some() || k.has_flags() {
                return true;
            }
            let prev = &keys[i - 1];
            let next = &keys[i + 1];
            next.easing().is_some()
                || k.spline() != next.spline()
                || prev.time() == k.time()
                || next.time() == k.time()
        })
        .collect()
}

/// Doubly linked view of the keyframes still kept, by original index.
struct Kept {
    prev: Vec<Option<usize>>,
    next: Vec<Option<usize>>,
}

impl Kept {
    fn new(len: usize) -> Self {
        Self {
            prev: (0..len).map(|i| i.checked_sub(1)).collect(),
            next: (0..len).map(|i| (i + 1 < len).then_some(i + 1)).collect(),
        }
    }

    fn unlink(&mut self, index: usize) {
        let (prev, next) = (self.prev[index], self.next[index]);
        if let Some(p) = prev {
            self.next[p] = next;
        }
        if let Some(n) = next {
            self.prev[n] = prev;
        }
    }

    /// Kept keyframes within `reach` positions of `index`, excluding it.
    fn around(&self, index: usize, reach: usize) -> Vec<usize> {
        let mut out = Vec::with_capacity(2 * reach);
        let mut cursor = index;
        for _ in 0..reach {
            match self.prev[cursor] {
                Some(p) => {
                    out.push(p);
                    cursor = p;
                }
                None => break,
            }
        }
        cursor = index;
        for _ in 0..reach {
            match self.next[cursor] {
                Some(n) => {
                    out.push(n);
                    cursor = n;
                }
                None => break,
            }
        }
        out
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(0), |&i| self.next[i])
    }
}

/// Queue entry; the heap pops the smallest deviation, lowest index first.
#[derive(Copy, Clone, Debug)]
struct Candidate {
    deviation: f64,
    index: usize,
    stamp: u32,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deviation
            .total_cmp(&self.deviation)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

fn score(
    keys: &[Keyframe],
    kept: &Kept,
    index: usize,
    stamp: u32,
    settings: &OptimizeSettings,
    queue: &mut BinaryHeap<Candidate>,
) {
    if let Some(deviation) = removal_deviation(keys, kept, index, settings) {
        queue.push(Candidate {
            deviation,
            index,
            stamp,
        });
    }
}

/// Worst deviation introduced by dropping `index`, or `None` when some
/// original keyframe would leave its tolerance.
fn removal_deviation(
    keys: &[Keyframe],
    kept: &Kept,
    index: usize,
    settings: &OptimizeSettings,
) -> Option<f64> {
    let (p, n) = (kept.prev[index]?, kept.next[index]?);

    // The span that now bridges the removed keyframe.
    let before = kept.prev[p].unwrap_or(p);
    let after = kept.next[n].unwrap_or(n);
    let mut worst = span_deviation(keys, [before, p, n, after], settings)?;

    // Spline spans on either side use the removed keyframe as a control point.
    if is_spline(&keys[p]) {
        if let Some(pp) = kept.prev[p] {
            let before = kept.prev[pp].unwrap_or(pp);
            worst = worst.max(span_deviation(keys, [before, pp, p, n], settings)?);
        }
    }
    if let Some(nn) = kept.next[n].filter(|&nn| is_spline(&keys[nn])) {
        let after = kept.next[nn].unwrap_or(nn);
        worst = worst.max(span_deviation(keys, [p, n, nn, after], settings)?);
    }
    Some(worst)
}

/// Check every original keyframe strictly inside `span[1]..span[2]` against
/// the curve between them; `span[0]` and `span[3]` are the outer Catmull-Rom
/// control points.
fn span_deviation(keys: &[Keyframe], span: [usize; 4], settings: &OptimizeSettings) -> Option<f64> {
    let [before, a, b, after] = span.map(|i| keys[i].values());
    let (start, end) = (&keys[span[1]], &keys[span[2]]);
    let spline = is_spline(end);
    let duration = end.time() - start.time();

    let mut worst = 0.0_f64;
    for original in &keys[span[1] + 1..span[2]] {
        let t = if duration > 0.0 {
            (original.time() - start.time()) / duration
        } else {
            0.0
        };
        let axes = a.len().min(b.len()).min(original.values().len());
        for axis in 0..axes {
            let sampled = if spline {
                let c0 = before.get(axis).copied().unwrap_or(a[axis]);
                let c3 = after.get(axis).copied().unwrap_or(b[axis]);
                catmull_rom(c0, a[axis], b[axis], c3, t)
            } else {
                lerp_f64(a[axis], b[axis], t)
            };
            let deviation = (sampled - original.values()[axis]).abs();
            if deviation > settings.tolerance(axis) {
                return None;
            }
            worst = worst.max(deviation);
        }
    }
    Some(worst)
}

fn is_spline(k: &Keyframe) -> bool {
    k.spline() == Some(Spline::CatmullRom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track(v: serde_json::Value) -> Track {
        Track::from_raw(&v).unwrap()
    }

    #[test]
    fn collinear_points_collapse_to_end_points() {
        let t = track(json!([[0, 0], [1, 1], [2, 2], [3, 3], [4, 4]]));
        let out = optimize(&t, &OptimizeSettings::uniform(1e-9)).unwrap();
        assert_eq!(out.to_json(), json!([[0, 0], [4, 4]]));
        // Input untouched.
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn zero_tolerance_keeps_non_collinear_points() {
        let t = track(json!([[0, 0], [1, 0.25], [0, 0.5], [1, 0.75], [0, 1]]));
        let out = optimize(&t, &OptimizeSettings::uniform(0.0)).unwrap();
        assert_eq!(out, t);
    }

    #[test]
    fn eased_keyframes_and_their_predecessors_are_anchors() {
        let t = track(json!([[0, 0], [1, 0.25], [2, 0.5, "easeInQuad"], [3, 0.75], [4, 1]]));
        let out = optimize(&t, &OptimizeSettings::uniform(0.0)).unwrap();
        assert_eq!(
            out.to_json(),
            json!([[0, 0], [1, 0.25], [2, 0.5, "easeInQuad"], [4, 1]])
        );
    }

    #[test]
    fn time_ties_are_kept() {
        let t = track(json!([[0, 0], [1, 0.5], [5, 0.5], [6, 1]]));
        let out = optimize(&t, &OptimizeSettings::uniform(10.0)).unwrap();
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn per_axis_tolerance_applies() {
        // Axis 0 drifts by 0.1 at the middle keyframe, axis 1 is linear.
        let t = track(json!([[0, 0, 0], [0.1, 1, 0.5], [0, 2, 1]]));
        let tight = optimize(&t, &OptimizeSettings::per_axis(vec![0.05, 1.0])).unwrap();
        assert_eq!(tight.len(), 3);
        let loose = optimize(&t, &OptimizeSettings::per_axis(vec![0.2, 0.0])).unwrap();
        assert_eq!(loose.len(), 2);
    }

    #[test]
    fn spline_segments_use_catmull_rom() {
        let t = track(json!([
            [0, 0, "splineCatmullRom"],
            [1, 0.25, "splineCatmullRom"],
            [2, 0.5, "splineCatmullRom"],
            [3, 0.75, "splineCatmullRom"],
            [4, 1, "splineCatmullRom"]
        ]));
        let out = optimize(&t, &OptimizeSettings::default()).unwrap();
        assert!(out.len() < 5 && out.len() >= 2);
        assert_eq!(out.keyframes()[0].values(), &[0.0]);
        assert_eq!(out.keyframes()[out.len() - 1].values(), &[4.0]);
    }

    /// Straightforward rescan of every candidate per removal, used to check
    /// that the queued optimizer picks the same keyframes.
    fn rescan(track: &Track, settings: &OptimizeSettings) -> Vec<usize> {
        let keys = track.keyframes();
        let anchors = anchors(keys);
        let mut kept: Vec<usize> = (0..keys.len()).collect();
        let at = |kept: &[usize], pos: Option<usize>, or: usize| {
            pos.and_then(|p| kept.get(p).copied()).unwrap_or(or)
        };
        while kept.len() > 2 {
            let mut best: Option<(usize, f64)> = None;
            for pos in 1..kept.len() - 1 {
                if anchors[kept[pos]] {
                    continue;
                }
                let mut trial = kept.clone();
                trial.remove(pos);
                let (p, n) = (trial[pos - 1], trial[pos]);
                let mut spans = vec![[
                    at(&trial, (pos - 1).checked_sub(1), p),
                    p,
                    n,
                    at(&trial, Some(pos + 1), n),
                ]];
                if pos >= 2 && is_spline(&keys[p]) {
                    let pp = trial[pos - 2];
                    spans.push([at(&trial, (pos - 2).checked_sub(1), pp), pp, p, n]);
                }
                if pos + 1 < trial.len() && is_spline(&keys[trial[pos + 1]]) {
                    let nn = trial[pos + 1];
                    spans.push([p, n, nn, at(&trial, Some(pos + 2), nn)]);
                }
                let worst = spans
                    .into_iter()
                    .map(|span| span_deviation(keys, span, settings))
                    .try_fold(0.0_f64, |acc, d| d.map(|d| acc.max(d)));
                if let Some(d) = worst {
                    if best.map_or(true, |(_, b)| d < b) {
                        best = Some((pos, d));
                    }
                }
            }
            match best {
                Some((pos, _)) => {
                    kept.remove(pos);
                }
                None => break,
            }
        }
        kept
    }

    fn wave(n: usize, spline_from: usize) -> Track {
        let keys = (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                let a = t * std::f64::consts::TAU * 2.0;
                let mut k = Keyframe::new([a.sin(), a.cos() * 0.5, t], t * 8.0);
                if i >= spline_from {
                    k.set_spline(Some(Spline::CatmullRom));
                }
                k
            })
            .collect();
        Track::new(keys).unwrap()
    }

    #[test]
    fn queued_removals_match_a_full_rescan() {
        for (n, spline_from) in [(40, usize::MAX), (40, 0), (60, 25)] {
            let t = wave(n, spline_from);
            for tolerance in [0.01, 0.05, 0.2] {
                let settings = OptimizeSettings::uniform(tolerance);
                let expected: Vec<Keyframe> = rescan(&t, &settings)
                    .into_iter()
                    .map(|i| t.keyframes()[i].clone())
                    .collect();
                let out = optimize(&t, &settings).unwrap();
                assert_eq!(out.keyframes(), expected.as_slice(), "n={n} tol={tolerance}");
            }
        }
    }

    #[test]
    fn long_tracks_are_decimated() {
        let t = wave(4000, usize::MAX);
        let out = optimize(&t, &OptimizeSettings::default()).unwrap();
        assert!(out.len() < 200, "kept {}", out.len());
        assert_eq!(out.keyframes()[0], t.keyframes()[0]);
        assert_eq!(out.keyframes()[out.len() - 1], t.keyframes()[3999]);
    }

    #[test]
    fn static_and_named_properties_pass_through() {
        let settings = OptimizeSettings::default();
        let s = AnimatedProperty::Static(vec![1.0]);
        assert_eq!(optimize_property(&s, &settings).unwrap(), s);
        let n = AnimatedProperty::Named("x".into());
        assert_eq!(optimize_property(&n, &settings).unwrap(), n);
        assert!(optimize_property(&s, &OptimizeSettings::uniform(-1.0)).is_err());
    }
}
