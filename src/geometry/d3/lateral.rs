use tracing::{debug, trace};

use super::{Intersection, LineString, Object, Ray};
use crate::error::Result;
use crate::math::Point3;

/// How a double hit on one lateral ray is split between the two strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum HitSplit {
    /// The entry point (first along the ray) opens the second string and
    /// the remaining hits extend the first one. Used for spheres.
    EntryApart,
    /// The hit closest to the apex extends the first string and the next
    /// distinct hit the second one. Used for ellipsoids.
    ClosestToApex,
}

/// Traces each lateral ray against a quadric and chains the hits into
/// line strings.
///
/// Single hits always extend the first string. Both strings are returned,
/// first string first, only when `only_in_sight` is off; otherwise the
/// first non-empty string wins.
pub(super) fn trace_footprint<F>(
    apex: &Point3,
    rays: &[Ray],
    only_in_sight: bool,
    split: HitSplit,
    mut hit: F,
) -> Result<Intersection>
where
    F: FnMut(&Ray) -> Result<Intersection>,
{
    let mut first = Vec::new();
    let mut second = Vec::new();

    for (index, ray) in rays.iter().enumerate() {
        let intersection = hit(ray)?;
        match intersection.objects() {
            [Object::Point(point)] => first.push(*point),
            [Object::PointSet(points)] => match split {
                HitSplit::EntryApart => {
                    let mut hits = points.iter();
                    if let Some(entry) = hits.next() {
                        second.push(*entry);
                    }
                    first.extend(hits);
                }
                HitSplit::ClosestToApex => {
                    let closest = points.point_closest_to(apex)?;
                    first.push(closest);
                    if let Some(other) = points.iter().find(|point| **point != closest) {
                        second.push(*other);
                    }
                }
            },
            _ => {}
        }
        trace!(ray = index, kind = %intersection.kind(), "lateral ray traced");
    }

    debug!(
        rays = rays.len(),
        first = first.len(),
        second = second.len(),
        only_in_sight,
        ?split,
        "lateral footprint collected"
    );

    match (first.is_empty(), second.is_empty()) {
        (false, false) if !only_in_sight => Intersection::line_string(LineString::new(first))
            .concatenated(&Intersection::line_string(LineString::new(second))),
        (false, _) => Ok(Intersection::line_string(LineString::new(first))),
        (true, false) => Ok(Intersection::line_string(LineString::new(second))),
        (true, true) => Ok(Intersection::empty()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::d3::PointSet;
    use crate::math::Vector3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn rays() -> Vec<Ray> {
        vec![
            Ray::new(p(0.0, 0.0, 0.0), Vector3::z()).unwrap(),
            Ray::new(p(0.0, 0.0, 0.0), Vector3::x()).unwrap(),
        ]
    }

    /// Every ray crosses the surface at distance 1 then 3 along itself.
    fn double_hits(ray: &Ray) -> Result<Intersection> {
        Ok(Intersection::point_set(PointSet::new(vec![
            ray.point_at(1.0),
            ray.point_at(3.0),
        ])))
    }

    fn strings(intersection: &Intersection) -> Vec<&LineString> {
        intersection
            .objects()
            .iter()
            .map(|object| match object {
                Object::LineString(line) => line,
                other => panic!("unexpected {}", other.kind_name()),
            })
            .collect()
    }

    #[test]
    fn entry_points_form_the_second_string() {
        let footprint = trace_footprint(
            &p(0.0, 0.0, 0.0),
            &rays(),
            false,
            HitSplit::EntryApart,
            double_hits,
        )
        .unwrap();
        let lines = strings(&footprint);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].points(), &[p(0.0, 0.0, 3.0), p(3.0, 0.0, 0.0)]);
        assert_eq!(lines[1].points(), &[p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0)]);
    }

    #[test]
    fn closest_points_form_the_first_string() {
        let footprint = trace_footprint(
            &p(0.0, 0.0, 0.0),
            &rays(),
            false,
            HitSplit::ClosestToApex,
            double_hits,
        )
        .unwrap();
        let lines = strings(&footprint);
        assert_eq!(lines[0].points(), &[p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0)]);
        assert_eq!(lines[1].points(), &[p(0.0, 0.0, 3.0), p(3.0, 0.0, 0.0)]);
    }

    #[test]
    fn in_sight_keeps_a_single_string() {
        let footprint = trace_footprint(
            &p(0.0, 0.0, 0.0),
            &rays(),
            true,
            HitSplit::ClosestToApex,
            double_hits,
        )
        .unwrap();
        assert_eq!(strings(&footprint).len(), 1);

        let missed = trace_footprint(&p(0.0, 0.0, 0.0), &rays(), false, HitSplit::EntryApart, |_| {
            Ok(Intersection::empty())
        })
        .unwrap();
        assert!(missed.is_empty());
    }
}
