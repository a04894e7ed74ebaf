//! Geometry utilities for symbol outlines

use crate::models::Point;

/// Tolerance for orientation tests on pixel-scale coordinates
const EPS: f32 = 1e-4;

/// Convex hull by Andrew's monotone chain.
///
/// Returns hull vertices in a consistent winding starting from the
/// lowest-x (then lowest-y) point. Collinear and duplicate points are
/// dropped, so the hull never has more vertices than the input.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    pts.dedup();

    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && lower[lower.len() - 2].cross(&lower[lower.len() - 1], p) <= EPS {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && upper[upper.len() - 2].cross(&upper[upper.len() - 1], p) <= EPS {
            upper.pop();
        }
        upper.push(*p);
    }

    // Last point of each chain is the first point of the other
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// True if the closed polygon turns the same way at every vertex
pub fn is_convex(polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f32;
    for i in 0..n {
        let cross = polygon[i].cross(&polygon[(i + 1) % n], &polygon[(i + 2) % n]);
        if cross.abs() <= EPS {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

/// True if `p` lies inside or on the boundary of a convex polygon
pub fn convex_contains(polygon: &[Point], p: &Point) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f32;
    for i in 0..n {
        let cross = polygon[i].cross(&polygon[(i + 1) % n], p);
        if cross.abs() <= EPS {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Polygon drawn for a located symbol.
///
/// More than four vertices are replaced by their convex hull; four or fewer
/// are returned unchanged.
pub fn outline_polygon(polygon: &[Point]) -> Vec<Point> {
    if polygon.len() > 4 {
        convex_hull(polygon)
    } else {
        polygon.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f32, f32)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_hull_square_with_interior_points() {
        let input = pts(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (5.0, 5.0),
            (10.0, 10.0),
            (3.0, 7.0),
            (0.0, 10.0),
        ]);
        let hull = convex_hull(&input);
        assert_eq!(hull.len(), 4);
        assert!(is_convex(&hull));
        for p in &input {
            assert!(convex_contains(&hull, p));
        }
    }

    #[test]
    fn test_hull_drops_collinear_and_duplicates() {
        let input = pts(&[
            (0.0, 0.0),
            (5.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (10.0, 10.0),
            (0.0, 10.0),
        ]);
        let hull = convex_hull(&input);
        assert_eq!(hull.len(), 4);
    }

    #[test]
    fn test_hull_degenerate() {
        assert_eq!(convex_hull(&pts(&[(1.0, 1.0), (1.0, 1.0)])).len(), 1);
        let line = convex_hull(&pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]));
        assert!(line.len() <= 3);
    }

    #[test]
    fn test_is_convex() {
        assert!(is_convex(&pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])));
        // Arrow head with a reflex vertex
        assert!(!is_convex(&pts(&[
            (0.0, 0.0),
            (4.0, 2.0),
            (0.0, 4.0),
            (1.0, 2.0)
        ])));
    }

    #[test]
    fn test_outline_keeps_small_polygons() {
        let quad = pts(&[(0.0, 0.0), (4.0, 2.0), (0.0, 4.0), (1.0, 2.0)]);
        assert_eq!(outline_polygon(&quad), quad);
    }

    #[test]
    fn test_outline_hulls_large_polygons() {
        let star = pts(&[
            (5.0, 0.0),
            (6.0, 4.0),
            (10.0, 5.0),
            (6.0, 6.0),
            (5.0, 10.0),
            (4.0, 6.0),
            (0.0, 5.0),
            (4.0, 4.0),
        ]);
        let outline = outline_polygon(&star);
        assert_eq!(outline.len(), 4);
        assert!(is_convex(&outline));
        assert!(star.iter().all(|p| convex_contains(&outline, p)));
    }
}
