//! Pure spline math: open Catmull-Rom curves with arc-length sampling.
//!
//! Curves are evaluated through their control points. Endpoints get
//! phantom neighbours reflected outward so the curve starts and ends
//! exactly on the first and last control point. The centripetal variant
//! parameterizes each segment by the square root of its chord length,
//! which avoids cusps and self-intersections on tight spirals.

use crate::Vec3;

/// Knot parameterization of a Catmull-Rom curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveKind {
    Uniform,
    /// Chord-length exponent 0.5
    Centripetal,
}

/// Uniform Catmull-Rom interpolation between four points.
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    Vec3::new(
        catmull_rom_scalar(p0.x, p1.x, p2.x, p3.x, t),
        catmull_rom_scalar(p0.y, p1.y, p2.y, p3.y, t),
        catmull_rom_scalar(p0.z, p1.z, p2.z, p3.z, t),
    )
}

/// Uniform Catmull-Rom interpolation for a single scalar value.
pub fn catmull_rom_scalar(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Non-uniform Catmull-Rom for one axis, expressed as a cubic Hermite segment.
#[allow(clippy::too_many_arguments)]
fn nonuniform_scalar(x0: f32, x1: f32, x2: f32, x3: f32, dt0: f32, dt1: f32, dt2: f32, w: f32) -> f32 {
    let mut t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
    let mut t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
    t1 *= dt1;
    t2 *= dt1;

    let c0 = x1;
    let c1 = t1;
    let c2 = -3.0 * x1 + 3.0 * x2 - 2.0 * t1 - t2;
    let c3 = 2.0 * x1 - 2.0 * x2 + t1 + t2;
    let w2 = w * w;
    c0 + c1 * w + c2 * w2 + c3 * w2 * w
}

/// An open Catmull-Rom curve through a list of control points.
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    kind: CurveKind,
    /// Cumulative arc length at evenly spaced parameter values
    arc_lengths: Vec<f32>,
}

impl CatmullRomCurve {
    /// Number of parameter divisions used for the arc-length table
    pub const ARC_DIVISIONS: usize = 200;

    /// Build a curve. Returns `None` with fewer than two control points.
    pub fn new(points: Vec<Vec3>, kind: CurveKind) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let mut curve = Self {
            points,
            kind,
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = curve.build_arc_lengths(Self::ARC_DIVISIONS);
        Some(curve)
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    /// Total approximate length of the curve
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Evaluate at parameter `t` in [0, 1] (uniform in control-point index, not length).
    pub fn point(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        let scaled = (n - 1) as f32 * t.clamp(0.0, 1.0);
        let mut seg = scaled.floor() as usize;
        let mut weight = scaled - seg as f32;
        if seg >= n - 1 {
            seg = n - 2;
            weight = 1.0;
        }

        let p1 = self.points[seg];
        let p2 = self.points[seg + 1];
        let p0 = if seg > 0 {
            self.points[seg - 1]
        } else {
            p1 * 2.0 - p2
        };
        let p3 = if seg + 2 < n {
            self.points[seg + 2]
        } else {
            p2 * 2.0 - p1
        };

        match self.kind {
            CurveKind::Uniform => catmull_rom(p0, p1, p2, p3, weight),
            CurveKind::Centripetal => {
                let mut dt0 = p0.distance(&p1).sqrt();
                let mut dt1 = p1.distance(&p2).sqrt();
                let mut dt2 = p2.distance(&p3).sqrt();
                if dt1 < 1e-4 {
                    dt1 = 1.0;
                }
                if dt0 < 1e-4 {
                    dt0 = dt1;
                }
                if dt2 < 1e-4 {
                    dt2 = dt1;
                }
                Vec3::new(
                    nonuniform_scalar(p0.x, p1.x, p2.x, p3.x, dt0, dt1, dt2, weight),
                    nonuniform_scalar(p0.y, p1.y, p2.y, p3.y, dt0, dt1, dt2, weight),
                    nonuniform_scalar(p0.z, p1.z, p2.z, p3.z, dt0, dt1, dt2, weight),
                )
            }
        }
    }

    /// Evaluate at arc-length fraction `u` in [0, 1].
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.u_to_t(u))
    }

    /// Unit tangent at arc-length fraction `u`, via finite difference.
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        let t = self.u_to_t(u);
        let delta = 1e-4;
        let t1 = (t - delta).max(0.0);
        let t2 = (t + delta).min(1.0);
        (self.point(t2) - self.point(t1)).normalized()
    }

    /// `divisions + 1` points spaced evenly by arc length, including both ends.
    pub fn spaced_points(&self, divisions: usize) -> Vec<Vec3> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|i| self.point_at(i as f32 / divisions as f32))
            .collect()
    }

    fn build_arc_lengths(&self, divisions: usize) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut total = 0.0_f32;
        let mut prev = self.point(0.0);
        lengths.push(0.0);
        for i in 1..=divisions {
            let current = self.point(i as f32 / divisions as f32);
            total += current.distance(&prev);
            lengths.push(total);
            prev = current;
        }
        lengths
    }

    /// Map an arc-length fraction to the curve parameter.
    fn u_to_t(&self, u: f32) -> f32 {
        let lengths = &self.arc_lengths;
        let total = self.length();
        if total <= 0.0 {
            return u.clamp(0.0, 1.0);
        }
        let target = u.clamp(0.0, 1.0) * total;

        // First index whose cumulative length reaches the target
        let idx = lengths.partition_point(|&l| l < target);
        if idx == 0 {
            return 0.0;
        }
        let divisions = lengths.len() - 1;
        if idx > divisions {
            return 1.0;
        }

        let before = lengths[idx - 1];
        let segment = lengths[idx] - before;
        let fraction = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };
        ((idx - 1) as f32 + fraction) / divisions as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_line() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn too_few_points_is_none() {
        assert!(CatmullRomCurve::new(vec![Vec3::ZERO], CurveKind::Centripetal).is_none());
    }

    #[test]
    fn curve_passes_through_endpoints() {
        for kind in [CurveKind::Uniform, CurveKind::Centripetal] {
            let curve = CatmullRomCurve::new(straight_line(), kind).unwrap();
            assert!(curve.point(0.0).distance(&Vec3::ZERO) < 1e-4);
            assert!(curve.point(1.0).distance(&Vec3::new(10.0, 0.0, 0.0)) < 1e-4);
        }
    }

    #[test]
    fn curve_passes_through_interior_points() {
        let curve = CatmullRomCurve::new(straight_line(), CurveKind::Centripetal).unwrap();
        let p = curve.point(1.0 / 3.0);
        assert!(p.distance(&Vec3::new(1.0, 0.0, 0.0)) < 1e-3);
    }

    #[test]
    fn arc_length_spacing_is_even() {
        let pts: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32 * 2.5, 0.0, 0.0)).collect();
        let curve = CatmullRomCurve::new(pts, CurveKind::Centripetal).unwrap();
        assert!((curve.length() - 10.0).abs() < 0.05);

        let pts = curve.spaced_points(10);
        assert_eq!(pts.len(), 11);
        for pair in pts.windows(2) {
            let step = pair[0].distance(&pair[1]);
            assert!((step - 1.0).abs() < 0.05, "uneven step {step}");
        }
    }

    #[test]
    fn tangent_follows_line() {
        let curve = CatmullRomCurve::new(straight_line(), CurveKind::Uniform).unwrap();
        let t = curve.tangent_at(0.5);
        assert!((t.x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn uniform_scalar_hits_control_points() {
        assert!((catmull_rom_scalar(0.0, 1.0, 2.0, 3.0, 0.0) - 1.0).abs() < 1e-6);
        assert!((catmull_rom_scalar(0.0, 1.0, 2.0, 3.0, 1.0) - 2.0).abs() < 1e-6);
    }
}
