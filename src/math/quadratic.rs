/// Real roots of `a*t^2 + b*t + c = 0`, in ascending order.
///
/// A zero leading coefficient falls back to the linear equation. A zero
/// discriminant yields one root. Comparisons against zero are exact.
#[must_use]
pub fn real_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a == 0.0 {
        if b == 0.0 {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    if disc == 0.0 {
        return vec![-b / (2.0 * a)];
    }

    let sqrt_disc = disc.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    if t1 <= t2 {
        vec![t1, t2]
    } else {
        vec![t2, t1]
    }
}

/// Roots of `a2*t^2 + 2*a1*t + a0 = 0` using the reduced discriminant
/// `a1^2 - a0*a2`, in ascending order.
#[must_use]
pub fn reduced_roots(a2: f64, a1: f64, a0: f64) -> Vec<f64> {
    if a2 == 0.0 {
        if a1 == 0.0 {
            return Vec::new();
        }
        return vec![-a0 / (2.0 * a1)];
    }

    let disc = a1 * a1 - a0 * a2;
    if disc < 0.0 {
        return Vec::new();
    }
    if disc == 0.0 {
        return vec![-a1 / a2];
    }

    let sqrt_disc = disc.sqrt();
    let t1 = (-a1 - sqrt_disc) / a2;
    let t2 = (-a1 + sqrt_disc) / a2;
    if t1 <= t2 {
        vec![t1, t2]
    } else {
        vec![t2, t1]
    }
}
