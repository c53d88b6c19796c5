//! Joint angle computation from 2D landmark positions.

/// A 2D position in normalized image coordinates.
pub type Point = [f32; 2];

/// Computes the angle at vertex `b` formed by the points `a` and `c`, in
/// degrees.
///
/// The result is folded into `[0, 180]`, so traversal direction does not
/// matter: `joint_angle(a, b, c) == joint_angle(c, b, a)`. For an arm this
/// means passing (shoulder, elbow, wrist) yields ~180° fully extended and
/// ~0° fully folded.
///
/// Returns `None` when either limb vector has zero length (`a == b` or
/// `c == b`) or any input is non-finite — a degenerate pose reading, not an
/// angle.
pub fn joint_angle(a: Point, b: Point, c: Point) -> Option<f32> {
    if [a, b, c].iter().flatten().any(|v| !v.is_finite()) {
        return None;
    }

    let ba = [a[0] - b[0], a[1] - b[1]];
    let bc = [c[0] - b[0], c[1] - b[1]];
    if (ba[0] == 0.0 && ba[1] == 0.0) || (bc[0] == 0.0 && bc[1] == 0.0) {
        return None;
    }

    let raw = bc[1].atan2(bc[0]) - ba[1].atan2(ba[0]);
    let mut degrees = raw.to_degrees().abs();
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }

    Some(degrees)
}
