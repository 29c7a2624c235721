//! Angular to planar coordinate transform.
//!
//! Measured samples are addressed by a polar angle `theta` and an azimuth
//! `phi` (both in degrees). For placement and picking they are laid out on a
//! unit disk: the distance from the centre encodes `theta` linearly
//! (90° sits on the rim) and the direction encodes `phi`.

/// Polar angle (degrees) mapped onto the rim of the unit disk.
pub const RIM_THETA_DEG: f32 = 90.0;

/// Maps `(theta, phi)` in degrees to a point on the unit disk.
///
/// The mapping is azimuthal equidistant: `r = theta / 90`,
/// `(x, y) = (r cos phi, r sin phi)`.
#[inline]
#[must_use]
pub fn project_angles(theta_deg: f32, phi_deg: f32) -> [f32; 2] {
    let r = theta_deg / RIM_THETA_DEG;
    let (sin_phi, cos_phi) = phi_deg.to_radians().sin_cos();
    [r * cos_phi, r * sin_phi]
}
