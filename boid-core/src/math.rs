//! Float helpers that route to `std` or `libm` depending on the build.

pub(crate) const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub(crate) const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

#[inline]
pub(crate) fn sqrt(x: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        x.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrtf(x)
    }
}

#[inline]
pub(crate) fn sin_cos(radians: f32) -> (f32, f32) {
    #[cfg(feature = "std")]
    {
        radians.sin_cos()
    }
    #[cfg(not(feature = "std"))]
    {
        (libm::sinf(radians), libm::cosf(radians))
    }
}

#[inline]
pub(crate) fn atan2(y: f32, x: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        y.atan2(x)
    }
    #[cfg(not(feature = "std"))]
    {
        libm::atan2f(y, x)
    }
}
