// fb-core/src/units.rs

use uom::si::f64::{
    Angle as UomAngle, Length as UomLength, Mass as UomMass,
    MomentOfInertia as UomMomentOfInertia,
};

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type MomentOfInertia = UomMomentOfInertia;

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn kgm2(v: f64) -> MomentOfInertia {
    use uom::si::moment_of_inertia::kilogram_square_meter;
    MomentOfInertia::new::<kilogram_square_meter>(v)
}

#[inline]
pub fn deg_to_rad(v: f64) -> f64 {
    use uom::si::angle::radian;
    deg(v).get::<radian>()
}

#[inline]
pub fn rad_to_deg(v: f64) -> f64 {
    use uom::si::angle::degree;
    rad(v).get::<degree>()
}

#[inline]
pub fn kg_m2(i: MomentOfInertia) -> f64 {
    use uom::si::moment_of_inertia::kilogram_square_meter;
    i.get::<kilogram_square_meter>()
}
