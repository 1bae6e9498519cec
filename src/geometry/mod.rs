pub mod curve;
pub mod surface;
mod surface_type;

pub use curve::{Circle, Curve, CurveProjection, Line};
pub use surface::{Cylinder, Plane, Sphere, Surface, SurfaceProjection};
pub use surface_type::SurfaceType;
