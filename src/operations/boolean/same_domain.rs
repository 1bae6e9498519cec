use std::collections::HashMap;

use tracing::debug;

use crate::config::Tolerances;
use crate::error::Result;
use crate::math::{is_parallel, Point3, Vector3};
use crate::topology::{FaceId, GeometryKernel};

use super::interference::ShapeIndex;
use super::registry::ShapeRegistry;

/// Decides whether two faces lie on the same underlying surface.
///
/// Recorded groups in the registry are consulted first. Otherwise two faces
/// of the same canonical surface type that both pass through the sample
/// point are compared by their normals there; parallel or opposite normals
/// make them same-domain, which is then recorded in the registry.
///
/// Verdicts are memoized per session, so a pair is answered the same way
/// every time it is asked.
#[derive(Debug, Clone)]
pub struct SameDomainDetector {
    angular: f64,
    distance: f64,
    verdicts: HashMap<(ShapeIndex, ShapeIndex), bool>,
}

impl SameDomainDetector {
    #[must_use]
    pub fn new(tolerances: &Tolerances) -> Self {
        Self {
            angular: tolerances.angular,
            distance: tolerances.distance,
            verdicts: HashMap::new(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if either index is unregistered, or if recording a
    /// positive verdict overflows a same-domain group.
    pub fn is_same_domain<K: GeometryKernel>(
        &mut self,
        registry: &mut ShapeRegistry,
        kernel: &K,
        a: ShapeIndex,
        b: ShapeIndex,
        at: &Point3,
    ) -> Result<bool> {
        registry.shape(b)?;
        if registry.same_domain(a)?.contains(&b) {
            return Ok(true);
        }
        if a == b {
            return Ok(false);
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&verdict) = self.verdicts.get(&key) {
            return Ok(verdict);
        }
        let Some(verdict) = self.compare(registry, kernel, a, b, at)? else {
            return Ok(false);
        };
        self.verdicts.insert(key, verdict);
        if verdict {
            registry.add_same_domain(a, b)?;
            debug!(%a, %b, "faces found same-domain");
        }
        Ok(verdict)
    }

    /// Number of memoized verdicts.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.verdicts.len()
    }

    /// `None` when the sample point does not lie on both faces.
    fn compare<K: GeometryKernel>(
        &self,
        registry: &ShapeRegistry,
        kernel: &K,
        a: ShapeIndex,
        b: ShapeIndex,
        at: &Point3,
    ) -> Result<Option<bool>> {
        let (Ok(fa), Ok(fb)) = (registry.face_id(a), registry.face_id(b)) else {
            return Ok(Some(false));
        };
        let kind = kernel.surface_type(fa)?;
        if !kind.is_canonical() || kernel.surface_type(fb)? != kind {
            return Ok(Some(false));
        }
        let (Some(na), Some(nb)) = (self.normal_near(kernel, fa, at), self.normal_near(kernel, fb, at))
        else {
            return Ok(None);
        };
        Ok(Some(is_parallel(&na, &nb, self.angular)))
    }

    fn normal_near<K: GeometryKernel>(&self, kernel: &K, face: FaceId, at: &Point3) -> Option<Vector3> {
        let projection = kernel.project_on_face(at, face).ok()?;
        if projection.distance > self.distance {
            return None;
        }
        kernel.normal_at(face, &projection.uv).ok()
    }
}
