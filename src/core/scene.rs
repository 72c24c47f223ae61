use log::warn;
use crate::stat_counter;
use crate::core::common::{Float, INFINITY, RAY_EPSILON, SHADOW_EPSILON};
use crate::core::ddf::{Ddf, AREA_POSITION};
use crate::core::error::BptError;
use crate::core::geometry::ray::Ray;
use crate::core::interaction::{SurfaceInteraction, SurfacePoint, ObjectChain};
use crate::core::light::{LightSource, LightPosQuery, LightPosSample, LightPosition};
use crate::core::material::{Material, Materials};
use crate::core::memory::ScratchArena;
use crate::core::reflection::NullDdf;
use crate::core::sampling::Distribution1D;
use crate::core::shape::{Shape, Shapes};
use crate::core::spectrum::{SampledSpectrum, WavelengthSamples};
use crate::lights::diffuse::DiffuseAreaEmitter;
use crate::lights::environment::EnvironmentEmitter;

stat_counter!("Scene/Regular ray intersection tests", nintersection_tests);
stat_counter!("Scene/Shadow ray intersection tests", nshadow_tests);

pub fn init_stats() {
    nintersection_tests::init();
    nshadow_tests::init();
}

/// Nearest-hit queries against the scene geometry.
pub trait Intersector {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction>;
    fn test_visibility(&self, p0: &SurfacePoint, p1: &SurfacePoint, time: Float) -> bool;
}

/// Scattering and emission at points returned by an `Intersector`.
pub trait ScatterSource {
    fn create_bsdf<'a>(
        &self, pt: &SurfacePoint, wls: &WavelengthSamples,
        arena: &'a ScratchArena) -> Result<&'a dyn Ddf, BptError>;
    fn is_emitting(&self, pt: &SurfacePoint) -> bool;
    fn emittance(&self, pt: &SurfacePoint, wls: &WavelengthSamples) -> SampledSpectrum;
    fn create_edf<'a>(
        &self, pt: &SurfacePoint, wls: &WavelengthSamples,
        arena: &'a ScratchArena) -> Result<&'a dyn Ddf, BptError>;
    /// Density of having chosen `pt` as a light origin, in area measure.
    fn evaluate_area_pdf(&self, pt: &SurfacePoint) -> Float;
}

/// Everything the light-transport core needs from a scene.
pub trait RenderScene: Intersector + ScatterSource + LightSource + Sync {}

impl<T: Intersector + ScatterSource + LightSource + Sync> RenderScene for T {}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub shape   : Shapes,
    pub material: Materials,
    pub emitter : Option<DiffuseAreaEmitter>
}

impl SceneObject {
    pub fn new(shape: Shapes, material: Materials, emitter: Option<DiffuseAreaEmitter>) -> Self {
        Self { shape, material, emitter }
    }
}

/// Flat list of objects searched linearly, with an optional environment
/// behind everything. Emitters are selected in proportion to their power.
pub struct Scene {
    objects         : Vec<SceneObject>,
    environment     : Option<EnvironmentEmitter>,
    light_objects   : Vec<usize>,
    light_index     : Vec<Option<usize>>,
    light_distrib   : Distribution1D
}

impl Scene {
    pub fn new(objects: Vec<SceneObject>, environment: Option<EnvironmentEmitter>) -> Self {
        let mut light_objects = Vec::new();
        let mut light_index = vec![None; objects.len()];
        let mut power = Vec::new();

        for (i, obj) in objects.iter().enumerate() {
            if let Some(ref e) = obj.emitter {
                light_index[i] = Some(light_objects.len());
                light_objects.push(i);
                power.push(e.emittance.luminance().max(0.0) * obj.shape.area());
            }
        }

        if light_objects.is_empty() && environment.is_none() {
            warn!("Scene has no emitters; the image will be black");
        }

        Self {
            objects,
            environment,
            light_objects,
            light_index,
            light_distrib: Distribution1D::new(power)
        }
    }

    pub fn objects(&self) -> &[SceneObject] { &self.objects }

    fn object(&self, pt: &SurfacePoint) -> Result<Option<&SceneObject>, BptError> {
        match pt.obj.leaf() {
            None => Ok(None),
            Some(id) => self.objects
                .get(id as usize)
                .map(Some)
                .ok_or(BptError::ObjectMismatch { object: id, count: self.objects.len() })
        }
    }

    fn occluded(&self, ray: &Ray) -> bool {
        self.objects.iter().any(|o| o.shape.intersect(ray).is_some())
    }
}

impl Intersector for Scene {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        nintersection_tests::inc();
        let mut r = *ray;
        let mut closest = None;

        for (i, obj) in self.objects.iter().enumerate() {
            if let Some(hit) = obj.shape.intersect(&r) {
                r.t_max = hit.t;
                closest = Some((i, hit));
            }
        }

        match closest {
            Some((i, hit)) => Some(SurfaceInteraction {
                pt: SurfacePoint::new(hit.p, hit.n, ObjectChain::root(i as u32)),
                dist: hit.t * ray.d.length(),
                time: ray.time
            }),
            None if self.environment.is_some() => Some(SurfaceInteraction {
                pt: SurfacePoint::at_infinity(&ray.d.normalize(), ObjectChain::default()),
                dist: INFINITY,
                time: ray.time
            }),
            None => None
        }
    }

    fn test_visibility(&self, p0: &SurfacePoint, p1: &SurfacePoint, time: Float) -> bool {
        nshadow_tests::inc();

        let (from, to) = if p0.at_infinity { (p1, p0) } else { (p0, p1) };
        if from.at_infinity { return false; }

        let (dir, dist2) = to.direction_from(&from.p);
        let t_max = if to.at_infinity { INFINITY } else { dist2.sqrt() * (1.0 - SHADOW_EPSILON) };
        let ray = Ray::new(&from.p, &dir, RAY_EPSILON, t_max, time);

        !self.occluded(&ray)
    }
}

impl ScatterSource for Scene {
    fn create_bsdf<'a>(
        &self, pt: &SurfacePoint, wls: &WavelengthSamples,
        arena: &'a ScratchArena) -> Result<&'a dyn Ddf, BptError> {
        match self.object(pt)? {
            Some(obj) => obj.material.create_bsdf(wls, arena),
            None => {
                let null = arena.alloc(NullDdf)?;
                Ok(null)
            }
        }
    }

    fn is_emitting(&self, pt: &SurfacePoint) -> bool {
        match self.object(pt) {
            Ok(Some(obj)) => obj.emitter.is_some(),
            Ok(None) => pt.at_infinity && self.environment.is_some(),
            Err(_) => false
        }
    }

    fn emittance(&self, pt: &SurfacePoint, wls: &WavelengthSamples) -> SampledSpectrum {
        match self.object(pt) {
            Ok(Some(obj)) => obj.emitter.as_ref().map_or(SampledSpectrum::zero(), |e| e.emittance(wls)),
            Ok(None) => self.environment.as_ref().map_or(SampledSpectrum::zero(), |e| e.emittance(wls)),
            Err(_) => SampledSpectrum::zero()
        }
    }

    fn create_edf<'a>(
        &self, pt: &SurfacePoint, _wls: &WavelengthSamples,
        arena: &'a ScratchArena) -> Result<&'a dyn Ddf, BptError> {
        match self.object(pt)? {
            Some(SceneObject { emitter: Some(e), .. }) => e.create_edf(arena),
            Some(_) => {
                let null = arena.alloc(NullDdf)?;
                Ok(null)
            }
            None => match self.environment {
                Some(ref env) => env.create_edf(arena),
                None => {
                    let null = arena.alloc(NullDdf)?;
                    Ok(null)
                }
            }
        }
    }

    fn evaluate_area_pdf(&self, pt: &SurfacePoint) -> Float {
        let id = match pt.obj.leaf() {
            Some(id) => id as usize,
            None => return 0.0
        };

        match (self.light_index.get(id).copied().flatten(), self.objects.get(id)) {
            (Some(li), Some(obj)) => self.light_distrib.discrete_pdf(li) / obj.shape.area(),
            _ => 0.0
        }
    }
}

impl LightSource for Scene {
    fn sample_light_position<'a>(
        &self, query: &LightPosQuery, smp: &LightPosSample,
        arena: &'a ScratchArena) -> Result<Option<LightPosition<'a>>, BptError> {
        if self.light_objects.is_empty() { return Ok(None); }

        let (li, light_prob, _) = self.light_distrib.sample_discrete(smp.u_light);
        if light_prob == 0.0 { return Ok(None); }

        let id = self.light_objects[li];
        let obj = &self.objects[id];
        let emitter = match obj.emitter {
            Some(ref e) => e,
            None => return Err(BptError::ObjectMismatch { object: id as u32, count: self.objects.len() })
        };
        let (p, n) = obj.shape.sample(&smp.u_pos);

        Ok(Some(LightPosition {
            pt: SurfacePoint::new(p, n, ObjectChain::root(id as u32)),
            area_pdf: light_prob / obj.shape.area(),
            pos_type: AREA_POSITION,
            le0: emitter.emittance(&query.wls),
            edf: emitter.create_edf(arena)?
        }))
    }
}
