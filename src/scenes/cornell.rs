use log::info;
use crate::cameras::perspective::PerspectiveCamera;
use crate::core::common::Float;
use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::scene::{Scene, SceneObject};
use crate::core::spectrum::RgbSpectrum;
use crate::lights::diffuse::DiffuseAreaEmitter;
use crate::lights::environment::EnvironmentEmitter;
use crate::materials::glass::GlassMaterial;
use crate::materials::matte::MatteMaterial;
use crate::materials::mirror::MirrorMaterial;
use crate::shapes::rectangle::Rectangle;
use crate::shapes::sphere::Sphere;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CornellOptions {
    pub glass_sphere    : bool,
    pub mirror_sphere   : bool,
    /// Cauchy `b` coefficient of the glass; 0 disables dispersion.
    pub dispersion      : Float,
    /// Radiant exitance of the ceiling light.
    pub light_power     : Float,
    /// Replaces the front opening with a constant sky of this radiance.
    pub sky             : Option<Float>
}

impl Default for CornellOptions {
    fn default() -> Self {
        Self {
            glass_sphere: true,
            mirror_sphere: true,
            dispersion: 0.01,
            light_power: 40.0,
            sky: None
        }
    }
}

fn wall(corner: (Float, Float, Float), e1: (Float, Float, Float), e2: (Float, Float, Float)) -> Rectangle {
    Rectangle::new(
        Point3f::new(corner.0, corner.1, corner.2),
        Vector3f::new(e1.0, e1.1, e1.2),
        Vector3f::new(e2.0, e2.1, e2.2))
}

fn matte(r: Float, g: Float, b: Float) -> MatteMaterial {
    MatteMaterial::new(RgbSpectrum::new(r, g, b))
}

/// Box spanning `[-1, 1] x [0, 2] x [-1, 1]`, open toward +z, with a square
/// light in the ceiling. Every wall normal points into the box.
pub fn cornell_box(width: usize, height: usize, opts: &CornellOptions) -> (Scene, PerspectiveCamera) {
    let white = || matte(0.75, 0.75, 0.75);
    let mut objects = vec![
        // floor, ceiling, back
        SceneObject::new(wall((-1.0, 0.0, -1.0), (0.0, 0.0, 2.0), (2.0, 0.0, 0.0)).into(), white().into(), None),
        SceneObject::new(wall((-1.0, 2.0, -1.0), (2.0, 0.0, 0.0), (0.0, 0.0, 2.0)).into(), white().into(), None),
        SceneObject::new(wall((-1.0, 0.0, -1.0), (2.0, 0.0, 0.0), (0.0, 2.0, 0.0)).into(), white().into(), None),
        // left (red), right (green)
        SceneObject::new(
            wall((-1.0, 0.0, -1.0), (0.0, 2.0, 0.0), (0.0, 0.0, 2.0)).into(),
            matte(0.75, 0.1, 0.1).into(), None),
        SceneObject::new(
            wall((1.0, 0.0, -1.0), (0.0, 0.0, 2.0), (0.0, 2.0, 0.0)).into(),
            matte(0.1, 0.75, 0.1).into(), None),
        // ceiling light
        SceneObject::new(
            wall((-0.25, 1.98, -0.25), (0.5, 0.0, 0.0), (0.0, 0.0, 0.5)).into(),
            matte(0.0, 0.0, 0.0).into(),
            Some(DiffuseAreaEmitter::new(RgbSpectrum::grey(opts.light_power))))
    ];

    if opts.glass_sphere {
        objects.push(SceneObject::new(
            Sphere::new(Point3f::new(-0.45, 0.35, -0.2), 0.35).into(),
            GlassMaterial::new(
                RgbSpectrum::grey(1.0), RgbSpectrum::grey(1.0), 1.5, opts.dispersion).into(),
            None));
    }
    if opts.mirror_sphere {
        objects.push(SceneObject::new(
            Sphere::new(Point3f::new(0.45, 0.35, 0.3), 0.35).into(),
            MirrorMaterial::new(RgbSpectrum::grey(0.9)).into(),
            None));
    }

    let environment = opts.sky.map(|l| EnvironmentEmitter::new(RgbSpectrum::grey(l)));

    info!("Built Cornell box with {} objects", objects.len());

    let camera = PerspectiveCamera::new(
        Point3f::new(0.0, 1.0, 3.6), Point3f::new(0.0, 1.0, 0.0), Vector3f::new(0.0, 1.0, 0.0),
        40.0, width, height);

    (Scene::new(objects, environment), camera)
}
