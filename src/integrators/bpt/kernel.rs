use crate::core::camera::{Camera, LensPosQuery};
use crate::core::common::{Float, RenderSettings};
use crate::core::ddf::{DdfQuery, DdfSample};
use crate::core::error::BptError;
use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::ray::Ray;
use crate::core::geometry::vector::Vector3f;
use crate::core::light::LightPosQuery;
use crate::core::memory::ScratchArena;
use crate::core::sampler::LightPathSampler;
use crate::core::scene::RenderScene;
use crate::core::sensor::ImageSensor;
use crate::core::spectrum::WavelengthSamples;
use super::PixelContext;
use super::connection::connect_all;
use super::vertex::BptVertex;
use super::walker::{SubpathStart, generate_subpath};

/// Everything a worker needs to render pixels, shared by all tiles of a
/// render.
pub struct RenderJob<'r, S: ?Sized, C: ?Sized> {
    pub scene   : &'r S,
    pub camera  : &'r C,
    pub sensor  : &'r ImageSensor,
    pub settings: &'r RenderSettings
}

impl<'r, S: ?Sized, C: ?Sized> Clone for RenderJob<'r, S, C> {
    fn clone(&self) -> Self { *self }
}

impl<'r, S: ?Sized, C: ?Sized> Copy for RenderJob<'r, S, C> {}

impl<'r, S, C> RenderJob<'r, S, C>
    where S: RenderScene + ?Sized, C: Camera + ?Sized {
    pub fn new(scene: &'r S, camera: &'r C, sensor: &'r ImageSensor, settings: &'r RenderSettings) -> Self {
        Self { scene, camera, sensor, settings }
    }

    /// One light subpath, one eye subpath and all their connections for
    /// pixel `(x, y)`. Everything allocated here lives in `arena`, which the
    /// caller resets afterwards.
    pub fn render_pixel<P: LightPathSampler>(
        &self, x: usize, y: usize, thread_id: usize,
        sampler: &mut P, arena: &ScratchArena) -> Result<(), BptError> {
        let settings = self.settings;
        let time = sampler.time_sample(settings.time_start, settings.time_end);
        let u_px = sampler.pixel_position();
        let px = x as Float + u_px[0];
        let py = y as Float + u_px[1];
        let (wls, wl_pdf) = WavelengthSamples::with_equal_offsets(
            sampler.wavelength_offset(), sampler.wavelength_selection());

        let ctx = PixelContext {
            scene: self.scene,
            sensor: self.sensor,
            px,
            py,
            wl_hint: wls.selected,
            time,
            thread_id,
            max_vertices: settings.max_vertices
        };

        let mut light_vertices = arena.vec(settings.max_vertices)?;
        let mut eye_vertices = arena.vec(settings.max_vertices)?;
        let origin_query = |adjoint| DdfQuery::new(
            Vector3f::default(), Normal3f::new(0.0, 0.0, 1.0), wls.selected, adjoint);

        // light subpath
        let light_smp = sampler.light_position_sample();
        let edf_smp = sampler.edf_sample();
        let light_query = LightPosQuery { time, wls };

        if let Some(light) = self.scene.sample_light_position(&light_query, &light_smp, arena)? {
            if light.area_pdf > 0.0 {
                let le1 = light.edf.sample(&origin_query(true), &edf_smp);
                let origin = BptVertex::origin(
                    light.pt, light.edf, light.le0 / light.area_pdf, light.area_pdf, light.pos_type);
                light_vertices.push(origin);

                let dir = light.pt.from_local(&le1.dir_local);
                let start = SubpathStart {
                    wls,
                    alpha: origin.alpha * le1.value * (light.pt.calc_cos_term(&dir) / le1.dir_pdf),
                    ray: Ray::spawn(&light.pt.p, &dir, time),
                    dir_pdf: le1.dir_pdf,
                    sampled_type: le1.sampled_type,
                    cos_last: le1.dir_local.z,
                    adjoint: true
                };
                generate_subpath(&ctx, &start, &mut light_vertices, sampler, arena)?;
            }
        }

        // eye subpath
        let lens_query = LensPosQuery { time, wls };
        let lens = self.camera.sample_lens_position(&lens_query, &sampler.lens_position_sample(), arena)?;
        let idf_smp = DdfSample::new(0.0, [px / settings.width as Float, py / settings.height as Float]);
        let we1 = lens.idf.sample(&origin_query(false), &idf_smp);
        let origin = BptVertex::origin(
            lens.pt, lens.idf, lens.we0 / (lens.area_pdf * wl_pdf), lens.area_pdf, lens.pos_type)
            .with_lens(lens.pixels);
        eye_vertices.push(origin);

        let dir = lens.pt.from_local(&we1.dir_local);
        let start = SubpathStart {
            wls,
            alpha: origin.alpha * we1.value * (lens.pt.calc_cos_term(&dir) / we1.dir_pdf),
            ray: Ray::spawn(&lens.pt.p, &dir, time),
            dir_pdf: we1.dir_pdf,
            sampled_type: we1.sampled_type,
            cos_last: we1.dir_local.z,
            adjoint: false
        };
        generate_subpath(&ctx, &start, &mut eye_vertices, sampler, arena)?;

        connect_all(&ctx, &light_vertices, &eye_vertices, &wls);

        arena.check()
    }
}
