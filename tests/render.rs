#[cfg(test)]
mod render {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use parking_lot::Mutex;
    use bpt_rust::cameras::perspective::PerspectiveCamera;
    use bpt_rust::core::common::{Float, CheckpointPolicy, RenderSettings, PI};
    use bpt_rust::core::ddf::Ddf;
    use bpt_rust::core::error::BptError;
    use bpt_rust::core::geometry::point::Point3f;
    use bpt_rust::core::geometry::ray::Ray;
    use bpt_rust::core::geometry::vector::Vector3f;
    use bpt_rust::core::interaction::{SurfaceInteraction, SurfacePoint};
    use bpt_rust::core::light::{LightPosition, LightPosQuery, LightPosSample, LightSource};
    use bpt_rust::core::memory::ScratchArena;
    use bpt_rust::core::scene::{Intersector, Scene, SceneObject, ScatterSource};
    use bpt_rust::core::sensor::{CheckpointSink, ImageSensor, NullSink};
    use bpt_rust::core::spectrum::{cie_xyz, RgbSpectrum, SampledSpectrum, WavelengthSamples, CIE_Y_INTEGRAL};
    use bpt_rust::integrators::bpt::BptIntegrator;
    use bpt_rust::integrators::bpt::scheduler::{checkpoint_schedule, is_checkpoint, make_tiles, Tile};
    use bpt_rust::lights::diffuse::DiffuseAreaEmitter;
    use bpt_rust::materials::matte::MatteMaterial;
    use bpt_rust::scenes::cornell::{cornell_box, CornellOptions};
    use bpt_rust::shapes::rectangle::Rectangle;

    /// Keeps the sample count, scale and total luminance of every export.
    #[derive(Default)]
    struct RecordingSink {
        exports: Mutex<Vec<(u32, Float, Float)>>
    }

    impl CheckpointSink for RecordingSink {
        fn export(&self, sensor: &ImageSensor, sample_count: u32, scale: Float) -> Result<(), BptError> {
            let total = sensor.snapshot(1.0).iter().sum::<Float>();
            self.exports.lock().push((sample_count, scale, total));

            Ok(())
        }
    }

    struct FailingSink;

    impl CheckpointSink for FailingSink {
        fn export(&self, _sensor: &ImageSensor, _sample_count: u32, _scale: Float) -> Result<(), BptError> {
            Err(BptError::Checkpoint("disk full".to_owned()))
        }
    }

    fn small_settings(spp: u32) -> RenderSettings {
        RenderSettings {
            width: 16,
            height: 12,
            tile_width: 8,
            tile_height: 8,
            spp,
            nthreads: 2,
            seed: 7,
            brightness: 2.0,
            quiet: true,
            ..Default::default()
        }
    }

    #[test]
    fn tiles_cover_the_image() {
        let tiles = make_tiles(20, 10, 8, 8);

        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[0], Tile { x0: 0, y0: 0, x1: 8, y1: 8 });
        assert_eq!(tiles[2], Tile { x0: 16, y0: 0, x1: 20, y1: 8 });
        assert_eq!(tiles[5], Tile { x0: 16, y0: 8, x1: 20, y1: 10 });
        assert_eq!(tiles.iter().map(|t| t.area()).sum::<usize>(), 200);
    }

    #[test]
    fn checkpoints_at_powers_of_two() {
        let final_on = CheckpointPolicy { export_final: true };
        let final_off = CheckpointPolicy { export_final: false };

        assert_eq!(checkpoint_schedule(6, &final_on), vec![1, 2, 4, 6]);
        assert_eq!(checkpoint_schedule(6, &final_off), vec![1, 2, 4]);
        assert_eq!(checkpoint_schedule(8, &final_off), vec![1, 2, 4, 8]);
        assert_eq!(checkpoint_schedule(1, &final_off), vec![1]);
        assert!(is_checkpoint(1024, 2000, &final_off));
        assert!(!is_checkpoint(1000, 2000, &final_on));
    }

    #[test]
    fn render_exports_scaled_checkpoints() {
        let settings = small_settings(3);
        let (scene, camera) = cornell_box(settings.width, settings.height, &CornellOptions::default());
        let sensor = ImageSensor::new(settings.width, settings.height, settings.nthreads);
        let sink = RecordingSink::default();

        let rounds = BptIntegrator::new(settings).render(&scene, &camera, &sensor, &sink).unwrap();
        assert_eq!(rounds, 3);

        let exports = sink.exports.lock();
        let counts = exports.iter().map(|e| e.0).collect::<Vec<_>>();
        assert_eq!(counts, vec![1, 2, 3]);

        for (count, scale, _) in exports.iter() {
            assert_eq!(*scale, 2.0 / *count as Float);
        }

        // the sensor accumulates across rounds
        assert!(exports[0].2 > 0.0);
        assert!(exports[1].2 > exports[0].2);
        assert!(exports[2].2 > exports[1].2);

        let image = sensor.snapshot(1.0 / 3.0);
        assert!(image.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn failed_exports_do_not_stop_the_render() {
        let settings = small_settings(2);
        let (scene, camera) = cornell_box(settings.width, settings.height, &CornellOptions::default());
        let sensor = ImageSensor::new(settings.width, settings.height, settings.nthreads);

        let rounds = BptIntegrator::new(settings).render(&scene, &camera, &sensor, &FailingSink).unwrap();
        assert_eq!(rounds, 2);
    }

    #[test]
    fn cancelled_render_completes_no_rounds() {
        let settings = small_settings(4);
        let (scene, camera) = cornell_box(settings.width, settings.height, &CornellOptions::default());
        let sensor = ImageSensor::new(settings.width, settings.height, settings.nthreads);
        let sink = RecordingSink::default();

        let integrator = BptIntegrator::new(settings);
        integrator.cancel_flag().store(true, Ordering::Relaxed);

        assert_eq!(integrator.render(&scene, &camera, &sensor, &sink).unwrap(), 0);
        assert!(sink.exports.lock().is_empty());
        assert!(sensor.snapshot(1.0).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn invalid_settings_are_reported() {
        let (scene, camera) = cornell_box(16, 12, &CornellOptions::default());

        let no_samples = small_settings(0);
        let sensor = ImageSensor::new(16, 12, 2);
        let err = BptIntegrator::new(no_samples).render(&scene, &camera, &sensor, &NullSink);
        assert!(matches!(err, Err(BptError::InvalidSettings(_))));

        let wrong_size = ImageSensor::new(8, 8, 2);
        let err = BptIntegrator::new(small_settings(1)).render(&scene, &camera, &wrong_size, &NullSink);
        assert!(matches!(err, Err(BptError::InvalidSettings(_))));

        let few_buffers = ImageSensor::new(16, 12, 1);
        let err = BptIntegrator::new(small_settings(1)).render(&scene, &camera, &few_buffers, &NullSink);
        assert!(matches!(err, Err(BptError::InvalidSettings(_))));
    }

    #[test]
    fn sky_scene_renders() {
        let settings = small_settings(1);
        let opts = CornellOptions { sky: Some(0.5), ..Default::default() };
        let (scene, camera) = cornell_box(settings.width, settings.height, &opts);
        let sensor = ImageSensor::new(settings.width, settings.height, settings.nthreads);

        assert_eq!(BptIntegrator::new(settings).render(&scene, &camera, &sensor, &NullSink).unwrap(), 1);
        let image = sensor.snapshot(1.0);
        assert!(image.iter().all(|v| v.is_finite()));
        assert!(image.iter().any(|v| *v > 0.0));
    }

    /// Cornell box that raises a cancel flag on its first ray query.
    struct CancellingScene {
        inner   : Scene,
        cancel  : Arc<AtomicBool>
    }

    impl Intersector for CancellingScene {
        fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
            self.cancel.store(true, Ordering::Relaxed);
            self.inner.intersect(ray)
        }

        fn test_visibility(&self, p0: &SurfacePoint, p1: &SurfacePoint, time: Float) -> bool {
            self.inner.test_visibility(p0, p1, time)
        }
    }

    impl ScatterSource for CancellingScene {
        fn create_bsdf<'a>(
            &self, pt: &SurfacePoint, wls: &WavelengthSamples,
            arena: &'a ScratchArena) -> Result<&'a dyn Ddf, BptError> {
            self.inner.create_bsdf(pt, wls, arena)
        }

        fn is_emitting(&self, pt: &SurfacePoint) -> bool { self.inner.is_emitting(pt) }

        fn emittance(&self, pt: &SurfacePoint, wls: &WavelengthSamples) -> SampledSpectrum {
            self.inner.emittance(pt, wls)
        }

        fn create_edf<'a>(
            &self, pt: &SurfacePoint, wls: &WavelengthSamples,
            arena: &'a ScratchArena) -> Result<&'a dyn Ddf, BptError> {
            self.inner.create_edf(pt, wls, arena)
        }

        fn evaluate_area_pdf(&self, pt: &SurfacePoint) -> Float { self.inner.evaluate_area_pdf(pt) }
    }

    impl LightSource for CancellingScene {
        fn sample_light_position<'a>(
            &self, query: &LightPosQuery, smp: &LightPosSample,
            arena: &'a ScratchArena) -> Result<Option<LightPosition<'a>>, BptError> {
            self.inner.sample_light_position(query, smp, arena)
        }
    }

    #[test]
    fn cancel_during_round_finishes_the_round() {
        let settings = RenderSettings { nthreads: 1, ..small_settings(4) };
        let (scene, camera) = cornell_box(settings.width, settings.height, &CornellOptions::default());

        let reference = ImageSensor::new(settings.width, settings.height, 1);
        let one_round = RenderSettings { spp: 1, ..settings.clone() };
        assert_eq!(BptIntegrator::new(one_round).render(&scene, &camera, &reference, &NullSink).unwrap(), 1);

        let integrator = BptIntegrator::new(settings.clone());
        let cancelling = CancellingScene { inner: scene, cancel: integrator.cancel_flag() };
        let sensor = ImageSensor::new(settings.width, settings.height, 1);
        let sink = RecordingSink::default();

        assert_eq!(integrator.render(&cancelling, &camera, &sensor, &sink).unwrap(), 1);
        assert_eq!(sink.exports.lock().iter().map(|e| e.0).collect::<Vec<_>>(), vec![1]);

        // every tile of the first round was rendered, and nothing after it
        assert_eq!(sensor.snapshot(1.0), reference.snapshot(1.0));
    }

    #[test]
    fn exhausted_arenas_fail_tiles_not_the_render() {
        let settings = RenderSettings { arena_capacity: 64, ..small_settings(2) };
        let (scene, camera) = cornell_box(settings.width, settings.height, &CornellOptions::default());
        let sensor = ImageSensor::new(settings.width, settings.height, settings.nthreads);
        let sink = RecordingSink::default();

        assert_eq!(BptIntegrator::new(settings).render(&scene, &camera, &sensor, &sink).unwrap(), 2);
        assert_eq!(sink.exports.lock().len(), 2);
        assert!(sensor.snapshot(1.0).iter().all(|v| *v == 0.0));
    }

    /// Closed cube `[-1, 1]^3` whose walls all emit `exitance` and reflect
    /// `albedo`, viewed from its center.
    fn furnace(albedo: Float, exitance: Float, size: usize) -> (Scene, PerspectiveCamera) {
        let walls = [
            ((-1.0, -1.0, -1.0), (0.0, 0.0, 2.0), (2.0, 0.0, 0.0)),
            ((-1.0, 1.0, -1.0), (2.0, 0.0, 0.0), (0.0, 0.0, 2.0)),
            ((-1.0, -1.0, -1.0), (2.0, 0.0, 0.0), (0.0, 2.0, 0.0)),
            ((-1.0, -1.0, 1.0), (0.0, 2.0, 0.0), (2.0, 0.0, 0.0)),
            ((-1.0, -1.0, -1.0), (0.0, 2.0, 0.0), (0.0, 0.0, 2.0)),
            ((1.0, -1.0, -1.0), (0.0, 0.0, 2.0), (0.0, 2.0, 0.0))
        ];
        let objects = walls
            .iter()
            .map(|(c, e1, e2)| SceneObject::new(
                Rectangle::new(
                    Point3f::new(c.0, c.1, c.2),
                    Vector3f::new(e1.0, e1.1, e1.2),
                    Vector3f::new(e2.0, e2.1, e2.2)).into(),
                MatteMaterial::new(RgbSpectrum::grey(albedo)).into(),
                Some(DiffuseAreaEmitter::new(RgbSpectrum::grey(exitance)))))
            .collect();

        let camera = PerspectiveCamera::new(
            Point3f::new(0.0, 0.0, 0.0), Point3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 1.0, 0.0),
            60.0, size, size);

        (Scene::new(objects, None), camera)
    }

    #[test]
    fn furnace_converges_to_closed_form() {
        let (albedo, exitance) = (0.5, 1.0);
        let settings = RenderSettings {
            width: 16,
            height: 16,
            spp: 256,
            seed: 17,
            ..small_settings(256)
        };
        let (scene, camera) = furnace(albedo, exitance, settings.width);
        let sensor = ImageSensor::new(settings.width, settings.height, settings.nthreads);

        let rounds = BptIntegrator::new(settings.clone()).render(&scene, &camera, &sensor, &NullSink).unwrap();
        assert_eq!(rounds, 256);

        // every wall sees radiance (E / pi) / (1 - a); Y weighs it by ybar
        let step = 0.5;
        let mut ybar = 0.0;
        let mut lambda = 360.0 + step / 2.0;
        while lambda < 830.0 {
            ybar += cie_xyz(lambda)[1] * step;
            lambda += step;
        }
        let radiance = exitance / PI / (1.0 - albedo);
        let expected = radiance * ybar / CIE_Y_INTEGRAL;

        let mut mean = 0.0_f64;
        for y in 0..settings.height {
            for x in 0..settings.width {
                mean += (sensor.pixel_xyz(x, y)[1] / rounds as Float) as f64;
            }
        }
        mean /= (settings.width * settings.height) as f64;

        let err = (mean - expected as f64).abs() / expected as f64;
        assert!(err < 0.01, "mean Y {} expected {}", mean, expected);
    }
}
