#[cfg(test)]
mod connection {
    use approx::assert_relative_eq;
    use bpt_rust::core::common::{Float, PI, INV_PI};
    use bpt_rust::core::ddf::{DIFFUSE_REFLECTION, DELTA_POSITION};
    use bpt_rust::core::geometry::normal::Normal3f;
    use bpt_rust::core::geometry::point::Point3f;
    use bpt_rust::core::geometry::vector::Vector3f;
    use bpt_rust::core::interaction::{SurfacePoint, ObjectChain};
    use bpt_rust::core::light::{LightSource, LightPosQuery, LightPosSample};
    use bpt_rust::core::memory::ScratchArena;
    use bpt_rust::core::reflection::NullDdf;
    use bpt_rust::core::scene::{Scene, SceneObject, ScatterSource};
    use bpt_rust::core::spectrum::{RgbSpectrum, SampledSpectrum, WavelengthSamples, LAMBDA_IS_SELECTED, N_WAVELENGTHS};
    use bpt_rust::integrators::bpt::connection::connect;
    use bpt_rust::integrators::bpt::vertex::BptVertex;
    use bpt_rust::lights::diffuse::DiffuseAreaEmitter;
    use bpt_rust::materials::matte::MatteMaterial;
    use bpt_rust::shapes::rectangle::Rectangle;

    const ALBEDO: Float = 0.5;
    const EXITANCE: Float = 10.0;

    /// Large floor at y = 0 and a unit square light facing it at y = 1.
    fn floor_and_light() -> Scene {
        let floor = SceneObject::new(
            Rectangle::new(Point3f::new(-2.0, 0.0, -2.0), Vector3f::new(0.0, 0.0, 4.0), Vector3f::new(4.0, 0.0, 0.0)).into(),
            MatteMaterial::new(RgbSpectrum::grey(ALBEDO)).into(),
            None);
        let light = SceneObject::new(
            Rectangle::new(Point3f::new(-0.5, 1.0, -0.5), Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0)).into(),
            MatteMaterial::new(RgbSpectrum::grey(0.0)).into(),
            Some(DiffuseAreaEmitter::new(RgbSpectrum::grey(EXITANCE))));

        Scene::new(vec![floor, light], None)
    }

    /// Form factor from a differential area to a parallel `a x b` rectangle
    /// at height `c`, with the area element below one corner.
    fn corner_form_factor(a: f64, b: f64, c: f64) -> f64 {
        let x = a / c;
        let y = b / c;
        let sx = (1.0 + x * x).sqrt();
        let sy = (1.0 + y * y).sqrt();

        (x / sx * (y / sx).atan() + y / sy * (x / sy).atan()) / (2.0 * std::f64::consts::PI)
    }

    #[test]
    fn direct_lighting_matches_quadrature() {
        let scene = floor_and_light();
        let arena = ScratchArena::new(1 << 22);
        let (wls, _) = WavelengthSamples::with_equal_offsets(0.5, 0.5);

        let lens_pt = SurfacePoint::new(Point3f::new(0.0, 0.5, 2.0), Normal3f::new(0.0, -0.25, -1.0).normalize(), ObjectChain::default());
        let floor_pt = SurfacePoint::new(Point3f::new(0.0, 0.0, 0.0), Normal3f::new(0.0, 1.0, 0.0), ObjectChain::root(0));
        let (to_lens, dist2) = lens_pt.direction_from(&floor_pt.p);
        let bsdf = scene.create_bsdf(&floor_pt, &wls, &arena).unwrap();

        let lens = BptVertex::origin(lens_pt, &NullDdf, SampledSpectrum::new(1.0), 1.0, DELTA_POSITION);
        let x1 = BptVertex::surface(
            floor_pt, floor_pt.to_local(&to_lens), floor_pt.local_gnormal(), bsdf,
            SampledSpectrum::new(1.0), lens_pt.calc_cos_term(&to_lens) / dist2, 1.0,
            DIFFUSE_REFLECTION, 0);
        let eye = [lens, x1];

        let n = 200;
        let mut estimate = 0.0_f64;
        let mut quadrature = 0.0_f64;

        for i in 0..n {
            for j in 0..n {
                let u = [(i as Float + 0.5) / n as Float, (j as Float + 0.5) / n as Float];
                let smp = LightPosSample { u_light: 0.5, u_pos: u };
                let pos = scene
                    .sample_light_position(&LightPosQuery { time: 0.0, wls }, &smp, &arena)
                    .unwrap()
                    .unwrap();
                let y0 = BptVertex::origin(pos.pt, pos.edf, pos.le0 / pos.area_pdf, pos.area_pdf, pos.pos_type);

                let c = connect(&scene, &[y0], 1, &eye, 2, wls.selected, 0.0).unwrap();
                assert!(c.mis_weight > 0.0 && c.mis_weight <= 1.0);
                estimate += (c.contribution[0] / c.mis_weight) as f64;

                // radiance * brdf * geometry term, summed on the same grid
                let v = pos.pt.p - floor_pt.p;
                let r2 = v.length_squared() as f64;
                let cos = pos.pt.p.y as f64 / r2.sqrt();
                quadrature += (EXITANCE * INV_PI) as f64 * (ALBEDO * INV_PI) as f64 * cos * cos / r2;
            }
        }

        estimate /= (n * n) as f64;
        quadrature /= (n * n) as f64;

        let exact = (ALBEDO / PI) as f64 * EXITANCE as f64 * 4.0 * corner_form_factor(0.5, 0.5, 1.0);

        assert!((quadrature - exact).abs() / exact < 0.01, "quadrature {} exact {}", quadrature, exact);
        assert!((estimate - exact).abs() / exact < 0.01, "estimate {} exact {}", estimate, exact);
    }

    #[test]
    fn occluded_connection_contributes_nothing() {
        let mut objects = floor_and_light().objects().to_vec();
        let blocker = SceneObject::new(
            Rectangle::new(Point3f::new(-1.0, 0.5, -1.0), Vector3f::new(2.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 2.0)).into(),
            MatteMaterial::new(RgbSpectrum::grey(0.5)).into(),
            None);
        objects.push(blocker);
        let scene = Scene::new(objects, None);

        let arena = ScratchArena::new(1 << 16);
        let (wls, _) = WavelengthSamples::with_equal_offsets(0.5, 0.5);
        let floor_pt = SurfacePoint::new(Point3f::new(0.0, 0.0, 0.0), Normal3f::new(0.0, 1.0, 0.0), ObjectChain::root(0));
        let lens_pt = SurfacePoint::new(Point3f::new(0.0, 0.3, 2.0), Normal3f::new(0.0, 0.0, -1.0), ObjectChain::default());
        let (to_lens, _) = lens_pt.direction_from(&floor_pt.p);
        let bsdf = scene.create_bsdf(&floor_pt, &wls, &arena).unwrap();

        let eye = [
            BptVertex::origin(lens_pt, &NullDdf, SampledSpectrum::new(1.0), 1.0, DELTA_POSITION),
            BptVertex::surface(
                floor_pt, floor_pt.to_local(&to_lens), floor_pt.local_gnormal(), bsdf,
                SampledSpectrum::new(1.0), 1.0, 1.0, DIFFUSE_REFLECTION, 0)
        ];
        let smp = LightPosSample { u_light: 0.5, u_pos: [0.5, 0.5] };
        let pos = scene.sample_light_position(&LightPosQuery { time: 0.0, wls }, &smp, &arena).unwrap().unwrap();
        let y0 = BptVertex::origin(pos.pt, pos.edf, pos.le0 / pos.area_pdf, pos.area_pdf, pos.pos_type);

        assert!(connect(&scene, &[y0], 1, &eye, 2, wls.selected, 0.0).is_none());
    }

    #[test]
    fn selected_wavelength_scales_connection() {
        let scene = floor_and_light();
        let arena = ScratchArena::new(1 << 16);
        let (wls, _) = WavelengthSamples::with_equal_offsets(0.5, 0.5);

        let floor_pt = SurfacePoint::new(Point3f::new(0.2, 0.0, 0.1), Normal3f::new(0.0, 1.0, 0.0), ObjectChain::root(0));
        let lens_pt = SurfacePoint::new(Point3f::new(0.0, 0.5, 2.0), Normal3f::new(0.0, -0.25, -1.0).normalize(), ObjectChain::default());
        let (to_lens, dist2) = lens_pt.direction_from(&floor_pt.p);
        let bsdf = scene.create_bsdf(&floor_pt, &wls, &arena).unwrap();

        let eye = [
            BptVertex::origin(lens_pt, &NullDdf, SampledSpectrum::new(1.0), 1.0, DELTA_POSITION),
            BptVertex::surface(
                floor_pt, floor_pt.to_local(&to_lens), floor_pt.local_gnormal(), bsdf,
                SampledSpectrum::new(1.0), lens_pt.calc_cos_term(&to_lens) / dist2, 1.0,
                DIFFUSE_REFLECTION, 0)
        ];
        let smp = LightPosSample { u_light: 0.5, u_pos: [0.3, 0.6] };
        let pos = scene.sample_light_position(&LightPosQuery { time: 0.0, wls }, &smp, &arena).unwrap().unwrap();
        let y0 = BptVertex::origin(pos.pt, pos.edf, pos.le0 / pos.area_pdf, pos.area_pdf, pos.pos_type);

        let mut flagged = y0;
        flagged.wl_flags = LAMBDA_IS_SELECTED;

        let plain = connect(&scene, &[y0], 1, &eye, 2, wls.selected, 0.0).unwrap();
        let hero = connect(&scene, &[flagged], 1, &eye, 2, wls.selected, 0.0).unwrap();

        assert_eq!(plain.wl_flags & LAMBDA_IS_SELECTED, 0);
        assert_ne!(hero.wl_flags & LAMBDA_IS_SELECTED, 0);
        assert_relative_eq!(hero.mis_weight, plain.mis_weight, max_relative = 1e-5);

        for i in 0..N_WAVELENGTHS {
            assert!(plain.contribution[i] > 0.0);
            assert_relative_eq!(
                hero.contribution[i], plain.contribution[i] * N_WAVELENGTHS as Float,
                max_relative = 1e-4);
        }
    }
}
