#[cfg(test)]
mod mis {
    use approx::relative_eq;
    use bpt_rust::core::common::Float;
    use bpt_rust::core::rng::RNG;
    use bpt_rust::integrators::bpt::mis::{VertexDensity, ExtensionDensities, mis_weight};

    fn vertex(area_pdf: Float, rr_prob: Float, delta: bool) -> VertexDensity {
        VertexDensity::new(area_pdf, rr_prob, delta)
    }

    fn random_vertex(rng: &mut RNG) -> VertexDensity {
        let mut v = vertex(
            0.01 + 10.0 * rng.uniform_float(), 0.05 + 0.95 * rng.uniform_float(),
            rng.uniform_float() < 0.2);
        v.rev_area_pdf = 0.01 + 10.0 * rng.uniform_float();
        v.rev_rr_prob = 0.05 + 0.95 * rng.uniform_float();

        v
    }

    fn random_ext(rng: &mut RNG) -> ExtensionDensities {
        ExtensionDensities::new(
            10.0 * rng.uniform_float(), rng.uniform_float(),
            10.0 * rng.uniform_float(), rng.uniform_float())
    }

    #[test]
    fn weights_in_unit_interval() {
        let mut rng = RNG::new(7);

        for _ in 0..1000 {
            let light = (0..4).map(|_| random_vertex(&mut rng)).collect::<Vec<_>>();
            let eye = (0..4).map(|_| random_vertex(&mut rng)).collect::<Vec<_>>();
            let lext = random_ext(&mut rng);
            let eext = random_ext(&mut rng);

            for s in 0..=4 {
                for t in 1..=4 {
                    let w = mis_weight(&lext, &eext, &light, s, &eye, t);
                    assert!(w.is_finite());
                    assert!((0.0..=1.0).contains(&w), "w = {} for s = {}, t = {}", w, s, t);
                }
            }
        }
    }

    #[test]
    fn weight_is_pure() {
        let mut rng = RNG::new(11);
        let light = (0..3).map(|_| random_vertex(&mut rng)).collect::<Vec<_>>();
        let eye = (0..3).map(|_| random_vertex(&mut rng)).collect::<Vec<_>>();
        let lext = random_ext(&mut rng);
        let eext = random_ext(&mut rng);

        let w0 = mis_weight(&lext, &eext, &light, 2, &eye, 3);
        let w1 = mis_weight(&lext, &eext, &light, 2, &eye, 3);
        assert_eq!(w0.to_bits(), w1.to_bits());

        // vertices past the strategy's prefix are never read
        let mut longer = light.clone();
        longer.push(random_vertex(&mut rng));
        let w2 = mis_weight(&lext, &eext, &longer, 2, &eye, 3);
        assert_eq!(w0.to_bits(), w2.to_bits());
    }

    #[test]
    fn single_strategy_gets_full_weight() {
        let lens = vertex(1.0, 1.0, true);
        let w = mis_weight(
            &ExtensionDensities::none(), &ExtensionDensities::none(),
            &[] as &[VertexDensity], 0, &[lens], 1);

        assert_eq!(w, 1.0);
    }

    #[test]
    fn delta_vertices_suppress_strategies() {
        let lens = vertex(1.0, 1.0, true);
        let light = [vertex(0.5, 1.0, false)];
        let lext = ExtensionDensities::new(3.0, 1.0, 2.0, 1.0);
        let eext = ExtensionDensities::new(0.25, 1.0, 0.0, 0.0);

        // x1 reached by a specular bounce: only the light-side ratio counts
        let specular = [lens, vertex(2.0, 1.0, true)];
        let w = mis_weight(&lext, &eext, &light, 1, &specular, 2);
        let r = 0.25 / 0.5;
        assert!(relative_eq!(w, 1.0 / (1.0 + r * r), epsilon = 1e-6));

        // same densities without the delta flag add the eye-side ratio too
        let diffuse = [lens, vertex(2.0, 1.0, false)];
        let w = mis_weight(&lext, &eext, &light, 1, &diffuse, 2);
        let re = 3.0 / 2.0;
        assert!(relative_eq!(w, 1.0 / (1.0 + r * r + re * re), epsilon = 1e-6));
    }

    #[test]
    fn weights_of_one_path_sum_to_one() {
        // path y0 (light) - x1 (surface) - x0 (lens)
        let light_pdf = 0.8;
        let x1_from_y0 = 0.3;
        let x1_from_x0 = 2.0;
        let y0_from_x1 = 0.6;

        let lens = vertex(1.0, 1.0, true);
        let y0 = vertex(light_pdf, 1.0, false);

        // s = 1, t = 2
        let eye = [lens, vertex(x1_from_x0, 1.0, false)];
        let w12 = mis_weight(
            &ExtensionDensities::new(x1_from_y0, 1.0, 0.0, 0.0),
            &ExtensionDensities::new(y0_from_x1, 1.0, 0.0, 0.0),
            &[y0], 1, &eye, 2);

        // s = 2, t = 1
        let light = [y0, vertex(x1_from_y0, 1.0, false)];
        let w21 = mis_weight(
            &ExtensionDensities::none(),
            &ExtensionDensities::new(x1_from_x0, 1.0, y0_from_x1, 1.0),
            &light, 2, &[lens], 1);

        // s = 0, t = 3
        let eye = [lens, vertex(x1_from_x0, 1.0, false), vertex(y0_from_x1, 1.0, false)];
        let w03 = mis_weight(
            &ExtensionDensities::new(light_pdf, 1.0, x1_from_y0, 1.0),
            &ExtensionDensities::none(),
            &[] as &[VertexDensity], 0, &eye, 3);

        let p12: Float = light_pdf * x1_from_x0;
        let p21: Float = light_pdf * x1_from_y0;
        let p03: Float = x1_from_x0 * y0_from_x1;
        let total = p12 * p12 + p21 * p21 + p03 * p03;

        assert!(relative_eq!(w12, p12 * p12 / total, epsilon = 1e-5));
        assert!(relative_eq!(w21, p21 * p21 / total, epsilon = 1e-5));
        assert!(relative_eq!(w03, p03 * p03 / total, epsilon = 1e-5));
        assert!(relative_eq!(w12 + w21 + w03, 1.0, epsilon = 1e-5));
    }
}
