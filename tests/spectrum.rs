#[cfg(test)]
mod spectrum {
    use approx::assert_relative_eq;
    use bpt_rust::core::common::Float;
    use bpt_rust::core::spectrum::*;

    #[test]
    fn wavelengths_are_stratified() {
        let (wls, pdf) = WavelengthSamples::with_equal_offsets(0.25, 0.99);
        let stratum = (WAVELENGTH_HIGH - WAVELENGTH_LOW) / N_WAVELENGTHS as Float;

        for (i, l) in wls.lambdas.iter().enumerate() {
            let lo = WAVELENGTH_LOW + i as Float * stratum;
            assert!(*l >= lo && *l < lo + stratum);
            assert_relative_eq!(*l - lo, 0.25 * stratum, max_relative = 1e-4);
        }

        assert_relative_eq!(pdf, N_WAVELENGTHS as Float / (WAVELENGTH_HIGH - WAVELENGTH_LOW));
        assert_eq!(wls.selected, N_WAVELENGTHS - 1);
        assert!(!wls.lambda_selected());
    }

    #[test]
    fn selection_index_follows_sample() {
        for i in 0..N_WAVELENGTHS {
            let u = (i as Float + 0.5) / N_WAVELENGTHS as Float;
            let (wls, _) = WavelengthSamples::with_equal_offsets(0.5, u);
            assert_eq!(wls.selected, i);
            assert_eq!(wls.selected_lambda(), wls.lambdas[i]);
        }

        let (wls, _) = WavelengthSamples::with_equal_offsets(0.5, 1.0);
        assert_eq!(wls.selected, N_WAVELENGTHS - 1);
    }

    #[test]
    fn xyz_honors_selection() {
        let (mut wls, _) = WavelengthSamples::with_equal_offsets(0.5, 0.6);
        let s = SampledSpectrum::from_values([1.0, 2.0, 3.0, 4.0]);

        let all = s.to_xyz(&wls);
        let mut parts = [0.0; 3];
        for i in 0..N_WAVELENGTHS {
            let xyz = s.select(i).to_xyz(&wls);
            for c in 0..3 { parts[c] += xyz[c]; }
        }
        for c in 0..3 {
            assert_relative_eq!(all[c], parts[c], max_relative = 1e-5);
        }

        wls.flags |= LAMBDA_IS_SELECTED;
        let hero = s.to_xyz(&wls);
        let only = s.select(wls.selected);
        wls.flags = 0;
        let expected = only.to_xyz(&wls);
        for c in 0..3 {
            assert_relative_eq!(hero[c], expected[c], max_relative = 1e-5);
        }
    }

    #[test]
    fn grey_rgb_is_flat() {
        let grey = RgbSpectrum::grey(0.7);
        let mut lambda = WAVELENGTH_LOW;

        while lambda < WAVELENGTH_HIGH {
            assert_relative_eq!(grey.evaluate(lambda), 0.7, max_relative = 1e-6);
            lambda += 7.5;
        }

        assert!(RgbSpectrum::grey(0.0).is_black());
        assert_relative_eq!(grey.luminance(), 0.7, max_relative = 1e-4);
    }

    #[test]
    fn spectrum_predicates() {
        let mut s = SampledSpectrum::new(0.5);
        assert!(!s.is_black());
        assert_relative_eq!(s.importance(), 0.5);
        assert_eq!(s.max_component(), 0.5);

        s[1] = -1.0;
        assert!(s.has_negative());
        s[2] = Float::NAN;
        assert!(s.has_nans());
        s[3] = Float::INFINITY;
        assert!(s.has_infs());
        assert!(SampledSpectrum::zero().is_black());
    }

    #[test]
    fn white_reaches_the_y_integral() {
        // A flat unit spectrum averaged over many stratified samples
        // integrates the Y matching function.
        let n = 256;
        let mut y = 0.0;

        for k in 0..n {
            let (wls, pdf) = WavelengthSamples::with_equal_offsets((k as Float + 0.5) / n as Float, 0.0);
            y += (SampledSpectrum::new(1.0) / pdf).to_xyz(&wls)[1];
        }

        assert_relative_eq!(y / n as Float, 1.0, max_relative = 0.03);
    }
}
