//! [Window functions](https://en.wikipedia.org/wiki/Window_function).

use core::f64::consts::PI;

/// Analysis window shapes for spectral column extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowFunction {
    /// All ones.
    Rectangular,
    /// <https://en.wikipedia.org/wiki/Window_function#Hann_and_Hamming_windows>
    /// Periodic form without zero valued endpoints,
    /// `0.5 * (1 - cos(2π(i + 1) / (W + 1)))`.
    Hann,
    /// `0.54 - 0.46 * cos(2πi / (W - 1))`.
    Hamming,
}

impl WindowFunction {
    /// Writes the window coefficients into `coefficients`, whose length
    /// determines the window length. All windows are symmetric; the left
    /// half is evaluated and mirrored.
    pub fn fill(self, coefficients: &mut [f32]) {
        let length = coefficients.len();
        if length == 0 {
            return;
        }
        match self {
            WindowFunction::Rectangular => {
                for value in coefficients.iter_mut() {
                    *value = 1.0;
                }
            }
            WindowFunction::Hann => {
                fill_mirrored(coefficients, |i| {
                    0.5 * (1.0 - libm::cos(2.0 * PI * ((i + 1) as f64) / ((length + 1) as f64)))
                });
            }
            WindowFunction::Hamming => {
                if length == 1 {
                    coefficients[0] = 1.0;
                    return;
                }
                fill_mirrored(coefficients, |i| {
                    0.54 - 0.46 * libm::cos(2.0 * PI * (i as f64) / ((length - 1) as f64))
                });
            }
        }
    }
}

fn fill_mirrored<F: Fn(usize) -> f64>(coefficients: &mut [f32], formula: F) {
    let length = coefficients.len();
    for i in 0..(length + 1) / 2 {
        let value = formula(i) as f32;
        coefficients[i] = value;
        coefficients[length - 1 - i] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::WindowFunction;

    #[test]
    fn test_rectangular_window() {
        let mut coefficients = [0.0_f32; 7];
        WindowFunction::Rectangular.fill(&mut coefficients);
        assert!(coefficients.iter().all(|c| *c == 1.0));
    }

    #[test]
    fn test_hann_window() {
        // With W = 3, the coefficients are 0.5 * (1 - cos(2π(i + 1) / 4)),
        // i.e. [0.5, 1.0, 0.5].
        let mut coefficients = [0.0_f32; 3];
        WindowFunction::Hann.fill(&mut coefficients);
        assert!((coefficients[0] - 0.5).abs() < 1e-6);
        assert!((coefficients[1] - 1.0).abs() < 1e-6);
        assert!((coefficients[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hamming_window() {
        // Hamming endpoints are 0.54 - 0.46 = 0.08 and the center of an
        // odd length window is 0.54 + 0.46 = 1.0.
        let mut coefficients = [0.0_f32; 11];
        WindowFunction::Hamming.fill(&mut coefficients);
        assert!((coefficients[0] - 0.08).abs() < 1e-6);
        assert!((coefficients[5] - 1.0).abs() < 1e-6);
        assert!((coefficients[10] - 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_symmetry() {
        for window in [WindowFunction::Hann, WindowFunction::Hamming].iter() {
            let mut coefficients = [0.0_f32; 64];
            window.fill(&mut coefficients);
            for i in 0..coefficients.len() {
                assert_eq!(coefficients[i], coefficients[coefficients.len() - 1 - i]);
            }
        }
    }

    #[test]
    fn test_degenerate_lengths() {
        let mut empty: [f32; 0] = [];
        WindowFunction::Hann.fill(&mut empty);

        let mut single = [0.0_f32; 1];
        WindowFunction::Hamming.fill(&mut single);
        assert_eq!(single[0], 1.0);
    }
}
