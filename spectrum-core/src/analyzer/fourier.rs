//! Fourier Analysis
use crate::analyzer;
use crate::Error;

/// Window functions
///
/// A window-function in this case takes a size and should return a `Vec` of that length filled
/// with the precomputed window coefficients.  The following are available by default:
///
/// * [None / Rectangle](fn.none.html)
/// * [Sine](fn.sine.html)
/// * [Hanning](fn.hanning.html)
/// * [Hamming](fn.hamming.html)
/// * [Blackman](fn.blackman.html)
/// * [Nuttall](fn.nuttall.html)
/// * [Triangular](fn.triangular.html)
pub mod window {
    /// Blackman Window
    pub fn blackman(size: usize) -> Vec<f32> {
        apodize::blackman_iter(size).map(|f| f as f32).collect()
    }

    /// Hamming Window
    pub fn hamming(size: usize) -> Vec<f32> {
        apodize::hamming_iter(size).map(|f| f as f32).collect()
    }

    /// Hanning Window
    pub fn hanning(size: usize) -> Vec<f32> {
        apodize::hanning_iter(size).map(|f| f as f32).collect()
    }

    /// No window function / Rectangle window
    pub fn none(size: usize) -> Vec<f32> {
        vec![1.0; size]
    }

    /// Nuttall Window
    pub fn nuttall(size: usize) -> Vec<f32> {
        apodize::nuttall_iter(size).map(|f| f as f32).collect()
    }

    /// Sine Window
    pub fn sine(size: usize) -> Vec<f32> {
        (0..size)
            .map(|i| (i as f32 / (size - 1) as f32 * std::f32::consts::PI).sin())
            .collect()
    }

    /// Triangular Window
    pub fn triangular(size: usize) -> Vec<f32> {
        apodize::triangular_iter(size).map(|f| f as f32).collect()
    }

    /// Get the window function for the specified name
    pub fn from_str(name: &str) -> Option<fn(usize) -> Vec<f32>> {
        match name {
            "blackman" => Some(blackman),
            "hamming" => Some(hamming),
            "hanning" => Some(hanning),
            "none" => Some(none),
            "nuttall" => Some(nuttall),
            "sine" => Some(sine),
            "triangular" => Some(triangular),
            _ => None,
        }
    }
}

/// Builder for FourierAnalyzer
#[derive(Debug, Default)]
pub struct FourierBuilder {
    /// Length of the fourier transform
    ///
    /// This is also the number of samples per decoded chunk.  Should be a power of two.
    ///
    /// Can also be set from config as `"audio.fourier.length"`.
    pub length: Option<usize>,

    /// Window Function
    ///
    /// A few window functions are defined in the [`window`](window/index.html) module.
    ///
    /// Can also be set from config as `"audio.fourier.window"`.
    pub window: Option<fn(usize) -> Vec<f32>>,

    /// Rate of the decoded stream
    ///
    /// Only used to label the buckets with frequencies.
    ///
    /// Can also be set from config as `"audio.rate"`.
    pub rate: Option<usize>,
}

impl FourierBuilder {
    /// Create a new FourierBuilder
    pub fn new() -> FourierBuilder {
        Default::default()
    }

    /// Set the length of the transform buffer
    pub fn length(&mut self, length: usize) -> &mut FourierBuilder {
        self.length = Some(length);
        self
    }

    /// Set the window function
    pub fn window(&mut self, f: fn(usize) -> Vec<f32>) -> &mut FourierBuilder {
        self.window = Some(f);
        self
    }

    /// Set the rate of the decoded stream
    pub fn rate(&mut self, rate: usize) -> &mut FourierBuilder {
        self.rate = Some(rate);
        self
    }

    /// Plan the fourier transform and prepare buffers
    pub fn plan(&mut self) -> FourierAnalyzer {
        let length = self
            .length
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.fourier.length", 2048));
        let window = (self.window.unwrap_or_else(|| {
            let name = crate::CONFIG.get_or("audio.fourier.window", "none".to_string());
            window::from_str(&name).unwrap_or_else(|| {
                log::warn!("Unknown window function {:?}, using none", name);
                window::none as fn(usize) -> Vec<f32>
            })
        }))(length);
        let rate = self
            .rate
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.rate", 44100));

        FourierAnalyzer::new(length, window, rate)
    }
}

/// Fourier Analyzer
///
/// Turns a window of `length` samples into `length` magnitudes.  Magnitudes are scaled
/// by `1 / length` so they stay in the range of the input samples.
///
/// # Example
/// ```
/// # use spectrum_core::analyzer::fourier::*;
/// let mut analyzer = FourierBuilder::new()
///     .length(512)
///     .window(window::nuttall)
///     .rate(8000)
///     .plan();
///
/// let spectrum = analyzer.analyze(&[0; 512]).unwrap();
/// assert_eq!(spectrum.len(), 512);
/// ```
#[derive(Clone)]
pub struct FourierAnalyzer {
    length: usize,
    window: Vec<f32>,

    rate: usize,

    fft: std::sync::Arc<dyn rustfft::FFT<f32>>,

    input: Vec<rustfft::num_complex::Complex<f32>>,
    output: Vec<rustfft::num_complex::Complex<f32>>,

    spectrum: analyzer::MagnitudeSpectrum,
}

impl std::fmt::Debug for FourierAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "FourierAnalyzer {{ length: {:?}, rate: {:?}, highest: {:?} }}",
            self.length,
            self.rate,
            self.spectrum.highest(),
        )
    }
}

impl FourierAnalyzer {
    fn new(length: usize, window: Vec<f32>, rate: usize) -> FourierAnalyzer {
        use rustfft::num_traits::Zero;

        let fft = rustfft::FFTplanner::new(false).plan_fft(length);

        let fa = FourierAnalyzer {
            length,
            window,

            rate,

            fft,

            input: Vec::with_capacity(length),
            output: vec![rustfft::num_complex::Complex::zero(); length],

            spectrum: analyzer::Spectrum::silent(length, rate),
        };

        log::debug!("FourierAnalyzer({:p}):", &fa);
        log::debug!("    Fourier Length      = {:8}", length);
        log::debug!("    Sample Rate         = {:8}", rate);
        log::debug!("    Bucket Width        = {:8.3} Hz", fa.spectrum.width());
        log::debug!("    Highest Frequency   = {:8.3} Hz", fa.spectrum.highest());

        fa
    }

    /// Return the number of samples per analyzed window
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Return the rate this analyzer labels its buckets for
    #[inline]
    pub fn rate(&self) -> usize {
        self.rate
    }

    /// Analyze a window of samples
    ///
    /// Fails with [`Error::InvalidWindowSize`] if `window` does not hold exactly
    /// `length()` samples.  The previous spectrum is kept in that case.
    pub fn analyze(
        &mut self,
        window: &[analyzer::Sample],
    ) -> crate::Result<analyzer::Spectrum<&[analyzer::SignalStrength]>> {
        log::trace!("FourierAnalyzer({:p}): Analyzing ...", &self);

        if window.len() != self.length {
            return Err(Error::InvalidWindowSize {
                expected: self.length,
                actual: window.len(),
            });
        }

        self.input.clear();
        for (s, w) in window.iter().zip(self.window.iter()) {
            self.input
                .push(rustfft::num_complex::Complex::new(f32::from(*s) * w, 0.0));
        }

        debug_assert_eq!(self.input.len(), self.length);

        self.fft.process(&mut self.input, &mut self.output);

        let norm = 1.0 / self.length as f32;
        for (s, o) in self.spectrum.iter_mut().zip(self.output.iter()) {
            *s = o.norm() * norm;
        }

        Ok(self.spectrum.as_ref())
    }

    /// Get the spectrum from the last transform
    pub fn spectrum(&self) -> analyzer::Spectrum<&[analyzer::SignalStrength]> {
        self.spectrum.as_ref()
    }
}
