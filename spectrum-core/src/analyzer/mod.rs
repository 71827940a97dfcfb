pub mod bars;
pub mod fourier;
pub mod peak;
pub mod samples;
pub mod spectrum;

pub use self::bars::{BarAggregator, BarBuilder};
pub use self::fourier::{window, FourierAnalyzer, FourierBuilder};
pub use self::peak::{Bar, PeakTracker};
pub use self::samples::{Sample, SampleWindow};
pub use self::spectrum::{Frequency, MagnitudeSpectrum, SignalStrength, Spectrum};
