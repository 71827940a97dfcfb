//! Spectrum Storage Type

/// Type Alias for Frequencies
pub type Frequency = f32;

/// Type Alias for Signal Strengths
pub type SignalStrength = f32;

/// Trait for types that can be used as storage for a spectrum
pub trait Storage: std::ops::Deref<Target = [SignalStrength]> {}

/// Trait for types that can be used as mutable storage for a spectrum
pub trait StorageMut: std::ops::Deref<Target = [SignalStrength]> + std::ops::DerefMut {}

impl<T> Storage for T where T: std::ops::Deref<Target = [SignalStrength]> {}

impl<T> StorageMut for T where T: Storage + std::ops::DerefMut {}

/// Owned spectrum as published by the playback thread
pub type MagnitudeSpectrum = Spectrum<Vec<SignalStrength>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum<S: Storage> {
    buckets: S,
    width: Frequency,
    lowest: Frequency,
    highest: Frequency,
}

impl<S: Storage> std::ops::Index<usize> for Spectrum<S> {
    type Output = SignalStrength;

    fn index(&self, index: usize) -> &Self::Output {
        &self.buckets[index]
    }
}

impl<S: StorageMut> std::ops::IndexMut<usize> for Spectrum<S> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.buckets[index]
    }
}

impl Spectrum<Vec<SignalStrength>> {
    /// Create a silent spectrum for the bins of an `length` point transform at `rate`
    ///
    /// Bucket `i` sits at `i * rate / length` Hz.
    ///
    /// # Example
    /// ```
    /// # use spectrum_core::analyzer;
    /// let spectrum = analyzer::Spectrum::silent(2048, 44100);
    /// assert_eq!(spectrum.len(), 2048);
    /// assert_eq!(spectrum.id_to_freq(1024), 22050.0);
    /// ```
    pub fn silent(length: usize, rate: usize) -> MagnitudeSpectrum {
        let length = length.max(2);
        let width = rate as Frequency / length as Frequency;

        Spectrum {
            buckets: vec![0.0; length],
            width,
            lowest: 0.0,
            highest: width * (length - 1) as Frequency,
        }
    }
}

impl<S: Storage> Spectrum<S> {
    /// Create a new spectrum
    ///
    /// Takes a storage buffer which is potentially prefilled with spectral data,
    /// the frequency associated with the lowest bucket and the frequency associated
    /// with the highest bucket.
    ///
    /// # Example
    /// ```
    /// # use spectrum_core::analyzer;
    /// const N: usize = 128;
    /// let spectrum = analyzer::Spectrum::new(vec![0.0; N], 440.0, 660.0);
    /// ```
    pub fn new(data: S, low: Frequency, high: Frequency) -> Spectrum<S> {
        Spectrum {
            width: (high - low) / (data.len() as Frequency - 1.0),
            lowest: low,
            highest: high,

            buckets: data,
        }
    }

    /// Return the frequency of the highest bucket
    #[inline]
    pub fn highest(&self) -> Frequency {
        self.highest
    }

    /// Return the frequency distance between two adjacent buckets
    #[inline]
    pub fn width(&self) -> Frequency {
        self.width
    }

    /// Return the frequency associated with a bucket
    pub fn id_to_freq(&self, i: usize) -> Frequency {
        assert!(i < self.buckets.len());

        i as Frequency * self.width + self.lowest
    }

    /// Iterate over the buckets of this spectrum
    pub fn iter<'a>(&'a self) -> std::slice::Iter<'a, SignalStrength> {
        self.buckets.iter()
    }

    /// Return the buckets in `start..end`, cut off at the end of the spectrum
    pub fn range(&self, start: usize, end: usize) -> &[SignalStrength] {
        let end = end.min(self.buckets.len());
        let start = start.min(end);

        &self.buckets[start..end]
    }

    /// Return the number of buckets in this spectrum
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn as_ref<'a>(&'a self) -> Spectrum<&'a [SignalStrength]> {
        Spectrum {
            buckets: &self.buckets,
            width: self.width,
            lowest: self.lowest,
            highest: self.highest,
        }
    }
}

impl<S: StorageMut> Spectrum<S> {
    /// Iterate over this spectrums buckets mutably
    pub fn iter_mut<'a>(&'a mut self) -> std::slice::IterMut<'a, SignalStrength> {
        self.buckets.iter_mut()
    }

    /// Fill this spectrum with values from another one
    pub fn fill_from<S2: Storage>(&mut self, other: &Spectrum<S2>) {
        assert_eq!(self.len(), other.len(), "Spectrums have different sizes!");

        self.width = other.width;
        self.lowest = other.lowest;
        self.highest = other.highest;

        for (s, o) in self.iter_mut().zip(other.iter()) {
            *s = *o;
        }
    }
}
