//! Bar Aggregation
//!
//! Bars are mirrored around the center of the display: the middle bar shows the
//! lowest buckets and bars further out on either side show higher ones.
use crate::analyzer;
use crate::analyzer::spectrum::Storage;
use crate::Error;

#[derive(Debug, Default)]
pub struct BarBuilder {
    /// Number of bars
    ///
    /// Can also be set from config as `"bars.count"`.
    pub count: Option<usize>,

    /// Length of the spectra that will be aggregated
    ///
    /// Can also be set from config as `"audio.fourier.length"`.
    pub window: Option<usize>,
}

impl BarBuilder {
    pub fn new() -> BarBuilder {
        Default::default()
    }

    pub fn count(&mut self, count: usize) -> &mut BarBuilder {
        self.count = Some(count);
        self
    }

    pub fn window(&mut self, window: usize) -> &mut BarBuilder {
        self.window = Some(window);
        self
    }

    pub fn build(&mut self) -> crate::Result<BarAggregator> {
        let count = self
            .count
            .unwrap_or_else(|| crate::CONFIG.get_or("bars.count", 31));
        let window = self
            .window
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.fourier.length", 2048));

        BarAggregator::new(count, window)
    }
}

/// Maps spectrum buckets onto bars
#[derive(Debug, Clone)]
pub struct BarAggregator {
    count: usize,
    group: usize,
}

impl BarAggregator {
    fn new(count: usize, window: usize) -> crate::Result<BarAggregator> {
        if count == 0 || window / count / 2 == 0 {
            return Err(Error::InvalidBarLayout { count, window });
        }

        let group = window / count / 2;

        log::debug!("BarAggregator:");
        log::debug!("    Bars                = {:8}", count);
        log::debug!("    Buckets per Bar     = {:8}", group);

        Ok(BarAggregator { count, group })
    }

    /// Number of bars
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of buckets averaged into one bar
    #[inline]
    pub fn group(&self) -> usize {
        self.group
    }

    /// Index of the first spectrum bucket shown by `bar`
    ///
    /// # Example
    /// ```
    /// # use spectrum_core::analyzer::BarBuilder;
    /// let bars = BarBuilder::new().count(31).window(2048).build().unwrap();
    ///
    /// assert_eq!(bars.effective_index(0), 15);
    /// assert_eq!(bars.effective_index(15), 0);
    /// assert_eq!(bars.effective_index(30), 15);
    /// ```
    pub fn effective_index(&self, bar: usize) -> usize {
        let center = self.count / 2;

        if bar < center {
            center - bar
        } else {
            bar - center
        }
    }

    /// Average magnitude shown by `bar`
    ///
    /// The buckets `[h, h + group)` are averaged, `h` being the effective index.  The
    /// range is cut off at the end of the spectrum and only the buckets that exist
    /// count towards the average.
    pub fn aggregate<S: Storage>(
        &self,
        spectrum: &analyzer::Spectrum<S>,
        bar: usize,
    ) -> crate::Result<analyzer::SignalStrength> {
        if bar >= self.count {
            return Err(Error::BarOutOfRange {
                index: bar,
                count: self.count,
            });
        }

        let start = self.effective_index(bar);
        let buckets = spectrum.range(start, start + self.group);

        if buckets.is_empty() {
            return Ok(0.0);
        }

        let sum: analyzer::SignalStrength = buckets.iter().sum();
        Ok(sum / buckets.len() as analyzer::SignalStrength)
    }

    /// Frequencies of the lowest and highest bucket shown by `bar`
    pub fn frequency_range<S: Storage>(
        &self,
        spectrum: &analyzer::Spectrum<S>,
        bar: usize,
    ) -> Option<(analyzer::Frequency, analyzer::Frequency)> {
        if bar >= self.count {
            return None;
        }

        let start = self.effective_index(bar);
        let end = (start + self.group).min(spectrum.len());

        if start >= end {
            None
        } else {
            Some((spectrum.id_to_freq(start), spectrum.id_to_freq(end - 1)))
        }
    }
}
