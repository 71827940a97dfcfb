//! Peak hold and decay
use crate::analyzer;
use crate::analyzer::spectrum::Storage;

/// State of a single displayed bar
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bar {
    /// Average magnitude of the current frame
    pub level: analyzer::SignalStrength,
    /// Highest level this bar has reached during the session
    pub max: analyzer::SignalStrength,
    /// Recent peak, falls a bit every frame
    pub top: analyzer::SignalStrength,
}

impl Bar {
    fn observe(&mut self, level: analyzer::SignalStrength) {
        self.level = level;

        if level > self.max {
            self.max = level;
        }

        if level > self.top {
            self.top = level;
        }
    }

    fn fall(&mut self, speed: analyzer::SignalStrength) {
        self.top = (self.top - speed).max(0.0);
    }
}

/// Per-bar peak tracking
///
/// Decay is tied to the number of updates, not to wall-clock time.  A faster
/// render loop makes the peaks fall faster.
#[derive(Debug, Clone)]
pub struct PeakTracker {
    bars: Vec<Bar>,
    levels: Vec<analyzer::SignalStrength>,
    falling_speed: analyzer::SignalStrength,
}

impl PeakTracker {
    /// Create a tracker for `count` bars, all starting at zero
    ///
    /// `falling_speed` can also be taken from config as `"bars.falling_speed"`, see
    /// [`from_config`](#method.from_config).
    pub fn new(count: usize, falling_speed: analyzer::SignalStrength) -> PeakTracker {
        PeakTracker {
            bars: vec![Bar::default(); count],
            levels: vec![0.0; count],
            falling_speed,
        }
    }

    pub fn from_config(count: usize) -> PeakTracker {
        PeakTracker::new(
            count,
            crate::CONFIG.get_or("bars.falling_speed", 1.0 / 3.0),
        )
    }

    #[inline]
    pub fn falling_speed(&self) -> analyzer::SignalStrength {
        self.falling_speed
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Advance all bars by one frame
    ///
    /// Aggregates every bar from `spectrum`, raises maxima and peaks, then lets all
    /// peaks fall by the falling speed.  If aggregating any bar fails, no bar is
    /// touched.
    pub fn update<S: Storage>(
        &mut self,
        aggregator: &analyzer::BarAggregator,
        spectrum: &analyzer::Spectrum<S>,
    ) -> crate::Result<&[Bar]> {
        for (i, level) in self.levels.iter_mut().enumerate() {
            *level = aggregator.aggregate(spectrum, i)?;
        }

        for (bar, level) in self.bars.iter_mut().zip(self.levels.iter()) {
            bar.observe(*level);
        }

        for bar in self.bars.iter_mut() {
            bar.fall(self.falling_speed);
        }

        Ok(&self.bars)
    }

    /// True once no peak marker is left above zero
    pub fn settled(&self) -> bool {
        self.bars.iter().all(|b| b.top <= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{BarAggregator, BarBuilder, MagnitudeSpectrum, Spectrum};

    fn setup() -> (BarAggregator, PeakTracker) {
        let agg = BarBuilder::new().count(31).window(2048).build().unwrap();
        let tracker = PeakTracker::new(31, 1.0 / 3.0);

        (agg, tracker)
    }

    /// Spectrum where bar 15 shows exactly `level`
    fn center(level: f32) -> MagnitudeSpectrum {
        let mut spectrum = Spectrum::silent(2048, 44100);
        spectrum[0] = level * 33.0;
        spectrum
    }

    #[test]
    fn test_initial_state() {
        let (_, tracker) = setup();

        assert_eq!(tracker.bars().len(), 31);
        assert!(tracker.bars().iter().all(|b| *b == Bar::default()));
        assert!(tracker.settled());
    }

    #[test]
    fn test_decay_after_peak() {
        let (agg, mut tracker) = setup();
        tracker.bars[15].top = 10.0;

        let silence = center(0.0);
        for _ in 0..3 {
            tracker.update(&agg, &silence).unwrap();
        }

        assert!((tracker.bars()[15].top - 9.0).abs() < 1e-4);
        assert_eq!(tracker.bars()[15].level, 0.0);
    }

    #[test]
    fn test_decay_floors_at_zero() {
        let (agg, mut tracker) = setup();
        tracker.bars[3].top = 0.5;

        let silence = center(0.0);
        for _ in 0..5 {
            tracker.update(&agg, &silence).unwrap();
            assert!(tracker.bars()[3].top >= 0.0);
        }

        assert_eq!(tracker.bars()[3].top, 0.0);
        assert!(tracker.settled());
    }

    #[test]
    fn test_rearm() {
        let (agg, mut tracker) = setup();

        tracker.update(&agg, &center(6.0)).unwrap();
        let bar = tracker.bars()[15];
        assert!((bar.level - 6.0).abs() < 1e-4);
        assert!((bar.max - 6.0).abs() < 1e-4);
        assert!((bar.top - (6.0 - 1.0 / 3.0)).abs() < 1e-4);

        // A lower level does not re-arm the peak
        tracker.update(&agg, &center(2.0)).unwrap();
        assert!((tracker.bars()[15].top - (6.0 - 2.0 / 3.0)).abs() < 1e-4);

        // A higher one does
        tracker.update(&agg, &center(8.0)).unwrap();
        assert!((tracker.bars()[15].top - (8.0 - 1.0 / 3.0)).abs() < 1e-4);
        assert!(!tracker.settled());
    }

    #[test]
    fn test_top_only_rises_on_louder_frame() {
        let (agg, mut tracker) = setup();
        let levels = [4.0, 1.0, 0.0, 3.0, 3.5, 0.0, 9.0, 2.0, 0.0, 0.0];

        let mut last_top = 0.0;
        for level in levels.iter().cloned() {
            tracker.update(&agg, &center(level)).unwrap();
            let top = tracker.bars()[15].top;

            if level > last_top {
                assert!((top - (level - 1.0 / 3.0)).abs() < 1e-4);
            } else {
                let expected = (last_top - 1.0 / 3.0f32).max(0.0);
                assert!((top - expected).abs() < 1e-4, "{} != {}", top, expected);
            }

            last_top = top;
        }
    }

    #[test]
    fn test_max_monotonic() {
        let (agg, mut tracker) = setup();
        let levels = [1.0, 5.0, 2.0, 0.0, 7.0, 3.0, 0.0];

        let mut last = vec![0.0; 31];
        for level in levels.iter().cloned() {
            let bars = tracker.update(&agg, &center(level)).unwrap();

            for (bar, prev) in bars.iter().zip(last.iter_mut()) {
                assert!(bar.max >= *prev);
                *prev = bar.max;
            }
        }

        assert!((tracker.bars()[15].max - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_mirrored_bars_have_own_state() {
        let (agg, mut tracker) = setup();
        let mut spectrum = Spectrum::silent(2048, 44100);
        spectrum[40] = 33.0;

        tracker.update(&agg, &spectrum).unwrap();

        // Bars 7 and 23 both show buckets 8..41, each decays once per frame
        let expected = 1.0 - 1.0 / 3.0;
        assert!((tracker.bars()[7].top - expected).abs() < 1e-4);
        assert!((tracker.bars()[23].top - expected).abs() < 1e-4);
    }

    #[test]
    fn test_failed_update_leaves_state() {
        let (_, mut tracker) = setup();
        let small = BarBuilder::new().count(5).window(2048).build().unwrap();
        tracker.bars[0].top = 4.0;

        let before = tracker.bars().to_vec();
        assert!(tracker.update(&small, &center(3.0)).is_err());
        assert_eq!(tracker.bars(), &before[..]);
    }
}
