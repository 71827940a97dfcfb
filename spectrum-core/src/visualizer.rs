use crate::{analyzer, playback};

/// Builder for a playback session and its frame iterator
///
/// Anything not set explicitly is taken from the config.
#[derive(Debug)]
pub struct Visualizer<D, F> {
    pub decoder: D,
    /// Opens the output device on the playback thread
    pub open: F,
    pub analyzer: Option<analyzer::FourierAnalyzer>,
    pub bars: Option<usize>,
    pub falling_speed: Option<analyzer::SignalStrength>,
}

impl<D, F, O> Visualizer<D, F>
where
    D: playback::Decoder + 'static,
    F: FnOnce() -> crate::Result<O> + Send + 'static,
    O: playback::OutputDevice + 'static,
{
    pub fn new(decoder: D, open: F) -> Visualizer<D, F> {
        Visualizer {
            decoder,
            open,
            analyzer: None,
            bars: None,
            falling_speed: None,
        }
    }

    pub fn analyzer(mut self, analyzer: analyzer::FourierAnalyzer) -> Visualizer<D, F> {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn bars(mut self, count: usize) -> Visualizer<D, F> {
        self.bars = Some(count);
        self
    }

    pub fn falling_speed(mut self, speed: analyzer::SignalStrength) -> Visualizer<D, F> {
        self.falling_speed = Some(speed);
        self
    }

    /// Start playback
    pub fn frames(self) -> crate::Result<crate::Frames> {
        let rate = self.decoder.rate();
        let analyzer = self
            .analyzer
            .unwrap_or_else(|| analyzer::FourierBuilder::new().rate(rate).plan());

        let mut bars = analyzer::BarBuilder::new();
        bars.window(analyzer.length());
        if let Some(count) = self.bars {
            bars.count(count);
        }
        let aggregator = bars.build()?;

        let tracker = match self.falling_speed {
            Some(speed) => analyzer::PeakTracker::new(aggregator.count(), speed),
            None => analyzer::PeakTracker::from_config(aggregator.count()),
        };

        crate::Frames::start(self.decoder, self.open, analyzer, aggregator, tracker)
    }
}
