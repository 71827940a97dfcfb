use crate::{analyzer, playback, render};
use std::{cell, rc, time};

#[derive(Debug)]
pub struct Frame {
    pub time: f32,
    pub frame: usize,
    /// Whether the playback thread was still running when this frame started
    pub playing: bool,
    tracker: rc::Rc<cell::RefCell<analyzer::PeakTracker>>,
}

impl Frame {
    pub fn bars<F, O>(&self, f: F) -> O
    where
        F: FnOnce(&[analyzer::Bar]) -> O,
    {
        f(self.tracker.borrow().bars())
    }

    /// True once every peak marker has fallen back to zero
    pub fn settled(&self) -> bool {
        self.tracker.borrow().settled()
    }

    pub fn draw<T: render::DrawTarget + ?Sized>(&self, layout: &render::Layout, target: &mut T) {
        layout.draw(self.tracker.borrow().bars(), target)
    }
}

pub struct Frames {
    spectrum: triple_buffer::Output<analyzer::MagnitudeSpectrum>,
    aggregator: analyzer::BarAggregator,
    tracker: rc::Rc<cell::RefCell<analyzer::PeakTracker>>,
    player: playback::Player,
}

impl std::fmt::Debug for Frames {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Frames {{ aggregator: {:?}, player: {:?} }}",
            self.aggregator, self.player,
        )
    }
}

impl Frames {
    /// Start playback and prepare the render side
    pub fn start<D, F, O>(
        decoder: D,
        open: F,
        analyzer: analyzer::FourierAnalyzer,
        aggregator: analyzer::BarAggregator,
        tracker: analyzer::PeakTracker,
    ) -> crate::Result<Frames>
    where
        D: playback::Decoder + 'static,
        F: FnOnce() -> crate::Result<O> + Send + 'static,
        O: playback::OutputDevice + 'static,
    {
        let initial = analyzer::Spectrum::silent(analyzer.length(), analyzer.rate());

        for bar in 0..aggregator.count() {
            if let Some((low, high)) = aggregator.frequency_range(&initial, bar) {
                log::debug!("    Bar {:3}           = {:8.1} - {:8.1} Hz", bar, low, high);
            }
        }

        let (input, output) = triple_buffer::TripleBuffer::new(initial).split();
        let player = playback::Player::start(decoder, open, analyzer, input)?;

        Ok(Frames {
            spectrum: output,
            aggregator,
            tracker: rc::Rc::new(cell::RefCell::new(tracker)),
            player,
        })
    }

    pub fn player(&mut self) -> &mut playback::Player {
        &mut self.player
    }

    /// Stop playback and wait for the playback thread
    ///
    /// Bar state stays available, frames can still be drawn afterwards.
    pub fn stop(&mut self) -> crate::Result<playback::Outcome> {
        self.player.stop();
        self.player.join()
    }

    pub fn iter<'a>(&'a mut self) -> FramesIter<'a> {
        FramesIter {
            frames: self,
            start_time: time::Instant::now(),
            frame: 0,
        }
    }
}

#[derive(Debug)]
pub struct FramesIter<'a> {
    frames: &'a mut Frames,
    start_time: time::Instant,
    frame: usize,
}

impl<'a> Iterator for FramesIter<'a> {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let playing = self.frames.player.is_playing();

        {
            let spectrum = self.frames.spectrum.read();
            let mut tracker = self.frames.tracker.borrow_mut();

            if let Err(err) = tracker.update(&self.frames.aggregator, spectrum) {
                log::error!("Frame {}: {}", self.frame, err);
            }
        }

        let frame = self.frame;
        self.frame += 1;
        log::trace!("Frame: {:7}", frame);

        Some(Frame {
            time: crate::helpers::elapsed(self.start_time),
            frame,
            playing,
            tracker: self.frames.tracker.clone(),
        })
    }
}
