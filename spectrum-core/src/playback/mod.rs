//! Decode, analyze and play back audio on a separate thread
#[cfg(feature = "pulseaudio")]
pub mod pulse;

#[cfg(feature = "mp3")]
pub mod symphonia;

pub mod null;

pub use self::null::NullDevice;

use crate::analyzer;
use crate::Error;
use std::sync;
use std::sync::mpsc;
use std::thread;

/// Source of interleaved samples
///
/// The decoder is released when it is dropped.
pub trait Decoder: Send {
    /// Read up to `buf.len()` samples into `buf`
    ///
    /// Returns the number of samples read.  `0` marks the end of the stream.
    fn read_samples(&mut self, buf: &mut [analyzer::Sample]) -> crate::Result<usize>;

    /// Sample rate of the stream
    fn rate(&self) -> usize;

    /// Number of interleaved channels
    fn channels(&self) -> usize;
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn read_samples(&mut self, buf: &mut [analyzer::Sample]) -> crate::Result<usize> {
        (**self).read_samples(buf)
    }

    fn rate(&self) -> usize {
        (**self).rate()
    }

    fn channels(&self) -> usize {
        (**self).channels()
    }
}

/// Sink for decoded samples
///
/// Writes are expected to block while the device is busy, which paces the
/// playback thread.  A device is opened on the playback thread and released
/// there when it is dropped, so it does not have to be `Send`.
pub trait OutputDevice {
    fn write_samples(&mut self, samples: &[analyzer::Sample]) -> crate::Result<()>;
}

impl<O: OutputDevice + ?Sized> OutputDevice for Box<O> {
    fn write_samples(&mut self, samples: &[analyzer::Sample]) -> crate::Result<()> {
        (**self).write_samples(samples)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// How the playback thread ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The decoder ran out of samples
    EndOfStream,
    /// Playback was stopped from outside
    Stopped,
}

type SharedState = sync::Arc<parking_lot::Mutex<PlaybackState>>;

/// Handle to the playback thread
///
/// Dropping the handle stops playback and waits for the thread to exit.
#[derive(Debug)]
pub struct Player {
    state: SharedState,
    handle: Option<thread::JoinHandle<crate::Result<Outcome>>>,
}

impl Player {
    /// Start playing `decoder` on the device returned by `open`
    ///
    /// The device is opened on the playback thread and never leaves it.  If opening
    /// fails, the error is returned here and no playback happens.  Every chunk is
    /// analyzed with `analyzer` and the resulting spectrum is published through
    /// `spectrum`.  The analyzer's length decides the chunk size.
    pub fn start<D, F, O>(
        decoder: D,
        open: F,
        analyzer: analyzer::FourierAnalyzer,
        spectrum: triple_buffer::Input<analyzer::MagnitudeSpectrum>,
    ) -> crate::Result<Player>
    where
        D: Decoder + 'static,
        F: FnOnce() -> crate::Result<O> + Send + 'static,
        O: OutputDevice + 'static,
    {
        let state = sync::Arc::new(parking_lot::Mutex::new(PlaybackState::Playing));
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        log::debug!("Playback:");
        log::debug!("    Sample Rate = {:6}", decoder.rate());
        log::debug!("    Channels    = {:6}", decoder.channels());
        log::debug!("    Chunk Size  = {:6}", analyzer.length());

        let handle = {
            let state = state.clone();

            thread::Builder::new()
                .name("playback".into())
                .spawn(move || {
                    let _stopped = StopGuard(state.clone());

                    let device = match open() {
                        Ok(device) => device,
                        Err(err) => {
                            let _ = ready_tx.send(Err(err));
                            return Ok(Outcome::Stopped);
                        }
                    };
                    let _ = ready_tx.send(Ok(()));

                    Playback {
                        window: analyzer::SampleWindow::new(analyzer.length()),
                        decoder,
                        device,
                        analyzer,
                        spectrum,
                        state,
                    }
                    .run()
                })?
        };

        let mut player = Player {
            state,
            handle: Some(handle),
        };

        match ready_rx.recv() {
            Ok(Ok(())) => (),
            Ok(Err(err)) => {
                player.join()?;
                return Err(err);
            }
            // The thread died while opening the device
            Err(_) => {
                player.join()?;
                return Err(Error::PlaybackPanicked);
            }
        }

        log::info!("Playback started");
        Ok(player)
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.lock()
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    /// Ask the playback thread to stop after the current chunk
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if *state == PlaybackState::Playing {
            log::info!("Stopping playback");
            *state = PlaybackState::Stopped;
        }
    }

    /// Wait for the playback thread to exit
    ///
    /// Decoder and device are released before this returns.  Once the thread has
    /// been joined, further calls return `Outcome::Stopped`.
    pub fn join(&mut self) -> crate::Result<Outcome> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| Error::PlaybackPanicked)?,
            None => Ok(Outcome::Stopped),
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();

        if let Err(err) = self.join() {
            log::error!("Playback ended with an error: {}", err);
        }
    }
}

/// Number of whole frames in `samples`
///
/// Fails with `OutputFailure` if the samples do not split into frames of
/// `channels` samples each.
pub fn frame_count(samples: &[analyzer::Sample], channels: usize) -> crate::Result<usize> {
    if channels == 0 || samples.len() % channels != 0 {
        return Err(Error::output(format!(
            "{} samples do not make whole frames of {} channels",
            samples.len(),
            channels
        )));
    }

    Ok(samples.len() / channels)
}

/// Marks playback as stopped once the playback thread is done, even when it panics
struct StopGuard(SharedState);

impl Drop for StopGuard {
    fn drop(&mut self) {
        *self.0.lock() = PlaybackState::Stopped;
    }
}

/// Everything owned by the playback thread
struct Playback<D, O> {
    window: analyzer::SampleWindow,
    decoder: D,
    device: O,
    analyzer: analyzer::FourierAnalyzer,
    spectrum: triple_buffer::Input<analyzer::MagnitudeSpectrum>,
    state: SharedState,
}

impl<D: Decoder, O: OutputDevice> Playback<D, O> {
    fn run(&mut self) -> crate::Result<Outcome> {
        let res = self.play();

        match res {
            Ok(Outcome::EndOfStream) => log::info!("Playback reached the end of the stream"),
            Ok(Outcome::Stopped) => log::info!("Playback stopped"),
            Err(ref err) => log::error!("Playback failed: {}", err),
        }

        res
    }

    fn play(&mut self) -> crate::Result<Outcome> {
        while *self.state.lock() == PlaybackState::Playing {
            let read = self.window.fill(&mut self.decoder)?;
            if read == 0 {
                return Ok(Outcome::EndOfStream);
            }

            let spectrum = self.analyzer.analyze(self.window.samples())?;
            self.spectrum.raw_input_buffer().fill_from(&spectrum);
            self.spectrum.raw_publish();

            self.device.write_samples(self.window.decoded())?;
            log::trace!("Played {} samples", read);
        }

        Ok(Outcome::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{FourierBuilder, Sample, Spectrum};
    use std::sync::Arc;

    const N: usize = 256;

    /// Yields `chunks` reads of a constant signal, then the end of the stream or an
    /// error.  Counts how often it was asked for samples.
    struct TestDecoder {
        chunks: usize,
        fail: bool,
        reads: Arc<parking_lot::Mutex<usize>>,
    }

    impl Decoder for TestDecoder {
        fn read_samples(&mut self, buf: &mut [Sample]) -> crate::Result<usize> {
            *self.reads.lock() += 1;

            if self.chunks == 0 {
                if self.fail {
                    return Err(Error::decode("corrupt frame"));
                }
                return Ok(0);
            }

            self.chunks -= 1;
            for s in buf.iter_mut() {
                *s = 1000;
            }
            Ok(buf.len())
        }

        fn rate(&self) -> usize {
            8000
        }

        fn channels(&self) -> usize {
            1
        }
    }

    /// Never ends
    struct EndlessDecoder;

    impl Decoder for EndlessDecoder {
        fn read_samples(&mut self, buf: &mut [Sample]) -> crate::Result<usize> {
            std::thread::sleep(std::time::Duration::from_millis(1));
            Ok(buf.len())
        }

        fn rate(&self) -> usize {
            8000
        }

        fn channels(&self) -> usize {
            2
        }
    }

    #[derive(Clone, Default)]
    struct RecordingDevice {
        writes: Arc<parking_lot::Mutex<Vec<usize>>>,
    }

    impl OutputDevice for RecordingDevice {
        fn write_samples(&mut self, samples: &[Sample]) -> crate::Result<()> {
            self.writes.lock().push(samples.len());
            Ok(())
        }
    }

    fn start<D, O>(
        decoder: D,
        device: O,
    ) -> (Player, triple_buffer::Output<analyzer::MagnitudeSpectrum>)
    where
        D: Decoder + 'static,
        O: OutputDevice + Send + 'static,
    {
        let analyzer = FourierBuilder::new()
            .length(N)
            .rate(8000)
            .window(analyzer::window::none)
            .plan();
        let (input, output) = triple_buffer::TripleBuffer::new(Spectrum::silent(N, 8000)).split();

        (
            Player::start(decoder, move || Ok(device), analyzer, input).unwrap(),
            output,
        )
    }

    fn loud(chunks: usize) -> TestDecoder {
        TestDecoder {
            chunks,
            fail: false,
            reads: Default::default(),
        }
    }

    #[test]
    fn test_end_of_stream() {
        let reads = Arc::new(parking_lot::Mutex::new(0));
        let device = RecordingDevice::default();

        let (mut player, mut output) = start(
            TestDecoder {
                chunks: 3,
                fail: false,
                reads: reads.clone(),
            },
            device.clone(),
        );

        assert_eq!(player.join().unwrap(), Outcome::EndOfStream);
        assert_eq!(player.state(), PlaybackState::Stopped);

        // Three chunks played, one empty read, nothing afterwards
        assert_eq!(*device.writes.lock(), vec![N; 3]);
        assert_eq!(*reads.lock(), 4);

        // The last spectrum stays published
        let spectrum = output.read();
        assert!((spectrum[0] - 1000.0).abs() < 1e-2);

        assert_eq!(player.join().unwrap(), Outcome::Stopped);
    }

    #[test]
    fn test_decode_failure() {
        let device = RecordingDevice::default();

        let (mut player, _output) = start(
            TestDecoder {
                chunks: 2,
                fail: true,
                reads: Default::default(),
            },
            device.clone(),
        );

        match player.join() {
            Err(Error::DecodeFailure(_)) => (),
            other => panic!("Unexpected outcome: {:?}", other),
        }
        assert!(!player.is_playing());
        assert_eq!(device.writes.lock().len(), 2);
    }

    #[test]
    fn test_stop() {
        let device = RecordingDevice::default();
        let (mut player, _output) = start(EndlessDecoder, device.clone());

        assert!(player.is_playing());
        std::thread::sleep(std::time::Duration::from_millis(20));
        player.stop();

        assert_eq!(player.join().unwrap(), Outcome::Stopped);
        assert_eq!(player.state(), PlaybackState::Stopped);

        let writes = device.writes.lock().len();
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert_eq!(device.writes.lock().len(), writes);
    }

    struct BrokenDevice;

    impl OutputDevice for BrokenDevice {
        fn write_samples(&mut self, _samples: &[Sample]) -> crate::Result<()> {
            Err(Error::output("device unplugged"))
        }
    }

    #[test]
    fn test_output_failure() {
        let (mut player, mut output) = start(loud(4), BrokenDevice);

        match player.join() {
            Err(Error::OutputFailure(_)) => (),
            other => panic!("Unexpected outcome: {:?}", other),
        }
        assert_eq!(player.state(), PlaybackState::Stopped);

        // The first chunk was analyzed before the write failed
        assert!((output.read()[0] - 1000.0).abs() < 1e-2);
    }

    struct PanickingDevice;

    impl OutputDevice for PanickingDevice {
        fn write_samples(&mut self, _samples: &[Sample]) -> crate::Result<()> {
            panic!("device driver crashed");
        }
    }

    #[test]
    fn test_panic_stops_playback() {
        let (mut player, _output) = start(loud(4), PanickingDevice);

        match player.join() {
            Err(Error::PlaybackPanicked) => (),
            other => panic!("Unexpected outcome: {:?}", other),
        }
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_device_open_failure() {
        let reads = Arc::new(parking_lot::Mutex::new(0));
        let decoder = TestDecoder {
            chunks: 4,
            fail: false,
            reads: reads.clone(),
        };
        let analyzer = FourierBuilder::new()
            .length(N)
            .rate(8000)
            .window(analyzer::window::none)
            .plan();
        let (input, _output) = triple_buffer::TripleBuffer::new(Spectrum::silent(N, 8000)).split();

        let res = Player::start(
            decoder,
            || -> crate::Result<RecordingDevice> { Err(Error::UnsupportedChannels(3)) },
            analyzer,
            input,
        );

        match res {
            Err(Error::UnsupportedChannels(3)) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
        assert_eq!(*reads.lock(), 0);
    }

    #[test]
    fn test_frame_count() {
        assert_eq!(frame_count(&[0; 8], 2).unwrap(), 4);
        assert_eq!(frame_count(&[0; 3], 1).unwrap(), 3);

        match frame_count(&[0; 5], 2) {
            Err(Error::OutputFailure(_)) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
        assert!(frame_count(&[0; 4], 0).is_err());
    }

    #[test]
    fn test_drop_joins() {
        let device = RecordingDevice::default();
        let (player, _output) = start(EndlessDecoder, device.clone());

        drop(player);

        // The thread owned a clone of the device, it must be gone now
        assert_eq!(Arc::strong_count(&device.writes), 1);
    }
}
