use crate::analyzer;
use crate::Error;

enum Stream {
    Mono(pulse_simple::Playback<[analyzer::Sample; 1]>, Vec<[analyzer::Sample; 1]>),
    Stereo(pulse_simple::Playback<[analyzer::Sample; 2]>, Vec<[analyzer::Sample; 2]>),
}

/// Pulseaudio playback stream
///
/// Writes block until pulseaudio has taken the samples, so this device paces the
/// playback thread.  The stream is tied to the thread that opened it, open it from
/// the device callback passed to [`Player::start`](../struct.Player.html#method.start).
pub struct PulseDevice {
    stream: Stream,
}

impl std::fmt::Debug for PulseDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.stream {
            Stream::Mono(..) => write!(f, "PulseDevice {{ mono }}"),
            Stream::Stereo(..) => write!(f, "PulseDevice {{ stereo }}"),
        }
    }
}

impl PulseDevice {
    /// Open a playback stream, mono or stereo depending on `channels`
    pub fn new(name: &str, rate: usize, channels: usize) -> crate::Result<PulseDevice> {
        log::debug!("Pulseaudio:");
        log::debug!("    Sample Rate = {:6}", rate);
        log::debug!("    Channels    = {:6}", channels);

        let stream = match channels {
            1 => Stream::Mono(
                pulse_simple::Playback::new(name, "Spectrum playback", None, rate as u32),
                Vec::new(),
            ),
            2 => Stream::Stereo(
                pulse_simple::Playback::new(name, "Spectrum playback", None, rate as u32),
                Vec::new(),
            ),
            n => return Err(Error::UnsupportedChannels(n)),
        };

        Ok(PulseDevice { stream })
    }
}

impl super::OutputDevice for PulseDevice {
    fn write_samples(&mut self, samples: &[analyzer::Sample]) -> crate::Result<()> {
        match self.stream {
            Stream::Mono(ref playback, ref mut frames) => {
                super::frame_count(samples, 1)?;
                frames.clear();
                frames.extend(samples.iter().map(|s| [*s]));
                playback.write(&frames[..]);
            }
            Stream::Stereo(ref playback, ref mut frames) => {
                super::frame_count(samples, 2)?;
                frames.clear();
                frames.extend(samples.chunks_exact(2).map(|s| [s[0], s[1]]));
                playback.write(&frames[..]);
            }
        }

        log::trace!("Wrote {} samples to pulseaudio", samples.len());
        Ok(())
    }
}
