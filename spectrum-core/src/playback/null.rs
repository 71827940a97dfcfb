use crate::analyzer;
use std::thread;

/// Output device that throws all samples away
///
/// Without pacing, the playback thread runs as fast as the decoder allows.  With
/// [`realtime`](#method.realtime), every write sleeps for as long as the samples
/// would take to play, which keeps the spectrum in step with wall-clock time.
#[derive(Debug, Default)]
pub struct NullDevice {
    pace: Option<(usize, usize)>,
}

impl NullDevice {
    pub fn new() -> NullDevice {
        Default::default()
    }

    pub fn realtime(rate: usize, channels: usize) -> NullDevice {
        NullDevice {
            pace: Some((rate, channels)),
        }
    }
}

impl super::OutputDevice for NullDevice {
    fn write_samples(&mut self, samples: &[analyzer::Sample]) -> crate::Result<()> {
        if let Some((rate, channels)) = self.pace {
            super::frame_count(samples, channels)?;
            thread::sleep(crate::helpers::playback_duration(
                samples.len(),
                rate,
                channels,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::OutputDevice;
    use std::time;

    #[test]
    fn test_realtime_pacing() {
        let mut device = NullDevice::realtime(8000, 2);

        let start = time::Instant::now();
        device.write_samples(&[0; 800]).unwrap();

        assert!(start.elapsed() >= time::Duration::from_millis(50));
    }

    #[test]
    fn test_realtime_partial_frame() {
        let mut device = NullDevice::realtime(8000, 2);

        match device.write_samples(&[0; 801]) {
            Err(crate::Error::OutputFailure(_)) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unpaced() {
        let mut device = NullDevice::new();

        for _ in 0..100 {
            device.write_samples(&[0; 4096]).unwrap();
        }
    }
}
