//! Sample Window
use crate::playback;

pub type Sample = i16;

/// Fixed size window of interleaved samples
///
/// Allocated once and refilled in place for every chunk the decoder delivers.  The
/// window always holds exactly `len()` samples: if the stream ends before the window
/// is full, the rest is zeroed.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    buf: Vec<Sample>,
    filled: usize,
}

impl SampleWindow {
    pub fn new(size: usize) -> SampleWindow {
        SampleWindow {
            buf: vec![0; size],
            filled: 0,
        }
    }

    /// Number of samples in this window
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Number of samples the last `fill` read from the decoder
    #[inline]
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// The whole window, including zero padding
    pub fn samples(&self) -> &[Sample] {
        &self.buf
    }

    /// Only the samples the decoder actually delivered
    pub fn decoded(&self) -> &[Sample] {
        &self.buf[..self.filled]
    }

    /// Refill the window from `decoder`
    ///
    /// Reads until the window is full or the decoder reports the end of the stream.
    /// Returns the number of samples read, `0` means the stream has ended.
    pub fn fill<D: playback::Decoder + ?Sized>(&mut self, decoder: &mut D) -> crate::Result<usize> {
        let mut filled = 0;

        while filled < self.buf.len() {
            let read = decoder.read_samples(&mut self.buf[filled..])?;
            if read == 0 {
                break;
            }
            filled += read;
        }

        for s in self.buf[filled..].iter_mut() {
            *s = 0;
        }

        log::trace!("Read {} samples", filled);
        self.filled = filled;
        Ok(filled)
    }
}
