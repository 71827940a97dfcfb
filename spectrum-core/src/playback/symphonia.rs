//! File decoding with symphonia
use crate::analyzer;
use crate::Error;
use std::path;
use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decodes the first audio track of a file into interleaved 16 bit samples
///
/// Reads MP3 and PCM WAV files.
pub struct SymphoniaDecoder {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
    track: u32,
    rate: usize,
    channels: usize,

    converted: Option<SampleBuffer<analyzer::Sample>>,
    spec: Option<SignalSpec>,
    capacity: usize,
    cursor: usize,
}

impl std::fmt::Debug for SymphoniaDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "SymphoniaDecoder {{ track: {:?}, rate: {:?}, channels: {:?} }}",
            self.track, self.rate, self.channels,
        )
    }
}

impl SymphoniaDecoder {
    pub fn open<P: AsRef<path::Path>>(path: P) -> crate::Result<SymphoniaDecoder> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(Error::decode)?;
        let format = probed.format;

        let (track, params) = {
            let track = format
                .tracks()
                .iter()
                .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
                .ok_or_else(|| Error::decode("no decodable audio track"))?;

            (track.id, track.codec_params.clone())
        };

        let rate = params
            .sample_rate
            .ok_or_else(|| Error::decode("unknown sample rate"))? as usize;
        let channels = params.channels.map(|c| c.count()).unwrap_or(0);
        if channels != 1 && channels != 2 {
            return Err(Error::UnsupportedChannels(channels));
        }

        let decoder = symphonia::default::get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(Error::decode)?;

        log::debug!("SymphoniaDecoder:");
        log::debug!("    File        = {}", path.display());
        log::debug!("    Track       = {:6}", track);
        log::debug!("    Sample Rate = {:6}", rate);
        log::debug!("    Channels    = {:6}", channels);

        Ok(SymphoniaDecoder {
            format,
            decoder,
            track,
            rate,
            channels,

            converted: None,
            spec: None,
            capacity: 0,
            cursor: 0,
        })
    }

    fn pending(&self) -> &[analyzer::Sample] {
        match self.converted {
            Some(ref buf) => &buf.samples()[self.cursor..],
            None => &[],
        }
    }

    /// Decode the next packet of our track
    ///
    /// Returns `false` at the end of the stream.
    fn decode_next(&mut self) -> crate::Result<bool> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(false)
                }
                Err(e) => return Err(Error::decode(e)),
            };

            if packet.track_id() != self.track {
                continue;
            }

            let decoded = self.decoder.decode(&packet).map_err(Error::decode)?;
            let spec = *decoded.spec();
            let frames = decoded.capacity();

            if self.spec != Some(spec) || frames > self.capacity {
                self.converted = Some(SampleBuffer::new(frames as u64, spec));
                self.spec = Some(spec);
                self.capacity = frames;
            }

            self.cursor = 0;
            if let Some(ref mut buf) = self.converted {
                buf.copy_interleaved_ref(decoded);

                if !buf.samples().is_empty() {
                    return Ok(true);
                }
            }
        }
    }
}

impl super::Decoder for SymphoniaDecoder {
    fn read_samples(&mut self, buf: &mut [analyzer::Sample]) -> crate::Result<usize> {
        let mut written = 0;

        while written < buf.len() {
            let n = {
                let pending = self.pending();
                let n = pending.len().min(buf.len() - written);
                buf[written..written + n].copy_from_slice(&pending[..n]);
                n
            };

            if n == 0 {
                if !self.decode_next()? {
                    break;
                }
                continue;
            }

            self.cursor += n;
            written += n;
        }

        Ok(written)
    }

    fn rate(&self) -> usize {
        self.rate
    }

    fn channels(&self) -> usize {
        self.channels
    }
}
