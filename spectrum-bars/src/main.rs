use spectrum_core::playback::{self, symphonia::SymphoniaDecoder, Decoder};
use spectrum_core::render;
use std::io::Write;

/// Draws bars as text, one column of characters per bar
struct Terminal {
    rows: usize,
    grid: Vec<Vec<char>>,
}

impl Terminal {
    fn new(rows: usize) -> Terminal {
        Terminal {
            rows,
            grid: Vec::new(),
        }
    }

    fn row_of(&self, height: f32) -> Option<usize> {
        let row = height.round();
        if row < 1.0 || row as usize > self.rows {
            None
        } else {
            Some(row as usize - 1)
        }
    }
}

impl render::DrawTarget for Terminal {
    fn begin_frame(&mut self) {
        self.grid.clear();
    }

    fn draw_bar(&mut self, _index: usize, bar: &render::BarGeometry) {
        let mut column = vec![' '; self.rows];

        let level = (bar.level.round().max(0.0) as usize).min(self.rows);
        for c in column[..level].iter_mut() {
            *c = '#';
        }
        if let Some(row) = self.row_of(bar.top) {
            column[row] = '-';
        }
        if let Some(row) = self.row_of(bar.max) {
            column[row] = '=';
        }

        self.grid.push(column);
    }

    fn end_frame(&mut self) {
        let mut out = String::with_capacity((self.grid.len() * 2 + 1) * self.rows + 8);
        out.push_str("\x1b[H\x1b[2J");

        for row in (0..self.rows).rev() {
            for column in self.grid.iter() {
                out.push(column[row]);
                out.push(column[row]);
            }
            out.push('\n');
        }

        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        if let Err(err) = lock.write_all(out.as_bytes()).and_then(|_| lock.flush()) {
            log::warn!("Failed to draw frame: {}", err);
        }
    }
}

fn run() -> spectrum_core::Result<()> {
    let file = std::env::args().nth(1).unwrap_or_else(|| {
        spectrum_core::CONFIG.get_or("audio.file", "data/track.mp3".to_string())
    });

    let decoder = SymphoniaDecoder::open(&file)?;
    let (rate, channels) = (decoder.rate(), decoder.channels());

    let rows = spectrum_core::CONFIG.get_or("display.rows", 24);
    // Columns are placed by the terminal, only heights matter
    let layout = render::Layout {
        width: 0.0,
        height: rows as f32,
        scale: spectrum_core::CONFIG.get_or("display.scale", 256.0),
    };
    let fps = spectrum_core::CONFIG.get_or("display.fps", 30);
    let interval = spectrum_core::helpers::frame_interval(fps);
    let linger = spectrum_core::CONFIG.get_or("display.linger", 2.0);

    let mut frames = spectrum_core::Visualizer::new(decoder, move || {
        playback::pulse::PulseDevice::new("spectrum-bars", rate, channels)
    })
    .frames()?;
    let mut terminal = Terminal::new(rows);
    let mut stopped_at = None;

    for frame in frames.iter() {
        log::trace!("Frame: {:7}@{:.3}", frame.frame, frame.time);

        frame.draw(&layout, &mut terminal);

        if !frame.playing {
            let since = *stopped_at.get_or_insert(frame.time);
            if frame.settled() || frame.time - since > linger {
                break;
            }
        }

        std::thread::sleep(interval);
    }

    match frames.stop()? {
        playback::Outcome::EndOfStream => log::info!("Finished {}", file),
        playback::Outcome::Stopped => log::info!("Stopped {}", file),
    }

    Ok(())
}

fn main() {
    spectrum_core::default_config();
    spectrum_core::default_log();

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
