//! Bar geometry and the draw target seam
use crate::analyzer;

/// Where and how tall to draw one bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    /// Left edge of the bar
    pub x: f32,
    pub width: f32,
    /// Height of the bar itself
    pub level: f32,
    /// Height of the falling peak marker
    pub top: f32,
    /// Height of the all-time maximum marker
    pub max: f32,
}

/// Receives the bars of each frame
///
/// Does the actual drawing, e.g. into a window or a terminal.
pub trait DrawTarget {
    fn begin_frame(&mut self) {}

    fn draw_bar(&mut self, index: usize, bar: &BarGeometry);

    fn end_frame(&mut self) {}
}

/// Display size and magnitude scaling
///
/// A magnitude of `scale` maps to twice the display height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Default for Layout {
    fn default() -> Layout {
        Layout {
            width: 800.0,
            height: 480.0,
            scale: 256.0,
        }
    }
}

impl Layout {
    /// Read `display.width`, `display.height` and `display.scale` from config
    pub fn from_config() -> Layout {
        let def = Layout::default();

        Layout {
            width: crate::CONFIG.get_or("display.width", def.width),
            height: crate::CONFIG.get_or("display.height", def.height),
            scale: crate::CONFIG.get_or("display.scale", def.scale),
        }
    }

    /// Height for a magnitude
    #[inline]
    pub fn height_of(&self, value: analyzer::SignalStrength) -> f32 {
        value / self.scale * self.height * 2.0
    }

    pub fn bar_width(&self, count: usize) -> f32 {
        self.width / count.max(1) as f32
    }

    pub fn geometry(&self, index: usize, count: usize, bar: &analyzer::Bar) -> BarGeometry {
        let width = self.bar_width(count);

        BarGeometry {
            x: index as f32 * width,
            width,
            level: self.height_of(bar.level),
            top: self.height_of(bar.top),
            max: self.height_of(bar.max),
        }
    }

    /// Emit all bars of a frame to `target`
    pub fn draw<T: DrawTarget + ?Sized>(&self, bars: &[analyzer::Bar], target: &mut T) {
        target.begin_frame();
        for (i, bar) in bars.iter().enumerate() {
            target.draw_bar(i, &self.geometry(i, bars.len(), bar));
        }
        target.end_frame();
    }
}
