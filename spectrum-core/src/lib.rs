//! Real-time spectrum bars for decoded audio.
//!
//! A playback thread decodes audio, runs a fourier transform over each chunk and
//! publishes the spectrum.  The render side turns the latest spectrum into a row of
//! mirrored bars with an all-time maximum and a slowly falling peak marker.
//!
//! # Example
//! ```rust,no_run
//! # use spectrum_core::playback::{Decoder, NullDevice};
//! # fn decoder() -> Box<dyn Decoder> { unimplemented!() }
//! // Initialize the logger.  Take a look at the sources if you want to customize
//! // the logger.
//! spectrum_core::default_log();
//!
//! // Load the default config source.  More about config later on.
//! spectrum_core::default_config();
//!
//! let decoder = decoder();
//! let (rate, channels) = (decoder.rate(), decoder.channels());
//!
//! // Starts the playback thread and opens the device on it.  Analyzer and bar
//! // layout come from the config unless set explicitly on the builder.
//! let mut frames = spectrum_core::Visualizer::new(decoder, move || {
//!     Ok(NullDevice::realtime(rate, channels))
//! })
//!     .bars(31)
//!     .frames()
//!     .expect("Failed to start playback");
//!
//! for frame in frames.iter() {
//!     frame.bars(|bars| {
//!         for bar in bars {
//!             for _ in 0..bar.level as usize {
//!                 print!("#");
//!             }
//!             println!("");
//!         }
//!     });
//!
//!     // The last spectrum stays visible after playback ended
//!     if !frame.playing {
//!         break;
//!     }
//!     std::thread::sleep(std::time::Duration::from_millis(30));
//! }
//! ```
pub mod analyzer;
pub mod error;
pub mod frames;
pub mod helpers;
pub mod playback;
pub mod render;
pub mod visualizer;

#[doc(inline)]
pub use crate::error::{Error, Result};
#[doc(inline)]
pub use crate::frames::{Frame, Frames};
#[doc(inline)]
pub use crate::visualizer::Visualizer;

/// `ezconf` configuration
///
/// Usually you will call [`default_config`](fn.default_config.html) in the beginning
/// which will populate this object, but you can also specify your own custom config
/// sources.
///
/// # Example
/// To make use of this config, use code similar to this:
///
/// ```rust
/// # spectrum_core::default_config();
/// let bars = spectrum_core::CONFIG.get_or(
///     // Toml path to value
///     "bars.count",
///     // Default value.  Type gets inferred from this
///     31,
/// );
/// ```
pub static CONFIG: ezconf::Config = ezconf::INIT;

/// Initialize config from default sources
///
/// The default sources are:
/// * `./spectrum.toml`
/// * `./config/spectrum.toml`
/// * Defaults from code
pub fn default_config() {
    CONFIG
        .init(
            [
                ezconf::Source::File("spectrum.toml"),
                ezconf::Source::File("config/spectrum.toml"),
            ]
            .iter(),
        )
        .expect("Can't load config");
}

/// Initialize logger
///
/// By default, enable debug output in debug-builds.
pub fn default_log() {
    #[cfg(not(debug_assertions))]
    env_logger::init();

    #[cfg(debug_assertions)]
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    color_backtrace::install();
}
