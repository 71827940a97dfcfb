use std::time;

/// Seconds passed since `start`
pub fn elapsed(start: time::Instant) -> f32 {
    let elapsed = time::Instant::now() - start;

    elapsed.as_secs() as f32 + elapsed.subsec_nanos() as f32 * 1e-9
}

/// Time budget of one frame at `fps` frames per second
pub fn frame_interval(fps: u32) -> time::Duration {
    time::Duration::from_micros(1_000_000 / u64::from(fps.max(1)))
}

/// Time it takes to play back `samples` interleaved samples
pub fn playback_duration(samples: usize, rate: usize, channels: usize) -> time::Duration {
    let frames_per_sec = (rate * channels.max(1)).max(1) as u64;

    time::Duration::from_nanos(samples as u64 * 1_000_000_000 / frames_per_sec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(50), time::Duration::from_millis(20));
        assert_eq!(frame_interval(0), time::Duration::from_secs(1));
    }

    #[test]
    fn test_playback_duration() {
        assert_eq!(
            playback_duration(88200, 44100, 2),
            time::Duration::from_secs(1)
        );
        assert_eq!(
            playback_duration(4000, 8000, 1),
            time::Duration::from_millis(500)
        );
    }
}
