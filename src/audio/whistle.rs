use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44100;
const TOTAL_SECS: f32 = 3.0;

/// Referee whistle chime.
///
/// Two closely detuned tones (2500 / 2300 Hz) sharing a 35 Hz frequency
/// wobble, shaped by a quick rise, a long hold and a short fall. The
/// wobble is what makes it read as a whistle rather than a beep.
pub struct RefereeWhistle {
    phase_a: f32,
    phase_b: f32,
    num_sample: usize,
}

impl RefereeWhistle {
    pub fn new() -> Self {
        Self {
            phase_a: 0.0,
            phase_b: 0.0,
            num_sample: 0,
        }
    }

    fn envelope(t: f32) -> f32 {
        if t < 0.1 {
            0.6 * (t / 0.1)
        } else if t < 2.5 {
            0.6
        } else if t < TOTAL_SECS {
            0.6 * (1.0 - (t - 2.5) / 0.5)
        } else {
            0.0
        }
    }
}

impl Iterator for RefereeWhistle {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let t = self.num_sample as f32 / SAMPLE_RATE as f32;
        if t >= TOTAL_SECS {
            return None;
        }
        self.num_sample += 1;

        let wobble = 500.0 * (2.0 * PI * 35.0 * t).sin();
        self.phase_a += 2.0 * PI * (2500.0 + wobble) / SAMPLE_RATE as f32;
        self.phase_b += 2.0 * PI * (2300.0 + wobble) / SAMPLE_RATE as f32;
        self.phase_a %= 2.0 * PI;
        self.phase_b %= 2.0 * PI;

        let sample = (self.phase_a.sin() + self.phase_b.sin()) * 0.5;
        Some(sample * Self::envelope(t))
    }
}

impl Source for RefereeWhistle {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(TOTAL_SECS))
    }
}
