//! Synthesized sound effects over Web Audio.
//!
//! Every call is best-effort: a missing or failing audio context only logs.

use rand::Rng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsValue;
use web_sys::{
    AudioBufferSourceNode, AudioContext, AudioContextState, BiquadFilterType, GainNode,
    OscillatorType,
};

use crate::utils::game_rng;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Sound {
    Move,
    Dice,
    Capture,
    Card,
    Whistle,
    Win,
    Loss,
    Applause,
}

/// One oscillator burst, timed relative to the moment the sound is played.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Tone {
    at: f64,
    wave: OscillatorType,
    freq: f32,
    /// Exponential pitch glide: target and time to reach it.
    glide: Option<(f32, f64)>,
    volume: f32,
    fade_to: f32,
    length: f64,
}

impl Tone {
    const fn new(wave: OscillatorType, freq: f32, volume: f32, fade_to: f32, length: f64) -> Self {
        Self {
            at: 0.0,
            wave,
            freq,
            glide: None,
            volume,
            fade_to,
            length,
        }
    }

    const fn glide(mut self, target: f32, time: f64) -> Self {
        self.glide = Some((target, time));
        self
    }

    const fn at(mut self, at: f64) -> Self {
        self.at = at;
        self
    }
}

const WIN_NOTES: [f32; 4] = [523.25, 659.25, 783.99, 1046.5];
const LOSS_NOTES: [f32; 3] = [300.0, 200.0, 150.0];

impl Sound {
    fn tones<R: Rng + ?Sized>(self, rng: &mut R) -> Vec<Tone> {
        use OscillatorType::*;
        match self {
            Self::Move => vec![Tone::new(Sine, 400.0, 0.05, 0.01, 0.1).glide(150.0, 0.1)],
            Self::Dice => vec![Tone::new(Sawtooth, 200.0, 0.03, 0.001, 0.1)],
            Self::Capture => vec![Tone::new(Square, 250.0, 0.07, 0.001, 0.15).glide(50.0, 0.15)],
            Self::Card => vec![Tone::new(Triangle, 700.0, 0.04, 0.001, 0.08).glide(1200.0, 0.05)],
            Self::Whistle => vec![Tone::new(Sine, 1000.0, 0.05, 0.001, 0.4).glide(1200.0, 0.3)],
            Self::Win => WIN_NOTES
                .iter()
                .enumerate()
                .map(|(i, &freq)| Tone::new(Sine, freq, 0.1, 0.01, 0.6).at(i as f64 * 0.15))
                .collect(),
            Self::Loss => LOSS_NOTES
                .iter()
                .enumerate()
                .map(|(i, &freq)| Tone::new(Sawtooth, freq, 0.1, 0.01, 0.8).at(i as f64 * 0.2))
                .collect(),
            Self::Applause => (0..12)
                .map(|i| {
                    let freq = rng.random_range(150.0..450.0);
                    let at = f64::from(i) * 0.04 + rng.random_range(0.0..0.03);
                    Tone::new(Sawtooth, freq, 0.03, 0.001, 0.1).at(at)
                })
                .collect(),
        }
    }
}

struct Crowd {
    source: AudioBufferSourceNode,
    gain: GainNode,
}

pub(crate) struct SoundBoard {
    ctx: Option<AudioContext>,
    muted: bool,
    crowd: Option<Crowd>,
    rng: SmallRng,
}

impl SoundBoard {
    pub(crate) fn new(muted: bool) -> Self {
        Self {
            ctx: None,
            muted,
            crowd: None,
            rng: game_rng(None),
        }
    }

    pub(crate) fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop_crowd();
        }
    }

    /// Lazily opened, since browsers only allow audio after a user gesture.
    fn context(&mut self) -> Option<&AudioContext> {
        if self.ctx.is_none() {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(err) => {
                    log::warn!("audio unavailable: {:?}", err);
                    return None;
                }
            }
        }
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    pub(crate) fn play(&mut self, sound: Sound) {
        if self.muted {
            return;
        }
        let tones = sound.tones(&mut self.rng);
        let Some(ctx) = self.context() else {
            return;
        };
        let now = ctx.current_time();
        for tone in tones {
            if let Err(err) = schedule(ctx, tone, now) {
                log::debug!("audio: {:?} failed: {:?}", sound, err);
                return;
            }
        }
    }

    /// Starts the looping stadium noise; does nothing if it is already on.
    pub(crate) fn start_crowd(&mut self) {
        if self.muted || self.crowd.is_some() {
            return;
        }
        let Some(ctx) = self.context().cloned() else {
            return;
        };
        let rate = ctx.sample_rate();
        let mut noise: Vec<f32> = (0..rate as usize * 2)
            .map(|_| self.rng.random_range(-1.0..1.0))
            .collect();
        match crowd_loop(&ctx, rate, &mut noise) {
            Ok(crowd) => self.crowd = Some(crowd),
            Err(err) => log::debug!("audio: crowd failed: {:?}", err),
        }
    }

    pub(crate) fn stop_crowd(&mut self) {
        let Some(Crowd { source, gain }) = self.crowd.take() else {
            return;
        };
        if let Some(ctx) = &self.ctx {
            let end = ctx.current_time() + 0.5;
            let _ = gain.gain().linear_ramp_to_value_at_time(0.0, end);
            let _ = source.stop_with_when(end);
        }
    }
}

impl Drop for SoundBoard {
    fn drop(&mut self) {
        self.stop_crowd();
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
        }
    }
}

fn schedule(ctx: &AudioContext, tone: Tone, now: f64) -> Result<(), JsValue> {
    let start = now + tone.at;
    let osc = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    osc.set_type(tone.wave);
    osc.frequency().set_value_at_time(tone.freq, start)?;
    if let Some((target, time)) = tone.glide {
        osc.frequency()
            .exponential_ramp_to_value_at_time(target, start + time)?;
    }
    gain.gain().set_value_at_time(tone.volume, start)?;
    gain.gain()
        .exponential_ramp_to_value_at_time(tone.fade_to, start + tone.length)?;
    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    osc.start_with_when(start)?;
    osc.stop_with_when(start + tone.length)?;
    Ok(())
}

fn crowd_loop(ctx: &AudioContext, rate: f32, noise: &mut [f32]) -> Result<Crowd, JsValue> {
    let now = ctx.current_time();
    let gain = ctx.create_gain()?;
    gain.gain().set_value_at_time(0.0, now)?;
    gain.gain().linear_ramp_to_value_at_time(0.02, now + 1.0)?;
    gain.connect_with_audio_node(&ctx.destination())?;

    let buffer = ctx.create_buffer(1, noise.len() as u32, rate)?;
    buffer.copy_to_channel(noise, 0)?;

    let filter = ctx.create_biquad_filter()?;
    filter.set_type(BiquadFilterType::Lowpass);
    filter.frequency().set_value(1000.0);

    let source = ctx.create_buffer_source()?;
    source.set_buffer(Some(&buffer));
    source.set_loop(true);
    source.connect_with_audio_node(&filter)?;
    filter.connect_with_audio_node(&gain)?;
    source.start()?;
    Ok(Crowd { source, gain })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn win_is_four_rising_notes() {
        let mut rng = SmallRng::seed_from_u64(0);
        let tones = Sound::Win.tones(&mut rng);

        let freqs: Vec<_> = tones.iter().map(|t| t.freq).collect();
        assert_eq!(freqs, WIN_NOTES);
        assert!(tones.windows(2).all(|w| (w[1].at - w[0].at - 0.15).abs() < 1e-9));
    }

    #[test]
    fn loss_is_three_falling_notes() {
        let mut rng = SmallRng::seed_from_u64(0);
        let tones = Sound::Loss.tones(&mut rng);

        assert_eq!(tones.len(), 3);
        assert!(tones.windows(2).all(|w| w[1].freq < w[0].freq));
        assert!((tones[2].at - 0.4).abs() < 1e-9);
    }

    #[test]
    fn applause_bursts_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(5);
        let tones = Sound::Applause.tones(&mut rng);

        assert_eq!(tones.len(), 12);
        for (i, tone) in tones.iter().enumerate() {
            assert!((150.0..450.0).contains(&tone.freq));
            assert!(tone.at >= i as f64 * 0.04);
        }
    }
}
