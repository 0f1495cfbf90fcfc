//! Sound effects
//!
//! The simulation only emits `SoundRequest` values. On the web they are
//! synthesized with Web Audio oscillators, so no sound files ship with the game.

use serde::{Deserialize, Serialize};

/// Pitch variance used when a request does not pick one
pub const DEFAULT_PITCH_VARIANCE: f32 = 0.1;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Laser fired
    Shoot,
    /// Ship bumped a wall or a rock
    Hit,
    /// Asteroid broke apart
    Break,
    /// Ore picked up
    Pickup,
    /// Ship destroyed
    Death,
    /// Upgrade bought
    Upgrade,
}

impl SoundEffect {
    /// Asset-style name of the effect
    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::Shoot => "shoot2",
            SoundEffect::Hit => "hit4",
            SoundEffect::Break => "hit106",
            SoundEffect::Pickup => "pop402323",
            SoundEffect::Death => "death",
            SoundEffect::Upgrade => "upgrade",
        }
    }
}

/// Fire-and-forget request to play a sound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundRequest {
    pub effect: SoundEffect,
    pub volume: f32,
    /// Playback rate multiplier, 1.0 when absent
    pub pitch: Option<f32>,
    /// Random ± spread applied to the pitch, `DEFAULT_PITCH_VARIANCE` when absent
    pub pitch_variance: Option<f32>,
}

impl SoundRequest {
    pub fn new(effect: SoundEffect) -> Self {
        Self {
            effect,
            volume: 1.0,
            pitch: None,
            pitch_variance: None,
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn with_pitch_variance(mut self, variance: f32) -> Self {
        self.pitch_variance = Some(variance);
        self
    }

    /// Pitch to play at given a uniform sample in [0, 1)
    pub fn resolved_pitch(&self, sample: f32) -> f32 {
        let variance = self.pitch_variance.unwrap_or(DEFAULT_PITCH_VARIANCE);
        self.pitch.unwrap_or(1.0) * (1.0 + (sample * 2.0 - 1.0) * variance)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, SoundRequest};
    use crate::platform::SoundSink;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
            self.muted = settings.muted;
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Silence everything until the next `resume`
        pub fn suspend(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.suspend();
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        fn create_osc(&self, ctx: &AudioContext, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// One oscillator sweeping `from` → `to` Hz under a decaying envelope
        #[allow(clippy::too_many_arguments)]
        fn sweep(&self, ctx: &AudioContext, osc_type: OscillatorType, from: f32, to: f32, vol: f32, start: f64, length: f64) {
            let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
                return;
            };
            gain.gain().set_value_at_time(vol, start).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, start + length).ok();
            osc.frequency().set_value_at_time(from, start).ok();
            osc.frequency().exponential_ramp_to_value_at_time(to, start + length).ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + length + 0.02).ok();
        }

        /// Laser - short falling zap
        fn play_shoot(&self, ctx: &AudioContext, vol: f32, pitch: f32) {
            let t = ctx.current_time();
            self.sweep(ctx, OscillatorType::Square, 1400.0 * pitch, 300.0 * pitch, vol * 0.15, t, 0.08);
        }

        /// Hull bump - dull thud
        fn play_hit(&self, ctx: &AudioContext, vol: f32, pitch: f32) {
            let t = ctx.current_time();
            self.sweep(ctx, OscillatorType::Sine, 160.0 * pitch, 50.0 * pitch, vol * 0.6, t, 0.15);
            self.sweep(ctx, OscillatorType::Triangle, 400.0 * pitch, 200.0 * pitch, vol * 0.2, t, 0.05);
        }

        /// Rock breaking - crunchy rumble
        fn play_break(&self, ctx: &AudioContext, vol: f32, pitch: f32) {
            let t = ctx.current_time();
            self.sweep(ctx, OscillatorType::Sawtooth, 120.0 * pitch, 30.0 * pitch, vol * 0.45, t, 0.3);
            if let Some((osc, gain)) = self.create_osc(ctx, 900.0 * pitch, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.12, t).ok();
                gain.gain().exponential_ramp_to_value_at_time(0.01, t + 0.12).ok();
                osc.frequency().set_value_at_time(900.0 * pitch, t).ok();
                osc.frequency().set_value_at_time(1900.0 * pitch, t + 0.02).ok();
                osc.frequency().set_value_at_time(600.0 * pitch, t + 0.04).ok();
                osc.frequency().set_value_at_time(1400.0 * pitch, t + 0.06).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.14).ok();
            }
        }

        /// Ore - bright pop, pitched up by the pickup streak
        fn play_pickup(&self, ctx: &AudioContext, vol: f32, pitch: f32) {
            let t = ctx.current_time();
            self.sweep(ctx, OscillatorType::Sine, 500.0 * pitch, 1000.0 * pitch, vol * 0.4, t, 0.08);
        }

        /// Ship lost - long descending boom
        fn play_death(&self, ctx: &AudioContext, vol: f32, pitch: f32) {
            let t = ctx.current_time();
            self.sweep(ctx, OscillatorType::Sawtooth, 200.0 * pitch, 25.0 * pitch, vol * 0.5, t, 0.8);
            self.sweep(ctx, OscillatorType::Square, 1500.0 * pitch, 100.0 * pitch, vol * 0.15, t, 0.2);
        }

        /// Upgrade - rising arpeggio
        fn play_upgrade(&self, ctx: &AudioContext, vol: f32, pitch: f32) {
            let t = ctx.current_time();
            for (i, freq) in [523.0, 659.0, 784.0].into_iter().enumerate() {
                let start = t + i as f64 * 0.07;
                self.sweep(ctx, OscillatorType::Triangle, freq * pitch, freq * pitch, vol * 0.3, start, 0.12);
            }
        }
    }

    impl SoundSink for AudioManager {
        fn play(&mut self, request: &SoundRequest) {
            let vol = self.effective_volume() * request.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers start the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let pitch = request.resolved_pitch(js_sys::Math::random() as f32);
            match request.effect {
                SoundEffect::Shoot => self.play_shoot(ctx, vol, pitch),
                SoundEffect::Hit => self.play_hit(ctx, vol, pitch),
                SoundEffect::Break => self.play_break(ctx, vol, pitch),
                SoundEffect::Pickup => self.play_pickup(ctx, vol, pitch),
                SoundEffect::Death => self.play_death(ctx, vol, pitch),
                SoundEffect::Upgrade => self.play_upgrade(ctx, vol, pitch),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_names() {
        assert_eq!(SoundEffect::Pickup.name(), "pop402323");
        assert_eq!(SoundEffect::Break.name(), "hit106");
    }

    #[test]
    fn test_resolved_pitch() {
        let plain = SoundRequest::new(SoundEffect::Shoot);
        assert!((plain.resolved_pitch(0.5) - 1.0).abs() < 1e-6);
        assert!((plain.resolved_pitch(0.0) - 0.9).abs() < 1e-6);

        let streak = SoundRequest::new(SoundEffect::Pickup).with_pitch(1.25).with_pitch_variance(0.0);
        assert_eq!(streak.resolved_pitch(0.0), 1.25);
        assert_eq!(streak.resolved_pitch(0.99), 1.25);
    }
}
