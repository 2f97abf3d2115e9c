//! Audio cues. The core only announces them; the TypeScript synthesizer
//! decides what they sound like and whether they play at all.

use baguette_engine::SoundEvent;

// Sound ids (Rust → TypeScript synthesizer)
pub const SOUND_HIT: u32 = 1;
pub const SOUND_ALERT: u32 = 2;
pub const SOUND_WIN: u32 = 3;
pub const SOUND_LOSE: u32 = 4;
pub const SOUND_CLICK: u32 = 5;
pub const SOUND_CHARGE_START: u32 = 6;
pub const SOUND_CHARGE_STOP: u32 = 7;

// Charge tone sweep: 200 Hz at rest to 600 Hz at full charge.
const TONE_BASE_HZ: f32 = 200.0;
const TONE_SWEEP_HZ: f32 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Hit,
    Alert,
    Win,
    Lose,
    Click,
    ChargeStart,
    ChargeStop,
}

impl Cue {
    pub fn sound_event(self) -> SoundEvent {
        let id = match self {
            Cue::Hit => SOUND_HIT,
            Cue::Alert => SOUND_ALERT,
            Cue::Win => SOUND_WIN,
            Cue::Lose => SOUND_LOSE,
            Cue::Click => SOUND_CLICK,
            Cue::ChargeStart => SOUND_CHARGE_START,
            Cue::ChargeStop => SOUND_CHARGE_STOP,
        };
        SoundEvent(id)
    }
}

/// The continuous charge tone.
///
/// Holding a `ChargeTone` means the tone is playing. It can only be created
/// by `start` and only be released by `stop`, which consumes it, so a tone
/// is never stopped twice or left without an owner.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a started charge tone has to be stopped"]
pub struct ChargeTone {
    _private: (),
}

impl ChargeTone {
    pub fn start(outbox: &mut Vec<Cue>) -> Self {
        outbox.push(Cue::ChargeStart);
        ChargeTone { _private: () }
    }

    pub fn stop(self, outbox: &mut Vec<Cue>) {
        outbox.push(Cue::ChargeStop);
    }

    /// Tone pitch for a charge fraction in [0, 1].
    pub fn frequency(fraction: f32) -> f32 {
        TONE_BASE_HZ + TONE_SWEEP_HZ * fraction.clamp(0.0, 1.0)
    }
}
