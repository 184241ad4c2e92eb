//! # Buzzer
//!
//! Tone output through a piezo buzzer and the fixed melody the arm can play.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use embedded_hal::blocking::delay::DelayMs;
use log::{debug, info};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Opening phrase of the Turkish national anthem (İstiklal Marşı).
pub const MELODY: [Note; 16] = [
    Note::new(262, 400),
    Note::new(330, 400),
    Note::new(392, 400),
    Note::new(349, 400),
    Note::new(330, 600),
    Note::new(349, 400),
    Note::new(330, 400),
    Note::new(294, 400),
    Note::new(262, 600),
    Note::new(330, 400),
    Note::new(349, 400),
    Note::new(392, 400),
    Note::new(330, 600),
    Note::new(294, 400),
    Note::new(262, 400),
    Note::new(294, 600),
];

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Square wave generator on a pin.
pub trait ToneGenerator {
    /// Start a tone. With a duration the generator stops by itself, without one the tone plays
    /// until [`ToneGenerator::no_tone`].
    fn tone(&mut self, pin: u8, frequency_hz: u32, duration_ms: Option<u32>);

    /// Stop any tone on the pin.
    fn no_tone(&mut self, pin: u8);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single note of a melody.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Note {
    /// Units: hertz
    pub frequency_hz: u32,

    /// Units: milliseconds
    pub duration_ms: u32,
}

/// A buzzer wired to one pin of a tone generator.
pub struct Buzzer<T> {
    pin: u8,
    tone: T,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Note {
    pub const fn new(frequency_hz: u32, duration_ms: u32) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }
}

impl<T> Buzzer<T>
where
    T: ToneGenerator
{
    pub fn new(pin: u8, tone: T) -> Self {
        Self { pin, tone }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Play a tone and block until it has finished.
    pub fn play<D>(&mut self, frequency_hz: u32, duration_ms: u32, delay: &mut D)
    where
        D: DelayMs<u32>
    {
        debug!("Buzzer {} Hz for {} ms", frequency_hz, duration_ms);

        self.tone.tone(self.pin, frequency_hz, Some(duration_ms));
        delay.delay_ms(duration_ms);
    }

    /// Start a tone without blocking.
    pub fn start(&mut self, frequency_hz: u32) {
        debug!("Buzzer on at {} Hz", frequency_hz);

        self.tone.tone(self.pin, frequency_hz, None);
    }

    pub fn stop(&mut self) {
        debug!("Buzzer off");

        self.tone.no_tone(self.pin);
    }

    /// Play [`MELODY`].
    ///
    /// Each note is followed by a rest as long as the note itself, so the melody takes twice the
    /// sum of its note durations.
    pub fn play_melody<D>(&mut self, delay: &mut D)
    where
        D: DelayMs<u32>
    {
        info!("Playing melody ({} notes)", MELODY.len());

        for note in MELODY.iter() {
            self.play(note.frequency_hz, note.duration_ms, delay);
            delay.delay_ms(note.duration_ms);
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::{EventLog, SimDelay, SimEvent, SimTone};

    #[test]
    fn test_play_blocks_for_duration() {
        let log = EventLog::new();
        let mut buzzer = Buzzer::new(33, SimTone::new(log.clone()));
        let mut delay = SimDelay::new(log.clone());

        buzzer.play(440, 250, &mut delay);

        assert_eq!(
            log.events(),
            vec![
                SimEvent::Tone { pin: 33, frequency_hz: 440, duration_ms: Some(250) },
                SimEvent::Delay { ms: 250 },
            ]
        );
    }

    #[test]
    fn test_start_stop() {
        let log = EventLog::new();
        let mut buzzer = Buzzer::new(14, SimTone::new(log.clone()));

        buzzer.start(1000);
        buzzer.stop();

        assert_eq!(
            log.events(),
            vec![
                SimEvent::Tone { pin: 14, frequency_hz: 1000, duration_ms: None },
                SimEvent::NoTone { pin: 14 },
            ]
        );
    }

    #[test]
    fn test_melody_notes() {
        let pairs: Vec<(u32, u32)> = MELODY
            .iter()
            .map(|n| (n.frequency_hz, n.duration_ms))
            .collect();

        assert_eq!(
            pairs,
            vec![
                (262, 400), (330, 400), (392, 400), (349, 400),
                (330, 600), (349, 400), (330, 400), (294, 400),
                (262, 600), (330, 400), (349, 400), (392, 400),
                (330, 600), (294, 400), (262, 400), (294, 600),
            ]
        );
    }

    #[test]
    fn test_melody_cadence() {
        let log = EventLog::new();
        let mut buzzer = Buzzer::new(33, SimTone::new(log.clone()));
        let mut delay = SimDelay::new(log.clone());

        buzzer.play_melody(&mut delay);

        let events = log.events();
        let tones: Vec<Note> = events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Tone { frequency_hz, duration_ms: Some(d), .. } => {
                    Some(Note::new(*frequency_hz, *d))
                }
                _ => None,
            })
            .collect();
        assert_eq!(tones, MELODY.to_vec());

        // Every tone is followed by two delays of the note's duration
        assert_eq!(events.len(), MELODY.len() * 3);
        for (chunk, note) in events.chunks(3).zip(MELODY.iter()) {
            assert_eq!(chunk[1], SimEvent::Delay { ms: note.duration_ms });
            assert_eq!(chunk[2], SimEvent::Delay { ms: note.duration_ms });
        }

        let nominal: u32 = MELODY.iter().map(|n| n.duration_ms).sum();
        assert_eq!(log.total_delay_ms(), 2 * nominal as u64);
    }
}
