/// # Timers
/// Two 8-bit counters that count down towards 0 once per tick and then stay there.
/// - `delay` is readable and writable by programs
/// - `sound` beeps on the tick where it runs out
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    /// Decrements both timers if they're nonzero.
    /// Returns true if the sound timer was exactly 1 before this tick.
    pub fn tick(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        let beep = self.sound == 1;
        self.sound = self.sound.saturating_sub(1);
        beep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_decrements() {
        let mut timers = Timers { delay: 3, sound: 5 };
        assert!(!timers.tick());
        assert_eq!(timers, Timers { delay: 2, sound: 4 });
    }

    #[test]
    fn test_tick_stops_at_zero() {
        let mut timers = Timers::default();
        assert!(!timers.tick());
        assert_eq!(timers, Timers::default());
    }

    #[test]
    fn test_beeps_once_when_sound_runs_out() {
        let mut timers = Timers { delay: 0, sound: 2 };
        let beeps: Vec<bool> = (0..4).map(|_| timers.tick()).collect();
        assert_eq!(beeps, [false, true, false, false]);
        assert_eq!(timers.sound, 0);
    }
}
