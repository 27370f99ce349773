use std::time::Duration;

/// The most time a single `advance` will account for
pub const MAX_ADVANCE: Duration = Duration::from_millis(250);

/// Work that has come due since the last `advance`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ticks {
    pub cycles: u32,
    pub timer_ticks: u32,
}

/// # Clock
/// A virtual clock that paces CPU cycles and timer ticks independently.
///
/// Elapsed time is banked separately for the CPU and the timers, and each
/// `advance` pays out as many whole periods of each as have accumulated.
/// Leftover time carries over to the next call.
#[derive(Copy, Clone, Debug)]
pub struct Clock {
    cycle_period: Duration,
    timer_period: Duration,
    cycle_debt: Duration,
    timer_debt: Duration,
}

impl Clock {
    /// # Arguments
    /// * `cycles_per_second` how many instructions to execute each second
    /// * `timer_hz` how many times a second to decrement the timers
    pub fn new(cycles_per_second: u32, timer_hz: u32) -> Self {
        Clock {
            cycle_period: period(cycles_per_second),
            timer_period: period(timer_hz),
            cycle_debt: Duration::ZERO,
            timer_debt: Duration::ZERO,
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> Ticks {
        let elapsed = elapsed.min(MAX_ADVANCE);
        Ticks {
            cycles: pay_out(&mut self.cycle_debt, elapsed, self.cycle_period),
            timer_ticks: pay_out(&mut self.timer_debt, elapsed, self.timer_period),
        }
    }

    pub fn cycle_period(&self) -> Duration {
        self.cycle_period
    }
}

fn period(hz: u32) -> Duration {
    Duration::from_secs(1) / hz.max(1)
}

fn pay_out(debt: &mut Duration, elapsed: Duration, period: Duration) -> u32 {
    *debt += elapsed;
    let mut count = 0;
    while *debt >= period {
        *debt -= period;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second() {
        let mut clock = Clock::new(500, 60);
        let cycles: u32 = (0..4)
            .map(|_| clock.advance(Duration::from_millis(250)).cycles)
            .sum();
        assert_eq!(cycles, 500);
    }

    #[test]
    fn test_timers_tick_independently_of_cycles() {
        let mut clock = Clock::new(1000, 60);
        let ticks = clock.advance(Duration::from_millis(50));
        assert_eq!(ticks.cycles, 50);
        // 50ms holds three whole 16.67ms periods
        assert_eq!(ticks.timer_ticks, 3);
    }

    #[test]
    fn test_carries_remainders_over() {
        let mut clock = Clock::new(500, 60);
        // 1ms is half a cycle
        assert_eq!(clock.advance(Duration::from_millis(1)).cycles, 0);
        assert_eq!(clock.advance(Duration::from_millis(1)).cycles, 1);
    }

    #[test]
    fn test_caps_long_stalls() {
        let mut clock = Clock::new(500, 60);
        let ticks = clock.advance(Duration::from_secs(10));
        assert_eq!(ticks.cycles, 125);
        assert_eq!(ticks.timer_ticks, 15);
    }

    #[test]
    fn test_zero_rate_is_treated_as_one() {
        let clock = Clock::new(0, 60);
        assert_eq!(clock.cycle_period(), Duration::from_secs(1));
    }
}
