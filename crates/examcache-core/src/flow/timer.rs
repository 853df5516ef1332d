/// Seconds-resolution countdown for an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining_secs: u32,
}

/// Result of advancing a countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    Running(u32),
    /// Time ran out on this tick.
    Expired,
    /// The countdown was already at zero and does not run.
    Idle,
}

impl Countdown {
    pub fn from_secs(remaining_secs: u32) -> Self {
        Self { remaining_secs }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn tick(&mut self) -> CountdownTick {
        match self.remaining_secs {
            0 => CountdownTick::Idle,
            1 => {
                self.remaining_secs = 0;
                CountdownTick::Expired
            }
            n => {
                self.remaining_secs = n - 1;
                CountdownTick::Running(self.remaining_secs)
            }
        }
    }

    /// `m:ss`
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}
