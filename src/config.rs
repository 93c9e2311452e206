use std::time::Duration;

use crate::constants::{
    DROP_INTERVAL_STEP, GRAVITY_STEP_DELAY, INITIAL_DROP_INTERVAL, LEVEL_CLEAR_DELAY,
    MATCH_RECHECK_DELAY, MIN_DROP_INTERVAL, SOFT_DROP_INTERVAL,
};

/// How a cascade is played out after a pill locks.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, derive_more::IsVariant)]
pub enum ResolveMode {
    /// Gravity steps and match rechecks are spread over ticks so they can be seen.
    #[default]
    Staggered,
    /// The whole cascade resolves inside the call that locked the pill.
    Immediate,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{name} must be greater than zero")]
    ZeroInterval { name: &'static str },
    #[display("minimum drop interval {min:?} exceeds initial drop interval {initial:?}")]
    DropIntervalRange { min: Duration, initial: Duration },
    #[display("start level must be at least 1")]
    ZeroLevel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub start_level: u32,
    pub initial_drop_interval: Duration,
    pub min_drop_interval: Duration,
    pub drop_interval_step: Duration,
    pub soft_drop_interval: Duration,
    pub gravity_step_delay: Duration,
    pub match_recheck_delay: Duration,
    pub level_clear_delay: Duration,
    /// Bond the two halves of a placed pill so they fall together.
    pub pairing_enabled: bool,
    /// Move once per key press instead of on every tick while held.
    pub edge_triggered_movement: bool,
    pub resolve_mode: ResolveMode,
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_level: 1,
            initial_drop_interval: Duration::from_millis(INITIAL_DROP_INTERVAL),
            min_drop_interval: Duration::from_millis(MIN_DROP_INTERVAL),
            drop_interval_step: Duration::from_millis(DROP_INTERVAL_STEP),
            soft_drop_interval: Duration::from_millis(SOFT_DROP_INTERVAL),
            gravity_step_delay: Duration::from_millis(GRAVITY_STEP_DELAY),
            match_recheck_delay: Duration::from_millis(MATCH_RECHECK_DELAY),
            level_clear_delay: Duration::from_millis(LEVEL_CLEAR_DELAY),
            pairing_enabled: true,
            edge_triggered_movement: true,
            resolve_mode: ResolveMode::Staggered,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// The simplified variant: no pairing and movement repeating while held.
    pub fn classic() -> Self {
        Self {
            pairing_enabled: false,
            edge_triggered_movement: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_level == 0 {
            return Err(ConfigError::ZeroLevel);
        }

        let intervals = [
            ("initial drop interval", self.initial_drop_interval),
            ("minimum drop interval", self.min_drop_interval),
            ("soft drop interval", self.soft_drop_interval),
            ("gravity step delay", self.gravity_step_delay),
        ];
        for (name, interval) in intervals {
            if interval.is_zero() {
                return Err(ConfigError::ZeroInterval { name });
            }
        }

        if self.min_drop_interval > self.initial_drop_interval {
            return Err(ConfigError::DropIntervalRange {
                min: self.min_drop_interval,
                initial: self.initial_drop_interval,
            });
        }
        Ok(())
    }
}
