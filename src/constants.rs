pub const BOARD_WIDTH: usize = 8;
pub const BOARD_HEIGHT: usize = 16;

// Spawn column of the first pill half; the second half sits to its right.
pub const SPAWN_X: i32 = BOARD_WIDTH as i32 / 2 - 1;
pub const SPAWN_Y: i32 = 0;

// Drop timing (in milliseconds)
pub const INITIAL_DROP_INTERVAL: u64 = 600;
pub const MIN_DROP_INTERVAL: u64 = 100;
pub const DROP_INTERVAL_STEP: u64 = 50;
pub const SOFT_DROP_INTERVAL: u64 = 50;

// Cascade timing (in milliseconds)
pub const GRAVITY_STEP_DELAY: u64 = 100;
pub const MATCH_RECHECK_DELAY: u64 = 300;
pub const LEVEL_CLEAR_DELAY: u64 = 1000;

pub const MAX_PENDING_EVENTS: usize = 256;

pub const KEY_TIMEOUT: u64 = 100; // Timeout for key release detection fallback

// Scoring
pub const MIN_MATCH_LEN: usize = 4;
pub const POINTS_PER_CELL: u32 = 100;
pub const LEVEL_BONUS: u32 = 1000;

// Viruses
pub const VIRUSES_BASE: usize = 4;
pub const VIRUSES_PER_LEVEL: usize = 4;
pub const MAX_VIRUSES: usize = 84;
pub const VIRUS_START_ROW: usize = BOARD_HEIGHT / 2;
