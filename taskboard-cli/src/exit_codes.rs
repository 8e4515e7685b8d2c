/// Command completed
pub const EXIT_SUCCESS: i32 = 0;

/// Command was rejected or failed
pub const EXIT_ERROR: i32 = 1;
