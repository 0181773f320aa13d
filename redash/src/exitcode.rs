//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Generic failure (unknown command)
pub const FAILURE: i32 = 1;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (undecodable response)
pub const DATAERR: i32 = 65;

/// Referenced resource does not exist
pub const NOINPUT: i32 = 66;

/// Service unavailable or returned an error status
pub const UNAVAILABLE: i32 = 69;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Configuration error (missing host or api key)
pub const CONFIG: i32 = 78;
