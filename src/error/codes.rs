/// Error code registry for the pipeline
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 3000-3999: Storage errors (input enumeration, output artifact)
/// - 4000-4999: Job execution errors
/// - 9000-9999: Other errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_TOML: u16 = 1002;
    pub const CONFIG_MISSING_REQUIRED: u16 = 1004;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;

    // Storage errors (3000-3999)
    pub const STORAGE_IO_ERROR: u16 = 3001;
    pub const STORAGE_PERMISSION_DENIED: u16 = 3002;
    pub const STORAGE_NOT_FOUND: u16 = 3004;
    pub const STORAGE_NOT_A_DIRECTORY: u16 = 3006;
    pub const STORAGE_INVALID_DATA: u16 = 3007;
    pub const STORAGE_WRITE_FAILED: u16 = 3010;

    // Job execution errors (4000-4999)
    pub const JOB_GENERIC: u16 = 4000;
    pub const JOB_READ_FAILED: u16 = 4001;
    pub const JOB_TIMEOUT: u16 = 4002;
    pub const JOB_PANICKED: u16 = 4003;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
}
