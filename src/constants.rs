// Index log record layout. Fixed 16-byte prefix followed by the key bytes;
// every multi-byte field is big-endian.
pub const RECORD_VERSION: u8 = 0;
pub const RECORD_PREFIX_SIZE: usize = 16;

// Field offsets inside the record prefix
pub const REC_OFF_VERSION: usize = 0;
pub const REC_OFF_OP: usize = 1;
pub const REC_OFF_VALUE_OFFSET: usize = 2;
pub const REC_OFF_VALUE_SIZE: usize = 6;
pub const REC_OFF_TIMESTAMP: usize = 10;
pub const REC_OFF_KEY_SIZE: usize = 14;
pub const REC_OFF_KEY: usize = 16;

// The key length must fit the u16 record field
pub const MAX_KEY_SIZE: usize = u16::MAX as usize;

// The index log lives next to the value file under this suffix
pub const INDEX_LOG_SUFFIX: &str = ".idx";

// Filesystem defaults
pub const DEFAULT_FILE_MODE: u32 = 0o666;
pub const DEFAULT_DIR_MODE: u32 = 0o777;

// Default target directory for `backup_all`
pub const DEFAULT_BACKUP_DIR: &str = "backup";
