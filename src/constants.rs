//! Constants used throughout the bisque library: file format identity and
//! safety limits applied when loading untrusted files.

/// Magic word at the start of every classic matrix file (batch or combined).
pub const CLASSIC_MAGIC: [u8; 8] = *b"CLASSIC\0";

/// Current classic matrix format version.
pub const CLASSIC_VERSION: u32 = 1;

/// Magic word at the start of every sample store file.
pub const SAMPLE_MAGIC: [u8; 8] = *b"SAMPLE\0\0";

/// Current sample store format version.
pub const SAMPLE_VERSION: u32 = 1;

/// Magic word bounding the Cortex `.ctx` header on both sides.
pub const CORTEX_MAGIC: [u8; 6] = *b"CORTEX";

/// Cortex graph file version this crate accepts.
pub const CORTEX_VERSION: u32 = 6;

/// File extension for sample store files.
pub const SAMPLE_EXT: &str = "bqs";

/// File extension for classic matrix files.
pub const CLASSIC_EXT: &str = "bqx";

/// File extension for Cortex input files.
pub const CORTEX_EXT: &str = "ctx";

// Safety limits for length-prefixed fields read from files
pub(crate) const MAX_NAME_LENGTH: usize = 10_000; // 10KB for sample names
pub(crate) const MAX_NUM_NAMES: u64 = 100_000_000; // name list entries per matrix
