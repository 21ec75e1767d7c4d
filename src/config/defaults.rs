pub const DEFAULT_MEDIA_ROOT: &str = ".";
pub const DEFAULT_FRAME_MS: u64 = 50;
pub const MIN_FRAME_MS: u64 = 16;
pub const MAX_FRAME_MS: u64 = 200;

pub(super) const MAX_DEVICE_NAME_BYTES: usize = 256;
