pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";

/// Path prefix every relay endpoint lives under.
pub const SIGNAL_PATH_PREFIX: &str = "/signal";
