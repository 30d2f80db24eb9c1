// Page wiring constants for the web frontend.

// Body class present while a flight is in progress (page chrome fades on it)
pub const TRANSITIONING_CLASS: &str = "transitioning";

// Attribute carrying a `section[:explore][:direct]` request on nav links
pub const NAV_ATTRIBUTE: &str = "data-section";
pub const NAV_SELECTOR: &str = "[data-section]";

// Decorative elements registered with the composer
pub const PROJECT_IDS: [u32; 3] = [1, 2, 3];
pub const TEAM_MEMBER_IDS: [u32; 4] = [11, 12, 13, 14];

// Seed for the backdrop leaf walk
pub const LEAF_SEED: u64 = 0x1EAF;
