// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Requester role - files reports and tracks their own reports
pub const ROLE_REQUESTER: &str = "requester";

/// Employee role - works the reports assigned to them
pub const ROLE_EMPLOYEE: &str = "employee";

/// Authority role - provisions accounts and reassigns work
pub const ROLE_AUTHORITY: &str = "authority";

// =============================================================================
// CLASSIFIER COLORS
// =============================================================================

/// Color returned for any status or priority outside the fixed set
pub const NEUTRAL_COLOR: &str = "#9E9E9E";
