//! Midnight Amber color theme for dark mode.

use ratatui::style::Color;

/// Background & Surface colors
pub const BG_DARK: Color = Color::Rgb(18, 18, 24); // #121218 - Deep dark blue
pub const BG_SURFACE: Color = Color::Rgb(24, 24, 32); // #181820 - Card background
pub const BG_ELEVATED: Color = Color::Rgb(32, 32, 42); // #20202A - Selected row

/// Primary - Amber (Search mode, key hints)
pub const PRIMARY: Color = Color::Rgb(255, 179, 71); // #FFB347

/// Accent - Cyan (Normal mode, prompt)
pub const ACCENT: Color = Color::Rgb(103, 224, 227); // #67E0E3

/// Text colors
pub const TEXT_PRIMARY: Color = Color::Rgb(230, 230, 235); // #E6E6EB
pub const TEXT_SECONDARY: Color = Color::Rgb(160, 160, 170); // #A0A0AA
pub const TEXT_MUTED: Color = Color::Rgb(100, 100, 110); // #64646E

/// Semantic colors
pub const SUCCESS: Color = Color::Rgb(118, 218, 133); // #76DA85 - Info status
pub const WARNING: Color = Color::Rgb(255, 193, 94); // #FFC15E - Hidden dirs
pub const ERROR: Color = Color::Rgb(255, 108, 108); // #FF6C6C - Error status
pub const INFO: Color = Color::Rgb(130, 170, 255); // #82AAFF - Counts

/// Border colors
pub const BORDER_DIM: Color = Color::Rgb(48, 48, 58); // #30303A
pub const BORDER_FOCUS: Color = PRIMARY; // Query line while searching
