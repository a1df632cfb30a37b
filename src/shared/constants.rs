/// Hop ceiling for upward parent walks; real trees stay well under 10 levels
pub const DEFAULT_MAX_PATH_DEPTH: usize = 20;

/// Separator between ancestor names in a category's full path
pub const PATH_SEPARATOR: &str = " > ";

/// Maximum length for category names and slugs
pub const MAX_NAME_LENGTH: usize = 100;

/// SEO field limits
pub const MAX_META_TITLE_LENGTH: usize = 70;
pub const MAX_META_DESCRIPTION_LENGTH: usize = 160;
