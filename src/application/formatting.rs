// src/application/formatting.rs
//
// Display formatting for sizes, file names and quality

use crate::domain::Quality;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size in powers of 1024, at most two decimals.
///
/// Sizes beyond the GB range stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{} {}", trim_decimals(value), SIZE_UNITS[unit])
}

fn trim_decimals(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Shorten `name` to fit `max_len` characters, keeping the extension.
///
/// `"a_really_long_holiday_photo.jpeg"` at 20 becomes `"a_really_lon...jpeg"`.
/// Names without a usable stem or extension are cut and suffixed with "...".
pub fn truncate_file_name(name: &str, max_len: usize) -> String {
    let length = name.chars().count();
    if length <= max_len {
        return name.to_string();
    }

    if let Some((stem, extension)) = name.rsplit_once('.') {
        let extension_len = extension.chars().count();
        let keep = max_len.saturating_sub(extension_len + 4);
        if !stem.is_empty() && !extension.is_empty() && keep > 0 {
            let short_stem: String = stem.chars().take(keep).collect();
            return format!("{}...{}", short_stem, extension);
        }
    }

    let head: String = name.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", head)
}

/// Quality as shown next to the result, e.g. "80%"
pub fn format_quality(quality: Quality) -> String {
    format!("{}%", quality.value())
}
