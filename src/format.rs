use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;
    const TB: u64 = 1024 * 1024 * 1024 * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// NaN is the samplers' "undefined over this interval" sentinel; it
/// renders as n/a rather than leaking into the table.
pub fn format_percent(percent: f64) -> String {
    if percent.is_nan() {
        return "n/a".to_string();
    }
    format!("{percent:.2}%")
}

pub fn format_mhz(mhz: f64) -> String {
    if mhz.is_nan() {
        return "n/a".to_string();
    }
    format!("{mhz:.1} MHz")
}

pub fn format_celsius(celsius: Option<f64>) -> String {
    match celsius {
        Some(value) => format!("{value:.2} °C"),
        None => "-".to_string(),
    }
}

/// Link speed in Mb/s; anything negative means the interface does not
/// report one.
pub fn format_speed(mbit: i64) -> String {
    if mbit < 0 {
        return "-".to_string();
    }
    format!("{mbit} Mb/s")
}
