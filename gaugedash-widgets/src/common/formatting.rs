// gaugedash-widgets/src/common/formatting.rs
use gaugedash_core::PanelOptions;

/// Format a value with a fixed number of decimals
///
/// # Example
/// ```rust
/// use gaugedash_widgets::format_decimals;
///
/// assert_eq!(format_decimals(12.345, 1), "12.3");
/// assert_eq!(format_decimals(50.0, 0), "50");
/// ```
pub fn format_decimals(value: f64, decimals: u8) -> String {
    format!("{:.*}", decimals as usize, value)
}

/// Format a gauge reading the way the panel options ask for,
/// e.g. `~42.5 ms/s` for prefix `~`, unit `ms` and suffix `/s`
pub fn format_gauge_value(value: f64, options: &PanelOptions) -> String {
    let number = format_decimals(value, options.decimals);
    let unit = if options.unit.is_empty() {
        String::new()
    } else {
        format!(" {}", options.unit)
    };

    format!("{}{}{}{}", options.prefix, number, unit, options.suffix)
}

/// Threshold values print as entered: `50`, `12.5`, `-3`
pub fn format_threshold_value(value: f64) -> String {
    format!("{}", value)
}

/// Where `value` falls between `min` and `max`, clamped to 0.0 - 1.0
pub fn ratio_in_range(value: f64, min: f64, max: f64) -> f64 {
    if max <= min || !value.is_finite() {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}
