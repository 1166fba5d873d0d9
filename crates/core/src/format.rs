//! Display formatters for metric values

/// Insert `separator` between every group of three integer digits.
/// The fractional part, if any, is left as is.
pub fn format_thousand_separated(value: f64, separator: &str) -> String {
    let raw = value.to_string();
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 * separator.len());
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(c);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Thousand separation with a plain space, `1234567` -> `"1 234 567"`
pub fn format_thousands(value: f64) -> String {
    format_thousand_separated(value, " ")
}

/// Latencies are stored in microseconds
pub fn to_milliseconds(micros: f64) -> f64 {
    micros / 1000.0
}

/// `2345` (µs) -> `"2.35 ms"`
pub fn format_latency(micros: f64) -> String {
    format!("{:.2} ms", to_milliseconds(micros))
}

/// Compact axis label, `1_260_000` -> `"1.3M"`
pub fn format_axis_value(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("{:.1}G", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value >= 1.0 {
        format!("{:.0}", value)
    } else if value >= 0.001 {
        format!("{:.2}", value)
    } else {
        format!("{:.3}", value)
    }
}
