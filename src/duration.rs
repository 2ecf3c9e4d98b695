use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

// Seconds are captured but never rendered.
static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PT(?:(?P<hours>\d+)H)?(?:(?P<minutes>\d+)M)?(?:(?P<seconds>\d+)S)?")
        .expect("Invalid ISO duration regex")
});

/// Convert a JSON-LD duration value into human text.
///
/// Non-string values yield `None`. Strings that don't look like an ISO 8601
/// `PT..H..M..S` duration are returned unchanged. A duration with neither
/// hours nor minutes yields `None`.
pub fn parse_duration(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(duration)) => parse_duration_str(duration),
        _ => None,
    }
}

/// String form of [`parse_duration`].
pub fn parse_duration_str(duration: &str) -> Option<String> {
    let Some(captures) = ISO_DURATION.captures(duration) else {
        return Some(duration.to_string());
    };

    let component = |name: &str| -> u64 {
        captures
            .name(name)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let hours = component("hours");
    let minutes = component("minutes");

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{} hour{}", hours, plural(hours)));
    }
    if minutes > 0 {
        parts.push(format!("{} minute{}", minutes, plural(minutes)));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
