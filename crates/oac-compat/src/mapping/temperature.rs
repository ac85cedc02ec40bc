//! Temperature <-> creativity mapping (Windsurf).

/// Numeric temperature to Windsurf's three-level creativity.
pub fn temperature_to_creativity(temperature: f64) -> &'static str {
    if temperature <= 0.4 {
        "low"
    } else if temperature <= 0.8 {
        "medium"
    } else {
        "high"
    }
}

/// Creativity token back to a numeric temperature. `balanced` is a
/// distinct synonym; unrecognized tokens get the medium default.
pub fn creativity_to_temperature(creativity: &str) -> f64 {
    match creativity.trim().to_ascii_lowercase().as_str() {
        "low" => 0.3,
        "medium" => 0.7,
        "balanced" => 0.5,
        "high" => 1.0,
        _ => 0.7,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        assert_eq!(temperature_to_creativity(0.0), "low");
        assert_eq!(temperature_to_creativity(0.4), "low");
        assert_eq!(temperature_to_creativity(0.4001), "medium");
        assert_eq!(temperature_to_creativity(0.8), "medium");
        assert_eq!(temperature_to_creativity(0.8001), "high");
        assert_eq!(temperature_to_creativity(1.0), "high");
    }

    #[test]
    fn reverse_levels() {
        assert_eq!(creativity_to_temperature("low"), 0.3);
        assert_eq!(creativity_to_temperature("medium"), 0.7);
        assert_eq!(creativity_to_temperature("balanced"), 0.5);
        assert_eq!(creativity_to_temperature("HIGH"), 1.0);
        assert_eq!(creativity_to_temperature("experimental"), 0.7);
    }
}
