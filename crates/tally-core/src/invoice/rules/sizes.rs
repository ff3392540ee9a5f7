//! Bottle size normalization to milliliters.

use super::FieldExtractor;
use super::patterns::{SIZE_LITERS, SIZE_MILLILITERS, SIZE_NOISE, SIZE_NUMBER};

/// Default cutoff between unitless liters and unitless milliliters.
pub const DEFAULT_LITER_CUTOFF: f64 = 100.0;

/// Converts free-text size labels ("750ML", "1 L", "1.75") into milliliters.
///
/// Unitless numbers are ambiguous: values above the cutoff are taken as
/// milliliters, values at or below it as liters. The cutoff fits bottle
/// sizes and should not be reused as a general conversion rule.
#[derive(Debug, Clone)]
pub struct SizeNormalizer {
    liter_cutoff: f64,
}

impl SizeNormalizer {
    pub fn new() -> Self {
        Self {
            liter_cutoff: DEFAULT_LITER_CUTOFF,
        }
    }

    /// Set the unitless liters/milliliters cutoff.
    pub fn with_liter_cutoff(mut self, cutoff: f64) -> Self {
        self.liter_cutoff = cutoff;
        self
    }

    /// Normalize a size label, or `None` when no number is present.
    pub fn normalize(&self, text: &str) -> Option<u32> {
        if text.trim().is_empty() {
            return None;
        }

        let upper = text.to_uppercase();
        let cleaned = SIZE_NOISE.replace_all(upper.trim(), "");

        if let Some(value) = first_number(&SIZE_MILLILITERS, &cleaned) {
            return Some(truncate(value));
        }

        if let Some(value) = first_number(&SIZE_LITERS, &cleaned) {
            return Some(truncate(value * 1000.0));
        }

        let value = first_number(&SIZE_NUMBER, &cleaned)?;
        if value > self.liter_cutoff {
            Some(truncate(value))
        } else {
            Some(truncate(value * 1000.0))
        }
    }
}

impl Default for SizeNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SizeNormalizer {
    type Output = u32;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.normalize(text)
    }
}

/// Normalize a size label with the default cutoff.
pub fn normalize_size(text: &str) -> Option<u32> {
    SizeNormalizer::new().normalize(text)
}

fn first_number(pattern: &regex::Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

fn truncate(value: f64) -> u32 {
    // `as` saturates and truncates toward zero
    value as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milliliters() {
        assert_eq!(normalize_size("750ML"), Some(750));
        assert_eq!(normalize_size("750 ml"), Some(750));
        assert_eq!(normalize_size("187.5ML"), Some(187));
    }

    #[test]
    fn test_liters() {
        assert_eq!(normalize_size("1 L"), Some(1000));
        assert_eq!(normalize_size("1.5L"), Some(1500));
        assert_eq!(normalize_size("1.75 Ltr"), Some(1750));
    }

    #[test]
    fn test_unitless_cutoff() {
        assert_eq!(normalize_size("50"), Some(50000));
        assert_eq!(normalize_size("100"), Some(100000));
        assert_eq!(normalize_size("750"), Some(750));
    }

    #[test]
    fn test_custom_cutoff() {
        let normalizer = SizeNormalizer::new().with_liter_cutoff(10.0);
        assert_eq!(normalizer.normalize("50"), Some(50));
        assert_eq!(normalizer.normalize("2"), Some(2000));
    }

    #[test]
    fn test_size_in_description() {
        assert_eq!(normalize_size("Tito's Handmade Vodka 1.75L"), Some(1750));
        assert_eq!(normalize_size("Widget A 750ml"), Some(750));
    }

    #[test]
    fn test_no_number() {
        assert_eq!(normalize_size(""), None);
        assert_eq!(normalize_size("   "), None);
        assert_eq!(normalize_size("LITER"), None);
        assert_eq!(normalize_size("n/a"), None);
    }
}
