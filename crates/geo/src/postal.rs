//! Postal-code coordinate estimation
//!
//! Offline fallback for when the geocoding service is unreachable. The
//! table covers Paris arrondissements and the largest French cities;
//! anything else estimates to Paris center so an analysis can always
//! proceed.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Paris center, the estimate of last resort
pub const DEFAULT_COORDS: (f64, f64) = (48.8566, 2.3522);

static POSTAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{5})\b").unwrap());

static POSTAL_COORDS: Lazy<HashMap<&'static str, (f64, f64)>> = Lazy::new(|| {
    HashMap::from([
        // Paris by arrondissement
        ("75001", (48.8566, 2.3522)),
        ("75002", (48.8679, 2.3414)),
        ("75003", (48.8630, 2.3522)),
        ("75004", (48.8545, 2.3532)),
        ("75005", (48.8462, 2.3372)),
        ("75006", (48.8462, 2.3372)),
        ("75007", (48.8589, 2.3115)),
        ("75008", (48.8738, 2.2974)),
        ("75009", (48.8769, 2.3358)),
        ("75010", (48.8760, 2.3596)),
        ("75011", (48.8594, 2.3765)),
        ("75012", (48.8434, 2.3897)),
        ("75013", (48.8322, 2.3561)),
        ("75014", (48.8336, 2.3265)),
        ("75015", (48.8422, 2.2969)),
        ("75016", (48.8543, 2.2676)),
        ("75017", (48.8849, 2.3088)),
        ("75018", (48.8928, 2.3469)),
        ("75019", (48.8839, 2.3781)),
        ("75020", (48.8639, 2.3969)),
        // Major cities
        ("69001", (45.7579, 4.8340)),
        ("69002", (45.7485, 4.8270)),
        ("69003", (45.7578, 4.8441)),
        ("13001", (43.2965, 5.3698)),
        ("13002", (43.3047, 5.3779)),
        ("13003", (43.3072, 5.3860)),
        ("31000", (43.6047, 1.4442)),
        ("33000", (44.8378, -0.5792)),
        ("34000", (43.6110, 3.8767)),
        ("35000", (48.1173, -1.6778)),
        ("37000", (47.3941, 0.6848)),
        ("38000", (45.1885, 5.7245)),
        ("44000", (47.2184, -1.5536)),
        ("51000", (49.2628, 4.0347)),
        ("54000", (48.6921, 6.1844)),
        ("59000", (50.6292, 3.0573)),
        ("67000", (48.5734, 7.7521)),
        ("76000", (49.4431, 1.0993)),
    ])
});

/// Estimate coordinates from the first 5-digit postal code in an address
///
/// Falls back to [`DEFAULT_COORDS`] when no known code is found. Never
/// fails: callers rely on always getting a usable pair.
pub fn estimate_by_postal_code(address: &str) -> (f64, f64) {
    if let Some(captures) = POSTAL_RE.captures(address) {
        let code = &captures[1];
        if let Some(&coords) = POSTAL_COORDS.get(code) {
            tracing::info!(address, code, ?coords, "estimated from postal code");
            return coords;
        }
    }

    tracing::warn!(address, "no known postal code, defaulting to Paris center");
    DEFAULT_COORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_postal_code() {
        assert_eq!(estimate_by_postal_code("75001"), (48.8566, 2.3522));
        assert_eq!(estimate_by_postal_code("12 Rue X, 75011 Paris"), (48.8594, 2.3765));
        assert_eq!(estimate_by_postal_code("Lyon 69002"), (45.7485, 4.8270));
    }

    #[test]
    fn test_unknown_postal_code_defaults() {
        assert_eq!(estimate_by_postal_code("99999 Nulle Part"), DEFAULT_COORDS);
    }

    #[test]
    fn test_no_postal_code_defaults() {
        assert_eq!(estimate_by_postal_code("Quelque part en France"), DEFAULT_COORDS);
    }

    #[test]
    fn test_code_embedded_in_longer_digits_is_ignored() {
        // 123456 is not a standalone 5-digit group
        assert_eq!(estimate_by_postal_code("ref 123456"), DEFAULT_COORDS);
    }
}
