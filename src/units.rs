//! Canonical unit handling for ingredient and grocery quantities.
//!
//! Weight units collapse to grams, volume units to milliliters, and
//! piece counts to no unit at all. Unknown units are passed through
//! lowercased rather than rejected.

/// Map a raw (quantity, unit) pair to its canonical form.
///
/// Returns the converted quantity and the canonical unit string. A
/// missing quantity is returned untouched (no conversion without a
/// number to convert), and a missing unit clears to the empty string.
pub fn normalize_unit_and_qty(qty: Option<f64>, unit: Option<&str>) -> (Option<f64>, String) {
    let Some(qty) = qty else {
        return (None, unit.unwrap_or_default().to_string());
    };
    let unit = unit.unwrap_or_default();
    if unit.is_empty() {
        return (Some(qty), String::new());
    }

    let u = unit.trim().to_lowercase();
    let mapped = match u.as_str() {
        "kilogram" | "kilograms" | "kg" => "kg",
        "g" | "gram" | "grams" => "g",
        "mg" | "milligram" | "milligrams" => "mg",
        "l" | "liter" | "liters" | "litre" | "litres" => "l",
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => "ml",
        "tbsp" | "tablespoon" | "tablespoons" => "tbsp",
        "tsp" | "teaspoon" | "teaspoons" => "tsp",
        "cup" | "cups" => "cup",
        "pcs" | "pc" | "piece" | "pieces" => "pc",
        other => other,
    };

    let weight_factor = match mapped {
        "kg" => Some(1000.0),
        "g" => Some(1.0),
        "mg" => Some(0.001),
        _ => None,
    };
    if let Some(factor) = weight_factor {
        return (Some(qty * factor), "g".to_string());
    }

    let volume_factor = match mapped {
        "l" => Some(1000.0),
        "ml" => Some(1.0),
        "tbsp" => Some(15.0),
        "tsp" => Some(5.0),
        "cup" => Some(240.0),
        _ => None,
    };
    if let Some(factor) = volume_factor {
        return (Some(qty * factor), "ml".to_string());
    }

    if mapped == "pc" {
        return (Some(qty), String::new());
    }

    // Unknown unit: keep the quantity, preserve the unit lowercased.
    (Some(qty), mapped.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_converts_to_grams() {
        assert_eq!(normalize_unit_and_qty(Some(1.0), Some("kg")), (Some(1000.0), "g".into()));
        assert_eq!(normalize_unit_and_qty(Some(500.0), Some("g")), (Some(500.0), "g".into()));
        assert_eq!(normalize_unit_and_qty(Some(250.0), Some("mg")), (Some(0.25), "g".into()));
    }

    #[test]
    fn volume_converts_to_milliliters() {
        assert_eq!(normalize_unit_and_qty(Some(2.0), Some("tbsp")), (Some(30.0), "ml".into()));
        assert_eq!(normalize_unit_and_qty(Some(3.0), Some("tsp")), (Some(15.0), "ml".into()));
        assert_eq!(normalize_unit_and_qty(Some(1.0), Some("l")), (Some(1000.0), "ml".into()));
        assert_eq!(normalize_unit_and_qty(Some(2.0), Some("cups")), (Some(480.0), "ml".into()));
    }

    #[test]
    fn pieces_have_no_unit() {
        assert_eq!(normalize_unit_and_qty(Some(3.0), Some("pcs")), (Some(3.0), "".into()));
        assert_eq!(normalize_unit_and_qty(Some(1.0), Some("piece")), (Some(1.0), "".into()));
    }

    #[test]
    fn aliases_map_to_short_form() {
        assert_eq!(
            normalize_unit_and_qty(Some(2.0), Some("Kilograms")),
            (Some(2000.0), "g".into())
        );
        assert_eq!(
            normalize_unit_and_qty(Some(1.0), Some(" Tablespoon ")),
            (Some(15.0), "ml".into())
        );
    }

    #[test]
    fn missing_quantity_passes_through() {
        assert_eq!(normalize_unit_and_qty(None, Some("kg")), (None, "kg".into()));
        assert_eq!(normalize_unit_and_qty(None, None), (None, "".into()));
    }

    #[test]
    fn missing_unit_clears_to_empty() {
        assert_eq!(normalize_unit_and_qty(Some(5.0), None), (Some(5.0), "".into()));
        assert_eq!(normalize_unit_and_qty(Some(5.0), Some("")), (Some(5.0), "".into()));
    }

    #[test]
    fn unknown_unit_is_preserved_lowercased() {
        assert_eq!(
            normalize_unit_and_qty(Some(2.0), Some("Pinch")),
            (Some(2.0), "pinch".into())
        );
    }

    #[test]
    fn idempotent_on_canonical_input() {
        let (qty, unit) = normalize_unit_and_qty(Some(1000.0), Some("g"));
        assert_eq!((qty, unit.as_str()), (Some(1000.0), "g"));
        let (qty2, unit2) = normalize_unit_and_qty(qty, Some(&unit));
        assert_eq!((qty2, unit2.as_str()), (Some(1000.0), "g"));

        let (qty, unit) = normalize_unit_and_qty(Some(30.0), Some("ml"));
        let (qty2, unit2) = normalize_unit_and_qty(qty, Some(&unit));
        assert_eq!((qty2, unit2), (Some(30.0), "ml".into()));
    }
}
