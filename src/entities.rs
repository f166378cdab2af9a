//! Entity extraction from normalized utterances
//!
//! Pulls item names, quantities, units and prices out of add/remove commands.

use std::sync::LazyLock;

use ahash::AHashMap;
use regex::{Captures, Regex};

use crate::types::{AddItemEntities, RemoveItemEntities};

/// Unit used when an add command names no unit
pub const DEFAULT_UNIT: &str = "piece";

/// Canonical units and the spoken forms that map onto them
pub const UNIT_ALIASES: &[(&str, &[&str])] = &[
    ("kg", &["kg", "kgs", "kilogram", "kilograms"]),
    ("g", &["g", "gram", "grams"]),
    ("piece", &["piece", "pieces", "pc", "pcs", "item", "items", "unit", "units"]),
    ("packet", &["packet", "packets", "pkt"]),
    ("box", &["box", "boxes"]),
    ("liter", &["l", "liter", "liters", "litre", "litres"]),
];

// Unit tokens the add patterns accept directly after a quantity. Alternation
// order matters: longer forms are listed before their prefixes.
const UNIT_TOKEN: &str =
    r"(kg|grams?|g|pieces?|items?|units?|piece|packets?|packet|boxes?|box|liters?|liter|litres?|litre|l)";
// ASCII digits only; other scripts' digits are not numbers here.
const NUMBER: &str = r"([0-9]+(?:\.[0-9]+)?)";

static DEFAULT_EXTRACTOR: LazyLock<EntityExtractor> = LazyLock::new(EntityExtractor::new);

/// Extract entities for the add and remove intents
pub struct EntityExtractor {
    /// Patterns with an explicit quantity, tried in order
    with_quantity: Vec<Regex>,
    /// `add <name> [for] [rs/₹] <price> [rupees]`
    without_quantity: Regex,
    /// Any price mentioned anywhere in the utterance
    price: Regex,
    remove: Regex,
    units: AHashMap<&'static str, &'static str>,
}

impl EntityExtractor {
    pub fn new() -> Self {
        // Compile regex patterns once - these should never fail
        let with_quantity = vec![
            // add <name> <qty> <unit?> <price>
            Regex::new(&format!(r"add\s+(.+?)\s+{NUMBER}\s*{UNIT_TOKEN}?\s+{NUMBER}"))
                .expect("Invalid regex pattern"),
            // add <name> <qty> <unit?> [for] [rs/₹] <price> [rupees]
            Regex::new(&format!(
                r"add\s+(.+?)\s+{NUMBER}\s*{UNIT_TOKEN}?\s+(?:for\s+)?(?:(?:rs\.?|₹)?\s*)?{NUMBER}(?:\s*rupees?)?"
            ))
            .expect("Invalid regex pattern"),
        ];
        let without_quantity = Regex::new(&format!(
            r"add\s+(.+?)\s+(?:for\s+)?(?:(?:rs\.?|₹)?\s*)?{NUMBER}(?:\s*rupees?)?"
        ))
        .expect("Invalid regex pattern");
        let price = Regex::new(&format!(r"(?:rs\.?|₹)?\s*{NUMBER}(?:\s*rupees?)?"))
            .expect("Invalid regex pattern");
        let remove = Regex::new(r"(?:remove|delete)\s+(.+)").expect("Invalid regex pattern");

        let units = UNIT_ALIASES
            .iter()
            .flat_map(|(canon, aliases)| aliases.iter().map(move |alias| (*alias, *canon)))
            .collect();

        Self {
            with_quantity,
            without_quantity,
            price,
            remove,
            units,
        }
    }

    /// Map a spoken unit onto its canonical form. Unknown units pass through lower-cased.
    pub fn normalize_unit(&self, unit: &str) -> String {
        let lowered = unit.to_lowercase();
        match self.units.get(lowered.as_str()) {
            Some(canon) => (*canon).to_string(),
            None => lowered,
        }
    }

    /// First price mentioned in `text`, e.g. "120", "rs 120", "₹120.50", "120 rupees"
    pub fn extract_price(&self, text: &str) -> Option<f64> {
        let caps = self.price.captures(text)?;
        parse_number_like(&caps[1])
    }

    /// Extract an item to add. `None` when no pattern yields a usable price.
    pub fn extract_add(&self, text: &str) -> Option<AddItemEntities> {
        // The first pattern that matches decides; later ones are not consulted.
        for pattern in &self.with_quantity {
            if let Some(caps) = pattern.captures(text) {
                return self.add_with_quantity(text, &caps);
            }
        }

        let caps = self.without_quantity.captures(text)?;
        let name = capitalize(caps[1].trim());
        let rate = parse_number_like(&caps[2])?;
        let message = format!("Added 1 piece of {} for ₹{}", name, format_number(rate));
        Some(AddItemEntities {
            name,
            quantity_raw: format!("1 {}", DEFAULT_UNIT),
            quantity_number: 1.0,
            unit: DEFAULT_UNIT.to_string(),
            rate_number: rate,
            message,
        })
    }

    fn add_with_quantity(&self, text: &str, caps: &Captures<'_>) -> Option<AddItemEntities> {
        let name = capitalize(caps[1].trim());
        let quantity = parse_number_like(&caps[2]).unwrap_or(1.0);
        let unit = caps
            .get(3)
            .map(|m| self.normalize_unit(m.as_str()))
            .unwrap_or_else(|| DEFAULT_UNIT.to_string());
        let rate = parse_number_like(&caps[4])
            .or_else(|| self.extract_price(text))
            .filter(|rate| *rate != 0.0)?;

        let quantity_raw = format!("{} {}", format_number(quantity), unit);
        let message = format!(
            "Added {} {} of {} for ₹{}",
            format_number(quantity),
            unit,
            name,
            format_number(rate)
        );
        Some(AddItemEntities {
            name,
            quantity_raw,
            quantity_number: quantity,
            unit,
            rate_number: rate,
            message,
        })
    }

    /// Extract the item to remove: everything after the remove/delete keyword.
    pub fn extract_remove(&self, text: &str) -> Option<RemoveItemEntities> {
        let caps = self.remove.captures(text)?;
        let name = capitalize(caps[1].trim());
        if name.is_empty() {
            return None;
        }
        let message = format!("Removed {} from bill", name);
        Some(RemoveItemEntities { name, message })
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a spoken unit onto its canonical form using the built-in alias table.
pub fn normalize_unit(unit: &str) -> String {
    DEFAULT_EXTRACTOR.normalize_unit(unit)
}

/// Parse a spoken number, ignoring thousands separators and spaces.
///
/// Returns `None` for anything that is not a finite number.
pub fn parse_number_like(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',' && *c != ' ').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Uppercase the first character, leaving the rest unchanged.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render a number the way it is spoken back: no trailing ".0" on whole values.
pub fn format_number(n: f64) -> String {
    format!("{}", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_aliases() {
        assert_eq!(normalize_unit("kilograms"), "kg");
        assert_eq!(normalize_unit("KGS"), "kg");
        assert_eq!(normalize_unit("pcs"), "piece");
        assert_eq!(normalize_unit("litres"), "liter");
        assert_eq!(normalize_unit("l"), "liter");
        assert_eq!(normalize_unit("pkt"), "packet");
        assert_eq!(normalize_unit("Dozen"), "dozen");
    }

    #[test]
    fn test_parse_number_like() {
        assert_eq!(parse_number_like("1,200"), Some(1200.0));
        assert_eq!(parse_number_like("12 50"), Some(1250.0));
        assert_eq!(parse_number_like("2.5"), Some(2.5));
        assert_eq!(parse_number_like("inf"), None);
        assert_eq!(parse_number_like("NaN"), None);
        assert_eq!(parse_number_like("abc"), None);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("tomato"), "Tomato");
        assert_eq!(capitalize("basmati rice"), "Basmati rice");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_extract_add_with_unit() {
        let extractor = EntityExtractor::new();
        let e = extractor.extract_add("add tomato 2kg 50").expect("should extract");
        assert_eq!(e.name, "Tomato");
        assert_eq!(e.quantity_number, 2.0);
        assert_eq!(e.unit, "kg");
        assert_eq!(e.quantity_raw, "2 kg");
        assert_eq!(e.rate_number, 50.0);
        assert_eq!(e.message, "Added 2 kg of Tomato for ₹50");
    }

    #[test]
    fn test_extract_add_with_currency_markers() {
        let extractor = EntityExtractor::new();
        let e = extractor
            .extract_add("add sugar 3 packets for rs 45 rupees")
            .expect("should extract");
        assert_eq!(e.name, "Sugar");
        assert_eq!(e.quantity_number, 3.0);
        assert_eq!(e.unit, "packet");
        assert_eq!(e.rate_number, 45.0);
    }

    #[test]
    fn test_extract_add_defaults_to_one_piece() {
        let extractor = EntityExtractor::new();
        let e = extractor.extract_add("add rice for 80 rupees").expect("should extract");
        assert_eq!(e.name, "Rice");
        assert_eq!(e.quantity_number, 1.0);
        assert_eq!(e.unit, "piece");
        assert_eq!(e.quantity_raw, "1 piece");
        assert_eq!(e.rate_number, 80.0);
        assert_eq!(e.message, "Added 1 piece of Rice for ₹80");
    }

    #[test]
    fn test_extract_add_missing_unit_defaults_to_piece() {
        let extractor = EntityExtractor::new();
        let e = extractor.extract_add("add mango 4 30").expect("should extract");
        assert_eq!(e.name, "Mango");
        assert_eq!(e.unit, "piece");
        assert_eq!(e.quantity_raw, "4 piece");
        assert_eq!(e.rate_number, 30.0);
    }

    #[test]
    fn test_extract_add_without_price_fails() {
        let extractor = EntityExtractor::new();
        assert!(extractor.extract_add("add salt").is_none());
        assert!(extractor.extract_add("add").is_none());
    }

    #[test]
    fn test_extract_add_zero_price_fails() {
        let extractor = EntityExtractor::new();
        assert!(extractor.extract_add("add milk 2 liters 0").is_none());
    }

    #[test]
    fn test_non_ascii_digits_are_not_numbers() {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.extract_price("rs ௫௦"), None);

        // The Tamil price is not a price, so the explicit-quantity patterns
        // do not match and "2" is not billed as "2 kg".
        let e = extractor.extract_add("add rice 2 kg ௫௦").expect("should extract");
        assert_eq!(e.quantity_raw, "1 piece");
        assert_eq!(e.name, "Rice");
        assert_eq!(e.rate_number, 2.0);

        // A Tamil quantity stays part of the name instead of turning into 1 kg.
        let e = extractor.extract_add("add rice ௨ kg 50").expect("should extract");
        assert_eq!(e.name, "Rice ௨ kg");
        assert_eq!(e.quantity_raw, "1 piece");
        assert_eq!(e.rate_number, 50.0);

        assert!(extractor.extract_add("add rice ௫௦").is_none());
    }

    #[test]
    fn test_extract_price() {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.extract_price("costs ₹120.50 only"), Some(120.5));
        assert_eq!(extractor.extract_price("rs. 40"), Some(40.0));
        assert_eq!(extractor.extract_price("free"), None);
    }

    #[test]
    fn test_extract_remove() {
        let extractor = EntityExtractor::new();
        let e = extractor.extract_remove("remove tomato").expect("should extract");
        assert_eq!(e.name, "Tomato");
        assert_eq!(e.message, "Removed Tomato from bill");

        let e = extractor.extract_remove("please delete the onions").expect("should extract");
        assert_eq!(e.name, "The onions");

        assert!(extractor.extract_remove("remove").is_none());
    }
}
