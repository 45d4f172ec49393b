//! Mapping from raw model labels to waste categories and disposal guidance.
//!
//! Labels are ImageNet-style strings, optionally listing synonyms separated
//! by commas (`"notebook, notebook computer"`). A label matches a rule when
//! it contains the rule keyword; the longest matching keyword wins so that
//! `"beer bottle"` resolves to glass rather than a generic `"bottle"`.
//! Keywords only match whole words, so `"snail"` is not a `"nail"`.

use crate::category::WasteCategory;
use crate::classification::ClassificationResult;

struct Rule {
    keyword: &'static str,
    category: WasteCategory,
}

const fn rule(keyword: &'static str, category: WasteCategory) -> Rule {
    Rule { keyword, category }
}

static RULES: &[Rule] = &[
    // organic
    rule("banana", WasteCategory::Organic),
    rule("orange", WasteCategory::Organic),
    rule("lemon", WasteCategory::Organic),
    rule("apple", WasteCategory::Organic),
    rule("pineapple", WasteCategory::Organic),
    rule("strawberry", WasteCategory::Organic),
    rule("pomegranate", WasteCategory::Organic),
    rule("fig", WasteCategory::Organic),
    rule("broccoli", WasteCategory::Organic),
    rule("cauliflower", WasteCategory::Organic),
    rule("cabbage", WasteCategory::Organic),
    rule("cucumber", WasteCategory::Organic),
    rule("zucchini", WasteCategory::Organic),
    rule("squash", WasteCategory::Organic),
    rule("mushroom", WasteCategory::Organic),
    rule("corn", WasteCategory::Organic),
    rule("bagel", WasteCategory::Organic),
    rule("pretzel", WasteCategory::Organic),
    rule("french loaf", WasteCategory::Organic),
    rule("pizza", WasteCategory::Organic),
    rule("hotdog", WasteCategory::Organic),
    rule("cheeseburger", WasteCategory::Organic),
    rule("potpie", WasteCategory::Organic),
    rule("acorn", WasteCategory::Organic),
    rule("daisy", WasteCategory::Organic),
    rule("leaf", WasteCategory::Organic),
    rule("egg", WasteCategory::Organic),
    // plastic
    rule("plastic", WasteCategory::Plastic),
    rule("water bottle", WasteCategory::Plastic),
    rule("pop bottle", WasteCategory::Plastic),
    rule("soda bottle", WasteCategory::Plastic),
    rule("pill bottle", WasteCategory::Plastic),
    rule("lotion", WasteCategory::Plastic),
    rule("sunscreen", WasteCategory::Plastic),
    rule("packet", WasteCategory::Plastic),
    rule("bucket", WasteCategory::Plastic),
    rule("water jug", WasteCategory::Plastic),
    rule("shower cap", WasteCategory::Plastic),
    rule("syringe", WasteCategory::Plastic),
    rule("bottle", WasteCategory::Plastic),
    // paper
    rule("paper", WasteCategory::Paper),
    rule("envelope", WasteCategory::Paper),
    rule("carton", WasteCategory::Paper),
    rule("cardboard", WasteCategory::Paper),
    rule("comic book", WasteCategory::Paper),
    rule("book jacket", WasteCategory::Paper),
    rule("menu", WasteCategory::Paper),
    rule("toilet tissue", WasteCategory::Paper),
    rule("newspaper", WasteCategory::Paper),
    rule("binder", WasteCategory::Paper),
    // metal
    rule("tin", WasteCategory::Metal),
    rule("can opener", WasteCategory::Metal),
    rule("beer can", WasteCategory::Metal),
    rule("frying pan", WasteCategory::Metal),
    rule("wok", WasteCategory::Metal),
    rule("caldron", WasteCategory::Metal),
    rule("dutch oven", WasteCategory::Metal),
    rule("spatula", WasteCategory::Metal),
    rule("ladle", WasteCategory::Metal),
    rule("nail", WasteCategory::Metal),
    rule("screw", WasteCategory::Metal),
    rule("padlock", WasteCategory::Metal),
    rule("chain", WasteCategory::Metal),
    rule("safety pin", WasteCategory::Metal),
    // glass
    rule("glass", WasteCategory::Glass),
    rule("beer bottle", WasteCategory::Glass),
    rule("wine bottle", WasteCategory::Glass),
    rule("goblet", WasteCategory::Glass),
    rule("vase", WasteCategory::Glass),
    rule("jar", WasteCategory::Glass),
    rule("perfume", WasteCategory::Glass),
    // electronics
    rule("cellular telephone", WasteCategory::EWaste),
    rule("cell phone", WasteCategory::EWaste),
    rule("laptop", WasteCategory::EWaste),
    rule("notebook computer", WasteCategory::EWaste),
    rule("desktop computer", WasteCategory::EWaste),
    rule("hand-held computer", WasteCategory::EWaste),
    rule("computer keyboard", WasteCategory::EWaste),
    rule("computer mouse", WasteCategory::EWaste),
    rule("monitor", WasteCategory::EWaste),
    rule("television", WasteCategory::EWaste),
    rule("remote control", WasteCategory::EWaste),
    rule("ipod", WasteCategory::EWaste),
    rule("modem", WasteCategory::EWaste),
    rule("printer", WasteCategory::EWaste),
    rule("hard disc", WasteCategory::EWaste),
    rule("joystick", WasteCategory::EWaste),
    rule("digital clock", WasteCategory::EWaste),
    rule("digital watch", WasteCategory::EWaste),
    rule("battery", WasteCategory::EWaste),
    rule("loudspeaker", WasteCategory::EWaste),
    rule("hair dryer", WasteCategory::EWaste),
    rule("electric fan", WasteCategory::EWaste),
];

/// How to dispose of items of a category.
pub fn disposal_instructions(category: &WasteCategory) -> &'static str {
    match category {
        WasteCategory::Organic => {
            "Compost it or put it in the organics bin. Remove stickers, bags and other packaging first."
        }
        WasteCategory::Plastic => {
            "Empty and rinse, then place it in the plastics recycling bin. Keep caps on and do not bag recyclables."
        }
        WasteCategory::Paper => {
            "Keep it dry and flatten boxes before placing them in the paper recycling bin. Greasy or wet paper goes to compost."
        }
        WasteCategory::Metal => {
            "Rinse cans and containers and recycle them with metals. Larger items belong at a scrap metal drop-off."
        }
        WasteCategory::Glass => {
            "Rinse and drop it at a glass container bank, sorted by color where required. Broken drinking glass goes in general waste."
        }
        WasteCategory::EWaste => {
            "Never put electronics in household bins. Take it to an e-waste collection point and remove batteries if possible."
        }
        WasteCategory::Other(_) => {
            "Check your local guidelines. If the item cannot be reused or recycled, place it in general waste."
        }
    }
}

fn contains_word(haystack: &str, word: &str) -> bool {
    let is_word_char = |c: char| c.is_alphanumeric();
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn best_match(label: &str) -> Option<&'static Rule> {
    let lowered = label.to_lowercase();
    RULES
        .iter()
        .filter(|r| contains_word(&lowered, r.keyword))
        .max_by_key(|r| r.keyword.len())
}

/// Builds a full result from the model's top label and confidence.
///
/// Confidences below `min_confidence` are reported as general waste; the
/// model's own confidence is kept either way.
pub fn interpret(label: &str, confidence: f32, min_confidence: f32) -> ClassificationResult {
    let primary = label.split(',').next().unwrap_or(label).trim();
    let (category, reasoning) = if confidence < min_confidence {
        (
            WasteCategory::general(),
            format!(
                "The model's best guess \"{primary}\" scored {:.0}%, below the {:.0}% needed to name a material.",
                confidence * 100.0,
                min_confidence * 100.0
            ),
        )
    } else {
        match best_match(label) {
            Some(r) => (
                r.category.clone(),
                format!(
                    "Recognized \"{primary}\", which is usually made of {} material.",
                    r.category.name().to_lowercase()
                ),
            ),
            None => (
                WasteCategory::general(),
                format!("Recognized \"{primary}\", but no recycling stream is known for it."),
            ),
        }
    };
    ClassificationResult {
        disposal_instructions: disposal_instructions(&category).to_string(),
        category,
        confidence,
        label: label.to_string(),
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case("banana", WasteCategory::Organic)]
    #[case("Granny Smith apple", WasteCategory::Organic)]
    #[case("water bottle", WasteCategory::Plastic)]
    #[case("beer bottle", WasteCategory::Glass)]
    #[case("wine bottle", WasteCategory::Glass)]
    #[case("carton", WasteCategory::Paper)]
    #[case("envelope", WasteCategory::Paper)]
    #[case("can opener, tin opener", WasteCategory::Metal)]
    #[case("frying pan, frypan, skillet", WasteCategory::Metal)]
    #[case("notebook, notebook computer", WasteCategory::EWaste)]
    #[case("cellular telephone, cellular phone, cellphone", WasteCategory::EWaste)]
    fn labels_resolve_to_categories(#[case] label: &str, #[case] expected: WasteCategory) {
        let result = interpret(label, 0.9, 0.2);
        assert_eq!(result.category, expected);
        assert_eq!(result.label, label);
        assert!(!result.disposal_instructions.is_empty());
    }

    #[test]
    fn longest_keyword_wins() {
        // "bottle" (plastic) and "beer bottle" (glass) both match
        let rule = best_match("beer bottle").map(|r| r.keyword);
        assert_eq!(rule, Some("beer bottle"));
    }

    #[rstest]
    #[case("snail")]
    #[case("tench, Tinca tinca")]
    #[case("cornet, horn, trumpet, trump")]
    fn keywords_only_match_whole_words(#[case] label: &str) {
        assert!(best_match(label).is_none(), "{label} should not match");
    }

    #[test]
    fn unmatched_label_is_general_waste() {
        let result = interpret("tabby, tabby cat", 0.8, 0.2);
        assert_eq!(result.category, WasteCategory::general());
        assert!(result.reasoning.contains("tabby"));
        assert!(!result.reasoning.contains("tabby cat"));
    }

    #[test]
    fn low_confidence_is_general_waste_but_keeps_confidence() {
        let result = interpret("banana", 0.05, 0.2);
        assert_eq!(result.category, WasteCategory::general());
        assert_relative_eq!(result.confidence, 0.05);
        assert!(result.reasoning.contains("5%"));
        assert!(result.reasoning.contains("20%"));
    }

    #[test]
    fn every_category_has_instructions() {
        for r in RULES {
            assert!(!disposal_instructions(&r.category).is_empty());
        }
        assert!(!disposal_instructions(&WasteCategory::general()).is_empty());
    }
}
