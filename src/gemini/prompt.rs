//! Instruction text sent with every extraction.
//!
//! Unit conversion, translation and language detection are all requested
//! here; the service does not compute them itself.

use std::fmt::Write;

use crate::config::{NormalizationConfig, UnitSystem};
use crate::recipe::ExtractInput;

const SCHEMA: &str = r#"{
  "title": "recipe name",
  "imaginary": false,
  "ingredients": {
    "main": ["quantity unit ingredient"],
    "seasoning": ["quantity unit ingredient"],
    "garnish": ["quantity unit ingredient"]
  },
  "steps": [
    {"text": "instruction", "ingredients": ["ingredients used in this step"]}
  ],
  "cookTime": "total time or null",
  "servings": "servings or null",
  "language": "ISO 639-1 code of the source language"
}"#;

/// Build the prompt for one request.
pub fn build_prompt(input: &ExtractInput, normalization: &NormalizationConfig) -> String {
    let mut prompt = String::new();

    let source = match (input.images.is_empty(), input.text().is_some()) {
        (false, true) => "these images and the text below",
        (false, false) => "these images",
        _ => "the text below",
    };
    let _ = writeln!(
        prompt,
        "Extract the recipe from {source}. Return ONLY a valid JSON object with exactly these fields:"
    );
    prompt.push_str(SCHEMA);
    prompt.push_str("\n\nRules:\n");

    prompt.push_str(
        "- Put each ingredient in exactly one category: \"main\" for the core ingredients, \
         \"seasoning\" for spices, herbs, sauces and condiments, \"garnish\" for toppings and \
         decoration. Use an empty list for a category with no ingredients.\n",
    );
    prompt.push_str(
        "- Keep the steps in order. For each step, list the ingredients it uses, \
         written exactly as in the ingredient lists.\n",
    );
    prompt.push_str(
        "- If the input does not contain a complete recipe, invent a plausible one from what \
         it shows and set \"imaginary\" to true. Otherwise set it to false.\n",
    );

    match normalization.units {
        UnitSystem::Metric => prompt.push_str(
            "- Convert every quantity to metric units (g, kg, ml, l) and every temperature to °C. \
             Keep spoons and pinches as they are.\n",
        ),
        UnitSystem::Imperial => prompt.push_str(
            "- Convert every quantity to US customary units (oz, lb, cups, tbsp, tsp) and every \
             temperature to °F.\n",
        ),
        UnitSystem::Original => {
            prompt.push_str("- Keep quantities and temperatures in the units used by the source.\n")
        }
    }

    match normalization.target_language.as_deref().map(str::trim) {
        Some(lang) if !lang.is_empty() => {
            let _ = writeln!(
                prompt,
                "- Write the title, ingredients and steps in {lang}, translating if needed."
            );
        }
        _ => prompt.push_str("- Keep the title, ingredients and steps in the source language.\n"),
    }
    prompt.push_str(
        "- Set \"language\" to the two-letter ISO 639-1 code of the language the source is written in.\n",
    );
    prompt.push_str("No markdown, no extra text, just the JSON.");

    if let Some(text) = input.text() {
        let _ = write!(prompt, "\n\nRecipe text:\n\"\"\"\n{text}\n\"\"\"");
    }
    if let Some(url) = &input.source_url {
        let _ = write!(prompt, "\n\nSource link (for context only): {url}");
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::ImageInput;
    use bytes::Bytes;

    fn image_input() -> ExtractInput {
        ExtractInput {
            images: vec![ImageInput::new(None, Some("image/jpeg".into()), Bytes::new())],
            ..Default::default()
        }
    }

    #[test]
    fn test_images_only_defaults() {
        let prompt = build_prompt(&image_input(), &NormalizationConfig::default());
        assert!(prompt.starts_with("Extract the recipe from these images."));
        assert!(prompt.contains("\"cookTime\""));
        assert!(prompt.contains("metric units"));
        assert!(prompt.contains("source language"));
        assert!(!prompt.contains("Recipe text:"));
        assert!(prompt.ends_with("just the JSON."));
    }

    #[test]
    fn test_text_and_link_are_embedded() {
        let input = ExtractInput {
            text: Some("  2 eggs\nwhisk  ".into()),
            source_url: Some("https://example.com/omelette".parse().unwrap()),
            ..Default::default()
        };
        let prompt = build_prompt(&input, &NormalizationConfig::default());
        assert!(prompt.starts_with("Extract the recipe from the text below."));
        assert!(prompt.contains("\"\"\"\n2 eggs\nwhisk\n\"\"\""));
        assert!(prompt.ends_with("https://example.com/omelette"));
    }

    #[test]
    fn test_normalization_options() {
        let normalization = NormalizationConfig {
            units: UnitSystem::Imperial,
            target_language: Some("French".into()),
        };
        let prompt = build_prompt(&image_input(), &normalization);
        assert!(prompt.contains("°F"));
        assert!(prompt.contains("in French, translating"));

        let original = NormalizationConfig {
            units: UnitSystem::Original,
            target_language: Some("  ".into()),
        };
        let prompt = build_prompt(&image_input(), &original);
        assert!(prompt.contains("units used by the source"));
        assert!(prompt.contains("Keep the title, ingredients and steps in the source language."));
    }
}
