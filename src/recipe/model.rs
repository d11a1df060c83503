//! The recipe record exchanged with the model.
//!
//! Deserialization is lenient: the model does not always follow the
//! requested shape exactly, so flat ingredient lists, bare-string steps and
//! numeric servings are all accepted. [`Recipe::normalize`] then tidies the
//! record before it is published.

use serde::{Deserialize, Deserializer, Serialize};

use crate::recipe::sanitize::clean_model_output;

/// Title used when the model returns none.
pub const DEFAULT_TITLE: &str = "Untitled Recipe";

/// A structured recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,

    /// Set when the model had to invent the recipe from the input.
    #[serde(alias = "isImaginary", alias = "generated", deserialize_with = "null_as_default")]
    pub imaginary: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub ingredients: Ingredients,

    #[serde(deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,

    #[serde(alias = "cook_time", deserialize_with = "opt_string_or_number")]
    pub cook_time: Option<String>,

    #[serde(deserialize_with = "opt_string_or_number")]
    pub servings: Option<String>,

    /// Detected ISO 639-1 language code.
    #[serde(deserialize_with = "null_as_default")]
    pub language: Option<String>,
}

impl Recipe {
    /// Parse a model reply into a normalized recipe.
    pub fn from_model_output(raw: &str) -> Result<Self, serde_json::Error> {
        let mut recipe: Recipe = serde_json::from_str(clean_model_output(raw))?;
        recipe.normalize();
        Ok(recipe)
    }

    /// Trim every string, drop empty entries and fill in the title.
    pub fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            self.title = DEFAULT_TITLE.to_string();
        }

        self.ingredients.normalize();

        for step in &mut self.steps {
            step.text = step.text.trim().to_string();
            clean_lines(&mut step.ingredients);
        }
        self.steps.retain(|s| !s.text.is_empty());

        self.cook_time = clean_optional(self.cook_time.take());
        self.servings = clean_optional(self.servings.take());
        self.language = clean_optional(self.language.take()).map(|l| l.to_lowercase());
    }
}

/// The three fixed ingredient categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientCategory {
    Main,
    Seasoning,
    Garnish,
}

impl IngredientCategory {
    pub const ALL: [IngredientCategory; 3] = [Self::Main, Self::Seasoning, Self::Garnish];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Main => "Main",
            Self::Seasoning => "Seasoning",
            Self::Garnish => "Garnish",
        }
    }
}

/// Ingredients grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "IngredientsRepr")]
pub struct Ingredients {
    pub main: Vec<String>,
    pub seasoning: Vec<String>,
    pub garnish: Vec<String>,
}

impl Ingredients {
    pub fn get(&self, category: IngredientCategory) -> &[String] {
        match category {
            IngredientCategory::Main => &self.main,
            IngredientCategory::Seasoning => &self.seasoning,
            IngredientCategory::Garnish => &self.garnish,
        }
    }

    /// Categories in fixed order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (IngredientCategory, &[String])> + '_ {
        IngredientCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Categories that have at least one ingredient.
    pub fn non_empty(&self) -> impl Iterator<Item = (IngredientCategory, &[String])> + '_ {
        self.iter().filter(|(_, items)| !items.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.non_empty().next().is_none()
    }

    /// Every ingredient, in category order.
    pub fn all(&self) -> impl Iterator<Item = &String> + '_ {
        self.main.iter().chain(&self.seasoning).chain(&self.garnish)
    }

    fn normalize(&mut self) {
        clean_lines(&mut self.main);
        clean_lines(&mut self.seasoning);
        clean_lines(&mut self.garnish);
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientsRepr {
    Flat(Vec<Line>),
    Grouped {
        #[serde(default, alias = "main_ingredients", deserialize_with = "null_as_default")]
        main: Vec<Line>,
        #[serde(default, alias = "seasonings", alias = "sauce", deserialize_with = "null_as_default")]
        seasoning: Vec<Line>,
        #[serde(default, alias = "garnishes", alias = "toppings", deserialize_with = "null_as_default")]
        garnish: Vec<Line>,
    },
}

impl From<IngredientsRepr> for Ingredients {
    fn from(repr: IngredientsRepr) -> Self {
        let lines = |v: Vec<Line>| v.into_iter().map(String::from).collect();
        match repr {
            IngredientsRepr::Flat(main) => Self {
                main: lines(main),
                ..Self::default()
            },
            IngredientsRepr::Grouped {
                main,
                seasoning,
                garnish,
            } => Self {
                main: lines(main),
                seasoning: lines(seasoning),
                garnish: lines(garnish),
            },
        }
    }
}

/// One ingredient line: a string, or an object the model split into parts.
#[derive(Deserialize)]
#[serde(untagged)]
enum Line {
    Text(String),
    Parts {
        #[serde(default, alias = "amount", deserialize_with = "opt_string_or_number")]
        quantity: Option<String>,
        #[serde(default)]
        unit: Option<String>,
        #[serde(alias = "ingredient", alias = "item")]
        name: String,
    },
}

impl From<Line> for String {
    fn from(line: Line) -> Self {
        match line {
            Line::Text(text) => text,
            Line::Parts {
                quantity,
                unit,
                name,
            } => [quantity, unit, Some(name)]
                .into_iter()
                .flatten()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// One instruction, optionally annotated with the ingredients it uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StepRepr")]
pub struct Step {
    pub text: String,
    pub ingredients: Vec<String>,
}

impl Step {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ingredients: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StepRepr {
    Text(String),
    Detailed {
        #[serde(alias = "instruction", alias = "description")]
        text: String,
        #[serde(default, deserialize_with = "null_as_default")]
        ingredients: Vec<Line>,
    },
}

impl From<StepRepr> for Step {
    fn from(repr: StepRepr) -> Self {
        match repr {
            StepRepr::Text(text) => Step::new(text),
            StepRepr::Detailed { text, ingredients } => Step {
                text,
                ingredients: ingredients.into_iter().map(String::from).collect(),
            },
        }
    }
}

fn clean_lines(lines: &mut Vec<String>) {
    for line in lines.iter_mut() {
        *line = line.trim().to_string();
    }
    lines.retain(|l| !l.is_empty());
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| {
        !v.is_empty() && !matches!(v.to_ascii_lowercase().as_str(), "null" | "n/a" | "none")
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Text(t) => t,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
    }))
}
