//! Page properties and body blocks for a recipe.
//!
//! The API caps a text object at 2000 characters, a rich-text array at 100
//! objects and a request at 100 top-level blocks with two levels of nesting.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{json, Map, Value};
use url::Url;

use crate::config::PropertyNames;
use crate::recipe::Recipe;

pub const MAX_TEXT_CHARS: usize = 2000;
pub const MAX_RICH_TEXT_ITEMS: usize = 100;
pub const MAX_BLOCKS_PER_REQUEST: usize = 100;

/// A text object.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RichText {
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotations: Option<Annotations>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
struct TextContent {
    content: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
struct Annotations {
    italic: bool,
}

impl RichText {
    fn plain(content: String) -> Self {
        Self {
            kind: "text",
            text: TextContent { content },
            annotations: None,
        }
    }

    fn italic(mut self) -> Self {
        self.annotations = Some(Annotations { italic: true });
        self
    }

    pub fn content(&self) -> &str {
        &self.text.content
    }
}

/// Split text into API-sized text objects.
pub fn rich_text(text: &str) -> Vec<RichText> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(MAX_TEXT_CHARS)
        .take(MAX_RICH_TEXT_ITEMS)
        .map(|chunk| RichText::plain(chunk.iter().collect()))
        .collect()
}

/// A body block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading2(Vec<RichText>),
    Heading3(Vec<RichText>),
    Paragraph(Vec<RichText>),
    BulletedListItem {
        rich_text: Vec<RichText>,
        children: Vec<Block>,
    },
    NumberedListItem {
        rich_text: Vec<RichText>,
        children: Vec<Block>,
    },
    Callout {
        rich_text: Vec<RichText>,
        emoji: &'static str,
    },
    Bookmark {
        url: String,
    },
}

impl Block {
    pub fn heading2(text: &str) -> Self {
        Self::Heading2(rich_text(text))
    }

    pub fn heading3(text: &str) -> Self {
        Self::Heading3(rich_text(text))
    }

    pub fn paragraph(text: &str) -> Self {
        Self::Paragraph(rich_text(text))
    }

    pub fn bullet(text: &str) -> Self {
        Self::BulletedListItem {
            rich_text: rich_text(text),
            children: Vec::new(),
        }
    }

    pub fn numbered(text: &str, children: Vec<Block>) -> Self {
        Self::NumberedListItem {
            rich_text: rich_text(text),
            children,
        }
    }

    /// The `type` discriminator used by the API.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Heading2(_) => "heading_2",
            Self::Heading3(_) => "heading_3",
            Self::Paragraph(_) => "paragraph",
            Self::BulletedListItem { .. } => "bulleted_list_item",
            Self::NumberedListItem { .. } => "numbered_list_item",
            Self::Callout { .. } => "callout",
            Self::Bookmark { .. } => "bookmark",
        }
    }
}

#[derive(serde::Serialize)]
struct TextBody<'a> {
    rich_text: &'a [RichText],
}

#[derive(serde::Serialize)]
struct ListBody<'a> {
    rich_text: &'a [RichText],
    #[serde(skip_serializing_if = "<[Block]>::is_empty")]
    children: &'a [Block],
}

#[derive(serde::Serialize)]
struct CalloutBody<'a> {
    rich_text: &'a [RichText],
    icon: Icon<'a>,
}

#[derive(serde::Serialize)]
struct Icon<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    emoji: &'a str,
}

#[derive(serde::Serialize)]
struct BookmarkBody<'a> {
    url: &'a str,
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let name = self.type_name();
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("object", "block")?;
        map.serialize_entry("type", name)?;
        match self {
            Self::Heading2(rich_text) | Self::Heading3(rich_text) | Self::Paragraph(rich_text) => {
                map.serialize_entry(name, &TextBody { rich_text })?
            }
            Self::BulletedListItem { rich_text, children }
            | Self::NumberedListItem { rich_text, children } => {
                map.serialize_entry(name, &ListBody { rich_text, children })?
            }
            Self::Callout { rich_text, emoji } => map.serialize_entry(
                name,
                &CalloutBody {
                    rich_text,
                    icon: Icon { kind: "emoji", emoji },
                },
            )?,
            Self::Bookmark { url } => map.serialize_entry(name, &BookmarkBody { url })?,
        }
        map.end()
    }
}

/// Database property values for a recipe.
pub fn page_properties(recipe: &Recipe, source: Option<&Url>, names: &PropertyNames) -> Map<String, Value> {
    let mut props = Map::new();
    let text_prop = |text: &str| json!({ "rich_text": rich_text(text) });

    props.insert(names.title.clone(), json!({ "title": rich_text(&recipe.title) }));
    props.insert(names.ingredients.clone(), text_prop(&ingredients_text(recipe)));
    props.insert(names.steps.clone(), text_prop(&steps_text(recipe)));
    props.insert(
        names.cook_time.clone(),
        text_prop(recipe.cook_time.as_deref().unwrap_or("N/A")),
    );
    props.insert(
        names.servings.clone(),
        text_prop(recipe.servings.as_deref().unwrap_or("N/A")),
    );

    if let (Some(name), Some(url)) = (&names.source, source) {
        props.insert(name.clone(), json!({ "url": url.as_str() }));
    }
    if let (Some(name), Some(language)) = (&names.language, &recipe.language) {
        props.insert(name.clone(), text_prop(language));
    }

    props
}

fn ingredients_text(recipe: &Recipe) -> String {
    let grouped = recipe.ingredients.non_empty().count() > 1;
    recipe
        .ingredients
        .non_empty()
        .flat_map(|(category, items)| {
            items.iter().map(move |item| {
                if grouped {
                    format!("{}: {}", category.label(), item)
                } else {
                    item.clone()
                }
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn steps_text(recipe: &Recipe) -> String {
    recipe
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Page body for a recipe.
pub fn page_children(recipe: &Recipe, source: Option<&Url>) -> Vec<Block> {
    let mut blocks = Vec::new();

    if recipe.imaginary {
        blocks.push(Block::Callout {
            rich_text: rich_text(
                "This recipe was generated by the model: the source did not contain a complete recipe.",
            ),
            emoji: "⚠️",
        });
    }

    if let Some(url) = source {
        blocks.push(Block::Bookmark {
            url: url.to_string(),
        });
    }

    let summary: Vec<String> = [
        recipe.cook_time.as_deref().map(|t| format!("Cook time: {t}")),
        recipe.servings.as_deref().map(|s| format!("Servings: {s}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !summary.is_empty() {
        blocks.push(Block::paragraph(&summary.join(" · ")));
    }

    if !recipe.ingredients.is_empty() {
        blocks.push(Block::heading2("Ingredients"));
        let grouped = recipe.ingredients.non_empty().count() > 1;
        for (category, items) in recipe.ingredients.non_empty() {
            if grouped {
                blocks.push(Block::heading3(category.label()));
            }
            blocks.extend(items.iter().map(|item| Block::bullet(item)));
        }
    }

    if !recipe.steps.is_empty() {
        blocks.push(Block::heading2("Steps"));
        for step in &recipe.steps {
            let children = step
                .ingredients
                .iter()
                .map(|item| Block::BulletedListItem {
                    rich_text: rich_text(item).into_iter().map(RichText::italic).collect(),
                    children: Vec::new(),
                })
                .collect();
            blocks.push(Block::numbered(&step.text, children));
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{Ingredients, Step};

    fn recipe() -> Recipe {
        Recipe {
            title: "Shakshuka".into(),
            ingredients: Ingredients {
                main: vec!["4 eggs".into(), "400 g tomatoes".into()],
                seasoning: vec!["1 tsp cumin".into()],
                garnish: vec![],
            },
            steps: vec![
                Step {
                    text: "Simmer the tomatoes.".into(),
                    ingredients: vec!["400 g tomatoes".into(), "1 tsp cumin".into()],
                },
                Step::new("Crack in the eggs."),
            ],
            cook_time: Some("25 min".into()),
            servings: None,
            language: Some("en".into()),
            ..Recipe::default()
        }
    }

    #[test]
    fn test_rich_text_chunks() {
        let text = "é".repeat(MAX_TEXT_CHARS * 2 + 5);
        let chunks = rich_text(&text);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.content().chars().count() <= MAX_TEXT_CHARS));
        let joined: String = chunks.iter().map(RichText::content).collect();
        assert_eq!(joined, text);
        assert!(rich_text("").is_empty());
    }

    #[test]
    fn test_rich_text_item_cap() {
        let text = "x".repeat(MAX_TEXT_CHARS * (MAX_RICH_TEXT_ITEMS + 3));
        assert_eq!(rich_text(&text).len(), MAX_RICH_TEXT_ITEMS);
    }

    #[test]
    fn test_block_serialization() {
        let block = Block::numbered("Mix", vec![Block::bullet("flour")]);
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "object": "block",
                "type": "numbered_list_item",
                "numbered_list_item": {
                    "rich_text": [{"type": "text", "text": {"content": "Mix"}}],
                    "children": [{
                        "object": "block",
                        "type": "bulleted_list_item",
                        "bulleted_list_item": {
                            "rich_text": [{"type": "text", "text": {"content": "flour"}}]
                        }
                    }]
                }
            })
        );

        let bookmark = Block::Bookmark { url: "https://example.com/".into() };
        assert_eq!(
            serde_json::to_value(&bookmark).unwrap()["bookmark"],
            json!({"url": "https://example.com/"})
        );
    }

    #[test]
    fn test_properties() {
        let mut names = PropertyNames::default();
        names.source = Some("Source".into());
        names.language = Some("Language".into());
        let url: Url = "https://example.com/shakshuka".parse().unwrap();

        let props = page_properties(&recipe(), Some(&url), &names);
        assert_eq!(props["Name"]["title"][0]["text"]["content"], "Shakshuka");
        assert_eq!(
            props["Ingredients"]["rich_text"][0]["text"]["content"],
            "Main: 4 eggs\nMain: 400 g tomatoes\nSeasoning: 1 tsp cumin"
        );
        assert_eq!(
            props["Steps"]["rich_text"][0]["text"]["content"],
            "1. Simmer the tomatoes.\n2. Crack in the eggs."
        );
        assert_eq!(props["Cook Time"]["rich_text"][0]["text"]["content"], "25 min");
        assert_eq!(props["Servings"]["rich_text"][0]["text"]["content"], "N/A");
        assert_eq!(props["Source"]["url"], "https://example.com/shakshuka");
        assert_eq!(props["Language"]["rich_text"][0]["text"]["content"], "en");
    }

    #[test]
    fn test_optional_properties_skipped() {
        let props = page_properties(&recipe(), None, &PropertyNames::default());
        assert_eq!(props.len(), 5);
    }

    #[test]
    fn test_single_category_has_no_prefix_or_subheading() {
        let mut recipe = recipe();
        recipe.ingredients.seasoning.clear();
        let props = page_properties(&recipe, None, &PropertyNames::default());
        assert_eq!(
            props["Ingredients"]["rich_text"][0]["text"]["content"],
            "4 eggs\n400 g tomatoes"
        );
        let blocks = page_children(&recipe, None);
        assert!(!blocks.iter().any(|b| matches!(b, Block::Heading3(_))));
    }

    #[test]
    fn test_page_children_layout() {
        let blocks = page_children(&recipe(), None);
        let types: Vec<_> = blocks.iter().map(Block::type_name).collect();
        assert_eq!(
            types,
            vec![
                "paragraph",
                "heading_2",
                "heading_3",
                "bulleted_list_item",
                "bulleted_list_item",
                "heading_3",
                "bulleted_list_item",
                "heading_2",
                "numbered_list_item",
                "numbered_list_item",
            ]
        );
        assert_eq!(blocks[0], Block::paragraph("Cook time: 25 min"));
        match &blocks[8] {
            Block::NumberedListItem { children, .. } => assert_eq!(children.len(), 2),
            other => panic!("unexpected block {other:?}"),
        }
        match &blocks[9] {
            Block::NumberedListItem { children, .. } => assert!(children.is_empty()),
            other => panic!("unexpected block {other:?}"),
        }
    }

    #[test]
    fn test_imaginary_and_source_blocks() {
        let mut recipe = recipe();
        recipe.imaginary = true;
        recipe.cook_time = None;
        let url: Url = "https://example.com/".parse().unwrap();
        let blocks = page_children(&recipe, Some(&url));
        assert_eq!(blocks[0].type_name(), "callout");
        assert_eq!(blocks[1], Block::Bookmark { url: "https://example.com/".into() });
        assert_eq!(blocks[2].type_name(), "heading_2");
    }
}
