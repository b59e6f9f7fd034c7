//! Word-list content for round starts.
//!
//! The session treats content as an opaque collaborator: any type exposing
//! named categories with non-empty word lists can feed `start_round`. A
//! built-in deck ships with the crate, and decks can be loaded from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a category deck.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("deck has no categories")]
    NoCategories,
    #[error("category {0:?} has no words")]
    EmptyCategory(String),
    #[error("category deck is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A named category with its candidate secret words.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub words: Vec<String>,
}

/// Read-only source of categories, queried once per round start.
pub trait ContentSource {
    fn categories(&self) -> &[Category];
}

/// Parse a category deck from JSON, rejecting empty decks and categories
/// with no words.
///
/// Expected shape:
/// `[{"name": "Animals", "words": ["otter", "heron"]}, ...]`
pub fn load_categories(json: &str) -> Result<Vec<Category>, ContentError> {
    let categories: Vec<Category> = serde_json::from_str(json)?;
    if categories.is_empty() {
        return Err(ContentError::NoCategories);
    }
    for category in &categories {
        if category.words.is_empty() {
            return Err(ContentError::EmptyCategory(category.name.clone()));
        }
    }
    Ok(categories)
}

/// The stock deck bundled with the crate.
#[derive(Clone, Debug)]
pub struct BuiltinDeck {
    categories: Vec<Category>,
}

impl BuiltinDeck {
    #[must_use]
    pub fn new() -> Self {
        let make = |name: &str, words: &[&str]| Category {
            name: name.to_string(),
            words: words.iter().map(|w| (*w).to_string()).collect(),
        };
        Self {
            categories: vec![
                make(
                    "Animals",
                    &[
                        "otter", "heron", "camel", "badger", "python", "walrus", "lemur",
                        "magpie", "gecko", "bison",
                    ],
                ),
                make(
                    "Food",
                    &[
                        "dumpling", "croissant", "paella", "ramen", "falafel", "tiramisu",
                        "pretzel", "gazpacho", "lasagna", "churro",
                    ],
                ),
                make(
                    "Places",
                    &[
                        "lighthouse", "subway", "vineyard", "observatory", "harbor",
                        "courthouse", "greenhouse", "campsite", "arcade", "bakery",
                    ],
                ),
                make(
                    "Jobs",
                    &[
                        "locksmith", "florist", "surgeon", "referee", "astronaut",
                        "librarian", "plumber", "beekeeper", "pilot", "blacksmith",
                    ],
                ),
                make(
                    "Objects",
                    &[
                        "umbrella", "compass", "typewriter", "kettle", "telescope",
                        "hammock", "lantern", "stapler", "accordion", "thermos",
                    ],
                ),
            ],
        }
    }
}

impl Default for BuiltinDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSource for BuiltinDeck {
    fn categories(&self) -> &[Category] {
        &self.categories
    }
}
