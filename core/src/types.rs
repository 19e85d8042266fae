use crate::error::RecipeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unit used when a recipe has a yield but no unit of its own.
pub const DEFAULT_MAKES_UNIT: &str = "servings";

/// Recipe content as entered or edited by a user, before it is persisted.
///
/// This is also the record shape exchanged with the editing UI: `makes_*`
/// fields are optional and serialize as `null` when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(default)]
    pub makes_min: Option<i32>,
    #[serde(default)]
    pub makes_max: Option<i32>,
    #[serde(default)]
    pub makes_unit: Option<String>,
}

impl RecipeDraft {
    pub fn new(
        name: impl Into<String>,
        ingredients: Vec<String>,
        instructions: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ingredients,
            instructions,
            makes_min: None,
            makes_max: None,
            makes_unit: None,
        }
    }

    pub fn with_makes(mut self, min: Option<i32>, max: Option<i32>, unit: Option<&str>) -> Self {
        self.makes_min = min;
        self.makes_max = max;
        self.makes_unit = unit.map(str::to_string);
        self
    }

    /// Check the invariants a recipe must satisfy before it can be saved.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.name.trim().is_empty() {
            return Err(RecipeError::EmptyName);
        }
        if self.ingredients.is_empty() {
            return Err(RecipeError::NoIngredients);
        }
        if self.instructions.is_empty() {
            return Err(RecipeError::NoInstructions);
        }

        for (field, value) in [("makes_min", self.makes_min), ("makes_max", self.makes_max)] {
            if let Some(value) = value {
                if value < 1 {
                    return Err(RecipeError::InvalidMakes { field, value });
                }
            }
        }

        if let (Some(min), Some(max)) = (self.makes_min, self.makes_max) {
            if max < min {
                return Err(RecipeError::MakesRange { min, max });
            }
        }

        Ok(())
    }

    /// Human-readable yield, e.g. "4-6 servings". `None` when no yield is set.
    pub fn makes_text(&self) -> Option<String> {
        let unit = self.makes_unit.as_deref().unwrap_or(DEFAULT_MAKES_UNIT);
        match (self.makes_min, self.makes_max) {
            (Some(min), Some(max)) if min == max => Some(format!("{min} {unit}")),
            (Some(min), Some(max)) => Some(format!("{min}-{max} {unit}")),
            (Some(min), None) => Some(format!("{min}+ {unit}")),
            (None, Some(max)) => Some(format!("up to {max} {unit}")),
            (None, None) => None,
        }
    }

    /// Display label for the yield, e.g. "Makes: 4 servings".
    pub fn makes_label(&self) -> Option<String> {
        self.makes_text().map(|text| format!("Makes: {text}"))
    }

    /// Markdown form of the recipe. Used for display and for diffing edits.
    pub fn markdown(&self) -> String {
        let makes_md = self
            .makes_text()
            .map(|text| format!("**Makes:** {text}\n\n"))
            .unwrap_or_default();

        let ingredients_md = bullet_list(&self.ingredients);
        let instructions_md = bullet_list(&self.instructions);

        format!(
            "# {}\n\n{}## Ingredients\n{}\n\n## Instructions\n{}\n",
            self.name, makes_md, ingredients_md, instructions_md
        )
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A persisted recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    #[serde(flatten)]
    pub content: RecipeDraft,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    pub fn markdown(&self) -> String {
        self.content.markdown()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
