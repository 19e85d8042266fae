use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeError {
    #[error("Recipe name cannot be empty")]
    EmptyName,

    #[error("Recipe must have at least one ingredient")]
    NoIngredients,

    #[error("Recipe must have at least one instruction")]
    NoInstructions,

    #[error("Invalid {field}: {value} (must be at least 1)")]
    InvalidMakes { field: &'static str, value: i32 },

    #[error("Maximum quantity ({max}) cannot be less than minimum quantity ({min})")]
    MakesRange { min: i32, max: i32 },
}
