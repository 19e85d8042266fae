pub mod diff;
pub mod error;
pub mod form;
pub mod markdown;
pub mod review;
pub mod types;

pub use diff::{fragments_to_html, opcodes, render_diff, Fragment, FragmentKind, OpTag, Opcode};
pub use error::RecipeError;
pub use form::parse_recipe_form;
pub use review::{
    build_diff_columns, build_original_hidden_fields, build_recipe_display, build_review_section,
};
pub use types::{Recipe, RecipeDraft, User, DEFAULT_MAKES_UNIT};
