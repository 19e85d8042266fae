//! HTML building blocks for the recipe review screen.
//!
//! Everything here is a plain function from recipe data to an HTML string.
//! Text taken from recipes is always escaped; diff fragments are already
//! rendered HTML and are inserted as-is.

use crate::diff::{fragments_to_html, render_diff};
use crate::markdown::escape_html;
use crate::types::RecipeDraft;

const CARD_CLASS: &str = "uk-card uk-card-secondary uk-card-body";
const PRE_CLASS: &str =
    "border p-2 rounded bg-gray-100 dark:bg-gray-700 mt-1 overflow-auto text-xs";
const PRE_STYLE: &str = "white-space: pre-wrap; overflow-wrap: break-word;";

fn diff_column(title: &str, pre_id: &str, body: &str) -> String {
    format!(
        "<div class=\"{CARD_CLASS}\"><strong>{}</strong>\
         <pre id=\"{pre_id}\" class=\"{PRE_CLASS}\" style=\"{PRE_STYLE}\">{body}</pre></div>",
        escape_html(title),
    )
}

/// Build the "before" and "after" diff columns comparing `original` with the
/// markdown of the recipe currently being edited.
pub fn build_diff_columns(original: &RecipeDraft, current_markdown: &str) -> (String, String) {
    let (before, after) = render_diff(&original.markdown(), current_markdown);

    (
        diff_column(
            "Initial Extracted Recipe (Reference)",
            "diff-before-pre",
            &fragments_to_html(&before),
        ),
        diff_column(
            "Current Edited Recipe",
            "diff-after-pre",
            &fragments_to_html(&after),
        ),
    )
}

/// The "Review Changes" card: both diff columns side by side and a save button.
pub fn build_review_section(original: &RecipeDraft, current: &RecipeDraft) -> String {
    let (before, after) = build_diff_columns(original, &current.markdown());

    format!(
        "<div id=\"review-card\" class=\"uk-card uk-card-body\"><div>\
         <h2>Review Changes</h2>\
         <div id=\"diff-content-wrapper\" class=\"flex space-x-4 mt-4\">{before}{after}</div>\
         {}</div></div>",
        build_save_button()
    )
}

fn build_save_button() -> String {
    "<div class=\"mt-6\"><button type=\"submit\" class=\"uk-button uk-button-primary\" \
     hx-post=\"/recipes/save\" hx-target=\"#save-button-container\">Save Recipe</button>\
     <div id=\"save-button-container\"></div></div>"
        .to_string()
}

fn hidden_input(name: &str, value: &str) -> String {
    format!(
        "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
        escape_html(name),
        escape_html(value)
    )
}

/// Hidden inputs carrying the original recipe through an edit round trip so
/// the diff baseline survives each form submission.
pub fn build_original_hidden_fields(original: &RecipeDraft) -> Vec<String> {
    let mut fields = vec![hidden_input("original_name", &original.name)];

    fields.extend(
        original
            .ingredients
            .iter()
            .map(|ing| hidden_input("original_ingredients", ing)),
    );
    fields.extend(
        original
            .instructions
            .iter()
            .map(|inst| hidden_input("original_instructions", inst)),
    );

    if let Some(min) = original.makes_min {
        fields.push(hidden_input("original_makes_min", &min.to_string()));
    }
    if let Some(max) = original.makes_max {
        fields.push(hidden_input("original_makes_max", &max.to_string()));
    }
    if let Some(unit) = &original.makes_unit {
        fields.push(hidden_input("original_makes_unit", unit));
    }

    fields
}

fn bullet_list(items: &[String]) -> String {
    let items: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    format!("<ul class=\"uk-list uk-list-bullet\">{items}</ul>")
}

/// Card showing a recipe's name, yield, ingredients and instructions.
pub fn build_recipe_display(recipe: &RecipeDraft) -> String {
    let mut html = format!("<div class=\"{CARD_CLASS}\"><h3>{}</h3>", escape_html(&recipe.name));

    if let Some(label) = recipe.makes_label() {
        html.push_str(&format!("<p class=\"uk-text-muted\">{}</p>", escape_html(&label)));
    }

    html.push_str("<h4>Ingredients</h4>");
    html.push_str(&bullet_list(&recipe.ingredients));

    if !recipe.instructions.is_empty() {
        html.push_str("<h4>Instructions</h4>");
        html.push_str(&bullet_list(&recipe.instructions));
    }

    html.push_str("</div>");
    html
}
