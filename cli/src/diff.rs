use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use meal_planner_core::{
    build_review_section, fragments_to_html, opcodes, render_diff, OpTag, RecipeDraft,
};

/// A recipe given on the command line, either as Markdown or as a JSON draft.
enum Input {
    Markdown(String),
    Draft(RecipeDraft),
}

impl Input {
    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if path.extension().is_some_and(|e| e == "json") {
            let draft = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse recipe JSON in {}", path.display()))?;
            Ok(Input::Draft(draft))
        } else {
            Ok(Input::Markdown(text))
        }
    }

    fn markdown(&self) -> String {
        match self {
            Input::Markdown(text) => text.clone(),
            Input::Draft(draft) => draft.markdown(),
        }
    }
}

/// Plain line diff over non-blank lines, one `-`/`+`/` ` prefixed line each.
fn plain_diff(before: &str, after: &str) -> String {
    let before: Vec<&str> = before.lines().filter(|l| !l.trim().is_empty()).collect();
    let after: Vec<&str> = after.lines().filter(|l| !l.trim().is_empty()).collect();

    let mut out = String::new();
    for op in opcodes(&before, &after) {
        if op.tag == OpTag::Equal {
            for line in &before[op.before.clone()] {
                out.push_str(&format!("  {line}\n"));
            }
            continue;
        }
        for line in &before[op.before.clone()] {
            out.push_str(&format!("- {line}\n"));
        }
        for line in &after[op.after.clone()] {
            out.push_str(&format!("+ {line}\n"));
        }
    }
    out
}

pub fn run(before: &Path, after: &Path, html: bool) -> Result<String> {
    let before = Input::load(before)?;
    let after = Input::load(after)?;

    if !html {
        return Ok(plain_diff(&before.markdown(), &after.markdown()));
    }

    match (before, after) {
        (Input::Draft(original), Input::Draft(current)) => {
            Ok(build_review_section(&original, &current) + "\n")
        }
        (before, after) => {
            let (before, after) = render_diff(&before.markdown(), &after.markdown());
            Ok(format!(
                "<pre id=\"diff-before-pre\">{}</pre>\n<pre id=\"diff-after-pre\">{}</pre>\n",
                fragments_to_html(&before),
                fragments_to_html(&after)
            ))
        }
    }
}
