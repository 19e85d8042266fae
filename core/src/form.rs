//! Conversion of submitted recipe form fields into a [`RecipeDraft`].

use crate::types::RecipeDraft;

/// Parse recipe form fields.
///
/// `fields` are the submitted `(name, value)` pairs in submission order;
/// repeated names carry the list fields. `prefix` selects one recipe when a
/// page holds several (e.g. `"original_"` for the hidden baseline fields).
///
/// Blank list entries are dropped. Yield fields that are blank or not an
/// integer become `None`. The result is not validated.
pub fn parse_recipe_form<K, V>(fields: &[(K, V)], prefix: &str) -> RecipeDraft
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let key = |field: &str| format!("{prefix}{field}");

    let name = first_value(fields, &key("name")).unwrap_or_default().to_string();

    let ingredients = non_blank_values(fields, &key("ingredients"));
    let instructions = non_blank_values(fields, &key("instructions"));

    let makes_min = first_value(fields, &key("makes_min")).and_then(parse_int);
    let makes_max = first_value(fields, &key("makes_max")).and_then(parse_int);
    let makes_unit = first_value(fields, &key("makes_unit"))
        .map(str::trim)
        .filter(|unit| !unit.is_empty())
        .map(str::to_string);

    RecipeDraft {
        name,
        ingredients,
        instructions,
        makes_min,
        makes_max,
        makes_unit,
    }
}

fn first_value<'a, K, V>(fields: &'a [(K, V)], key: &str) -> Option<&'a str>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fields
        .iter()
        .find(|(k, _)| k.as_ref() == key)
        .map(|(_, v)| v.as_ref())
}

fn non_blank_values<K, V>(fields: &[(K, V)], key: &str) -> Vec<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fields
        .iter()
        .filter(|(k, v)| k.as_ref() == key && !v.as_ref().trim().is_empty())
        .map(|(_, v)| v.as_ref().to_string())
        .collect()
}

fn parse_int(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}
