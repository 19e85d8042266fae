// Schema at the head revision. Columns are TEXT where SQLite has no native
// type: ids are canonical UUID strings, list fields are JSON arrays and
// timestamps are RFC 3339 strings.

diesel::table! {
    recipes (id) {
        id -> Text,
        name -> Text,
        ingredients -> Text,
        instructions -> Text,
        created_at -> Text,
        updated_at -> Text,
        makes_min -> Nullable<Integer>,
        makes_max -> Nullable<Integer>,
        makes_unit -> Nullable<Text>,
    }
}

diesel::table! {
    users (id) {
        id -> Text,
        username -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    schema_revision (revision_id) {
        revision_id -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(recipes, users);
