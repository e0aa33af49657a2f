//! Query payload builders for the shell's authoring/preview endpoints.
//!
//! Every query-language string this system sends is assembled here, so
//! the escaping rules live in exactly one place. Stored JSON payloads
//! are embedded as string literals; the remote side parses the literal
//! back to the raw text, so escaping happens on write only.

/// Escape a value for embedding in a query-language string literal.
///
/// Backslashes are escaped strictly before quotes. Escaping quotes
/// first would turn the `\` introduced by the quote escape into a
/// literal backslash on the remote side.
pub fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape double quotes only.
///
/// Used for plain-text fields (titles) that cannot contain payload
/// backslashes.
pub fn escape_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}

/// Lookup of a single item by exact path in the master partition.
pub fn item_lookup(path: &str) -> String {
    format!(
        "{{\n  item(where: {{ database: \"master\", path: \"{path}\" }}) {{\n    itemId,\n    name,\n    path\n  }}\n}}"
    )
}

/// Create an item under `parent_id` from `template_id`.
///
/// `fields` carries `(name, value)` pairs; values must already be
/// escaped by the caller.
pub fn create_item(
    name: &str,
    parent_id: &str,
    template_id: &str,
    fields: &[(&str, &str)],
) -> String {
    let fields_block = if fields.is_empty() {
        String::new()
    } else {
        let entries = fields
            .iter()
            .map(|(name, value)| format!("{{ name: \"{name}\", value: \"{value}\" }}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(",\n      fields: [{entries}]")
    };

    format!(
        "mutation {{\n  createItem(\n    input: {{\n      name: \"{name}\",\n      parent: \"{parent_id}\",\n      templateId: \"{template_id}\",\n      language: \"en\",\n      database: \"master\"{fields_block}\n    }}\n  ) {{\n    item {{\n      itemId,\n      name,\n      path\n    }}\n  }}\n}}"
    )
}

/// Create a template folder under `parent_id`.
pub fn create_template_folder(name: &str, parent_id: &str) -> String {
    format!(
        "mutation {{\n  createItemTemplateFolder(\n    input: {{ name: \"{name}\", parent: \"{parent_id}\" }}\n  ) {{\n    item {{\n      name,\n      itemId\n    }}\n  }}\n}}"
    )
}

/// Create a template definition with one data section.
///
/// `fields` carries `(name, field type)` pairs, e.g.
/// `("TodoData", "Multi-Line Text")`.
pub fn create_template(
    name: &str,
    parent_id: &str,
    icon: &str,
    section: &str,
    fields: &[(&str, &str)],
) -> String {
    let entries = fields
        .iter()
        .map(|(name, kind)| format!("{{ name: \"{name}\", type: \"{kind}\" }}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "mutation {{\n  createItemTemplate(\n    input: {{\n      name: \"{name}\",\n      parent: \"{parent_id}\",\n      icon: \"{icon}\",\n      sections: {{ name: \"{section}\", fields: [{entries}] }}\n    }}\n  ) {{\n    itemTemplate {{\n      name,\n      templateId\n    }}\n  }}\n}}"
    )
}

/// Update one field on an existing item.
///
/// `value` must already be escaped by the caller.
pub fn update_field(item_id: &str, field: &str, value: &str) -> String {
    format!(
        "mutation {{\n  updateItem(\n    input: {{\n      itemId: \"{item_id}\",\n      fields: [{{ name: \"{field}\", value: \"{value}\" }}]\n    }}\n  ) {{\n    item {{\n      itemId,\n      name\n    }}\n  }}\n}}"
    )
}

/// Search for items under `folder_path`, selecting one stored field.
///
/// The data repository takes the first hit only; the query carries no
/// per-page filter (observed single-record-per-installation behavior).
pub fn search_items_under(folder_path: &str, field: &str) -> String {
    format!(
        "query {{\n  search(\n    where: {{ name: \"_path\", value: \"{folder_path}\", operator: CONTAINS }}\n  ) {{\n    total\n    results {{\n      id\n      field(name: \"{field}\") {{\n        jsonValue\n      }}\n    }}\n  }}\n}}"
    )
}

// MARK: - Tests
