//! identifier normalization
//!
//! maps schema identifiers to exported go identifiers. pure string
//! functions used by every other module.

/// normalize a schema identifier into an exported go identifier.
///
/// `id` and `uuid` (case-insensitive) are upper-cased whole, matching go's
/// acronym convention. everything else drops one leading and one trailing
/// underscore, then upper-cases the first character of each
/// underscore-separated segment.
///
/// # example
///
/// ```
/// use gqlgo::export_name;
///
/// assert_eq!(export_name("created_at"), "CreatedAt");
/// assert_eq!(export_name("id"), "ID");
/// ```
pub fn export_name(raw: &str) -> String {
    if raw.eq_ignore_ascii_case("id") || raw.eq_ignore_ascii_case("uuid") {
        return raw.to_ascii_uppercase();
    }

    let trimmed = raw.strip_prefix('_').unwrap_or(raw);
    let trimmed = trimmed.strip_suffix('_').unwrap_or(trimmed);

    let mut out = String::with_capacity(trimmed.len());
    for segment in trimmed.split('_') {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// true if the name is a go keyword and cannot be used as a package name
pub fn is_go_keyword(name: &str) -> bool {
    matches!(
        name,
        "break"
            | "case"
            | "chan"
            | "const"
            | "continue"
            | "default"
            | "defer"
            | "else"
            | "fallthrough"
            | "for"
            | "func"
            | "go"
            | "goto"
            | "if"
            | "import"
            | "interface"
            | "map"
            | "package"
            | "range"
            | "return"
            | "select"
            | "struct"
            | "switch"
            | "type"
            | "var"
    )
}
