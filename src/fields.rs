//! field type resolver
//!
//! maps a graphql type expression (named / non-null / list wrappers) to a
//! rendered go field declaration. the recursion carries two accumulators: a
//! `prefix` of `[]` markers built as list wrappers unwrap, and a `non_null`
//! flag deciding pointer-ness and `omitempty` at the named leaf.
//!
//! the pointer decision is made once per field: after the first list marker
//! has been accumulated, inner non-null wrappers leave the flag unchanged,
//! so element non-nullability inside a list is not tracked.

use crate::catalog::TypeCatalog;
use crate::error::{Error, Result};
use crate::naming::export_name;
use graphql_parser::schema::Type;

/// rendered go declaration for one schema field or operation variable
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// raw schema field name, used as the json key
    pub field_name: String,
    /// exported go field name
    pub target_name: String,
    /// full go type rendering, e.g. `*[]String`
    pub rendering: String,
    /// whether the field renders behind a pointer
    pub is_pointer: bool,
    /// whether the json tag carries `omitempty`
    pub omitempty: bool,
}

impl FieldDecl {
    /// go struct tag for this field
    pub fn json_tag(&self) -> String {
        if self.omitempty {
            format!("`json:\"{},omitempty\"`", self.field_name)
        } else {
            format!("`json:\"{}\"`", self.field_name)
        }
    }
}

/// resolve a field or variable type expression against the catalog
pub fn resolve_field(
    ty: &Type<'_, String>,
    field_name: &str,
    catalog: &TypeCatalog<'_>,
) -> Result<FieldDecl> {
    resolve_inner(ty, field_name, catalog, String::new(), false)
}

fn resolve_inner(
    ty: &Type<'_, String>,
    field_name: &str,
    catalog: &TypeCatalog<'_>,
    prefix: String,
    non_null: bool,
) -> Result<FieldDecl> {
    match ty {
        Type::NonNullType(inner) => {
            let non_null = if prefix.is_empty() { true } else { non_null };
            resolve_inner(inner, field_name, catalog, prefix, non_null)
        }
        Type::ListType(inner) => {
            resolve_inner(inner, field_name, catalog, format!("{prefix}[]"), non_null)
        }
        Type::NamedType(name) => {
            let entry = catalog.lookup(name).ok_or_else(|| Error::UnknownType {
                type_name: name.clone(),
                field_name: field_name.to_string(),
            })?;
            let is_pointer = !non_null;
            let pointer = if is_pointer { "*" } else { "" };
            Ok(FieldDecl {
                field_name: field_name.to_string(),
                target_name: export_name(field_name),
                rendering: format!("{pointer}{prefix}{}", entry.target_name),
                is_pointer,
                omitempty: !non_null,
            })
        }
    }
}
