//! generation and assembly
//!
//! owns the immutable schema catalog and concatenates the final go source:
//! header, shared prelude, one block per named operation, then the
//! schema-derived declarations section by section. a generator can be reused
//! across runs for the same schema; each run owns its own output buffer.

use crate::catalog::{TypeCatalog, BUILTIN_SCALARS};
use crate::config::Config;
use crate::error::Result;
use crate::fields::{resolve_field, FieldDecl};
use crate::naming::export_name;
use crate::operations::OperationSynthesizer;
use crate::template;
use graphql_parser::query;
use graphql_parser::schema::Document;

/// go source generator for one schema
pub struct Generator<'a> {
    catalog: TypeCatalog<'a>,
    config: Config,
}

impl<'a> Generator<'a> {
    /// validate the config and build the catalog from the schema
    pub fn new(schema: &'a Document<'a, String>, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog: TypeCatalog::new(schema),
            config,
        })
    }

    /// access the schema catalog
    pub fn catalog(&self) -> &TypeCatalog<'a> {
        &self.catalog
    }

    /// generate the complete go source for a set of operation documents
    pub fn generate(&self, documents: &[query::Document<'_, String>]) -> Result<String> {
        let mut out = String::new();
        out.push_str("// Code generated by gqlgo. DO NOT EDIT.\n\n");
        out.push_str(&format!("package {}\n\n", self.config.package()));
        out.push_str(template::PRELUDE);
        out.push('\n');

        let synthesizer = OperationSynthesizer::new(&self.catalog, documents);
        for block in synthesizer.synthesize_all(documents)? {
            banner(&mut out, &format!("operation {}", block.name));
            if let Some(variables) = &block.variables {
                out.push_str(variables);
                out.push('\n');
            }
            out.push_str(&block.response);
            out.push('\n');
            out.push_str(&template::render(
                &block.name,
                &block.source,
                block.has_variables(),
            ));
            out.push('\n');
        }

        banner(&mut out, "scalars");
        for (name, primitive) in BUILTIN_SCALARS {
            out.push_str(&format!("type {} {}\n\n", export_name(name), primitive));
        }
        for scalar in self.catalog.scalars() {
            if let Some(entry) = self.catalog.lookup(&scalar.name) {
                let primitive = entry.primitive.as_deref().unwrap_or("string");
                out.push_str(&format!("type {} {}\n\n", entry.target_name, primitive));
            }
        }

        banner(&mut out, "enums");
        for enum_ty in self.catalog.enums() {
            let target = export_name(&enum_ty.name);
            out.push_str(&format!("type {target} string\n\n"));
            if !enum_ty.values.is_empty() {
                out.push_str("const (\n");
                for value in &enum_ty.values {
                    out.push_str(&format!(
                        "\t{target}{} {target} = \"{}\"\n",
                        export_name(&value.name),
                        value.name
                    ));
                }
                out.push_str(")\n\n");
            }
        }

        banner(&mut out, "inputs");
        for input in self.catalog.inputs() {
            let mut decls = Vec::with_capacity(input.fields.len());
            for field in &input.fields {
                decls.push(resolve_field(&field.value_type, &field.name, &self.catalog)?);
            }
            out.push_str(&emit_struct(&export_name(&input.name), &decls));
        }

        banner(&mut out, "objects");
        for object in self.catalog.objects() {
            let mut decls = Vec::with_capacity(object.fields.len());
            for field in &object.fields {
                decls.push(resolve_field(&field.field_type, &field.name, &self.catalog)?);
            }
            out.push_str(&emit_struct(&export_name(&object.name), &decls));
        }

        Ok(out)
    }
}

fn banner(out: &mut String, section: &str) {
    out.push_str(&format!("// ---- {section} ----\n\n"));
}

fn emit_struct(name: &str, fields: &[FieldDecl]) -> String {
    let mut out = format!("type {name} struct {{\n");
    for decl in fields {
        out.push_str(&format!(
            "\t{} {} {}\n",
            decl.target_name,
            decl.rendering,
            decl.json_tag()
        ));
    }
    out.push_str("}\n\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_parser::{parse_query, parse_schema};

    const SCHEMA: &str = r#"
        schema { query: Query }
        scalar DateTime
        enum Color { RED GREEN }
        input Filter { color: Color first: Int! }
        type Item { id: ID! tags: [String!]! added_at: DateTime }
        type Query { items(filter: Filter): [Item!]! }
    "#;

    const OPERATIONS: &str =
        "query ListItems($filter: Filter) { items(filter: $filter) { id tags } }";

    fn generate() -> String {
        let schema = parse_schema::<String>(SCHEMA).unwrap();
        let docs = vec![parse_query::<String>(OPERATIONS).unwrap()];
        let generator = Generator::new(&schema, Config::new()).unwrap();
        generator.generate(&docs).unwrap()
    }

    #[test]
    fn test_header_and_default_package() {
        let out = generate();
        assert!(out.starts_with("// Code generated by gqlgo. DO NOT EDIT.\n\npackage graphql\n"));
    }

    #[test]
    fn test_custom_package_name() {
        let schema = parse_schema::<String>(SCHEMA).unwrap();
        let generator = Generator::new(&schema, Config::new().with_package("api")).unwrap();
        let out = generator.generate(&[]).unwrap();
        assert!(out.contains("package api\n"));
    }

    #[test]
    fn test_invalid_package_name_is_rejected() {
        let schema = parse_schema::<String>(SCHEMA).unwrap();
        let err = Generator::new(&schema, Config::new().with_package("2fast"));
        assert!(err.is_err());
    }

    #[test]
    fn test_sections_in_order() {
        let out = generate();
        let operation = out.find("// ---- operation ListItems ----").unwrap();
        let scalars = out.find("// ---- scalars ----").unwrap();
        let enums = out.find("// ---- enums ----").unwrap();
        let inputs = out.find("// ---- inputs ----").unwrap();
        let objects = out.find("// ---- objects ----").unwrap();
        assert!(operation < scalars);
        assert!(scalars < enums);
        assert!(enums < inputs);
        assert!(inputs < objects);
    }

    #[test]
    fn test_scalar_declarations() {
        let out = generate();
        assert!(out.contains("type Int int64\n"));
        assert!(out.contains("type Float float64\n"));
        assert!(out.contains("type Boolean bool\n"));
        assert!(out.contains("type String string\n"));
        assert!(out.contains("type ID string\n"));
        assert!(out.contains("type DateTime string\n"));
    }

    #[test]
    fn test_enum_declaration_with_consts() {
        let out = generate();
        assert!(out.contains("type Color string\n"));
        assert!(out.contains("\tColorRED Color = \"RED\"\n"));
        assert!(out.contains("\tColorGREEN Color = \"GREEN\"\n"));
    }

    #[test]
    fn test_input_and_object_structs() {
        let out = generate();
        assert!(out.contains("type Filter struct {\n"));
        assert!(out.contains("\tColor *Color `json:\"color,omitempty\"`\n"));
        assert!(out.contains("\tFirst Int `json:\"first\"`\n"));
        assert!(out.contains("type Item struct {\n"));
        assert!(out.contains("\tID ID `json:\"id\"`\n"));
        assert!(out.contains("\tTags []String `json:\"tags\"`\n"));
        assert!(out.contains("\tAddedAt *DateTime `json:\"added_at,omitempty\"`\n"));
        // root object types are emitted like any other object
        assert!(out.contains("type Query struct {\n"));
    }

    #[test]
    fn test_operation_block_contents() {
        let out = generate();
        assert!(out.contains("type ListItemsVariables struct {\n"));
        assert!(out.contains("\tFilter *Filter `json:\"filter,omitempty\"`\n"));
        assert!(out.contains("type ListItemsResponse struct {\n"));
        assert!(out.contains("\tItems []struct {\n"));
        // leaves are opaque strings regardless of schema type
        assert!(out.contains("\t\tID string `json:\"id\"`\n"));
        assert!(out.contains("\t\tTags string `json:\"tags\"`\n"));
        assert!(out.contains("func ListItems(ctx context.Context"));
    }

    #[test]
    fn test_generation_is_idempotent() {
        let schema = parse_schema::<String>(SCHEMA).unwrap();
        let docs = vec![parse_query::<String>(OPERATIONS).unwrap()];
        let generator = Generator::new(&schema, Config::new()).unwrap();
        let first = generator.generate(&docs).unwrap();
        let second = generator.generate(&docs).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_braces_balance_across_the_blob() {
        let out = generate();
        assert_eq!(out.matches('{').count(), out.matches('}').count());
    }

    #[test]
    fn test_schema_only_generation() {
        let schema = parse_schema::<String>(SCHEMA).unwrap();
        let generator = Generator::new(&schema, Config::new()).unwrap();
        let out = generator.generate(&[]).unwrap();
        assert!(!out.contains("// ---- operation"));
        assert!(out.contains("// ---- objects ----"));
    }
}
