//! operation struct synthesizer
//!
//! walks each named query/mutation in the document set and produces its
//! `<Name>Variables` type (flat, from the declared variables) and its
//! `<Name>Response` type (nested, mirroring the selection tree exactly).
//!
//! the selection walk keeps an explicit stack of frames instead of
//! enter/leave visitor hooks: a `Select` frame carries the typed position
//! (the schema type the selection resolves against) and a `Close` frame
//! marks a pending composite. brace balancing is tracked by the emitter so
//! the invariant stays independently testable.

use crate::catalog::TypeCatalog;
use crate::error::{Error, Result};
use crate::fields::resolve_field;
use crate::naming::export_name;
use graphql_parser::query::{
    Definition, Document, FragmentDefinition, OperationDefinition, Selection, SelectionSet, Type,
    TypeCondition, VariableDefinition,
};
use std::collections::{BTreeMap, BTreeSet};

/// everything synthesized for one named operation
#[derive(Debug, Clone)]
pub struct OperationBlock {
    /// normalized operation name
    pub name: String,
    /// rendered variables type, absent when no variables are declared
    pub variables: Option<String>,
    /// rendered response type
    pub response: String,
    /// printed operation text plus every fragment it references
    pub source: String,
}

impl OperationBlock {
    /// true if the operation declares variables
    pub fn has_variables(&self) -> bool {
        self.variables.is_some()
    }
}

/// synthesizes operation types against a schema catalog.
///
/// fragments are collected across the whole document set so operations may
/// spread fragments defined in other documents.
pub struct OperationSynthesizer<'a, 'sc, 'qc> {
    catalog: &'a TypeCatalog<'sc>,
    fragments: BTreeMap<&'a str, &'a FragmentDefinition<'qc, String>>,
}

enum Frame<'p, 'qc> {
    Select {
        selection: &'p Selection<'qc, String>,
        parent: &'p str,
    },
    Close {
        json_key: &'p str,
    },
}

impl<'a, 'sc, 'qc> OperationSynthesizer<'a, 'sc, 'qc> {
    /// collect fragments from every document and bind the catalog
    pub fn new(catalog: &'a TypeCatalog<'sc>, documents: &'a [Document<'qc, String>]) -> Self {
        let mut fragments = BTreeMap::new();
        for doc in documents {
            for def in &doc.definitions {
                if let Definition::Fragment(fragment) = def {
                    fragments.insert(fragment.name.as_str(), fragment);
                }
            }
        }
        Self { catalog, fragments }
    }

    /// synthesize every named, non-subscription operation in document order
    pub fn synthesize_all<'b>(
        &self,
        documents: &'b [Document<'qc, String>],
    ) -> Result<Vec<OperationBlock>> {
        let mut blocks = Vec::new();
        for doc in documents {
            for def in &doc.definitions {
                if let Definition::Operation(operation) = def {
                    if let Some(block) = self.synthesize(operation)? {
                        blocks.push(block);
                    }
                }
            }
        }
        Ok(blocks)
    }

    /// synthesize one operation; anonymous operations and subscriptions
    /// yield `None`
    pub fn synthesize(
        &self,
        operation: &OperationDefinition<'qc, String>,
    ) -> Result<Option<OperationBlock>> {
        let (name, root, variable_definitions, selection_set) = match operation {
            OperationDefinition::Query(query) => match &query.name {
                Some(name) => (
                    name,
                    self.catalog.query_type(),
                    &query.variable_definitions,
                    &query.selection_set,
                ),
                None => return Ok(None),
            },
            OperationDefinition::Mutation(mutation) => match &mutation.name {
                Some(name) => (
                    name,
                    self.catalog.mutation_type(),
                    &mutation.variable_definitions,
                    &mutation.selection_set,
                ),
                None => return Ok(None),
            },
            OperationDefinition::SelectionSet(_) | OperationDefinition::Subscription(_) => {
                return Ok(None)
            }
        };

        let name = export_name(name);
        let variables = self.variables_struct(&name, variable_definitions)?;
        let response = self.response_struct(&name, root, selection_set)?;
        let source = self.operation_source(operation, selection_set)?;
        Ok(Some(OperationBlock {
            name,
            variables,
            response,
            source,
        }))
    }

    fn variables_struct(
        &self,
        name: &str,
        definitions: &[VariableDefinition<'qc, String>],
    ) -> Result<Option<String>> {
        if definitions.is_empty() {
            return Ok(None);
        }
        let mut out = format!("type {name}Variables struct {{\n");
        for def in definitions {
            let decl = resolve_field(&def.var_type, &def.name, self.catalog)?;
            out.push_str(&format!(
                "\t{} {} {}\n",
                decl.target_name,
                decl.rendering,
                decl.json_tag()
            ));
        }
        out.push_str("}\n");
        Ok(Some(out))
    }

    fn response_struct<'p>(
        &self,
        name: &str,
        root: &'p str,
        selection_set: &'p SelectionSet<'qc, String>,
    ) -> Result<String>
    where
        'a: 'p,
        'sc: 'p,
    {
        if self.catalog.object(root).is_none() {
            return Err(Error::UnknownType {
                type_name: root.to_string(),
                field_name: name.to_string(),
            });
        }

        let mut emitter = StructEmitter::new(&format!("{name}Response"));
        let mut stack: Vec<Frame<'p, 'qc>> = Vec::new();
        push_selections(&mut stack, selection_set, root);

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Close { json_key } => emitter.close_composite(json_key),
                Frame::Select { selection, parent } => match selection {
                    Selection::Field(field) => {
                        let key = field.alias.as_deref().unwrap_or(field.name.as_str());
                        if field.selection_set.items.is_empty() {
                            // leaf fields stay an opaque string; precise
                            // scalar typing is left to the caller
                            emitter.leaf(&export_name(key), "string", key);
                            continue;
                        }
                        let field_type = self
                            .catalog
                            .field_type(parent, &field.name)
                            .ok_or_else(|| Error::UnknownField {
                                type_name: parent.to_string(),
                                field_name: field.name.clone(),
                            })?;
                        let base = base_type_name(field_type);
                        if self.catalog.object(base).is_none() {
                            return Err(Error::InvalidSelection {
                                type_name: base.to_string(),
                                field_name: field.name.clone(),
                            });
                        }
                        let (is_list, non_null) = list_shape(field_type);
                        emitter.open_composite(&export_name(key), is_list, non_null);
                        stack.push(Frame::Close { json_key: key });
                        push_selections(&mut stack, &field.selection_set, base);
                    }
                    Selection::FragmentSpread(spread) => {
                        let fragment = self.fragment(&spread.fragment_name)?;
                        let TypeCondition::On(condition) = &fragment.type_condition;
                        push_selections(&mut stack, &fragment.selection_set, condition);
                    }
                    Selection::InlineFragment(inline) => {
                        let target = match &inline.type_condition {
                            Some(TypeCondition::On(condition)) => condition.as_str(),
                            None => parent,
                        };
                        push_selections(&mut stack, &inline.selection_set, target);
                    }
                },
            }
        }

        emitter.finish(name)
    }

    fn operation_source(
        &self,
        operation: &OperationDefinition<'qc, String>,
        selection_set: &SelectionSet<'qc, String>,
    ) -> Result<String> {
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        self.collect_fragments(selection_set, &mut seen, &mut ordered)?;

        // print through a single-operation document so the request text is
        // self-contained, fragments included
        let mut printed = Document {
            definitions: vec![Definition::Operation(operation.clone())],
        };
        for fragment in ordered {
            printed
                .definitions
                .push(Definition::Fragment(fragment.clone()));
        }
        Ok(printed.to_string().trim_end().to_string())
    }

    fn collect_fragments(
        &self,
        set: &SelectionSet<'qc, String>,
        seen: &mut BTreeSet<&'a str>,
        ordered: &mut Vec<&'a FragmentDefinition<'qc, String>>,
    ) -> Result<()> {
        for selection in &set.items {
            match selection {
                Selection::Field(field) => {
                    self.collect_fragments(&field.selection_set, seen, ordered)?
                }
                Selection::FragmentSpread(spread) => {
                    let fragment = self.fragment(&spread.fragment_name)?;
                    if seen.insert(fragment.name.as_str()) {
                        ordered.push(fragment);
                        self.collect_fragments(&fragment.selection_set, seen, ordered)?;
                    }
                }
                Selection::InlineFragment(inline) => {
                    self.collect_fragments(&inline.selection_set, seen, ordered)?
                }
            }
        }
        Ok(())
    }

    fn fragment(&self, name: &str) -> Result<&'a FragmentDefinition<'qc, String>> {
        self.fragments
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownFragment {
                name: name.to_string(),
            })
    }
}

fn push_selections<'p, 'qc>(
    stack: &mut Vec<Frame<'p, 'qc>>,
    set: &'p SelectionSet<'qc, String>,
    parent: &'p str,
) {
    for selection in set.items.iter().rev() {
        stack.push(Frame::Select { selection, parent });
    }
}

/// list-shape decision for a composite field: does the output type start
/// with a list marker, and is the outermost wrapper non-null
fn list_shape(ty: &Type<'_, String>) -> (bool, bool) {
    match ty {
        Type::NonNullType(inner) => (matches!(inner.as_ref(), Type::ListType(_)), true),
        Type::ListType(_) => (true, false),
        Type::NamedType(_) => (false, false),
    }
}

fn base_type_name<'a>(ty: &'a Type<'a, String>) -> &'a str {
    match ty {
        Type::NamedType(name) => name.as_str(),
        Type::NonNullType(inner) | Type::ListType(inner) => base_type_name(inner),
    }
}

/// emits one `type ... struct` block while tracking composite depth
pub(crate) struct StructEmitter {
    buf: String,
    depth: usize,
}

impl StructEmitter {
    pub(crate) fn new(type_name: &str) -> Self {
        Self {
            buf: format!("type {type_name} struct {{\n"),
            depth: 1,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.buf.push('\t');
        }
    }

    pub(crate) fn leaf(&mut self, go_name: &str, go_type: &str, json_key: &str) {
        self.indent();
        self.buf
            .push_str(&format!("{go_name} {go_type} `json:\"{json_key}\"`\n"));
    }

    pub(crate) fn open_composite(&mut self, go_name: &str, is_list: bool, non_null: bool) {
        let marker = match (is_list, non_null) {
            (true, true) => "[]struct",
            (true, false) => "*[]struct",
            (false, true) => "struct",
            (false, false) => "*struct",
        };
        self.indent();
        self.buf.push_str(&format!("{go_name} {marker} {{\n"));
        self.depth += 1;
    }

    pub(crate) fn close_composite(&mut self, json_key: &str) {
        self.depth -= 1;
        self.indent();
        self.buf.push_str(&format!("}} `json:\"{json_key}\"`\n"));
    }

    pub(crate) fn finish(mut self, operation: &str) -> Result<String> {
        if self.depth() != 1 {
            return Err(Error::Unbalanced {
                operation: operation.to_string(),
            });
        }
        self.buf.push_str("}\n");
        Ok(self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_parser::{parse_query, parse_schema};

    const SCHEMA: &str = r#"
        type Post { title: String! }
        type User {
            id: ID!
            name: String!
            posts: [Post!]!
            friends: [User]
            mentor: User!
        }
        type Query { getUser(id: ID!): User }
        type Mutation { touchUser(id: ID!): User! }
    "#;

    fn blocks(operations: &str) -> Vec<OperationBlock> {
        let schema = parse_schema::<String>(SCHEMA).unwrap();
        let catalog = TypeCatalog::new(&schema);
        let docs = vec![parse_query::<String>(operations).unwrap()];
        let synthesizer = OperationSynthesizer::new(&catalog, &docs);
        synthesizer.synthesize_all(&docs).unwrap()
    }

    #[test]
    fn test_get_user_shape() {
        let blocks =
            blocks("query GetUser($id: ID!) { getUser(id: $id) { name posts { title } } }");
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.name, "GetUser");

        let variables = block.variables.as_deref().unwrap();
        assert_eq!(
            variables,
            "type GetUserVariables struct {\n\tID ID `json:\"id\"`\n}\n"
        );

        let expected = concat!(
            "type GetUserResponse struct {\n",
            "\tGetUser *struct {\n",
            "\t\tName string `json:\"name\"`\n",
            "\t\tPosts []struct {\n",
            "\t\t\tTitle string `json:\"title\"`\n",
            "\t\t} `json:\"posts\"`\n",
            "\t} `json:\"getUser\"`\n",
            "}\n",
        );
        assert_eq!(block.response, expected);
    }

    #[test]
    fn test_composite_markers_follow_output_type() {
        let blocks = blocks(
            "query Shapes { getUser(id: \"1\") { friends { name } mentor { name } posts { title } } }",
        );
        let response = &blocks[0].response;
        assert!(response.contains("Friends *[]struct {"));
        assert!(response.contains("Mentor struct {"));
        assert!(response.contains("Posts []struct {"));
    }

    #[test]
    fn test_variables_in_declaration_order() {
        let blocks = blocks(
            "query Two($first: Int, $after: String!) { getUser(id: \"1\") { name } }",
        );
        let variables = blocks[0].variables.as_deref().unwrap();
        let first = variables.find("First *Int `json:\"first,omitempty\"`").unwrap();
        let after = variables.find("After String `json:\"after\"`").unwrap();
        assert!(first < after);
    }

    #[test]
    fn test_no_variables_no_type() {
        let blocks = blocks("query Plain { getUser(id: \"1\") { name } }");
        assert!(blocks[0].variables.is_none());
        assert!(!blocks[0].has_variables());
    }

    #[test]
    fn test_anonymous_and_subscription_are_skipped() {
        let blocks = blocks(
            "query { getUser(id: \"1\") { name } }\n\
             subscription Watch { getUser(id: \"1\") { name } }\n\
             query Named { getUser(id: \"1\") { name } }",
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "Named");
    }

    #[test]
    fn test_mutation_resolves_against_mutation_root() {
        let blocks = blocks("mutation Touch($id: ID!) { touchUser(id: $id) { name } }");
        assert_eq!(blocks[0].name, "Touch");
        // touchUser returns User!, a bare composite
        assert!(blocks[0].response.contains("TouchUser struct {"));
    }

    #[test]
    fn test_fragment_spread_is_spliced() {
        let blocks = blocks(
            "query WithFragment { getUser(id: \"1\") { ...Parts } }\n\
             fragment Parts on User { name posts { title } }",
        );
        let block = &blocks[0];
        assert!(block.response.contains("Name string `json:\"name\"`"));
        assert!(block.response.contains("Posts []struct {"));
        // the printed source carries the fragment definition
        assert!(block.source.contains("fragment Parts on User"));
        assert!(block.source.starts_with("query WithFragment"));
    }

    #[test]
    fn test_alias_names_the_emitted_field() {
        let blocks = blocks("query Aliased { u: getUser(id: \"1\") { n: name } }");
        let response = &blocks[0].response;
        assert!(response.contains("U *struct {"));
        assert!(response.contains("N string `json:\"n\"`"));
        assert!(response.contains("} `json:\"u\"`"));
    }

    #[test]
    fn test_unknown_field_fails_with_names() {
        let schema = parse_schema::<String>(SCHEMA).unwrap();
        let catalog = TypeCatalog::new(&schema);
        let docs =
            vec![parse_query::<String>("query Bad { getUser(id: \"1\") { nope { x } } }").unwrap()];
        let synthesizer = OperationSynthesizer::new(&catalog, &docs);
        let err = synthesizer.synthesize_all(&docs).unwrap_err();
        match err {
            Error::UnknownField {
                type_name,
                field_name,
            } => {
                assert_eq!(type_name, "User");
                assert_eq!(field_name, "nope");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_fragment_fails_with_name() {
        let blocks_err = {
            let schema = parse_schema::<String>(SCHEMA).unwrap();
            let catalog = TypeCatalog::new(&schema);
            let docs = vec![
                parse_query::<String>("query Bad { getUser(id: \"1\") { ...Missing } }").unwrap(),
            ];
            let synthesizer = OperationSynthesizer::new(&catalog, &docs);
            synthesizer.synthesize_all(&docs).unwrap_err()
        };
        assert!(matches!(blocks_err, Error::UnknownFragment { name } if name == "Missing"));
    }

    #[test]
    fn test_emitter_tracks_depth_and_balances() {
        let mut emitter = StructEmitter::new("DemoResponse");
        assert_eq!(emitter.depth(), 1);
        emitter.open_composite("Outer", false, true);
        assert_eq!(emitter.depth(), 2);
        emitter.leaf("Name", "string", "name");
        emitter.close_composite("outer");
        assert_eq!(emitter.depth(), 1);
        let out = emitter.finish("Demo").unwrap();
        assert_eq!(out.matches('{').count(), out.matches('}').count());
    }

    #[test]
    fn test_emitter_reports_unclosed_composite() {
        let mut emitter = StructEmitter::new("DemoResponse");
        emitter.open_composite("Outer", false, true);
        let err = emitter.finish("Demo").unwrap_err();
        assert!(matches!(err, Error::Unbalanced { operation } if operation == "Demo"));
    }

    #[test]
    fn test_nesting_depth_matches_selection_depth() {
        let blocks = blocks(
            "query Deep { getUser(id: \"1\") { friends { friends { friends { name } } } } }",
        );
        let response = &blocks[0].response;
        // three nested composites under the root field
        assert_eq!(response.matches("*[]struct {").count(), 3);
        assert_eq!(response.matches('{').count(), response.matches('}').count());
    }
}
