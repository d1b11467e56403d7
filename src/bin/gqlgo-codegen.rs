//! generate a typed go graphql client from a schema and operation documents
//!
//! reads the schema from a file or an http endpoint, parses the operation
//! documents, and writes a single go source file combining per-operation
//! types, request boilerplate, and schema-derived declarations.
//!
//! command help reference (kept in sync with `gqlgo-codegen --help`):
#[doc = concat!("```text\n", include_str!("gqlgo-codegen-help.txt"), "\n```")]
pub const CLI_HELP: &str = include_str!("gqlgo-codegen-help.txt");

use gqlgo::{Config, Generator, Manifest};
use graphql_parser::query::Document;
use graphql_parser::{parse_query, parse_schema};
use reqwest::blocking::Client as BlockingClient;
use reqwest::header::{HeaderMap, HeaderValue};
use std::fs;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Default)]
struct Args {
    schema_path: Option<PathBuf>,
    url: Option<String>,
    token: Option<String>,
    package: Option<String>,
    out: Option<PathBuf>,
    config_path: Option<PathBuf>,
    queries: Vec<PathBuf>,
}

enum ParseArgsError {
    Help,
    Message(String),
}

fn main() {
    let args = match parse_args(std::env::args().collect()) {
        Ok(args) => args,
        Err(ParseArgsError::Help) => {
            print!("{CLI_HELP}");
            return;
        }
        Err(ParseArgsError::Message(err)) => {
            eprintln!("{err}\n\n{CLI_HELP}");
            std::process::exit(1);
        }
    };

    let args = match apply_manifest(args) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("failed to read config: {err}");
            std::process::exit(1);
        }
    };

    let schema_text = match load_schema(&args) {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("failed to load schema: {err}");
            std::process::exit(1);
        }
    };

    let schema = match parse_schema::<String>(&schema_text) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("failed to parse schema: {err}");
            std::process::exit(1);
        }
    };

    let documents = match load_documents(&args.queries) {
        Ok(documents) => documents,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut config = Config::new();
    if let Some(package) = &args.package {
        config = config.with_package(package.as_str());
    }

    let generator = match Generator::new(&schema, config) {
        Ok(generator) => generator,
        Err(err) => {
            eprintln!("codegen failed: {err}");
            std::process::exit(1);
        }
    };

    let code = match generator.generate(&documents) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("codegen failed: {err}");
            std::process::exit(1);
        }
    };

    match &args.out {
        Some(path) => {
            if let Err(err) = fs::write(path, code) {
                eprintln!("failed to write {}: {err}", path.display());
                std::process::exit(1);
            }
        }
        None => print!("{code}"),
    }
}

fn parse_args(args: Vec<String>) -> Result<Args, ParseArgsError> {
    let mut parsed = Args::default();

    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--schema" => parsed.schema_path = iter.next().map(PathBuf::from),
            "--url" => parsed.url = iter.next(),
            "--token" => parsed.token = iter.next(),
            "--package" => parsed.package = iter.next(),
            "--out" => parsed.out = iter.next().map(PathBuf::from),
            "--config" => parsed.config_path = iter.next().map(PathBuf::from),
            "--help" | "-h" => return Err(ParseArgsError::Help),
            _ if arg.starts_with("--") => {
                return Err(ParseArgsError::Message(format!("unknown argument: {arg}")))
            }
            _ => parsed.queries.push(PathBuf::from(arg)),
        }
    }

    Ok(parsed)
}

fn apply_manifest(mut args: Args) -> Result<Args, String> {
    let Some(config_path) = args.config_path.clone() else {
        return Ok(args);
    };

    let text = fs::read_to_string(&config_path)
        .map_err(|err| format!("failed to read {}: {err}", config_path.display()))?;
    let manifest = Manifest::from_json(&text).map_err(|err| err.to_string())?;

    if args.schema_path.is_none() {
        args.schema_path = manifest.schema.map(PathBuf::from);
    }
    if args.url.is_none() {
        args.url = manifest.url;
    }
    if args.token.is_none() {
        args.token = manifest.token;
    }
    if args.package.is_none() {
        args.package = manifest.package;
    }
    if args.out.is_none() {
        args.out = manifest.out.map(PathBuf::from);
    }
    if args.queries.is_empty() {
        args.queries = manifest.queries.into_iter().map(PathBuf::from).collect();
    }

    Ok(args)
}

fn load_schema(args: &Args) -> Result<String, String> {
    if let Some(schema_path) = &args.schema_path {
        return fs::read_to_string(schema_path)
            .map_err(|err| format!("failed to read {}: {err}", schema_path.display()));
    }

    let raw_url = args
        .url
        .as_ref()
        .ok_or_else(|| "--schema or --url is required".to_string())?;
    let schema_url =
        Url::parse(raw_url).map_err(|err| format!("invalid url {raw_url}: {err}"))?;

    let mut headers = HeaderMap::new();
    if let Some(token) = &args.token {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|err| format!("invalid token header value: {err}"))?;
        headers.insert("Authorization", value);
    }

    let client = BlockingClient::new();
    let response = client
        .get(schema_url)
        .headers(headers)
        .send()
        .map_err(|err| err.to_string())?;

    if !response.status().is_success() {
        return Err(format!("schema fetch failed: {}", response.status()));
    }

    response
        .text()
        .map_err(|err| format!("failed to read schema response: {err}"))
}

fn load_documents(paths: &[PathBuf]) -> Result<Vec<Document<'static, String>>, String> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(path)
            .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
        let doc = parse_query::<String>(&text)
            .map_err(|err| format!("failed to parse {}: {err}", path.display()))?;
        documents.push(doc.into_static());
    }
    Ok(documents)
}
