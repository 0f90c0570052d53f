//! botwire CLI - inspect the Bot API registry and run the wire codec
//!
//! Commands:
//!   botwire classify <annotation>        - Classify a type annotation
//!   botwire describe <Record|method>     - Show a record or method definition
//!   botwire list                         - List records and methods
//!   botwire decode --type <desc> [FILE]  - Decode a response body
//!   botwire encode --record <Name> [FILE]- Normalize a record to wire JSON
//!   botwire call <method> --arg k=v      - Call the Bot API (BOTWIRE_TOKEN)

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;
use tracing_subscriber::EnvFilter;

use botwire::codec::rename_from_on_ingress;
use botwire::descriptor::sanitize;
use botwire::registry::{FieldDef, Registry};
use botwire::{handle_response, to_typed_value, to_wire_payload, to_wire_string, TypeDesc, Value};

#[derive(Parser)]
#[command(name = "botwire")]
#[command(about = "Schema-driven Telegram Bot API codec", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a type annotation and print its canonical form
    Classify {
        /// Annotation, e.g. "typing.Optional[List[PhotoSize]]"
        annotation: String,
    },

    /// Show the fields of a record or the signature of a method
    Describe {
        /// Record or method name
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the records and methods in the registry
    List {
        /// Only methods
        #[arg(long, conflicts_with = "records")]
        methods: bool,

        /// Only records
        #[arg(long)]
        records: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a response body (enveloped or bare) as the given type
    Decode {
        /// Type descriptor, e.g. "List[Update]"
        #[arg(long = "type", short)]
        ty: String,

        /// Input file, or - for stdin
        input: Option<PathBuf>,
    },

    /// Decode a JSON object as a record and re-encode it for the wire
    Encode {
        /// Record name
        #[arg(long, short)]
        record: String,

        /// Input file, or - for stdin
        input: Option<PathBuf>,
    },

    /// Call a Bot API method using BOTWIRE_TOKEN
    #[cfg(feature = "http")]
    Call {
        /// Method name, camelCase or snake_case
        method: String,

        /// Argument as name=value; the value is parsed as JSON, else taken as a string
        #[arg(long = "arg", short = 'a')]
        args: Vec<String>,

        /// File upload as name=path
        #[arg(long = "file", short = 'f')]
        files: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = Registry::bot_api().context("failed to load the Bot API registry")?;

    match cli.command {
        Commands::Classify { annotation } => classify_command(&annotation),
        Commands::Describe { name, json } => describe_command(registry, &name, json),
        Commands::List {
            methods,
            records,
            json,
        } => list_command(registry, methods, records, json),
        Commands::Decode { ty, input } => decode_command(registry, &ty, input.as_deref()),
        Commands::Encode { record, input } => encode_command(registry, &record, input.as_deref()),
        #[cfg(feature = "http")]
        Commands::Call {
            method,
            args,
            files,
        } => call_command(registry, &method, &args, &files),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn classify_command(annotation: &str) -> Result<()> {
    let clean = sanitize(annotation);
    let desc = TypeDesc::classify(&clean)?;
    println!("{}: {}", desc.shape(), desc);
    Ok(())
}

fn describe_command(registry: &Registry, name: &str, json: bool) -> Result<()> {
    if let Some(record) = registry.record(name) {
        if json {
            println!("{}", serde_json::to_string_pretty(record)?);
            return Ok(());
        }
        let scalar = if record.is_scalar() { " (scalar)" } else { "" };
        println!("record {}{}", record.name, scalar);
        print_fields(&record.fields, "  ");
        return Ok(());
    }

    let method = registry
        .method(name)
        .or_else(|_| registry.method(&botwire::wire_method_name(name)))
        .map_err(|_| anyhow!("no record or method named `{name}`"))?;
    if json {
        println!("{}", serde_json::to_string_pretty(method)?);
        return Ok(());
    }
    println!("method {} -> {}", method.name, method.returns);
    print_fields(&method.params, "  ");
    Ok(())
}

fn print_fields(fields: &[FieldDef], indent: &str) {
    let width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    for field in fields {
        println!("{indent}{:width$}  {}", field.name, field.ty);
    }
}

fn list_command(registry: &Registry, methods: bool, records: bool, json: bool) -> Result<()> {
    let show_records = records || !methods;
    let show_methods = methods || !records;

    let record_names: Vec<&str> = if show_records {
        registry.records().iter().map(|r| r.name.as_str()).collect()
    } else {
        Vec::new()
    };
    let method_names: Vec<&str> = if show_methods {
        registry.methods().iter().map(|m| m.name.as_str()).collect()
    } else {
        Vec::new()
    };

    if json {
        let out = serde_json::json!({
            "records": record_names,
            "methods": method_names,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if show_records {
        println!("records ({}):", record_names.len());
        for name in &record_names {
            println!("  {name}");
        }
    }
    if show_methods {
        println!("methods ({}):", method_names.len());
        for name in &method_names {
            println!("  {name}");
        }
    }
    Ok(())
}

fn decode_command(registry: &Registry, ty: &str, input: Option<&Path>) -> Result<()> {
    let desc = TypeDesc::classify(&sanitize(ty))?;
    let body = read_input(input)?;
    let decoded = handle_response(registry, &body, &desc)?;
    print_value(registry, decoded.as_ref())
}

fn encode_command(registry: &Registry, record: &str, input: Option<&Path>) -> Result<()> {
    let body = read_input(input)?;
    let json: JsonValue = serde_json::from_str(&body).context("input is not valid JSON")?;
    let json = rename_from_on_ingress(json);
    let decoded = to_typed_value(registry, &json, &TypeDesc::record(record))?
        .ok_or_else(|| anyhow!("input is not a JSON object"))?;
    println!("{}", to_wire_string(registry, &decoded)?);
    Ok(())
}

#[cfg(feature = "http")]
fn call_command(registry: &Registry, method: &str, args: &[String], files: &[String]) -> Result<()> {
    use botwire::{Api, Arguments, ClientConfig, HttpTransport, InputFile};

    let mut arguments = Arguments::new();
    for arg in args {
        let (name, raw) = split_pair(arg)?;
        let value = serde_json::from_str::<JsonValue>(raw)
            .unwrap_or_else(|_| JsonValue::String(raw.to_string()));
        arguments = arguments.json(name, value);
    }
    for file in files {
        let (name, path) = split_pair(file)?;
        let upload =
            InputFile::from_path(path).with_context(|| format!("failed to read {path}"))?;
        arguments = arguments.upload(name, upload);
    }

    let config = ClientConfig::from_env()?;
    let transport = HttpTransport::new(&config)?;
    let api = Api::with_registry(config, registry, transport);

    let result = api.call(method, arguments)?;
    print_value(registry, result.as_ref())
}

#[cfg(feature = "http")]
fn split_pair(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => anyhow::bail!("expected name=value, got `{raw}`"),
    }
}

fn print_value(registry: &Registry, value: Option<&Value>) -> Result<()> {
    let json = match value {
        Some(value) => to_wire_payload(registry, value)?,
        None => JsonValue::Null,
    };
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}
