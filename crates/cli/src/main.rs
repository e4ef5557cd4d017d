use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use grantdesk_contexts::{ContextRecord, ContextRepository};
use grantdesk_criteria::{default_criteria, load_default_criteria, CriteriaConfig};
use std::io::Read;
use std::path::PathBuf;

const WORKSPACE_KEY_ENV: &str = "GRANTDESK_WORKSPACE_KEY";
const CRITERIA_FILE_ENV: &str = "GRANTDESK_CRITERIA_FILE";

#[derive(Parser)]
#[command(name = "grantdesk")]
#[command(about = "Workspace-isolated company context store", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Storage directory for tenant documents (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Workspace key; may also be set via GRANTDESK_WORKSPACE_KEY
    #[arg(long, global = true)]
    workspace_key: Option<String>,

    /// External criteria defaults document used to seed new records; may
    /// also be set via GRANTDESK_CRITERIA_FILE
    #[arg(long, global = true)]
    criteria_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List context names in the workspace
    List,

    /// Print one context as JSON
    Show { name: String },

    /// Print a fresh default-populated context record as JSON
    New,

    /// Create or replace a context from a JSON record
    Save(SaveArgs),

    /// Delete a context (no error if the name does not exist)
    Delete { name: String },

    /// Export one context as pretty-printed JSON
    Export(ExportArgs),

    /// Import a context from a JSON document
    Import(ImportArgs),
}

#[derive(Args)]
struct SaveArgs {
    /// Name to store the record under
    name: String,

    /// Inline JSON record (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to a file containing the JSON record; stdin when neither is given
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Args)]
struct ExportArgs {
    /// Name of the context to export
    name: String,

    /// Write to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct ImportArgs {
    /// Inline JSON document (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to a file containing the JSON document; stdin when neither is given
    #[arg(long)]
    file: Option<PathBuf>,

    /// Store under this name instead of the document's company_name
    #[arg(long)]
    name: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let repo = ContextRepository::new(data_dir(cli.data_dir)?);
    let key_flag = cli.workspace_key;

    // `new` is a pure constructor and runs keyless; every other command
    // operates on one workspace, so those arms resolve the key first.
    match cli.command {
        Commands::New => {
            let record = ContextRecord::with_criteria(seed_criteria(cli.criteria_file)?);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::List => {
            let key = workspace_key(key_flag)?;
            for name in repo.list_names(&key)? {
                println!("{name}");
            }
        }
        Commands::Show { name } => {
            let key = workspace_key(key_flag)?;
            match repo.get(&name, &key)? {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => bail!("no context named '{name}' in this workspace"),
            }
        }
        Commands::Save(args) => {
            let key = workspace_key(key_flag)?;
            let payload = read_payload(args.json, args.file)?;
            let record = serde_json::from_str(&payload)
                .context("payload is not a valid context record")?;
            repo.save(&args.name, record, &key)?;
            log::info!("saved context '{}'", args.name);
        }
        Commands::Delete { name } => {
            let key = workspace_key(key_flag)?;
            repo.delete(&name, &key)?;
            log::info!("deleted context '{name}' (if it existed)");
        }
        Commands::Export(args) => {
            let key = workspace_key(key_flag)?;
            match repo.export(&args.name, &key)? {
                Some(document) => match args.out {
                    Some(path) => {
                        std::fs::write(&path, document)
                            .with_context(|| format!("writing {}", path.display()))?;
                        log::info!("exported '{}' to {}", args.name, path.display());
                    }
                    None => println!("{document}"),
                },
                None => bail!("no context named '{}' in this workspace", args.name),
            }
        }
        Commands::Import(args) => {
            let key = workspace_key(key_flag)?;
            let payload = read_payload(args.json, args.file)?;
            if !repo.import(&payload, &key, args.name.as_deref())? {
                bail!("import failed: payload is not a valid context document");
            }
            log::info!("import succeeded");
        }
    }

    Ok(())
}

fn data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    let base = dirs::data_dir().context("no platform data directory; pass --data-dir")?;
    Ok(base.join("grantdesk").join("contexts"))
}

/// The upstream contract of the storage core: a mutating caller must hold a
/// non-empty workspace key. Enforced here so the library never sees an
/// accidental anonymous write.
fn workspace_key(flag: Option<String>) -> Result<String> {
    let key = match flag {
        Some(key) => key,
        None => std::env::var(WORKSPACE_KEY_ENV).unwrap_or_default(),
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        bail!("workspace key is required: pass --workspace-key or set {WORKSPACE_KEY_ENV}");
    }
    Ok(key)
}

/// Criteria used to seed a new record: the external defaults document when
/// one is configured (flag first, then environment), the built-in set
/// otherwise.
fn seed_criteria(flag: Option<PathBuf>) -> Result<CriteriaConfig> {
    let path = flag.or_else(|| std::env::var_os(CRITERIA_FILE_ENV).map(PathBuf::from));
    match path {
        Some(path) => load_default_criteria(&path)
            .with_context(|| format!("loading criteria defaults from {}", path.display())),
        None => Ok(default_criteria()),
    }
}

fn read_payload(json: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(json) = json {
        return Ok(json);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading payload from stdin")?;
    Ok(buf)
}
