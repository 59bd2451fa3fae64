use anyhow::{Context, Result};
use clap::Parser;
use getmyancestors::{gedcom, Config, Depth, FsSession, Resolver, TreeBuilder};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "getmyancestors")]
#[command(about = "Retrieve GEDCOM data from the FamilySearch Family Tree")]
struct Args {
    /// FamilySearch username (falls back to the configured env var)
    #[arg(short = 'u', value_name = "STR")]
    username: Option<String>,

    /// FamilySearch password (falls back to the configured env var)
    #[arg(short = 'p', value_name = "STR")]
    password: Option<String>,

    /// FamilySearch developer key
    #[arg(short = 'k', value_name = "STR")]
    key: Option<String>,

    /// Comma separated list of FamilySearch IDs to start from [logged-in user]
    #[arg(short = 'i', value_name = "STR", value_delimiter = ',')]
    individuals: Vec<String>,

    /// Number of generations to ascend [4]
    #[arg(short = 'a', value_name = "INT")]
    ascend: Option<usize>,

    /// Number of generations to descend [1]
    #[arg(short = 'd', value_name = "INT")]
    descend: Option<usize>,

    /// Output GEDCOM file [stdout]
    #[arg(short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log file [stderr]
    #[arg(short = 'l', value_name = "FILE")]
    log: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn init_logger(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "info,getmyancestors=debug"
    } else {
        "info"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Open the GEDCOM sink up front so a bad `-o` path fails before any fetching
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file: {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log.as_deref(), args.verbose)?;

    let config = Config::load()?;
    let mut out = open_output(args.output.as_deref())?;

    let username = args
        .username
        .clone()
        .or_else(|| config.username_from_env())
        .with_context(|| {
            format!(
                "No username given. Pass -u or set {}",
                config.familysearch.username_env
            )
        })?;
    let password = args
        .password
        .clone()
        .or_else(|| config.password_from_env())
        .with_context(|| {
            format!(
                "No password given. Pass -p or set {}",
                config.familysearch.password_env
            )
        })?;
    let key = args
        .key
        .clone()
        .unwrap_or_else(|| config.familysearch.developer_key.clone());

    let session = FsSession::login(&config, &key, &username, &password).await?;
    let resolver = Resolver::new(session, &config.familysearch.platform_url);

    let roots: Vec<String> = if args.individuals.is_empty() {
        vec![resolver.current_user_id().await?]
    } else {
        args.individuals
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect()
    };
    if roots.is_empty() {
        anyhow::bail!("-i must name at least one FamilySearch ID");
    }

    let depth = Depth {
        ascend: args.ascend.unwrap_or(config.traversal.ascend),
        descend: args.descend.unwrap_or(config.traversal.descend),
    };
    log::info!(
        "Starting from {} (ascend {}, descend {})",
        roots.join(","),
        depth.ascend,
        depth.descend
    );

    let start = Instant::now();
    let mut tree = TreeBuilder::new(resolver).build(&roots, depth).await;
    tree.renumber();

    gedcom::render(&tree, &mut out)?;
    out.flush()?;

    log::info!(
        "Wrote {} individuals and {} families in {:.1}s",
        tree.person_count(),
        tree.union_count(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
