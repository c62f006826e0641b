use clap::{Parser, Subcommand};
use interop_docs::config::{self, DocsConfig};
use interop_docs::error::DocsError;
use interop_docs::nav::{self, NavOptions};
use interop_docs::toolchain::CliToolchain;
use interop_docs::{dotnet, js, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "interop-docs")]
#[command(about = "API reference generator for the JS/.NET interop library")]
#[command(long_about = "\
API reference generator for the JS/.NET interop library

Drives the TypeScript declaration extractor and the .NET XML-doc converter,
then post-processes their output for the VitePress site.

Output layout (defaults):

  docs/
  ├── reference/
  │   ├── js-api.md                # JavaScript API page
  │   └── dotnet/
  │       ├── index.md             # Combined .NET index
  │       ├── Interop.Runtime.md   # Per-assembly page (namespace summaries)
  │       └── Interop.Runtime/     # Namespace, type and member pages
  └── .vitepress/
      └── dotnet-nav.mjs           # Sidebar data module

Run 'interop-docs gen-config' to generate a documented interop-docs.toml.")]
#[command(version)]
struct Cli {
    /// Repository root; all configured paths are relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file, relative to the root (optional)
    #[arg(long, default_value = "interop-docs.toml", global = true)]
    config: PathBuf,

    /// Log debug events, including every external command line
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the JavaScript API page
    Js,
    /// Build, convert and post-process the .NET API reference
    Dotnet,
    /// Run both pipelines: js → dotnet
    All,
    /// Rebuild the sidebar navigation from existing .NET output
    Nav,
    /// Print a stock interop-docs.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

fn run(cli: &Cli) -> Result<(), DocsError> {
    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let root = &cli.root;
    let config = config::load_config(&root.join(&cli.config))?;
    tracing::debug!(root = %root.display(), "loaded config");
    let toolchain = CliToolchain::new(&config.tools, root);

    match cli.command {
        Command::Js => run_js(&toolchain, root, &config)?,
        Command::Dotnet => run_dotnet(&toolchain, root, &config)?,
        Command::All => {
            println!("==> JavaScript API");
            run_js(&toolchain, root, &config)?;
            println!("==> .NET API");
            run_dotnet(&toolchain, root, &config)?;
        }
        Command::Nav => {
            let dotnet = &config.dotnet;
            let items = nav::build_nav(
                &root.join(&dotnet.output_dir),
                &NavOptions {
                    site_base: dotnet.site_base.clone(),
                    index_file: dotnet.index_file.clone(),
                },
            )?;
            let nav_file = root.join(&dotnet.nav_file);
            nav::write_nav(&nav_file, &items)?;
            output::print_nav_tree(&items);
            println!("Navigation \u{2192} {}", nav_file.display());
        }
        // Printed before any config is loaded.
        Command::GenConfig => {}
    }
    Ok(())
}

fn run_js(toolchain: &CliToolchain, root: &Path, config: &DocsConfig) -> Result<(), DocsError> {
    let report = js::run_js_docs(toolchain, root, &config.js)?;
    output::print_js_output(&report, &config.js.title, root);
    Ok(())
}

fn run_dotnet(toolchain: &CliToolchain, root: &Path, config: &DocsConfig) -> Result<(), DocsError> {
    init_thread_pool(&config.tools);
    let report = dotnet::run_dotnet_docs(toolchain, root, config)?;
    output::print_dotnet_output(&report, root);
    if tracing::enabled!(tracing::Level::DEBUG) {
        output::print_nav_tree(&report.nav);
    }
    Ok(())
}

/// `--verbose` forces debug; otherwise `RUST_LOG`, falling back to `info`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool that runs conversions.
///
/// Caps at the number of available CPU cores; config can constrain down, not up.
fn init_thread_pool(tools: &config::ToolsConfig) {
    let threads = config::effective_threads(tools);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
