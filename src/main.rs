use clap::{Parser, Subcommand, ValueEnum};
use sitewright::ai::AiContent;
use sitewright::classify::classify_explained;
use sitewright::config::{self, ProjectConfig};
use sitewright::emit::{HtmlEmitter, JsonEmitter};
use sitewright::output::{self, PageOutcome};
use sitewright::registry::Registry;
use sitewright::site::{self, GenerateOptions};
use sitewright::types::{BusinessProfile, PageKind};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Inputs shared by every command that works on one business.
#[derive(clap::Args, Clone)]
struct ProfileArgs {
    /// Business profile (JSON)
    #[arg(long)]
    profile: PathBuf,

    /// AI-generated content for the business (JSON). Malformed parts are ignored.
    #[arg(long)]
    ai: Option<PathBuf>,
}

/// Flags that shape the generated site. Override `sitewright.toml`.
#[derive(clap::Args, Clone)]
struct SiteArgs {
    /// Project directory holding an optional sitewright.toml
    #[arg(long, default_value = ".")]
    project: PathBuf,

    /// Config file to use instead of <project>/sitewright.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use this archetype instead of classifying the business
    #[arg(long)]
    archetype: Option<String>,

    /// Pages to build, comma separated (default: the industry's page set)
    #[arg(long, value_delimiter = ',')]
    pages: Vec<String>,

    /// Dark color mode
    #[arg(long)]
    dark: bool,

    /// Medium color mode (dark wins when both are set)
    #[arg(long)]
    medium: bool,
}

/// What `build` writes for each page.
#[derive(ValueEnum, Clone, Copy, Default)]
enum OutputFormat {
    /// Standalone HTML documents
    #[default]
    Html,
    /// The page specifications as JSON
    Json,
}

#[derive(Parser)]
#[command(name = "sitewright")]
#[command(about = "Marketing sites for small businesses, from a profile and an archetype")]
#[command(long_about = "\
Marketing sites for small businesses, from a profile and an archetype

A business profile is classified into an industry and a structural archetype
(hero layout, section order, palette). Theme and copy are then resolved field
by field and every page is composed into a self-contained specification that
an emitter turns into HTML.

Copy resolution (first available wins):
  Headline:    profile heroHeadline → AI hero.headline → archetype copy → stock copy
  Subheadline: profile tagline → AI hero.subheadline → archetype copy → stock copy
  Lists:       AI items first, archetype and industry defaults pad the rest

Theme layers (later wins):
  fallback → archetype → dark/medium mode → AI colors/typography → overrides

Logging goes to stderr; set SITEWRIGHT_LOG (e.g. sitewright=debug) to tune it.

Run 'sitewright gen-config' to generate a documented sitewright.toml.")]
#[command(version)]
struct Cli {
    /// Log fallback decisions (industry lookup, classifier rules, theme keys)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the industry, family and archetype chosen for a profile
    Classify(ProfileArgs),
    /// Print the page specifications for a profile
    Spec {
        #[command(flatten)]
        input: ProfileArgs,
        #[command(flatten)]
        site: SiteArgs,
        /// Print a summary instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// Write one file per page
    Build {
        #[command(flatten)]
        input: ProfileArgs,
        #[command(flatten)]
        site: SiteArgs,
        /// Output directory
        #[arg(long, default_value = "site")]
        out: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// List the archetype catalog
    Archetypes,
    /// List known industries and their aliases
    Industries,
    /// Print a stock sitewright.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let registry = Registry::builtin()?;

    match cli.command {
        Command::Classify(input) => {
            let profile = read_profile(&input.profile)?;
            let classification = classify_explained(&registry, &profile);
            output::print_classification(&registry, &classification);
        }
        Command::Spec {
            input,
            site: site_args,
            summary,
        } => {
            let profile = read_profile(&input.profile)?;
            let options = generate_options(&input, &site_args)?;
            let plan = site::plan_site(&registry, &profile, &options)?;
            if summary {
                output::print_plan(&registry, &plan);
            } else {
                println!("{}", serde_json::to_string_pretty(&plan.pages)?);
            }
        }
        Command::Build {
            input,
            site: site_args,
            out,
            format,
        } => {
            let profile = read_profile(&input.profile)?;
            let options = generate_options(&input, &site_args)?;
            let plan = site::plan_site(&registry, &profile, &options)?;
            output::print_plan(&registry, &plan);

            println!("==> Writing {}", out.display());
            std::fs::create_dir_all(&out)?;
            let emitted = match format {
                OutputFormat::Html => site::emit_site(&plan, &HtmlEmitter),
                OutputFormat::Json => site::emit_site(&plan, &JsonEmitter),
            };
            let mut results: Vec<(PageKind, PageOutcome)> = Vec::new();
            for page in emitted.emitted {
                let path = out.join(&page.file_name);
                let outcome = match std::fs::write(&path, &page.source) {
                    Ok(()) => PageOutcome::Written(path),
                    Err(err) => PageOutcome::WriteFailed(err),
                };
                results.push((page.page, outcome));
            }
            for (page, err) in emitted.failed {
                results.push((page, PageOutcome::EmitFailed(err)));
            }
            // Report in navigation order.
            results.sort_by_key(|(page, _)| plan.pages.iter().position(|p| p.page == *page));
            output::print_build_output(&results);

            let failed = results
                .iter()
                .filter(|(_, o)| !matches!(o, PageOutcome::Written(_)))
                .count();
            if failed > 0 {
                return Err(format!("{failed} of {} pages failed", results.len()).into());
            }
        }
        Command::Archetypes => output::print_archetypes(&registry),
        Command::Industries => output::print_industries(&registry),
        Command::GenConfig => {}
    }

    Ok(())
}

/// Install the stderr subscriber. `SITEWRIGHT_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "sitewright=debug"
    } else {
        "sitewright=info"
    };
    let filter =
        EnvFilter::try_from_env("SITEWRIGHT_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_profile(path: &Path) -> Result<BusinessProfile, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Config file first, then command-line flags on top.
fn generate_options(
    input: &ProfileArgs,
    args: &SiteArgs,
) -> Result<GenerateOptions, Box<dyn std::error::Error>> {
    let project: ProjectConfig = match &args.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&args.project)?,
    };
    let mut options = project.generate_options();

    if let Some(archetype) = &args.archetype {
        options.archetype_override = Some(archetype.clone());
    }
    if !args.pages.is_empty() {
        options.pages = site::parse_pages(&args.pages)?;
    }
    options.theme_overrides.dark |= args.dark;
    options.theme_overrides.medium |= args.medium;

    if let Some(path) = &input.ai {
        let raw = std::fs::read_to_string(path)?;
        options.ai_content = Some(AiContent::from_json_str(&raw));
    }
    Ok(options)
}
