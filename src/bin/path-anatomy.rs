use std::io::{BufRead as _, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use path_anatomy::{
    AutoAnimateOptions, BuildOptions, BuildOutcome, Document, PRECOMP_NAME, Profile, Slot,
};

#[derive(Parser, Debug)]
#[command(name = "path-anatomy", version)]
struct Cli {
    /// Log operation details to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate annotation layers for a source layer, replacing any earlier build.
    Build(BuildArgs),
    /// Remove every generated layer.
    Cleanup(EditArgs),
    /// Freeze the outlines and relink everything that depends on them.
    Bake(EditArgs),
    /// Key the Timeline control for a reveal starting at the document time.
    Animate(AnimateArgs),
    /// Clear reveal keyframes and show everything.
    Reset(EditArgs),
    /// Move every generated layer into one precomp.
    Precompose(PrecomposeArgs),
    /// Print the value of a binding at the document time as JSON.
    Eval(QueryArgs),
    /// Print the host expression text of a binding.
    Formula(QueryArgs),
}

#[derive(Parser, Debug)]
struct EditArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output document JSON.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BuildArgs {
    #[command(flatten)]
    io: EditArgs,

    /// Name of the source layer to annotate.
    #[arg(long)]
    source: String,

    /// Build options JSON; every field is optional.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Override the construction profile (`minimal` or `extended`).
    #[arg(long, value_parser = parse_profile)]
    profile: Option<Profile>,

    /// Skip the confirmation prompt for large sources.
    #[arg(long, short = 'y', default_value_t = false)]
    yes: bool,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    #[command(flatten)]
    io: EditArgs,

    /// Reveal duration in seconds.
    #[arg(long, default_value_t = 2.0)]
    duration: f64,

    /// Stagger amount, 0 to 100.
    #[arg(long, default_value_t = 40.0)]
    stagger: f64,

    /// Easing amount, 0 to 100.
    #[arg(long, default_value_t = 50.0)]
    easing: f64,

    /// Start time in seconds; defaults to the document time.
    #[arg(long)]
    at: Option<f64>,
}

#[derive(Parser, Debug)]
struct PrecomposeArgs {
    #[command(flatten)]
    io: EditArgs,

    /// Name of the new precomp layer.
    #[arg(long, default_value = PRECOMP_NAME)]
    name: String,
}

#[derive(Parser, Debug)]
struct QueryArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Generated layer name.
    #[arg(long)]
    layer: String,

    /// Element name; omit to query the layer's own opacity or position.
    #[arg(long)]
    element: Option<String>,

    /// Property: position, scale, opacity, path, size, roundness, trim_end, offset or text.
    #[arg(long)]
    slot: Slot,

    /// Evaluate at this time instead of the document time.
    #[arg(long)]
    time: Option<f64>,
}

fn parse_profile(s: &str) -> Result<Profile, String> {
    match s {
        "minimal" => Ok(Profile::Minimal),
        "extended" => Ok(Profile::Extended),
        other => Err(format!("unknown profile '{other}'")),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Cleanup(args) => edit(&args, |doc| {
            let removed = path_anatomy::cleanup(doc);
            eprintln!("removed {removed} layer(s)");
            Ok(())
        }),
        Command::Bake(args) => edit(&args, |doc| {
            let report = path_anatomy::bake(doc)?;
            eprintln!(
                "froze {} outline(s), relinked {} element(s)",
                report.frozen.len(),
                report.relinked.len()
            );
            for s in &report.skipped {
                eprintln!("skipped {}/{}: {}", s.layer, s.element, s.reason);
            }
            Ok(())
        }),
        Command::Animate(args) => cmd_animate(args),
        Command::Reset(args) => edit(&args, |doc| Ok(path_anatomy::reset_animation(doc)?)),
        Command::Precompose(args) => edit(&args.io, |doc| {
            let moved = path_anatomy::precompose(doc, &args.name)?;
            eprintln!("grouped {moved} layer(s) into '{}'", args.name);
            Ok(())
        }),
        Command::Eval(args) => cmd_eval(args),
        Command::Formula(args) => cmd_formula(args),
    }
}

fn load(path: &Path) -> anyhow::Result<Document> {
    let doc = Document::from_path(path)
        .with_context(|| format!("open document '{}'", path.display()))?;
    doc.validate()
        .with_context(|| format!("validate document '{}'", path.display()))?;
    Ok(doc)
}

/// Load, apply `f`, save.
fn edit(
    args: &EditArgs,
    f: impl FnOnce(&mut Document) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let mut doc = load(&args.in_path)?;
    f(&mut doc)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    doc.save(&args.out)
        .with_context(|| format!("write document '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn prompt(message: &str) -> bool {
    eprint!("{message} [y/N] ");
    let _ = std::io::stderr().flush();
    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes")
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let mut options = match &args.options {
        Some(path) => BuildOptions::from_path(path)
            .with_context(|| format!("load build options '{}'", path.display()))?,
        None => BuildOptions::default(),
    };
    if let Some(profile) = args.profile {
        options.profile = profile;
    }

    let yes = args.yes;
    let confirm = move |message: &str| yes || prompt(message);
    let mut declined = false;
    edit(&args.io, |doc| {
        match path_anatomy::build(doc, &args.source, &options, &confirm)? {
            BuildOutcome::Built(report) => eprintln!(
                "built {} layer(s) for {} path(s), {} vertices",
                report.layers.len(),
                report.paths,
                report.vertices
            ),
            BuildOutcome::Declined => declined = true,
        }
        Ok(())
    })?;
    if declined {
        eprintln!("build declined; document unchanged");
    }
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let opts = AutoAnimateOptions {
        duration: args.duration,
        stagger: args.stagger,
        easing: args.easing,
    };
    edit(&args.io, |doc| {
        if let Some(t) = args.at {
            doc.time = t;
        }
        path_anatomy::auto_animate(doc, opts)?;
        Ok(())
    })
}

fn query_doc(args: &QueryArgs) -> anyhow::Result<Document> {
    let mut doc = load(&args.in_path)?;
    if let Some(t) = args.time {
        doc.time = t;
    }
    Ok(doc)
}

fn cmd_eval(args: QueryArgs) -> anyhow::Result<()> {
    let doc = query_doc(&args)?;
    let value = match &args.element {
        Some(element) => doc.evaluate(&args.layer, element, args.slot),
        None => doc.evaluate_layer(&args.layer, args.slot),
    }
    .with_context(|| format!("evaluate {} of '{}'", args.slot, args.layer))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_formula(args: QueryArgs) -> anyhow::Result<()> {
    let doc = query_doc(&args)?;
    let layer = doc
        .generated(&args.layer)
        .with_context(|| format!("no generated layer '{}'", args.layer))?;
    let binding = match &args.element {
        Some(name) => layer
            .element(name)
            .with_context(|| format!("no element '{name}' in '{}'", args.layer))?
            .binding(args.slot)
            .with_context(|| format!("element '{name}' has no {} property", args.slot))?,
        None => match args.slot {
            Slot::Opacity => &layer.opacity,
            Slot::Position => &layer.position,
            other => anyhow::bail!("layers have no {other} property"),
        },
    };
    match binding.as_formula() {
        Some(formula) => println!("{}", formula.to_source()),
        None => println!("{}", serde_json::to_string(binding)?),
    }
    Ok(())
}
