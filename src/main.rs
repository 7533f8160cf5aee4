//! CLI tool for converting BOM files into LaTeX parts lists

use bomtex::{
    convert_bom_file, load_descriptions, load_format_rules, tex_output_path, write_dump, DocumentInfo, GroupMode,
    RenderOptions,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_FORMAT: &str = "format";
const DEFAULT_DESCRIPTION: &str = "description";
const DEFAULT_BOM: &str = "bom";

#[derive(Parser)]
#[command(name = "bomtex")]
#[command(version)]
#[command(about = "Convert a CSV bill of materials into a LaTeX parts list")]
#[command(long_about = "Convert a CSV bill of materials into a LaTeX parts list.\n\n\
    Component names are built from the rules in the format file, section headers come from \
    the description file. Files named `format`, `description` and `bom` in the working \
    directory are used when no paths are given.")]
struct Cli {
    /// BOM files to convert; each produces a .tex file next to it
    boms: Vec<PathBuf>,

    /// File with naming rules per component type
    #[arg(long, short = 'f')]
    format: Option<PathBuf>,

    /// File with section headers per component type
    #[arg(long, short = 'd')]
    description: Option<PathBuf>,

    /// How designators are combined into entries
    #[arg(long, value_enum, default_value_t = GroupMode::Flat)]
    group: GroupMode,

    /// Insert a blank entry after this many entries of a section (0 disables)
    #[arg(long, default_value_t = 0)]
    strings: usize,

    /// Also write the resolved designator table as JSON next to each BOM
    #[arg(long)]
    dump: bool,

    #[arg(long)]
    author: Option<String>,

    #[arg(long)]
    checker: Option<String>,

    #[arg(long)]
    norm_controller: Option<String>,

    #[arg(long)]
    approver: Option<String>,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Document number
    #[arg(long)]
    number: Option<String>,
}

impl Cli {
    fn document_info(&self) -> DocumentInfo {
        let defaults = DocumentInfo::default();
        DocumentInfo {
            author: self.author.clone().unwrap_or(defaults.author),
            checker: self.checker.clone().unwrap_or(defaults.checker),
            norm_controller: self.norm_controller.clone().unwrap_or(defaults.norm_controller),
            approver: self.approver.clone().unwrap_or(defaults.approver),
            title: self.title.clone().unwrap_or(defaults.title),
            number: self.number.clone().unwrap_or(defaults.number),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(format_path) = config_path(cli.format.clone(), DEFAULT_FORMAT) else {
        eprintln!("Error: no format file given and `{}` not found (see --help)", DEFAULT_FORMAT);
        return ExitCode::from(2);
    };
    let Some(description_path) = config_path(cli.description.clone(), DEFAULT_DESCRIPTION) else {
        eprintln!("Error: no description file given and `{}` not found (see --help)", DEFAULT_DESCRIPTION);
        return ExitCode::from(2);
    };
    let boms = bom_paths(&cli.boms);
    if boms.is_empty() {
        eprintln!("Error: no readable BOM files (see --help)");
        return ExitCode::from(2);
    }

    let rules = match load_format_rules(&format_path) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("Error reading format file {}: {}", format_path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let descriptions = match load_descriptions(&description_path) {
        Ok(descriptions) => descriptions,
        Err(e) => {
            eprintln!("Error reading description file {}: {}", description_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let options = RenderOptions::new()
        .with_group(cli.group)
        .with_strings(cli.strings)
        .with_info(cli.document_info());

    let mut failed = false;
    for bom_path in &boms {
        let output = tex_output_path(bom_path);
        match convert_bom_file(bom_path, &output, &rules, &descriptions, &options) {
            Ok(bom) => {
                tracing::info!(
                    input = %bom_path.display(),
                    output = %output.display(),
                    components = bom.components.len(),
                    missing = bom.missing.len(),
                    "converted BOM"
                );
                if cli.dump {
                    let dump_path = bom_path.with_extension("json");
                    if let Err(e) = write_dump(&bom, &dump_path) {
                        eprintln!("Error writing dump {}: {}", dump_path.display(), e);
                        failed = true;
                    }
                }
            }
            Err(e) => {
                eprintln!("Error converting {}: {}", bom_path.display(), e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Explicit path, or the default file name if it exists in the working directory
fn config_path(explicit: Option<PathBuf>, default: &str) -> Option<PathBuf> {
    explicit.or_else(|| {
        let path = PathBuf::from(default);
        path.exists().then_some(path)
    })
}

/// Existing BOM paths from the command line, or the default `bom` file
fn bom_paths(args: &[PathBuf]) -> Vec<PathBuf> {
    if args.is_empty() {
        let path = Path::new(DEFAULT_BOM);
        return if path.exists() { vec![path.to_path_buf()] } else { Vec::new() };
    }

    args.iter()
        .filter(|path| {
            let exists = path.exists();
            if !exists {
                eprintln!("Warning: skipping missing BOM {}", path.display());
            }
            exists
        })
        .cloned()
        .collect()
}
