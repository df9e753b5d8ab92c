use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use texkit_project::{
    DirectoryTemplates, Project, ProjectScaffolder, RootModel, ScaffoldConfig, ScaffoldPlan,
};
use texkit_syntax::ast::BibtexFile;
use texkit_syntax::stub::FileStubs;

#[derive(Parser)]
#[command(name = "texkit")]
#[command(about = "texkit CLI tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new LaTeX project and print its module model as JSON
    New {
        /// Content root of the new project
        #[arg(value_name = "DIR")]
        path: PathBuf,
        /// Project name used in templates (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
        /// Template for the main file
        #[arg(long)]
        template: Option<String>,
        /// Directory with user templates (`<id>.tex`)
        #[arg(long, value_name = "DIR")]
        templates: Option<PathBuf>,
        /// JSON scaffold configuration
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// List the entry keys of a BibTeX file
    Ids {
        /// Path to the .bib file
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Print the serialized id stubs instead
        #[arg(long)]
        stubs: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::New {
            path,
            name,
            template,
            templates,
            config,
        } => new_project(&path, name, template, templates, config.as_deref()),
        Commands::Ids { path, stubs } => list_ids(&path, stubs),
    }
}

fn new_project(
    path: &Path,
    name: Option<String>,
    template: Option<String>,
    templates: Option<PathBuf>,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let mut config = match config {
        Some(file) => ScaffoldConfig::load(file)?,
        None => ScaffoldConfig::default(),
    };
    if let Some(template) = template {
        config.template = template;
    }

    let name = name
        .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "main".to_string());

    let mut scaffolder = ProjectScaffolder::new(ScaffoldPlan::from_config(path, &config));
    if let Some(dir) = templates {
        scaffolder = scaffolder.with_templates(Arc::new(DirectoryTemplates::new(dir)));
    }

    let project = Project::new(name.clone(), path);
    let mut model = RootModel::new(name);
    scaffolder
        .setup_root_model(&project, &mut model)
        .with_context(|| format!("Failed to scaffold {:?}", path))?;

    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}

fn list_ids(path: &Path, stubs: bool) -> anyhow::Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let result = texkit_syntax::parse(&content);
    for error in &result.errors {
        log::warn!("{:?}: {} at {:?}", path, error.message, error.range);
    }

    let file = BibtexFile::new(result.syntax());
    if stubs {
        println!("{}", FileStubs::build(&file).to_json()?);
    } else {
        for id in file.ids() {
            println!("{}", id);
        }
    }
    Ok(())
}
