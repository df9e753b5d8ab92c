//! # texkit project
//!
//! Scaffolding for new LaTeX modules.
//!
//! ## Overview
//!
//! Given the content root of a freshly created module, a [`ProjectScaffolder`]
//! lays out the conventional folders, records them in a [`RootModel`] and
//! seeds the main document from a template:
//!
//! ```text
//! <root>/
//! ├── src/          source folder (empty package prefix)
//! │   └── main.tex  rendered from the "LaTeX Source" template
//! ├── out/          excluded (build output)
//! └── auxil/        excluded (auxiliary files)
//! ```
//!
//! ## Modules
//!
//! - [`scaffold`] - The plan, its ordered steps and the driver
//! - [`model`] - Content entries with source and exclude folders
//! - [`fs`] - File system seam ([`FileSystem`], [`LocalFileSystem`])
//! - [`template`] - Template lookup and variable substitution
//! - [`config`] - Folder and template names, loadable from JSON
//! - [`error`] - Error types
//!
//! ## Failure Model
//!
//! Every step runs in order and reports [`StepOutcome::Done`],
//! [`StepOutcome::Skipped`] (a directory could not be resolved after creation)
//! or [`StepOutcome::Fatal`] (the main file could not be created or written).
//! Skipped steps never stop the plan. A fatal step abandons the remaining
//! source roots, but the exclusion steps still run before the error is
//! returned as a [`ScaffoldFailure`], which keeps the per-step report. Nothing
//! is rolled back.
//!
//! ## Examples
//!
//! ```no_run
//! use texkit_project::{Project, ProjectScaffolder, RootModel, ScaffoldPlan};
//!
//! let plan = ScaffoldPlan::new("/tmp/thesis");
//! let project = Project::new("thesis", "/tmp/thesis");
//! let mut model = RootModel::new("thesis");
//!
//! let report = ProjectScaffolder::new(plan).setup_root_model(&project, &mut model)?;
//! println!("seeded {:?}", report.main_files);
//! # Ok::<(), texkit_project::ScaffoldFailure>(())
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod model;
pub mod scaffold;
pub mod template;

pub use config::ScaffoldConfig;
pub use error::{ConfigError, ScaffoldError, ScaffoldFailure, TemplateError};
pub use fs::{DirHandle, FileSystem, LocalFileSystem};
pub use model::{ContentEntry, RootModel, SourceFolder};
pub use scaffold::{
    ProjectScaffolder, ScaffoldPlan, ScaffoldReport, ScaffoldStep, SourceRoot, StepOutcome,
    StepStatus,
};
pub use template::{BuiltinTemplates, DirectoryTemplates, Project, TemplateProvider};
