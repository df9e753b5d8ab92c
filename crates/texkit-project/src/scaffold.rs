//! The scaffolding plan and its driver.
//!
//! A [`ScaffoldPlan`] expands into an ordered list of [`ScaffoldStep`]s:
//!
//! 1. one [`ScaffoldStep::SourceRoot`] per source folder (create, resolve,
//!    register, seed the main file),
//! 2. [`ScaffoldStep::ExcludeFolder`] for the output folder,
//! 3. [`ScaffoldStep::ExcludeFolder`] for the auxiliary folder,
//! 4. [`ScaffoldStep::ExcludeOutput`].
//!
//! Exclusions come after the source folders because they are layered onto a
//! content entry that must already be registered.

use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ScaffoldConfig;
use crate::error::{ScaffoldError, ScaffoldFailure};
use crate::fs::{DirHandle, FileSystem, LocalFileSystem};
use crate::model::{ContentEntry, RootModel};
use crate::template::{BuiltinTemplates, Project, TemplateProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    pub path: PathBuf,
    pub package_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPlan {
    pub root: PathBuf,
    pub source_roots: Vec<SourceRoot>,
    pub output_dir: PathBuf,
    pub auxiliary_dir: PathBuf,
    pub main_file: String,
    pub template_id: String,
}

impl ScaffoldPlan {
    /// The default layout: `src` (empty prefix), `out`, `auxil`, `main.tex`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(root, &ScaffoldConfig::default())
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &ScaffoldConfig) -> Self {
        let root = root.into();
        let mut source_roots = vec![SourceRoot {
            path: root.join(&config.source_dir),
            package_prefix: config.source_prefix.clone(),
        }];
        source_roots.extend(config.extra_source_dirs.iter().map(|dir| SourceRoot {
            path: root.join(dir),
            package_prefix: String::new(),
        }));

        Self {
            output_dir: root.join(&config.output_dir),
            auxiliary_dir: root.join(&config.auxiliary_dir),
            main_file: config.main_file.clone(),
            template_id: config.template.clone(),
            source_roots,
            root,
        }
    }

    pub fn steps(&self) -> Vec<ScaffoldStep> {
        let mut steps: Vec<_> = self
            .source_roots
            .iter()
            .cloned()
            .map(ScaffoldStep::SourceRoot)
            .collect();
        steps.push(ScaffoldStep::ExcludeFolder(self.output_dir.clone()));
        steps.push(ScaffoldStep::ExcludeFolder(self.auxiliary_dir.clone()));
        steps.push(ScaffoldStep::ExcludeOutput);
        steps
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldStep {
    SourceRoot(SourceRoot),
    ExcludeFolder(PathBuf),
    ExcludeOutput,
}

/// What running one step produced.
#[derive(Debug)]
pub enum StepOutcome {
    Done,
    /// The directory was not resolvable after creation; nothing registered.
    Skipped,
    Fatal(ScaffoldError),
}

/// The recorded result of a step in a [`ScaffoldReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Skipped,
    Failed,
    /// Not run because an earlier source root failed fatally.
    Abandoned,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub steps: Vec<(ScaffoldStep, StepStatus)>,
    pub main_files: Vec<PathBuf>,
}

impl ScaffoldReport {
    pub fn status(&self, step: &ScaffoldStep) -> Option<StepStatus> {
        self.steps
            .iter()
            .find(|(s, _)| s == step)
            .map(|(_, status)| *status)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ScaffoldStep> {
        self.steps
            .iter()
            .filter(|(_, status)| *status == StepStatus::Skipped)
            .map(|(step, _)| step)
    }
}

/// Runs a [`ScaffoldPlan`] against a [`RootModel`].
#[derive(Debug, Clone)]
pub struct ProjectScaffolder {
    plan: ScaffoldPlan,
    fs: Arc<dyn FileSystem>,
    templates: Arc<dyn TemplateProvider>,
}

impl ProjectScaffolder {
    /// Uses the local file system and the built-in templates.
    pub fn new(plan: ScaffoldPlan) -> Self {
        Self {
            plan,
            fs: Arc::new(LocalFileSystem),
            templates: Arc::new(BuiltinTemplates),
        }
    }

    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_templates(mut self, templates: Arc<dyn TemplateProvider>) -> Self {
        self.templates = templates;
        self
    }

    /// Creates the layout on disk and registers it in `model`.
    ///
    /// On a fatal step, returns the first error together with the full report
    /// once the exclusion steps have run. Work done before a failure stays in
    /// place.
    pub fn setup_root_model(
        &self,
        project: &Project,
        model: &mut RootModel,
    ) -> Result<ScaffoldReport, ScaffoldFailure> {
        if let Err(e) = self.fs.create_dir_all(&self.plan.root) {
            warn!("Could not create content root {:?}: {}", self.plan.root, e);
        }
        model.add_content_entry(&self.plan.root);

        let mut report = ScaffoldReport::default();
        let mut fatal = None;

        for step in self.plan.steps() {
            if fatal.is_some() && matches!(step, ScaffoldStep::SourceRoot(_)) {
                report.steps.push((step, StepStatus::Abandoned));
                continue;
            }

            let outcome = match &step {
                ScaffoldStep::SourceRoot(source) => {
                    let entry = model.add_content_entry(&self.plan.root);
                    self.add_source_root(project, entry, source, &mut report.main_files)
                }
                ScaffoldStep::ExcludeFolder(path) => {
                    let entry = model.add_content_entry(&self.plan.root);
                    self.add_exclude_folder(entry, path)
                }
                ScaffoldStep::ExcludeOutput => {
                    model.set_exclude_output(true);
                    StepOutcome::Done
                }
            };

            let status = match outcome {
                StepOutcome::Done => StepStatus::Done,
                StepOutcome::Skipped => {
                    warn!("Skipped {:?}: directory could not be resolved", step);
                    StepStatus::Skipped
                }
                StepOutcome::Fatal(e) => {
                    warn!("Scaffold step {:?} failed: {}", step, e);
                    if fatal.is_none() {
                        fatal = Some(e);
                    }
                    StepStatus::Failed
                }
            };
            report.steps.push((step, status));
        }

        match fatal {
            Some(error) => Err(ScaffoldFailure { report, error }),
            None => {
                info!("Scaffolded module {:?}", self.plan.root);
                Ok(report)
            }
        }
    }

    fn add_source_root(
        &self,
        project: &Project,
        entry: &mut ContentEntry,
        source: &SourceRoot,
        main_files: &mut Vec<PathBuf>,
    ) -> StepOutcome {
        let Some(dir) = self.ensure_dir(&source.path) else {
            return StepOutcome::Skipped;
        };
        entry.add_source_folder(&dir, false, &source.package_prefix);
        info!("Registered source folder {:?}", dir.path());

        match self.seed_main_file(project, &source.path) {
            Ok(path) => {
                main_files.push(path);
                StepOutcome::Done
            }
            Err(e) => StepOutcome::Fatal(e),
        }
    }

    fn add_exclude_folder(&self, entry: &mut ContentEntry, path: &Path) -> StepOutcome {
        match self.ensure_dir(path) {
            Some(dir) => {
                entry.add_exclude_folder(&dir);
                info!("Registered excluded folder {:?}", dir.path());
                StepOutcome::Done
            }
            None => StepOutcome::Skipped,
        }
    }

    /// Creates `path` and resolves it. A failed creation is only logged: the
    /// lookup that follows decides whether the step goes ahead.
    fn ensure_dir(&self, path: &Path) -> Option<DirHandle> {
        if let Err(e) = self.fs.create_dir_all(path) {
            warn!("Could not create {:?}: {}", path, e);
        }
        self.fs.find_dir(path)
    }

    /// Creates `<source_root>/<main file>` if needed and overwrites it with the
    /// plan's template, rendered for `project`.
    pub fn seed_main_file(
        &self,
        project: &Project,
        source_root: &Path,
    ) -> Result<PathBuf, ScaffoldError> {
        let path = source_root.join(&self.plan.main_file);

        self.fs
            .create_file(&path)
            .map_err(|source| ScaffoldError::CreateMainFile {
                path: path.clone(),
                source,
            })?;

        let text = self
            .templates
            .template_text(project, &self.plan.template_id)?;

        self.fs
            .write_file(&path, text.as_bytes())
            .map_err(|source| ScaffoldError::WriteMainFile {
                path: path.clone(),
                source,
            })?;

        info!("Seeded {:?} from template '{}'", path, self.plan.template_id);
        Ok(path)
    }
}
