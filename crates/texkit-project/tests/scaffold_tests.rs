use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use texkit_project::{
    DirHandle, FileSystem, LocalFileSystem, Project, ProjectScaffolder, RootModel, ScaffoldError,
    ScaffoldPlan, ScaffoldStep, StepStatus, TemplateError, TemplateProvider,
};
use walkdir::WalkDir;

/// Returns a fixed text for every template id.
#[derive(Debug)]
struct FixedTemplate(&'static str);

impl TemplateProvider for FixedTemplate {
    fn template_text(&self, _project: &Project, _template_id: &str) -> Result<String, TemplateError> {
        Ok(self.0.to_string())
    }
}

/// Local file system with injectable failures. Records every successful
/// directory lookup.
#[derive(Debug, Default)]
struct FlakyFileSystem {
    unresolvable: Vec<&'static str>,
    fail_create_file: bool,
    fail_write_file: bool,
    lookups: Mutex<Vec<PathBuf>>,
}

impl FileSystem for FlakyFileSystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        LocalFileSystem.create_dir_all(path)
    }

    fn find_dir(&self, path: &Path) -> Option<DirHandle> {
        if self.unresolvable.iter().any(|name| path.ends_with(name)) {
            return None;
        }
        let handle = LocalFileSystem.find_dir(path)?;
        self.lookups.lock().unwrap().push(handle.path().to_path_buf());
        Some(handle)
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        if self.fail_create_file {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        LocalFileSystem.create_file(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if self.fail_write_file {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        LocalFileSystem.write_file(path, contents)
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap().join("thesis");
        Self { _dir: dir, root }
    }

    fn project(&self) -> Project {
        Project::new("thesis", &self.root)
    }

    fn scaffolder(&self, fs: FlakyFileSystem) -> ProjectScaffolder {
        ProjectScaffolder::new(ScaffoldPlan::new(&self.root))
            .with_file_system(Arc::new(fs))
            .with_templates(Arc::new(FixedTemplate("\\documentclass{article}")))
    }

    fn entries(&self) -> BTreeSet<String> {
        WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .map(|e| {
                let e = e.unwrap();
                let rel = e.path().strip_prefix(&self.root).unwrap();
                let mut name = rel.to_string_lossy().replace('\\', "/");
                if e.file_type().is_dir() {
                    name.push('/');
                }
                name
            })
            .collect()
    }
}

#[test]
fn test_scaffold_empty_root() {
    let fx = Fixture::new();
    let mut model = RootModel::new("thesis");

    let report = fx
        .scaffolder(FlakyFileSystem::default())
        .setup_root_model(&fx.project(), &mut model)
        .unwrap();

    let expected: BTreeSet<String> = ["auxil/", "out/", "src/", "src/main.tex"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(fx.entries(), expected);

    let entry = model.content_entry(&fx.root).unwrap();
    assert_eq!(entry.source_folders().len(), 1);
    assert_eq!(entry.source_folders()[0].path, fx.root.join("src"));
    assert_eq!(entry.source_folders()[0].package_prefix, "");
    assert!(!entry.source_folders()[0].is_test);
    assert_eq!(
        entry.exclude_folders(),
        &[fx.root.join("out"), fx.root.join("auxil")]
    );
    assert!(model.exclude_output());
    assert_eq!(model.module_name(), "thesis");

    assert_eq!(report.main_files, vec![fx.root.join("src").join("main.tex")]);
    assert!(report.steps.iter().all(|(_, s)| *s == StepStatus::Done));
}

#[test]
fn test_main_file_has_exact_template_text() {
    let fx = Fixture::new();
    let mut model = RootModel::new("thesis");
    fx.scaffolder(FlakyFileSystem::default())
        .setup_root_model(&fx.project(), &mut model)
        .unwrap();

    let content = std::fs::read(fx.root.join("src").join("main.tex")).unwrap();
    assert_eq!(content, b"\\documentclass{article}");
}

#[test]
fn test_existing_main_file_is_overwritten() {
    let fx = Fixture::new();
    std::fs::create_dir_all(fx.root.join("src")).unwrap();
    std::fs::write(fx.root.join("src").join("main.tex"), "old content that is longer").unwrap();

    let mut model = RootModel::new("thesis");
    fx.scaffolder(FlakyFileSystem::default())
        .setup_root_model(&fx.project(), &mut model)
        .unwrap();

    let content = std::fs::read_to_string(fx.root.join("src").join("main.tex")).unwrap();
    assert_eq!(content, "\\documentclass{article}");
}

#[test]
fn test_unresolvable_out_is_skipped() {
    let fx = Fixture::new();
    let fs = FlakyFileSystem {
        unresolvable: vec!["out"],
        ..FlakyFileSystem::default()
    };
    let mut model = RootModel::new("thesis");

    let report = fx
        .scaffolder(fs)
        .setup_root_model(&fx.project(), &mut model)
        .unwrap();

    let entry = model.content_entry(&fx.root).unwrap();
    assert_eq!(entry.source_folders()[0].path, fx.root.join("src"));
    assert_eq!(entry.exclude_folders(), &[fx.root.join("auxil")]);

    let out = ScaffoldStep::ExcludeFolder(fx.root.join("out"));
    assert_eq!(report.status(&out), Some(StepStatus::Skipped));
    assert_eq!(report.skipped().count(), 1);
    // The directory itself was still created.
    assert!(fx.root.join("out").is_dir());
}

#[test]
fn test_unresolvable_src_skips_registration_and_seeding() {
    let fx = Fixture::new();
    let fs = FlakyFileSystem {
        unresolvable: vec!["src"],
        ..FlakyFileSystem::default()
    };
    let mut model = RootModel::new("thesis");

    let report = fx
        .scaffolder(fs)
        .setup_root_model(&fx.project(), &mut model)
        .unwrap();

    let entry = model.content_entry(&fx.root).unwrap();
    assert!(entry.source_folders().is_empty());
    assert_eq!(entry.exclude_folders().len(), 2);
    assert!(report.main_files.is_empty());
    assert!(!fx.root.join("src").join("main.tex").exists());
}

#[test]
fn test_main_file_creation_failure() {
    let fx = Fixture::new();
    let fs = FlakyFileSystem {
        fail_create_file: true,
        ..FlakyFileSystem::default()
    };
    let mut model = RootModel::new("thesis");

    let err = fx
        .scaffolder(fs)
        .setup_root_model(&fx.project(), &mut model)
        .unwrap_err();

    match err.error {
        ScaffoldError::CreateMainFile { path, source } => {
            assert_eq!(path, fx.root.join("src").join("main.tex"));
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // The source folder registered before seeding stays registered, and the
    // exclusion steps that follow the source roots still ran.
    let entry = model.content_entry(&fx.root).unwrap();
    assert_eq!(entry.source_folders().len(), 1);
    assert_eq!(
        entry.exclude_folders(),
        &[fx.root.join("out"), fx.root.join("auxil")]
    );
    assert!(model.exclude_output());
}

#[test]
fn test_fatal_failure_abandons_remaining_source_roots() {
    let fx = Fixture::new();
    let config = texkit_project::ScaffoldConfig {
        extra_source_dirs: vec!["chapters".to_string()],
        ..Default::default()
    };
    let fs = Arc::new(FlakyFileSystem {
        fail_write_file: true,
        ..FlakyFileSystem::default()
    });
    let mut model = RootModel::new("thesis");

    let failure = ProjectScaffolder::new(ScaffoldPlan::from_config(&fx.root, &config))
        .with_file_system(fs.clone())
        .with_templates(Arc::new(FixedTemplate("x")))
        .setup_root_model(&fx.project(), &mut model)
        .unwrap_err();

    assert!(matches!(failure.error, ScaffoldError::WriteMainFile { .. }));

    let statuses: Vec<StepStatus> = failure.report.steps.iter().map(|(_, s)| *s).collect();
    assert_eq!(
        statuses,
        vec![
            StepStatus::Failed,
            StepStatus::Abandoned,
            StepStatus::Done,
            StepStatus::Done,
            StepStatus::Done,
        ]
    );
    assert!(matches!(
        &failure.report.steps[1].0,
        ScaffoldStep::SourceRoot(source) if source.path == fx.root.join("chapters")
    ));
    assert_eq!(
        failure.report.status(&ScaffoldStep::ExcludeFolder(fx.root.join("auxil"))),
        Some(StepStatus::Done)
    );
    assert_eq!(failure.report.status(&ScaffoldStep::ExcludeOutput), Some(StepStatus::Done));
    assert!(failure.report.main_files.is_empty());

    let entry = model.content_entry(&fx.root).unwrap();
    assert_eq!(entry.source_folders().len(), 1);
    assert_eq!(entry.exclude_folders().len(), 2);
    assert!(!fx.root.join("chapters").exists());

    let looked_up = fs.lookups.lock().unwrap().clone();
    assert!(!looked_up.contains(&fx.root.join("chapters")));
}

#[test]
fn test_template_failure_is_fatal() {
    #[derive(Debug)]
    struct Missing;
    impl TemplateProvider for Missing {
        fn template_text(&self, _: &Project, id: &str) -> Result<String, TemplateError> {
            Err(TemplateError::NotFound(id.to_string()))
        }
    }

    let fx = Fixture::new();
    let mut model = RootModel::new("thesis");
    let result = ProjectScaffolder::new(ScaffoldPlan::new(&fx.root))
        .with_templates(Arc::new(Missing))
        .setup_root_model(&fx.project(), &mut model);

    let failure = result.unwrap_err();
    assert!(matches!(
        failure.error,
        ScaffoldError::Template(TemplateError::NotFound(_))
    ));
    assert_eq!(failure.report.steps[0].1, StepStatus::Failed);
    // Created, but left empty.
    assert_eq!(
        std::fs::read_to_string(fx.root.join("src").join("main.tex")).unwrap(),
        ""
    );
}

#[test]
fn test_builtin_template_with_local_file_system() {
    let fx = Fixture::new();
    let mut model = RootModel::new("thesis");
    ProjectScaffolder::new(ScaffoldPlan::new(&fx.root))
        .setup_root_model(&fx.project(), &mut model)
        .unwrap();

    let content = std::fs::read_to_string(fx.root.join("src").join("main.tex")).unwrap();
    assert!(content.contains("\\title{thesis}"));
    assert!(content.contains("\\begin{document}"));
}

#[test]
fn test_rerun_is_idempotent_on_disk() {
    let fx = Fixture::new();
    let scaffolder = fx.scaffolder(FlakyFileSystem::default());

    let mut first = RootModel::new("thesis");
    scaffolder.setup_root_model(&fx.project(), &mut first).unwrap();
    let mut second = RootModel::new("thesis");
    scaffolder.setup_root_model(&fx.project(), &mut second).unwrap();

    assert_eq!(fx.entries().len(), 4);
    assert_eq!(first, second);
}
