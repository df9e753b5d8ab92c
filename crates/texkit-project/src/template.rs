//! File templates.
//!
//! A template is looked up by id and rendered for a [`Project`]. Rendering
//! replaces `${PROJECT_NAME}`, `${DATE}` and `${USER}`; any other `${...}` is
//! left as written.

use log::debug;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::TemplateError;

pub const FILE_TEMPLATE_TEX: &str = "LaTeX Source";
pub const FILE_TEMPLATE_BIB: &str = "BibTeX";
pub const FILE_TEMPLATE_STY: &str = "LaTeX Package";
pub const FILE_TEMPLATE_CLS: &str = "LaTeX Document Class";

const TEX_TEMPLATE: &str = r"\documentclass[11pt]{article}

\title{${PROJECT_NAME}}
\author{${USER}}
\date{${DATE}}

\begin{document}

    \maketitle

\end{document}
";

const BIB_TEMPLATE: &str = "% Bibliography for ${PROJECT_NAME}, created ${DATE}\n";

const STY_TEMPLATE: &str = r"\NeedsTeXFormat{LaTeX2e}
\ProvidesPackage{${PROJECT_NAME}}[${DATE}]

\endinput
";

const CLS_TEMPLATE: &str = r"\NeedsTeXFormat{LaTeX2e}
\ProvidesClass{${PROJECT_NAME}}[${DATE}]

\LoadClass{article}

\endinput
";

/// The project a template is rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub root: PathBuf,
}

impl Project {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }
}

/// Values substituted into template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariables {
    pub project_name: String,
    pub date: String,
    pub user: String,
}

impl TemplateVariables {
    pub fn for_project(project: &Project) -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_default();
        Self {
            project_name: project.name.clone(),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            user,
        }
    }

    pub fn render(&self, text: &str) -> String {
        text.replace("${PROJECT_NAME}", &self.project_name)
            .replace("${DATE}", &self.date)
            .replace("${USER}", &self.user)
    }
}

pub trait TemplateProvider: Send + Sync + std::fmt::Debug {
    /// Returns the rendered text of `template_id` for `project`.
    fn template_text(&self, project: &Project, template_id: &str) -> Result<String, TemplateError>;
}

/// The templates shipped with texkit.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTemplates;

impl BuiltinTemplates {
    pub fn raw(template_id: &str) -> Option<&'static str> {
        match template_id {
            FILE_TEMPLATE_TEX => Some(TEX_TEMPLATE),
            FILE_TEMPLATE_BIB => Some(BIB_TEMPLATE),
            FILE_TEMPLATE_STY => Some(STY_TEMPLATE),
            FILE_TEMPLATE_CLS => Some(CLS_TEMPLATE),
            _ => None,
        }
    }
}

impl TemplateProvider for BuiltinTemplates {
    fn template_text(&self, project: &Project, template_id: &str) -> Result<String, TemplateError> {
        let raw = Self::raw(template_id)
            .ok_or_else(|| TemplateError::NotFound(template_id.to_string()))?;
        Ok(TemplateVariables::for_project(project).render(raw))
    }
}

/// User templates from a directory, as `<dir>/<template id>.tex`, falling back
/// to another provider when a file is absent.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    dir: PathBuf,
    fallback: Arc<dyn TemplateProvider>,
}

impl DirectoryTemplates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_fallback(dir, Arc::new(BuiltinTemplates))
    }

    pub fn with_fallback(dir: impl Into<PathBuf>, fallback: Arc<dyn TemplateProvider>) -> Self {
        Self {
            dir: dir.into(),
            fallback,
        }
    }
}

impl TemplateProvider for DirectoryTemplates {
    fn template_text(&self, project: &Project, template_id: &str) -> Result<String, TemplateError> {
        let path = self.dir.join(format!("{}.tex", template_id));
        match std::fs::read_to_string(&path) {
            Ok(raw) => {
                debug!("Using user template {:?}", path);
                Ok(TemplateVariables::for_project(project).render(&raw))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No user template at {:?}, using fallback", path);
                self.fallback.template_text(project, template_id)
            }
            Err(source) => Err(TemplateError::Read { path, source }),
        }
    }
}
