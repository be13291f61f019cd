use std::{fs, io, path::Path};

use crate::errors::diagnostics::{DiagLevel, Diagnostic};

/// A single source file moving through the pipeline, together with every
/// diagnostic raised against it.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub file_name: String,
    pub code: String,
    pub lines: Vec<String>,
    errored: bool,
    diagnostics: Vec<Diagnostic>,
    infos: Vec<String>,
}

impl CompilationUnit {
    pub fn from_code(code: &str, file_name: &str) -> Self {
        CompilationUnit {
            file_name: file_name.to_string(),
            code: code.to_string(),
            lines: code.split('\n').map(String::from).collect(),
            errored: false,
            diagnostics: vec![],
            infos: vec![],
        }
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        let code = fs::read_to_string(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(CompilationUnit::from_code(&code, &file_name))
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        if diagnostic.level == DiagLevel::Error {
            self.errored = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Informational messages are logged and kept apart from diagnostics.
    pub fn info(&mut self, message: String) {
        log::info!("{}", message);
        self.infos.push(message);
    }

    pub fn errored(&self) -> bool {
        self.errored
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn infos(&self) -> &[String] {
        &self.infos
    }

    /// Returns the 1-based source line, if it exists.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }
}
