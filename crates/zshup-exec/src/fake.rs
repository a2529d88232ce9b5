//! Recording [`ToolRunner`] for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::error::ToolError;
use crate::traits::{Invocation, RunStatus, ToolRunner};

/// Records every invocation instead of spawning it.
///
/// Programs are "installed" with [`FakeRunner::with_program`]. An invocation
/// fails when its command line contains a pattern given to
/// [`FakeRunner::fail_when`]. [`FakeRunner::provides_after`] makes a program
/// locatable once a matching invocation has succeeded, which mimics a
/// package manager installing a binary.
#[derive(Debug, Default)]
pub struct FakeRunner {
    programs: Mutex<HashMap<String, PathBuf>>,
    failures: Vec<String>,
    provides: Vec<(String, String)>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_program(self, program: &str) -> Self {
        let path = PathBuf::from("/usr/bin").join(program);
        self.with_program_at(program, path)
    }

    #[must_use]
    pub fn with_program_at(self, program: &str, path: impl Into<PathBuf>) -> Self {
        self.programs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(program.to_string(), path.into());
        self
    }

    #[must_use]
    pub fn fail_when(mut self, pattern: &str) -> Self {
        self.failures.push(pattern.to_string());
        self
    }

    #[must_use]
    pub fn provides_after(mut self, pattern: &str, program: &str) -> Self {
        self.provides
            .push((pattern.to_string(), program.to_string()));
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }
}

#[async_trait]
impl ToolRunner for FakeRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.programs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(program)
            .cloned()
    }

    async fn run(&self, invocation: &Invocation) -> Result<RunStatus, ToolError> {
        let line = invocation.command_line();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation.clone());

        if self.failures.iter().any(|pattern| line.contains(pattern)) {
            return Ok(RunStatus::failed(1));
        }

        for (pattern, program) in &self.provides {
            if line.contains(pattern.as_str()) {
                self.programs
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(program.clone(), PathBuf::from("/usr/bin").join(program));
            }
        }

        Ok(RunStatus::succeeded())
    }
}
