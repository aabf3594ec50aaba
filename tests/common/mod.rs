//! Common helpers for the twig-loader test suites.
//!
//! Builds on [`twig_loader::test_utils::TestProject`] with what only the
//! integration tests need: running the compiled binary and checking its
//! output.

// Not every suite uses every helper
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::path::Path;
use twig_loader::test_utils::TestProject;

/// Output of one `twig-loader` run.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStderr: {}",
            self.code, self.stderr
        );
        self
    }

    /// Assert the command failed
    pub fn assert_failure(&self) -> &Self {
        assert!(!self.success, "Command unexpectedly succeeded\nStdout: {}", self.stdout);
        self
    }

    /// Assert stdout contains the given text
    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    /// Assert stderr contains the given text
    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}

/// Runs `twig-loader` with `args` from the project root.
pub fn run_loader(project: &TestProject, args: &[&str]) -> Result<CommandOutput> {
    run_loader_in(project.path(), args)
}

/// Runs `twig-loader` with `args` from `dir`.
pub fn run_loader_in(dir: &Path, args: &[&str]) -> Result<CommandOutput> {
    let output = Command::cargo_bin("twig-loader")
        .context("Failed to locate twig-loader binary")?
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("TWIG_LOADER_CONFIG")
        .env("NO_COLOR", "1")
        .output()
        .context("Failed to run twig-loader command")?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
        code: output.status.code(),
    })
}

/// A small site: a page extending a layout, a namespaced component with a
/// nested include, and a macro file imported by the layout.
pub fn create_site(project: &TestProject) -> Result<()> {
    project.write_config(
        r#"
[namespaces]
ui = "src/components"
layouts = "src/layouts"
"#,
    )?;
    project.create_template(
        "src/pages/home.twig",
        "{% extends '@layouts/base.twig' %}\n{% block content %}{% include '@ui/card.twig' with { title: title } %}{% endblock %}\n",
    )?;
    project.create_template(
        "src/layouts/base.twig",
        "{% import '../macros/forms.twig' as forms %}<main>{% block content %}{% endblock %}</main>\n",
    )?;
    project.create_template("src/macros/forms.twig", "{% macro input(name) %}<input name=\"{{ name }}\">{% endmacro %}\n")?;
    project.create_template("src/components/card.twig", "<div class=\"card\">{% include './icon.twig' %}{{ title }}</div>\n")?;
    project.create_template("src/components/icon.twig", "<svg></svg>\n")?;
    Ok(())
}
