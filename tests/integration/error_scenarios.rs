//! Failures and the messages users see for them.

use anyhow::Result;
use twig_loader::test_utils::TestProject;

use crate::common::run_loader;

#[test]
fn test_missing_dependency_fails() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config("[namespaces]\nui = \"components\"\n")?;
    project.create_template("page.twig", "{% include '@ui/missing.twig' %}")?;

    let output = run_loader(&project, &["transform", "page.twig"])?;
    output
        .assert_failure()
        .assert_stderr_contains("Failed to load template '@ui/missing.twig'")
        .assert_stderr_contains("Check the namespace mapping");
    assert_eq!(output.code, Some(1));
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn test_entry_syntax_error() -> Result<()> {
    let project = TestProject::new()?;
    project.create_template("page.twig", "<p>\n{% for x in xs %}\n")?;

    run_loader(&project, &["transform", "page.twig"])?
        .assert_failure()
        .assert_stderr_contains("at line 2")
        .assert_stderr_contains("Fix the template syntax");
    Ok(())
}

#[test]
fn test_not_a_template() -> Result<()> {
    let project = TestProject::new()?;
    project.create_template("style.css", "body {}")?;

    run_loader(&project, &["transform", "style.css"])?
        .assert_failure()
        .assert_stderr_contains("Not a template file");
    Ok(())
}

#[test]
fn test_missing_entry_file() -> Result<()> {
    let project = TestProject::new()?;

    run_loader(&project, &["transform", "absent.twig"])?
        .assert_failure()
        .assert_stderr_contains("absent.twig");
    Ok(())
}

#[test]
fn test_explicit_config_must_exist() -> Result<()> {
    let project = TestProject::new()?;
    project.create_template("page.twig", "x")?;

    run_loader(&project, &["--config", "nope.toml", "transform", "page.twig"])?
        .assert_failure()
        .assert_stderr_contains("Configuration file not found");
    Ok(())
}

#[test]
fn test_bad_namespace_flag() -> Result<()> {
    let project = TestProject::new()?;
    project.create_template("page.twig", "x")?;

    run_loader(&project, &["-n", "components", "transform", "page.twig"])?
        .assert_failure()
        .assert_stderr_contains("Invalid namespace mapping 'components'");
    Ok(())
}

#[test]
fn test_invalid_config_file() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config("max-concurrent-loads = 0\n")?;
    project.create_template("page.twig", "x")?;

    run_loader(&project, &["deps", "page.twig"])?
        .assert_failure()
        .assert_stderr_contains("max-concurrent-loads");
    Ok(())
}
