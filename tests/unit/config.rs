//! Tests for project configuration loading.

use anyhow::Result;
use std::path::{Path, PathBuf};
use twig_loader::config::{ConfigOverrides, LoaderConfig, load_project_config};
use twig_loader::core::{LoaderError, user_friendly_error};
use twig_loader::test_utils::TestProject;

#[tokio::test]
async fn test_defaults_without_config_file() -> Result<()> {
    let project = TestProject::new()?;
    let config = project.config().await?;

    assert_eq!(config.root, project.root);
    assert!(config.namespaces.is_empty());
    assert_eq!(config.extensions, vec!["twig"]);
    assert_eq!(config.runtime_module, "twig");
    assert_eq!(config.source, None);
    Ok(())
}

#[tokio::test]
async fn test_namespace_order_follows_file() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(
        r#"
extensions = ["twig", "html"]
runtime-module = "twig/twig.min.js"

[namespaces]
zeta = "src/zeta"
alpha = "src/alpha"

[twig]
autoescape = "html"
"#,
    )?;

    let config = project.config().await?;
    let names: Vec<&str> = config.namespaces.iter().map(|ns| ns.name.as_str()).collect();

    assert_eq!(names, vec!["zeta", "alpha"]);
    assert_eq!(config.namespaces.get("alpha"), Some(project.join("src/alpha").as_path()));
    assert_eq!(config.runtime_module, "twig/twig.min.js");
    assert_eq!(config.twig_options["autoescape"], "html");
    assert!(config.is_template(&project.join("page.html")));
    Ok(())
}

#[tokio::test]
async fn test_overrides_win_over_file() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config("root = \"site\"\n[namespaces]\nui = \"components\"\n")?;

    let overrides = ConfigOverrides {
        root: Some(PathBuf::from("other")),
        namespaces: vec![("ui".to_string(), PathBuf::from("widgets"))],
    };
    let config = load_project_config(None, project.path(), &overrides).await?;

    assert_eq!(config.root, project.join("other"));
    assert_eq!(config.namespaces.len(), 1);
    assert_eq!(config.namespaces.get("ui"), Some(project.join("other/widgets").as_path()));
    Ok(())
}

#[tokio::test]
async fn test_invalid_toml_reports_path() -> Result<()> {
    let project = TestProject::new()?;
    let path = project.write_config("extensions = [\"twig\"\n")?;

    let err = LoaderConfig::load_from(&path).await.unwrap_err();
    match err.downcast_ref::<LoaderError>() {
        Some(LoaderError::ConfigParse { path: reported, .. }) => assert_eq!(reported, &path),
        other => panic!("unexpected error: {other:?}"),
    }

    let context = user_friendly_error(err);
    assert!(context.suggestion.unwrap().contains("TOML syntax"));
    Ok(())
}

#[tokio::test]
async fn test_explicit_config_path_is_used() -> Result<()> {
    let project = TestProject::new()?;
    project.create_template("config/site.toml", "[namespaces]\nui = \"../components\"\n")?;

    let config =
        load_project_config(Some(Path::new("config/site.toml")), project.path(), &ConfigOverrides::default())
            .await?;

    assert_eq!(config.root, project.join("config"));
    assert_eq!(config.namespaces.get("ui"), Some(project.join("components").as_path()));
    Ok(())
}
