//! Tests for the dependency pass against templates on disk.

use anyhow::Result;
use std::path::PathBuf;
use twig_loader::core::LoaderError;
use twig_loader::resolver::{DependencyGraphBuilder, FsLoader, PathResolver, ResolutionWarning};
use twig_loader::test_utils::TestProject;
use twig_loader::twig::{TemplateEngine, TwigEngine};

async fn build_from_disk(
    project: &TestProject,
    resolver: &PathResolver,
    entry: &str,
    max_concurrent_loads: usize,
) -> Result<twig_loader::resolver::DependencyOrder, LoaderError> {
    let path = project.join(entry);
    let source = std::fs::read_to_string(&path).unwrap();
    let tokens = TwigEngine.parse(&source).unwrap();
    DependencyGraphBuilder::new(resolver, &TwigEngine, &FsLoader)
        .with_max_concurrent_loads(max_concurrent_loads)
        .build(&path, &tokens)
        .await
}

fn site(project: &TestProject) -> Result<PathResolver> {
    project.create_template(
        "pages/home.twig",
        "{% extends '@layouts/base.twig' %}{% block body %}{% include '@ui/a.twig' %}{% include '@ui/b.twig' %}{% include '@ui/c.twig' %}{% endblock %}",
    )?;
    project.create_template("layouts/base.twig", "{% include '@ui/c.twig' %}{% block body %}{% endblock %}")?;
    project.create_template("components/a.twig", "{% include './a1.twig' %}{% include './a2.twig' %}")?;
    project.create_template("components/a1.twig", "a1")?;
    project.create_template("components/a2.twig", "a2")?;
    project.create_template("components/b.twig", "b")?;
    project.create_template("components/c.twig", "c")?;

    let namespaces = [("ui", project.join("components")), ("layouts", project.join("layouts"))]
        .into_iter()
        .collect();
    Ok(PathResolver::new(namespaces, project.path()))
}

#[tokio::test]
async fn test_order_is_independent_of_concurrency() -> Result<()> {
    let project = TestProject::new()?;
    let resolver = site(&project)?;

    let expected: Vec<PathBuf> = ["layouts/base.twig", "components/c.twig", "components/a.twig", "components/a1.twig", "components/a2.twig", "components/b.twig"]
        .iter()
        .map(|p| project.join(p))
        .collect();

    for max in [1, 2, 16] {
        let order = build_from_disk(&project, &resolver, "pages/home.twig", max).await?;
        assert_eq!(order.paths(), expected, "max_concurrent_loads = {max}");
    }
    Ok(())
}

#[tokio::test]
async fn test_graph_keeps_every_edge() -> Result<()> {
    let project = TestProject::new()?;
    let resolver = site(&project)?;

    let order = build_from_disk(&project, &resolver, "pages/home.twig", 8).await?;
    let c = project.join("components/c.twig");

    assert_eq!(order.graph.node_count(), 7);
    assert!(order.graph.direct_dependencies(&project.join("layouts/base.twig")).contains(&c));
    assert!(order.graph.direct_dependencies(&order.entry).contains(&c));
    assert!(order.graph.cycles().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_file_on_disk() -> Result<()> {
    let project = TestProject::new()?;
    project.create_template("page.twig", "{% include './nope.twig' %}")?;
    let resolver = PathResolver::new(Default::default(), project.path());

    let err = build_from_disk(&project, &resolver, "page.twig", 8).await.unwrap_err();
    assert!(matches!(err, LoaderError::DependencyLoadFailure { .. }));
    assert!(err.to_string().contains("Failed to load template './nope.twig'"));
    Ok(())
}

#[tokio::test]
async fn test_broken_dependency_is_skipped_with_warning() -> Result<()> {
    let project = TestProject::new()?;
    project.create_template("page.twig", "{% include './broken.twig' %}{% include './ok.twig' %}")?;
    project.create_template("broken.twig", "{% if open %}\n{% include './never.twig' %}")?;
    project.create_template("ok.twig", "ok")?;
    let resolver = PathResolver::new(Default::default(), project.path());

    let order = build_from_disk(&project, &resolver, "page.twig", 8).await?;

    assert_eq!(order.paths(), vec![project.join("ok.twig")]);
    match order.warnings.as_slice() {
        [ResolutionWarning::DependencyProcessingFailure { path, line, .. }] => {
            assert_eq!(path, &project.join("broken.twig"));
            assert_eq!(*line, 1);
        }
        other => panic!("unexpected warnings: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_unknown_namespace_warns_once_with_suggestion() -> Result<()> {
    let project = TestProject::new()?;
    project.create_template("page.twig", "{% include '@componentz/a.twig' ignore missing %}{% include '@componentz/a.twig' ignore missing %}")?;
    let namespaces = [("components", project.join("components"))].into_iter().collect();
    let resolver = PathResolver::new(namespaces, project.path());

    let order = build_from_disk(&project, &resolver, "page.twig", 8).await?;

    let unknown: Vec<&ResolutionWarning> = order
        .warnings
        .iter()
        .filter(|w| matches!(w, ResolutionWarning::UnknownNamespace { .. }))
        .collect();
    assert_eq!(unknown.len(), 1);
    match unknown[0] {
        ResolutionWarning::UnknownNamespace { suggestion, .. } => {
            assert_eq!(suggestion.as_deref(), Some("components"));
        }
        _ => unreachable!(),
    }
    assert!(order.is_empty());
    Ok(())
}
