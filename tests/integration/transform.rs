//! Transform hook against templates on disk.

use anyhow::Result;
use twig_loader::test_utils::TestProject;
use twig_loader::transform::Transformer;

use crate::common::create_site;

#[tokio::test]
async fn test_transform_site_page() -> Result<()> {
    let project = TestProject::new()?;
    create_site(&project)?;
    let transformer = Transformer::new(project.config().await?);

    let page = project.join("src/pages/home.twig");
    let source = project.read_file("src/pages/home.twig")?;
    let output = transformer.transform(&source, &page).await?.expect("template output");

    assert_eq!(
        output.dependencies,
        vec![
            project.join("src/layouts/base.twig"),
            project.join("src/macros/forms.twig"),
            project.join("src/components/card.twig"),
            project.join("src/components/icon.twig"),
        ]
    );
    assert!(output.warnings.is_empty());

    let base = format!("from \"{}\";", project.join("src/layouts/base.twig").display());
    let icon = format!("from \"{}\";", project.join("src/components/icon.twig").display());
    let base_at = output.code.find(&base).expect("base import");
    let icon_at = output.code.find(&icon).expect("icon import");
    assert!(base_at < icon_at);
    assert!(output.code.contains("\"id\":\"src/pages/home.twig\""));
    assert!(output.code.contains("\"layouts\":\"src/layouts\""));
    Ok(())
}

#[tokio::test]
async fn test_transform_leaf_template() -> Result<()> {
    let project = TestProject::new()?;
    create_site(&project)?;
    let transformer = Transformer::new(project.config().await?);

    let icon = project.join("src/components/icon.twig");
    let output = transformer.transform("<svg></svg>\n", &icon).await?.expect("template output");

    assert!(output.dependencies.is_empty());
    assert!(!output.code.contains("__twig_dep_"));
    assert!(output.code.contains("\"id\":\"@ui/icon.twig\""));
    Ok(())
}

#[tokio::test]
async fn test_other_files_pass_through() -> Result<()> {
    let project = TestProject::new()?;
    let transformer = Transformer::new(project.config().await?);

    let output = transformer.transform("export default 1;", &project.join("src/main.js")).await?;
    assert!(output.is_none());
    Ok(())
}

#[tokio::test]
async fn test_changed_dependency_is_picked_up() -> Result<()> {
    let project = TestProject::new()?;
    project.create_template("page.twig", "{% include './part.twig' %}")?;
    project.create_template("part.twig", "plain")?;
    let transformer = Transformer::new(project.config().await?);
    let page = project.join("page.twig");

    let first = transformer.transform("{% include './part.twig' %}", &page).await?.expect("output");
    assert_eq!(first.dependencies.len(), 1);

    project.create_template("part.twig", "{% include './nested.twig' %}")?;
    project.create_template("nested.twig", "nested")?;

    let second = transformer.transform("{% include './part.twig' %}", &page).await?.expect("output");
    assert_eq!(second.dependencies, vec![project.join("part.twig"), project.join("nested.twig")]);
    Ok(())
}

#[tokio::test]
async fn test_self_referencing_templates() -> Result<()> {
    let project = TestProject::new()?;
    project.create_template("a.twig", "{% include './b.twig' %}{% import _self as me %}")?;
    project.create_template("b.twig", "{% include './a.twig' %}")?;
    let transformer = Transformer::new(project.config().await?);

    let order = transformer.resolve_dependencies(&project.join("a.twig")).await?;
    assert_eq!(order.paths(), vec![project.join("b.twig")]);
    assert_eq!(order.graph.cycles().len(), 1);
    Ok(())
}
