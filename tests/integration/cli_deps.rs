//! `twig-loader deps`

use anyhow::Result;
use serde_json::Value;
use twig_loader::test_utils::TestProject;

use crate::common::{create_site, run_loader};

#[test]
fn test_deps_tree() -> Result<()> {
    let project = TestProject::new()?;
    create_site(&project)?;

    let output = run_loader(&project, &["deps", "src/pages/home.twig"])?;
    output.assert_success();
    assert_eq!(
        output.stdout,
        concat!(
            "src/pages/home.twig\n",
            "├── @layouts/base.twig\n",
            "│   └── src/macros/forms.twig\n",
            "└── @ui/card.twig\n",
            "    └── @ui/icon.twig\n",
        )
    );
    Ok(())
}

#[test]
fn test_deps_list() -> Result<()> {
    let project = TestProject::new()?;
    create_site(&project)?;

    let output = run_loader(&project, &["deps", "src/pages/home.twig", "--format", "list"])?;
    output.assert_success();

    let lines: Vec<&str> = output.stdout.lines().collect();
    let expected: Vec<String> = ["src/layouts/base.twig", "src/macros/forms.twig", "src/components/card.twig", "src/components/icon.twig"]
        .iter()
        .map(|p| project.join(p).display().to_string())
        .collect();
    assert_eq!(lines, expected);
    Ok(())
}

#[test]
fn test_deps_json_with_cycle() -> Result<()> {
    let project = TestProject::new()?;
    project.create_template("a.twig", "{% embed './b.twig' %}{% endembed %}")?;
    project.create_template("b.twig", "{% extends './c.twig' %}")?;
    project.create_template("c.twig", "{% include './b.twig' %}{% include './empty.twig' %}")?;
    project.create_template("empty.twig", "")?;

    let output = run_loader(&project, &["-q", "deps", "a.twig", "-f", "json"])?;
    output.assert_success();

    let json: Value = serde_json::from_str(&output.stdout)?;
    let ids: Vec<&str> = json["dependencies"].as_array().unwrap().iter().map(|d| d["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["b.twig", "c.twig"]);
    assert_eq!(json["dependencies"][1]["specifier"], "./c.twig");
    assert_eq!(json["dependencies"][1]["depth"], 2);
    assert_eq!(json["warnings"][0]["kind"], "empty_dependency");
    assert_eq!(json["cycles"].as_array().unwrap().len(), 1);
    Ok(())
}
