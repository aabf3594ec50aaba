//! `twig-loader build`

use anyhow::Result;
use twig_loader::test_utils::TestProject;

use crate::common::{create_site, run_loader};

#[test]
fn test_build_compiles_every_template() -> Result<()> {
    let project = TestProject::new()?;
    create_site(&project)?;
    project.create_template("src/readme.md", "# not a template")?;

    let output = run_loader(&project, &["build", "src", "--out-dir", "dist"])?;
    output.assert_success().assert_stdout_contains("Compiled 5 templates into");

    for module in [
        "dist/pages/home.twig.js",
        "dist/layouts/base.twig.js",
        "dist/macros/forms.twig.js",
        "dist/components/card.twig.js",
        "dist/components/icon.twig.js",
    ] {
        assert!(project.file_exists(module), "missing {module}");
    }
    assert!(!project.file_exists("dist/readme.md.js"));
    Ok(())
}

#[test]
fn test_built_modules_import_compiled_siblings() -> Result<()> {
    let project = TestProject::new()?;
    create_site(&project)?;

    run_loader(&project, &["build", "src", "-o", "dist"])?.assert_success();

    let home = project.read_file("dist/pages/home.twig.js")?;
    assert!(home.contains("from \"../layouts/base.twig.js\";"));
    assert!(home.contains("from \"../macros/forms.twig.js\";"));
    assert!(home.contains("from \"../components/icon.twig.js\";"));

    let card = project.read_file("dist/components/card.twig.js")?;
    assert!(card.contains("from \"./icon.twig.js\";"));
    Ok(())
}

#[test]
fn test_build_reports_warnings() -> Result<()> {
    let project = TestProject::new()?;
    project.create_template("src/page.twig", "{% include './gone.twig' ignore missing %}")?;

    let output = run_loader(&project, &["-q", "build", "src", "-o", "out"])?;
    output
        .assert_success()
        .assert_stdout_contains("Compiled 1 template into")
        .assert_stdout_contains("(1 warnings)");
    Ok(())
}
