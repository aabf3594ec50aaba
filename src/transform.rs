//! The transform hook exposed to build tools.
//!
//! A bundler plugin hands every module it loads to [`Transformer::transform`].
//! Files without a configured template extension pass through (`None`);
//! templates come back as JavaScript along with the dependency files the
//! bundler should watch.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ProjectConfig;
use crate::constants::OUTPUT_EXTENSION;
use crate::core::LoaderError;
use crate::emitter::{CompileUnit, ModuleCompiler, TwigJsCompiler, template_id};
use crate::resolver::{
    DependencyGraphBuilder, DependencyLoader, DependencyOrder, FsLoader, PathResolver,
    ResolutionWarning,
};
use crate::twig::{TemplateEngine, TwigEngine};
use crate::utils::{diff_paths, normalize_path, relative_to, to_forward_slashes};

/// Result of transforming one template.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Generated module source.
    pub code: String,
    /// Every template the entry depends on, in import order.
    pub dependencies: Vec<PathBuf>,
    pub warnings: Vec<ResolutionWarning>,
}

/// Where compiled modules are written when templates are compiled ahead of
/// time instead of inside a bundler.
///
/// With a layout set, a dependency inside `src_dir` is imported from its
/// compiled module (`./nav.twig.js`) rather than from its template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub src_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(src_dir: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Self {
        Self {
            src_dir: normalize_path(src_dir.as_ref()),
            out_dir: normalize_path(out_dir.as_ref()),
        }
    }

    /// Compiled module path of `template`, if it lies inside `src_dir`
    /// (`pages/home.twig` becomes `pages/home.twig.js`).
    pub fn output_path(&self, template: &Path) -> Option<PathBuf> {
        let mut name = relative_to(&normalize_path(template), &self.src_dir)?.into_os_string();
        name.push(".");
        name.push(OUTPUT_EXTENSION);
        Some(self.out_dir.join(name))
    }
}

/// Compiles templates of one project into modules.
pub struct Transformer<E = TwigEngine, L = FsLoader, C = TwigJsCompiler> {
    config: ProjectConfig,
    resolver: PathResolver,
    output_layout: Option<OutputLayout>,
    engine: E,
    loader: L,
    compiler: C,
}

impl Transformer {
    /// A transformer reading templates from disk.
    pub fn new(config: ProjectConfig) -> Self {
        Self::with_parts(config, TwigEngine, FsLoader, TwigJsCompiler)
    }
}

impl<E, L, C> Transformer<E, L, C>
where
    E: TemplateEngine,
    L: DependencyLoader,
    C: ModuleCompiler,
{
    pub fn with_parts(config: ProjectConfig, engine: E, loader: L, compiler: C) -> Self {
        let resolver = PathResolver::new(config.namespaces.clone(), config.root.clone());
        Self {
            config,
            resolver,
            output_layout: None,
            engine,
            loader,
            compiler,
        }
    }

    /// Import dependencies from their compiled modules under `layout`.
    #[must_use]
    pub fn with_output_layout(mut self, layout: OutputLayout) -> Self {
        self.output_layout = Some(layout);
        self
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Whether `path` is a template this transformer compiles.
    pub fn handles(&self, path: &Path) -> bool {
        self.config.is_template(path)
    }

    /// Compiles the template `source` found at `path`.
    ///
    /// Returns `Ok(None)` for files that are not templates.
    ///
    /// # Errors
    ///
    /// Fails when the template does not parse, when a dependency cannot be
    /// read, or when module generation fails.
    pub async fn transform(&self, source: &str, path: &Path) -> Result<Option<TransformOutput>> {
        if !self.handles(path) {
            return Ok(None);
        }

        let path = self.absolute(path);
        let order = self.resolve_source(source, &path).await?;
        let dependencies = order.paths();
        let imports: Vec<String> =
            dependencies.iter().map(|dep| self.import_specifier(&path, dep)).collect();

        let unit = CompileUnit {
            path: &path,
            template_id: template_id(&path, &self.config.namespaces, &self.config.root),
            source,
            dependencies: &imports,
            namespaces: &self.config.namespaces,
            root: &self.config.root,
            twig_options: &self.config.twig_options,
            runtime_module: &self.config.runtime_module,
        };
        let code = self.compiler.compile(&unit)?;

        info!("Compiled {} ({} dependencies)", path.display(), dependencies.len());

        Ok(Some(TransformOutput {
            code,
            dependencies,
            warnings: order.warnings,
        }))
    }

    /// Runs the dependency pass for the template at `path`, loading its
    /// source through the configured loader.
    pub async fn resolve_dependencies(&self, path: &Path) -> Result<DependencyOrder> {
        let path = self.absolute(path);
        let source = self
            .loader
            .load(&path)
            .await
            .with_context(|| format!("Failed to read template: {}", path.display()))?;
        self.resolve_source(&source, &path).await
    }

    async fn resolve_source(&self, source: &str, path: &Path) -> Result<DependencyOrder> {
        let tokens = self.engine.parse(source).map_err(|e| LoaderError::TemplateSyntax {
            path: path.to_path_buf(),
            line: e.line,
            message: e.message,
        })?;

        debug!("Parsed {} into {} top-level tokens", path.display(), tokens.len());

        let order = DependencyGraphBuilder::new(&self.resolver, &self.engine, &self.loader)
            .with_max_concurrent_loads(self.config.max_concurrent_loads)
            .build(path, &tokens)
            .await
            .with_context(|| format!("Failed to resolve dependencies of {}", path.display()))?;

        Ok(order)
    }

    /// How the module of `entry` imports the module of `dependency`.
    fn import_specifier(&self, entry: &Path, dependency: &Path) -> String {
        let compiled = self.output_layout.as_ref().and_then(|layout| {
            let from = layout.output_path(entry)?;
            let to = layout.output_path(dependency)?;
            diff_paths(&to, from.parent()?)
        });

        match compiled {
            Some(relative) => {
                let relative = to_forward_slashes(&relative);
                if relative.starts_with("../") {
                    relative
                } else {
                    format!("./{relative}")
                }
            }
            None => to_forward_slashes(dependency),
        }
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        normalize_path(&self.config.root.join(path))
    }
}
