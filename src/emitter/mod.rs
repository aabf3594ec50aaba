//! JavaScript module generation.
//!
//! A compiled template is an ES module that:
//!
//! - imports the Twig runtime,
//! - imports `registerTemplate` from the module of every dependency, in
//!   dependency order, so the bundler tracks each dependency file,
//! - exports `registerTemplate()`, which registers the dependencies and then
//!   the template itself with the runtime (once; re-entrant calls through a
//!   reference cycle are no-ops),
//! - exports a default `render(context)` that returns the rendered text, or
//!   an inline error block if rendering throws.
//!
//! Generation goes through the [`ModuleCompiler`] strategy so a build can
//! swap in a different output format.

pub mod template_id;

pub use template_id::template_id;

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tera::{Context as TeraContext, Tera};
use tracing::debug;

use crate::constants::{DEFAULT_RUNTIME_MODULE, DEPENDENCY_IMPORT_PREFIX};
use crate::core::LoaderError;
use crate::resolver::NamespaceTable;
use crate::utils::{normalize_path, relative_to, to_forward_slashes};

const MODULE_TEMPLATE: &str = include_str!("module.js.tera");

/// Everything needed to generate the module of one entry template.
#[derive(Debug, Clone)]
pub struct CompileUnit<'a> {
    /// Entry template path.
    pub path: &'a Path,
    /// Runtime id of the entry, see [`template_id`].
    pub template_id: String,
    /// Entry template source, inlined into the module.
    pub source: &'a str,
    /// Import specifiers of the dependency modules, in dependency order.
    pub dependencies: &'a [String],
    pub namespaces: &'a NamespaceTable,
    pub root: &'a Path,
    /// Extra options passed to `Twig.twig()`.
    pub twig_options: &'a Map<String, Value>,
    /// Module the runtime is imported from.
    pub runtime_module: &'a str,
}

/// Turns a [`CompileUnit`] into module source.
pub trait ModuleCompiler: Send + Sync {
    fn compile(&self, unit: &CompileUnit<'_>) -> Result<String, LoaderError>;
}

/// Generates ES modules for the `twig` npm runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwigJsCompiler;

#[derive(Serialize)]
struct DependencyImport {
    binding: String,
    specifier: String,
}

impl TwigJsCompiler {
    /// The object passed to `Twig.twig()`.
    ///
    /// `allowInlineIncludes` defaults to on and can be overridden by the user
    /// options; `rethrow`, `id`, `data` and `namespaces` always win.
    pub fn twig_options(unit: &CompileUnit<'_>) -> Map<String, Value> {
        let mut options = Map::new();
        options.insert("allowInlineIncludes".to_string(), Value::Bool(true));
        for (key, value) in unit.twig_options {
            options.insert(key.clone(), value.clone());
        }
        options.insert("rethrow".to_string(), Value::Bool(true));
        options.insert("id".to_string(), Value::String(unit.template_id.clone()));
        options.insert("data".to_string(), Value::String(unit.source.to_string()));

        let root = normalize_path(unit.root);
        let namespaces: Map<String, Value> = unit
            .namespaces
            .iter()
            .map(|ns| {
                let dir = normalize_path(&ns.dir);
                let dir = relative_to(&dir, &root).unwrap_or(dir);
                (ns.name.clone(), Value::String(to_forward_slashes(&dir)))
            })
            .collect();
        options.insert("namespaces".to_string(), Value::Object(namespaces));

        options
    }
}

impl ModuleCompiler for TwigJsCompiler {
    fn compile(&self, unit: &CompileUnit<'_>) -> Result<String, LoaderError> {
        let compile_error = |reason: String| LoaderError::ModuleCompilation {
            path: unit.path.to_path_buf(),
            reason,
        };
        let js_string = |text: &str| {
            serde_json::to_string(text).map_err(|e| compile_error(e.to_string()))
        };

        let runtime_module = if unit.runtime_module.is_empty() {
            DEFAULT_RUNTIME_MODULE
        } else {
            unit.runtime_module
        };

        let dependencies = unit
            .dependencies
            .iter()
            .enumerate()
            .map(|(index, specifier)| -> Result<DependencyImport, LoaderError> {
                Ok(DependencyImport {
                    binding: format!("{DEPENDENCY_IMPORT_PREFIX}{index}"),
                    specifier: js_string(specifier)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let options = serde_json::to_string(&Self::twig_options(unit))
            .map_err(|e| compile_error(e.to_string()))?;
        let display_path = to_forward_slashes(unit.path);

        let mut context = TeraContext::new();
        context.insert("runtime_module", &js_string(runtime_module)?);
        context.insert("dependencies", &dependencies);
        context.insert("options", &options);
        context.insert("path", &js_string(&display_path)?);
        context.insert(
            "error_label",
            &js_string(&format!("Error rendering Twig template: in {display_path}"))?,
        );

        let code = Tera::one_off(MODULE_TEMPLATE, &context, false)
            .map_err(|e| compile_error(format!("{e:?}")))?;

        debug!("Generated module for {} with {} imports", display_path, dependencies.len());
        Ok(code)
    }
}
