//! The function definition registry and its process-wide instance.

use crate::function::{
	DefinitionProvider, FunctionDefinition, RegistryError, RegistryResult, ReturnKind,
	ToolSpecification,
};
use crate::function::dispatch::panic_message;
use once_cell::sync::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::panic::{self, AssertUnwindSafe};

static REGISTRY: OnceCell<FunctionDefinitionRegistry> = OnceCell::new();

/// A definition together with its derived specification.
#[derive(Debug, Clone)]
pub struct RegisteredFunction {
	definition: FunctionDefinition,
	specification: ToolSpecification,
}

impl RegisteredFunction {
	/// The definition.
	pub fn definition(&self) -> &FunctionDefinition {
		&self.definition
	}

	/// The specification derived at build time.
	pub fn specification(&self) -> &ToolSpecification {
		&self.specification
	}
}

/// A read-only index of function definitions by name and by return kind.
///
/// Built once from the discovered definitions. Specifications are derived
/// during the build, so a parameter shape that cannot be advertised fails
/// the build instead of a later call.
///
/// # Example
///
/// ```
/// use schemachat::function::{FunctionDefinition, FunctionDefinitionRegistry, ReturnKind};
/// use schemachat::tools::{DescribeTables, Lint, List};
///
/// let registry = FunctionDefinitionRegistry::build(vec![
///     FunctionDefinition::of::<List>(),
///     FunctionDefinition::of::<Lint>(),
///     FunctionDefinition::of::<DescribeTables>(),
/// ])
/// .unwrap();
///
/// let text: Vec<_> = registry
///     .list_by_return_kind(ReturnKind::Text)
///     .iter()
///     .map(|def| def.name())
///     .collect();
/// assert_eq!(text, vec!["lint", "list"]);
/// assert!(registry.has("describe-tables"));
/// assert!(registry.lookup("describe-views").is_none());
/// ```
#[derive(Debug, Default)]
pub struct FunctionDefinitionRegistry {
	functions: BTreeMap<String, RegisteredFunction>,
	by_return_kind: BTreeMap<ReturnKind, Vec<String>>,
}

impl FunctionDefinitionRegistry {
	/// Create a registry with no functions.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Start collecting definitions.
	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::new()
	}

	/// Build a registry from definitions.
	///
	/// Fails on duplicate names, invalid definitions, and parameter shapes
	/// that cannot be turned into a specification.
	pub fn build(definitions: impl IntoIterator<Item = FunctionDefinition>) -> RegistryResult<Self> {
		let mut builder = RegistryBuilder::new();
		builder.register_all(definitions);
		builder.build()
	}

	/// Look up a definition by name.
	pub fn lookup(&self, name: &str) -> Option<&FunctionDefinition> {
		self.functions.get(name).map(RegisteredFunction::definition)
	}

	/// Look up a definition and its specification.
	pub fn get(&self, name: &str) -> Option<&RegisteredFunction> {
		self.functions.get(name)
	}

	/// Check if a function is registered.
	pub fn has(&self, name: &str) -> bool {
		self.functions.contains_key(name)
	}

	/// All definitions, ordered by name.
	pub fn list(&self) -> Vec<&FunctionDefinition> {
		self.functions.values().map(RegisteredFunction::definition).collect()
	}

	/// Definitions of one return kind, ordered by name.
	pub fn list_by_return_kind(&self, kind: ReturnKind) -> Vec<&FunctionDefinition> {
		self.names_of(kind).filter_map(|name| self.lookup(name)).collect()
	}

	/// All registered names, ordered.
	pub fn names(&self) -> Vec<&str> {
		self.functions.keys().map(String::as_str).collect()
	}

	/// Number of registered functions.
	pub fn len(&self) -> usize {
		self.functions.len()
	}

	/// Whether no functions are registered.
	pub fn is_empty(&self) -> bool {
		self.functions.is_empty()
	}

	/// The cached specification of one function.
	pub fn specification(&self, name: &str) -> Option<&ToolSpecification> {
		self.functions.get(name).map(RegisteredFunction::specification)
	}

	/// All specifications, ordered by name.
	pub fn specifications(&self) -> Vec<&ToolSpecification> {
		self.functions.values().map(RegisteredFunction::specification).collect()
	}

	/// Specifications of one return kind, ordered by name.
	pub fn specifications_by_return_kind(&self, kind: ReturnKind) -> Vec<&ToolSpecification> {
		self.names_of(kind)
			.filter_map(|name| self.specification(name))
			.collect()
	}

	fn names_of(&self, kind: ReturnKind) -> impl Iterator<Item = &str> {
		self.by_return_kind
			.get(&kind)
			.into_iter()
			.flatten()
			.map(String::as_str)
	}
}

/// Collects definitions and builds a [`FunctionDefinitionRegistry`].
///
/// Disabled names and a return-kind restriction are applied after every
/// provider has been discovered, and after duplicate detection.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
	definitions: Vec<FunctionDefinition>,
	disabled: BTreeSet<String>,
	return_kind: Option<ReturnKind>,
}

impl RegistryBuilder {
	/// Create an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add one definition.
	pub fn register(&mut self, definition: FunctionDefinition) -> &mut Self {
		self.definitions.push(definition);
		self
	}

	/// Add several definitions.
	pub fn register_all(&mut self, definitions: impl IntoIterator<Item = FunctionDefinition>) -> &mut Self {
		self.definitions.extend(definitions);
		self
	}

	/// Discover and add the definitions of a provider.
	pub fn provider(&mut self, provider: &dyn DefinitionProvider) -> RegistryResult<&mut Self> {
		provider.register_all(self)?;
		Ok(self)
	}

	/// Leave a function out of the built registry.
	pub fn disable(&mut self, name: impl Into<String>) -> &mut Self {
		self.disabled.insert(name.into());
		self
	}

	/// Keep only functions of one return kind.
	pub fn only_return_kind(&mut self, kind: ReturnKind) -> &mut Self {
		self.return_kind = Some(kind);
		self
	}

	/// Number of definitions collected so far.
	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	/// Whether nothing has been collected.
	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}

	/// Validate every definition and build the registry.
	pub fn build(self) -> RegistryResult<FunctionDefinitionRegistry> {
		let mut seen = BTreeSet::new();
		for definition in &self.definitions {
			if !seen.insert(definition.name()) {
				return Err(RegistryError::duplicate_name(definition.name()));
			}
		}

		let mut registry = FunctionDefinitionRegistry::empty();
		for definition in self.definitions {
			if self.disabled.contains(definition.name()) {
				tracing::debug!(function = definition.name(), "Function disabled");
				continue;
			}
			if self.return_kind.is_some_and(|kind| kind != definition.return_kind()) {
				continue;
			}

			definition.validate()?;
			check_factory(&definition)?;
			let specification = ToolSpecification::from_definition(&definition)?;
			let name = definition.name().to_string();
			registry
				.by_return_kind
				.entry(definition.return_kind())
				.or_default()
				.push(name.clone());
			registry.functions.insert(
				name,
				RegisteredFunction {
					definition,
					specification,
				},
			);
		}
		for names in registry.by_return_kind.values_mut() {
			names.sort();
		}

		tracing::debug!(
			count = registry.len(),
			functions = ?registry.names(),
			"Function registry built"
		);
		Ok(registry)
	}
}

/// Run the executor factory once, so a factory that panics fails the build.
fn check_factory(definition: &FunctionDefinition) -> RegistryResult<()> {
	panic::catch_unwind(AssertUnwindSafe(|| definition.create_executor()))
		.map(drop)
		.map_err(|payload| {
			RegistryError::invalid_definition(
				definition.name(),
				format!("executor factory panicked: {}", panic_message(payload.as_ref())),
			)
		})
}

/// The process-wide registry of built-in tools.
///
/// Built on first access; later calls return the same instance. If
/// [`initialize_registry`] ran first, its registry is returned instead.
pub fn get_registry() -> RegistryResult<&'static FunctionDefinitionRegistry> {
	initialize_registry(&[&crate::tools::BuiltinProvider])
}

/// Build the process-wide registry from providers.
///
/// Exactly one caller builds it; concurrent callers wait for that build.
/// Once built, later calls ignore their providers and return the existing
/// registry. A failed build leaves the registry unset.
pub fn initialize_registry(
	providers: &[&dyn DefinitionProvider],
) -> RegistryResult<&'static FunctionDefinitionRegistry> {
	REGISTRY.get_or_try_init(|| {
		let mut builder = RegistryBuilder::new();
		for provider in providers {
			builder.provider(*provider)?;
		}
		builder.build()
	})
}

/// Build the process-wide registry from a prepared builder.
///
/// Behaves like [`initialize_registry`] when the registry already exists.
pub fn initialize_registry_with(
	builder: RegistryBuilder,
) -> RegistryResult<&'static FunctionDefinitionRegistry> {
	REGISTRY.get_or_try_init(|| builder.build())
}
