//! Providers that supply function definitions to the registry builder.

use crate::function::{FunctionDefinition, RegistryBuilder, RegistryResult};

/// A source of function definitions discovered at startup.
///
/// The registry does not know how a provider produced its definitions;
/// compiled-in catalogs, feature-gated tool sets and test fixtures are all
/// providers.
///
/// # Object Safety
///
/// This trait is object-safe and can be used with `dyn DefinitionProvider`.
///
/// # Example
///
/// ```
/// use schemachat::function::{
///     DefinitionProvider, FunctionDefinition, RegistryBuilder, RegistryResult,
/// };
/// use schemachat::tools::Lint;
///
/// struct LintOnly;
///
/// impl DefinitionProvider for LintOnly {
///     fn name(&self) -> &str {
///         "lint-only"
///     }
///
///     fn discover(&self) -> RegistryResult<Vec<FunctionDefinition>> {
///         Ok(vec![FunctionDefinition::of::<Lint>()])
///     }
/// }
///
/// let mut builder = RegistryBuilder::new();
/// assert_eq!(LintOnly.register_all(&mut builder).unwrap(), 1);
/// let registry = builder.build().unwrap();
/// assert!(registry.has("lint"));
/// ```
pub trait DefinitionProvider {
	/// Short name used in logs.
	fn name(&self) -> &str;

	/// Enumerate the definitions this provider offers.
	fn discover(&self) -> RegistryResult<Vec<FunctionDefinition>>;

	/// Add every discovered definition to a builder.
	///
	/// Returns the number of definitions added. Duplicate names are
	/// reported when the builder is built, not here.
	fn register_all(&self, builder: &mut RegistryBuilder) -> RegistryResult<usize> {
		let definitions = self.discover()?;
		let count = definitions.len();
		tracing::debug!(provider = self.name(), count, "Discovered function definitions");
		builder.register_all(definitions);
		Ok(count)
	}
}

/// A provider that returns a fixed list of definitions.
///
/// # Example
///
/// ```
/// use schemachat::function::{DefinitionProvider, FunctionDefinition, StaticProvider};
/// use schemachat::tools::{Lint, List};
///
/// let provider = StaticProvider::new(
///     "static",
///     vec![FunctionDefinition::of::<List>(), FunctionDefinition::of::<Lint>()],
/// );
/// assert_eq!(provider.discover().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct StaticProvider {
	name: String,
	definitions: Vec<FunctionDefinition>,
}

impl StaticProvider {
	/// Create a provider over the given definitions.
	pub fn new(name: impl Into<String>, definitions: Vec<FunctionDefinition>) -> Self {
		Self {
			name: name.into(),
			definitions,
		}
	}

	/// Create a provider with no definitions.
	pub fn empty(name: impl Into<String>) -> Self {
		Self::new(name, Vec::new())
	}

	/// Add a definition.
	pub fn add(&mut self, definition: FunctionDefinition) {
		self.definitions.push(definition);
	}

	/// Add a definition, builder style.
	pub fn with(mut self, definition: FunctionDefinition) -> Self {
		self.add(definition);
		self
	}

	/// Number of definitions.
	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	/// Whether the provider offers nothing.
	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

impl DefinitionProvider for StaticProvider {
	fn name(&self) -> &str {
		&self.name
	}

	fn discover(&self) -> RegistryResult<Vec<FunctionDefinition>> {
		Ok(self.definitions.clone())
	}
}
