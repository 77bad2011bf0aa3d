//! Built-in aggregate functions

pub mod math;

use crate::error::FormulaResult;
use crate::value::ValueList;
use ahash::AHashMap;
use std::sync::OnceLock;

/// Function implementation signature
///
/// Receives every argument flattened into one list, ranges expanded in row-major order and
/// arguments kept in source order. Range cells outside the grid arrive as implicit zeros.
pub type FunctionImpl = fn(&ValueList) -> FormulaResult<f64>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

/// Function registry
pub struct FunctionRegistry {
    functions: AHashMap<String, FunctionDef>,
}

/// Built-in registry, built on first use
static BUILTIN_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

impl FunctionRegistry {
    /// Create a registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_math_functions();
        registry
    }

    /// Create a registry with no functions
    pub fn empty() -> Self {
        Self {
            functions: AHashMap::new(),
        }
    }

    /// Shared registry of the built-in functions
    pub fn builtin() -> &'static FunctionRegistry {
        BUILTIN_REGISTRY.get_or_init(FunctionRegistry::new)
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Register a function, replacing any previous definition with the same name
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_uppercase(), def);
    }

    /// Names of all registered functions, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.values().map(|def| def.name).collect();
        names.sort_unstable();
        names
    }

    fn register_math_functions(&mut self) {
        // SUM
        self.register(FunctionDef {
            name: "SUM",
            min_args: 0,
            max_args: None,
            implementation: math::fn_sum,
        });

        // AVERAGE
        self.register(FunctionDef {
            name: "AVERAGE",
            min_args: 0,
            max_args: None,
            implementation: math::fn_average,
        });

        // MIN
        self.register(FunctionDef {
            name: "MIN",
            min_args: 0,
            max_args: None,
            implementation: math::fn_min,
        });

        // MAX
        self.register(FunctionDef {
            name: "MAX",
            min_args: 0,
            max_args: None,
            implementation: math::fn_max,
        });

        // COUNT
        self.register(FunctionDef {
            name: "COUNT",
            min_args: 0,
            max_args: None,
            implementation: math::fn_count,
        });
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_names() {
        assert_eq!(
            FunctionRegistry::builtin().names(),
            vec!["AVERAGE", "COUNT", "MAX", "MIN", "SUM"]
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = FunctionRegistry::new();
        assert!(registry.get("sum").is_some());
        assert!(registry.get("Average").is_some());
        assert!(registry.get("CONCAT").is_none());
    }

    #[test]
    fn test_register_custom_function() {
        fn fn_product(args: &ValueList) -> FormulaResult<f64> {
            if args.zeros() > 0 {
                return Ok(0.0);
            }
            Ok(args.values().iter().product())
        }

        let mut registry = FunctionRegistry::empty();
        registry.register(FunctionDef {
            name: "PRODUCT",
            min_args: 1,
            max_args: None,
            implementation: fn_product,
        });

        let def = registry.get("PRODUCT").unwrap();
        let args = ValueList::new(vec![2.0, 3.0, 4.0]);
        assert_eq!((def.implementation)(&args).unwrap(), 24.0);
        assert!(registry.get("SUM").is_none());
    }
}
