//! Go import collection.

use indexmap::IndexSet;

/// Deduplicated Go imports in first-reference order.
///
/// # Example
///
/// ```
/// use svcgen::generation::ImportSet;
///
/// let mut imports = ImportSet::new();
/// imports.add("greet/internal/svc");
/// imports.add("context");
/// imports.add("greet/internal/svc");
///
/// assert_eq!(imports.quoted(), ["\"greet/internal/svc\"", "\"context\""]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    imports: IndexSet<String>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import path; repeated paths keep their first position
    pub fn add(&mut self, path: impl Into<String>) -> &mut Self {
        self.imports.insert(path.into());
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.imports.contains(path)
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    /// Import paths as Go string literals, ready for an `import ( ... )` block
    pub fn quoted(&self) -> Vec<String> {
        self.imports.iter().map(|path| format!("\"{path}\"")).collect()
    }
}

/// Join a Go module path and a slash-separated directory into a package path
pub fn join_package(module: &str, dir: &str) -> String {
    let module = module.trim().trim_end_matches('/');
    let dir = dir.trim().trim_matches('/');
    match (module.is_empty(), dir.is_empty()) {
        (true, _) => dir.to_string(),
        (false, true) => module.to_string(),
        (false, false) => format!("{module}/{dir}"),
    }
}
