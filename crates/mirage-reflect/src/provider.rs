use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::info::ClassInfo;

/// Resolves binary class names to reflection metadata.
pub trait TypeProvider: Send + Sync {
    fn lookup_type(&self, binary_name: &str) -> Option<Arc<ClassInfo>>;
}

impl<P: TypeProvider + ?Sized> TypeProvider for Arc<P> {
    fn lookup_type(&self, binary_name: &str) -> Option<Arc<ClassInfo>> {
        (**self).lookup_type(binary_name)
    }
}

/// Resolves a source-level qualified name (`java.util.Map.Entry`).
///
/// The name is first tried as a binary name. When `nested_fallback` is set, the trailing `.`
/// separators are then replaced with `$` one at a time, from the right, until the provider
/// recognizes the name.
pub fn lookup_qualified(
    provider: &dyn TypeProvider,
    qualified_name: &str,
    nested_fallback: bool,
) -> Option<Arc<ClassInfo>> {
    if let Some(info) = provider.lookup_type(qualified_name) {
        return Some(info);
    }
    if !nested_fallback {
        return None;
    }

    let mut candidate = qualified_name.to_string();
    while let Some(idx) = candidate.rfind('.') {
        candidate.replace_range(idx..idx + 1, "$");
        if let Some(info) = provider.lookup_type(&candidate) {
            return Some(info);
        }
    }
    None
}

/// An in-memory provider keyed by binary name.
#[derive(Debug, Default, Clone)]
pub struct MapTypeProvider {
    types: HashMap<String, Arc<ClassInfo>>,
}

impl MapTypeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) a descriptor and returns the shared handle.
    pub fn insert(&mut self, info: ClassInfo) -> Arc<ClassInfo> {
        let info = Arc::new(info);
        self.types.insert(info.binary_name.clone(), info.clone());
        info
    }

    pub fn with(mut self, info: ClassInfo) -> Self {
        self.insert(info);
        self
    }

    pub fn extend(&mut self, other: &MapTypeProvider) {
        for (name, info) in &other.types {
            self.types.insert(name.clone(), info.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl TypeProvider for MapTypeProvider {
    fn lookup_type(&self, binary_name: &str) -> Option<Arc<ClassInfo>> {
        self.types.get(binary_name).cloned()
    }
}

/// Consults several providers in order; the first hit wins.
#[derive(Default)]
pub struct ChainedProvider {
    providers: Vec<Arc<dyn TypeProvider>>,
}

impl ChainedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, provider: Arc<dyn TypeProvider>) -> Self {
        self.providers.push(provider);
        self
    }
}

impl TypeProvider for ChainedProvider {
    fn lookup_type(&self, binary_name: &str) -> Option<Arc<ClassInfo>> {
        self.providers
            .iter()
            .find_map(|provider| provider.lookup_type(binary_name))
    }
}

/// A provider loaded from a JSON descriptor pack (an array of [`ClassInfo`] objects).
#[derive(Debug, Default, Clone)]
pub struct JsonTypeProvider {
    inner: MapTypeProvider,
}

impl JsonTypeProvider {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let infos: Vec<ClassInfo> = serde_json::from_str(json)?;
        Ok(Self::from_infos(infos))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let infos: Vec<ClassInfo> = serde_json::from_reader(reader)?;
        Ok(Self::from_infos(infos))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let provider = Self::from_reader(std::io::BufReader::new(file))?;
        tracing::debug!(
            target: "mirage.reflect",
            path = %path.display(),
            types = provider.inner.len(),
            "loaded descriptor pack"
        );
        Ok(provider)
    }

    fn from_infos(infos: Vec<ClassInfo>) -> Self {
        let mut inner = MapTypeProvider::new();
        for info in infos {
            inner.insert(info);
        }
        Self { inner }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl TypeProvider for JsonTypeProvider {
    fn lookup_type(&self, binary_name: &str) -> Option<Arc<ClassInfo>> {
        self.inner.lookup_type(binary_name)
    }
}
