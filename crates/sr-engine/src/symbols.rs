//! Symbol definitions

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Symbol identifier, 0..N-1
pub type SymbolId = u32;

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: SymbolId,
    /// Display name
    pub name: String,
    /// Opaque display payload (texture key)
    pub asset: String,
}

impl Symbol {
    pub fn new(id: SymbolId, name: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            asset: asset.into(),
        }
    }
}

/// Immutable, fixed-size symbol catalog
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
}

impl SymbolCatalog {
    /// Catalog of `count` symbols named `SYM1..SYMn` with assets `1.png..n.png`
    pub fn numbered(count: u32) -> Self {
        let symbols = (0..count)
            .map(|id| Symbol::new(id, format!("SYM{}", id + 1), format!("{}.png", id + 1)))
            .collect();
        Self { symbols }
    }

    /// The 15-symbol reference catalog
    pub fn standard() -> Self {
        Self::numbered(15)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Get symbol by ID
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Uniformly drawn symbol ID
    pub fn random_id<R: Rng + ?Sized>(&self, rng: &mut R) -> SymbolId {
        if self.symbols.is_empty() {
            return 0;
        }
        rng.random_range(0..self.symbols.len()) as SymbolId
    }
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_standard_catalog() {
        let catalog = SymbolCatalog::standard();
        assert_eq!(catalog.len(), 15);
        assert_eq!(catalog.get(0).map(|s| s.name.as_str()), Some("SYM1"));
        assert_eq!(catalog.get(14).map(|s| s.asset.as_str()), Some("15.png"));
        assert!(catalog.get(15).is_none());
    }

    #[test]
    fn test_random_ids_in_range() {
        let catalog = SymbolCatalog::numbered(4);
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let id = catalog.random_id(&mut rng);
            assert!(id < 4);
            seen[id as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
