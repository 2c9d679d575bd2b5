use std::sync::Arc;

use log::warn;
use rustc_hash::FxHashMap;

use crate::structures::poly::{PolyId, Polynomial};
use crate::structures::sturm::SturmChain;

/// How a chain lookup was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    Hit,
    Miss,
    /// Another polynomial already owns the id; the chain was built uncached.
    Collision,
}

/// Sturm chains keyed by polynomial content.
///
/// Entries are verified against the stored polynomial on every hit, so a
/// hash collision costs a rebuild but never returns a foreign chain.
#[derive(Debug, Default)]
pub(crate) struct ChainCache {
    chains: FxHashMap<PolyId, Arc<SturmChain>>,
}

impl ChainCache {
    pub(crate) fn get_or_build(&mut self, p: &Polynomial) -> (Arc<SturmChain>, Lookup) {
        let id = p.id();

        if let Some(chain) = self.chains.get(&id) {
            if chain.polynomial() == p {
                return (Arc::clone(chain), Lookup::Hit);
            }
            warn!(
                "chain cache collision on id {:#x}: cached {} vs requested {}",
                id.value(),
                chain.polynomial(),
                p
            );
            return (Arc::new(SturmChain::new(p)), Lookup::Collision);
        }

        let chain = Arc::new(SturmChain::new(p));
        self.chains.insert(id, Arc::clone(&chain));
        (chain, Lookup::Miss)
    }

    pub(crate) fn len(&self) -> usize {
        self.chains.len()
    }

    pub(crate) fn clear(&mut self) {
        self.chains.clear();
    }
}
