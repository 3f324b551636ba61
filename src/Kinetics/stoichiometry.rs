//! Sparse reaction/species incidence sets.
//!
//! A [`StoichiometryManager`] keeps, for every reaction registered with it, the multiset of
//! species on one side of the reaction. The engine uses three of them (reactants,
//! reversible products, irreversible products); they differ only in what they hold.
//!
//! Storage is an arena: one flat array of (species, multiplicity) entries and one span per
//! registered reaction pointing into it. Every operation is a single sequential pass over
//! the arena, so its cost is the total incidence count, never `n_reactions * n_species`.

/// one species of a reaction side with its stoichiometric coefficient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoichEntry {
    pub species: usize,
    pub nu: u32,
}

/// location of one reaction's entries inside the arena
#[derive(Debug, Clone, Copy, PartialEq)]
struct ReactionSpan {
    reaction: usize,
    start: usize,
    len: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StoichiometryManager {
    entries: Vec<StoichEntry>,
    spans: Vec<ReactionSpan>,
}

impl StoichiometryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one side of reaction `reaction`. Repeated species indices (as in `2N`)
    /// are collapsed into a multiplicity.
    pub fn add_reaction(&mut self, reaction: usize, species: &[usize]) {
        if let Some(last) = self.spans.last() {
            assert!(
                reaction > last.reaction,
                "reactions must be added in increasing order"
            );
        }
        let start = self.entries.len();
        let mut sorted = species.to_vec();
        sorted.sort_unstable();
        for s in sorted {
            match self.entries[start..].last_mut() {
                Some(entry) if entry.species == s => entry.nu += 1,
                _ => self.entries.push(StoichEntry { species: s, nu: 1 }),
            }
        }
        self.spans.push(ReactionSpan {
            reaction,
            start,
            len: self.entries.len() - start,
        });
    }

    /// number of reactions registered with this manager
    pub fn n_reactions(&self) -> usize {
        self.spans.len()
    }

    /// entries of `reaction`, empty if the reaction is not registered here
    pub fn entries(&self, reaction: usize) -> &[StoichEntry] {
        match self
            .spans
            .binary_search_by_key(&reaction, |span| span.reaction)
        {
            Ok(k) => {
                let span = self.spans[k];
                &self.entries[span.start..span.start + span.len]
            }
            Err(_) => &[],
        }
    }

    fn for_each_reaction(&self, mut f: impl FnMut(usize, &[StoichEntry])) {
        for span in self.spans.iter() {
            f(span.reaction, &self.entries[span.start..span.start + span.len]);
        }
    }

    /// `r[j] -= Σ nu * s[species]` over the entries of every reaction j
    pub fn decr_reactions(&self, s: &[f64], r: &mut [f64]) {
        self.for_each_reaction(|j, entries| {
            r[j] -= entries.iter().map(|e| e.nu as f64 * s[e.species]).sum::<f64>();
        });
    }

    /// `r[j] += Σ nu * s[species]` over the entries of every reaction j
    pub fn incr_reactions(&self, s: &[f64], r: &mut [f64]) {
        self.for_each_reaction(|j, entries| {
            r[j] += entries.iter().map(|e| e.nu as f64 * s[e.species]).sum::<f64>();
        });
    }

    /// `r[j] *= Π conc[species]^nu` (law of mass action)
    pub fn mult_reactions(&self, conc: &[f64], r: &mut [f64]) {
        self.for_each_reaction(|j, entries| {
            for e in entries {
                r[j] *= conc[e.species].powi(e.nu as i32);
            }
        });
    }

    /// `s[species] -= nu * r[j]` for every entry of every reaction j
    pub fn decr_species(&self, r: &[f64], s: &mut [f64]) {
        self.for_each_reaction(|j, entries| {
            for e in entries {
                s[e.species] -= e.nu as f64 * r[j];
            }
        });
    }

    /// `s[species] += nu * r[j]` for every entry of every reaction j
    pub fn incr_species(&self, r: &[f64], s: &mut [f64]) {
        self.for_each_reaction(|j, entries| {
            for e in entries {
                s[e.species] += e.nu as f64 * r[j];
            }
        });
    }
}
