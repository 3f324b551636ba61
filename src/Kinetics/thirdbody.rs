//! Third-body collision partners.
//!
//! For a reaction with a third body `M` the rate of progress is multiplied by the effective
//! concentration `[M] = Σ eff_s c_s`. Only efficiencies different from one are stored; the
//! sum is evaluated as `Σ c + Σ_listed (eff - 1) c`.

#[derive(Debug, Clone, PartialEq)]
struct ThirdbodySpan {
    reaction: usize,
    start: usize,
    len: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ThirdbodyManager {
    /// (species, eff - 1)
    entries: Vec<(usize, f64)>,
    spans: Vec<ThirdbodySpan>,
}

impl ThirdbodyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the efficiencies of a third-body reaction. Species not listed have
    /// efficiency one; listed efficiencies equal to one are dropped.
    pub fn add_reaction(&mut self, reaction: usize, efficiencies: &[(usize, f64)]) {
        if let Some(last) = self.spans.last() {
            assert!(
                reaction > last.reaction,
                "reactions must be added in increasing order"
            );
        }
        let start = self.entries.len();
        for &(species, eff) in efficiencies {
            if eff != 1.0 {
                self.entries.push((species, eff - 1.0));
            }
        }
        self.spans.push(ThirdbodySpan {
            reaction,
            start,
            len: self.entries.len() - start,
        });
    }

    pub fn n_reactions(&self) -> usize {
        self.spans.len()
    }

    /// true if `reaction` was registered as a third-body reaction
    pub fn contains(&self, reaction: usize) -> bool {
        self.spans
            .binary_search_by_key(&reaction, |span| span.reaction)
            .is_ok()
    }

    /// `r[j] *= Σ_s eff_s c_s` for every third-body reaction j; other reactions are untouched
    pub fn multiply_thirdbodies(&self, conc: &[f64], r: &mut [f64]) {
        if self.spans.is_empty() {
            return;
        }
        let total: f64 = conc.iter().sum();
        for span in self.spans.iter() {
            let m = total
                + self.entries[span.start..span.start + span.len]
                    .iter()
                    .map(|&(s, eff_m1)| eff_m1 * conc[s])
                    .sum::<f64>();
            r[span.reaction] *= m;
        }
    }
}
