//! Analytic Jacobian of the mass production rates.
//!
//! For every reaction the manager keeps both sides with multiplicities, the net stoichiometry
//! and, for third-body reactions, the dense efficiency vector. [`JacobianManager::compute_jacobian`]
//! assembles `J[i][j] = ∂ω̇_i/∂ρ_j` where `ω̇` are mass production rates and `ρ` partial
//! densities:
//!
//! ```text
//! q        = M (k_f Π c^ν' - k_b Π c^ν'')
//! ∂q/∂c_j  = M (∂R_f/∂c_j - ∂R_b/∂c_j) + eff_j (R_f - R_b)
//! J[i][j]  = Mw_i / Mw_j Σ_r ν_i ∂q_r/∂c_j
//! ```
//! The derivative of a mass-action product is formed without dividing by the concentration,
//! so species with zero concentration are handled exactly.
use nalgebra::DMatrix;

#[derive(Debug, Clone)]
struct JacobianReaction {
    reactants: Vec<(usize, u32)>,
    products: Vec<(usize, u32)>,
    /// products minus reactants, non-zero entries only
    net: Vec<(usize, f64)>,
    reversible: bool,
    /// dense efficiencies of a third-body reaction
    efficiencies: Option<Vec<f64>>,
}

fn multiplicities(species: &[usize]) -> Vec<(usize, u32)> {
    let mut out: Vec<(usize, u32)> = Vec::new();
    for &s in species {
        match out.iter_mut().find(|(k, _)| *k == s) {
            Some((_, nu)) => *nu += 1,
            None => out.push((s, 1)),
        }
    }
    out
}

fn mass_action(k: f64, side: &[(usize, u32)], conc: &[f64]) -> f64 {
    side.iter()
        .fold(k, |acc, &(s, nu)| acc * conc[s].powi(nu as i32))
}

// derivative of k Π c^ν with respect to the concentration of side[pos]
fn mass_action_derivative(k: f64, side: &[(usize, u32)], conc: &[f64], pos: usize) -> f64 {
    side.iter().enumerate().fold(k, |acc, (l, &(s, nu))| {
        if l == pos {
            acc * nu as f64 * conc[s].powi(nu as i32 - 1)
        } else {
            acc * conc[s].powi(nu as i32)
        }
    })
}

#[derive(Debug, Clone)]
pub struct JacobianManager {
    n_species: usize,
    reactions: Vec<JacobianReaction>,
    /// ∂q/∂c of the reaction being assembled
    dq: Vec<f64>,
}

impl JacobianManager {
    pub fn new(n_species: usize) -> Self {
        Self {
            n_species,
            reactions: Vec::new(),
            dq: vec![0.0; n_species],
        }
    }

    pub fn n_reactions(&self) -> usize {
        self.reactions.len()
    }

    /// Registers the next reaction. `efficiencies` is the sparse efficiency list of a
    /// third-body reaction, `None` otherwise.
    pub fn add_reaction(
        &mut self,
        reactants: &[usize],
        products: &[usize],
        reversible: bool,
        efficiencies: Option<&[(usize, f64)]>,
    ) {
        let reactants = multiplicities(reactants);
        let products = multiplicities(products);
        let mut net: Vec<(usize, f64)> = products.iter().map(|&(s, nu)| (s, nu as f64)).collect();
        for &(s, nu) in reactants.iter() {
            match net.iter_mut().find(|(k, _)| *k == s) {
                Some((_, n)) => *n -= nu as f64,
                None => net.push((s, -(nu as f64))),
            }
        }
        net.retain(|&(_, n)| n != 0.0);
        let efficiencies = efficiencies.map(|sparse| {
            let mut dense = vec![1.0; self.n_species];
            for &(s, eff) in sparse {
                dense[s] = eff;
            }
            dense
        });
        self.reactions.push(JacobianReaction {
            reactants,
            products,
            net,
            reversible,
            efficiencies,
        });
    }

    /// Fills `jac` (n_species x n_species) with `∂ω̇_i/∂ρ_j`. `kb` is ignored for
    /// irreversible reactions.
    pub fn compute_jacobian(
        &mut self,
        kf: &[f64],
        kb: &[f64],
        conc: &[f64],
        mw: &[f64],
        jac: &mut DMatrix<f64>,
    ) {
        let ns = self.n_species;
        assert_eq!(kf.len(), self.reactions.len());
        assert_eq!(kb.len(), self.reactions.len());
        assert_eq!(conc.len(), ns);
        assert_eq!(mw.len(), ns);
        assert_eq!(jac.shape(), (ns, ns));
        jac.fill(0.0);

        for (r, rxn) in self.reactions.iter().enumerate() {
            self.dq.iter_mut().for_each(|d| *d = 0.0);
            let m = match &rxn.efficiencies {
                Some(eff) => eff.iter().zip(conc.iter()).map(|(e, c)| e * c).sum::<f64>(),
                None => 1.0,
            };
            for pos in 0..rxn.reactants.len() {
                let s = rxn.reactants[pos].0;
                self.dq[s] += m * mass_action_derivative(kf[r], &rxn.reactants, conc, pos);
            }
            let mut rb = 0.0;
            if rxn.reversible {
                rb = mass_action(kb[r], &rxn.products, conc);
                for pos in 0..rxn.products.len() {
                    let s = rxn.products[pos].0;
                    self.dq[s] -= m * mass_action_derivative(kb[r], &rxn.products, conc, pos);
                }
            }
            if let Some(eff) = &rxn.efficiencies {
                let q = mass_action(kf[r], &rxn.reactants, conc) - rb;
                for (d, e) in self.dq.iter_mut().zip(eff.iter()) {
                    *d += e * q;
                }
            }
            for &(i, nu) in rxn.net.iter() {
                for j in 0..ns {
                    if self.dq[j] != 0.0 {
                        jac[(i, j)] += nu * self.dq[j];
                    }
                }
            }
        }

        for i in 0..ns {
            for j in 0..ns {
                jac[(i, j)] *= mw[i] / mw[j];
            }
        }
    }
}
