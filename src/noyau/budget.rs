// src/noyau/budget.rs
//
// Budget de résolution : compteur de pas + échéance murale.
// Le solveur consomme un pas à chaque tour de boucle coûteux
// (diviseurs, pgcd, Sturm, raffinement) et abandonne avec ErreurSolveur::Delai.

use std::time::{Duration, Instant};

use super::erreurs::ErreurSolveur;

/// Pas maximum par défaut pour une résolution.
pub const PAS_DEFAUT: u64 = 250_000;

/// Durée maximum par défaut pour une résolution.
pub const DUREE_DEFAUT: Duration = Duration::from_secs(2);

/// Limites d’une résolution (configuration, copiable).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimitesSolveur {
    pub pas_max: u64,
    pub duree_max: Duration,
}

impl Default for LimitesSolveur {
    fn default() -> Self {
        Self {
            pas_max: PAS_DEFAUT,
            duree_max: DUREE_DEFAUT,
        }
    }
}

/// Budget vivant d’une résolution (démarre à la création).
#[derive(Debug)]
pub struct Budget {
    pas_restants: u64,
    echeance: Instant,
}

impl Budget {
    pub fn demarrer(limites: LimitesSolveur) -> Self {
        Self {
            pas_restants: limites.pas_max,
            echeance: Instant::now() + limites.duree_max,
        }
    }

    /// Consomme un pas. L’horloge n’est lue qu’un pas sur 64.
    pub fn pas(&mut self) -> Result<(), ErreurSolveur> {
        if self.pas_restants == 0 {
            return Err(ErreurSolveur::Delai);
        }
        self.pas_restants -= 1;
        if self.pas_restants % 64 == 0 && Instant::now() > self.echeance {
            self.pas_restants = 0;
            return Err(ErreurSolveur::Delai);
        }
        Ok(())
    }
}
