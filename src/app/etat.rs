//! src/app/etat.rs
//!
//! État UI (sans vue, sans calcul).
//!
//! Rôle : contenir l’état du traceur (deux entrées, dernière figure, erreur, démarche,
//! réglages) et offrir des opérations simples (C/CLR/AC) sans logique d’affichage.
//!
//! Contrats (version UI) :
//! - Aucune évaluation ici (pas de parsing, pas de solveur).
//! - Actions déterministes, sans effet de bord caché.
//! - Défense en profondeur : nombre de points borné (via ReglagesTrace::avec_points).

use crate::noyau::{ReglagesTrace, SurfaceMemoire};

/// Exemples affichés dans les champs vides.
pub const EXEMPLE_F1: &str = "Ex: 5*x^3 + 2*x";
pub const EXEMPLE_F2: &str = "Ex: log10(x) + sqrt(x)";

/// Champ qui reçoit les insertions des boutons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Champ {
    F1,
    F2,
}

#[derive(Clone, Default, Debug)]
pub struct Demarche {
    pub normalise: String,
    pub jetons: String,
    pub rpn: String,
}

#[derive(Clone, Debug)]
pub struct AppTraceur {
    // --- entrées utilisateur ---
    pub f1: String,
    pub f2: String,
    pub champ_actif: Champ,

    // --- sorties ---
    pub figure: SurfaceMemoire, // courbes + marqueurs du dernier tracé
    pub erreur: String,         // validation / analyse (tracé refusé)
    pub statut: String,         // issue du solveur (tracé conservé)

    // --- démarche (une par fonction) ---
    pub demarches: [Demarche; 2],

    // --- paramètres ---
    pub reglages: ReglagesTrace,

    // --- UX ---
    // Permet à vue.rs de redonner le focus au champ actif après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppTraceur {
    fn default() -> Self {
        Self {
            f1: String::new(),
            f2: String::new(),
            champ_actif: Champ::F1,
            figure: SurfaceMemoire::default(),
            erreur: String::new(),
            statut: String::new(),
            demarches: [Demarche::default(), Demarche::default()],
            reglages: ReglagesTrace::default(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }
}

impl AppTraceur {
    /* ------------------------ Actions “boutons” (état seulement) ------------------------ */

    /// AC : remise à zéro totale (entrées + figure + réglages par défaut).
    pub fn reset_total(&mut self) {
        self.f1.clear();
        self.f2.clear();
        self.champ_actif = Champ::F1;
        self.clear_resultats();
        self.reglages = ReglagesTrace::default();
        self.focus_entree = true;
    }

    /// C : effacer seulement le champ actif.
    pub fn clear_entree(&mut self) {
        self.entree_active().clear();
        self.focus_entree = true;
    }

    /// CLR : effacer figure + erreur + démarche (sans toucher aux entrées).
    pub fn clear_resultats(&mut self) {
        self.figure = SurfaceMemoire::default();
        self.erreur.clear();
        self.statut.clear();
        self.demarches = [Demarche::default(), Demarche::default()];
        self.focus_entree = true;
    }

    pub fn entree_active(&mut self) -> &mut String {
        match self.champ_actif {
            Champ::F1 => &mut self.f1,
            Champ::F2 => &mut self.f2,
        }
    }

    /// Utilitaire : placer une erreur.
    ///
    /// Choix UX : la figure est celle que le noyau a laissée
    /// (intacte si la validation refuse, effacée si l’analyse échoue).
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.statut.clear();
        self.demarches = [Demarche::default(), Demarche::default()];
        self.focus_entree = true;
    }

    /// Utilitaire : déposer un tracé réussi.
    pub fn set_resultats(&mut self, statut: impl Into<String>, demarches: [Demarche; 2]) {
        self.erreur.clear();
        self.statut = statut.into();
        self.demarches = demarches;
        self.focus_entree = true;
    }

    /// Garde-fou : borne le nombre d’échantillons (évite abus / gel).
    pub fn set_points(&mut self, points: usize) {
        self.reglages = self.reglages.avec_points(points);
        self.focus_entree = true;
    }
}
