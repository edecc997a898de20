//! Noyau — tracé (pipeline réel)
//!
//! valider(f1, f2) -> effacer -> analyser -> échantillonner -> courbes
//!                 -> intersections (budget) -> marqueurs
//!
//! Un échec du solveur ne bloque jamais le tracé : il est rendu dans
//! `RapportTrace::issue_solveur`.

use super::analyse::{analyser_avec_demarche, DemarcheAnalyse, Expression};
use super::budget::LimitesSolveur;
use super::echantillon::{echantillonner, Courbe, Domaine, POINTS_DEFAUT};
use super::erreurs::{ErreurSolveur, ErreurTrace};
use super::solveur::{intersections, PointIntersection};
use super::validation::valider;

/// Variable libre des deux fonctions.
pub const VARIABLE: &str = "x";

/// Bornes du nombre d’échantillons (même logique que la précision bornée de l’UI).
pub const POINTS_MIN: usize = 2;
pub const POINTS_MAX: usize = 10_000;

/* ------------------------ Réglages ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReglagesTrace {
    pub domaine: Domaine,
    pub points: usize,
    pub budget: LimitesSolveur,
}

impl Default for ReglagesTrace {
    fn default() -> Self {
        Self {
            domaine: Domaine::default(),
            points: POINTS_DEFAUT,
            budget: LimitesSolveur::default(),
        }
    }
}

impl ReglagesTrace {
    pub fn avec_points(mut self, n: usize) -> Self {
        self.points = n.clamp(POINTS_MIN, POINTS_MAX);
        self
    }
}

/* ------------------------ Surface ------------------------ */

/// Consommateur du tracé : séries de points + marqueurs libellés.
pub trait SurfaceTrace {
    fn effacer(&mut self);
    fn courbe(&mut self, nom: &str, courbe: &Courbe);
    fn marqueur(&mut self, point: &PointIntersection, libelle: &str);
}

/// Surface qui enregistre les appels (tests + UI avant peinture).
#[derive(Default, Clone, Debug, PartialEq)]
pub struct SurfaceMemoire {
    pub courbes: Vec<(String, Courbe)>,
    pub marqueurs: Vec<(PointIntersection, String)>,
}

impl SurfaceTrace for SurfaceMemoire {
    fn effacer(&mut self) {
        self.courbes.clear();
        self.marqueurs.clear();
    }

    fn courbe(&mut self, nom: &str, courbe: &Courbe) {
        self.courbes.push((nom.to_string(), courbe.clone()));
    }

    fn marqueur(&mut self, point: &PointIntersection, libelle: &str) {
        self.marqueurs.push((point.clone(), libelle.to_string()));
    }
}

/* ------------------------ Rapport ------------------------ */

#[derive(Clone, Debug)]
pub struct FonctionTracee {
    /// "Fonction 1" / "Fonction 2"
    pub nom: String,
    pub expression: Expression,
    pub demarche: DemarcheAnalyse,
}

#[derive(Clone, Debug)]
pub struct RapportTrace {
    pub fonctions: [FonctionTracee; 2],
    pub issue_solveur: Result<Vec<PointIntersection>, ErreurSolveur>,
}

impl RapportTrace {
    /// Points d’intersection (vide si le solveur a échoué).
    pub fn points(&self) -> &[PointIntersection] {
        match &self.issue_solveur {
            Ok(p) => p,
            Err(_) => &[],
        }
    }
}

/* ------------------------ Pipeline ------------------------ */

/// API publique : trace f1 et f2 sur `surface` et marque leurs intersections.
///
/// Texte invalide : erreur, surface intacte.
/// Texte valide mais non analysable : erreur, surface effacée.
pub fn tracer(
    f1: &str,
    f2: &str,
    surface: &mut dyn SurfaceTrace,
    reglages: &ReglagesTrace,
) -> Result<RapportTrace, ErreurTrace> {
    // 1) Validation des deux entrées avant toute modification
    for (i, texte) in [f1, f2].into_iter().enumerate() {
        valider(texte, VARIABLE).map_err(|source| ErreurTrace::Validation {
            fonction: i + 1,
            source,
        })?;
    }

    surface.effacer();

    // 2) Analyse
    let (e1, d1) = analyser_avec_demarche(f1, VARIABLE)
        .map_err(|source| ErreurTrace::Analyse { fonction: 1, source })?;
    let (e2, d2) = analyser_avec_demarche(f2, VARIABLE)
        .map_err(|source| ErreurTrace::Analyse { fonction: 2, source })?;

    // 3) Courbes
    let fonctions = [
        FonctionTracee {
            nom: "Fonction 1".to_string(),
            expression: e1,
            demarche: d1,
        },
        FonctionTracee {
            nom: "Fonction 2".to_string(),
            expression: e2,
            demarche: d2,
        },
    ];
    for f in &fonctions {
        let courbe = echantillonner(&f.expression, reglages.domaine, reglages.points);
        surface.courbe(&f.nom, &courbe);
    }

    // 4) Intersections (jamais bloquantes)
    let issue_solveur = intersections(&fonctions[0].expression, &fonctions[1].expression, reglages.budget);
    if let Ok(points) = &issue_solveur {
        for p in points {
            surface.marqueur(p, &p.libelle());
        }
    }

    Ok(RapportTrace {
        fonctions,
        issue_solveur,
    })
}
