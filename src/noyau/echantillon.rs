// src/noyau/echantillon.rs
//
// Échantillonnage d’une Expression sur une grille régulière.
// Déterministe, ne lève jamais : un point non réel / infini / en échec donne y = None
// (le tracé montre alors un trou au lieu d’abandonner la courbe).

use super::analyse::Expression;

/// Domaine de référence.
pub const DOMAINE_DEFAUT: Domaine = Domaine { bas: -10.0, haut: 10.0 };

/// Nombre de points de référence.
pub const POINTS_DEFAUT: usize = 400;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domaine {
    pub bas: f64,
    pub haut: f64,
}

impl Default for Domaine {
    fn default() -> Self {
        DOMAINE_DEFAUT
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Echantillon {
    pub x: f64,
    /// None = échantillon indéfini
    pub y: Option<f64>,
}

pub type Courbe = Vec<Echantillon>;

/// `n` abscisses régulières sur [bas, haut], bornes incluses (la dernière vaut exactement `haut`).
pub fn grille(domaine: Domaine, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![domaine.bas],
        _ => {
            let pas = (domaine.haut - domaine.bas) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        domaine.haut
                    } else {
                        domaine.bas + i as f64 * pas
                    }
                })
                .collect()
        }
    }
}

pub fn echantillonner(expr: &Expression, domaine: Domaine, n: usize) -> Courbe {
    grille(domaine, n)
        .into_iter()
        .map(|x| Echantillon {
            x,
            y: expr.evaluer(x),
        })
        .collect()
}
