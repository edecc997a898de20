// src/noyau/solveur.rs
//
// Intersections de deux courbes : racines réelles de f1 - f2.
//
// La différence est décomposée en   reste + Σ cᵢ·atomeᵢ
// (reste, cᵢ : fractions rationnelles exactes ; atome : √u ou log_b(u)).
//
// Formes résolues :
// - sans atome           : numérateur du reste (racines exactes)
// - un seul √u           : A + B√u = 0  =>  A² - B²u = 0, puis vérification (racines parasites)
// - logs d’un même u     : K·ln(u) + A = 0, K = Σ cᵢ/ln(bᵢ), A constant
// Tout le reste : ErreurSolveur::NonSupporte.
//
// Sortie : points réels seulement, arrondis à 2 décimales, triés par x.

use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use super::analyse::Expression;
use super::budget::{Budget, LimitesSolveur};
use super::erreurs::ErreurSolveur;
use super::expr::Expr;
use super::fraction::Fraction;
use super::racines::{racines_reelles, Racine};

/// Garde-fou : degré maximum d’une fraction intermédiaire.
pub(crate) const DEGRE_MAX: usize = 256;

/// Tolérance relative de la vérification f1(x) ≈ f2(x).
const TOLERANCE_VERIFICATION: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub struct PointIntersection {
    pub x: f64,
    pub y: f64,
    /// racine exacte (avant arrondi)
    pub racine: Racine,
}

impl PointIntersection {
    /// Libellé du marqueur : "(x.xx, y.yy)".
    pub fn libelle(&self) -> String {
        format!("({:.2}, {:.2})", self.x, self.y)
    }
}

/// Arrondi d’affichage à 2 décimales (-0.00 devient 0.00).
pub fn arrondi2(v: f64) -> f64 {
    let r = (v * 100.0).round() / 100.0;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// API publique : intersections de f1 et f2.
pub fn intersections(
    f1: &Expression,
    f2: &Expression,
    limites: LimitesSolveur,
) -> Result<Vec<PointIntersection>, ErreurSolveur> {
    if f1.variable() != f2.variable() {
        return Err(ErreurSolveur::NonSupporte(format!(
            "variables différentes: {} et {}",
            f1.variable(),
            f2.variable()
        )));
    }

    let mut budget = Budget::demarrer(limites);

    let difference =
        Expr::Sub(Box::new(f1.expr().clone()), Box::new(f2.expr().clone())).simplify();
    let combinaison = combinaison(&difference, f1.variable(), &mut budget)?;
    let candidats = resoudre(&combinaison, &mut budget)?;

    let mut points = Vec::new();
    for racine in candidats {
        let x = racine.valeur();
        if !x.is_finite() {
            continue;
        }
        let (Some(y1), Some(y2)) = (f1.evaluer(x), f2.evaluer(x)) else {
            continue;
        };
        if !concordent(y1, y2) {
            continue;
        }
        points.push(PointIntersection {
            x: arrondi2(x),
            y: arrondi2(y1),
            racine,
        });
    }

    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    Ok(points)
}

fn concordent(a: f64, b: f64) -> bool {
    let echelle = 1f64.max(a.abs()).max(b.abs());
    (a - b).abs() <= TOLERANCE_VERIFICATION * echelle
}

/* ------------------------ Décomposition ------------------------ */

#[derive(Clone, Debug, PartialEq)]
enum Atome {
    /// √u
    Radical(Fraction),
    /// ln(u) / ln_base
    Log { argument: Fraction, ln_base: f64 },
}

#[derive(Clone, Debug)]
struct Combinaison {
    reste: Fraction,
    termes: Vec<(Atome, Fraction)>,
}

fn non_supporte(msg: &str) -> ErreurSolveur {
    ErreurSolveur::NonSupporte(msg.to_string())
}

impl Combinaison {
    fn fraction(f: Fraction) -> Self {
        Self {
            reste: f,
            termes: Vec::new(),
        }
    }

    fn atome(a: Atome) -> Self {
        Self {
            reste: Fraction::zero(),
            termes: vec![(a, Fraction::constante(BigRational::one()))],
        }
    }

    fn est_fraction(&self) -> bool {
        self.termes.is_empty()
    }

    fn plus(mut self, autre: Combinaison, budget: &mut Budget) -> Result<Self, ErreurSolveur> {
        self.reste = self.reste.plus(&autre.reste, budget)?;
        for (atome, coef) in autre.termes {
            match self.termes.iter().position(|(a, _)| *a == atome) {
                Some(i) => {
                    let somme = self.termes[i].1.plus(&coef, budget)?;
                    if somme.est_zero() {
                        self.termes.remove(i);
                    } else {
                        self.termes[i].1 = somme;
                    }
                }
                None => self.termes.push((atome, coef)),
            }
        }
        Ok(self)
    }

    fn oppose(self) -> Self {
        Self {
            reste: self.reste.oppose(),
            termes: self
                .termes
                .into_iter()
                .map(|(a, c)| (a, c.oppose()))
                .collect(),
        }
    }

    fn echelle(self, k: &Fraction, budget: &mut Budget) -> Result<Self, ErreurSolveur> {
        if k.est_zero() {
            return Ok(Self::fraction(Fraction::zero()));
        }
        let reste = self.reste.fois(k, budget)?;
        let mut termes = Vec::with_capacity(self.termes.len());
        for (a, c) in self.termes {
            termes.push((a, c.fois(k, budget)?));
        }
        Ok(Self { reste, termes })
    }

    /// (R + B·√u)·√u = B·u + R·√u
    fn fois_racine(self, u: &Fraction, budget: &mut Budget) -> Result<Self, ErreurSolveur> {
        let mut reste = Fraction::zero();
        for (atome, coef) in &self.termes {
            match atome {
                Atome::Radical(v) if v == u => reste = reste.plus(&coef.fois(u, budget)?, budget)?,
                _ => return Err(non_supporte("quotient de radicaux distincts")),
            }
        }
        let mut termes = Vec::new();
        if !self.reste.est_zero() {
            termes.push((Atome::Radical(u.clone()), self.reste));
        }
        Ok(Self { reste, termes })
    }

    fn borne(self) -> Result<Self, ErreurSolveur> {
        let trop = self.reste.degre() > DEGRE_MAX
            || self.termes.iter().any(|(a, c)| {
                c.degre() > DEGRE_MAX
                    || match a {
                        Atome::Radical(u) | Atome::Log { argument: u, .. } => u.degre() > DEGRE_MAX,
                    }
            });
        if trop {
            return Err(non_supporte("degré trop élevé"));
        }
        Ok(self)
    }
}

/// Décompose une Expr en reste + Σ cᵢ·atomeᵢ.
fn combinaison(e: &Expr, variable: &str, budget: &mut Budget) -> Result<Combinaison, ErreurSolveur> {
    use Expr::*;

    let c = match e {
        Rat(r) => Combinaison::fraction(Fraction::constante(r.clone())),
        Var(nom) => {
            if nom != variable {
                return Err(ErreurSolveur::NonSupporte(format!("variable étrangère: {nom}")));
            }
            Combinaison::fraction(Fraction::x())
        }

        Add(a, b) => {
            let ca = combinaison(a, variable, budget)?;
            let cb = combinaison(b, variable, budget)?;
            ca.plus(cb, budget)?
        }
        Sub(a, b) => {
            let ca = combinaison(a, variable, budget)?;
            let cb = combinaison(b, variable, budget)?;
            ca.plus(cb.oppose(), budget)?
        }

        Mul(a, b) => {
            let ca = combinaison(a, variable, budget)?;
            let cb = combinaison(b, variable, budget)?;
            if ca.est_fraction() {
                cb.echelle(&ca.reste, budget)?
            } else if cb.est_fraction() {
                ca.echelle(&cb.reste, budget)?
            } else {
                return Err(non_supporte("produit de termes non polynomiaux"));
            }
        }

        Div(a, b) => {
            let ca = combinaison(a, variable, budget)?;
            let cb = combinaison(b, variable, budget)?;
            if cb.est_fraction() {
                let inv = Fraction::constante(BigRational::one())
                    .divise(&cb.reste, budget)?
                    .ok_or_else(|| non_supporte("division par zéro"))?;
                ca.echelle(&inv, budget)?
            } else {
                // a / (c·√u) = a·√u / (c·u)
                match (cb.reste.est_zero(), cb.termes.as_slice()) {
                    (true, [(Atome::Radical(u), coef)]) => {
                        let cu = coef.fois(u, budget)?;
                        let inv = Fraction::constante(BigRational::one())
                            .divise(&cu, budget)?
                            .ok_or_else(|| non_supporte("division par zéro"))?;
                        ca.fois_racine(u, budget)?.echelle(&inv, budget)?
                    }
                    _ => return Err(non_supporte("quotient non polynomial")),
                }
            }
        }

        PowInt(base, n) => {
            if n.unsigned_abs() > DEGRE_MAX as u64 {
                return Err(non_supporte("exposant trop grand"));
            }
            let cb = combinaison(base, variable, budget)?;
            if cb.est_fraction() {
                let p = cb
                    .reste
                    .puissance(*n, budget)?
                    .ok_or_else(|| non_supporte("division par zéro"))?;
                Combinaison::fraction(p)
            } else {
                puissance_radical(cb, *n, budget)?
            }
        }

        Pow(_, _) => return Err(non_supporte("exposant non entier")),

        Sqrt(u) => {
            let cu = combinaison(u, variable, budget)?;
            if !cu.est_fraction() {
                return Err(non_supporte("radical imbriqué"));
            }
            if cu.reste.est_zero() {
                Combinaison::fraction(Fraction::zero())
            } else {
                Combinaison::atome(Atome::Radical(cu.reste))
            }
        }

        Log(v, b) => {
            if !b.est_constante() {
                return Err(non_supporte("base de logarithme variable"));
            }
            let base = b
                .evaluer(variable, 0.0)
                .filter(|&vb| vb > 0.0 && vb != 1.0)
                .ok_or_else(|| non_supporte("base de logarithme invalide"))?;
            atome_log(v, base.ln(), variable, budget)?
        }
        Ln(v) => atome_log(v, 1.0, variable, budget)?,
    };

    c.borne()
}

fn atome_log(
    v: &Expr,
    ln_base: f64,
    variable: &str,
    budget: &mut Budget,
) -> Result<Combinaison, ErreurSolveur> {
    let cv = combinaison(v, variable, budget)?;
    if !cv.est_fraction() {
        return Err(non_supporte("logarithme d’un terme non polynomial"));
    }
    Ok(Combinaison::atome(Atome::Log {
        argument: cv.reste,
        ln_base,
    }))
}

/// (c·√u)^n : n pair => c^n·u^(n/2) ; n impair => c^n·u^((n-1)/2)·√u
fn puissance_radical(cb: Combinaison, n: i64, budget: &mut Budget) -> Result<Combinaison, ErreurSolveur> {
    let (true, [(Atome::Radical(u), c)]) = (cb.reste.est_zero(), cb.termes.as_slice()) else {
        return Err(non_supporte("puissance d’une somme non polynomiale"));
    };
    let erreur = || non_supporte("division par zéro");

    let cn = c.puissance(n, budget)?.ok_or_else(erreur)?;
    let k = n.div_euclid(2);
    let uk = u.puissance(k, budget)?.ok_or_else(erreur)?;
    let coef = cn.fois(&uk, budget)?;

    if n.rem_euclid(2) == 0 {
        Ok(Combinaison::fraction(coef))
    } else {
        Ok(Combinaison {
            reste: Fraction::zero(),
            termes: vec![(Atome::Radical(u.clone()), coef)],
        })
    }
}

/* ------------------------ Résolution par forme ------------------------ */

fn resoudre(c: &Combinaison, budget: &mut Budget) -> Result<Vec<Racine>, ErreurSolveur> {
    if c.est_fraction() {
        return racines_reelles(c.reste.num(), budget);
    }

    if let [(Atome::Radical(u), b)] = c.termes.as_slice() {
        return resoudre_radical(&c.reste, b, u, budget);
    }

    let tous_logs = c.termes.iter().all(|(a, _)| matches!(a, Atome::Log { .. }));
    if tous_logs {
        return resoudre_logs(c, budget);
    }

    Err(non_supporte("mélange de radicaux et de logarithmes"))
}

/// A + B·√u = 0  =>  A² - B²·u = 0 (candidats, vérifiés plus tard).
fn resoudre_radical(
    a: &Fraction,
    b: &Fraction,
    u: &Fraction,
    budget: &mut Budget,
) -> Result<Vec<Racine>, ErreurSolveur> {
    let a2 = a.fois(a, budget)?;
    let b2u = b.fois(b, budget)?.fois(u, budget)?;
    let eq = a2.moins(&b2u, budget)?;
    racines_reelles(eq.num(), budget)
}

/// Σ cᵢ·ln(u)/ln(bᵢ) + A = 0, cᵢ et A constants.
fn resoudre_logs(c: &Combinaison, budget: &mut Budget) -> Result<Vec<Racine>, ErreurSolveur> {
    let Some(a) = c.reste.comme_constante() else {
        return Err(non_supporte("logarithme mêlé à un polynôme"));
    };

    let mut argument: Option<&Fraction> = None;
    let mut k = 0.0;
    let mut echelle = 0.0;
    for (atome, coef) in &c.termes {
        let Atome::Log { argument: u, ln_base } = atome else {
            return Err(non_supporte("mélange de radicaux et de logarithmes"));
        };
        match argument {
            Some(prec) if prec != u => {
                return Err(non_supporte("logarithmes d’arguments différents"))
            }
            _ => argument = Some(u),
        }
        let coef = coef
            .comme_constante()
            .and_then(|q| q.to_f64())
            .ok_or_else(|| non_supporte("coefficient de logarithme non constant"))?;
        k += coef / ln_base;
        echelle += (coef / ln_base).abs();
    }
    let Some(u) = argument else {
        return racines_reelles(c.reste.num(), budget);
    };

    // combinaison nulle des logarithmes : identité ou contradiction
    if k.abs() <= 1e-12 * echelle {
        return if a.is_zero() {
            Err(ErreurSolveur::Indetermine)
        } else {
            Ok(Vec::new())
        };
    }

    if a.is_zero() {
        // ln(u) = 0  <=>  u = 1 (exact)
        let eq = u.moins(&Fraction::constante(BigRational::one()), budget)?;
        return racines_reelles(eq.num(), budget);
    }

    let a = a.to_f64().ok_or_else(|| non_supporte("constante hors f64"))?;
    let cible = (-a / k).exp();
    if !cible.is_finite() || cible <= 0.0 {
        return Ok(Vec::new());
    }
    let Some(cible_q) = BigRational::from_float(cible) else {
        return Ok(Vec::new());
    };
    let eq = u.moins(&Fraction::constante(cible_q), budget)?;
    if eq.est_zero() {
        return Err(ErreurSolveur::Indetermine);
    }
    Ok(racines_reelles(eq.num(), budget)?
        .iter()
        .map(|r| Racine::Approchee(r.valeur()))
        .collect())
}
