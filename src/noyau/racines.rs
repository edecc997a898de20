// src/noyau/racines.rs
//
// Racines réelles exactes d’un polynôme à coefficients rationnels.
//
// Pipeline (pas de bissection flottante) :
// 1. partie sans carré (racines simples)
// 2. racines rationnelles (théorème des racines rationnelles) + déflation exacte
// 3. reste de degré 2 : formule close a + b√d
// 4. reste de degré ≥ 3 : isolation par suite de Sturm sur rationnels exacts,
//    puis raffinement exact de chaque intervalle
//
// Les racines complexes sont écartées ici (discriminant < 0, pas de changement de signe).
// Tout tour de boucle coûteux consomme le budget.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::collections::BTreeSet;
use std::fmt;

use super::budget::Budget;
use super::erreurs::ErreurSolveur;
use super::expr::{int_sqrt_floor, rational_sqrt_exact};
use super::polynome::Poly;

/// Au-delà, l’énumération des diviseurs est sautée (Sturm prend le relais).
const BITS_MAX_DIVISEURS: u64 = 40;

/// Extraction des carrés dans √d : nombres premiers testés jusqu’à cette borne.
const PREMIER_MAX_CARRES: u64 = 1000;

/// Précision relative du raffinement des racines isolées (2^-52).
const BITS_RAFFINEMENT: u32 = 52;

#[derive(Clone, Debug, PartialEq)]
pub enum Racine {
    Exacte(BigRational),
    /// a + b·√d, d > 1 entier sans (petit) facteur carré
    Radical {
        a: BigRational,
        b: BigRational,
        d: BigInt,
    },
    /// unique racine de `poly` dans ]bas, haut[
    Isolee {
        poly: Poly,
        bas: BigRational,
        haut: BigRational,
    },
    /// solution d’une équation à second membre transcendant
    Approchee(f64),
}

impl Racine {
    /// Valeur flottante (pleine précision f64).
    pub fn valeur(&self) -> f64 {
        match self {
            Racine::Exacte(q) => q.to_f64().unwrap_or(f64::NAN),
            Racine::Radical { a, b, d } => {
                let a = a.to_f64().unwrap_or(f64::NAN);
                let b = b.to_f64().unwrap_or(f64::NAN);
                let d = d.to_f64().unwrap_or(f64::NAN);
                a + b * d.sqrt()
            }
            Racine::Isolee { bas, haut, .. } => {
                let m = (bas + haut) / BigRational::from_integer(BigInt::from(2));
                m.to_f64().unwrap_or(f64::NAN)
            }
            Racine::Approchee(v) => *v,
        }
    }
}

impl fmt::Display for Racine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Racine::Exacte(q) => write!(f, "{}", format_rat(q)),
            Racine::Radical { a, b, d } => {
                let sqrt = if b.abs().is_one() {
                    format!("√{d}")
                } else {
                    format!("{}·√{d}", format_rat(&b.abs()))
                };
                match (a.is_zero(), b.is_negative()) {
                    (true, false) => write!(f, "{sqrt}"),
                    (true, true) => write!(f, "-{sqrt}"),
                    (false, false) => write!(f, "{} + {sqrt}", format_rat(a)),
                    (false, true) => write!(f, "{} - {sqrt}", format_rat(a)),
                }
            }
            Racine::Isolee { poly, .. } => write!(f, "≈{} (racine de {poly})", self.valeur()),
            Racine::Approchee(v) => write!(f, "≈{v}"),
        }
    }
}

fn format_rat(q: &BigRational) -> String {
    if q.denom().is_one() {
        format!("{}", q.numer())
    } else {
        format!("{}/{}", q.numer(), q.denom())
    }
}

/// Racines réelles distinctes de `p`, triées par valeur croissante.
/// Le polynôme nul a une infinité de racines : Indetermine.
pub fn racines_reelles(p: &Poly, budget: &mut Budget) -> Result<Vec<Racine>, ErreurSolveur> {
    if p.est_zero() {
        return Err(ErreurSolveur::Indetermine);
    }
    if p.degre() == Some(0) {
        return Ok(Vec::new());
    }

    let mut reste = p.sans_carre(budget)?.unitaire();
    let mut racines: Vec<Racine> = Vec::new();

    // 0 est racine : on factorise x
    if reste.coeffs().first().is_some_and(|c| c.is_zero()) {
        racines.push(Racine::Exacte(BigRational::zero()));
        reste = Poly::depuis_coeffs(reste.coeffs()[1..].to_vec());
    }

    for r in racines_rationnelles(&reste, budget)? {
        let facteur = Poly::depuis_coeffs(vec![-r.clone(), BigRational::one()]);
        if let Some((q, _)) = reste.div_rem(&facteur) {
            reste = q;
        }
        racines.push(Racine::Exacte(r));
    }

    match reste.degre() {
        None | Some(0) => {}
        Some(1) => {
            let c = reste.coeffs();
            racines.push(Racine::Exacte(-&c[0] / &c[1]));
        }
        Some(2) => racines.extend(racines_quadratiques(&reste, budget)?),
        Some(_) => racines.extend(racines_sturm(&reste, budget)?),
    }

    racines.sort_by(|a, b| a.valeur().total_cmp(&b.valeur()));
    Ok(racines)
}

/* ------------------------ Racines rationnelles ------------------------ */

/// Candidats ±p/q avec p | a0 et q | an (a0 ≠ 0 supposé), testés exactement.
fn racines_rationnelles(p: &Poly, budget: &mut Budget) -> Result<Vec<BigRational>, ErreurSolveur> {
    if p.degre().unwrap_or(0) < 1 {
        return Ok(Vec::new());
    }

    let entiers = p.primitif_entier();
    let (Some(a0), Some(an)) = (entiers.first(), entiers.last()) else {
        return Ok(Vec::new());
    };
    if a0.is_zero() || a0.bits() > BITS_MAX_DIVISEURS || an.bits() > BITS_MAX_DIVISEURS {
        return Ok(Vec::new());
    }

    let divs_a0 = diviseurs(&a0.abs(), budget)?;
    let divs_an = diviseurs(&an.abs(), budget)?;

    // BTreeSet : candidats uniques + ordre déterministe
    let mut candidats: BTreeSet<BigRational> = BTreeSet::new();
    for num in &divs_a0 {
        for den in &divs_an {
            budget.pas()?;
            let q = BigRational::new(num.clone(), den.clone());
            candidats.insert(-q.clone());
            candidats.insert(q);
        }
    }

    let mut trouvees = Vec::new();
    for c in candidats {
        budget.pas()?;
        if p.evaluer(&c).is_zero() {
            trouvees.push(c);
        }
    }
    Ok(trouvees)
}

fn diviseurs(n: &BigInt, budget: &mut Budget) -> Result<Vec<BigInt>, ErreurSolveur> {
    let mut petits = Vec::new();
    let mut grands = Vec::new();
    let mut d = BigInt::one();
    while &d * &d <= *n {
        budget.pas()?;
        if n.is_multiple_of(&d) {
            let autre = n / &d;
            if autre != d {
                grands.push(autre);
            }
            petits.push(d.clone());
        }
        d += 1u32;
    }
    petits.extend(grands.into_iter().rev());
    Ok(petits)
}

/* ------------------------ Degré 2 : formule close ------------------------ */

fn racines_quadratiques(p: &Poly, budget: &mut Budget) -> Result<Vec<Racine>, ErreurSolveur> {
    let c = p.coeffs();
    let (c0, c1, c2) = (&c[0], &c[1], &c[2]);

    let quatre = BigRational::from_integer(BigInt::from(4));
    let deux_a = c2 * BigRational::from_integer(BigInt::from(2));
    let delta = c1 * c1 - quatre * c2 * c0;

    if delta.is_negative() {
        return Ok(Vec::new());
    }
    let sommet = -c1 / &deux_a;
    if delta.is_zero() {
        return Ok(vec![Racine::Exacte(sommet)]);
    }
    if let Some(s) = rational_sqrt_exact(&delta) {
        let e = s / &deux_a;
        return Ok(vec![
            Racine::Exacte(&sommet - &e),
            Racine::Exacte(&sommet + &e),
        ]);
    }

    // √(n/m) = √(n·m)/m = (k/m)·√r
    let nm = delta.numer() * delta.denom();
    let (k, r) = extraire_carres(&nm, budget)?;
    let coef = BigRational::new(k, delta.denom().clone()) / &deux_a;
    let coef = coef.abs();

    Ok(vec![
        Racine::Radical {
            a: sommet.clone(),
            b: -coef.clone(),
            d: r.clone(),
        },
        Racine::Radical {
            a: sommet,
            b: coef,
            d: r,
        },
    ])
}

/// n = k²·r avec r sans petit facteur carré.
fn extraire_carres(n: &BigInt, budget: &mut Budget) -> Result<(BigInt, BigInt), ErreurSolveur> {
    let mut k = BigInt::one();
    let mut r = n.clone();

    let s = int_sqrt_floor(&r);
    if &s * &s == r {
        return Ok((s, BigInt::one()));
    }

    let mut p: u64 = 2;
    while p <= PREMIER_MAX_CARRES {
        budget.pas()?;
        let p2 = BigInt::from(p * p);
        if p2 > r {
            break;
        }
        while r.is_multiple_of(&p2) {
            r /= &p2;
            k *= p;
        }
        p += if p == 2 { 1 } else { 2 };
    }
    Ok((k, r))
}

/* ------------------------ Degré ≥ 3 : Sturm ------------------------ */

fn suite_sturm(p: &Poly, budget: &mut Budget) -> Result<Vec<Poly>, ErreurSolveur> {
    let mut suite = vec![p.clone(), p.derivee()];
    loop {
        budget.pas()?;
        let n = suite.len();
        let (_q, r) = suite[n - 2]
            .div_rem(&suite[n - 1])
            .ok_or(ErreurSolveur::Delai)?;
        if r.est_zero() {
            break;
        }
        suite.push(-&r);
    }
    Ok(suite)
}

fn variations(suite: &[Poly], x: &BigRational) -> usize {
    let mut n = 0;
    let mut precedent: i8 = 0;
    for p in suite {
        let s = p.signe_en(x);
        if s == 0 {
            continue;
        }
        if precedent != 0 && s != precedent {
            n += 1;
        }
        precedent = s;
    }
    n
}

fn racines_sturm(p: &Poly, budget: &mut Budget) -> Result<Vec<Racine>, ErreurSolveur> {
    let suite = suite_sturm(p, budget)?;
    let b = p.borne_cauchy();

    // intervalles ]bas, haut] avec leur nombre de racines
    let mut pile: Vec<(BigRational, BigRational)> = vec![(-b.clone(), b)];
    let mut racines = Vec::new();

    while let Some((bas, haut)) = pile.pop() {
        budget.pas()?;
        let n = variations(&suite, &bas).saturating_sub(variations(&suite, &haut));
        match n {
            0 => {}
            1 => racines.push(raffiner(p, bas, haut, budget)?),
            _ => {
                let m = point_de_coupe(p, &bas, &haut);
                pile.push((bas, m.clone()));
                pile.push((m, haut));
            }
        }
    }
    Ok(racines)
}

/// Milieu de ]bas, haut[, décalé si le milieu est une racine.
fn point_de_coupe(p: &Poly, bas: &BigRational, haut: &BigRational) -> BigRational {
    let largeur = haut - bas;
    for (num, den) in [(1, 2), (1, 3), (2, 3), (1, 4), (3, 4), (1, 5), (4, 5)] {
        let m = bas + &largeur * BigRational::new(BigInt::from(num), BigInt::from(den));
        if p.signe_en(&m) != 0 {
            return m;
        }
    }
    bas + &largeur / BigRational::from_integer(BigInt::from(7))
}

/// Raffine une racine simple isolée dans ]bas, haut] jusqu’à 2^-52 relatif.
fn raffiner(
    p: &Poly,
    mut bas: BigRational,
    mut haut: BigRational,
    budget: &mut Budget,
) -> Result<Racine, ErreurSolveur> {
    if p.signe_en(&haut) == 0 {
        return Ok(Racine::Exacte(haut));
    }
    let signe_bas = p.signe_en(&bas);
    let deux = BigRational::from_integer(BigInt::from(2));
    let epsilon = BigRational::new(BigInt::one(), BigInt::one() << BITS_RAFFINEMENT);

    loop {
        let echelle = if bas.abs() > haut.abs() { bas.abs() } else { haut.abs() };
        let echelle = if echelle < BigRational::one() {
            BigRational::one()
        } else {
            echelle
        };
        if &haut - &bas <= &epsilon * &echelle {
            break;
        }

        budget.pas()?;
        let m = (&bas + &haut) / &deux;
        let s = p.signe_en(&m);
        if s == 0 {
            return Ok(Racine::Exacte(m));
        }
        if s == signe_bas {
            bas = m;
        } else {
            haut = m;
        }
    }

    Ok(Racine::Isolee {
        poly: p.clone(),
        bas,
        haut,
    })
}
