// src/noyau/polynome.rs
//
// Polynômes denses à une variable, coefficients rationnels exacts.
// Coefficients en ordre croissant : coeffs[i] est le coefficient de x^i.
// Invariant : pas de zéro en tête (le polynôme nul a zéro coefficient).

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use super::budget::Budget;
use super::erreurs::ErreurSolveur;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly {
    coeffs: Vec<BigRational>,
}

impl Poly {
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    pub fn un() -> Self {
        Self::constante(BigRational::one())
    }

    pub fn x() -> Self {
        Self::depuis_coeffs(vec![BigRational::zero(), BigRational::one()])
    }

    pub fn constante(c: BigRational) -> Self {
        Self::depuis_coeffs(vec![c])
    }

    pub fn depuis_coeffs(mut coeffs: Vec<BigRational>) -> Self {
        while coeffs.last().is_some_and(|c| c.is_zero()) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// Raccourci : coefficients entiers, ordre croissant.
    pub fn depuis_entiers(coeffs: &[i64]) -> Self {
        Self::depuis_coeffs(
            coeffs
                .iter()
                .map(|&c| BigRational::from_integer(BigInt::from(c)))
                .collect(),
        )
    }

    pub fn coeffs(&self) -> &[BigRational] {
        &self.coeffs
    }

    pub fn est_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// None pour le polynôme nul.
    pub fn degre(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    pub fn dominant(&self) -> Option<&BigRational> {
        self.coeffs.last()
    }

    /// Valeur constante si degré ≤ 0.
    pub fn comme_constante(&self) -> Option<BigRational> {
        match self.coeffs.len() {
            0 => Some(BigRational::zero()),
            1 => Some(self.coeffs[0].clone()),
            _ => None,
        }
    }

    /// Horner exact.
    pub fn evaluer(&self, x: &BigRational) -> BigRational {
        let mut acc = BigRational::zero();
        for c in self.coeffs.iter().rev() {
            acc = acc * x + c;
        }
        acc
    }

    pub fn signe_en(&self, x: &BigRational) -> i8 {
        let v = self.evaluer(x);
        if v.is_zero() {
            0
        } else if v.is_positive() {
            1
        } else {
            -1
        }
    }

    pub fn derivee(&self) -> Poly {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * BigRational::from_integer(BigInt::from(i)))
            .collect();
        Self::depuis_coeffs(coeffs)
    }

    pub fn mul_scalaire(&self, k: &BigRational) -> Poly {
        Self::depuis_coeffs(self.coeffs.iter().map(|c| c * k).collect())
    }

    /// Puissance par carrés successifs, un pas de budget par ligne de produit.
    pub fn puissance(&self, n: u32, budget: &mut Budget) -> Result<Poly, ErreurSolveur> {
        let mut acc = Poly::un();
        let mut b = self.clone();
        let mut e = n;
        while e > 0 {
            if (e & 1) == 1 {
                acc = acc.fois(&b, budget)?;
            }
            e >>= 1;
            if e > 0 {
                b = b.fois(&b, budget)?;
            }
        }
        Ok(acc)
    }

    /// Produit budgété (même résultat que `&a * &b`).
    pub fn fois(&self, autre: &Poly, budget: &mut Budget) -> Result<Poly, ErreurSolveur> {
        if self.est_zero() || autre.est_zero() {
            return Ok(Poly::zero());
        }
        let mut coeffs = vec![BigRational::zero(); self.coeffs.len() + autre.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            budget.pas()?;
            if a.is_zero() {
                continue;
            }
            for (j, b) in autre.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Ok(Poly::depuis_coeffs(coeffs))
    }

    /// Taille binaire du plus gros numérateur / dénominateur (0 pour le polynôme nul).
    pub fn bits_max(&self) -> u64 {
        self.coeffs
            .iter()
            .map(|c| c.numer().bits().max(c.denom().bits()))
            .max()
            .unwrap_or(0)
    }

    /// Division euclidienne. None si diviseur nul.
    pub fn div_rem(&self, d: &Poly) -> Option<(Poly, Poly)> {
        let dd = d.degre()?;
        let lc = d.dominant()?.clone();

        let mut r = self.coeffs.clone();
        let Some(dr) = self.degre() else {
            return Some((Poly::zero(), Poly::zero()));
        };
        if dr < dd {
            return Some((Poly::zero(), self.clone()));
        }

        let mut q = vec![BigRational::zero(); dr - dd + 1];
        let mut deg_r = dr;
        loop {
            let coef = &r[deg_r] / &lc;
            let decal = deg_r - dd;
            for (i, c) in d.coeffs.iter().enumerate() {
                r[decal + i] -= &coef * c;
            }
            q[decal] = coef;

            // le terme dominant s’annule exactement
            r.truncate(deg_r);
            while r.last().is_some_and(|c| c.is_zero()) {
                r.pop();
            }
            match r.len().checked_sub(1) {
                Some(n) if n >= dd => deg_r = n,
                _ => break,
            }
        }

        Some((Poly::depuis_coeffs(q), Poly::depuis_coeffs(r)))
    }

    /// Normalise le coefficient dominant à 1 (le polynôme nul reste nul).
    pub fn unitaire(&self) -> Poly {
        match self.dominant() {
            Some(lc) if !lc.is_one() => {
                let inv = BigRational::one() / lc;
                self.mul_scalaire(&inv)
            }
            _ => self.clone(),
        }
    }

    /// PGCD unitaire (Euclide).
    pub fn pgcd(&self, autre: &Poly, budget: &mut Budget) -> Result<Poly, ErreurSolveur> {
        let mut a = self.clone();
        let mut b = autre.clone();
        while !b.est_zero() {
            budget.pas()?;
            let (_q, r) = a.div_rem(&b).ok_or(ErreurSolveur::Delai)?;
            a = b;
            b = r.unitaire();
        }
        Ok(a.unitaire())
    }

    /// Partie sans facteur carré : p / pgcd(p, p').
    pub fn sans_carre(&self, budget: &mut Budget) -> Result<Poly, ErreurSolveur> {
        if self.degre().unwrap_or(0) < 2 {
            return Ok(self.clone());
        }
        let g = self.pgcd(&self.derivee(), budget)?;
        match self.div_rem(&g) {
            Some((q, _r)) => Ok(q),
            None => Ok(self.clone()),
        }
    }

    /// Coefficients entiers primitifs (même racines), ordre croissant.
    pub fn primitif_entier(&self) -> Vec<BigInt> {
        let ppcm = self
            .coeffs
            .iter()
            .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
        let entiers: Vec<BigInt> = self
            .coeffs
            .iter()
            .map(|c| (c * BigRational::from_integer(ppcm.clone())).to_integer())
            .collect();
        let contenu = entiers.iter().fold(BigInt::zero(), |acc, c| acc.gcd(c));
        if contenu.is_zero() || contenu.is_one() {
            return entiers;
        }
        entiers.into_iter().map(|c| c / &contenu).collect()
    }

    /// Borne de Cauchy : toute racine réelle r vérifie |r| < borne.
    pub fn borne_cauchy(&self) -> BigRational {
        let Some(lc) = self.dominant() else {
            return BigRational::one();
        };
        let max = self.coeffs[..self.coeffs.len() - 1]
            .iter()
            .map(|c| (c / lc).abs())
            .fold(BigRational::zero(), |m, v| if v > m { v } else { m });
        BigRational::one() + max
    }

    pub fn evaluer_f64(&self, x: f64) -> f64 {
        let mut acc = 0.0;
        for c in self.coeffs.iter().rev() {
            acc = acc * x + c.to_f64().unwrap_or(f64::NAN);
        }
        acc
    }
}

impl Add<&Poly> for &Poly {
    type Output = Poly;

    fn add(self, autre: &Poly) -> Poly {
        let n = self.coeffs.len().max(autre.coeffs.len());
        let coeffs = (0..n)
            .map(|i| {
                let a = self.coeffs.get(i).cloned().unwrap_or_else(BigRational::zero);
                match autre.coeffs.get(i) {
                    Some(b) => a + b,
                    None => a,
                }
            })
            .collect();
        Poly::depuis_coeffs(coeffs)
    }
}

impl Neg for &Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        Poly::depuis_coeffs(self.coeffs.iter().map(|c| -c).collect())
    }
}

impl Sub<&Poly> for &Poly {
    type Output = Poly;

    fn sub(self, autre: &Poly) -> Poly {
        self + &(-autre)
    }
}

impl Mul<&Poly> for &Poly {
    type Output = Poly;

    fn mul(self, autre: &Poly) -> Poly {
        if self.est_zero() || autre.est_zero() {
            return Poly::zero();
        }
        let mut coeffs = vec![BigRational::zero(); self.coeffs.len() + autre.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in autre.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Poly::depuis_coeffs(coeffs)
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.est_zero() {
            return write!(f, "0");
        }
        let mut premier = true;
        for (i, c) in self.coeffs.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            let abs = c.abs();
            if premier {
                if c.is_negative() {
                    write!(f, "-")?;
                }
            } else if c.is_negative() {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            premier = false;

            let coef = if abs.denom().is_one() {
                format!("{}", abs.numer())
            } else {
                format!("{}/{}", abs.numer(), abs.denom())
            };
            match i {
                0 => write!(f, "{coef}")?,
                _ => {
                    if !abs.is_one() {
                        write!(f, "{coef}*")?;
                    }
                    if i == 1 {
                        write!(f, "x")?;
                    } else {
                        write!(f, "x^{i}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::budget::LimitesSolveur;
    use super::*;

    fn budget() -> Budget {
        Budget::demarrer(LimitesSolveur::default())
    }

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn arithmetique() {
        let a = Poly::depuis_entiers(&[1, 1]); // x + 1
        let b = Poly::depuis_entiers(&[-1, 1]); // x - 1
        assert_eq!(&a * &b, Poly::depuis_entiers(&[-1, 0, 1]));
        assert_eq!(&a - &a, Poly::zero());
        assert_eq!(a.puissance(3, &mut budget()).unwrap(), Poly::depuis_entiers(&[1, 3, 3, 1]));
        assert_eq!(Poly::depuis_entiers(&[5, 0, 3]).derivee(), Poly::depuis_entiers(&[0, 6]));
    }

    #[test]
    fn division_euclidienne() {
        // x^3 - x^2 - 2x + 2 = (x - 1)(x^2 - 2)
        let p = Poly::depuis_entiers(&[2, -2, -1, 1]);
        let (qt, r) = p.div_rem(&Poly::depuis_entiers(&[-1, 1])).unwrap();
        assert_eq!(qt, Poly::depuis_entiers(&[-2, 0, 1]));
        assert!(r.est_zero());

        let (qt, r) = Poly::depuis_entiers(&[1, 0, 1])
            .div_rem(&Poly::depuis_entiers(&[0, 2]))
            .unwrap();
        assert_eq!(qt, Poly::depuis_coeffs(vec![q(0, 1), q(1, 2)]));
        assert_eq!(r, Poly::depuis_entiers(&[1]));

        assert!(p.div_rem(&Poly::zero()).is_none());
    }

    #[test]
    fn pgcd_et_sans_carre() {
        let mut b = budget();
        // (x-1)^2 (x+2)
        let p = &Poly::depuis_entiers(&[-1, 1]).puissance(2, &mut b).unwrap() * &Poly::depuis_entiers(&[2, 1]);
        let s = p.sans_carre(&mut b).unwrap();
        assert_eq!(s.unitaire(), Poly::depuis_entiers(&[-2, 1, 1]));

        let g = Poly::depuis_entiers(&[-1, 0, 1])
            .pgcd(&Poly::depuis_entiers(&[1, 2, 1]), &mut b)
            .unwrap();
        assert_eq!(g, Poly::depuis_entiers(&[1, 1]));
    }

    #[test]
    fn primitif() {
        let p = Poly::depuis_coeffs(vec![q(1, 2), q(-3, 4), q(3, 2)]);
        let e: Vec<BigInt> = p.primitif_entier();
        assert_eq!(e, vec![BigInt::from(2), BigInt::from(-3), BigInt::from(6)]);
    }

    #[test]
    fn borne_et_affichage() {
        let p = Poly::depuis_entiers(&[-5, -1, 1]);
        assert_eq!(p.borne_cauchy(), q(6, 1));
        assert_eq!(p.to_string(), "x^2 - x - 5");
        assert_eq!(Poly::depuis_coeffs(vec![q(0, 1), q(-1, 2)]).to_string(), "-1/2*x");
    }
}
