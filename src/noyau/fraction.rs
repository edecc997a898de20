// src/noyau/fraction.rs
//
// Fractions rationnelles num/den en x, coefficients exacts.
// Forme réduite unique : pgcd(num, den) = 1, den unitaire, 0 s’écrit 0/1.
// L’égalité structurelle (PartialEq) est donc l’égalité mathématique.

use num_rational::BigRational;
use num_traits::{One, Zero};

use super::budget::Budget;
use super::erreurs::ErreurSolveur;
use super::polynome::Poly;
use super::solveur::DEGRE_MAX;

/// Garde-fou : bits estimés (taille × exposant) des coefficients d’une puissance.
const BITS_MAX_PUISSANCE: u64 = 1 << 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fraction {
    num: Poly,
    den: Poly,
}

impl Fraction {
    pub fn constante(c: BigRational) -> Self {
        Self {
            num: Poly::constante(c),
            den: Poly::un(),
        }
    }

    pub fn zero() -> Self {
        Self::constante(BigRational::zero())
    }

    pub fn x() -> Self {
        Self {
            num: Poly::x(),
            den: Poly::un(),
        }
    }

    pub fn polynome(p: Poly) -> Self {
        Self {
            num: p,
            den: Poly::un(),
        }
    }

    /// Réduit num/den. None si den est nul.
    pub fn nouvelle(num: Poly, den: Poly, budget: &mut Budget) -> Result<Option<Self>, ErreurSolveur> {
        if den.est_zero() {
            return Ok(None);
        }
        if num.est_zero() {
            return Ok(Some(Self::zero()));
        }

        let g = num.pgcd(&den, budget)?;
        let (mut n, mut d) = match (num.div_rem(&g), den.div_rem(&g)) {
            (Some((n, _)), Some((d, _))) => (n, d),
            _ => (num, den),
        };

        if let Some(lc) = d.dominant() {
            if !lc.is_one() {
                let inv = BigRational::one() / lc;
                n = n.mul_scalaire(&inv);
                d = d.mul_scalaire(&inv);
            }
        }

        Ok(Some(Self { num: n, den: d }))
    }

    pub fn num(&self) -> &Poly {
        &self.num
    }

    pub fn den(&self) -> &Poly {
        &self.den
    }

    pub fn est_zero(&self) -> bool {
        self.num.est_zero()
    }

    /// Valeur si la fraction ne dépend pas de x.
    pub fn comme_constante(&self) -> Option<BigRational> {
        let n = self.num.comme_constante()?;
        let d = self.den.comme_constante()?;
        Some(n / d)
    }

    /// Degré total (max des degrés), sert de garde-fou contre l’explosion.
    pub fn degre(&self) -> usize {
        self.num.degre().unwrap_or(0).max(self.den.degre().unwrap_or(0))
    }

    pub fn plus(&self, autre: &Fraction, budget: &mut Budget) -> Result<Fraction, ErreurSolveur> {
        if self.den == autre.den {
            let num = &self.num + &autre.num;
            return Ok(Self::nouvelle(num, self.den.clone(), budget)?.unwrap_or_else(Self::zero));
        }
        let num = &(&self.num * &autre.den) + &(&autre.num * &self.den);
        let den = &self.den * &autre.den;
        Ok(Self::nouvelle(num, den, budget)?.unwrap_or_else(Self::zero))
    }

    pub fn oppose(&self) -> Fraction {
        Self {
            num: -&self.num,
            den: self.den.clone(),
        }
    }

    pub fn moins(&self, autre: &Fraction, budget: &mut Budget) -> Result<Fraction, ErreurSolveur> {
        self.plus(&autre.oppose(), budget)
    }

    pub fn fois(&self, autre: &Fraction, budget: &mut Budget) -> Result<Fraction, ErreurSolveur> {
        let num = &self.num * &autre.num;
        let den = &self.den * &autre.den;
        Ok(Self::nouvelle(num, den, budget)?.unwrap_or_else(Self::zero))
    }

    /// None si division par zéro.
    pub fn divise(&self, autre: &Fraction, budget: &mut Budget) -> Result<Option<Fraction>, ErreurSolveur> {
        if autre.est_zero() {
            return Ok(None);
        }
        let num = &self.num * &autre.den;
        let den = &self.den * &autre.num;
        Self::nouvelle(num, den, budget)
    }

    /// Puissance entière (négative => inverse). None si 0^(-n).
    ///
    /// Refusée avant calcul si le degré ou la taille des coefficients du résultat
    /// dépasse les garde-fous.
    pub fn puissance(&self, n: i64, budget: &mut Budget) -> Result<Option<Fraction>, ErreurSolveur> {
        let k = n.unsigned_abs();
        let trop = |msg: &str| ErreurSolveur::NonSupporte(format!("{msg}: ^{n}"));

        let degre = self.degre() as u64;
        if degre.saturating_mul(k) > DEGRE_MAX as u64 {
            return Err(trop("degré trop élevé"));
        }
        let bits = self.num.bits_max().max(self.den.bits_max());
        if bits.saturating_mul(k) > BITS_MAX_PUISSANCE {
            return Err(trop("coefficients trop grands"));
        }
        let k = u32::try_from(k).map_err(|_| trop("exposant trop grand"))?;

        let num = self.num.puissance(k, budget)?;
        let den = self.den.puissance(k, budget)?;
        if n >= 0 {
            Self::nouvelle(num, den, budget)
        } else {
            Self::nouvelle(den, num, budget)
        }
    }

    pub fn evaluer_f64(&self, x: f64) -> Option<f64> {
        let d = self.den.evaluer_f64(x);
        if d == 0.0 {
            return None;
        }
        let v = self.num.evaluer_f64(x) / d;
        v.is_finite().then_some(v)
    }
}
