// src/noyau/expr.rs
//
// AST exact d’une fonction d’une variable réelle.
// - Rat : rationnel exact (les décimaux littéraux aussi : 0.5 = 1/2)
// - Var : variable symbolique (ex: x)
// - PowInt : exposant entier constant ; Pow : exposant quelconque
// - Log(v, b) : logarithme de base b ; Ln(v) : logarithme naturel
// - le moins unaire est Sub(0, e)
//
// IMPORTANT (SAFE):
// - simplify() ne doit jamais “inventer” une valeur pour Var.
// - evaluer() ne lève jamais : tout résultat non réel / infini / échoué => None.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Rat(BigRational),
    Var(String),

    Sqrt(Box<Expr>),            // √(x)
    PowInt(Box<Expr>, i64),     // x^n (n entier)
    Pow(Box<Expr>, Box<Expr>),  // x^e (e quelconque)
    Log(Box<Expr>, Box<Expr>),  // log(valeur, base)
    Ln(Box<Expr>),              // log(valeur)

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn entier(n: i64) -> Expr {
        Expr::Rat(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn var(nom: &str) -> Expr {
        Expr::Var(nom.to_string())
    }

    /// Simplification locale (SAFE), sans heuristiques.
    /// Objectif: replier les constantes et normaliser les puissances avant résolution.
    pub fn simplify(self) -> Expr {
        use Expr::*;

        match self {
            Rat(_) | Var(_) => self,

            Add(a, b) => {
                let a = a.simplify();
                let b = b.simplify();
                match (&a, &b) {
                    (Rat(x), Rat(y)) => Rat(x + y),
                    (Rat(x), _) if x.is_zero() => b,
                    (_, Rat(y)) if y.is_zero() => a,
                    _ => Add(Box::new(a), Box::new(b)),
                }
            }

            Sub(a, b) => {
                let a = a.simplify();
                let b = b.simplify();

                // x - x => 0
                if a == b {
                    return Rat(BigRational::zero());
                }

                match (&a, &b) {
                    (Rat(x), Rat(y)) => Rat(x - y),
                    (_, Rat(y)) if y.is_zero() => a,
                    _ => Sub(Box::new(a), Box::new(b)),
                }
            }

            Mul(a, b) => {
                let a = a.simplify();
                let b = b.simplify();

                // √x * √x => x
                if let (Sqrt(x), Sqrt(y)) = (&a, &b) {
                    if x.as_ref() == y.as_ref() {
                        return (*x.clone()).simplify();
                    }
                }

                match (&a, &b) {
                    (Rat(x), Rat(y)) => Rat(x * y),
                    (Rat(x), _) if x.is_one() => b,
                    (_, Rat(y)) if y.is_one() => a,
                    _ => Mul(Box::new(a), Box::new(b)),
                }
            }

            Div(a, b) => {
                let a = a.simplify();
                let b = b.simplify();

                // division par zéro : on garde symbolique (evaluer() rendra None)
                if let Rat(y) = &b {
                    if y.is_zero() {
                        return Div(Box::new(a), Box::new(b));
                    }
                }

                match (&a, &b) {
                    (Rat(x), Rat(y)) => Rat(x / y),
                    (_, Rat(y)) if y.is_one() => a,
                    _ => Div(Box::new(a), Box::new(b)),
                }
            }

            PowInt(base, n) => {
                let base = base.simplify();
                if n == 1 {
                    return base;
                }
                if let Rat(r) = &base {
                    // 0^(-n) et puissances trop grosses restent symboliques
                    if let Some(v) = replier_puissance(r, n) {
                        return Rat(v);
                    }
                }
                PowInt(Box::new(base), n)
            }

            Pow(base, e) => {
                let base = base.simplify();
                let e = e.simplify();
                if let Rat(r) = &e {
                    if r.denom().is_one() {
                        if let Some(n) = r.numer().to_i64() {
                            return PowInt(Box::new(base), n).simplify();
                        }
                    } else if *r == demi() {
                        return Sqrt(Box::new(base)).simplify();
                    }
                }
                Pow(Box::new(base), Box::new(e))
            }

            Sqrt(x) => {
                let x = x.simplify();
                if let Rat(r) = &x {
                    if let Some(s) = rational_sqrt_exact(r) {
                        return Rat(s);
                    }
                }
                Sqrt(Box::new(x))
            }

            Log(v, b) => {
                let v = v.simplify();
                let b = b.simplify();
                if let Rat(rb) = &b {
                    if rb.is_positive() && !rb.is_one() {
                        if matches!(&v, Rat(rv) if rv.is_one()) {
                            return Rat(BigRational::zero());
                        }
                        if v == b {
                            return Rat(BigRational::one());
                        }
                    }
                }
                Log(Box::new(v), Box::new(b))
            }

            Ln(v) => {
                let v = v.simplify();
                if matches!(&v, Rat(rv) if rv.is_one()) {
                    return Rat(BigRational::zero());
                }
                Ln(Box::new(v))
            }
        }
    }

    /// Évaluation numérique en un point réel.
    ///
    /// None si : valeur non réelle (√ négatif, log ≤ 0, base négative ^ non entier),
    /// division par zéro, non fini, ou variable étrangère.
    pub fn evaluer(&self, variable: &str, x: f64) -> Option<f64> {
        use Expr::*;

        let v = match self {
            Rat(r) => r.to_f64()?,
            Var(nom) => {
                if nom != variable {
                    return None;
                }
                x
            }

            Add(a, b) => a.evaluer(variable, x)? + b.evaluer(variable, x)?,
            Sub(a, b) => a.evaluer(variable, x)? - b.evaluer(variable, x)?,
            Mul(a, b) => a.evaluer(variable, x)? * b.evaluer(variable, x)?,
            Div(a, b) => {
                let va = a.evaluer(variable, x)?;
                let vb = b.evaluer(variable, x)?;
                if vb == 0.0 {
                    return None;
                }
                va / vb
            }

            PowInt(base, n) => {
                let vb = base.evaluer(variable, x)?;
                match i32::try_from(*n) {
                    Ok(k) => vb.powi(k),
                    Err(_) => vb.powf(*n as f64),
                }
            }
            Pow(base, e) => {
                let vb = base.evaluer(variable, x)?;
                let ve = e.evaluer(variable, x)?;
                // valeur principale complexe
                if vb < 0.0 && ve.fract() != 0.0 {
                    return None;
                }
                vb.powf(ve)
            }

            Sqrt(a) => {
                let va = a.evaluer(variable, x)?;
                if va < 0.0 {
                    return None;
                }
                va.sqrt()
            }
            Log(a, b) => {
                let va = a.evaluer(variable, x)?;
                let vb = b.evaluer(variable, x)?;
                if va <= 0.0 || vb <= 0.0 || vb == 1.0 {
                    return None;
                }
                va.ln() / vb.ln()
            }
            Ln(a) => {
                let va = a.evaluer(variable, x)?;
                if va <= 0.0 {
                    return None;
                }
                va.ln()
            }
        };

        if v.is_finite() {
            Some(v)
        } else {
            None
        }
    }

    /// Vrai si l’arbre ne contient aucune variable.
    /// Itératif + garde-fous : si l'arbre est trop gros, on retourne false (SAFE).
    pub fn est_constante(&self) -> bool {
        use Expr::*;

        const MAX_PILE: usize = 8192;
        const MAX_NOEUDS: usize = 200_000;

        let mut pile: Vec<&Expr> = Vec::with_capacity(64);
        pile.push(self);

        let mut visites: usize = 0;

        while let Some(e) = pile.pop() {
            visites += 1;
            if visites > MAX_NOEUDS || pile.len() > MAX_PILE {
                return false;
            }

            match e {
                Var(_) => return false,
                Rat(_) => {}

                Sqrt(x) | Ln(x) | PowInt(x, _) => pile.push(x.as_ref()),

                Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) | Pow(a, b) | Log(a, b) => {
                    pile.push(a.as_ref());
                    pile.push(b.as_ref());
                }
            }
        }

        true
    }
}

fn demi() -> BigRational {
    BigRational::new(BigInt::one(), BigInt::from(2))
}

/* ------------------------ Affichage debug (pas “joli” final) ------------------------ */

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        match self {
            Rat(r) => {
                let n = r.numer();
                let d = r.denom();
                if d.is_one() {
                    write!(f, "{n}")
                } else {
                    write!(f, "{n}/{d}")
                }
            }
            Var(s) => write!(f, "{s}"),
            Sqrt(x) => write!(f, "√({x})"),
            PowInt(x, n) => write!(f, "({x})^{n}"),
            Pow(x, e) => write!(f, "({x})^({e})"),
            Log(v, b) => write!(f, "log({v}, {b})"),
            Ln(v) => write!(f, "ln({v})"),
            Add(a, b) => write!(f, "({a}+{b})"),
            Sub(a, b) => write!(f, "({a}-{b})"),
            Mul(a, b) => write!(f, "({a}*{b})"),
            Div(a, b) => write!(f, "({a}/{b})"),
        }
    }
}

/* ------------------------ Outils rationnels (simplify + racines) ------------------------ */

/// Garde-fou : bits estimés d’une puissance constante repliée par simplify().
const BITS_MAX_REPLI: u64 = 1 << 16;

/// r^n exact si le résultat reste de taille raisonnable.
/// None si 0^(-n) ou si le résultat dépasserait BITS_MAX_REPLI.
fn replier_puissance(r: &BigRational, n: i64) -> Option<BigRational> {
    if r.is_zero() {
        return (n >= 0).then(|| rational_pow_int(r.clone(), n));
    }
    // ±1 : seule la parité compte
    if r.numer().abs().is_one() && r.denom().is_one() {
        return Some(rational_pow_int(r.clone(), n % 2));
    }
    let bits = r.numer().bits().max(r.denom().bits());
    if bits.saturating_mul(n.unsigned_abs()) > BITS_MAX_REPLI {
        return None;
    }
    Some(rational_pow_int(r.clone(), n))
}

pub(crate) fn rational_pow_int(base: BigRational, exp: i64) -> BigRational {
    // |exp| en u64 : i64::MIN n’a pas d’opposé en i64
    let mut e = exp.unsigned_abs();
    let mut acc = BigRational::one();
    let mut b = base;

    while e > 0 {
        if (e & 1) == 1 {
            acc *= b.clone();
        }
        e >>= 1;
        if e > 0 {
            b *= b.clone();
        }
    }

    if exp < 0 {
        acc.recip()
    } else {
        acc
    }
}

pub(crate) fn rational_sqrt_exact(r: &BigRational) -> Option<BigRational> {
    if r.is_negative() {
        return None;
    }
    let n = r.numer();
    let d = r.denom();
    let sn = int_sqrt_exact(n)?;
    let sd = int_sqrt_exact(d)?;
    Some(BigRational::new(sn, sd))
}

fn int_sqrt_exact(x: &BigInt) -> Option<BigInt> {
    if x.is_negative() {
        return None;
    }
    let s = int_sqrt_floor(x);
    if &s * &s == *x {
        Some(s)
    } else {
        None
    }
}

pub(crate) fn int_sqrt_floor(x: &BigInt) -> BigInt {
    if x.is_zero() || x.is_negative() {
        return BigInt::zero();
    }

    let mut y = approx_sqrt_start(x);
    loop {
        let y_next = (&y + (x / &y)) >> 1;
        if y_next >= y {
            let mut z = y_next;
            while (&z + 1u32) * (&z + 1u32) <= *x {
                z += 1u32;
            }
            while &z * &z > *x {
                z -= 1u32;
            }
            return z;
        }
        y = y_next;
    }
}

fn approx_sqrt_start(x: &BigInt) -> BigInt {
    let bits = x.bits();
    let half = bits.div_ceil(2);
    BigInt::one() << half
}
