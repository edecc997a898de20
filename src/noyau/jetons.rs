// src/noyau/jetons.rs

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use super::erreurs::ErreurAnalyse;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(BigRational),

    // Fonctions + variables
    // NOTE: le parse (RPN->Expr) décidera si c’est une fonction (sqrt/log) ou une variable.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^ (puissance, jamais xor)
    Virgule,

    LPar,
    RPar,

    // Produits par to_rpn seulement
    Neg,
    Appel(String, usize),
}

/// Tokenize une chaîne (déjà normalisée) en jetons.
/// Supporte:
/// - décimaux exacts (ex: 12, 0.25, .5) -> Num(rationnel)
/// - opérateurs + - * / ^
/// - parenthèses ( ) et virgule (arguments de log)
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (normalisés en minuscules)
/// - √ (équivaut à ident("sqrt"))
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurAnalyse> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            ',' => Some(Tok::Virgule),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            '√' => Some(Tok::Ident("sqrt".to_string())),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Tok::Ident(word.to_lowercase()));
            continue;
        }

        // Nombre décimal : 12 | 12.5 | .5 | 12.
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let int_str: String = chars[start..i].iter().collect();

            let mut frac_str = String::new();
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                let start_f = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                frac_str = chars[start_f..i].iter().collect();
            }

            let brut: String = chars[start..i].iter().collect();
            if int_str.is_empty() && frac_str.is_empty() {
                return Err(ErreurAnalyse::NombreInvalide(brut));
            }
            // "1.2.3"
            if i < chars.len() && chars[i] == '.' {
                return Err(ErreurAnalyse::NombreInvalide(format!("{brut}.")));
            }

            out.push(Tok::Num(decimal_exact(&int_str, &frac_str).ok_or(
                ErreurAnalyse::NombreInvalide(brut),
            )?));
            continue;
        }

        return Err(ErreurAnalyse::CaractereInattendu(c));
    }

    Ok(out)
}

/// "12" + "05" -> 1205/100 (réduit).
fn decimal_exact(entier: &str, fraction: &str) -> Option<BigRational> {
    let chiffres = format!("{entier}{fraction}");
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;
    let d = BigInt::from(10).pow(fraction.len() as u32);
    if d.is_one() {
        return Some(BigRational::from_integer(n));
    }
    Some(BigRational::new(n, d))
}

/// Format utilitaire (démarche) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    fn format_rat(r: &BigRational) -> String {
        let n = r.numer();
        let d = r.denom();
        if d.is_one() {
            format!("{n}")
        } else {
            format!("{n}/{d}")
        }
    }

    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(r) => format_rat(r),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Virgule => ",".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),

            Tok::Neg => "neg".to_string(),
            Tok::Appel(nom, n) => format!("{nom}/{n}"),
        };
        out.push(s);
    }
    out.join(" ")
}
