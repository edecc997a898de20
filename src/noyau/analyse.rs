// src/noyau/analyse.rs
//
// Texte -> Expression.
//
// normaliser -> tokenize -> RPN -> Expr
//
// Normalisation (dans l’ordre) :
// 1. "**" devient "^" : '^' est l’opérateur puissance de la grammaire (jamais xor).
// 2. log<N>(<arg>) devient log(<arg>, <N>) en UNE seule passe regex.
//    log(...) sans chiffres reste tel quel => logarithme naturel.
//    Une imbrication log2(log3(x)) n’est réécrite qu’au premier niveau ;
//    le "log3" restant est refusé par le parse (fonction inconnue).

use std::sync::OnceLock;

use regex::Regex;

use super::erreurs::ErreurAnalyse;
use super::expr::Expr;
use super::jetons::{format_tokens, tokenize};
use super::rpn::{from_rpn, to_rpn};

/// Fonction d’une variable, construite une fois par texte, jamais modifiée.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expression {
    expr: Expr,
    variable: String,
}

impl Expression {
    pub fn depuis_expr(expr: Expr, variable: &str) -> Self {
        Self {
            expr,
            variable: variable.to_string(),
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Valeur réelle en x, None si indéfinie.
    pub fn evaluer(&self, x: f64) -> Option<f64> {
        self.expr.evaluer(&self.variable, x)
    }
}

/// Étapes intermédiaires de l’analyse (affichées par l’UI).
#[derive(Default, Clone, Debug)]
pub struct DemarcheAnalyse {
    pub normalise: String,
    pub jetons: String,
    pub rpn: String,
}

fn motif_log_base() -> &'static Regex {
    static MOTIF: OnceLock<Regex> = OnceLock::new();
    MOTIF.get_or_init(|| {
        Regex::new(r"log(\d+)\(([^)]+)\)").unwrap_or_else(|e| panic!("motif log invalide: {e}"))
    })
}

/// Réécritures textuelles avant tokenisation.
pub fn normaliser(texte: &str) -> String {
    let s = texte.replace("**", "^");
    motif_log_base()
        .replace_all(&s, "log(${2}, ${1})")
        .into_owned()
}

/// API publique : analyse un texte en Expression sur `variable`.
///
/// Les identifiants autres que la variable deviennent des Var étrangères :
/// les refuser est le rôle de la validation (voir validation.rs).
pub fn analyser(texte: &str, variable: &str) -> Result<Expression, ErreurAnalyse> {
    analyser_avec_demarche(texte, variable).map(|(e, _d)| e)
}

pub fn analyser_avec_demarche(
    texte: &str,
    variable: &str,
) -> Result<(Expression, DemarcheAnalyse), ErreurAnalyse> {
    let s = texte.trim();
    if s.is_empty() {
        return Err(ErreurAnalyse::Vide);
    }

    let normalise = normaliser(s);
    let jetons = tokenize(&normalise)?;
    let rpn = to_rpn(&jetons)?;
    let expr = from_rpn(&rpn)?;

    let d = DemarcheAnalyse {
        jetons: format_tokens(&jetons),
        rpn: format_tokens(&rpn),
        normalise,
    };

    Ok((Expression::depuis_expr(expr, variable), d))
}
