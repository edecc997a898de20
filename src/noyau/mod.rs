//! Noyau exact du traceur
//!
//! Organisation interne :
//! - validation.rs : filtre des entrées (caractères + identifiants permis)
//! - jetons.rs     : tokenisation (décimaux exacts)
//! - rpn.rs        : shunting-yard + construction Expr
//! - expr.rs       : AST exact + simplify + évaluation f64
//! - analyse.rs    : normalisation (^, logN) + pipeline texte -> Expression
//! - echantillon.rs: grille + échantillons (None = indéfini)
//! - polynome.rs   : polynômes à coefficients rationnels
//! - fraction.rs   : fractions rationnelles réduites
//! - racines.rs    : racines réelles exactes (rationnelles, quadratiques, Sturm)
//! - budget.rs     : pas + échéance du solveur
//! - solveur.rs    : intersections f1 = f2
//! - trace.rs      : pipeline complet vers une SurfaceTrace
//! - erreurs.rs    : erreurs typées

pub mod analyse;
pub mod budget;
pub mod echantillon;
pub mod erreurs;
pub mod expr;
pub mod fraction;
pub mod jetons;
pub mod polynome;
pub mod racines;
pub mod rpn;
pub mod solveur;
pub mod trace;
pub mod validation;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale (celle qu’utilise l’UI)
pub use trace::{tracer, ReglagesTrace, SurfaceMemoire};
