// src/noyau/validation.rs
//
// Frontière d’entrée unique (rejet précoce), appliquée AVANT toute analyse.
//
// Contrat :
// - texte non vide (après trim)
// - caractères permis : chiffres, lettres de la variable, lettres de log/sqrt,
//   + - * / ^ ( ), espaces, '.'
// - chaque identifiant est la variable, "log", "logN" ou "sqrt"
//   (le filtre de caractères seul laisserait passer "gol", "sort" ou "x2")
//
// Pas de virgule : la forme log(v, b) n’est produite que par la normalisation.

use std::sync::OnceLock;

use regex::Regex;

use super::erreurs::ErreurValidation;

const LETTRES_FONCTIONS: &str = "logsqrt";

fn motif_identifiant() -> &'static Regex {
    static MOTIF: OnceLock<Regex> = OnceLock::new();
    MOTIF.get_or_init(|| {
        Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("motif identifiant")
    })
}

fn motif_log_base() -> &'static Regex {
    static MOTIF: OnceLock<Regex> = OnceLock::new();
    MOTIF.get_or_init(|| Regex::new(r"^log[0-9]+$").expect("motif logN"))
}

/// Classe de caractères interdits pour une variable donnée.
fn motif_interdit(variable: &str) -> Regex {
    let lettres = regex::escape(&format!("{variable}{LETTRES_FONCTIONS}"));
    Regex::new(&format!(r"[^0-9{lettres}+\-*/^()\s.]")).expect("motif caractères")
}

pub fn valider(texte: &str, variable: &str) -> Result<(), ErreurValidation> {
    if texte.trim().is_empty() {
        return Err(ErreurValidation::Vide);
    }

    // variable elle-même : lettres ASCII seulement
    if variable.is_empty() || !variable.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ErreurValidation::IdentifiantInconnu(variable.to_string()));
    }

    if let Some(m) = motif_interdit(variable).find(texte) {
        let c = m.as_str().chars().next().unwrap_or('?');
        return Err(ErreurValidation::CaractereInterdit(c));
    }

    for m in motif_identifiant().find_iter(texte) {
        let mot = m.as_str();
        let permis = mot == variable
            || mot == "log"
            || mot == "sqrt"
            || motif_log_base().is_match(mot);
        if !permis {
            return Err(ErreurValidation::IdentifiantInconnu(mot.to_string()));
        }
    }

    Ok(())
}
