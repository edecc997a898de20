// src/noyau/erreurs.rs
//
// Erreurs typées du noyau.
// - ErreurValidation : filtre d’entrée (avant toute analyse)
// - ErreurAnalyse    : texte non analysable
// - ErreurSolveur    : intersections non déterminables (jamais fatal pour le tracé)
// - ErreurTrace      : échec d’une requête de tracé (validation ou analyse)

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErreurValidation {
    #[error("entrée vide")]
    Vide,

    #[error("caractère interdit: '{0}'")]
    CaractereInterdit(char),

    #[error("identifiant inconnu: '{0}' (seuls la variable, log et sqrt sont permis)")]
    IdentifiantInconnu(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErreurAnalyse {
    #[error("entrée vide")]
    Vide,

    #[error("caractère inattendu: '{0}'")]
    CaractereInattendu(char),

    #[error("nombre invalide: '{0}'")]
    NombreInvalide(String),

    #[error("parenthèses non fermées")]
    ParenthesesNonFermees,

    #[error("parenthèse fermante sans ouvrante")]
    ParentheseFermanteOrpheline,

    #[error("virgule hors d’un appel de fonction")]
    VirguleHorsFonction,

    #[error("fonction inconnue: '{0}'")]
    FonctionInconnue(String),

    #[error("'(' attendue après '{0}'")]
    ParentheseAttendue(String),

    #[error("{fonction} attend {attendu} argument(s), reçu {recu}")]
    Arite {
        fonction: String,
        attendu: &'static str,
        recu: usize,
    },

    #[error("expression invalide")]
    ExpressionInvalide,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErreurSolveur {
    /// Ensemble de solutions infini (ex: deux fonctions identiques).
    #[error("intersections indéterminées (courbes confondues)")]
    Indetermine,

    #[error("forme non supportée par le solveur: {0}")]
    NonSupporte(String),

    #[error("budget de résolution épuisé")]
    Delai,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErreurTrace {
    #[error("fonction {fonction}: {source}")]
    Validation {
        fonction: usize,
        #[source]
        source: ErreurValidation,
    },

    #[error("fonction {fonction}: {source}")]
    Analyse {
        fonction: usize,
        #[source]
        source: ErreurAnalyse,
    },
}
