// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Ident(name):
//    - si name ∈ {sqrt, log} => appel de fonction, '(' obligatoire
//    - si suivi de '(' sans être une fonction connue => FonctionInconnue
//    - sinon => variable/atome (Expr::Var)
// - Appels: l’arité est comptée (virgules) et sortie en RPN comme Appel(nom, n)
// - Moins unaire: opérateur préfixe Neg, plus faible que ^ et plus fort que * /
//   ("-x^2" => -(x^2), "2*-x" => 2*(-x))
// - Plus unaire: ignoré
// - Juxtaposition ("2x", "x(x)") => ExpressionInvalide (pas de produit implicite)

use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use super::erreurs::ErreurAnalyse;
use super::expr::Expr;
use super::jetons::Tok;

/// Garde-fou : profondeur maximum de l’arbre construit (simplify/evaluer sont récursifs).
pub const PROFONDEUR_MAX: usize = 256;

/// Garde-fou : taille maximum de la pile d’opérateurs.
const MAX_PILE: usize = 2 * PROFONDEUR_MAX;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Neg => 3,
        Tok::Caret => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret | Tok::Neg)
}

/// Identificateurs reconnus comme fonctions.
fn is_fonction_ident(name: &str) -> bool {
    matches!(name, "sqrt" | "log")
}

/// Un groupe = une parenthèse ouverte (appel de fonction ou simple regroupement).
struct Groupe {
    fonction: bool,
    virgules: usize,
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("log"), LPar, Ident("x"), Virgule, Num(2), RPar]
///   rpn:    [Ident("x"), Num(2), Appel("log", 2)]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Tok>, ErreurAnalyse> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();
    let mut groupes: Vec<Groupe> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire et les juxtapositions.
    let mut prev_was_value = false;

    for (i, tok) in tokens.iter().cloned().enumerate() {
        if ops.len() > MAX_PILE || groupes.len() > PROFONDEUR_MAX {
            return Err(ErreurAnalyse::ExpressionInvalide);
        }
        let suivant_est_lpar = matches!(tokens.get(i + 1), Some(Tok::LPar));

        match tok {
            Tok::Num(_) => {
                if prev_was_value {
                    return Err(ErreurAnalyse::ExpressionInvalide);
                }
                out.push(tok);
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                if prev_was_value {
                    return Err(ErreurAnalyse::ExpressionInvalide);
                }
                if is_fonction_ident(&name) {
                    if !suivant_est_lpar {
                        return Err(ErreurAnalyse::ParentheseAttendue(name));
                    }
                    // fonction : on la garde sur la pile (elle sortira après ses arguments)
                    ops.push(Tok::Ident(name));
                    groupes.push(Groupe {
                        fonction: true,
                        virgules: 0,
                    });
                    prev_was_value = false;
                } else if suivant_est_lpar {
                    return Err(ErreurAnalyse::FonctionInconnue(name));
                } else {
                    out.push(Tok::Ident(name));
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err(ErreurAnalyse::ExpressionInvalide);
                }
                // le groupe d’un appel a déjà été ouvert par l’identifiant
                let appel = matches!(ops.last(), Some(Tok::Ident(_)));
                if !appel {
                    groupes.push(Groupe {
                        fonction: false,
                        virgules: 0,
                    });
                }
                ops.push(tok);
                prev_was_value = false;
            }

            Tok::Virgule => {
                if !prev_was_value {
                    return Err(ErreurAnalyse::ExpressionInvalide);
                }
                depile_jusqu_a_lpar(&mut ops, &mut out)
                    .ok_or(ErreurAnalyse::VirguleHorsFonction)?;
                match groupes.last_mut() {
                    Some(g) if g.fonction => g.virgules += 1,
                    _ => return Err(ErreurAnalyse::VirguleHorsFonction),
                }
                prev_was_value = false;
            }

            Tok::RPar => {
                depile_jusqu_a_lpar(&mut ops, &mut out)
                    .ok_or(ErreurAnalyse::ParentheseFermanteOrpheline)?;
                // retire la '(' elle-même
                ops.pop();

                let groupe = groupes
                    .pop()
                    .ok_or(ErreurAnalyse::ParentheseFermanteOrpheline)?;

                if groupe.fonction {
                    let arite = if prev_was_value {
                        groupe.virgules + 1
                    } else if groupe.virgules == 0 {
                        0
                    } else {
                        // "log(x,)"
                        return Err(ErreurAnalyse::ExpressionInvalide);
                    };
                    match ops.pop() {
                        Some(Tok::Ident(name)) => out.push(Tok::Appel(name, arite)),
                        _ => return Err(ErreurAnalyse::ExpressionInvalide),
                    }
                } else if !prev_was_value {
                    // "()"
                    return Err(ErreurAnalyse::ExpressionInvalide);
                }

                prev_was_value = true;
            }

            Tok::Plus | Tok::Minus if !prev_was_value => {
                // signe unaire : '+' ignoré, '-' devient Neg (préfixe, pas de dépilement)
                if matches!(tok, Tok::Minus) {
                    ops.push(Tok::Neg);
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                if !prev_was_value {
                    return Err(ErreurAnalyse::ExpressionInvalide);
                }

                // dépile tant que:
                // - on n'est pas bloqué par '('
                // - et la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last() {
                    if matches!(top, Tok::LPar | Tok::Ident(_)) {
                        break;
                    }

                    let p_top = precedence(top);
                    let p_tok = precedence(&tok);

                    let doit_pop = if is_right_associative(&tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    if !doit_pop {
                        break;
                    }
                    if let Some(op) = ops.pop() {
                        out.push(op);
                    }
                }

                ops.push(tok);
                prev_was_value = false;
            }

            Tok::Neg | Tok::Appel(_, _) => return Err(ErreurAnalyse::ExpressionInvalide),
        }
    }

    if !prev_was_value {
        // entrée vide ou opérateur pendant
        return Err(if tokens.is_empty() {
            ErreurAnalyse::Vide
        } else {
            ErreurAnalyse::ExpressionInvalide
        });
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar | Tok::Ident(_)) {
            return Err(ErreurAnalyse::ParenthesesNonFermees);
        }
        out.push(op);
    }

    Ok(out)
}

/// Dépile vers `out` jusqu’à la '(' la plus proche (laissée sur la pile).
/// None si aucune '(' ouverte.
fn depile_jusqu_a_lpar(ops: &mut Vec<Tok>, out: &mut Vec<Tok>) -> Option<()> {
    loop {
        match ops.last() {
            None => return None,
            Some(Tok::LPar) => return Some(()),
            Some(_) => {
                let op = ops.pop()?;
                out.push(op);
            }
        }
    }
}

/// Construit une Expr à partir d’une RPN.
///
/// - Ident(name) => variable : Expr::Var(name)
/// - Appel("sqrt", 1) => Sqrt ; Appel("log", 1) => Ln ; Appel("log", 2) => Log(valeur, base)
/// - Caret : exposant entier constant => PowInt, sinon Pow
pub fn from_rpn(rpn: &[Tok]) -> Result<Expr, ErreurAnalyse> {
    // chaque entrée garde la profondeur de son sous-arbre
    let mut st: Vec<(Expr, usize)> = Vec::new();

    fn depile(st: &mut Vec<(Expr, usize)>) -> Result<(Expr, usize), ErreurAnalyse> {
        st.pop().ok_or(ErreurAnalyse::ExpressionInvalide)
    }

    for tok in rpn.iter().cloned() {
        let (e, profondeur) = match tok {
            Tok::Num(r) => (Expr::Rat(r), 1),
            Tok::Ident(name) => (Expr::Var(name), 1),

            Tok::Neg => match depile(&mut st)? {
                (Expr::Rat(r), p) => (Expr::Rat(-r), p),
                (autre, p) => (
                    Expr::Sub(Box::new(Expr::Rat(BigRational::zero())), Box::new(autre)),
                    p + 1,
                ),
            },

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let (b, pb) = depile(&mut st)?;
                let (a, pa) = depile(&mut st)?;

                let e = match tok {
                    Tok::Plus => Expr::Add(Box::new(a), Box::new(b)),
                    Tok::Minus => Expr::Sub(Box::new(a), Box::new(b)),
                    Tok::Star => Expr::Mul(Box::new(a), Box::new(b)),
                    Tok::Slash => Expr::Div(Box::new(a), Box::new(b)),
                    _ => puissance(a, b),
                };
                (e, pa.max(pb) + 1)
            }

            Tok::Appel(name, arite) => match (name.as_str(), arite) {
                ("sqrt", 1) => {
                    let (x, p) = depile(&mut st)?;
                    (Expr::Sqrt(Box::new(x)), p + 1)
                }
                ("log", 1) => {
                    let (x, p) = depile(&mut st)?;
                    (Expr::Ln(Box::new(x)), p + 1)
                }
                ("log", 2) => {
                    let (base, pb) = depile(&mut st)?;
                    let (valeur, pv) = depile(&mut st)?;
                    (Expr::Log(Box::new(valeur), Box::new(base)), pv.max(pb) + 1)
                }
                ("sqrt", recu) => {
                    return Err(ErreurAnalyse::Arite {
                        fonction: name,
                        attendu: "1",
                        recu,
                    })
                }
                ("log", recu) => {
                    return Err(ErreurAnalyse::Arite {
                        fonction: name,
                        attendu: "1 ou 2",
                        recu,
                    })
                }
                _ => return Err(ErreurAnalyse::FonctionInconnue(name)),
            },

            Tok::LPar | Tok::RPar | Tok::Virgule => {
                return Err(ErreurAnalyse::ExpressionInvalide)
            }
        };

        if profondeur > PROFONDEUR_MAX {
            return Err(ErreurAnalyse::ExpressionInvalide);
        }
        st.push((e, profondeur));
    }

    if st.len() != 1 {
        return Err(ErreurAnalyse::ExpressionInvalide);
    }
    depile(&mut st).map(|(e, _)| e)
}

fn puissance(base: Expr, exposant: Expr) -> Expr {
    if let Expr::Rat(r) = &exposant {
        if r.is_integer() {
            if let Some(n) = r.numer().to_i64() {
                return Expr::PowInt(Box::new(base), n);
            }
        }
    }
    Expr::Pow(Box::new(base), Box::new(exposant))
}
