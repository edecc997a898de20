//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : trouver les limites sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (degré, longueur, chiffres)
//! - budget solveur réduit pour les cas lourds
//!
//! Notes (aligné avec l’état actuel du noyau) :
//! - Les points sont arrondis à 2 décimales : on compare en ensemble, avec tolérance.
//! - y = f1(x) avant arrondi. Pour x^2 = x + 5, y vaut 3.2087... donc "3.21".
//! - Les racines parasites (élévation au carré pour √) sont écartées par vérification.

use std::time::{Duration, Instant};

use super::analyse::analyser;
use super::budget::LimitesSolveur;
use super::echantillon::{echantillonner, Domaine, POINTS_DEFAUT};
use super::erreurs::{ErreurAnalyse, ErreurSolveur, ErreurTrace};
use super::solveur::{intersections, PointIntersection};
use super::trace::{tracer, ReglagesTrace, SurfaceMemoire};
use super::validation::valider;

fn solve(f1: &str, f2: &str, limites: LimitesSolveur) -> Result<Vec<PointIntersection>, ErreurSolveur> {
    let e1 = analyser(f1, "x").unwrap_or_else(|e| panic!("f1={f1:?} err={e}"));
    let e2 = analyser(f2, "x").unwrap_or_else(|e| panic!("f2={f2:?} err={e}"));
    intersections(&e1, &e2, limites)
}

fn solve_ok(f1: &str, f2: &str) -> Vec<PointIntersection> {
    solve(f1, f2, LimitesSolveur::default()).unwrap_or_else(|e| panic!("{f1:?} vs {f2:?}: {e}"))
}

fn assert_ensemble(f1: &str, f2: &str, attendus: &[(f64, f64)], tol: f64) {
    let obtenus = solve_ok(f1, f2);
    let libelles: Vec<String> = obtenus.iter().map(PointIntersection::libelle).collect();
    assert_eq!(obtenus.len(), attendus.len(), "{f1:?} vs {f2:?}: {libelles:?}");
    for &(x, y) in attendus {
        assert!(
            obtenus
                .iter()
                .any(|p| (p.x - x).abs() <= tol && (p.y - y).abs() <= tol),
            "{f1:?} vs {f2:?}: ({x}, {y}) absent de {libelles:?}"
        );
    }
}

/// Budget global anti-gel (scientifique + safe).
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Intersections de référence ------------------------ */

#[test]
fn sci_references() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    assert_ensemble("x^2", "x + 5", &[(-1.79, 3.20), (2.79, 7.79)], 0.01 + 1e-9);
    budget(t0, max);
    assert_ensemble("x^3", "x", &[(-1.0, -1.0), (0.0, 0.0), (1.0, 1.0)], 0.01);
    budget(t0, max);
    assert_ensemble("log2(x)", "log10(x)", &[(1.0, 0.0)], 0.01);
    budget(t0, max);
    assert_ensemble(
        "x^3 - 3*x + 1",
        "x^2 - x - 1",
        &[(-1.41, 2.41), (1.0, -1.0), (1.41, -0.41)],
        0.01,
    );
    budget(t0, max);
    assert_ensemble("sqrt(x)", "x^2", &[(0.0, 0.0), (1.0, 1.0)], 0.01);
    budget(t0, max);
    assert_ensemble(
        "x^4 - x^2",
        "x^3",
        &[(-0.62, -0.24), (0.0, 0.0), (1.62, 4.24)],
        0.01,
    );
    budget(t0, max);
}

#[test]
fn sci_cas_limites() {
    assert_eq!(solve("x", "x", LimitesSolveur::default()), Err(ErreurSolveur::Indetermine));
    assert_eq!(
        solve("2*(x + 1)", "2*x + 2", LimitesSolveur::default()),
        Err(ErreurSolveur::Indetermine)
    );
    assert!(solve_ok("x^2", "-1 - x^2").is_empty());
    // droites parallèles : aucune racine, pas d’indétermination
    assert!(solve_ok("x + 1", "x + 2").is_empty());
    // log de base 1 : refusé plutôt qu’une division par ln(1) = 0
    assert!(matches!(
        solve("log1(x)", "x", LimitesSolveur::default()),
        Err(ErreurSolveur::NonSupporte(_))
    ));
}

/* ------------------------ Invariants ------------------------ */

#[test]
fn sci_symetrie_des_arguments() {
    for (f1, f2) in [
        ("x^2", "x + 5"),
        ("x^3", "x"),
        ("sqrt(x)", "x^2"),
        ("x^3 - 3*x + 1", "x^2 - x - 1"),
    ] {
        let a: Vec<f64> = solve_ok(f1, f2).iter().map(|p| p.x).collect();
        let b: Vec<f64> = solve_ok(f2, f1).iter().map(|p| p.x).collect();
        assert_eq!(a, b, "{f1:?} / {f2:?}");
    }
}

#[test]
fn sci_points_sur_les_deux_courbes() {
    for (f1, f2) in [
        ("x^2", "x + 5"),
        ("x^5 - 5*x^3", "-3"),
        ("1/x", "x - 1"),
        ("sqrt(x + 2)", "x"),
        ("log(x)", "2"),
    ] {
        let e1 = analyser(f1, "x").unwrap();
        let e2 = analyser(f2, "x").unwrap();
        let points = intersections(&e1, &e2, LimitesSolveur::default())
            .unwrap_or_else(|e| panic!("{f1:?} vs {f2:?}: {e}"));
        assert!(!points.is_empty(), "{f1:?} vs {f2:?}");
        for p in &points {
            let x = p.racine.valeur();
            let (y1, y2) = (e1.evaluer(x).unwrap(), e2.evaluer(x).unwrap());
            assert!((y1 - y2).abs() <= 1e-6 * 1f64.max(y1.abs()), "{f1:?} en x={x}");
            assert!((p.y - y1).abs() <= 0.005 + 1e-12);
            assert!((p.x - x).abs() <= 0.005 + 1e-12);
        }
        assert!(points.windows(2).all(|w| w[0].x <= w[1].x));
    }
}

#[test]
fn sci_sturm_racines_irrationnelles() {
    // pas de racine rationnelle, degré 3 et 5 (3 racines réelles sur 5)
    assert_ensemble("x^3", "2", &[(1.26, 2.0)], 1e-9);
    let p = solve_ok("x^5 - 5*x^3", "-3");
    assert_eq!(p.len(), 3);
    assert!(p.iter().all(|q| q.y == -3.0));
}

/* ------------------------ Limites (budget) ------------------------ */

#[test]
fn sci_budget_pas_et_duree() {
    let zero_pas = LimitesSolveur {
        pas_max: 0,
        ..LimitesSolveur::default()
    };
    assert_eq!(solve("x^3", "2", zero_pas), Err(ErreurSolveur::Delai));

    let zero_duree = LimitesSolveur {
        duree_max: Duration::ZERO,
        ..LimitesSolveur::default()
    };
    assert_eq!(solve("x^7 - 3*x + 1", "0", zero_duree), Err(ErreurSolveur::Delai));
}

#[test]
fn sci_degre_trop_eleve_refuse_vite() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    assert!(matches!(
        solve("x^300", "1", LimitesSolveur::default()),
        Err(ErreurSolveur::NonSupporte(_))
    ));
    budget(t0, max);
}

/// Issue du solveur via le pipeline complet (validation + analyse + échantillons).
fn issue_pipeline(f1: &str, f2: &str) -> Result<Vec<PointIntersection>, ErreurSolveur> {
    let mut surface = SurfaceMemoire::default();
    let rapport = tracer(f1, f2, &mut surface, &ReglagesTrace::default())
        .unwrap_or_else(|e| panic!("{f1:?} vs {f2:?}: {e}"));
    assert_eq!(surface.courbes.len(), 2);
    rapport.issue_solveur
}

fn refus_ou_delai(issue: &Result<Vec<PointIntersection>, ErreurSolveur>) -> bool {
    matches!(issue, Err(ErreurSolveur::NonSupporte(_)) | Err(ErreurSolveur::Delai))
}

#[test]
fn sci_exposant_constant_geant_ne_gele_pas() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1500);

    let issue = issue_pipeline("x + 2^30000000", "x^2");
    assert!(refus_ou_delai(&issue), "{issue:?}");
    budget(t0, max);

    // sous le garde-fou, la constante est repliée normalement
    let p = solve_ok("x + 2^10", "2*x");
    assert_eq!(p.len(), 1);
    assert_eq!(p[0].libelle(), "(1024.00, 2048.00)");
    budget(t0, max);
}

#[test]
fn sci_exposant_i64_min_ne_panique_pas() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1500);

    for (f1, f2) in [
        ("2^-9223372036854775808", "x"),
        ("x^-9223372036854775808", "x"),
        ("1^-9223372036854775808", "x"),
    ] {
        let issue = issue_pipeline(f1, f2);
        budget(t0, max);
        if f1.starts_with('1') {
            // 1^n = 1 : une intersection en x = 1
            let p = issue.unwrap_or_else(|e| panic!("{f1:?}: {e}"));
            assert_eq!(p.len(), 1);
            assert_eq!(p[0].x, 1.0);
        } else {
            assert!(refus_ou_delai(&issue), "{f1:?}: {issue:?}");
        }
    }
}

#[test]
fn sci_puissance_de_polynome_haut_degre_refusee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1500);

    for (f1, f2) in [
        ("(x^200 + x + 1)^200", "x"),
        ("(x^2 + 1)^256", "x"),
        ("sqrt(x^100 + 1)^255", "x"),
        ("(x^129 + 1)^2", "1"),
    ] {
        let issue = issue_pipeline(f1, f2);
        assert!(refus_ou_delai(&issue), "{f1:?}: {issue:?}");
        budget(t0, max);
    }
}

#[test]
fn sci_imbrication_profonde_refusee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1500);
    let n = 100_000;

    for profond in [
        format!("{}x{}", "sqrt(".repeat(n), ")".repeat(n)),
        format!("{}x{}", "(".repeat(n), ")".repeat(n)),
        format!("{}x", "-".repeat(n)),
        vec!["x"; 2_000].join("^"),
    ] {
        let mut surface = SurfaceMemoire::default();
        let r = tracer(&profond, "1", &mut surface, &ReglagesTrace::default());
        assert!(
            matches!(
                r,
                Err(ErreurTrace::Analyse {
                    fonction: 1,
                    source: ErreurAnalyse::ExpressionInvalide
                })
            ),
            "{:?}",
            r.err()
        );
        assert!(surface.courbes.is_empty());
        budget(t0, max);
    }

    // imbrication raisonnable : tracée et résolue
    let moyen = format!("{}x{}", "(".repeat(100), ")".repeat(100));
    let p = issue_pipeline(&moyen, "1").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(p.len(), 1);
    assert_eq!(p[0].x, 1.0);
    budget(t0, max);
}

#[test]
fn sci_indetermine_ne_gele_pas() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    for (f1, f2) in [
        ("x", "x"),
        ("(x + 1)^2", "x^2 + 2*x + 1"),
        ("sqrt(x)*sqrt(x)", "x"),
        ("log2(x)", "log2(x)"),
    ] {
        assert_eq!(
            solve(f1, f2, LimitesSolveur::default()),
            Err(ErreurSolveur::Indetermine),
            "{f1:?} vs {f2:?}"
        );
        budget(t0, max);
    }
}

#[test]
fn sci_stress_somme_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // 80 termes x/2 = 40x ; 40x = x^2 => x = 0 ou 40
    let mut f1 = String::new();
    for k in 0..80 {
        if k > 0 {
            f1.push_str(" + ");
        }
        f1.push_str("x/2");
        budget(t0, max);
    }

    assert_ensemble(&f1, "x^2", &[(0.0, 0.0), (40.0, 1600.0)], 1e-9);
    budget(t0, max);
}

#[test]
fn sci_stress_bigint_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // gros coefficient contrôlé (30 chiffres) : racines 0 et 10^30 - 1
    let big = "9".repeat(30);
    let p = solve_ok(&format!("{big}*x"), "x^2");
    budget(t0, max);

    assert_eq!(p.len(), 2);
    assert_eq!(p[0].x, 0.0);
    assert!((p[1].x - 1e30).abs() <= 1e16);
}

/* ------------------------ Échantillonnage + validation ------------------------ */

#[test]
fn sci_echantillonnage_coherent() {
    let e = analyser("x^2 - 4", "x").unwrap();
    let c = echantillonner(&e, Domaine::default(), POINTS_DEFAUT);
    assert_eq!(c.len(), POINTS_DEFAUT);
    // parité : y(-x) = y(x) sur une grille symétrique
    for i in 0..c.len() / 2 {
        let (a, b) = (c[i], c[c.len() - 1 - i]);
        assert!((a.x + b.x).abs() < 1e-9);
        assert!((a.y.unwrap() - b.y.unwrap()).abs() < 1e-9);
    }
}

#[test]
fn sci_validation() {
    for ok in ["5*x^3 + 2*x", "log10(x)", "sqrt(x)", "x**2", "  log2(x) - 0.5 "] {
        assert_eq!(valider(ok, "x"), Ok(()), "{ok:?}");
    }
    for ko in ["5*y^3 + 2*y", "sin(x)", "", "   ", "gol(x)", "log(x, 2)", "x % 2"] {
        assert!(valider(ko, "x").is_err(), "{ko:?}");
    }
}
