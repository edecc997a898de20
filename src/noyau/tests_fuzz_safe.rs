//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée (sauf campagnes dédiées aux garde-fous)
//! - budget temps global + budget solveur court
//! - on accepte les issues attendues du solveur (NonSupporte, Indetermine, Delai)
//! - invariants clés : courbes de `points` échantillons, jamais de y infini,
//!   un marqueur par point d’intersection

use std::time::{Duration, Instant};

use super::analyse::analyser;
use super::budget::LimitesSolveur;
use super::erreurs::{ErreurAnalyse, ErreurSolveur, ErreurTrace};
use super::trace::{tracer, ReglagesTrace, SurfaceMemoire};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

fn reglages_fuzz() -> ReglagesTrace {
    ReglagesTrace {
        budget: LimitesSolveur {
            pas_max: 20_000,
            duree_max: Duration::from_millis(50),
        },
        ..ReglagesTrace::default()
    }
    .avec_points(120)
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_rat(rng: &mut Rng) -> String {
    // petits entiers et décimaux, incluant 0 (utile pour les divisions par zéro)
    let a = rng.pick(8);
    if rng.coin() {
        format!("{a}")
    } else {
        format!("{a}.5")
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(7) {
        0 | 1 => "x".to_string(),
        2 => gen_rat(rng),
        3 => "sqrt(x)".to_string(),
        4 => "log2(x)".to_string(),
        5 => "log10(x)".to_string(),
        _ => "log(x)".to_string(),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(8) {
        0 => gen_atom(rng),
        1 => format!(
            "({}+{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        2 => format!(
            "({}-{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        3 => format!(
            "({}*{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        4 => format!(
            "({}/{})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        5 => format!("({})^{}", gen_expr(rng, depth - 1), 1 + rng.pick(3)),
        6 => format!("-{}", gen_expr(rng, depth - 1)),
        _ => format!("sqrt({})", gen_expr(rng, depth - 1)),
    }
}

/// Exposants hors garde-fous (dont i64::MIN et au-delà de i64).
fn gen_exposant_extreme(rng: &mut Rng) -> &'static str {
    const EXPOSANTS: [&str; 7] = [
        "257",
        "4096",
        "65537",
        "30000000",
        "9223372036854775807",
        "-9223372036854775808",
        "99999999999999999999",
    ];
    EXPOSANTS[rng.pick(EXPOSANTS.len() as u32) as usize]
}

/// Enveloppe `coeur` dans `couches` niveaux de sqrt( / ( / moins unaire.
fn gen_imbrication(rng: &mut Rng, coeur: &str, couches: usize) -> String {
    let mut avant = String::new();
    let mut apres = String::new();
    for _ in 0..couches {
        match rng.pick(3) {
            0 => {
                avant.push_str("sqrt(");
                apres.push(')');
            }
            1 => {
                avant.push('(');
                apres.push(')');
            }
            _ => avant.push('-'),
        }
    }
    format!("{avant}{coeur}{apres}")
}

/// Texte arbitraire sur l’alphabet autorisé par la validation.
fn gen_bruit(rng: &mut Rng, n: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789x+-*/^() .logsqrt";
    (0..n)
        .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize] as char)
        .collect()
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_pipeline_invariants() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);
    let reglages = reglages_fuzz();

    let mut seen_points = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..60 {
        budget(t0, max);

        let f1 = gen_expr(&mut rng, 3);
        let f2 = gen_expr(&mut rng, 2);

        let mut surface = SurfaceMemoire::default();
        let rapport = tracer(&f1, &f2, &mut surface, &reglages)
            .unwrap_or_else(|e| panic!("f1={f1:?} f2={f2:?} err={e}"));

        assert_eq!(surface.courbes.len(), 2);
        for (_, c) in &surface.courbes {
            assert_eq!(c.len(), reglages.points);
            assert!(c.iter().all(|e| e.y.is_none_or(f64::is_finite)));
        }

        match &rapport.issue_solveur {
            Ok(points) => {
                assert_eq!(surface.marqueurs.len(), points.len());
                assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
                assert!(points.windows(2).all(|w| w[0].x <= w[1].x));
                seen_points += points.len();
            }
            Err(e) => {
                assert!(matches!(
                    e,
                    ErreurSolveur::NonSupporte(_) | ErreurSolveur::Indetermine | ErreurSolveur::Delai
                ));
                assert!(surface.marqueurs.is_empty());
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_points > 5, "trop peu de points: {seen_points}");
    assert!(seen_err > 0, "aucune erreur solveur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let reglages = reglages_fuzz();
    let mut a = Rng::new(0xBADC0DE_u64);
    let mut b = a.clone();

    for _ in 0..20 {
        budget(t0, max);

        let (f1, f2) = (gen_expr(&mut a, 2), gen_expr(&mut a, 2));
        assert_eq!((gen_expr(&mut b, 2), gen_expr(&mut b, 2)), (f1.clone(), f2.clone()));

        let mut s1 = SurfaceMemoire::default();
        let mut s2 = SurfaceMemoire::default();
        let r1 = tracer(&f1, &f2, &mut s1, &reglages).map(|r| r.issue_solveur);
        let r2 = tracer(&f1, &f2, &mut s2, &reglages).map(|r| r.issue_solveur);

        assert_eq!(s1.courbes, s2.courbes, "f1={f1:?} f2={f2:?}");
        // Delai dépend de l’horloge : on ne compare que les issues abouties
        if let (Ok(Ok(p1)), Ok(Ok(p2))) = (&r1, &r2) {
            assert_eq!(p1, p2, "f1={f1:?} f2={f2:?}");
        }
    }
}

#[test]
fn fuzz_safe_bruit_ne_panique_pas() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut rng = Rng::new(0x5EED_u64);
    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..400 {
        budget(t0, max);

        let n = 1 + rng.pick(12) as usize;
        let texte = gen_bruit(&mut rng, n);
        match analyser(&texte, "x") {
            Ok(_) => seen_ok += 1,
            Err(_) => seen_err += 1,
        }
    }

    assert!(seen_ok > 0, "aucune entrée analysable");
    assert!(seen_err > 0, "aucune erreur d’analyse");
}

#[test]
fn fuzz_safe_somme_longue_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // 200 termes "x" en chaîne : pile bornée, 200x = x^2 => x = 0 ou 200
    let f1 = vec!["x"; 200].join("+");
    let mut s = SurfaceMemoire::default();
    let r = tracer(&f1, "x^2", &mut s, &ReglagesTrace::default()).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    let xs: Vec<f64> = r.points().iter().map(|p| p.x).collect();
    assert_eq!(xs, [0.0, 200.0]);
}

#[test]
fn fuzz_safe_exposants_extremes() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let reglages = reglages_fuzz();

    for _ in 0..60 {
        budget(t0, max);

        let base = gen_expr(&mut rng, 2);
        let f1 = format!("({base})^{}", gen_exposant_extreme(&mut rng));
        let f2 = gen_expr(&mut rng, 2);

        let mut s = SurfaceMemoire::default();
        let r = tracer(&f1, &f2, &mut s, &reglages).unwrap_or_else(|e| panic!("f1={f1:?}: {e}"));
        for (_, c) in &s.courbes {
            assert!(c.iter().all(|e| e.y.is_none_or(f64::is_finite)));
        }
        assert_eq!(s.marqueurs.len(), r.points().len());
    }
}

#[test]
fn fuzz_safe_imbrication_bornee() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    let mut rng = Rng::new(0xDEE9_u64);
    let reglages = reglages_fuzz();
    let mut seen_ok = 0usize;
    let mut seen_refus = 0usize;

    for _ in 0..40 {
        budget(t0, max);

        // moitié sous les garde-fous, moitié bien au-delà
        let couches = if rng.coin() {
            1 + rng.pick(200) as usize
        } else {
            1_000 + rng.pick(2_000) as usize
        };
        let coeur = gen_expr(&mut rng, 2);
        let f1 = gen_imbrication(&mut rng, &coeur, couches);

        let mut s = SurfaceMemoire::default();
        match tracer(&f1, "x", &mut s, &reglages) {
            Ok(_) => {
                assert!(couches < 1_000, "couches={couches}");
                seen_ok += 1;
            }
            Err(ErreurTrace::Analyse {
                fonction: 1,
                source: ErreurAnalyse::ExpressionInvalide,
            }) => seen_refus += 1,
            Err(e) => panic!("couches={couches}: {e}"),
        }
    }

    assert!(seen_ok > 0, "aucune imbrication acceptée");
    assert!(seen_refus > 0, "aucune imbrication refusée");
}
