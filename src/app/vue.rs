// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Même AppTraceur (etat.rs) pour natif + wasm
// - Clavier : Enter trace (quand un des deux champs est focus)
// - Tactile : boutons d’insertion dans le champ actif, focus redonné après clic
// - Figure : egui_plot (Line par tronçon défini + Points/Text pour les intersections)
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;
use egui::{Align2, Color32};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::noyau::echantillon::Courbe;

use super::etat::{AppTraceur, Champ, Demarche, EXEMPLE_F1, EXEMPLE_F2};

/// Couleurs des deux courbes (légende incluse).
const COULEURS: [Color32; 2] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
];

/// Garde-fou d’affichage : au-delà, l’axe y est tronqué.
const Y_MAX_AFFICHAGE: f64 = 1e3;

impl AppTraceur {
    /// Panneau gauche : entrées, actions, statut, démarche.
    pub fn ui_panneau(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Traceur de fonctions");
                ui.add_space(6.0);

                self.ui_entrees(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_statut(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_demarche(ui);
            });
    }

    fn ui_entrees(&mut self, ui: &mut egui::Ui) {
        let mut tracer = false;

        for (champ, titre, exemple) in [
            (Champ::F1, "Fonction 1 :", EXEMPLE_F1),
            (Champ::F2, "Fonction 2 :", EXEMPLE_F2),
        ] {
            ui.label(titre);
            let texte = match champ {
                Champ::F1 => &mut self.f1,
                Champ::F2 => &mut self.f2,
            };
            let resp = ui.add(
                egui::TextEdit::singleline(texte)
                    .desired_width(ui.available_width())
                    .hint_text(exemple)
                    .id_source(titre)
                    .code_editor(),
            );

            if resp.gained_focus() || resp.clicked() {
                self.champ_actif = champ;
            }
            if self.focus_entree && self.champ_actif == champ {
                resp.request_focus();
                self.focus_entree = false;
            }

            // --- Clavier : Enter trace (seulement si le champ est focus) ---
            let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (resp.has_focus() || resp.lost_focus()) && enter {
                tracer = true;
            }
        }

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            // Contrat: C = champ actif ; CLR = figure ; AC = tout
            self.bouton_action(ui, "C", "Efface le champ actif", Action::ClearEntree);
            self.bouton_action(ui, "CLR", "Efface figure + erreur + démarche", Action::ClearResultats);
            self.bouton_action(ui, "AC", "Remise à zéro totale", Action::ResetTotal);

            ui.separator();

            ui.label("Points :");
            let mut n = self.reglages.points as u32;
            let resp = ui.add(egui::DragValue::new(&mut n).speed(10).range(2..=10_000));
            if resp.changed() {
                self.set_points(n as usize);
            }
        });

        ui.add_space(8.0);

        // Touches rapides (insérées dans le champ actif)
        ui.horizontal_wrapped(|ui| {
            for (label, texte) in [
                ("(", "("),
                (")", ")"),
                ("^", "^"),
                ("x", "x"),
                ("sqrt", "sqrt("),
                ("log", "log("),
                ("log2", "log2("),
                ("log10", "log10("),
            ] {
                if ui.add_sized([46.0, 28.0], egui::Button::new(label)).clicked() {
                    self.entree_active().push_str(texte);
                    self.focus_entree = true;
                }
            }
        });

        ui.add_space(8.0);

        let bouton = ui.add_sized([ui.available_width(), 34.0], egui::Button::new("Tracer"));
        if bouton.clicked() || tracer {
            self.tracer_via_noyau();
        }

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_statut(&mut self, ui: &mut egui::Ui) {
        ui.label("Intersections :");
        // libellé arrondi + forme exacte de x
        let lignes: Vec<String> = self
            .figure
            .marqueurs
            .iter()
            .map(|(p, l)| format!("{l}   x = {}", p.racine))
            .collect();
        let contenu = if lignes.is_empty() {
            self.statut.clone()
        } else {
            lignes.join("\n")
        };
        Self::champ_monospace(ui, "intersections_out", &contenu, 2);

        if !lignes.is_empty() && !self.statut.is_empty() {
            ui.small(&self.statut);
        }
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                for (i, d) in self.demarches.iter().enumerate() {
                    ui.strong(format!("Fonction {}", i + 1));
                    Self::champ_demarche(ui, "Normalisé", &format!("demarche_norm_{i}"), &d.normalise);
                    Self::champ_demarche(ui, "Jetons", &format!("demarche_jetons_{i}"), &d.jetons);
                    Self::champ_demarche(ui, "RPN", &format!("demarche_rpn_{i}"), &d.rpn);
                    ui.add_space(6.0);
                }
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 1);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
            }
            self.focus_entree = true;
        }
    }

    /// Trace via le noyau, puis dépose figure/statut/démarche dans l’état UI.
    fn tracer_via_noyau(&mut self) {
        match crate::noyau::tracer(&self.f1, &self.f2, &mut self.figure, &self.reglages) {
            Ok(rapport) => {
                let statut = match &rapport.issue_solveur {
                    Ok(points) if points.is_empty() => "aucune intersection réelle".to_string(),
                    Ok(points) => format!("{} intersection(s)", points.len()),
                    Err(e) => e.to_string(),
                };
                match &rapport.issue_solveur {
                    Ok(points) => log::info!(
                        "tracé f1={:?} f2={:?} : {} intersection(s)",
                        self.f1,
                        self.f2,
                        points.len()
                    ),
                    Err(e) => log::warn!("tracé f1={:?} f2={:?} : solveur: {e}", self.f1, self.f2),
                }

                let demarches = rapport.fonctions.map(|f| Demarche {
                    normalise: f.demarche.normalise,
                    jetons: f.demarche.jetons,
                    rpn: f.demarche.rpn,
                });
                self.set_resultats(statut, demarches);
            }
            Err(e) => {
                log::warn!("entrée refusée: {e}");
                self.set_erreur(e.to_string());
            }
        }
    }

    /* ------------------------ Figure ------------------------ */

    /// Panneau central : courbes + marqueurs libellés dans un egui_plot::Plot
    /// (axes, grille, légende, zoom et déplacement fournis par le widget).
    pub fn ui_figure(&mut self, ui: &mut egui::Ui) {
        let domaine = self.reglages.domaine;
        let plage_y = self.plage_y();

        Plot::new("figure")
            .legend(Legend::default())
            .x_axis_label("x")
            .y_axis_label("y")
            .include_x(domaine.bas)
            .include_x(domaine.haut)
            .include_y(plage_y.0)
            .include_y(plage_y.1)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                // Courbes : un tronçon par suite d’échantillons définis et affichables
                for (i, (nom, courbe)) in self.figure.courbes.iter().enumerate() {
                    let couleur = COULEURS[i % COULEURS.len()];
                    for troncon in troncons(courbe, plage_y) {
                        plot_ui.line(
                            Line::new(nom.as_str(), PlotPoints::new(troncon))
                                .color(couleur)
                                .width(1.5),
                        );
                    }
                }

                // Marqueurs
                let points: Vec<[f64; 2]> = self.figure.marqueurs.iter().map(|(p, _)| [p.x, p.y]).collect();
                if !points.is_empty() {
                    plot_ui.points(
                        Points::new("Intersections", PlotPoints::new(points))
                            .radius(4.0)
                            .color(Color32::RED),
                    );
                }
                for (p, libelle) in &self.figure.marqueurs {
                    plot_ui.text(
                        Text::new("Intersections", PlotPoint::new(p.x, p.y), libelle.as_str())
                            .anchor(Align2::CENTER_BOTTOM)
                            .color(Color32::BLACK),
                    );
                }
            });
    }

    /// Plage y : bornes des échantillons et marqueurs, tronquée à ±Y_MAX_AFFICHAGE.
    fn plage_y(&self) -> (f64, f64) {
        let ys = self
            .figure
            .courbes
            .iter()
            .flat_map(|(_, c)| c.iter().filter_map(|e| e.y))
            .chain(self.figure.marqueurs.iter().map(|(p, _)| p.y))
            .map(|y| y.clamp(-Y_MAX_AFFICHAGE, Y_MAX_AFFICHAGE));

        let (bas, haut) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), y| (a.min(y), b.max(y)));
        if !bas.is_finite() || !haut.is_finite() {
            return (-10.0, 10.0);
        }
        if haut - bas < 1e-9 {
            return (bas - 1.0, haut + 1.0);
        }
        let marge = 0.05 * (haut - bas);
        (bas - marge, haut + marge)
    }
}

/// Découpe une courbe en tronçons continus.
/// Coupure à chaque échantillon indéfini ou hors de la plage y affichée
/// (élargie d’une hauteur de part et d’autre).
fn troncons(courbe: &Courbe, (y0, y1): (f64, f64)) -> Vec<Vec<[f64; 2]>> {
    let marge = y1 - y0;
    let visible = |y: f64| (y0 - marge..=y1 + marge).contains(&y);

    let mut out = Vec::new();
    let mut courant: Vec<[f64; 2]> = Vec::new();
    for e in courbe {
        match e.y.filter(|&y| visible(y)) {
            Some(y) => courant.push([e.x, y]),
            None => {
                if courant.len() > 1 {
                    out.push(std::mem::take(&mut courant));
                }
                courant.clear();
            }
        }
    }
    if courant.len() > 1 {
        out.push(courant);
    }
    out
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
}
