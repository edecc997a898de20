// src/app.rs
//
// Traceur de fonctions — module App (racine)
// ------------------------------------------
//
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppTraceur (pour main.rs: use crate::app::AppTraceur;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Important:
// - La gestion Enter est faite dans vue.rs (quand un champ a le focus).

pub mod etat;
pub mod vue;

// Ré-export pratique : `use crate::app::AppTraceur;`
pub use etat::AppTraceur;

use eframe::egui;

impl eframe::App for AppTraceur {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ESC = effacer seulement le champ actif (comme bouton "C").
        let esc = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if esc {
            self.clear_entree();
        }

        egui::SidePanel::left("panneau_entrees")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                self.ui_panneau(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui_figure(ui);
        });
    }
}
