use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::constants::SIDE_PANEL_WIDTH;
use crate::document::EditorSession;
use crate::editor::{EditorMode, InteractionState};
use crate::export::parse_hex_color;
use crate::masks::{FillType, MarginEdge, Mask, MaskId, MaskStore};

fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

fn scope_label(mask: &Mask) -> String {
    match mask.page_index {
        None => "all pages".to_string(),
        Some(page) => format!("page {}", page + 1),
    }
}

/// Right-hand panel: margin sliders in crop mode, mask list and properties in mask mode
pub fn properties_panel_ui(
    mut contexts: EguiContexts,
    mut session: ResMut<EditorSession>,
    mut store: ResMut<MaskStore>,
    mut interaction: ResMut<InteractionState>,
) -> Result {
    if session.fullscreen {
        return Ok(());
    }

    egui::SidePanel::right("properties_panel")
        .exact_width(SIDE_PANEL_WIDTH)
        .resizable(false)
        .show(contexts.ctx_mut()?, |ui| {
            if session.document.is_none() {
                ui.label(egui::RichText::new("No document").weak());
                return;
            }

            match session.mode {
                EditorMode::Crop => margins_section(ui, &mut session),
                EditorMode::Mask => {
                    let page = session.current_page;
                    masks_section(ui, page, &mut store, &mut interaction);
                }
            }
        });
    Ok(())
}

fn margins_section(ui: &mut egui::Ui, session: &mut EditorSession) {
    ui.heading("Crop margins");
    ui.label(egui::RichText::new("Applied to every page on export").weak());
    ui.add_space(8.0);

    for edge in MarginEdge::all() {
        let mut value = session.margins.get(*edge);
        ui.horizontal(|ui| {
            ui.label(format!("{}:", edge.display_name()));
            let response = ui.add(
                egui::Slider::new(&mut value, 0.0..=90.0)
                    .suffix("%")
                    .max_decimals(1),
            );
            if response.changed() {
                session.margins.set_edge(*edge, value);
            }
        });
    }

    ui.add_space(8.0);
    if ui
        .add_enabled(!session.margins.is_zero(), egui::Button::new("Reset margins"))
        .clicked()
    {
        session.margins = Default::default();
    }
}

fn masks_section(
    ui: &mut egui::Ui,
    page: usize,
    store: &mut MaskStore,
    interaction: &mut InteractionState,
) {
    ui.heading("Masks");
    ui.label(egui::RichText::new("Drag on the page to draw a mask").weak());
    ui.add_space(6.0);

    let listed: Vec<(MaskId, String)> = store
        .list_for_page(page)
        .into_iter()
        .map(|m| (m.id, format!("Mask {} ({})", m.id.0, scope_label(m))))
        .collect();

    if listed.is_empty() {
        ui.label("No masks on this page");
    }

    let mut to_delete = None;
    egui::ScrollArea::vertical()
        .max_height(220.0)
        .show(ui, |ui| {
            for (id, label) in &listed {
                ui.horizontal(|ui| {
                    let selected = interaction.selected == Some(*id);
                    if ui.selectable_label(selected, label).clicked() {
                        interaction.selected = Some(*id);
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                            to_delete = Some(*id);
                        }
                    });
                });
            }
        });

    if let Some(id) = to_delete {
        store.remove(id);
        if interaction.selected == Some(id) {
            interaction.selected = None;
        }
    }

    let Some(mut mask) = interaction
        .selected
        .and_then(|id| store.get(id))
        .filter(|m| m.applies_to_page(page))
        .cloned()
    else {
        return;
    };

    ui.separator();
    ui.label(egui::RichText::new(format!("Mask {}", mask.id.0)).strong());
    ui.add_space(4.0);

    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label("Fill:");
        egui::ComboBox::from_id_salt("mask_fill_type")
            .selected_text(mask.fill_type.display_name())
            .show_ui(ui, |ui| {
                for fill in FillType::all() {
                    if ui
                        .selectable_label(mask.fill_type == *fill, fill.display_name())
                        .clicked()
                        && mask.fill_type != *fill
                    {
                        mask.fill_type = *fill;
                        changed = true;
                    }
                }
            });
    });

    if mask.fill_type == FillType::Solid {
        ui.horizontal(|ui| {
            ui.label("Color:");
            let mut rgb = parse_hex_color(&mask.color);
            if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
                mask.color = to_hex(rgb);
                changed = true;
            }
            ui.label(egui::RichText::new(&mask.color).monospace());
        });
    }

    let mut global = mask.is_global();
    if ui.checkbox(&mut global, "Apply to all pages").changed() {
        mask.page_index = if global { None } else { Some(page) };
        changed = true;
    }

    ui.add_space(4.0);
    egui::Grid::new("mask_geometry")
        .num_columns(2)
        .spacing([8.0, 2.0])
        .show(ui, |ui| {
            for (name, value) in [
                ("X", mask.x),
                ("Y", mask.y),
                ("Width", mask.width),
                ("Height", mask.height),
            ] {
                ui.label(name);
                ui.label(format!("{:.1}%", value));
                ui.end_row();
            }
        });

    if changed {
        store.update(mask);
    }
}
