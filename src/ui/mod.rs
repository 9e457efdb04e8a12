pub mod file_menu;
mod properties;
mod settings_dialog;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::ConfigResetNotification;

/// Resource that tracks whether any modal dialog is currently open.
/// Editor input handlers should check this to avoid processing input
/// when the user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block editor input
    pub any_modal_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
fn update_dialog_state(
    file_menu: Res<file_menu::FileMenuState>,
    settings: Res<settings_dialog::SettingsDialogState>,
    config_reset: Res<ConfigResetNotification>,
    mut dialog_state: ResMut<DialogState>,
) {
    let open = file_menu.show_reset_confirmation
        || file_menu.pending_open.is_some()
        || settings.is_open
        || config_reset.show;
    if dialog_state.any_modal_open != open {
        dialog_state.any_modal_open = open;
    }
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<file_menu::FileMenuState>()
            .init_resource::<settings_dialog::SettingsDialogState>()
            // Top panel first so the side panel fits below it
            .add_systems(
                EguiPrimaryContextPass,
                (toolbar::toolbar_ui, properties::properties_panel_ui).chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Last: dialogs/overlays
                    file_menu::notice_ui,
                    file_menu::reset_confirmation_ui,
                    file_menu::config_reset_notification_ui,
                    file_menu::empty_state_ui,
                    settings_dialog::settings_dialog_ui,
                )
                    .after(properties::properties_panel_ui),
            )
            .add_systems(Update, file_menu::poll_open_dialog)
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}
