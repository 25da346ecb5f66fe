use bevy::prelude::*;

use crate::{ LocaleStore, LocaleStoreConfig };

/// Bevy plugin that loads a [`LocaleStore`] resource at startup.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use poke_locales::{ LocaleStore, LocaleStoreConfig, LocalesPlugin };
///
/// fn show_starter(locales: Res<LocaleStore>) {
///     if let Ok(name) = locales.get_pokemon_name("fr", 4, None) {
///         println!("{name}");
///     }
/// }
///
/// App::new()
///     .add_plugins(LocalesPlugin::with_config(LocaleStoreConfig {
///         locales_folder: "assets/Locales".into(),
///         ..Default::default()
///     }))
///     .add_systems(Startup, show_starter)
///     .run();
/// ```
#[derive(Default)]
pub struct LocalesPlugin {
    pub config: LocaleStoreConfig,
}

impl LocalesPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LocaleStoreConfig) -> Self {
        Self { config }
    }
}

impl Plugin for LocalesPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone()).init_resource::<LocaleStore>();
    }
}

impl FromWorld for LocaleStore {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<LocaleStoreConfig>().cloned().unwrap_or_default();
        LocaleStore::with_config(config)
    }
}
