use modlink_core::field::CustomFields;
use modlink_core::hud::HudCommandList;
use modlink_core::level::LevelScripts;
use modlink_core::network::NetworkState;
use modlink_core::sync::SyncTable;
use modlink_core::warp::WarpState;
use modlink_core::{FieldRegistry, ModId, ObjectPool, ObjectRef, TextureRegistry};
use modlink_script::ScriptRuntime;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::subsystem::resources::level_script_parse::LevelScriptParse;

/// Native state reachable from bound functions.
pub struct GameData {
    pub(crate) objects: ObjectPool,
    pub(crate) fields: FieldRegistry,
    pub(crate) custom_fields: CustomFields,
    pub(crate) sync: SyncTable,
    pub(crate) textures: TextureRegistry,
    pub(crate) levels: LevelScripts,
    pub(crate) network: NetworkState,
    pub(crate) hud: HudCommandList,
    pub(crate) warp: WarpState,
    pub(crate) level_script_parse: LevelScriptParse,
    pub(crate) standard_sync_distance: f32,
}

impl GameData {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            objects: ObjectPool::default(),
            fields: FieldRegistry::new(),
            custom_fields: CustomFields::new(config.max_custom_fields),
            sync: SyncTable::new(config.sync.capacity, config.sync.max_fields),
            textures: TextureRegistry::new(),
            levels: LevelScripts::new(),
            network: NetworkState::new(config.max_players),
            hud: HudCommandList::new(),
            warp: WarpState::default(),
            level_script_parse: LevelScriptParse::new(),
            standard_sync_distance: config.sync.standard_distance,
        }
    }

    pub fn objects(&self) -> &ObjectPool {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectPool {
        &mut self.objects
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    pub fn custom_fields(&self) -> &CustomFields {
        &self.custom_fields
    }

    pub fn sync(&self) -> &SyncTable {
        &self.sync
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureRegistry {
        &mut self.textures
    }

    pub fn levels(&self) -> &LevelScripts {
        &self.levels
    }

    pub fn levels_mut(&mut self) -> &mut LevelScripts {
        &mut self.levels
    }

    pub fn network(&self) -> &NetworkState {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut NetworkState {
        &mut self.network
    }

    pub fn hud(&self) -> &HudCommandList {
        &self.hud
    }

    pub fn hud_mut(&mut self) -> &mut HudCommandList {
        &mut self.hud
    }

    pub fn warp(&self) -> &WarpState {
        &self.warp
    }

    pub fn warp_mut(&mut self) -> &mut WarpState {
        &mut self.warp
    }

    pub fn level_script_parse(&self) -> &LevelScriptParse {
        &self.level_script_parse
    }

    /// Fails when more than one participant is connected.
    pub fn require_single_player(&self) -> Result<(), BridgeError> {
        if self.network.is_single_player() {
            Ok(())
        } else {
            Err(BridgeError::Policy)
        }
    }

    /// Free an object and the sync object bound to it.
    pub fn destroy_object(&mut self, obj: ObjectRef) -> bool {
        self.sync.forget_object(obj);
        self.objects.destroy(obj).is_some()
    }

    /// Forget everything a mod registered: its custom fields and, if it owns
    /// it, the level script subscription.
    pub fn unload_mod(&mut self, owner: ModId, runtime: &mut dyn ScriptRuntime) {
        self.custom_fields.clear_mod(owner);
        let owns_parse = self
            .level_script_parse
            .subscription()
            .is_some_and(|s| s.owner == Some(owner));
        if owns_parse {
            self.level_script_parse.reset(runtime);
        }
    }
}

impl Default for GameData {
    fn default() -> Self {
        Self::new(&BridgeConfig::default())
    }
}
