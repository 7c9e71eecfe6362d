//! Entry points exported to scripts.
//!
//! Each entry point is a free function doing the work plus a unit struct
//! binding it into the function table. The free function returns the result
//! count, or a [`BridgeError`] that [`finish`] turns into a diagnostic and
//! zero results.

use modlink_script::{CallContext, FunctionTable};

use crate::error::BridgeError;
use crate::subsystem::world::GameData;

pub mod custom_fields;
pub mod hud;
pub mod level_script;
pub mod misc;
pub mod network;
pub mod texture;
pub mod warp;

/// Convert argument `$i` with one of the `marshal::to_*` functions, bailing
/// out of the entry point with a conversion error.
macro_rules! convert_arg {
    ($ctx:expr, $i:expr, $conv:ident $(, $extra:expr)*) => {
        modlink_script::marshal::$conv($ctx.arg($i) $(, $extra)*)
            .map_err(|source| $crate::error::BridgeError::Conversion { arg: $i, source })?
    };
}

pub(crate) use convert_arg;

/// Side-effect entry points report one result and push nothing; the runtime reads nil.
pub(crate) const SIDE_EFFECT: usize = 1;

pub(crate) fn finish(ctx: &mut CallContext<'_>, result: Result<usize, BridgeError>) -> usize {
    match result {
        Ok(count) => count,
        Err(e) => {
            ctx.error(&e);
            0
        }
    }
}

pub fn bind_functions(table: &mut FunctionTable<GameData>) {
    table.bind("sins", misc::Sins);
    table.bind("coss", misc::Coss);
    table.bind("atan2s", misc::Atan2s);

    table.bind("init_mario_after_warp", warp::InitMarioAfterWarp);
    table.bind("initiate_warp", warp::InitiateWarp);
    table.bind("reset_level", warp::ResetLevel);

    table.bind("network_init_object", network::NetworkInitObject);
    table.bind("network_send_object", network::NetworkSendObject);
    table.bind("network_send", network::NetworkSend);
    table.bind("network_send_to", network::NetworkSendTo);

    table.bind("get_texture_info", texture::GetTextureInfo);
    table.bind("djui_hud_render_texture", hud::RenderTexture);
    table.bind("djui_hud_render_texture_tile", hud::RenderTextureTile);
    table.bind("djui_hud_render_texture_interpolated", hud::RenderTextureInterpolated);
    table.bind("djui_hud_render_texture_tile_interpolated", hud::RenderTextureTileInterpolated);

    table.bind("level_script_parse", level_script::LevelScriptParseFn);
    table.bind("define_custom_obj_fields", custom_fields::DefineCustomObjFields);
}
