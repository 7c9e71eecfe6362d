use modlink_script::{CallContext, Composite, NativeFunction};

use super::{convert_arg, finish};
use crate::error::BridgeError;
use crate::subsystem::world::GameData;

pub fn get_texture_info(game_data: &mut GameData, ctx: &mut CallContext<'_>) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(1) {
        return Ok(0);
    }
    let name = convert_arg!(ctx, 1, to_string);
    let info = game_data
        .textures
        .get(name)
        .ok_or_else(|| BridgeError::lookup(format!("could not find texture info for '{}'", name)))?;

    ctx.push(info.to_variant());
    Ok(1)
}

pub struct GetTextureInfo;
impl NativeFunction<GameData> for GetTextureInfo {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = get_texture_info(game_data, ctx);
        finish(ctx, result)
    }
}
