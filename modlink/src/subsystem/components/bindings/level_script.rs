use modlink_script::{CallContext, ConvertError, NativeFunction};

use super::{convert_arg, finish, SIDE_EFFECT};
use crate::error::BridgeError;
use crate::subsystem::world::GameData;

/// Subscribe the callback to the level's command stream.
///
/// The walk itself runs once this entry point has returned, see
/// [`Bridge::call`](crate::Bridge::call), so the callback may call other
/// bound functions.
pub fn level_script_parse(
    game_data: &mut GameData,
    ctx: &mut CallContext<'_>,
) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(2) {
        return Ok(0);
    }
    let level: i32 = convert_arg!(ctx, 1, to_integer);
    let callback = ctx.arg(2).as_function().ok_or_else(|| BridgeError::Conversion {
        arg: 2,
        source: ConvertError::mismatch("function", ctx.arg(2)),
    })?;

    let owner = ctx.active_mod();
    game_data
        .level_script_parse
        .subscribe(&game_data.levels, level, callback, owner, ctx.runtime())?;
    log::debug!("level_script_parse: subscribed to level {}", level);
    Ok(SIDE_EFFECT)
}

pub struct LevelScriptParseFn;
impl NativeFunction<GameData> for LevelScriptParseFn {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = level_script_parse(game_data, ctx);
        finish(ctx, result)
    }
}
