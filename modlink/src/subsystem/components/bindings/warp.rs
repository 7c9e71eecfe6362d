use modlink_core::warp::WarpRequest;
use modlink_script::{CallContext, NativeFunction};

use super::{convert_arg, finish, SIDE_EFFECT};
use crate::error::BridgeError;
use crate::subsystem::world::GameData;

pub fn init_mario_after_warp(
    game_data: &mut GameData,
    ctx: &mut CallContext<'_>,
) -> Result<usize, BridgeError> {
    game_data.require_single_player()?;
    if !ctx.valid_param_count(0) {
        return Ok(0);
    }
    game_data.warp.init_after_warp();
    Ok(SIDE_EFFECT)
}

pub fn initiate_warp(game_data: &mut GameData, ctx: &mut CallContext<'_>) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(4) {
        return Ok(0);
    }
    game_data.require_single_player()?;

    let request = WarpRequest {
        dest_level: convert_arg!(ctx, 1, to_integer),
        dest_area: convert_arg!(ctx, 2, to_integer),
        dest_warp_node: convert_arg!(ctx, 3, to_integer),
        arg: convert_arg!(ctx, 4, to_integer),
    };
    game_data.warp.initiate_warp(request);
    Ok(SIDE_EFFECT)
}

pub fn reset_level(game_data: &mut GameData, ctx: &mut CallContext<'_>) -> Result<usize, BridgeError> {
    game_data.require_single_player()?;
    if !ctx.valid_param_count(0) {
        return Ok(0);
    }
    game_data.warp.reset_level();
    Ok(SIDE_EFFECT)
}

pub struct InitMarioAfterWarp;
impl NativeFunction<GameData> for InitMarioAfterWarp {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = init_mario_after_warp(game_data, ctx);
        finish(ctx, result)
    }
}

pub struct InitiateWarp;
impl NativeFunction<GameData> for InitiateWarp {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = initiate_warp(game_data, ctx);
        finish(ctx, result)
    }
}

pub struct ResetLevel;
impl NativeFunction<GameData> for ResetLevel {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = reset_level(game_data, ctx);
        finish(ctx, result)
    }
}
