use std::f32::consts::PI;

use modlink_script::{CallContext, NativeFunction};

use super::{convert_arg, finish};
use crate::error::BridgeError;
use crate::subsystem::world::GameData;

/// Entries in the engine's sine table; binary angles are looked up at this resolution.
const TRIG_TABLE_STEPS: u32 = 4096;

/// Binary angle (`0x10000` per turn) to radians, at sine-table resolution.
fn angle_to_radians(angle: i32) -> f32 {
    let index = (angle as u16 as u32) >> 4;
    index as f32 * (2.0 * PI / TRIG_TABLE_STEPS as f32)
}

pub fn sins(_game_data: &mut GameData, ctx: &mut CallContext<'_>) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(1) {
        return Ok(0);
    }
    let angle: i32 = convert_arg!(ctx, 1, to_integer);
    ctx.push(angle_to_radians(angle).sin());
    Ok(1)
}

pub fn coss(_game_data: &mut GameData, ctx: &mut CallContext<'_>) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(1) {
        return Ok(0);
    }
    let angle: i32 = convert_arg!(ctx, 1, to_integer);
    ctx.push(angle_to_radians(angle).cos());
    Ok(1)
}

/// Binary angle of the vector. Note the argument order: the first argument is
/// the component along the angle-zero axis.
pub fn atan2s(_game_data: &mut GameData, ctx: &mut CallContext<'_>) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(2) {
        return Ok(0);
    }
    let y: f32 = convert_arg!(ctx, 1, to_number);
    let x: f32 = convert_arg!(ctx, 2, to_number);
    let angle = (x.atan2(y) * (32768.0 / PI)).round() as i32;
    ctx.push(angle as u16 as i16);
    Ok(1)
}

pub struct Sins;
impl NativeFunction<GameData> for Sins {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = sins(game_data, ctx);
        finish(ctx, result)
    }
}

pub struct Coss;
impl NativeFunction<GameData> for Coss {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = coss(game_data, ctx);
        finish(ctx, result)
    }
}

pub struct Atan2s;
impl NativeFunction<GameData> for Atan2s {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = atan2s(game_data, ctx);
        finish(ctx, result)
    }
}
