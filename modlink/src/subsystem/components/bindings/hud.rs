use glam::Vec2;
use modlink_core::hud::{HudCommand, TileRect};
use modlink_core::TextureInfo;
use modlink_script::{CallContext, Composite, NativeFunction};

use super::{convert_arg, finish, SIDE_EFFECT};
use crate::error::BridgeError;
use crate::subsystem::world::GameData;

fn texture_arg(game_data: &GameData, ctx: &CallContext<'_>) -> Result<TextureInfo, BridgeError> {
    TextureInfo::from_variant(ctx.arg(1), &game_data.textures)
        .map_err(|source| BridgeError::Conversion { arg: 1, source })
}

/// Two consecutive number arguments starting at `first`.
fn vec2_arg(ctx: &CallContext<'_>, first: usize) -> Result<Vec2, BridgeError> {
    let x: f32 = convert_arg!(ctx, first, to_number);
    let y: f32 = convert_arg!(ctx, first + 1, to_number);
    Ok(Vec2::new(x, y))
}

fn tile_arg(ctx: &CallContext<'_>, first: usize) -> Result<TileRect, BridgeError> {
    Ok(TileRect {
        origin: vec2_arg(ctx, first)?,
        size: vec2_arg(ctx, first + 2)?,
    })
}

pub fn render_texture(game_data: &mut GameData, ctx: &mut CallContext<'_>) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(5) {
        return Ok(0);
    }
    let command = HudCommand::Texture {
        texture: texture_arg(game_data, ctx)?,
        pos: vec2_arg(ctx, 2)?,
        scale: vec2_arg(ctx, 4)?,
    };
    game_data.hud.push(command);
    Ok(SIDE_EFFECT)
}

pub fn render_texture_tile(
    game_data: &mut GameData,
    ctx: &mut CallContext<'_>,
) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(9) {
        return Ok(0);
    }
    let command = HudCommand::TextureTile {
        texture: texture_arg(game_data, ctx)?,
        pos: vec2_arg(ctx, 2)?,
        scale: vec2_arg(ctx, 4)?,
        tile: tile_arg(ctx, 6)?,
    };
    game_data.hud.push(command);
    Ok(SIDE_EFFECT)
}

pub fn render_texture_interpolated(
    game_data: &mut GameData,
    ctx: &mut CallContext<'_>,
) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(9) {
        return Ok(0);
    }
    let command = HudCommand::TextureInterpolated {
        texture: texture_arg(game_data, ctx)?,
        prev_pos: vec2_arg(ctx, 2)?,
        prev_scale: vec2_arg(ctx, 4)?,
        pos: vec2_arg(ctx, 6)?,
        scale: vec2_arg(ctx, 8)?,
    };
    game_data.hud.push(command);
    Ok(SIDE_EFFECT)
}

pub fn render_texture_tile_interpolated(
    game_data: &mut GameData,
    ctx: &mut CallContext<'_>,
) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(13) {
        return Ok(0);
    }
    let command = HudCommand::TextureTileInterpolated {
        texture: texture_arg(game_data, ctx)?,
        prev_pos: vec2_arg(ctx, 2)?,
        prev_scale: vec2_arg(ctx, 4)?,
        pos: vec2_arg(ctx, 6)?,
        scale: vec2_arg(ctx, 8)?,
        tile: tile_arg(ctx, 10)?,
    };
    game_data.hud.push(command);
    Ok(SIDE_EFFECT)
}

pub struct RenderTexture;
impl NativeFunction<GameData> for RenderTexture {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = render_texture(game_data, ctx);
        finish(ctx, result)
    }
}

pub struct RenderTextureTile;
impl NativeFunction<GameData> for RenderTextureTile {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = render_texture_tile(game_data, ctx);
        finish(ctx, result)
    }
}

pub struct RenderTextureInterpolated;
impl NativeFunction<GameData> for RenderTextureInterpolated {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = render_texture_interpolated(game_data, ctx);
        finish(ctx, result)
    }
}

pub struct RenderTextureTileInterpolated;
impl NativeFunction<GameData> for RenderTextureTileInterpolated {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = render_texture_tile_interpolated(game_data, ctx);
        finish(ctx, result)
    }
}
