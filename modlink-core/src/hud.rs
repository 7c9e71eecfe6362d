//! HUD draw commands recorded by scripts for the renderer to consume.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::texture::TextureInfo;

/// Sub-rectangle of a texture, in texels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileRect {
    pub origin: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HudCommand {
    Texture {
        texture: TextureInfo,
        pos: Vec2,
        scale: Vec2,
    },
    TextureTile {
        texture: TextureInfo,
        pos: Vec2,
        scale: Vec2,
        tile: TileRect,
    },
    TextureInterpolated {
        texture: TextureInfo,
        prev_pos: Vec2,
        prev_scale: Vec2,
        pos: Vec2,
        scale: Vec2,
    },
    TextureTileInterpolated {
        texture: TextureInfo,
        prev_pos: Vec2,
        prev_scale: Vec2,
        pos: Vec2,
        scale: Vec2,
        tile: TileRect,
    },
}

impl HudCommand {
    pub fn texture(&self) -> &TextureInfo {
        match self {
            HudCommand::Texture { texture, .. }
            | HudCommand::TextureTile { texture, .. }
            | HudCommand::TextureInterpolated { texture, .. }
            | HudCommand::TextureTileInterpolated { texture, .. } => texture,
        }
    }

    /// Position at interpolation factor `t` (0 = previous frame, 1 = this frame).
    pub fn position_at(&self, t: f32) -> Vec2 {
        match self {
            HudCommand::Texture { pos, .. } | HudCommand::TextureTile { pos, .. } => *pos,
            HudCommand::TextureInterpolated { prev_pos, pos, .. }
            | HudCommand::TextureTileInterpolated { prev_pos, pos, .. } => {
                prev_pos.lerp(*pos, t.clamp(0.0, 1.0))
            }
        }
    }
}

/// Commands recorded during the current frame.
#[derive(Debug, Default)]
pub struct HudCommandList {
    commands: Vec<HudCommand>,
}

impl HudCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: HudCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[HudCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Hand the frame's commands to the renderer and start a new frame.
    pub fn take(&mut self) -> Vec<HudCommand> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::{NativePtr, PointerKind};

    fn tex() -> TextureInfo {
        TextureInfo {
            texture: NativePtr::new(PointerKind::U8, 0x1000),
            bit_size: 32,
            width: 16,
            height: 16,
        }
    }

    #[test]
    fn interpolated_position() {
        let cmd = HudCommand::TextureInterpolated {
            texture: tex(),
            prev_pos: Vec2::new(0.0, 0.0),
            prev_scale: Vec2::ONE,
            pos: Vec2::new(10.0, 20.0),
            scale: Vec2::ONE,
        };
        assert_eq!(cmd.position_at(0.5), Vec2::new(5.0, 10.0));
        assert_eq!(cmd.position_at(2.0), Vec2::new(10.0, 20.0));
        assert_eq!(cmd.texture().width, 16);
    }

    #[test]
    fn take_clears_the_frame() {
        let mut list = HudCommandList::new();
        list.push(HudCommand::Texture {
            texture: tex(),
            pos: Vec2::ZERO,
            scale: Vec2::ONE,
        });
        assert_eq!(list.take().len(), 1);
        assert!(list.is_empty());
    }
}
