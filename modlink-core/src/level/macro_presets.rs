use crate::behavior::BehaviorId;

/// Terminator word of a macro object array.
pub const MACRO_OBJECT_END: i16 = 0x1E;

/// Preset ids in a macro entry are stored with this bias.
pub const MACRO_PRESET_BIAS: i32 = 0x1F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroPreset {
    pub behavior: BehaviorId,
    pub model: u8,
    pub param: u16,
}

const fn preset(behavior: BehaviorId, model: u8, param: u16) -> MacroPreset {
    MacroPreset { behavior, model, param }
}

pub static MACRO_PRESETS: &[MacroPreset] = &[
    preset(BehaviorId::YellowCoin, 0x74, 0),
    preset(BehaviorId::CoinFormation, 0x74, 0),
    preset(BehaviorId::CoinFormation, 0x74, 0x10),
    preset(BehaviorId::CoinFormation, 0x74, 0x11),
    preset(BehaviorId::CoinFormation, 0x74, 0x12),
    preset(BehaviorId::OneUp, 0xD4, 0),
    preset(BehaviorId::RedCoin, 0xD7, 0),
    preset(BehaviorId::BlueCoin, 0x76, 0),
    preset(BehaviorId::Goomba, 0xC0, 0),
    preset(BehaviorId::Goomba, 0xC0, 1),
    preset(BehaviorId::BobOmb, 0xBC, 0),
    preset(BehaviorId::Koopa, 0x68, 1),
    preset(BehaviorId::KoopaShell, 0xBE, 0),
    preset(BehaviorId::BreakableBox, 0x81, 0),
    preset(BehaviorId::ExclamationBox, 0x89, 0),
    preset(BehaviorId::ExclamationBox, 0x89, 3),
    preset(BehaviorId::ExclamationBox, 0x89, 4),
    preset(BehaviorId::ExclamationBox, 0x89, 6),
    preset(BehaviorId::WoodenPost, 0x6B, 0),
    preset(BehaviorId::Tree, 0x17, 0),
    preset(BehaviorId::Signpost, 0x7C, 0),
    preset(BehaviorId::Pole, 0x36, 0x0A),
    preset(BehaviorId::Butterfly, 0xBB, 0),
    preset(BehaviorId::Bully, 0x56, 0),
    preset(BehaviorId::Boo, 0x54, 0),
    preset(BehaviorId::Piranha, 0x64, 0x21),
    preset(BehaviorId::WaterRing, 0xDF, 0),
];

/// Look up the preset named by an entry's first word.
pub fn preset_for_word(word0: i16) -> Option<&'static MacroPreset> {
    let id = ((word0 as u16 & 0x1FF) as i32) - MACRO_PRESET_BIAS;
    usize::try_from(id).ok().and_then(|i| MACRO_PRESETS.get(i))
}

/// Recombine an entry's parameter word with its preset's parameter into the
/// behavior argument the spawned object receives.
pub fn macro_behavior_arg(word4: i16, preset: &MacroPreset) -> u32 {
    let obj_params = ((word4 as u16 as u32) & 0xFF00) + (preset.param as u32 & 0x00FF);
    ((obj_params & 0x00FF) << 16) + (obj_params & 0xFF00)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_ids_are_biased() {
        assert_eq!(preset_for_word(0x1F).unwrap().behavior, BehaviorId::YellowCoin);
        assert_eq!(preset_for_word(0x1F + 6).unwrap().behavior, BehaviorId::RedCoin);
        // yaw bits above the preset id are ignored
        assert_eq!(
            preset_for_word((0x1F + 8) | (0x12 << 9)).unwrap().behavior,
            BehaviorId::Goomba
        );
        assert!(preset_for_word(0x10).is_none());
        assert!(preset_for_word(0x1FF).is_none());
    }

    #[test]
    fn behavior_arg_recombination() {
        let piranha = preset_for_word(0x1F + 25).unwrap();
        assert_eq!(macro_behavior_arg(0x0500, piranha), (0x21 << 16) + 0x0500);
        // the low byte of the entry's parameter word is discarded
        assert_eq!(macro_behavior_arg(0x05FF, piranha), (0x21 << 16) + 0x0500);
        let coin = preset_for_word(0x1F).unwrap();
        assert_eq!(macro_behavior_arg(0, coin), 0);
    }
}
