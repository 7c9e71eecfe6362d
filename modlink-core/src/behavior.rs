use serde::{Deserialize, Serialize};

/// Identifiers of the behaviors level commands and macro presets refer to.
///
/// Level streams store the raw id; anything not listed here is passed
/// through to scripts unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum BehaviorId {
    Star = 0,
    YellowCoin = 1,
    RedCoin = 2,
    BlueCoin = 3,
    CoinFormation = 4,
    OneUp = 5,
    Goomba = 6,
    BobOmb = 7,
    ChainChomp = 8,
    Koopa = 9,
    KoopaShell = 10,
    Thwomp = 11,
    Whomp = 12,
    BreakableBox = 13,
    ExclamationBox = 14,
    WoodenPost = 15,
    Tree = 16,
    Signpost = 17,
    Pole = 18,
    Door = 19,
    WarpPipe = 20,
    Bully = 21,
    Boo = 22,
    Butterfly = 23,
    Piranha = 24,
    StarDoor = 25,
    Checkerboard = 26,
    WaterRing = 27,
}

impl BehaviorId {
    pub const ALL: &'static [BehaviorId] = &[
        BehaviorId::Star,
        BehaviorId::YellowCoin,
        BehaviorId::RedCoin,
        BehaviorId::BlueCoin,
        BehaviorId::CoinFormation,
        BehaviorId::OneUp,
        BehaviorId::Goomba,
        BehaviorId::BobOmb,
        BehaviorId::ChainChomp,
        BehaviorId::Koopa,
        BehaviorId::KoopaShell,
        BehaviorId::Thwomp,
        BehaviorId::Whomp,
        BehaviorId::BreakableBox,
        BehaviorId::ExclamationBox,
        BehaviorId::WoodenPost,
        BehaviorId::Tree,
        BehaviorId::Signpost,
        BehaviorId::Pole,
        BehaviorId::Door,
        BehaviorId::WarpPipe,
        BehaviorId::Bully,
        BehaviorId::Boo,
        BehaviorId::Butterfly,
        BehaviorId::Piranha,
        BehaviorId::StarDoor,
        BehaviorId::Checkerboard,
        BehaviorId::WaterRing,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }
}

impl From<BehaviorId> for u32 {
    fn from(value: BehaviorId) -> Self {
        value.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense() {
        for (i, b) in BehaviorId::ALL.iter().enumerate() {
            assert_eq!(b.id(), i as u32);
            assert_eq!(BehaviorId::from_id(i as u32), Some(*b));
        }
        assert_eq!(BehaviorId::from_id(BehaviorId::ALL.len() as u32), None);
    }
}
