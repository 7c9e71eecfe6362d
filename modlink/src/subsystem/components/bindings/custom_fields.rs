use modlink_core::{ObjectCategory, ValueType};
use modlink_script::{CallContext, NativeFunction, TableKey, Variant};

use super::{convert_arg, finish, SIDE_EFFECT};
use crate::error::BridgeError;
use crate::subsystem::world::GameData;

/// `define_custom_obj_fields({ name = "u32", ... })` for the calling mod.
///
/// Bad entries are reported and skipped; the rest are still defined.
pub fn define_custom_obj_fields(
    game_data: &mut GameData,
    ctx: &mut CallContext<'_>,
) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(1) {
        return Ok(0);
    }
    let owner = ctx
        .active_mod()
        .ok_or_else(|| BridgeError::lookup("no active mod to define fields for"))?;
    let entries = convert_arg!(ctx, 1, to_table).clone();

    for (key, value) in entries.iter() {
        let (TableKey::Str(identifier), Variant::String(tag)) = (key, value) else {
            ctx.warn(format_args!(
                "define_custom_obj_fields(): skipping entry {} = {}",
                key,
                value.type_name()
            ));
            continue;
        };
        let Some(value_type) = ValueType::from_tag(tag) else {
            ctx.warn(format_args!(
                "define_custom_obj_fields(): unknown type '{}' for {}",
                tag, identifier
            ));
            continue;
        };

        if let Err(e) = game_data.custom_fields.define(
            owner,
            &game_data.fields,
            ObjectCategory::Object,
            identifier,
            value_type,
        ) {
            ctx.warn(format_args!("define_custom_obj_fields(): {}", e));
        }
    }

    Ok(SIDE_EFFECT)
}

pub struct DefineCustomObjFields;
impl NativeFunction<GameData> for DefineCustomObjFields {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = define_custom_obj_fields(game_data, ctx);
        finish(ctx, result)
    }
}
