use modlink_core::network::Destination;
use modlink_core::sync::SyncMode;
use modlink_core::ObjectCategory;
use modlink_script::{CallContext, ConvertError, NativeFunction, Table, TableKey, Variant};
use serde::{Deserialize, Serialize};

use super::{convert_arg, finish, SIDE_EFFECT};
use crate::error::BridgeError;
use crate::subsystem::world::GameData;
use crate::trace;

/// A value that may travel in a custom packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PayloadValue {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

pub type CustomPayload = Vec<(TableKey, PayloadValue)>;

/// Encode a flat table. Nested tables and native references cannot be sent.
pub fn encode_payload(arg: usize, table: &Table) -> Result<Vec<u8>, BridgeError> {
    let mut payload = CustomPayload::with_capacity(table.len());
    for (key, value) in table.iter() {
        let value = match value {
            Variant::Nil => PayloadValue::Nil,
            Variant::Bool(b) => PayloadValue::Bool(*b),
            Variant::Int(i) => PayloadValue::Int(*i),
            Variant::Float(f) => PayloadValue::Float(*f),
            Variant::String(s) => PayloadValue::String(s.clone()),
            other => {
                return Err(BridgeError::Conversion {
                    arg,
                    source: ConvertError::TypeMismatch {
                        expected: "nil, boolean, number or string",
                        received: other.type_name(),
                    },
                })
            }
        };
        payload.push((key.clone(), value));
    }
    Ok(bincode::serialize(&payload)?)
}

pub fn decode_payload(bytes: &[u8]) -> Result<CustomPayload, bincode::Error> {
    bincode::deserialize(bytes)
}

pub fn network_init_object(
    game_data: &mut GameData,
    ctx: &mut CallContext<'_>,
) -> Result<usize, BridgeError> {
    if !ctx.valid_param_range(2, 3) {
        return Ok(0);
    }

    let obj = convert_arg!(ctx, 1, to_object, ObjectCategory::Object);
    if !game_data.objects.contains(obj) {
        return Err(BridgeError::Conversion {
            arg: 1,
            source: ConvertError::Stale(ObjectCategory::Object.name()),
        });
    }
    let standard_sync: bool = convert_arg!(ctx, 2, to_boolean);
    let fields = match ctx.arg(3) {
        Variant::Nil => None,
        Variant::Table(t) => Some(t.clone()),
        other => {
            return Err(BridgeError::Conversion {
                arg: 3,
                source: ConvertError::TypeMismatch {
                    expected: "table or nil",
                    received: other.type_name(),
                },
            })
        }
    };

    let mode = if standard_sync {
        SyncMode::Distance(game_data.standard_sync_distance)
    } else {
        SyncMode::EventsOnly
    };
    let id = game_data.sync.register(&mut game_data.objects, obj, mode)?;
    trace::sync(format_args!("network_init_object: {} -> sync id {}", obj, id));

    let Some(fields) = fields else {
        return Ok(SIDE_EFFECT);
    };

    let custom = game_data.custom_fields.scoped(ctx.active_mod());
    for (key, value) in fields.iter() {
        let identifier = match (key, value) {
            (TableKey::Str(s), _) => s.as_str(),
            (_, Variant::String(s)) => s.as_str(),
            (_, other) => {
                ctx.warn(format_args!("invalid type passed to network_init_object(): {}", other.type_name()));
                continue;
            }
        };

        let Some((desc, width)) =
            game_data
                .fields
                .lookup_sized(ObjectCategory::Object, identifier, Some(&custom))
        else {
            ctx.warn(format_args!("invalid field passed to network_init_object(): {}", identifier));
            continue;
        };

        match game_data.sync.attach_field(id, &game_data.objects, &desc, width) {
            Ok(true) => trace::sync(format_args!(
                "sync id {}: attached {} @0x{:X} ({} bits)",
                id,
                identifier,
                desc.offset,
                width.bits()
            )),
            Ok(false) => {}
            Err(e) => ctx.warn(format_args!("network_init_object(): {}: {}", identifier, e)),
        }
    }

    Ok(SIDE_EFFECT)
}

pub fn network_send_object(
    game_data: &mut GameData,
    ctx: &mut CallContext<'_>,
) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(2) {
        return Ok(0);
    }
    let obj = convert_arg!(ctx, 1, to_object, ObjectCategory::Object);
    let reliable: bool = convert_arg!(ctx, 2, to_boolean);

    let so = game_data
        .sync
        .get_for_object(&game_data.objects, obj)
        .ok_or_else(|| BridgeError::lookup("failed to retrieve sync object"))?;
    let id = so.id;
    let values = game_data
        .sync
        .snapshot(id, &game_data.objects)
        .ok_or_else(|| BridgeError::lookup("failed to retrieve sync object"))?;

    game_data.network.send_object(id, reliable, values);
    Ok(SIDE_EFFECT)
}

pub fn network_send(game_data: &mut GameData, ctx: &mut CallContext<'_>) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(2) {
        return Ok(0);
    }
    let reliable: bool = convert_arg!(ctx, 1, to_boolean);
    let payload = encode_payload(2, convert_arg!(ctx, 2, to_table))?;

    game_data
        .network
        .send_custom(Destination::Broadcast, reliable, payload);
    Ok(SIDE_EFFECT)
}

pub fn network_send_to(game_data: &mut GameData, ctx: &mut CallContext<'_>) -> Result<usize, BridgeError> {
    if !ctx.valid_param_count(3) {
        return Ok(0);
    }
    let local_index: u8 = convert_arg!(ctx, 1, to_integer);
    if local_index as usize >= game_data.network.max_players() {
        return Err(BridgeError::lookup(format!(
            "invalid local player index {}",
            local_index
        )));
    }
    let reliable: bool = convert_arg!(ctx, 2, to_boolean);
    let payload = encode_payload(3, convert_arg!(ctx, 3, to_table))?;

    game_data
        .network
        .send_custom(Destination::Player(local_index), reliable, payload);
    Ok(SIDE_EFFECT)
}

pub struct NetworkInitObject;
impl NativeFunction<GameData> for NetworkInitObject {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = network_init_object(game_data, ctx);
        finish(ctx, result)
    }
}

pub struct NetworkSendObject;
impl NativeFunction<GameData> for NetworkSendObject {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = network_send_object(game_data, ctx);
        finish(ctx, result)
    }
}

pub struct NetworkSend;
impl NativeFunction<GameData> for NetworkSend {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = network_send(game_data, ctx);
        finish(ctx, result)
    }
}

pub struct NetworkSendTo;
impl NativeFunction<GameData> for NetworkSendTo {
    fn call(&self, game_data: &mut GameData, ctx: &mut CallContext<'_>) -> usize {
        let result = network_send_to(game_data, ctx);
        finish(ctx, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flat_payload_round_trips() {
        let mut t = Table::new();
        t.insert("coins", 3i32);
        t.insert("name", "luigi");
        t.push(true);
        let bytes = encode_payload(2, &t).unwrap();
        assert_eq!(
            decode_payload(&bytes).unwrap(),
            vec![
                (TableKey::Int(0), PayloadValue::Bool(true)),
                (TableKey::Str("coins".into()), PayloadValue::Int(3)),
                (TableKey::Str("name".into()), PayloadValue::String("luigi".into())),
            ]
        );
    }

    #[test]
    fn nested_payload_is_rejected() {
        let mut t = Table::new();
        t.insert("inner", Table::new());
        assert!(matches!(
            encode_payload(2, &t),
            Err(BridgeError::Conversion { arg: 2, .. })
        ));
    }
}
